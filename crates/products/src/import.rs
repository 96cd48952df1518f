use serde::{Deserialize, Serialize};

use tallyworks_platform::{ConfigParams, RequestContext};

/// Configuration parameter selecting how pricelists compute prices.
pub const PRICELIST_SETTING_PARAM: &str = "sales.pricelist_setting";

/// Context flag set by the multi-pricelist product import screen.
pub const MULTI_PRICELIST_IMPORT_FLAG: &str = "multi_pricelist_product_import";

/// One downloadable import-spreadsheet template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportTemplate {
    pub label: String,
    pub path: String,
}

impl ImportTemplate {
    fn new(label: &str, path: &str) -> Self {
        Self {
            label: label.to_string(),
            path: path.to_string(),
        }
    }
}

/// The import templates offered for products.
///
/// The base list has the plain product template. The multi-price variant is
/// added only when the import was opened from the multi-pricelist screen
/// (context flag) *and* pricelists are configured to compute prices as
/// percentages.
pub fn import_templates(ctx: &RequestContext, params: &ConfigParams) -> Vec<ImportTemplate> {
    let base = ImportTemplate::new(
        "Import Template for Products",
        "/products/static/xls/product_template.xls",
    );

    if ctx.flag_enabled(MULTI_PRICELIST_IMPORT_FLAG)
        && params.get_param(PRICELIST_SETTING_PARAM) == Some("percentage")
    {
        return vec![
            base,
            ImportTemplate::new(
                "Import Template for Products (with several prices)",
                "/sales/static/xls/product_multi_price.xls",
            ),
        ];
    }

    vec![base]
}
