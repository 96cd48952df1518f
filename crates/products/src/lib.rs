//! `tallyworks-products` — product templates, variants, and the sales
//! extension fields.

pub mod attribute;
pub mod import;
pub mod template;
pub mod uom;
pub mod variant;

pub use attribute::{
    Attribute, AttributeCatalog, AttributeId, AttributeValue, AttributeValueId, VariantCreation,
};
pub use import::{import_templates, ImportTemplate, MULTI_PRICELIST_IMPORT_FLAG, PRICELIST_SETTING_PARAM};
pub use template::{
    action_view_sales, hide_expense_policy, ExpensePolicy, InvoicePolicy, LineWarning,
    ProductKind, ProductTemplate, ProductTemplateId, ServiceType, ALL_CHANNELS_SALES_ACTION,
};
pub use uom::{Uom, UomId};
pub use variant::{ProductVariant, VariantId};
