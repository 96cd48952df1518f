use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use tallyworks_auth::{Group, User};
use tallyworks_core::{round_to_precision, DomainError, DomainResult, Entity, RecordId};
use tallyworks_platform::{ActionRegistry, UiAction};

use crate::attribute::{AttributeCatalog, AttributeValueId, VariantCreation};
use crate::uom::Uom;
use crate::variant::{ProductVariant, VariantId};

/// Dotted key of the registered all-channels sales analysis action.
pub const ALL_CHANNELS_SALES_ACTION: &str = "sales.report_all_channels_action";

/// Product template identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductTemplateId(pub RecordId);

impl ProductTemplateId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductTemplateId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Physical/consumable nature of the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Consumable,
    Service,
}

/// How service quantities reach the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    /// Quantities are set manually on the order.
    Manual,
}

/// Warning behavior on sales order lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineWarning {
    NoMessage,
    Warning,
    /// The warning blocks the line instead of just showing a message.
    Block,
}

/// Whether (and at which price) expenses are re-invoiced to the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpensePolicy {
    No,
    Cost,
    SalesPrice,
}

/// Which quantities get invoiced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoicePolicy {
    /// Invoice quantities ordered by the customer.
    Order,
    /// Invoice quantities delivered to the customer.
    Delivery,
}

/// A product template with its sales-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductTemplate {
    id: ProductTemplateId,
    name: String,
    kind: ProductKind,
    service_type: ServiceType,
    sale_line_warn: LineWarning,
    sale_line_warn_msg: Option<String>,
    expense_policy: ExpensePolicy,
    invoice_policy: Option<InvoicePolicy>,
    uom: Uom,
}

impl ProductTemplate {
    pub fn new(id: ProductTemplateId, name: impl Into<String>, kind: ProductKind, uom: Uom) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            service_type: ServiceType::Manual,
            sale_line_warn: LineWarning::NoMessage,
            sale_line_warn_msg: None,
            expense_policy: ExpensePolicy::No,
            invoice_policy: Some(InvoicePolicy::Order),
            uom,
        }
    }

    pub fn id_typed(&self) -> ProductTemplateId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ProductKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: ProductKind) {
        self.kind = kind;
    }

    pub fn service_type(&self) -> ServiceType {
        self.service_type
    }

    pub fn sale_line_warn(&self) -> LineWarning {
        self.sale_line_warn
    }

    pub fn set_sale_line_warn(&mut self, warning: LineWarning, msg: Option<String>) {
        self.sale_line_warn = warning;
        self.sale_line_warn_msg = msg;
    }

    pub fn sale_line_warn_msg(&self) -> Option<&str> {
        self.sale_line_warn_msg.as_deref()
    }

    pub fn expense_policy(&self) -> ExpensePolicy {
        self.expense_policy
    }

    pub fn set_expense_policy(&mut self, policy: ExpensePolicy) {
        self.expense_policy = policy;
    }

    pub fn invoice_policy(&self) -> Option<InvoicePolicy> {
        self.invoice_policy
    }

    pub fn set_invoice_policy(&mut self, policy: Option<InvoicePolicy>) {
        self.invoice_policy = policy;
    }

    pub fn uom(&self) -> &Uom {
        &self.uom
    }

    /// Keep dependent fields consistent when the product's nature changes:
    /// consumables invoice ordered quantities unless configured otherwise,
    /// and their service tracking falls back to manual. Draft-state only;
    /// nothing is persisted here.
    pub fn on_type_change(&mut self) {
        if self.kind == ProductKind::Consumable {
            if self.invoice_policy.is_none() {
                self.invoice_policy = Some(InvoicePolicy::Order);
            }
            self.service_type = ServiceType::Manual;
        }
    }

    /// Total quantity sold across this template's variants, rounded to the
    /// template's uom precision. Archived variants still count: their past
    /// sales are part of the template's history.
    pub fn sales_count(&self, variants: &[ProductVariant]) -> f64 {
        let total: f64 = variants
            .iter()
            .filter(|variant| variant.template_id() == self.id)
            .map(ProductVariant::sales_count)
            .sum();
        round_to_precision(total, self.uom.rounding())
    }

    /// Create one variant of this template from a JSON-encoded list of
    /// attribute-value ids (the payload of the UI's variant-creation call).
    ///
    /// Values of attributes that never split variants are dropped; the new
    /// variant carries exactly the remaining set. A malformed payload is a
    /// validation error; an unknown id a lookup failure.
    pub fn create_product_variant(
        &self,
        payload: &str,
        catalog: &AttributeCatalog,
    ) -> DomainResult<ProductVariant> {
        let requested: Vec<AttributeValueId> = serde_json::from_str(payload)
            .map_err(|e| DomainError::validation(format!("malformed attribute value list: {e}")))?;

        let mut kept = BTreeSet::new();
        for value_id in requested {
            let value = catalog.value(value_id)?;
            let attribute = catalog.attribute_of(value)?;
            if attribute.variant_creation() == VariantCreation::NoVariant {
                debug!(value = %value_id, attribute = %attribute.id(), "skipping no-variant attribute value");
                continue;
            }
            kept.insert(value.id());
        }

        let variant = ProductVariant::new(VariantId::new(RecordId::new()), self.id, kept);
        info!(template = %self.id, variant = %variant.id_typed(), "product variant created");
        Ok(variant)
    }
}

impl Entity for ProductTemplate {
    type Id = ProductTemplateId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// The feature groups that make the re-invoicing policy visible.
pub fn expense_policy_groups() -> [Group; 3] {
    [
        Group::new("analytic.accounting"),
        Group::new("project.member"),
        Group::new("expense.approver"),
    ]
}

/// The re-invoicing policy is hidden from users holding none of the
/// analytic-accounting, project-member, and expense-approver groups.
pub fn hide_expense_policy(user: &User) -> bool {
    !user.has_any_group(&expense_policy_groups())
}

/// The all-channels sales analysis, scoped to the given templates, opened
/// on last year's numbers with quantities pivoted per sales team.
pub fn action_view_sales(
    template_ids: &[ProductTemplateId],
    registry: &ActionRegistry,
) -> DomainResult<UiAction> {
    let action = registry
        .get_window(ALL_CHANNELS_SALES_ACTION)?
        .with_domain(json!([["product_template_id", "in", template_ids]]))
        .with_context(json!({
            "search_default_last_year": 1,
            "pivot_measures": ["product_qty"],
            "search_default_team_id": 1,
        }));
    Ok(UiAction::Window(action))
}
