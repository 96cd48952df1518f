use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tallyworks_core::{DomainResult, Entity, RecordId};
use tallyworks_platform::{ActionRegistry, ReportAction};

/// Dotted record-model key of invoices (template domains, context keys).
pub const INVOICE_MODEL: &str = "invoicing.invoice";

/// Dotted key of the registered invoice PDF report action.
pub const INVOICE_REPORT: &str = "invoicing.report_invoice";

/// Invoice identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(pub RecordId);

impl InvoiceId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A customer invoice, as far as the send dialog needs it: who it is
/// addressed to and what to put in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    id: InvoiceId,
    number: String,
    partner_name: String,
    partner_email: Option<String>,
    /// Total in smallest currency unit (e.g., cents).
    amount_total: u64,
    issued_on: DateTime<Utc>,
}

impl Invoice {
    pub fn new(
        id: InvoiceId,
        number: impl Into<String>,
        partner_name: impl Into<String>,
        partner_email: Option<String>,
        amount_total: u64,
        issued_on: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            number: number.into(),
            partner_name: partner_name.into(),
            partner_email,
            amount_total,
            issued_on,
        }
    }

    pub fn id_typed(&self) -> InvoiceId {
        self.id
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn partner_name(&self) -> &str {
        &self.partner_name
    }

    pub fn partner_email(&self) -> Option<&str> {
        self.partner_email.as_deref()
    }

    pub fn amount_total(&self) -> u64 {
        self.amount_total
    }

    pub fn issued_on(&self) -> DateTime<Utc> {
        self.issued_on
    }
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// The print action for a set of invoices: the registered invoice report,
/// scoped to the given ids.
pub fn print_action(invoice_ids: &[InvoiceId], registry: &ActionRegistry) -> DomainResult<ReportAction> {
    let mut action = registry.get_report(INVOICE_REPORT)?;
    action.record_ids = invoice_ids.iter().map(|id| id.0).collect();
    Ok(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tallyworks_platform::UiAction;

    fn registry() -> ActionRegistry {
        let mut registry = ActionRegistry::new();
        registry.register(
            INVOICE_REPORT,
            UiAction::Report(ReportAction::new(INVOICE_REPORT, vec![])),
        );
        registry
    }

    #[test]
    fn print_action_scopes_the_registered_report() {
        let ids = vec![InvoiceId::new(RecordId::new()), InvoiceId::new(RecordId::new())];
        let action = print_action(&ids, &registry()).unwrap();
        assert_eq!(action.report, INVOICE_REPORT);
        assert_eq!(action.record_ids, vec![ids[0].0, ids[1].0]);
        assert!(!action.close_on_report_download);
    }

    #[test]
    fn print_action_requires_the_report_to_be_registered() {
        let err = print_action(&[], &ActionRegistry::new()).unwrap_err();
        match err {
            tallyworks_core::DomainError::NotFound(what) => {
                assert!(what.contains(INVOICE_REPORT));
            }
            _ => panic!("Expected NotFound error"),
        }
    }
}
