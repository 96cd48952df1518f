use serde::{Deserialize, Serialize};

use tallyworks_core::CompanyId;

/// Company-level settings the invoicing flow reads its defaults from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    id: CompanyId,
    name: String,
    invoice_is_email: bool,
    invoice_is_print: bool,
}

impl Company {
    pub fn new(id: CompanyId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            // Companies send and print invoices unless configured otherwise.
            invoice_is_email: true,
            invoice_is_print: true,
        }
    }

    pub fn with_invoice_defaults(mut self, is_email: bool, is_print: bool) -> Self {
        self.invoice_is_email = is_email;
        self.invoice_is_print = is_print;
        self
    }

    pub fn id(&self) -> CompanyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invoice_is_email(&self) -> bool {
        self.invoice_is_email
    }

    pub fn invoice_is_print(&self) -> bool {
        self.invoice_is_print
    }
}
