//! `tallyworks-invoicing` — invoice records and the send dialog.

pub mod invoice;
pub mod send_wizard;

pub use invoice::{print_action, Invoice, InvoiceId, INVOICE_MODEL, INVOICE_REPORT};
pub use send_wizard::{InvoiceSendWizard, SEND_WIZARD_MODEL};
