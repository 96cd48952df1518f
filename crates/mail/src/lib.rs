//! `tallyworks-mail` — message composition and dispatch seam.

pub mod composer;
pub mod message;
pub mod template;

pub use composer::{CompositionMode, ComposerId, MailComposer};
pub use message::{MailDispatcher, OutboundMessage, Recipient};
pub use template::{MailTemplate, TemplateCatalog, TemplateId};
