use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tallyworks_core::{DomainResult, RecordId};

/// Destination of one outbound message, resolved by the caller from the
/// record the message is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub record_id: RecordId,
    pub email: String,
}

/// A fully assembled message, ready for the platform's messaging layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub subject: String,
    pub body_html: String,
    pub recipient: Recipient,
    pub queued_at: DateTime<Utc>,
}

/// Outbound mail seam. The only side-effecting dependency of the
/// composition flow; tests substitute a recording implementation.
pub trait MailDispatcher {
    fn deliver(&self, message: OutboundMessage) -> DomainResult<()>;
}
