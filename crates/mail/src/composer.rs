use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use tallyworks_core::{DomainError, DomainResult, RecordId};

use crate::message::{MailDispatcher, OutboundMessage, Recipient};
use crate::template::{MailTemplate, TemplateId};

/// Composer identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComposerId(pub RecordId);

impl ComposerId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ComposerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// How a composition session addresses its targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositionMode {
    /// One target record: the message is written for it alone.
    Single,
    /// Several target records: the same message goes to each of them.
    Bulk,
}

impl CompositionMode {
    /// Mode for a selection of `len` target records. An empty in-flight
    /// selection composes like a bulk send.
    pub fn for_selection(len: usize) -> Self {
        if len == 1 {
            CompositionMode::Single
        } else {
            CompositionMode::Bulk
        }
    }
}

/// A message-composition session.
///
/// Owned by whatever interaction created it (e.g. the invoice send wizard)
/// and dropped with it. Subject and body are derived from the applied
/// template; both may be edited afterwards and are re-derived whenever the
/// template changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailComposer {
    id: ComposerId,
    mode: CompositionMode,
    template_id: Option<TemplateId>,
    subject: String,
    body_html: String,
}

impl MailComposer {
    /// Fresh composer for a selection of `len` target records.
    pub fn for_selection(len: usize) -> Self {
        Self {
            id: ComposerId::new(RecordId::new()),
            mode: CompositionMode::for_selection(len),
            template_id: None,
            subject: String::new(),
            body_html: String::new(),
        }
    }

    pub fn id(&self) -> ComposerId {
        self.id
    }

    pub fn mode(&self) -> CompositionMode {
        self.mode
    }

    pub fn template_id(&self) -> Option<TemplateId> {
        self.template_id
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body_html(&self) -> &str {
        &self.body_html
    }

    /// Re-derive the mode after the target selection changed.
    pub fn recompute_mode(&mut self, selection_len: usize) {
        let mode = CompositionMode::for_selection(selection_len);
        if mode != self.mode {
            debug!(composer = %self.id, ?mode, "composition mode changed");
            self.mode = mode;
        }
    }

    /// Apply a template and refresh the derived subject and body from it.
    ///
    /// The template must render for `expected_model`; applying a template
    /// of another record model is a validation error.
    pub fn apply_template(&mut self, template: &MailTemplate, expected_model: &str) -> DomainResult<()> {
        if template.model() != expected_model {
            return Err(DomainError::validation(format!(
                "template {} renders {}, expected {expected_model}",
                template.id(),
                template.model()
            )));
        }
        self.template_id = Some(template.id());
        self.subject = template.subject().to_string();
        self.body_html = template.body_html().to_string();
        Ok(())
    }

    /// Drop the template and the content derived from it.
    pub fn clear_template(&mut self) {
        self.template_id = None;
        self.subject.clear();
        self.body_html.clear();
    }

    /// Manual edits after (or instead of) a template.
    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
    }

    pub fn set_body_html(&mut self, body_html: impl Into<String>) {
        self.body_html = body_html.into();
    }

    /// Build and dispatch one message per recipient. Recipients were
    /// already resolved by the caller; records without an address never get
    /// this far. Returns the number of messages handed to the dispatcher.
    pub fn send_mail(
        &self,
        dispatcher: &dyn MailDispatcher,
        recipients: &[Recipient],
    ) -> DomainResult<usize> {
        for recipient in recipients {
            dispatcher.deliver(OutboundMessage {
                subject: self.subject.clone(),
                body_html: self.body_html.clone(),
                recipient: recipient.clone(),
                queued_at: Utc::now(),
            })?;
        }
        info!(composer = %self.id, count = recipients.len(), "messages dispatched");
        Ok(recipients.len())
    }
}
