use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use tallyworks_core::{DomainError, DomainResult, RecordId};

/// Mail template identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub RecordId);

impl TemplateId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A reusable message template bound to one record model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailTemplate {
    id: TemplateId,
    /// Dotted record-model key the template renders for.
    model: String,
    name: String,
    subject: String,
    body_html: String,
}

impl MailTemplate {
    pub fn new(
        id: TemplateId,
        model: impl Into<String>,
        name: impl Into<String>,
        subject: impl Into<String>,
        body_html: impl Into<String>,
    ) -> Self {
        Self {
            id,
            model: model.into(),
            name: name.into(),
            subject: subject.into(),
            body_html: body_html.into(),
        }
    }

    pub fn id(&self) -> TemplateId {
        self.id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body_html(&self) -> &str {
        &self.body_html
    }
}

/// Lookup of templates by id, with a per-model view for pickers.
#[derive(Debug, Default, Clone)]
pub struct TemplateCatalog {
    templates: BTreeMap<TemplateId, MailTemplate>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, template: MailTemplate) {
        self.templates.insert(template.id(), template);
    }

    pub fn get(&self, id: TemplateId) -> DomainResult<&MailTemplate> {
        self.templates
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("mail template {id}")))
    }

    /// Templates selectable for one record model.
    pub fn for_model<'a>(&'a self, model: &'a str) -> impl Iterator<Item = &'a MailTemplate> {
        self.templates.values().filter(move |t| t.model() == model)
    }
}
