use std::collections::BTreeMap;

use serde_json::Value;

use tallyworks_auth::User;
use tallyworks_core::{DomainError, DomainResult, RecordId};

use crate::Company;

/// Ambient context of one user interaction, passed explicitly to every
/// operation that needs it.
///
/// This replaces the implicit environment the original relied on: the
/// acting user, their company, the records the interaction was triggered
/// on, and free-form context flags.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    user: User,
    company: Company,
    active_ids: Option<Vec<RecordId>>,
    flags: BTreeMap<String, Value>,
}

impl RequestContext {
    pub fn new(user: User, company: Company) -> Self {
        Self {
            user,
            company,
            active_ids: None,
            flags: BTreeMap::new(),
        }
    }

    pub fn with_active_ids(mut self, ids: impl IntoIterator<Item = RecordId>) -> Self {
        self.active_ids = Some(ids.into_iter().collect());
        self
    }

    pub fn with_flag(mut self, key: impl Into<String>, value: Value) -> Self {
        self.flags.insert(key.into(), value);
        self
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn company(&self) -> &Company {
        &self.company
    }

    pub fn active_ids(&self) -> Option<&[RecordId]> {
        self.active_ids.as_deref()
    }

    /// The triggering selection, or a `MissingContext` error when the
    /// interaction was opened without one.
    pub fn require_active_ids(&self) -> DomainResult<&[RecordId]> {
        self.active_ids
            .as_deref()
            .ok_or_else(|| DomainError::missing_context("active_ids"))
    }

    pub fn flag(&self, key: &str) -> Option<&Value> {
        self.flags.get(key)
    }

    /// A flag counts as enabled for `true`, non-zero numbers, and non-empty
    /// strings; anything else (including absence) is disabled.
    pub fn flag_enabled(&self, key: &str) -> bool {
        match self.flags.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            _ => false,
        }
    }
}
