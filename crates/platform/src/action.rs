//! UI action descriptors.
//!
//! Actions are passive, serializable values describing what the user
//! interface should do next (open a window, download a report, close the
//! current dialog). Executing them is the host's concern.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tallyworks_core::{DomainError, DomainResult, RecordId};

/// One UI action descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiAction {
    Window(WindowAction),
    Report(ReportAction),
    /// Close the active dialog without doing anything else.
    CloseWindow,
}

/// Opens a list/pivot view over a record model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowAction {
    pub name: String,
    /// Dotted record-model key, e.g. "sales.channel_report".
    pub model: String,
    /// Comma-separated view modes, e.g. "pivot,graph".
    pub view_mode: String,
    /// Domain filter as a JSON array of `[field, operator, value]` clauses.
    pub domain: Value,
    /// View context (default filters, measures, groupings).
    pub context: Value,
}

impl WindowAction {
    pub fn new(name: impl Into<String>, model: impl Into<String>, view_mode: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            view_mode: view_mode.into(),
            domain: Value::Array(Vec::new()),
            context: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_domain(mut self, domain: Value) -> Self {
        self.domain = domain;
        self
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = context;
        self
    }
}

/// Renders a registered report over a set of records and hands the
/// document to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportAction {
    /// Dotted report key, e.g. "invoicing.report_invoice".
    pub report: String,
    pub record_ids: Vec<RecordId>,
    /// When set, the UI closes the originating dialog as soon as the
    /// document download starts.
    #[serde(default)]
    pub close_on_report_download: bool,
}

impl ReportAction {
    pub fn new(report: impl Into<String>, record_ids: Vec<RecordId>) -> Self {
        Self {
            report: report.into(),
            record_ids,
            close_on_report_download: false,
        }
    }

    pub fn close_on_download(mut self) -> Self {
        self.close_on_report_download = true;
        self
    }
}

/// Registry of pre-registered actions, looked up by dotted key.
#[derive(Debug, Default, Clone)]
pub struct ActionRegistry {
    actions: BTreeMap<String, UiAction>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, key: impl Into<String>, action: UiAction) {
        self.actions.insert(key.into(), action);
    }

    /// A copy of the registered action; callers customize the copy.
    pub fn get(&self, key: &str) -> DomainResult<UiAction> {
        self.actions
            .get(key)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("action {key}")))
    }

    /// Like [`get`](Self::get), but requires the entry to be a window action.
    pub fn get_window(&self, key: &str) -> DomainResult<WindowAction> {
        match self.get(key)? {
            UiAction::Window(action) => Ok(action),
            _ => Err(DomainError::validation(format!(
                "action {key} is not a window action"
            ))),
        }
    }

    /// Like [`get`](Self::get), but requires the entry to be a report action.
    pub fn get_report(&self, key: &str) -> DomainResult<ReportAction> {
        match self.get(key)? {
            UiAction::Report(action) => Ok(action),
            _ => Err(DomainError::validation(format!(
                "action {key} is not a report action"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn registry_returns_copies_for_customization() {
        let mut registry = ActionRegistry::new();
        registry.register(
            "sales.channel_report",
            UiAction::Window(WindowAction::new("Sales Analysis", "sales.channel_report", "pivot")),
        );

        let mut first = registry.get_window("sales.channel_report").unwrap();
        first.domain = json!([["team_id", "=", 1]]);

        let second = registry.get_window("sales.channel_report").unwrap();
        assert_eq!(second.domain, json!([]));
    }

    #[test]
    fn unknown_key_is_not_found() {
        let registry = ActionRegistry::new();
        let err = registry.get("nope").unwrap_err();
        match err {
            DomainError::NotFound(what) => assert!(what.contains("nope")),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn get_report_rejects_window_entries() {
        let mut registry = ActionRegistry::new();
        registry.register(
            "k",
            UiAction::Window(WindowAction::new("n", "m", "list")),
        );
        let err = registry.get_report("k").unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn report_action_serializes_with_tag() {
        let action = UiAction::Report(ReportAction::new("invoicing.report_invoice", vec![]).close_on_download());
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["type"], "report");
        assert_eq!(value["close_on_report_download"], json!(true));
    }
}
