//! Data model for automation rules — conditions, actions, and the rule itself.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message field a condition selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionField {
    Sender,
    SenderDomain,
    Recipient,
    Subject,
    Body,
    Labels,
    Date,
    HasAttachment,
    IsUnread,
    Category,
    Priority,
}

/// Comparison operator for a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    Contains,
    StartsWith,
    EndsWith,
    MatchesRegex,
    OlderThan,
    NewerThan,
    InList,
}

/// Comparison value for a condition. Shape depends on the operator:
/// text operators take `Text`, `in_list` takes `List`, the age operators
/// take `Duration`, and `equals` on boolean fields takes `Flag`.
///
/// Untagged so the persisted JSON keeps its natural shape
/// (`"x"`, `["a","b"]`, `{"amount":7,"unit":"days"}`, `true`).
/// A shape that doesn't fit the operator makes the condition a non-match,
/// never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Duration { amount: i64, unit: String },
    Flag(bool),
    List(Vec<String>),
    Text(String),
}

impl ConditionValue {
    pub fn text(s: impl Into<String>) -> Self {
        ConditionValue::Text(s.into())
    }

    pub fn duration(amount: i64, unit: impl Into<String>) -> Self {
        ConditionValue::Duration {
            amount,
            unit: unit.into(),
        }
    }
}

/// A single condition in a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCondition {
    pub field: ConditionField,
    pub operator: ConditionOperator,
    pub value: ConditionValue,
    #[serde(default)]
    pub negate: bool,
}

impl RuleCondition {
    pub fn new(field: ConditionField, operator: ConditionOperator, value: ConditionValue) -> Self {
        Self {
            field,
            operator,
            value,
            negate: false,
        }
    }
}

/// What a rule does to a matched message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Archive,
    Trash,
    Delete,
    AddLabel,
    RemoveLabel,
    MarkRead,
    MarkUnread,
    Star,
    Unstar,
    Forward,
}

impl ActionKind {
    /// Short label for logging and reports.
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Archive => "archive",
            ActionKind::Trash => "trash",
            ActionKind::Delete => "delete",
            ActionKind::AddLabel => "add_label",
            ActionKind::RemoveLabel => "remove_label",
            ActionKind::MarkRead => "mark_read",
            ActionKind::MarkUnread => "mark_unread",
            ActionKind::Star => "star",
            ActionKind::Unstar => "unstar",
            ActionKind::Forward => "forward",
        }
    }
}

/// An action plus its free-form parameters.
///
/// Only the label and forward actions read `params` (`"label"` and
/// `"to"` respectively).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleAction {
    pub kind: ActionKind,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub params: HashMap<String, String>,
}

impl RuleAction {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            params: HashMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// The `label` parameter, empty when absent.
    pub fn label_param(&self) -> &str {
        self.params.get("label").map(String::as_str).unwrap_or("")
    }
}

/// An automation rule: conditions, actions, and a combination mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    /// Store-assigned identifier; `None` until persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Original free-text source when the rule came from the parser.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural_language: Option<String>,
    #[serde(default)]
    pub conditions: Vec<RuleCondition>,
    #[serde(default)]
    pub actions: Vec<RuleAction>,
    /// `true` = every condition must hold (AND), `false` = any (OR).
    #[serde(default = "default_true")]
    pub match_all: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl Rule {
    /// New enabled AND-all rule with no conditions or actions.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            name: name.into(),
            description: String::new(),
            natural_language: None,
            conditions: Vec::new(),
            actions: Vec::new(),
            match_all: true,
            enabled: true,
            created_at: now,
            updated_at: now,
        }
    }
}
