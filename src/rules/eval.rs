//! Condition evaluation and rule matching.
//!
//! Everything here is pure: no I/O, no side effects, no shared state.
//! Malformed conditions (value shape that doesn't fit the operator,
//! invalid regex) evaluate to non-match rather than erroring — a rule
//! set keeps running even when one condition in it is nonsense.

use chrono::{DateTime, Duration, Utc};
use regex::RegexBuilder;

use crate::mail::EmailMessage;
use crate::rules::model::{
    ConditionField, ConditionOperator, ConditionValue, Rule, RuleCondition,
};

/// Value extracted from a message field, tagged by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Timestamp(DateTime<Utc>),
    Flag(bool),
}

impl FieldValue {
    /// Stringified form used by the prefix/suffix/regex operators.
    fn as_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => items.join(", "),
            FieldValue::Timestamp(ts) => ts.to_rfc3339(),
            FieldValue::Flag(b) => b.to_string(),
        }
    }
}

/// Extract the value a condition field selects from a message.
///
/// Exhaustive over [`ConditionField`] — adding a field without a getter is
/// a compile error, not a silent non-match. `None` means the field has no
/// value on this message (triage fields before scoring), which evaluates
/// to false before the negate step.
pub fn field_value(msg: &EmailMessage, field: ConditionField) -> Option<FieldValue> {
    match field {
        ConditionField::Sender => Some(FieldValue::Text(msg.sender_email.clone())),
        ConditionField::SenderDomain => Some(FieldValue::Text(msg.sender_domain().to_string())),
        ConditionField::Recipient => Some(FieldValue::List(msg.recipients.clone())),
        ConditionField::Subject => Some(FieldValue::Text(msg.subject.clone())),
        ConditionField::Body => {
            // Fall back to the snippet when the full body wasn't fetched.
            let body = if msg.body_text.is_empty() {
                &msg.snippet
            } else {
                &msg.body_text
            };
            Some(FieldValue::Text(body.clone()))
        }
        ConditionField::Labels => Some(FieldValue::List(msg.labels.clone())),
        ConditionField::Date => Some(FieldValue::Timestamp(msg.date)),
        ConditionField::HasAttachment => Some(FieldValue::Flag(!msg.attachments.is_empty())),
        ConditionField::IsUnread => Some(FieldValue::Flag(msg.is_unread)),
        ConditionField::Category => msg
            .category
            .map(|c| FieldValue::Text(c.label().to_string())),
        ConditionField::Priority => msg
            .priority
            .map(|p| FieldValue::Text(p.label().to_string())),
    }
}

/// Evaluate one condition against a message, using the current time for
/// the age operators.
pub fn evaluate_condition(msg: &EmailMessage, condition: &RuleCondition) -> bool {
    evaluate_condition_at(msg, condition, Utc::now())
}

/// Evaluate one condition at an explicit reference time.
pub fn evaluate_condition_at(
    msg: &EmailMessage,
    condition: &RuleCondition,
    now: DateTime<Utc>,
) -> bool {
    let result = match field_value(msg, condition.field) {
        Some(value) => apply_operator(&value, condition.operator, &condition.value, now),
        None => false,
    };
    result != condition.negate
}

/// Check a message against a rule's full condition list.
///
/// A rule with zero conditions matches everything — the explicit
/// "match all" escape hatch for blanket automations.
pub fn rule_matches(msg: &EmailMessage, rule: &Rule) -> bool {
    rule_matches_at(msg, rule, Utc::now())
}

/// [`rule_matches`] at an explicit reference time.
pub fn rule_matches_at(msg: &EmailMessage, rule: &Rule, now: DateTime<Utc>) -> bool {
    if rule.conditions.is_empty() {
        return true;
    }
    if rule.match_all {
        rule.conditions
            .iter()
            .all(|c| evaluate_condition_at(msg, c, now))
    } else {
        rule.conditions
            .iter()
            .any(|c| evaluate_condition_at(msg, c, now))
    }
}

fn apply_operator(
    value: &FieldValue,
    operator: ConditionOperator,
    expected: &ConditionValue,
    now: DateTime<Utc>,
) -> bool {
    match operator {
        ConditionOperator::Equals => match (value, expected) {
            (FieldValue::Text(v), ConditionValue::Text(e)) => v.eq_ignore_ascii_case(e),
            (FieldValue::Flag(v), ConditionValue::Flag(e)) => v == e,
            _ => false,
        },
        ConditionOperator::Contains => match expected {
            ConditionValue::Text(e) => {
                let needle = e.to_lowercase();
                match value {
                    FieldValue::List(items) => items
                        .iter()
                        .any(|item| item.to_lowercase().contains(&needle)),
                    other => other.as_text().to_lowercase().contains(&needle),
                }
            }
            _ => false,
        },
        ConditionOperator::StartsWith => match expected {
            ConditionValue::Text(e) => value
                .as_text()
                .to_lowercase()
                .starts_with(&e.to_lowercase()),
            _ => false,
        },
        ConditionOperator::EndsWith => match expected {
            ConditionValue::Text(e) => {
                value.as_text().to_lowercase().ends_with(&e.to_lowercase())
            }
            _ => false,
        },
        ConditionOperator::MatchesRegex => match expected {
            ConditionValue::Text(pattern) => RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map(|re| re.is_match(&value.as_text()))
                .unwrap_or(false),
            _ => false,
        },
        ConditionOperator::OlderThan => match (value, expected) {
            (FieldValue::Timestamp(ts), ConditionValue::Duration { amount, unit }) => {
                *ts < now - time_delta(*amount, unit)
            }
            _ => false,
        },
        ConditionOperator::NewerThan => match (value, expected) {
            (FieldValue::Timestamp(ts), ConditionValue::Duration { amount, unit }) => {
                *ts > now - time_delta(*amount, unit)
            }
            _ => false,
        },
        ConditionOperator::InList => match (value, expected) {
            (FieldValue::Text(v), ConditionValue::List(items)) => items.contains(v),
            _ => false,
        },
    }
}

/// Turn an `amount` + `unit` pair into a duration. Unrecognized units
/// fall back to days.
fn time_delta(amount: i64, unit: &str) -> Duration {
    match unit {
        "minute" | "minutes" => Duration::minutes(amount),
        "hour" | "hours" => Duration::hours(amount),
        "week" | "weeks" => Duration::weeks(amount),
        _ => Duration::days(amount),
    }
}
