//! Natural-language rule parsing — keyword/regex cascade, no model.
//!
//! Turns free text like "archive newsletters older than 7 days" into a
//! structured [`Rule`]. Deterministic and order-sensitive: the first
//! matching entry in each table wins, and every detected condition is
//! combined with AND semantics.

use regex::Regex;
use tracing::debug;

use crate::rules::model::{
    ActionKind, ConditionField, ConditionOperator, ConditionValue, Rule, RuleAction,
    RuleCondition,
};

/// Action keyword table, checked in order. First match wins.
const ACTION_KEYWORDS: &[(&str, ActionKind)] = &[
    ("archive", ActionKind::Archive),
    ("trash", ActionKind::Trash),
    ("delete", ActionKind::Delete),
    ("mark as read", ActionKind::MarkRead),
    ("mark read", ActionKind::MarkRead),
    ("star", ActionKind::Star),
    ("label", ActionKind::AddLabel),
];

/// Category keyword table, checked in order. At most one category
/// condition is emitted.
const CATEGORY_KEYWORDS: &[(&str, &str)] = &[
    ("newsletter", "newsletter"),
    ("newsletters", "newsletter"),
    ("promotional", "promotional"),
    ("promo", "promotional"),
    ("promotions", "promotional"),
    ("social", "social"),
    ("updates", "newsletter"),
];

/// Time expression patterns paired with the unit they capture.
const TIME_PATTERNS: &[(&str, &str)] = &[
    (r"(\d+)\s*days?\s*old", "days"),
    (r"(\d+)\s*weeks?\s*old", "weeks"),
    (r"(\d+)\s*hours?\s*old", "hours"),
    (r"older\s*than\s*(\d+)\s*days?", "days"),
    (r"older\s*than\s*(\d+)\s*weeks?", "weeks"),
];

/// Parses free-text rule descriptions into structured [`Rule`]s.
pub struct RuleParser {
    time_patterns: Vec<(Regex, &'static str)>,
    label_pattern: Regex,
    sender_pattern: Regex,
}

impl Default for RuleParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleParser {
    pub fn new() -> Self {
        let time_patterns = TIME_PATTERNS
            .iter()
            .map(|(pattern, unit)| (Regex::new(pattern).unwrap(), *unit))
            .collect();
        Self {
            time_patterns,
            label_pattern: Regex::new(r#"label\s+["']?(\w+)["']?"#).unwrap(),
            sender_pattern: Regex::new(r"from\s+(\S+@\S+)").unwrap(),
        }
    }

    /// Parse a rule description. Returns `None` when no action keyword is
    /// found — a rule without an action has no effect and is rejected.
    pub fn parse(&self, text: &str) -> Option<Rule> {
        let lower = text.to_lowercase();
        let lower = lower.trim();

        let Some(action) = self.parse_action(lower) else {
            debug!(input = text, "No action keyword found in rule text");
            return None;
        };

        let mut conditions = Vec::new();
        if let Some(category) = self.parse_category(lower) {
            conditions.push(category);
        }
        if let Some(age) = self.parse_time_condition(lower) {
            conditions.push(age);
        }
        if let Some(sender) = self.parse_sender_condition(lower) {
            conditions.push(sender);
        }

        let mut rule = Rule::new(generate_name(text));
        rule.description = text.to_string();
        rule.natural_language = Some(text.to_string());
        rule.conditions = conditions;
        rule.actions = vec![action];
        Some(rule)
    }

    fn parse_action(&self, text: &str) -> Option<RuleAction> {
        for (keyword, kind) in ACTION_KEYWORDS {
            if !text.contains(keyword) {
                continue;
            }
            let mut action = RuleAction::new(*kind);
            if *kind == ActionKind::AddLabel
                && let Some(caps) = self.label_pattern.captures(text)
            {
                action = action.with_param("label", &caps[1]);
            }
            return Some(action);
        }
        None
    }

    fn parse_category(&self, text: &str) -> Option<RuleCondition> {
        for (keyword, category) in CATEGORY_KEYWORDS {
            if text.contains(keyword) {
                return Some(RuleCondition::new(
                    ConditionField::Category,
                    ConditionOperator::Equals,
                    ConditionValue::text(*category),
                ));
            }
        }
        None
    }

    fn parse_time_condition(&self, text: &str) -> Option<RuleCondition> {
        for (pattern, unit) in &self.time_patterns {
            if let Some(caps) = pattern.captures(text) {
                let amount: i64 = caps[1].parse().ok()?;
                return Some(RuleCondition::new(
                    ConditionField::Date,
                    ConditionOperator::OlderThan,
                    ConditionValue::duration(amount, *unit),
                ));
            }
        }
        None
    }

    fn parse_sender_condition(&self, text: &str) -> Option<RuleCondition> {
        let caps = self.sender_pattern.captures(text)?;
        let token = &caps[1];
        if let Some(domain) = token.strip_prefix('@') {
            Some(RuleCondition::new(
                ConditionField::SenderDomain,
                ConditionOperator::Equals,
                ConditionValue::text(domain),
            ))
        } else {
            Some(RuleCondition::new(
                ConditionField::Sender,
                ConditionOperator::Equals,
                ConditionValue::text(token),
            ))
        }
    }
}

/// Short rule name from the original text: first 50 chars (with an
/// ellipsis when truncated), first character upper-cased.
fn generate_name(text: &str) -> String {
    let truncated: String = text.chars().take(50).collect();
    let mut name = truncated.trim().to_string();
    if text.chars().count() > 50 {
        name.push_str("...");
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => name,
    }
}
