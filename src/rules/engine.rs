//! Rule execution engine — matching, action dispatch, execution report.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::MailError;
use crate::mail::{EmailMessage, MailService};
use crate::rules::eval::rule_matches;
use crate::rules::model::{ActionKind, Rule, RuleAction};

/// Outcome of one action against one message.
///
/// The three states are deliberately distinct: a dry run is neither a
/// success nor a failure, and a failure carries the error kind instead
/// of collapsing to a boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActionStatus {
    /// Dry-run mode: no provider call was made.
    WouldExecute,
    Succeeded,
    Failed { error: MailError },
}

/// One dispatched (or simulated) action in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub action: ActionKind,
    #[serde(flatten)]
    pub status: ActionStatus,
}

/// Per-message entry in the execution report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleMatch {
    pub message_id: String,
    pub subject: String,
    /// Action outcomes in the rule's declared order.
    pub actions: Vec<ActionOutcome>,
}

/// Rule name → matched messages. Rules that matched nothing have no entry.
pub type ExecutionReport = BTreeMap<String, Vec<RuleMatch>>;

/// Executes automation rules against message batches.
///
/// Holds only the injected mail collaborator — no state survives between
/// passes, so one engine can be reused or rebuilt freely.
pub struct RuleEngine {
    mail: Arc<dyn MailService>,
}

impl RuleEngine {
    pub fn new(mail: Arc<dyn MailService>) -> Self {
        Self { mail }
    }

    /// Execute one rule against a batch of messages.
    ///
    /// Returns an entry per matched message with every action's outcome.
    /// Action failures are recorded and do not stop later actions or
    /// later messages.
    pub async fn execute_rule(
        &self,
        rule: &Rule,
        messages: &[EmailMessage],
        dry_run: bool,
    ) -> Vec<RuleMatch> {
        let mut results = Vec::new();

        for msg in messages {
            if !rule_matches(msg, rule) {
                continue;
            }
            debug!(rule = %rule.name, message_id = %msg.id, "Rule matched message");

            let mut actions = Vec::with_capacity(rule.actions.len());
            for action in &rule.actions {
                actions.push(self.apply_action(msg, action, dry_run).await);
            }

            results.push(RuleMatch {
                message_id: msg.id.clone(),
                subject: msg.subject.clone(),
                actions,
            });
        }

        results
    }

    /// Execute a rule set against a batch of messages.
    ///
    /// Disabled rules are skipped; rules with zero matches contribute no
    /// entry (absence signals "no matches" at the rule-name level).
    pub async fn execute_rules(
        &self,
        rules: &[Rule],
        messages: &[EmailMessage],
        dry_run: bool,
    ) -> ExecutionReport {
        let mut report = ExecutionReport::new();

        for rule in rules {
            if !rule.enabled {
                debug!(rule = %rule.name, "Skipping disabled rule");
                continue;
            }
            let results = self.execute_rule(rule, messages, dry_run).await;
            if !results.is_empty() {
                report.insert(rule.name.clone(), results);
            }
        }

        report
    }

    /// Dispatch (or simulate) one action against one message.
    pub async fn apply_action(
        &self,
        msg: &EmailMessage,
        action: &RuleAction,
        dry_run: bool,
    ) -> ActionOutcome {
        if dry_run {
            return ActionOutcome {
                action: action.kind,
                status: ActionStatus::WouldExecute,
            };
        }

        let id = msg.id.as_str();
        let result = match action.kind {
            ActionKind::Archive => self.mail.archive(id).await,
            ActionKind::Trash => self.mail.trash(id).await,
            ActionKind::Delete => self.mail.delete(id).await,
            ActionKind::AddLabel => {
                self.mail
                    .modify_labels(id, &[action.label_param().to_string()], &[])
                    .await
            }
            ActionKind::RemoveLabel => {
                self.mail
                    .modify_labels(id, &[], &[action.label_param().to_string()])
                    .await
            }
            ActionKind::MarkRead => self.mail.mark_read(id).await,
            ActionKind::MarkUnread => self.mail.mark_unread(id).await,
            ActionKind::Star => self.mail.star(id).await,
            ActionKind::Unstar => self.mail.unstar(id).await,
            // No dispatch path exists for forwarding; report it rather
            // than silently dropping the action.
            ActionKind::Forward => Err(MailError::Unsupported {
                operation: "forward".into(),
            }),
        };

        let status = match result {
            Ok(()) => ActionStatus::Succeeded,
            Err(error) => {
                warn!(
                    message_id = %msg.id,
                    action = action.kind.label(),
                    %error,
                    "Action failed"
                );
                ActionStatus::Failed { error }
            }
        };

        ActionOutcome {
            action: action.kind,
            status,
        }
    }
}
