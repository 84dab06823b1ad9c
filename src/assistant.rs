//! The automation surface — the only entry points surrounding tooling calls.
//!
//! An [`Assistant`] is built from two injected collaborators: the mail
//! provider and the rule/criteria store. It holds no other state, so one
//! instance per process or per request both work.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::Result;
use crate::mail::{Category, EmailMessage, MailService, Priority};
use crate::rules::engine::{ExecutionReport, RuleEngine};
use crate::rules::model::Rule;
use crate::rules::parser::RuleParser;
use crate::store::RuleStore;
use crate::triage::categorizer::categorize;
use crate::triage::scorer::{PrioritizationCriteria, PriorityScorer};

pub struct Assistant {
    mail: Arc<dyn MailService>,
    store: Arc<dyn RuleStore>,
    engine: RuleEngine,
    parser: RuleParser,
}

impl Assistant {
    pub fn new(mail: Arc<dyn MailService>, store: Arc<dyn RuleStore>) -> Self {
        let engine = RuleEngine::new(mail.clone());
        Self {
            mail,
            store,
            engine,
            parser: RuleParser::new(),
        }
    }

    /// Fetch messages from the provider.
    pub async fn fetch_messages(
        &self,
        query: &str,
        max_results: u32,
        unread_only: bool,
    ) -> Result<Vec<EmailMessage>> {
        Ok(self.mail.list_messages(query, max_results, unread_only).await?)
    }

    /// Parse a free-text rule description. `None` when no action keyword
    /// was recognized.
    pub fn parse_rule(&self, text: &str) -> Option<Rule> {
        self.parser.parse(text)
    }

    /// Parse a free-text rule and persist it. `Ok(None)` when the text
    /// has no recognizable action.
    pub async fn create_rule(&self, text: &str) -> Result<Option<Rule>> {
        let Some(mut rule) = self.parser.parse(text) else {
            return Ok(None);
        };
        let id = self.store.save_rule(&rule).await?;
        rule.id = Some(id);
        info!(rule = %rule.name, id, "Rule created from text");
        Ok(Some(rule))
    }

    /// Execute a given rule set against a message batch.
    pub async fn execute_rules(
        &self,
        rules: &[Rule],
        messages: &[EmailMessage],
        dry_run: bool,
    ) -> ExecutionReport {
        self.engine.execute_rules(rules, messages, dry_run).await
    }

    /// Load the enabled rules from the store and execute them.
    pub async fn run_rules(
        &self,
        messages: &[EmailMessage],
        dry_run: bool,
    ) -> Result<ExecutionReport> {
        let rules = self.store.load_rules(true).await?;
        debug!(rules = rules.len(), messages = messages.len(), dry_run, "Executing rule pass");
        Ok(self.engine.execute_rules(&rules, messages, dry_run).await)
    }

    /// Score a batch against the stored criteria (defaults when none were
    /// saved), sorted high-first.
    pub async fn score(&self, messages: &[EmailMessage]) -> Result<Vec<(EmailMessage, Priority)>> {
        let criteria = self.store.load_criteria().await?.unwrap_or_default();
        let scorer = PriorityScorer::new(criteria);
        Ok(scorer.score_batch(messages))
    }

    /// Categorize a single message.
    pub fn categorize(&self, msg: &EmailMessage) -> Category {
        categorize(msg)
    }

    /// Full triage pass: score and categorize every message, attach the
    /// annotations, and return the batch sorted by priority.
    pub async fn triage(&self, messages: &[EmailMessage]) -> Result<Vec<EmailMessage>> {
        let scored = self.score(messages).await?;
        Ok(scored
            .into_iter()
            .map(|(msg, priority)| {
                let category = categorize(&msg);
                msg.with_triage(priority, category)
            })
            .collect())
    }
}
