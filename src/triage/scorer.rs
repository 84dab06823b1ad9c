//! Priority scoring from user-defined criteria.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mail::{EmailMessage, Priority};

/// User's prioritization criteria. Singleton per user — created on first
/// setup, updated in place, cleared explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrioritizationCriteria {
    /// Sender addresses that always score high.
    #[serde(default)]
    pub vip_senders: Vec<String>,
    /// Sender domains that always score high.
    #[serde(default)]
    pub vip_domains: Vec<String>,
    /// Keywords in subject/snippet that score high.
    #[serde(default)]
    pub high_priority_keywords: Vec<String>,
    /// Mail types (newsletter, promotional, ...) that score low.
    #[serde(default)]
    pub low_priority_types: Vec<String>,
    /// Free-text rules from the setup interview. Stored only — reserved
    /// for future heuristics, not evaluated by the scorer.
    #[serde(default)]
    pub custom_rules: Vec<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Default for PrioritizationCriteria {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            vip_senders: Vec::new(),
            vip_domains: Vec::new(),
            high_priority_keywords: Vec::new(),
            low_priority_types: Vec::new(),
            custom_rules: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Scores messages against user-defined criteria.
///
/// Pure precedence cascade, first match wins — no weights, no
/// accumulation. With empty criteria everything scores Medium.
pub struct PriorityScorer {
    criteria: PrioritizationCriteria,
}

impl PriorityScorer {
    pub fn new(criteria: PrioritizationCriteria) -> Self {
        Self { criteria }
    }

    /// Score a single message.
    pub fn score(&self, msg: &EmailMessage) -> Priority {
        // VIP senders always win.
        if self.criteria.vip_senders.contains(&msg.sender_email) {
            return Priority::High;
        }

        let sender_domain = msg.sender_domain().to_lowercase();
        if self.criteria.vip_domains.contains(&sender_domain) {
            return Priority::High;
        }

        let text = format!("{} {}", msg.subject, msg.snippet).to_lowercase();
        for keyword in &self.criteria.high_priority_keywords {
            if text.contains(&keyword.to_lowercase()) {
                return Priority::High;
            }
        }

        let sender_lower = msg.sender.to_lowercase();
        for low_type in &self.criteria.low_priority_types {
            let low = low_type.to_lowercase();
            if text.contains(&low) || sender_lower.contains(&low) {
                return Priority::Low;
            }
        }

        Priority::Medium
    }

    /// Score a batch and return it sorted high-first.
    ///
    /// The sort is stable: messages with equal priority keep their
    /// relative input order.
    pub fn score_batch(&self, messages: &[EmailMessage]) -> Vec<(EmailMessage, Priority)> {
        let mut scored: Vec<(EmailMessage, Priority)> = messages
            .iter()
            .map(|msg| (msg.clone(), self.score(msg)))
            .collect();
        scored.sort_by_key(|(_, priority)| priority.rank());
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_message(id: &str, sender_email: &str, subject: &str, snippet: &str) -> EmailMessage {
        EmailMessage {
            id: id.into(),
            thread_id: format!("t-{id}"),
            subject: subject.into(),
            sender: sender_email.into(),
            sender_email: sender_email.into(),
            recipients: vec![],
            cc: vec![],
            date: Utc::now(),
            snippet: snippet.into(),
            body_text: String::new(),
            body_html: String::new(),
            labels: vec![],
            attachments: vec![],
            is_unread: true,
            is_starred: false,
            priority: None,
            category: None,
            summary: None,
            needs_reply: None,
        }
    }

    fn criteria() -> PrioritizationCriteria {
        PrioritizationCriteria {
            vip_senders: vec!["boss@corp.com".into()],
            vip_domains: vec!["bigclient.com".into()],
            high_priority_keywords: vec!["urgent".into(), "deadline".into()],
            low_priority_types: vec!["newsletter".into(), "promotional".into()],
            ..Default::default()
        }
    }

    #[test]
    fn vip_sender_scores_high() {
        let scorer = PriorityScorer::new(criteria());
        let msg = make_message("m1", "boss@corp.com", "Lunch", "");
        assert_eq!(scorer.score(&msg), Priority::High);
    }

    #[test]
    fn vip_domain_scores_high() {
        let scorer = PriorityScorer::new(criteria());
        let msg = make_message("m1", "anyone@BigClient.com", "Hello", "");
        assert_eq!(scorer.score(&msg), Priority::High);
    }

    #[test]
    fn high_keyword_is_case_insensitive() {
        let scorer = PriorityScorer::new(criteria());
        let msg = make_message("m1", "rando@x.com", "URGENT: server down", "");
        assert_eq!(scorer.score(&msg), Priority::High);
    }

    #[test]
    fn low_type_in_text_scores_low() {
        let scorer = PriorityScorer::new(criteria());
        let msg = make_message("m1", "news@x.com", "Weekly newsletter", "");
        assert_eq!(scorer.score(&msg), Priority::Low);
    }

    #[test]
    fn low_type_in_sender_name_scores_low() {
        let scorer = PriorityScorer::new(criteria());
        let mut msg = make_message("m1", "digest@x.com", "This week", "");
        msg.sender = "Acme Newsletter".into();
        assert_eq!(scorer.score(&msg), Priority::Low);
    }

    #[test]
    fn vip_beats_low_priority_keyword() {
        // Precedence: VIP checks come before the low-priority scan.
        let scorer = PriorityScorer::new(criteria());
        let msg = make_message("m1", "boss@corp.com", "Company newsletter", "");
        assert_eq!(scorer.score(&msg), Priority::High);
    }

    #[test]
    fn default_criteria_scores_medium() {
        let scorer = PriorityScorer::new(PrioritizationCriteria::default());
        let msg = make_message("m1", "anyone@x.com", "Hello", "world");
        assert_eq!(scorer.score(&msg), Priority::Medium);
    }

    #[test]
    fn score_batch_sorts_high_first_and_is_stable() {
        let scorer = PriorityScorer::new(criteria());
        let messages = vec![
            make_message("med-1", "a@x.com", "Hello", ""),
            make_message("low-1", "b@x.com", "A newsletter", ""),
            make_message("high-1", "boss@corp.com", "Review", ""),
            make_message("med-2", "c@x.com", "Hi again", ""),
            make_message("high-2", "vp@bigclient.com", "Contract", ""),
        ];

        let scored = scorer.score_batch(&messages);
        let ids: Vec<&str> = scored.iter().map(|(m, _)| m.id.as_str()).collect();

        // High first, then medium, then low; ties keep input order.
        assert_eq!(ids, vec!["high-1", "high-2", "med-1", "med-2", "low-1"]);
    }

    #[test]
    fn custom_rules_are_not_evaluated() {
        let mut c = PrioritizationCriteria::default();
        c.custom_rules = vec!["anything from the intern is low".into()];
        let scorer = PriorityScorer::new(c);
        let msg = make_message("m1", "intern@corp.com", "Status", "");
        assert_eq!(scorer.score(&msg), Priority::Medium);
    }
}
