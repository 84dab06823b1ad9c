//! Mail data model — message snapshot, attachments, triage levels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Triage priority level. `rank()` orders High < Medium < Low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort rank — high priority sorts first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    /// Short label for logging and display.
    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// Coarse message category assigned by the categorizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Newsletter,
    Promotional,
    Social,
    Transactional,
    Other,
}

impl Category {
    /// Short label for logging and display.
    pub fn label(self) -> &'static str {
        match self {
            Category::Newsletter => "newsletter",
            Category::Promotional => "promotional",
            Category::Social => "social",
            Category::Transactional => "transactional",
            Category::Other => "other",
        }
    }
}

/// Attachment metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub filename: String,
    pub mime_type: String,
    /// Size in bytes.
    pub size: u64,
}

/// One mail message and its metadata, as fetched from the provider.
///
/// Immutable snapshot — provider-side state (labels, trash, deletion) is
/// only ever changed through the [`MailService`](crate::mail::MailService)
/// collaborator. The single exception is triage annotation, which attaches
/// the optional `priority`/`category`/`summary`/`needs_reply` fields after
/// scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    /// Provider-native message ID.
    pub id: String,
    /// Provider-native thread ID.
    pub thread_id: String,
    #[serde(default)]
    pub subject: String,
    /// Sender display name (falls back to the address when absent).
    #[serde(default)]
    pub sender: String,
    /// Sender email address.
    #[serde(default)]
    pub sender_email: String,
    /// To recipients, in header order (may repeat).
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<String>,
    /// When the message was received.
    pub date: DateTime<Utc>,
    /// Short preview text supplied by the provider.
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub body_text: String,
    #[serde(default)]
    pub body_html: String,
    /// Provider labels. Set semantics — order carries no meaning.
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub is_unread: bool,
    #[serde(default)]
    pub is_starred: bool,

    // Triage fields — populated by the scorer/categorizer, never by the
    // provider fetch path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub needs_reply: Option<bool>,
}

impl EmailMessage {
    /// Domain part of the sender address (suffix after `@`).
    ///
    /// Returns an empty string when the address has no `@`.
    pub fn sender_domain(&self) -> &str {
        match self.sender_email.rsplit_once('@') {
            Some((_, domain)) => domain,
            None => "",
        }
    }

    /// Attach triage annotations, consuming the snapshot.
    pub fn with_triage(mut self, priority: Priority, category: Category) -> Self {
        self.priority = Some(priority);
        self.category = Some(category);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_message() -> EmailMessage {
        EmailMessage {
            id: "m1".into(),
            thread_id: "t1".into(),
            subject: "Hello".into(),
            sender: "Alice".into(),
            sender_email: "alice@example.com".into(),
            recipients: vec!["me@example.com".into()],
            cc: vec![],
            date: Utc::now(),
            snippet: "Hello there".into(),
            body_text: "Hello there, long form.".into(),
            body_html: String::new(),
            labels: vec!["INBOX".into(), "UNREAD".into()],
            attachments: vec![],
            is_unread: true,
            is_starred: false,
            priority: None,
            category: None,
            summary: None,
            needs_reply: None,
        }
    }

    #[test]
    fn sender_domain_extraction() {
        let msg = make_message();
        assert_eq!(msg.sender_domain(), "example.com");
    }

    #[test]
    fn sender_domain_missing_at() {
        let mut msg = make_message();
        msg.sender_email = "not-an-address".into();
        assert_eq!(msg.sender_domain(), "");
    }

    #[test]
    fn priority_rank_ordering() {
        assert!(Priority::High.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
    }

    #[test]
    fn with_triage_attaches_annotations() {
        let msg = make_message().with_triage(Priority::High, Category::Newsletter);
        assert_eq!(msg.priority, Some(Priority::High));
        assert_eq!(msg.category, Some(Category::Newsletter));
        assert!(msg.summary.is_none());
    }

    #[test]
    fn message_serde_roundtrip() {
        let msg = make_message();
        let json = serde_json::to_string(&msg).unwrap();
        let parsed: EmailMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, "m1");
        assert_eq!(parsed.recipients, vec!["me@example.com"]);
        assert!(parsed.is_unread);
    }

    #[test]
    fn empty_optional_fields_omitted() {
        let msg = make_message();
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("\"cc\""));
        assert!(!json.contains("\"priority\""));
        assert!(!json.contains("\"attachments\""));
    }

    #[test]
    fn category_labels() {
        assert_eq!(Category::Transactional.label(), "transactional");
        assert_eq!(Category::Other.label(), "other");
    }
}
