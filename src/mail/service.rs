//! Mail provider collaborator trait — pure I/O, no decision logic.

use async_trait::async_trait;

use crate::error::MailError;
use crate::mail::model::EmailMessage;

/// Well-known provider labels used by the convenience operations.
pub const LABEL_INBOX: &str = "INBOX";
pub const LABEL_UNREAD: &str = "UNREAD";
pub const LABEL_STARRED: &str = "STARRED";

/// Mail provider collaborator.
///
/// This is the only mutator of provider-side state. Implementations wrap the
/// actual transport (API client, IMAP session, test fake); the rule engine
/// and triage code never talk to the network directly.
///
/// Any call may fail with a [`MailError`] carrying the failure kind. Callers
/// in the engine record failures per action and keep going — a mail error
/// never aborts a batch.
#[async_trait]
pub trait MailService: Send + Sync {
    /// Fetch messages matching a provider query.
    async fn list_messages(
        &self,
        query: &str,
        max_results: u32,
        unread_only: bool,
    ) -> Result<Vec<EmailMessage>, MailError>;

    /// Fetch a single message by ID. `Ok(None)` when the message is gone.
    async fn get_message(&self, id: &str) -> Result<Option<EmailMessage>, MailError>;

    /// Add and/or remove labels on a message.
    async fn modify_labels(
        &self,
        id: &str,
        add: &[String],
        remove: &[String],
    ) -> Result<(), MailError>;

    /// Move a message to trash.
    async fn trash(&self, id: &str) -> Result<(), MailError>;

    /// Permanently delete a message.
    async fn delete(&self, id: &str) -> Result<(), MailError>;

    // ── Label-based convenience operations ──────────────────────────
    //
    // These mirror the provider's own semantics: archive/read/star state
    // is all label membership underneath.

    /// Archive a message (remove the INBOX label).
    async fn archive(&self, id: &str) -> Result<(), MailError> {
        self.modify_labels(id, &[], &[LABEL_INBOX.to_string()]).await
    }

    /// Mark a message as read (remove the UNREAD label).
    async fn mark_read(&self, id: &str) -> Result<(), MailError> {
        self.modify_labels(id, &[], &[LABEL_UNREAD.to_string()]).await
    }

    /// Mark a message as unread.
    async fn mark_unread(&self, id: &str) -> Result<(), MailError> {
        self.modify_labels(id, &[LABEL_UNREAD.to_string()], &[]).await
    }

    /// Star a message.
    async fn star(&self, id: &str) -> Result<(), MailError> {
        self.modify_labels(id, &[LABEL_STARRED.to_string()], &[]).await
    }

    /// Remove the star from a message.
    async fn unstar(&self, id: &str) -> Result<(), MailError> {
        self.modify_labels(id, &[], &[LABEL_STARRED.to_string()]).await
    }
}
