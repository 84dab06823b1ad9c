//! Mail domain — message model and the provider collaborator trait.

pub mod model;
pub mod service;

pub use model::{Attachment, Category, EmailMessage, Priority};
pub use service::{MailService, LABEL_INBOX, LABEL_STARRED, LABEL_UNREAD};
