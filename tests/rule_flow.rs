//! Integration test for the full rule flow: parse free text, persist the
//! rule, reload it, and execute it against a message batch through a fake
//! mail provider.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use mail_assist::assistant::Assistant;
use mail_assist::error::MailError;
use mail_assist::mail::{EmailMessage, MailService};
use mail_assist::rules::ActionStatus;
use mail_assist::store::LibSqlStore;

/// Fake provider that records every mutating call.
#[derive(Default)]
struct FakeMail {
    calls: Mutex<Vec<String>>,
}

impl FakeMail {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailService for FakeMail {
    async fn list_messages(
        &self,
        _query: &str,
        _max_results: u32,
        _unread_only: bool,
    ) -> Result<Vec<EmailMessage>, MailError> {
        Ok(Vec::new())
    }

    async fn get_message(&self, _id: &str) -> Result<Option<EmailMessage>, MailError> {
        Ok(None)
    }

    async fn modify_labels(
        &self,
        id: &str,
        add: &[String],
        remove: &[String],
    ) -> Result<(), MailError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("modify_labels({id}, +{add:?}, -{remove:?})"));
        Ok(())
    }

    async fn trash(&self, id: &str) -> Result<(), MailError> {
        self.calls.lock().unwrap().push(format!("trash({id})"));
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), MailError> {
        self.calls.lock().unwrap().push(format!("delete({id})"));
        Ok(())
    }
}

fn make_message(id: &str, sender_email: &str, subject: &str, age_days: i64) -> EmailMessage {
    EmailMessage {
        id: id.into(),
        thread_id: format!("t-{id}"),
        subject: subject.into(),
        sender: sender_email.into(),
        sender_email: sender_email.into(),
        recipients: vec!["me@example.com".into()],
        cc: vec![],
        date: Utc::now() - Duration::days(age_days),
        snippet: String::new(),
        body_text: String::new(),
        body_html: String::new(),
        labels: vec!["INBOX".into()],
        attachments: vec![],
        is_unread: true,
        is_starred: false,
        priority: None,
        category: None,
        summary: None,
        needs_reply: None,
    }
}

async fn make_assistant() -> (Assistant, Arc<FakeMail>) {
    let mail = Arc::new(FakeMail::default());
    let store = Arc::new(LibSqlStore::new_memory().await.unwrap());
    (Assistant::new(mail.clone(), store), mail)
}

#[tokio::test]
async fn parse_persist_reload_execute() {
    let (assistant, mail) = make_assistant().await;

    // Create a rule from free text — it lands in the store.
    let rule = assistant
        .create_rule("archive newsletters older than 7 days")
        .await
        .unwrap()
        .expect("rule should parse");
    assert!(rule.id.is_some());

    // Triage so messages carry a category, then run the persisted rules.
    let messages = vec![
        make_message("old-news", "digest@weekly.com", "The Weekly Digest", 10),
        make_message("new-news", "digest@weekly.com", "The Weekly Digest", 2),
        make_message("work", "alice@corp.com", "Standup notes", 10),
    ];
    let triaged = assistant.triage(&messages).await.unwrap();

    let report = assistant.run_rules(&triaged, false).await.unwrap();

    // Only the old newsletter matches: the fresh one fails the age
    // condition, the work mail fails the category condition.
    let matches = report.values().next().unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].message_id, "old-news");
    assert_eq!(matches[0].actions[0].status, ActionStatus::Succeeded);

    let calls = mail.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].contains("old-news"));
    assert!(calls[0].contains("INBOX"));
}

#[tokio::test]
async fn dry_run_flow_touches_nothing() {
    let (assistant, mail) = make_assistant().await;

    assistant
        .create_rule("trash promotions")
        .await
        .unwrap()
        .expect("rule should parse");

    let messages = vec![make_message(
        "promo",
        "deals@shop.com",
        "Huge discount inside",
        1,
    )];
    let triaged = assistant.triage(&messages).await.unwrap();
    let report = assistant.run_rules(&triaged, true).await.unwrap();

    let matches = report.values().next().unwrap();
    assert_eq!(matches[0].actions[0].status, ActionStatus::WouldExecute);
    assert!(mail.calls().is_empty());
}

#[tokio::test]
async fn report_serializes_for_the_caller() {
    let (assistant, _mail) = make_assistant().await;

    assistant
        .create_rule("star mail from boss@corp.com")
        .await
        .unwrap()
        .expect("rule should parse");

    let messages = vec![make_message("m1", "boss@corp.com", "Review please", 0)];
    let report = assistant.run_rules(&messages, true).await.unwrap();

    let json = serde_json::to_value(&report).unwrap();
    let entry = json.as_object().unwrap().values().next().unwrap();
    assert_eq!(entry[0]["message_id"], "m1");
    assert_eq!(entry[0]["actions"][0]["status"], "would_execute");
}
