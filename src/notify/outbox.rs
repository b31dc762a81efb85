use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::notify::{EmailMessage, EmailOutcome, EmailSender};

/// Keeps every accepted message in memory instead of handing it to a provider.
#[derive(Debug, Default)]
pub struct Outbox {
    sent: Mutex<Vec<EmailMessage>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().await.clone()
    }
}

impl EmailSender for Outbox {
    fn send(&self, message: EmailMessage) -> BoxFuture<'_, EmailOutcome> {
        async move {
            if message.to.trim().is_empty() {
                warn!(subject = %message.subject, "email has no recipient");
                return EmailOutcome::failed("recipient is required");
            }

            let id = Uuid::new_v4();
            info!(email_id = %id, to = %message.to, subject = %message.subject, "email queued");
            self.sent.lock().await.push(message);

            EmailOutcome::sent(json!({ "id": id }))
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::Outbox;
    use crate::notify::{EmailMessage, EmailSender};

    fn message(to: &str) -> EmailMessage {
        EmailMessage {
            to: to.to_string(),
            subject: "Welcome aboard".to_string(),
            text: "You're approved.".to_string(),
            html: None,
        }
    }

    #[tokio::test]
    async fn accepted_message_is_recorded() {
        let outbox = Outbox::new();
        let outcome = outbox.send(message("rider@example.com")).await;

        assert!(outcome.success);
        assert!(outcome.data.unwrap()["id"].is_string());
        assert_eq!(outbox.sent().await, vec![message("rider@example.com")]);
    }

    #[tokio::test]
    async fn blank_recipient_fails_without_recording() {
        let outbox = Outbox::new();
        let outcome = outbox.send(message(" ")).await;

        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("recipient is required"));
        assert!(outbox.sent().await.is_empty());
    }
}
