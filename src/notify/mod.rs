//! Outbound email, delegated to a transactional-email provider.

pub mod outbox;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use outbox::Outbox;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

/// Provider response. Failures are reported here, never raised.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EmailOutcome {
    pub fn sent(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

pub trait EmailSender: Send + Sync {
    fn send(&self, message: EmailMessage) -> BoxFuture<'_, EmailOutcome>;
}
