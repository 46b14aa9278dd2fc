// Notification models - transient banners surfaced by the console
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Success,
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub intent: Intent,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// A message plus the hint for how long it stays visible
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: Message,
    pub remove_after_seconds: u64,
}

impl Notification {
    pub fn new(intent: Intent, title: impl Into<String>, remove_after_seconds: u64) -> Self {
        Self {
            message: Message {
                intent,
                title: title.into(),
                content: None,
            },
            remove_after_seconds,
        }
    }

    pub fn success(title: impl Into<String>, remove_after_seconds: u64) -> Self {
        Self::new(Intent::Success, title, remove_after_seconds)
    }

    pub fn error(title: impl Into<String>, remove_after_seconds: u64) -> Self {
        Self::new(Intent::Error, title, remove_after_seconds)
    }

    pub fn warning(title: impl Into<String>, remove_after_seconds: u64) -> Self {
        Self::new(Intent::Warning, title, remove_after_seconds)
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.message.content = Some(content.into());
        self
    }
}

/// A dispatched notification that has not been removed yet
#[derive(Debug, Clone, Serialize)]
pub struct ActiveNotification {
    pub id: Uuid,
    #[serde(flatten)]
    pub notification: Notification,
    pub dispatched_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
