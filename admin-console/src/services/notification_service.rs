// Notification service - publish/subscribe channel for transient banners
use std::sync::Arc;

use chrono::{Duration, Utc};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::{ActiveNotification, Intent, Notification};

/// Fans dispatched notifications out to subscribers and keeps the ones that
/// have not yet passed their removal hint.
#[derive(Clone)]
pub struct MessageService {
    sender: broadcast::Sender<ActiveNotification>,
    active: Arc<Mutex<Vec<ActiveNotification>>>,
}

impl MessageService {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            active: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fire-and-forget; a dispatch with no subscribers is not an error
    pub fn dispatch(&self, notification: Notification) -> Uuid {
        match notification.message.intent {
            Intent::Error => tracing::warn!(title = %notification.message.title, "notification dispatched"),
            _ => tracing::debug!(title = %notification.message.title, "notification dispatched"),
        }

        let dispatched_at = Utc::now();
        let active = ActiveNotification {
            id: Uuid::new_v4(),
            expires_at: dispatched_at
                + Duration::seconds(notification.remove_after_seconds as i64),
            dispatched_at,
            notification,
        };
        let id = active.id;

        {
            let mut current = self.active.lock();
            current.retain(|n| n.expires_at > dispatched_at);
            current.push(active.clone());
        }
        let _ = self.sender.send(active);
        id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ActiveNotification> {
        self.sender.subscribe()
    }

    /// Notifications still within their removal hint, oldest first
    pub fn active(&self) -> Vec<ActiveNotification> {
        let now = Utc::now();
        let mut active = self.active.lock();
        active.retain(|n| n.expires_at > now);
        active.clone()
    }

    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut active = self.active.lock();
        let before = active.len();
        active.retain(|n| n.id != id);
        active.len() != before
    }
}
