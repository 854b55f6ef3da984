use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::{Notification, NotificationKind};

/// Append-only per-user event log. The read flag is the only field that ever
/// changes after a notification is written.
#[derive(Debug, Default)]
pub struct NotificationFeed {
    notifications: RwLock<Vec<Notification>>,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(
        &self,
        user_id: &str,
        title: &str,
        message: &str,
        kind: NotificationKind,
        class_id: Option<&str>,
    ) -> Notification {
        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            message: message.to_string(),
            kind,
            class_id: class_id.map(str::to_string),
            read: false,
            created_at: Utc::now(),
        };
        self.notifications.write().push(notification.clone());
        notification
    }

    /// The user's feed, newest first.
    pub fn list_for_user(&self, user_id: &str) -> Vec<Notification> {
        let mut entries: Vec<Notification> = self
            .notifications
            .read()
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries
    }

    pub fn mark_read(&self, id: &str, user_id: &str) -> Result<Notification, CoreError> {
        let mut notifications = self.notifications.write();
        let notification = notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
            .ok_or_else(|| CoreError::NotFound("Notification not found".into()))?;
        notification.read = true;
        Ok(notification.clone())
    }

    /// Whether a class-start reminder for this (user, class) was written at or
    /// after `since`. The scanner's dedup query.
    pub fn has_recent_class_start(
        &self,
        user_id: &str,
        class_id: &str,
        since: DateTime<Utc>,
    ) -> bool {
        self.notifications.read().iter().any(|n| {
            n.user_id == user_id
                && n.kind == NotificationKind::ClassStart
                && n.class_id.as_deref() == Some(class_id)
                && n.created_at >= since
        })
    }
}
