//! In-app notification record.

use serde::{Deserialize, Serialize};

/// One row of the notification feed.
///
/// Generated each time the feed is opened; `is_read` changes only locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationItem {
    pub id: String,
    pub icon: String,
    pub title: String,
    pub message: String,
    /// Display label such as `09:30 AM` or `Yesterday`.
    pub time: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    #[serde(default)]
    pub is_read: bool,
}

impl NotificationItem {
    pub fn marked_read(&self) -> Self {
        Self {
            is_read: true,
            ..self.clone()
        }
    }
}
