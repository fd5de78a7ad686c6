use serde::{Deserialize, Serialize};

/// Delivery transport for a notification target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationType {
    Discord,
    Telegram,
    Notifiarr,
    Ntfy,
}

/// Server events a notification target can subscribe to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationEvent {
    SyncStarted,
    SyncSuccess,
    SyncError,
    AppUpdateAvailable,
}

/// A configured notification target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    #[serde(default)]
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub enabled: bool,
    #[serde(default)]
    pub events: Vec<NotificationEvent>,
    /// Webhook endpoint, for transports that post to a URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook: Option<String>,
    /// Bot or API token, for transports that need one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Chat/channel/topic identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}
