//! Request and response models exchanged between the Shelfsync server and
//! its web client.

pub mod api_key;
pub mod auth;
pub mod config;
pub mod logs;
pub mod notification;
pub mod update;

pub use api_key::ApiKey;
pub use auth::{LoginRequest, OnboardRequest};
pub use config::{Config, ConfigUpdate, LogLevel};
pub use logs::{LogFile, LogFilesResponse};
pub use notification::{Notification, NotificationEvent, NotificationType};
pub use update::Release;
