use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A published release, as surfaced by `GET /api/updates/latest`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Release {
    pub tag_name: String,
    pub html_url: String,
    #[serde(default)]
    pub name: String,
    pub published_at: DateTime<Utc>,
}
