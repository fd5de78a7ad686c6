use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for one rotated log file on the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogFile {
    pub filename: String,
    pub size_bytes: u64,
    pub updated_at: DateTime<Utc>,
}

/// Response of `GET /api/logs/files`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogFilesResponse {
    #[serde(default)]
    pub files: Vec<LogFile>,
    pub count: usize,
}
