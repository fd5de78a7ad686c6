use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An API key granting scoped access to the sync endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiKey {
    /// Human-readable label chosen at creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The opaque key value; generated by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Endpoint scopes this key is valid for.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_are_omitted() {
        let key = ApiKey {
            name: Some("tablet".to_string()),
            key: None,
            scopes: Vec::new(),
            created_at: None,
        };
        let json = serde_json::to_string(&key).expect("serialize");
        assert_eq!(json, r#"{"name":"tablet"}"#);
    }

    #[test]
    fn deserializes_server_payload() {
        let json = r#"{"name":"phone","key":"abc123","scopes":["sync"]}"#;
        let key: ApiKey = serde_json::from_str(json).expect("deserialize");
        assert_eq!(key.name.as_deref(), Some("phone"));
        assert_eq!(key.scopes, vec!["sync".to_string()]);
        assert!(key.created_at.is_none());
    }
}
