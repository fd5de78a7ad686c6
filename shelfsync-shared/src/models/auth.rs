use serde::{Deserialize, Serialize};

/// Credentials submitted to `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    /// Account name.
    pub username: String,
    /// Plain-text password; only ever sent over the authenticated channel.
    pub password: String,
}

/// First-run account creation submitted to `POST /api/auth/onboard`.
///
/// The server accepts this only while no account exists yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OnboardRequest {
    /// Name of the initial admin account.
    pub username: String,
    /// Password for the initial admin account.
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_request_serializes_both_fields() {
        let request = LoginRequest {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["username"], "admin");
        assert_eq!(json["password"], "hunter2");
    }

    #[test]
    fn onboard_request_round_trips() {
        let request = OnboardRequest {
            username: "admin".to_string(),
            password: "initial".to_string(),
        };
        let json = serde_json::to_string(&request).expect("serialize");
        let back: OnboardRequest = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, request);
    }
}
