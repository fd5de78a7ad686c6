//! HTTP gateway to the Shelfsync backend.
//!
//! Every backend call funnels through [`ShelfsyncClient::request`] (or its
//! body-less sibling) and resolves to exactly one [`RequestOutcome`] or
//! fails exactly once with an [`ApiError`]. An unauthorized response is the
//! only outcome with a global side effect: the registered expiry observer
//! runs before the call resolves, so the session is already cleared and
//! the login redirect already requested when the caller sees `Unauthorized`.

use once_cell::unsync::OnceCell;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::models::{
    ApiKey, Config, ConfigUpdate, LogFilesResponse, LoginRequest, Notification, OnboardRequest,
    Release,
};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;
use yew::Callback;

const DEFAULT_BASE_URL: &str = "/api";

thread_local! {
    static SHARED_CLIENT: OnceCell<ShelfsyncClient> = OnceCell::new();
}

/// Discriminated result of a single backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome<T> {
    /// 2xx with a parsed body.
    Success(T),
    /// 204; the body is never read.
    NoContent,
    /// 401; the session has already been cleared when the caller sees
    /// this. Terminal for the call, the result must not be reused.
    Unauthorized,
    /// Any other non-success status, carrying the raw response body.
    RequestFailed(String),
}

/// Failures that prevent a call from producing an outcome.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level failure before a response was obtained.
    #[error("transport failure: {0}")]
    Transport(reqwest::Error),
    /// A success response whose body did not parse.
    #[error("failed to decode response body: {0}")]
    Decode(reqwest::Error),
    /// A request payload that did not serialize.
    #[error("failed to encode request body: {0}")]
    Encode(serde_json::Error),
}

/// Request payload accepted by [`ShelfsyncClient::request`].
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// Structured data; serialized to JSON with a JSON content type.
    Json(serde_json::Value),
    /// Pre-encoded payload, passed through untouched.
    Raw(String),
}

pub(crate) fn json_body<T: Serialize>(payload: &T) -> Result<RequestBody, ApiError> {
    serde_json::to_value(payload)
        .map(RequestBody::Json)
        .map_err(ApiError::Encode)
}

/// Coarse classification of a response status, before any body handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusClass {
    Unauthorized,
    NoContent,
    Success,
    Failure,
}

/// Outcome for a failure status. The status alone makes the call a
/// `RequestFailed`; an unreadable body degrades to an empty one instead
/// of masquerading as a transport or decode error.
fn failure_outcome<T, E>(body: Result<String, E>) -> RequestOutcome<T> {
    RequestOutcome::RequestFailed(body.unwrap_or_default())
}

pub(crate) fn classify_status(status: StatusCode) -> StatusClass {
    match status {
        StatusCode::UNAUTHORIZED => StatusClass::Unauthorized,
        StatusCode::NO_CONTENT => StatusClass::NoContent,
        status if status.is_success() => StatusClass::Success,
        _ => StatusClass::Failure,
    }
}

/// API client for the Shelfsync backend.
///
/// Clones share the expiry observer slot, so registering an observer on
/// [`ShelfsyncClient::shared`] covers every call site.
#[derive(Clone)]
pub struct ShelfsyncClient {
    base_url: String,
    client: Client,
    expiry: Rc<RefCell<Option<Callback<()>>>>,
}

impl ShelfsyncClient {
    /// Create a new API client with the provided base URL.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
            expiry: Rc::new(RefCell::new(None)),
        }
    }

    /// The process-wide client used by pages and containers.
    #[must_use]
    pub fn shared() -> Self {
        SHARED_CLIENT.with(|cell| cell.get_or_init(|| Self::new(DEFAULT_BASE_URL)).clone())
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Register (or clear) the session-expiry observer notified on 401.
    pub fn set_expiry_observer(&self, observer: Option<Callback<()>>) {
        *self.expiry.borrow_mut() = observer;
    }

    fn notify_expiry(&self) {
        let observer = self.expiry.borrow().clone();
        if let Some(observer) = observer {
            observer.emit(());
        }
    }

    async fn dispatch(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<RequestBody>,
        headers: Option<Vec<(String, String)>>,
    ) -> Result<Response, ApiError> {
        let mut merged = HeaderMap::new();
        let mut request = self.client.request(method, self.api_url(endpoint));

        match body {
            Some(RequestBody::Json(value)) => {
                merged.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                request = request.body(value.to_string());
            }
            Some(RequestBody::Raw(text)) => {
                request = request.body(text);
            }
            None => {}
        }

        // Defaults first; caller-supplied headers win per key.
        if let Some(extra) = headers {
            for (name, value) in extra {
                if let (Ok(name), Ok(value)) =
                    (name.parse::<HeaderName>(), HeaderValue::from_str(&value))
                {
                    merged.insert(name, value);
                }
            }
        }

        request
            .headers(merged)
            .send()
            .await
            .map_err(ApiError::Transport)
    }

    /// Execute one backend call and parse a success body as JSON.
    ///
    /// The request is dispatched exactly once; there is no retry and no
    /// deduplication.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<RequestBody>,
        headers: Option<Vec<(String, String)>>,
    ) -> Result<RequestOutcome<T>, ApiError> {
        let response = self.dispatch(method, endpoint, body, headers).await?;
        match classify_status(response.status()) {
            StatusClass::Unauthorized => {
                self.notify_expiry();
                Ok(RequestOutcome::Unauthorized)
            }
            StatusClass::NoContent => Ok(RequestOutcome::NoContent),
            StatusClass::Success => {
                let value = response.json::<T>().await.map_err(ApiError::Decode)?;
                Ok(RequestOutcome::Success(value))
            }
            StatusClass::Failure => Ok(failure_outcome(response.text().await)),
        }
    }

    /// Execute one backend call whose success body is irrelevant.
    pub async fn request_empty(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<RequestBody>,
        headers: Option<Vec<(String, String)>>,
    ) -> Result<RequestOutcome<()>, ApiError> {
        let response = self.dispatch(method, endpoint, body, headers).await?;
        match classify_status(response.status()) {
            StatusClass::Unauthorized => {
                self.notify_expiry();
                Ok(RequestOutcome::Unauthorized)
            }
            StatusClass::NoContent => Ok(RequestOutcome::NoContent),
            StatusClass::Success => Ok(RequestOutcome::Success(())),
            StatusClass::Failure => Ok(failure_outcome(response.text().await)),
        }
    }

    // auth ---------------------------------------------------------------

    /// Authenticate with username/password credentials.
    pub async fn login(
        &self,
        credentials: &LoginRequest,
    ) -> Result<RequestOutcome<()>, ApiError> {
        let body = json_body(credentials)?;
        self.request_empty(Method::POST, "auth/login", Some(body), None)
            .await
    }

    /// Inform the backend of a logout. The local session change is the
    /// effective one regardless of this call's outcome.
    pub async fn logout(&self) -> Result<RequestOutcome<()>, ApiError> {
        self.request_empty(Method::POST, "auth/logout", None, None)
            .await
    }

    /// Check whether the current session is still accepted.
    pub async fn validate(&self) -> Result<RequestOutcome<()>, ApiError> {
        self.request_empty(Method::GET, "auth/validate", None, None)
            .await
    }

    /// Create the initial admin account.
    pub async fn onboard(&self, account: &OnboardRequest) -> Result<RequestOutcome<()>, ApiError> {
        let body = json_body(account)?;
        self.request_empty(Method::POST, "auth/onboard", Some(body), None)
            .await
    }

    /// Ask whether initial setup is still possible.
    pub async fn can_onboard(&self) -> Result<RequestOutcome<()>, ApiError> {
        self.request_empty(Method::GET, "auth/onboard", None, None)
            .await
    }

    // api keys -----------------------------------------------------------

    /// List configured API keys.
    pub async fn list_keys(&self) -> Result<RequestOutcome<Vec<ApiKey>>, ApiError> {
        self.request(Method::GET, "keys", None, None).await
    }

    /// Create an API key.
    pub async fn create_key(&self, key: &ApiKey) -> Result<RequestOutcome<()>, ApiError> {
        let body = json_body(key)?;
        self.request_empty(Method::POST, "keys", Some(body), None)
            .await
    }

    /// Delete an API key by its key value.
    pub async fn delete_key(&self, key: &str) -> Result<RequestOutcome<()>, ApiError> {
        self.request_empty(Method::DELETE, &format!("keys/{key}"), None, None)
            .await
    }

    // config -------------------------------------------------------------

    /// Retrieve the server configuration.
    pub async fn get_config(&self) -> Result<RequestOutcome<Config>, ApiError> {
        self.request(Method::GET, "config", None, None).await
    }

    /// Apply a partial configuration update.
    pub async fn update_config(
        &self,
        update: &ConfigUpdate,
    ) -> Result<RequestOutcome<()>, ApiError> {
        let body = json_body(update)?;
        self.request_empty(Method::PATCH, "config", Some(body), None)
            .await
    }

    // logs ---------------------------------------------------------------

    /// List rotated log files.
    pub async fn log_files(&self) -> Result<RequestOutcome<LogFilesResponse>, ApiError> {
        self.request(Method::GET, "logs/files", None, None).await
    }

    // notifications ------------------------------------------------------

    /// List notification targets.
    pub async fn list_notifications(
        &self,
    ) -> Result<RequestOutcome<Vec<Notification>>, ApiError> {
        self.request(Method::GET, "notification", None, None).await
    }

    /// Create a notification target.
    pub async fn create_notification(
        &self,
        notification: &Notification,
    ) -> Result<RequestOutcome<()>, ApiError> {
        let body = json_body(notification)?;
        self.request_empty(Method::POST, "notification", Some(body), None)
            .await
    }

    /// Update a notification target.
    pub async fn update_notification(
        &self,
        notification: &Notification,
    ) -> Result<RequestOutcome<()>, ApiError> {
        let body = json_body(notification)?;
        self.request_empty(
            Method::PUT,
            &format!("notification/{}", notification.id),
            Some(body),
            None,
        )
        .await
    }

    /// Delete a notification target.
    pub async fn delete_notification(&self, id: i32) -> Result<RequestOutcome<()>, ApiError> {
        self.request_empty(Method::DELETE, &format!("notification/{id}"), None, None)
            .await
    }

    /// Send a test message through a notification target.
    pub async fn test_notification(
        &self,
        notification: &Notification,
    ) -> Result<RequestOutcome<()>, ApiError> {
        let body = json_body(notification)?;
        self.request_empty(Method::POST, "notification/test", Some(body), None)
            .await
    }

    // updates ------------------------------------------------------------

    /// Trigger an update check on the server.
    pub async fn check_updates(&self) -> Result<RequestOutcome<()>, ApiError> {
        self.request_empty(Method::GET, "updates/check", None, None)
            .await
    }

    /// Latest known release, if the server has seen one.
    pub async fn latest_release(
        &self,
    ) -> Result<RequestOutcome<Option<Release>>, ApiError> {
        self.request(Method::GET, "updates/latest", None, None).await
    }

    /// URL of the push-log event stream. The stream itself is consumed by
    /// the log viewer, outside this client.
    #[must_use]
    pub fn log_stream_url(&self) -> String {
        self.api_url("events?stream=logs")
    }
}

impl fmt::Debug for ShelfsyncClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShelfsyncClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification_covers_the_taxonomy() {
        assert_eq!(
            classify_status(StatusCode::UNAUTHORIZED),
            StatusClass::Unauthorized
        );
        assert_eq!(classify_status(StatusCode::NO_CONTENT), StatusClass::NoContent);
        assert_eq!(classify_status(StatusCode::OK), StatusClass::Success);
        assert_eq!(classify_status(StatusCode::CREATED), StatusClass::Success);
        assert_eq!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR),
            StatusClass::Failure
        );
        assert_eq!(classify_status(StatusCode::NOT_FOUND), StatusClass::Failure);
        assert_eq!(classify_status(StatusCode::FOUND), StatusClass::Failure);
    }

    #[test]
    fn base_url_is_normalized() {
        let client = ShelfsyncClient::new("http://localhost:8282/api/");
        assert_eq!(
            client.api_url("/auth/login"),
            "http://localhost:8282/api/auth/login"
        );
        assert_eq!(
            client.log_stream_url(),
            "http://localhost:8282/api/events?stream=logs"
        );
    }

    #[test]
    fn unreadable_failure_body_still_fails_the_request() {
        assert_eq!(
            failure_outcome::<(), &str>(Ok("boom".to_string())),
            RequestOutcome::RequestFailed("boom".to_string())
        );
        assert_eq!(
            failure_outcome::<(), &str>(Err("stream aborted")),
            RequestOutcome::RequestFailed(String::new())
        );
    }

    #[test]
    fn json_body_carries_the_payload() {
        let credentials = LoginRequest {
            username: "admin".to_string(),
            password: "x".to_string(),
        };
        match json_body(&credentials).expect("encode") {
            RequestBody::Json(value) => assert_eq!(value["username"], "admin"),
            RequestBody::Raw(_) => panic!("expected structured body"),
        }
    }

    #[test]
    fn observer_slot_is_shared_across_clones() {
        let client = ShelfsyncClient::new("/api");
        let clone = client.clone();
        let fired = std::rc::Rc::new(std::cell::Cell::new(0_u32));
        let counter = fired.clone();
        clone.set_expiry_observer(Some(Callback::from(move |_| {
            counter.set(counter.get() + 1);
        })));

        client.notify_expiry();
        client.notify_expiry();
        assert_eq!(fired.get(), 2);

        client.set_expiry_observer(None);
        clone.notify_expiry();
        assert_eq!(fired.get(), 2);
    }
}
