//! Onboarding probe.
//!
//! Asks the backend whether initial setup is still pending. The answer is
//! fetched fresh on every invocation and never cached; the navigation
//! guard consults it only when an unauthenticated visitor heads for a
//! guarded screen.

use crate::api::{ApiError, RequestOutcome, ShelfsyncClient};
use async_trait::async_trait;

/// Whether the server still needs its initial admin account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingState {
    /// Not queried for the current decision.
    Unknown,
    /// No account exists yet; onboarding must happen first.
    Required,
    /// Setup is complete (or could not be confirmed).
    NotRequired,
}

impl OnboardingState {
    #[must_use]
    pub fn is_required(self) -> bool {
        matches!(self, Self::Required)
    }
}

/// Seam between the navigation guard and the backend query, so tests can
/// drive the guard with canned probe results.
#[async_trait(?Send)]
pub trait OnboardingProbe {
    /// One backend query; no local caching.
    async fn state(&self) -> OnboardingState;
}

/// Probe backed by `GET /api/auth/onboard`.
#[derive(Debug, Clone)]
pub struct HttpOnboardingProbe {
    client: ShelfsyncClient,
}

impl HttpOnboardingProbe {
    #[must_use]
    pub fn new(client: ShelfsyncClient) -> Self {
        Self { client }
    }
}

#[async_trait(?Send)]
impl OnboardingProbe for HttpOnboardingProbe {
    async fn state(&self) -> OnboardingState {
        interpret(self.client.can_onboard().await)
    }
}

/// Map the probe call's outcome onto the tri-state answer.
///
/// The endpoint answers success while onboarding is open and a failure
/// status once an account exists. A failed probe (any error status or a
/// transport failure) counts as `NotRequired`, so a backend hiccup sends
/// visitors to the login screen instead of trapping them on the
/// onboarding form.
fn interpret(outcome: Result<RequestOutcome<()>, ApiError>) -> OnboardingState {
    match outcome {
        Ok(RequestOutcome::Success(())) | Ok(RequestOutcome::NoContent) => {
            OnboardingState::Required
        }
        Ok(RequestOutcome::Unauthorized | RequestOutcome::RequestFailed(_)) | Err(_) => {
            OnboardingState::NotRequired
        }
    }
}
