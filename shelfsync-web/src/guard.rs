//! Navigation guard.
//!
//! Every screen transition is resolved exactly once, to one of four
//! outcomes. The routing decision itself is a pure function; the async
//! driver around it reads the session synchronously, queries the
//! onboarding probe only on the one branch that needs it, and discards
//! its own result when a newer transition started while the probe was in
//! flight.

use crate::probe::{OnboardingProbe, OnboardingState};
use crate::session::SessionStore;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Resolution of one attempted screen transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    RedirectLogin,
    RedirectOnboard,
    RedirectHome,
}

/// Static auth classification of a navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetClass {
    /// The login screen.
    Login,
    /// The onboarding screen.
    Onboard,
    /// Any screen that requires an authenticated session.
    Guarded,
}

/// The routing decision, with the onboarding answer fully resolved by the
/// caller.
#[must_use]
pub fn decide(authenticated: bool, target: TargetClass, onboarding_required: bool) -> GuardOutcome {
    match (authenticated, target) {
        // Logged-in users have no business on the auth screens.
        (true, TargetClass::Login | TargetClass::Onboard) => GuardOutcome::RedirectHome,
        (true, TargetClass::Guarded) => GuardOutcome::Allow,
        (false, TargetClass::Guarded) => {
            if onboarding_required {
                GuardOutcome::RedirectOnboard
            } else {
                GuardOutcome::RedirectLogin
            }
        }
        (false, TargetClass::Login | TargetClass::Onboard) => GuardOutcome::Allow,
    }
}

/// Async driver invoking [`decide`] once per transition attempt.
pub struct NavigationGuard {
    session: SessionStore,
    probe: Rc<dyn OnboardingProbe>,
    epoch: Rc<Cell<u64>>,
}

impl NavigationGuard {
    pub fn new(session: SessionStore, probe: Rc<dyn OnboardingProbe>) -> Self {
        Self {
            session,
            probe,
            epoch: Rc::new(Cell::new(0)),
        }
    }

    /// Evaluate one transition.
    ///
    /// Returns `None` when a newer transition started while the probe was
    /// in flight; the newer evaluation owns the routing decision, so a
    /// stale probe answer is never acted on.
    pub async fn evaluate(&self, target: TargetClass) -> Option<GuardOutcome> {
        let token = self.epoch.get().wrapping_add(1);
        self.epoch.set(token);

        let authenticated = self.session.is_authenticated();
        let onboarding = if !authenticated && target == TargetClass::Guarded {
            let state = self.probe.state().await;
            if self.epoch.get() != token {
                return None;
            }
            state
        } else {
            OnboardingState::Unknown
        };

        Some(decide(authenticated, target, onboarding.is_required()))
    }
}

impl fmt::Debug for NavigationGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationGuard")
            .field("epoch", &self.epoch.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionBackend;
    use async_trait::async_trait;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStorage {
        values: RefCell<HashMap<String, String>>,
    }

    impl SessionBackend for MemoryStorage {
        fn read(&self, key: &str) -> Option<String> {
            self.values.borrow().get(key).cloned()
        }

        fn write(&self, key: &str, value: &str) {
            self.values
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
        }

        fn delete(&self, key: &str) {
            self.values.borrow_mut().remove(key);
        }
    }

    struct CannedProbe {
        answer: OnboardingState,
        calls: Cell<u32>,
    }

    impl CannedProbe {
        fn new(answer: OnboardingState) -> Rc<Self> {
            Rc::new(Self {
                answer,
                calls: Cell::new(0),
            })
        }
    }

    #[async_trait(?Send)]
    impl OnboardingProbe for CannedProbe {
        async fn state(&self) -> OnboardingState {
            self.calls.set(self.calls.get() + 1);
            self.answer
        }
    }

    /// Simulates a second navigation starting while the probe round trip
    /// is in flight.
    struct SupersedingProbe {
        epoch: Rc<Cell<u64>>,
    }

    #[async_trait(?Send)]
    impl OnboardingProbe for SupersedingProbe {
        async fn state(&self) -> OnboardingState {
            self.epoch.set(self.epoch.get().wrapping_add(1));
            OnboardingState::Required
        }
    }

    fn store(authenticated: bool) -> SessionStore {
        let store = SessionStore::new(Rc::new(MemoryStorage::default()));
        if authenticated {
            store.login("admin");
        }
        store
    }

    #[test]
    fn decision_table() {
        // Authenticated visitors bounce off the auth screens.
        assert_eq!(
            decide(true, TargetClass::Login, false),
            GuardOutcome::RedirectHome
        );
        assert_eq!(
            decide(true, TargetClass::Onboard, true),
            GuardOutcome::RedirectHome
        );
        assert_eq!(decide(true, TargetClass::Guarded, false), GuardOutcome::Allow);

        // Unauthenticated visitors reach the auth screens freely.
        assert_eq!(decide(false, TargetClass::Login, false), GuardOutcome::Allow);
        assert_eq!(decide(false, TargetClass::Onboard, true), GuardOutcome::Allow);

        // Guarded targets depend on the onboarding answer.
        assert_eq!(
            decide(false, TargetClass::Guarded, true),
            GuardOutcome::RedirectOnboard
        );
        assert_eq!(
            decide(false, TargetClass::Guarded, false),
            GuardOutcome::RedirectLogin
        );
    }

    #[test]
    fn authenticated_transitions_never_probe() {
        let probe = CannedProbe::new(OnboardingState::Required);
        let guard = NavigationGuard::new(store(true), probe.clone());

        let outcome = block_on(guard.evaluate(TargetClass::Guarded));
        assert_eq!(outcome, Some(GuardOutcome::Allow));

        let outcome = block_on(guard.evaluate(TargetClass::Login));
        assert_eq!(outcome, Some(GuardOutcome::RedirectHome));

        assert_eq!(probe.calls.get(), 0);
    }

    #[test]
    fn unauthenticated_guarded_transition_probes_once() {
        let probe = CannedProbe::new(OnboardingState::Required);
        let guard = NavigationGuard::new(store(false), probe.clone());

        let outcome = block_on(guard.evaluate(TargetClass::Guarded));
        assert_eq!(outcome, Some(GuardOutcome::RedirectOnboard));
        assert_eq!(probe.calls.get(), 1);
    }

    #[test]
    fn completed_setup_redirects_to_login() {
        let probe = CannedProbe::new(OnboardingState::NotRequired);
        let guard = NavigationGuard::new(store(false), probe);

        let outcome = block_on(guard.evaluate(TargetClass::Guarded));
        assert_eq!(outcome, Some(GuardOutcome::RedirectLogin));
    }

    #[test]
    fn superseded_evaluation_does_not_resolve() {
        let epoch = Rc::new(Cell::new(0));
        let guard = NavigationGuard {
            session: store(false),
            probe: Rc::new(SupersedingProbe {
                epoch: epoch.clone(),
            }),
            epoch,
        };

        let outcome = block_on(guard.evaluate(TargetClass::Guarded));
        assert_eq!(outcome, None);
    }
}
