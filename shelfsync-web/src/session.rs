//! Client-side session state and its localStorage mirror.
//!
//! The session is the single source of truth for "who is logged in". It is
//! an explicit context object handed to the navigation guard, the expiry
//! handler, and the pages; tests construct isolated instances over an
//! in-memory backend.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use gloo_storage::{LocalStorage, Storage};
use yew::Callback;

/// Persisted key for the authentication flag.
pub const AUTHENTICATED_KEY: &str = "auth_authenticated";
/// Persisted key for the logged-in user name.
pub const USER_KEY: &str = "auth_user";

/// The authenticated/unauthenticated status plus the current user.
///
/// Invariant: `authenticated` is `true` iff `user` is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub authenticated: bool,
    pub user: String,
}

/// Key-value persistence behind the session store.
///
/// Production uses browser localStorage; tests supply an in-memory map.
pub trait SessionBackend {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str);
    fn delete(&self, key: &str);
}

/// localStorage-backed [`SessionBackend`].
#[derive(Debug, Default)]
pub struct BrowserStorage;

impl SessionBackend for BrowserStorage {
    fn read(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn write(&self, key: &str, value: &str) {
        let _ = LocalStorage::raw().set_item(key, value);
    }

    fn delete(&self, key: &str) {
        let _ = LocalStorage::raw().remove_item(key);
    }
}

/// Handle to identify a change listener, so it can be removed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// Owner of the [`Session`] value and its persisted mirror.
///
/// Cloning is cheap; clones share the same state. Only `login` and
/// `logout` mutate the session, and both persist before returning, so the
/// in-memory and persisted views never diverge after a mutation completes.
#[derive(Clone)]
pub struct SessionStore {
    session: Rc<RefCell<Session>>,
    backend: Rc<dyn SessionBackend>,
    listeners: Rc<RefCell<Vec<(SubscriptionId, Callback<Session>)>>>,
    next_listener: Rc<RefCell<u64>>,
}

impl SessionStore {
    /// Build a store over the given backend, restoring any persisted
    /// session. Missing or inconsistent persisted data yields the default
    /// unauthenticated session.
    pub fn new(backend: Rc<dyn SessionBackend>) -> Self {
        let session = Self::restore(backend.as_ref());
        Self {
            session: Rc::new(RefCell::new(session)),
            backend,
            listeners: Rc::new(RefCell::new(Vec::new())),
            next_listener: Rc::new(RefCell::new(0)),
        }
    }

    /// Store backed by browser localStorage.
    #[must_use]
    pub fn browser() -> Self {
        Self::new(Rc::new(BrowserStorage))
    }

    fn restore(backend: &dyn SessionBackend) -> Session {
        let authenticated = backend
            .read(AUTHENTICATED_KEY)
            .and_then(|raw| serde_json::from_str::<bool>(&raw).ok())
            .unwrap_or(false);
        let user = backend
            .read(USER_KEY)
            .and_then(|raw| serde_json::from_str::<String>(&raw).ok())
            .unwrap_or_default();

        // A flag without a user (or the reverse) means the mirror was
        // tampered with or half-written; fall back to logged out.
        if authenticated && !user.is_empty() {
            Session {
                authenticated: true,
                user,
            }
        } else {
            Session::default()
        }
    }

    /// Mark the session authenticated as `user` and persist both fields.
    pub fn login(&self, user: &str) {
        let session = Session {
            authenticated: true,
            user: user.to_string(),
        };
        *self.session.borrow_mut() = session.clone();
        self.backend.write(AUTHENTICATED_KEY, "true");
        if let Ok(encoded) = serde_json::to_string(&session.user) {
            self.backend.write(USER_KEY, &encoded);
        }
        self.notify(session);
    }

    /// Clear the session and remove both persisted keys. Idempotent.
    pub fn logout(&self) {
        let session = Session::default();
        *self.session.borrow_mut() = session.clone();
        self.backend.delete(AUTHENTICATED_KEY);
        self.backend.delete(USER_KEY);
        self.notify(session);
    }

    /// Current session value.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.session.borrow().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.borrow().authenticated
    }

    #[must_use]
    pub fn user(&self) -> String {
        self.session.borrow().user.clone()
    }

    /// Register a listener invoked after every mutation.
    pub fn subscribe(&self, listener: Callback<Session>) -> SubscriptionId {
        let mut next = self.next_listener.borrow_mut();
        let id = SubscriptionId(*next);
        *next += 1;
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    /// Remove a previously registered listener.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners
            .borrow_mut()
            .retain(|(listener_id, _)| *listener_id != id);
    }

    fn notify(&self, session: Session) {
        let listeners = self.listeners.borrow().clone();
        for (_, listener) in listeners {
            listener.emit(session.clone());
        }
    }
}

impl PartialEq for SessionStore {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.session, &other.session)
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &self.session.borrow())
            .finish_non_exhaustive()
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn browser_storage_round_trips_session_keys() {
        let storage = BrowserStorage;
        storage.write(AUTHENTICATED_KEY, "true");
        storage.write(USER_KEY, "\"admin\"");
        assert_eq!(storage.read(AUTHENTICATED_KEY).as_deref(), Some("true"));

        let store = SessionStore::browser();
        assert!(store.is_authenticated());
        assert_eq!(store.user(), "admin");

        store.logout();
        assert!(storage.read(AUTHENTICATED_KEY).is_none());
        assert!(storage.read(USER_KEY).is_none());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    #[test]
    fn starts_logged_out_without_persisted_state() {
        let store = SessionStore::new(Rc::new(MemoryStorage::default()));
        assert_eq!(store.snapshot(), Session::default());
    }

    #[test]
    fn login_persists_both_fields() {
        let backend = Rc::new(MemoryStorage::default());
        let store = SessionStore::new(backend.clone());

        store.login("admin");

        assert!(store.is_authenticated());
        assert_eq!(store.user(), "admin");
        assert_eq!(backend.read(AUTHENTICATED_KEY).as_deref(), Some("true"));
        assert_eq!(backend.read(USER_KEY).as_deref(), Some("\"admin\""));
    }

    #[test]
    fn logout_removes_both_persisted_keys() {
        let backend = Rc::new(MemoryStorage::default());
        let store = SessionStore::new(backend.clone());

        store.login("admin");
        store.logout();

        assert_eq!(store.snapshot(), Session::default());
        assert!(backend.read(AUTHENTICATED_KEY).is_none());
        assert!(backend.read(USER_KEY).is_none());
    }

    #[test]
    fn restart_restores_persisted_session() {
        let backend = Rc::new(MemoryStorage::default());
        SessionStore::new(backend.clone()).login("admin");

        let restarted = SessionStore::new(backend);
        assert_eq!(
            restarted.snapshot(),
            Session {
                authenticated: true,
                user: "admin".to_string(),
            }
        );
    }

    #[test]
    fn inconsistent_persisted_state_falls_back_to_logged_out() {
        let backend = Rc::new(MemoryStorage::default());
        backend.write(AUTHENTICATED_KEY, "true");
        // No user key: the invariant would be violated.

        let store = SessionStore::new(backend);
        assert!(!store.is_authenticated());
        assert!(store.user().is_empty());
    }

    #[test]
    fn listeners_observe_mutations_until_unsubscribed() {
        let store = SessionStore::new(Rc::new(MemoryStorage::default()));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let id = store.subscribe(Callback::from(move |session: Session| {
            sink.borrow_mut().push(session);
        }));

        store.login("admin");
        store.unsubscribe(id);
        store.logout();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].user, "admin");
    }
}
