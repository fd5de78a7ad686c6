//! Forced-logout handling.
//!
//! The gateway only raises a typed `Unauthorized` outcome; this handler is
//! the single place that turns it into the session-clear plus
//! redirect-to-login side effect. Keeping it out of the request layer
//! leaves the gateway free of routing and store dependencies.

use crate::routes::MainRoute;
use crate::session::SessionStore;
use std::fmt;
use std::rc::Rc;
use yew::Callback;

/// Observer for unauthorized responses.
///
/// `on_unauthorized` is idempotent: the session clear is a no-op once the
/// session is gone, and the login navigation is only requested while the
/// current screen is not already the login screen.
pub struct SessionExpiryHandler {
    session: SessionStore,
    current_route: Rc<dyn Fn() -> Option<MainRoute>>,
    navigate: Callback<MainRoute>,
}

impl SessionExpiryHandler {
    pub fn new(
        session: SessionStore,
        current_route: Rc<dyn Fn() -> Option<MainRoute>>,
        navigate: Callback<MainRoute>,
    ) -> Self {
        Self {
            session,
            current_route,
            navigate,
        }
    }

    /// React to a 401: clear the session, then request navigation to the
    /// login screen unless it is already showing. The session mutation
    /// happens before the navigation request.
    pub fn on_unauthorized(&self) {
        self.session.logout();
        if !matches!((self.current_route)(), Some(MainRoute::Login)) {
            self.navigate.emit(MainRoute::Login);
        }
    }

    /// Adapter for the gateway's observer slot.
    #[must_use]
    pub fn into_observer(self) -> Callback<()> {
        let handler = Rc::new(self);
        Callback::from(move |_| handler.on_unauthorized())
    }
}

impl fmt::Debug for SessionExpiryHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionExpiryHandler")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Session, SessionBackend};
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

    fn handler_with_route(
        initial_route: MainRoute,
    ) -> (SessionExpiryHandler, SessionStore, Rc<RefCell<Vec<MainRoute>>>) {
        let session = SessionStore::new(Rc::new(MemoryStorage::default()));
        session.login("admin");

        let current = Rc::new(RefCell::new(initial_route));
        let pushed = Rc::new(RefCell::new(Vec::new()));

        let route_reader = current.clone();
        let route_sink = current;
        let push_log = pushed.clone();
        let handler = SessionExpiryHandler::new(
            session.clone(),
            Rc::new(move || Some(route_reader.borrow().clone())),
            Callback::from(move |route: MainRoute| {
                // Mirror what the router does: the pushed route becomes
                // the current one.
                *route_sink.borrow_mut() = route.clone();
                push_log.borrow_mut().push(route);
            }),
        );
        (handler, session, pushed)
    }

    #[test]
    fn clears_session_and_navigates_to_login() {
        let (handler, session, pushed) = handler_with_route(MainRoute::Settings);

        handler.on_unauthorized();

        assert_eq!(session.snapshot(), Session::default());
        assert_eq!(&*pushed.borrow(), &[MainRoute::Login]);
    }

    #[test]
    fn concurrent_expiries_produce_one_navigation() {
        let (handler, session, pushed) = handler_with_route(MainRoute::Logs);

        // Several in-flight requests all resolving 401.
        handler.on_unauthorized();
        handler.on_unauthorized();
        handler.on_unauthorized();

        assert_eq!(session.snapshot(), Session::default());
        assert_eq!(pushed.borrow().len(), 1);
    }

    #[test]
    fn no_navigation_when_already_on_login() {
        let (handler, session, pushed) = handler_with_route(MainRoute::Login);

        handler.on_unauthorized();

        assert!(!session.is_authenticated());
        assert!(pushed.borrow().is_empty());
    }
}
