//! Application shell: service construction and router wiring.

use crate::api::ShelfsyncClient;
use crate::expiry::SessionExpiryHandler;
use crate::guard::NavigationGuard;
use crate::probe::HttpOnboardingProbe;
use crate::routes::{switch, MainRoute};
use crate::session::SessionStore;
use std::fmt;
use std::rc::Rc;
use yew::prelude::*;
use yew_router::prelude::*;

/// Shared service handles injected into the component tree.
///
/// One instance per application; tests of the individual services build
/// their own isolated pieces instead.
#[derive(Clone)]
pub struct Services {
    pub session: SessionStore,
    pub client: ShelfsyncClient,
    pub guard: Rc<NavigationGuard>,
}

impl Services {
    fn browser() -> Self {
        let session = SessionStore::browser();
        let client = ShelfsyncClient::shared();
        let probe = Rc::new(HttpOnboardingProbe::new(client.clone()));
        let guard = Rc::new(NavigationGuard::new(session.clone(), probe));
        Self {
            session,
            client,
            guard,
        }
    }
}

impl PartialEq for Services {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.guard, &other.guard)
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

fn current_route() -> Option<MainRoute> {
    let path = web_sys::window()?.location().pathname().ok()?;
    MainRoute::recognize(&path)
}

#[function_component(App)]
pub fn app() -> Html {
    let services = use_memo((), |_| Services::browser());

    html! {
        <ContextProvider<Services> context={(*services).clone()}>
            <BrowserRouter>
                <RouterShell />
            </BrowserRouter>
        </ContextProvider<Services>>
    }
}

/// Lives under the router so the expiry handler can navigate. Registered
/// once; every gateway clone shares the observer slot.
#[function_component(RouterShell)]
fn router_shell() -> Html {
    let services = use_context::<Services>().expect("services context");
    let navigator = use_navigator().expect("router context");

    use_effect_with((), move |_| {
        let handler = SessionExpiryHandler::new(
            services.session.clone(),
            Rc::new(current_route),
            Callback::from(move |route: MainRoute| navigator.push(&route)),
        );
        let client = services.client.clone();
        client.set_expiry_observer(Some(handler.into_observer()));
        move || client.set_expiry_observer(None)
    });

    html! { <Switch<MainRoute> render={switch} /> }
}
