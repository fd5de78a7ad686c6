//! Route table and the guarded switch.

use crate::app::Services;
use crate::components::navbar::Navbar;
use crate::guard::{GuardOutcome, TargetClass};
use crate::pages::{DashboardPage, LoginPage, LogsPage, OnboardPage, SettingsPage};
use strum::EnumIter;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

/// The application routes.
#[derive(Debug, Clone, PartialEq, Routable, EnumIter)]
pub enum MainRoute {
    #[at("/")]
    Home,
    #[at("/login")]
    Login,
    #[at("/onboard")]
    Onboard,
    #[at("/logs")]
    Logs,
    #[at("/settings")]
    Settings,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl MainRoute {
    /// Static auth classification consumed by the navigation guard.
    #[must_use]
    pub fn target_class(&self) -> TargetClass {
        match self {
            Self::Login => TargetClass::Login,
            Self::Onboard => TargetClass::Onboard,
            _ => TargetClass::Guarded,
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct GuardedSwitchProps {
    pub route: MainRoute,
}

/// Runs one guard evaluation per transition and renders the resolved
/// outcome: the target page, or a redirect.
#[function_component(GuardedSwitch)]
pub fn guarded_switch(props: &GuardedSwitchProps) -> Html {
    let services = use_context::<Services>().expect("services context");
    let outcome = use_state(|| None::<GuardOutcome>);

    {
        let outcome = outcome.clone();
        let guard = services.guard.clone();
        use_effect_with(props.route.clone(), move |route| {
            let target = route.target_class();
            outcome.set(None);
            spawn_local(async move {
                // A superseded evaluation yields nothing; the newer one
                // resolves the transition.
                if let Some(resolved) = guard.evaluate(target).await {
                    outcome.set(Some(resolved));
                }
            });
            || ()
        });
    }

    match *outcome {
        None => html! { <crate::components::loading::Loading /> },
        Some(GuardOutcome::Allow) => render_page(&props.route),
        Some(GuardOutcome::RedirectHome) => {
            html! { <Redirect<MainRoute> to={MainRoute::Home} /> }
        }
        Some(GuardOutcome::RedirectLogin) => {
            html! { <Redirect<MainRoute> to={MainRoute::Login} /> }
        }
        Some(GuardOutcome::RedirectOnboard) => {
            html! { <Redirect<MainRoute> to={MainRoute::Onboard} /> }
        }
    }
}

/// Unmatched paths land on the dashboard, which is itself guarded.
fn fallback(route: &MainRoute) -> Option<MainRoute> {
    match route {
        MainRoute::NotFound => Some(MainRoute::Home),
        _ => None,
    }
}

/// Switch function for the routes.
pub fn switch(route: MainRoute) -> Html {
    log(format!("Switching to route: {route:?}").as_str());
    if let Some(target) = fallback(&route) {
        return html! { <Redirect<MainRoute> to={target} /> };
    }
    html! { <GuardedSwitch {route} /> }
}

fn render_page(route: &MainRoute) -> Html {
    match route {
        // NotFound never reaches a page; `switch` redirects it first.
        MainRoute::Home | MainRoute::NotFound => with_nav(route, html! { <DashboardPage /> }),
        MainRoute::Logs => with_nav(route, html! { <LogsPage /> }),
        MainRoute::Settings => with_nav(route, html! { <SettingsPage /> }),
        MainRoute::Login => html! { <LoginPage /> },
        MainRoute::Onboard => html! { <OnboardPage /> },
    }
}

fn with_nav(route: &MainRoute, page: Html) -> Html {
    html! { <Navbar current={route.clone()}>{page}</Navbar> }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn auth_screens_classify_as_themselves() {
        assert_eq!(MainRoute::Login.target_class(), TargetClass::Login);
        assert_eq!(MainRoute::Onboard.target_class(), TargetClass::Onboard);
    }

    #[test]
    fn every_other_route_requires_auth() {
        for route in MainRoute::iter() {
            if matches!(route, MainRoute::Login | MainRoute::Onboard) {
                continue;
            }
            assert_eq!(route.target_class(), TargetClass::Guarded, "{route:?}");
        }
    }

    #[test]
    fn only_unmatched_routes_fall_back_to_home() {
        for route in MainRoute::iter() {
            let expected = match route {
                MainRoute::NotFound => Some(MainRoute::Home),
                _ => None,
            };
            assert_eq!(fallback(&route), expected, "{route:?}");
        }
    }

    #[test]
    fn paths_recognize_to_routes() {
        assert_eq!(MainRoute::recognize("/"), Some(MainRoute::Home));
        assert_eq!(MainRoute::recognize("/login"), Some(MainRoute::Login));
        assert_eq!(MainRoute::recognize("/onboard"), Some(MainRoute::Onboard));
        assert_eq!(MainRoute::recognize("/logs"), Some(MainRoute::Logs));
        assert_eq!(MainRoute::recognize("/settings"), Some(MainRoute::Settings));
        assert_eq!(
            MainRoute::recognize("/no/such/path"),
            Some(MainRoute::NotFound)
        );
    }
}
