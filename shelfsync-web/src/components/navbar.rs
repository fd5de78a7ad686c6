use crate::app::Services;
use crate::guard::TargetClass;
use crate::routes::MainRoute;
use strum::IntoEnumIterator;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Properties, PartialEq)]
pub struct NavbarProps {
    pub current: MainRoute,
    #[prop_or_default]
    pub children: Children,
}

fn label(route: &MainRoute) -> &'static str {
    match route {
        MainRoute::Home => "Dashboard",
        MainRoute::Logs => "Logs",
        MainRoute::Settings => "Settings",
        _ => "",
    }
}

/// Top navigation shown on guarded screens, with the current user and a
/// logout action.
#[function_component(Navbar)]
pub fn navbar(props: &NavbarProps) -> Html {
    let services = use_context::<Services>().expect("services context");
    let session = use_state(|| services.session.snapshot());
    let navigator = use_navigator();

    {
        let session = session.clone();
        let store = services.session.clone();
        use_effect_with((), move |_| {
            let id = store.subscribe(Callback::from(move |snapshot| session.set(snapshot)));
            move || store.unsubscribe(id)
        });
    }

    let on_logout = {
        let services = services.clone();
        Callback::from(move |_: MouseEvent| {
            let services = services.clone();
            let navigator = navigator.clone();
            spawn_local(async move {
                // Best effort; the local logout is the effective change.
                let _ = services.client.logout().await;
                services.session.logout();
                if let Some(nav) = navigator {
                    nav.push(&MainRoute::Login);
                }
            });
        })
    };

    let links = MainRoute::iter()
        .filter(|route| {
            route.target_class() == TargetClass::Guarded && *route != MainRoute::NotFound
        })
        .map(|route| {
            let classes = if route == props.current {
                "btn btn-ghost btn-sm btn-active"
            } else {
                "btn btn-ghost btn-sm"
            };
            html! {
                <Link<MainRoute> to={route.clone()} classes={classes}>
                    { label(&route) }
                </Link<MainRoute>>
            }
        })
        .collect::<Html>();

    html! {
        <>
            <div class="navbar bg-base-200 shadow">
                <div class="flex-1 gap-1">
                    <span class="text-lg font-bold px-2">{"Shelfsync"}</span>
                    { links }
                </div>
                <div class="flex-none gap-2">
                    <span class="text-sm opacity-75">{ (*session).user.clone() }</span>
                    <button class="btn btn-outline btn-sm" onclick={on_logout}>
                        {"Log out"}
                    </button>
                </div>
            </div>
            <main class="p-4">{ for props.children.iter() }</main>
        </>
    }
}
