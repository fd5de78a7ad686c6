use crate::api::RequestOutcome;
use crate::app::Services;
use crate::routes::MainRoute;
use shared::models::Release;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

/// Dashboard page component.
#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let services = use_context::<Services>().expect("services context");
    let release = use_state(|| None::<Release>);
    let user = services.session.user();

    {
        let release = release.clone();
        let client = services.client.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                if let Ok(RequestOutcome::Success(Some(latest))) = client.latest_release().await {
                    release.set(Some(latest));
                }
            });
            || ()
        });
    }

    html! {
        <div class="space-y-6">
            <h1 class="text-2xl font-bold">{ format!("Welcome back, {user}") }</h1>

            if let Some(latest) = &*release {
                <div class="alert alert-info shadow">
                    <span>
                        { format!("Update available: {}", latest.tag_name) }
                        {" "}
                        <a class="link" href={latest.html_url.clone()} target="_blank">
                            {"release notes"}
                        </a>
                    </span>
                </div>
            }

            <div class="grid grid-cols-1 md:grid-cols-2 gap-6">
                <div class="card bg-base-200 shadow-xl">
                    <div class="card-body">
                        <h2 class="card-title">{"Logs"}</h2>
                        <p>{"Inspect server log files."}</p>
                        <div class="card-actions justify-end">
                            <Link<MainRoute> to={MainRoute::Logs} classes="btn btn-primary">
                                {"Open"}
                            </Link<MainRoute>>
                        </div>
                    </div>
                </div>
                <div class="card bg-base-200 shadow-xl">
                    <div class="card-body">
                        <h2 class="card-title">{"Settings"}</h2>
                        <p>{"Server configuration and API keys."}</p>
                        <div class="card-actions justify-end">
                            <Link<MainRoute> to={MainRoute::Settings} classes="btn btn-primary">
                                {"Open"}
                            </Link<MainRoute>>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
