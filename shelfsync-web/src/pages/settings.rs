use crate::api::RequestOutcome;
use crate::app::Services;
use shared::models::{ApiKey, Config};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// Server configuration and API key overview.
#[function_component(SettingsPage)]
pub fn settings_page() -> Html {
    let services = use_context::<Services>().expect("services context");
    let config = use_state(|| None::<Config>);
    let keys = use_state(Vec::<ApiKey>::new);
    let error = use_state(|| None::<String>);

    {
        let config = config.clone();
        let keys = keys.clone();
        let error = error.clone();
        let client = services.client.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match client.get_config().await {
                    Ok(RequestOutcome::Success(current)) => config.set(Some(current)),
                    Ok(RequestOutcome::RequestFailed(body)) => error.set(Some(body)),
                    Ok(RequestOutcome::NoContent | RequestOutcome::Unauthorized) => {}
                    Err(err) => error.set(Some(err.to_string())),
                }
                if let Ok(RequestOutcome::Success(list)) = client.list_keys().await {
                    keys.set(list);
                }
            });
            || ()
        });
    }

    html! {
        <div class="space-y-6">
            <h1 class="text-2xl font-bold">{"Settings"}</h1>
            if let Some(message) = &*error {
                <div class="alert alert-error"><span>{message.clone()}</span></div>
            }
            if let Some(current) = &*config {
                <div class="card bg-base-200 shadow">
                    <div class="card-body">
                        <h2 class="card-title">{"Server"}</h2>
                        <p>{ format!("Listening on {}:{}", current.host, current.port) }</p>
                        <p>{ format!("Log level: {}", current.log_level) }</p>
                        <p>{ format!("Version: {}", current.version) }</p>
                        <p>{ format!("Update checks: {}",
                            if current.check_for_updates { "enabled" } else { "disabled" }) }
                        </p>
                    </div>
                </div>
            }
            <div class="card bg-base-200 shadow">
                <div class="card-body">
                    <h2 class="card-title">{"API keys"}</h2>
                    if keys.is_empty() {
                        <p class="opacity-75">{"No API keys configured."}</p>
                    } else {
                        <table class="table w-full">
                            <thead>
                                <tr>
                                    <th>{"Name"}</th>
                                    <th>{"Scopes"}</th>
                                </tr>
                            </thead>
                            <tbody>
                                { for keys.iter().map(|key| html! {
                                    <tr>
                                        <td>{ key.name.clone().unwrap_or_default() }</td>
                                        <td>{ key.scopes.join(", ") }</td>
                                    </tr>
                                }) }
                            </tbody>
                        </table>
                    }
                </div>
            </div>
        </div>
    }
}
