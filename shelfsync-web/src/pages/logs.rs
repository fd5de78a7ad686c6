use crate::api::RequestOutcome;
use crate::app::Services;
use shared::models::LogFilesResponse;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// Lists the server's rotated log files.
#[function_component(LogsPage)]
pub fn logs_page() -> Html {
    let services = use_context::<Services>().expect("services context");
    let files = use_state(|| None::<LogFilesResponse>);
    let error = use_state(|| None::<String>);

    {
        let files = files.clone();
        let error = error.clone();
        let client = services.client.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match client.log_files().await {
                    Ok(RequestOutcome::Success(response)) => files.set(Some(response)),
                    Ok(RequestOutcome::NoContent) => {
                        files.set(Some(LogFilesResponse {
                            files: Vec::new(),
                            count: 0,
                        }));
                    }
                    Ok(RequestOutcome::RequestFailed(body)) => error.set(Some(body)),
                    // Unauthorized: the expiry handler already redirected.
                    Ok(RequestOutcome::Unauthorized) => {}
                    Err(err) => error.set(Some(err.to_string())),
                }
            });
            || ()
        });
    }

    html! {
        <div class="space-y-4">
            <h1 class="text-2xl font-bold">{"Log files"}</h1>
            if let Some(message) = &*error {
                <div class="alert alert-error"><span>{message.clone()}</span></div>
            }
            if let Some(response) = &*files {
                <table class="table w-full">
                    <thead>
                        <tr>
                            <th>{"File"}</th>
                            <th>{"Size"}</th>
                            <th>{"Updated"}</th>
                        </tr>
                    </thead>
                    <tbody>
                        { for response.files.iter().map(|file| html! {
                            <tr>
                                <td>{ file.filename.clone() }</td>
                                <td>{ format!("{} B", file.size_bytes) }</td>
                                <td>{ file.updated_at.to_rfc3339() }</td>
                            </tr>
                        }) }
                    </tbody>
                </table>
            } else if error.is_none() {
                <progress class="progress w-56"></progress>
            }
        </div>
    }
}
