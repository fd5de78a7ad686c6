//! First-run onboarding form.
//!
//! Shown while the server has no account yet. Creates the initial admin
//! account, then hands off to the login screen.

use crate::api::RequestOutcome;
use crate::app::Services;
use crate::routes::MainRoute;
use shared::models::OnboardRequest;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::hooks::use_navigator;

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    Required,
    UsernameTooShort,
    PasswordTooShort,
    PasswordsDoNotMatch,
}

impl ValidationError {
    fn message(self) -> &'static str {
        match self {
            Self::Required => "This field is required",
            Self::UsernameTooShort => "Username must be at least 3 characters",
            Self::PasswordTooShort => "Password must be at least 8 characters",
            Self::PasswordsDoNotMatch => "Passwords do not match",
        }
    }
}

pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(ValidationError::Required)
    } else if value.len() < MIN_USERNAME_LEN {
        Err(ValidationError::UsernameTooShort)
    } else {
        Ok(())
    }
}

pub fn validate_password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(ValidationError::Required)
    } else if value.len() < MIN_PASSWORD_LEN {
        Err(ValidationError::PasswordTooShort)
    } else {
        Ok(())
    }
}

pub fn validate_confirm_password(confirm: &str, password: &str) -> Result<(), ValidationError> {
    if confirm.is_empty() {
        Err(ValidationError::Required)
    } else if confirm != password {
        Err(ValidationError::PasswordsDoNotMatch)
    } else {
        Ok(())
    }
}

#[function_component(OnboardPage)]
pub fn onboard_page() -> Html {
    let services = use_context::<Services>().expect("services context");
    let username = use_state(String::new);
    let password = use_state(String::new);
    let confirm = use_state(String::new);
    let field_error = use_state(|| None::<ValidationError>);
    let form_error = use_state(|| None::<String>);
    let submitting = use_state(|| false);
    let navigator = use_navigator();

    let onsubmit = {
        let username_handle = username.clone();
        let password_handle = password.clone();
        let confirm_handle = confirm.clone();
        let field_error = field_error.clone();
        let form_error_handle = form_error.clone();
        let submitting_handle = submitting.clone();
        let navigator = navigator;
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if *submitting_handle {
                return;
            }

            let username_value = (*username_handle).clone();
            let password_value = (*password_handle).clone();
            let confirm_value = (*confirm_handle).clone();

            let validation = validate_username(&username_value)
                .and_then(|()| validate_password(&password_value))
                .and_then(|()| validate_confirm_password(&confirm_value, &password_value));
            if let Err(error) = validation {
                field_error.set(Some(error));
                return;
            }
            field_error.set(None);
            form_error_handle.set(None);
            submitting_handle.set(true);

            let services = services.clone();
            let form_error_ref = form_error_handle.clone();
            let submitting_ref = submitting_handle.clone();
            let navigator_handle = navigator.clone();
            spawn_local(async move {
                let request = OnboardRequest {
                    username: username_value,
                    password: password_value,
                };
                match services.client.onboard(&request).await {
                    Ok(RequestOutcome::Success(()) | RequestOutcome::NoContent) => {
                        if let Some(ref nav) = navigator_handle {
                            nav.push(&MainRoute::Login);
                        }
                    }
                    Ok(RequestOutcome::Unauthorized) => {
                        form_error_ref.set(Some("Onboarding is not available".to_string()));
                    }
                    Ok(RequestOutcome::RequestFailed(body)) => {
                        let message = if body.is_empty() {
                            "Onboarding failed".to_string()
                        } else {
                            body
                        };
                        form_error_ref.set(Some(message));
                    }
                    Err(_) => {
                        form_error_ref.set(Some("Unable to connect to server".to_string()));
                    }
                }
                submitting_ref.set(false);
            });
        })
    };

    let on_username_change = {
        let username = username.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                username.set(input.value());
            }
        })
    };
    let on_password_change = {
        let password = password.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                password.set(input.value());
            }
        })
    };
    let on_confirm_change = {
        let confirm = confirm.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                confirm.set(input.value());
            }
        })
    };

    let is_busy = *submitting;

    html! {
        <div class="flex flex-col justify-center items-center min-h-screen p-6 bg-base-200">
            <div class="flex flex-col items-center text-center gap-4 max-w-md w-full">
                <h1 class="text-3xl font-bold">{"Welcome to Shelfsync"}</h1>
                <p>{"Create the admin account to finish setting up this server."}</p>

                <div class="card w-full bg-base-100 shadow-xl">
                    <form class="card-body" onsubmit={onsubmit}>
                        if let Some(message) = &*form_error {
                            <div class="alert alert-error">
                                <span>{message.clone()}</span>
                            </div>
                        }
                        if let Some(error) = *field_error {
                            <div class="alert alert-warning">
                                <span>{error.message()}</span>
                            </div>
                        }
                        <div class="form-control">
                            <label class="label" for="username">
                                <span class="label-text">{"Username"}</span>
                            </label>
                            <input
                                id="username"
                                class="input input-bordered"
                                type="text"
                                value={(*username).clone()}
                                oninput={on_username_change}
                                disabled={is_busy}
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">{"Password"}</span>
                            </label>
                            <input
                                id="password"
                                class="input input-bordered"
                                type="password"
                                value={(*password).clone()}
                                oninput={on_password_change}
                                disabled={is_busy}
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="confirm-password">
                                <span class="label-text">{"Confirm password"}</span>
                            </label>
                            <input
                                id="confirm-password"
                                class="input input-bordered"
                                type="password"
                                value={(*confirm).clone()}
                                oninput={on_confirm_change}
                                disabled={is_busy}
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" type="submit" disabled={is_busy}>
                                {if is_busy { "Creating account..." } else { "Create account" }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
