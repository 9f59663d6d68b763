use crate::api::use_api;
use crate::auth::use_auth;
use crate::store::use_request_scope;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;
use templateshare::route::AppRoute;
use templateshare::shared::{RegisterRequest, Role};
use templateshare::store::{AuthAction, Dispatch, actions};

/// 客户端校验，返回第一条错误
fn validate(username: &str, email: &str, password: &str, confirm: &str) -> Option<&'static str> {
    if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
        return Some("Please fill in all fields");
    }
    if password != confirm {
        return Some("Passwords do not match");
    }
    if password.chars().count() < 6 {
        return Some("Password must be at least 6 characters");
    }
    None
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let router = use_router();
    let scope = use_request_scope();

    let (username, set_username) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (form_error, set_form_error) = signal(Option::<String>::None);

    auth.dispatch(AuthAction::ClearError);

    let is_submitting = move || auth.with(|s| s.loading);
    let error_msg = move || form_error.get().or_else(|| auth.with(|s| s.error.clone()));

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if let Some(msg) = validate(&username.get(), &email.get(), &password.get(), &confirm.get()) {
            set_form_error.set(Some(msg.to_string()));
            return;
        }
        set_form_error.set(None);

        let req = RegisterRequest {
            email: email.get().trim().to_string(),
            username: username.get().trim().to_string(),
            password: password.get(),
            role: Role::User,
        };
        let api = api.clone();
        let scope = scope.clone();
        spawn_local(async move {
            if actions::register(&api, &auth, &scope, &req).await {
                router.navigate_to(AppRoute::Login);
            }
        });
    };

    let field = move |id: &'static str,
                      label: &'static str,
                      kind: &'static str,
                      value: ReadSignal<String>,
                      set: WriteSignal<String>| {
        view! {
            <div class="form-control">
                <label class="label" for=id>
                    <span class="label-text">{label}</span>
                </label>
                <input
                    id=id
                    type=kind
                    on:input=move |ev| set.set(event_target_value(&ev))
                    prop:value=value
                    class="input input-bordered"
                    required
                />
            </div>
        }
    };

    view! {
        <div class="hero min-h-[80vh]">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Create your account"</h1>
                    <p class="text-base-content/70">
                        "Already registered? " <Link to=AppRoute::Login class="link link-primary">"Sign in"</Link>
                    </p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        {field("username", "Username", "text", username, set_username)}
                        {field("email", "Email address", "email", email, set_email)}
                        {field("password", "Password", "password", password, set_password)}
                        {field("confirm", "Confirm password", "password", confirm, set_confirm)}

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=is_submitting>
                                {move || if is_submitting() {
                                    view! { <span class="loading loading-spinner"></span> "Creating account..." }.into_any()
                                } else {
                                    "Create account".into_any()
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
