use crate::api::use_api;
use crate::auth::use_auth;
use crate::store::use_request_scope;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use templateshare::route::AppRoute;
use templateshare::store::{AuthAction, Dispatch, actions};

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let scope = use_request_scope();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (form_error, set_form_error) = signal(Option::<String>::None);

    // 进入页面时清除上一次的错误
    auth.dispatch(AuthAction::ClearError);

    let is_submitting = move || auth.with(|s| s.loading);
    let error_msg = move || form_error.get().or_else(|| auth.with(|s| s.error.clone()));

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if email.get().trim().is_empty() || password.get().is_empty() {
            set_form_error.set(Some("Please fill in all fields".to_string()));
            return;
        }
        set_form_error.set(None);

        let api = api.clone();
        let scope = scope.clone();
        spawn_local(async move {
            // 成功后的跳转由路由服务监听认证状态完成
            actions::login(&api, &auth, &scope, email.get_untracked().trim(), &password.get_untracked()).await;
        });
    };

    view! {
        <div class="hero min-h-[80vh]">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Sign in to your account"</h1>
                    <p class="text-base-content/70">
                        "Or " <Link to=AppRoute::Register class="link link-primary">"create a new account"</Link>
                    </p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email address"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                autocomplete="email"
                                placeholder="you@example.com"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                autocomplete="current-password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=is_submitting>
                                {move || if is_submitting() {
                                    view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                } else {
                                    "Sign in".into_any()
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
