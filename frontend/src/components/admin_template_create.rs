mod form_state;

use crate::api::use_api;
use crate::components::error_message::ErrorMessage;
use crate::components::loading::{Loading, SpinnerSize};
use crate::store::{use_request_scope, use_templates};
use crate::web::read_upload;
use form_state::FormState;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::time::Duration;
use templateshare::store::{Dispatch, TemplateAction, actions};
use wasm_bindgen::JsCast;

const SUCCESS_BANNER: Duration = Duration::from_secs(2);

#[component]
pub fn AdminTemplateCreatePage() -> impl IntoView {
    let templates = use_templates();
    let api = use_api();
    let scope = use_request_scope();

    let form = FormState::new();
    let (show_success, set_show_success) = signal(false);
    let (file_error, set_file_error) = signal(Option::<String>::None);
    let file_input = NodeRef::<leptos::html::Input>::new();

    // 进入页面时清除之前的错误
    templates.dispatch(TemplateAction::ClearError);

    let loading = move || templates.with(|s| s.loading);
    let can_submit = move || !loading() && form.is_complete();

    let on_file_change = move |ev: leptos::ev::Event| {
        let file = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
            .and_then(|input| input.files())
            .and_then(|files| files.get(0));
        let Some(file) = file else {
            form.image.set(None);
            return;
        };
        set_file_error.set(None);
        spawn_local(async move {
            match read_upload(&file).await {
                Ok(upload) => form.image.set(Some(upload)),
                Err(e) => {
                    log::warn!("[Create] {}", e);
                    form.image.set(None);
                    set_file_error.set(Some("Could not read the selected image".to_string()));
                }
            }
        });
    };

    let submit = {
        let api = api.clone();
        let scope = scope.clone();
        move || {
            let Some(req) = form.to_request() else {
                return;
            };
            let api = api.clone();
            let scope = scope.clone();
            spawn_local(async move {
                if actions::create_template(&api, &templates, &scope, req).await {
                    set_show_success.set(true);
                    set_timeout(
                        move || {
                            set_show_success.set(false);
                            form.reset();
                            if let Some(input) = file_input.get_untracked() {
                                input.set_value("");
                            }
                        },
                        SUCCESS_BANNER,
                    );
                }
            });
        }
    };

    let on_submit = {
        let submit = submit.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            submit();
        }
    };

    // 创建已成功而只是列表刷新失败时，重试只重新拉取，避免重复创建
    let retry = {
        let submit = submit.clone();
        move || {
            if templates.with_untracked(|s| s.create_retry_resubmits()) {
                submit();
                return;
            }
            let api = api.clone();
            let scope = scope.clone();
            spawn_local(async move {
                actions::fetch_templates(&api, &templates, &scope).await;
            });
        }
    };

    let dismiss = Callback::new(move |_: ()| templates.dispatch(TemplateAction::ClearError));

    view! {
        <div class="py-8">
            <div class="max-w-5xl mx-auto px-4 sm:px-6 lg:px-8">
                <h2 class="text-2xl font-extrabold mb-6">"Create a New Template"</h2>

                <Show when=move || show_success.get()>
                    <div role="alert" class="alert alert-success mb-4">
                        <span>"Template created successfully!"</span>
                    </div>
                </Show>

                {move || templates.with(|s| s.error.clone()).map(|message| {
                    let retry = retry.clone();
                    view! {
                        <ErrorMessage message=message on_retry=Callback::new(move |_| retry()) on_dismiss=dismiss />
                    }
                })}

                <form on:submit=on_submit class="card bg-base-100 shadow card-body space-y-4">
                    <div class="form-control">
                        <label class="label" for="title">
                            <span class="label-text">"Title"</span>
                        </label>
                        <input
                            id="title"
                            name="title"
                            type="text"
                            required
                            placeholder="Enter a title"
                            class="input input-bordered"
                            prop:value=form.title
                            on:input=move |ev| form.title.set(event_target_value(&ev))
                        />
                    </div>

                    <div class="form-control">
                        <label class="label" for="description">
                            <span class="label-text">"Description"</span>
                        </label>
                        <textarea
                            id="description"
                            name="description"
                            placeholder="Enter a description"
                            class="textarea textarea-bordered"
                            prop:value=form.description
                            on:input=move |ev| form.description.set(event_target_value(&ev))
                        ></textarea>
                    </div>

                    <div class="form-control">
                        <label class="label" for="image">
                            <span class="label-text">"Upload Image"</span>
                        </label>
                        <input
                            id="image"
                            name="image"
                            type="file"
                            accept="image/*"
                            class="file-input file-input-bordered"
                            node_ref=file_input
                            on:change=on_file_change
                        />
                        <Show when=move || file_error.get().is_some()>
                            <span class="text-error text-sm mt-1">{move || file_error.get().unwrap_or_default()}</span>
                        </Show>
                    </div>

                    <div>
                        <button type="submit" class="btn btn-primary" disabled=move || !can_submit()>
                            {move || if loading() {
                                view! { <Loading size=SpinnerSize::Small text="" /> }.into_any()
                            } else {
                                "Create Template".into_any()
                            }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
