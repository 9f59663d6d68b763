use crate::api::use_api;
use crate::components::error_message::ErrorMessage;
use crate::components::loading::Loading;
use crate::store::{use_request_scope, use_templates};
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use templateshare::route::AppRoute;
use templateshare::shared::Template;
use templateshare::shared::date::display_date;
use templateshare::store::{Dispatch, TemplateAction, actions};

fn confirm_delete(title: &str) -> bool {
    web_sys::window()
        .and_then(|w| {
            w.confirm_with_message(&format!("Delete \"{}\"? This cannot be undone.", title))
                .ok()
        })
        .unwrap_or(false)
}

#[component]
pub fn AdminTemplateListPage() -> impl IntoView {
    let templates = use_templates();
    let api = use_api();
    let scope = use_request_scope();

    let load = {
        let api = api.clone();
        let scope = scope.clone();
        move || {
            let api = api.clone();
            let scope = scope.clone();
            spawn_local(async move {
                actions::fetch_templates(&api, &templates, &scope).await;
            });
        }
    };
    load();

    let on_delete = Callback::new(move |template: Template| {
        if !confirm_delete(&template.title) {
            return;
        }
        let api = api.clone();
        let scope = scope.clone();
        spawn_local(async move {
            actions::delete_template(&api, &templates, &scope, &template.id).await;
        });
    });

    let dismiss = Callback::new(move |_: ()| templates.dispatch(TemplateAction::ClearError));

    view! {
        <div class="py-8">
            <div class="max-w-5xl mx-auto px-4 sm:px-6 lg:px-8">
                <div class="flex items-center justify-between mb-6">
                    <h2 class="text-2xl font-extrabold">"Manage Templates"</h2>
                    <Link to=AppRoute::AdminTemplateCreate class="btn btn-primary btn-sm">"New Template"</Link>
                </div>

                {move || templates.with(|s| s.error.clone()).map(|message| {
                    let load = load.clone();
                    view! {
                        <ErrorMessage message=message on_retry=Callback::new(move |_| load()) on_dismiss=dismiss />
                    }
                })}

                <Show
                    when=move || !templates.with(|s| s.loading && s.templates.is_empty())
                    fallback=|| view! { <Loading /> }
                >
                    <Show
                        when=move || templates.with(|s| !s.templates.is_empty())
                        fallback=|| view! {
                            <p class="text-base-content/70">"No templates yet."</p>
                        }
                    >
                        <div class="overflow-x-auto bg-base-100 rounded-box shadow">
                            <table class="table">
                                <thead>
                                    <tr>
                                        <th>"Preview"</th>
                                        <th>"Title"</th>
                                        <th>"Created"</th>
                                        <th></th>
                                    </tr>
                                </thead>
                                <tbody>
                                    <For
                                        each=move || templates.with(|s| s.templates.clone())
                                        key=|t: &Template| t.id.clone()
                                        children=move |template: Template| {
                                            let created = display_date(&template.created_at);
                                            let target = template.clone();
                                            view! {
                                                <tr>
                                                    <td>
                                                        <img
                                                            src=template.image_url.clone().unwrap_or_default()
                                                            alt=template.title.clone()
                                                            class="h-12 w-20 object-cover rounded"
                                                        />
                                                    </td>
                                                    <td>
                                                        <div class="font-bold">{template.title}</div>
                                                        <div class="text-sm opacity-60">{template.description}</div>
                                                    </td>
                                                    <td class="text-sm">{created}</td>
                                                    <td>
                                                        <button
                                                            class="btn btn-error btn-outline btn-xs"
                                                            disabled=move || templates.with(|s| s.loading)
                                                            on:click=move |_| on_delete.run(target.clone())
                                                        >
                                                            "Delete"
                                                        </button>
                                                    </td>
                                                </tr>
                                            }
                                        }
                                    />
                                </tbody>
                            </table>
                        </div>
                    </Show>
                </Show>
            </div>
        </div>
    }
}
