use crate::api::use_api;
use crate::components::error_message::ErrorMessage;
use crate::components::loading::{Loading, SpinnerSize};
use crate::store::{use_request_scope, use_templates};
use crate::web::detection;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;
use templateshare::ClientConfig;
use templateshare::route::AppRoute;
use templateshare::shared::Template;
use templateshare::store::actions;

#[component]
pub fn TemplateCard(template: Template, #[prop(into)] on_download: Callback<()>) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow-sm border border-base-300 overflow-hidden">
            <figure>
                <img
                    src=template.image_url.unwrap_or_default()
                    alt=template.title.clone()
                    class="w-full h-48 object-cover"
                />
            </figure>
            <div class="card-body p-4">
                <h5 class="card-title text-lg">{template.title}</h5>
                <p class="text-sm text-base-content/70">{template.description}</p>
                <button class="btn btn-primary btn-sm mt-4 w-full" on:click=move |_| on_download.run(())>
                    "Download"
                </button>
            </div>
        </div>
    }
}

#[component]
pub fn TemplateListPage() -> impl IntoView {
    let templates = use_templates();
    let api = use_api();
    let router = use_router();
    let scope = use_request_scope();
    let config = use_context::<ClientConfig>().unwrap_or_default();

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

    // 初始加载
    load();

    // 截屏检测：随本页面卸载一起移除
    let capture = detection::install(config.detection, move |_| router.navigate_to(AppRoute::Payment));
    let _capture = StoredValue::new_local(capture);

    let go_to_payment = Callback::new(move |_: ()| router.navigate_to(AppRoute::Payment));

    view! {
        <div class="py-8">
            <div class="max-w-5xl mx-auto px-4 sm:px-6 lg:px-8">
                <h2 class="text-2xl font-extrabold mb-6">"Available Templates"</h2>

                <Show when=move || templates.with(|s| s.loading)>
                    <Loading size=SpinnerSize::Large />
                </Show>

                {move || templates.with(|s| s.error.clone()).map(|message| {
                    let load = load.clone();
                    view! {
                        <ErrorMessage message=message on_retry=Callback::new(move |_| load()) />
                    }
                })}

                <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6">
                    <For
                        each=move || templates.with(|s| s.templates.clone())
                        key=|t: &Template| t.id.clone()
                        children=move |template| view! {
                            <TemplateCard template=template on_download=go_to_payment />
                        }
                    />
                </div>
            </div>
        </div>
    }
}
