use crate::auth::use_auth;
use crate::web::router::Link;
use leptos::prelude::*;
use templateshare::route::AppRoute;

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();
    let is_authenticated = move || auth.with(|s| s.is_authenticated);

    view! {
        <div class="hero min-h-[70vh]">
            <div class="hero-content text-center">
                <div class="max-w-xl">
                    <h1 class="text-5xl font-bold">"TemplateShare"</h1>
                    <p class="py-6 text-base-content/70">
                        "Browse a curated collection of premium design templates. "
                        "Sign in to explore the catalogue."
                    </p>
                    <Show
                        when=is_authenticated
                        fallback=|| view! {
                            <div class="flex justify-center gap-4">
                                <Link to=AppRoute::Register class="btn btn-primary">"Get started"</Link>
                                <Link to=AppRoute::Login class="btn btn-outline">"Sign in"</Link>
                            </div>
                        }
                    >
                        <Link to=AppRoute::Templates class="btn btn-primary">"Browse templates"</Link>
                    </Show>
                </div>
            </div>
        </div>
    }
}
