use crate::auth::{logout, use_auth};
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use templateshare::route::AppRoute;

#[component]
pub fn Navbar() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let (menu_open, set_menu_open) = signal(false);

    let is_authenticated = move || auth.with(|s| s.is_authenticated);
    let is_admin = move || auth.with(|s| s.is_admin());
    let username = move || auth.with(|s| s.user.as_ref().map(|u| u.username.clone()).unwrap_or_default());

    let close_menu = Callback::new(move |_: ()| set_menu_open.set(false));

    let on_logout = move |_| {
        logout(auth);
        router.navigate_to(AppRoute::Home);
        set_menu_open.set(false);
    };

    // 桌面与移动端共用同一组链接，只是排布不同
    let links = move |vertical: bool| {
        let item = if vertical { "block px-3 py-2" } else { "btn btn-ghost btn-sm" };
        let primary = if vertical { "block px-3 py-2" } else { "btn btn-primary btn-sm" };
        view! {
            <Show
                when=is_authenticated
                fallback=move || view! {
                    <Link to=AppRoute::Login class=item on_navigate=close_menu>"Login"</Link>
                    <Link to=AppRoute::Register class=primary on_navigate=close_menu>"Register"</Link>
                }
            >
                <Link to=AppRoute::Templates class=item on_navigate=close_menu>"Templates"</Link>
                <Show when=is_admin>
                    <Link to=AppRoute::AdminTemplates class=item on_navigate=close_menu>"Manage Templates"</Link>
                    <Link to=AppRoute::AdminTemplateCreate class=primary on_navigate=close_menu>"Create Template"</Link>
                </Show>
                <span class="text-sm px-3">"Welcome, " {username}</span>
                <button class="btn btn-ghost btn-sm text-error" on:click=on_logout>"Logout"</button>
            </Show>
        }
    };

    view! {
        <nav class="navbar bg-base-100 shadow-lg sticky top-0 z-50">
            <div class="flex-1">
                <Link to=AppRoute::Home class="btn btn-ghost text-xl font-bold text-primary">"TemplateShare"</Link>
            </div>

            <div class="hidden md:flex flex-none items-center gap-2">{links(false)}</div>

            <div class="md:hidden flex-none">
                <button class="btn btn-square btn-ghost" on:click=move |_| set_menu_open.update(|open| *open = !*open)>
                    <svg class="h-6 w-6" stroke="currentColor" fill="none" viewBox="0 0 24 24">
                        <path
                            stroke-linecap="round"
                            stroke-linejoin="round"
                            stroke-width="2"
                            d=move || if menu_open.get() { "M6 18L18 6M6 6l12 12" } else { "M4 6h16M4 12h16M4 18h16" }
                        />
                    </svg>
                </button>
            </div>
        </nav>

        <Show when=move || menu_open.get()>
            <div class="md:hidden bg-base-100 border-t shadow px-2 pt-2 pb-3 space-y-1">{links(true)}</div>
        </Show>
    }
}
