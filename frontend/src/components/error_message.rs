use leptos::prelude::*;

/// 错误提示，可选"重试"与"关闭"
#[component]
pub fn ErrorMessage(
    #[prop(into)] message: Signal<String>,
    #[prop(optional)] on_retry: Option<Callback<()>>,
    #[prop(optional)] on_dismiss: Option<Callback<()>>,
) -> impl IntoView {
    view! {
        <div role="alert" class="alert alert-error mb-6">
            <svg xmlns="http://www.w3.org/2000/svg" class="stroke-current shrink-0 h-6 w-6" fill="none" viewBox="0 0 24 24"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M10 14l2-2m0 0l2-2m-2 2l-2-2m2 2l2 2m7-2a9 9 0 11-18 0 9 9 0 0118 0z" /></svg>
            <span>{move || message.get()}</span>
            <div class="flex gap-2">
                {on_retry.map(|cb| view! {
                    <button class="btn btn-sm" on:click=move |_| cb.run(())>"Try again"</button>
                })}
                {on_dismiss.map(|cb| view! {
                    <button class="btn btn-sm btn-ghost" on:click=move |_| cb.run(())>"Dismiss"</button>
                })}
            </div>
        </div>
    }
}
