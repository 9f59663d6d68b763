use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinnerSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl SpinnerSize {
    fn class(&self) -> &'static str {
        match self {
            SpinnerSize::Small => "loading loading-spinner loading-sm",
            SpinnerSize::Medium => "loading loading-spinner loading-md text-primary",
            SpinnerSize::Large => "loading loading-spinner loading-lg text-primary",
        }
    }
}

/// 加载指示器
#[component]
pub fn Loading(
    #[prop(optional)] size: SpinnerSize,
    /// 为空时只显示转圈
    #[prop(into, default = "Loading...".to_string())]
    text: String,
) -> impl IntoView {
    let show_text = !text.is_empty();
    view! {
        <div class="flex flex-col items-center justify-center py-8">
            <span class=size.class()></span>
            <Show when=move || show_text>
                <p class="mt-2 text-sm text-base-content/70">{text.clone()}</p>
            </Show>
        </div>
    }
}
