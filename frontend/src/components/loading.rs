use leptos::prelude::*;

/// 整页加载占位
#[component]
pub fn LoadingPage() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-[60vh]">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}

#[component]
pub fn Spinner(#[prop(optional)] label: &'static str) -> impl IntoView {
    view! {
        <div class="flex items-center justify-center gap-2 py-8 text-base-content/60">
            <span class="loading loading-spinner"></span>
            {label}
        </div>
    }
}
