use clinic_admin::query::keys;
use clinic_admin::{QueryOptions, RetryPolicy};
use clinic_shared::AppointmentStatus;
use clinic_shared::display::{ApiStatus, status_badge};
use leptos::prelude::*;

use crate::hooks::use_api_query;

#[component]
pub fn StatusBadge(status: AppointmentStatus) -> impl IntoView {
    let badge = status_badge(status);
    view! { <span class=badge.class()>{badge.label.clone()}</span> }
}

/// 后端连接状态，基于 `/health` 探测
#[component]
pub fn ApiStatusIndicator() -> impl IntoView {
    let health = use_api_query(
        keys::health,
        || QueryOptions::default().retry(RetryPolicy::Never),
        |api| async move { api.health().await },
    );

    let status = move || ApiStatus::from_flags(health.is_loading(), health.is_error());

    view! {
        <div class="flex items-center gap-2 text-sm">
            <span class="text-base-content/70">"API"</span>
            <span class=move || status().class()>{move || status().label()}</span>
        </div>
    }
}
