//! 受保护路由
//!
//! 每次认证状态变化时重新调用 `guard::evaluate`，按结果渲染页面、
//! 加载占位或“无权访问”面板。

use std::time::Duration;

use clinic_admin::guard::{self, GuardDecision, GuardRule};
use leptos::prelude::*;

use crate::auth::use_auth;
use crate::components::loading::LoadingPage;
use crate::web::router::use_router;

/// “无权访问”面板停留时间
const FORBIDDEN_REDIRECT_DELAY: Duration = Duration::from_millis(1500);

#[component]
pub fn ProtectedRoute(rule: GuardRule, page: fn() -> AnyView) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let decision = Memo::new(move |_| guard::evaluate(&auth.state.get(), &rule));

    Effect::new(move |_| match decision.get() {
        GuardDecision::Unauthenticated { redirect } => router.replace(&redirect),
        GuardDecision::Forbidden { fallback, .. } => {
            let here = router.current_route().get_untracked();
            set_timeout(
                move || {
                    // 期间用户已自行离开则不再跳转
                    if router.current_route().try_get_untracked() == Some(here) {
                        router.replace(&fallback);
                    }
                },
                FORBIDDEN_REDIRECT_DELAY,
            );
        }
        GuardDecision::Loading | GuardDecision::Allowed => {}
    });

    move || match decision.get() {
        GuardDecision::Loading | GuardDecision::Unauthenticated { .. } => {
            view! { <LoadingPage /> }.into_any()
        }
        GuardDecision::Forbidden {
            required, actual, ..
        } => view! {
            <AccessDenied
                required=GuardDecision::required_label(&required)
                actual=actual.as_str()
            />
        }
        .into_any(),
        GuardDecision::Allowed => page(),
    }
}

#[component]
fn AccessDenied(required: String, actual: &'static str) -> impl IntoView {
    view! {
        <div class="min-h-[60vh] flex items-center justify-center p-4">
            <div class="card w-full max-w-md bg-base-100 shadow-xl">
                <div class="card-body items-center text-center">
                    <div class="text-error text-5xl">"!"</div>
                    <h2 class="card-title">"Access Denied"</h2>
                    <p class="text-base-content/70">
                        "You don't have permission to access this page."
                    </p>
                    <p class="text-sm text-base-content/60">"Required role: " {required}</p>
                    <p class="text-sm text-base-content/60">"Your role: " {actual}</p>
                </div>
            </div>
        </div>
    }
}
