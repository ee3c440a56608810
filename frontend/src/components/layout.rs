//! 主布局：侧边导航、欢迎栏、时钟与登出

use chrono::{FixedOffset, Utc};
use clinic_shared::display::role_label;
use leptos::prelude::*;

use crate::auth::{logout, use_auth};
use crate::components::badges::ApiStatusIndicator;
use crate::web::Interval;
use crate::web::route::AppRoute;
use crate::web::router::Link;

/// Asia/Dhaka，全年 UTC+6
const CLINIC_UTC_OFFSET_SECS: i32 = 6 * 3600;

#[component]
pub fn MainLayout(route: AppRoute, children: Children) -> impl IntoView {
    let auth = use_auth();
    let current = route.to_path();

    let on_logout = move |_| logout(&auth);

    let nav = move || {
        auth.state
            .get()
            .navigation()
            .into_iter()
            .map(|item| {
                let class = if item.path == current {
                    "active font-semibold"
                } else {
                    ""
                };
                view! {
                    <li>
                        <Link to=item.path class=Signal::derive(move || class.to_string())>
                            {item.label}
                        </Link>
                    </li>
                }
            })
            .collect_view()
    };

    let greeting = move || {
        let state = auth.state.get();
        match state.user() {
            Some(user) => format!("Welcome {} ({})", user.full_name, role_label(user.user_type)),
            None => "Welcome User".to_string(),
        }
    };

    view! {
        <div class="drawer lg:drawer-open min-h-screen bg-base-200">
            <input id="nav-drawer" type="checkbox" class="drawer-toggle" />
            <div class="drawer-content flex flex-col">
                <header class="navbar bg-base-100 shadow-sm px-4 gap-4">
                    <label for="nav-drawer" class="btn btn-square btn-ghost lg:hidden">"☰"</label>
                    <div class="flex-1 flex flex-col md:flex-row md:items-center md:gap-4">
                        <span class="font-semibold">{greeting}</span>
                        <span class="text-sm text-base-content/60"><LiveClock /></span>
                    </div>
                    <div class="flex-none flex items-center gap-4">
                        <ApiStatusIndicator />
                        <Link to="/Profile" class=Signal::derive(|| "btn btn-ghost btn-sm".to_string())>
                            "View Profile"
                        </Link>
                        <button class="btn btn-outline btn-error btn-sm" on:click=on_logout>
                            "Logout"
                        </button>
                    </div>
                </header>
                <main class="p-4 md:p-8">{children()}</main>
            </div>
            <div class="drawer-side">
                <label for="nav-drawer" class="drawer-overlay"></label>
                <aside class="w-60 min-h-full bg-base-100 border-r border-base-300">
                    <div class="p-4 text-xl font-bold text-primary">"Admin Panel"</div>
                    <ul class="menu p-2 gap-1">{nav}</ul>
                </aside>
            </div>
        </div>
    }
}

/// 每秒刷新的诊所本地时间
#[component]
fn LiveClock() -> impl IntoView {
    let now = RwSignal::new(Utc::now());
    let interval = Interval::new(1000, move || {
        now.try_set(Utc::now());
    });
    // 随组件一起释放，drop 时清除定时器
    StoredValue::new_local(interval);

    let text = move || {
        let offset = FixedOffset::east_opt(CLINIC_UTC_OFFSET_SECS);
        match offset {
            Some(offset) => {
                let local = now.get().with_timezone(&offset);
                format!(
                    "{} | {}",
                    local.format("%A, %-d %B %Y"),
                    local.format("%I:%M:%S %p")
                )
            }
            None => String::new(),
        }
    };

    view! { <span>{text}</span> }
}
