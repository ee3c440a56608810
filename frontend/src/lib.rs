//! 诊所管理后台前端
//!
//! 采用 Context-Driven 的架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 认证状态管理
//! - `hooks`: 查询与变更接到信号上
//! - `components`: UI 组件层

mod auth;
mod hooks;
mod logging;
mod toast;
mod components {
    pub mod badges;
    pub mod dialog;
    pub mod forms;
    pub mod layout;
    pub mod loading;
    pub mod protected;
    pub mod pages {
        pub mod appointments;
        pub mod booking;
        pub mod dashboard;
        pub mod login;
        pub mod patients;
        pub mod profile;
        pub mod register;
        pub mod reports;
        pub mod users;
    }
}

pub use logging::init as init_logging;

use std::rc::Rc;

use clinic_admin::guard::GuardRule;
use clinic_admin::runtime::SystemClock;
use clinic_admin::{ClientConfig, Platform, Services};
use leptos::prelude::*;

use crate::auth::{AuthContext, init_auth};
use crate::components::layout::MainLayout;
use crate::components::pages::appointments::AppointmentsPage;
use crate::components::pages::booking::BookingPage;
use crate::components::pages::dashboard::DashboardPage;
use crate::components::pages::login::LoginPage;
use crate::components::pages::patients::PatientsPage;
use crate::components::pages::profile::ProfilePage;
use crate::components::pages::register::RegisterPage;
use crate::components::pages::reports::ReportsPage;
use crate::components::pages::users::UsersPage;
use crate::components::protected::ProtectedRoute;
use crate::toast::{ToastNotifier, Toaster};

// 原生 Web API 封装模块
// 对浏览器原生 API 的轻量级封装，实现核心库注入的各个特性。
pub(crate) mod web {
    mod file;
    mod http;
    pub mod route;
    pub mod router;
    mod storage;
    mod timer;

    pub use file::{read_multipart, selected_file};
    pub use http::BrowserHttpClient;
    pub use router::BrowserNavigator;
    pub use storage::BrowserStorage;
    pub use timer::{BrowserTimer, Interval};
}

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};
use web::{BrowserHttpClient, BrowserNavigator, BrowserStorage, BrowserTimer};

/// 编译期注入的配置变量
fn build_time_var(name: &str) -> Option<String> {
    let value = match name {
        clinic_admin::config::VAR_API_URL => option_env!("CLINIC_API_URL"),
        clinic_admin::config::VAR_REQUEST_TIMEOUT_SECS => option_env!("CLINIC_REQUEST_TIMEOUT_SECS"),
        clinic_admin::config::VAR_STALE_TIME_SECS => option_env!("CLINIC_STALE_TIME_SECS"),
        clinic_admin::config::VAR_QUERY_RETRIES => option_env!("CLINIC_QUERY_RETRIES"),
        _ => None,
    };
    value.map(str::to_string)
}

/// 带布局与角色守卫的页面
fn guarded(route: AppRoute, page: fn() -> AnyView) -> AnyView {
    let rule = GuardRule::roles(route.required_roles());
    view! {
        <MainLayout route=route>
            <ProtectedRoute rule=rule page=page />
        </MainLayout>
    }
    .into_any()
}

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Dashboard => guarded(route, || view! { <DashboardPage /> }.into_any()),
        AppRoute::Profile => guarded(route, || view! { <ProfilePage /> }.into_any()),
        AppRoute::Patients => guarded(route, || view! { <PatientsPage /> }.into_any()),
        AppRoute::Appointments => guarded(route, || view! { <AppointmentsPage /> }.into_any()),
        AppRoute::Users => guarded(route, || view! { <UsersPage /> }.into_any()),
        AppRoute::Reports => guarded(route, || view! { <ReportsPage /> }.into_any()),
        AppRoute::BookAppointment => guarded(route, || view! { <BookingPage /> }.into_any()),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 组装核心服务
    let toasts = ToastNotifier::new();
    let config = ClientConfig::from_lookup(build_time_var);
    let services = Services::new(
        config,
        BrowserStorage,
        Platform {
            http: Rc::new(BrowserHttpClient),
            navigator: Rc::new(BrowserNavigator),
            timer: Rc::new(BrowserTimer),
            clock: Rc::new(SystemClock),
            notifier: Rc::new(toasts),
        },
    );
    provide_context(toasts);

    // 2. 创建认证上下文并初始化（令牌来自 localStorage）
    let auth_ctx = AuthContext::new(StoredValue::new_local(services));
    provide_context(auth_ctx);
    init_auth(&auth_ctx);

    // 3. 只把“是否持有令牌”注入路由服务
    let signed_in = auth_ctx.signed_in_signal();

    view! {
        <Router signed_in=signed_in>
            <RouterOutlet matcher=route_matcher />
        </Router>
        <Toaster notifier=toasts />
    }
}
