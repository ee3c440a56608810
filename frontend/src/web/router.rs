//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 角色守卫不在这里做，由 `ProtectedRoute` 在渲染时判断。

use clinic_admin::Navigator;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::AppRoute;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 整页跳转
///
/// 认证失效时由核心库调用，页面会重新加载，所有内存状态随之丢弃。
#[derive(Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn redirect(&self, path: &str) {
        tracing::info!(%path, "hard redirect");
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(path);
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 只注入“是否持有令牌”的信号，与认证系统解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    signed_in: Signal<bool>,
}

impl RouterService {
    fn new(signed_in: Signal<bool>) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            signed_in,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 导航（pushState）
    pub fn navigate(&self, path: &str) {
        self.go(AppRoute::from_path(path), true);
    }

    /// 重定向（replaceState），后退键不会回到当前页
    pub fn replace(&self, path: &str) {
        self.go(AppRoute::from_path(path), false);
    }

    fn go(&self, target_route: AppRoute, use_push: bool) {
        let target_route = if target_route.should_redirect_when_authenticated()
            && self.signed_in.get_untracked()
        {
            tracing::debug!(from = %target_route, "already signed in");
            AppRoute::auth_success_redirect()
        } else {
            target_route
        };

        // 已在目标页时不再写历史、不再触发重新渲染
        if self.current_route.get_untracked() == target_route {
            return;
        }

        if use_push {
            push_history_state(target_route.to_path());
        } else {
            replace_history_state(target_route.to_path());
        }
        self.set_route.set(target_route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;

        let closure = Closure::<dyn Fn()>::new(move || {
            set_route.set(AppRoute::from_path(&current_path()));
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 登录后离开登录/注册页
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let signed_in = self.signed_in;

        Effect::new(move |_| {
            if signed_in.get() && current_route.get_untracked().should_redirect_when_authenticated()
            {
                let redirect = AppRoute::auth_success_redirect();
                push_history_state(redirect.to_path());
                set_route.set(redirect);
                tracing::debug!("signed in, leaving auth page");
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(signed_in: Signal<bool>) -> RouterService {
    let router = RouterService::new(signed_in);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
#[component]
pub fn Router(
    /// 是否持有令牌
    signed_in: Signal<bool>,
    children: Children,
) -> impl IntoView {
    provide_router(signed_in);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接，拦截点击改走 pushState
#[component]
pub fn Link(
    #[prop(into)] to: String,
    class: Signal<String>,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
