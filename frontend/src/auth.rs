//! 认证模块
//!
//! 把核心库的 `Session` 与当前用户查询接到信号上。
//! 路由服务只拿到“是否持有令牌”的派生信号，与这里解耦。

use clinic_admin::query::keys;
use clinic_admin::{ApiResult, AuthState, MutationOptions, ProfileState, Services};
use clinic_shared::{LoginRequest, TokenResponse};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 认证上下文
///
/// `state` 每次由令牌与资料重新推导，不单独保存。
#[derive(Clone, Copy)]
pub struct AuthContext {
    services: StoredValue<Services, LocalStorage>,
    token: RwSignal<Option<String>>,
    profile: RwSignal<ProfileState>,
    pub state: Memo<AuthState>,
}

impl AuthContext {
    pub fn new(services: StoredValue<Services, LocalStorage>) -> Self {
        let token = RwSignal::new(services.with_value(|s| s.session().token()));
        let profile = RwSignal::new(ProfileState::Pending);
        let state = Memo::new(move |_| AuthState::new(token.get().is_some(), profile.get()));

        Self {
            services,
            token,
            profile,
            state,
        }
    }

    /// 是否持有令牌（用于路由服务注入）
    pub fn signed_in_signal(&self) -> Signal<bool> {
        let token = self.token;
        Signal::derive(move || token.with(Option::is_some))
    }

    pub fn services(&self) -> Services {
        self.services.get_value()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态
///
/// 会话变化同步到 `token` 信号；令牌变化或 `currentUser` 失效时重新拉取资料。
pub fn init_auth(ctx: &AuthContext) {
    let token = ctx.token;
    let profile = ctx.profile;
    let services = ctx.services;

    services.with_value(|s| {
        s.session().on_change(move |value| {
            token.try_set(value.map(str::to_string));
        });
    });

    let reload = Trigger::new();
    let subscription = services.with_value(|s| {
        s.queries
            .subscribe(keys::current_user(), move || reload.notify())
    });
    // 与应用同生命周期
    StoredValue::new_local(subscription);

    Effect::new(move |previous: Option<Option<String>>| {
        reload.track();
        let current = token.get();

        let Some(current_token) = current.clone() else {
            profile.set(ProfileState::Pending);
            return current;
        };
        // 换了令牌才回到加载态；资料刷新时保留旧值
        if previous.as_ref() != Some(&current) {
            profile.set(ProfileState::Pending);
        }

        let services = services.get_value();
        spawn_local(async move {
            // 失败时核心库会结束会话，令牌信号随之清空
            let loaded = services.load_profile(&current_token).await;

            // 期间令牌已变（登出、失败清除或重新登录），结果作废
            if token.get_untracked().as_deref() != Some(current_token.as_str()) {
                return;
            }
            profile.try_set(loaded);
        });

        current
    });
}

/// 登录；失败时错误提示由查询客户端统一发出
pub async fn login(ctx: &AuthContext, email: String, password: String) -> ApiResult<TokenResponse> {
    let services = ctx.services();
    let credentials = LoginRequest { email, password };
    services
        .queries
        .mutate(
            &MutationOptions::default(),
            services.api.login(&credentials),
        )
        .await
}

/// 注销：清空缓存与令牌，整页跳回登录页
pub fn logout(ctx: &AuthContext) {
    ctx.services.with_value(Services::logout);
}
