//! 远程数据 Hook
//!
//! 把核心库的 `QueryClient` 接到 Leptos 信号上。缓存、重试、去重与错误提示
//! 都在核心库里完成，这里只负责在键变化或缓存失效时重新发起查询。

use std::future::Future;
use std::rc::Rc;

use clinic_admin::query::Subscription;
use clinic_admin::{ApiClient, ApiError, ApiResult, MutationOptions, QueryKey, QueryOptions, QueryState};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;

// =========================================================
// 查询
// =========================================================

pub struct QueryHandle<T: 'static> {
    state: RwSignal<QueryState<T>, LocalStorage>,
}

impl<T> Clone for QueryHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for QueryHandle<T> {}

impl<T: 'static> QueryHandle<T> {
    pub fn data(&self) -> Option<Rc<T>> {
        self.state.with(|s| s.data.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.state.with(|s| s.is_loading)
    }

    pub fn error(&self) -> Option<ApiError> {
        self.state.with(|s| s.error.clone())
    }

    pub fn is_error(&self) -> bool {
        self.state.with(QueryState::is_error)
    }
}

/// 订阅一个查询
///
/// `key` 与 `options` 是响应式闭包，其中读取的信号变化时会按新键重新查询；
/// 缓存中该键被标记失效时同样重新查询。
pub fn use_api_query<T, K, O, F, Fut>(key: K, options: O, fetch: F) -> QueryHandle<T>
where
    T: 'static,
    K: Fn() -> QueryKey + 'static,
    O: Fn() -> QueryOptions + 'static,
    F: Fn(ApiClient) -> Fut + Clone + 'static,
    Fut: Future<Output = ApiResult<T>> + 'static,
{
    let services = use_auth().services();
    let state = RwSignal::new_local(QueryState::<T>::loading(None));
    let invalidated = Trigger::new();
    let subscription = StoredValue::new_local(None::<Subscription>);
    let generation = StoredValue::new_local(0u64);

    Effect::new(move |_| {
        invalidated.track();
        let key = key();
        let options = options();

        subscription.set_value(Some(
            services
                .queries
                .subscribe(key.clone(), move || invalidated.notify()),
        ));

        if !options.enabled {
            state.set(QueryState {
                data: services.queries.peek(&key),
                ..QueryState::default()
            });
            return;
        }

        // 新鲜缓存直接展示，不经过加载态
        let stale_time = options
            .stale_time
            .unwrap_or(services.api.config().stale_time);
        if services.queries.is_fresh(&key, stale_time) {
            if let Some(data) = services.queries.peek::<T>(&key) {
                state.set(QueryState {
                    data: Some(data),
                    ..QueryState::default()
                });
                return;
            }
        }

        let ticket = generation.get_value() + 1;
        generation.set_value(ticket);
        state.update(|s| *s = QueryState::loading(s.data.take()));

        let queries = services.queries.clone();
        let api = services.api.clone();
        let fetch = fetch.clone();
        spawn_local(async move {
            let result = queries
                .query(key, &options, move || fetch(api.clone()))
                .await;
            // 只保留最后一次发起的查询结果
            if generation.try_get_value() == Some(ticket) {
                state.try_set(result);
            }
        });
    });

    QueryHandle { state }
}

// =========================================================
// 变更
// =========================================================

pub struct MutationHandle<I: 'static> {
    pending: RwSignal<bool>,
    run: StoredValue<Rc<dyn Fn(I)>, LocalStorage>,
}

impl<I> Clone for MutationHandle<I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I> Copy for MutationHandle<I> {}

impl<I: 'static> MutationHandle<I> {
    pub fn mutate(&self, input: I) {
        if let Some(run) = self.run.try_get_value() {
            run(input);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }
}

/// 创建一个变更
///
/// `options` 每次执行时重新构造，回调里可以放心捕获信号。
pub fn use_api_mutation<I, T, O, F, Fut>(options: O, mutation: F) -> MutationHandle<I>
where
    I: 'static,
    T: 'static,
    O: Fn() -> MutationOptions<T> + 'static,
    F: Fn(ApiClient, I) -> Fut + 'static,
    Fut: Future<Output = ApiResult<T>> + 'static,
{
    let services = use_auth().services();
    let pending = RwSignal::new(false);
    let options = Rc::new(options);
    let mutation = Rc::new(mutation);

    let run: Rc<dyn Fn(I)> = Rc::new(move |input: I| {
        let services = services.clone();
        let options = options.clone();
        let mutation = mutation.clone();
        pending.set(true);
        spawn_local(async move {
            let run = mutation(services.api.clone(), input);
            // 成功与失败的提示、失效与回调都已在 mutate 中处理
            let _ = services.queries.mutate(&options(), run).await;
            pending.try_set(false);
        });
    });

    MutationHandle {
        pending,
        run: StoredValue::new_local(run),
    }
}
