//! 定时器封装模块
//!
//! `Interval` 直接封装 `setInterval`；一次性的异步等待交给 `gloo-timers`。

use std::time::Duration;

use clinic_admin::Timer;
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::prelude::*;

/// 周期性定时器
///
/// 封装 `setInterval` API。当 `Interval` 被 drop 时，自动清除定时器。
pub struct Interval {
    handle: i32,
    #[allow(dead_code)]
    closure: Closure<dyn Fn()>,
}

impl Interval {
    /// 创建新的周期性定时器
    ///
    /// 无法获取 window 或注册失败时返回 `None`。
    pub fn new<F>(millis: u32, callback: F) -> Option<Self>
    where
        F: Fn() + 'static,
    {
        let closure = Closure::<dyn Fn()>::new(callback);
        let window = web_sys::window()?;

        let handle = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                millis as i32,
            )
            .ok()?;

        Some(Self { handle, closure })
    }

    pub fn cancel(&self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.handle);
        }
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// 基于 `setTimeout` 的异步等待，用于请求超时与重试退避
#[derive(Default)]
pub struct BrowserTimer;

#[async_trait::async_trait(?Send)]
impl Timer for BrowserTimer {
    async fn sleep(&self, duration: Duration) {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        TimeoutFuture::new(millis).await;
    }
}
