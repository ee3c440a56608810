//! Toast 通知
//!
//! 核心库通过 `Notifier` 发出通知，这里把它们放进信号并渲染在右下角。

use std::time::Duration;

use clinic_admin::{Notification, Notifier};
use leptos::prelude::*;

/// 自动关闭时间
const TOAST_LIFETIME: Duration = Duration::from_secs(5);

#[derive(Clone, Copy)]
pub struct ToastNotifier {
    toasts: RwSignal<Vec<Notification>>,
}

impl ToastNotifier {
    pub fn new() -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
        }
    }

    pub fn dismiss(&self, id: uuid::Uuid) {
        self.toasts.try_update(|list| list.retain(|t| t.id != id));
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, notification: Notification) {
        let id = notification.id;
        self.toasts.try_update(|list| list.push(notification));

        let this = *self;
        set_timeout(move || this.dismiss(id), TOAST_LIFETIME);
    }
}

/// 页面内的表单校验提示也走同一个 toast 通道
pub fn use_toasts() -> ToastNotifier {
    use_context::<ToastNotifier>().expect("ToastNotifier should be provided")
}

#[component]
pub fn Toaster(notifier: ToastNotifier) -> impl IntoView {
    view! {
        <div class="toast toast-end z-50">
            <For
                each=move || notifier.toasts.get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    let class = if toast.is_error() {
                        "alert alert-error shadow-lg"
                    } else {
                        "alert alert-success shadow-lg"
                    };
                    view! {
                        <div class=class role="alert">
                            <div>
                                <h3 class="font-bold">{toast.title}</h3>
                                <div class="text-sm">{toast.description}</div>
                            </div>
                            <button
                                class="btn btn-sm btn-ghost"
                                on:click=move |_| notifier.dismiss(id)
                            >
                                "✕"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
