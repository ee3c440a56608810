//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 实现核心库的 `TokenStorage` 特性。

use clinic_admin::TokenStorage;

/// 浏览器 LocalStorage
///
/// 不叫 `LocalStorage`，避免与 leptos prelude 中的同名标记类型冲突。
#[derive(Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl TokenStorage for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) {
        let stored = Self::storage().and_then(|s| s.set_item(key, value).ok());
        if stored.is_none() {
            tracing::warn!(key, "localStorage write failed");
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}
