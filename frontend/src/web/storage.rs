//! 本地存储模块
//!
//! `KeyValueStore` 抽象出键值存储接口，凭据读写只依赖该接口；
//! `LocalStorage` 是基于 `web_sys::Storage` 的浏览器实现。

/// 键值存储接口
pub trait KeyValueStore {
    /// 获取存储的字符串值，键不存在或出错时返回 None
    fn get(&self, key: &str) -> Option<String>;
    /// 设置存储值，返回是否成功
    fn set(&self, key: &str, value: &str) -> bool;
    /// 删除键值对，返回是否成功
    fn delete(&self, key: &str) -> bool;
}

/// 浏览器 LocalStorage
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    fn delete(&self, key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

#[cfg(test)]
pub mod memory {
    use super::KeyValueStore;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory store for tests
    #[derive(Default)]
    pub struct MemoryStorage {
        entries: RefCell<HashMap<String, String>>,
    }

    impl KeyValueStore for MemoryStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.entries.borrow().get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) -> bool {
            self.entries
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            true
        }

        fn delete(&self, key: &str) -> bool {
            self.entries.borrow_mut().remove(key);
            true
        }
    }
}
