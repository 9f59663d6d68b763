//! 会话持久化
//!
//! 浏览器中由 localStorage 实现，测试中由 `MemoryStorage` 实现。
//! 只使用两个键：`token` 与 `user`（JSON）。

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use templateshare_shared::{STORAGE_TOKEN_KEY, STORAGE_USER_KEY, Session, User};

/// 键值存储抽象
///
/// 与 localStorage 的语义一致：写入失败不会报错，只返回 `false`。
pub trait SessionStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> bool;
    fn delete(&self, key: &str) -> bool;
}

/// 读取持久化的 token
pub fn stored_token<S: SessionStorage + ?Sized>(storage: &S) -> Option<String> {
    storage.get(STORAGE_TOKEN_KEY).filter(|t| !t.is_empty())
}

/// 读取完整会话；token 或 user 缺失、user 无法解析时返回 None
pub fn load_session<S: SessionStorage + ?Sized>(storage: &S) -> Option<Session> {
    let token = stored_token(storage)?;
    let raw_user = storage.get(STORAGE_USER_KEY)?;
    match serde_json::from_str::<User>(&raw_user) {
        Ok(user) => Some(Session { token, user }),
        Err(e) => {
            log::warn!("[Session] Discarding unreadable stored user: {}", e);
            None
        }
    }
}

pub fn persist_session<S: SessionStorage + ?Sized>(storage: &S, session: &Session) -> bool {
    let user = match serde_json::to_string(&session.user) {
        Ok(json) => json,
        Err(e) => {
            log::error!("[Session] Failed to serialize user: {}", e);
            return false;
        }
    };
    storage.set(STORAGE_TOKEN_KEY, &session.token) && storage.set(STORAGE_USER_KEY, &user)
}

/// 清除 token 与 user
pub fn clear_session<S: SessionStorage + ?Sized>(storage: &S) {
    storage.delete(STORAGE_TOKEN_KEY);
    storage.delete(STORAGE_USER_KEY);
}

/// 内存实现，克隆后共享同一份数据
#[derive(Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.borrow().contains_key(key)
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn delete(&self, key: &str) -> bool {
        self.items.borrow_mut().remove(key);
        true
    }
}
