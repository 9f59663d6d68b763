//! 认证模块
//!
//! 管理用户认证状态，与路由系统解耦。
//! 路由服务通过注入的 `Viewer` 信号来检查认证状态与角色。

use crate::store::SignalStore;
use crate::web::BrowserStorage;
use leptos::prelude::*;
use templateshare::route::Viewer;
use templateshare::session::load_session;
use templateshare::store::actions;
use templateshare::store::{AuthAction, AuthState, Dispatch};

pub type AuthStore = SignalStore<AuthState>;

/// 创建认证上下文，并从 LocalStorage 恢复上次的会话
pub fn provide_auth() -> AuthStore {
    let store = SignalStore::new(AuthState::default());
    store.dispatch(AuthAction::Restore(load_session(&BrowserStorage)));
    if store.with_untracked(|s| s.is_authenticated) {
        log::info!("[Auth] Session restored from storage.");
    }
    provide_context(store);
    store
}

/// 从 Context 获取认证状态
pub fn use_auth() -> AuthStore {
    use_context::<AuthStore>().expect("AuthStore should be provided")
}

/// 路由守卫所需的当前用户信号
pub fn viewer_signal(store: AuthStore) -> Signal<Viewer> {
    Signal::derive(move || store.with(AuthState::viewer))
}

/// 注销并清除状态
///
/// 导航由调用方决定；停留在受保护页面时路由服务会自动重定向。
pub fn logout(store: AuthStore) {
    actions::logout(&BrowserStorage, &store);
}
