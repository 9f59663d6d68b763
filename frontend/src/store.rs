//! 信号化的状态容器
//!
//! 用 `RwSignal` 承载核心库的 reducer 状态，视图通过 `with` 订阅，
//! 异步 action 通过 `Dispatch` 写入。

use leptos::prelude::*;
use templateshare::store::{Dispatch, Reducer, RequestScope, TemplateState};

pub struct SignalStore<S: Send + Sync + 'static>(RwSignal<S>);

impl<S: Send + Sync + 'static> Clone for SignalStore<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Send + Sync + 'static> Copy for SignalStore<S> {}

impl<S: Send + Sync + 'static> SignalStore<S> {
    pub fn new(initial: S) -> Self {
        Self(RwSignal::new(initial))
    }

    /// 读取状态并订阅变化
    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        self.0.with(f)
    }

    pub fn with_untracked<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        self.0.with_untracked(f)
    }
}

impl<S: Reducer + Send + Sync + 'static> Dispatch<S::Action> for SignalStore<S> {
    fn dispatch(&self, action: S::Action) {
        self.0.update(|state| state.reduce(action));
    }
}

pub type TemplateStore = SignalStore<TemplateState>;

pub fn provide_template_store() -> TemplateStore {
    let store = SignalStore::new(TemplateState::default());
    provide_context(store);
    store
}

pub fn use_templates() -> TemplateStore {
    use_context::<TemplateStore>().expect("TemplateStore should be provided")
}

/// 与当前组件生命周期绑定的请求作用域，组件卸载时取消
pub fn use_request_scope() -> RequestScope {
    let scope = RequestScope::new();
    let handle = scope.clone();
    on_cleanup(move || handle.cancel());
    scope
}
