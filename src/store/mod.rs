//! 状态容器
//!
//! 采用显式注入的 reducer 架构，没有全局单例：
//! - `Reducer`: 纯函数式的状态迁移
//! - `Dispatch`: 分发 action 的能力，宿主可以用任意容器实现
//!   （本地测试用 `Store`，前端用 Leptos 信号包装）
//! - `actions`: 异步 action，遵循 pending -> fulfilled / rejected 三阶段

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub mod actions;
pub mod auth;
pub mod templates;

pub use auth::{AuthAction, AuthState};
pub use templates::{TemplateAction, TemplateOp, TemplateState};

/// 异步 action 的生命周期
#[derive(Debug, Clone, PartialEq)]
pub enum AsyncPhase<T> {
    Pending,
    Fulfilled(T),
    Rejected(String),
    /// 发起方已放弃该请求；只释放 loading 标记，不提交结果
    Cancelled,
}

pub trait Reducer {
    type Action;

    fn reduce(&mut self, action: Self::Action);
}

pub trait Dispatch<A> {
    fn dispatch(&self, action: A);
}

/// 本地状态容器，克隆后共享同一份状态
pub struct Store<S> {
    state: Rc<RefCell<S>>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<S: Reducer> Store<S> {
    pub fn new(initial: S) -> Self {
        Self {
            state: Rc::new(RefCell::new(initial)),
        }
    }

    /// 只读访问当前状态
    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state.borrow())
    }
}

impl<S: Reducer + Clone> Store<S> {
    pub fn snapshot(&self) -> S {
        self.state.borrow().clone()
    }
}

impl<S: Reducer> Dispatch<S::Action> for Store<S> {
    fn dispatch(&self, action: S::Action) {
        self.state.borrow_mut().reduce(action);
    }
}

/// 请求作用域
///
/// 与发起请求的视图生命周期绑定；视图卸载时调用 `cancel`，
/// 之后才到达的响应不会写入共享状态。
#[derive(Debug, Clone, Default)]
pub struct RequestScope {
    cancelled: Arc<AtomicBool>,
}

impl RequestScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
