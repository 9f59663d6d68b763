//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history / window.location 的操作都集中在此模块。
//! 实现了"监听 -> 守卫 -> 处理 -> 加载"的导航流程，守卫判定本身由核心库的 `route::guard` 完成。

use leptos::prelude::*;
use templateshare::route::{AppRoute, GuardDecision, Viewer, guard};
use wasm_bindgen::prelude::*;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

fn write_history(path: &str, use_push: bool) {
    if use_push {
        push_history_state(path);
    } else {
        replace_history_state(path);
    }
}

/// 整页跳转，绕过应用内路由（会话被服务端拒绝时使用）
pub fn hard_redirect(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.location().set_href(path) {
            log::error!("[Router] Hard redirect to {} failed: {:?}", path, e);
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入的 `Viewer` 信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 当前用户（注入的信号，实现解耦）
    viewer: Signal<Viewer>,
    /// 被守卫拦截前原本要去的路由，登录成功后回到这里
    return_to: RwSignal<Option<AppRoute>>,
}

impl RouterService {
    /// 创建新的路由服务
    ///
    /// # Arguments
    /// * `viewer` - 当前用户信号，由外部注入实现解耦
    fn new(viewer: Signal<Viewer>) -> Self {
        let (current_route, set_route) = signal(AppRoute::from_path(&current_path()));

        let router = Self {
            current_route,
            set_route,
            viewer,
            return_to: RwSignal::new(None),
        };
        // 直接打开受保护的 URL 时同样要经过守卫
        router.navigate_to_route(current_route.get_untracked(), false);
        router
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn navigate(&self, path: &str) {
        self.navigate_to_route(AppRoute::from_path(path), true);
    }

    pub fn navigate_to(&self, route: AppRoute) {
        self.navigate_to_route(route, true);
    }

    /// 导航到指定路由
    ///
    /// # Arguments
    /// * `target_route` - 目标路由
    /// * `use_push` - true 使用 pushState, false 使用 replaceState
    fn navigate_to_route(&self, target_route: AppRoute, use_push: bool) {
        let decision = guard(target_route, self.viewer.get_untracked());

        if let GuardDecision::RedirectToLogin { from } = decision {
            log::info!("[Router] Access denied to {}. Redirecting to login.", from);
            self.return_to.set(Some(from));
        } else if decision == GuardDecision::RedirectToTemplates {
            log::info!("[Router] {} requires admin. Redirecting to templates.", target_route);
        }

        let route = decision.target(target_route);
        write_history(route.to_path(), use_push);
        self.set_route.set(route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            // popstate 时也执行守卫逻辑
            router.navigate_to_route(AppRoute::from_path(&current_path()), false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 设置认证状态变化时的自动重定向
    fn setup_auth_redirect(&self) {
        let router = *self;

        Effect::new(move |_| {
            let viewer = router.viewer.get();
            let route = router.current_route.get_untracked();

            if viewer.is_authenticated && route == AppRoute::Login {
                // 刚登录：回到被拦截的页面，否则去模板列表
                let target = router
                    .return_to
                    .try_update(Option::take)
                    .flatten()
                    .unwrap_or_else(AppRoute::auth_success_redirect);
                log::info!("[Router] Signed in, redirecting to {}.", target);
                router.navigate_to_route(target, true);
                return;
            }

            if guard(route, viewer) != GuardDecision::Render {
                // 登出或角色变化后，当前页面不再可访问
                log::info!("[Router] Auth state changed, leaving {}.", route);
                router.navigate_to_route(route, true);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(viewer: Signal<Viewer>) -> RouterService {
    let router = RouterService::new(viewer);

    // 初始化监听器
    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 当前用户信号
    viewer: Signal<Viewer>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    // 提供路由服务到 Context
    provide_router(viewer);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 应用内链接：拦截点击，交给路由服务导航
#[component]
pub fn Link(
    /// 目标路由
    to: AppRoute,
    #[prop(into, optional)] class: String,
    /// 点击后的额外回调（例如收起菜单）
    #[prop(optional)]
    on_navigate: Option<Callback<()>>,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate_to(to);
        if let Some(cb) = on_navigate {
            cb.run(());
        }
    };

    view! {
        <a href=to.to_path() class=class on:click=on_click>
            {children()}
        </a>
    }
}
