//! TemplateShare 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `templateshare::route`: 路由定义与守卫（领域模型，位于核心库）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth` / `store`: 以信号承载核心库的 reducer 状态
//! - `components`: UI 组件层

mod api;
mod auth;
mod components {
    pub mod admin_template_create;
    pub mod admin_template_list;
    pub mod error_message;
    pub mod home;
    pub mod loading;
    pub mod login;
    pub mod navbar;
    pub mod payment;
    pub mod register;
    pub mod template_list;
}
mod store;

use crate::api::provide_api;
use crate::auth::{provide_auth, viewer_signal};
use crate::components::admin_template_create::AdminTemplateCreatePage;
use crate::components::admin_template_list::AdminTemplateListPage;
use crate::components::home::HomePage;
use crate::components::login::LoginPage;
use crate::components::navbar::Navbar;
use crate::components::payment::PaymentPage;
use crate::components::register::RegisterPage;
use crate::components::template_list::TemplateListPage;
use crate::store::provide_template_store;

use leptos::prelude::*;
use templateshare::ClientConfig;
use templateshare::route::AppRoute;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装（fetch / localStorage / History / DOM 事件），
// 实现核心库定义的能力接口。
pub mod web {
    pub mod console;
    pub mod detection;
    mod http;
    pub mod router;
    mod storage;

    pub use http::{FetchHttpClient, read_upload};
    pub use storage::BrowserStorage;
}

use web::router::{Link, Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Templates => view! { <TemplateListPage /> }.into_any(),
        AppRoute::AdminTemplates => view! { <AdminTemplateListPage /> }.into_any(),
        AppRoute::AdminTemplateCreate => view! { <AdminTemplateCreatePage /> }.into_any(),
        AppRoute::Payment => view! { <PaymentPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-[70vh] bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                    <Link to=AppRoute::Home class="btn btn-link mt-2">"Back to home"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 构建期配置
    let config = ClientConfig::from_build_env();
    provide_context(config.clone());

    // 2. 认证状态（从 LocalStorage 恢复会话）与模板状态
    let auth = provide_auth();
    provide_template_store();

    // 3. API 客户端（401 时清空认证状态并跳转登录）
    provide_api(&config, auth);

    // 4. 获取当前用户信号，用于注入路由服务（解耦！）
    let viewer = viewer_signal(auth);

    view! {
        // 5. 路由器组件：注入用户信号实现守卫
        <Router viewer=viewer>
            <div class="min-h-screen bg-base-200 font-sans">
                <Navbar />
                <RouterOutlet matcher=route_matcher />
            </div>
        </Router>
    }
}
