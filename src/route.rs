//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、访问要求以及路由守卫的判定。

use std::fmt::Display;
use templateshare_shared::Role;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    #[default]
    Home,
    Login,
    Register,
    /// 模板列表 (需要认证)
    Templates,
    /// 模板管理 (需要管理员)
    AdminTemplates,
    /// 新建模板 (需要管理员)
    AdminTemplateCreate,
    /// 付费引导页
    Payment,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        // 忽略查询串、锚点与结尾的 '/'
        let path = path.split(['?', '#']).next().unwrap_or("/");
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Self::Home,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/templates" => Self::Templates,
            "/admin/templates" => Self::AdminTemplates,
            "/admin/templates/create" => Self::AdminTemplateCreate,
            "/payment" => Self::Payment,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Templates => "/templates",
            Self::AdminTemplates => "/admin/templates",
            Self::AdminTemplateCreate => "/admin/templates/create",
            Self::Payment => "/payment",
            Self::NotFound => "/404",
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::Templates | Self::AdminTemplates | Self::AdminTemplateCreate
        )
    }

    /// 定义该路由是否仅限管理员
    pub fn requires_admin(&self) -> bool {
        matches!(self, Self::AdminTemplates | Self::AdminTemplateCreate)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 权限不足时的重定向目标
    pub fn forbidden_redirect() -> Self {
        Self::Templates
    }

    /// 登录成功后的默认目标
    pub fn auth_success_redirect() -> Self {
        Self::Templates
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

// =========================================================
// 路由守卫
// =========================================================

/// 守卫判定所需的当前用户信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewer {
    pub is_authenticated: bool,
    pub role: Option<Role>,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(role: Role) -> Self {
        Self {
            is_authenticated: true,
            role: Some(role),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    /// 跳转登录，并记住原本请求的位置
    RedirectToLogin { from: AppRoute },
    RedirectToTemplates,
}

impl GuardDecision {
    /// 本次导航最终应展示的路由
    pub fn target(&self, requested: AppRoute) -> AppRoute {
        match self {
            GuardDecision::Render => requested,
            GuardDecision::RedirectToLogin { .. } => AppRoute::auth_failure_redirect(),
            GuardDecision::RedirectToTemplates => AppRoute::forbidden_redirect(),
        }
    }
}

/// 纯同步的守卫判定，每次导航 / 渲染都会执行
pub fn guard(route: AppRoute, viewer: Viewer) -> GuardDecision {
    if !route.requires_auth() {
        return GuardDecision::Render;
    }
    if !viewer.is_authenticated {
        return GuardDecision::RedirectToLogin { from: route };
    }
    if route.requires_admin() && viewer.role != Some(Role::Admin) {
        return GuardDecision::RedirectToTemplates;
    }
    GuardDecision::Render
}
