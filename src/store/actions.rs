//! 异步 action
//!
//! 每个 action 遵循同一流程：
//! 分发 Pending -> 调用 API -> 作用域未取消则分发 Fulfilled / Rejected，否则分发 Cancelled。
//! 不做自动重试，也不做请求去重。返回值表示是否成功提交了 Fulfilled。

use super::{AsyncPhase, AuthAction, Dispatch, RequestScope, TemplateAction};
use crate::api::TemplateShareApi;
use crate::error::ClientResult;
use crate::request::HttpClient;
use crate::session::{SessionStorage, clear_session, persist_session};
use templateshare_shared::{CreateTemplateRequest, RegisterRequest, TemplatePatch};

pub const MSG_FETCH_TEMPLATES_FAILED: &str = "Failed to fetch templates";
pub const MSG_FETCH_TEMPLATE_FAILED: &str = "Failed to fetch template";
pub const MSG_CREATE_TEMPLATE_FAILED: &str = "Failed to create template";
pub const MSG_UPDATE_TEMPLATE_FAILED: &str = "Failed to update template";
pub const MSG_DELETE_TEMPLATE_FAILED: &str = "Failed to delete template";
pub const MSG_LOGIN_FAILED: &str = "Login failed";
pub const MSG_REGISTER_FAILED: &str = "Registration failed";
pub const MSG_SESSION_NOT_SAVED: &str = "Could not save session";

/// 提交请求结果
fn commit<T, A, D>(
    store: &D,
    scope: &RequestScope,
    wrap: impl FnOnce(AsyncPhase<T>) -> A,
    result: ClientResult<T>,
    fallback: &str,
) -> bool
where
    D: Dispatch<A> + ?Sized,
{
    if scope.is_cancelled() {
        log::debug!("[Store] Request scope cancelled, dropping result.");
        store.dispatch(wrap(AsyncPhase::Cancelled));
        return false;
    }
    match result {
        Ok(value) => {
            store.dispatch(wrap(AsyncPhase::Fulfilled(value)));
            true
        }
        Err(e) => {
            log::warn!("[Store] {}", e);
            store.dispatch(wrap(AsyncPhase::Rejected(e.user_message(fallback))));
            false
        }
    }
}

// =========================================================
// Templates
// =========================================================

pub async fn fetch_templates<C, S, D>(
    api: &TemplateShareApi<C, S>,
    store: &D,
    scope: &RequestScope,
) -> bool
where
    C: HttpClient,
    S: SessionStorage,
    D: Dispatch<TemplateAction> + ?Sized,
{
    store.dispatch(TemplateAction::FetchAll(AsyncPhase::Pending));
    let result = api.list_templates().await;
    commit(store, scope, TemplateAction::FetchAll, result, MSG_FETCH_TEMPLATES_FAILED)
}

pub async fn fetch_template_by_id<C, S, D>(
    api: &TemplateShareApi<C, S>,
    store: &D,
    scope: &RequestScope,
    id: &str,
) -> bool
where
    C: HttpClient,
    S: SessionStorage,
    D: Dispatch<TemplateAction> + ?Sized,
{
    store.dispatch(TemplateAction::FetchById(AsyncPhase::Pending));
    let result = api.get_template(id).await;
    commit(store, scope, TemplateAction::FetchById, result, MSG_FETCH_TEMPLATE_FAILED)
}

/// 创建模板；成功后重新拉取列表（后端只返回新 id，无法直接追加）
pub async fn create_template<C, S, D>(
    api: &TemplateShareApi<C, S>,
    store: &D,
    scope: &RequestScope,
    req: CreateTemplateRequest,
) -> bool
where
    C: HttpClient,
    S: SessionStorage,
    D: Dispatch<TemplateAction> + ?Sized,
{
    store.dispatch(TemplateAction::Create(AsyncPhase::Pending));
    let result = api.create_template(&req).await.map(|resp| {
        resp.data
            .as_ref()
            .and_then(|data| data.get("template_id"))
            .and_then(|id| id.as_str())
            .map(str::to_string)
    });
    let created = commit(store, scope, TemplateAction::Create, result, MSG_CREATE_TEMPLATE_FAILED);
    if created {
        log::info!("[Store] Template '{}' created, refreshing list.", req.title);
        fetch_templates(api, store, scope).await;
    }
    created
}

/// 更新模板；成功后重新拉取列表
pub async fn update_template<C, S, D>(
    api: &TemplateShareApi<C, S>,
    store: &D,
    scope: &RequestScope,
    id: &str,
    patch: TemplatePatch,
) -> bool
where
    C: HttpClient,
    S: SessionStorage,
    D: Dispatch<TemplateAction> + ?Sized,
{
    store.dispatch(TemplateAction::Update(AsyncPhase::Pending));
    let result = api.update_template(id, patch).await.map(|_| id.to_string());
    let updated = commit(store, scope, TemplateAction::Update, result, MSG_UPDATE_TEMPLATE_FAILED);
    if updated {
        fetch_templates(api, store, scope).await;
    }
    updated
}

/// 删除模板；只有服务端确认后才从列表移除
pub async fn delete_template<C, S, D>(
    api: &TemplateShareApi<C, S>,
    store: &D,
    scope: &RequestScope,
    id: &str,
) -> bool
where
    C: HttpClient,
    S: SessionStorage,
    D: Dispatch<TemplateAction> + ?Sized,
{
    store.dispatch(TemplateAction::Delete(AsyncPhase::Pending));
    let result = api.delete_template(id).await.map(|_| id.to_string());
    commit(store, scope, TemplateAction::Delete, result, MSG_DELETE_TEMPLATE_FAILED)
}

// =========================================================
// Auth
// =========================================================

/// 登录并持久化 token / user
pub async fn login<C, S, D>(
    api: &TemplateShareApi<C, S>,
    store: &D,
    scope: &RequestScope,
    email: &str,
    password: &str,
) -> bool
where
    C: HttpClient,
    S: SessionStorage,
    D: Dispatch<AuthAction> + ?Sized,
{
    store.dispatch(AuthAction::Login(AsyncPhase::Pending));
    let result = api.login(email, password).await;
    if let (false, Ok(session)) = (scope.is_cancelled(), &result) {
        // token 先于 user 写入，任一失败都要整体回滚
        if !persist_session(api.storage(), session) {
            log::error!("[Auth] Failed to persist session for {}.", session.user.username);
            clear_session(api.storage());
            store.dispatch(AuthAction::Login(AsyncPhase::Rejected(
                MSG_SESSION_NOT_SAVED.to_string(),
            )));
            return false;
        }
        log::info!("[Auth] Signed in as {}.", session.user.username);
    }
    commit(store, scope, AuthAction::Login, result, MSG_LOGIN_FAILED)
}

pub async fn register<C, S, D>(
    api: &TemplateShareApi<C, S>,
    store: &D,
    scope: &RequestScope,
    req: &RegisterRequest,
) -> bool
where
    C: HttpClient,
    S: SessionStorage,
    D: Dispatch<AuthAction> + ?Sized,
{
    store.dispatch(AuthAction::Register(AsyncPhase::Pending));
    let result = api.register(req).await.map(|_| ());
    commit(store, scope, AuthAction::Register, result, MSG_REGISTER_FAILED)
}

/// 登出：清除持久化会话与内存状态
pub fn logout<S, D>(storage: &S, store: &D)
where
    S: SessionStorage + ?Sized,
    D: Dispatch<AuthAction> + ?Sized,
{
    clear_session(storage);
    store.dispatch(AuthAction::Logout);
    log::info!("[Auth] Signed out.");
}

#[cfg(test)]
mod tests;
