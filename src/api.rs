use crate::error::{ClientError, ClientResult};
use crate::request::{HttpClient, HttpRequest};
use crate::session::{SessionStorage, clear_session, stored_token};
use std::sync::Arc;
use templateshare_shared::protocol::{
    DeleteTemplateRequest, Endpoint, GetTemplateRequest, ListTemplatesRequest, RequestBody,
    UpdateTemplateRequest,
};
use templateshare_shared::{
    ApiResponse, CreateTemplateRequest, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE, LoginRequest,
    RegisterRequest, Session, Template, TemplatePatch,
};

/// 收到 401 后执行的回调（浏览器中为整页跳转到 `/login`）
pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

/// TemplateShare REST 客户端
///
/// 所有请求都会经过 `send`：
/// 1. 存储中有 token 时自动附加 `Authorization: Bearer <token>`
/// 2. 401 响应会清除持久化的 token / user；会话被拒绝时触发 `on_unauthorized`
/// 3. 其它非 2xx 响应转换为带 `detail` 的 `ClientError`
pub struct TemplateShareApi<C, S> {
    base_url: String,
    http: C,
    storage: S,
    on_unauthorized: UnauthorizedHook,
}

impl<C: Clone, S: Clone> Clone for TemplateShareApi<C, S> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            http: self.http.clone(),
            storage: self.storage.clone(),
            on_unauthorized: self.on_unauthorized.clone(),
        }
    }
}

impl<C: HttpClient, S: SessionStorage> TemplateShareApi<C, S> {
    pub fn new(base_url: &str, http: C, storage: S) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            http,
            storage,
            on_unauthorized: Arc::new(|| {}),
        }
    }

    pub fn with_unauthorized_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_unauthorized = Arc::new(hook);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 发送任意 Endpoint 请求
    pub async fn send<E: Endpoint>(&self, endpoint: &E) -> ClientResult<E::Response> {
        let path = endpoint.path();
        let op = format!("{} {}", E::METHOD.as_str(), path);

        let mut req = HttpRequest::new(&self.url(&path), E::METHOD);
        let token = stored_token(&self.storage);
        if let Some(token) = &token {
            req = req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }
        let body = endpoint.body();
        if matches!(body, RequestBody::Json(_)) {
            req = req.with_header(HEADER_CONTENT_TYPE, "application/json");
        }
        req = req.with_body(body);

        log::debug!("[Api] {}", op);
        let resp = self.http.send(req).await.map_err(|e| e.in_op(op.clone()))?;

        if resp.status == 401 {
            self.handle_unauthorized(token.is_some());
            return Err(ClientError::from_response(resp.status, &resp.body).in_op(op));
        }
        if !resp.ok() {
            return Err(ClientError::from_response(resp.status, &resp.body).in_op(op));
        }

        resp.json::<E::Response>().map_err(|e| e.in_op(op))
    }

    /// 401：丢弃持久化的会话；如果请求携带了 token（会话被拒绝），交给宿主处理跳转
    ///
    /// 未携带 token 的 401（例如登录密码错误）不跳转，错误交给调用方展示。
    fn handle_unauthorized(&self, had_token: bool) {
        clear_session(&self.storage);
        if had_token {
            log::warn!("[Api] Session rejected by server, redirecting to login.");
            (self.on_unauthorized)();
        }
    }

    // =========================================================
    // Auth
    // =========================================================

    /// 登录，返回会话（持久化由调用方负责）
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp = self.send(&req).await?;
        Ok(resp.into())
    }

    pub async fn register(&self, req: &RegisterRequest) -> ClientResult<ApiResponse> {
        self.send(req).await
    }

    // =========================================================
    // Templates
    // =========================================================

    pub async fn list_templates(&self) -> ClientResult<Vec<Template>> {
        self.send(&ListTemplatesRequest).await
    }

    pub async fn get_template(&self, id: &str) -> ClientResult<Template> {
        self.send(&GetTemplateRequest { id: id.to_string() }).await
    }

    pub async fn create_template(&self, req: &CreateTemplateRequest) -> ClientResult<ApiResponse> {
        if req.title.trim().is_empty() {
            return Err(ClientError::invalid_input("title is required").in_op("api.create_template"));
        }
        self.send(req).await
    }

    pub async fn update_template(&self, id: &str, patch: TemplatePatch) -> ClientResult<ApiResponse> {
        let req = UpdateTemplateRequest {
            id: id.to_string(),
            patch,
        };
        self.send(&req).await
    }

    pub async fn delete_template(&self, id: &str) -> ClientResult<ApiResponse> {
        self.send(&DeleteTemplateRequest { id: id.to_string() }).await
    }
}
