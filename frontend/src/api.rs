use crate::auth::AuthStore;
use crate::web::router::hard_redirect;
use crate::web::{BrowserStorage, FetchHttpClient};
use leptos::prelude::*;
use templateshare::route::AppRoute;
use templateshare::store::{AuthAction, Dispatch};
use templateshare::{ClientConfig, TemplateShareApi};

pub type Api = TemplateShareApi<FetchHttpClient, BrowserStorage>;

/// 构建 API 客户端
///
/// 会话被服务端拒绝时：清空内存中的认证状态，并整页跳转到登录页。
pub fn provide_api(config: &ClientConfig, auth: AuthStore) -> Api {
    let api = TemplateShareApi::new(&config.api_base_url, FetchHttpClient, BrowserStorage)
        .with_unauthorized_hook(move || {
            auth.dispatch(AuthAction::Logout);
            hard_redirect(AppRoute::Login.to_path());
        });
    provide_context(api.clone());
    api
}

pub fn use_api() -> Api {
    use_context::<Api>().expect("Api should be provided")
}
