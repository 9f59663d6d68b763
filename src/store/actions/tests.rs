use super::*;
use crate::ClientError;
use crate::fixtures;
use crate::request::tests::MockHttpClient;
use crate::request::{HttpRequest, HttpResponse};
use crate::session::{MemoryStorage, load_session, stored_token};
use crate::store::{AuthState, Reducer, Store, TemplateOp, TemplateState};
use templateshare_shared::protocol::HttpMethod;
use std::cell::RefCell;
use templateshare_shared::Role;

// =========================================================
// Shared Mock Components
// =========================================================

type Api = TemplateShareApi<MockHttpClient, MemoryStorage>;

fn setup() -> (MockHttpClient, MemoryStorage, Api) {
    let http = MockHttpClient::new();
    let storage = MemoryStorage::new();
    let api = TemplateShareApi::new("http://api.test", http.clone(), storage.clone());
    (http, storage, api)
}

/// 转发给真实 Store，同时记录每次分发后的状态快照
struct Recorder<S: Reducer + Clone> {
    store: Store<S>,
    history: RefCell<Vec<S>>,
}

impl<S: Reducer + Clone> Recorder<S> {
    fn new(initial: S) -> Self {
        Self {
            store: Store::new(initial),
            history: RefCell::new(Vec::new()),
        }
    }

    fn state(&self) -> S {
        self.store.snapshot()
    }
}

impl<S: Reducer + Clone> Dispatch<S::Action> for Recorder<S> {
    fn dispatch(&self, action: S::Action) {
        self.store.dispatch(action);
        self.history.borrow_mut().push(self.store.snapshot());
    }
}

/// 在请求发出时取消作用域，模拟视图在请求进行中被卸载
struct UnmountDuringRequest {
    inner: MockHttpClient,
    scope: RequestScope,
}

#[async_trait::async_trait(?Send)]
impl HttpClient for UnmountDuringRequest {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        self.scope.cancel();
        self.inner.send(req).await
    }
}

fn ids(state: &TemplateState) -> Vec<String> {
    state.templates.iter().map(|t| t.id.clone()).collect()
}

// =========================================================
// Templates
// =========================================================

#[tokio::test]
async fn test_fetch_templates_success() {
    let (http, _, api) = setup();
    http.respond(200, &fixtures::templates_json(&["a", "b", "c"]));
    let store = Recorder::new(TemplateState::default());

    assert!(fetch_templates(&api, &store, &RequestScope::new()).await);

    let history = store.history.borrow();
    assert_eq!(history.len(), 2);
    assert!(history[0].loading);
    assert!(!history[1].loading);
    assert_eq!(ids(&store.state()), ["a", "b", "c"]);
}

#[tokio::test]
async fn test_fetch_templates_failure_keeps_list() {
    let (http, _, api) = setup();
    http.respond(500, r#"{"detail":"Database unavailable"}"#);
    let store = Recorder::new(TemplateState {
        templates: vec![fixtures::template("old")],
        ..Default::default()
    });

    assert!(!fetch_templates(&api, &store, &RequestScope::new()).await);

    let state = store.state();
    assert!(!state.loading);
    assert_eq!(ids(&state), ["old"]);
    assert_eq!(state.error.as_deref(), Some("Database unavailable"));
}

#[tokio::test]
async fn test_network_failure_uses_fallback_message() {
    let (http, _, api) = setup();
    http.fail(ClientError::network("offline"));
    let store = Store::new(TemplateState::default());

    fetch_templates(&api, &store, &RequestScope::new()).await;
    assert_eq!(
        store.snapshot().error.as_deref(),
        Some(MSG_FETCH_TEMPLATES_FAILED)
    );
}

#[tokio::test]
async fn test_latest_fetch_overwrites_list() {
    let (http, _, api) = setup();
    http.respond(200, &fixtures::templates_json(&["first"]));
    http.respond(200, &fixtures::templates_json(&["second"]));
    let store = Store::new(TemplateState::default());
    let scope = RequestScope::new();

    fetch_templates(&api, &store, &scope).await;
    fetch_templates(&api, &store, &scope).await;
    assert_eq!(ids(&store.snapshot()), ["second"]);
}

#[tokio::test]
async fn test_cancelled_scope_does_not_commit() {
    let http = MockHttpClient::new();
    http.respond(200, &fixtures::templates_json(&["late"]));
    let scope = RequestScope::new();
    let api = TemplateShareApi::new(
        "http://api.test",
        UnmountDuringRequest {
            inner: http.clone(),
            scope: scope.clone(),
        },
        MemoryStorage::new(),
    );
    let store = Store::new(TemplateState {
        templates: vec![fixtures::template("current")],
        ..Default::default()
    });

    assert!(!fetch_templates(&api, &store, &scope).await);

    let state = store.snapshot();
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert_eq!(ids(&state), ["current"]);
}

#[tokio::test]
async fn test_fetch_by_id_selects_template() {
    let (http, _, api) = setup();
    http.respond(200, &fixtures::templates_json(&["t7"]).replace(['[', ']'], ""));
    let store = Store::new(TemplateState::default());

    assert!(fetch_template_by_id(&api, &store, &RequestScope::new(), "t7").await);
    assert_eq!(
        store.snapshot().selected_template.map(|t| t.id),
        Some("t7".to_string())
    );
    assert_eq!(http.last_request().unwrap().url, "http://api.test/templates/t7");
}

#[tokio::test]
async fn test_create_refetches_list() {
    let (http, _, api) = setup();
    http.respond(
        200,
        r#"{"success":true,"message":"Template created successfully","data":{"template_id":"new"}}"#,
    );
    http.respond(200, &fixtures::templates_json(&["a", "new"]));
    let store = Recorder::new(TemplateState {
        templates: vec![fixtures::template("a")],
        ..Default::default()
    });

    let req = CreateTemplateRequest {
        title: "New".into(),
        description: "Fresh".into(),
        image: fixtures::image(),
    };
    assert!(create_template(&api, &store, &RequestScope::new(), req).await);

    assert_eq!(ids(&store.state()), ["a", "new"]);
    let requests = http.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].url, "http://api.test/templates");
    // create pending/fulfilled + fetch pending/fulfilled
    assert_eq!(store.history.borrow().len(), 4);
}

#[tokio::test]
async fn test_rejected_create_leaves_list_and_skips_refetch() {
    let (http, _, api) = setup();
    http.respond(
        400,
        r#"{"detail":"Invalid image file. Only JPEG, PNG, GIF, and WebP are allowed."}"#,
    );
    let store = Store::new(TemplateState {
        templates: vec![fixtures::template("a")],
        ..Default::default()
    });

    let req = CreateTemplateRequest {
        title: "Bad".into(),
        description: String::new(),
        image: fixtures::image(),
    };
    assert!(!create_template(&api, &store, &RequestScope::new(), req).await);

    let state = store.snapshot();
    assert_eq!(ids(&state), ["a"]);
    assert!(state.error.unwrap().starts_with("Invalid image file"));
    assert_eq!(http.requests().len(), 1);
}

#[tokio::test]
async fn test_failed_refresh_after_create_retries_fetch_only() {
    let (http, _, api) = setup();
    http.respond(
        200,
        r#"{"success":true,"message":"Template created successfully","data":{"template_id":"new"}}"#,
    );
    http.respond(500, r#"{"detail":"db down"}"#);
    http.respond(200, &fixtures::templates_json(&["new"]));
    let store = Store::new(TemplateState::default());
    let scope = RequestScope::new();

    let req = CreateTemplateRequest {
        title: "New".into(),
        description: "Fresh".into(),
        image: fixtures::image(),
    };
    assert!(create_template(&api, &store, &scope, req.clone()).await);

    let state = store.snapshot();
    assert_eq!(state.error.as_deref(), Some("db down"));
    assert_eq!(state.failed_op, Some(TemplateOp::FetchAll));
    assert!(!state.create_retry_resubmits());

    // 创建页的重试分支
    if store.snapshot().create_retry_resubmits() {
        create_template(&api, &store, &scope, req).await;
    } else {
        assert!(fetch_templates(&api, &store, &scope).await);
    }

    let posts = http
        .requests()
        .iter()
        .filter(|r| r.method == HttpMethod::Post)
        .count();
    assert_eq!(posts, 1);
    assert_eq!(ids(&store.snapshot()), ["new"]);
    assert!(store.snapshot().error.is_none());
}

#[tokio::test]
async fn test_rejected_create_retry_resubmits() {
    let (http, _, api) = setup();
    http.respond(500, r#"{"detail":"disk full"}"#);
    let store = Store::new(TemplateState::default());

    let req = CreateTemplateRequest {
        title: "New".into(),
        description: String::new(),
        image: fixtures::image(),
    };
    assert!(!create_template(&api, &store, &RequestScope::new(), req).await);
    let state = store.snapshot();
    assert_eq!(state.failed_op, Some(TemplateOp::Create));
    assert!(state.create_retry_resubmits());
}

#[tokio::test]
async fn test_rejected_update_leaves_list() {
    let (http, _, api) = setup();
    http.respond(404, r#"{"detail":"Template not found"}"#);
    let store = Store::new(TemplateState {
        templates: vec![fixtures::template("a")],
        ..Default::default()
    });

    let ok = update_template(
        &api,
        &store,
        &RequestScope::new(),
        "missing",
        TemplatePatch {
            title: Some("x".into()),
            ..Default::default()
        },
    )
    .await;
    assert!(!ok);
    let state = store.snapshot();
    assert_eq!(ids(&state), ["a"]);
    assert_eq!(state.error.as_deref(), Some("Template not found"));
}

#[tokio::test]
async fn test_update_refetches_list() {
    let (http, _, api) = setup();
    http.respond(200, &fixtures::api_response_json("Template updated successfully"));
    http.respond(200, &fixtures::templates_json(&["a"]));
    let store = Store::new(TemplateState::default());

    assert!(update_template(&api, &store, &RequestScope::new(), "a", TemplatePatch::default()).await);
    assert_eq!(ids(&store.snapshot()), ["a"]);
}

#[tokio::test]
async fn test_delete_removes_and_clears_selection() {
    let (http, _, api) = setup();
    http.respond(200, &fixtures::api_response_json("Template deleted successfully"));
    let store = Store::new(TemplateState {
        templates: vec![fixtures::template("a"), fixtures::template("b")],
        selected_template: Some(fixtures::template("a")),
        ..Default::default()
    });

    assert!(delete_template(&api, &store, &RequestScope::new(), "a").await);
    let state = store.snapshot();
    assert_eq!(ids(&state), ["b"]);
    assert!(state.selected_template.is_none());
}

#[tokio::test]
async fn test_failed_delete_keeps_entity() {
    let (http, _, api) = setup();
    http.respond(403, r#"{"detail":"Admin access required"}"#);
    let store = Store::new(TemplateState {
        templates: vec![fixtures::template("a")],
        selected_template: Some(fixtures::template("a")),
        ..Default::default()
    });

    assert!(!delete_template(&api, &store, &RequestScope::new(), "a").await);
    let state = store.snapshot();
    assert_eq!(ids(&state), ["a"]);
    assert!(state.selected_template.is_some());
    assert_eq!(state.error.as_deref(), Some("Admin access required"));
}

// =========================================================
// Auth
// =========================================================

#[tokio::test]
async fn test_login_persists_session() {
    let (http, storage, api) = setup();
    http.respond(200, &fixtures::login_json("jwt", Role::Admin));
    let store = Store::new(AuthState::default());

    assert!(login(&api, &store, &RequestScope::new(), "ada@example.com", "pw").await);

    let state = store.snapshot();
    assert!(state.is_authenticated);
    assert!(state.is_admin());
    let saved = load_session(&storage).unwrap();
    assert_eq!(saved.token, "jwt");
    assert_eq!(saved.user.username, "ada");
}

/// 拒绝写入指定 key 的存储
#[derive(Clone)]
struct RejectingStorage {
    inner: MemoryStorage,
    reject: &'static str,
}

impl SessionStorage for RejectingStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> bool {
        key != self.reject && self.inner.set(key, value)
    }

    fn delete(&self, key: &str) -> bool {
        self.inner.delete(key)
    }
}

#[tokio::test]
async fn test_login_rejected_when_session_cannot_be_saved() {
    let http = MockHttpClient::new();
    let storage = RejectingStorage {
        inner: MemoryStorage::new(),
        reject: templateshare_shared::STORAGE_USER_KEY,
    };
    let api = TemplateShareApi::new("http://api.test", http.clone(), storage.clone());
    http.respond(200, &fixtures::login_json("jwt", Role::User));
    let store = Store::new(AuthState::default());

    assert!(!login(&api, &store, &RequestScope::new(), "ada@example.com", "pw").await);

    let state = store.snapshot();
    assert!(!state.is_authenticated);
    assert!(state.user.is_none());
    assert_eq!(state.error.as_deref(), Some(MSG_SESSION_NOT_SAVED));
    // token 已写入后 user 写入失败，不能留下半个会话
    assert!(stored_token(&storage).is_none());
    assert!(load_session(&storage).is_none());
}

#[tokio::test]
async fn test_failed_login_shows_detail() {
    let (http, storage, api) = setup();
    http.respond(401, r#"{"detail":"Incorrect email or password"}"#);
    let store = Store::new(AuthState::default());

    assert!(!login(&api, &store, &RequestScope::new(), "ada@example.com", "bad").await);

    let state = store.snapshot();
    assert!(!state.is_authenticated);
    assert_eq!(state.error.as_deref(), Some("Incorrect email or password"));
    assert!(stored_token(&storage).is_none());
}

/// 登录拿到 token，随后 token 过期导致 401：会话被清除，宿主被要求跳转登录
#[tokio::test]
async fn test_expired_token_scenario() {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    let http = MockHttpClient::new();
    let storage = MemoryStorage::new();
    let redirected = Arc::new(AtomicBool::new(false));
    let flag = redirected.clone();
    let api = TemplateShareApi::new("http://api.test", http.clone(), storage.clone())
        .with_unauthorized_hook(move || flag.store(true, Ordering::SeqCst));

    http.respond(200, &fixtures::login_json("short-lived", Role::User));
    http.respond(401, r#"{"detail":"Could not validate credentials"}"#);

    let auth = Store::new(AuthState::default());
    let templates = Store::new(TemplateState::default());
    assert!(login(&api, &auth, &RequestScope::new(), "ada@example.com", "pw").await);
    assert_eq!(stored_token(&storage).as_deref(), Some("short-lived"));

    assert!(!fetch_templates(&api, &templates, &RequestScope::new()).await);

    assert!(redirected.load(Ordering::SeqCst));
    assert!(load_session(&storage).is_none());
    assert_eq!(
        http.requests()[1].header("Authorization"),
        Some("Bearer short-lived")
    );
}

#[tokio::test]
async fn test_register_does_not_sign_in() {
    let (http, storage, api) = setup();
    http.respond(200, &fixtures::api_response_json("User registered successfully"));
    let store = Store::new(AuthState::default());

    let req = RegisterRequest {
        email: "new@example.com".into(),
        username: "new".into(),
        password: "pw".into(),
        role: Role::User,
    };
    assert!(register(&api, &store, &RequestScope::new(), &req).await);
    assert!(!store.snapshot().is_authenticated);
    assert!(stored_token(&storage).is_none());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let (http, _, api) = setup();
    http.respond(400, r#"{"detail":"Email already registered"}"#);
    let store = Store::new(AuthState::default());

    let req = RegisterRequest {
        email: "dup@example.com".into(),
        username: "dup".into(),
        password: "pw".into(),
        role: Role::User,
    };
    assert!(!register(&api, &store, &RequestScope::new(), &req).await);
    assert_eq!(
        store.snapshot().error.as_deref(),
        Some("Email already registered")
    );
}

#[test]
fn test_logout_clears_storage_and_state() {
    let storage = MemoryStorage::new();
    let session = templateshare_shared::Session {
        token: "tok".into(),
        user: fixtures::user(Role::User),
    };
    crate::session::persist_session(&storage, &session);
    let store = Store::new(AuthState::from_session(load_session(&storage)));
    assert!(store.snapshot().is_authenticated);

    logout(&storage, &store);

    assert!(!store.snapshot().is_authenticated);
    assert!(load_session(&storage).is_none());
}
