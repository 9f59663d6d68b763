use crate::error::{ClientError, ClientResult};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use templateshare_shared::protocol::{HttpMethod, RequestBody};

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 请求结构
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: BTreeMap::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 检查响应是否成功 (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        serde_json::from_str(&self.body).map_err(ClientError::from)
    }
}

/// HTTP 客户端特性 (Trait)
/// (?Send) 是因为浏览器环境下 JsFuture 等类型不是 Send 的
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// 按顺序返回预设响应，并记录收到的请求
    #[derive(Clone, Default)]
    pub struct MockHttpClient {
        responses: Rc<RefCell<VecDeque<ClientResult<HttpResponse>>>>,
        requests: Rc<RefCell<Vec<HttpRequest>>>,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(&self, status: u16, body: &str) -> &Self {
            self.responses
                .borrow_mut()
                .push_back(Ok(HttpResponse::new(status, body)));
            self
        }

        pub fn fail(&self, err: ClientError) -> &Self {
            self.responses.borrow_mut().push_back(Err(err));
            self
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.borrow().clone()
        }

        pub fn last_request(&self) -> Option<HttpRequest> {
            self.requests.borrow().last().cloned()
        }
    }

    #[async_trait::async_trait(?Send)]
    impl HttpClient for MockHttpClient {
        async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
            self.requests.borrow_mut().push(req);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ClientError::network("no mock response queued")))
        }
    }

    #[test]
    fn ok_range() {
        assert!(HttpResponse::new(200, "").ok());
        assert!(HttpResponse::new(204, "").ok());
        assert!(!HttpResponse::new(301, "").ok());
        assert!(!HttpResponse::new(401, "").ok());
    }

    #[test]
    fn json_decode_error_is_serialization() {
        let err = HttpResponse::new(200, "not json").json::<Vec<u8>>().unwrap_err();
        assert_eq!(err.status, crate::ClientErrorStatus::Serialization);
    }

    #[test]
    fn builder_sets_headers() {
        let req = HttpRequest::new("http://x/api/templates", HttpMethod::Get)
            .with_header("Authorization", "Bearer abc");
        assert_eq!(req.header("Authorization"), Some("Bearer abc"));
        assert_eq!(req.body, RequestBody::Empty);
    }
}
