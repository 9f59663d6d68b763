use std::fmt;

// =========================================================
// 错误状态枚举
// =========================================================

/// 客户端错误的分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorStatus {
    /// 请求未能到达服务端或响应无法读取
    Network,
    /// 401: token 缺失、过期或被拒绝
    Unauthorized,
    /// 服务端返回了其它非 2xx 状态
    Rejected,
    /// JSON 编解码失败
    Serialization,
    /// 客户端校验失败，请求未发出
    InvalidInput,
}

impl ClientErrorStatus {
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientErrorStatus::Network => "NETWORK_ERROR",
            ClientErrorStatus::Unauthorized => "UNAUTHORIZED",
            ClientErrorStatus::Rejected => "REQUEST_REJECTED",
            ClientErrorStatus::Serialization => "JSON_PARSE_ERROR",
            ClientErrorStatus::InvalidInput => "INVALID_INPUT",
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 记录错误发生时的操作和相关细节
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSpan {
    /// 操作名称，如 "api.list_templates"
    pub operation: String,
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// Client Errors
///
/// - status: 错误分类
/// - message: 技术性错误消息（用于日志）
/// - http_status: 服务端返回的状态码（如果有）
/// - detail: 服务端 `{"detail": "..."}` 中给用户看的消息（如果有）
/// - spans: 结构化的调用追踪栈
#[derive(Debug, Clone)]
pub struct ClientError {
    pub status: ClientErrorStatus,
    pub message: String,
    http_status: Option<u16>,
    detail: Option<String>,
    spans: Vec<ErrorSpan>,
}

impl ClientError {
    pub fn new(status: ClientErrorStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            http_status: None,
            detail: None,
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ClientErrorStatus::Network, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ClientErrorStatus::Unauthorized, message).with_http_status(401)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ClientErrorStatus::Serialization, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ClientErrorStatus::InvalidInput, message)
    }

    /// 由非 2xx 响应构建错误，尝试从响应体中取出 `detail`
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = extract_detail(body);
        let base = if status == 401 {
            Self::unauthorized(format!("HTTP {}", status))
        } else {
            Self::new(ClientErrorStatus::Rejected, format!("HTTP {}", status))
                .with_http_status(status)
        };
        Self { detail, ..base }
    }

    // --- Context builders (Builder Pattern) ---

    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.status.error_code()
    }

    pub fn http_status(&self) -> Option<u16> {
        self.http_status
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == ClientErrorStatus::Unauthorized
    }

    /// 给界面展示的消息：优先使用服务端 detail，否则使用调用方提供的兜底文案
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail
            .clone()
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// FastAPI 风格的错误体：`{"detail": "..."}`
///
/// 校验错误时 detail 是数组，这种情况视为没有可展示的 detail。
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")?
        .as_str()
        .map(str::to_string)
        .filter(|s| !s.is_empty())
}

// =========================================================
// Display & Error trait 实现
// =========================================================

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if let Some(detail) = &self.detail {
            write!(f, ": {}", detail)?;
        }

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ClientError {}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

// =========================================================
// 类型转换实现
// =========================================================

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_is_taken_from_fastapi_body() {
        let err = ClientError::from_response(400, r#"{"detail":"Email already registered"}"#);
        assert_eq!(err.status, ClientErrorStatus::Rejected);
        assert_eq!(err.http_status(), Some(400));
        assert_eq!(err.user_message("Registration failed"), "Email already registered");
    }

    #[test]
    fn validation_detail_falls_back() {
        let body = r#"{"detail":[{"loc":["body","email"],"msg":"field required"}]}"#;
        let err = ClientError::from_response(422, body);
        assert!(err.detail().is_none());
        assert_eq!(err.user_message("Failed to create template"), "Failed to create template");
    }

    #[test]
    fn non_json_body_falls_back() {
        let err = ClientError::from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(err.user_message("Failed to fetch templates"), "Failed to fetch templates");
    }

    #[test]
    fn unauthorized_response() {
        let err = ClientError::from_response(401, r#"{"detail":"Could not validate credentials"}"#);
        assert!(err.is_unauthorized());
        assert_eq!(err.http_status(), Some(401));
    }

    #[test]
    fn display_includes_trace() {
        let err = ClientError::network("connection refused")
            .in_op("http.send")
            .in_op_with("api.get_template", "t1");
        assert_eq!(
            err.to_string(),
            "[NETWORK_ERROR] connection refused | trace: http.send -> api.get_template(t1)"
        );
    }
}
