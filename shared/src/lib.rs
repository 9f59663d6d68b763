use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod date;
pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 持久化存储中保存 bearer token 的键
pub const STORAGE_TOKEN_KEY: &str = "token";
/// 持久化存储中保存当前用户 JSON 的键
pub const STORAGE_USER_KEY: &str = "user";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    // 后端以 `_id` 输出，本地存储中以 `id` 保存
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub role: Role,
    #[serde(with = "date::iso")]
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_by: String,
    #[serde(with = "date::iso")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "date::iso")]
    pub updated_at: DateTime<Utc>,
}

/// 已登录会话：token 与其所属用户
///
/// token 存在即视为已认证，直到下一次请求被服务端以 401 拒绝。
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

// =========================================================
// 请求 / 响应 (DTOs)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: User,
}

impl From<LoginResponse> for Session {
    fn from(resp: LoginResponse) -> Self {
        Session {
            token: resp.access_token,
            user: resp.user,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// 后端通用响应包装
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// 上传的图片文件（已读入内存）
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTemplateRequest {
    pub title: String,
    pub description: String,
    pub image: ImageUpload,
}

/// 模板的部分更新，只发送存在的字段
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemplatePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<ImageUpload>,
}

impl TemplatePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.image.is_none()
    }
}
