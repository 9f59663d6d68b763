use crate::{
    ApiResponse, CreateTemplateRequest, ImageUpload, LoginRequest, LoginResponse,
    RegisterRequest, Template, TemplatePatch,
};
use serde::de::DeserializeOwned;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A single field of a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, file: ImageUpload },
}

impl FormPart {
    pub fn name(&self) -> &str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultipartForm {
    pub parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn file(mut self, name: &str, file: ImageUpload) -> Self {
        self.parts.push(FormPart::File {
            name: name.to_string(),
            file,
        });
        self
    }

    pub fn get(&self, name: &str) -> Option<&FormPart> {
        self.parts.iter().find(|p| p.name() == name)
    }
}

/// Request payload; the transport decides how to encode it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartForm),
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait Endpoint {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// The URL path relative to the API base (e.g. `/templates/42`).
    fn path(&self) -> String;
    /// The request body.
    fn body(&self) -> RequestBody {
        RequestBody::Empty
    }
}

// =========================================================
// Auth
// =========================================================

impl Endpoint for LoginRequest {
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/auth/login".to_string()
    }

    fn body(&self) -> RequestBody {
        RequestBody::Json(serde_json::json!({
            "email": self.email,
            "password": self.password,
        }))
    }
}

impl Endpoint for RegisterRequest {
    type Response = ApiResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/auth/register".to_string()
    }

    fn body(&self) -> RequestBody {
        RequestBody::Json(serde_json::json!({
            "email": self.email,
            "username": self.username,
            "password": self.password,
            "role": self.role.as_str(),
        }))
    }
}

// =========================================================
// Templates
// =========================================================

/// List all templates (server-defined order)
#[derive(Debug, Clone, Copy)]
pub struct ListTemplatesRequest;

impl Endpoint for ListTemplatesRequest {
    type Response = Vec<Template>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/templates".to_string()
    }
}

#[derive(Debug, Clone)]
pub struct GetTemplateRequest {
    pub id: String,
}

impl Endpoint for GetTemplateRequest {
    type Response = Template;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/templates/{}", self.id)
    }
}

impl Endpoint for CreateTemplateRequest {
    type Response = ApiResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/templates".to_string()
    }

    fn body(&self) -> RequestBody {
        RequestBody::Multipart(
            MultipartForm::new()
                .text("title", self.title.clone())
                .text("description", self.description.clone())
                .file("image", self.image.clone()),
        )
    }
}

#[derive(Debug, Clone)]
pub struct UpdateTemplateRequest {
    pub id: String,
    pub patch: TemplatePatch,
}

impl Endpoint for UpdateTemplateRequest {
    type Response = ApiResponse;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/templates/{}", self.id)
    }

    fn body(&self) -> RequestBody {
        let mut form = MultipartForm::new();
        // 空字符串视同未修改
        if let Some(title) = self.patch.title.as_ref().filter(|t| !t.is_empty()) {
            form = form.text("title", title.clone());
        }
        if let Some(desc) = self.patch.description.as_ref().filter(|d| !d.is_empty()) {
            form = form.text("description", desc.clone());
        }
        if let Some(image) = &self.patch.image {
            form = form.file("image", image.clone());
        }
        RequestBody::Multipart(form)
    }
}

#[derive(Debug, Clone)]
pub struct DeleteTemplateRequest {
    pub id: String,
}

impl Endpoint for DeleteTemplateRequest {
    type Response = ApiResponse;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/templates/{}", self.id)
    }
}
