//! 测试共用的数据构造

use templateshare_shared::date::parse_timestamp;
use templateshare_shared::{ImageUpload, Role, Template, User};

pub fn user(role: Role) -> User {
    User {
        id: Some("u-1".into()),
        email: "ada@example.com".into(),
        username: "ada".into(),
        role,
        created_at: parse_timestamp("2024-01-01T00:00:00Z").unwrap(),
    }
}

pub fn template(id: &str) -> Template {
    let ts = parse_timestamp("2024-03-01T09:00:00Z").unwrap();
    Template {
        id: id.to_string(),
        title: format!("Template {}", id),
        description: "A reusable layout".into(),
        image_url: Some(format!("http://localhost:8000/api/images/{}", id)),
        created_by: "u-1".into(),
        created_at: ts,
        updated_at: ts,
    }
}

pub fn image() -> ImageUpload {
    ImageUpload {
        file_name: "cover.png".into(),
        content_type: "image/png".into(),
        bytes: vec![0x89, b'P', b'N', b'G'],
    }
}

/// 后端 `GET /templates` 风格的 JSON
pub fn templates_json(ids: &[&str]) -> String {
    let items: Vec<String> = ids
        .iter()
        .map(|id| {
            format!(
                r#"{{"_id":"{id}","title":"Template {id}","description":"A reusable layout","image_url":"http://localhost:8000/api/images/{id}","created_by":"u-1","created_at":"2024-03-01T09:00:00","updated_at":"2024-03-01T09:00:00"}}"#
            )
        })
        .collect();
    format!("[{}]", items.join(","))
}

pub fn login_json(token: &str, role: Role) -> String {
    format!(
        r#"{{"access_token":"{token}","token_type":"bearer","user":{{"_id":"u-1","email":"ada@example.com","username":"ada","role":"{}","created_at":"2024-01-01T00:00:00"}}}}"#,
        role.as_str()
    )
}

pub fn api_response_json(message: &str) -> String {
    format!(r#"{{"success":true,"message":"{message}","data":null}}"#)
}
