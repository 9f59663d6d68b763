//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 实现核心库的 `HttpClient`，
//! JSON 请求体以字符串发送，multipart 请求体转换为 `FormData`
//! （Content-Type 与 boundary 交给浏览器生成）。

use async_trait::async_trait;
use templateshare::request::{HttpClient, HttpRequest, HttpResponse};
use templateshare::shared::protocol::{FormPart, MultipartForm, RequestBody};
use templateshare::shared::ImageUpload;
use templateshare::{ClientError, ClientResult};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Headers, Request, RequestInit, Response};

/// HTTP 错误类型
#[derive(Debug)]
pub enum HttpError {
    /// 请求构建失败
    RequestBuildFailed(String),
    /// 网络请求失败
    NetworkError(String),
    /// 响应解析失败
    ResponseParseFailed(String),
}

impl core::fmt::Display for HttpError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HttpError::RequestBuildFailed(msg) => write!(f, "请求构建失败: {}", msg),
            HttpError::NetworkError(msg) => write!(f, "网络错误: {}", msg),
            HttpError::ResponseParseFailed(msg) => write!(f, "响应解析失败: {}", msg),
        }
    }
}

impl From<HttpError> for ClientError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::RequestBuildFailed(_) => ClientError::invalid_input(err.to_string()),
            HttpError::NetworkError(_) => ClientError::network(err.to_string()),
            HttpError::ResponseParseFailed(_) => ClientError::serialization(err.to_string()),
        }
    }
}

/// 把上传的文件转换为 Blob
fn to_blob(file: &ImageUpload) -> Result<Blob, HttpError> {
    let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);
    let options = BlobPropertyBag::new();
    options.set_type(&file.content_type);
    Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(|e| HttpError::RequestBuildFailed(format!("创建 Blob 失败: {:?}", e)))
}

fn to_form_data(form: &MultipartForm) -> Result<FormData, HttpError> {
    let data = FormData::new()
        .map_err(|e| HttpError::RequestBuildFailed(format!("创建 FormData 失败: {:?}", e)))?;
    for part in &form.parts {
        let appended = match part {
            FormPart::Text { name, value } => data.append_with_str(name, value),
            FormPart::File { name, file } => {
                let blob = to_blob(file)?;
                data.append_with_blob_and_filename(name, &blob, &file.file_name)
            }
        };
        appended.map_err(|e| {
            HttpError::RequestBuildFailed(format!("添加表单字段 {} 失败: {:?}", part.name(), e))
        })?;
    }
    Ok(data)
}

async fn response_text(response: &Response) -> Result<String, HttpError> {
    let promise = response
        .text()
        .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;

    let text = JsFuture::from(promise)
        .await
        .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;

    text.as_string()
        .ok_or_else(|| HttpError::ResponseParseFailed("无法转换为字符串".to_string()))
}

async fn fetch(req: HttpRequest) -> Result<HttpResponse, HttpError> {
    let headers = Headers::new()
        .map_err(|e| HttpError::RequestBuildFailed(format!("创建 Headers 失败: {:?}", e)))?;

    for (key, value) in &req.headers {
        headers
            .set(key, value)
            .map_err(|e| HttpError::RequestBuildFailed(format!("设置 Header 失败: {:?}", e)))?;
    }

    let opts = RequestInit::new();
    opts.set_method(req.method.as_str());
    opts.set_headers(&headers.into());

    match &req.body {
        RequestBody::Empty => {}
        RequestBody::Json(json) => opts.set_body(&JsValue::from_str(&json.to_string())),
        RequestBody::Multipart(form) => opts.set_body(&to_form_data(form)?.into()),
    }

    let request = Request::new_with_str_and_init(&req.url, &opts)
        .map_err(|e| HttpError::RequestBuildFailed(format!("{:?}", e)))?;

    let window = web_sys::window()
        .ok_or_else(|| HttpError::NetworkError("无法获取 window 对象".to_string()))?;

    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| HttpError::NetworkError(format!("{:?}", e)))?;

    let response: Response = resp_value
        .dyn_into()
        .map_err(|e| HttpError::ResponseParseFailed(format!("Response 类型转换失败: {:?}", e)))?;

    let body = response_text(&response).await?;
    Ok(HttpResponse::new(response.status(), body))
}

/// 基于 fetch 的 HTTP 客户端
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchHttpClient;

#[async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        fetch(req).await.map_err(ClientError::from)
    }
}

/// 读取 `<input type="file">` 选中的文件
pub async fn read_upload(file: &web_sys::File) -> ClientResult<ImageUpload> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| HttpError::ResponseParseFailed(format!("读取文件失败: {:?}", e)))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(ImageUpload {
        file_name: file.name(),
        content_type: file.type_(),
        bytes,
    })
}
