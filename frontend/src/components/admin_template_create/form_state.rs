//! 表单状态管理模块
//!
//! 将零散的 signal 整合为 `FormState` 结构体，负责：
//! - 数据的持有
//! - 数据的重置
//! - 数据到请求对象的转换

use leptos::prelude::*;
use templateshare::shared::{CreateTemplateRequest, ImageUpload};

/// 标题与图片都存在时才能构建请求
pub fn build_request(
    title: &str,
    description: &str,
    image: Option<ImageUpload>,
) -> Option<CreateTemplateRequest> {
    let title = title.trim();
    if title.is_empty() {
        return None;
    }
    let image = image.filter(|img| !img.file_name.is_empty())?;
    Some(CreateTemplateRequest {
        title: title.to_string(),
        description: description.trim().to_string(),
        image,
    })
}

/// 表单状态结构体
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，非常适合作为 Props 在组件间传递。
#[derive(Clone, Copy)]
pub struct FormState {
    pub title: RwSignal<String>,
    pub description: RwSignal<String>,
    /// 已读入内存的图片
    pub image: RwSignal<Option<ImageUpload>>,
}

impl FormState {
    /// 创建新的表单状态，所有字段为空
    pub fn new() -> Self {
        Self {
            title: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
            image: RwSignal::new(None),
        }
    }

    /// 重置表单到初始状态
    pub fn reset(&self) {
        self.title.set(String::new());
        self.description.set(String::new());
        self.image.set(None);
    }

    /// 提交按钮是否可用（不含 loading 判断）
    pub fn is_complete(&self) -> bool {
        !self.title.with(|t| t.trim().is_empty()) && self.image.with(Option::is_some)
    }

    /// 将表单状态转换为 API 请求对象
    pub fn to_request(&self) -> Option<CreateTemplateRequest> {
        build_request(
            &self.title.get_untracked(),
            &self.description.get_untracked(),
            self.image.get_untracked(),
        )
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}
