//! TemplateShare 客户端核心
//!
//! 与平台无关的业务层，不依赖 DOM / web_sys：
//! - `request`: HTTP 抽象（浏览器使用 fetch，测试使用 mock / reqwest）
//! - `api`: REST 客户端，负责 bearer token 注入与 401 处理
//! - `session`: 持久化存储抽象（token / user）
//! - `store`: 状态容器、reducer 与异步 action
//! - `route`: 路由表与路由守卫
//! - `detection`: 截屏 / 开发者工具检测启发式
//!
//! 日志统一走 `log` 门面，由宿主（前端）安装具体的 logger。

pub mod api;
pub mod config;
pub mod detection;
pub mod error;
pub mod request;
pub mod route;
pub mod session;
pub mod store;

pub use templateshare_shared as shared;

pub use api::TemplateShareApi;
pub use config::{ClientConfig, DetectionConfig};
pub use error::{ClientError, ClientErrorStatus, ClientResult};

#[cfg(test)]
pub(crate) mod fixtures;
