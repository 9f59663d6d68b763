use std::time::Duration;

// =========================================================
// 运行时配置 (Runtime Configuration)
// =========================================================

/// 这些是默认值，如果环境中没有定义对应变量，则使用这些值
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_VISIBILITY_GRACE_MS: u64 = 800;
const DEFAULT_BLUR_GRACE_MS: u64 = 1000;

pub const VAR_API_URL: &str = "TEMPLATESHARE_API_URL";
pub const VAR_VISIBILITY_GRACE_MS: &str = "TEMPLATESHARE_VISIBILITY_GRACE_MS";
pub const VAR_BLUR_GRACE_MS: &str = "TEMPLATESHARE_BLUR_GRACE_MS";

/// 截屏检测的时间阈值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionConfig {
    /// 页面隐藏后需持续隐藏多久才算触发
    pub visibility_grace: Duration,
    /// 窗口失焦后多久检查一次页面是否隐藏
    pub blur_grace: Duration,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            visibility_grace: Duration::from_millis(DEFAULT_VISIBILITY_GRACE_MS),
            blur_grace: Duration::from_millis(DEFAULT_BLUR_GRACE_MS),
        }
    }
}

/// 客户端配置
///
/// 通过注入的变量查找函数构建，实现与具体环境解耦：
/// - wasm 构建时使用 `option_env!`（trunk 构建期注入）
/// - 本地 / 测试时可以传入 `std::env::var` 或任意闭包
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub detection: DetectionConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            detection: DetectionConfig::default(),
        }
    }
}

impl ClientConfig {
    /// 从变量查找函数构建配置，读不到或解析失败就用默认值
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let millis = |name: &str, default: u64| {
            let ms = lookup(name)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(default);
            Duration::from_millis(ms)
        };

        Self {
            api_base_url: lookup(VAR_API_URL)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            detection: DetectionConfig {
                visibility_grace: millis(VAR_VISIBILITY_GRACE_MS, DEFAULT_VISIBILITY_GRACE_MS),
                blur_grace: millis(VAR_BLUR_GRACE_MS, DEFAULT_BLUR_GRACE_MS),
            },
        }
    }

    /// 构建期注入的配置（`TEMPLATESHARE_* cargo build` / trunk）
    pub fn from_build_env() -> Self {
        Self::from_lookup(|name| {
            let value = match name {
                VAR_API_URL => option_env!("TEMPLATESHARE_API_URL"),
                VAR_VISIBILITY_GRACE_MS => option_env!("TEMPLATESHARE_VISIBILITY_GRACE_MS"),
                VAR_BLUR_GRACE_MS => option_env!("TEMPLATESHARE_BLUR_GRACE_MS"),
                _ => None,
            };
            value.map(str::to_string)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(|_| None);
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api_base_url, "http://localhost:8000/api");
        assert_eq!(config.detection.visibility_grace, Duration::from_millis(800));
        assert_eq!(config.detection.blur_grace, Duration::from_millis(1000));
    }

    #[test]
    fn reads_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (VAR_API_URL, " https://templates.example.com/api "),
            (VAR_VISIBILITY_GRACE_MS, "1200"),
        ]);
        let config = ClientConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.api_base_url, "https://templates.example.com/api");
        assert_eq!(config.detection.visibility_grace, Duration::from_millis(1200));
        assert_eq!(config.detection.blur_grace, Duration::from_millis(1000));
    }

    #[test]
    fn ignores_unparsable_numbers_and_blank_url() {
        let config = ClientConfig::from_lookup(|k| match k {
            VAR_API_URL => Some("   ".into()),
            VAR_BLUR_GRACE_MS => Some("soon".into()),
            _ => None,
        });
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.detection.blur_grace, Duration::from_millis(1000));
    }
}
