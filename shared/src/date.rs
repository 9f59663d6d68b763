//! 时间类型模块
//!
//! 后端返回的时间字符串格式并不统一：
//! - 带时区偏移的 RFC 3339（`2024-05-01T10:00:00+00:00`）
//! - 不带偏移的 naive 时间（`2024-05-01T10:00:00.123456`），约定为 UTC
//!
//! 这里统一解析为 `DateTime<Utc>`，并提供给 serde 使用的 `with` 模块。

use chrono::{DateTime, NaiveDateTime, Utc};

/// naive 时间可能出现的格式（有无小数秒）
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// 解析 ISO 8601 时间字符串
///
/// 返回 None 如果所有格式都无法解析
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// 用于界面展示的日期（`YYYY-MM-DD`）
pub fn display_date(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// `#[serde(with = "crate::date::iso")]`
pub mod iso {
    use super::parse_timestamp;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {}", raw)))
    }
}
