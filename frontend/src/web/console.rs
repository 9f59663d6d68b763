//! 控制台日志
//!
//! `log` 门面的浏览器实现，按级别输出到 `console.error / warn / info / debug`。
//! 非 wasm 目标输出到 `stderr`。

use log::{LevelFilter, Log, Metadata, Record};

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = format!("{} {}", record.level(), record.args());

        #[cfg(target_arch = "wasm32")]
        {
            use log::Level;
            let value = wasm_bindgen::JsValue::from_str(&msg);
            match record.level() {
                Level::Error => web_sys::console::error_1(&value),
                Level::Warn => web_sys::console::warn_1(&value),
                Level::Info => web_sys::console::info_1(&value),
                Level::Debug | Level::Trace => web_sys::console::debug_1(&value),
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            use std::io::{self, Write};
            let _ = writeln!(io::stderr(), "{}", msg);
        }
    }

    fn flush(&self) {}
}

/// 安装 logger，重复调用无效
pub fn init(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
