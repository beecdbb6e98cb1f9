//! 日誌相關工具函數
//!
//! 這個模組負責初始化全局日誌輸出（終端或文件）。

use std::fmt;
use std::fs::OpenOptions;
use std::path::PathBuf;

use env_logger::{Builder, Target, WriteStyle};

use crate::config::error::{ConfigError, Result};

/// 日誌輸出方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogWay {
    /// 輸出到標準錯誤
    Console,
    /// 追加寫入日誌文件
    File,
}

impl fmt::Display for LogWay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogWay::Console => write!(f, "console"),
            LogWay::File => write!(f, "file"),
        }
    }
}

/// 日誌初始化參數
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub way: LogWay,
    pub file: Option<PathBuf>,
    pub level: String,
    /// 保留天數，交給外部的日誌輪轉處理
    pub max_days: i64,
    pub disable_color: bool,
    pub disable_timestamp: bool,
}

impl LogSettings {
    /// 只要設定了日誌文件就使用文件模式
    pub fn new(
        file: Option<PathBuf>,
        level: &str,
        max_days: i64,
        disable_color: bool,
        disable_timestamp: bool,
    ) -> Self {
        let way = if file.is_some() { LogWay::File } else { LogWay::Console };
        Self {
            way,
            file,
            level: level.to_string(),
            max_days,
            disable_color,
            disable_timestamp,
        }
    }
}

/// 按設定構建 logger
///
/// 級別只取自 `settings.level`，不讀取 `RUST_LOG`。
fn logger_builder(settings: &LogSettings) -> Result<Builder> {
    let mut builder = Builder::new();
    builder.parse_filters(&settings.level);

    match (settings.way, &settings.file) {
        (LogWay::File, Some(path)) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| ConfigError::LogSink(format!("{}: {}", path.display(), e)))?;
            builder.target(Target::Pipe(Box::new(file)));
            builder.write_style(WriteStyle::Never);
        }
        _ => {
            if settings.disable_color {
                builder.write_style(WriteStyle::Never);
            }
            // 時間戳抑制只對終端輸出生效
            if settings.disable_timestamp {
                builder.format_timestamp(None);
            }
        }
    }

    Ok(builder)
}

/// 初始化日誌系統
///
/// # 參數
///
/// * `settings` - 日誌設定
///
/// # 返回
///
/// 全局 logger 已被設置或日誌文件無法打開時返回錯誤。
pub fn init_logger(settings: &LogSettings) -> Result<()> {
    logger_builder(settings)?
        .try_init()
        .map_err(|e| ConfigError::LogSink(e.to_string()))?;

    log::debug!(
        "Logger initialized: way={}, level={}, max_days={}",
        settings.way,
        settings.level,
        settings.max_days
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::LevelFilter;
    use serial_test::serial;

    #[test]
    fn test_log_way_selection() {
        let console = LogSettings::new(None, "info", 3, false, false);
        assert_eq!(console.way, LogWay::Console);

        let file = LogSettings::new(Some(PathBuf::from("/tmp/proxydock.log")), "debug", 7, false, true);
        assert_eq!(file.way, LogWay::File);
        assert_eq!(file.max_days, 7);
    }

    #[test]
    fn test_init_logger_only_once() {
        // 全局 logger 只能設置一次，第二次必須報錯
        let settings = LogSettings::new(None, "debug", 3, true, true);
        let _ = init_logger(&settings);
        let second = init_logger(&settings);
        assert!(matches!(second, Err(ConfigError::LogSink(_))));
    }

    #[test]
    fn test_init_logger_missing_parent() {
        let settings = LogSettings::new(
            Some(PathBuf::from("/nonexistent-proxydock-dir/sub/app.log")),
            "info",
            3,
            false,
            false,
        );
        assert!(matches!(init_logger(&settings), Err(ConfigError::LogSink(_))));
    }

    #[test]
    #[serial]
    fn test_level_ignores_rust_log() {
        // 解析後的級別優先於環境中的 RUST_LOG
        std::env::set_var("RUST_LOG", "error");
        let settings = LogSettings::new(None, "debug", 3, false, false);
        let logger = logger_builder(&settings).unwrap().build();
        std::env::remove_var("RUST_LOG");

        assert_eq!(logger.filter(), LevelFilter::Debug);
    }

    #[test]
    fn test_trace_not_compiled_out() {
        assert_eq!(log::STATIC_MAX_LEVEL, LevelFilter::Trace);
    }
}
