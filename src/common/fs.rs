//! 文件系統相關工具函數
//!
//! 這個模組提供了路徑展開、配置目錄規範化和目錄創建等工具函數。

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::config::error::{ConfigError, Result};

/// `$HOME` 佔位符
pub const HOME_TOKEN: &str = "$HOME";

/// 新建目錄的權限：屬主和屬組可讀寫執行，其他人無權限
pub const DIR_MODE: u32 = 0o750;

/// 展開路徑中的 `~` 和 `$HOME`
///
/// # 參數
///
/// * `path` - 原始路徑
/// * `home` - 用戶主目錄，無法確定時為 `None`
///
/// # 返回
///
/// 展開後的路徑；路徑需要主目錄但無法確定主目錄時返回錯誤。
pub fn expand_home(path: &str, home: Option<&Path>) -> Result<String> {
    let needs_home = path == "~" || path.starts_with("~/") || path.contains(HOME_TOKEN);
    if path.starts_with('~') && !needs_home {
        // `~user` 形式不支持
        return Err(ConfigError::InvalidValue(
            "config".to_string(),
            format!("cannot expand user-relative path {}", path),
        ));
    }
    if !needs_home {
        return Ok(path.to_string());
    }

    let home = home.ok_or(ConfigError::HomeDirUnavailable)?;
    let home = home.to_string_lossy();

    let mut expanded = match path.strip_prefix('~') {
        Some(rest) => format!("{}{}", home, rest),
        None => path.to_string(),
    };
    if expanded.contains(HOME_TOKEN) {
        expanded = expanded.replace(HOME_TOKEN, &home);
    }
    Ok(expanded)
}

/// 規範化配置目錄路徑
///
/// 目錄部分保持不變，最後一級目錄名中的 `.` 全部替換為 `_`，
/// 然後展開 `~` 和 `$HOME`。
pub fn normalize_config_dir(raw: &str, home: Option<&Path>) -> Result<PathBuf> {
    let raw_path = Path::new(raw);
    let replaced = match raw_path.file_name() {
        Some(base) => {
            let base = base.to_string_lossy().replace('.', "_");
            match raw_path.parent() {
                Some(parent) => parent.join(base),
                None => PathBuf::from(base),
            }
        }
        None => raw_path.to_path_buf(),
    };

    let expanded = expand_home(&replaced.to_string_lossy(), home)?;
    Ok(PathBuf::from(expanded))
}

/// 確保目錄存在
///
/// 目錄不存在時以 [`DIR_MODE`] 權限遞歸創建。除「不存在」以外的
/// 狀態查詢錯誤只記錄警告，不視為失敗。
///
/// # 返回
///
/// 創建了新目錄時返回 `Ok(true)`。
pub fn ensure_dir(path: &Path) -> io::Result<bool> {
    match fs::metadata(path) {
        Ok(_) => Ok(false),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("Creating directory {}", path.display());
            create_dir_restricted(path)?;
            Ok(true)
        }
        Err(e) => {
            warn!("{}: {}", path.display(), e);
            Ok(false)
        }
    }
}

#[cfg(unix)]
fn create_dir_restricted(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new()
        .recursive(true)
        .mode(DIR_MODE)
        .create(path)
}

#[cfg(not(unix))]
fn create_dir_restricted(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}
