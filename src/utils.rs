use thiserror::Error;
use std::path::{Path, PathBuf};

/// 自定义错误类型
#[derive(Error, Debug)]
pub enum I18nError {
    #[error("Invalid JSON in file {path}: {source}")]
    InvalidDocument {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid JSON value for key '{key}' (locale '{locale}'): {source}")]
    InvalidJson {
        key: String,
        locale: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Editor failure: {0}")]
    EditorFailure(String),

    #[error("Path {path} does not match pattern {pattern}")]
    PathResolution { path: String, pattern: String },

    #[error("Invalid path pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Cannot create namespace '{0}': no pattern with both {{{{language}}}} and {{{{ns}}}} placeholders was given")]
    MissingNamespace(String),

    #[error("At least one file must be specified (use command line arguments or I18NEDT_FILES)")]
    NoFiles,

    #[error("At least one key must be specified with -k/--key")]
    NoKeys,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// 拆分复合键 `namespace:key`
///
/// 只按第一个 `:` 拆分；没有命名空间时返回空字符串
pub fn split_composite_key(composite: &str) -> (&str, &str) {
    match composite.split_once(':') {
        Some((namespace, key)) => (namespace, key),
        None => ("", composite),
    }
}

/// 构造显示键：空命名空间不加前缀
pub fn display_key(namespace: &str, key: &str) -> String {
    if namespace.is_empty() {
        key.to_string()
    } else {
        format!("{}:{}", namespace, key)
    }
}

/// 创建文件备份
///
/// 备份文件与原文件同目录，命名为 `<原文件名>.<时间戳>.bak`
pub fn create_backup(file_path: &Path) -> Result<PathBuf, I18nError> {
    if !file_path.exists() {
        return Err(I18nError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("file to back up does not exist: {}", file_path.display()),
        )));
    }

    let timestamp = chrono::Local::now().format("%Y-%m-%d-%H-%M-%S");
    let file_name = file_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let backup_path = file_path.with_file_name(format!("{}.{}.bak", file_name, timestamp));

    std::fs::copy(file_path, &backup_path)?;

    Ok(backup_path)
}
