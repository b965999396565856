/// 语言文件 IO 实现
///
/// 提供基于文件系统的默认读写实现：
/// - 读取时自动识别并去除 BOM（UTF-8 / UTF-16）
/// - 写入时格式化为 2 空格缩进，先写同目录临时文件再重命名
use std::io::Write;
use std::path::Path;

use super::traits::{DocumentReader, DocumentWriter};
use crate::utils::I18nError;

/// 默认的语言文件读取器（基于 std::fs）
#[derive(Debug, Clone, Default)]
pub struct DefaultDocumentReader;

impl DocumentReader for DefaultDocumentReader {
    fn read(&self, path: &Path) -> Result<Option<String>, I18nError> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let (text, encoding, had_errors) = encoding_rs::UTF_8.decode(&bytes);
        if had_errors {
            tracing::warn!(
                "{} 包含无效的 {} 字节序列，已替换为 U+FFFD",
                path.display(),
                encoding.name()
            );
        }

        if text.trim().is_empty() {
            return Ok(Some("{}".to_string()));
        }

        serde_json::from_str::<serde_json::Value>(&text).map_err(|source| {
            I18nError::InvalidDocument {
                path: path.display().to_string(),
                source,
            }
        })?;

        Ok(Some(text.into_owned()))
    }
}

/// 默认的语言文件写入器（原子写入）
#[derive(Debug, Clone, Default)]
pub struct DefaultDocumentWriter;

impl DocumentWriter for DefaultDocumentWriter {
    fn write(&self, path: &Path, data: &str) -> Result<(), I18nError> {
        let value: serde_json::Value =
            serde_json::from_str(data).map_err(|source| I18nError::InvalidDocument {
                path: path.display().to_string(),
                source,
            })?;
        let mut formatted = serde_json::to_string_pretty(&value)?;
        formatted.push('\n');

        // 确保父目录存在
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        temp.write_all(formatted.as_bytes())?;
        temp.flush()?;

        // 保留原文件权限；新文件使用常规权限
        match std::fs::metadata(path) {
            Ok(metadata) => temp.as_file().set_permissions(metadata.permissions())?,
            Err(_) => {
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    temp.as_file()
                        .set_permissions(std::fs::Permissions::from_mode(0o644))?;
                }
            }
        }

        temp.persist(path).map_err(|e| I18nError::IoError(e.error))?;
        Ok(())
    }
}
