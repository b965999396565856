/// 编辑会话
///
/// 管理一次编辑的临时文件：生成缓冲区、写入文件、交给编辑器、读回解析、清理。
use std::path::{Path, PathBuf};

use crate::document::DocumentSet;
use crate::utils::I18nError;

use super::buffer::{ChangeSet, EditBuffer};
use super::parser;

/// 一次编辑会话
#[derive(Debug)]
pub struct EditSession {
    path: PathBuf,
    keys: Vec<String>,
    locales: Vec<String>,
    buffer: EditBuffer,
    with_tips: bool,
}

impl EditSession {
    /// 在当前目录创建会话，临时文件名为 `.i18nedt-<时间戳>.md`
    pub fn new(documents: &DocumentSet, keys: &[String], with_tips: bool) -> Self {
        Self::create_in(Path::new("."), documents, keys, with_tips)
    }

    /// 在指定目录创建会话
    pub fn create_in(
        dir: &Path,
        documents: &DocumentSet,
        keys: &[String],
        with_tips: bool,
    ) -> Self {
        let file_name = format!(".i18nedt-{}.md", chrono::Utc::now().timestamp());
        EditSession {
            path: dir.join(file_name),
            keys: keys.to_vec(),
            locales: documents.locales(),
            buffer: EditBuffer::serialize(documents, keys),
            with_tips,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    /// 当前缓冲区；调用 [`EditSession::read`] 后为解析出的变更集
    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    /// 渲染后的缓冲区文本
    pub fn content(&self) -> String {
        self.buffer.render(self.with_tips)
    }

    /// 写入临时文件
    pub fn write(&self) -> Result<(), I18nError> {
        std::fs::write(&self.path, self.content())?;
        tracing::debug!("会话文件已写入 {}", self.path.display());
        Ok(())
    }

    /// 读回临时文件并解析为变更集
    pub fn read(&mut self) -> Result<&ChangeSet, I18nError> {
        let bytes = std::fs::read(&self.path)?;
        let (text, _, _) = encoding_rs::UTF_8.decode(&bytes);
        self.buffer = parser::parse(&text)?;
        Ok(&self.buffer)
    }

    /// 删除临时文件；文件已不存在时忽略
    pub fn cleanup(&self) -> Result<(), I18nError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
