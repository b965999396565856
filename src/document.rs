use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::discovery::FileSource;
use crate::io::{DocumentReader, DocumentWriter};
use crate::json_path::{self, AccessError};
use crate::locale::parse_locale_from_path;
use crate::pattern::PathPattern;
use crate::utils::{create_backup, split_composite_key, I18nError};
use crate::value::TypedValue;

/// 单个语言文件
///
/// `data` 始终是合法的 JSON 文本；只能通过 [`Document::replace_data`] 修改，
/// 修改后 `dirty` 被置位，并且在本次会话中不会再被清除。
#[derive(Debug, Clone)]
pub struct Document {
    /// 源文件 / 写回路径
    pub path: PathBuf,
    /// 语言标识（同一命名空间内唯一）
    pub locale: String,
    /// 命名空间（空字符串为默认命名空间）
    pub namespace: String,
    data: String,
    dirty: bool,
}

impl Document {
    /// 创建语言文件
    pub fn new(
        path: impl Into<PathBuf>,
        data: impl Into<String>,
        locale: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Document {
            path: path.into(),
            data: data.into(),
            locale: locale.into(),
            namespace: namespace.into(),
            dirty: false,
        }
    }

    /// 创建内容为 `{}` 的语言文件
    pub fn empty(
        path: impl Into<PathBuf>,
        locale: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self::new(path, "{}", locale, namespace)
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// 读取键路径上的值
    pub fn get(&self, key: &str) -> Result<Option<TypedValue>, AccessError> {
        json_path::get(&self.data, key)
    }

    /// 替换文档内容，内容有变化时标记为 dirty
    ///
    /// # 返回
    /// 内容是否发生了变化
    pub fn replace_data(&mut self, data: String) -> bool {
        if data == self.data {
            return false;
        }
        self.data = data;
        self.dirty = true;
        true
    }
}

/// 语言文件集合
///
/// 每个 (命名空间, 语言) 组合对应一个文件
#[derive(Debug, Clone, Default)]
pub struct DocumentSet {
    documents: Vec<Document>,
}

impl DocumentSet {
    pub fn new(documents: Vec<Document>) -> Self {
        DocumentSet { documents }
    }

    /// 加载所有文件
    ///
    /// # 参数
    /// * `sources` - 文件发现的结果
    /// * `reader` - 语言文件读取器
    /// * `path_as_locale` - 用完整路径作为普通路径参数的语言标识
    ///
    /// # 错误
    /// 任意文件不是合法 JSON 时整体失败；路径不匹配模板的文件被跳过
    pub fn load(
        sources: &[FileSource],
        reader: &dyn DocumentReader,
        path_as_locale: bool,
    ) -> Result<Self, I18nError> {
        let mut set = DocumentSet::default();

        for source in sources {
            let (locale, namespace) = match resolve_metadata(source, path_as_locale) {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::warn!("跳过文件: {}", e);
                    continue;
                }
            };

            if let Some(existing) = set.find(&namespace, &locale) {
                tracing::warn!(
                    "跳过文件 {}: 语言 '{}' 在命名空间 '{}' 中已由 {} 提供",
                    source.path.display(),
                    locale,
                    namespace,
                    existing.path.display()
                );
                continue;
            }

            let data = reader.read(&source.path)?;
            if data.is_none() {
                tracing::debug!("{} 不存在，按空文件处理", source.path.display());
            }
            set.documents.push(Document::new(
                source.path.clone(),
                data.unwrap_or_else(|| "{}".to_string()),
                locale,
                namespace,
            ));
        }

        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Document> {
        self.documents.iter_mut()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// 按命名空间与语言查找文件
    pub fn find(&self, namespace: &str, locale: &str) -> Option<&Document> {
        self.documents
            .iter()
            .find(|d| d.namespace == namespace && d.locale == locale)
    }

    /// 所有语言，按字典序排列
    pub fn locales(&self) -> Vec<String> {
        self.documents
            .iter()
            .map(|d| d.locale.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// 所有命名空间，按字典序排列
    pub fn namespaces(&self) -> Vec<String> {
        self.documents
            .iter()
            .map(|d| d.namespace.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn dirty_count(&self) -> usize {
        self.documents.iter().filter(|d| d.is_dirty()).count()
    }

    /// 为请求中不存在的命名空间创建空文件
    ///
    /// 需要一个同时包含语言与命名空间占位符的模板来构造文件路径。
    /// 新文件只有在编辑后变为 dirty 时才会写入磁盘。
    ///
    /// # 返回
    /// 新创建的命名空间列表
    pub fn create_missing_namespaces(
        &mut self,
        keys: &[String],
        templates: &[PathPattern],
    ) -> Result<Vec<String>, I18nError> {
        let existing: BTreeSet<&str> = self.documents.iter().map(|d| d.namespace.as_str()).collect();
        let missing: BTreeSet<String> = keys
            .iter()
            .filter(|key| key.contains(':'))
            .map(|key| split_composite_key(key).0)
            .filter(|namespace| !namespace.is_empty() && !existing.contains(namespace))
            .map(str::to_string)
            .collect();

        let Some(first_missing) = missing.iter().next() else {
            return Ok(Vec::new());
        };

        let template = templates
            .iter()
            .find(|t| t.has_locale() && t.has_namespace())
            .ok_or_else(|| I18nError::MissingNamespace(first_missing.clone()))?;

        let locales = self.locales();
        if locales.is_empty() {
            return Err(I18nError::MissingNamespace(first_missing.clone()));
        }

        for namespace in &missing {
            for locale in &locales {
                let path = template.construct(locale, namespace);
                tracing::debug!("创建命名空间文件 {}", path.display());
                self.documents
                    .push(Document::empty(path, locale.clone(), namespace.clone()));
            }
        }

        Ok(missing.into_iter().collect())
    }

    /// 为即将写入的已存在文件创建备份
    pub fn backup_dirty(&self) -> Result<Vec<PathBuf>, I18nError> {
        self.documents
            .iter()
            .filter(|d| d.is_dirty() && d.path.exists())
            .map(|d| create_backup(&d.path))
            .collect()
    }

    /// 写回所有 dirty 文件，未修改的文件不会被触碰
    ///
    /// # 返回
    /// 写入的文件数量
    pub fn persist(&self, writer: &dyn DocumentWriter) -> Result<usize, I18nError> {
        let mut count = 0;
        for document in self.documents.iter().filter(|d| d.is_dirty()) {
            writer.write(&document.path, document.data())?;
            tracing::debug!("已写入 {}", document.path.display());
            count += 1;
        }
        Ok(count)
    }
}

/// 推断文件的 (语言, 命名空间)
fn resolve_metadata(source: &FileSource, path_as_locale: bool) -> Result<(String, String), I18nError> {
    match &source.pattern {
        Some(pattern) => {
            let (locale, namespace) =
                pattern
                    .extract(&source.path)
                    .ok_or_else(|| I18nError::PathResolution {
                        path: source.path.display().to_string(),
                        pattern: pattern.as_str().to_string(),
                    })?;
            let locale = if locale.is_empty() {
                parse_locale_from_path(&source.path)
            } else {
                locale
            };
            Ok((locale, namespace))
        }
        None if path_as_locale => Ok((path_locale(&source.path), String::new())),
        None => Ok((parse_locale_from_path(&source.path), String::new())),
    }
}

fn path_locale(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
