/// 变更记录模块
///
/// 记录变更应用过程中对每个语言文件做出的实际修改，
/// 便于输出摘要和审计。跳过的空操作不会出现在记录中。

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::document::Document;
use crate::utils::display_key;
use crate::value::TypedValue;

/// 变更类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// 删除了键
    Deleted,
    /// 新增或修改了键
    Updated,
}

/// 单个文件中单个键的变更
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChange {
    /// 文件路径
    pub path: PathBuf,
    pub locale: String,
    pub namespace: String,
    /// 键路径（不含命名空间）
    pub key: String,
    pub kind: ChangeKind,
    /// 修改前的值（新增时为 None）
    pub old_value: Option<TypedValue>,
    /// 修改后的值（删除时为 None）
    pub new_value: Option<TypedValue>,
}

impl DocumentChange {
    /// 删除变更
    pub fn deleted(document: &Document, key: &str, old_value: Option<TypedValue>) -> Self {
        Self {
            path: document.path.clone(),
            locale: document.locale.clone(),
            namespace: document.namespace.clone(),
            key: key.to_string(),
            kind: ChangeKind::Deleted,
            old_value,
            new_value: None,
        }
    }

    /// 新增 / 修改变更
    pub fn updated(
        document: &Document,
        key: &str,
        old_value: Option<TypedValue>,
        new_value: TypedValue,
    ) -> Self {
        Self {
            path: document.path.clone(),
            locale: document.locale.clone(),
            namespace: document.namespace.clone(),
            key: key.to_string(),
            kind: ChangeKind::Updated,
            old_value,
            new_value: Some(new_value),
        }
    }

    /// 缓冲区中的显示键
    pub fn display_key(&self) -> String {
        display_key(&self.namespace, &self.key)
    }
}

impl std::fmt::Display for DocumentChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |value: &Option<TypedValue>| match value {
            Some(value) => value.to_string(),
            None => "(无)".to_string(),
        };
        write!(
            f,
            "[{}] {}: {} -> {}",
            self.locale,
            self.display_key(),
            show(&self.old_value),
            show(&self.new_value)
        )
    }
}

/// 一次变更应用的结果
#[derive(Debug, Clone, Default)]
pub struct ApplyReport {
    changes: Vec<DocumentChange>,
}

impl ApplyReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加一条变更记录
    pub fn record(&mut self, change: DocumentChange) {
        self.changes.push(change);
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// 按应用顺序返回所有变更
    pub fn iter(&self) -> impl Iterator<Item = &DocumentChange> {
        self.changes.iter()
    }

    /// 实际被删除的显示键（去重，保持首次出现顺序）
    pub fn deleted_keys(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.changes
            .iter()
            .filter(|c| c.kind == ChangeKind::Deleted)
            .map(DocumentChange::display_key)
            .filter(|key| seen.insert(key.clone()))
            .collect()
    }

    /// 新增或修改的值的数量
    pub fn updated_count(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| c.kind == ChangeKind::Updated)
            .count()
    }

    /// 获取特定文件的所有变更
    pub fn get_changes_for_document(&self, path: &Path) -> Vec<&DocumentChange> {
        self.changes.iter().filter(|c| c.path == path).collect()
    }

    /// 生成变更摘要
    pub fn summary(&self) -> String {
        let files: BTreeSet<&Path> = self.changes.iter().map(|c| c.path.as_path()).collect();
        format!(
            "变更总数: {}, 删除: {}, 更新: {}, 涉及文件: {}",
            self.changes.len(),
            self.changes.len() - self.updated_count(),
            self.updated_count(),
            files.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(path: &str, locale: &str, namespace: &str) -> Document {
        Document::empty(path, locale, namespace)
    }

    #[test]
    fn test_report_basic() {
        let mut report = ApplyReport::new();
        assert!(report.is_empty());

        let en = doc("en/common.json", "en", "common");
        report.record(DocumentChange::updated(&en, "hello", None, TypedValue::text("world")));
        assert_eq!(report.len(), 1);
        assert_eq!(report.updated_count(), 1);
    }

    #[test]
    fn test_deleted_keys_are_unique() {
        let mut report = ApplyReport::new();
        let en = doc("en/auth.json", "en", "auth");
        let fr = doc("fr/auth.json", "fr", "auth");
        report.record(DocumentChange::deleted(&en, "login", Some(TypedValue::text("sign in"))));
        report.record(DocumentChange::deleted(&fr, "login", Some(TypedValue::text("connexion"))));
        report.record(DocumentChange::deleted(&en, "logout", None));

        assert_eq!(report.deleted_keys(), vec!["auth:login", "auth:logout"]);
        assert_eq!(report.updated_count(), 0);
    }

    #[test]
    fn test_get_changes_for_document() {
        let mut report = ApplyReport::new();
        let en = doc("en.json", "en", "");
        let fr = doc("fr.json", "fr", "");
        report.record(DocumentChange::updated(&en, "a", None, TypedValue::text("1")));
        report.record(DocumentChange::updated(&fr, "a", None, TypedValue::text("2")));
        report.record(DocumentChange::deleted(&en, "b", None));

        assert_eq!(report.get_changes_for_document(Path::new("en.json")).len(), 2);
    }

    #[test]
    fn test_display() {
        let en = doc("en.json", "en", "");
        let change = DocumentChange::updated(
            &en,
            "nav.home",
            Some(TypedValue::text("Home")),
            TypedValue::text("Start"),
        );
        assert_eq!(change.to_string(), "[en] nav.home: \"Home\" -> \"Start\"");
    }

    #[test]
    fn test_summary() {
        let mut report = ApplyReport::new();
        let en = doc("en.json", "en", "");
        report.record(DocumentChange::updated(&en, "a", None, TypedValue::text("1")));
        report.record(DocumentChange::deleted(&en, "b", None));

        let summary = report.summary();
        assert!(summary.contains("变更总数: 2"));
        assert!(summary.contains("涉及文件: 1"));
    }
}
