/// 翻译完整性检查
///
/// 同一命名空间内的所有语言文件应包含相同的键。
/// 以命名空间内所有文件扁平化后的键并集为准，逐个文件报告缺失的键与空字符串值。
use std::collections::{BTreeMap, BTreeSet};

use crate::document::{Document, DocumentSet};
use crate::flatten::flatten_json;
use crate::utils::I18nError;

/// 单个文件的检查结果
#[derive(Debug, Clone)]
pub struct CheckResult<'a> {
    pub document: &'a Document,
    /// 其他语言有而本文件没有的键
    pub missing_keys: Vec<String>,
    /// 值为空字符串的键
    pub empty_keys: Vec<String>,
}

impl CheckResult<'_> {
    pub fn has_issues(&self) -> bool {
        !self.missing_keys.is_empty() || !self.empty_keys.is_empty()
    }
}

/// 检查所有文件，结果按文件路径排序
pub fn check(documents: &DocumentSet) -> Result<Vec<CheckResult<'_>>, I18nError> {
    let mut groups: BTreeMap<&str, Vec<&Document>> = BTreeMap::new();
    for document in documents.iter() {
        groups.entry(document.namespace.as_str()).or_default().push(document);
    }

    let mut results = Vec::new();
    for members in groups.values() {
        let mut flats = Vec::with_capacity(members.len());
        for document in members {
            let flat = flatten_json(document.data(), &document.namespace).map_err(|source| {
                I18nError::InvalidDocument {
                    path: document.path.display().to_string(),
                    source,
                }
            })?;
            flats.push(flat);
        }

        let all_keys: BTreeSet<&String> = flats.iter().flat_map(|flat| flat.keys()).collect();

        for (document, flat) in members.iter().copied().zip(&flats) {
            let missing_keys = all_keys
                .iter()
                .filter(|key| !flat.contains_key(key.as_str()))
                .map(|key| key.to_string())
                .collect();
            let empty_keys = flat
                .iter()
                .filter(|(_, value)| value.as_str() == "\"\"")
                .map(|(key, _)| key.clone())
                .collect();
            results.push(CheckResult {
                document,
                missing_keys,
                empty_keys,
            });
        }
    }

    results.sort_by(|a, b| a.document.path.cmp(&b.document.path));
    Ok(results)
}

/// 生成检查报告
///
/// `simple` 模式只输出去重排序后的问题键，每行一个；没有问题时输出为空。
pub fn render_report(results: &[CheckResult<'_>], simple: bool) -> String {
    if simple {
        let keys: BTreeSet<&str> = results
            .iter()
            .flat_map(|r| r.missing_keys.iter().chain(&r.empty_keys))
            .map(String::as_str)
            .collect();
        return keys.into_iter().map(|key| format!("{}\n", key)).collect();
    }

    let mut report = String::new();
    for result in results.iter().filter(|r| r.has_issues()) {
        let document = result.document;
        report.push_str(&format!(
            "文件: {} (语言: {}, 命名空间: {})\n",
            document.path.display(),
            document.locale,
            document.namespace
        ));
        if !result.missing_keys.is_empty() {
            report.push_str("  缺失的键:\n");
            for key in &result.missing_keys {
                report.push_str(&format!("    - {}\n", key));
            }
        }
        if !result.empty_keys.is_empty() {
            report.push_str("  空值的键:\n");
            for key in &result.empty_keys {
                report.push_str(&format!("    - {}\n", key));
            }
        }
        report.push('\n');
    }

    if report.is_empty() {
        report.push_str("没有发现问题，所有键都存在且非空。\n");
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_documents() -> DocumentSet {
        DocumentSet::new(vec![
            Document::new("locales/fr/common.json", r#"{"hello":"","nav":{"home":"Accueil"}}"#, "fr", "common"),
            Document::new("locales/en/common.json", r#"{"hello":"Hello","nav":{"home":"Home","about":"About"}}"#, "en", "common"),
            Document::new("locales/en/auth.json", r#"{"login":"Sign in"}"#, "en", "auth"),
        ])
    }

    #[test]
    fn test_check_groups_by_namespace() {
        let documents = create_test_documents();
        let results = check(&documents).unwrap();

        let paths: Vec<_> = results.iter().map(|r| r.document.path.to_str().unwrap()).collect();
        assert_eq!(
            paths,
            vec!["locales/en/auth.json", "locales/en/common.json", "locales/fr/common.json"]
        );

        assert!(!results[0].has_issues());
        assert!(!results[1].has_issues());
        assert_eq!(results[2].missing_keys, vec!["common:nav.about"]);
        assert_eq!(results[2].empty_keys, vec!["common:hello"]);
    }

    #[test]
    fn test_render_simple() {
        let documents = create_test_documents();
        let results = check(&documents).unwrap();
        assert_eq!(render_report(&results, true), "common:hello\ncommon:nav.about\n");
    }

    #[test]
    fn test_render_full() {
        let documents = create_test_documents();
        let results = check(&documents).unwrap();
        let report = render_report(&results, false);
        assert!(report.starts_with("文件: locales/fr/common.json (语言: fr, 命名空间: common)\n"));
        assert!(report.contains("  缺失的键:\n    - common:nav.about\n"));
        assert!(report.contains("  空值的键:\n    - common:hello\n"));
    }

    #[test]
    fn test_no_issues() {
        let documents = DocumentSet::new(vec![
            Document::new("en.json", r#"{"a":"1"}"#, "en", ""),
            Document::new("fr.json", r#"{"a":"2"}"#, "fr", ""),
        ]);
        let results = check(&documents).unwrap();
        assert!(results.iter().all(|r| !r.has_issues()));
        assert_eq!(render_report(&results, true), "");
        assert!(render_report(&results, false).contains("没有发现问题"));
    }
}
