/// 变更应用
///
/// 把解析得到的 [`ChangeSet`] 合并回语言文件集合：
/// 1. 先处理删除：从命名空间匹配的所有文件中移除该键
/// 2. 再处理新增/修改：对每个 (键, 语言) 写入对应命名空间的文件
///
/// 同一个键既被删除又有值段时，先删除再写入，即以新值重建该键。
///
/// 值没有变化、语言不在变更集中、以及"键不存在且请求的是空字符串"都是空操作，
/// 因此不做任何编辑直接保存不会修改任何文件。
use crate::document::{Document, DocumentSet};
use crate::json_path::{self, AccessError};
use crate::utils::{split_composite_key, I18nError};
use crate::value::TypedValue;

use super::buffer::ChangeSet;
use super::report::{ApplyReport, DocumentChange};

/// 应用变更集
///
/// # 错误
/// - `InvalidJson`: 某个 JSON 值无法写入（只有在变更集不是由解析器生成时才可能发生）
///
/// 出错时已经应用的修改保留在内存中，但调用方不应持久化。
pub fn apply(documents: &mut DocumentSet, changes: &ChangeSet) -> Result<ApplyReport, I18nError> {
    let mut report = ApplyReport::new();

    for composite in changes.deletions() {
        let (namespace, key) = split_composite_key(composite);
        for document in documents.iter_mut().filter(|d| d.namespace == namespace) {
            delete_key(document, key, &mut report);
        }
    }

    for (composite, row) in changes.entries() {
        let (namespace, key) = split_composite_key(composite);
        for document in documents.iter_mut().filter(|d| d.namespace == namespace) {
            let Some(requested) = row.get(&document.locale) else {
                continue;
            };
            update_key(document, composite, key, requested, &mut report)?;
        }
    }

    tracing::debug!("{}", report.summary());
    Ok(report)
}

fn delete_key(document: &mut Document, key: &str, report: &mut ApplyReport) {
    let old_value = match document.get(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("跳过 {}: {}", document.path.display(), e);
            return;
        }
    };

    match json_path::delete(document.data(), key) {
        Ok(data) => {
            if document.replace_data(data) {
                report.record(DocumentChange::deleted(document, key, old_value));
            }
        }
        Err(e) => tracing::warn!("跳过 {}: {}", document.path.display(), e),
    }
}

fn update_key(
    document: &mut Document,
    composite: &str,
    key: &str,
    requested: &TypedValue,
    report: &mut ApplyReport,
) -> Result<(), I18nError> {
    let current = match document.get(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("跳过 {}: {}", document.path.display(), e);
            return Ok(());
        }
    };

    match &current {
        Some(value) if value == requested => return Ok(()),
        None if requested.is_empty_text() => return Ok(()),
        _ => {}
    }

    let data = match json_path::set(document.data(), key, requested) {
        Ok(data) => data,
        Err(AccessError::InvalidJson(source)) => {
            return Err(I18nError::InvalidJson {
                key: composite.to_string(),
                locale: document.locale.clone(),
                source,
            });
        }
        Err(e @ AccessError::InvalidDocument(_)) => {
            tracing::warn!("跳过 {}: {}", document.path.display(), e);
            return Ok(());
        }
    };

    if document.replace_data(data) {
        report.record(DocumentChange::updated(document, key, current, requested.clone()));
    }
    Ok(())
}
