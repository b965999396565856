/// 编辑后文本的解析
///
/// 单遍、按行的状态机：
/// - 空行与 `//` 开头的行在任何位置都被忽略
/// - `#- key`：删除标记，之后没有值段
/// - `# key`：开始新的键段
/// - `* locale` / `+ locale`：开始该键下某个语言的字符串值 / JSON 值
/// - 其他行：追加到当前语言的值（多行以换行连接）
use super::buffer::ChangeSet;
use crate::utils::I18nError;
use crate::value::{TypedValue, ValueKind};

/// 正在累积的语言值
struct PendingValue {
    key: String,
    locale: String,
    kind: ValueKind,
    lines: Vec<String>,
}

impl PendingValue {
    /// 提交到变更集；JSON 值必须合法
    fn commit(self, changes: &mut ChangeSet) -> Result<(), I18nError> {
        let raw = self.lines.join("\n");
        let value = match self.kind {
            ValueKind::String => TypedValue::Text(raw),
            ValueKind::Json => {
                TypedValue::json(&raw).map_err(|source| I18nError::InvalidJson {
                    key: self.key.clone(),
                    locale: self.locale.clone(),
                    source,
                })?
            }
        };
        changes.insert(&self.key, &self.locale, value);
        Ok(())
    }
}

fn commit(changes: &mut ChangeSet, pending: &mut Option<PendingValue>) -> Result<(), I18nError> {
    match pending.take() {
        Some(value) => value.commit(changes),
        None => Ok(()),
    }
}

fn parse_error(line: usize, reason: &str) -> I18nError {
    I18nError::Parse {
        line,
        reason: reason.to_string(),
    }
}

/// 解析编辑后的缓冲区文本
///
/// # 错误
/// - `Parse`: 结构错误（缺少键名、缺少语言、语言标记不在键段内）
/// - `InvalidJson`: `+` 标记的值不是合法 JSON
pub fn parse(text: &str) -> Result<ChangeSet, I18nError> {
    let mut changes = ChangeSet::new();
    let mut current_key: Option<String> = None;
    let mut pending: Option<PendingValue> = None;

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix("#-") {
            commit(&mut changes, &mut pending)?;
            let key = rest.trim();
            if key.is_empty() {
                return Err(parse_error(line_no, "deletion marker without a key"));
            }
            changes.add_deletion(key);
            current_key = None;
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix('#') {
            commit(&mut changes, &mut pending)?;
            let key = rest.trim();
            if key.is_empty() {
                return Err(parse_error(line_no, "key header without a key"));
            }
            changes.ensure_key(key);
            current_key = Some(key.to_string());
            continue;
        }

        let marker = trimmed.chars().next().and_then(ValueKind::from_marker);
        if let Some(kind) = marker {
            commit(&mut changes, &mut pending)?;
            let key = current_key
                .clone()
                .ok_or_else(|| parse_error(line_no, "locale marker outside of a key section"))?;
            let locale = trimmed[1..]
                .split_whitespace()
                .next()
                .ok_or_else(|| parse_error(line_no, "locale marker without a locale"))?;
            pending = Some(PendingValue {
                key,
                locale: locale.to_string(),
                kind,
                lines: Vec::new(),
            });
            continue;
        }

        match pending.as_mut() {
            Some(value) => value.lines.push(line.to_string()),
            None => tracing::debug!("忽略第 {} 行：不在任何语言段内", line_no),
        }
    }

    commit(&mut changes, &mut pending)?;
    Ok(changes)
}
