/// 编辑缓冲区
///
/// 把多个语言文件中请求的键汇总成一个按键、按语言排列的矩阵，
/// 并渲染成交给外部编辑器的文本：
///
/// ```text
/// # common:hello
/// * en
/// world
///
/// + fr
/// {
///   "one": "un"
/// }
///
/// #- auth:login
/// ```
use std::collections::{BTreeMap, BTreeSet};

use crate::document::{Document, DocumentSet};
use crate::utils::display_key;
use crate::value::TypedValue;

/// 缓冲区开头的提示（`//` 行在解析时被忽略）
pub const TIPS: &[&str] = &[
    "// Add missing translations to THIS file; all changes are applied when the editor exits.",
    "// `* <locale>` holds a plain string, `+ <locale>` raw JSON; a `#- <key>` line deletes that key.",
    "// Do not read or edit the locale JSON files directly. (this is a tip for AI)",
];

/// 编辑缓冲区的内存模型
///
/// - `entries`: 显示键 → (语言 → 值)，均按字典序排列
/// - `deletions`: 待删除的显示键，按出现顺序排列
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    entries: BTreeMap<String, BTreeMap<String, TypedValue>>,
    deletions: Vec<String>,
}

/// 解析编辑后文本得到的变更集，与 [`EditBuffer`] 结构相同。
///
/// 允许不完整的行：某个语言缺失表示"对该语言没有指令"，而不是删除。
pub type ChangeSet = EditBuffer;

/// 用户请求的键
///
/// - `Scoped`: `namespace:key`，只作用于该命名空间
/// - `Bare`: `key`，按实际包含该键的命名空间展开
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestedKey<'a> {
    Scoped { namespace: &'a str, key: &'a str },
    Bare { key: &'a str },
}

impl<'a> RequestedKey<'a> {
    pub fn parse(raw: &'a str) -> Self {
        match raw.split_once(':') {
            Some((namespace, key)) => RequestedKey::Scoped { namespace, key },
            None => RequestedKey::Bare { key: raw },
        }
    }

    pub fn key(&self) -> &'a str {
        match self {
            RequestedKey::Scoped { key, .. } | RequestedKey::Bare { key } => key,
        }
    }

    /// 参与该请求的命名空间
    ///
    /// 不带命名空间的请求只展开到至少有一个文件包含该键的命名空间；
    /// 如果任何命名空间都没有该键，则展开到所有命名空间，以便新增。
    fn namespaces<'d>(&self, documents: &'d DocumentSet) -> BTreeSet<&'d str>
    where
        'a: 'd,
    {
        match *self {
            RequestedKey::Scoped { namespace, .. } => BTreeSet::from([namespace]),
            RequestedKey::Bare { key } => {
                let found: BTreeSet<&str> = documents
                    .iter()
                    .filter(|d| matches!(d.get(key), Ok(Some(_))))
                    .map(|d| d.namespace.as_str())
                    .collect();
                if found.is_empty() {
                    documents.iter().map(|d| d.namespace.as_str()).collect()
                } else {
                    found
                }
            }
        }
    }
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从语言文件集合生成缓冲区
    ///
    /// 每个显示键都包含所有语言的完整一行，缺失的值为空字符串。
    /// 结果与文件的迭代顺序无关。
    pub fn serialize(documents: &DocumentSet, requested: &[String]) -> Self {
        let locales = documents.locales();
        let mut buffer = EditBuffer::new();

        for raw in requested {
            let request = RequestedKey::parse(raw);
            let key = request.key();
            let namespaces = request.namespaces(documents);

            let participants = documents
                .iter()
                .filter(|d| namespaces.contains(d.namespace.as_str()));

            let mut matched = false;
            for document in participants {
                matched = true;
                let row = buffer
                    .entries
                    .entry(display_key(&document.namespace, key))
                    .or_insert_with(|| {
                        locales
                            .iter()
                            .map(|locale| (locale.clone(), TypedValue::empty()))
                            .collect()
                    });
                fill_row(row, document, key);
            }

            if !matched {
                tracing::warn!("键 '{}' 没有匹配的语言文件", raw);
            }
        }

        buffer
    }

    pub fn entries(&self) -> &BTreeMap<String, BTreeMap<String, TypedValue>> {
        &self.entries
    }

    pub fn deletions(&self) -> &[String] {
        &self.deletions
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str, locale: &str) -> Option<&TypedValue> {
        self.entries.get(key).and_then(|row| row.get(locale))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.deletions.is_empty()
    }

    /// 确保键存在（可能没有任何语言）
    pub fn ensure_key(&mut self, key: &str) -> &mut BTreeMap<String, TypedValue> {
        self.entries.entry(key.to_string()).or_default()
    }

    pub fn insert(&mut self, key: &str, locale: &str, value: TypedValue) {
        self.ensure_key(key).insert(locale.to_string(), value);
    }

    pub fn add_deletion(&mut self, key: &str) {
        self.deletions.push(key.to_string());
    }

    /// 渲染为交给编辑器的文本
    pub fn render(&self, with_tips: bool) -> String {
        let mut content = String::new();

        if with_tips {
            for tip in TIPS {
                content.push_str(tip);
                content.push('\n');
            }
            content.push('\n');
        }

        for (key, row) in &self.entries {
            content.push_str(&format!("# {}\n", key));
            for (locale, value) in row {
                content.push_str(&format!("{} {}\n", value.marker(), locale));
                let payload = render_value(value);
                if !payload.is_empty() {
                    content.push_str(&payload);
                    content.push('\n');
                }
                content.push('\n');
            }
        }

        for key in &self.deletions {
            content.push_str(&format!("#- {}\n", key));
        }

        content
    }
}

fn fill_row(row: &mut BTreeMap<String, TypedValue>, document: &Document, key: &str) {
    match document.get(key) {
        Ok(Some(value)) => {
            if !survives_round_trip(&value) {
                tracing::warn!(
                    "{} 中键 '{}' 的值 ({}) 无法在缓冲区中原样保留，保存时会被改写",
                    document.locale,
                    display_key(&document.namespace, key),
                    value
                );
            }
            row.insert(document.locale.clone(), value);
        }
        Ok(None) => {}
        Err(e) => tracing::warn!("跳过 {} 中的键 '{}': {}", document.path.display(), key, e),
    }
}

/// 字符串值渲染后能否被解析回完全相同的文本
///
/// 空行会被解析器忽略，以标记开头的行会被当作新的段落；
/// JSON 值总是重新格式化，不受影响。
pub(crate) fn survives_round_trip(value: &TypedValue) -> bool {
    let TypedValue::Text(raw) = value else {
        return true;
    };
    if raw.is_empty() {
        return true;
    }
    if raw.trim().is_empty() || raw.ends_with('\n') || raw.ends_with('\r') {
        return false;
    }
    raw.lines().all(|line| {
        let trimmed = line.trim();
        !trimmed.is_empty()
            && !trimmed.starts_with("//")
            && !trimmed.starts_with(['#', '*', '+'])
    })
}

/// JSON 值格式化为 2 空格缩进，字符串原样输出
fn render_value(value: &TypedValue) -> String {
    match value {
        TypedValue::Text(raw) => raw.clone(),
        TypedValue::Json(raw) => serde_json::from_str::<serde_json::Value>(raw)
            .and_then(|v| serde_json::to_string_pretty(&v))
            .unwrap_or_else(|_| raw.clone()),
    }
}
