/// 编辑缓冲区中携带的值
///
/// 区分两种值：
/// - `Text`：普通字符串，`raw` 为不带引号的文本
/// - `Json`：结构化值（对象、数组或其他 JSON 字面量），`raw` 为合法的 JSON 片段
///
/// 通过 [`TypedValue::json`] 构造的 `Json` 值以紧凑格式存储，
/// 因此两个 `Json` 值的相等比较即结构相等（保留键顺序）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    Text(String),
    Json(String),
}

/// 值的类型标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Json,
}

impl TypedValue {
    /// 创建字符串值
    pub fn text(raw: impl Into<String>) -> Self {
        TypedValue::Text(raw.into())
    }

    /// 校验并创建 JSON 值（存储为紧凑格式）
    pub fn json(raw: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        Ok(TypedValue::Json(serde_json::to_string(&value)?))
    }

    /// 空字符串值（缺失的语言行）
    pub fn empty() -> Self {
        TypedValue::Text(String::new())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            TypedValue::Text(_) => ValueKind::String,
            TypedValue::Json(_) => ValueKind::Json,
        }
    }

    /// 原始文本内容
    pub fn raw(&self) -> &str {
        match self {
            TypedValue::Text(raw) | TypedValue::Json(raw) => raw,
        }
    }

    pub fn is_empty_text(&self) -> bool {
        matches!(self, TypedValue::Text(raw) if raw.is_empty())
    }

    /// 缓冲区中的语言行标记：`*` 字符串，`+` JSON
    pub fn marker(&self) -> char {
        ValueKind::marker(self.kind())
    }
}

impl ValueKind {
    pub fn marker(self) -> char {
        match self {
            ValueKind::String => '*',
            ValueKind::Json => '+',
        }
    }

    /// 从行首标记识别类型
    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            '*' => Some(ValueKind::String),
            '+' => Some(ValueKind::Json),
            _ => None,
        }
    }
}

impl std::fmt::Display for TypedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let raw = self.raw();
        let shown = if raw.chars().count() > 30 {
            format!("{}...", raw.chars().take(30).collect::<String>())
        } else {
            raw.to_string()
        };
        match self {
            TypedValue::Text(_) => write!(f, "\"{}\"", shown),
            TypedValue::Json(_) => write!(f, "{}", shown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_is_canonicalized() {
        let pretty = TypedValue::json("{\n  \"a\": 1,\n  \"b\": [1, 2]\n}").unwrap();
        let compact = TypedValue::json(r#"{"a":1,"b":[1,2]}"#).unwrap();
        assert_eq!(pretty, compact);
        assert_eq!(compact.raw(), r#"{"a":1,"b":[1,2]}"#);
    }

    #[test]
    fn test_json_keeps_key_order() {
        let value = TypedValue::json(r#"{"z":1,"a":2}"#).unwrap();
        assert_eq!(value.raw(), r#"{"z":1,"a":2}"#);
    }

    #[test]
    fn test_invalid_json() {
        assert!(TypedValue::json("{invalid}").is_err());
    }

    #[test]
    fn test_kind_and_marker() {
        assert_eq!(TypedValue::text("hi").marker(), '*');
        assert_eq!(TypedValue::json("[]").unwrap().marker(), '+');
        assert_eq!(ValueKind::from_marker('+'), Some(ValueKind::Json));
        assert_eq!(ValueKind::from_marker('#'), None);
    }

    #[test]
    fn test_text_and_json_differ() {
        assert_ne!(TypedValue::text("1"), TypedValue::json("1").unwrap());
        assert!(TypedValue::empty().is_empty_text());
        assert!(!TypedValue::json("\"\"").unwrap().is_empty_text());
    }

    #[test]
    fn test_display_truncates() {
        let long = TypedValue::text("a".repeat(40));
        assert_eq!(long.to_string(), format!("\"{}...\"", "a".repeat(30)));
    }
}
