/// JSON 路径访问模块
///
/// 在单个 JSON 文档字符串上按点分隔的键路径读取、写入、删除值。
///
/// # 路径规则
/// - 以 `.` 分隔各段，支持任意深度的对象嵌套
/// - 数组下标不做特殊处理：下标段按对象键查找，遇到数组即视为不存在
///
/// # 值类型
/// - 对象/数组 → [`TypedValue::Json`]，内容为该子树的紧凑 JSON
/// - 其他（字符串、数字、布尔、null）→ [`TypedValue::Text`]
use serde_json::{Map, Value};
use thiserror::Error;

use crate::value::TypedValue;

/// 单次访问操作的错误
#[derive(Error, Debug)]
pub enum AccessError {
    #[error("document is not valid JSON: {0}")]
    InvalidDocument(#[source] serde_json::Error),

    #[error("value is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
}

/// 将点分隔的键路径拆分为各段
pub fn parse_key_path(key: &str) -> Vec<&str> {
    key.split('.').collect()
}

fn parse_document(doc: &str) -> Result<Value, AccessError> {
    serde_json::from_str(doc).map_err(AccessError::InvalidDocument)
}

/// 读取路径上的值
///
/// 路径不存在时返回 `Ok(None)`，不是错误
pub fn get(doc: &str, path: &str) -> Result<Option<TypedValue>, AccessError> {
    let root = parse_document(doc)?;
    Ok(lookup(&root, path).map(to_typed))
}

/// 写入路径上的值
///
/// 沿途缺失的对象会被创建，非对象的中间节点会被覆盖为对象。
/// 如果写入后文档结构不变，原样返回输入文档，调用方可直接比较判断是否为空操作。
pub fn set(doc: &str, path: &str, value: &TypedValue) -> Result<String, AccessError> {
    let original = parse_document(doc)?;
    let new_value = match value {
        TypedValue::Text(raw) => Value::String(raw.clone()),
        TypedValue::Json(raw) => serde_json::from_str(raw).map_err(AccessError::InvalidJson)?,
    };

    let mut root = original.clone();
    insert_at(&mut root, &parse_key_path(path), new_value);

    if root == original {
        return Ok(doc.to_string());
    }
    Ok(root.to_string())
}

/// 删除路径上的值，路径不存在时原样返回
pub fn delete(doc: &str, path: &str) -> Result<String, AccessError> {
    let mut root = parse_document(doc)?;
    let parts = parse_key_path(path);
    let Some((last, parents)) = parts.split_last() else {
        return Ok(doc.to_string());
    };

    let mut current = &mut root;
    for part in parents {
        match current.as_object_mut().and_then(|map| map.get_mut(*part)) {
            Some(next) => current = next,
            None => return Ok(doc.to_string()),
        }
    }

    let removed = current
        .as_object_mut()
        .and_then(|map| map.shift_remove(*last));

    match removed {
        Some(_) => Ok(root.to_string()),
        None => Ok(doc.to_string()),
    }
}

fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for part in parse_key_path(path) {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

fn to_typed(value: &Value) -> TypedValue {
    match value {
        Value::Object(_) | Value::Array(_) => TypedValue::Json(value.to_string()),
        Value::String(s) => TypedValue::Text(s.clone()),
        Value::Number(n) => TypedValue::Text(n.to_string()),
        Value::Bool(b) => TypedValue::Text(b.to_string()),
        Value::Null => TypedValue::Text(String::new()),
    }
}

fn insert_at(root: &mut Value, parts: &[&str], value: Value) {
    let Some((last, parents)) = parts.split_last() else {
        return;
    };

    let mut current = root;
    for part in parents {
        current = ensure_object(current)
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    ensure_object(current).insert(last.to_string(), value);
}

/// 非对象节点替换为空对象
fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was just replaced with an object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_string_value() {
        let doc = r#"{"home":{"welcome":"欢迎"}}"#;
        assert_eq!(
            get(doc, "home.welcome").unwrap(),
            Some(TypedValue::text("欢迎"))
        );
    }

    #[test]
    fn test_get_scalars_are_stringified() {
        let doc = r#"{"count":42,"ratio":1.5,"on":true,"nothing":null}"#;
        assert_eq!(get(doc, "count").unwrap(), Some(TypedValue::text("42")));
        assert_eq!(get(doc, "ratio").unwrap(), Some(TypedValue::text("1.5")));
        assert_eq!(get(doc, "on").unwrap(), Some(TypedValue::text("true")));
        assert_eq!(get(doc, "nothing").unwrap(), Some(TypedValue::text("")));
    }

    #[test]
    fn test_get_structured_value() {
        let doc = r#"{"menu": {"items": ["a", "b"], "title": "Menu"}}"#;
        assert_eq!(
            get(doc, "menu").unwrap(),
            Some(TypedValue::Json(r#"{"items":["a","b"],"title":"Menu"}"#.to_string()))
        );
        assert_eq!(
            get(doc, "menu.items").unwrap(),
            Some(TypedValue::Json(r#"["a","b"]"#.to_string()))
        );
    }

    #[test]
    fn test_get_missing_path() {
        let doc = r#"{"a":{"b":"c"}}"#;
        assert_eq!(get(doc, "a.x").unwrap(), None);
        assert_eq!(get(doc, "a.b.c").unwrap(), None);
        assert_eq!(get(doc, "z").unwrap(), None);
    }

    #[test]
    fn test_array_index_is_not_special() {
        let doc = r#"{"list":["zero","one"]}"#;
        assert_eq!(get(doc, "list.0").unwrap(), None);
    }

    #[test]
    fn test_get_invalid_document() {
        assert!(matches!(
            get("{not json", "a"),
            Err(AccessError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_set_creates_intermediate_objects() {
        let doc = set("{}", "home.hero.title", &TypedValue::text("Hi")).unwrap();
        assert_eq!(doc, r#"{"home":{"hero":{"title":"Hi"}}}"#);
    }

    #[test]
    fn test_set_overwrites_non_object_intermediate() {
        let doc = set(r#"{"home":"flat"}"#, "home.title", &TypedValue::text("Hi")).unwrap();
        assert_eq!(doc, r#"{"home":{"title":"Hi"}}"#);
    }

    #[test]
    fn test_set_json_value() {
        let value = TypedValue::json(r#"{"one":"1 item","other":"{{count}} items"}"#).unwrap();
        let doc = set(r#"{"a":"x"}"#, "items", &value).unwrap();
        assert_eq!(
            doc,
            r#"{"a":"x","items":{"one":"1 item","other":"{{count}} items"}}"#
        );
    }

    #[test]
    fn test_set_preserves_key_order() {
        let doc = set(r#"{"z":"1","a":"2","m":"3"}"#, "a", &TypedValue::text("changed")).unwrap();
        assert_eq!(doc, r#"{"z":"1","a":"changed","m":"3"}"#);
    }

    #[test]
    fn test_set_invalid_json_value() {
        let value = TypedValue::Json("{invalid}".to_string());
        assert!(matches!(
            set("{}", "a", &value),
            Err(AccessError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_set_same_value_returns_original() {
        let doc = "{\n  \"hello\": \"world\"\n}";
        let result = set(doc, "hello", &TypedValue::text("world")).unwrap();
        assert_eq!(result, doc);
    }

    #[test]
    fn test_set_string_over_number_changes_document() {
        let doc = r#"{"count":5}"#;
        let result = set(doc, "count", &TypedValue::text("5")).unwrap();
        assert_eq!(result, r#"{"count":"5"}"#);
    }

    #[test]
    fn test_delete_removes_only_target() {
        let doc = delete(r#"{"a":1,"b":2}"#, "a").unwrap();
        assert_eq!(doc, r#"{"b":2}"#);
    }

    #[test]
    fn test_delete_nested_keeps_order() {
        let doc = delete(r#"{"n":{"x":1,"y":2,"z":3}}"#, "n.y").unwrap();
        assert_eq!(doc, r#"{"n":{"x":1,"z":3}}"#);
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let doc = "{ \"a\": 1 }";
        assert_eq!(delete(doc, "b").unwrap(), doc);
        assert_eq!(delete(doc, "a.b").unwrap(), doc);
    }

    #[test]
    fn test_delete_invalid_document() {
        assert!(delete("[1,", "a").is_err());
    }
}
