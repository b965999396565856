/// JSON 扁平化
///
/// 把嵌套的语言文件展开为 `key=value` 形式，供 `--flatten` 输出与 `--doctor` 检查使用。
/// - 对象键以 `.` 连接
/// - 数组元素以下标作为路径段（`list.0`）
/// - 值为 JSON 字面量：字符串带引号，数字、布尔、null 原样
/// - 空对象与空数组不产生任何条目
use std::collections::BTreeMap;

use serde_json::Value;

/// 展开 JSON 文本，键带 `namespace:` 前缀（命名空间为空时不加）
pub fn flatten_json(data: &str, namespace: &str) -> Result<BTreeMap<String, String>, serde_json::Error> {
    let root: Value = serde_json::from_str(data)?;
    let prefix = if namespace.is_empty() {
        String::new()
    } else {
        format!("{}:", namespace)
    };

    let mut flat = BTreeMap::new();
    traverse(&root, "", &prefix, &mut flat);
    Ok(flat)
}

/// 渲染为 `key=value` 行
pub fn render_flat(flat: &BTreeMap<String, String>) -> String {
    flat.iter()
        .map(|(key, value)| format!("{}={}\n", key, value))
        .collect()
}

fn traverse(value: &Value, path: &str, prefix: &str, out: &mut BTreeMap<String, String>) {
    let join = |segment: &str| {
        if path.is_empty() {
            segment.to_string()
        } else {
            format!("{}.{}", path, segment)
        }
    };

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                traverse(child, &join(key), prefix, out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                traverse(child, &join(&index.to_string()), prefix, out);
            }
        }
        scalar => {
            out.insert(format!("{}{}", prefix, path), scalar.to_string());
        }
    }
}
