/// 从文件路径推断语言标识
///
/// 查找顺序：
/// 1. 文件名（去掉扩展名），允许 `zh-CN.messages` 这类带后缀的形式
/// 2. 父目录名，从最近的一级向上
/// 3. 都不匹配时退回到文件名本身
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

/// 类 BCP-47 语言标识：`en`、`zh-CN`、`zh-Hant`、`zh-Hant-TW`，可带 `.后缀`
fn locale_regex() -> &'static Regex {
    static LOCALE_RE: OnceLock<Regex> = OnceLock::new();
    LOCALE_RE.get_or_init(|| {
        Regex::new(r"^([a-z]{2}(?:[-_][A-Z][a-z]{3})?(?:[-_](?:[A-Z]{2}|[0-9]{3}))?)(?:\..*)?$")
            .unwrap_or_else(|e| panic!("invalid built-in locale regex: {}", e))
    })
}

/// 在单个路径片段中匹配语言标识
pub fn match_locale(segment: &str) -> Option<&str> {
    locale_regex()
        .captures(segment)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// 从文件路径推断语言标识
pub fn parse_locale_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    if let Some(locale) = match_locale(&stem) {
        return locale.to_string();
    }

    if let Some(parent) = path.parent() {
        let from_dirs = parent
            .components()
            .rev()
            .filter_map(|c| c.as_os_str().to_str())
            .find_map(match_locale);
        if let Some(locale) = from_dirs {
            return locale.to_string();
        }
    }

    stem
}
