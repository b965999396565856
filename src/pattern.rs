/// 路径模板
///
/// 文件参数中可以使用占位符描述语言与命名空间所在的位置，例如
/// `locales/{{language}}/{{ns}}.json`。
///
/// 支持的占位符：
/// - 语言：`{{language}}`、`{{locale}}`
/// - 命名空间：`{{namespace}}`、`{{ns}}`
/// - `*`：匹配单个路径片段内的任意字符
///
/// 所有占位符都只匹配单个路径片段（不跨越 `/`）。
use std::path::{Path, PathBuf};

use regex::Regex;

const LOCALE_PLACEHOLDERS: &[&str] = &["{{language}}", "{{locale}}"];
const NAMESPACE_PLACEHOLDERS: &[&str] = &["{{namespace}}", "{{ns}}"];

/// 模板中的一个片段
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Locale,
    Namespace,
    Wildcard,
}

/// 编译后的路径模板
#[derive(Debug, Clone)]
pub struct PathPattern {
    template: String,
    tokens: Vec<Token>,
    regex: Regex,
}

/// 检查文件参数是否为路径模板
pub fn is_template(arg: &str) -> bool {
    LOCALE_PLACEHOLDERS
        .iter()
        .chain(NAMESPACE_PLACEHOLDERS)
        .any(|p| arg.contains(p))
}

/// 统一使用 `/` 作为分隔符
fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}

fn tokenize(template: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut rest = template;

    while let Some(c) = rest.chars().next() {
        let placeholder = LOCALE_PLACEHOLDERS
            .iter()
            .map(|p| (*p, Token::Locale))
            .chain(NAMESPACE_PLACEHOLDERS.iter().map(|p| (*p, Token::Namespace)))
            .find(|(p, _)| rest.starts_with(p));

        let (token, consumed) = match placeholder {
            Some((p, token)) => (Some(token), p.len()),
            None if c == '*' => (Some(Token::Wildcard), 1),
            None => (None, c.len_utf8()),
        };

        match token {
            Some(token) => {
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(token);
            }
            None => literal.push(c),
        }
        rest = &rest[consumed..];
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    tokens
}

impl PathPattern {
    /// 编译路径模板
    pub fn compile(template: &str) -> Result<Self, regex::Error> {
        let template = normalize(template);
        let tokens = tokenize(&template);

        let mut source = String::from("^");
        let (mut seen_locale, mut seen_namespace) = (false, false);
        for token in &tokens {
            match token {
                Token::Literal(text) => source.push_str(&regex::escape(text)),
                Token::Locale if !seen_locale => {
                    seen_locale = true;
                    source.push_str("(?P<locale>[^/]+)");
                }
                Token::Namespace if !seen_namespace => {
                    seen_namespace = true;
                    source.push_str("(?P<namespace>[^/]+)");
                }
                Token::Locale | Token::Namespace => source.push_str("[^/]+"),
                Token::Wildcard => source.push_str("[^/]*"),
            }
        }
        source.push('$');

        Ok(Self {
            regex: Regex::new(&source)?,
            template,
            tokens,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    pub fn has_locale(&self) -> bool {
        self.tokens.contains(&Token::Locale)
    }

    pub fn has_namespace(&self) -> bool {
        self.tokens.contains(&Token::Namespace)
    }

    /// 从路径中提取 (语言, 命名空间)
    ///
    /// 路径不匹配模板时返回 `None`；模板中没有的占位符对应空字符串
    pub fn extract(&self, path: &Path) -> Option<(String, String)> {
        let path = normalize(&path.to_string_lossy());
        let caps = self.regex.captures(&path)?;
        let group = |name: &str| {
            caps.name(name)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default()
        };
        Some((group("locale"), group("namespace")))
    }

    /// 根据语言与命名空间构造文件路径
    pub fn construct(&self, locale: &str, namespace: &str) -> PathBuf {
        let path: String = self
            .tokens
            .iter()
            .map(|token| match token {
                Token::Literal(text) => text.as_str(),
                Token::Locale => locale,
                Token::Namespace => namespace,
                Token::Wildcard => "",
            })
            .collect();
        PathBuf::from(path)
    }

    /// 第一个占位符之前的目录部分，文件发现从这里开始遍历
    pub fn search_root(&self) -> PathBuf {
        let prefix = match self.tokens.first() {
            Some(Token::Literal(text)) if self.tokens.len() > 1 => text.as_str(),
            _ => "",
        };
        match prefix.rfind('/') {
            Some(0) => PathBuf::from("/"),
            Some(idx) => PathBuf::from(&prefix[..idx]),
            None => PathBuf::new(),
        }
    }

    /// 搜索根目录之后模板包含的路径片段数
    pub fn search_depth(&self) -> usize {
        let root = self.search_root();
        let root_len = root.to_string_lossy().len();
        let rest = self.template[root_len..].trim_start_matches('/');
        rest.split('/').count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_template() {
        assert!(is_template("locales/{{language}}/{{ns}}.json"));
        assert!(is_template("i18n/{{locale}}.json"));
        assert!(!is_template("locales/en.json"));
        assert!(!is_template("locales/*.json"));
    }

    #[test]
    fn test_extract_locale_and_namespace() {
        let pattern = PathPattern::compile("locales/{{language}}/{{ns}}.json").unwrap();
        assert_eq!(
            pattern.extract(Path::new("locales/en/common.json")),
            Some(("en".to_string(), "common".to_string()))
        );
        assert_eq!(
            pattern.extract(Path::new("locales/zh-CN/auth.json")),
            Some(("zh-CN".to_string(), "auth".to_string()))
        );
    }

    #[test]
    fn test_extract_does_not_cross_segments() {
        let pattern = PathPattern::compile("locales/{{language}}/{{ns}}.json").unwrap();
        assert_eq!(pattern.extract(Path::new("locales/en/nested/common.json")), None);
        assert_eq!(pattern.extract(Path::new("other/en/common.json")), None);
    }

    #[test]
    fn test_extract_locale_only() {
        let pattern = PathPattern::compile("src/i18n/{{locale}}.json").unwrap();
        assert!(pattern.has_locale());
        assert!(!pattern.has_namespace());
        assert_eq!(
            pattern.extract(Path::new("src/i18n/fr.json")),
            Some(("fr".to_string(), String::new()))
        );
    }

    #[test]
    fn test_literal_dots_are_escaped() {
        let pattern = PathPattern::compile("{{ns}}.{{language}}.json").unwrap();
        assert_eq!(
            pattern.extract(Path::new("auth.de.json")),
            Some(("de".to_string(), "auth".to_string()))
        );
        assert_eq!(pattern.extract(Path::new("auth.de_json")), None);
    }

    #[test]
    fn test_wildcard() {
        let pattern = PathPattern::compile("apps/*/locales/{{language}}.json").unwrap();
        assert_eq!(
            pattern.extract(Path::new("apps/web/locales/en.json")),
            Some(("en".to_string(), String::new()))
        );
    }

    #[test]
    fn test_windows_separators() {
        let pattern = PathPattern::compile("locales\\{{language}}\\{{ns}}.json").unwrap();
        assert_eq!(
            pattern.extract(Path::new("locales/en/common.json")),
            Some(("en".to_string(), "common".to_string()))
        );
    }

    #[test]
    fn test_construct() {
        let pattern = PathPattern::compile("locales/{{language}}/{{namespace}}.json").unwrap();
        assert_eq!(
            pattern.construct("ja", "billing"),
            PathBuf::from("locales/ja/billing.json")
        );
    }

    #[test]
    fn test_search_root_and_depth() {
        let pattern = PathPattern::compile("src/locales/{{language}}/{{ns}}.json").unwrap();
        assert_eq!(pattern.search_root(), PathBuf::from("src/locales"));
        assert_eq!(pattern.search_depth(), 2);

        let pattern = PathPattern::compile("{{language}}.json").unwrap();
        assert_eq!(pattern.search_root(), PathBuf::new());
        assert_eq!(pattern.search_depth(), 1);

        let pattern = PathPattern::compile("locales/app-{{language}}.json").unwrap();
        assert_eq!(pattern.search_root(), PathBuf::from("locales"));
        assert_eq!(pattern.search_depth(), 1);
    }
}
