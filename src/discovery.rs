/// 文件发现
///
/// 把命令行上的文件参数展开为待加载的文件列表：
/// - 普通路径原样保留（不存在的文件同样保留，加载时视为 `{}`）
/// - 路径模板（含 `{{language}}` / `{{ns}}` 等占位符）从模板的固定前缀目录开始遍历，
///   收集所有匹配模板的文件
///
/// `*.json`、`{a,b}` 这类通配符由调用方的 shell 展开。
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::pattern::{is_template, PathPattern};
use crate::utils::I18nError;

/// 待加载的文件及其来源模板
#[derive(Debug, Clone)]
pub struct FileSource {
    pub path: PathBuf,
    /// 发现该文件所用的模板；普通路径参数为 `None`
    pub pattern: Option<PathPattern>,
}

/// 文件发现结果
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub sources: Vec<FileSource>,
    /// 参数中出现的所有模板（包括没有匹配到文件的），用于创建新的命名空间文件
    pub templates: Vec<PathPattern>,
}

impl Discovery {
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.sources.iter().map(|s| s.path.as_path())
    }
}

/// 展开文件参数
pub fn discover_files(args: &[String]) -> Result<Discovery, I18nError> {
    if args.is_empty() {
        return Err(I18nError::NoFiles);
    }

    let mut discovery = Discovery::default();
    let mut seen = HashSet::new();

    for arg in args {
        if !is_template(arg) {
            let path = PathBuf::from(arg);
            if seen.insert(path.clone()) {
                discovery.sources.push(FileSource { path, pattern: None });
            }
            continue;
        }

        let pattern = PathPattern::compile(arg).map_err(|e| I18nError::InvalidPattern {
            pattern: arg.clone(),
            reason: e.to_string(),
        })?;

        let mut candidates = Vec::new();
        walk(&pattern.search_root(), pattern.search_depth(), &mut candidates)?;

        let mut matched = 0;
        for path in candidates {
            if pattern.extract(&path).is_some() && seen.insert(path.clone()) {
                matched += 1;
                discovery.sources.push(FileSource {
                    path,
                    pattern: Some(pattern.clone()),
                });
            }
        }
        tracing::debug!("模板 {} 匹配到 {} 个文件", pattern.as_str(), matched);

        discovery.templates.push(pattern);
    }

    Ok(discovery)
}

/// 遍历 `base` 下恰好 `depth` 层的文件，按路径排序
fn walk(base: &Path, depth: usize, out: &mut Vec<PathBuf>) -> Result<(), I18nError> {
    if depth == 0 {
        return Ok(());
    }

    let dir = if base.as_os_str().is_empty() {
        Path::new(".")
    } else {
        base
    };

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    let mut names: Vec<_> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name())
        .collect();
    names.sort();

    for name in names {
        let path = base.join(&name);
        if depth == 1 {
            if path.is_file() {
                out.push(path);
            }
        } else if path.is_dir() {
            walk(&path, depth - 1, out)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "{}").unwrap();
    }

    #[test]
    fn test_no_arguments() {
        assert!(matches!(discover_files(&[]), Err(I18nError::NoFiles)));
    }

    #[test]
    fn test_plain_paths_are_kept() {
        let args = vec!["locales/en.json".to_string(), "locales/missing.json".to_string()];
        let discovery = discover_files(&args).unwrap();
        let paths: Vec<_> = discovery.paths().collect();
        assert_eq!(
            paths,
            vec![Path::new("locales/en.json"), Path::new("locales/missing.json")]
        );
        assert!(discovery.sources.iter().all(|s| s.pattern.is_none()));
        assert!(discovery.templates.is_empty());
    }

    #[test]
    fn test_duplicate_paths_are_removed() {
        let args = vec!["en.json".to_string(), "en.json".to_string()];
        let discovery = discover_files(&args).unwrap();
        assert_eq!(discovery.sources.len(), 1);
    }

    #[test]
    fn test_template_discovery() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(&root.join("locales/en/common.json"));
        touch(&root.join("locales/en/auth.json"));
        touch(&root.join("locales/fr/common.json"));
        touch(&root.join("locales/fr/notes.txt"));
        touch(&root.join("locales/fr/deep/common.json"));

        let template = format!("{}/locales/{{{{language}}}}/{{{{ns}}}}.json", root.display());
        let discovery = discover_files(&[template]).unwrap();

        let found: Vec<_> = discovery
            .paths()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            found,
            vec![
                PathBuf::from("locales/en/auth.json"),
                PathBuf::from("locales/en/common.json"),
                PathBuf::from("locales/fr/common.json"),
            ]
        );
        assert_eq!(discovery.templates.len(), 1);
        assert!(discovery.sources.iter().all(|s| s.pattern.is_some()));
    }

    #[test]
    fn test_template_without_matches_is_recorded() {
        let temp_dir = TempDir::new().unwrap();
        let template = format!("{}/nothing/{{{{language}}}}.json", temp_dir.path().display());
        let discovery = discover_files(&[template]).unwrap();
        assert!(discovery.sources.is_empty());
        assert_eq!(discovery.templates.len(), 1);
    }
}
