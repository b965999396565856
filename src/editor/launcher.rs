/// 外部编辑器启动
///
/// 编辑器命令按空白拆分为程序与参数，会话文件路径追加在最后。
/// 子进程继承当前终端，阻塞直到编辑器退出。
use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::utils::I18nError;

/// 未指定编辑器时的兜底
pub const FALLBACK_EDITOR: &str = "vim";

/// 默认编辑器：`$EDITOR`，其次 `$VISUAL`，最后 `vim`
pub fn default_editor() -> String {
    ["EDITOR", "VISUAL"]
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_EDITOR.to_string())
}

/// 拆分编辑器命令为 (程序, 参数)
pub fn parse_editor_command(command: &str) -> Result<(String, Vec<String>), I18nError> {
    let mut parts = command.split_whitespace().map(str::to_string);
    let program = parts
        .next()
        .ok_or_else(|| I18nError::EditorFailure("empty editor command".to_string()))?;
    Ok((program, parts.collect()))
}

/// 在 `PATH` 中查找可执行文件；包含路径分隔符的程序名直接检查
pub fn find_executable(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let paths = env::var_os("PATH")?;
    env::split_paths(&paths).find_map(|dir| {
        let full = dir.join(program);
        if full.is_file() {
            return Some(full);
        }
        #[cfg(windows)]
        {
            let exe = dir.join(format!("{}.exe", program));
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}

/// 在做任何其他工作之前确认编辑器可用
pub fn validate_editor(command: &str) -> Result<PathBuf, I18nError> {
    let (program, _) = parse_editor_command(command)?;
    find_executable(&program)
        .ok_or_else(|| I18nError::EditorFailure(format!("editor '{}' not found in PATH", program)))
}

/// 用编辑器打开文件并等待退出
///
/// # 错误
/// 编辑器无法启动或以非零状态退出时返回 `EditorFailure`
pub fn open_editor(path: &Path, command: &str) -> Result<(), I18nError> {
    let (program, args) = parse_editor_command(command)?;
    tracing::debug!("启动编辑器: {} {:?} {}", program, args, path.display());

    let status = Command::new(&program)
        .args(&args)
        .arg(path)
        .status()
        .map_err(|e| I18nError::EditorFailure(format!("failed to start '{}': {}", program, e)))?;

    if !status.success() {
        return Err(I18nError::EditorFailure(format!(
            "'{}' exited with {}",
            program, status
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_editor_command() {
        let (program, args) = parse_editor_command("code --wait").unwrap();
        assert_eq!(program, "code");
        assert_eq!(args, vec!["--wait"]);

        let (program, args) = parse_editor_command("  vim ").unwrap();
        assert_eq!(program, "vim");
        assert!(args.is_empty());
    }

    #[test]
    fn test_empty_editor_command() {
        assert!(matches!(
            parse_editor_command("   "),
            Err(I18nError::EditorFailure(_))
        ));
    }

    #[test]
    fn test_missing_editor() {
        let result = validate_editor("definitely-not-an-editor-4f2a9c");
        assert!(matches!(result, Err(I18nError::EditorFailure(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_open_editor_exit_status() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let file = temp_dir.path().join("buffer.md");
        std::fs::write(&file, "").unwrap();

        assert!(open_editor(&file, "true").is_ok());
        assert!(matches!(
            open_editor(&file, "false"),
            Err(I18nError::EditorFailure(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_find_executable_absolute() {
        assert!(find_executable("/bin/sh").is_some());
        assert!(find_executable("/nonexistent/editor").is_none());
    }
}
