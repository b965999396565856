/// IO 抽象层 - trait 定义
///
/// 该模块定义了语言文件读写的抽象接口，支持依赖注入和测试 mock。
/// 遵循依赖倒置原则（DIP），面向接口编程。

use std::path::Path;
use crate::utils::I18nError;

/// 语言文件读取 trait
///
/// # 职责
/// - 从文件系统读取 JSON 语言文件的文本内容
/// - 处理编码（BOM），校验内容是合法 JSON
/// - 不负责推断语言与命名空间
pub trait DocumentReader {
    /// 读取语言文件
    ///
    /// # 参数
    /// * `path` - 文件路径
    ///
    /// # 返回
    /// - `Ok(None)`: 文件不存在
    /// - `Ok(Some(text))`: 合法的 JSON 文本（空文件视为 `{}`）
    /// - `Err(InvalidDocument)`: 内容不是合法 JSON
    fn read(&self, path: &Path) -> Result<Option<String>, I18nError>;
}

/// 语言文件写入 trait
///
/// # 职责
/// - 将 JSON 文本写入文件系统
/// - 写入必须是原子的：要么得到完整的新文件，要么保留原文件
pub trait DocumentWriter {
    /// 写入语言文件
    ///
    /// # 参数
    /// * `path` - 目标文件路径
    /// * `data` - 合法的 JSON 文本
    fn write(&self, path: &Path, data: &str) -> Result<(), I18nError>;
}
