/// IO 抽象层模块
///
/// 该模块提供了语言文件读写的抽象接口，遵循依赖倒置原则。
/// 支持依赖注入、测试 mock 和替换 IO 实现（如内存 IO）。
///
/// # 架构设计
///
/// - **traits**: 定义 DocumentReader/DocumentWriter trait 接口
/// - **json_io**: 基于文件系统的默认实现（BOM 处理、原子写入）
///
/// # 使用示例
///
/// ```rust,ignore
/// use i18nedt::io::{DefaultDocumentReader, DocumentReader};
///
/// let reader = DefaultDocumentReader;
/// let data = reader.read(Path::new("locales/en.json"))?;
/// ```
pub mod traits;
pub mod json_io;

// === 导出 trait 定义 ===
pub use traits::{DocumentReader, DocumentWriter};

// === 导出默认实现 ===
pub use json_io::{DefaultDocumentReader, DefaultDocumentWriter};
