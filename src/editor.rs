/// 编辑器层模块
///
/// 把多个语言文件中的若干键合并为一个文本缓冲区交给外部编辑器，
/// 再把编辑结果解析回变更集并应用到文件。
/// 遵循"修改-保存分离"原则：解析与应用只修改内存中的文档，写盘由调用方显式执行。
///
/// # 架构设计
///
/// - **buffer**: 缓冲区模型与渲染
/// - **parser**: 编辑后文本的解析
/// - **apply**: 变更集应用到文件集合
/// - **report**: 变更记录
/// - **session**: 临时文件的生命周期
/// - **launcher**: 外部编辑器进程
///
/// # 使用示例
///
/// ```rust,ignore
/// use i18nedt::editor::{apply, open_editor, EditSession};
/// use i18nedt::io::DefaultDocumentWriter;
///
/// let mut session = EditSession::new(&documents, &keys, true);
/// session.write()?;
/// open_editor(session.path(), "vim")?;
/// let changes = session.read()?.clone();
/// let report = apply(&mut documents, &changes)?;
/// documents.persist(&DefaultDocumentWriter)?;
/// session.cleanup()?;
/// ```
pub mod apply;
pub mod buffer;
pub mod launcher;
pub mod parser;
pub mod report;
pub mod session;


// === 导出公共接口 ===
pub use apply::apply;
pub use buffer::{ChangeSet, EditBuffer, RequestedKey, TIPS};
pub use launcher::{default_editor, open_editor, validate_editor};
pub use parser::parse;
pub use report::{ApplyReport, ChangeKind, DocumentChange};
pub use session::EditSession;
