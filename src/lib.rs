pub mod utils;
pub mod value;
pub mod json_path;
pub mod locale;
pub mod pattern;
pub mod discovery;
pub mod io;
pub mod document;
pub mod editor;
pub mod flatten;
pub mod doctor;

// 重新导出主要结构
pub use discovery::{discover_files, Discovery, FileSource};
pub use document::{Document, DocumentSet};
pub use editor::{apply, parse, ApplyReport, ChangeSet, EditBuffer, EditSession};
pub use pattern::PathPattern;
pub use utils::I18nError;
pub use value::{TypedValue, ValueKind};

// 常量定义
pub const SUPPORTED_EXTENSIONS: &[&str] = &["json"];
