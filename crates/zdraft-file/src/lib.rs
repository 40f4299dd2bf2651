//! ZDraft 图形数据库
//!
//! - [`Document`]：块表 + 实体表，支持事务（提交前追加不可见，可整体回滚）
//! - JSON 快照读写

pub mod document;
pub mod error;
pub mod snapshot;

pub use document::{Document, DocumentMetadata};
pub use error::FileError;
pub use snapshot::{from_json, load, save, to_json};
