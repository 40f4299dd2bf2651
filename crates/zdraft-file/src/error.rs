//! 文档与文件操作错误定义

use thiserror::Error;
use zdraft_core::DraftError;

#[derive(Error, Debug)]
pub enum FileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error("Unsupported version: {0}")]
    UnsupportedVersion(String),
}
