//! 核心错误定义

use crate::entity::EntityId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DraftError {
    /// 路径实体既不是直线，也不是至少两个顶点的多段线
    #[error("Unsupported path geometry: {0}")]
    UnsupportedGeometry(String),

    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    #[error("Invalid placement policy: {0}")]
    InvalidPolicy(String),

    #[error("Transaction error: {0}")]
    Transaction(String),
}

pub type Result<T> = std::result::Result<T, DraftError>;
