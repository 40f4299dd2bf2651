//! 命令错误定义

use thiserror::Error;
use zdraft_core::DraftError;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Command cancelled")]
    Cancelled,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
