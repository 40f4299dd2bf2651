//! ZDraft 命令层
//!
//! - [`prompt`]：交互提示接口与实现
//! - [`commands`]：MEASURELINE / LABELBLOCKS / ARRAYPATH
//! - [`command_registry`]：命令名、短命令与别名
//! - [`settings`]：JSON 配置

pub mod command_registry;
pub mod commands;
pub mod error;
pub mod prompt;
pub mod settings;

pub use command_registry::CommandRegistry;
pub use commands::{CommandKind, CommandReport};
pub use error::CommandError;
pub use prompt::{Answer, ConsolePrompter, Prompter, ScriptedPrompter};
pub use settings::DraftSettings;
