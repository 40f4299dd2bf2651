//! 命令
//!
//! 每个命令单次执行：取得选择与输入、调用核心算法、在一个事务内写入文档。
//! 任何提示被取消都会以 [`CommandError::Cancelled`] 结束，且不写入任何实体。

mod array_path;
mod label_blocks;
mod measure_line;

pub use array_path::array_path;
pub use label_blocks::label_blocks;
pub use measure_line::measure_line;

use crate::error::CommandError;
use crate::prompt::Prompter;
use crate::settings::DraftSettings;
use zdraft_core::array::ArrayOutcome;
use zdraft_core::database::DrawingDatabase;
use zdraft_core::entity::EntityId;
use zdraft_core::measure::LineMeasurement;

/// 命令类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    MeasureLine,
    LabelBlocks,
    ArrayPath,
}

impl CommandKind {
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::MeasureLine => "Measure Line",
            CommandKind::LabelBlocks => "Label Blocks",
            CommandKind::ArrayPath => "Array Along Path",
        }
    }
}

/// 命令执行结果
#[derive(Debug, Clone)]
pub enum CommandReport {
    Measured(LineMeasurement),
    Labeled(Vec<EntityId>),
    Arrayed { outcome: ArrayOutcome, ids: Vec<EntityId> },
}

/// 执行命令
pub fn run<D, P>(
    kind: CommandKind,
    db: &mut D,
    prompter: &mut P,
    settings: &DraftSettings,
) -> Result<CommandReport, CommandError>
where
    D: DrawingDatabase + ?Sized,
    P: Prompter + ?Sized,
{
    tracing::info!("Running {}", kind.name());
    match kind {
        CommandKind::MeasureLine => measure_line(db, prompter).map(CommandReport::Measured),
        CommandKind::LabelBlocks => label_blocks(db, prompter, settings).map(CommandReport::Labeled),
        CommandKind::ArrayPath => {
            array_path(db, prompter, settings).map(|(outcome, ids)| CommandReport::Arrayed { outcome, ids })
        }
    }
}
