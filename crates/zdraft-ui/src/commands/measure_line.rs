//! MEASURELINE：报告直线的长度、角度与增量

use crate::error::CommandError;
use crate::prompt::Prompter;
use zdraft_core::database::DrawingDatabase;
use zdraft_core::measure::{self, LineMeasurement};

pub fn measure_line<D, P>(db: &D, prompter: &mut P) -> Result<LineMeasurement, CommandError>
where
    D: DrawingDatabase + ?Sized,
    P: Prompter + ?Sized,
{
    let id = prompter.select_entity("Select a line:").ok_or(CommandError::Cancelled)?;
    let measurement = measure::measure_line(&db.geometry(id)?)?;
    prompter.message(&measurement.summary());
    Ok(measurement)
}
