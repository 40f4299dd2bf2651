//! ARRAYPATH：沿直线或多段线阵列块

use crate::error::CommandError;
use crate::prompt::Prompter;
use crate::settings::DraftSettings;
use zdraft_core::array::{ArrayOutcome, PathArray};
use zdraft_core::database::DrawingDatabase;
use zdraft_core::entity::EntityId;
use zdraft_core::path::Path;
use zdraft_core::placement::PlacementPolicy;
use zdraft_core::transform::RotationPolicy;

const MODE_COUNT: &str = "Count";
const MODE_SPACING: &str = "Spacing";

pub fn array_path<D, P>(
    db: &mut D,
    prompter: &mut P,
    settings: &DraftSettings,
) -> Result<(ArrayOutcome, Vec<EntityId>), CommandError>
where
    D: DrawingDatabase + ?Sized,
    P: Prompter + ?Sized,
{
    let path_id = prompter
        .select_entity("Select path (line or polyline):")
        .ok_or(CommandError::Cancelled)?;
    let path = Path::sample(&db.geometry(path_id)?)?;

    let block_name = prompter
        .get_string("Enter block name:")
        .ok_or(CommandError::Cancelled)?;
    let block_name = block_name.trim();
    if block_name.is_empty() {
        return Err(CommandError::InvalidInput("block name is empty".to_string()));
    }
    let template = db.resolve_block(block_name)?;

    let mode = prompter
        .get_keyword("Array by", &[MODE_COUNT, MODE_SPACING], MODE_COUNT)
        .ok_or(CommandError::Cancelled)?;
    let policy = if mode == MODE_SPACING {
        let spacing = prompter
            .get_real("Spacing between blocks", None)
            .ok_or(CommandError::Cancelled)?;
        PlacementPolicy::spacing(spacing).map_err(|e| CommandError::InvalidInput(e.to_string()))?
    } else {
        let count = prompter
            .get_integer("Number of blocks", None)
            .ok_or(CommandError::Cancelled)?;
        let count = usize::try_from(count).unwrap_or(0);
        PlacementPolicy::count(count).map_err(|e| CommandError::InvalidInput(e.to_string()))?
    };

    let scale = prompter
        .get_real("Scale factor", Some(settings.default_scale))
        .ok_or(CommandError::Cancelled)?;
    if !(scale.is_finite() && scale > 0.0) {
        return Err(CommandError::InvalidInput(format!("scale must be positive, got {}", scale)));
    }

    let default_align = if settings.align_to_path { "Yes" } else { "No" };
    let align = prompter
        .get_keyword("Align blocks to path?", &["Yes", "No"], default_align)
        .ok_or(CommandError::Cancelled)?;
    let rotation = RotationPolicy::from_align(align == "Yes");

    let outcome = PathArray::new(&path, &template, policy)
        .with_rotation(rotation)
        .with_scale(scale)
        .run()?;
    let ids = outcome.commit(db, &template)?;

    prompter.message(&format!("Created {} '{}' blocks.", ids.len(), template.name));
    if outcome.shortfall().is_some() {
        prompter.message(&format!(
            "Only {} of {} blocks fit along the path.",
            outcome.blocks_created(),
            outcome.blocks_planned
        ));
    }
    Ok((outcome, ids))
}
