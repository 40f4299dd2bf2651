//! LABELBLOCKS：在选中的块参照上方写递增编号

use crate::error::CommandError;
use crate::prompt::Prompter;
use crate::settings::DraftSettings;
use zdraft_core::database::{with_transaction, DrawingDatabase};
use zdraft_core::entity::EntityId;
use zdraft_core::geometry::Geometry;
use zdraft_core::label::{plan_labels, LabelOptions};

pub fn label_blocks<D, P>(
    db: &mut D,
    prompter: &mut P,
    settings: &DraftSettings,
) -> Result<Vec<EntityId>, CommandError>
where
    D: DrawingDatabase + ?Sized,
    P: Prompter + ?Sized,
{
    let selection = prompter
        .select_entities("Select block references:")
        .filter(|ids| !ids.is_empty())
        .ok_or(CommandError::Cancelled)?;

    let start = prompter
        .get_integer("Starting number", Some(settings.label.start))
        .ok_or(CommandError::Cancelled)?;

    let mut extents = Vec::with_capacity(selection.len());
    for id in selection {
        match db.geometry(id)? {
            Geometry::BlockReference(_) => extents.push(db.world_extents(id)?),
            other => {
                tracing::warn!("Skipping {} {}: not a block reference", other.type_name(), id);
                prompter.message(&format!("{} is not a block reference, skipped.", id));
            }
        }
    }

    let options = LabelOptions {
        start,
        ..settings.label.clone()
    };
    let labels = plan_labels(&extents, &options);
    let ids = with_transaction(db, |db| {
        labels
            .into_iter()
            .map(|text| db.append_entity(Geometry::Text(text)))
            .collect::<zdraft_core::Result<Vec<_>>>()
    })?;

    prompter.message(&format!("Labeled {} blocks.", ids.len()));
    Ok(ids)
}
