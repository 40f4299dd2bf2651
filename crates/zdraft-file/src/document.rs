//! 文档：块表、实体表与事务
//!
//! 事务期间追加的实体先暂存，提交时按追加顺序并入实体表，回滚时整体丢弃。

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use zdraft_core::block::{BlockDefinition, BlockTemplate};
use zdraft_core::database::DrawingDatabase;
use zdraft_core::entity::{Entity, EntityId};
use zdraft_core::geometry::{AttributeReference, BlockReference, Geometry};
use zdraft_core::math::BoundingBox3;
use zdraft_core::transform::Placement;
use zdraft_core::{DraftError, Result};

/// 文档元数据
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
}

/// 进行中的事务
#[derive(Debug, Default)]
struct Transaction {
    staged: IndexMap<EntityId, Entity>,
}

/// 图形文档
#[derive(Debug, Default)]
pub struct Document {
    pub metadata: DocumentMetadata,
    /// 大写块名 -> 块定义
    blocks: IndexMap<String, BlockDefinition>,
    entities: IndexMap<EntityId, Entity>,
    next_id: u64,
    transaction: Option<Transaction>,
}

fn block_key(name: &str) -> String {
    name.to_uppercase()
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加或替换块定义
    pub fn add_block(&mut self, definition: BlockDefinition) {
        self.blocks.insert(block_key(&definition.name), definition);
    }

    pub fn block(&self, name: &str) -> Option<&BlockDefinition> {
        self.blocks.get(&block_key(name))
    }

    pub fn blocks(&self) -> impl Iterator<Item = &BlockDefinition> {
        self.blocks.values()
    }

    /// 直接添加实体（不经过事务）
    pub fn add_entity(&mut self, geometry: Geometry) -> EntityId {
        let id = self.allocate_id();
        self.entities.insert(id, Entity::new(id, geometry));
        id
    }

    /// 载入已有 ID 的实体，并保证后续分配的 ID 不冲突
    pub fn insert_entity(&mut self, entity: Entity) {
        self.next_id = self.next_id.max(entity.id.raw());
        self.entities.insert(entity.id, entity);
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// 已提交的实体，按添加顺序
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn in_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    /// 某个块的全部已提交参照
    pub fn references_of<'a>(&'a self, block_name: &'a str) -> impl Iterator<Item = (EntityId, &'a BlockReference)> + 'a {
        self.entities.values().filter_map(move |e| match &e.geometry {
            Geometry::BlockReference(r) if r.block_name.eq_ignore_ascii_case(block_name) => Some((e.id, r)),
            _ => None,
        })
    }

    fn allocate_id(&mut self) -> EntityId {
        self.next_id += 1;
        EntityId::new(self.next_id)
    }

    fn lookup(&self, id: EntityId) -> Option<&Entity> {
        self.transaction
            .as_ref()
            .and_then(|t| t.staged.get(&id))
            .or_else(|| self.entities.get(&id))
    }

    fn staging(&mut self) -> Result<&mut Transaction> {
        self.transaction
            .as_mut()
            .ok_or_else(|| DraftError::Transaction("no active transaction".to_string()))
    }

    fn stage(&mut self, geometry: Geometry) -> Result<EntityId> {
        self.staging()?;
        let id = self.allocate_id();
        self.staging()?.staged.insert(id, Entity::new(id, geometry));
        Ok(id)
    }
}

impl DrawingDatabase for Document {
    fn resolve_block(&self, name: &str) -> Result<BlockTemplate> {
        self.block(name)
            .map(BlockDefinition::template)
            .ok_or_else(|| DraftError::BlockNotFound(name.to_string()))
    }

    fn geometry(&self, id: EntityId) -> Result<Geometry> {
        self.lookup(id)
            .map(|e| e.geometry.clone())
            .ok_or(DraftError::EntityNotFound(id))
    }

    fn world_extents(&self, id: EntityId) -> Result<BoundingBox3> {
        let entity = self.lookup(id).ok_or(DraftError::EntityNotFound(id))?;
        match &entity.geometry {
            Geometry::BlockReference(r) => {
                let local = self
                    .block(&r.block_name)
                    .map(BlockDefinition::extents)
                    .unwrap_or_else(BoundingBox3::empty);
                if local.is_empty() {
                    Ok(BoundingBox3::new(r.position, r.position))
                } else {
                    Ok(local.transformed(&r.matrix()))
                }
            }
            other => Ok(other.bounding_box()),
        }
    }

    fn begin_transaction(&mut self) -> Result<()> {
        if self.transaction.is_some() {
            return Err(DraftError::Transaction("transaction already active".to_string()));
        }
        self.transaction = Some(Transaction::default());
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let transaction = self
            .transaction
            .take()
            .ok_or_else(|| DraftError::Transaction("no active transaction".to_string()))?;
        tracing::debug!("Committing {} entities", transaction.staged.len());
        self.entities.extend(transaction.staged);
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        let transaction = self
            .transaction
            .take()
            .ok_or_else(|| DraftError::Transaction("no active transaction".to_string()))?;
        tracing::debug!("Discarding {} staged entities", transaction.staged.len());
        Ok(())
    }

    fn append_entity(&mut self, geometry: Geometry) -> Result<EntityId> {
        self.stage(geometry)
    }

    fn append_instance(&mut self, placement: &Placement, block: &BlockTemplate) -> Result<EntityId> {
        if self.block(&block.name).is_none() {
            return Err(DraftError::BlockNotFound(block.name.clone()));
        }
        let mut reference = BlockReference::new(block.name.clone(), placement.origin());
        reference.rotation = placement.rotation;
        reference.scale = placement.scale;
        self.stage(Geometry::BlockReference(reference))
    }

    fn append_attribute(&mut self, instance: EntityId, tag: &str, text: &str) -> Result<()> {
        let entity = self
            .staging()?
            .staged
            .get_mut(&instance)
            .ok_or(DraftError::EntityNotFound(instance))?;
        match &mut entity.geometry {
            Geometry::BlockReference(r) => {
                r.attributes.push(AttributeReference {
                    tag: tag.to_string(),
                    text: text.to_string(),
                });
                Ok(())
            }
            other => Err(DraftError::UnsupportedGeometry(other.type_name().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zdraft_core::array::array_along_path;
    use zdraft_core::block::AttributeDefinition;
    use zdraft_core::database::with_transaction;
    use zdraft_core::geometry::{Circle, Line, Polyline};
    use zdraft_core::math::{Point3, Vector3};
    use zdraft_core::placement::PlacementPolicy;
    use zdraft_core::transform::RotationPolicy;

    fn square_block() -> BlockDefinition {
        BlockDefinition::new("Post")
            .with_entity(Geometry::Line(Line::new(Point3::new(0.0, 0.0, 0.0), Point3::new(4.0, 2.0, 0.0))))
            .with_attribute(AttributeDefinition::new("POSTNUM", "?"))
            .with_attribute(AttributeDefinition::new("MAT", "Steel"))
            .with_attribute(AttributeDefinition::new("VENDOR", "ACME").constant())
    }

    fn doc_with_path(geometry: Geometry) -> (Document, EntityId) {
        let mut doc = Document::new();
        doc.add_block(square_block());
        let path = doc.add_entity(geometry);
        (doc, path)
    }

    #[test]
    fn test_resolve_block_case_insensitive() {
        let (doc, _) = doc_with_path(Geometry::Line(Line::new(Point3::origin(), Point3::new(1.0, 0.0, 0.0))));
        let template = doc.resolve_block("POST").unwrap();
        assert_eq!(template.name, "Post");
        assert_eq!(template.center_offset, Vector3::new(2.0, 1.0, 0.0));
        assert_eq!(doc.resolve_block("GATE"), Err(DraftError::BlockNotFound("GATE".to_string())));
    }

    #[test]
    fn test_array_commit_writes_instances_and_attributes() {
        let (mut doc, path) = doc_with_path(Geometry::Line(Line::new(Point3::origin(), Point3::new(100.0, 0.0, 0.0))));
        let (outcome, ids) = array_along_path(
            &mut doc,
            path,
            "post",
            PlacementPolicy::spacing(25.0).unwrap(),
            RotationPolicy::AlignToPath,
            1.0,
        )
        .unwrap();

        assert_eq!(outcome.blocks_created(), 5);
        assert_eq!(ids.len(), 5);
        assert_eq!(doc.entity_count(), 6);
        assert!(!doc.in_transaction());

        let refs: Vec<_> = doc.references_of("POST").collect();
        assert_eq!(refs.len(), 5);
        let (_, third) = refs[2];
        // 包围盒中心落在 x=50 上，插入点向左下偏移
        assert!((third.position - Point3::new(48.0, -1.0, 0.0)).norm() < 1e-9);
        assert_eq!(third.attribute("POSTNUM"), Some("03"));
        assert_eq!(third.attribute("MAT"), Some("Steel"));
        assert_eq!(third.attribute("VENDOR"), None);

        let extents = doc.world_extents(ids[2]).unwrap();
        assert!((extents.center() - Point3::new(50.0, 0.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn test_unsupported_path_writes_nothing() {
        let (mut doc, path) = doc_with_path(Geometry::Circle(Circle::new(Point3::origin(), 5.0)));
        let result = array_along_path(
            &mut doc,
            path,
            "POST",
            PlacementPolicy::count(3).unwrap(),
            RotationPolicy::None,
            1.0,
        );
        assert!(matches!(result, Err(DraftError::UnsupportedGeometry(_))));
        assert_eq!(doc.entity_count(), 1);
        assert!(!doc.in_transaction());
    }

    #[test]
    fn test_missing_block_writes_nothing() {
        let pl = Polyline::from_points([Point3::origin(), Point3::new(5.0, 0.0, 0.0)], false);
        let (mut doc, path) = doc_with_path(Geometry::Polyline(pl));
        let result = array_along_path(
            &mut doc,
            path,
            "GATE",
            PlacementPolicy::count(3).unwrap(),
            RotationPolicy::None,
            1.0,
        );
        assert_eq!(result.unwrap_err(), DraftError::BlockNotFound("GATE".to_string()));
        assert_eq!(doc.entity_count(), 1);
    }

    #[test]
    fn test_rollback_discards_staged_entities() {
        let mut doc = Document::new();
        let result: Result<()> = with_transaction(&mut doc, |db| {
            db.append_entity(Geometry::Circle(Circle::new(Point3::origin(), 1.0)))?;
            db.append_attribute(EntityId::new(999), "TAG", "x")
        });
        assert_eq!(result, Err(DraftError::EntityNotFound(EntityId::new(999))));
        assert_eq!(doc.entity_count(), 0);
        assert!(!doc.in_transaction());
    }

    #[test]
    fn test_append_requires_transaction() {
        let mut doc = Document::new();
        assert!(matches!(
            doc.append_entity(Geometry::Circle(Circle::new(Point3::origin(), 1.0))),
            Err(DraftError::Transaction(_))
        ));
        doc.begin_transaction().unwrap();
        assert!(doc.begin_transaction().is_err());
    }

    #[test]
    fn test_inserted_entity_ids_do_not_collide() {
        let mut doc = Document::new();
        doc.insert_entity(Entity::new(
            EntityId::new(41),
            Geometry::Circle(Circle::new(Point3::origin(), 1.0)),
        ));
        let id = doc.add_entity(Geometry::Circle(Circle::new(Point3::origin(), 2.0)));
        assert_eq!(id, EntityId::new(42));
    }
}
