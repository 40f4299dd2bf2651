//! 图形数据库接口
//!
//! 核心算法不直接操作文档：需要的数据先拷贝成值类型，写入通过此 trait
//! 在一个事务内完成。

use crate::block::BlockTemplate;
use crate::entity::EntityId;
use crate::error::Result;
use crate::geometry::Geometry;
use crate::math::BoundingBox3;
use crate::transform::Placement;

pub trait DrawingDatabase {
    /// 按名称（不区分大小写）查找块定义并拷贝出模板
    fn resolve_block(&self, name: &str) -> Result<BlockTemplate>;

    /// 读取实体几何的拷贝
    fn geometry(&self, id: EntityId) -> Result<Geometry>;

    /// 实体在世界坐标中的范围；块参照按其块定义计算
    fn world_extents(&self, id: EntityId) -> Result<BoundingBox3>;

    /// 开始事务；之后的追加在提交前都不可见
    fn begin_transaction(&mut self) -> Result<()>;

    fn commit(&mut self) -> Result<()>;

    /// 丢弃事务内的全部追加
    fn rollback(&mut self) -> Result<()>;

    /// 追加任意实体
    fn append_entity(&mut self, geometry: Geometry) -> Result<EntityId>;

    /// 按放置变换追加块参照
    fn append_instance(&mut self, placement: &Placement, block: &BlockTemplate) -> Result<EntityId>;

    /// 给已追加的块参照添加属性参照
    fn append_attribute(&mut self, instance: EntityId, tag: &str, text: &str) -> Result<()>;
}

/// 在事务中执行 `f`，出错时回滚
pub fn with_transaction<D, T, F>(db: &mut D, f: F) -> Result<T>
where
    D: DrawingDatabase + ?Sized,
    F: FnOnce(&mut D) -> Result<T>,
{
    db.begin_transaction()?;
    match f(db) {
        Ok(value) => {
            db.commit()?;
            Ok(value)
        }
        Err(err) => {
            tracing::warn!("Rolling back transaction: {}", err);
            db.rollback()?;
            Err(err)
        }
    }
}
