//! 沿路径阵列块
//!
//! 流程：规划 → 逐个生成 → 完成。
//! 规划在 [`PathArray::instances`] 创建迭代器时一次完成（[`placement::plan`] 得到计划数量和间距），
//! 迭代器本身只经历“生成中”和“完成”两个阶段：按序号依次生成放置变换与属性值，
//! 一旦采样点距起点超过 `路径长度 + LENGTH_TOLERANCE` 立即停止（不报错），
//! 因此实际生成数量可能少于计划数量。零长度路径只生成第一个实例。
//!
//! 本模块只产生 [`InstancePlan`]，写入文档由 [`ArrayOutcome::commit`] 在一个事务中完成。

use crate::attribute;
use crate::block::BlockTemplate;
use crate::database::{with_transaction, DrawingDatabase};
use crate::entity::EntityId;
use crate::error::{DraftError, Result};
use crate::math::{EPSILON, LENGTH_TOLERANCE};
use crate::path::Path;
use crate::placement::{self, PlacementPlan, PlacementPolicy, MAX_PLANNED_BLOCKS};
use crate::transform::{self, Placement, RotationPolicy};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// 单个实例的计划
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstancePlan {
    /// 从 0 开始的序号
    pub index: usize,
    pub placement: Placement,
    /// 属性标记 -> 文本，按块定义中的顺序
    pub attributes: IndexMap<String, String>,
}

impl InstancePlan {
    /// 从 1 开始的序号，即写入序号属性的值
    pub fn ordinal(&self) -> usize {
        self.index + 1
    }
}

/// 阵列参数
#[derive(Debug, Clone)]
pub struct PathArray<'a> {
    path: &'a Path,
    template: &'a BlockTemplate,
    policy: PlacementPolicy,
    rotation: RotationPolicy,
    scale: f64,
}

impl<'a> PathArray<'a> {
    pub fn new(path: &'a Path, template: &'a BlockTemplate, policy: PlacementPolicy) -> Self {
        Self {
            path,
            template,
            policy,
            rotation: RotationPolicy::None,
            scale: 1.0,
        }
    }

    pub fn with_rotation(mut self, rotation: RotationPolicy) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// 按顺序产生实例计划的迭代器
    pub fn instances(&self) -> Instances<'_> {
        let plan = placement::plan(self.path.length, self.policy);
        debug!(
            "Planned {} blocks along {:.3} units, spacing {:.3}",
            plan.blocks_planned, self.path.length, plan.spacing
        );
        Instances {
            array: self,
            plan,
            stage: Stage::Emitting { next: 0 },
        }
    }

    /// 生成全部实例计划
    ///
    /// 计划数量超过 [`MAX_PLANNED_BLOCKS`] 时在生成前返回错误。
    pub fn run(&self) -> Result<ArrayOutcome> {
        let instances = self.instances();
        let plan = instances.plan;
        if plan.blocks_planned > MAX_PLANNED_BLOCKS {
            return Err(DraftError::InvalidPolicy(format!(
                "{} blocks planned along {:.3} units, at most {} allowed",
                plan.blocks_planned, self.path.length, MAX_PLANNED_BLOCKS
            )));
        }
        let plans: Vec<InstancePlan> = instances.collect();
        Ok(ArrayOutcome {
            block_name: self.template.name.clone(),
            blocks_planned: plan.blocks_planned,
            spacing: plan.spacing,
            plans,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Emitting { next: usize },
    Done,
}

/// 实例计划迭代器
pub struct Instances<'a> {
    array: &'a PathArray<'a>,
    plan: PlacementPlan,
    stage: Stage,
}

impl Instances<'_> {
    pub fn plan(&self) -> PlacementPlan {
        self.plan
    }
}

impl Iterator for Instances<'_> {
    type Item = InstancePlan;

    fn next(&mut self) -> Option<InstancePlan> {
        let index = match self.stage {
            Stage::Emitting { next } if next < self.plan.blocks_planned => next,
            Stage::Emitting { .. } | Stage::Done => {
                self.stage = Stage::Done;
                return None;
            }
        };

        let array = self.array;
        if index > 0 && array.path.length <= EPSILON {
            debug!("Zero-length path, stopped after the first instance");
            self.stage = Stage::Done;
            return None;
        }

        let placement = transform::compose(
            array.path,
            &array.template.center_offset,
            index,
            self.plan.spacing,
            array.rotation,
            array.scale,
        );

        let distance = (placement.insert_point - array.path.start).norm();
        if distance > array.path.length + LENGTH_TOLERANCE {
            debug!(
                "Stopped at index {}: {:.4} exceeds path length {:.4}",
                index, distance, array.path.length
            );
            self.stage = Stage::Done;
            return None;
        }

        self.stage = Stage::Emitting { next: index + 1 };
        let attributes = attribute::resolve(&array.template.attribute_fields, index + 1);
        debug!("Instance {} at {:?}", index, placement.insert_point);
        Some(InstancePlan {
            index,
            placement,
            attributes,
        })
    }
}

/// 阵列结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayOutcome {
    pub block_name: String,
    pub blocks_planned: usize,
    pub spacing: f64,
    pub plans: Vec<InstancePlan>,
}

impl ArrayOutcome {
    pub fn blocks_created(&self) -> usize {
        self.plans.len()
    }

    /// 实际数量少于计划时返回差额
    pub fn shortfall(&self) -> Option<usize> {
        self.blocks_planned
            .checked_sub(self.blocks_created())
            .filter(|&missing| missing > 0)
    }

    /// 在一个事务内写入全部实例与属性，返回新块参照的 ID
    pub fn commit<D>(&self, db: &mut D, template: &BlockTemplate) -> Result<Vec<EntityId>>
    where
        D: DrawingDatabase + ?Sized,
    {
        let ids = with_transaction(db, |db| {
            let mut ids = Vec::with_capacity(self.plans.len());
            for plan in &self.plans {
                let id = db.append_instance(&plan.placement, template)?;
                for (tag, text) in &plan.attributes {
                    db.append_attribute(id, tag, text)?;
                }
                ids.push(id);
            }
            Ok(ids)
        })?;

        info!("Created {} of {} '{}' blocks", ids.len(), self.blocks_planned, self.block_name);
        if let Some(missing) = self.shortfall() {
            warn!("{} planned blocks did not fit on the path", missing);
        }
        Ok(ids)
    }
}

/// 沿路径实体阵列块并写入文档
///
/// 路径与块定义先拷贝成值，随后规划与写入；采样失败时不产生任何写入。
pub fn array_along_path<D>(
    db: &mut D,
    path_entity: EntityId,
    block_name: &str,
    policy: PlacementPolicy,
    rotation: RotationPolicy,
    scale: f64,
) -> Result<(ArrayOutcome, Vec<EntityId>)>
where
    D: DrawingDatabase + ?Sized,
{
    let path = Path::sample(&db.geometry(path_entity)?)?;
    let template = db.resolve_block(block_name)?;

    let outcome = PathArray::new(&path, &template, policy)
        .with_rotation(rotation)
        .with_scale(scale)
        .run()?;
    let ids = outcome.commit(db, &template)?;
    Ok((outcome, ids))
}
