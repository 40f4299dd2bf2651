//! 阵列数量与间距规划
//!
//! 首个实例位于路径起点，其余按固定间距排列（栅栏式分布）。

use crate::error::{DraftError, Result};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// 单次阵列允许的最大计划数量
pub const MAX_PLANNED_BLOCKS: usize = 100_000;

/// 布置方式
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlacementPolicy {
    /// 按数量：首尾两端各一个，均分路径
    Count(NonZeroUsize),
    /// 按间距：从起点开始，每隔固定距离一个
    Spacing(f64),
}

impl PlacementPolicy {
    pub fn count(count: usize) -> Result<Self> {
        NonZeroUsize::new(count)
            .map(PlacementPolicy::Count)
            .ok_or_else(|| DraftError::InvalidPolicy("count must be at least 1".to_string()))
    }

    pub fn spacing(spacing: f64) -> Result<Self> {
        if spacing.is_finite() && spacing > 0.0 {
            Ok(PlacementPolicy::Spacing(spacing))
        } else {
            Err(DraftError::InvalidPolicy(format!(
                "spacing must be a positive distance, got {}",
                spacing
            )))
        }
    }
}

/// 规划结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementPlan {
    pub blocks_planned: usize,
    /// 相邻实例沿路径方向的距离
    pub spacing: f64,
}

impl PlacementPlan {
    /// 第 `index` 个实例距起点的距离
    pub fn offset(&self, index: usize) -> f64 {
        self.spacing * index as f64
    }
}

/// 根据路径长度与布置方式计算实例数量和间距
///
/// 间距相对路径极小时数量饱和到 `usize::MAX`，由调用方决定是否拒绝。
pub fn plan(length: f64, policy: PlacementPolicy) -> PlacementPlan {
    match policy {
        PlacementPolicy::Count(count) => {
            let blocks_planned = count.get();
            let spacing = if blocks_planned > 1 {
                length / (blocks_planned - 1) as f64
            } else {
                0.0
            };
            PlacementPlan {
                blocks_planned,
                spacing,
            }
        }
        // 非正间距只放一个，避免除零
        PlacementPolicy::Spacing(spacing) if !(spacing.is_finite() && spacing > 0.0) => PlacementPlan {
            blocks_planned: 1,
            spacing: 0.0,
        },
        PlacementPolicy::Spacing(spacing) => PlacementPlan {
            // f64 -> usize 的转换本身是饱和的
            blocks_planned: ((length / spacing).floor() as usize).saturating_add(1),
            spacing,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_mode_spacing() {
        let plan = plan(10.0, PlacementPolicy::count(4).unwrap());
        assert_eq!(plan.blocks_planned, 4);
        assert!((plan.spacing - 10.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_count_has_zero_spacing() {
        let plan = plan(50.0, PlacementPolicy::count(1).unwrap());
        assert_eq!(plan.blocks_planned, 1);
        assert_eq!(plan.spacing, 0.0);
        assert_eq!(plan.offset(0), 0.0);
    }

    #[test]
    fn test_spacing_mode_is_fencepost() {
        assert_eq!(plan(100.0, PlacementPolicy::spacing(25.0).unwrap()).blocks_planned, 5);
        assert_eq!(plan(24.0, PlacementPolicy::spacing(10.0).unwrap()).blocks_planned, 3);
    }

    #[test]
    fn test_spacing_longer_than_path() {
        let plan = plan(3.0, PlacementPolicy::spacing(10.0).unwrap());
        assert_eq!(plan.blocks_planned, 1);
        assert_eq!(plan.spacing, 10.0);
    }

    #[test]
    fn test_invalid_policies() {
        assert!(PlacementPolicy::count(0).is_err());
        assert!(PlacementPolicy::spacing(0.0).is_err());
        assert!(PlacementPolicy::spacing(-1.0).is_err());
        assert!(PlacementPolicy::spacing(f64::NAN).is_err());
    }

    #[test]
    fn test_tiny_spacing_saturates() {
        let plan = plan(100.0, PlacementPolicy::spacing(1e-300).unwrap());
        assert_eq!(plan.blocks_planned, usize::MAX);
        assert!(plan.blocks_planned > MAX_PLANNED_BLOCKS);
    }

    #[test]
    fn test_unchecked_zero_spacing_plans_one() {
        let plan = plan(10.0, PlacementPolicy::Spacing(0.0));
        assert_eq!(plan.blocks_planned, 1);
    }
}
