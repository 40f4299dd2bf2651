//! 实例放置变换
//!
//! 块先在局部坐标中平移 `-center_offset`（包围盒中心移到局部原点），
//! 再依次缩放、绕 Z 轴旋转、平移到路径上的采样点。
//! 因为居中平移发生在旋转之前，任意旋转角下包围盒中心都落在采样点上。

use crate::math::{Matrix4, Point3, Vector3};
use crate::path::Path;
use nalgebra::Rotation3;
use serde::{Deserialize, Serialize};

/// 旋转策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RotationPolicy {
    /// 保持块原方向
    #[default]
    None,
    /// 旋转到路径方向
    AlignToPath,
}

impl RotationPolicy {
    pub fn from_align(align: bool) -> Self {
        if align {
            RotationPolicy::AlignToPath
        } else {
            RotationPolicy::None
        }
    }
}

/// 单个实例的放置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// 路径上的采样点，即包围盒中心的落点
    pub insert_point: Point3,
    /// 绕 Z 轴旋转（弧度）
    pub rotation: f64,
    pub scale: f64,
    /// 块局部原点到包围盒中心的向量
    pub center_offset: Vector3,
}

impl Placement {
    /// 块局部坐标到世界坐标的完整变换矩阵
    pub fn matrix(&self) -> Matrix4 {
        placement_matrix(self.insert_point, self.rotation, self.scale, &self.center_offset)
    }

    /// 变换后块局部原点的位置，即块参照应写入的插入点
    pub fn origin(&self) -> Point3 {
        self.matrix().transform_point(&Point3::origin())
    }
}

/// T(position) · R_z(rotation) · S(scale) · T(-center_offset)
pub fn placement_matrix(position: Point3, rotation: f64, scale: f64, center_offset: &Vector3) -> Matrix4 {
    Matrix4::new_translation(&position.coords)
        * Rotation3::from_axis_angle(&Vector3::z_axis(), rotation).to_homogeneous()
        * Matrix4::new_nonuniform_scaling(&Vector3::repeat(scale))
        * Matrix4::new_translation(&(-center_offset))
}

/// 计算第 `index` 个实例的放置
pub fn compose(
    path: &Path,
    center_offset: &Vector3,
    index: usize,
    spacing: f64,
    rotation_policy: RotationPolicy,
    scale: f64,
) -> Placement {
    let insert_point = path.point_at(spacing * index as f64);
    let rotation = match rotation_policy {
        RotationPolicy::AlignToPath => path.angle(),
        RotationPolicy::None => 0.0,
    };
    Placement {
        insert_point,
        rotation,
        scale,
        center_offset: *center_offset,
    }
}
