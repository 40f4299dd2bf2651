//! 数学基础类型
//!
//! 基于 nalgebra 的类型别名，以及三维包围盒。

use serde::{Deserialize, Serialize};

pub type Point3 = nalgebra::Point3<f64>;
pub type Vector3 = nalgebra::Vector3<f64>;
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// 通用浮点容差
pub const EPSILON: f64 = 1e-10;

/// 长度容差（图形单位），用于判断阵列点是否越过路径终点
pub const LENGTH_TOLERANCE: f64 = 0.001;

/// 三维轴对齐包围盒
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox3 {
    pub min: Point3,
    pub max: Point3,
}

impl BoundingBox3 {
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// 空包围盒（min > max）
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Point3>) -> Self {
        let mut bbox = Self::empty();
        for p in points {
            bbox.expand_to_include(&p);
        }
        bbox
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn expand_to_include(&mut self, p: &Point3) {
        self.min = Point3::new(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z));
        self.max = Point3::new(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z));
    }

    /// 合并另一个包围盒
    pub fn union(&self, other: &BoundingBox3) -> BoundingBox3 {
        if other.is_empty() {
            return *self;
        }
        let mut result = *self;
        result.expand_to_include(&other.min);
        result.expand_to_include(&other.max);
        result
    }

    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// 八个角点
    pub fn corners(&self) -> [Point3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Point3::new(a.x, a.y, a.z),
            Point3::new(b.x, a.y, a.z),
            Point3::new(b.x, b.y, a.z),
            Point3::new(a.x, b.y, a.z),
            Point3::new(a.x, a.y, b.z),
            Point3::new(b.x, a.y, b.z),
            Point3::new(b.x, b.y, b.z),
            Point3::new(a.x, b.y, b.z),
        ]
    }

    /// 用齐次矩阵变换后的包围盒（取角点变换后的外包）
    pub fn transformed(&self, matrix: &Matrix4) -> BoundingBox3 {
        if self.is_empty() {
            return *self;
        }
        BoundingBox3::from_points(self.corners().iter().map(|c| matrix.transform_point(c)))
    }
}

impl Default for BoundingBox3 {
    fn default() -> Self {
        Self::empty()
    }
}
