//! ZDraft 核心
//!
//! 绘图辅助工具的几何与算法部分：
//! - 沿直线/多段线按数量或间距阵列块，可对齐路径方向、按包围盒中心放置、自动编号属性
//! - 直线测量
//! - 块参照编号标注
//!
//! 核心不做 I/O：图形数据通过 [`database::DrawingDatabase`] 读写。
//!
//! # 示例
//!
//! ```rust
//! use zdraft_core::prelude::*;
//!
//! let line = Line::new(Point3::origin(), Point3::new(100.0, 0.0, 0.0));
//! let path = Path::sample(&Geometry::Line(line)).unwrap();
//! let template = BlockTemplate::new("POST");
//!
//! let outcome = PathArray::new(&path, &template, PlacementPolicy::spacing(25.0).unwrap()).run().unwrap();
//! assert_eq!(outcome.blocks_created(), 5);
//! ```

pub mod array;
pub mod attribute;
pub mod block;
pub mod database;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod label;
pub mod math;
pub mod measure;
pub mod path;
pub mod placement;
pub mod transform;

pub use error::{DraftError, Result};

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::array::{array_along_path, ArrayOutcome, InstancePlan, PathArray};
    pub use crate::block::{AttributeDefinition, AttributeField, BlockDefinition, BlockTemplate};
    pub use crate::database::DrawingDatabase;
    pub use crate::entity::{Entity, EntityId};
    pub use crate::error::DraftError;
    pub use crate::geometry::{
        Arc, AttributeReference, BlockReference, Circle, Geometry, Line, Point, Polyline, PolylineVertex, Text,
        TextAlignment,
    };
    pub use crate::label::LabelOptions;
    pub use crate::math::{BoundingBox3, Point3, Vector3};
    pub use crate::measure::LineMeasurement;
    pub use crate::path::{Path, PathKind};
    pub use crate::placement::{PlacementPlan, PlacementPolicy};
    pub use crate::transform::{Placement, RotationPolicy};
}
