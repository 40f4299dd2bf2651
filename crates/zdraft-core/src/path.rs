//! 阵列路径采样
//!
//! 把直线或多段线实体一次性归约为 `(起点, 终点, 方向, 长度)`。
//! 多段线只取首尾顶点决定方向，长度则沿多段线累计（含凸度弧段）。

use crate::error::{DraftError, Result};
use crate::geometry::Geometry;
use crate::math::{Point3, Vector3, EPSILON};
use serde::{Deserialize, Serialize};

/// 路径来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathKind {
    Line,
    Polyline,
}

/// 采样后的路径
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub kind: PathKind,
    pub start: Point3,
    pub end: Point3,
    /// 起点指向终点的单位向量；起终点重合时为零向量
    pub direction: Vector3,
    pub length: f64,
}

impl Path {
    /// 从几何实体采样路径
    pub fn sample(geometry: &Geometry) -> Result<Path> {
        match geometry {
            Geometry::Line(line) => Ok(Self::from_endpoints(
                PathKind::Line,
                line.start,
                line.end,
                line.length(),
            )),
            Geometry::Polyline(pl) if pl.vertex_count() >= 2 => {
                let start = pl.vertices[0].point;
                let end = pl.vertices[pl.vertex_count() - 1].point;
                Ok(Self::from_endpoints(PathKind::Polyline, start, end, pl.length()))
            }
            Geometry::Polyline(pl) => Err(DraftError::UnsupportedGeometry(format!(
                "Polyline with {} vertices",
                pl.vertex_count()
            ))),
            other => Err(DraftError::UnsupportedGeometry(other.type_name().to_string())),
        }
    }

    fn from_endpoints(kind: PathKind, start: Point3, end: Point3, length: f64) -> Self {
        let chord = end - start;
        let direction = if chord.norm() < EPSILON {
            Vector3::zeros()
        } else {
            chord.normalize()
        };
        Self {
            kind,
            start,
            end,
            direction,
            length,
        }
    }

    /// 起终点重合（方向无定义）
    pub fn is_degenerate(&self) -> bool {
        self.direction == Vector3::zeros()
    }

    /// 沿方向偏移 `distance` 后的点
    pub fn point_at(&self, distance: f64) -> Point3 {
        self.start + self.direction * distance
    }

    /// 方向在 XY 平面内的角度；退化路径返回 0
    pub fn angle(&self) -> f64 {
        if self.is_degenerate() {
            0.0
        } else {
            self.direction.y.atan2(self.direction.x)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Circle, Line, Polyline};

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    #[test]
    fn test_sample_line() {
        let path = Path::sample(&Geometry::Line(Line::new(p(0.0, 0.0), p(0.0, 10.0)))).unwrap();
        assert_eq!(path.kind, PathKind::Line);
        assert!((path.length - 10.0).abs() < EPSILON);
        assert!((path.direction - Vector3::y()).norm() < EPSILON);
        assert!((path.angle() - std::f64::consts::FRAC_PI_2).abs() < EPSILON);
    }

    #[test]
    fn test_polyline_length_is_not_chord() {
        let pl = Polyline::from_points([p(0.0, 0.0), p(3.0, 4.0), p(6.0, 0.0)], false);
        let path = Path::sample(&Geometry::Polyline(pl)).unwrap();
        assert_eq!(path.kind, PathKind::Polyline);
        assert!((path.length - 10.0).abs() < EPSILON);
        assert_eq!(path.end, p(6.0, 0.0));
        assert!((path.direction - Vector3::x()).norm() < EPSILON);
    }

    #[test]
    fn test_degenerate_direction() {
        let path = Path::sample(&Geometry::Line(Line::new(p(5.0, 5.0), p(5.0, 5.0)))).unwrap();
        assert!(path.is_degenerate());
        assert_eq!(path.angle(), 0.0);
        assert_eq!(path.length, 0.0);
    }

    #[test]
    fn test_unsupported_geometry() {
        let circle = Geometry::Circle(Circle::new(p(0.0, 0.0), 1.0));
        assert!(matches!(Path::sample(&circle), Err(DraftError::UnsupportedGeometry(_))));

        let single = Geometry::Polyline(Polyline::from_points([p(0.0, 0.0)], false));
        assert!(matches!(Path::sample(&single), Err(DraftError::UnsupportedGeometry(_))));
    }
}
