//! 直线测量

use crate::error::{DraftError, Result};
use crate::geometry::Geometry;
use crate::math::Vector3;
use serde::{Deserialize, Serialize};

/// 测量结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineMeasurement {
    pub length: f64,
    pub delta: Vector3,
    /// XY 平面内的方向角（度，0..360）
    pub angle_degrees: f64,
}

impl LineMeasurement {
    pub fn summary(&self) -> String {
        format!(
            "Length = {:.4}, Angle = {:.2}°, ΔX = {:.4}, ΔY = {:.4}, ΔZ = {:.4}",
            self.length, self.angle_degrees, self.delta.x, self.delta.y, self.delta.z
        )
    }
}

pub fn measure_line(geometry: &Geometry) -> Result<LineMeasurement> {
    let Geometry::Line(line) = geometry else {
        return Err(DraftError::UnsupportedGeometry(geometry.type_name().to_string()));
    };
    Ok(LineMeasurement {
        length: line.length(),
        delta: line.delta(),
        angle_degrees: line.angle().to_degrees().rem_euclid(360.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Circle, Line};
    use crate::math::Point3;

    #[test]
    fn test_measure_line() {
        let line = Line::new(Point3::new(1.0, 1.0, 0.0), Point3::new(1.0, -3.0, 0.0));
        let m = measure_line(&Geometry::Line(line)).unwrap();
        assert!((m.length - 4.0).abs() < 1e-12);
        assert!((m.angle_degrees - 270.0).abs() < 1e-9);
        assert_eq!(m.delta, Vector3::new(0.0, -4.0, 0.0));
    }

    #[test]
    fn test_measure_rejects_other_geometry() {
        let circle = Geometry::Circle(Circle::new(Point3::origin(), 2.0));
        assert_eq!(
            measure_line(&circle),
            Err(DraftError::UnsupportedGeometry("Circle".to_string()))
        );
    }
}
