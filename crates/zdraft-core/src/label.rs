//! 块参照编号标注
//!
//! 在每个块参照的世界范围上方放一行居中文本，编号按选择顺序递增。

use crate::geometry::{Text, TextAlignment};
use crate::math::{BoundingBox3, Point3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelOptions {
    pub prefix: String,
    pub start: i64,
    pub text_height: f64,
    /// 文本基线与范围顶边的距离
    pub gap: f64,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            start: 1,
            text_height: 2.5,
            gap: 1.0,
        }
    }
}

/// 为每个范围生成一条标注文本，顺序与输入一致
pub fn plan_labels(extents: &[BoundingBox3], options: &LabelOptions) -> Vec<Text> {
    extents
        .iter()
        .zip(options.start..)
        .map(|(bbox, number)| {
            let center = bbox.center();
            let position = Point3::new(center.x, bbox.max.y + options.gap, bbox.min.z);
            Text::new(position, format!("{}{}", options.prefix, number), options.text_height)
                .with_alignment(TextAlignment::Center)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_increment_above_extents() {
        let extents = [
            BoundingBox3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 4.0, 0.0)),
            BoundingBox3::new(Point3::new(10.0, 0.0, 0.0), Point3::new(12.0, 2.0, 0.0)),
        ];
        let options = LabelOptions {
            prefix: "P-".to_string(),
            start: 7,
            ..LabelOptions::default()
        };
        let labels = plan_labels(&extents, &options);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].content, "P-7");
        assert_eq!(labels[1].content, "P-8");
        assert_eq!(labels[0].position, Point3::new(1.0, 5.0, 0.0));
        assert_eq!(labels[1].position, Point3::new(11.0, 3.0, 0.0));
        assert_eq!(labels[1].alignment, TextAlignment::Center);
    }

    #[test]
    fn test_point_extents() {
        let p = Point3::new(3.0, 3.0, 0.0);
        let labels = plan_labels(&[BoundingBox3::new(p, p)], &LabelOptions::default());
        assert_eq!(labels[0].position, Point3::new(3.0, 4.0, 0.0));
        assert_eq!(labels[0].content, "1");
    }
}
