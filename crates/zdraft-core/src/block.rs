//! 块定义与块模板
//!
//! `BlockDefinition` 是文档块表中的持久定义；`BlockTemplate` 是阵列时从定义中
//! 拷贝出的只读值，计算过程中不再持有对文档的引用。

use crate::geometry::Geometry;
use crate::math::{BoundingBox3, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// 块定义中的属性定义
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub tag: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub default_text: String,
    /// 常量属性不会在块参照上生成属性参照
    #[serde(default)]
    pub constant: bool,
}

impl AttributeDefinition {
    pub fn new(tag: impl Into<String>, default_text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            prompt: String::new(),
            default_text: default_text.into(),
            constant: false,
        }
    }

    pub fn constant(mut self) -> Self {
        self.constant = true;
        self
    }
}

/// 块定义
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDefinition {
    pub name: String,
    /// 块基点，块参照的插入点对应此点
    #[serde(default = "Point3::origin")]
    pub base_point: Point3,
    #[serde(default)]
    pub entities: Vec<Geometry>,
    #[serde(default)]
    pub attribute_definitions: Vec<AttributeDefinition>,
}

impl BlockDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_point: Point3::origin(),
            entities: Vec::new(),
            attribute_definitions: Vec::new(),
        }
    }

    pub fn with_entity(mut self, geometry: Geometry) -> Self {
        self.entities.push(geometry);
        self
    }

    pub fn with_attribute(mut self, definition: AttributeDefinition) -> Self {
        self.attribute_definitions.push(definition);
        self
    }

    /// 相对基点的局部包围盒
    pub fn extents(&self) -> BoundingBox3 {
        let bbox = self
            .entities
            .iter()
            .fold(BoundingBox3::empty(), |acc, g| acc.union(&g.bounding_box()));
        if bbox.is_empty() {
            return bbox;
        }
        let shift = self.base_point.coords;
        BoundingBox3::new(bbox.min - shift, bbox.max - shift)
    }

    /// 拷贝出阵列使用的块模板
    pub fn template(&self) -> BlockTemplate {
        let extents = self.extents();
        let center_offset = if extents.is_empty() {
            Vector3::zeros()
        } else {
            extents.center().coords
        };

        BlockTemplate {
            name: self.name.clone(),
            center_offset,
            extents,
            attribute_fields: self
                .attribute_definitions
                .iter()
                .map(|def| AttributeField {
                    tag: def.tag.clone(),
                    is_constant: def.constant,
                    default_text: def.default_text.clone(),
                })
                .collect(),
        }
    }
}

/// 属性字段（模板中的只读拷贝）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeField {
    pub tag: String,
    pub is_constant: bool,
    pub default_text: String,
}

/// 阵列用块模板
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockTemplate {
    pub name: String,
    /// 块局部原点到包围盒中心的向量；无可计算范围时为零向量
    pub center_offset: Vector3,
    /// 局部包围盒
    pub extents: BoundingBox3,
    pub attribute_fields: Vec<AttributeField>,
}

impl BlockTemplate {
    /// 无几何、无属性的模板
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            center_offset: Vector3::zeros(),
            extents: BoundingBox3::empty(),
            attribute_fields: Vec::new(),
        }
    }

    pub fn with_center_offset(mut self, center_offset: Vector3) -> Self {
        self.center_offset = center_offset;
        self
    }

    pub fn with_field(mut self, tag: &str, default_text: &str, is_constant: bool) -> Self {
        self.attribute_fields.push(AttributeField {
            tag: tag.to_string(),
            is_constant,
            default_text: default_text.to_string(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Line;

    #[test]
    fn test_template_center_offset() {
        let def = BlockDefinition::new("DOOR")
            .with_entity(Geometry::Line(Line::new(Point3::new(0.0, 0.0, 0.0), Point3::new(4.0, 2.0, 0.0))));
        let template = def.template();
        assert_eq!(template.center_offset, Vector3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn test_template_relative_to_base_point() {
        let mut def = BlockDefinition::new("TAG")
            .with_entity(Geometry::Line(Line::new(Point3::new(10.0, 10.0, 0.0), Point3::new(12.0, 10.0, 0.0))));
        def.base_point = Point3::new(10.0, 10.0, 0.0);
        assert_eq!(def.template().center_offset, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_empty_block_has_zero_offset() {
        let template = BlockDefinition::new("EMPTY").template();
        assert_eq!(template.center_offset, Vector3::zeros());
        assert!(template.extents.is_empty());
    }

    #[test]
    fn test_template_copies_attribute_fields() {
        let def = BlockDefinition::new("PART")
            .with_attribute(AttributeDefinition::new("PARTNUM", "00"))
            .with_attribute(AttributeDefinition::new("MAKER", "ACME").constant());
        let fields = def.template().attribute_fields;
        assert_eq!(fields.len(), 2);
        assert!(!fields[0].is_constant);
        assert!(fields[1].is_constant);
        assert_eq!(fields[1].default_text, "ACME");
    }
}
