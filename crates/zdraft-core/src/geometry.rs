//! 几何图元定义
//!
//! 支持的图元：
//! - 点 (Point)
//! - 线段 (Line)
//! - 圆 (Circle)
//! - 圆弧 (Arc)
//! - 多段线 (Polyline)，顶点带凸度
//! - 文本 (Text)
//! - 块参照 (BlockReference)，带属性参照
//!
//! 坐标均为三维；圆、圆弧与多段线的弧段位于 XY 平面（取顶点的 Z 值）。

use crate::math::{BoundingBox3, Point3, Vector3, EPSILON};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// 几何类型枚举
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Geometry {
    Point(Point),
    Line(Line),
    Circle(Circle),
    Arc(Arc),
    Polyline(Polyline),
    Text(Text),
    BlockReference(BlockReference),
}

impl Geometry {
    /// 获取几何的包围盒
    ///
    /// 块参照只返回其插入点；完整范围需要块定义，由文档计算。
    pub fn bounding_box(&self) -> BoundingBox3 {
        match self {
            Geometry::Point(p) => BoundingBox3::new(p.position, p.position),
            Geometry::Line(l) => l.bounding_box(),
            Geometry::Circle(c) => c.bounding_box(),
            Geometry::Arc(a) => a.bounding_box(),
            Geometry::Polyline(pl) => pl.bounding_box(),
            Geometry::Text(t) => t.bounding_box(),
            Geometry::BlockReference(r) => BoundingBox3::new(r.position, r.position),
        }
    }

    /// 获取几何的类型名称
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::Line(_) => "Line",
            Geometry::Circle(_) => "Circle",
            Geometry::Arc(_) => "Arc",
            Geometry::Polyline(_) => "Polyline",
            Geometry::Text(_) => "Text",
            Geometry::BlockReference(_) => "BlockReference",
        }
    }
}

/// 点
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Point {
    pub position: Point3,
}

impl Point {
    pub fn new(position: Point3) -> Self {
        Self { position }
    }
}

/// 线段
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    pub start: Point3,
    pub end: Point3,
}

impl Line {
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    pub fn delta(&self) -> Vector3 {
        self.end - self.start
    }

    /// 计算线段长度
    pub fn length(&self) -> f64 {
        self.delta().norm()
    }

    /// XY 平面内的方向角（弧度）
    pub fn angle(&self) -> f64 {
        let d = self.delta();
        d.y.atan2(d.x)
    }

    pub fn bounding_box(&self) -> BoundingBox3 {
        BoundingBox3::from_points([self.start, self.end])
    }
}

/// 圆
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point3,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point3, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn bounding_box(&self) -> BoundingBox3 {
        let r = Vector3::new(self.radius, self.radius, 0.0);
        BoundingBox3::new(self.center - r, self.center + r)
    }
}

/// 圆弧（逆时针，从起始角到终止角）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arc {
    pub center: Point3,
    pub radius: f64,
    /// 起始角度（弧度）
    pub start_angle: f64,
    /// 终止角度（弧度）
    pub end_angle: f64,
}

impl Arc {
    pub fn new(center: Point3, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            center,
            radius,
            start_angle,
            end_angle,
        }
    }

    /// 扫过的角度，归一化到 [0, 2π)
    pub fn sweep_angle(&self) -> f64 {
        (self.end_angle - self.start_angle).rem_euclid(TAU)
    }

    pub fn length(&self) -> f64 {
        self.sweep_angle() * self.radius
    }

    pub fn point_at_angle(&self, angle: f64) -> Point3 {
        Point3::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
            self.center.z,
        )
    }

    fn contains_angle(&self, angle: f64) -> bool {
        (angle - self.start_angle).rem_euclid(TAU) <= self.sweep_angle()
    }

    pub fn bounding_box(&self) -> BoundingBox3 {
        let mut bbox = BoundingBox3::from_points([
            self.point_at_angle(self.start_angle),
            self.point_at_angle(self.end_angle),
        ]);

        // 象限点
        for angle in [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2] {
            if self.contains_angle(angle) {
                bbox.expand_to_include(&self.point_at_angle(angle));
            }
        }
        bbox
    }
}

/// 多段线顶点
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolylineVertex {
    pub point: Point3,
    /// 凸度（bulge），0 表示到下一顶点为直线段
    #[serde(default)]
    pub bulge: f64,
}

impl PolylineVertex {
    pub fn new(point: Point3) -> Self {
        Self { point, bulge: 0.0 }
    }

    pub fn with_bulge(point: Point3, bulge: f64) -> Self {
        Self { point, bulge }
    }
}

/// 多段线
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polyline {
    pub vertices: Vec<PolylineVertex>,
    /// 是否闭合
    #[serde(default)]
    pub closed: bool,
}

impl Polyline {
    pub fn new(vertices: Vec<PolylineVertex>, closed: bool) -> Self {
        Self { vertices, closed }
    }

    /// 从点列表创建（所有顶点都是直线连接）
    pub fn from_points(points: impl IntoIterator<Item = Point3>, closed: bool) -> Self {
        Self {
            vertices: points.into_iter().map(PolylineVertex::new).collect(),
            closed,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// 线段数量（闭合时包含首尾连接段）
    pub fn segment_count(&self) -> usize {
        match self.vertices.len() {
            0 | 1 => 0,
            n if self.closed => n,
            n => n - 1,
        }
    }

    fn segments(&self) -> impl Iterator<Item = (&PolylineVertex, &PolylineVertex)> + '_ {
        let n = self.vertices.len();
        (0..self.segment_count()).map(move |i| (&self.vertices[i], &self.vertices[(i + 1) % n]))
    }

    /// 沿多段线的总长度，弧段按弧长计算
    pub fn length(&self) -> f64 {
        self.segments().map(|(v1, v2)| segment_length(v1, v2)).sum()
    }

    pub fn bounding_box(&self) -> BoundingBox3 {
        let mut bbox = BoundingBox3::from_points(self.vertices.iter().map(|v| v.point));
        for (v1, v2) in self.segments() {
            if v1.bulge.abs() >= EPSILON {
                bbox.expand_to_include(&bulge_midpoint(v1, v2));
            }
        }
        bbox
    }
}

fn segment_length(v1: &PolylineVertex, v2: &PolylineVertex) -> f64 {
    let chord = (v2.point - v1.point).norm();
    let bulge = v1.bulge.abs();
    if bulge < EPSILON || chord < EPSILON {
        return chord;
    }
    // 圆心角 θ = 4·atan(bulge)，半径 r = chord / (2·sin(θ/2))
    let angle = 4.0 * bulge.atan();
    let radius = chord / (2.0 * (angle / 2.0).sin());
    radius * angle
}

/// 弧段中点：弦中点沿弦的垂线偏移矢高
fn bulge_midpoint(v1: &PolylineVertex, v2: &PolylineVertex) -> Point3 {
    let chord = v2.point - v1.point;
    let mid = nalgebra::center(&v1.point, &v2.point);
    let len = chord.norm();
    if len < EPSILON {
        return mid;
    }
    // 凸度为正时逆时针，弧在弦方向右侧
    let right = Vector3::new(chord.y, -chord.x, 0.0) / len;
    mid + right * (v1.bulge * len / 2.0)
}

/// 文本对齐方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
}

/// 单行文本
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Text {
    /// 插入点（基线上的对齐点）
    pub position: Point3,
    pub content: String,
    pub height: f64,
    /// 旋转角度（弧度）
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub alignment: TextAlignment,
}

impl Text {
    pub fn new(position: Point3, content: impl Into<String>, height: f64) -> Self {
        Self {
            position,
            content: content.into(),
            height,
            rotation: 0.0,
            alignment: TextAlignment::Left,
        }
    }

    pub fn with_alignment(mut self, alignment: TextAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// 估算文本宽度：CJK 字符按字高，其余按 0.6 倍字高
    pub fn estimated_width(&self) -> f64 {
        self.content
            .chars()
            .map(|c| if is_cjk(c) { self.height } else { self.height * 0.6 })
            .sum()
    }

    /// 包围盒（忽略旋转）
    pub fn bounding_box(&self) -> BoundingBox3 {
        let width = self.estimated_width();
        let left = match self.alignment {
            TextAlignment::Left => self.position.x,
            TextAlignment::Center => self.position.x - width / 2.0,
            TextAlignment::Right => self.position.x - width,
        };
        BoundingBox3::new(
            Point3::new(left, self.position.y, self.position.z),
            Point3::new(left + width, self.position.y + self.height, self.position.z),
        )
    }
}

fn is_cjk(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{F900}'..='\u{FAFF}')
}

/// 块参照上的属性值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeReference {
    pub tag: String,
    pub text: String,
}

/// 块参照（块的一个实例）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockReference {
    pub block_name: String,
    /// 块局部原点在世界坐标中的位置
    pub position: Point3,
    /// 绕 Z 轴的旋转（弧度）
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "unit_scale")]
    pub scale: f64,
    #[serde(default)]
    pub attributes: Vec<AttributeReference>,
}

fn unit_scale() -> f64 {
    1.0
}

impl BlockReference {
    pub fn new(block_name: impl Into<String>, position: Point3) -> Self {
        Self {
            block_name: block_name.into(),
            position,
            rotation: 0.0,
            scale: 1.0,
            attributes: Vec::new(),
        }
    }

    /// 块局部坐标到世界坐标的变换矩阵
    pub fn matrix(&self) -> crate::math::Matrix4 {
        crate::transform::placement_matrix(self.position, self.rotation, self.scale, &Vector3::zeros())
    }

    pub fn attribute(&self, tag: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.tag.eq_ignore_ascii_case(tag))
            .map(|a| a.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    #[test]
    fn test_line_length() {
        let line = Line::new(p(0.0, 0.0), p(3.0, 4.0));
        assert!((line.length() - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_polyline_length_follows_vertices() {
        let pl = Polyline::from_points([p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0)], false);
        assert!((pl.length() - 20.0).abs() < EPSILON);
    }

    #[test]
    fn test_closed_polyline_includes_closing_segment() {
        let pl = Polyline::from_points([p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)], true);
        assert_eq!(pl.segment_count(), 4);
        assert!((pl.length() - 40.0).abs() < EPSILON);
    }

    #[test]
    fn test_bulge_segment_is_arc_length() {
        // 凸度 1 为半圆
        let pl = Polyline::new(
            vec![PolylineVertex::with_bulge(p(0.0, 0.0), 1.0), PolylineVertex::new(p(2.0, 0.0))],
            false,
        );
        assert!((pl.length() - PI).abs() < 1e-9);

        let bbox = pl.bounding_box();
        assert!((bbox.min.y + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_arc_bounding_box_quadrants() {
        let arc = Arc::new(Point3::origin(), 1.0, 0.0, PI);
        let bbox = arc.bounding_box();
        assert!((bbox.max.y - 1.0).abs() < EPSILON);
        assert!((bbox.min.x + 1.0).abs() < EPSILON);
        assert!(bbox.min.y.abs() < EPSILON);
    }

    #[test]
    fn test_text_centered_bbox() {
        let text = Text::new(p(10.0, 0.0), "AB", 1.0).with_alignment(TextAlignment::Center);
        let bbox = text.bounding_box();
        assert!((bbox.min.x - 9.4).abs() < 1e-9);
        assert!((bbox.max.x - 10.6).abs() < 1e-9);
    }
}
