//! Point text leaves.
//!
//! Text is anchored at a single point. Transforms move the anchor only:
//! the output format has no general text transform, so rotation or scale
//! of the glyphs themselves is expressed through the text matrix, which
//! callers set explicitly.

use bezkit_geom::{AffineTransform, Point};
use serde::{Deserialize, Serialize};

use crate::node::{Component, NodeKind, NodeMeta};

pub const DEFAULT_FONT: &str = "Helvetica";
pub const DEFAULT_SIZE: f64 = 12.0;
pub const DEFAULT_LEADING: f64 = 15.0;

/// Paragraph alignment, written as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
    JustifyAll,
}

impl TextAlign {
    pub fn code(&self) -> i32 {
        match self {
            TextAlign::Left => 0,
            TextAlign::Center => 1,
            TextAlign::Right => 2,
            TextAlign::Justify => 3,
            TextAlign::JustifyAll => 4,
        }
    }
}

/// A single run of text anchored at `(tx, ty)`.
#[derive(Debug, Clone)]
pub struct PointText {
    meta: NodeMeta,
    text: String,
    anchor: Point,
    matrix: [f64; 4],
    font: String,
    size: f64,
    leading: f64,
    paragraph_leading: f64,
    align: TextAlign,
    start_offset: f64,
    fill: Option<u32>,
    stroke: Option<u32>,
    weight: f64,
    invisible: bool,
}

impl PointText {
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            meta: NodeMeta::new(),
            text: text.into(),
            anchor: Point::new(x, y),
            matrix: [1.0, 0.0, 0.0, 1.0],
            font: DEFAULT_FONT.to_string(),
            size: DEFAULT_SIZE,
            leading: DEFAULT_LEADING,
            paragraph_leading: DEFAULT_LEADING,
            align: TextAlign::Left,
            start_offset: 0.0,
            fill: None,
            stroke: None,
            weight: 1.0,
            invisible: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn set_anchor(&mut self, x: f64, y: f64) {
        self.anchor = Point::new(x, y);
    }

    /// The 2x2 part of the text matrix as `[a, b, c, d]`.
    pub fn matrix(&self) -> [f64; 4] {
        self.matrix
    }

    pub fn set_matrix(&mut self, a: f64, b: f64, c: f64, d: f64) -> &mut Self {
        self.matrix = [a, b, c, d];
        self
    }

    /// The full text matrix `[a, b, c, d, tx, ty]`.
    pub fn text_matrix(&self) -> [f64; 6] {
        let [a, b, c, d] = self.matrix;
        [a, b, c, d, self.anchor.x, self.anchor.y]
    }

    pub fn font(&self) -> &str {
        &self.font
    }

    pub fn set_font(&mut self, font: impl Into<String>) -> &mut Self {
        self.font = font.into();
        self
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn set_size(&mut self, size: f64) -> &mut Self {
        self.size = size;
        self
    }

    pub fn leading(&self) -> f64 {
        self.leading
    }

    pub fn paragraph_leading(&self) -> f64 {
        self.paragraph_leading
    }

    pub fn set_leading(&mut self, leading: f64, paragraph_leading: f64) -> &mut Self {
        self.leading = leading;
        self.paragraph_leading = paragraph_leading;
        self
    }

    pub fn align(&self) -> TextAlign {
        self.align
    }

    pub fn set_align(&mut self, align: TextAlign) -> &mut Self {
        self.align = align;
        self
    }

    pub fn start_offset(&self) -> f64 {
        self.start_offset
    }

    pub fn set_start_offset(&mut self, offset: f64) -> &mut Self {
        self.start_offset = offset;
        self
    }

    // ==================== Paint ====================

    /// Fill color, when one was set explicitly.
    pub fn fill(&self) -> Option<u32> {
        self.fill
    }

    pub fn stroke(&self) -> Option<u32> {
        self.stroke
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn set_fill(&mut self, argb: u32) -> &mut Self {
        self.fill = Some(argb);
        self.invisible = false;
        self
    }

    pub fn set_stroke(&mut self, argb: u32, weight: f64) -> &mut Self {
        self.stroke = Some(argb);
        self.weight = weight;
        self.invisible = false;
        self
    }

    /// Drop both colors and render the text invisibly.
    pub fn set_invisible(&mut self) -> &mut Self {
        self.fill = None;
        self.stroke = None;
        self.invisible = true;
        self
    }

    /// Text render mode: 0 fill, 1 stroke, 2 fill and stroke, 3 invisible.
    pub fn render_mode(&self) -> i32 {
        if self.invisible {
            return 3;
        }
        match (self.fill, self.stroke) {
            (Some(_), Some(_)) => 2,
            (None, Some(_)) => 1,
            _ => 0,
        }
    }
}

impl Component for PointText {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        &mut self.meta
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Text
    }

    fn transform(&mut self, matrix: &AffineTransform) {
        let (x, y) = matrix.apply(self.anchor.x, self.anchor.y);
        self.anchor = Point::new(x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let text = PointText::new(1.0, 2.0, "hello");
        assert_eq!(text.font(), "Helvetica");
        assert_eq!(text.size(), 12.0);
        assert_eq!(text.leading(), 15.0);
        assert_eq!(text.paragraph_leading(), 15.0);
        assert_eq!(text.align().code(), 0);
        assert_eq!(text.text_matrix(), [1.0, 0.0, 0.0, 1.0, 1.0, 2.0]);
        assert_eq!(text.render_mode(), 0);
    }

    #[test]
    fn test_render_modes() {
        let mut text = PointText::new(0.0, 0.0, "x");
        text.set_stroke(0xFF00_0000, 2.0);
        assert_eq!(text.render_mode(), 1);
        text.set_fill(0xFFFF_0000);
        assert_eq!(text.render_mode(), 2);
        text.set_invisible();
        assert_eq!(text.render_mode(), 3);
        text.set_fill(0xFFFF_0000);
        assert_eq!(text.render_mode(), 0);
    }

    #[test]
    fn test_transform_moves_anchor_only() {
        let mut text = PointText::new(1.0, 1.0, "x");
        text.set_matrix(2.0, 0.0, 0.0, 2.0);
        let mut m = AffineTransform::identity();
        m.scale(3.0, 3.0).translate(1.0, 0.0);
        text.transform(&m);
        assert_eq!(text.anchor(), Point::new(4.0, 3.0));
        assert_eq!(text.matrix(), [2.0, 0.0, 0.0, 2.0]);
    }

    #[test]
    fn test_align_codes() {
        assert_eq!(TextAlign::JustifyAll.code(), 4);
        assert_eq!(TextAlign::Center.code(), 1);
    }
}
