//! Tree serializer.
//!
//! ```text
//! header ─ state ─ palette ─ [flip] body [flip] ─ trailer ─ flush ─ close
//! ```
//!
//! Nodes that are hidden or locked are bracketed by the matching toggle
//! and its reset, so siblings written afterwards see the default state.
//! Layers carry their own visibility and lock in the layer line instead.

use std::ops::{Deref, DerefMut};

use bezkit_common::Result;
use bezkit_doc::{
    Component, Custom, Document, DocumentInfo, Group, Item, Layer, Node, NodeRef, Palette,
    PointText, Shape, TopLevel,
};
use bezkit_geom::AffineTransform;
use bezkit_path::{color, Path};
use tracing::{debug, trace};

use crate::config::ExportConfig;
use crate::format::four_places;
use crate::sink::Sink;
use crate::writer::{escape_string, paint_op, DirectiveWriter, Header};

// ==================== Transform guard ====================

/// Applies a self-inverse matrix on creation and again on drop, so the
/// node is restored even when writing fails or panics.
struct Transformed<'a, C: Component + ?Sized> {
    node: &'a mut C,
    matrix: AffineTransform,
}

impl<'a, C: Component + ?Sized> Transformed<'a, C> {
    fn new(node: &'a mut C, matrix: AffineTransform) -> Self {
        node.transform(&matrix);
        Self { node, matrix }
    }
}

impl<C: Component + ?Sized> Deref for Transformed<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.node
    }
}

impl<C: Component + ?Sized> DerefMut for Transformed<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.node
    }
}

impl<C: Component + ?Sized> Drop for Transformed<'_, C> {
    fn drop(&mut self) {
        self.node.transform(&self.matrix);
    }
}

// ==================== Exporter ====================

/// Writes documents, nodes and paths to a sink.
#[derive(Debug)]
pub struct Exporter<S: Sink> {
    writer: DirectiveWriter<S>,
    config: ExportConfig,
}

impl<S: Sink> Exporter<S> {
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, ExportConfig::default())
    }

    pub fn with_config(sink: S, config: ExportConfig) -> Self {
        Self {
            writer: DirectiveWriter::new(sink),
            config,
        }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Direct access for callers mixing tree output with raw directives.
    pub fn writer(&mut self) -> &mut DirectiveWriter<S> {
        &mut self.writer
    }

    pub fn into_sink(self) -> S {
        self.writer.into_sink()
    }

    // ==================== Whole files ====================

    /// Write a complete file: header, palette, body and trailer, then
    /// flush and close the sink.
    ///
    /// With the display transform enabled the document is flipped for the
    /// body and flipped back afterwards, even when the body fails.
    pub fn write_document(&mut self, document: &mut Document) -> Result<()> {
        debug!(
            title = document.title(),
            children = document.len(),
            flip = self.config.apply_display_transform,
            "write document"
        );
        self.write_header(document.info(), document.palette())?;
        if self.config.apply_display_transform {
            let flip = document.flip_transform();
            let flipped = Transformed::new(document, flip);
            self.write_body(&flipped)?;
        } else {
            self.write_body(document)?;
        }
        self.write_trailer()
    }

    /// Write a complete file holding only the given paths.
    pub fn write_paths(&mut self, info: &DocumentInfo, paths: &[Path]) -> Result<()> {
        debug!(paths = paths.len(), "write paths");
        self.write_header(info, &Palette::new())?;
        for path in paths {
            self.write_path(path)?;
        }
        self.write_trailer()
    }

    /// Header, optional graphics state and palette.
    pub fn write_header(&mut self, info: &DocumentInfo, palette: &Palette) -> Result<()> {
        let bbox = info.bounding_box;
        self.writer.header(&Header {
            title: &info.title,
            creator: &info.creator,
            org: &info.org,
            width: info.width,
            height: info.height,
            bounding_box: (bbox.x, bbox.y, bbox.width, bbox.height),
            created: self.config.timestamp(),
        })?;
        if self.config.write_state {
            self.writer.state()?;
        }
        self.write_palette(palette)
    }

    pub fn write_palette(&mut self, palette: &Palette) -> Result<()> {
        trace!(colors = palette.len(), "palette");
        self.writer.begin_palette()?;
        if palette.is_empty() && self.config.default_palette {
            let mut defaults = Palette::new();
            defaults.add_black_white_gray();
            for argb in defaults.colors() {
                self.writer.palette_rgb_cell(*argb)?;
            }
        } else {
            for argb in palette.colors() {
                self.writer.palette_rgb_cell(*argb)?;
            }
        }
        self.writer.end_palette()
    }

    /// Every direct child of the document, in order, without transforms.
    pub fn write_body(&mut self, document: &Document) -> Result<()> {
        document
            .children()
            .iter()
            .try_for_each(|child| self.write_top_level(child))
    }

    /// Trailer, then flush and close the sink.
    pub fn write_trailer(&mut self) -> Result<()> {
        self.writer.trailer()?;
        self.writer.flush()?;
        self.writer.close()
    }

    /// Write each node with `matrix` applied, restoring it afterwards.
    /// The matrix is applied twice, so it must be its own inverse, like
    /// [`Document::flip_transform`].
    pub fn write_nodes_transformed(
        &mut self,
        nodes: &mut [Node],
        matrix: &AffineTransform,
    ) -> Result<()> {
        for node in nodes.iter_mut() {
            let transformed = Transformed::new(node, matrix.clone());
            self.write_node(transformed.as_node_ref())?;
        }
        Ok(())
    }

    // ==================== Nodes ====================

    /// Write any node. A document writes its body only.
    pub fn write_node(&mut self, node: NodeRef<'_>) -> Result<()> {
        match node {
            NodeRef::Document(document) => self.write_body(document),
            NodeRef::Layer(layer) => self.write_layer(layer),
            NodeRef::Group(group) => self.write_group(group),
            NodeRef::Shape(shape) => self.write_shape(shape),
            NodeRef::Text(text) => self.write_text(text),
            NodeRef::Custom(custom) => self.write_custom(custom),
        }
    }

    fn write_top_level(&mut self, child: &TopLevel) -> Result<()> {
        match child {
            TopLevel::Layer(layer) => self.write_layer(layer),
            TopLevel::Group(group) => self.write_group(group),
        }
    }

    pub fn write_item(&mut self, item: &Item) -> Result<()> {
        match item {
            Item::Group(group) => self.write_group(group),
            Item::Shape(shape) => self.write_shape(shape),
            Item::Text(text) => self.write_text(text),
            Item::Custom(custom) => self.write_custom(custom),
        }
    }

    pub fn write_layer(&mut self, layer: &Layer) -> Result<()> {
        trace!(id = %layer.id(), name = layer.name(), "layer");
        self.writer.begin_layer(
            layer.name(),
            layer.color_index(),
            layer.is_visible(),
            layer.is_locked(),
        )?;
        for item in layer.children() {
            self.write_item(item)?;
        }
        self.writer.end_layer()
    }

    pub fn write_group(&mut self, group: &Group) -> Result<()> {
        trace!(id = %group.id(), children = group.len(), "group");
        self.bracketed(group, |exporter| {
            exporter.writer.begin_group()?;
            for item in group.children() {
                exporter.write_item(item)?;
            }
            exporter.writer.end_group()
        })
    }

    pub fn write_shape(&mut self, shape: &Shape) -> Result<()> {
        self.bracketed(shape, |exporter| exporter.write_path(shape.path()))
    }

    pub fn write_custom(&mut self, custom: &Custom) -> Result<()> {
        self.bracketed(custom, |exporter| {
            exporter.writer.custom(custom.tag(), custom.value())
        })
    }

    pub fn write_text(&mut self, text: &PointText) -> Result<()> {
        self.bracketed(text, |exporter| exporter.text_body(text))
    }

    fn text_body(&mut self, text: &PointText) -> Result<()> {
        let w = &mut self.writer;
        if let Some(fill) = text.fill() {
            w.fill_rgb(fill)?;
        }
        if let Some(stroke) = text.stroke() {
            w.stroke_rgb(stroke)?;
            w.weight(text.weight())?;
        }
        let m = text.text_matrix();
        w.line("u")?;
        w.line("0 To")?;
        w.line(&format!(
            "{} {} {} {} {} {} {} Tp",
            four_places(m[0]),
            four_places(m[1]),
            four_places(m[2]),
            four_places(m[3]),
            four_places(m[4]),
            four_places(m[5]),
            four_places(text.start_offset())
        ))?;
        w.line("TP")?;
        w.line(&format!("{} Tr", text.render_mode()))?;
        w.line(&format!("/_{} {} Tf", text.font(), four_places(text.size())))?;
        w.line(&format!("{} Ta", text.align().code()))?;
        w.line(&format!(
            "{} {} Tl",
            four_places(text.leading()),
            four_places(text.paragraph_leading())
        ))?;
        w.line(&format!("({}) Tx 1 0 Tk", escape_string(text.text())))?;
        w.line("TO")?;
        w.line("U")
    }

    /// Hide and lock toggles around `body` when the node differs from the
    /// default visible, unlocked state.
    fn bracketed<C: Component + ?Sized>(
        &mut self,
        node: &C,
        body: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<()> {
        let hidden = !node.is_visible();
        let locked = node.is_locked();
        if hidden {
            self.writer.set_visible(false)?;
        }
        if locked {
            self.writer.set_locked(true)?;
        }
        body(self)?;
        if hidden {
            self.writer.set_visible(true)?;
        }
        if locked {
            self.writer.set_locked(false)?;
        }
        Ok(())
    }

    // ==================== Paths ====================

    /// Paint attributes, geometry and paint operator of one path.
    pub fn write_path(&mut self, path: &Path) -> Result<()> {
        let transparency = self.config.use_transparency;
        let mut opacity_set = false;

        if path.has_fill() {
            let fill = path.fill_color();
            if transparency && color::alpha(fill) < u8::MAX {
                self.writer.transparency(color::alpha_unit(fill))?;
                opacity_set = true;
            }
            self.writer.fill_rgb(fill)?;
        }
        if path.has_stroke() {
            let stroke = path.stroke_color();
            if transparency && !opacity_set && color::alpha(stroke) < u8::MAX {
                self.writer.transparency(color::alpha_unit(stroke))?;
                opacity_set = true;
            }
            self.writer.stroke_rgb(stroke)?;
            self.writer.weight(path.weight())?;
        }

        let op = paint_op(path.has_fill(), path.has_stroke(), path.is_closed());
        self.write_path_with_op(path, op)?;

        if opacity_set {
            self.writer.reset_transparency()?;
        }
        Ok(())
    }

    /// Geometry and an explicit paint operator only. Paint attributes are
    /// whatever the output's current state holds.
    pub fn write_path_with_op(&mut self, path: &Path, op: char) -> Result<()> {
        path.emit(&mut self.writer)?;
        self.writer.paint(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::StringSink;
    use bezkit_path::shapes;

    fn exporter() -> Exporter<StringSink> {
        Exporter::new(StringSink::new())
    }

    fn lines(exporter: Exporter<StringSink>) -> Vec<String> {
        exporter
            .into_sink()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn triangle() -> Path {
        shapes::triangle(0.0, 0.0, 10.0, 0.0, 0.0, 10.0)
    }

    #[test]
    fn test_shape_output() {
        let mut e = exporter();
        e.write_shape(&Shape::new(triangle())).unwrap();
        assert_eq!(
            lines(e),
            vec![
                "1.0000 1.0000 1.0000 Xa",
                "0.0000 0.0000 0.0000 XA",
                "1.0000 w",
                "0.0000 0.0000 m",
                "10.0000 0.0000 L",
                "0.0000 10.0000 L",
                "0.0000 0.0000 L",
                "b",
            ]
        );
    }

    #[test]
    fn test_hidden_locked_bracket() {
        let mut path = shapes::line(0.0, 0.0, 1.0, 1.0);
        path.set_no_fill();
        let mut shape = Shape::new(path);
        shape.set_visible(false);
        shape.set_locked(true);
        let mut e = exporter();
        e.write_shape(&shape).unwrap();
        let out = lines(e);
        assert_eq!(out.first().map(String::as_str), Some("1 Xw"));
        assert_eq!(out[1], "1 A");
        assert_eq!(out[out.len() - 3], "S");
        assert_eq!(out[out.len() - 2], "0 Xw");
        assert_eq!(out[out.len() - 1], "0 A");
    }

    #[test]
    fn test_transparency_written_once() {
        let mut path = triangle();
        path.set_fill_opacity(128).set_stroke_opacity(64);
        let config = ExportConfig::default().with_transparency(true);
        let mut e = Exporter::with_config(StringSink::new(), config);
        e.write_path(&path).unwrap();
        let out = lines(e);
        assert_eq!(out[0], "0 0.5020 0 0 0 Xy");
        assert_eq!(out.iter().filter(|l| l.ends_with(" Xy")).count(), 2);
        assert_eq!(out.last().map(String::as_str), Some("0 1 0 0 0 Xy"));
    }

    #[test]
    fn test_transparency_off_by_default() {
        let mut path = triangle();
        path.set_fill_opacity(0);
        let mut e = exporter();
        e.write_path(&path).unwrap();
        assert!(lines(e).iter().all(|l| !l.ends_with("Xy")));
    }

    #[test]
    fn test_group_and_custom() {
        let mut group = Group::new();
        group.push(Custom::new("id", "42"));
        group.set_locked(true);
        let mut e = exporter();
        e.write_group(&group).unwrap();
        assert_eq!(lines(e), vec!["1 A", "u", "/id (42) XT", "U", "0 A"]);
    }

    #[test]
    fn test_text_output() {
        let mut text = PointText::new(5.0, 6.0, "Hi");
        text.set_fill(color::BLACK);
        let mut e = exporter();
        e.write_text(&text).unwrap();
        assert_eq!(
            lines(e),
            vec![
                "0.0000 0.0000 0.0000 Xa",
                "u",
                "0 To",
                "1.0000 0.0000 0.0000 1.0000 5.0000 6.0000 0.0000 Tp",
                "TP",
                "0 Tr",
                "/_Helvetica 12.0000 Tf",
                "0 Ta",
                "15.0000 15.0000 Tl",
                "(Hi) Tx 1 0 Tk",
                "TO",
                "U",
            ]
        );
    }

    #[test]
    fn test_text_stroke_only() {
        let mut text = PointText::new(0.0, 0.0, "x");
        text.set_stroke(color::BLACK, 0.5);
        let mut e = exporter();
        e.write_text(&text).unwrap();
        let out = lines(e);
        assert_eq!(out[0], "0.0000 0.0000 0.0000 XA");
        assert_eq!(out[1], "0.5000 w");
        assert!(out.contains(&"1 Tr".to_string()));
    }

    #[test]
    fn test_write_path_with_op() {
        let mut e = exporter();
        e.write_path_with_op(&shapes::line(0.0, 0.0, 2.0, 0.0), 'S')
            .unwrap();
        assert_eq!(lines(e), vec!["0.0000 0.0000 m", "2.0000 0.0000 L", "S"]);
    }

    #[test]
    fn test_write_nodes_transformed_restores() {
        let doc = Document::new();
        let flip = doc.flip_transform();
        let mut nodes = vec![Node::from(Shape::new(triangle()))];
        let mut e = exporter();
        e.write_nodes_transformed(&mut nodes, &flip).unwrap();
        let out = lines(e);
        assert!(out.contains(&"0.0000 792.0000 m".to_string()));
        let Node::Shape(shape) = &nodes[0] else {
            panic!("expected shape");
        };
        assert_eq!(shape.path().start().y, 0.0);
    }

    struct FailingSink {
        remaining: usize,
    }

    impl Sink for FailingSink {
        fn emit(&mut self, _line: &str) -> Result<()> {
            if self.remaining == 0 {
                return Err(bezkit_common::BezKitError::SinkClosed("full".to_string()));
            }
            self.remaining -= 1;
            Ok(())
        }
        fn flush(&mut self) -> Result<()> {
            Ok(())
        }
        fn close(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_flip_undone_when_body_fails() {
        let mut doc = Document::new();
        doc.push_item(Shape::new(shapes::rectangle(10.0, 10.0, 20.0, 30.0)));
        let before = doc.bounds();

        let mut probe = Exporter::new(StringSink::new());
        probe
            .write_header(doc.info(), doc.palette())
            .unwrap();
        let header_lines = probe.into_sink().lines().count();

        let mut e = Exporter::new(FailingSink {
            remaining: header_lines + 3,
        });
        assert!(e.write_document(&mut doc).is_err());
        assert_eq!(doc.bounds(), before);
    }
}
