//! Canonical visitors.

use std::ops::ControlFlow;

use bezkit_geom::Bounds;
use tracing::trace;

use crate::document::Document;
use crate::group::{Group, Layer};
use crate::leaf::{Custom, Shape};
use crate::node::{Component, Node, NodeId, NodeRef};
use crate::text::PointText;
use crate::visitor::{TraversalOrder, Visitor, VisitorMut};

// ==================== BoundsAggregator ====================

/// Union of the bounding boxes of every visited shape.
///
/// The union is order independent, so any traversal order gives the same
/// result.
#[derive(Debug, Clone, Default)]
pub struct BoundsAggregator {
    bounds: Option<Bounds>,
    shapes: usize,
}

impl BoundsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` until a shape has been visited.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn shape_count(&self) -> usize {
        self.shapes
    }
}

impl<'a> Visitor<'a> for BoundsAggregator {
    fn visit_shape(&mut self, shape: &'a Shape) -> ControlFlow<()> {
        let b = shape.bounding_box();
        self.bounds = Some(match self.bounds {
            Some(acc) => acc.union(&b),
            None => b,
        });
        self.shapes += 1;
        ControlFlow::Continue(())
    }
}

// ==================== IdLookup ====================

/// Finds the first node with a given ID and stops the traversal there.
#[derive(Debug, Clone)]
pub struct IdLookup<'a> {
    target: NodeId,
    found: Option<NodeRef<'a>>,
}

impl<'a> IdLookup<'a> {
    pub fn new(target: NodeId) -> Self {
        Self {
            target,
            found: None,
        }
    }

    pub fn found(&self) -> Option<NodeRef<'a>> {
        self.found
    }

    fn check(&mut self, node: NodeRef<'a>) -> ControlFlow<()> {
        if node.id() == self.target {
            trace!(id = %self.target, kind = %node.kind(), "id lookup hit");
            self.found = Some(node);
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

impl<'a> Visitor<'a> for IdLookup<'a> {
    fn visit_document(&mut self, document: &'a Document) -> ControlFlow<()> {
        self.check(NodeRef::Document(document))
    }

    fn visit_layer(&mut self, layer: &'a Layer) -> ControlFlow<()> {
        self.check(NodeRef::Layer(layer))
    }

    fn visit_group(&mut self, group: &'a Group) -> ControlFlow<()> {
        self.check(NodeRef::Group(group))
    }

    fn visit_shape(&mut self, shape: &'a Shape) -> ControlFlow<()> {
        self.check(NodeRef::Shape(shape))
    }

    fn visit_text(&mut self, text: &'a PointText) -> ControlFlow<()> {
        self.check(NodeRef::Text(text))
    }

    fn visit_custom(&mut self, custom: &'a Custom) -> ControlFlow<()> {
        self.check(NodeRef::Custom(custom))
    }
}

impl Node {
    /// First node with `id` in pre-order, this node included.
    pub fn find_by_id(&self, id: NodeId) -> Option<NodeRef<'_>> {
        let mut lookup = IdLookup::new(id);
        let _ = self.accept(&mut lookup, TraversalOrder::PreOrder);
        lookup.found()
    }
}

// ==================== ShapeAttributeVisitor ====================

/// Applies paint attributes to every visited shape. Attributes left unset
/// are not touched.
#[derive(Debug, Clone, Default)]
pub struct ShapeAttributeVisitor {
    fill: Option<u32>,
    stroke: Option<u32>,
    weight: Option<f64>,
    skip_locked: bool,
    applied: usize,
}

impl ShapeAttributeVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filled(fill: u32) -> Self {
        Self::new().with_fill(fill)
    }

    pub fn stroked(stroke: u32, weight: f64) -> Self {
        Self::new().with_stroke(stroke).with_weight(weight)
    }

    pub fn filled_stroked(fill: u32, stroke: u32, weight: f64) -> Self {
        Self::stroked(stroke, weight).with_fill(fill)
    }

    pub fn with_fill(mut self, fill: u32) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_stroke(mut self, stroke: u32) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Leave locked shapes unchanged.
    pub fn skip_locked(mut self) -> Self {
        self.skip_locked = true;
        self
    }

    /// Number of shapes modified so far.
    pub fn applied(&self) -> usize {
        self.applied
    }
}

impl VisitorMut for ShapeAttributeVisitor {
    fn visit_shape_mut(&mut self, shape: &mut Shape) -> ControlFlow<()> {
        if self.skip_locked && shape.is_locked() {
            return ControlFlow::Continue(());
        }
        let path = shape.path_mut();
        if let Some(fill) = self.fill {
            path.set_fill_color(fill);
        }
        if let Some(stroke) = self.stroke {
            path.set_stroke_color(stroke);
        }
        if let Some(weight) = self.weight {
            path.set_weight(weight);
        }
        self.applied += 1;
        ControlFlow::Continue(())
    }
}
