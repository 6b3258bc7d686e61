//! Visitor dispatch over the fixed node kinds.
//!
//! A visitor overrides only the kinds it cares about; every callback
//! defaults to `Continue`. Returning `Break` stops the whole traversal.
//!
//! ```text
//! PreOrder:  visit(node) → children…
//! PostOrder: children…  → visit(node)
//! ```

use std::ops::ControlFlow;

use crate::document::Document;
use crate::group::{Group, Layer};
use crate::leaf::{Custom, Shape};
use crate::node::{Item, Node, TopLevel};
use crate::text::PointText;

/// When a node is visited relative to its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalOrder {
    #[default]
    PreOrder,
    PostOrder,
}

/// Read-only visitor. `'a` is the lifetime of the visited tree, so a
/// visitor may keep references to the nodes it sees.
pub trait Visitor<'a> {
    fn visit_document(&mut self, _document: &'a Document) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_layer(&mut self, _layer: &'a Layer) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_group(&mut self, _group: &'a Group) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_shape(&mut self, _shape: &'a Shape) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_text(&mut self, _text: &'a PointText) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_custom(&mut self, _custom: &'a Custom) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Visitor that may modify the nodes it sees.
pub trait VisitorMut {
    fn visit_document_mut(&mut self, _document: &mut Document) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_layer_mut(&mut self, _layer: &mut Layer) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_group_mut(&mut self, _group: &mut Group) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_shape_mut(&mut self, _shape: &mut Shape) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_text_mut(&mut self, _text: &mut PointText) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_custom_mut(&mut self, _custom: &mut Custom) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

// ==================== Read-only traversal ====================

fn walk<V: ?Sized>(
    order: TraversalOrder,
    visitor: &mut V,
    node: impl FnOnce(&mut V) -> ControlFlow<()>,
    children: impl FnOnce(&mut V) -> ControlFlow<()>,
) -> ControlFlow<()> {
    match order {
        TraversalOrder::PreOrder => {
            node(visitor)?;
            children(visitor)
        }
        TraversalOrder::PostOrder => {
            children(visitor)?;
            node(visitor)
        }
    }
}

fn walk_items<'a, V: Visitor<'a> + ?Sized>(
    items: &'a [Item],
    visitor: &mut V,
    order: TraversalOrder,
) -> ControlFlow<()> {
    items
        .iter()
        .try_for_each(|item| item.accept(visitor, order))
}

impl Document {
    pub fn accept<'a, V: Visitor<'a> + ?Sized>(
        &'a self,
        visitor: &mut V,
        order: TraversalOrder,
    ) -> ControlFlow<()> {
        walk(
            order,
            visitor,
            |v| v.visit_document(self),
            |v| {
                self.children()
                    .iter()
                    .try_for_each(|child| child.accept(v, order))
            },
        )
    }
}

impl Layer {
    pub fn accept<'a, V: Visitor<'a> + ?Sized>(
        &'a self,
        visitor: &mut V,
        order: TraversalOrder,
    ) -> ControlFlow<()> {
        walk(
            order,
            visitor,
            |v| v.visit_layer(self),
            |v| walk_items(self.children(), v, order),
        )
    }
}

impl Group {
    pub fn accept<'a, V: Visitor<'a> + ?Sized>(
        &'a self,
        visitor: &mut V,
        order: TraversalOrder,
    ) -> ControlFlow<()> {
        walk(
            order,
            visitor,
            |v| v.visit_group(self),
            |v| walk_items(self.children(), v, order),
        )
    }
}

impl Item {
    pub fn accept<'a, V: Visitor<'a> + ?Sized>(
        &'a self,
        visitor: &mut V,
        order: TraversalOrder,
    ) -> ControlFlow<()> {
        match self {
            Item::Group(group) => group.accept(visitor, order),
            Item::Shape(shape) => visitor.visit_shape(shape),
            Item::Text(text) => visitor.visit_text(text),
            Item::Custom(custom) => visitor.visit_custom(custom),
        }
    }
}

impl TopLevel {
    pub fn accept<'a, V: Visitor<'a> + ?Sized>(
        &'a self,
        visitor: &mut V,
        order: TraversalOrder,
    ) -> ControlFlow<()> {
        match self {
            TopLevel::Layer(layer) => layer.accept(visitor, order),
            TopLevel::Group(group) => group.accept(visitor, order),
        }
    }
}

impl Node {
    pub fn accept<'a, V: Visitor<'a> + ?Sized>(
        &'a self,
        visitor: &mut V,
        order: TraversalOrder,
    ) -> ControlFlow<()> {
        match self {
            Node::Document(document) => document.accept(visitor, order),
            Node::Layer(layer) => layer.accept(visitor, order),
            Node::Group(group) => group.accept(visitor, order),
            Node::Shape(shape) => visitor.visit_shape(shape),
            Node::Text(text) => visitor.visit_text(text),
            Node::Custom(custom) => visitor.visit_custom(custom),
        }
    }
}

// ==================== Mutable traversal ====================

fn walk_items_mut<V: VisitorMut + ?Sized>(
    items: &mut [Item],
    visitor: &mut V,
    order: TraversalOrder,
) -> ControlFlow<()> {
    items
        .iter_mut()
        .try_for_each(|item| item.accept_mut(visitor, order))
}

impl Document {
    pub fn accept_mut<V: VisitorMut + ?Sized>(
        &mut self,
        visitor: &mut V,
        order: TraversalOrder,
    ) -> ControlFlow<()> {
        if order == TraversalOrder::PreOrder {
            visitor.visit_document_mut(self)?;
        }
        for child in self.children_mut() {
            child.accept_mut(visitor, order)?;
        }
        if order == TraversalOrder::PostOrder {
            visitor.visit_document_mut(self)?;
        }
        ControlFlow::Continue(())
    }
}

impl Layer {
    pub fn accept_mut<V: VisitorMut + ?Sized>(
        &mut self,
        visitor: &mut V,
        order: TraversalOrder,
    ) -> ControlFlow<()> {
        if order == TraversalOrder::PreOrder {
            visitor.visit_layer_mut(self)?;
        }
        walk_items_mut(self.children_mut(), visitor, order)?;
        if order == TraversalOrder::PostOrder {
            visitor.visit_layer_mut(self)?;
        }
        ControlFlow::Continue(())
    }
}

impl Group {
    pub fn accept_mut<V: VisitorMut + ?Sized>(
        &mut self,
        visitor: &mut V,
        order: TraversalOrder,
    ) -> ControlFlow<()> {
        if order == TraversalOrder::PreOrder {
            visitor.visit_group_mut(self)?;
        }
        walk_items_mut(self.children_mut(), visitor, order)?;
        if order == TraversalOrder::PostOrder {
            visitor.visit_group_mut(self)?;
        }
        ControlFlow::Continue(())
    }
}

impl Item {
    pub fn accept_mut<V: VisitorMut + ?Sized>(
        &mut self,
        visitor: &mut V,
        order: TraversalOrder,
    ) -> ControlFlow<()> {
        match self {
            Item::Group(group) => group.accept_mut(visitor, order),
            Item::Shape(shape) => visitor.visit_shape_mut(shape),
            Item::Text(text) => visitor.visit_text_mut(text),
            Item::Custom(custom) => visitor.visit_custom_mut(custom),
        }
    }
}

impl TopLevel {
    pub fn accept_mut<V: VisitorMut + ?Sized>(
        &mut self,
        visitor: &mut V,
        order: TraversalOrder,
    ) -> ControlFlow<()> {
        match self {
            TopLevel::Layer(layer) => layer.accept_mut(visitor, order),
            TopLevel::Group(group) => group.accept_mut(visitor, order),
        }
    }
}

impl Node {
    pub fn accept_mut<V: VisitorMut + ?Sized>(
        &mut self,
        visitor: &mut V,
        order: TraversalOrder,
    ) -> ControlFlow<()> {
        match self {
            Node::Document(document) => document.accept_mut(visitor, order),
            Node::Layer(layer) => layer.accept_mut(visitor, order),
            Node::Group(group) => group.accept_mut(visitor, order),
            Node::Shape(shape) => visitor.visit_shape_mut(shape),
            Node::Text(text) => visitor.visit_text_mut(text),
            Node::Custom(custom) => visitor.visit_custom_mut(custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Component, NodeKind};
    use bezkit_path::shapes;

    #[derive(Default)]
    struct Recorder {
        kinds: Vec<NodeKind>,
        stop_at: Option<NodeKind>,
    }

    impl Recorder {
        fn record(&mut self, kind: NodeKind) -> ControlFlow<()> {
            self.kinds.push(kind);
            if self.stop_at == Some(kind) {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        }
    }

    impl<'a> Visitor<'a> for Recorder {
        fn visit_document(&mut self, _: &'a Document) -> ControlFlow<()> {
            self.record(NodeKind::Document)
        }
        fn visit_layer(&mut self, _: &'a Layer) -> ControlFlow<()> {
            self.record(NodeKind::Layer)
        }
        fn visit_group(&mut self, _: &'a Group) -> ControlFlow<()> {
            self.record(NodeKind::Group)
        }
        fn visit_shape(&mut self, _: &'a Shape) -> ControlFlow<()> {
            self.record(NodeKind::Shape)
        }
        fn visit_text(&mut self, _: &'a PointText) -> ControlFlow<()> {
            self.record(NodeKind::Text)
        }
        fn visit_custom(&mut self, _: &'a Custom) -> ControlFlow<()> {
            self.record(NodeKind::Custom)
        }
    }

    fn sample() -> Document {
        let mut group = Group::new();
        group.push(Shape::new(shapes::rectangle(0.0, 0.0, 1.0, 1.0)));
        group.push(PointText::new(0.0, 0.0, "t"));
        let mut layer = Layer::new("L");
        layer.push(group);
        layer.push(Custom::new("k", "v"));
        let mut doc = Document::new();
        doc.push_layer(layer);
        doc
    }

    #[test]
    fn test_pre_order() {
        let doc = sample();
        let mut recorder = Recorder::default();
        assert!(doc.accept(&mut recorder, TraversalOrder::PreOrder).is_continue());
        assert_eq!(
            recorder.kinds,
            vec![
                NodeKind::Document,
                NodeKind::Layer,
                NodeKind::Group,
                NodeKind::Shape,
                NodeKind::Text,
                NodeKind::Custom,
            ]
        );
    }

    #[test]
    fn test_post_order() {
        let doc = sample();
        let mut recorder = Recorder::default();
        let _ = doc.accept(&mut recorder, TraversalOrder::PostOrder);
        assert_eq!(
            recorder.kinds,
            vec![
                NodeKind::Shape,
                NodeKind::Text,
                NodeKind::Group,
                NodeKind::Custom,
                NodeKind::Layer,
                NodeKind::Document,
            ]
        );
    }

    #[test]
    fn test_break_stops_traversal() {
        let doc = sample();
        let mut recorder = Recorder {
            stop_at: Some(NodeKind::Shape),
            ..Recorder::default()
        };
        assert!(doc.accept(&mut recorder, TraversalOrder::PreOrder).is_break());
        assert_eq!(recorder.kinds.last(), Some(&NodeKind::Shape));
        assert_eq!(recorder.kinds.len(), 4);
    }

    struct Hider;

    impl VisitorMut for Hider {
        fn visit_text_mut(&mut self, text: &mut PointText) -> ControlFlow<()> {
            text.set_visible(false);
            ControlFlow::Continue(())
        }
    }

    #[test]
    fn test_mutable_visitor() {
        let mut doc = sample();
        let _ = doc.accept_mut(&mut Hider, TraversalOrder::PostOrder);
        let TopLevel::Layer(layer) = &doc.children()[0] else {
            panic!("expected layer");
        };
        let Item::Group(group) = &layer.children()[0] else {
            panic!("expected group");
        };
        assert!(group.children()[0].is_visible());
        assert!(!group.children()[1].is_visible());
    }

    #[test]
    fn test_node_accept_on_leaf() {
        let node = Node::from(Custom::new("a", "b"));
        let mut recorder = Recorder::default();
        let _ = node.accept(&mut recorder, TraversalOrder::PreOrder);
        assert_eq!(recorder.kinds, vec![NodeKind::Custom]);
    }
}
