//! The document root.

use bezkit_common::{OptionExt, Result};
use bezkit_geom::{AffineTransform, Bounds};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::group::{Group, Layer};
use crate::node::{
    rejected, remove_from_items, Component, Item, Node, NodeId, NodeKind, NodeMeta, NodeMut,
    NodeRef, TopLevel,
};
use crate::palette::Palette;
use crate::visitor::TraversalOrder;
use crate::visitors::{BoundsAggregator, IdLookup};

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_WIDTH: i32 = 612;
pub const DEFAULT_HEIGHT: i32 = 792;

/// Integer page box written to the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn top(&self) -> i32 {
        self.y + self.height
    }

    /// Integer center, truncated toward zero.
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// Header metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentInfo {
    pub title: String,
    pub creator: String,
    pub org: String,
    pub width: i32,
    pub height: i32,
    pub bounding_box: BoundingBox,
}

impl DocumentInfo {
    /// Info for a page of the given size with a matching bounding box.
    pub fn new(title: impl Into<String>, width: i32, height: i32) -> Self {
        Self {
            title: title.into(),
            creator: String::new(),
            org: String::new(),
            width,
            height,
            bounding_box: BoundingBox::new(0, 0, width, height),
        }
    }

    pub fn with_creator(mut self, creator: impl Into<String>, org: impl Into<String>) -> Self {
        self.creator = creator.into();
        self.org = org.into();
        self
    }

    pub fn with_bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = bounding_box;
        self
    }
}

impl Default for DocumentInfo {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE, DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

// ==================== Document ====================

/// Root of a document tree.
///
/// Holds layers and groups directly. Leaves added here land in a default
/// layer created on first use.
#[derive(Debug)]
pub struct Document {
    meta: NodeMeta,
    info: DocumentInfo,
    palette: Palette,
    children: Vec<TopLevel>,
    default_layer: Option<NodeId>,
}

impl Document {
    pub fn new() -> Self {
        Self::with_info(DocumentInfo::default())
    }

    pub fn with_info(info: DocumentInfo) -> Self {
        Self {
            meta: NodeMeta::new(),
            info,
            palette: Palette::new(),
            children: Vec::new(),
            default_layer: None,
        }
    }

    pub fn info(&self) -> &DocumentInfo {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut DocumentInfo {
        &mut self.info
    }

    pub fn title(&self) -> &str {
        &self.info.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.info.title = title.into();
    }

    pub fn width(&self) -> i32 {
        self.info.width
    }

    pub fn height(&self) -> i32 {
        self.info.height
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.info.bounding_box
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut Palette {
        &mut self.palette
    }

    pub fn children(&self) -> &[TopLevel] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [TopLevel] {
        &mut self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.children.iter().filter_map(|child| match child {
            TopLevel::Layer(layer) => Some(layer),
            TopLevel::Group(_) => None,
        })
    }

    /// The layer that receives leaves added at the root, if one exists.
    pub fn default_layer(&self) -> Option<&Layer> {
        let id = self.default_layer?;
        self.layers().find(|layer| layer.id() == id)
    }

    // ==================== Insertion ====================

    pub fn push_layer(&mut self, layer: Layer) -> NodeId {
        let id = layer.id();
        debug!(id = %id, name = layer.name(), "add layer");
        self.children.push(TopLevel::Layer(layer));
        id
    }

    pub fn push_group(&mut self, group: Group) -> NodeId {
        let id = group.id();
        debug!(id = %id, "add group");
        self.children.push(TopLevel::Group(group));
        id
    }

    /// Add a group or leaf through the default layer's rules: groups stay
    /// at the root, leaves go into the default layer.
    pub fn push_item(&mut self, item: impl Into<Item>) -> NodeId {
        match item.into() {
            Item::Group(group) => self.push_group(group),
            leaf => {
                let id = leaf.id();
                self.default_items().push(leaf);
                id
            }
        }
    }

    /// Dynamic insertion. Returns the ID of the inserted node.
    ///
    /// Fails with `StructuralViolation` for a nested document.
    pub fn add(&mut self, child: Node) -> Result<NodeId> {
        match child {
            Node::Document(_) => Err(rejected(NodeKind::Document, NodeKind::Document)),
            Node::Layer(layer) => Ok(self.push_layer(layer)),
            other => {
                let kind = other.kind();
                let item =
                    Item::try_from(other).map_err(|_| rejected(kind, NodeKind::Document))?;
                Ok(self.push_item(item))
            }
        }
    }

    /// Insert `child` into the layer or group with ID `parent`, or at the
    /// root when `parent` is the document itself.
    pub fn add_to(&mut self, parent: NodeId, child: Node) -> Result<NodeId> {
        if parent == self.id() {
            return self.add(child);
        }
        let id = child.id();
        let kind = child.kind();
        let target = self
            .find_by_id_mut(parent)
            .ok_or_structural(format!("no node {} to add {} to", parent, kind))?;
        match target {
            NodeMut::Layer(layer) => layer.add(child)?,
            NodeMut::Group(group) => group.add(child)?,
            NodeMut::Shape(_) => return Err(rejected(kind, NodeKind::Shape)),
            NodeMut::Text(_) => return Err(rejected(kind, NodeKind::Text)),
            NodeMut::Custom(_) => return Err(rejected(kind, NodeKind::Custom)),
        }
        debug!(id = %id, parent = %parent, "add to container");
        Ok(id)
    }

    fn default_items(&mut self) -> &mut Vec<Item> {
        let existing = self
            .default_layer
            .and_then(|id| self.children.iter().position(|child| child.id() == id));
        let pos = match existing {
            Some(pos) => pos,
            None => {
                let layer = Layer::unnamed();
                debug!(id = %layer.id(), name = layer.name(), "create default layer");
                self.default_layer = Some(layer.id());
                self.children.push(TopLevel::Layer(layer));
                self.children.len() - 1
            }
        };
        self.children[pos].items_mut()
    }

    /// Detach the node with `id` from anywhere in the tree.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        if let Some(pos) = self.children.iter().position(|child| child.id() == id) {
            if self.default_layer == Some(id) {
                self.default_layer = None;
            }
            debug!(id = %id, "remove top-level node");
            return Some(self.children.remove(pos).into());
        }
        let removed = self
            .children
            .iter_mut()
            .find_map(|child| remove_from_items(child.items_mut(), id))?;
        debug!(id = %id, kind = %removed.kind(), "remove node");
        Some(removed.into())
    }

    // ==================== Queries ====================

    /// First node with `id` in pre-order, the document itself included.
    pub fn find_by_id(&self, id: NodeId) -> Option<NodeRef<'_>> {
        let mut lookup = IdLookup::new(id);
        let _ = self.accept(&mut lookup, TraversalOrder::PreOrder);
        lookup.found()
    }

    /// Mutable access to the node with `id` below the document.
    pub fn find_by_id_mut(&mut self, id: NodeId) -> Option<NodeMut<'_>> {
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Union of every shape's bounds, or `None` without shapes.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut aggregator = BoundsAggregator::new();
        let _ = self.accept(&mut aggregator, TraversalOrder::PreOrder);
        aggregator.bounds()
    }

    /// The y-flip between the top-left page origin and the output's
    /// bottom-left origin. It is its own inverse.
    pub fn flip_transform(&self) -> AffineTransform {
        let mut m = AffineTransform::identity();
        m.scale(1.0, -1.0).translate(0.0, self.info.height as f64);
        m
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Document {
    /// Deep copy with fresh IDs; the default layer stays the default.
    fn clone(&self) -> Self {
        let children = self.children.clone();
        let default_layer = self
            .default_layer
            .and_then(|id| self.children.iter().position(|child| child.id() == id))
            .map(|pos| children[pos].id());
        Self {
            meta: self.meta.clone(),
            info: self.info.clone(),
            palette: self.palette.clone(),
            children,
            default_layer,
        }
    }
}

impl Component for Document {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        &mut self.meta
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Document
    }

    fn transform(&mut self, matrix: &AffineTransform) {
        debug!(children = self.children.len(), "transform document");
        for child in self.children.iter_mut() {
            child.transform(matrix);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Custom, PointText, Shape};
    use bezkit_common::BezKitError;
    use bezkit_path::shapes;

    fn square(x: f64, y: f64) -> Shape {
        Shape::new(shapes::rectangle(x, y, x + 1.0, y + 1.0))
    }

    #[test]
    fn test_info_defaults() {
        let doc = Document::new();
        assert_eq!(doc.title(), "Untitled");
        assert_eq!(doc.width(), 612);
        assert_eq!(doc.height(), 792);
        assert_eq!(doc.bounding_box(), BoundingBox::new(0, 0, 612, 792));
        assert_eq!(doc.bounding_box().center(), (306, 396));
    }

    #[test]
    fn test_shape_at_root_goes_to_one_default_layer() {
        let mut doc = Document::new();
        let a = doc.add(Node::from(square(0.0, 0.0))).unwrap();
        let b = doc.add(Node::from(PointText::new(0.0, 0.0, "t"))).unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.layers().count(), 1);
        let layer = doc.default_layer().unwrap();
        assert_eq!(layer.len(), 2);
        assert_eq!(layer.children()[0].id(), a);
        assert_eq!(layer.children()[1].id(), b);
    }

    #[test]
    fn test_layers_and_groups_stay_at_root() {
        let mut doc = Document::new();
        doc.add(Node::from(Layer::new("one"))).unwrap();
        doc.add(Node::from(Group::new())).unwrap();
        assert_eq!(doc.len(), 2);
        assert!(doc.default_layer().is_none());
        let err = doc.add(Node::from(Document::new())).unwrap_err();
        assert!(matches!(err, BezKitError::StructuralViolation(_)));
    }

    #[test]
    fn test_add_to_container() {
        let mut doc = Document::new();
        let layer_id = doc.push_layer(Layer::new("L"));
        let group_id = doc.add_to(layer_id, Node::from(Group::new())).unwrap();
        let shape_id = doc.add_to(group_id, Node::from(square(0.0, 0.0))).unwrap();
        assert_eq!(doc.find_by_id(shape_id).unwrap().kind(), NodeKind::Shape);

        let err = doc.add_to(shape_id, Node::from(square(1.0, 1.0))).unwrap_err();
        assert!(matches!(err, BezKitError::StructuralViolation(_)));
        let err = doc.add_to(group_id, Node::from(Layer::new("x"))).unwrap_err();
        assert!(matches!(err, BezKitError::StructuralViolation(_)));
        let err = doc.add_to(NodeId::new(), Node::from(Group::new())).unwrap_err();
        assert!(matches!(err, BezKitError::StructuralViolation(_)));

        let root = doc.id();
        doc.add_to(root, Node::from(Group::new())).unwrap();
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_remove_nested_and_top_level() {
        let mut doc = Document::new();
        let mut group = Group::new();
        let inner = square(0.0, 0.0);
        let inner_id = inner.id();
        group.push(inner);
        let mut layer = Layer::new("L");
        layer.push(group);
        let layer_id = doc.push_layer(layer);

        let removed = doc.remove(inner_id).unwrap();
        assert_eq!(removed.kind(), NodeKind::Shape);
        assert!(doc.find_by_id(inner_id).is_none());
        assert!(doc.remove(inner_id).is_none());

        assert!(matches!(doc.remove(layer_id), Some(Node::Layer(_))));
        assert!(doc.is_empty());
    }

    #[test]
    fn test_removed_default_layer_is_recreated() {
        let mut doc = Document::new();
        doc.push_item(Custom::new("k", "v"));
        let first = doc.default_layer().unwrap().id();
        doc.remove(first);
        doc.push_item(Custom::new("k", "v"));
        let second = doc.default_layer().unwrap().id();
        assert_ne!(first, second);
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_find_by_id() {
        let mut doc = Document::new();
        let id = doc.push_item(square(2.0, 2.0));
        let found = doc.find_by_id(id).unwrap();
        assert_eq!(found.kind(), NodeKind::Shape);
        assert_eq!(doc.find_by_id(doc.id()).unwrap().kind(), NodeKind::Document);
        assert!(doc.find_by_id(NodeId::new()).is_none());
    }

    #[test]
    fn test_find_by_id_mut() {
        let mut doc = Document::new();
        let id = doc.push_item(square(0.0, 0.0));
        match doc.find_by_id_mut(id) {
            Some(NodeMut::Shape(shape)) => shape.set_locked(true),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(doc.find_by_id(id), Some(NodeRef::Shape(s)) if s.is_locked()));
    }

    #[test]
    fn test_flip_is_self_inverse() {
        let mut doc = Document::new();
        doc.push_item(square(10.0, 20.0));
        let before = doc.bounds().unwrap();
        let flip = doc.flip_transform();
        doc.transform(&flip);
        let flipped = doc.bounds().unwrap();
        assert_eq!(flipped.min_y, 792.0 - 21.0);
        doc.transform(&flip);
        assert_eq!(doc.bounds().unwrap(), before);
    }

    #[test]
    fn test_clone_keeps_default_layer() {
        let mut doc = Document::new();
        doc.push_layer(Layer::new("first"));
        doc.push_item(square(0.0, 0.0));
        let copy = doc.clone();
        assert_ne!(copy.id(), doc.id());
        let layer = copy.default_layer().unwrap();
        assert_eq!(layer.len(), 1);
        assert_ne!(layer.id(), doc.default_layer().unwrap().id());
    }

    #[test]
    fn test_info_serde_defaults() {
        let info: DocumentInfo = serde_json::from_str(r#"{"title":"Poster"}"#).unwrap();
        assert_eq!(info.title, "Poster");
        assert_eq!(info.width, 612);
        assert_eq!(info.bounding_box.height, 792);
    }
}
