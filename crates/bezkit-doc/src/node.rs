//! Node identity, the `Component` trait and the node sum types.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use bezkit_common::{BezKitError, Result};
use bezkit_geom::AffineTransform;
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::group::{Group, Layer};
use crate::leaf::{Custom, Shape};
use crate::text::PointText;

// ==================== Identity ====================

/// Process-unique node identifier, increasing in construction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocate the next ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State every node carries: ID, visibility and lock.
///
/// Cloning allocates a fresh ID, so a cloned subtree never shares IDs with
/// its source.
#[derive(Debug)]
pub struct NodeMeta {
    id: NodeId,
    visible: bool,
    locked: bool,
}

impl NodeMeta {
    pub fn new() -> Self {
        Self {
            id: NodeId::new(),
            visible: true,
            locked: false,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }
}

impl Default for NodeMeta {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for NodeMeta {
    fn clone(&self) -> Self {
        Self {
            id: NodeId::new(),
            visible: self.visible,
            locked: self.locked,
        }
    }
}

/// The fixed set of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Layer,
    Group,
    Shape,
    Text,
    Custom,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Document => "Document",
            NodeKind::Layer => "Layer",
            NodeKind::Group => "Group",
            NodeKind::Shape => "Shape",
            NodeKind::Text => "Text",
            NodeKind::Custom => "Custom",
        }
    }

    /// Shapes, text and custom objects never have children.
    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeKind::Shape | NodeKind::Text | NodeKind::Custom)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ==================== Component ====================

/// Behavior shared by every node kind.
pub trait Component {
    fn meta(&self) -> &NodeMeta;
    fn meta_mut(&mut self) -> &mut NodeMeta;
    fn kind(&self) -> NodeKind;

    /// Apply a matrix to this node and everything under it.
    fn transform(&mut self, matrix: &AffineTransform);

    fn id(&self) -> NodeId {
        self.meta().id
    }

    fn is_visible(&self) -> bool {
        self.meta().visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.meta_mut().visible = visible;
    }

    fn is_locked(&self) -> bool {
        self.meta().locked
    }

    fn set_locked(&mut self, locked: bool) {
        self.meta_mut().locked = locked;
    }
}

pub(crate) fn rejected(child: NodeKind, parent: NodeKind) -> BezKitError {
    if parent.is_leaf() {
        BezKitError::structural(format!(
            "{} is a leaf and cannot hold a {}",
            parent, child
        ))
    } else {
        BezKitError::structural(format!("a {} cannot be added to a {}", child, parent))
    }
}

// ==================== Sum types ====================

/// Content of a layer or group.
#[derive(Debug, Clone)]
pub enum Item {
    Group(Group),
    Shape(Shape),
    Text(PointText),
    Custom(Custom),
}

/// Direct child of a document.
#[derive(Debug, Clone)]
pub enum TopLevel {
    Layer(Layer),
    Group(Group),
}

/// Any node, for the dynamic insertion API.
#[derive(Debug, Clone)]
pub enum Node {
    Document(Box<Document>),
    Layer(Layer),
    Group(Group),
    Shape(Shape),
    Text(PointText),
    Custom(Custom),
}

/// Borrowed view of any node, as returned by lookups.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Document(&'a Document),
    Layer(&'a Layer),
    Group(&'a Group),
    Shape(&'a Shape),
    Text(&'a PointText),
    Custom(&'a Custom),
}

/// Mutable view of any node below the document.
#[derive(Debug)]
pub enum NodeMut<'a> {
    Layer(&'a mut Layer),
    Group(&'a mut Group),
    Shape(&'a mut Shape),
    Text(&'a mut PointText),
    Custom(&'a mut Custom),
}

macro_rules! dispatch {
    ($value:expr, $name:ident => $body:expr, [$($variant:ident),+]) => {
        match $value {
            $(Self::$variant($name) => $body,)+
        }
    };
}

impl Component for Item {
    fn meta(&self) -> &NodeMeta {
        dispatch!(self, n => n.meta(), [Group, Shape, Text, Custom])
    }
    fn meta_mut(&mut self) -> &mut NodeMeta {
        dispatch!(self, n => n.meta_mut(), [Group, Shape, Text, Custom])
    }
    fn kind(&self) -> NodeKind {
        dispatch!(self, n => n.kind(), [Group, Shape, Text, Custom])
    }
    fn transform(&mut self, matrix: &AffineTransform) {
        dispatch!(self, n => n.transform(matrix), [Group, Shape, Text, Custom])
    }
}

impl Component for TopLevel {
    fn meta(&self) -> &NodeMeta {
        dispatch!(self, n => n.meta(), [Layer, Group])
    }
    fn meta_mut(&mut self) -> &mut NodeMeta {
        dispatch!(self, n => n.meta_mut(), [Layer, Group])
    }
    fn kind(&self) -> NodeKind {
        dispatch!(self, n => n.kind(), [Layer, Group])
    }
    fn transform(&mut self, matrix: &AffineTransform) {
        dispatch!(self, n => n.transform(matrix), [Layer, Group])
    }
}

impl Component for Node {
    fn meta(&self) -> &NodeMeta {
        dispatch!(self, n => n.meta(), [Document, Layer, Group, Shape, Text, Custom])
    }
    fn meta_mut(&mut self) -> &mut NodeMeta {
        dispatch!(self, n => n.meta_mut(), [Document, Layer, Group, Shape, Text, Custom])
    }
    fn kind(&self) -> NodeKind {
        dispatch!(self, n => n.kind(), [Document, Layer, Group, Shape, Text, Custom])
    }
    fn transform(&mut self, matrix: &AffineTransform) {
        dispatch!(self, n => n.transform(matrix), [Document, Layer, Group, Shape, Text, Custom])
    }
}

impl Node {
    /// Insert a child, enforcing the nesting rules.
    ///
    /// Documents take layers and groups directly and route leaves into
    /// their default layer. Layers and groups take groups and leaves.
    /// Leaves take nothing.
    pub fn add(&mut self, child: Node) -> Result<()> {
        match self {
            Node::Document(doc) => doc.add(child).map(|_| ()),
            Node::Layer(layer) => layer.add(child),
            Node::Group(group) => group.add(child),
            leaf => Err(rejected(child.kind(), leaf.kind())),
        }
    }

    pub fn as_node_ref(&self) -> NodeRef<'_> {
        match self {
            Node::Document(d) => NodeRef::Document(d),
            Node::Layer(n) => NodeRef::Layer(n),
            Node::Group(n) => NodeRef::Group(n),
            Node::Shape(n) => NodeRef::Shape(n),
            Node::Text(n) => NodeRef::Text(n),
            Node::Custom(n) => NodeRef::Custom(n),
        }
    }
}

impl Item {
    pub fn as_node_ref(&self) -> NodeRef<'_> {
        match self {
            Item::Group(n) => NodeRef::Group(n),
            Item::Shape(n) => NodeRef::Shape(n),
            Item::Text(n) => NodeRef::Text(n),
            Item::Custom(n) => NodeRef::Custom(n),
        }
    }

    pub(crate) fn find_mut(&mut self, id: NodeId) -> Option<NodeMut<'_>> {
        if self.id() == id {
            return Some(match self {
                Item::Group(n) => NodeMut::Group(n),
                Item::Shape(n) => NodeMut::Shape(n),
                Item::Text(n) => NodeMut::Text(n),
                Item::Custom(n) => NodeMut::Custom(n),
            });
        }
        match self {
            Item::Group(group) => find_in_items(group.children_mut(), id),
            _ => None,
        }
    }
}

impl TopLevel {
    pub fn as_node_ref(&self) -> NodeRef<'_> {
        match self {
            TopLevel::Layer(n) => NodeRef::Layer(n),
            TopLevel::Group(n) => NodeRef::Group(n),
        }
    }

    pub fn items(&self) -> &[Item] {
        match self {
            TopLevel::Layer(layer) => layer.children(),
            TopLevel::Group(group) => group.children(),
        }
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<Item> {
        match self {
            TopLevel::Layer(layer) => layer.children_mut(),
            TopLevel::Group(group) => group.children_mut(),
        }
    }

    pub(crate) fn find_mut(&mut self, id: NodeId) -> Option<NodeMut<'_>> {
        if self.id() == id {
            return Some(match self {
                TopLevel::Layer(n) => NodeMut::Layer(n),
                TopLevel::Group(n) => NodeMut::Group(n),
            });
        }
        find_in_items(self.items_mut(), id)
    }
}

pub(crate) fn find_in_items(items: &mut [Item], id: NodeId) -> Option<NodeMut<'_>> {
    items.iter_mut().find_map(|item| item.find_mut(id))
}

/// Detach the item with `id` from anywhere under `items`.
pub(crate) fn remove_from_items(items: &mut Vec<Item>, id: NodeId) -> Option<Item> {
    if let Some(pos) = items.iter().position(|item| item.id() == id) {
        return Some(items.remove(pos));
    }
    items.iter_mut().find_map(|item| match item {
        Item::Group(group) => remove_from_items(group.children_mut(), id),
        _ => None,
    })
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        match self {
            NodeRef::Document(n) => n.id(),
            NodeRef::Layer(n) => n.id(),
            NodeRef::Group(n) => n.id(),
            NodeRef::Shape(n) => n.id(),
            NodeRef::Text(n) => n.id(),
            NodeRef::Custom(n) => n.id(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Document(_) => NodeKind::Document,
            NodeRef::Layer(_) => NodeKind::Layer,
            NodeRef::Group(_) => NodeKind::Group,
            NodeRef::Shape(_) => NodeKind::Shape,
            NodeRef::Text(_) => NodeKind::Text,
            NodeRef::Custom(_) => NodeKind::Custom,
        }
    }
}

// ==================== Conversions ====================

impl From<Group> for Item {
    fn from(group: Group) -> Self {
        Item::Group(group)
    }
}

impl From<Shape> for Item {
    fn from(shape: Shape) -> Self {
        Item::Shape(shape)
    }
}

impl From<PointText> for Item {
    fn from(text: PointText) -> Self {
        Item::Text(text)
    }
}

impl From<Custom> for Item {
    fn from(custom: Custom) -> Self {
        Item::Custom(custom)
    }
}

impl From<Layer> for TopLevel {
    fn from(layer: Layer) -> Self {
        TopLevel::Layer(layer)
    }
}

impl From<Group> for TopLevel {
    fn from(group: Group) -> Self {
        TopLevel::Group(group)
    }
}

impl From<Document> for Node {
    fn from(doc: Document) -> Self {
        Node::Document(Box::new(doc))
    }
}

impl From<Layer> for Node {
    fn from(layer: Layer) -> Self {
        Node::Layer(layer)
    }
}

impl From<Group> for Node {
    fn from(group: Group) -> Self {
        Node::Group(group)
    }
}

impl From<Shape> for Node {
    fn from(shape: Shape) -> Self {
        Node::Shape(shape)
    }
}

impl From<PointText> for Node {
    fn from(text: PointText) -> Self {
        Node::Text(text)
    }
}

impl From<Custom> for Node {
    fn from(custom: Custom) -> Self {
        Node::Custom(custom)
    }
}

impl From<Item> for Node {
    fn from(item: Item) -> Self {
        match item {
            Item::Group(n) => Node::Group(n),
            Item::Shape(n) => Node::Shape(n),
            Item::Text(n) => Node::Text(n),
            Item::Custom(n) => Node::Custom(n),
        }
    }
}

impl From<TopLevel> for Node {
    fn from(top: TopLevel) -> Self {
        match top {
            TopLevel::Layer(n) => Node::Layer(n),
            TopLevel::Group(n) => Node::Group(n),
        }
    }
}

impl TryFrom<Node> for Item {
    type Error = Node;

    /// Fails with the node handed back when it is a document or a layer.
    fn try_from(node: Node) -> std::result::Result<Self, Node> {
        match node {
            Node::Group(n) => Ok(Item::Group(n)),
            Node::Shape(n) => Ok(Item::Shape(n)),
            Node::Text(n) => Ok(Item::Text(n)),
            Node::Custom(n) => Ok(Item::Custom(n)),
            other => Err(other),
        }
    }
}
