//! Layers and groups.

use std::sync::atomic::{AtomicU32, Ordering};

use bezkit_common::Result;
use bezkit_geom::AffineTransform;
use tracing::trace;

use crate::node::{rejected, Component, Item, Node, NodeKind, NodeMeta};

/// Default palette color index of a layer.
pub const DEFAULT_COLOR_INDEX: i32 = 1;

fn next_layer_name() -> String {
    static LAYER_COUNTER: AtomicU32 = AtomicU32::new(1);
    format!("Layer {}", LAYER_COUNTER.fetch_add(1, Ordering::Relaxed))
}

fn add_item(children: &mut Vec<Item>, child: Node, parent: NodeKind) -> Result<()> {
    let kind = child.kind();
    let item = Item::try_from(child).map_err(|_| rejected(kind, parent))?;
    trace!(child = %kind, parent = %parent, id = %item.id(), "add");
    children.push(item);
    Ok(())
}

// ==================== Layer ====================

/// A named layer. Holds groups and leaves; never nests.
#[derive(Debug, Clone)]
pub struct Layer {
    meta: NodeMeta,
    name: String,
    color_index: i32,
    children: Vec<Item>,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            meta: NodeMeta::new(),
            name: name.into(),
            color_index: DEFAULT_COLOR_INDEX,
            children: Vec::new(),
        }
    }

    /// A layer named `"Layer N"` from a process-wide counter.
    pub fn unnamed() -> Self {
        Self::new(next_layer_name())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn color_index(&self) -> i32 {
        self.color_index
    }

    pub fn set_color_index(&mut self, index: i32) {
        self.color_index = index;
    }

    /// Typed insertion; cannot fail.
    pub fn push(&mut self, item: impl Into<Item>) {
        self.children.push(item.into());
    }

    /// Dynamic insertion. Documents and layers are rejected.
    pub fn add(&mut self, child: Node) -> Result<()> {
        add_item(&mut self.children, child, NodeKind::Layer)
    }

    /// Add every node, stopping at the first rejected one.
    pub fn add_all(&mut self, children: impl IntoIterator<Item = Node>) -> Result<()> {
        children.into_iter().try_for_each(|child| self.add(child))
    }

    pub fn children(&self) -> &[Item] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Item> {
        &mut self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.children.iter()
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self::unnamed()
    }
}

impl Component for Layer {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        &mut self.meta
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Layer
    }

    fn transform(&mut self, matrix: &AffineTransform) {
        for child in self.children.iter_mut() {
            child.transform(matrix);
        }
    }
}

// ==================== Group ====================

/// A group of items. Groups nest.
#[derive(Debug, Clone, Default)]
pub struct Group {
    meta: NodeMeta,
    children: Vec<Item>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    /// Typed insertion; cannot fail.
    pub fn push(&mut self, item: impl Into<Item>) {
        self.children.push(item.into());
    }

    /// Dynamic insertion. Documents and layers are rejected.
    pub fn add(&mut self, child: Node) -> Result<()> {
        add_item(&mut self.children, child, NodeKind::Group)
    }

    pub fn add_all(&mut self, children: impl IntoIterator<Item = Node>) -> Result<()> {
        children.into_iter().try_for_each(|child| self.add(child))
    }

    pub fn children(&self) -> &[Item] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Item> {
        &mut self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.children.iter()
    }
}

impl Component for Group {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        &mut self.meta
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Group
    }

    fn transform(&mut self, matrix: &AffineTransform) {
        for child in self.children.iter_mut() {
            child.transform(matrix);
        }
    }
}
