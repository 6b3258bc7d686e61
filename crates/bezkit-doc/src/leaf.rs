//! Shape and custom leaves.

use bezkit_geom::{AffineTransform, Bounds};
use bezkit_path::Path;

use crate::node::{Component, NodeKind, NodeMeta};

// ==================== Shape ====================

/// A leaf holding one [`Path`].
#[derive(Debug, Clone)]
pub struct Shape {
    meta: NodeMeta,
    path: Path,
}

impl Shape {
    pub fn new(path: Path) -> Self {
        Self {
            meta: NodeMeta::new(),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn path_mut(&mut self) -> &mut Path {
        &mut self.path
    }

    pub fn into_path(self) -> Path {
        self.path
    }

    pub fn bounding_box(&self) -> Bounds {
        self.path.bounding_box()
    }
}

impl From<Path> for Shape {
    fn from(path: Path) -> Self {
        Self::new(path)
    }
}

impl Component for Shape {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        &mut self.meta
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Shape
    }

    fn transform(&mut self, matrix: &AffineTransform) {
        self.path.apply_matrix(matrix);
    }
}

// ==================== Custom ====================

/// A user-tagged object carried verbatim into the output.
#[derive(Debug, Clone)]
pub struct Custom {
    meta: NodeMeta,
    tag: String,
    value: String,
}

impl Custom {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            meta: NodeMeta::new(),
            tag: tag.into(),
            value: value.into(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }
}

impl Component for Custom {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        &mut self.meta
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Custom
    }

    /// Custom objects have no geometry.
    fn transform(&mut self, _matrix: &AffineTransform) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use bezkit_path::shapes;

    #[test]
    fn test_shape_transform_delegates_to_path() {
        let mut shape = Shape::new(shapes::rectangle(0.0, 0.0, 2.0, 2.0));
        let mut m = AffineTransform::identity();
        m.scale(2.0, 3.0);
        shape.transform(&m);
        assert_eq!(shape.bounding_box(), Bounds::new(0.0, 0.0, 4.0, 6.0));
        assert!(shape.path().last_transform().is_some());
    }

    #[test]
    fn test_custom_ignores_transform() {
        let mut custom = Custom::new("note", "hello");
        let mut m = AffineTransform::identity();
        m.translate(5.0, 5.0);
        custom.transform(&m);
        assert_eq!(custom.tag(), "note");
        assert_eq!(custom.value(), "hello");
        assert_eq!(custom.kind(), NodeKind::Custom);
    }
}
