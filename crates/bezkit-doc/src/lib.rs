//! # BezKit Doc
//!
//! The composite document tree exported by `bezkit-export`.
//!
//! ## Features
//!
//! - **Tree**: document, layers, groups and leaves (shapes, point text,
//!   custom tagged objects) with per-level insertion rules
//! - **Transforms**: whole-subtree matrix application
//! - **Visitors**: pre- or post-order traversal with one callback per node
//!   kind, plus bounds aggregation, ID lookup and bulk attribute assignment
//! - **Palette**: order-preserving set of ARGB colors
//!
//! ## Architecture
//!
//! ```text
//! Document
//!    ├── Layer ──────┐
//!    │               ├── Group (nests)
//!    └── Group ──────┤
//!                    ├── Shape (Path)
//!                    ├── PointText
//!                    └── Custom
//! ```
//!
//! Layers and groups store [`Item`]s and the document stores [`TopLevel`]s,
//! so an illegal tree cannot be built through the typed API. The dynamic
//! [`Node`] API checks the same rules at runtime and reports
//! `StructuralViolation`.

pub mod document;
pub mod group;
pub mod leaf;
pub mod node;
pub mod palette;
pub mod text;
pub mod visitor;
pub mod visitors;

pub use document::{BoundingBox, Document, DocumentInfo};
pub use group::{Group, Layer};
pub use leaf::{Custom, Shape};
pub use node::{Component, Item, Node, NodeId, NodeKind, NodeMeta, NodeMut, NodeRef, TopLevel};
pub use palette::Palette;
pub use text::{PointText, TextAlign};
pub use visitor::{TraversalOrder, Visitor, VisitorMut};
pub use visitors::{BoundsAggregator, IdLookup, ShapeAttributeVisitor};
