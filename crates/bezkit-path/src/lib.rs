//! # BezKit Path
//!
//! Paths made of straight and cubic Bézier segments.
//!
//! ## Features
//!
//! - **Segments**: line and curve segments that can stream themselves into
//!   any [`PathEmitter`]
//! - **Path**: start anchor, ordered segments, fill/stroke attributes, a
//!   pivot for rotation and scaling, and lazily cached flattening and bounds
//! - **Shapes**: factories for rectangles, polygons, circles, ellipses,
//!   triangles and stars
//! - **Color**: packed ARGB helpers
//!
//! ## Architecture
//!
//! ```text
//! Path
//!  ├── start anchor
//!  ├── segments ── Line(x, y) | Curve(cx1, cy1, cx2, cy2, x, y)
//!  ├── pivot
//!  └── caches (cleared on every geometric mutation)
//!        ├── polygon (flattened points)
//!        └── bounds
//! ```

pub mod color;
pub mod path;
pub mod segment;
pub mod shapes;

pub use path::{Path, DEFAULT_POLY_STEPS};
pub use segment::{PathEmitter, Segment, SegmentKind};

/// Distance from a quarter-circle anchor to its control point, as a
/// fraction of the radius.
pub const KAPPA: f64 = 0.5522847498;
