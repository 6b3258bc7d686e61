//! Path segments.

use bezkit_common::Result;
use bezkit_geom::Point;

/// Receiver for path construction calls.
///
/// A path streams itself as one `move_to` followed by one `line_to` or
/// `curve_to` per segment.
pub trait PathEmitter {
    fn move_to(&mut self, x: f64, y: f64) -> Result<()>;
    fn line_to(&mut self, x: f64, y: f64) -> Result<()>;
    #[allow(clippy::too_many_arguments)]
    fn curve_to(&mut self, cx1: f64, cy1: f64, cx2: f64, cy2: f64, x: f64, y: f64) -> Result<()>;
}

/// Kind of a segment. Fixed once the segment exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Line,
    Curve,
}

/// One step of a path from the previous anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// Straight line to `[x, y]`.
    Line([f64; 2]),
    /// Cubic Bézier `[cx1, cy1, cx2, cy2, x, y]`.
    Curve([f64; 6]),
}

impl Segment {
    pub fn line(x: f64, y: f64) -> Self {
        Segment::Line([x, y])
    }

    pub fn curve(cx1: f64, cy1: f64, cx2: f64, cy2: f64, x: f64, y: f64) -> Self {
        Segment::Curve([cx1, cy1, cx2, cy2, x, y])
    }

    pub fn kind(&self) -> SegmentKind {
        match self {
            Segment::Line(_) => SegmentKind::Line,
            Segment::Curve(_) => SegmentKind::Curve,
        }
    }

    /// Interleaved coordinates, control points first.
    pub fn coords(&self) -> &[f64] {
        match self {
            Segment::Line(c) => c,
            Segment::Curve(c) => c,
        }
    }

    /// Number of points (anchor plus controls).
    pub fn point_count(&self) -> usize {
        self.coords().len() / 2
    }

    /// The terminal anchor point.
    pub fn anchor(&self) -> Point {
        let c = self.coords();
        let n = c.len();
        Point::new(c[n - 2], c[n - 1])
    }

    /// Map every point of the segment through `f`. The kind never changes.
    pub fn map_points(&mut self, mut f: impl FnMut(f64, f64) -> (f64, f64)) {
        let coords: &mut [f64] = match self {
            Segment::Line(c) => c,
            Segment::Curve(c) => c,
        };
        for pair in coords.chunks_exact_mut(2) {
            let (x, y) = f(pair[0], pair[1]);
            pair[0] = x;
            pair[1] = y;
        }
    }

    /// Stream this segment into an emitter.
    pub fn emit<E: PathEmitter + ?Sized>(&self, out: &mut E) -> Result<()> {
        match *self {
            Segment::Line([x, y]) => out.line_to(x, y),
            Segment::Curve([cx1, cy1, cx2, cy2, x, y]) => out.curve_to(cx1, cy1, cx2, cy2, x, y),
        }
    }
}
