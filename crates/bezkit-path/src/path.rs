//! Paths with cached flattening and bounds.

use std::cell::OnceCell;

use bezkit_common::{BezKitError, Result};
use bezkit_geom::{kernel, AffineTransform, Bounds, Point};
use tracing::trace;

use crate::color;
use crate::segment::{PathEmitter, Segment, SegmentKind};

/// Points generated per curve segment when flattening.
pub const DEFAULT_POLY_STEPS: usize = 16;

/// An ordered path: start anchor, segments in draw order, and paint
/// attributes.
///
/// The flattened polygon and the bounding box are cached and cleared by
/// every geometric mutation; they are rebuilt on the next read.
#[derive(Debug, Clone)]
pub struct Path {
    start: Point,
    segments: Vec<Segment>,
    closed: bool,
    has_fill: bool,
    has_stroke: bool,
    fill_color: u32,
    stroke_color: u32,
    weight: f64,
    pivot: Point,
    poly_steps: usize,
    last_transform: Option<AffineTransform>,
    polygon: OnceCell<Vec<f64>>,
    bounds: OnceCell<Bounds>,
}

impl Path {
    /// An open path starting at `(x, y)`.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            start: Point::new(x, y),
            segments: Vec::new(),
            closed: false,
            has_fill: true,
            has_stroke: true,
            fill_color: color::WHITE,
            stroke_color: color::BLACK,
            weight: 1.0,
            pivot: Point::default(),
            poly_steps: DEFAULT_POLY_STEPS,
            last_transform: None,
            polygon: OnceCell::new(),
            bounds: OnceCell::new(),
        }
    }

    /// A closed path starting at `(x, y)`.
    pub fn closed(x: f64, y: f64) -> Self {
        let mut path = Self::new(x, y);
        path.closed = true;
        path
    }

    /// Build from interleaved `x, y` pairs: the first pair is the start
    /// anchor, each following pair a line segment.
    pub fn from_lines(coords: &[f64], closed: bool) -> Result<Self> {
        if coords.len() < 2 {
            return Err(BezKitError::invalid_geometry(format!(
                "line path needs at least 2 numbers, got {}",
                coords.len()
            )));
        }
        if coords.len() % 2 != 0 {
            return Err(BezKitError::invalid_geometry(format!(
                "line path needs an even count of numbers, got {}",
                coords.len()
            )));
        }
        let mut path = Self::new(coords[0], coords[1]);
        path.closed = closed;
        path.segments = coords[2..]
            .chunks_exact(2)
            .map(|p| Segment::line(p[0], p[1]))
            .collect();
        Ok(path)
    }

    /// Build from a start anchor followed by groups of six numbers, one
    /// cubic segment each.
    pub fn from_curves(coords: &[f64], closed: bool) -> Result<Self> {
        if coords.len() < 2 || (coords.len() - 2) % 6 != 0 {
            return Err(BezKitError::invalid_geometry(format!(
                "curve path needs 2 + 6n numbers, got {}",
                coords.len()
            )));
        }
        let mut path = Self::new(coords[0], coords[1]);
        path.closed = closed;
        path.segments = coords[2..]
            .chunks_exact(6)
            .map(|c| Segment::curve(c[0], c[1], c[2], c[3], c[4], c[5]))
            .collect();
        Ok(path)
    }

    // ==================== Construction ====================

    pub fn append_line(&mut self, x: f64, y: f64) -> &mut Self {
        self.segments.push(Segment::line(x, y));
        self.invalidate();
        self
    }

    pub fn append_curve(
        &mut self,
        cx1: f64,
        cy1: f64,
        cx2: f64,
        cy2: f64,
        x: f64,
        y: f64,
    ) -> &mut Self {
        self.segments
            .push(Segment::curve(cx1, cy1, cx2, cy2, x, y));
        self.invalidate();
        self
    }

    pub fn append(&mut self, segment: Segment) -> &mut Self {
        self.segments.push(segment);
        self.invalidate();
        self
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn set_start(&mut self, x: f64, y: f64) {
        self.start = Point::new(x, y);
        self.invalidate();
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    /// Number of points including control points and the start anchor.
    pub fn point_count(&self) -> usize {
        1 + self.segments.iter().map(Segment::point_count).sum::<usize>()
    }

    /// Start anchor followed by every segment's coordinates.
    pub fn coords(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.point_count() * 2);
        out.push(self.start.x);
        out.push(self.start.y);
        for seg in &self.segments {
            out.extend_from_slice(seg.coords());
        }
        out
    }

    // ==================== Paint attributes ====================

    pub fn has_fill(&self) -> bool {
        self.has_fill
    }

    pub fn has_stroke(&self) -> bool {
        self.has_stroke
    }

    pub fn fill_color(&self) -> u32 {
        self.fill_color
    }

    pub fn stroke_color(&self) -> u32 {
        self.stroke_color
    }

    /// Set the fill color and turn fill on.
    pub fn set_fill_color(&mut self, argb: u32) -> &mut Self {
        self.fill_color = argb;
        self.has_fill = true;
        self
    }

    /// Set the stroke color and turn stroke on.
    pub fn set_stroke_color(&mut self, argb: u32) -> &mut Self {
        self.stroke_color = argb;
        self.has_stroke = true;
        self
    }

    pub fn set_no_fill(&mut self) -> &mut Self {
        self.has_fill = false;
        self
    }

    pub fn set_no_stroke(&mut self) -> &mut Self {
        self.has_stroke = false;
        self
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: f64) -> &mut Self {
        self.weight = weight;
        self
    }

    /// Replace the fill alpha. Nominally `0..=255`; not checked.
    pub fn set_fill_opacity(&mut self, opacity: i32) -> &mut Self {
        self.fill_color = color::with_alpha(self.fill_color, opacity);
        self
    }

    /// Replace the stroke alpha. Nominally `0..=255`; not checked.
    pub fn set_stroke_opacity(&mut self, opacity: i32) -> &mut Self {
        self.stroke_color = color::with_alpha(self.stroke_color, opacity);
        self
    }

    pub fn fill_opacity(&self) -> u8 {
        color::alpha(self.fill_color)
    }

    pub fn stroke_opacity(&self) -> u8 {
        color::alpha(self.stroke_color)
    }

    // ==================== Pivot ====================

    /// Point used by [`Path::rotate`] and [`Path::scale`]. Starts at the
    /// origin.
    pub fn pivot(&self) -> Point {
        self.pivot
    }

    pub fn set_pivot(&mut self, x: f64, y: f64) {
        self.pivot = Point::new(x, y);
    }

    /// Put the pivot back at the origin.
    pub fn clear_pivot(&mut self) {
        self.pivot = Point::new(0.0, 0.0);
    }

    /// Move the pivot to the start anchor.
    pub fn anchor_pivot(&mut self) -> Point {
        self.pivot = self.start;
        self.pivot
    }

    /// Move the pivot to the center of the bounding box.
    pub fn pivot_from_bounds(&mut self) -> Point {
        self.pivot = self.bounding_box().center();
        self.pivot
    }

    // ==================== Geometric mutation ====================

    /// Map the start anchor, every segment point and the pivot.
    fn map_points(&mut self, mut f: impl FnMut(f64, f64) -> (f64, f64)) {
        let (x, y) = f(self.start.x, self.start.y);
        self.start = Point::new(x, y);
        let (px, py) = f(self.pivot.x, self.pivot.y);
        self.pivot = Point::new(px, py);
        for seg in self.segments.iter_mut() {
            seg.map_points(&mut f);
        }
        self.invalidate();
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.map_points(|x, y| kernel::translate_point(x, y, dx, dy));
    }

    /// Rotate about the pivot.
    pub fn rotate(&mut self, theta: f64) {
        let Point { x: px, y: py } = self.pivot;
        self.rotate_about(theta, px, py);
    }

    /// Rotate about an arbitrary point. The pivot moves with the path.
    pub fn rotate_about(&mut self, theta: f64, px: f64, py: f64) {
        self.map_points(|x, y| kernel::rotate_around_pivot(x, y, px, py, theta));
    }

    /// Scale about the pivot.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        let Point { x: px, y: py } = self.pivot;
        self.scale_about(sx, sy, px, py);
    }

    /// Scale about an arbitrary point.
    pub fn scale_about(&mut self, sx: f64, sy: f64, px: f64, py: f64) {
        self.map_points(|x, y| kernel::scale_around_pivot(x, y, px, py, sx, sy));
    }

    /// Apply a matrix to every point, dividing by the homogeneous weight
    /// only when the matrix is not normal. The matrix is kept for
    /// [`Path::repeat_transform`].
    pub fn apply_matrix(&mut self, matrix: &AffineTransform) {
        let normal = matrix.is_normal();
        trace!(normal, segments = self.segments.len(), "apply_matrix");
        if normal {
            self.map_points(|x, y| matrix.multiply_normal(x, y));
        } else {
            self.map_points(|x, y| matrix.multiply_projective(x, y));
        }
        self.last_transform = Some(matrix.clone());
    }

    /// Apply the last matrix again. Does nothing if none was applied.
    pub fn repeat_transform(&mut self) {
        if let Some(matrix) = self.last_transform.take() {
            self.apply_matrix(&matrix);
        }
    }

    pub fn last_transform(&self) -> Option<&AffineTransform> {
        self.last_transform.as_ref()
    }

    // ==================== Derived geometry ====================

    pub fn poly_steps(&self) -> usize {
        self.poly_steps
    }

    /// Set the curve subdivision used by the cached polygon. Values below
    /// 1 are raised to 1.
    pub fn set_poly_steps(&mut self, steps: usize) {
        self.poly_steps = steps.max(1);
        self.invalidate();
    }

    /// Flatten to interleaved points.
    ///
    /// A line contributes its anchor; a curve contributes `steps` points at
    /// `t = 1/steps, 2/steps, …, 1`. The result is an approximation of the
    /// curves, not an arc-length subdivision.
    pub fn flatten_to_polygon(&self, steps: usize) -> Vec<f64> {
        let steps = steps.max(1);
        let count = 1 + self
            .segments
            .iter()
            .map(|s| match s.kind() {
                SegmentKind::Line => 1,
                SegmentKind::Curve => steps,
            })
            .sum::<usize>();
        let mut points = Vec::with_capacity(count * 2);
        points.push(self.start.x);
        points.push(self.start.y);
        let (mut cur_x, mut cur_y) = (self.start.x, self.start.y);
        for seg in &self.segments {
            match *seg {
                Segment::Line([x, y]) => {
                    points.push(x);
                    points.push(y);
                }
                Segment::Curve([cx1, cy1, cx2, cy2, ax, ay]) => {
                    for j in 1..=steps {
                        let t = j as f64 / steps as f64;
                        points.push(kernel::bezier_point(cur_x, cx1, cx2, ax, t));
                        points.push(kernel::bezier_point(cur_y, cy1, cy2, ay, t));
                    }
                }
            }
            let n = points.len();
            cur_x = points[n - 2];
            cur_y = points[n - 1];
        }
        points
    }

    /// Cached flattening at [`Path::poly_steps`].
    pub fn polygon(&self) -> &[f64] {
        self.polygon
            .get_or_init(|| self.flatten_to_polygon(self.poly_steps))
    }

    /// Min/max over the flattened polygon.
    ///
    /// Bounds come from the approximation, not the analytic curve, so
    /// curved extremes may be undershot by an error on the order of
    /// `1/steps²`. Control points are never included.
    pub fn bounding_box(&self) -> Bounds {
        *self.bounds.get_or_init(|| {
            Bounds::from_coords(self.polygon())
                .unwrap_or_else(|| Bounds::new(self.start.x, self.start.y, self.start.x, self.start.y))
        })
    }

    /// Even-odd containment on the flattened polygon.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        let (xs, ys) = kernel::split_coords(self.polygon());
        kernel::point_in_polygon(&xs, &ys, x, y)
    }

    /// Signed area of the flattened polygon.
    pub fn area(&self) -> f64 {
        kernel::signed_area(self.polygon())
    }

    /// True when both caches are empty.
    pub fn is_cache_empty(&self) -> bool {
        self.polygon.get().is_none() && self.bounds.get().is_none()
    }

    fn invalidate(&mut self) {
        self.polygon.take();
        self.bounds.take();
    }

    // ==================== Emission ====================

    /// Stream the geometry: one move to the start anchor, then each
    /// segment in order. Painting is left to the caller.
    pub fn emit<E: PathEmitter + ?Sized>(&self, out: &mut E) -> Result<()> {
        out.move_to(self.start.x, self.start.y)?;
        for seg in &self.segments {
            seg.emit(out)?;
        }
        Ok(())
    }
}
