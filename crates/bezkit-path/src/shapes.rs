//! Shape factories.
//!
//! Every factory returns a plain [`Path`]; shapes carry no type of their
//! own once built. Closed shapes get their pivot at their geometric center.

use bezkit_common::{BezKitError, Result};
use bezkit_geom::{kernel, AffineTransform, TWO_PI};

use crate::{Path, KAPPA};

/// Closed polygon through `x, y` pairs.
pub fn polygon(coords: &[f64]) -> Result<Path> {
    if coords.len() < 4 {
        return Err(BezKitError::invalid_geometry(format!(
            "polygon needs at least two points, got {} numbers",
            coords.len()
        )));
    }
    Path::from_lines(coords, true)
}

/// Open polyline through `x, y` pairs.
pub fn multi_line(coords: &[f64]) -> Result<Path> {
    Path::from_lines(coords, false)
}

/// Open unfilled path of cubic segments: `2 + 6n` numbers.
pub fn multi_curve(coords: &[f64]) -> Result<Path> {
    let mut path = Path::from_curves(coords, false)?;
    path.set_no_fill();
    Ok(path)
}

/// Closed path of cubic segments: `2 + 6n` numbers.
pub fn curve_shape(coords: &[f64]) -> Result<Path> {
    Path::from_curves(coords, true)
}

/// Open straight line.
pub fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Path {
    let mut path = Path::new(x1, y1);
    path.append_line(x2, y2);
    path
}

/// Open single cubic curve.
#[allow(clippy::too_many_arguments)]
pub fn curve(
    ax1: f64,
    ay1: f64,
    cx1: f64,
    cy1: f64,
    cx2: f64,
    cy2: f64,
    ax2: f64,
    ay2: f64,
) -> Path {
    let mut path = Path::new(ax1, ay1);
    path.append_curve(cx1, cy1, cx2, cy2, ax2, ay2);
    path
}

/// Closed rectangle from its edges. Starts at the top-left corner and
/// returns to it.
pub fn rectangle(left: f64, top: f64, right: f64, bottom: f64) -> Path {
    let mut path = Path::closed(left, top);
    path.append_line(right, top)
        .append_line(right, bottom)
        .append_line(left, bottom)
        .append_line(left, top);
    path.set_pivot((left + right) / 2.0, (top + bottom) / 2.0);
    path
}

/// Closed triangle through three points.
pub fn triangle(x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) -> Path {
    let mut path = Path::closed(x1, y1);
    path.append_line(x2, y2)
        .append_line(x3, y3)
        .append_line(x1, y1);
    path.set_pivot((x1 + x2 + x3) / 3.0, (y1 + y2 + y3) / 3.0);
    path
}

/// Equilateral triangle inscribed in a circle.
pub fn triangle_centered(xctr: f64, yctr: f64, radius: f64) -> Path {
    regular_points(xctr, yctr, radius, 3)
}

/// Regular polygon with `sides` sides, first vertex straight up from the
/// center in y-down coordinates.
pub fn regular_polygon(xctr: f64, yctr: f64, radius: f64, sides: usize) -> Result<Path> {
    if sides < 3 {
        return Err(BezKitError::invalid_geometry(format!(
            "regular polygon needs at least 3 sides, got {}",
            sides
        )));
    }
    Ok(regular_points(xctr, yctr, radius, sides))
}

fn regular_points(xctr: f64, yctr: f64, radius: f64, sides: usize) -> Path {
    let mut step = AffineTransform::identity();
    step.translate(-xctr, -yctr)
        .rotate(TWO_PI / sides as f64)
        .translate(xctr, yctr);
    let (mut x, mut y) = (xctr, yctr - radius);
    let mut path = Path::closed(x, y);
    for _ in 0..sides {
        (x, y) = step.multiply_normal(x, y);
        path.append_line(x, y);
    }
    path.set_pivot(xctr, yctr);
    path
}

/// Star with `points` tips alternating between two radii.
pub fn star(xctr: f64, yctr: f64, outer: f64, inner: f64, points: usize) -> Result<Path> {
    if points < 2 {
        return Err(BezKitError::invalid_geometry(format!(
            "star needs at least 2 points, got {}",
            points
        )));
    }
    let half = TWO_PI / (2 * points) as f64;
    let mut path = Path::closed(xctr, yctr - outer);
    for i in 1..=2 * points {
        let r = if i % 2 == 0 { outer } else { inner };
        let (x, y) = kernel::rotate_point(0.0, -r, half * i as f64);
        path.append_line(x + xctr, y + yctr);
    }
    path.set_pivot(xctr, yctr);
    Ok(path)
}

/// Circle as four cubic sectors.
pub fn circle(xctr: f64, yctr: f64, radius: f64) -> Path {
    sectored_circle(xctr, yctr, radius, 4)
}

/// Circle as `sectors` cubic segments, starting at `(xctr, yctr + radius)`.
pub fn circle_sectors(xctr: f64, yctr: f64, radius: f64, sectors: usize) -> Result<Path> {
    if sectors == 0 {
        return Err(BezKitError::invalid_geometry("circle needs at least 1 sector"));
    }
    Ok(sectored_circle(xctr, yctr, radius, sectors))
}

fn sectored_circle(xctr: f64, yctr: f64, radius: f64, sectors: usize) -> Path {
    let k = 4.0 * KAPPA / sectors as f64;
    let d = k * radius;
    let sweep = -TWO_PI / sectors as f64;
    let (cx1, cy1) = (d, radius);
    let (cx2, cy2) = kernel::rotate_point(-d, radius, sweep);
    let (ax, ay) = kernel::rotate_point(0.0, radius, sweep);

    let mut path = Path::closed(xctr, yctr + radius);
    for i in 0..sectors {
        let angle = sweep * i as f64;
        let (p1x, p1y) = kernel::rotate_point(cx1, cy1, angle);
        let (p2x, p2y) = kernel::rotate_point(cx2, cy2, angle);
        let (p3x, p3y) = kernel::rotate_point(ax, ay, angle);
        path.append_curve(
            p1x + xctr,
            p1y + yctr,
            p2x + xctr,
            p2y + yctr,
            p3x + xctr,
            p3y + yctr,
        );
    }
    path.set_pivot(xctr, yctr);
    path
}

/// Ellipse: a circle of diameter `width` squashed vertically about its
/// center.
pub fn ellipse(xctr: f64, yctr: f64, width: f64, height: f64) -> Result<Path> {
    ellipse_sectors(xctr, yctr, width, height, 4)
}

pub fn ellipse_sectors(
    xctr: f64,
    yctr: f64,
    width: f64,
    height: f64,
    sectors: usize,
) -> Result<Path> {
    if width == 0.0 {
        return Err(BezKitError::invalid_geometry("ellipse width must be non-zero"));
    }
    let mut path = circle_sectors(xctr, yctr, width / 2.0, sectors)?;
    path.scale(1.0, height / width);
    Ok(path)
}
