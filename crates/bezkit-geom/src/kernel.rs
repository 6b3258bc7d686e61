//! Stateless point operations.
//!
//! Angles are radians and turn counterclockwise in y-up coordinates. On a
//! y-down display the same angle turns clockwise.

use crate::TWO_PI;

/// Translate a point.
pub fn translate_point(x: f64, y: f64, dx: f64, dy: f64) -> (f64, f64) {
    (x + dx, y + dy)
}

/// Rotate a point about the origin.
pub fn rotate_point(x: f64, y: f64, theta: f64) -> (f64, f64) {
    let (sn, cs) = theta.sin_cos();
    (x * cs - y * sn, x * sn + y * cs)
}

/// Rotate a point about a pivot.
pub fn rotate_around_pivot(x: f64, y: f64, px: f64, py: f64, theta: f64) -> (f64, f64) {
    let (rx, ry) = rotate_point(x - px, y - py, theta);
    (rx + px, ry + py)
}

/// Scale a point about a pivot with independent x and y factors.
pub fn scale_around_pivot(x: f64, y: f64, px: f64, py: f64, sx: f64, sy: f64) -> (f64, f64) {
    (px + (x - px) * sx, py + (y - py) * sy)
}

/// Angle of the vector `(dx, dy)` in `[0, 2π)`. The zero vector yields 0.
pub fn angle_of(dx: f64, dy: f64) -> f64 {
    let mut angle = if dx != 0.0 {
        (dy / dx).abs().atan()
    } else if dy != 0.0 {
        std::f64::consts::FRAC_PI_2
    } else {
        0.0
    };
    if dx < 0.0 {
        if dy < 0.0 {
            angle += std::f64::consts::PI;
        } else {
            angle = std::f64::consts::PI - angle;
        }
    } else if dy < 0.0 {
        angle = TWO_PI - angle;
    }
    angle
}

/// Even-odd ray casting test.
///
/// Points exactly on an edge fall on whichever side the parity rule puts
/// them; there is no special handling for boundaries. `xs` and `ys` must
/// have the same length.
pub fn point_in_polygon(xs: &[f64], ys: &[f64], x: f64, y: f64) -> bool {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let crosses = (ys[i] <= y && y < ys[j]) || (ys[j] <= y && y < ys[i]);
        if crosses && x < (xs[j] - xs[i]) * (y - ys[i]) / (ys[j] - ys[i]) + xs[i] {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Shoelace area of an interleaved `x, y, x, y…` polygon.
///
/// Positive when the vertices run counterclockwise in y-up coordinates,
/// negative when they run counterclockwise on a y-down display. A closing
/// point that repeats the first one adds a zero term.
pub fn signed_area(coords: &[f64]) -> f64 {
    let len = coords.len() & !1;
    if len < 2 {
        return 0.0;
    }
    let mut xold = coords[len - 2];
    let mut yold = coords[len - 1];
    let mut area = 0.0;
    for pair in coords[..len].chunks_exact(2) {
        let (x, y) = (pair[0], pair[1]);
        area += (xold - x) * (yold + y);
        xold = x;
        yold = y;
    }
    area / 2.0
}

/// Split interleaved coordinates into separate x and y arrays.
pub fn split_coords(coords: &[f64]) -> (Vec<f64>, Vec<f64>) {
    coords
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .unzip()
}

pub fn dist_squared(x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
    let dx = x1 - x0;
    let dy = y1 - y0;
    dx * dx + dy * dy
}

/// Linear interpolation from `lo` to `hi` by `amount`.
pub fn lerp(amount: f64, lo: f64, hi: f64) -> f64 {
    lo + amount * (hi - lo)
}

pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}

/// -1, 0 or 1 by the sign of `a`.
pub fn zero_sign(a: f64) -> i32 {
    if a < 0.0 {
        -1
    } else if a > 0.0 {
        1
    } else {
        0
    }
}

/// Point on a cubic Bézier at parameter `t` for one axis.
pub fn bezier_point(a: f64, c1: f64, c2: f64, b: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    mt * mt * mt * a + 3.0 * t * mt * mt * c1 + 3.0 * t * t * mt * c2 + t * t * t * b
}
