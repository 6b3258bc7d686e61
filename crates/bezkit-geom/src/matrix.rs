//! 3x3 affine transform with accumulating operators.

use serde::{Deserialize, Serialize};
use tracing::trace;

/// A 3x3 transform matrix for row-vector points.
///
/// `translate`, `scale`, `rotate` and `shear` right-multiply an elementary
/// matrix into the accumulated one, so each call appends an operation after
/// those already applied. The `last_*` scratch values only support the
/// `*_again` helpers; the nine elements are the whole state that matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    elements: [[f64; 3]; 3],
    #[serde(skip)]
    last_translation: (f64, f64),
    #[serde(skip, default = "unit_scale")]
    last_scale: (f64, f64),
    #[serde(skip)]
    last_angle: f64,
    #[serde(skip)]
    last_shear: (f64, f64),
}

fn unit_scale() -> (f64, f64) {
    (1.0, 1.0)
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform {
    /// The identity matrix.
    pub fn identity() -> Self {
        Self::from_rows([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Build from explicit rows.
    pub fn from_rows(elements: [[f64; 3]; 3]) -> Self {
        Self {
            elements,
            last_translation: (0.0, 0.0),
            last_scale: unit_scale(),
            last_angle: 0.0,
            last_shear: (0.0, 0.0),
        }
    }

    /// Build an affine matrix from the six values `a b c d tx ty`.
    pub fn from_affine(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Self::from_rows([[a, b, 0.0], [c, d, 0.0], [tx, ty, 1.0]])
    }

    /// Copy of the nine elements, `[row][col]`.
    pub fn elements(&self) -> [[f64; 3]; 3] {
        self.elements
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.elements[row][col]
    }

    /// The affine part as `[a, b, c, d, tx, ty]`.
    pub fn to_affine(&self) -> [f64; 6] {
        let e = &self.elements;
        [e[0][0], e[0][1], e[1][0], e[1][1], e[2][0], e[2][1]]
    }

    /// Reset to identity and clear the scratch values.
    pub fn reset(&mut self) -> &mut Self {
        *self = Self::identity();
        self
    }

    /// True iff column 3 is exactly `(0, 0, 1)`.
    ///
    /// Exact comparison: a matrix that drifts by rounding error after many
    /// compositions is treated as projective.
    pub fn is_normal(&self) -> bool {
        let e = &self.elements;
        e[0][2] == 0.0 && e[1][2] == 0.0 && e[2][2] == 1.0
    }

    // ==================== Accumulating operators ====================

    pub fn translate(&mut self, tx: f64, ty: f64) -> &mut Self {
        self.last_translation = (tx, ty);
        self.apply_translation();
        self
    }

    pub fn scale(&mut self, sx: f64, sy: f64) -> &mut Self {
        self.last_scale = (sx, sy);
        self.apply_scale();
        self
    }

    /// Rotate by `theta` radians.
    pub fn rotate(&mut self, theta: f64) -> &mut Self {
        self.last_angle = theta;
        self.apply_rotation();
        self
    }

    /// Shear so that `x' = x + sx·y` and `y' = y + sy·x`.
    pub fn shear(&mut self, sx: f64, sy: f64) -> &mut Self {
        self.last_shear = (sx, sy);
        self.apply_shear();
        self
    }

    /// Mirror across the x axis (y flips sign).
    pub fn reflect_x(&mut self) -> &mut Self {
        self.scale(1.0, -1.0)
    }

    /// Mirror across the y axis (x flips sign).
    pub fn reflect_y(&mut self) -> &mut Self {
        self.scale(-1.0, 1.0)
    }

    /// Point reflection through the origin.
    pub fn reflect_origin(&mut self) -> &mut Self {
        self.scale(-1.0, -1.0)
    }

    /// Re-apply the most recent translation.
    pub fn translate_again(&mut self) -> &mut Self {
        self.apply_translation();
        self
    }

    /// Re-apply the most recent scale.
    pub fn scale_again(&mut self) -> &mut Self {
        self.apply_scale();
        self
    }

    /// Re-apply the most recent rotation.
    pub fn rotate_again(&mut self) -> &mut Self {
        self.apply_rotation();
        self
    }

    /// Re-apply the most recent shear.
    pub fn shear_again(&mut self) -> &mut Self {
        self.apply_shear();
        self
    }

    fn apply_translation(&mut self) {
        let (tx, ty) = self.last_translation;
        if self.is_normal() {
            self.elements[2][0] += tx;
            self.elements[2][1] += ty;
        } else {
            for row in self.elements.iter_mut() {
                row[0] += tx * row[2];
                row[1] += ty * row[2];
            }
        }
    }

    fn apply_scale(&mut self) {
        let (sx, sy) = self.last_scale;
        for row in self.elements.iter_mut() {
            row[0] *= sx;
            row[1] *= sy;
        }
    }

    fn apply_rotation(&mut self) {
        let (sn, cs) = self.last_angle.sin_cos();
        for row in self.elements.iter_mut() {
            let x = row[0];
            row[0] = x * cs - row[1] * sn;
            row[1] = x * sn + row[1] * cs;
        }
    }

    fn apply_shear(&mut self) {
        let (sx, sy) = self.last_shear;
        for row in self.elements.iter_mut() {
            let x = row[0];
            row[0] = x + row[1] * sx;
            row[1] = x * sy + row[1];
        }
    }

    // ==================== Point multiplication ====================

    /// Affine map of a point. Column 3 is ignored.
    pub fn multiply_normal(&self, x: f64, y: f64) -> (f64, f64) {
        let e = &self.elements;
        (
            x * e[0][0] + y * e[1][0] + e[2][0],
            x * e[0][1] + y * e[1][1] + e[2][1],
        )
    }

    /// Affine map followed by division by the homogeneous weight.
    ///
    /// When the weight is exactly zero the affine result is returned
    /// undivided.
    pub fn multiply_projective(&self, x: f64, y: f64) -> (f64, f64) {
        let e = &self.elements;
        let (px, py) = self.multiply_normal(x, y);
        let w = x * e[0][2] + y * e[1][2] + e[2][2];
        if w != 0.0 {
            (px / w, py / w)
        } else {
            (px, py)
        }
    }

    /// Map a point with whichever multiplication the matrix calls for.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        if self.is_normal() {
            self.multiply_normal(x, y)
        } else {
            self.multiply_projective(x, y)
        }
    }

    /// Map every point of an interleaved `x, y, x, y…` slice in place.
    pub fn transform_points(&self, coords: &mut [f64]) {
        let normal = self.is_normal();
        trace!(points = coords.len() / 2, normal, "transform_points");
        for pair in coords.chunks_exact_mut(2) {
            let (x, y) = if normal {
                self.multiply_normal(pair[0], pair[1])
            } else {
                self.multiply_projective(pair[0], pair[1])
            };
            pair[0] = x;
            pair[1] = y;
        }
    }

    // ==================== Composition ====================

    /// Write the product `a · b` into `out`.
    ///
    /// `out` is a distinct matrix from both inputs; the borrow rules make
    /// aliasing impossible. Scratch values of `out` are left untouched.
    pub fn compose_into(a: &AffineTransform, b: &AffineTransform, out: &mut AffineTransform) {
        for i in 0..3 {
            for j in 0..3 {
                out.elements[i][j] = (0..3).map(|k| a.elements[i][k] * b.elements[k][j]).sum();
            }
        }
    }

    /// The product `a · b`: apply `a`, then `b`.
    pub fn compose(a: &AffineTransform, b: &AffineTransform) -> AffineTransform {
        let mut out = AffineTransform::identity();
        Self::compose_into(a, b, &mut out);
        out
    }

    /// Append `other` after this transform.
    pub fn then(&self, other: &AffineTransform) -> AffineTransform {
        Self::compose(self, other)
    }

    /// Transposed copy.
    pub fn transposed(&self) -> AffineTransform {
        let e = &self.elements;
        let mut t = [[0.0; 3]; 3];
        for (i, row) in t.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = e[j][i];
            }
        }
        AffineTransform::from_rows(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn approx_pt(a: (f64, f64), b: (f64, f64)) -> bool {
        approx_eq(a.0, b.0) && approx_eq(a.1, b.1)
    }

    #[test]
    fn test_identity() {
        let m = AffineTransform::identity();
        assert!(m.is_normal());
        assert_eq!(m.multiply_normal(3.0, -4.0), (3.0, -4.0));
    }

    #[test]
    fn test_translate_then_scale_order() {
        let mut m = AffineTransform::identity();
        m.translate(10.0, 0.0).scale(2.0, 2.0);
        // translate first, then scale
        assert_eq!(m.multiply_normal(1.0, 1.0), (22.0, 2.0));

        let mut n = AffineTransform::identity();
        n.scale(2.0, 2.0).translate(10.0, 0.0);
        assert_eq!(n.multiply_normal(1.0, 1.0), (12.0, 2.0));
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let mut m = AffineTransform::identity();
        m.rotate(FRAC_PI_2);
        assert!(approx_pt(m.multiply_normal(1.0, 0.0), (0.0, 1.0)));
    }

    #[test]
    fn test_rigid_transforms_stay_normal() {
        let mut m = AffineTransform::identity();
        m.translate(3.0, -7.0)
            .rotate(0.7)
            .scale(2.5, 0.5)
            .rotate(-1.3)
            .translate(-1.0, 4.0);
        assert!(m.is_normal());
        for &(x, y) in &[(0.0, 0.0), (1.0, 2.0), (-5.5, 3.25), (100.0, -40.0)] {
            assert!(approx_pt(m.multiply_normal(x, y), m.multiply_projective(x, y)));
        }
    }

    #[test]
    fn test_shear() {
        let mut m = AffineTransform::identity();
        m.shear(0.5, 0.0);
        assert_eq!(m.multiply_normal(1.0, 2.0), (2.0, 2.0));
        let mut n = AffineTransform::identity();
        n.shear(0.0, 2.0);
        assert_eq!(n.multiply_normal(1.0, 2.0), (1.0, 4.0));
    }

    #[test]
    fn test_shear_is_right_multiplication() {
        let mut m = AffineTransform::identity();
        m.translate(5.0, 1.0).shear(0.25, 0.75);
        let mut t = AffineTransform::identity();
        t.translate(5.0, 1.0);
        let mut s = AffineTransform::identity();
        s.shear(0.25, 0.75);
        let expected = AffineTransform::compose(&t, &s);
        assert_eq!(m.elements(), expected.elements());
    }

    #[test]
    fn test_projective_divides() {
        let m = AffineTransform::from_rows([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 2.0]]);
        assert!(!m.is_normal());
        assert_eq!(m.multiply_projective(4.0, 6.0), (2.0, 3.0));
        assert_eq!(m.multiply_normal(4.0, 6.0), (4.0, 6.0));
        assert_eq!(m.apply(4.0, 6.0), (2.0, 3.0));
    }

    #[test]
    fn test_projective_zero_weight_is_undivided() {
        let m = AffineTransform::from_rows([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [5.0, 5.0, 0.0]]);
        assert_eq!(m.multiply_projective(1.0, 2.0), (6.0, 7.0));
    }

    #[test]
    fn test_non_normal_translate_scales_by_weight() {
        let mut m =
            AffineTransform::from_rows([[1.0, 0.0, 0.5], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        m.translate(2.0, 4.0);
        assert_eq!(m.get(0, 0), 2.0);
        assert_eq!(m.get(0, 1), 2.0);
        assert_eq!(m.get(2, 0), 2.0);
        assert_eq!(m.get(2, 1), 4.0);
    }

    #[test]
    fn test_compose_matches_sequential() {
        let mut a = AffineTransform::identity();
        a.rotate(0.3).translate(2.0, 3.0);
        let mut b = AffineTransform::identity();
        b.scale(1.5, -1.0);
        let c = AffineTransform::compose(&a, &b);
        let (x1, y1) = a.multiply_normal(4.0, 5.0);
        assert!(approx_pt(c.multiply_normal(4.0, 5.0), b.multiply_normal(x1, y1)));
        assert_eq!(a.then(&b), c);
    }

    #[test]
    fn test_flip_is_self_inverse() {
        let mut flip = AffineTransform::identity();
        flip.scale(1.0, -1.0).translate(0.0, 792.0);
        let (x, y) = flip.multiply_normal(10.0, 20.0);
        assert_eq!((x, y), (10.0, 772.0));
        assert_eq!(flip.multiply_normal(x, y), (10.0, 20.0));
    }

    #[test]
    fn test_repeat_last_ops() {
        let mut m = AffineTransform::identity();
        m.translate(1.0, 2.0).translate_again();
        assert_eq!(m.multiply_normal(0.0, 0.0), (2.0, 4.0));

        let mut r = AffineTransform::identity();
        r.rotate(PI / 4.0).rotate_again();
        assert!(approx_pt(r.multiply_normal(1.0, 0.0), (0.0, 1.0)));

        let mut s = AffineTransform::identity();
        s.scale(2.0, 3.0).scale_again();
        assert_eq!(s.multiply_normal(1.0, 1.0), (4.0, 9.0));
    }

    #[test]
    fn test_transform_points_in_place() {
        let mut m = AffineTransform::identity();
        m.translate(1.0, 1.0);
        let mut pts = [0.0, 0.0, 2.0, 3.0];
        m.transform_points(&mut pts);
        assert_eq!(pts, [1.0, 1.0, 3.0, 4.0]);
    }

    #[test]
    fn test_affine_round_trip() {
        let m = AffineTransform::from_affine(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        assert_eq!(m.to_affine(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert!(m.is_normal());
        assert_eq!(m.transposed().get(0, 2), 5.0);
    }

    #[test]
    fn test_serde_skips_scratch() {
        let mut m = AffineTransform::identity();
        m.translate(3.0, 4.0);
        let json = serde_json::to_string(&m).unwrap();
        let back: AffineTransform = serde_json::from_str(&json).unwrap();
        assert_eq!(back.elements(), m.elements());
    }
}
