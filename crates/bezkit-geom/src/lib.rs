//! # BezKit Geom
//!
//! Geometry primitives for the BezKit document model.
//!
//! ## Features
//!
//! - **Kernel**: stateless point operations (rotate/scale/translate around a
//!   pivot, signed polygon area, point-in-polygon, angle of a vector)
//! - **AffineTransform**: 3x3 matrix with accumulating translate, scale,
//!   rotate and shear, plus normal and projective point multiplication
//! - **Bounds**: axis-aligned boxes with associative union
//!
//! ## Conventions
//!
//! Points are row vectors multiplied on the left of the matrix, so the
//! translation lives in row 2:
//!
//! ```text
//!              | e00 e01 e02 |
//! [x y 1]  ·   | e10 e11 e12 |   =  [x' y' w]
//!              | e20 e21 e22 |
//! ```

pub mod bounds;
pub mod kernel;
pub mod matrix;

pub use bounds::{Bounds, Point};
pub use matrix::AffineTransform;

/// 2π, used for angle normalization.
pub const TWO_PI: f64 = std::f64::consts::PI * 2.0;
