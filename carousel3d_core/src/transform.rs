// Copyright 2026 the Carousel3D Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal column-major 4×4 transform.
//!
//! Covers what composing an item's adjustment stack needs (identity,
//! translation, scale, multiply, point mapping) without pulling in a full
//! linear-algebra crate.

use core::ops::Mul;

use crate::point::Point3d;

/// A column-major 4×4 affine transform stored as `[[f64; 4]; 4]`.
///
/// Each inner array is one *column* of the matrix, matching the memory layout
/// used by GPU APIs. `a * b` applies `b` first, then `a`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3d {
    /// Four columns, each a 4-element array `[x, y, z, w]`.
    pub cols: [[f64; 4]; 4],
}

impl Transform3d {
    /// The 4×4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Returns column `i` (0-based).
    ///
    /// # Panics
    ///
    /// Panics if `i >= 4`.
    #[inline]
    #[must_use]
    pub const fn col(self, i: usize) -> [f64; 4] {
        self.cols[i]
    }

    /// Creates a pure translation transform.
    #[inline]
    #[must_use]
    pub const fn from_translation(offset: Point3d) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [offset.x, offset.y, offset.z, 1.0],
            ],
        }
    }

    /// Creates a non-uniform scale transform.
    #[inline]
    #[must_use]
    pub const fn from_scale(factors: Point3d) -> Self {
        Self {
            cols: [
                [factors.x, 0.0, 0.0, 0.0],
                [0.0, factors.y, 0.0, 0.0],
                [0.0, 0.0, factors.z, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Returns the translation part (column 3).
    #[inline]
    #[must_use]
    pub const fn translation(self) -> Point3d {
        let c = self.cols[3];
        Point3d::new(c[0], c[1], c[2])
    }

    /// Maps a point through this transform (affine; `w` is assumed to be 1).
    #[must_use]
    pub fn transform_point(self, p: Point3d) -> Point3d {
        let c = &self.cols;
        Point3d::new(
            c[0][0] * p.x + c[1][0] * p.y + c[2][0] * p.z + c[3][0],
            c[0][1] * p.x + c[1][1] * p.y + c[2][1] * p.z + c[3][1],
            c[0][2] * p.x + c[1][2] * p.y + c[2][2] * p.z + c[3][2],
        )
    }

    /// Is every element of this transform [finite]?
    ///
    /// [finite]: f64::is_finite
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.cols.iter().flatten().all(|v| v.is_finite())
    }
}

impl Default for Transform3d {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform3d {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let a = &self.cols;
        let b = &rhs.cols;
        let mut out = [[0.0_f64; 4]; 4];
        for (j, col) in out.iter_mut().enumerate() {
            for (i, v) in col.iter_mut().enumerate() {
                *v = a[0][i] * b[j][0] + a[1][i] * b[j][1] + a[2][i] * b[j][2] + a[3][i] * b[j][3];
            }
        }
        Self { cols: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_identity() {
        assert_eq!(Transform3d::default(), Transform3d::IDENTITY);
    }

    #[test]
    fn identity_multiply() {
        let t = Transform3d::from_translation(Point3d::new(1.0, 2.0, 3.0));
        assert_eq!(Transform3d::IDENTITY * t, t);
        assert_eq!(t * Transform3d::IDENTITY, t);
    }

    #[test]
    fn scale_then_translate() {
        let s = Transform3d::from_scale(Point3d::new(2.0, 2.0, 2.0));
        let t = Transform3d::from_translation(Point3d::new(3.0, 4.0, 0.0));
        // Scale first, then translate: T * S
        let combined = t * s;
        assert_eq!(combined.col(0), [2.0, 0.0, 0.0, 0.0]);
        assert_eq!(combined.translation(), Point3d::new(3.0, 4.0, 0.0));
        let p = combined.transform_point(Point3d::new(1.0, 1.0, 1.0));
        assert_eq!(p, Point3d::new(5.0, 6.0, 2.0));
    }

    #[test]
    fn translate_then_scale_scales_offset() {
        let s = Transform3d::from_scale(Point3d::new(2.0, 3.0, 1.0));
        let t = Transform3d::from_translation(Point3d::new(1.0, 1.0, 0.0));
        assert_eq!((s * t).translation(), Point3d::new(2.0, 3.0, 0.0));
    }

    #[test]
    fn nan_detected() {
        let mut t = Transform3d::IDENTITY;
        assert!(t.is_finite());
        t.cols[2][1] = f64::NAN;
        assert!(!t.is_finite());
    }
}
