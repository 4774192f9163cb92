// Copyright 2026 the Carousel3D Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Three-axis rotation via quaternion composition.
//!
//! Each axis angle becomes a unit quaternion; the three are multiplied in the
//! fixed order `qx * qy * qz` and the point is rotated by the sandwich product
//! `q * (p, 0) * q⁻¹`. Composing quaternions rather than Euler matrices avoids
//! the axis-order singularities that sequential matrix rotations run into.
//!
//! With this order the Z rotation acts first, then Y, then X. All rotations are
//! right-handed: a positive angle turns counter-clockwise when looking down the
//! positive axis toward the origin.

use core::ops::Mul;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::point::Point3d;

/// A quaternion `w + xi + yj + zk`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quaternion {
    /// `i` component.
    pub x: f64,
    /// `j` component.
    pub y: f64,
    /// `k` component.
    pub z: f64,
    /// Scalar component.
    pub w: f64,
}

impl Quaternion {
    /// The identity rotation.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Creates a unit quaternion rotating by `radians` about the unit vector
    /// `axis`.
    ///
    /// Uses the half-angle construction `w = cos(θ/2)`, `v = axis · sin(θ/2)`,
    /// so `radians` is the full rotation angle.
    #[must_use]
    pub fn from_axis_angle(axis: Point3d, radians: f64) -> Self {
        let half = radians * 0.5;
        let s = half.sin();
        Self {
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
            w: half.cos(),
        }
    }

    /// Embeds a point as a pure quaternion `(p, 0)`.
    #[inline]
    #[must_use]
    pub const fn pure(p: Point3d) -> Self {
        Self {
            x: p.x,
            y: p.y,
            z: p.z,
            w: 0.0,
        }
    }

    /// Returns the conjugate (the inverse, for unit quaternions).
    #[inline]
    #[must_use]
    pub const fn conjugate(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: self.w,
        }
    }

    /// Returns the vector part.
    #[inline]
    #[must_use]
    pub const fn vector(self) -> Point3d {
        Point3d::new(self.x, self.y, self.z)
    }

    /// Rotates `p` by this (unit) quaternion.
    #[inline]
    #[must_use]
    pub fn rotate(self, p: Point3d) -> Point3d {
        (self * Self::pure(p) * self.conjugate()).vector()
    }
}

impl Default for Quaternion {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Quaternion {
    type Output = Self;

    /// Hamilton product.
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let (a, b) = (self, rhs);
        Self {
            x: a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            y: a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            z: a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
            w: a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
        }
    }
}

const UNIT_X: Point3d = Point3d::new(1.0, 0.0, 0.0);
const UNIT_Y: Point3d = Point3d::new(0.0, 1.0, 0.0);
const UNIT_Z: Point3d = Point3d::new(0.0, 0.0, 1.0);

/// Returns the composed rotation `qx * qy * qz` for the given angles in
/// degrees.
#[must_use]
pub fn orientation(x_degrees: f64, y_degrees: f64, z_degrees: f64) -> Quaternion {
    let qx = Quaternion::from_axis_angle(UNIT_X, x_degrees.to_radians());
    let qy = Quaternion::from_axis_angle(UNIT_Y, y_degrees.to_radians());
    let qz = Quaternion::from_axis_angle(UNIT_Z, z_degrees.to_radians());
    qx * qy * qz
}

/// Rotates `point` about the X, Y, and Z axes by the given angles in degrees.
#[must_use]
pub fn rotate_point(point: Point3d, x_degrees: f64, y_degrees: f64, z_degrees: f64) -> Point3d {
    orientation(x_degrees, y_degrees, z_degrees).rotate(point)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: Point3d, b: Point3d) -> bool {
        (a - b).length() < EPS
    }

    #[test]
    fn zero_rotation_is_identity() {
        for p in [
            Point3d::new(1.0, 2.0, 3.0),
            Point3d::new(-300.0, 0.0, 12.5),
            Point3d::ZERO,
        ] {
            assert!(close(rotate_point(p, 0.0, 0.0, 0.0), p), "{p:?}");
        }
    }

    #[test]
    fn inverse_x_rotation_round_trips() {
        let p = Point3d::new(12.0, -300.0, 40.0);
        for x in [-170.0, -45.0, 0.0, 10.0, 70.0, 123.4, 359.0] {
            let back = rotate_point(rotate_point(p, x, 0.0, 0.0), -x, 0.0, 0.0);
            assert!(close(back, p), "x={x} back={back:?}");
        }
    }

    #[test]
    fn quarter_turns_are_right_handed() {
        // +90° about Z takes +X to +Y.
        let r = rotate_point(UNIT_X, 0.0, 0.0, 90.0);
        assert!(close(r, UNIT_Y), "{r:?}");
        // +90° about X takes +Y to +Z.
        let r = rotate_point(UNIT_Y, 90.0, 0.0, 0.0);
        assert!(close(r, UNIT_Z), "{r:?}");
        // +90° about Y takes +Z to +X.
        let r = rotate_point(UNIT_Z, 0.0, 90.0, 0.0);
        assert!(close(r, UNIT_X), "{r:?}");
    }

    #[test]
    fn z_applies_before_x() {
        // Z first: +X -> +Y, then X: +Y -> +Z.
        let r = rotate_point(UNIT_X, 90.0, 0.0, 90.0);
        assert!(close(r, UNIT_Z), "{r:?}");
    }

    #[test]
    fn rotation_preserves_length() {
        let p = Point3d::new(300.0, -120.0, 7.0);
        let r = rotate_point(p, 33.0, -71.0, 212.0);
        assert!((r.length() - p.length()).abs() < EPS);
    }

    #[test]
    fn tilted_top_of_circle_comes_forward() {
        // The layout tilts the ellipse by -rotation_x; with the default 70°
        // the top of a radius-300 circle swings toward the viewer.
        let r = rotate_point(Point3d::new(0.0, -300.0, 0.0), -70.0, 0.0, 0.0);
        let rad = 70.0_f64.to_radians();
        assert!(close(r, Point3d::new(0.0, -300.0 * rad.cos(), 300.0 * rad.sin())), "{r:?}");
    }
}
