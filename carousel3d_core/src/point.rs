// Copyright 2026 the Carousel3D Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Three-component point / vector type.

use core::ops::{Add, Mul, Neg, Sub};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// A point (or free vector) in 3D space.
///
/// The same type is used for positions, scale factors, and direction vectors;
/// callers give it meaning by context.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point3d {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component (depth; larger is nearer the viewer).
    pub z: f64,
}

impl Point3d {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a point from its components.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Dot product.
    #[inline]
    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product `self × other`.
    #[inline]
    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Euclidean length.
    #[inline]
    #[must_use]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Returns the unit vector in the same direction, or `None` if the length
    /// is zero or not finite.
    #[must_use]
    pub fn normalize(self) -> Option<Self> {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            Some(self * (1.0 / len))
        } else {
            None
        }
    }

    /// Unsigned angle between two vectors, in radians, in `[0, pi]`.
    ///
    /// Uses `atan2(|a × b|, a · b)`, which stays accurate for nearly parallel
    /// vectors where `acos` loses precision. Either vector being zero yields
    /// `0.0`.
    #[must_use]
    pub fn angle_between(self, other: Self) -> f64 {
        self.cross(other).length().atan2(self.dot(other))
    }

    /// Is every component [finite]?
    ///
    /// [finite]: f64::is_finite
    #[inline]
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Point3d {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3d {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Point3d {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Point3d {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl From<kurbo::Point> for Point3d {
    /// Lifts a 2D point into the `z = 0` plane.
    #[inline]
    fn from(p: kurbo::Point) -> Self {
        Self::new(p.x, p.y, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use core::f64::consts::{FRAC_PI_2, PI};

    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn cross_of_basis_vectors() {
        let x = Point3d::new(1.0, 0.0, 0.0);
        let y = Point3d::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(y), Point3d::new(0.0, 0.0, 1.0));
        assert_eq!(y.cross(x), Point3d::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn normalize_zero_is_none() {
        assert!(Point3d::ZERO.normalize().is_none());
        let n = Point3d::new(3.0, 4.0, 0.0).normalize().unwrap();
        assert!((n.length() - 1.0).abs() < EPS);
    }

    #[test]
    fn angle_between_cases() {
        let a = Point3d::new(1.0, 0.0, 0.0);
        assert!(a.angle_between(a).abs() < EPS);
        assert!((a.angle_between(Point3d::new(0.0, 2.0, 0.0)) - FRAC_PI_2).abs() < EPS);
        assert!((a.angle_between(-a) - PI).abs() < EPS);
        assert_eq!(a.angle_between(Point3d::ZERO), 0.0);
    }

    #[test]
    fn lift_from_2d() {
        let p: Point3d = kurbo::Point::new(2.0, -3.0).into();
        assert_eq!(p, Point3d::new(2.0, -3.0, 0.0));
    }
}
