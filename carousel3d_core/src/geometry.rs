// Copyright 2026 the Carousel3D Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ellipse parametrization.
//!
//! The layout ellipse is described by a center and a pair of radii (the
//! configuration calls them width and height). Points are found by the
//! standard parametrization
//!
//! ```text
//! x = cx + rx * cos(theta)
//! y = cy + ry * sin(theta)
//! ```
//!
//! and the perimeter is approximated with Ramanujan's second formula, which is
//! exact for circles and within a few parts per million for moderate
//! eccentricities.

use core::f64::consts::{FRAC_PI_2, PI, TAU};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};

/// Returns the point on the ellipse at parametric angle `theta` (radians).
///
/// `theta` may be any real value; the result is periodic in `TAU`.
#[inline]
#[must_use]
pub fn point_on_ellipse(center: Point, radii: Vec2, theta: f64) -> Point {
    Point::new(
        center.x + radii.x * theta.cos(),
        center.y + radii.y * theta.sin(),
    )
}

/// Approximates the circumference of an ellipse with radii `a` and `b` using
/// Ramanujan's second approximation.
///
/// `a = b = 0` returns `0.0` rather than NaN.
#[must_use]
pub fn circumference(a: f64, b: f64) -> f64 {
    let sum = a + b;
    if sum == 0.0 {
        return 0.0;
    }
    let diff = a - b;
    let h = (diff * diff) / (sum * sum);
    PI * sum * (1.0 + 3.0 * h / (10.0 + (4.0 - 3.0 * h).sqrt()))
}

/// Returns the parametric angle of slot `order_index` out of `count` evenly
/// spaced slots along an ellipse with the given circumference.
///
/// Slot 0 sits at the top of the ellipse (`theta = -pi/2`). A non-positive
/// circumference or a zero count yields the angle of slot 0.
///
/// Equal arc spacing of `circumference / count` reduces to an equal share of
/// the full turn, so the circumference itself may overflow to infinity.
#[must_use]
pub fn slot_theta(order_index: usize, count: usize, circumference: f64) -> f64 {
    if count == 0 || circumference <= 0.0 {
        return -FRAC_PI_2;
    }
    TAU * (order_index as f64 / count as f64) - FRAC_PI_2
}
