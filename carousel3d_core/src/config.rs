// Copyright 2026 the Carousel3D Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ellipse configuration.
//!
//! [`EllipseConfig`] holds the layout ellipse (center, radii), its rotation
//! about the three axes, and whether items need back-to-front ordering. Values
//! are only written through validating setters, so a config in hand is always
//! usable: radii are positive and finite, rotations lie in `[0, 360)`.
//!
//! Each setter returns `Ok(true)` when the stored value changed, meaning the
//! next arrange pass will produce a different layout. Rejected writes leave
//! the previous value in place.

use core::fmt;

use kurbo::{Point, Vec2};

use crate::geometry;
use crate::point::Point3d;

/// Default radius along X.
pub const DEFAULT_WIDTH: f64 = 300.0;
/// Default radius along Y.
pub const DEFAULT_HEIGHT: f64 = 300.0;
/// Default tilt of the ellipse toward the viewer, in degrees.
pub const DEFAULT_ROTATION_X: f64 = 70.0;

/// One of the three rotation axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RotationAxis {
    /// Tilt toward or away from the viewer.
    X,
    /// Yaw.
    Y,
    /// Spin in the ellipse's plane; navigation drives this axis.
    Z,
}

impl RotationAxis {
    /// All three axes, in `X, Y, Z` order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Returns the axis as an array index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// Names a numeric field of [`EllipseConfig`] in errors and trace events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfigField {
    /// `center_x`
    CenterX,
    /// `center_y`
    CenterY,
    /// `center_z`
    CenterZ,
    /// `width`
    Width,
    /// `height`
    Height,
    /// `rotation_x`
    RotationX,
    /// `rotation_y`
    RotationY,
    /// `rotation_z`
    RotationZ,
}

impl ConfigField {
    /// Returns the field's name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CenterX => "center_x",
            Self::CenterY => "center_y",
            Self::CenterZ => "center_z",
            Self::Width => "width",
            Self::Height => "height",
            Self::RotationX => "rotation_x",
            Self::RotationY => "rotation_y",
            Self::RotationZ => "rotation_z",
        }
    }

    /// Returns the rotation field for `axis`.
    #[must_use]
    pub const fn rotation(axis: RotationAxis) -> Self {
        match axis {
            RotationAxis::X => Self::RotationX,
            RotationAxis::Y => Self::RotationY,
            RotationAxis::Z => Self::RotationZ,
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A rejected configuration write.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq)]
pub enum ConfigError {
    /// A radius was zero or negative.
    #[error("{field} must be positive, got {value}")]
    NonPositive {
        /// The field being written.
        field: ConfigField,
        /// The rejected value.
        value: f64,
    },
    /// A value was NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NonFinite {
        /// The field being written.
        field: ConfigField,
        /// The rejected value.
        value: f64,
    },
}

impl ConfigError {
    /// Returns the field the rejected write targeted.
    #[must_use]
    pub const fn field(&self) -> ConfigField {
        match *self {
            Self::NonPositive { field, .. } | Self::NonFinite { field, .. } => field,
        }
    }
}

/// Wraps an angle in degrees into `[0, 360)`.
///
/// Wraps rather than clamps: `370 → 10`, `-10 → 350`, `360 → 0`.
#[must_use]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let mut r = degrees % 360.0;
    if r < 0.0 {
        r += 360.0;
    }
    // A tiny negative remainder can round up to exactly 360.
    if r >= 360.0 { 0.0 } else { r + 0.0 }
}

fn finite(field: ConfigField, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

fn positive(field: ConfigField, value: f64) -> Result<f64, ConfigError> {
    let value = finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

/// The layout ellipse and its orientation.
#[derive(Clone, Debug, PartialEq)]
pub struct EllipseConfig {
    center: Point3d,
    width: f64,
    height: f64,
    rotation: [f64; 3],
    transparency_required: bool,
    // Derived from width and height.
    circumference: f64,
}

impl Default for EllipseConfig {
    fn default() -> Self {
        let circumference = geometry::circumference(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        Self {
            center: Point3d::ZERO,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            rotation: [DEFAULT_ROTATION_X, 0.0, 0.0],
            transparency_required: false,
            circumference,
        }
    }
}

impl EllipseConfig {
    /// Creates a config with the given radii and default everything else.
    ///
    /// # Errors
    ///
    /// Returns an error if either radius is not positive and finite.
    pub fn with_radii(width: f64, height: f64) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.set_width(width)?;
        config.set_height(height)?;
        Ok(config)
    }

    // -- Getters --

    /// Returns the ellipse center.
    #[inline]
    #[must_use]
    pub const fn center(&self) -> Point3d {
        self.center
    }

    /// Returns the center projected onto the ellipse plane.
    #[inline]
    #[must_use]
    pub const fn center_2d(&self) -> Point {
        Point::new(self.center.x, self.center.y)
    }

    /// Returns the radius along X.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Returns the radius along Y.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Returns `(width, height)` as a radii vector.
    #[inline]
    #[must_use]
    pub const fn radii(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Returns the rotation about `axis`, in degrees in `[0, 360)`.
    #[inline]
    #[must_use]
    pub const fn rotation(&self, axis: RotationAxis) -> f64 {
        self.rotation[axis.index()]
    }

    /// Returns the rotation about X, in degrees.
    #[inline]
    #[must_use]
    pub const fn rotation_x(&self) -> f64 {
        self.rotation[0]
    }

    /// Returns the rotation about Y, in degrees.
    #[inline]
    #[must_use]
    pub const fn rotation_y(&self) -> f64 {
        self.rotation[1]
    }

    /// Returns the rotation about Z, in degrees.
    #[inline]
    #[must_use]
    pub const fn rotation_z(&self) -> f64 {
        self.rotation[2]
    }

    /// Returns whether items are drawn back to front.
    #[inline]
    #[must_use]
    pub const fn transparency_required(&self) -> bool {
        self.transparency_required
    }

    /// Returns the cached perimeter of the ellipse.
    #[inline]
    #[must_use]
    pub const fn circumference(&self) -> f64 {
        self.circumference
    }

    // -- Setters --

    /// Sets the center.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonFinite`] for a NaN or infinite component.
    pub fn set_center(&mut self, center: Point3d) -> Result<bool, ConfigError> {
        let center = Point3d::new(
            finite(ConfigField::CenterX, center.x)?,
            finite(ConfigField::CenterY, center.y)?,
            finite(ConfigField::CenterZ, center.z)?,
        );
        Ok(replace(&mut self.center, center))
    }

    /// Sets the radius along X.
    ///
    /// # Errors
    ///
    /// Returns an error unless `width` is positive and finite.
    pub fn set_width(&mut self, width: f64) -> Result<bool, ConfigError> {
        let width = positive(ConfigField::Width, width)?;
        let changed = replace(&mut self.width, width);
        if changed {
            self.update_circumference();
        }
        Ok(changed)
    }

    /// Sets the radius along Y.
    ///
    /// # Errors
    ///
    /// Returns an error unless `height` is positive and finite.
    pub fn set_height(&mut self, height: f64) -> Result<bool, ConfigError> {
        let height = positive(ConfigField::Height, height)?;
        let changed = replace(&mut self.height, height);
        if changed {
            self.update_circumference();
        }
        Ok(changed)
    }

    /// Sets the rotation about `axis`, wrapping it into `[0, 360)`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonFinite`] for a NaN or infinite angle.
    pub fn set_rotation(&mut self, axis: RotationAxis, degrees: f64) -> Result<bool, ConfigError> {
        let degrees = normalize_degrees(finite(ConfigField::rotation(axis), degrees)?);
        Ok(replace(&mut self.rotation[axis.index()], degrees))
    }

    /// Sets the rotation about X. See [`set_rotation`](Self::set_rotation).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonFinite`] for a NaN or infinite angle.
    pub fn set_rotation_x(&mut self, degrees: f64) -> Result<bool, ConfigError> {
        self.set_rotation(RotationAxis::X, degrees)
    }

    /// Sets the rotation about Y. See [`set_rotation`](Self::set_rotation).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonFinite`] for a NaN or infinite angle.
    pub fn set_rotation_y(&mut self, degrees: f64) -> Result<bool, ConfigError> {
        self.set_rotation(RotationAxis::Y, degrees)
    }

    /// Sets the rotation about Z. See [`set_rotation`](Self::set_rotation).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonFinite`] for a NaN or infinite angle.
    pub fn set_rotation_z(&mut self, degrees: f64) -> Result<bool, ConfigError> {
        self.set_rotation(RotationAxis::Z, degrees)
    }

    /// Sets whether items are drawn back to front.
    ///
    /// Returns whether the flag changed.
    pub fn set_transparency_required(&mut self, required: bool) -> bool {
        replace(&mut self.transparency_required, required)
    }

    fn update_circumference(&mut self) {
        self.circumference = geometry::circumference(self.width, self.height);
    }
}

/// Stores `new` in `slot` and returns whether it differed.
fn replace<T: PartialEq>(slot: &mut T, new: T) -> bool {
    if *slot == new {
        false
    } else {
        *slot = new;
        true
    }
}
