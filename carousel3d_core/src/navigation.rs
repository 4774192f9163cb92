// Copyright 2026 the Carousel3D Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Front-item selection and rotate-into-view math.
//!
//! Navigation works entirely in terms of the Z rotation: bringing an item to
//! the front means spinning the ellipse in its own plane until the item sits
//! where slot 0 would sit with no Z rotation (the *front anchor*).
//!
//! The angle to spin by is the angle between the anchor and the item's
//! current position, both taken as vectors from the origin. Its sign comes
//! from the Y component of `anchor × item`, so the ellipse always turns the
//! short way round.

use core::f64::consts::FRAC_PI_2;

use crate::animation::RotationAnimation;
use crate::config::EllipseConfig;
use crate::geometry;
use crate::item::{ItemId, ItemStore};
use crate::point::Point3d;
use crate::rotation::rotate_point;

/// Stepping direction for [`Carousel::rotate_step`](crate::Carousel::rotate_step).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Bring the previous item (lower order index) to the front.
    Left,
    /// Bring the next item (higher order index) to the front.
    Right,
}

impl Direction {
    /// Returns the order-index step: `-1` for left, `+1` for right.
    #[inline]
    #[must_use]
    pub const fn step(self) -> isize {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }
}

/// What a navigation call did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Navigation {
    /// The item being brought into view.
    pub target: ItemId,
    /// The front item before navigating, when stepping.
    pub from_item: Option<ItemId>,
    /// Signed angle between the front anchor and the target, in degrees.
    pub angle: f64,
    /// Z rotation before navigating.
    pub from_rotation: f64,
    /// Z rotation to rotate to (unwrapped).
    pub to_rotation: f64,
    /// The animation handed to the host, or `None` when the rotation was
    /// applied immediately.
    pub animation: Option<RotationAnimation>,
    /// A Z animation this call replaced or stopped.
    pub superseded: Option<RotationAnimation>,
}

/// Returns the item currently nearest the viewer.
///
/// With transparency off this is the item with the largest translate Z, ties
/// going to the lowest order index; items that have not been arranged are
/// ignored. With transparency on the render order is kept back to front, so
/// the last arranged item in it is the front item.
#[must_use]
pub fn front_most_item(config: &EllipseConfig, store: &ItemStore) -> Option<ItemId> {
    if config.transparency_required() {
        // Newly added items sit at the end of the render order until arranged.
        return store
            .render_order_ids()
            .rev()
            .find(|&id| store.translation(id).is_some());
    }
    let mut best: Option<(ItemId, f64)> = None;
    for id in store.items() {
        let Some(z) = store.translation(id).map(|t| t.z) else {
            continue;
        };
        if z.is_nan() {
            continue;
        }
        // Host order visits lower order indices first, so `>` keeps the
        // lowest index among equals.
        if best.is_none_or(|(_, best_z)| z > best_z) {
            best = Some((id, z));
        }
    }
    best.map(|(id, _)| id)
}

/// Returns the item `direction` steps away from `from`, wrapping around.
///
/// Returns `None` when fewer than two items exist.
#[must_use]
pub fn step_target(store: &ItemStore, from: ItemId, direction: Direction) -> Option<ItemId> {
    let count = store.len();
    if count < 2 {
        return None;
    }
    let count = isize::try_from(count).ok()?;
    let current = isize::try_from(store.order_index(from)).ok()?;
    let next = (current + direction.step()).rem_euclid(count);
    store.item_at_order(next.unsigned_abs())
}

/// Returns the front anchor: where slot 0 sits with only the X tilt applied.
#[must_use]
pub fn front_anchor(config: &EllipseConfig) -> Point3d {
    let top = geometry::point_on_ellipse(config.center_2d(), config.radii(), -FRAC_PI_2);
    rotate_point(top.into(), -config.rotation_x(), 0.0, 0.0)
}

/// Returns the signed angle, in degrees, from the front anchor to `position`.
///
/// Subtracting it from the Z rotation brings `position` to the front. Returns
/// `None` when either vector has zero length.
#[must_use]
pub fn signed_angle_to(config: &EllipseConfig, position: Point3d) -> Option<f64> {
    let front = front_anchor(config).normalize()?;
    let target = position.normalize()?;
    let angle = front.angle_between(target).to_degrees();
    let y = front.cross(target).y;
    let direction = if y > 0.0 {
        1.0
    } else if y < 0.0 {
        -1.0
    } else {
        0.0
    };
    Some(angle * direction)
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    use kurbo::Size;

    use super::*;
    use crate::layout;

    fn arranged(config: &EllipseConfig, n: usize) -> (ItemStore, Vec<ItemId>) {
        let mut store = ItemStore::new();
        let ids: Vec<_> = (0..n).map(|_| store.push()).collect();
        layout::arrange(config, &mut store, Size::ZERO, 0);
        (store, ids)
    }

    #[test]
    fn front_item_is_slot_zero_by_default() {
        let config = EllipseConfig::default();
        let (store, ids) = arranged(&config, 5);
        assert_eq!(front_most_item(&config, &store), Some(ids[0]));
    }

    #[test]
    fn no_front_item_before_arrange() {
        let config = EllipseConfig::default();
        let mut store = ItemStore::new();
        store.push();
        assert_eq!(front_most_item(&config, &store), None);
        assert_eq!(front_most_item(&config, &ItemStore::new()), None);
    }

    #[test]
    fn ties_go_to_lowest_order_index() {
        // Flat circle: every item has z = 0.
        let mut config = EllipseConfig::default();
        config.set_rotation_x(0.0).unwrap();
        let (store, ids) = arranged(&config, 4);
        assert_eq!(front_most_item(&config, &store), Some(ids[0]));
    }

    #[test]
    fn transparent_front_is_last_in_render_order() {
        let mut config = EllipseConfig::default();
        config.set_transparency_required(true);
        let (store, ids) = arranged(&config, 5);
        assert_eq!(store.render_order_ids().last(), Some(ids[0]));
        assert_eq!(front_most_item(&config, &store), Some(ids[0]));
    }

    #[test]
    fn transparent_front_skips_unarranged_items() {
        let mut config = EllipseConfig::default();
        config.set_transparency_required(true);
        let (mut store, ids) = arranged(&config, 3);
        let fresh = store.push();
        assert_eq!(store.render_order_ids().last(), Some(fresh));
        assert_eq!(front_most_item(&config, &store), Some(ids[0]));

        let mut empty = ItemStore::new();
        empty.push();
        assert_eq!(front_most_item(&config, &empty), None);
    }

    #[test]
    fn stepping_wraps() {
        let config = EllipseConfig::default();
        let (store, ids) = arranged(&config, 3);
        assert_eq!(step_target(&store, ids[2], Direction::Right), Some(ids[0]));
        assert_eq!(step_target(&store, ids[0], Direction::Left), Some(ids[2]));
        assert_eq!(step_target(&store, ids[1], Direction::Right), Some(ids[2]));
        let (single, one) = arranged(&config, 1);
        assert_eq!(step_target(&single, one[0], Direction::Right), None);
    }

    #[test]
    fn front_item_needs_no_rotation() {
        let config = EllipseConfig::default();
        let (store, ids) = arranged(&config, 3);
        let angle = signed_angle_to(&config, store.translation(ids[0]).unwrap()).unwrap();
        assert!(angle.abs() < 1e-6, "{angle}");
    }

    #[test]
    fn opposite_sides_have_opposite_signs() {
        let config = EllipseConfig::default();
        let (store, ids) = arranged(&config, 4);
        let right = signed_angle_to(&config, store.translation(ids[1]).unwrap()).unwrap();
        let left = signed_angle_to(&config, store.translation(ids[3]).unwrap()).unwrap();
        assert!(right * left < 0.0, "{right} {left}");
        assert!((right.abs() - left.abs()).abs() < 1e-9);
    }

    #[test]
    fn zero_vector_has_no_angle() {
        let config = EllipseConfig::default();
        assert_eq!(signed_angle_to(&config, Point3d::ZERO), None);
    }
}
