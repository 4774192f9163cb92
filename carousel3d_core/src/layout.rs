// Copyright 2026 the Carousel3D Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measure and arrange passes.
//!
//! **Measure** asks the host for each item's desired size and records it as
//! the item's scale adjustment `(width, height, 0)`: items are flat unit quads
//! stretched to their measured size.
//!
//! **Arrange** places item `i` of `n` at arc length `i * C / n` along the
//! ellipse (`C` its circumference), starting at the top, then rotates that
//! point by `(-rotation_x, rotation_y, rotation_z)` and records it as the
//! item's translate adjustment. When transparency is required and some item
//! moved behind the previous furthest item, the render order is depth-sorted.
//!
//! The ellipse's `center_z` is not part of the placement; items always lie on
//! a plane through the origin before rotation.

use kurbo::Size;

use crate::adjustment::Adjustment;
use crate::backend::MeasureItems;
use crate::config::EllipseConfig;
use crate::geometry;
use crate::item::{ItemId, ItemStore};
use crate::point::Point3d;
use crate::rotation::rotate_point;

/// Result of a measure pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeasureOutcome {
    /// Monotonic pass counter.
    pub pass_index: u64,
    /// Number of items measured.
    pub item_count: usize,
    /// Size the carousel wants: the available size, with unbounded dimensions
    /// replaced by the largest item extent.
    pub desired_size: Size,
}

/// Result of an arrange pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrangeOutcome {
    /// Monotonic pass counter.
    pub pass_index: u64,
    /// Number of items placed.
    pub item_count: usize,
    /// Whether the pass found the render order possibly out of depth order.
    pub depth_sort_required: bool,
    /// Whether the render order was depth-sorted.
    pub depth_sorted: bool,
    /// The size the carousel was arranged in.
    pub final_size: Size,
}

/// Returns the layout position of the item at `order_index` out of `count`.
#[must_use]
pub fn item_position(config: &EllipseConfig, order_index: usize, count: usize) -> Point3d {
    let theta = geometry::slot_theta(order_index, count, config.circumference());
    let flat = geometry::point_on_ellipse(config.center_2d(), config.radii(), theta);
    rotate_point(
        flat.into(),
        -config.rotation_x(),
        config.rotation_y(),
        config.rotation_z(),
    )
}

/// Measures one item and stores its scale adjustment.
///
/// Returns the desired size the host reported.
pub fn measure_item(
    store: &mut ItemStore,
    id: ItemId,
    available: Size,
    measurer: &mut impl MeasureItems,
) -> Size {
    let size = measurer.measure(id, available);
    store.set_desired_size(id, size);
    store.upsert(
        id,
        Adjustment::Scale(Point3d::new(size.width, size.height, 0.0)),
    );
    size
}

/// Measures every item in host order.
pub fn measure(
    store: &mut ItemStore,
    available: Size,
    measurer: &mut impl MeasureItems,
    pass_index: u64,
) -> MeasureOutcome {
    let mut largest = Size::ZERO;
    for pos in 0..store.len() {
        let Some(id) = store.item_at_order(pos) else {
            break;
        };
        let size = measure_item(store, id, available, measurer);
        largest = Size::new(largest.width.max(size.width), largest.height.max(size.height));
    }
    let desired_size = Size::new(
        if available.width.is_finite() {
            available.width
        } else {
            largest.width
        },
        if available.height.is_finite() {
            available.height
        } else {
            largest.height
        },
    );
    MeasureOutcome {
        pass_index,
        item_count: store.len(),
        desired_size,
    }
}

/// Places every item on the ellipse and, when transparency is required,
/// restores back-to-front render order.
pub fn arrange(
    config: &EllipseConfig,
    store: &mut ItemStore,
    final_size: Size,
    pass_index: u64,
) -> ArrangeOutcome {
    let count = store.len();
    if count == 0 {
        return ArrangeOutcome {
            pass_index,
            item_count: 0,
            depth_sort_required: false,
            depth_sorted: false,
            final_size,
        };
    }

    let furthest = furthest_item(store);
    let mut depth_sort_required = furthest.is_none();

    for pos in 0..count {
        let Some(id) = store.item_at_order(pos) else {
            break;
        };
        let previous_z = store.translation(id).map(|t| t.z);
        let position = item_position(config, pos, count);
        store.upsert(id, Adjustment::Translate(position));

        if let Some((furthest_id, furthest_z)) = furthest {
            let was_behind = previous_z.is_some_and(|z| z <= furthest_z);
            if id != furthest_id && position.z <= furthest_z && !was_behind {
                depth_sort_required = true;
            }
        }
    }

    if !store.is_depth_ordered() {
        depth_sort_required = true;
    }

    let depth_sorted = config.transparency_required() && depth_sort_required;
    if depth_sorted {
        store.sort_by_depth();
    }

    ArrangeOutcome {
        pass_index,
        item_count: count,
        depth_sort_required,
        depth_sorted,
        final_size,
    }
}

/// Returns the item with the smallest translate Z and that Z, the first in
/// render order winning ties.
fn furthest_item(store: &ItemStore) -> Option<(ItemId, f64)> {
    let mut best: Option<(ItemId, f64)> = None;
    for id in store.render_order_ids() {
        let Some(z) = store.translation(id).map(|t| t.z) else {
            continue;
        };
        if z.is_nan() {
            continue;
        }
        if best.is_none_or(|(_, best_z)| z < best_z) {
            best = Some((id, z));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    #[cfg(not(feature = "std"))]
    use kurbo::common::FloatFuncs as _;

    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: Point3d, b: Point3d) -> bool {
        (a - b).length() < EPS
    }

    fn flat_circle() -> EllipseConfig {
        let mut config = EllipseConfig::default();
        config.set_rotation_x(0.0).unwrap();
        config
    }

    fn store_with(n: usize) -> (ItemStore, Vec<ItemId>) {
        let mut store = ItemStore::new();
        let ids = (0..n).map(|_| store.push()).collect();
        (store, ids)
    }

    #[test]
    fn four_items_on_flat_circle() {
        let config = flat_circle();
        let (mut store, ids) = store_with(4);
        let out = arrange(&config, &mut store, Size::new(800.0, 600.0), 0);
        assert_eq!(out.item_count, 4);
        let expected = [
            Point3d::new(0.0, -300.0, 0.0),
            Point3d::new(300.0, 0.0, 0.0),
            Point3d::new(0.0, 300.0, 0.0),
            Point3d::new(-300.0, 0.0, 0.0),
        ];
        for (id, want) in ids.iter().zip(expected) {
            let got = store.translation(*id).unwrap();
            assert!(close(got, want), "{id:?}: {got:?} != {want:?}");
        }
    }

    #[test]
    fn huge_radii_still_place_items() {
        let mut config = EllipseConfig::with_radii(1e308, 1e308).unwrap();
        config.set_rotation_x(0.0).unwrap();
        assert!(config.circumference().is_infinite());
        for i in 0..4 {
            let p = item_position(&config, i, 4);
            assert!(p.is_finite(), "slot {i}: {p:?}");
        }
        let top = item_position(&config, 0, 4);
        assert!((top.y / 1e308 + 1.0).abs() < EPS, "{top:?}");
    }

    #[test]
    fn default_tilt_brings_first_item_forward() {
        let config = EllipseConfig::default();
        let (mut store, ids) = store_with(3);
        arrange(&config, &mut store, Size::ZERO, 0);
        let rad = 70.0_f64.to_radians();
        let first = store.translation(ids[0]).unwrap();
        assert!(close(first, Point3d::new(0.0, -300.0 * rad.cos(), 300.0 * rad.sin())));
        for id in &ids[1..] {
            assert!(store.translation(*id).unwrap().z < first.z);
        }
    }

    #[test]
    fn empty_arrange_is_a_no_op() {
        let config = EllipseConfig::default();
        let mut store = ItemStore::new();
        let out = arrange(&config, &mut store, Size::new(10.0, 10.0), 3);
        assert_eq!(out.item_count, 0);
        assert!(!out.depth_sort_required);
        assert!(!out.depth_sorted);
        assert_eq!(out.pass_index, 3);
    }

    #[test]
    fn arrange_keeps_host_transforms() {
        let config = EllipseConfig::default();
        let (mut store, ids) = store_with(2);
        let host = crate::transform::Transform3d::from_scale(Point3d::new(-1.0, 1.0, 1.0));
        store.push_host_transform(ids[0], host);
        arrange(&config, &mut store, Size::ZERO, 0);
        arrange(&config, &mut store, Size::ZERO, 1);
        let entries = store.transforms(ids[0]).entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], Adjustment::Host(host));
    }

    #[test]
    fn transparency_sorts_back_to_front() {
        let mut config = EllipseConfig::default();
        config.set_transparency_required(true);
        let (mut store, _) = store_with(6);
        let out = arrange(&config, &mut store, Size::ZERO, 0);
        assert!(out.depth_sort_required, "first arrange always checks");
        assert!(out.depth_sorted);
        assert!(store.is_depth_ordered());

        // Spin a little: the order must stay back to front.
        for step in 1..40 {
            config.set_rotation_z(f64::from(step) * 13.0).unwrap();
            arrange(&config, &mut store, Size::ZERO, step as u64);
            assert!(store.is_depth_ordered(), "step {step}");
        }
    }

    #[test]
    fn opaque_layout_leaves_render_order_alone() {
        let config = EllipseConfig::default();
        let (mut store, ids) = store_with(5);
        let out = arrange(&config, &mut store, Size::ZERO, 0);
        assert!(out.depth_sort_required);
        assert!(!out.depth_sorted);
        let render: Vec<_> = store.render_order_ids().collect();
        assert_eq!(render, ids);
    }

    #[test]
    fn unchanged_layout_needs_no_sort() {
        let mut config = EllipseConfig::default();
        config.set_transparency_required(true);
        let (mut store, _) = store_with(5);
        arrange(&config, &mut store, Size::ZERO, 0);
        let out = arrange(&config, &mut store, Size::ZERO, 1);
        assert!(!out.depth_sort_required);
        assert!(!out.depth_sorted);
    }

    #[test]
    fn measure_stores_flat_scale() {
        let (mut store, ids) = store_with(3);
        let mut measurer = |id: ItemId, _available: Size| {
            let w = 10.0 * f64::from(id.index() + 1);
            Size::new(w, w / 2.0)
        };
        let out = measure(&mut store, Size::new(f64::INFINITY, 500.0), &mut measurer, 0);
        assert_eq!(out.item_count, 3);
        assert_eq!(out.desired_size, Size::new(30.0, 500.0));
        assert_eq!(store.scale(ids[1]), Some(Point3d::new(20.0, 10.0, 0.0)));
        assert_eq!(store.desired_size(ids[2]), Size::new(30.0, 15.0));
    }

    #[test]
    fn measure_then_arrange_compose() {
        let config = flat_circle();
        let (mut store, ids) = store_with(4);
        let mut measurer = |_: ItemId, _: Size| Size::new(40.0, 20.0);
        measure(&mut store, Size::new(100.0, 100.0), &mut measurer, 0);
        arrange(&config, &mut store, Size::new(100.0, 100.0), 0);
        let m = store.composed_transform(ids[1]);
        // Unit quad corner (1, 1) scaled to (40, 20), then moved to (300, 0).
        let corner = m.transform_point(Point3d::new(1.0, 1.0, 0.0));
        assert!(close(corner, Point3d::new(340.0, 20.0, 0.0)), "{corner:?}");
    }
}
