// Copyright 2026 the Carousel3D Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The carousel engine: configuration, items, layout, and navigation in one
//! place.
//!
//! [`Carousel`] is the type hosts talk to. It owns the [`EllipseConfig`], the
//! [`ItemStore`], and the outstanding rotation animations. Everything is
//! pull-based: setters report whether a relayout is required, and the host
//! calls [`Carousel::arrange`] when it is ready.
//!
//! Calls that name an item which is no longer present are silent no-ops.
//! Hosts routinely race removals against navigation, so a stale [`ItemId`]
//! here returns `None` or `false` rather than panicking like the lower-level
//! [`ItemStore`] does.

use core::time::Duration;

use kurbo::Size;

use crate::adjustment::TransformStack;
use crate::animation::{AnimationSlots, ROTATE_INTO_VIEW_DURATION, RotationAnimation};
use crate::backend::MeasureItems;
use crate::config::{ConfigError, ConfigField, EllipseConfig, RotationAxis};
use crate::item::{ItemChanges, ItemId, ItemStore};
use crate::layout::{self, ArrangeOutcome, MeasureOutcome};
use crate::navigation::{self, Direction, Navigation};
use crate::point::Point3d;
use crate::transform::Transform3d;

/// A 3D elliptical carousel.
#[derive(Debug, Default)]
pub struct Carousel {
    config: EllipseConfig,
    store: ItemStore,
    animations: AnimationSlots,
    next_pass: u64,
    viewport_size: Size,
}

impl Carousel {
    /// Creates an empty carousel with the default ellipse.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty carousel with the given ellipse.
    #[must_use]
    pub fn with_ellipse(config: EllipseConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    // -- Configuration --

    /// Returns the ellipse configuration.
    #[inline]
    #[must_use]
    pub fn ellipse(&self) -> &EllipseConfig {
        &self.config
    }

    /// Returns the ellipse configuration for in-place edits through its
    /// validated setters.
    #[inline]
    pub fn ellipse_mut(&mut self) -> &mut EllipseConfig {
        &mut self.config
    }

    /// Replaces the ellipse configuration. Returns whether it changed, in
    /// which case a relayout is required.
    pub fn set_ellipse(&mut self, config: EllipseConfig) -> bool {
        if self.config == config {
            return false;
        }
        self.config = config;
        true
    }

    // -- Items --

    /// Mirrors a change in the host's collection.
    ///
    /// `removed` is dropped first (ignored when stale), then a new item is
    /// inserted at host position `added` (clamped to the end). Returns the new
    /// item's handle.
    pub fn on_items_changed(
        &mut self,
        added: Option<usize>,
        removed: Option<ItemId>,
    ) -> Option<ItemId> {
        if let Some(id) = removed {
            self.remove_item(id);
        }
        added.map(|index| self.insert_item(index))
    }

    /// Appends an item to the end of the host order.
    pub fn add_item(&mut self) -> ItemId {
        self.store.push()
    }

    /// Inserts an item at host position `index`, clamped to the end.
    pub fn insert_item(&mut self, index: usize) -> ItemId {
        self.store.insert(index.min(self.store.len()))
    }

    /// Removes an item. Returns `false` when the handle is stale.
    pub fn remove_item(&mut self, id: ItemId) -> bool {
        if !self.store.is_alive(id) {
            return false;
        }
        self.store.remove(id);
        true
    }

    /// Returns the number of items.
    #[inline]
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.store.len()
    }

    /// Returns the items in host order.
    pub fn items(&self) -> impl ExactSizeIterator<Item = ItemId> + '_ {
        self.store.items()
    }

    /// Returns whether `id` refers to a present item.
    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.store.is_alive(id)
    }

    // -- Layout --

    /// Runs a measure pass: asks `measurer` for every item's desired size
    /// and records it as the item's scale.
    pub fn measure(
        &mut self,
        available: Size,
        measurer: &mut impl MeasureItems,
    ) -> MeasureOutcome {
        let pass_index = self.bump_pass();
        layout::measure(&mut self.store, available, measurer, pass_index)
    }

    /// Measures a single item. Returns `None` when the handle is stale.
    pub fn measure_item(
        &mut self,
        id: ItemId,
        available: Size,
        measurer: &mut impl MeasureItems,
    ) -> Option<Size> {
        self.store
            .is_alive(id)
            .then(|| layout::measure_item(&mut self.store, id, available, measurer))
    }

    /// Runs an arrange pass: places every item on the ellipse and, when
    /// transparency is required, restores back-to-front render order.
    pub fn arrange(&mut self, final_size: Size) -> ArrangeOutcome {
        let pass_index = self.bump_pass();
        self.viewport_size = final_size;
        layout::arrange(&self.config, &mut self.store, final_size, pass_index)
    }

    /// Returns the size of the last arrange pass.
    #[inline]
    #[must_use]
    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    /// Returns the number of layout passes run so far, which is also the
    /// index the next pass will get.
    #[inline]
    #[must_use]
    pub fn pass_count(&self) -> u64 {
        self.next_pass
    }

    fn bump_pass(&mut self) -> u64 {
        let pass = self.next_pass;
        self.next_pass += 1;
        pass
    }

    // -- Navigation --

    /// Returns the item currently nearest the viewer.
    #[must_use]
    pub fn front_most_item(&self) -> Option<ItemId> {
        navigation::front_most_item(&self.config, &self.store)
    }

    /// Brings the item next to the front item into view.
    ///
    /// Returns `None` when there are fewer than two items or nothing has been
    /// arranged yet.
    pub fn rotate_step(&mut self, direction: Direction, animated: bool) -> Option<Navigation> {
        let front = self.front_most_item()?;
        let target = navigation::step_target(&self.store, front, direction)?;
        let mut nav = self.animate_into_view(target, animated)?;
        nav.from_item = Some(front);
        Some(nav)
    }

    /// Rotates the ellipse about Z so that `id` ends up at the front.
    ///
    /// When `animated`, the change is handed back as a [`RotationAnimation`]
    /// the host must play and complete; otherwise the rotation is written
    /// immediately and any Z animation in flight is stopped. Returns `None`
    /// for a stale handle or an item that has not been arranged.
    pub fn animate_into_view(&mut self, id: ItemId, animated: bool) -> Option<Navigation> {
        if !self.store.is_alive(id) {
            return None;
        }
        let position = self.store.translation(id)?;
        let angle = navigation::signed_angle_to(&self.config, position)?;
        let from_rotation = self.config.rotation_z();
        let to_rotation = from_rotation - angle;

        let (animation, superseded) = if animated {
            let (anim, superseded) = self.animations.start(
                RotationAxis::Z,
                from_rotation,
                to_rotation,
                ROTATE_INTO_VIEW_DURATION,
            );
            (Some(anim), superseded)
        } else {
            let stopped = self.animations.stop(RotationAxis::Z);
            self.config.set_rotation_z(to_rotation).ok()?;
            (None, stopped)
        };

        Some(Navigation {
            target: id,
            from_item: None,
            angle,
            from_rotation,
            to_rotation,
            animation,
            superseded,
        })
    }

    // -- Animation --

    /// Starts animating the rotation about `axis` from its current value to
    /// `to` degrees (unwrapped).
    ///
    /// Returns the new animation and the one it superseded, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonFinite`] when `to` is NaN or infinite.
    pub fn animate_rotation(
        &mut self,
        axis: RotationAxis,
        to: f64,
        duration: Duration,
    ) -> Result<(RotationAnimation, Option<RotationAnimation>), ConfigError> {
        if !to.is_finite() {
            return Err(ConfigError::NonFinite {
                field: ConfigField::rotation(axis),
                value: to,
            });
        }
        let from = self.config.rotation(axis);
        Ok(self.animations.start(axis, from, to, duration))
    }

    /// Writes a transient value of a running animation.
    ///
    /// Returns `Ok(true)` when the rotation changed, `Ok(false)` when it did
    /// not or `anim` has been superseded.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonFinite`] when `value` is NaN or infinite.
    pub fn set_animated_rotation(
        &mut self,
        anim: &RotationAnimation,
        value: f64,
    ) -> Result<bool, ConfigError> {
        if !self.animations.is_current(anim) {
            return Ok(false);
        }
        self.config.set_rotation(anim.axis, value)
    }

    /// Completes `anim`, writing its end value.
    ///
    /// Returns `false` when `anim` has been superseded or stopped.
    pub fn complete_animation(&mut self, anim: &RotationAnimation) -> bool {
        if !self.animations.finish(anim) {
            return false;
        }
        self.config.set_rotation(anim.axis, anim.to).is_ok()
    }

    /// Stops the animation on `axis`, keeping the current value.
    pub fn stop_animation(&mut self, axis: RotationAxis) -> Option<RotationAnimation> {
        self.animations.stop(axis)
    }

    /// Returns the outstanding animation on `axis`.
    #[must_use]
    pub fn active_animation(&self, axis: RotationAxis) -> Option<&RotationAnimation> {
        self.animations.active(axis)
    }

    // -- Queries --

    /// Returns the items in draw order, furthest first once depth-sorted.
    pub fn render_order(&self) -> impl ExactSizeIterator<Item = ItemId> + '_ {
        self.store.render_order_ids()
    }

    /// Returns the item's position in the host order.
    #[must_use]
    pub fn order_index(&self, id: ItemId) -> Option<usize> {
        self.store
            .is_alive(id)
            .then(|| self.store.order_index(id))
    }

    /// Returns the item's translate adjustment.
    #[must_use]
    pub fn translation(&self, id: ItemId) -> Option<Point3d> {
        self.live(id).and_then(|s| s.translation(id))
    }

    /// Returns the item's scale adjustment.
    #[must_use]
    pub fn scale(&self, id: ItemId) -> Option<Point3d> {
        self.live(id).and_then(|s| s.scale(id))
    }

    /// Returns the item's last measured size.
    #[must_use]
    pub fn desired_size(&self, id: ItemId) -> Option<Size> {
        self.live(id).map(|s| s.desired_size(id))
    }

    /// Returns the item's adjustment stack.
    #[must_use]
    pub fn transforms(&self, id: ItemId) -> Option<&TransformStack> {
        self.live(id).map(|s| s.transforms(id))
    }

    /// Returns the matrix the item is drawn with.
    #[must_use]
    pub fn composed_transform(&self, id: ItemId) -> Option<Transform3d> {
        self.live(id).map(|s| s.composed_transform(id))
    }

    /// Adds a host transform applied before the carousel's own adjustments.
    /// Returns `false` when the handle is stale.
    pub fn push_host_transform(&mut self, id: ItemId, transform: Transform3d) -> bool {
        if !self.store.is_alive(id) {
            return false;
        }
        self.store.push_host_transform(id, transform);
        true
    }

    /// Drains the changes accumulated since the last call.
    pub fn take_changes(&mut self) -> ItemChanges {
        self.store.take_changes()
    }

    /// Drains changes into `changes`, reusing its allocations.
    pub fn take_changes_into(&mut self, changes: &mut ItemChanges) {
        self.store.take_changes_into(changes);
    }

    /// Returns the underlying item store.
    #[inline]
    #[must_use]
    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    fn live(&self, id: ItemId) -> Option<&ItemStore> {
        self.store.is_alive(id).then_some(&self.store)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    const EPS: f64 = 1e-6;

    fn carousel_with(n: usize) -> (Carousel, Vec<ItemId>) {
        let mut c = Carousel::new();
        let ids = (0..n).map(|_| c.add_item()).collect();
        c.arrange(Size::new(800.0, 600.0));
        (c, ids)
    }

    fn angle_close(a: f64, b: f64) -> bool {
        let d = (a - b).rem_euclid(360.0);
        d < EPS || 360.0 - d < EPS
    }

    #[test]
    fn stepping_right_visits_every_item() {
        let (mut c, ids) = carousel_with(3);
        assert_eq!(c.front_most_item(), Some(ids[0]));
        for step in 1..=6 {
            let nav = c.rotate_step(Direction::Right, false).unwrap();
            assert_eq!(nav.target, ids[step % 3], "step {step}");
            assert!(nav.animation.is_none());
            c.arrange(Size::new(800.0, 600.0));
            assert_eq!(c.front_most_item(), Some(ids[step % 3]), "step {step}");
        }
    }

    #[test]
    fn stepping_left_wraps_to_last() {
        let (mut c, ids) = carousel_with(5);
        let nav = c.rotate_step(Direction::Left, false).unwrap();
        assert_eq!(nav.from_item, Some(ids[0]));
        assert_eq!(nav.target, ids[4]);
        c.arrange(Size::ZERO);
        assert_eq!(c.front_most_item(), Some(ids[4]));
    }

    #[test]
    fn animated_navigation_hands_off_to_host() {
        let (mut c, ids) = carousel_with(4);
        let nav = c.animate_into_view(ids[1], true).unwrap();
        let anim = nav.animation.unwrap();
        assert_eq!(anim.axis, RotationAxis::Z);
        assert_eq!(anim.duration, ROTATE_INTO_VIEW_DURATION);
        assert!((anim.from - 0.0).abs() < EPS);
        assert!((anim.to + 90.0).abs() < EPS, "{}", anim.to);
        assert_eq!(c.ellipse().rotation_z(), 0.0, "nothing written yet");

        assert_eq!(c.set_animated_rotation(&anim, anim.value_at(0.5)), Ok(true));
        assert!(angle_close(c.ellipse().rotation_z(), 315.0));

        assert!(c.complete_animation(&anim));
        assert!(angle_close(c.ellipse().rotation_z(), 270.0));
        assert!(c.active_animation(RotationAxis::Z).is_none());
        c.arrange(Size::ZERO);
        assert_eq!(c.front_most_item(), Some(ids[1]));
    }

    #[test]
    fn front_item_needs_no_turn() {
        let (mut c, ids) = carousel_with(3);
        let nav = c.animate_into_view(ids[0], false).unwrap();
        assert!(nav.angle.abs() < EPS);
        assert!(angle_close(c.ellipse().rotation_z(), 0.0));
    }

    #[test]
    fn newer_animation_supersedes_older() {
        let (mut c, ids) = carousel_with(4);
        let first = c.animate_into_view(ids[1], true).unwrap().animation.unwrap();
        let nav = c.animate_into_view(ids[2], true).unwrap();
        assert_eq!(nav.superseded, Some(first));
        let second = nav.animation.unwrap();

        assert_eq!(c.set_animated_rotation(&first, 10.0), Ok(false));
        assert!(!c.complete_animation(&first));
        assert!(c.complete_animation(&second));
        c.arrange(Size::ZERO);
        assert_eq!(c.front_most_item(), Some(ids[2]));
    }

    #[test]
    fn immediate_navigation_stops_z_animation() {
        let (mut c, ids) = carousel_with(4);
        let (anim, _) = c
            .animate_rotation(RotationAxis::Z, 720.0, Duration::from_secs(10))
            .unwrap();
        let nav = c.animate_into_view(ids[3], false).unwrap();
        assert_eq!(nav.superseded, Some(anim));
        assert!(!c.complete_animation(&anim));
        c.arrange(Size::ZERO);
        assert_eq!(c.front_most_item(), Some(ids[3]));
    }

    #[test]
    fn stop_keeps_current_value() {
        let mut c = Carousel::new();
        let (spin, _) = c
            .animate_rotation(RotationAxis::X, 70.0 + 360.0, Duration::from_secs(4))
            .unwrap();
        assert_eq!(c.set_animated_rotation(&spin, 160.0), Ok(true));
        assert_eq!(c.stop_animation(RotationAxis::X), Some(spin));
        assert!(!c.complete_animation(&spin));
        assert_eq!(c.ellipse().rotation_x(), 160.0);
    }

    #[test]
    fn non_finite_animation_values_are_rejected() {
        let mut c = Carousel::new();
        assert!(
            c.animate_rotation(RotationAxis::Y, f64::NAN, Duration::ZERO)
                .is_err()
        );
        let (anim, _) = c
            .animate_rotation(RotationAxis::Y, 45.0, Duration::ZERO)
            .unwrap();
        let err = c.set_animated_rotation(&anim, f64::INFINITY).unwrap_err();
        assert_eq!(err.field(), ConfigField::RotationY);
        assert_eq!(c.ellipse().rotation_y(), 0.0);
        assert_eq!(
            c.active_animation(RotationAxis::Y).map(|a| a.id),
            Some(anim.id),
            "a rejected value leaves the animation running"
        );
    }

    #[test]
    fn empty_carousel_is_inert() {
        let mut c = Carousel::new();
        let out = c.arrange(Size::new(100.0, 100.0));
        assert_eq!(out.item_count, 0);
        assert!(c.rotate_step(Direction::Right, true).is_none());
        assert!(c.front_most_item().is_none());
        assert_eq!(c.viewport_size(), Size::new(100.0, 100.0));
        assert_eq!(c.ellipse(), &EllipseConfig::default());
    }

    #[test]
    fn single_item_does_not_step() {
        let (mut c, _) = carousel_with(1);
        assert!(c.rotate_step(Direction::Left, false).is_none());
    }

    #[test]
    fn stale_handles_are_ignored() {
        let (mut c, ids) = carousel_with(3);
        assert!(c.remove_item(ids[1]));
        assert!(!c.remove_item(ids[1]));
        assert!(c.animate_into_view(ids[1], true).is_none());
        assert!(c.translation(ids[1]).is_none());
        assert!(c.order_index(ids[1]).is_none());
        assert!(!c.push_host_transform(ids[1], Transform3d::IDENTITY));
        let mut measurer = |_: ItemId, _: Size| Size::new(1.0, 1.0);
        assert!(c.measure_item(ids[1], Size::ZERO, &mut measurer).is_none());
        assert_eq!(c.order_index(ids[2]), Some(1));
    }

    #[test]
    fn unarranged_item_cannot_be_brought_into_view() {
        let mut c = Carousel::new();
        let id = c.add_item();
        assert!(c.animate_into_view(id, false).is_none());
    }

    #[test]
    fn collection_changes_mirror_host() {
        let (mut c, ids) = carousel_with(3);
        let added = c.on_items_changed(Some(0), Some(ids[2])).unwrap();
        assert_eq!(c.item_count(), 3);
        let order: Vec<_> = c.items().collect();
        assert_eq!(order, [added, ids[0], ids[1]]);

        let appended = c.insert_item(99);
        assert_eq!(c.order_index(appended), Some(3));
        assert!(c.on_items_changed(None, None).is_none());
    }

    #[test]
    fn order_indices_stay_contiguous() {
        let (mut c, ids) = carousel_with(6);
        c.remove_item(ids[0]);
        c.remove_item(ids[3]);
        c.insert_item(2);
        let indices: Vec<_> = c.items().map(|id| c.order_index(id).unwrap()).collect();
        assert_eq!(indices, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn set_ellipse_reports_changes() {
        let mut c = Carousel::new();
        assert!(!c.set_ellipse(EllipseConfig::default()));
        let wide = EllipseConfig::with_radii(500.0, 200.0).unwrap();
        assert!(c.set_ellipse(wide.clone()));
        assert_eq!(c.ellipse(), &wide);
    }

    #[test]
    fn rejected_width_keeps_previous() {
        let mut c = Carousel::new();
        assert!(c.ellipse_mut().set_width(-5.0).is_err());
        assert_eq!(c.ellipse().width(), 300.0);
        assert_eq!(c.ellipse_mut().set_rotation_z(-90.0), Ok(true));
        assert_eq!(c.ellipse().rotation_z(), 270.0);
    }

    #[test]
    fn transparent_front_follows_navigation() {
        let mut config = EllipseConfig::default();
        config.set_transparency_required(true);
        let mut c = Carousel::with_ellipse(config);
        let ids: Vec<_> = (0..8).map(|_| c.add_item()).collect();
        c.arrange(Size::ZERO);
        c.animate_into_view(ids[5], false).unwrap();
        let out = c.arrange(Size::ZERO);
        assert!(out.depth_sorted);
        assert_eq!(c.render_order().last(), Some(ids[5]));
        assert_eq!(c.front_most_item(), Some(ids[5]));
    }

    #[test]
    fn transparent_step_before_arranging_new_item() {
        let mut config = EllipseConfig::default();
        config.set_transparency_required(true);
        let mut c = Carousel::with_ellipse(config);
        let ids: Vec<_> = (0..3).map(|_| c.add_item()).collect();
        c.arrange(Size::ZERO);
        c.add_item();
        assert_eq!(c.front_most_item(), Some(ids[0]));

        let nav = c.rotate_step(Direction::Right, false).unwrap();
        assert_eq!(nav.from_item, Some(ids[0]));
        assert_eq!(nav.target, ids[1]);
        assert!(nav.angle.abs() > EPS);
    }

    #[test]
    fn end_to_end_four_items() {
        let mut c = Carousel::new();
        c.ellipse_mut().set_rotation_x(0.0).unwrap();
        let ids: Vec<_> = (0..4).map(|_| c.add_item()).collect();
        let mut measurer = |_: ItemId, _: Size| Size::new(50.0, 80.0);
        let measured = c.measure(Size::new(800.0, 600.0), &mut measurer);
        let arranged = c.arrange(Size::new(800.0, 600.0));
        assert!(arranged.pass_index > measured.pass_index);
        assert_eq!(c.pass_count(), arranged.pass_index + 1);

        let changes = c.take_changes();
        assert_eq!(changes.added.len(), 4);
        let mut translated = changes.translated.clone();
        translated.sort_unstable();
        assert_eq!(translated, [0, 1, 2, 3]);
        assert_eq!(changes.scaled.len(), 4);

        let right = c.translation(ids[1]).unwrap();
        assert!((right - Point3d::new(300.0, 0.0, 0.0)).length() < EPS);
        assert_eq!(c.scale(ids[1]), Some(Point3d::new(50.0, 80.0, 0.0)));
        assert_eq!(c.desired_size(ids[1]), Some(Size::new(50.0, 80.0)));

        // A second identical pass changes nothing.
        c.measure(Size::new(800.0, 600.0), &mut measurer);
        c.arrange(Size::new(800.0, 600.0));
        assert!(c.take_changes().is_empty());
    }
}
