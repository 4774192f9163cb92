// Copyright 2026 the Carousel3D Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the layout loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that host
//! instrumentation calls as it drives a [`Carousel`](crate::Carousel). All
//! method bodies default to no-ops, so implementing only the events you care
//! about is fine.
//!
//! Events are built from what the engine returns: an [`ArrangeEvent`] from an
//! [`ArrangeOutcome`], a [`NavigateEvent`] from a [`Navigation`], and so on,
//! stamped with the host's [`HostTime`].
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates per-item [`ItemPlacement`] events
//!   and the corresponding `TraceSink` method.

#[cfg(feature = "trace-rich")]
use alloc::vec::Vec;

use crate::animation::{AnimationPhase, RotationAnimation};
use crate::config::{ConfigError, RotationAxis};
use crate::item::ItemChanges;
use crate::layout::ArrangeOutcome;
use crate::navigation::Navigation;
use crate::time::HostTime;
#[cfg(feature = "trace-rich")]
use crate::{item::ItemStore, point::Point3d};

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which layout pass is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PassKind {
    /// Host measurement of item sizes.
    Measure,
    /// Placement on the ellipse and depth ordering.
    Arrange,
    /// Applying drained changes to the presentation tree.
    Present,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after the host drains item changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemsChangedEvent {
    /// Host time of the drain.
    pub now: HostTime,
    /// Number of live items after the changes.
    pub item_count: u32,
    /// Number of items added.
    pub added: u32,
    /// Number of items removed.
    pub removed: u32,
    /// Number of items whose scale changed.
    pub scaled: u32,
    /// Number of items whose translation changed.
    pub translated: u32,
    /// Whether the render order changed.
    pub render_order_changed: bool,
}

impl ItemsChangedEvent {
    /// Summarises drained changes.
    #[must_use]
    pub fn new(changes: &ItemChanges, item_count: usize, now: HostTime) -> Self {
        Self {
            now,
            item_count: count(item_count),
            added: count(changes.added.len()),
            removed: count(changes.removed.len()),
            scaled: count(changes.scaled.len()),
            translated: count(changes.translated.len()),
            render_order_changed: changes.render_order_changed,
        }
    }
}

/// Marks the beginning of a layout pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassBeginEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Which pass is starting.
    pub pass: PassKind,
    /// Host time at the start of the pass.
    pub timestamp: HostTime,
}

/// Marks the end of a layout pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassEndEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Which pass is ending.
    pub pass: PassKind,
    /// Host time at the end of the pass.
    pub timestamp: HostTime,
}

/// Emitted after an arrange pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrangeEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Host time of the pass.
    pub now: HostTime,
    /// Number of items placed.
    pub item_count: u32,
    /// Whether the pass flagged the render order for sorting.
    pub depth_sort_required: bool,
    /// Whether the render order was sorted.
    pub depth_sorted: bool,
    /// Arranged width.
    pub width: f64,
    /// Arranged height.
    pub height: f64,
}

impl ArrangeEvent {
    /// Creates an `ArrangeEvent` from an [`ArrangeOutcome`].
    #[must_use]
    pub fn new(outcome: &ArrangeOutcome, now: HostTime) -> Self {
        Self {
            pass_index: outcome.pass_index,
            now,
            item_count: count(outcome.item_count),
            depth_sort_required: outcome.depth_sort_required,
            depth_sorted: outcome.depth_sorted,
            width: outcome.final_size.width,
            height: outcome.final_size.height,
        }
    }
}

/// Emitted when navigation rotates an item into view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavigateEvent {
    /// Host time of the request.
    pub now: HostTime,
    /// Slot index of the target item.
    pub target: u32,
    /// Slot index of the previous front item, when stepping.
    pub from: Option<u32>,
    /// Signed angle to the target, in degrees.
    pub angle: f64,
    /// Z rotation before navigating.
    pub from_rotation: f64,
    /// Z rotation being rotated to.
    pub to_rotation: f64,
    /// Whether the change was handed to the host as an animation.
    pub animated: bool,
}

impl NavigateEvent {
    /// Creates a `NavigateEvent` from a [`Navigation`].
    #[must_use]
    pub fn new(nav: &Navigation, now: HostTime) -> Self {
        Self {
            now,
            target: nav.target.index(),
            from: nav.from_item.map(|id| id.index()),
            angle: nav.angle,
            from_rotation: nav.from_rotation,
            to_rotation: nav.to_rotation,
            animated: nav.animation.is_some(),
        }
    }
}

/// Emitted when a rotation animation changes phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationEvent {
    /// Host time of the change.
    pub now: HostTime,
    /// Animation id.
    pub id: u64,
    /// Animated axis.
    pub axis: RotationAxis,
    /// What happened.
    pub phase: AnimationPhase,
    /// Start value in degrees.
    pub from: f64,
    /// End value in degrees.
    pub to: f64,
    /// Playback duration in nanoseconds.
    pub duration_nanos: u64,
}

impl AnimationEvent {
    /// Creates an `AnimationEvent` for `anim` entering `phase`.
    #[must_use]
    pub fn new(anim: &RotationAnimation, phase: AnimationPhase, now: HostTime) -> Self {
        Self {
            now,
            id: anim.id.get(),
            axis: anim.axis,
            phase,
            from: anim.from,
            to: anim.to,
            duration_nanos: u64::try_from(anim.duration.as_nanos()).unwrap_or(u64::MAX),
        }
    }
}

/// Emitted when a configuration write is rejected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConfigRejectedEvent {
    /// Host time of the write.
    pub now: HostTime,
    /// The rejection.
    pub error: ConfigError,
}

impl ConfigRejectedEvent {
    /// Creates a `ConfigRejectedEvent`.
    #[must_use]
    pub fn new(error: &ConfigError, now: HostTime) -> Self {
        Self { now, error: *error }
    }
}

/// Where an item ended up after an arrange pass.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemPlacement {
    /// Slot index of the item.
    pub item_index: u32,
    /// Order index of the item.
    pub order_index: u32,
    /// Position in render order.
    pub render_index: u32,
    /// Translation.
    pub position: Point3d,
}

/// Collects the placement of every arranged item, in render order.
#[cfg(feature = "trace-rich")]
#[must_use]
pub fn placements(store: &ItemStore) -> Vec<ItemPlacement> {
    store
        .render_order_ids()
        .enumerate()
        .filter_map(|(render_index, id)| {
            Some(ItemPlacement {
                item_index: id.index(),
                order_index: count(store.order_index(id)),
                render_index: count(render_index),
                position: store.translation(id)?,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the layout loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after item changes are drained.
    fn on_items_changed(&mut self, e: &ItemsChangedEvent) {
        _ = e;
    }

    /// Called at the beginning of a layout pass.
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        _ = e;
    }

    /// Called at the end of a layout pass.
    fn on_pass_end(&mut self, e: &PassEndEvent) {
        _ = e;
    }

    /// Called after an arrange pass.
    fn on_arrange(&mut self, e: &ArrangeEvent) {
        _ = e;
    }

    /// Called when navigation targets an item.
    fn on_navigate(&mut self, e: &NavigateEvent) {
        _ = e;
    }

    /// Called when a rotation animation changes phase.
    fn on_animation(&mut self, e: &AnimationEvent) {
        _ = e;
    }

    /// Called when a configuration write is rejected.
    fn on_config_rejected(&mut self, e: &ConfigRejectedEvent) {
        _ = e;
    }

    /// Called with per-item placements (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_item_placements(&mut self, pass_index: u64, placements: &[ItemPlacement]) {
        _ = (pass_index, placements);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits an [`ItemsChangedEvent`].
    #[inline]
    pub fn items_changed(&mut self, e: &ItemsChangedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_items_changed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassBeginEvent`].
    #[inline]
    pub fn pass_begin(&mut self, e: &PassBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassEndEvent`].
    #[inline]
    pub fn pass_end(&mut self, e: &PassEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`ArrangeEvent`].
    #[inline]
    pub fn arrange(&mut self, e: &ArrangeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_arrange(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`NavigateEvent`].
    #[inline]
    pub fn navigate(&mut self, e: &NavigateEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_navigate(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AnimationEvent`].
    #[inline]
    pub fn animation(&mut self, e: &AnimationEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_animation(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ConfigRejectedEvent`].
    #[inline]
    pub fn config_rejected(&mut self, e: &ConfigRejectedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_config_rejected(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits item placements (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn item_placements(&mut self, pass_index: u64, placements: &[ItemPlacement]) {
        if let Some(s) = &mut self.sink {
            s.on_item_placements(pass_index, placements);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use kurbo::Size;

    use super::*;
    use crate::animation::AnimationId;
    use crate::config::ConfigField;

    fn sample_outcome() -> ArrangeOutcome {
        ArrangeOutcome {
            pass_index: 9,
            item_count: 16,
            depth_sort_required: true,
            depth_sorted: false,
            final_size: Size::new(640.0, 480.0),
        }
    }

    #[test]
    fn arrange_event_from_outcome() {
        let e = ArrangeEvent::new(&sample_outcome(), HostTime(77));
        assert_eq!(e.pass_index, 9);
        assert_eq!(e.item_count, 16);
        assert!(e.depth_sort_required);
        assert!(!e.depth_sorted);
        assert_eq!((e.width, e.height), (640.0, 480.0));
        assert_eq!(e.now, HostTime(77));
    }

    #[test]
    fn items_changed_counts() {
        let changes = ItemChanges {
            added: alloc::vec![1, 2],
            removed: alloc::vec![0],
            translated: alloc::vec![1, 2, 3],
            render_order_changed: true,
            ..ItemChanges::default()
        };
        let e = ItemsChangedEvent::new(&changes, 3, HostTime(5));
        assert_eq!((e.added, e.removed, e.scaled, e.translated), (2, 1, 0, 3));
        assert_eq!(e.item_count, 3);
        assert!(e.render_order_changed);
    }

    #[test]
    fn animation_event_carries_duration() {
        let anim = RotationAnimation {
            id: AnimationId(4),
            axis: RotationAxis::Z,
            from: 0.0,
            to: -120.0,
            duration: Duration::from_secs(1),
        };
        let e = AnimationEvent::new(&anim, AnimationPhase::Started, HostTime(0));
        assert_eq!(e.id, 4);
        assert_eq!(e.duration_nanos, 1_000_000_000);
        assert_eq!(e.phase, AnimationPhase::Started);
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_arrange(&ArrangeEvent::new(&sample_outcome(), HostTime(0)));
        sink.on_config_rejected(&ConfigRejectedEvent::new(
            &ConfigError::NonPositive {
                field: ConfigField::Width,
                value: 0.0,
            },
            HostTime(0),
        ));
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.arrange(&ArrangeEvent::new(&sample_outcome(), HostTime(0)));
        tracer.pass_begin(&PassBeginEvent {
            pass_index: 0,
            pass: PassKind::Arrange,
            timestamp: HostTime(0),
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            passes: Vec<u64>,
        }
        impl TraceSink for RecordingSink {
            fn on_arrange(&mut self, e: &ArrangeEvent) {
                self.passes.push(e.pass_index);
            }
        }

        let mut sink = RecordingSink { passes: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.arrange(&ArrangeEvent::new(&sample_outcome(), HostTime(0)));
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.passes, &[9]);
    }

    #[cfg(feature = "trace-rich")]
    #[test]
    fn placements_follow_render_order() {
        use crate::config::EllipseConfig;
        use crate::layout;

        let mut config = EllipseConfig::default();
        config.set_transparency_required(true);
        let mut store = ItemStore::new();
        let first = store.push();
        store.push();
        store.push();
        let before = placements(&store);
        assert!(before.is_empty(), "unarranged items have no placement");

        layout::arrange(&config, &mut store, Size::ZERO, 0);
        let after = placements(&store);
        assert_eq!(after.len(), 3);
        let last = after.last().unwrap();
        assert_eq!(last.item_index, first.index());
        assert_eq!(last.render_index, 2);
        assert!(after.windows(2).all(|w| w[0].position.z <= w[1].position.z));
    }
}
