// Copyright 2026 the Carousel3D Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contracts.
//!
//! The engine positions and orders items but never draws them or sizes them
//! itself. A host supplies two pieces:
//!
//! - **Measurement**: implements [`MeasureItems`] (or passes a closure) so the
//!   measure pass can ask for each item's desired size.
//!
//! - **Presenter**: implements [`Presenter`] to apply drained
//!   [`ItemChanges`] to its scene (retained layers, GPU instances, DOM
//!   nodes), reading composed transforms and the render order from the
//!   [`Carousel`].
//!
//! Timing of animations is also the host's job; see
//! [`animation`](crate::animation).

use kurbo::Size;

use crate::Carousel;
use crate::item::{ItemChanges, ItemId};

/// Reports the size an item wants, given the space available.
pub trait MeasureItems {
    /// Returns the desired size of `item` within `available`.
    fn measure(&mut self, item: ItemId, available: Size) -> Size;
}

impl<F> MeasureItems for F
where
    F: FnMut(ItemId, Size) -> Size,
{
    fn measure(&mut self, item: ItemId, available: Size) -> Size {
        self(item, available)
    }
}

/// Applies drained item changes to a presentation tree.
///
/// # Update loop pseudocode
///
/// ```rust,ignore
/// fn on_frame(now: HostTime) {
///     // Animate: feed transient values of outstanding rotation animations.
///     for (anim, start) in &animations {
///         let t = anim.progress(now.saturating_elapsed_since(*start, timebase));
///         carousel.set_animated_rotation(anim, anim.value_at(t));
///     }
///
///     // Layout: measure if sizes changed, then arrange.
///     carousel.measure(viewport, &mut measurer);
///     carousel.arrange(viewport);
///
///     // Present: apply incremental changes.
///     let changes = carousel.take_changes();
///     presenter.apply(&carousel, &changes);
/// }
/// ```
pub trait Presenter {
    /// Applies `changes`, reading current values from `carousel` as needed.
    fn apply(&mut self, carousel: &Carousel, changes: &ItemChanges);
}
