// Copyright 2026 the Carousel3D Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rotation animation hand-off.
//!
//! The engine does not run a clock. When a rotation should change smoothly it
//! hands the host a [`RotationAnimation`] (start value, end value, duration);
//! the host interpolates on its own timeline, feeds transient values back
//! through [`Carousel::set_animated_rotation`], and finally calls
//! [`Carousel::complete_animation`], which writes the authoritative end value.
//!
//! At most one animation is outstanding per axis. Starting another one on the
//! same axis supersedes the first: the superseded animation's transient values
//! and completion are ignored from then on.
//!
//! Values are interpolated unwrapped (a target of `-30°` from `10°` passes
//! through `0°`, not through `180°`); the rotation setter wraps every written
//! value into `[0, 360)`.
//!
//! [`Carousel::set_animated_rotation`]: crate::Carousel::set_animated_rotation
//! [`Carousel::complete_animation`]: crate::Carousel::complete_animation

use core::time::Duration;

use crate::config::RotationAxis;

/// How long bringing an item into view takes.
pub const ROTATE_INTO_VIEW_DURATION: Duration = Duration::from_secs(1);

/// Identifies a [`RotationAnimation`]. Ids increase monotonically per
/// carousel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationId(pub(crate) u64);

impl AnimationId {
    /// Returns the raw id.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A rotation change the host should play back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationAnimation {
    /// Identity, used to detect supersession.
    pub id: AnimationId,
    /// Axis being animated.
    pub axis: RotationAxis,
    /// Start value in degrees.
    pub from: f64,
    /// End value in degrees (unwrapped).
    pub to: f64,
    /// Playback duration.
    pub duration: Duration,
}

impl RotationAnimation {
    /// Returns the linearly interpolated value at `progress` (clamped to
    /// `[0, 1]`).
    #[must_use]
    pub fn value_at(&self, progress: f64) -> f64 {
        let t = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        self.from + (self.to - self.from) * t
    }

    /// Returns playback progress after `elapsed`, in `[0, 1]`.
    ///
    /// A zero-length animation is complete immediately.
    #[must_use]
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Returns whether playback is over after `elapsed`.
    #[must_use]
    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

/// What happened to an animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationPhase {
    /// Handed to the host.
    Started,
    /// Replaced by a newer animation on the same axis.
    Superseded,
    /// Completed by the host; the end value was written.
    Completed,
    /// Stopped early; the current value was kept.
    Stopped,
}

/// The outstanding animation per axis.
#[derive(Clone, Debug, Default)]
pub struct AnimationSlots {
    next_id: u64,
    active: [Option<RotationAnimation>; 3],
}

impl AnimationSlots {
    /// Creates slots with nothing outstanding.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_id: 0,
            active: [None; 3],
        }
    }

    /// Registers a new animation on `axis` and returns it together with the
    /// animation it superseded, if any.
    pub fn start(
        &mut self,
        axis: RotationAxis,
        from: f64,
        to: f64,
        duration: Duration,
    ) -> (RotationAnimation, Option<RotationAnimation>) {
        let anim = RotationAnimation {
            id: AnimationId(self.next_id),
            axis,
            from,
            to,
            duration,
        };
        self.next_id += 1;
        let superseded = self.active[axis.index()].replace(anim);
        (anim, superseded)
    }

    /// Returns the outstanding animation on `axis`.
    #[must_use]
    pub fn active(&self, axis: RotationAxis) -> Option<&RotationAnimation> {
        self.active[axis.index()].as_ref()
    }

    /// Returns whether `anim` is still the outstanding animation on its axis.
    #[must_use]
    pub fn is_current(&self, anim: &RotationAnimation) -> bool {
        self.active[anim.axis.index()].is_some_and(|a| a.id == anim.id)
    }

    /// Retires `anim` if it is current. Returns whether it was.
    pub fn finish(&mut self, anim: &RotationAnimation) -> bool {
        if self.is_current(anim) {
            self.active[anim.axis.index()] = None;
            true
        } else {
            false
        }
    }

    /// Drops the outstanding animation on `axis`, returning it.
    pub fn stop(&mut self, axis: RotationAxis) -> Option<RotationAnimation> {
        self.active[axis.index()].take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_linearly_and_clamps() {
        let a = RotationAnimation {
            id: AnimationId(0),
            axis: RotationAxis::Z,
            from: 10.0,
            to: -30.0,
            duration: Duration::from_millis(500),
        };
        assert_eq!(a.value_at(0.0), 10.0);
        assert_eq!(a.value_at(0.5), -10.0);
        assert_eq!(a.value_at(1.0), -30.0);
        assert_eq!(a.value_at(2.0), -30.0);
        assert_eq!(a.value_at(-1.0), 10.0);
        assert_eq!(a.value_at(f64::NAN), 10.0);
    }

    #[test]
    fn progress_from_elapsed() {
        let a = RotationAnimation {
            id: AnimationId(0),
            axis: RotationAxis::X,
            from: 0.0,
            to: 360.0,
            duration: Duration::from_secs(10),
        };
        assert_eq!(a.progress(Duration::from_secs(5)), 0.5);
        assert_eq!(a.progress(Duration::from_secs(20)), 1.0);
        assert!(!a.is_finished(Duration::from_secs(9)));
        assert!(a.is_finished(Duration::from_secs(10)));

        let instant = RotationAnimation {
            duration: Duration::ZERO,
            ..a
        };
        assert_eq!(instant.progress(Duration::ZERO), 1.0);
    }

    #[test]
    fn new_animation_supersedes_old() {
        let mut slots = AnimationSlots::new();
        let (first, none) = slots.start(RotationAxis::Z, 0.0, 90.0, ROTATE_INTO_VIEW_DURATION);
        assert!(none.is_none());
        let (second, superseded) = slots.start(RotationAxis::Z, 45.0, 180.0, ROTATE_INTO_VIEW_DURATION);
        assert_eq!(superseded, Some(first));
        assert!(second.id > first.id);
        assert!(!slots.is_current(&first));
        assert!(slots.is_current(&second));
        assert!(!slots.finish(&first));
        assert!(slots.finish(&second));
        assert!(slots.active(RotationAxis::Z).is_none());
    }

    #[test]
    fn axes_are_independent() {
        let mut slots = AnimationSlots::new();
        let (x, _) = slots.start(RotationAxis::X, 0.0, 360.0, Duration::from_secs(10));
        let (z, superseded) = slots.start(RotationAxis::Z, 0.0, 90.0, Duration::from_secs(1));
        assert!(superseded.is_none());
        assert!(slots.is_current(&x));
        assert!(slots.is_current(&z));
        assert_eq!(slots.stop(RotationAxis::X), Some(x));
        assert!(slots.stop(RotationAxis::X).is_none());
        assert!(slots.is_current(&z));
    }
}
