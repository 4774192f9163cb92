// Copyright 2026 the Carousel3D Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-item transform bookkeeping.
//!
//! Every item carries an ordered stack of [`Adjustment`]s. The engine owns at
//! most one [`Scale`](Adjustment::Scale) (written by the measure pass) and at
//! most one [`Translate`](Adjustment::Translate) (written by the arrange pass).
//! The host may add its own [`Host`](Adjustment::Host) transforms; the engine
//! never modifies or removes those.
//!
//! Engine writes go through [`TransformStack::upsert`], which replaces an
//! existing adjustment of the same kind in place or appends a new one, so the
//! two passes never clobber each other or the host's entries.

use alloc::vec::Vec;

use crate::point::Point3d;
use crate::transform::Transform3d;

/// The kind of an [`Adjustment`], used as the upsert key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdjustmentKind {
    /// Host-owned transform.
    Host,
    /// Engine-owned scale.
    Scale,
    /// Engine-owned translation.
    Translate,
}

/// One entry of a [`TransformStack`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Adjustment {
    /// An arbitrary transform owned by the host.
    Host(Transform3d),
    /// Scale factors along X, Y, Z.
    Scale(Point3d),
    /// Offset along X, Y, Z.
    Translate(Point3d),
}

impl Adjustment {
    /// Returns this adjustment's kind.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> AdjustmentKind {
        match self {
            Self::Host(_) => AdjustmentKind::Host,
            Self::Scale(_) => AdjustmentKind::Scale,
            Self::Translate(_) => AdjustmentKind::Translate,
        }
    }

    /// Returns the adjustment as a matrix.
    #[must_use]
    pub const fn to_transform(&self) -> Transform3d {
        match *self {
            Self::Host(t) => t,
            Self::Scale(s) => Transform3d::from_scale(s),
            Self::Translate(t) => Transform3d::from_translation(t),
        }
    }
}

/// Ordered stack of adjustments for one item.
///
/// Entries are applied in stack order: the first entry is applied to the
/// item's geometry first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransformStack {
    entries: Vec<Adjustment>,
}

impl TransformStack {
    /// Creates an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Writes an engine adjustment.
    ///
    /// Replaces the existing adjustment of the same kind in place, or appends
    /// when there is none. Other entries keep their positions. Returns whether
    /// the stored value changed.
    ///
    /// # Panics
    ///
    /// Panics if `adjustment` is [`Adjustment::Host`]; use
    /// [`push_host`](Self::push_host) for host transforms.
    pub fn upsert(&mut self, adjustment: Adjustment) -> bool {
        let kind = adjustment.kind();
        assert!(
            kind != AdjustmentKind::Host,
            "host transforms are added with push_host"
        );
        if let Some(slot) = self.entries.iter_mut().find(|a| a.kind() == kind) {
            let changed = *slot != adjustment;
            *slot = adjustment;
            changed
        } else {
            self.entries.push(adjustment);
            true
        }
    }

    /// Returns the stored scale, if any.
    #[must_use]
    pub fn scale(&self) -> Option<Point3d> {
        self.entries.iter().find_map(|a| match a {
            Adjustment::Scale(s) => Some(*s),
            _ => None,
        })
    }

    /// Returns the stored translation, if any.
    #[must_use]
    pub fn translation(&self) -> Option<Point3d> {
        self.entries.iter().find_map(|a| match a {
            Adjustment::Translate(t) => Some(*t),
            _ => None,
        })
    }

    /// Returns the first adjustment of the given kind.
    #[must_use]
    pub fn get(&self, kind: AdjustmentKind) -> Option<&Adjustment> {
        self.entries.iter().find(|a| a.kind() == kind)
    }

    /// Adds a host transform.
    ///
    /// Host transforms always sit before the engine's adjustments, so they
    /// are applied to the item's geometry before scale and translation.
    pub fn push_host(&mut self, transform: Transform3d) {
        let at = self
            .entries
            .iter()
            .position(|a| a.kind() != AdjustmentKind::Host)
            .unwrap_or(self.entries.len());
        self.entries.insert(at, Adjustment::Host(transform));
    }

    /// Removes every adjustment.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the entries in stack order.
    #[must_use]
    pub fn entries(&self) -> &[Adjustment] {
        &self.entries
    }

    /// Composes the stack into a single matrix.
    #[must_use]
    pub fn compose(&self) -> Transform3d {
        self.entries
            .iter()
            .fold(Transform3d::IDENTITY, |acc, a| a.to_transform() * acc)
    }
}
