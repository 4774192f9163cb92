// Copyright 2026 the Carousel3D Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Item identity.

use core::fmt;

/// Sentinel for "no slot" in index fields.
pub const INVALID: u32 = u32::MAX;

/// A handle to an item in an [`ItemStore`](super::ItemStore).
///
/// Pairs a slot index with a generation counter, so a handle kept past its
/// item's removal is recognised as stale even after the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl ItemId {
    /// Returns the raw slot index (for diagnostics and `*_at` accessors).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({}@gen{})", self.idx, self.generation)
    }
}
