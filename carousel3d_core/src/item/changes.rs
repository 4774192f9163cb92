// Copyright 2026 the Carousel3D Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change draining.
//!
//! Mutations made by the measure and arrange passes (and by lifecycle calls)
//! are recorded in dirty channels. [`ItemStore::take_changes`] drains them all
//! into an [`ItemChanges`] for a presenter to apply incrementally.
//!
//! [`ItemChanges`] uses raw slot indices so presenters can read current values
//! through the `*_at()` accessors (e.g.
//! [`composed_transform_at`](ItemStore::composed_transform_at)) without a
//! generation check per access.

use alloc::vec::Vec;

use super::store::ItemStore;
use crate::dirty;

/// The changes accumulated since the previous [`ItemStore::take_changes`].
///
/// A slot can appear in both [`removed`](Self::removed) and
/// [`added`](Self::added) when an item was removed and its slot reused in the
/// same interval; presenters should apply removals first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemChanges {
    /// Items whose scale adjustment or host transforms changed.
    pub scaled: Vec<u32>,
    /// Items whose translate adjustment changed.
    pub translated: Vec<u32>,
    /// Items whose order index changed (including new items).
    pub reindexed: Vec<u32>,
    /// Items added since the last drain.
    pub added: Vec<u32>,
    /// Items removed since the last drain.
    pub removed: Vec<u32>,
    /// Whether the render order changed (items added or removed, or a depth
    /// sort moved something).
    pub render_order_changed: bool,
}

impl ItemChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.scaled.clear();
        self.translated.clear();
        self.reindexed.clear();
        self.added.clear();
        self.removed.clear();
        self.render_order_changed = false;
    }

    /// Returns whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scaled.is_empty()
            && self.translated.is_empty()
            && self.reindexed.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && !self.render_order_changed
    }

    /// Returns whether the host order changed.
    #[must_use]
    pub fn order_changed(&self) -> bool {
        !self.reindexed.is_empty() || !self.removed.is_empty()
    }
}

impl ItemStore {
    /// Drains every dirty channel and lifecycle list into a fresh
    /// [`ItemChanges`].
    pub fn take_changes(&mut self) -> ItemChanges {
        let mut changes = ItemChanges::default();
        self.take_changes_into(&mut changes);
        changes
    }

    /// Like [`take_changes`](Self::take_changes), but reuses a caller-provided
    /// buffer.
    pub fn take_changes_into(&mut self, changes: &mut ItemChanges) {
        changes.clear();

        changes.scaled = self
            .dirty
            .drain(dirty::SCALE)
            .deterministic()
            .run()
            .collect();
        changes.translated = self
            .dirty
            .drain(dirty::TRANSLATE)
            .deterministic()
            .run()
            .collect();
        changes.reindexed = self
            .dirty
            .drain(dirty::ORDER)
            .deterministic()
            .run()
            .collect();

        changes.render_order_changed = core::mem::take(&mut self.render_order_dirty);
        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }
}
