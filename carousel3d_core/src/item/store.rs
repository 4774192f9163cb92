// Copyright 2026 the Carousel3D Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays item storage with host order, render order, and
//! per-item adjustments.

use alloc::vec::Vec;

use kurbo::Size;
use understory_dirty::{CycleHandling, DirtyTracker};

use crate::adjustment::{Adjustment, AdjustmentKind, TransformStack};
use crate::depth;
use crate::dirty;
use crate::point::Point3d;
use crate::transform::Transform3d;

use super::id::{INVALID, ItemId};

/// Struct-of-arrays storage for all carousel items.
///
/// Items are addressed by [`ItemId`] handles. Each item occupies a slot in
/// parallel arrays; removed items are recycled through a free list and
/// generation counters reject stale handles.
///
/// Two sequences are kept over the live slots:
///
/// - the *host order*, mirroring the host's collection. An item's position in
///   it is its order index, which fixes its slot on the ellipse.
/// - the *render order*, the draw order handed to the renderer. New items are
///   appended, removed items dropped, and depth sorting permutes it. It never
///   affects order indices.
#[derive(Debug)]
pub struct ItemStore {
    // -- Per-slot properties --
    pub(crate) transforms: Vec<TransformStack>,
    pub(crate) desired_size: Vec<Size>,
    pub(crate) order_index: Vec<u32>,

    // -- Sequences over live slots --
    pub(crate) order: Vec<u32>,
    pub(crate) render_order: Vec<u32>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,
    pub(crate) render_order_dirty: bool,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemStore {
    /// Creates an empty item store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            transforms: Vec::new(),
            desired_size: Vec::new(),
            order_index: Vec::new(),
            order: Vec::new(),
            render_order: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            render_order_dirty: false,
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    /// Returns the number of live items.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns whether the store holds no items.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // -- Lifecycle API --

    /// Inserts a new item at position `index` of the host order and returns
    /// its handle.
    ///
    /// Items at or after `index` shift up by one. The new item has no
    /// adjustments and a zero desired size, and is appended to the render
    /// order.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    pub fn insert(&mut self, index: usize) -> ItemId {
        assert!(
            index <= self.order.len(),
            "insertion index {index} out of range (len {})",
            self.order.len()
        );

        let idx = if let Some(idx) = self.free_list.pop() {
            self.generation[idx as usize] += 1;
            self.transforms[idx as usize].clear();
            self.desired_size[idx as usize] = Size::ZERO;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.transforms.push(TransformStack::new());
            self.desired_size.push(Size::ZERO);
            self.order_index.push(INVALID);
            self.generation.push(0);
            idx
        };

        self.order.insert(index, idx);
        self.reindex_from(index);
        self.render_order.push(idx);
        self.render_order_dirty = true;
        self.pending_added.push(idx);

        ItemId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Appends a new item to the end of the host order.
    pub fn push(&mut self) -> ItemId {
        self.insert(self.order.len())
    }

    /// Removes an item, freeing its slot for reuse.
    ///
    /// Later items shift down by one in the host order.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn remove(&mut self, id: ItemId) {
        self.validate(id);
        let idx = id.idx;
        let pos = self.order_index[idx as usize] as usize;

        self.order.remove(pos);
        if let Some(r) = self.render_order.iter().position(|&i| i == idx) {
            self.render_order.remove(r);
        }
        self.order_index[idx as usize] = INVALID;
        self.dirty.remove_key(idx);
        self.reindex_from(pos);

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;

        self.free_list.push(idx);
        self.render_order_dirty = true;
        self.pending_removed.push(idx);
    }

    /// Returns whether the given handle refers to a live item.
    #[must_use]
    pub fn is_alive(&self, id: ItemId) -> bool {
        id.idx < self.len
            && self.generation[id.idx as usize] == id.generation
            && self.order_index[id.idx as usize] != INVALID
    }

    // -- Order API --

    /// Returns the items in host order.
    pub fn items(&self) -> impl ExactSizeIterator<Item = ItemId> + '_ {
        self.order.iter().map(|&idx| self.id_at(idx))
    }

    /// Returns the item at host position `index`, if any.
    #[must_use]
    pub fn item_at_order(&self, index: usize) -> Option<ItemId> {
        self.order.get(index).map(|&idx| self.id_at(idx))
    }

    /// Returns the item's order index (its position in the host order).
    #[must_use]
    pub fn order_index(&self, id: ItemId) -> usize {
        self.validate(id);
        self.order_index[id.idx as usize] as usize
    }

    /// Returns the render order as raw slot indices, furthest first once
    /// depth-sorted.
    #[must_use]
    pub fn render_order(&self) -> &[u32] {
        &self.render_order
    }

    /// Returns the render order as handles.
    pub fn render_order_ids(
        &self,
    ) -> impl DoubleEndedIterator<Item = ItemId> + ExactSizeIterator + '_ {
        self.render_order.iter().map(|&idx| self.id_at(idx))
    }

    /// Returns whether the render order is non-decreasing in translate Z.
    #[must_use]
    pub fn is_depth_ordered(&self) -> bool {
        let transforms = &self.transforms;
        depth::is_depth_ordered(&self.render_order, |idx| {
            transforms[idx as usize].translation().map(|t| t.z)
        })
    }

    /// Sorts the render order by ascending translate Z.
    ///
    /// Returns whether the order changed. Order indices are untouched.
    pub fn sort_by_depth(&mut self) -> bool {
        let transforms = &self.transforms;
        let moved = depth::sort_by_depth(&mut self.render_order, |idx| {
            transforms[idx as usize].translation().map(|t| t.z)
        });
        if moved {
            self.render_order_dirty = true;
        }
        moved
    }

    // -- Property getters --

    /// Returns the item's adjustment stack.
    #[must_use]
    pub fn transforms(&self, id: ItemId) -> &TransformStack {
        self.validate(id);
        &self.transforms[id.idx as usize]
    }

    /// Returns the item's translate adjustment, if it has been arranged.
    #[must_use]
    pub fn translation(&self, id: ItemId) -> Option<Point3d> {
        self.transforms(id).translation()
    }

    /// Returns the item's scale adjustment, if it has been measured.
    #[must_use]
    pub fn scale(&self, id: ItemId) -> Option<Point3d> {
        self.transforms(id).scale()
    }

    /// Returns the size reported by the host's last measurement.
    #[must_use]
    pub fn desired_size(&self, id: ItemId) -> Size {
        self.validate(id);
        self.desired_size[id.idx as usize]
    }

    /// Returns the item's adjustments composed into one matrix.
    #[must_use]
    pub fn composed_transform(&self, id: ItemId) -> Transform3d {
        self.transforms(id).compose()
    }

    // -- Mutation API (auto-marks dirty) --

    /// Writes an engine adjustment through
    /// [`TransformStack::upsert`].
    ///
    /// Marks the matching channel when the stored value changed, and returns
    /// whether it did.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or `adjustment` is a host transform.
    pub fn upsert(&mut self, id: ItemId, adjustment: Adjustment) -> bool {
        self.validate(id);
        let channel = match adjustment.kind() {
            AdjustmentKind::Translate => dirty::TRANSLATE,
            AdjustmentKind::Scale | AdjustmentKind::Host => dirty::SCALE,
        };
        let changed = self.transforms[id.idx as usize].upsert(adjustment);
        if changed {
            self.dirty.mark(id.idx, channel);
        }
        changed
    }

    /// Adds a host-owned transform ahead of the engine's adjustments.
    pub fn push_host_transform(&mut self, id: ItemId, transform: Transform3d) {
        self.validate(id);
        self.transforms[id.idx as usize].push_host(transform);
        self.dirty.mark(id.idx, dirty::SCALE);
    }

    /// Records the size the host measured for an item.
    pub fn set_desired_size(&mut self, id: ItemId, size: Size) {
        self.validate(id);
        self.desired_size[id.idx as usize] = size;
    }

    // -- Raw-index accessors for presenters --
    //
    // These accept raw slot indices (as found in `ItemChanges` or
    // `render_order()`) and skip generation validation.

    /// Returns the current handle for raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn id_at(&self, idx: u32) -> ItemId {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        ItemId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Returns the composed transform at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn composed_transform_at(&self, idx: u32) -> Transform3d {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        self.transforms[idx as usize].compose()
    }


    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: ItemId) {
        assert!(
            self.is_alive(id),
            "stale ItemId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Rewrites order indices from host position `from` onward, marking the
    /// slots whose index changed.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "slot count is bounded by u32 slot indices"
    )]
    fn reindex_from(&mut self, from: usize) {
        for pos in from..self.order.len() {
            let idx = self.order[pos];
            let pos = pos as u32;
            if self.order_index[idx as usize] != pos {
                self.order_index[idx as usize] = pos;
                self.dirty.mark(idx, dirty::ORDER);
            }
        }
    }
}
