// Copyright 2026 the Carousel3D Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Item mutations are recorded per channel in an
//! [`understory_dirty::DirtyTracker`] keyed by item slot. None of the channels
//! propagate: items are independent of one another, so only the explicitly
//! marked slot appears in the drain output.
//!
//! - [`SCALE`] is marked when the measure pass changes an item's scale
//!   adjustment, or when a host transform is pushed.
//! - [`TRANSLATE`] is marked when the arrange pass moves an item.
//! - [`ORDER`] is marked when an item's order index changes, which includes
//!   new items and the items shifted by an insertion or removal. Render-order
//!   changes are tracked by the store separately.
//!
//! Callers never query dirty state directly.
//! [`ItemStore::take_changes`](crate::item::ItemStore::take_changes) drains
//! every channel into an [`ItemChanges`](crate::item::ItemChanges), which
//! presenters [consume](crate::backend::Presenter::apply).

use understory_dirty::Channel;

/// Scale adjustment (or a host transform) changed.
pub const SCALE: Channel = Channel::new(0);

/// Translate adjustment changed.
pub const TRANSLATE: Channel = Channel::new(1);

/// Order index changed.
pub const ORDER: Channel = Channel::new(2);
