// Copyright 2026 the Carousel3D Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Item storage and change tracking.

mod changes;
mod id;
mod store;

pub use changes::ItemChanges;
pub use id::{INVALID, ItemId};
pub use store::ItemStore;
