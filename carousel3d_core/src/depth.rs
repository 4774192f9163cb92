// Copyright 2026 the Carousel3D Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Back-to-front ordering.
//!
//! Transparent items must be drawn furthest first so they composite over the
//! items behind them. Depth is approximated by the item's translate Z (larger
//! is nearer the viewer), so the render order is sorted by ascending Z.
//!
//! Items without a translation, or with a NaN depth, compare equal to every
//! other item. That relation is not a total order, so the sort is a stable
//! insertion sort: it only ever swaps adjacent items that are strictly out of
//! order, which keeps it well-defined (and panic-free) for any input. The
//! collections involved are small and mostly sorted already between frames,
//! where insertion sort runs in near-linear time.

/// Returns whether `a` must be drawn after `b`.
#[inline]
fn nearer(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}

/// Stably sorts `order` by ascending depth.
///
/// Returns whether any element moved.
pub fn sort_by_depth<T: Copy>(order: &mut [T], depth: impl Fn(T) -> Option<f64>) -> bool {
    let mut moved = false;
    for i in 1..order.len() {
        let mut j = i;
        while j > 0 && nearer(depth(order[j - 1]), depth(order[j])) {
            order.swap(j - 1, j);
            j -= 1;
            moved = true;
        }
    }
    moved
}

/// Returns whether `order` is already non-decreasing in depth.
#[must_use]
pub fn is_depth_ordered<T: Copy>(order: &[T], depth: impl Fn(T) -> Option<f64>) -> bool {
    order
        .windows(2)
        .all(|w| !nearer(depth(w[0]), depth(w[1])))
}
