// Copyright 2026 the Carousel3D Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fan-out to two sinks.

use carousel3d_core::trace::{
    AnimationEvent, ArrangeEvent, ConfigRejectedEvent, ItemPlacement, ItemsChangedEvent,
    NavigateEvent, PassBeginEvent, PassEndEvent, TraceSink,
};

/// A [`TraceSink`] that forwards every event to `first`, then `second`.
///
/// Nest tees to reach more than two sinks.
#[derive(Debug, Default)]
pub struct TeeSink<A, B> {
    /// Receives each event first.
    pub first: A,
    /// Receives each event second.
    pub second: B,
}

impl<A: TraceSink, B: TraceSink> TeeSink<A, B> {
    /// Creates a tee over two sinks.
    #[must_use]
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    /// Splits the tee back into its sinks.
    pub fn into_inner(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: TraceSink, B: TraceSink> TraceSink for TeeSink<A, B> {
    fn on_items_changed(&mut self, e: &ItemsChangedEvent) {
        self.first.on_items_changed(e);
        self.second.on_items_changed(e);
    }

    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        self.first.on_pass_begin(e);
        self.second.on_pass_begin(e);
    }

    fn on_pass_end(&mut self, e: &PassEndEvent) {
        self.first.on_pass_end(e);
        self.second.on_pass_end(e);
    }

    fn on_arrange(&mut self, e: &ArrangeEvent) {
        self.first.on_arrange(e);
        self.second.on_arrange(e);
    }

    fn on_navigate(&mut self, e: &NavigateEvent) {
        self.first.on_navigate(e);
        self.second.on_navigate(e);
    }

    fn on_animation(&mut self, e: &AnimationEvent) {
        self.first.on_animation(e);
        self.second.on_animation(e);
    }

    fn on_config_rejected(&mut self, e: &ConfigRejectedEvent) {
        self.first.on_config_rejected(e);
        self.second.on_config_rejected(e);
    }

    fn on_item_placements(&mut self, pass_index: u64, placements: &[ItemPlacement]) {
        self.first.on_item_placements(pass_index, placements);
        self.second.on_item_placements(pass_index, placements);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::{RecordedEvent, RecorderSink, decode};
    use carousel3d_core::time::HostTime;
    use carousel3d_core::trace::{PassKind, Tracer};

    #[test]
    fn both_sinks_see_each_event() {
        let mut tee = TeeSink::new(RecorderSink::new(), RecorderSink::new());
        let mut tracer = Tracer::new(&mut tee);
        tracer.pass_begin(&PassBeginEvent {
            pass_index: 1,
            pass: PassKind::Measure,
            timestamp: HostTime(10),
        });
        tracer.item_placements(1, &[]);
        drop(tracer);

        let (a, b) = tee.into_inner();
        assert_eq!(a.as_bytes(), b.as_bytes());
        let events: Vec<_> = decode(a.as_bytes()).collect();
        assert!(matches!(events[0], RecordedEvent::PassBegin(_)));
        assert!(matches!(events[1], RecordedEvent::ItemPlacementsCount { .. }));
    }
}
