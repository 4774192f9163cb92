// Copyright 2026 the Carousel3D Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are converted to microseconds using a [`Timebase`].

use std::io::Write;

use carousel3d_core::animation::AnimationPhase;
use carousel3d_core::time::{HostTime, Timebase};
use carousel3d_core::trace::{
    AnimationEvent, ArrangeEvent, ConfigRejectedEvent, ItemPlacement, ItemsChangedEvent,
    NavigateEvent, PassBeginEvent, PassEndEvent, PassKind, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            timebase,
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn host_us(&self, t: HostTime) -> f64 {
        t.to_nanos(self.timebase) as f64 / 1000.0
    }
}

fn pass_name(pass: PassKind) -> &'static str {
    match pass {
        PassKind::Measure => "measure",
        PassKind::Arrange => "arrange",
        PassKind::Present => "present",
    }
}

fn phase_name(phase: AnimationPhase) -> &'static str {
    match phase {
        AnimationPhase::Started => "start",
        AnimationPhase::Superseded => "superseded",
        AnimationPhase::Completed => "complete",
        AnimationPhase::Stopped => "stop",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_items_changed(&mut self, e: &ItemsChangedEvent) {
        let _ = writeln!(
            self.writer,
            "[items] count={} +{} -{} scaled={} moved={} reorder={} at {:.1}µs",
            e.item_count,
            e.added,
            e.removed,
            e.scaled,
            e.translated,
            e.render_order_changed,
            self.host_us(e.now),
        );
    }

    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[pass:begin] pass={} {} at {:.1}µs",
            e.pass_index,
            pass_name(e.pass),
            self.host_us(e.timestamp),
        );
    }

    fn on_pass_end(&mut self, e: &PassEndEvent) {
        let _ = writeln!(
            self.writer,
            "[pass:end] pass={} {} at {:.1}µs",
            e.pass_index,
            pass_name(e.pass),
            self.host_us(e.timestamp),
        );
    }

    fn on_arrange(&mut self, e: &ArrangeEvent) {
        let depth = match (e.depth_sort_required, e.depth_sorted) {
            (_, true) => "sorted",
            (true, false) => "unsorted",
            (false, false) => "ok",
        };
        let _ = writeln!(
            self.writer,
            "[arrange] pass={} items={} size={}x{} depth={depth}",
            e.pass_index, e.item_count, e.width, e.height,
        );
    }

    fn on_navigate(&mut self, e: &NavigateEvent) {
        let from = e
            .from
            .map_or_else(|| "-".to_owned(), |idx| idx.to_string());
        let _ = writeln!(
            self.writer,
            "[navigate] {from} -> {} angle={:+.2}° z={:.2}° -> {:.2}°{} at {:.1}µs",
            e.target,
            e.angle,
            e.from_rotation,
            e.to_rotation,
            if e.animated { " (animated)" } else { "" },
            self.host_us(e.now),
        );
    }

    fn on_animation(&mut self, e: &AnimationEvent) {
        let _ = writeln!(
            self.writer,
            "[anim:{}] id={} axis={:?} {:.2}° -> {:.2}° over {:.1}ms at {:.1}µs",
            phase_name(e.phase),
            e.id,
            e.axis,
            e.from,
            e.to,
            e.duration_nanos as f64 / 1_000_000.0,
            self.host_us(e.now),
        );
    }

    fn on_config_rejected(&mut self, e: &ConfigRejectedEvent) {
        let _ = writeln!(
            self.writer,
            "[config] REJECTED {} at {:.1}µs",
            e.error,
            self.host_us(e.now),
        );
    }

    fn on_item_placements(&mut self, pass_index: u64, placements: &[ItemPlacement]) {
        let _ = writeln!(
            self.writer,
            "[placements] pass={pass_index} items={}",
            placements.len(),
        );
        for p in placements {
            let _ = writeln!(
                self.writer,
                "    #{:<3} slot={:<3} order={:<3} ({:8.2}, {:8.2}, {:8.2})",
                p.render_index,
                p.item_index,
                p.order_index,
                p.position.x,
                p.position.y,
                p.position.z,
            );
        }
    }
}
