// Copyright 2026 the Carousel3D Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Layout passes become duration slices, rotation animations become async
//! slices keyed by animation id (one track per axis), and everything else is
//! an instant event.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use carousel3d_core::animation::AnimationPhase;
use carousel3d_core::time::{HostTime, Timebase};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Timestamps are converted to microseconds using the provided [`Timebase`].
pub fn export(bytes: &[u8], timebase: Timebase, writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    // Placement counts carry no timestamp; pin them to the preceding event.
    let mut last_ts = 0.0;

    for recorded in decode(bytes) {
        if let Some(t) = recorded.timestamp() {
            last_ts = to_us(t, timebase);
        }
        match recorded {
            RecordedEvent::ItemsChanged(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "ItemsChanged",
                    "cat": "Items",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "item_count": e.item_count,
                        "added": e.added,
                        "removed": e.removed,
                        "scaled": e.scaled,
                        "translated": e.translated,
                        "render_order_changed": e.render_order_changed,
                    }
                }));
            }
            RecordedEvent::PassBegin(e) => {
                events.push(json!({
                    "ph": "B",
                    "name": format!("{:?}", e.pass),
                    "cat": "Layout",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "pass_index": e.pass_index,
                    }
                }));
            }
            RecordedEvent::PassEnd(e) => {
                events.push(json!({
                    "ph": "E",
                    "name": format!("{:?}", e.pass),
                    "cat": "Layout",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "pass_index": e.pass_index,
                    }
                }));
            }
            RecordedEvent::Arrange(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Arrange",
                    "cat": "Layout",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "pass_index": e.pass_index,
                        "item_count": e.item_count,
                        "depth_sort_required": e.depth_sort_required,
                        "depth_sorted": e.depth_sorted,
                        "width": e.width,
                        "height": e.height,
                    }
                }));
            }
            RecordedEvent::Navigate(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Navigate",
                    "cat": "Navigation",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 1,
                    "s": "p",
                    "args": {
                        "target": e.target,
                        "from": e.from,
                        "angle": e.angle,
                        "from_rotation": e.from_rotation,
                        "to_rotation": e.to_rotation,
                        "animated": e.animated,
                    }
                }));
            }
            RecordedEvent::Animation(e) => {
                let ph = match e.phase {
                    AnimationPhase::Started => "b",
                    AnimationPhase::Superseded
                    | AnimationPhase::Completed
                    | AnimationPhase::Stopped => "e",
                };
                events.push(json!({
                    "ph": ph,
                    "name": format!("Rotate{:?}", e.axis),
                    "cat": "Animation",
                    "id": e.id,
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 2,
                    "args": {
                        "phase": format!("{:?}", e.phase),
                        "from": e.from,
                        "to": e.to,
                        "duration_ms": e.duration_nanos as f64 / 1_000_000.0,
                    }
                }));
            }
            RecordedEvent::ConfigRejected(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "ConfigRejected",
                    "cat": "Config",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "field": e.error.field().name(),
                        "message": e.error.to_string(),
                    }
                }));
            }
            RecordedEvent::ItemPlacementsCount { pass_index, count } => {
                events.push(json!({
                    "ph": "i",
                    "name": "ItemPlacements",
                    "cat": "Rich",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "pass_index": pass_index,
                        "count": count,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn to_us(t: HostTime, timebase: Timebase) -> f64 {
    t.to_nanos(timebase) as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use carousel3d_core::config::RotationAxis;
    use carousel3d_core::trace::{
        AnimationEvent, PassBeginEvent, PassEndEvent, PassKind, TraceSink,
    };

    fn animation(id: u64, phase: AnimationPhase, now: u64) -> AnimationEvent {
        AnimationEvent {
            now: HostTime(now),
            id,
            axis: RotationAxis::Z,
            phase,
            from: 0.0,
            to: -90.0,
            duration_nanos: 1_000_000_000,
        }
    }

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_pass_begin(&PassBeginEvent {
            pass_index: 0,
            pass: PassKind::Arrange,
            timestamp: HostTime(1_000_000),
        });
        rec.on_pass_end(&PassEndEvent {
            pass_index: 0,
            pass: PassKind::Arrange,
            timestamp: HostTime(1_000_100),
        });
        rec.on_animation(&animation(7, AnimationPhase::Started, 1_000_200));
        rec.on_animation(&animation(7, AnimationPhase::Completed, 2_000_200));
        rec.on_item_placements(0, &[]);

        let mut out = Vec::new();
        export(rec.as_bytes(), Timebase::NANOS, &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 5);

        assert_eq!(parsed[0]["ph"], "B");
        assert_eq!(parsed[0]["name"], "Arrange");
        assert_eq!(parsed[0]["ts"], 1000.0);
        assert_eq!(parsed[1]["ph"], "E");

        // Animations pair up as an async slice.
        assert_eq!(parsed[2]["ph"], "b");
        assert_eq!(parsed[3]["ph"], "e");
        assert_eq!(parsed[2]["id"], parsed[3]["id"]);
        assert_eq!(parsed[2]["name"], "RotateZ");

        // Untimed events inherit the previous timestamp.
        assert_eq!(parsed[4]["ts"], parsed[3]["ts"]);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], Timebase::NANOS, &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
