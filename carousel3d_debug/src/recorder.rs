// Copyright 2026 the Carousel3D Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Placement events ([`on_item_placements`](TraceSink::on_item_placements))
//! store only the count.

use carousel3d_core::animation::AnimationPhase;
use carousel3d_core::config::{ConfigError, ConfigField, RotationAxis};
use carousel3d_core::time::HostTime;
use carousel3d_core::trace::{
    AnimationEvent, ArrangeEvent, ConfigRejectedEvent, ItemPlacement, ItemsChangedEvent,
    NavigateEvent, PassBeginEvent, PassEndEvent, PassKind, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_ITEMS_CHANGED: u8 = 1;
const TAG_PASS_BEGIN: u8 = 2;
const TAG_PASS_END: u8 = 3;
const TAG_ARRANGE: u8 = 4;
const TAG_NAVIGATE: u8 = 5;
const TAG_ANIMATION: u8 = 6;
const TAG_CONFIG_REJECTED: u8 = 7;
const TAG_ITEM_PLACEMENTS_COUNT: u8 = 8;

const FIELDS: [ConfigField; 8] = [
    ConfigField::CenterX,
    ConfigField::CenterY,
    ConfigField::CenterZ,
    ConfigField::Width,
    ConfigField::Height,
    ConfigField::RotationX,
    ConfigField::RotationY,
    ConfigField::RotationZ,
];

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_option_u32(&mut self, v: Option<u32>) {
        self.write_bool(v.is_some());
        self.write_u32(v.unwrap_or(0));
    }

    fn write_pass(&mut self, p: PassKind) {
        self.write_u8(match p {
            PassKind::Measure => 0,
            PassKind::Arrange => 1,
            PassKind::Present => 2,
        });
    }

    fn write_axis(&mut self, a: RotationAxis) {
        self.write_u8(match a {
            RotationAxis::X => 0,
            RotationAxis::Y => 1,
            RotationAxis::Z => 2,
        });
    }

    fn write_phase(&mut self, p: AnimationPhase) {
        self.write_u8(match p {
            AnimationPhase::Started => 0,
            AnimationPhase::Superseded => 1,
            AnimationPhase::Completed => 2,
            AnimationPhase::Stopped => 3,
        });
    }

    fn write_field(&mut self, field: ConfigField) {
        let pos = FIELDS.iter().position(|f| *f == field).unwrap_or(0);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "there are eight config fields"
        )]
        self.write_u8(pos as u8);
    }
}

impl TraceSink for RecorderSink {
    fn on_items_changed(&mut self, e: &ItemsChangedEvent) {
        self.write_u8(TAG_ITEMS_CHANGED);
        self.write_u64(e.now.ticks());
        self.write_u32(e.item_count);
        self.write_u32(e.added);
        self.write_u32(e.removed);
        self.write_u32(e.scaled);
        self.write_u32(e.translated);
        self.write_bool(e.render_order_changed);
    }

    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        self.write_u8(TAG_PASS_BEGIN);
        self.write_u64(e.pass_index);
        self.write_pass(e.pass);
        self.write_u64(e.timestamp.ticks());
    }

    fn on_pass_end(&mut self, e: &PassEndEvent) {
        self.write_u8(TAG_PASS_END);
        self.write_u64(e.pass_index);
        self.write_pass(e.pass);
        self.write_u64(e.timestamp.ticks());
    }

    fn on_arrange(&mut self, e: &ArrangeEvent) {
        self.write_u8(TAG_ARRANGE);
        self.write_u64(e.pass_index);
        self.write_u64(e.now.ticks());
        self.write_u32(e.item_count);
        self.write_bool(e.depth_sort_required);
        self.write_bool(e.depth_sorted);
        self.write_f64(e.width);
        self.write_f64(e.height);
    }

    fn on_navigate(&mut self, e: &NavigateEvent) {
        self.write_u8(TAG_NAVIGATE);
        self.write_u64(e.now.ticks());
        self.write_u32(e.target);
        self.write_option_u32(e.from);
        self.write_f64(e.angle);
        self.write_f64(e.from_rotation);
        self.write_f64(e.to_rotation);
        self.write_bool(e.animated);
    }

    fn on_animation(&mut self, e: &AnimationEvent) {
        self.write_u8(TAG_ANIMATION);
        self.write_u64(e.now.ticks());
        self.write_u64(e.id);
        self.write_axis(e.axis);
        self.write_phase(e.phase);
        self.write_f64(e.from);
        self.write_f64(e.to);
        self.write_u64(e.duration_nanos);
    }

    fn on_config_rejected(&mut self, e: &ConfigRejectedEvent) {
        self.write_u8(TAG_CONFIG_REJECTED);
        self.write_u64(e.now.ticks());
        let (kind, field, value) = match e.error {
            ConfigError::NonPositive { field, value } => (0, field, value),
            ConfigError::NonFinite { field, value } => (1, field, value),
        };
        self.write_u8(kind);
        self.write_field(field);
        self.write_f64(value);
    }

    fn on_item_placements(&mut self, pass_index: u64, placements: &[ItemPlacement]) {
        self.write_u8(TAG_ITEM_PLACEMENTS_COUNT);
        self.write_u64(pass_index);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "placement count capped at u32::MAX for recording"
        )]
        self.write_u32(placements.len().min(u32::MAX as usize) as u32);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// An [`ItemsChangedEvent`].
    ItemsChanged(ItemsChangedEvent),
    /// A [`PassBeginEvent`].
    PassBegin(PassBeginEvent),
    /// A [`PassEndEvent`].
    PassEnd(PassEndEvent),
    /// An [`ArrangeEvent`].
    Arrange(ArrangeEvent),
    /// A [`NavigateEvent`].
    Navigate(NavigateEvent),
    /// An [`AnimationEvent`].
    Animation(AnimationEvent),
    /// A [`ConfigRejectedEvent`].
    ConfigRejected(ConfigRejectedEvent),
    /// Item-placement count for a pass.
    ItemPlacementsCount {
        /// Pass counter.
        pass_index: u64,
        /// Number of placements.
        count: u32,
    },
}

impl RecordedEvent {
    /// Returns the event's host timestamp, if it carries one.
    #[must_use]
    pub fn timestamp(&self) -> Option<HostTime> {
        match self {
            Self::ItemsChanged(e) => Some(e.now),
            Self::PassBegin(e) => Some(e.timestamp),
            Self::PassEnd(e) => Some(e.timestamp),
            Self::Arrange(e) => Some(e.now),
            Self::Navigate(e) => Some(e.now),
            Self::Animation(e) => Some(e.now),
            Self::ConfigRejected(e) => Some(e.now),
            Self::ItemPlacementsCount { .. } => None,
        }
    }
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let end = self.pos.checked_add(N)?;
        let bytes = self.data.get(self.pos..end)?.try_into().ok()?;
        self.pos = end;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_bool(&mut self) -> Option<bool> {
        self.read_u8().map(|b| b != 0)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.take().map(f64::from_le_bytes)
    }

    fn read_option_u32(&mut self) -> Option<Option<u32>> {
        let present = self.read_bool()?;
        let val = self.read_u32()?;
        Some(present.then_some(val))
    }

    fn read_pass(&mut self) -> Option<PassKind> {
        Some(match self.read_u8()? {
            0 => PassKind::Measure,
            1 => PassKind::Arrange,
            _ => PassKind::Present,
        })
    }

    fn read_axis(&mut self) -> Option<RotationAxis> {
        Some(match self.read_u8()? {
            0 => RotationAxis::X,
            1 => RotationAxis::Y,
            _ => RotationAxis::Z,
        })
    }

    fn read_phase(&mut self) -> Option<AnimationPhase> {
        Some(match self.read_u8()? {
            0 => AnimationPhase::Started,
            1 => AnimationPhase::Superseded,
            2 => AnimationPhase::Completed,
            _ => AnimationPhase::Stopped,
        })
    }

    fn read_field(&mut self) -> Option<ConfigField> {
        FIELDS.get(usize::from(self.read_u8()?)).copied()
    }

    fn decode_items_changed(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ItemsChanged(ItemsChangedEvent {
            now: HostTime(self.read_u64()?),
            item_count: self.read_u32()?,
            added: self.read_u32()?,
            removed: self.read_u32()?,
            scaled: self.read_u32()?,
            translated: self.read_u32()?,
            render_order_changed: self.read_bool()?,
        }))
    }

    fn decode_pass_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PassBegin(PassBeginEvent {
            pass_index: self.read_u64()?,
            pass: self.read_pass()?,
            timestamp: HostTime(self.read_u64()?),
        }))
    }

    fn decode_pass_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PassEnd(PassEndEvent {
            pass_index: self.read_u64()?,
            pass: self.read_pass()?,
            timestamp: HostTime(self.read_u64()?),
        }))
    }

    fn decode_arrange(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Arrange(ArrangeEvent {
            pass_index: self.read_u64()?,
            now: HostTime(self.read_u64()?),
            item_count: self.read_u32()?,
            depth_sort_required: self.read_bool()?,
            depth_sorted: self.read_bool()?,
            width: self.read_f64()?,
            height: self.read_f64()?,
        }))
    }

    fn decode_navigate(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Navigate(NavigateEvent {
            now: HostTime(self.read_u64()?),
            target: self.read_u32()?,
            from: self.read_option_u32()?,
            angle: self.read_f64()?,
            from_rotation: self.read_f64()?,
            to_rotation: self.read_f64()?,
            animated: self.read_bool()?,
        }))
    }

    fn decode_animation(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Animation(AnimationEvent {
            now: HostTime(self.read_u64()?),
            id: self.read_u64()?,
            axis: self.read_axis()?,
            phase: self.read_phase()?,
            from: self.read_f64()?,
            to: self.read_f64()?,
            duration_nanos: self.read_u64()?,
        }))
    }

    fn decode_config_rejected(&mut self) -> Option<RecordedEvent> {
        let now = HostTime(self.read_u64()?);
        let kind = self.read_u8()?;
        let field = self.read_field()?;
        let value = self.read_f64()?;
        let error = match kind {
            0 => ConfigError::NonPositive { field, value },
            _ => ConfigError::NonFinite { field, value },
        };
        Some(RecordedEvent::ConfigRejected(ConfigRejectedEvent { now, error }))
    }

    fn decode_item_placements_count(&mut self) -> Option<RecordedEvent> {
        let pass_index = self.read_u64()?;
        let count = self.read_u32()?;
        Some(RecordedEvent::ItemPlacementsCount { pass_index, count })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_ITEMS_CHANGED => self.decode_items_changed(),
            TAG_PASS_BEGIN => self.decode_pass_begin(),
            TAG_PASS_END => self.decode_pass_end(),
            TAG_ARRANGE => self.decode_arrange(),
            TAG_NAVIGATE => self.decode_navigate(),
            TAG_ANIMATION => self.decode_animation(),
            TAG_CONFIG_REJECTED => self.decode_config_rejected(),
            TAG_ITEM_PLACEMENTS_COUNT => self.decode_item_placements_count(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
