// Copyright 2026 the Carousel3D Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated host that drives a carousel through layout, navigation, and
//! animation while exercising the tracing and diagnostics pipeline.
//!
//! Adds 16 items, steps the front item with animated rotations played back on
//! a simulated 60 Hz clock, edits the collection, drags the Y rotation, spins
//! about X and stops, recording events to both a
//! [`PrettyPrintSink`](carousel3d_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](carousel3d_debug::recorder::RecorderSink), then exports a
//! Chrome trace JSON file.

use std::fs::File;
use std::io::BufWriter;
use std::time::Duration;

use kurbo::Size;

use carousel3d_core::Carousel;
use carousel3d_core::animation::{AnimationPhase, RotationAnimation};
use carousel3d_core::backend::Presenter;
use carousel3d_core::config::{ConfigError, EllipseConfig, RotationAxis};
use carousel3d_core::item::{ItemChanges, ItemId};
use carousel3d_core::navigation::{Direction, Navigation};
use carousel3d_core::time::{HostTime, Timebase};
use carousel3d_core::trace::{
    self, AnimationEvent, ArrangeEvent, ConfigRejectedEvent, ItemsChangedEvent, NavigateEvent,
    PassBeginEvent, PassEndEvent, PassKind, Tracer,
};
use carousel3d_core::transform::Transform3d;

use carousel3d_debug::pretty::PrettyPrintSink;
use carousel3d_debug::recorder::RecorderSink;
use carousel3d_debug::tee::TeeSink;

const ITEM_COUNT: usize = 16;
/// 16.6ms refresh interval (≈60 Hz).
const FRAME: Duration = Duration::from_nanos(16_666_667);
const VIEWPORT: Size = Size::new(1024.0, 768.0);
const ITEM_SIZE: Size = Size::new(120.0, 160.0);

fn main() {
    let timebase = Timebase::NANOS;

    // -- sinks -------------------------------------------------------------
    let mut sink = TeeSink::new(
        PrettyPrintSink::new(Box::new(std::io::stdout()), timebase),
        RecorderSink::new(),
    );

    // -- simulated host ----------------------------------------------------
    let summary = {
        let mut host = Host::new(Tracer::new(&mut sink), timebase);
        host.run();
        format!(
            "{} items, front {:?}, {} transform uploads ({} skipped), {} drawn",
            host.carousel.item_count(),
            host.carousel.front_most_item(),
            host.presenter.uploads,
            host.presenter.skipped,
            host.presenter.draw_order.len(),
        )
    };
    let (_, recorder) = sink.into_inner();

    // -- export Chrome trace -----------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    carousel3d_debug::chrome::export(recorder.as_bytes(), timebase, &mut writer)
        .expect("failed to write Chrome trace");

    println!("{summary}");
    println!("Wrote {path}");
}

/// Mirrors the carousel into a flat instance list, as an instanced renderer
/// would. Non-finite transforms are never uploaded.
#[derive(Debug, Default)]
struct InstancePresenter {
    transforms: Vec<Option<Transform3d>>,
    draw_order: Vec<u32>,
    uploads: usize,
    skipped: usize,
}

impl Presenter for InstancePresenter {
    fn apply(&mut self, carousel: &Carousel, changes: &ItemChanges) {
        let store = carousel.store();
        for &idx in &changes.removed {
            if let Some(slot) = self.transforms.get_mut(idx as usize) {
                *slot = None;
            }
        }
        for &idx in changes
            .added
            .iter()
            .chain(&changes.scaled)
            .chain(&changes.translated)
        {
            let slot = idx as usize;
            if self.transforms.len() <= slot {
                self.transforms.resize(slot + 1, None);
            }
            let transform = store.composed_transform_at(idx);
            if !transform.is_finite() {
                self.skipped += 1;
                continue;
            }
            self.transforms[slot] = Some(transform);
            self.uploads += 1;
        }
        if changes.render_order_changed {
            self.draw_order.clear();
            self.draw_order.extend_from_slice(store.render_order());
        }
    }
}

/// A rotation animation being played back on the host clock.
#[derive(Clone, Copy, Debug)]
struct Playback {
    anim: RotationAnimation,
    start: HostTime,
}

struct Host<'a> {
    carousel: Carousel,
    tracer: Tracer<'a>,
    presenter: InstancePresenter,
    timebase: Timebase,
    now: HostTime,
    show_placements: bool,
}

impl<'a> Host<'a> {
    fn new(tracer: Tracer<'a>, timebase: Timebase) -> Self {
        let mut config = EllipseConfig::default();
        config.set_transparency_required(true);
        Self {
            carousel: Carousel::with_ellipse(config),
            tracer,
            presenter: InstancePresenter::default(),
            timebase,
            // Start at 1s.
            now: HostTime::from_nanos(1_000_000_000, timebase),
            show_placements: false,
        }
    }

    fn run(&mut self) {
        // The host collection reports its children one at a time.
        let ids: Vec<ItemId> = (0..ITEM_COUNT)
            .filter_map(|i| self.carousel.on_items_changed(Some(i), None))
            .collect();
        self.show_placements = true;
        self.frame();
        self.show_placements = false;

        // Step right twice, letting each animation finish.
        for _ in 0..2 {
            let nav = self.carousel.rotate_step(Direction::Right, true);
            if let Some(playback) = self.navigated(nav) {
                self.play(playback, Duration::MAX);
            }
        }

        // Change direction partway through an animation.
        let nav = self.carousel.rotate_step(Direction::Right, true);
        if let Some(playback) = self.navigated(nav) {
            self.play(playback, Duration::from_millis(400));
        }
        let nav = self.carousel.rotate_step(Direction::Left, true);
        if let Some(playback) = self.navigated(nav) {
            self.play(playback, Duration::MAX);
        }

        // One child leaves and another arrives at the start of the collection.
        self.carousel.on_items_changed(Some(0), Some(ids[3]));
        self.frame();

        // Drag the Y rotation.
        for step in 1..=10 {
            self.set_rotation(RotationAxis::Y, f64::from(step) * 3.0);
            self.frame();
        }

        // A bad width is rejected and the previous one kept.
        if let Err(err) = self.carousel.ellipse_mut().set_width(-10.0) {
            self.rejected(&err);
        }

        // Spin about X for a second, then stop where it is.
        let from = self.carousel.ellipse().rotation_x();
        match self
            .carousel
            .animate_rotation(RotationAxis::X, from + 360.0, Duration::from_secs(4))
        {
            Ok((anim, superseded)) => {
                self.started(&anim, superseded);
                let playback = Playback {
                    anim,
                    start: self.now,
                };
                self.play(playback, Duration::from_secs(1));
                if let Some(stopped) = self.carousel.stop_animation(RotationAxis::X) {
                    self.tracer.animation(&AnimationEvent::new(
                        &stopped,
                        AnimationPhase::Stopped,
                        self.now,
                    ));
                }
            }
            Err(err) => self.rejected(&err),
        }

        // Jump straight to an item without animating.
        let nav = self.carousel.animate_into_view(ids[8], false);
        self.navigated(nav);
        self.show_placements = true;
        self.frame();
    }

    // -- frame loop --------------------------------------------------------

    /// Runs measure, arrange, and present for one frame, then advances the
    /// clock.
    fn frame(&mut self) {
        let mut measurer = |_: ItemId, available: Size| {
            Size::new(
                ITEM_SIZE.width.min(available.width),
                ITEM_SIZE.height.min(available.height),
            )
        };

        let pass_index = self.carousel.pass_count();
        self.pass_begin(pass_index, PassKind::Measure, 0);
        self.carousel.measure(VIEWPORT, &mut measurer);
        self.pass_end(pass_index, PassKind::Measure, 40);

        let pass_index = self.carousel.pass_count();
        self.pass_begin(pass_index, PassKind::Arrange, 40);
        let outcome = self.carousel.arrange(VIEWPORT);
        self.tracer.arrange(&ArrangeEvent::new(&outcome, self.at(110)));
        if self.show_placements {
            let placements = trace::placements(self.carousel.store());
            self.tracer.item_placements(outcome.pass_index, &placements);
        }
        self.pass_end(pass_index, PassKind::Arrange, 120);

        self.pass_begin(pass_index, PassKind::Present, 120);
        let changes = self.carousel.take_changes();
        if !changes.is_empty() {
            self.tracer.items_changed(&ItemsChangedEvent::new(
                &changes,
                self.carousel.item_count(),
                self.at(130),
            ));
            self.presenter.apply(&self.carousel, &changes);
        }
        self.pass_end(pass_index, PassKind::Present, 400);

        self.now = self.now.saturating_add(FRAME, self.timebase);
    }

    /// Plays `playback` frame by frame for at most `limit`. Returns whether it
    /// ran to completion.
    fn play(&mut self, playback: Playback, limit: Duration) -> bool {
        let anim = playback.anim;
        let until = self.now.saturating_add(limit, self.timebase);
        loop {
            let current = self.carousel.active_animation(anim.axis).map(|a| a.id);
            if current != Some(anim.id) {
                return false;
            }
            let elapsed = self
                .now
                .saturating_elapsed_since(playback.start, self.timebase);
            if anim.is_finished(elapsed) {
                if self.carousel.complete_animation(&anim) {
                    self.tracer.animation(&AnimationEvent::new(
                        &anim,
                        AnimationPhase::Completed,
                        self.now,
                    ));
                }
                self.frame();
                return true;
            }
            if self.now >= until {
                return false;
            }
            if let Err(err) = self
                .carousel
                .set_animated_rotation(&anim, anim.value_at(anim.progress(elapsed)))
            {
                self.rejected(&err);
            }
            self.frame();
        }
    }

    // -- tracing helpers ---------------------------------------------------

    fn at(&self, offset_us: u64) -> HostTime {
        self.now
            .saturating_add(Duration::from_micros(offset_us), self.timebase)
    }

    fn pass_begin(&mut self, pass_index: u64, pass: PassKind, offset_us: u64) {
        let timestamp = self.at(offset_us);
        self.tracer.pass_begin(&PassBeginEvent {
            pass_index,
            pass,
            timestamp,
        });
    }

    fn pass_end(&mut self, pass_index: u64, pass: PassKind, offset_us: u64) {
        let timestamp = self.at(offset_us);
        self.tracer.pass_end(&PassEndEvent {
            pass_index,
            pass,
            timestamp,
        });
    }

    /// Traces a navigation and returns the animation to play, if any.
    fn navigated(&mut self, nav: Option<Navigation>) -> Option<Playback> {
        let nav = nav?;
        self.tracer.navigate(&NavigateEvent::new(&nav, self.now));
        match nav.animation {
            Some(anim) => {
                self.started(&anim, nav.superseded);
                Some(Playback {
                    anim,
                    start: self.now,
                })
            }
            None => {
                if let Some(stopped) = nav.superseded {
                    self.tracer.animation(&AnimationEvent::new(
                        &stopped,
                        AnimationPhase::Stopped,
                        self.now,
                    ));
                }
                None
            }
        }
    }

    fn started(&mut self, anim: &RotationAnimation, superseded: Option<RotationAnimation>) {
        if let Some(old) = superseded {
            self.tracer.animation(&AnimationEvent::new(
                &old,
                AnimationPhase::Superseded,
                self.now,
            ));
        }
        self.tracer
            .animation(&AnimationEvent::new(anim, AnimationPhase::Started, self.now));
    }

    fn set_rotation(&mut self, axis: RotationAxis, degrees: f64) {
        if let Err(err) = self.carousel.ellipse_mut().set_rotation(axis, degrees) {
            self.rejected(&err);
        }
    }

    fn rejected(&mut self, err: &ConfigError) {
        self.tracer
            .config_rejected(&ConfigRejectedEvent::new(err, self.now));
    }
}
