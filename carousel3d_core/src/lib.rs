// Copyright 2026 the Carousel3D Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout, rotation, and depth-ordering engine for 3D elliptical carousels.
//!
//! `carousel3d_core` places a host's items evenly along an ellipse, tilts and
//! spins that ellipse in 3D, keeps a back-to-front render order when items are
//! translucent, and computes the rotation that brings a chosen item to the
//! front. It never draws, measures, or animates anything itself: hosts supply
//! item sizes, play back rotation animations on their own clock, and apply the
//! resulting transforms to their scene. It is `no_std` compatible (with
//! `alloc`) and stores items in struct-of-arrays form behind generational
//! handles.
//!
//! # Architecture
//!
//! ```text
//!   Host collection ──► Carousel::on_items_changed() ──► ItemStore
//!                                                          │
//!   MeasureItems ──► Carousel::measure() ──► Scale ────────┤
//!                                                          │
//!   EllipseConfig ──► Carousel::arrange() ──► Translate ───┤
//!                           │                              │
//!                           └─► depth sort (render order)  │
//!                                                          ▼
//!                        ItemStore::take_changes() ──► Presenter::apply()
//!
//!   Carousel::rotate_step() ──► RotationAnimation ──► host animator
//!        ▲                                               │
//!        └──── set_animated_rotation / complete ◄────────┘
//! ```
//!
//! **[`carousel`]**: The [`Carousel`] facade hosts talk to.
//!
//! **[`config`]**: [`EllipseConfig`](config::EllipseConfig) with validated
//! setters and [`ConfigError`](config::ConfigError).
//!
//! **[`item`]**: Struct-of-arrays item store with host order, render order,
//! per-item adjustment stacks, and change draining.
//!
//! **[`dirty`]**: Dirty channels via `understory_dirty`.
//!
//! **[`layout`]**: The measure and arrange passes.
//!
//! **[`depth`]**: Stable back-to-front ordering.
//!
//! **[`navigation`]**: Front-item selection and rotate-into-view angles.
//!
//! **[`animation`]**: Rotation animations handed to the host, with
//! supersession per axis.
//!
//! **[`geometry`]**, **[`point`]**, **[`rotation`]**, **[`transform`]**,
//! **[`adjustment`]**: Ellipse math, 3D points, quaternion rotation, 4×4
//! transforms, and the per-item adjustment stack.
//!
//! **[`backend`]**: The [`MeasureItems`](backend::MeasureItems) and
//! [`Presenter`](backend::Presenter) traits hosts implement.
//!
//! **[`time`]**: Host timestamps for animation playback and trace events.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! layout-loop instrumentation, with zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-item
//!   placement events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod adjustment;
pub mod animation;
pub mod backend;
pub mod carousel;
pub mod config;
pub mod depth;
pub mod dirty;
pub mod geometry;
pub mod item;
pub mod layout;
pub mod navigation;
pub mod point;
pub mod rotation;
pub mod time;
pub mod trace;
pub mod transform;

pub use carousel::Carousel;
