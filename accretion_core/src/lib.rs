// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-delivery scheduling for timing-synchronized presentation.
//!
//! `accretion_core` lets asynchronous producers submit completed frame
//! snapshots for presentation while a display clock paces how fast new
//! frames are accepted. Backlog is bounded at one frame per surface, the
//! last frame of a sequence always reaches the screen, and every surface
//! bound to one display presents in lock-step. It is `no_std` compatible
//! (with `alloc`).
//!
//! # Architecture
//!
//! Frames move through a single-owner chain, paced by BeginFrame ticks:
//!
//! ```text
//!   producer ──commit()──► surface (pending frame + completion)
//!                              │
//!            CommitQueue ◄── commit task (idle → armed, coalesced)
//!                              │ flush()
//!                              ▼
//!   DisplayClock ──BeginFrame──► FrameScheduler ──PresentBatch──► Presenter
//!                              │
//!                              ▼ (next tick)
//!                      completion resolves ──► producer continues
//! ```
//!
//! **[`scheduler`]** — [`FrameScheduler`](scheduler::FrameScheduler), the
//! per-context object implementing commit, flush, and the BeginFrame step
//! with atomic per-display batches.
//!
//! **[`surface`]** — Generational [`SurfaceId`](surface::SurfaceId) handles
//! and per-surface pending state.
//!
//! **[`queue`]** — The per-context [`CommitQueue`](queue::CommitQueue) and
//! its flush discipline.
//!
//! **[`completion`]** — [`Completion`](completion::Completion), the
//! single-resolution future producers wait on.
//!
//! **[`clock`]** — [`DisplayClock`](clock::DisplayClock) refresh pacing and
//! the [`BeginFrame`](clock::BeginFrame) tick.
//!
//! **[`backend`]** — The [`Presenter`](backend::Presenter) trait display
//! pipelines implement, with the all-or-nothing batch contract.
//!
//! **[`signal`]** — Cross-thread tick hand-off (requires `std`).
//!
//! **[`callbacks`]** — Legacy per-interval callback registration as a thin
//! adapter over the commit protocol.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) instrumentation with a
//! zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): enables the [`signal`] module.
//! - `trace` (disabled by default): enables `Tracer` method bodies (one
//!   branch per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;
#[cfg(any(feature = "std", test))]
extern crate std;

pub mod backend;
pub mod callbacks;
pub mod clock;
pub mod completion;
pub mod display;
pub mod error;
pub mod queue;
pub mod scheduler;
#[cfg(feature = "std")]
pub mod signal;
pub mod surface;
pub mod time;
pub mod trace;
