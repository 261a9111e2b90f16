// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for display pipelines.
//!
//! The scheduler core is platform-agnostic; hosts supply the pieces that
//! touch real hardware:
//!
//! - **Tick source** — Something that observes vsync (or a timer) and feeds
//!   the current time into a [`DisplayClock`], delivering the resulting
//!   [`BeginFrame`] ticks into the producer's context. When the timing
//!   source lives on another thread, route ticks through
//!   [`signal::tick_slot`]. The setup and lifecycle differ fundamentally
//!   across platforms, so there is no trait for this part.
//!
//! - **Presenter** — Implements [`Presenter`] to hand a batch of frames to
//!   the display pipeline for the next vsync. This is the terminal ownership
//!   transfer for the frames in this subsystem.
//!
//! # Frame loop pseudocode
//!
//! A typical host drives the pieces like this:
//!
//! ```rust,ignore
//! // Producer work (any number of times per interval):
//! let wait = scheduler.commit(surface, frame)?;
//!
//! // End of the unit of work, and at every suspension point:
//! scheduler.flush(&mut tracer);
//!
//! // When the display's clock ticks:
//! if let Some(tick) = clock.tick(now()) {
//!     scheduler.begin_frame(&tick, &mut presenter, &mut tracer)?;
//! }
//! ```
//!
//! [`BeginFrame`]: crate::clock::BeginFrame
//! [`DisplayClock`]: crate::clock::DisplayClock
//! [`signal::tick_slot`]: crate::signal::tick_slot

use alloc::vec::Vec;
use core::fmt;

use crate::clock::BeginFrame;
use crate::display::DisplayId;
use crate::error::PresentError;
use crate::surface::SurfaceId;

/// One surface's frame inside a present batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubmittedFrame<F> {
    /// The surface the frame came from.
    pub surface: SurfaceId,
    /// The frame snapshot, owned by the batch.
    pub frame: F,
}

/// The frames of every surface on one display for one refresh interval.
///
/// All-or-nothing: a presenter must either make every frame in the batch
/// visible in the same refresh cycle, or reject the whole batch via
/// [`FailedBatch`] without showing any of it. Partially presenting a batch
/// would tear a multi-view composite apart.
#[derive(Debug)]
pub struct PresentBatch<F> {
    /// The display the batch targets.
    pub display: DisplayId,
    /// The tick that triggered the batch.
    pub tick: BeginFrame,
    /// The frames, one per participating surface, in surface-arming order.
    pub frames: Vec<SubmittedFrame<F>>,
}

/// A rejected present batch, returned with its frames intact.
///
/// Handing the batch back lets the scheduler restore every frame to its
/// surface so the whole display retries at the next interval (frames are
/// moved, not cloned, so this is the only way back).
pub struct FailedBatch<F> {
    /// Why the batch was rejected.
    pub error: PresentError,
    /// The untouched batch.
    pub batch: PresentBatch<F>,
}

impl<F> fmt::Debug for FailedBatch<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailedBatch")
            .field("error", &self.error)
            .field("frames", &self.batch.frames.len())
            .finish()
    }
}

/// Hands present batches to a display pipeline.
///
/// Implemented by platform swapchain/compositor glue and by test doubles.
/// `present` must not block the producer's context beyond the hand-off
/// itself; backpressure is expressed through completion resolution, never by
/// stalling here.
pub trait Presenter<F> {
    /// Presents `batch` atomically for the next vsync of `batch.display`.
    ///
    /// On success the frames are consumed. On failure the *entire* batch
    /// must come back untouched in the [`FailedBatch`]; the scheduler
    /// restores the frames and retries next interval.
    fn present(&mut self, batch: PresentBatch<F>) -> Result<(), FailedBatch<F>>;
}
