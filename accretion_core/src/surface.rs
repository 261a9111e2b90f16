// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface identity and per-surface scheduling state.
//!
//! A surface is the scheduling state machine for one producer-side canvas.
//! The state itself lives in slots owned by the
//! [`FrameScheduler`](crate::scheduler::FrameScheduler); producers address it
//! through [`SurfaceId`] handles with generation counters, so a handle to a
//! destroyed surface is detected rather than silently hitting a recycled
//! slot.

use core::fmt;

use crate::completion::Completion;
use crate::display::DisplayId;

/// A handle to a surface owned by a `FrameScheduler`.
///
/// Contains a slot index and a generation counter; the generation must match
/// the scheduler's current generation for the slot, so stale handles fail
/// validation after the surface is destroyed and the slot reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl SurfaceId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SurfaceId({}@gen{})", self.idx, self.generation)
    }
}

/// Per-surface scheduling state.
///
/// Invariants (checked by the scheduler, not re-checked here):
///
/// - at most one unresolved completion at a time;
/// - `pending_frame`, when set, is the most recently committed
///   not-yet-presented frame — depth-1 backlog by construction;
/// - `armed` implies `pending_frame.is_some()` between a flush and the
///   consuming BeginFrame.
pub(crate) struct SurfaceState<F> {
    /// Latest committed, not-yet-presented frame.
    pub(crate) pending_frame: Option<F>,
    /// Outstanding completion shared with the producer.
    pub(crate) pending_completion: Option<Completion>,
    /// Display this surface presents to, if bound.
    pub(crate) bound_display: Option<DisplayId>,
    /// Whether a flush has made the pending frame eligible for the next
    /// BeginFrame's present batch.
    pub(crate) armed: bool,
}

impl<F> SurfaceState<F> {
    pub(crate) const fn new() -> Self {
        Self {
            pending_frame: None,
            pending_completion: None,
            bound_display: None,
            armed: false,
        }
    }

    /// Whether the surface still owes work to the display (the condition
    /// that blocks detach/rebind/destroy).
    pub(crate) const fn has_pending_work(&self) -> bool {
        self.pending_frame.is_some() || self.pending_completion.is_some()
    }
}

impl<F> fmt::Debug for SurfaceState<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceState")
            .field("pending_frame", &self.pending_frame.is_some())
            .field("pending_completion", &self.pending_completion.is_some())
            .field("bound_display", &self.bound_display)
            .field("armed", &self.armed)
            .finish()
    }
}
