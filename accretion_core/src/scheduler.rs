// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The frame scheduler: commit, flush, and the BeginFrame step.
//!
//! [`FrameScheduler`] is the explicit context object for one producer
//! execution context. It owns every surface created in that context, the
//! context's single [`CommitQueue`], and the per-display arming state that
//! makes multi-surface presents atomic.
//!
//! # Protocol
//!
//! - [`commit`](FrameScheduler::commit) stores the frame as the surface's
//!   pending frame (overwriting any predecessor — backlog is bounded at one)
//!   and returns a [`Completion`]. Commits repeated within one presentation
//!   interval coalesce: same handle, one queued task, latest frame wins.
//! - [`flush`](FrameScheduler::flush) drains the commit queue, arming each
//!   task's surface under its display. Call it at the end of every unit of
//!   producer work and at every suspension point, so commits are never
//!   deferred past the point where the context could go idle.
//! - [`begin_frame`](FrameScheduler::begin_frame) consumes one display tick:
//!   every armed surface of that display joins a single all-or-nothing
//!   [`PresentBatch`]; surfaces with nothing pending but an unresolved
//!   completion are resolved. A surface never does both in one tick — a
//!   presented frame keeps its producer waiting until the *next* tick, which
//!   is what prevents overdraw.
//!
//! Surface state is only ever mutated from the owning context, so there is
//! no locking anywhere in this module; cross-thread tick delivery happens
//! upstream (see [`signal`](crate::signal)).

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::backend::{PresentBatch, Presenter, SubmittedFrame};
use crate::clock::BeginFrame;
use crate::completion::Completion;
use crate::display::DisplayId;
use crate::error::{CommitError, DetachError, PresentError};
use crate::queue::{CommitQueue, CommitTask};
use crate::surface::{SurfaceId, SurfaceState};
use crate::trace::{
    BeginFrameEvent, FlushEvent, PresentBatchEvent, PresentFailureEvent, ResolveEvent, Tracer,
};

/// Running totals for one scheduler (diagnostics only).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeliveryStats {
    /// `commit` calls accepted.
    pub committed: u64,
    /// Frames discarded by a later commit in the same interval.
    pub coalesced: u64,
    /// Frames handed to a display pipeline.
    pub presented: u64,
    /// Completions resolved.
    pub resolved: u64,
}

/// What one [`begin_frame`](FrameScheduler::begin_frame) call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Surfaces whose frames were presented in this tick's batch.
    pub presented: usize,
    /// Completions resolved in this tick.
    pub resolved: usize,
}

/// Per-context frame-delivery scheduler.
///
/// Owns surface slots (addressed by generational [`SurfaceId`]s), the
/// context's commit queue, and per-display arming lists. `F` is the opaque
/// frame snapshot type; the scheduler moves frames through a single-owner
/// chain — producer → surface → batch → presenter — and never clones or
/// inspects them.
#[derive(Debug)]
pub struct FrameScheduler<F> {
    states: Vec<SurfaceState<F>>,
    generation: Vec<u32>,
    free_list: Vec<u32>,
    queue: CommitQueue,
    /// Surfaces armed for each display's next tick, in arming order.
    armed: BTreeMap<DisplayId, Vec<SurfaceId>>,
    stats: DeliveryStats,
}

impl<F> Default for FrameScheduler<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> FrameScheduler<F> {
    /// Creates an empty scheduler.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            states: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            queue: CommitQueue::new(),
            armed: BTreeMap::new(),
            stats: DeliveryStats {
                committed: 0,
                coalesced: 0,
                presented: 0,
                resolved: 0,
            },
        }
    }

    // -- Surface lifecycle --

    /// Creates a new, unbound surface and returns its handle.
    pub fn create_surface(&mut self) -> SurfaceId {
        if let Some(idx) = self.free_list.pop() {
            self.generation[idx as usize] += 1;
            self.states[idx as usize] = SurfaceState::new();
            SurfaceId {
                idx,
                generation: self.generation[idx as usize],
            }
        } else {
            let idx = u32::try_from(self.states.len()).expect("surface count fits in u32");
            self.states.push(SurfaceState::new());
            self.generation.push(0);
            SurfaceId { idx, generation: 0 }
        }
    }

    /// Destroys a surface, recycling its slot.
    ///
    /// Fails while the surface still owes work (a committed frame or an
    /// unresolved completion): destroying it then would silently drop frames
    /// a producer already paid for, or strand a waiter.
    ///
    /// # Panics
    ///
    /// Panics on a stale handle.
    pub fn destroy_surface(&mut self, id: SurfaceId) -> Result<(), DetachError> {
        self.check_detachable(id)?;
        self.states[id.idx as usize] = SurfaceState::new();
        // Bump generation so old handles immediately fail validation.
        self.generation[id.idx as usize] += 1;
        self.free_list.push(id.idx);
        Ok(())
    }

    /// Binds a surface to a display's BeginFrame source.
    ///
    /// Rebinding is a transfer and follows the teardown rule: it fails while
    /// the surface has a pending frame or completion. Binding an unbound or
    /// idle surface always succeeds.
    ///
    /// # Panics
    ///
    /// Panics on a stale handle.
    pub fn bind(&mut self, id: SurfaceId, display: DisplayId) -> Result<(), DetachError> {
        let state = self.state(id);
        if state.bound_display.is_some() && state.bound_display != Some(display) {
            self.check_detachable(id)?;
        }
        self.states[id.idx as usize].bound_display = Some(display);
        Ok(())
    }

    /// Removes a surface's display binding.
    ///
    /// Fails while the surface still owes work, for the same reason as
    /// [`destroy_surface`](Self::destroy_surface). Detaching an already
    /// unbound surface succeeds.
    ///
    /// # Panics
    ///
    /// Panics on a stale handle.
    pub fn detach(&mut self, id: SurfaceId) -> Result<(), DetachError> {
        self.check_detachable(id)?;
        self.states[id.idx as usize].bound_display = None;
        Ok(())
    }

    /// Returns whether `id` refers to a live surface.
    #[must_use]
    pub fn is_valid(&self, id: SurfaceId) -> bool {
        (id.idx as usize) < self.states.len()
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    /// The display a surface is bound to, if any.
    ///
    /// # Panics
    ///
    /// Panics on a stale handle.
    #[must_use]
    pub fn display_of(&self, id: SurfaceId) -> Option<DisplayId> {
        self.state(id).bound_display
    }

    // -- The commit protocol --

    /// Submits a frame snapshot for presentation.
    ///
    /// The frame unconditionally becomes the surface's pending frame,
    /// discarding any not-yet-presented predecessor. If the producer is
    /// already waiting on a completion, that same handle is returned (the
    /// commits coalesce); otherwise a fresh completion is created and a
    /// commit task joins the context's queue.
    ///
    /// Never blocks: backpressure is expressed entirely through when the
    /// returned [`Completion`] resolves.
    ///
    /// # Errors
    ///
    /// [`CommitError::NotBound`] if the surface has no display binding — the
    /// frame could never be presented, so it is refused rather than queued
    /// forever.
    ///
    /// # Panics
    ///
    /// Panics on a stale handle.
    pub fn commit(&mut self, id: SurfaceId, frame: F) -> Result<Completion, CommitError> {
        self.expect_valid(id);
        let state = &mut self.states[id.idx as usize];
        let display = state.bound_display.ok_or(CommitError::NotBound)?;

        let had_frame = state.pending_frame.replace(frame).is_some();
        self.stats.committed += 1;
        if had_frame {
            self.stats.coalesced += 1;
        }

        let completion = match &state.pending_completion {
            Some(existing) => existing.clone(),
            None => {
                let fresh = Completion::new();
                state.pending_completion = Some(fresh.clone());
                fresh
            }
        };

        // Idle → armed transition: exactly one task per surface per
        // presentation interval, regardless of how many commits landed.
        if !had_frame && !state.armed {
            self.queue.push(CommitTask {
                surface: id,
                display,
            });
        }

        Ok(completion)
    }

    /// Drains the commit queue, arming each task's surface for its display's
    /// next tick. Returns the number of tasks drained.
    ///
    /// Call at the end of every unit of producer work and at every explicit
    /// suspension point. All tasks for one display drained here land in the
    /// same atomic batch: one present operation per display per flush.
    pub fn flush(&mut self, tracer: &mut Tracer<'_>) -> usize {
        let mut drained = 0_usize;
        while let Some(task) = self.queue.pop() {
            drained += 1;
            debug_assert!(self.is_valid(task.surface), "queued task outlived surface");
            let state = &mut self.states[task.surface.idx as usize];
            debug_assert!(state.pending_frame.is_some(), "armed surface has no frame");
            state.armed = true;
            self.armed.entry(task.display).or_default().push(task.surface);
        }
        if drained > 0 {
            tracer.flush(&FlushEvent { tasks: drained });
        }
        drained
    }

    /// Processes one BeginFrame tick for `tick.display`.
    ///
    /// Presents the pending frames of every armed surface on that display as
    /// one all-or-nothing batch, then resolves the completion of every bound
    /// surface that had nothing left to present. A surface that presented in
    /// this tick is *not* resolved — its producer keeps waiting until the
    /// frame it reserved has actually shipped and a further tick arrives.
    ///
    /// # Errors
    ///
    /// If the presenter rejects the batch, every member surface keeps its
    /// pending frame and unresolved completion (the whole display retries at
    /// the next tick) and the [`PresentError`] is returned. No completion is
    /// resolved in a failing tick.
    pub fn begin_frame(
        &mut self,
        tick: &BeginFrame,
        presenter: &mut dyn Presenter<F>,
        tracer: &mut Tracer<'_>,
    ) -> Result<FrameOutcome, PresentError> {
        tracer.begin_frame(&BeginFrameEvent::from(tick));

        let armed = self.armed.remove(&tick.display).unwrap_or_default();

        // Present step: move every armed frame into one batch.
        let mut presented = 0_usize;
        if !armed.is_empty() {
            let mut frames = Vec::with_capacity(armed.len());
            for &id in &armed {
                let state = &mut self.states[id.idx as usize];
                let frame = state
                    .pending_frame
                    .take()
                    .expect("armed surface lost its pending frame");
                frames.push(SubmittedFrame { surface: id, frame });
            }

            let batch = PresentBatch {
                display: tick.display,
                tick: *tick,
                frames,
            };

            match presenter.present(batch) {
                Ok(()) => {
                    presented = armed.len();
                    for &id in &armed {
                        self.states[id.idx as usize].armed = false;
                    }
                    self.stats.presented += presented as u64;
                    tracer.present_batch(&PresentBatchEvent {
                        display: tick.display,
                        frame_index: tick.frame_index,
                        surfaces: presented,
                    });
                }
                Err(failed) => {
                    // Atomic failure: hand every frame back to its surface
                    // and re-arm the whole display for the next interval.
                    let held_back = failed.batch.frames.len();
                    for submitted in failed.batch.frames {
                        let state = &mut self.states[submitted.surface.idx as usize];
                        debug_assert!(
                            state.pending_frame.is_none(),
                            "surface gained a frame mid-present"
                        );
                        state.pending_frame = Some(submitted.frame);
                    }
                    self.armed.insert(tick.display, armed);
                    tracer.present_failure(&PresentFailureEvent {
                        display: tick.display,
                        frame_index: tick.frame_index,
                        surfaces: held_back,
                        reason: failed.error.reason,
                    });
                    return Err(failed.error);
                }
            }
        }

        // Resolve step: release producers whose frame already shipped in an
        // earlier tick. Surfaces presented just now are skipped (their
        // pending_frame was consumed this tick, not before it), as are
        // surfaces holding an unflushed frame.
        let mut resolved = 0_usize;
        for (idx, state) in self.states.iter_mut().enumerate() {
            if state.bound_display != Some(tick.display)
                || state.pending_frame.is_some()
                || armed.iter().any(|a| a.idx as usize == idx)
            {
                continue;
            }
            if let Some(completion) = state.pending_completion.take() {
                completion.resolve();
                resolved += 1;
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "slot indices are u32 by construction"
                )]
                let idx = idx as u32;
                tracer.resolve(&ResolveEvent {
                    surface: SurfaceId {
                        idx,
                        generation: self.generation[idx as usize],
                    },
                    display: tick.display,
                    frame_index: tick.frame_index,
                });
            }
        }
        self.stats.resolved += resolved as u64;

        Ok(FrameOutcome {
            presented,
            resolved,
        })
    }

    // -- Introspection --

    /// Whether the surface holds a committed, not-yet-presented frame.
    ///
    /// # Panics
    ///
    /// Panics on a stale handle.
    #[must_use]
    pub fn has_pending_frame(&self, id: SurfaceId) -> bool {
        self.state(id).pending_frame.is_some()
    }

    /// Whether the surface's producer is waiting on an unresolved completion.
    ///
    /// # Panics
    ///
    /// Panics on a stale handle.
    #[must_use]
    pub fn has_pending_completion(&self, id: SurfaceId) -> bool {
        self.state(id).pending_completion.is_some()
    }

    /// The context's commit queue (read-only; diagnostics).
    #[must_use]
    pub fn commit_queue(&self) -> &CommitQueue {
        &self.queue
    }

    /// Running delivery totals.
    #[must_use]
    pub fn stats(&self) -> DeliveryStats {
        self.stats
    }

    // -- Internals --

    fn state(&self, id: SurfaceId) -> &SurfaceState<F> {
        self.expect_valid(id);
        &self.states[id.idx as usize]
    }

    fn check_detachable(&self, id: SurfaceId) -> Result<(), DetachError> {
        let state = self.state(id);
        if state.pending_frame.is_some() {
            return Err(DetachError::FramePending);
        }
        if state.pending_completion.is_some() {
            return Err(DetachError::CompletionPending);
        }
        Ok(())
    }

    #[track_caller]
    fn expect_valid(&self, id: SurfaceId) {
        assert!(
            self.is_valid(id),
            "stale surface handle {id:?} (surface destroyed or never created here)"
        );
    }
}
