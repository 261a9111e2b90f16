// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legacy per-interval callback registration.
//!
//! Some hosts expose a classic animation-callback API: register a callback,
//! get invoked once per display interval, cancel by handle. That model is a
//! thin layer over the commit protocol — each invocation is an implicit
//! commit-then-rearm: the callback produces a frame, the adapter commits it,
//! and the callback only runs again once the resulting completion resolves.
//! The scheduler's backpressure applies unchanged, and a registration that
//! never produces a frame simply never commits (no stranded waits).
//!
//! Drive [`FrameCallbacks::pump`] once per tick, *after*
//! [`FrameScheduler::begin_frame`] for that tick (so fresh resolutions
//! re-arm their callbacks), and flush afterwards as usual.
//!
//! [`FrameScheduler::begin_frame`]: crate::scheduler::FrameScheduler::begin_frame

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::clock::BeginFrame;
use crate::completion::Completion;
use crate::error::CommitError;
use crate::scheduler::FrameScheduler;
use crate::surface::SurfaceId;

/// Handle for cancelling a registered callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

struct Entry<F> {
    id: CallbackId,
    surface: SurfaceId,
    callback: Box<dyn FnMut(&BeginFrame) -> F>,
    /// Completion from this entry's last commit; the callback re-runs only
    /// once it resolves.
    waiting: Option<Completion>,
}

/// Registry of per-interval frame callbacks for one scheduler context.
///
/// Callbacks registered against surfaces on different displays can share one
/// registry; each [`pump`](Self::pump) only touches the tick's display.
pub struct FrameCallbacks<F> {
    entries: Vec<Entry<F>>,
    next_id: u64,
}

impl<F> Default for FrameCallbacks<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> FrameCallbacks<F> {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Registers `callback` to produce one frame per interval for `surface`.
    ///
    /// The callback stays registered until [`cancel`](Self::cancel)led.
    /// Cancel before destroying the surface; a pump hitting a stale surface
    /// handle panics like any other stale-handle use.
    pub fn register(
        &mut self,
        surface: SurfaceId,
        callback: impl FnMut(&BeginFrame) -> F + 'static,
    ) -> CallbackId {
        let id = CallbackId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            surface,
            callback: Box::new(callback),
            waiting: None,
        });
        id
    }

    /// Removes a registration. Returns `false` if the handle was already
    /// cancelled. A frame already committed by the callback still presents;
    /// cancellation only stops future invocations.
    pub fn cancel(&mut self, id: CallbackId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        before != self.entries.len()
    }

    /// Number of live registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no callbacks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs every ready callback whose surface is bound to `tick.display`,
    /// committing the produced frames. Returns the number of callbacks run.
    ///
    /// A callback is ready when it has never committed or when its previous
    /// commit's completion has resolved; one still waiting is skipped, which
    /// is what keeps callback producers paced to the display.
    ///
    /// # Errors
    ///
    /// Propagates [`CommitError`] from the underlying commits (e.g. a
    /// registered surface lost its binding). Earlier commits in the same
    /// pump remain in effect.
    pub fn pump(
        &mut self,
        scheduler: &mut FrameScheduler<F>,
        tick: &BeginFrame,
    ) -> Result<usize, CommitError> {
        let mut ran = 0_usize;
        for entry in &mut self.entries {
            if scheduler.display_of(entry.surface) != Some(tick.display) {
                continue;
            }
            if entry.waiting.as_ref().is_some_and(|w| !w.is_resolved()) {
                continue;
            }
            let frame = (entry.callback)(tick);
            entry.waiting = Some(scheduler.commit(entry.surface, frame)?);
            ran += 1;
        }
        Ok(ran)
    }
}

impl<F> fmt::Debug for FrameCallbacks<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameCallbacks")
            .field("entries", &self.entries.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use crate::backend::{FailedBatch, PresentBatch, Presenter};
    use crate::display::DisplayId;
    use crate::time::{Duration, HostTime};
    use crate::trace::Tracer;

    use super::*;

    struct CountingPresenter {
        frames: Vec<u64>,
    }

    impl Presenter<u64> for CountingPresenter {
        fn present(&mut self, batch: PresentBatch<u64>) -> Result<(), FailedBatch<u64>> {
            self.frames.extend(batch.frames.iter().map(|f| f.frame));
            Ok(())
        }
    }

    fn tick(frame_index: u64) -> BeginFrame {
        BeginFrame {
            display: DisplayId(0),
            now: HostTime(frame_index * 16_666_667),
            frame_index,
            refresh_interval: Duration(16_666_667),
        }
    }

    /// One full host-side interval: deliver the tick, pump callbacks, flush.
    fn run_interval(
        sched: &mut FrameScheduler<u64>,
        callbacks: &mut FrameCallbacks<u64>,
        presenter: &mut CountingPresenter,
        frame_index: u64,
    ) {
        let t = tick(frame_index);
        let mut tracer = Tracer::none();
        sched
            .begin_frame(&t, presenter, &mut tracer)
            .expect("present");
        callbacks.pump(sched, &t).expect("pump");
        sched.flush(&mut tracer);
    }

    #[test]
    fn callback_commits_once_per_interval() {
        let mut sched = FrameScheduler::<u64>::new();
        let surface = sched.create_surface();
        sched.bind(surface, DisplayId(0)).expect("bind");
        let mut callbacks = FrameCallbacks::new();
        let mut presenter = CountingPresenter { frames: Vec::new() };

        let _ = callbacks.register(surface, |t: &BeginFrame| t.frame_index * 100);

        // Interval 0: callback runs (never committed) and commits frame 0.
        // Interval 1: frame 0 presents; the callback waits (unresolved).
        // Interval 2: resolution lands, the callback commits frame 200.
        run_interval(&mut sched, &mut callbacks, &mut presenter, 0);
        assert_eq!(presenter.frames, &[] as &[u64]);
        run_interval(&mut sched, &mut callbacks, &mut presenter, 1);
        assert_eq!(presenter.frames, &[0]);
        run_interval(&mut sched, &mut callbacks, &mut presenter, 2);
        run_interval(&mut sched, &mut callbacks, &mut presenter, 3);
        assert_eq!(presenter.frames, &[0, 200]);
    }

    #[test]
    fn cancel_stops_future_invocations() {
        let mut sched = FrameScheduler::<u64>::new();
        let surface = sched.create_surface();
        sched.bind(surface, DisplayId(0)).expect("bind");
        let mut callbacks = FrameCallbacks::new();
        let mut presenter = CountingPresenter { frames: Vec::new() };

        let id = callbacks.register(surface, |_t: &BeginFrame| 1);
        run_interval(&mut sched, &mut callbacks, &mut presenter, 0);

        assert!(callbacks.cancel(id));
        assert!(!callbacks.cancel(id), "second cancel is a no-op");
        assert!(callbacks.is_empty());

        // The already-committed frame still presents.
        run_interval(&mut sched, &mut callbacks, &mut presenter, 1);
        assert_eq!(presenter.frames, &[1]);
        // But nothing new is produced.
        run_interval(&mut sched, &mut callbacks, &mut presenter, 2);
        run_interval(&mut sched, &mut callbacks, &mut presenter, 3);
        assert_eq!(presenter.frames, &[1]);
    }

    #[test]
    fn pump_ignores_other_displays() {
        let mut sched = FrameScheduler::<u64>::new();
        let surface = sched.create_surface();
        sched.bind(surface, DisplayId(5)).expect("bind");
        let mut callbacks = FrameCallbacks::new();

        let _ = callbacks.register(surface, |_t: &BeginFrame| 1);
        let ran = callbacks.pump(&mut sched, &tick(0)).expect("pump");
        assert_eq!(ran, 0, "tick targets display 0, surface lives on 5");
        assert!(!sched.has_pending_frame(surface));
    }
}
