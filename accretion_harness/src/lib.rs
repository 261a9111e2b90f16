// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic simulation harness for the frame-delivery scheduler.
//!
//! Real hosts drive the scheduler from vsync callbacks; tests and demos
//! drive it from [`SimDisplay`], which owns a display's clock and a manual
//! notion of "now". Each [`step`](SimDisplay::step) plays one well-behaved
//! host interval: flush outstanding commits, advance time by one refresh
//! interval, deliver the resulting BeginFrame.
//!
//! [`RecordingPresenter`] stands in for the display pipeline: it records
//! which surfaces presented together in which interval (the property the
//! atomic-batch contract is about) and can reject batches on demand to
//! exercise the retry path.
//!
//! Harness frames are plain `u64` payloads — enough to assert identity and
//! ordering without dragging a rendering stack into the tests.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use accretion_core::backend::{FailedBatch, PresentBatch, Presenter};
use accretion_core::clock::{BeginFrame, DisplayClock};
use accretion_core::display::DisplayId;
use accretion_core::error::PresentError;
use accretion_core::scheduler::{FrameOutcome, FrameScheduler};
use accretion_core::surface::SurfaceId;
use accretion_core::time::{Duration, HostTime};
use accretion_core::trace::Tracer;

/// One accepted present batch, as observed by [`RecordingPresenter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresentRecord {
    /// The display the batch landed on.
    pub display: DisplayId,
    /// Tick counter of the consuming interval.
    pub frame_index: u64,
    /// `(surface, frame)` pairs presented together, in arming order.
    pub frames: Vec<(SurfaceId, u64)>,
}

/// Display-pipeline stand-in that records batches and can inject failures.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    /// Every accepted batch, in presentation order.
    pub records: Vec<PresentRecord>,
    /// When set, the next batch is rejected with this reason (then cleared).
    pub fail_next: Option<&'static str>,
}

impl RecordingPresenter {
    /// Creates a presenter with no recorded batches.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All frames ever presented for `display`, flattened in order.
    #[must_use]
    pub fn frames_for(&self, display: DisplayId) -> Vec<u64> {
        self.records
            .iter()
            .filter(|r| r.display == display)
            .flat_map(|r| r.frames.iter().map(|&(_, frame)| frame))
            .collect()
    }
}

impl Presenter<u64> for RecordingPresenter {
    fn present(&mut self, batch: PresentBatch<u64>) -> Result<(), FailedBatch<u64>> {
        if let Some(reason) = self.fail_next.take() {
            return Err(FailedBatch {
                error: PresentError {
                    display: batch.display,
                    reason,
                },
                batch,
            });
        }
        self.records.push(PresentRecord {
            display: batch.display,
            frame_index: batch.tick.frame_index,
            frames: batch.frames.iter().map(|f| (f.surface, f.frame)).collect(),
        });
        Ok(())
    }
}

/// A simulated display loop with a manually advanced clock.
#[derive(Debug)]
pub struct SimDisplay {
    clock: DisplayClock,
    now: HostTime,
}

impl SimDisplay {
    /// Creates a simulated display ticking every `refresh_interval`.
    #[must_use]
    pub fn new(display: DisplayId, refresh_interval: Duration) -> Self {
        Self {
            clock: DisplayClock::new(display, refresh_interval),
            now: HostTime(0),
        }
    }

    /// The display being simulated.
    #[must_use]
    pub fn display(&self) -> DisplayId {
        self.clock.display()
    }

    /// The simulation's current time.
    #[must_use]
    pub fn now(&self) -> HostTime {
        self.now
    }

    /// Plays one host interval: flush, advance one refresh interval, deliver
    /// the tick.
    ///
    /// # Errors
    ///
    /// Propagates a [`PresentError`] from a rejected batch; scheduler state
    /// is left pending for the next step's retry, exactly as for a real
    /// host.
    pub fn step(
        &mut self,
        scheduler: &mut FrameScheduler<u64>,
        presenter: &mut dyn Presenter<u64>,
    ) -> Result<FrameOutcome, PresentError> {
        let mut tracer = Tracer::none();
        // End of the producer's unit of work.
        scheduler.flush(&mut tracer);

        self.now = self.now + self.clock.refresh_interval();
        let tick = self
            .clock
            .tick(self.now)
            .expect("stepping a full interval always ticks");
        scheduler.begin_frame(&tick, presenter, &mut tracer)
    }

    /// Like [`step`](Self::step), but hands the tick back so hosts can pump
    /// callback registries against it afterwards.
    ///
    /// # Errors
    ///
    /// Same as [`step`](Self::step).
    pub fn step_with_tick(
        &mut self,
        scheduler: &mut FrameScheduler<u64>,
        presenter: &mut dyn Presenter<u64>,
    ) -> (BeginFrame, Result<FrameOutcome, PresentError>) {
        let mut tracer = Tracer::none();
        scheduler.flush(&mut tracer);

        self.now = self.now + self.clock.refresh_interval();
        let tick = self
            .clock
            .tick(self.now)
            .expect("stepping a full interval always ticks");
        let outcome = scheduler.begin_frame(&tick, presenter, &mut tracer);
        (tick, outcome)
    }
}

#[cfg(test)]
mod tests {
    use accretion_core::callbacks::FrameCallbacks;

    use super::*;

    const SIXTY_HZ: Duration = Duration(16_666_667);

    fn rig(display: DisplayId) -> (FrameScheduler<u64>, SimDisplay, RecordingPresenter) {
        (
            FrameScheduler::new(),
            SimDisplay::new(display, SIXTY_HZ),
            RecordingPresenter::new(),
        )
    }

    fn bound_surface(sched: &mut FrameScheduler<u64>, display: DisplayId) -> SurfaceId {
        let id = sched.create_surface();
        sched.bind(id, display).expect("fresh surface binds");
        id
    }

    #[test]
    fn same_display_surfaces_present_in_one_batch() {
        let (mut sched, mut sim, mut presenter) = rig(DisplayId(0));
        let a = bound_surface(&mut sched, DisplayId(0));
        let b = bound_surface(&mut sched, DisplayId(0));

        // Both commit within the same unit of work.
        let _ = sched.commit(a, 11).expect("commit a");
        let _ = sched.commit(b, 22).expect("commit b");

        let outcome = sim.step(&mut sched, &mut presenter).expect("step");
        assert_eq!(outcome.presented, 2);
        assert_eq!(presenter.records.len(), 1, "one batch, not two");
        assert_eq!(presenter.records[0].frames, &[(a, 11), (b, 22)]);
    }

    #[test]
    fn batch_failure_holds_back_every_member() {
        let (mut sched, mut sim, mut presenter) = rig(DisplayId(0));
        let a = bound_surface(&mut sched, DisplayId(0));
        let b = bound_surface(&mut sched, DisplayId(0));

        let wait_a = sched.commit(a, 1).expect("commit a");
        let wait_b = sched.commit(b, 2).expect("commit b");

        presenter.fail_next = Some("backing store lost");
        let err = sim
            .step(&mut sched, &mut presenter)
            .expect_err("injected failure");
        assert_eq!(err.reason, "backing store lost");
        assert!(presenter.records.is_empty(), "no partial present");
        assert!(sched.has_pending_frame(a) && sched.has_pending_frame(b));
        assert!(!wait_a.is_resolved() && !wait_b.is_resolved());

        // The next interval retries the whole batch together.
        let outcome = sim.step(&mut sched, &mut presenter).expect("retry");
        assert_eq!(outcome.presented, 2);
        assert_eq!(presenter.records.len(), 1);
        assert_eq!(presenter.records[0].frames, &[(a, 1), (b, 2)]);
    }

    #[test]
    fn displays_never_share_a_batch() {
        let mut sched = FrameScheduler::new();
        let mut sim0 = SimDisplay::new(DisplayId(0), SIXTY_HZ);
        let mut sim1 = SimDisplay::new(DisplayId(1), SIXTY_HZ);
        let mut presenter = RecordingPresenter::new();
        let a = bound_surface(&mut sched, DisplayId(0));
        let b = bound_surface(&mut sched, DisplayId(1));

        let _ = sched.commit(a, 1).expect("commit a");
        let _ = sched.commit(b, 2).expect("commit b");

        let _ = sim0.step(&mut sched, &mut presenter).expect("step 0");
        let _ = sim1.step(&mut sched, &mut presenter).expect("step 1");

        assert_eq!(presenter.records.len(), 2);
        assert_eq!(presenter.frames_for(DisplayId(0)), &[1]);
        assert_eq!(presenter.frames_for(DisplayId(1)), &[2]);
    }

    #[test]
    fn end_to_end_animation_sequence() {
        let (mut sched, mut sim, mut presenter) = rig(DisplayId(0));
        let id = bound_surface(&mut sched, DisplayId(0));

        // commit(A); tick 0 presents A but keeps the producer waiting.
        let wait = sched.commit(id, 10).expect("commit A");
        let outcome = sim.step(&mut sched, &mut presenter).expect("tick 0");
        assert_eq!((outcome.presented, outcome.resolved), (1, 0));
        assert!(!wait.is_resolved());

        // commit(B) before resolution coalesces into the same wait.
        let wait_b = sched.commit(id, 20).expect("commit B");
        assert!(wait.is_same(&wait_b));

        // Tick 1 presents B; tick 2 finally releases the producer.
        let _ = sim.step(&mut sched, &mut presenter).expect("tick 1");
        assert!(!wait.is_resolved());
        let outcome = sim.step(&mut sched, &mut presenter).expect("tick 2");
        assert_eq!(outcome.resolved, 1);
        assert!(wait.is_resolved());

        assert_eq!(presenter.frames_for(DisplayId(0)), &[10, 20]);
    }

    #[test]
    fn idle_steps_present_nothing() {
        let (mut sched, mut sim, mut presenter) = rig(DisplayId(0));
        let _surface = bound_surface(&mut sched, DisplayId(0));

        for _ in 0..5 {
            let outcome = sim.step(&mut sched, &mut presenter).expect("idle step");
            assert_eq!(outcome, FrameOutcome::default());
        }
        assert!(presenter.records.is_empty());
    }

    #[test]
    fn callback_loop_animates_through_the_sim() {
        let (mut sched, mut sim, mut presenter) = rig(DisplayId(0));
        let id = bound_surface(&mut sched, DisplayId(0));
        let mut callbacks = FrameCallbacks::new();
        let _ = callbacks.register(id, |t: &BeginFrame| t.frame_index);

        for _ in 0..8 {
            let (tick, outcome) = sim.step_with_tick(&mut sched, &mut presenter);
            let _ = outcome.expect("step");
            callbacks.pump(&mut sched, &tick).expect("pump");
        }

        // The callback paces itself to every other interval: produce,
        // present, resolve, produce again.
        let shown = presenter.frames_for(DisplayId(0));
        assert!(!shown.is_empty(), "callback produced frames");
        assert!(
            shown.windows(2).all(|w| w[0] < w[1]),
            "frames present in production order: {shown:?}"
        );
    }
}
