// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display clock and the BeginFrame tick.
//!
//! [`DisplayClock`] turns an arbitrary stream of "now" observations (a timer
//! callback, a vsync interrupt handler, a simulated loop) into paced
//! [`BeginFrame`] ticks for one display. The clock enforces the throttling
//! half of the backpressure contract: it never emits ticks closer together
//! than the display's refresh interval, no matter how often it is polled.
//!
//! The skipping half — never skipping an interval while a surface has a
//! frame ready — falls out of polling: as long as the host polls at least
//! once per interval, every interval in which work is pending produces a
//! tick, and the scheduler presents whatever is armed.

use crate::display::DisplayId;
use crate::time::{Duration, HostTime};

/// A per-interval readiness signal for one display.
///
/// Delivered to [`FrameScheduler::begin_frame`] once per refresh interval.
/// Carries enough timing context for hosts and trace sinks; the scheduler
/// itself only consumes `display` and `frame_index`.
///
/// [`FrameScheduler::begin_frame`]: crate::scheduler::FrameScheduler::begin_frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BeginFrame {
    /// Which display is ready for its next frame.
    pub display: DisplayId,
    /// Host time when the tick was generated.
    pub now: HostTime,
    /// Monotonically increasing tick counter for this display.
    pub frame_index: u64,
    /// The clock's refresh interval.
    pub refresh_interval: Duration,
}

/// Paced [`BeginFrame`] source for a single display.
///
/// Feed the current time to [`tick`](Self::tick); a `Some` result is a tick
/// the host must deliver to the scheduler, a `None` means the display cannot
/// physically refresh yet. State is just the last emission time and a frame
/// counter, so a clock can be rebuilt freely (e.g. on refresh-rate change)
/// without touching scheduler state.
#[derive(Clone, Debug)]
pub struct DisplayClock {
    display: DisplayId,
    refresh_interval: Duration,
    last_tick: Option<HostTime>,
    frame_index: u64,
}

impl DisplayClock {
    /// Creates a clock for `display` with the given refresh interval.
    ///
    /// # Panics
    ///
    /// Panics if `refresh_interval` is zero; a zero interval would defeat
    /// throttling entirely.
    #[must_use]
    pub const fn new(display: DisplayId, refresh_interval: Duration) -> Self {
        assert!(
            refresh_interval.nanos() > 0,
            "refresh interval must be non-zero"
        );
        Self {
            display,
            refresh_interval,
            last_tick: None,
            frame_index: 0,
        }
    }

    /// The display this clock paces.
    #[must_use]
    pub const fn display(&self) -> DisplayId {
        self.display
    }

    /// The configured refresh interval.
    #[must_use]
    pub const fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Offers the current time to the clock.
    ///
    /// Returns a [`BeginFrame`] if at least one refresh interval has elapsed
    /// since the previous tick (the first call always ticks). Polling faster
    /// than the refresh rate yields `None` — this is what keeps BeginFrame
    /// delivery from outrunning the display.
    ///
    /// A late poll produces a single tick, not a burst: missed intervals are
    /// collapsed rather than replayed, since a display can only show the
    /// latest frame anyway.
    pub fn tick(&mut self, now: HostTime) -> Option<BeginFrame> {
        if let Some(last) = self.last_tick
            && now.saturating_duration_since(last) < self.refresh_interval
        {
            return None;
        }

        let frame_index = self.frame_index;
        self.frame_index += 1;
        self.last_tick = Some(now);

        Some(BeginFrame {
            display: self.display,
            now,
            frame_index,
            refresh_interval: self.refresh_interval,
        })
    }

    /// The earliest time the next tick can fire, or `None` before the first
    /// tick (which fires immediately). Hosts can use this to sleep between
    /// polls instead of spinning.
    #[must_use]
    pub fn next_deadline(&self) -> Option<HostTime> {
        self.last_tick
            .and_then(|last| last.checked_add(self.refresh_interval))
    }
}
