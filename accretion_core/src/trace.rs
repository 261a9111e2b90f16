// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the scheduling loop.
//!
//! [`TraceSink`] has one method per protocol stage, each with a no-op
//! default, so a sink implements only the events it cares about. [`Tracer`]
//! wraps an optional `&mut dyn TraceSink`: with the `trace` feature **off**
//! every `Tracer` method compiles to nothing; with it **on**, each method is
//! a single `Option` branch before dispatch.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).

use crate::clock::BeginFrame;
use crate::display::DisplayId;
use crate::surface::SurfaceId;
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a BeginFrame tick reaches the scheduler.
#[derive(Clone, Copy, Debug)]
pub struct BeginFrameEvent {
    /// The display the tick targets.
    pub display: DisplayId,
    /// Tick counter for that display.
    pub frame_index: u64,
    /// Host time carried by the tick.
    pub now: HostTime,
}

impl From<&BeginFrame> for BeginFrameEvent {
    fn from(tick: &BeginFrame) -> Self {
        Self {
            display: tick.display,
            frame_index: tick.frame_index,
            now: tick.now,
        }
    }
}

/// Emitted when the commit queue is drained.
#[derive(Clone, Copy, Debug)]
pub struct FlushEvent {
    /// Number of commit tasks drained by this flush.
    pub tasks: usize,
}

/// Emitted after a present batch is accepted by the display pipeline.
#[derive(Clone, Copy, Debug)]
pub struct PresentBatchEvent {
    /// The display that received the batch.
    pub display: DisplayId,
    /// Tick counter of the consuming interval.
    pub frame_index: u64,
    /// Number of surfaces presented together.
    pub surfaces: usize,
}

/// Emitted when the display pipeline rejects a present batch.
#[derive(Clone, Copy, Debug)]
pub struct PresentFailureEvent {
    /// The display whose batch was rejected.
    pub display: DisplayId,
    /// Tick counter of the failing interval.
    pub frame_index: u64,
    /// Number of surfaces held back for retry.
    pub surfaces: usize,
    /// Host-provided failure description.
    pub reason: &'static str,
}

/// Emitted when a surface's completion resolves.
#[derive(Clone, Copy, Debug)]
pub struct ResolveEvent {
    /// The surface whose producer was released.
    pub surface: SurfaceId,
    /// The display whose tick drove the resolution.
    pub display: DisplayId,
    /// Tick counter of the resolving interval.
    pub frame_index: u64,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the scheduling loop.
///
/// All methods have default no-op implementations.
pub trait TraceSink {
    /// Called when a BeginFrame tick reaches the scheduler.
    fn on_begin_frame(&mut self, e: &BeginFrameEvent) {
        _ = e;
    }

    /// Called when the commit queue is drained.
    fn on_flush(&mut self, e: &FlushEvent) {
        _ = e;
    }

    /// Called after a present batch is accepted.
    fn on_present_batch(&mut self, e: &PresentBatchEvent) {
        _ = e;
    }

    /// Called when a present batch is rejected.
    fn on_present_failure(&mut self, e: &PresentFailureEvent) {
        _ = e;
    }

    /// Called when a completion resolves.
    fn on_resolve(&mut self, e: &ResolveEvent) {
        _ = e;
    }
}

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`BeginFrameEvent`].
    #[inline]
    pub fn begin_frame(&mut self, e: &BeginFrameEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_begin_frame(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FlushEvent`].
    #[inline]
    pub fn flush(&mut self, e: &FlushEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_flush(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PresentBatchEvent`].
    #[inline]
    pub fn present_batch(&mut self, e: &PresentBatchEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_present_batch(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PresentFailureEvent`].
    #[inline]
    pub fn present_failure(&mut self, e: &PresentFailureEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_present_failure(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ResolveEvent`].
    #[inline]
    pub fn resolve(&mut self, e: &ResolveEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_resolve(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tick_event() -> BeginFrameEvent {
        BeginFrameEvent {
            display: DisplayId(0),
            frame_index: 42,
            now: HostTime(1_000_000),
        }
    }

    #[test]
    fn noop_sink_accepts_everything() {
        let mut sink = NoopSink;
        sink.on_begin_frame(&sample_tick_event());
        sink.on_flush(&FlushEvent { tasks: 3 });
        sink.on_present_batch(&PresentBatchEvent {
            display: DisplayId(0),
            frame_index: 42,
            surfaces: 2,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.begin_frame(&sample_tick_event());
        tracer.flush(&FlushEvent { tasks: 0 });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            frames: Vec<u64>,
        }
        impl TraceSink for RecordingSink {
            fn on_begin_frame(&mut self, e: &BeginFrameEvent) {
                self.frames.push(e.frame_index);
            }
        }

        let mut sink = RecordingSink { frames: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.begin_frame(&sample_tick_event());
        drop(tracer);
        assert_eq!(sink.frames, &[42]);
    }
}
