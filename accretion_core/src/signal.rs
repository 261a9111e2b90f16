// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cross-thread BeginFrame delivery.
//!
//! A display's timing source often lives outside the producer's execution
//! context (a vsync interrupt thread, a timer thread). Ticks cross that
//! boundary through a single-slot latest-value channel: the source *posts*
//! ticks from its thread, the producer's context *takes* them as ordinary
//! units of work. A slow consumer never builds a tick backlog — a newer tick
//! replaces an untaken older one, which is exactly right for refresh
//! signals (a display can only be "ready now", never "ready twice").
//!
//! Requires the `std` feature (the slot is a mutex; the rest of the crate
//! has no use for one).

use alloc::sync::Arc;
use std::sync::Mutex;

use crate::clock::BeginFrame;

#[derive(Debug, Default)]
struct Slot {
    tick: Option<BeginFrame>,
    /// Ticks overwritten before the consumer took them.
    coalesced: u64,
}

/// Creates a connected single-slot tick channel.
///
/// The [`TickSender`] side is `Send + Sync` and lives with the timing
/// source; the [`TickReceiver`] side is polled from the producer's context.
#[must_use]
pub fn tick_slot() -> (TickSender, TickReceiver) {
    let slot = Arc::new(Mutex::new(Slot::default()));
    (
        TickSender {
            slot: Arc::clone(&slot),
        },
        TickReceiver { slot },
    )
}

/// The posting side of a tick slot. Clone freely; all clones feed one slot.
#[derive(Clone, Debug)]
pub struct TickSender {
    slot: Arc<Mutex<Slot>>,
}

impl TickSender {
    /// Posts a tick, replacing any tick the consumer has not taken yet.
    ///
    /// Returns `true` if an untaken tick was replaced (the consumer is
    /// running behind).
    pub fn post(&self, tick: BeginFrame) -> bool {
        let mut slot = self.slot.lock().expect("tick slot poisoned");
        let replaced = slot.tick.replace(tick).is_some();
        if replaced {
            slot.coalesced += 1;
        }
        replaced
    }
}

/// The consuming side of a tick slot.
#[derive(Debug)]
pub struct TickReceiver {
    slot: Arc<Mutex<Slot>>,
}

impl TickReceiver {
    /// Takes the latest posted tick, if any, emptying the slot.
    #[must_use]
    pub fn take(&self) -> Option<BeginFrame> {
        self.slot.lock().expect("tick slot poisoned").tick.take()
    }

    /// Total ticks that were overwritten before this receiver took them.
    #[must_use]
    pub fn coalesced_ticks(&self) -> u64 {
        self.slot.lock().expect("tick slot poisoned").coalesced
    }
}
