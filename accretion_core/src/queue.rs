// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-context commit queue.
//!
//! Every [`FrameScheduler`] owns one [`CommitQueue`]: an ordered list of
//! [`CommitTask`]s created during the current unit of producer work. The
//! queue is appended to by `commit` (only on the idle→armed transition — a
//! coalesced commit enqueues nothing) and drained wholesale by `flush` at
//! the end of the unit of work and at explicit suspension points.
//!
//! Because appends and drains both happen on the producer's single-threaded
//! context, there is no concurrent append/drain hazard; the transactional
//! unit during a drain is the set of tasks sharing a display.
//!
//! [`FrameScheduler`]: crate::scheduler::FrameScheduler

use alloc::collections::VecDeque;

use crate::display::DisplayId;
use crate::surface::SurfaceId;

/// One unit of deferred commit work: "present whatever frame is pending for
/// this surface at its display's next interval".
///
/// Created when a surface transitions from idle to armed. Repeated commits
/// within one interval coalesce into the task already queued, so a queue
/// never holds two tasks for the same surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommitTask {
    /// The surface whose pending frame is being committed.
    pub surface: SurfaceId,
    /// The display binding captured at commit time.
    pub display: DisplayId,
}

/// Ordered commit tasks awaiting the next flush.
#[derive(Debug, Default)]
pub struct CommitQueue {
    tasks: VecDeque<CommitTask>,
    enqueued_total: u64,
}

impl CommitQueue {
    pub(crate) const fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
            enqueued_total: 0,
        }
    }

    pub(crate) fn push(&mut self, task: CommitTask) {
        debug_assert!(
            !self.tasks.iter().any(|t| t.surface == task.surface),
            "one queued task per surface"
        );
        self.tasks.push_back(task);
        self.enqueued_total += 1;
    }

    pub(crate) fn pop(&mut self) -> Option<CommitTask> {
        self.tasks.pop_front()
    }

    /// Number of tasks awaiting the next flush.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no tasks are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Total tasks ever enqueued on this queue (diagnostics).
    #[must_use]
    pub fn enqueued_total(&self) -> u64 {
        self.enqueued_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(idx: u32, display: u32) -> CommitTask {
        CommitTask {
            surface: SurfaceId {
                idx,
                generation: 0,
            },
            display: DisplayId(display),
        }
    }

    #[test]
    fn drains_in_commit_order() {
        let mut q = CommitQueue::new();
        q.push(task(0, 0));
        q.push(task(1, 0));
        q.push(task(2, 1));

        assert_eq!(q.len(), 3);
        assert_eq!(q.pop(), Some(task(0, 0)));
        assert_eq!(q.pop(), Some(task(1, 0)));
        assert_eq!(q.pop(), Some(task(2, 1)));
        assert_eq!(q.pop(), None);
        assert!(q.is_empty());
    }

    #[test]
    fn enqueued_total_survives_drains() {
        let mut q = CommitQueue::new();
        q.push(task(0, 0));
        let _ = q.pop();
        q.push(task(1, 0));
        assert_eq!(q.enqueued_total(), 2);
        assert_eq!(q.len(), 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "one queued task per surface")]
    fn duplicate_surface_task_is_a_bug() {
        let mut q = CommitQueue::new();
        q.push(task(0, 0));
        q.push(task(0, 0));
    }
}
