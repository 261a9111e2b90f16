// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Completion handles returned by `commit`.
//!
//! A [`Completion`] is a single-resolution, clone-shared handle. The producer
//! holds it (or clones of it) and awaits resolution; the scheduler resolves
//! it when the surface is clear to accept the next frame. Resolution carries
//! no payload: it means "the display has caught up, submit again", not "your
//! exact frame is on screen" (a later commit may have coalesced over it).
//!
//! Handles are `!Send` by construction ([`Rc`] state): they belong to the
//! producer's single-threaded context, same as the surface they came from.
//! Waiting is cooperative — [`Completion`] implements [`Future`], and polling
//! parks a waker rather than blocking.

use alloc::rc::Rc;
use core::cell::{Cell, RefCell};
use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, Waker};

/// Shared state between all clones of one completion handle.
#[derive(Default)]
struct CompletionState {
    resolved: Cell<bool>,
    waker: RefCell<Option<Waker>>,
}

/// A handle to an outstanding frame submission.
///
/// Returned by [`FrameScheduler::commit`]. All commits coalesced into the
/// same presentation interval return clones of the same handle; use
/// [`is_same`](Self::is_same) to observe that identity.
///
/// [`FrameScheduler::commit`]: crate::scheduler::FrameScheduler::commit
#[derive(Clone)]
pub struct Completion {
    inner: Rc<CompletionState>,
}

impl Completion {
    pub(crate) fn new() -> Self {
        Self {
            inner: Rc::new(CompletionState::default()),
        }
    }

    /// Marks the completion resolved and wakes a parked waiter, if any.
    ///
    /// Scheduler-internal: producers only ever observe resolution.
    ///
    /// # Panics
    ///
    /// Panics in debug builds on double resolution; the surface protocol
    /// guarantees each completion resolves exactly once.
    pub(crate) fn resolve(&self) {
        debug_assert!(!self.inner.resolved.get(), "completion resolved twice");
        self.inner.resolved.set(true);
        if let Some(waker) = self.inner.waker.borrow_mut().take() {
            waker.wake();
        }
    }

    /// Whether the scheduler has released this submission.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.inner.resolved.get()
    }

    /// Whether two handles share one resolution (i.e. their commits were
    /// coalesced into the same wait).
    #[must_use]
    pub fn is_same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Future for Completion {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.inner.resolved.get() {
            Poll::Ready(())
        } else {
            *self.inner.waker.borrow_mut() = Some(cx.waker().clone());
            Poll::Pending
        }
    }
}

/// Test-only equality: handle identity, exactly [`Completion::is_same`].
/// Needed so `assert_eq!` can compare `Result<Completion, _>` values.
#[cfg(test)]
impl PartialEq for Completion {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other)
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("resolved", &self.inner.resolved.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unresolved() {
        let handle = Completion::new();
        assert!(!handle.is_resolved());
    }

    #[test]
    fn resolve_is_visible_through_all_clones() {
        let handle = Completion::new();
        let other = handle.clone();
        handle.resolve();
        assert!(handle.is_resolved());
        assert!(other.is_resolved());
    }

    #[test]
    fn clones_share_identity_across_completions() {
        let a = Completion::new();
        let b = Completion::new();
        assert!(a.is_same(&a.clone()));
        assert!(!a.is_same(&b));
    }

    #[test]
    fn future_is_pending_until_resolved() {
        let mut handle = Completion::new();
        let waker = Waker::noop();
        let mut cx = Context::from_waker(waker);

        assert_eq!(Pin::new(&mut handle).poll(&mut cx), Poll::Pending);
        handle.resolve();
        assert_eq!(Pin::new(&mut handle).poll(&mut cx), Poll::Ready(()));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "completion resolved twice")]
    fn double_resolution_is_a_bug() {
        let handle = Completion::new();
        handle.resolve();
        handle.resolve();
    }
}
