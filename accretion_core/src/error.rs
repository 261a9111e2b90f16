// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for the scheduling protocol.
//!
//! Only *recoverable* conditions are expressed as errors: committing without
//! a display binding, tearing down a surface that still owes work, and a
//! display pipeline rejecting a present batch. Handle misuse (stale
//! [`SurfaceId`]s, double resolution) is a programming error and panics,
//! matching the store's assertion discipline.
//!
//! [`SurfaceId`]: crate::surface::SurfaceId

use thiserror::Error;

use crate::display::DisplayId;

/// Why a `commit` was rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CommitError {
    /// The surface has no display binding, so the frame could never be
    /// presented. Committing would queue the frame forever; fail fast
    /// instead.
    #[error("surface is not bound to a display")]
    NotBound,
}

/// Why a detach, rebind, or destroy was rejected.
///
/// Both variants mean the same thing to callers — committed work would be
/// silently dropped or a waiter stranded — but naming which piece is
/// outstanding makes the condition actionable.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum DetachError {
    /// A committed frame has not been presented yet.
    #[error("surface holds a committed frame awaiting presentation")]
    FramePending,
    /// A producer is still waiting on an unresolved completion.
    #[error("surface has an unresolved completion outstanding")]
    CompletionPending,
}

/// A display pipeline rejected an atomic present batch.
///
/// Transient by contract: the scheduler keeps every member surface of the
/// failed batch in its pending state, and the same batch (or a coalesced
/// successor) retries at the display's next interval.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("present batch for {display:?} failed: {reason}")]
pub struct PresentError {
    /// The display whose batch failed.
    pub display: DisplayId,
    /// Host-provided description of the failure.
    pub reason: &'static str,
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn messages_name_the_condition() {
        assert_eq!(
            CommitError::NotBound.to_string(),
            "surface is not bound to a display"
        );
        assert!(DetachError::FramePending.to_string().contains("committed frame"));
        let e = PresentError {
            display: DisplayId(3),
            reason: "swapchain lost",
        };
        assert!(e.to_string().contains("DisplayId(3)"));
        assert!(e.to_string().contains("swapchain lost"));
    }
}
