// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display identification.
//!
//! [`DisplayId`] is a lightweight handle naming a physical display (or any
//! other presentation sink with its own refresh cadence). Hosts assign these
//! when they enumerate displays; the scheduler treats them as opaque keys for
//! grouping surfaces into atomic present batches.

use core::fmt;

/// Identifies a physical display or presentation sink.
///
/// Hosts assign display IDs; the scheduler only uses them to group surfaces
/// that must present in lock-step and never interprets the value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DisplayId(pub u32);

impl fmt::Debug for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DisplayId({})", self.0)
    }
}
