// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic host time.
//!
//! [`HostTime`] is a point on the host's monotonic clock, expressed in
//! nanosecond ticks. [`Duration`] is a span in the same units. The scheduler
//! never reads a clock itself; hosts stamp [`BeginFrame`] ticks with whatever
//! monotonic source the platform provides, converted to nanoseconds.
//!
//! [`BeginFrame`]: crate::clock::BeginFrame

use core::fmt;
use core::ops::{Add, Sub};

/// A point in time on the host's monotonic clock, in nanoseconds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HostTime(pub u64);

impl HostTime {
    /// Returns the raw nanosecond value.
    #[inline]
    #[must_use]
    pub const fn nanos(self) -> u64 {
        self.0
    }

    /// Returns the duration since an earlier time, or zero if `earlier` is
    /// actually later.
    #[inline]
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }

    /// Checked addition of a duration.
    #[inline]
    #[must_use]
    pub const fn checked_add(self, duration: Duration) -> Option<Self> {
        match self.0.checked_add(duration.0) {
            Some(t) => Some(Self(t)),
            None => None,
        }
    }
}

impl Add<Duration> for HostTime {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Duration) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub<Duration> for HostTime {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Duration) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sub for HostTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: Self) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({})", self.0)
    }
}

/// A span of host time, in nanoseconds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(pub u64);

impl Duration {
    /// A zero-length duration.
    pub const ZERO: Self = Self(0);

    /// Creates a duration from whole milliseconds.
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis * 1_000_000)
    }

    /// Creates a duration from whole microseconds.
    #[inline]
    #[must_use]
    pub const fn from_micros(micros: u64) -> Self {
        Self(micros * 1_000)
    }

    /// Returns the raw nanosecond value.
    #[inline]
    #[must_use]
    pub const fn nanos(self) -> u64 {
        self.0
    }

    /// Saturating subtraction.
    #[inline]
    #[must_use]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Add for Duration {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Duration {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_constructors() {
        assert_eq!(Duration::from_millis(16).nanos(), 16_000_000);
        assert_eq!(Duration::from_micros(16_667).nanos(), 16_667_000);
        assert_eq!(Duration::ZERO.nanos(), 0);
    }

    #[test]
    fn host_time_arithmetic() {
        let t = HostTime(1_000);
        let d = Duration(250);
        assert_eq!((t + d).nanos(), 1_250);
        assert_eq!((t - d).nanos(), 750);
        assert_eq!(HostTime(1_250) - t, Duration(250));
    }

    #[test]
    fn saturating_ops_clamp_to_zero() {
        let t = HostTime(100);
        assert_eq!(t.saturating_duration_since(HostTime(500)), Duration::ZERO);
        assert_eq!(t.saturating_duration_since(HostTime(40)), Duration(60));
        assert_eq!(Duration(10).saturating_sub(Duration(20)), Duration::ZERO);
    }

    #[test]
    fn checked_add_detects_overflow() {
        assert_eq!(HostTime(10).checked_add(Duration(5)), Some(HostTime(15)));
        assert_eq!(HostTime(u64::MAX).checked_add(Duration(1)), None);
    }
}
