//! # **TimeUnits Module** - *Temporal Resolution Units*
//!
//! Defines the time units used by temporal logical types and arrays in
//! Minicol.
//!
//! `TimeUnit` standardises second, millisecond, microsecond, nanosecond, and
//! day resolution across `Date`, `Time`, `Timestamp` and `Duration` logical
//! types. The conversion engine uses the same unit vocabulary when truncating
//! flat temporal values to a coarser target resolution.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// # TimeUnit
///
/// Unified time unit enumeration.
///
/// ## Purpose
/// - Declares the resolution of epoch offsets stored in `DatetimeArray`.
/// - Shared by `Time32`, `Time64`, `Timestamp` and `Duration` logical types,
/// avoiding proliferating variants that require explicit handling throughout
/// match statements.
///
/// ## Behaviour
/// - Unit values are stored on the logical type carried by the array,
/// enabling variant-specific logic.
/// - Ordering follows coarseness: `Days` is the coarsest resolution and
/// `Nanoseconds` the finest, so `a < b` means "a is coarser than b".
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy, Debug, Default)]
pub enum TimeUnit {
    /// Default = days unspecified
    ///
    /// `Date32` values use days implicitly.
    #[default]
    Days,
    Seconds,
    Milliseconds,
    Microseconds,
    Nanoseconds,
}

impl TimeUnit {
    /// Number of this unit per second, or `None` for `Days`
    /// (which is coarser than a second).
    #[inline]
    pub fn per_second(&self) -> Option<i64> {
        match self {
            TimeUnit::Days => None,
            TimeUnit::Seconds => Some(1),
            TimeUnit::Milliseconds => Some(1_000),
            TimeUnit::Microseconds => Some(1_000_000),
            TimeUnit::Nanoseconds => Some(1_000_000_000),
        }
    }

    /// Multiplier that rescales a value in `self` units to `target` units,
    /// expressed as a (numerator, denominator) pair.
    ///
    /// Truncation towards zero happens when the denominator exceeds one.
    pub fn rescale_factor(&self, target: TimeUnit) -> (i64, i64) {
        const DAY_SECONDS: i64 = 86_400;
        let src = self.per_second().unwrap_or(1);
        let dst = target.per_second().unwrap_or(1);
        // Fold the day factor into whichever side carries it.
        let src_day = if *self == TimeUnit::Days { DAY_SECONDS } else { 1 };
        let dst_day = if target == TimeUnit::Days { DAY_SECONDS } else { 1 };
        if dst * src_day >= src * dst_day {
            ((dst * src_day) / (src * dst_day), 1)
        } else {
            (1, (src * dst_day) / (dst * src_day))
        }
    }
}

impl Display for TimeUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TimeUnit::Days => f.write_str("Days"),
            TimeUnit::Seconds => f.write_str("Seconds"),
            TimeUnit::Milliseconds => f.write_str("Milliseconds"),
            TimeUnit::Microseconds => f.write_str("Microseconds"),
            TimeUnit::Nanoseconds => f.write_str("Nanoseconds"),
        }
    }
}
