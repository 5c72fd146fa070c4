//! # **DatetimeArray Module** - *Inner Typed Temporal Array*
//!
//! Integer-backed temporal array covering the whole date/time/timestamp/
//! duration family with two physical widths.
//!
//! ## Overview
//! - Physical storage: `Buffer<T>` of epoch offsets (`i32` or `i64`) plus an
//!   optional validity mask.
//! - The full temporal `LogicalType` (including resolution and optional
//!   timezone) is carried on the array itself, so one structure serves
//!   `Date32`, `Date64`, `Time32`, `Time64`, `Timestamp` and `Duration`
//!   without proliferating specialised types.
//! - Values are raw integer offsets; calendar interpretation is left to
//!   consumers of the flat boundary.

use std::fmt::{Display, Formatter};

use crate::enums::error::MinicolError;
use crate::enums::logical_type::LogicalType;
use crate::structs::bitmask::Bitmask;
use crate::structs::buffer::Buffer;
use crate::traits::masked_array::MaskedArray;
use crate::traits::print::MAX_PREVIEW;
use crate::traits::type_unions::Integer;
use crate::utils::validate_null_mask_len;

/// # DatetimeArray
///
/// Integer-backed temporal array with optional null mask.
///
/// ### Fields
/// - `data`: epoch offsets at the resolution declared by `dtype`.
/// - `dtype`: the temporal logical type (unit, and timezone for
///   timestamps).
/// - `null_mask`: optional bit-packed validity bitmap (1=valid, 0=null).
#[derive(Clone, Debug)]
pub struct DatetimeArray<T: Integer> {
    pub data: Buffer<T>,
    pub dtype: LogicalType,
    pub null_mask: Option<Bitmask>,
}

/// Physical width in bytes the given temporal logical type requires.
fn expected_width(dtype: &LogicalType) -> Option<usize> {
    match dtype {
        LogicalType::Date32 | LogicalType::Time32(_) => Some(4),
        LogicalType::Date64
        | LogicalType::Time64(_)
        | LogicalType::Timestamp(_, _)
        | LogicalType::Duration(_) => Some(8),
        _ => None,
    }
}

impl<T: Integer> DatetimeArray<T> {
    /// Constructs a DatetimeArray over an existing buffer.
    ///
    /// Fails with `TypeError` when `dtype` is not temporal or its physical
    /// width does not match `T`.
    pub fn new(
        data: impl Into<Buffer<T>>,
        dtype: LogicalType,
        null_mask: Option<Bitmask>,
    ) -> Result<Self, MinicolError> {
        let Some(width) = expected_width(&dtype) else {
            return Err(MinicolError::TypeError(format!(
                "{dtype} is not a temporal logical type"
            )));
        };
        if width != std::mem::size_of::<T>() {
            return Err(MinicolError::TypeError(format!(
                "{dtype} requires {width}-byte storage, got {}-byte elements",
                std::mem::size_of::<T>()
            )));
        }
        let data: Buffer<T> = data.into();
        validate_null_mask_len(data.len(), &null_mask)?;
        Ok(Self {
            data,
            dtype,
            null_mask,
        })
    }

    /// Constructs a nullable array from optional epoch offsets.
    pub fn from_options(
        values: &[Option<T>],
        dtype: LogicalType,
    ) -> Result<Self, MinicolError> {
        let data: Vec<T> = values.iter().map(|v| v.unwrap_or_default()).collect();
        let valid: Vec<bool> = values.iter().map(|v| v.is_some()).collect();
        let null_mask = if valid.iter().all(|&v| v) {
            None
        } else {
            Some(Bitmask::from_bools(&valid))
        };
        Self::new(Buffer::from_slice(&data), dtype, null_mask)
    }

    /// Retrieves the epoch offset at the given index, or None if null or
    /// beyond length.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<T> {
        if idx >= self.len() || self.is_null(idx) {
            return None;
        }
        Some(self.data.as_slice()[idx])
    }

    /// Zero-copy window `[offset, offset + len)`.
    pub fn slice(&self, offset: usize, len: usize) -> Self {
        Self {
            data: self.data.slice(offset, len),
            dtype: self.dtype.clone(),
            null_mask: self.null_mask.as_ref().map(|m| m.slice(offset, len)),
        }
    }

    /// Returns an iterator over the values as `Option<T>`.
    pub fn iter_opt(&self) -> impl Iterator<Item = Option<T>> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }
}

impl<T: Integer> MaskedArray for DatetimeArray<T> {
    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn null_mask(&self) -> Option<&Bitmask> {
        self.null_mask.as_ref()
    }
}

impl<T: Integer> PartialEq for DatetimeArray<T> {
    /// Two temporal arrays of different logical type are never equal, even
    /// with identical raw offsets.
    fn eq(&self, other: &Self) -> bool {
        if self.dtype != other.dtype || self.len() != other.len() {
            return false;
        }
        (0..self.len()).all(|i| self.get(i) == other.get(i))
    }
}

impl<T> Display for DatetimeArray<T>
where
    T: Integer + Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let len = self.len();
        writeln!(
            f,
            "DatetimeArray [{} values] (dtype: {}, nulls: {})",
            len,
            self.dtype,
            self.null_count()
        )?;
        write!(f, "[")?;
        for i in 0..usize::min(len, MAX_PREVIEW) {
            if i > 0 {
                write!(f, ", ")?;
            }
            match self.get(i) {
                Some(v) => write!(f, "{}", v)?,
                None => write!(f, "null")?,
            }
        }
        if len > MAX_PREVIEW {
            write!(f, ", … ({} total)", len)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::time_units::TimeUnit;

    #[test]
    fn test_date32() {
        let arr = DatetimeArray::<i32>::from_options(
            &[Some(10_957), None, Some(0)],
            LogicalType::Date32,
        )
        .unwrap();
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.get(0), Some(10_957));
        assert_eq!(arr.get(1), None);
        assert_eq!(arr.dtype, LogicalType::Date32);
    }

    #[test]
    fn test_timestamp_with_timezone() {
        let dtype = LogicalType::Timestamp(TimeUnit::Milliseconds, Some("UTC".to_string()));
        let arr = DatetimeArray::<i64>::from_options(&[Some(1_500_000_000_000)], dtype.clone())
            .unwrap();
        assert_eq!(arr.dtype, dtype);
    }

    #[test]
    fn test_width_mismatch_rejected() {
        let err = DatetimeArray::<i32>::from_options(
            &[Some(1)],
            LogicalType::Timestamp(TimeUnit::Seconds, None),
        )
        .unwrap_err();
        assert!(matches!(err, MinicolError::TypeError(_)));

        let err =
            DatetimeArray::<i64>::from_options(&[Some(1)], LogicalType::Date32).unwrap_err();
        assert!(matches!(err, MinicolError::TypeError(_)));
    }

    #[test]
    fn test_non_temporal_rejected() {
        let err =
            DatetimeArray::<i64>::from_options(&[Some(1)], LogicalType::Int64).unwrap_err();
        assert!(matches!(err, MinicolError::TypeError(_)));
    }

    #[test]
    fn test_dtype_distinguishes_equality() {
        let a = DatetimeArray::<i64>::from_options(
            &[Some(5)],
            LogicalType::Duration(TimeUnit::Seconds),
        )
        .unwrap();
        let b = DatetimeArray::<i64>::from_options(
            &[Some(5)],
            LogicalType::Timestamp(TimeUnit::Seconds, None),
        )
        .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_slice() {
        let arr = DatetimeArray::<i64>::from_options(
            &[Some(1), Some(2), None, Some(4)],
            LogicalType::Date64,
        )
        .unwrap();
        let s = arr.slice(1, 3);
        assert_eq!(s.get(0), Some(2));
        assert_eq!(s.get(1), None);
        assert_eq!(s.null_count(), 1);
    }
}
