//! # **IntegerArray Module** - *Inner Typed Integer Array*
//!
//! Pool-allocated, nullable integer array for analytical workloads.
//!
//! ## Overview
//! - Logical type: fixed-width signed/unsigned integers (`T: Integer`).
//! - Physical storage: `Buffer<T>` plus optional bit-packed validity mask
//!   (`Bitmask`).
//! - Usable standalone or as an arm of the higher-level [`Array`] enum.
//! - Immutable once constructed; `slice` windows share the same buffers.
//!
//! ## Usage Tips
//! Prefer function signatures with `&[T]` or generic `T: Integer` where
//! possible to keep callsites simple while remaining zero-copy compatible
//! with `IntegerArray`.
//!
//! [`Array`]: crate::Array

use std::fmt::{Display, Formatter};

use crate::enums::error::MinicolError;
use crate::structs::bitmask::Bitmask;
use crate::structs::buffer::Buffer;
use crate::traits::masked_array::MaskedArray;
use crate::traits::print::MAX_PREVIEW;
use crate::traits::type_unions::Integer;
use crate::utils::validate_null_mask_len;

/// # IntegerArray
///
/// Pool-allocated integer array with optional null mask.
///
/// ## Role
/// - Many will prefer the higher level `Array` type, which dispatches to
/// this when necessary.
/// - Can be used as a standalone array or as the numeric arm of `Array`.
///
/// ## Description
/// - Stores fixed-width integer values in a contiguous `Buffer<T>`.
/// - Optional validity bitmap (`1 = valid`, `0 = null`) via `Bitmask`.
/// - Implements [`MaskedArray`] for consistent nullable array behaviour.
///
/// ### Fields
/// - `data`: backing buffer of integer values (`Buffer<T>`).
/// - `null_mask`: optional bit-packed validity bitmap.
///
/// ## Example
/// ```rust
/// use minicol::{IntegerArray, MaskedArray};
///
/// // Dense, no nulls
/// let arr = IntegerArray::<i64>::from_slice(&[1, 2, 3, 4]);
/// assert_eq!(arr.len(), 4);
/// assert_eq!(arr.get(2), Some(3));
///
/// // With nulls
/// let arr = IntegerArray::<i32>::from_options(&[Some(10), None, Some(30)]);
/// assert_eq!(arr.get(1), None);
/// assert_eq!(arr.null_count(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct IntegerArray<T: Integer> {
    /// Backing buffer for values.
    pub data: Buffer<T>,
    /// Optional null mask (bit-packed; 1=valid, 0=null).
    pub null_mask: Option<Bitmask>,
}

impl<T: Integer> IntegerArray<T> {
    /// Constructs a new IntegerArray over an existing buffer.
    ///
    /// Fails with `InvalidArgument` when the mask length does not match the
    /// data length.
    pub fn new(
        data: impl Into<Buffer<T>>,
        null_mask: Option<Bitmask>,
    ) -> Result<Self, MinicolError> {
        let data: Buffer<T> = data.into();
        validate_null_mask_len(data.len(), &null_mask)?;
        Ok(Self { data, null_mask })
    }

    /// Constructs a dense array from a slice (no nulls).
    #[inline]
    pub fn from_slice(slice: &[T]) -> Self {
        Self {
            data: Buffer::from_slice(slice),
            null_mask: None,
        }
    }

    /// Constructs a nullable array from optional values; `None` slots store
    /// `T::default()` and are marked null.
    pub fn from_options(values: &[Option<T>]) -> Self {
        let data: Vec<T> = values.iter().map(|v| v.unwrap_or_default()).collect();
        let valid: Vec<bool> = values.iter().map(|v| v.is_some()).collect();
        Self {
            data: Buffer::from_slice(&data),
            null_mask: Some(Bitmask::from_bools(&valid)),
        }
    }

    /// Retrieves the value at the given index, or None if null or beyond
    /// length.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<T> {
        if idx >= self.len() || self.is_null(idx) {
            return None;
        }
        Some(self.data.as_slice()[idx])
    }

    /// Returns a logical window `[offset, offset + len)` sharing the same
    /// buffers - zero copy, O(1).
    pub fn slice(&self, offset: usize, len: usize) -> Self {
        Self {
            data: self.data.slice(offset, len),
            null_mask: self.null_mask.as_ref().map(|m| m.slice(offset, len)),
        }
    }

    /// Returns an iterator over the values, nulls yielded as `T::default()`.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.data.as_slice().iter().copied()
    }

    /// Returns an iterator over the values as `Option<T>`.
    pub fn iter_opt(&self) -> impl Iterator<Item = Option<T>> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }
}

impl<T: Integer> MaskedArray for IntegerArray<T> {
    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn null_mask(&self) -> Option<&Bitmask> {
        self.null_mask.as_ref()
    }
}

impl<T: Integer> PartialEq for IntegerArray<T> {
    /// Deep logical equality: length, null pattern, and values at valid
    /// slots. Raw bytes under null slots are ignored.
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        (0..self.len()).all(|i| self.get(i) == other.get(i))
    }
}

impl<T: Integer> FromIterator<T> for IntegerArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let staged: Vec<T> = iter.into_iter().collect();
        Self::from_slice(&staged)
    }
}

impl<T: Integer> From<Vec<T>> for IntegerArray<T> {
    fn from(vec: Vec<T>) -> Self {
        Self::from_slice(&vec)
    }
}

impl<T> Display for IntegerArray<T>
where
    T: Integer + Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let len = self.len();
        let nulls = self.null_count();

        writeln!(
            f,
            "IntegerArray [{} values] (dtype: int, nulls: {})",
            len, nulls
        )?;

        write!(f, "[")?;
        for i in 0..usize::min(len, MAX_PREVIEW) {
            if i > 0 {
                write!(f, ", ")?;
            }
            match self.get(i) {
                Some(val) => write!(f, "{}", val)?,
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

    #[test]
    fn test_from_slice_and_get() {
        let arr = IntegerArray::<i64>::from_slice(&[123, -456]);
        assert_eq!(arr.len(), 2);
        assert_eq!(arr.get(0), Some(123));
        assert_eq!(arr.get(1), Some(-456));
        assert!(!arr.is_null(0));
        assert_eq!(arr.null_count(), 0);
    }

    #[test]
    fn test_from_options() {
        let arr = IntegerArray::<u8>::from_options(&[Some(42), None, Some(7)]);
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.get(0), Some(42));
        assert_eq!(arr.get(1), None);
        assert_eq!(arr.get(2), Some(7));
        assert!(arr.is_null(1));
        assert_eq!(arr.null_count(), 1);
    }

    #[test]
    fn test_new_rejects_mask_mismatch() {
        let err = IntegerArray::<i32>::new(
            Buffer::from_slice(&[1, 2, 3]),
            Some(Bitmask::new_set_all(2, true)),
        )
        .unwrap_err();
        assert!(matches!(err, MinicolError::InvalidArgument(_)));
    }

    #[test]
    fn test_out_of_bounds_get() {
        let arr = IntegerArray::<i64>::default();
        assert_eq!(arr.get(0), None);
        assert_eq!(arr.get(100), None);
    }

    #[test]
    fn test_slice_shares_and_windows() {
        let arr = IntegerArray::<i32>::from_options(&[
            Some(10),
            Some(20),
            Some(30),
            None,
            Some(50),
        ]);
        let sliced = arr.slice(1, 3);
        assert_eq!(sliced.len(), 3);
        assert_eq!(sliced.get(0), Some(20));
        assert_eq!(sliced.get(1), Some(30));
        assert_eq!(sliced.get(2), None);
        assert_eq!(sliced.null_count(), 1);
        assert!(sliced.data.shares_region_with(&arr.data));
    }

    #[test]
    fn test_logical_equality() {
        let a = IntegerArray::<i32>::from_options(&[Some(1), None, Some(3)]);
        let b = IntegerArray::<i32>::from_options(&[Some(1), None, Some(3)]);
        assert_eq!(a, b);

        let c = IntegerArray::<i32>::from_options(&[Some(1), Some(2), Some(3)]);
        assert_ne!(a, c);

        // A slice equals a directly-built array with the same contents.
        let wide = IntegerArray::<i32>::from_options(&[Some(9), Some(1), None, Some(3)]);
        assert_eq!(wide.slice(1, 3), a);
    }

    #[test]
    fn test_iter_opt() {
        let arr = IntegerArray::<i16>::from_options(&[Some(1), None, Some(3)]);
        let got: Vec<Option<i16>> = arr.iter_opt().collect();
        assert_eq!(got, vec![Some(1), None, Some(3)]);
    }
}
