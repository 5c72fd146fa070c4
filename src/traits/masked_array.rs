//! Core `MaskedArray` trait, providing a common interface for all base array
//! types, including support for null masks.

use crate::structs::bitmask::Bitmask;

/// MaskedArray is implemented by all inner, nullable arrays.
///
/// ### Purpose
/// - MaskedArray ensures interface consistency across `BooleanArray`,
/// `IntegerArray`, `FloatArray`, `StringArray`, `BinaryArray`,
/// `FixedSizeBinaryArray`, `DecimalArray`, `DatetimeArray`, `ListArray`
/// and `DictionaryArray`.
/// - It avoids repetition through default implementations focused on null
/// value handling; the typed data surface stays on the concrete types, since
/// element shapes differ.
pub trait MaskedArray {
    /// Returns the number of elements in the array.
    fn len(&self) -> usize;

    /// Returns true if the array is empty.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a reference to the optional null mask.
    fn null_mask(&self) -> Option<&Bitmask>;

    /// Returns true if the value at the given index is null.
    ///
    /// An absent mask means no nulls are possible.
    #[inline]
    fn is_null(&self, idx: usize) -> bool {
        match self.null_mask() {
            Some(mask) => !mask.get(idx),
            None => false,
        }
    }

    /// Returns true if the value at the given index is populated.
    #[inline]
    fn is_valid(&self, idx: usize) -> bool {
        !self.is_null(idx)
    }

    /// Checks if the array has a null bitmask.
    #[inline]
    fn is_nullable(&self) -> bool {
        self.null_mask().is_some()
    }

    /// Returns the total number of nulls.
    ///
    /// O(1) after the first call per mask window - the underlying zero
    /// count is memoized.
    #[inline]
    fn null_count(&self) -> usize {
        match self.null_mask() {
            Some(mask) => mask.count_zeros(),
            None => 0,
        }
    }
}
