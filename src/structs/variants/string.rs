//! # **StringArray Module** - *Inner Typed String Array*
//!
//! UTF-8, variable-length string array backed by a compact
//! `offsets + data (+ optional null_mask)` layout.
//!
//! ## Overview
//! - Supports `String` (`u32` offsets) and `LargeString` (`u64` offsets).
//! - Storage:
//!   - **offsets**: length = `len + 1`; i-th string = `data[offsets[i]..offsets[i+1]]`
//!   - **data**: concatenated UTF-8 bytes
//!   - **null_mask** *(optional)*: `Bitmask` where `1 = valid`, `0 = null`
//! - Slicing windows the offsets buffer; the byte buffer stays shared, so
//!   a slice is O(1) regardless of string payload size.
//!
//! ## Safety note
//! Offsets and UTF-8 validity are checked once at construction, so element
//! access can decode without re-validating.

use std::fmt::{Display, Formatter};

use crate::enums::error::MinicolError;
use crate::structs::bitmask::Bitmask;
use crate::structs::buffer::{Buffer, BufferMut};
use crate::traits::masked_array::MaskedArray;
use crate::traits::print::MAX_PREVIEW;
use crate::traits::type_unions::Integer;
use crate::utils::validate_null_mask_len;

/// # StringArray
///
/// UTF-8 encoded, variable-length string array.
///
/// ## Fields
/// - **offsets**: indices into the `data` buffer. The i-th string is at
///   `data[offsets[i]..offsets[i+1]]`.
/// - **data**: concatenated UTF-8 encoded bytes for all strings.
/// - **null_mask**: optional bit-packed validity bitmap (1=valid, 0=null).
///
/// Specify `u32` or `u64` as the generic parameter for `String` vs
/// `LargeString` offset widths.
///
/// ## Example
/// ```rust
/// use minicol::StringArray;
///
/// let arr = StringArray::<u32>::from_slice(&["alpha", "beta", "gamma"]);
/// assert_eq!(arr.len(), 3);
/// assert_eq!(arr.get_str(1), Some("beta"));
/// ```
#[derive(Clone, Debug)]
pub struct StringArray<T: Integer> {
    /// Offsets into the values buffer. The i-th string is at
    /// values[offsets[i]..offsets[i+1]].
    pub offsets: Buffer<T>,
    /// Concatenated UTF-8 byte values for all strings.
    pub data: Buffer<u8>,
    /// Optional null mask (bit-packed; 1=valid, 0=null).
    pub null_mask: Option<Bitmask>,
}

impl<T: Integer> StringArray<T> {
    /// Constructs a StringArray over existing buffers.
    ///
    /// Validates the usual offset invariants (`len >= 1`, monotonically
    /// non-decreasing, final offset within `data`) plus UTF-8 wellformedness
    /// of every addressed byte range, so later accessors can decode without
    /// re-checking.
    pub fn new(
        offsets: impl Into<Buffer<T>>,
        data: impl Into<Buffer<u8>>,
        null_mask: Option<Bitmask>,
    ) -> Result<Self, MinicolError> {
        let offsets: Buffer<T> = offsets.into();
        let data: Buffer<u8> = data.into();
        if offsets.is_empty() {
            return Err(MinicolError::InvalidArgument(
                "string offsets buffer must hold at least one entry".to_string(),
            ));
        }
        validate_null_mask_len(offsets.len() - 1, &null_mask)?;
        let offs = offsets.as_slice();
        for i in 0..offs.len() - 1 {
            let start = offs[i].to_usize();
            let end = offs[i + 1].to_usize();
            if end < start {
                return Err(MinicolError::InvalidArgument(
                    "string offsets must be monotonically non-decreasing".to_string(),
                ));
            }
            if end > data.len() {
                return Err(MinicolError::InvalidArgument(format!(
                    "string offset {} exceeds data length {}",
                    end,
                    data.len()
                )));
            }
            // Checked per element so boundaries cannot split a code point.
            if std::str::from_utf8(&data.as_slice()[start..end]).is_err() {
                return Err(MinicolError::TypeError(
                    "string data is not valid UTF-8".to_string(),
                ));
            }
        }
        Ok(Self {
            offsets,
            data,
            null_mask,
        })
    }

    /// Constructs a dense StringArray from string slices (no nulls).
    pub fn from_slice(slice: &[&str]) -> Self {
        let mut offsets = BufferMut::<T>::with_capacity(slice.len() + 1);
        let mut data = BufferMut::<u8>::new();
        offsets.push(T::zero());
        for s in slice {
            data.extend_from_slice(s.as_bytes());
            offsets.push(T::from_usize(data.len()));
        }
        Self {
            offsets: offsets.freeze(),
            data: data.freeze(),
            null_mask: None,
        }
    }

    /// Constructs a nullable StringArray from optional string slices.
    pub fn from_options(values: &[Option<&str>]) -> Self {
        let mut offsets = BufferMut::<T>::with_capacity(values.len() + 1);
        let mut data = BufferMut::<u8>::new();
        let mut valid = Vec::with_capacity(values.len());
        offsets.push(T::zero());
        for v in values {
            if let Some(s) = v {
                data.extend_from_slice(s.as_bytes());
            }
            offsets.push(T::from_usize(data.len()));
            valid.push(v.is_some());
        }
        Self {
            offsets: offsets.freeze(),
            data: data.freeze(),
            null_mask: Some(Bitmask::from_bools(&valid)),
        }
    }

    /// Returns the string value at the given index, or None if null or
    /// beyond length.
    #[inline]
    pub fn get_str(&self, idx: usize) -> Option<&str> {
        if idx >= self.len() || self.is_null(idx) {
            return None;
        }
        let offs = self.offsets.as_slice();
        let start = offs[idx].to_usize();
        let end = offs[idx + 1].to_usize();
        // UTF-8 validated at construction.
        Some(unsafe { std::str::from_utf8_unchecked(&self.data.as_slice()[start..end]) })
    }

    /// Zero-copy window `[offset, offset + len)`. The byte buffer stays
    /// shared in full; only the offsets window moves.
    pub fn slice(&self, offset: usize, len: usize) -> Self {
        Self {
            offsets: self.offsets.slice(offset, len + 1),
            data: self.data.clone(),
            null_mask: self.null_mask.as_ref().map(|m| m.slice(offset, len)),
        }
    }

    /// Returns an iterator of `Option<&str>`, None if value is null.
    pub fn iter_str_opt(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        (0..self.len()).map(move |i| self.get_str(i))
    }
}

impl<T: Integer> MaskedArray for StringArray<T> {
    #[inline]
    fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    #[inline]
    fn null_mask(&self) -> Option<&Bitmask> {
        self.null_mask.as_ref()
    }
}

impl<T: Integer> Default for StringArray<T> {
    fn default() -> Self {
        Self::from_slice(&[])
    }
}

impl<T: Integer> PartialEq for StringArray<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        (0..self.len()).all(|i| self.get_str(i) == other.get_str(i))
    }
}

impl<'a, T: Integer> FromIterator<&'a str> for StringArray<T> {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let staged: Vec<&str> = iter.into_iter().collect();
        Self::from_slice(&staged)
    }
}

impl<T: Integer> Display for StringArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let len = self.len();
        writeln!(
            f,
            "StringArray [{} values] (dtype: utf8, nulls: {})",
            len,
            self.null_count()
        )?;
        write!(f, "[")?;
        for i in 0..usize::min(len, MAX_PREVIEW) {
            if i > 0 {
                write!(f, ", ")?;
            }
            match self.get_str(i) {
                Some(s) => write!(f, "\"{}\"", s)?,
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
        let arr = StringArray::<u32>::from_slice(&["foo", "bar", "mañana"]);
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.get_str(0), Some("foo"));
        assert_eq!(arr.get_str(2), Some("mañana"));
        assert_eq!(arr.get_str(3), None);
    }

    #[test]
    fn test_from_options() {
        let arr = StringArray::<u32>::from_options(&[Some("foo"), None, Some("baz")]);
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.get_str(1), None);
        assert_eq!(arr.null_count(), 1);
        assert_eq!(arr.get_str(2), Some("baz"));
    }

    #[test]
    fn test_large_string_offsets() {
        let arr = StringArray::<u64>::from_slice(&["a", "bb", "ccc"]);
        assert_eq!(arr.get_str(2), Some("ccc"));
    }

    #[test]
    fn test_slice_is_zero_copy() {
        let arr = StringArray::<u32>::from_options(&[
            Some("aa"),
            Some("bb"),
            None,
            Some("dd"),
            Some("ee"),
        ]);
        let s = arr.slice(1, 3);
        assert_eq!(s.len(), 3);
        assert_eq!(s.get_str(0), Some("bb"));
        assert_eq!(s.get_str(1), None);
        assert_eq!(s.get_str(2), Some("dd"));
        assert!(s.data.shares_region_with(&arr.data));
        assert_eq!(s.null_count(), 1);
    }

    #[test]
    fn test_new_validates_offsets() {
        let err = StringArray::<u32>::new(
            Buffer::from_slice(&[0u32, 5, 2]),
            Buffer::from_slice(b"hello".as_slice()),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, MinicolError::InvalidArgument(_)));

        let err = StringArray::<u32>::new(
            Buffer::from_slice(&[0u32, 9]),
            Buffer::from_slice(b"hello".as_slice()),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, MinicolError::InvalidArgument(_)));
    }

    #[test]
    fn test_new_validates_utf8() {
        let err = StringArray::<u32>::new(
            Buffer::from_slice(&[0u32, 2]),
            Buffer::from_slice(&[0xFFu8, 0xFE]),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, MinicolError::TypeError(_)));
    }

    #[test]
    fn test_equality() {
        let a = StringArray::<u32>::from_options(&[Some("x"), None]);
        let b = StringArray::<u32>::from_options(&[Some("x"), None]);
        assert_eq!(a, b);
        let c = StringArray::<u32>::from_slice(&["x", ""]);
        assert_ne!(a, c);
    }

    #[test]
    fn test_empty() {
        let arr = StringArray::<u32>::default();
        assert!(arr.is_empty());
        assert_eq!(arr.get_str(0), None);
    }
}
