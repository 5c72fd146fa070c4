//! # **FloatArray Module** - *Inner Typed Float Array*
//!
//! Pool-allocated, nullable floating-point array. Mirrors
//! [`IntegerArray`](crate::IntegerArray) with `T: Float` elements.

use std::fmt::{Display, Formatter};

use crate::enums::error::MinicolError;
use crate::structs::bitmask::Bitmask;
use crate::structs::buffer::Buffer;
use crate::traits::masked_array::MaskedArray;
use crate::traits::print::MAX_PREVIEW;
use crate::traits::type_unions::Float;
use crate::utils::validate_null_mask_len;

/// # FloatArray
///
/// Pool-allocated float array with optional null mask.
///
/// ### Fields
/// - `data`: backing buffer of float values (`Buffer<T>`).
/// - `null_mask`: optional bit-packed validity bitmap (1=valid, 0=null).
#[derive(Clone, Debug, Default)]
pub struct FloatArray<T: Float> {
    pub data: Buffer<T>,
    pub null_mask: Option<Bitmask>,
}

impl<T: Float> FloatArray<T> {
    /// Constructs a new FloatArray over an existing buffer.
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

    /// Constructs a nullable array from optional values.
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

    /// Zero-copy window `[offset, offset + len)`.
    pub fn slice(&self, offset: usize, len: usize) -> Self {
        Self {
            data: self.data.slice(offset, len),
            null_mask: self.null_mask.as_ref().map(|m| m.slice(offset, len)),
        }
    }

    /// Returns an iterator over the values as `Option<T>`.
    pub fn iter_opt(&self) -> impl Iterator<Item = Option<T>> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }
}

impl<T: Float> MaskedArray for FloatArray<T> {
    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn null_mask(&self) -> Option<&Bitmask> {
        self.null_mask.as_ref()
    }
}

impl<T: Float> PartialEq for FloatArray<T> {
    /// Deep logical equality over null pattern and values. Values compare
    /// with float semantics, so arrays containing NaN never equal.
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        (0..self.len()).all(|i| self.get(i) == other.get(i))
    }
}

impl<T: Float> FromIterator<T> for FloatArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let staged: Vec<T> = iter.into_iter().collect();
        Self::from_slice(&staged)
    }
}

impl<T: Float> From<Vec<T>> for FloatArray<T> {
    fn from(vec: Vec<T>) -> Self {
        Self::from_slice(&vec)
    }
}

impl<T> Display for FloatArray<T>
where
    T: Float + Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let len = self.len();
        writeln!(
            f,
            "FloatArray [{} values] (dtype: float, nulls: {})",
            len,
            self.null_count()
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
        let arr = FloatArray::<f64>::from_slice(&[1.5, -2.25]);
        assert_eq!(arr.len(), 2);
        assert_eq!(arr.get(0), Some(1.5));
        assert_eq!(arr.get(1), Some(-2.25));
    }

    #[test]
    fn test_from_options_and_nulls() {
        let arr = FloatArray::<f32>::from_options(&[Some(0.5), None, Some(2.5)]);
        assert_eq!(arr.get(1), None);
        assert_eq!(arr.null_count(), 1);
        assert!(arr.is_null(1));
    }

    #[test]
    fn test_slice_zero_copy() {
        let arr = FloatArray::<f64>::from_options(&[Some(1.0), None, Some(3.0), Some(4.0)]);
        let s = arr.slice(1, 2);
        assert_eq!(s.get(0), None);
        assert_eq!(s.get(1), Some(3.0));
        assert!(s.data.shares_region_with(&arr.data));
    }

    #[test]
    fn test_nan_never_equal() {
        let a = FloatArray::<f64>::from_slice(&[f64::NAN]);
        let b = FloatArray::<f64>::from_slice(&[f64::NAN]);
        assert_ne!(a, b);
    }
}
