//! # **BooleanArray Module** - *Inner Bit-packed Boolean Array*
//!
//! Nullable boolean array storing both values and validity as packed
//! bitmasks, so a billion flags cost ~125 MB twice over, not 1 GB.

use std::fmt::{Display, Formatter};

use crate::enums::error::MinicolError;
use crate::structs::bitmask::Bitmask;
use crate::traits::masked_array::MaskedArray;
use crate::traits::print::MAX_PREVIEW;

/// # BooleanArray
///
/// Bit-packed boolean array with optional null mask.
///
/// ### Fields
/// - `data`: packed value bits (1=true, 0=false).
/// - `null_mask`: optional bit-packed validity bitmap (1=valid, 0=null).
#[derive(Clone, Debug, Default)]
pub struct BooleanArray {
    pub data: Bitmask,
    pub null_mask: Option<Bitmask>,
}

impl BooleanArray {
    /// Constructs a new BooleanArray over existing bitmasks.
    pub fn new(data: Bitmask, null_mask: Option<Bitmask>) -> Result<Self, MinicolError> {
        if let Some(mask) = &null_mask {
            if mask.len() != data.len() {
                return Err(MinicolError::InvalidArgument(format!(
                    "null mask length ({}) does not match data length ({})",
                    mask.len(),
                    data.len()
                )));
            }
        }
        Ok(Self { data, null_mask })
    }

    /// Constructs a dense array from a slice (no nulls).
    pub fn from_slice(slice: &[bool]) -> Self {
        Self {
            data: Bitmask::from_bools(slice),
            null_mask: None,
        }
    }

    /// Constructs a nullable array from optional values.
    pub fn from_options(values: &[Option<bool>]) -> Self {
        let data: Vec<bool> = values.iter().map(|v| v.unwrap_or_default()).collect();
        let valid: Vec<bool> = values.iter().map(|v| v.is_some()).collect();
        Self {
            data: Bitmask::from_bools(&data),
            null_mask: Some(Bitmask::from_bools(&valid)),
        }
    }

    /// Retrieves the value at the given index, or None if null or beyond
    /// length.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<bool> {
        if idx >= self.len() || self.is_null(idx) {
            return None;
        }
        Some(self.data.get(idx))
    }

    /// Zero-copy window `[offset, offset + len)`.
    pub fn slice(&self, offset: usize, len: usize) -> Self {
        Self {
            data: self.data.slice(offset, len),
            null_mask: self.null_mask.as_ref().map(|m| m.slice(offset, len)),
        }
    }

    /// Returns an iterator over the values as `Option<bool>`.
    pub fn iter_opt(&self) -> impl Iterator<Item = Option<bool>> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }
}

impl MaskedArray for BooleanArray {
    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn null_mask(&self) -> Option<&Bitmask> {
        self.null_mask.as_ref()
    }
}

impl PartialEq for BooleanArray {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        (0..self.len()).all(|i| self.get(i) == other.get(i))
    }
}

impl FromIterator<bool> for BooleanArray {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let staged: Vec<bool> = iter.into_iter().collect();
        Self::from_slice(&staged)
    }
}

impl Display for BooleanArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let len = self.len();
        writeln!(
            f,
            "BooleanArray [{} values] (dtype: bool, nulls: {})",
            len,
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

    #[test]
    fn test_from_slice() {
        let arr = BooleanArray::from_slice(&[true, false, true]);
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.get(0), Some(true));
        assert_eq!(arr.get(1), Some(false));
        assert_eq!(arr.null_count(), 0);
    }

    #[test]
    fn test_from_options() {
        let arr = BooleanArray::from_options(&[Some(true), None, Some(false), None]);
        assert_eq!(arr.len(), 4);
        assert_eq!(arr.null_count(), 2);
        assert_eq!(arr.get(1), None);
        assert_eq!(arr.get(2), Some(false));
    }

    #[test]
    fn test_slice_across_byte_boundary() {
        let flags: Vec<bool> = (0..20).map(|i| i % 2 == 0).collect();
        let arr = BooleanArray::from_slice(&flags);
        let s = arr.slice(7, 9);
        let got: Vec<Option<bool>> = s.iter_opt().collect();
        let expected: Vec<Option<bool>> = flags[7..16].iter().map(|&b| Some(b)).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_equality() {
        let a = BooleanArray::from_options(&[Some(true), None]);
        let b = BooleanArray::from_options(&[Some(true), None]);
        assert_eq!(a, b);
        let c = BooleanArray::from_options(&[Some(true), Some(false)]);
        assert_ne!(a, c);
    }
}
