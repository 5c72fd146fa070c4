//! # **DecimalArray Module** - *128-bit Fixed-Point Decimal Array*
//!
//! Stores decimals as scaled 128-bit integers: the logical value of a slot
//! is `data[i] * 10^(-scale)`. Precision is declarative metadata bounding
//! the number of significant digits; storage is always 16 bytes per value.

use std::fmt::{Display, Formatter};

use crate::enums::error::MinicolError;
use crate::structs::bitmask::Bitmask;
use crate::structs::buffer::Buffer;
use crate::traits::masked_array::MaskedArray;
use crate::traits::print::MAX_PREVIEW;
use crate::utils::validate_null_mask_len;

/// Maximum number of significant decimal digits a 128-bit word can hold.
pub const DECIMAL128_MAX_PRECISION: u8 = 38;

/// # DecimalArray
///
/// 128-bit fixed-point decimal array with optional null mask.
///
/// ### Fields
/// - `data`: scaled integer mantissas.
/// - `precision`: maximum significant digits (1..=38).
/// - `scale`: digits to the right of the decimal point.
/// - `null_mask`: optional bit-packed validity bitmap (1=valid, 0=null).
#[derive(Clone, Debug)]
pub struct DecimalArray {
    pub data: Buffer<i128>,
    pub precision: u8,
    pub scale: i8,
    pub null_mask: Option<Bitmask>,
}

impl DecimalArray {
    /// Constructs a DecimalArray over an existing mantissa buffer.
    pub fn new(
        data: impl Into<Buffer<i128>>,
        precision: u8,
        scale: i8,
        null_mask: Option<Bitmask>,
    ) -> Result<Self, MinicolError> {
        if precision == 0 || precision > DECIMAL128_MAX_PRECISION {
            return Err(MinicolError::InvalidArgument(format!(
                "decimal precision {} outside 1..={}",
                precision, DECIMAL128_MAX_PRECISION
            )));
        }
        let data: Buffer<i128> = data.into();
        validate_null_mask_len(data.len(), &null_mask)?;
        Ok(Self {
            data,
            precision,
            scale,
            null_mask,
        })
    }

    /// Constructs a nullable array from optional scaled mantissas.
    pub fn from_options(
        values: &[Option<i128>],
        precision: u8,
        scale: i8,
    ) -> Result<Self, MinicolError> {
        let data: Vec<i128> = values.iter().map(|v| v.unwrap_or_default()).collect();
        let valid: Vec<bool> = values.iter().map(|v| v.is_some()).collect();
        let null_mask = if valid.iter().all(|&v| v) {
            None
        } else {
            Some(Bitmask::from_bools(&valid))
        };
        Self::new(Buffer::from_slice(&data), precision, scale, null_mask)
    }

    /// Retrieves the scaled mantissa at the given index, or None if null or
    /// beyond length.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<i128> {
        if idx >= self.len() || self.is_null(idx) {
            return None;
        }
        Some(self.data.as_slice()[idx])
    }

    /// Zero-copy window `[offset, offset + len)`.
    pub fn slice(&self, offset: usize, len: usize) -> Self {
        Self {
            data: self.data.slice(offset, len),
            precision: self.precision,
            scale: self.scale,
            null_mask: self.null_mask.as_ref().map(|m| m.slice(offset, len)),
        }
    }
}

impl MaskedArray for DecimalArray {
    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn null_mask(&self) -> Option<&Bitmask> {
        self.null_mask.as_ref()
    }
}

impl PartialEq for DecimalArray {
    fn eq(&self, other: &Self) -> bool {
        if self.precision != other.precision
            || self.scale != other.scale
            || self.len() != other.len()
        {
            return false;
        }
        (0..self.len()).all(|i| self.get(i) == other.get(i))
    }
}

impl Display for DecimalArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "DecimalArray [{} values] (dtype: decimal({}, {}), nulls: {})",
            self.len(),
            self.precision,
            self.scale,
            self.null_count()
        )?;
        write!(f, "[")?;
        for i in 0..usize::min(self.len(), MAX_PREVIEW) {
            if i > 0 {
                write!(f, ", ")?;
            }
            match self.get(i) {
                Some(v) => write!(f, "{}e-{}", v, self.scale)?,
                None => write!(f, "null")?,
            }
        }
        if self.len() > MAX_PREVIEW {
            write!(f, ", … ({} total)", self.len())?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_options() {
        // 1234.183 and 8094.234 at scale 3
        let arr =
            DecimalArray::from_options(&[Some(1_234_183), None, Some(8_094_234)], 7, 3).unwrap();
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.get(0), Some(1_234_183));
        assert_eq!(arr.get(1), None);
        assert_eq!(arr.null_count(), 1);
    }

    #[test]
    fn test_negative_mantissas() {
        let arr = DecimalArray::from_options(&[Some(-1_234_234_983), Some(-8_094_324)], 10, 6)
            .unwrap();
        assert_eq!(arr.get(0), Some(-1_234_234_983));
        assert_eq!(arr.get(1), Some(-8_094_324));
    }

    #[test]
    fn test_precision_bounds() {
        let err = DecimalArray::from_options(&[Some(1)], 0, 0).unwrap_err();
        assert!(matches!(err, MinicolError::InvalidArgument(_)));
        let err = DecimalArray::from_options(&[Some(1)], 39, 0).unwrap_err();
        assert!(matches!(err, MinicolError::InvalidArgument(_)));
    }

    #[test]
    fn test_slice_and_equality() {
        let arr = DecimalArray::from_options(&[Some(1), Some(2), Some(3)], 5, 2).unwrap();
        let s = arr.slice(1, 2);
        let expected = DecimalArray::from_options(&[Some(2), Some(3)], 5, 2).unwrap();
        assert_eq!(s, expected);

        // Same mantissas at a different scale are a different array.
        let other = DecimalArray::from_options(&[Some(2), Some(3)], 5, 1).unwrap();
        assert_ne!(s, other);
    }
}
