//! # **ListArray Module** - *Nested Variable-Length List Array*
//!
//! Variable-length lists behind an `offsets + child array` layout: the i-th
//! slot is the child window `values[offsets[i]..offsets[i+1]]`. Slicing the
//! list windows the offsets only; the child array stays shared, so nesting
//! never multiplies storage.

use std::fmt::{Display, Formatter};

use crate::Array;
use crate::enums::error::MinicolError;
use crate::structs::bitmask::Bitmask;
use crate::structs::buffer::Buffer;
use crate::traits::masked_array::MaskedArray;
use crate::traits::print::MAX_PREVIEW;
use crate::traits::type_unions::Integer;
use crate::utils::validate_null_mask_len;

/// # ListArray
///
/// Nested list array with optional null mask.
///
/// ### Fields
/// - `offsets`: indices into the child; the i-th list is
///   `values[offsets[i]..offsets[i+1]]`.
/// - `values`: the flattened child array.
/// - `null_mask`: optional bit-packed validity bitmap (1=valid, 0=null).
#[derive(Clone, Debug)]
pub struct ListArray {
    pub offsets: Buffer<u32>,
    pub values: Box<Array>,
    pub null_mask: Option<Bitmask>,
}

impl ListArray {
    /// Constructs a ListArray over an existing child, validating offsets.
    pub fn new(
        offsets: impl Into<Buffer<u32>>,
        values: Array,
        null_mask: Option<Bitmask>,
    ) -> Result<Self, MinicolError> {
        let offsets: Buffer<u32> = offsets.into();
        if offsets.is_empty() {
            return Err(MinicolError::InvalidArgument(
                "list offsets buffer must hold at least one entry".to_string(),
            ));
        }
        validate_null_mask_len(offsets.len() - 1, &null_mask)?;
        let offs = offsets.as_slice();
        for w in offs.windows(2) {
            if w[1] < w[0] {
                return Err(MinicolError::InvalidArgument(
                    "list offsets must be monotonically non-decreasing".to_string(),
                ));
            }
        }
        if offs[offs.len() - 1].to_usize() > values.len() {
            return Err(MinicolError::InvalidArgument(format!(
                "final list offset {} exceeds child length {}",
                offs[offs.len() - 1],
                values.len()
            )));
        }
        Ok(Self {
            offsets,
            values: Box::new(values),
            null_mask,
        })
    }

    /// Logical type of the child elements.
    #[inline]
    pub fn value_dtype(&self) -> crate::LogicalType {
        self.values.dtype()
    }

    /// Returns the list at the given index as a zero-copy child window, or
    /// None if null or beyond length.
    pub fn get_list(&self, idx: usize) -> Option<Array> {
        if idx >= self.len() || self.is_null(idx) {
            return None;
        }
        let offs = self.offsets.as_slice();
        let start = offs[idx] as usize;
        let end = offs[idx + 1] as usize;
        // Offsets are validated at construction, so the window is in range.
        self.values.slice(start, Some(end - start)).ok()
    }

    /// Zero-copy window `[offset, offset + len)`. The child array stays
    /// shared in full; only the offsets window moves.
    pub fn slice(&self, offset: usize, len: usize) -> Self {
        Self {
            offsets: self.offsets.slice(offset, len + 1),
            values: self.values.clone(),
            null_mask: self.null_mask.as_ref().map(|m| m.slice(offset, len)),
        }
    }

    /// Returns an iterator of `Option<Array>`, None if the slot is null.
    pub fn iter_opt(&self) -> impl Iterator<Item = Option<Array>> + '_ {
        (0..self.len()).map(move |i| self.get_list(i))
    }
}

impl MaskedArray for ListArray {
    #[inline]
    fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    #[inline]
    fn null_mask(&self) -> Option<&Bitmask> {
        self.null_mask.as_ref()
    }
}

impl PartialEq for ListArray {
    fn eq(&self, other: &Self) -> bool {
        if self.value_dtype() != other.value_dtype() || self.len() != other.len() {
            return false;
        }
        (0..self.len()).all(|i| self.get_list(i) == other.get_list(i))
    }
}

impl Display for ListArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "ListArray [{} values] (dtype: List({}), nulls: {})",
            self.len(),
            self.value_dtype(),
            self.null_count()
        )?;
        write!(f, "[")?;
        for i in 0..usize::min(self.len(), MAX_PREVIEW) {
            if i > 0 {
                write!(f, ", ")?;
            }
            match self.get_list(i) {
                Some(inner) => write!(f, "[{} elems]", inner.len())?,
                None => write!(f, "null")?,
            }
        }
        if self.len() > MAX_PREVIEW {
            write!(f, ", … ({} total)", self.len())?;
        }
        write!(f, "]")
    }
}
