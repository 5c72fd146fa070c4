//! # **DictionaryArray Module** - *Inner Typed Dictionary-Encoded Array*
//!
//! DictionaryArray separates a small dictionary of distinct values from an
//! integer index column referencing it. Each row stores only a small signed
//! "code", which saves memory and accelerates comparisons when many values
//! repeat.
//!
//! ## Missing values
//! Two spellings of null coexist at the construction boundary:
//! - an explicit mask marking slots null, and
//! - the raw `-1` index sentinel, usable even without a mask.
//!
//! The two are OR-ed: a slot is null when either marks it. The OR is
//! authoritative even when they disagree (sentinel present, mask says
//! valid) - see the module tests, which pin that divergence down.
//!
//! ## Derived views
//! The decoded (dense) expansion is a memoized, recomputable projection via
//! `OnceLock` - not part of the array's identity, and recomputing it always
//! yields the same result.

use std::fmt::{Display, Formatter};
use std::sync::{Arc, OnceLock};

use crate::Array;
use crate::enums::error::MinicolError;
use crate::enums::scalar::Scalar;
use crate::structs::bitmask::Bitmask;
use crate::structs::buffer::Buffer;
use crate::traits::masked_array::MaskedArray;
use crate::traits::print::MAX_PREVIEW;
use crate::traits::type_unions::Integer;
use crate::utils::validate_null_mask_len;

/// Raw index value that denotes a missing slot absent an explicit mask.
pub const MISSING_SENTINEL: i64 = -1;

/// # DictionaryArray
///
/// Dictionary-encoded array: signed integer codes plus a shared dictionary
/// of distinct values.
///
/// ### Fields
/// - `indices`: codes referencing entries in `values`.
/// - `values`: dictionary of distinct values (any array type).
/// - `null_mask`: optional bit-packed validity bitmap (1=valid, 0=null).
///
/// ## Example
/// ```rust
/// use minicol::{Array, DictionaryArray, MaskedArray, StringArray};
///
/// let dict = Array::from_string32(StringArray::from_slice(&["x", "y"]));
/// let arr = DictionaryArray::<i32>::from_slices(&[0, 1, 0], dict, None).unwrap();
/// assert_eq!(arr.len(), 3);
/// assert_eq!(arr.null_count(), 0);
/// assert_eq!(arr.get(1).unwrap().as_str(), Some("y"));
/// ```
#[derive(Clone, Debug)]
pub struct DictionaryArray<T: Integer> {
    pub indices: Buffer<T>,
    pub values: Arc<Array>,
    pub null_mask: Option<Bitmask>,
    dense: OnceLock<Arc<Array>>,
}

impl<T: Integer> DictionaryArray<T> {
    /// Constructs a DictionaryArray from raw codes and a dictionary.
    ///
    /// `mask`, when provided, marks slots as null (`true` = null) and must
    /// match the code count. A raw code of `-1` is null even without a
    /// mask; the two null sources are OR-ed. Every non-null code must be a
    /// valid, non-negative offset into `values`.
    pub fn from_slices(
        indices: &[T],
        values: Array,
        mask: Option<&[bool]>,
    ) -> Result<Self, MinicolError> {
        if let Some(mask) = mask {
            if mask.len() != indices.len() {
                return Err(MinicolError::InvalidArgument(format!(
                    "mask length ({}) does not match index length ({})",
                    mask.len(),
                    indices.len()
                )));
            }
        }

        let dict_len = values.len();
        let mut valid = Vec::with_capacity(indices.len());
        let mut any_null = false;
        for (i, code) in indices.iter().enumerate() {
            let masked_null = mask.is_some_and(|m| m[i]);
            let Some(raw) = code.to_i64() else {
                return Err(MinicolError::InvalidArgument(format!(
                    "dictionary index at position {} exceeds the addressable range",
                    i
                )));
            };
            let sentinel_null = raw == MISSING_SENTINEL;
            if raw < 0 && !sentinel_null {
                return Err(MinicolError::InvalidArgument(format!(
                    "negative dictionary index {} at position {}",
                    raw, i
                )));
            }
            // Mask OR sentinel is authoritative.
            let is_null = masked_null || sentinel_null;
            if !is_null && raw as usize >= dict_len {
                return Err(MinicolError::InvalidArgument(format!(
                    "dictionary index {} out of bounds for dictionary of {} at position {}",
                    raw, dict_len, i
                )));
            }
            valid.push(!is_null);
            any_null |= is_null;
        }

        let null_mask = if any_null {
            Some(Bitmask::from_bools(&valid))
        } else {
            None
        };
        Ok(Self {
            indices: Buffer::from_slice(indices),
            values: Arc::new(values),
            null_mask,
            dense: OnceLock::new(),
        })
    }

    /// Constructs a DictionaryArray over pre-validated buffers.
    ///
    /// The caller's mask is still OR-ed with sentinel codes and bounds are
    /// re-checked, so no half-built array can be observed.
    pub fn new(
        indices: impl Into<Buffer<T>>,
        values: Array,
        null_mask: Option<Bitmask>,
    ) -> Result<Self, MinicolError> {
        let indices: Buffer<T> = indices.into();
        validate_null_mask_len(indices.len(), &null_mask)?;
        let mask: Option<Vec<bool>> = null_mask.map(|m| m.iter().map(|v| !v).collect());
        Self::from_slices(indices.as_slice(), values, mask.as_deref())
    }

    /// The dictionary of distinct values.
    #[inline]
    pub fn values(&self) -> &Arc<Array> {
        &self.values
    }

    /// The raw code buffer. Codes under null slots are unspecified and may
    /// hold the sentinel.
    #[inline]
    pub fn indices(&self) -> &Buffer<T> {
        &self.indices
    }

    /// Resolved code at `idx`: the dictionary offset, or None when null.
    #[inline]
    pub fn code_at(&self, idx: usize) -> Option<usize> {
        if idx >= self.len() || self.is_null(idx) {
            return None;
        }
        Some(self.indices.as_slice()[idx].to_usize())
    }

    /// Retrieves the boxed dictionary value at the given index, or
    /// `Scalar::Null` when the slot is null.
    pub fn get(&self, idx: usize) -> Result<Scalar, MinicolError> {
        match self.code_at(idx) {
            Some(code) => self.values.value(code),
            None => Ok(Scalar::Null),
        }
    }

    /// Lazily decoded dense expansion of the dictionary encoding.
    ///
    /// Memoized for the array's lifetime; recomputable and referentially
    /// transparent, so it is a projection rather than identity.
    pub fn dense(&self) -> Result<Arc<Array>, MinicolError> {
        if let Some(cached) = self.dense.get() {
            return Ok(cached.clone());
        }
        let picks: Vec<Option<usize>> = (0..self.len()).map(|i| self.code_at(i)).collect();
        let expanded = self.values.take(&picks)?;
        Ok(self.dense.get_or_init(|| Arc::new(expanded)).clone())
    }

    /// Zero-copy window `[offset, offset + len)`. The dictionary stays
    /// shared; the dense cache resets for the new window.
    pub fn slice(&self, offset: usize, len: usize) -> Self {
        Self {
            indices: self.indices.slice(offset, len),
            values: self.values.clone(),
            null_mask: self.null_mask.as_ref().map(|m| m.slice(offset, len)),
            dense: OnceLock::new(),
        }
    }

    /// Returns an iterator of boxed values, nulls yielded as `Scalar::Null`.
    pub fn iter_opt(&self) -> impl Iterator<Item = Scalar> + '_ {
        (0..self.len()).map(move |i| self.get(i).unwrap_or(Scalar::Null))
    }
}

impl DictionaryArray<i32> {
    /// Constructs a DictionaryArray from an integer-typed index array plus
    /// a dictionary of distinct values.
    ///
    /// Any integer width is accepted and re-coded to `i32`; a null index
    /// slot and a raw `-1` both mean missing, OR-ed with the optional
    /// `mask` (`true` = null). Fails with `TypeError` when `indices` is not
    /// integer-typed and `Overflow` when a wide code exceeds the `i32`
    /// range.
    pub fn from_arrays(
        indices: &Array,
        values: Array,
        mask: Option<&[bool]>,
    ) -> Result<Self, MinicolError> {
        if !indices.dtype().is_integer() {
            return Err(MinicolError::TypeError(format!(
                "dictionary indices must be integer-typed, got {}",
                indices.dtype()
            )));
        }
        let mut codes: Vec<i32> = Vec::with_capacity(indices.len());
        for i in 0..indices.len() {
            let cell = indices.value(i)?;
            match cell {
                Scalar::Null => codes.push(MISSING_SENTINEL as i32),
                other => {
                    let wide = other.as_i64().ok_or_else(|| MinicolError::Overflow {
                        value: format!("{other:?}"),
                        target: "i64",
                    })?;
                    codes.push(i32::try_from(wide).map_err(|_| MinicolError::Overflow {
                        value: wide.to_string(),
                        target: "i32",
                    })?);
                }
            }
        }
        Self::from_slices(&codes, values, mask)
    }

    /// Builds a dictionary encoding from raw string values, deriving the
    /// dictionary of distinct entries in first-appearance order.
    pub fn from_values(values: &[Option<&str>]) -> Self {
        use std::collections::HashMap;

        let mut codes: Vec<i32> = Vec::with_capacity(values.len());
        let mut distinct: Vec<&str> = Vec::new();
        let mut seen: HashMap<&str, i32> = HashMap::new();
        for v in values {
            match v {
                None => codes.push(MISSING_SENTINEL as i32),
                Some(s) => match seen.get(s) {
                    Some(&code) => codes.push(code),
                    None => {
                        let code = distinct.len() as i32;
                        distinct.push(s);
                        seen.insert(s, code);
                        codes.push(code);
                    }
                },
            }
        }
        let dict = Array::from_string32(crate::StringArray::from_slice(&distinct));
        Self::from_slices(&codes, dict, None)
            .unwrap_or_else(|e| unreachable!("derived codes are always valid: {e}"))
    }
}

impl<T: Integer> MaskedArray for DictionaryArray<T> {
    #[inline]
    fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    fn null_mask(&self) -> Option<&Bitmask> {
        self.null_mask.as_ref()
    }
}

impl<T: Integer> PartialEq for DictionaryArray<T> {
    /// Logical comparison of resolved values: two encodings of the same
    /// sequence are equal even when their dictionaries are ordered
    /// differently.
    fn eq(&self, other: &Self) -> bool {
        if self.values.dtype() != other.values.dtype() || self.len() != other.len() {
            return false;
        }
        (0..self.len()).all(|i| self.get(i).ok() == other.get(i).ok())
    }
}

impl<T: Integer + Display> Display for DictionaryArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "DictionaryArray [{} values] (dictionary: {} x {}, nulls: {})",
            self.len(),
            self.values.len(),
            self.values.dtype(),
            self.null_count()
        )?;
        write!(f, "codes [")?;
        for i in 0..usize::min(self.len(), MAX_PREVIEW) {
            if i > 0 {
                write!(f, ", ")?;
            }
            match self.code_at(i) {
                Some(code) => write!(f, "{}", code)?,
                None => write!(f, "null")?,
            }
        }
        if self.len() > MAX_PREVIEW {
            write!(f, ", … ({} total)", self.len())?;
        }
        write!(f, "]")
    }
}
