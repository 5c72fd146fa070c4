//! # **BinaryArray Module** - *Variable and Fixed Width Binary Arrays*
//!
//! Opaque byte-sequence arrays:
//! - [`BinaryArray`]: variable-length values behind an `offsets + data`
//!   layout, the binary sibling of `StringArray` without the UTF-8 contract.
//! - [`FixedSizeBinaryArray`]: every value packed at a fixed byte width,
//!   addressed by multiplication instead of offsets.

use std::fmt::{Display, Formatter};

use crate::enums::error::MinicolError;
use crate::structs::bitmask::Bitmask;
use crate::structs::buffer::{Buffer, BufferMut};
use crate::traits::masked_array::MaskedArray;
use crate::traits::print::MAX_PREVIEW;
use crate::traits::type_unions::Integer;
use crate::utils::validate_null_mask_len;

/// # BinaryArray
///
/// Variable-length binary array with `u32` offsets.
///
/// ### Fields
/// - `offsets`: indices into the `data` buffer; i-th value is
///   `data[offsets[i]..offsets[i+1]]`.
/// - `data`: concatenated bytes for all values.
/// - `null_mask`: optional bit-packed validity bitmap (1=valid, 0=null).
#[derive(Clone, Debug)]
pub struct BinaryArray {
    pub offsets: Buffer<u32>,
    pub data: Buffer<u8>,
    pub null_mask: Option<Bitmask>,
}

impl BinaryArray {
    /// Constructs a BinaryArray over existing buffers, validating the
    /// offset invariants.
    pub fn new(
        offsets: impl Into<Buffer<u32>>,
        data: impl Into<Buffer<u8>>,
        null_mask: Option<Bitmask>,
    ) -> Result<Self, MinicolError> {
        let offsets: Buffer<u32> = offsets.into();
        let data: Buffer<u8> = data.into();
        if offsets.is_empty() {
            return Err(MinicolError::InvalidArgument(
                "binary offsets buffer must hold at least one entry".to_string(),
            ));
        }
        validate_null_mask_len(offsets.len() - 1, &null_mask)?;
        let offs = offsets.as_slice();
        for w in offs.windows(2) {
            if w[1] < w[0] {
                return Err(MinicolError::InvalidArgument(
                    "binary offsets must be monotonically non-decreasing".to_string(),
                ));
            }
        }
        if offs[offs.len() - 1].to_usize() > data.len() {
            return Err(MinicolError::InvalidArgument(format!(
                "final binary offset {} exceeds data length {}",
                offs[offs.len() - 1],
                data.len()
            )));
        }
        Ok(Self {
            offsets,
            data,
            null_mask,
        })
    }

    /// Constructs a dense array from byte slices (no nulls).
    pub fn from_slices(slices: &[&[u8]]) -> Self {
        let mut offsets = BufferMut::<u32>::with_capacity(slices.len() + 1);
        let mut data = BufferMut::<u8>::new();
        offsets.push(0);
        for s in slices {
            data.extend_from_slice(s);
            offsets.push(data.len() as u32);
        }
        Self {
            offsets: offsets.freeze(),
            data: data.freeze(),
            null_mask: None,
        }
    }

    /// Constructs a nullable array from optional byte slices.
    pub fn from_options(values: &[Option<&[u8]>]) -> Self {
        let mut offsets = BufferMut::<u32>::with_capacity(values.len() + 1);
        let mut data = BufferMut::<u8>::new();
        let mut valid = Vec::with_capacity(values.len());
        offsets.push(0);
        for v in values {
            if let Some(s) = v {
                data.extend_from_slice(s);
            }
            offsets.push(data.len() as u32);
            valid.push(v.is_some());
        }
        Self {
            offsets: offsets.freeze(),
            data: data.freeze(),
            null_mask: Some(Bitmask::from_bools(&valid)),
        }
    }

    /// Returns the value at the given index, or None if null or beyond
    /// length.
    #[inline]
    pub fn get_bytes(&self, idx: usize) -> Option<&[u8]> {
        if idx >= self.len() || self.is_null(idx) {
            return None;
        }
        let offs = self.offsets.as_slice();
        Some(&self.data.as_slice()[offs[idx] as usize..offs[idx + 1] as usize])
    }

    /// Zero-copy window `[offset, offset + len)`.
    pub fn slice(&self, offset: usize, len: usize) -> Self {
        Self {
            offsets: self.offsets.slice(offset, len + 1),
            data: self.data.clone(),
            null_mask: self.null_mask.as_ref().map(|m| m.slice(offset, len)),
        }
    }

    /// Returns an iterator of `Option<&[u8]>`, None if value is null.
    pub fn iter_opt(&self) -> impl Iterator<Item = Option<&[u8]>> + '_ {
        (0..self.len()).map(move |i| self.get_bytes(i))
    }
}

impl MaskedArray for BinaryArray {
    #[inline]
    fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    #[inline]
    fn null_mask(&self) -> Option<&Bitmask> {
        self.null_mask.as_ref()
    }
}

impl Default for BinaryArray {
    fn default() -> Self {
        Self::from_slices(&[])
    }
}

impl PartialEq for BinaryArray {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        (0..self.len()).all(|i| self.get_bytes(i) == other.get_bytes(i))
    }
}

impl Display for BinaryArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "BinaryArray [{} values] (dtype: binary, nulls: {})",
            self.len(),
            self.null_count()
        )?;
        write!(f, "[")?;
        for i in 0..usize::min(self.len(), MAX_PREVIEW) {
            if i > 0 {
                write!(f, ", ")?;
            }
            match self.get_bytes(i) {
                Some(b) => write!(f, "{} bytes", b.len())?,
                None => write!(f, "null")?,
            }
        }
        if self.len() > MAX_PREVIEW {
            write!(f, ", … ({} total)", self.len())?;
        }
        write!(f, "]")
    }
}

/// # FixedSizeBinaryArray
///
/// Binary array whose every value occupies exactly `width` bytes.
///
/// ### Fields
/// - `width`: fixed byte width of each value.
/// - `data`: packed values, `len * width` bytes.
/// - `null_mask`: optional bit-packed validity bitmap (1=valid, 0=null).
#[derive(Clone, Debug)]
pub struct FixedSizeBinaryArray {
    pub width: usize,
    pub data: Buffer<u8>,
    pub null_mask: Option<Bitmask>,
}

impl FixedSizeBinaryArray {
    /// Constructs a FixedSizeBinaryArray over an existing packed buffer.
    pub fn new(
        width: usize,
        data: impl Into<Buffer<u8>>,
        null_mask: Option<Bitmask>,
    ) -> Result<Self, MinicolError> {
        if width == 0 {
            return Err(MinicolError::InvalidArgument(
                "fixed-size binary width must be positive".to_string(),
            ));
        }
        let data: Buffer<u8> = data.into();
        if data.len() % width != 0 {
            return Err(MinicolError::InvalidArgument(format!(
                "data length {} is not a multiple of width {}",
                data.len(),
                width
            )));
        }
        validate_null_mask_len(data.len() / width, &null_mask)?;
        Ok(Self {
            width,
            data,
            null_mask,
        })
    }

    /// Constructs an array from optional byte slices, each exactly `width`
    /// bytes.
    ///
    /// Fails with `InvalidArgument` when any value has a different length -
    /// varying lengths are never accepted.
    pub fn from_options(
        width: usize,
        values: &[Option<&[u8]>],
    ) -> Result<Self, MinicolError> {
        let mut data = BufferMut::<u8>::with_capacity(values.len() * width);
        let mut valid = Vec::with_capacity(values.len());
        for (i, v) in values.iter().enumerate() {
            match v {
                Some(bytes) => {
                    if bytes.len() != width {
                        return Err(MinicolError::InvalidArgument(format!(
                            "value at {} has length {}, expected fixed width {}",
                            i,
                            bytes.len(),
                            width
                        )));
                    }
                    data.extend_from_slice(bytes);
                    valid.push(true);
                }
                None => {
                    data.resize(data.len() + width, 0);
                    valid.push(false);
                }
            }
        }
        let null_mask = if valid.iter().all(|&v| v) {
            None
        } else {
            Some(Bitmask::from_bools(&valid))
        };
        Self::new(width, data.freeze(), null_mask)
    }

    /// Returns the value at the given index, or None if null or beyond
    /// length.
    #[inline]
    pub fn get_bytes(&self, idx: usize) -> Option<&[u8]> {
        if idx >= self.len() || self.is_null(idx) {
            return None;
        }
        let start = idx * self.width;
        Some(&self.data.as_slice()[start..start + self.width])
    }

    /// Zero-copy window `[offset, offset + len)`.
    pub fn slice(&self, offset: usize, len: usize) -> Self {
        Self {
            width: self.width,
            data: self.data.slice(offset * self.width, len * self.width),
            null_mask: self.null_mask.as_ref().map(|m| m.slice(offset, len)),
        }
    }
}

impl MaskedArray for FixedSizeBinaryArray {
    #[inline]
    fn len(&self) -> usize {
        self.data.len() / self.width
    }

    #[inline]
    fn null_mask(&self) -> Option<&Bitmask> {
        self.null_mask.as_ref()
    }
}

impl PartialEq for FixedSizeBinaryArray {
    fn eq(&self, other: &Self) -> bool {
        if self.width != other.width || self.len() != other.len() {
            return false;
        }
        (0..self.len()).all(|i| self.get_bytes(i) == other.get_bytes(i))
    }
}

impl Display for FixedSizeBinaryArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FixedSizeBinaryArray [{} values x {} bytes] (nulls: {})",
            self.len(),
            self.width,
            self.null_count()
        )
    }
}
