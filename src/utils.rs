//! # Utilities - *Internal Helper Utilities*
//!
//! A small collection of internal helpers that support validation elsewhere
//! within the crate.

use crate::enums::error::MinicolError;
use crate::structs::bitmask::Bitmask;

/// Checks that an optional validity mask covers exactly `data_len` slots.
#[inline(always)]
pub fn validate_null_mask_len(
    data_len: usize,
    null_mask: &Option<Bitmask>,
) -> Result<(), MinicolError> {
    if let Some(mask) = null_mask {
        if mask.len() != data_len {
            return Err(MinicolError::InvalidArgument(format!(
                "null mask length ({}) does not match data length ({})",
                mask.len(),
                data_len
            )));
        }
    }
    Ok(())
}

/// Bounds check shared by the element accessors.
#[inline(always)]
pub fn check_index(index: usize, length: usize) -> Result<(), MinicolError> {
    if index >= length {
        return Err(MinicolError::IndexOutOfRange { index, length });
    }
    Ok(())
}

/// Resolves `slice(offset, len)` arguments against an array length:
/// defaults `len` to the remainder and rejects out-of-bounds windows.
#[inline]
pub fn resolve_window(
    array_len: usize,
    offset: usize,
    len: Option<usize>,
) -> Result<(usize, usize), MinicolError> {
    if offset > array_len {
        return Err(MinicolError::InvalidArgument(format!(
            "slice offset {} exceeds array length {}",
            offset, array_len
        )));
    }
    let len = len.unwrap_or(array_len - offset);
    if offset + len > array_len {
        return Err(MinicolError::InvalidArgument(format!(
            "slice window [{}, {}) exceeds array length {}",
            offset,
            offset + len,
            array_len
        )));
    }
    Ok((offset, len))
}
