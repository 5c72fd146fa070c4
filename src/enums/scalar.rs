//! # Scalar Module - *Single Value Container*
//!
//! Contains the Scalar type for holding a single boxed value.
//!
//! ## Purpose
//! - The element type produced by `Array::value` and yielded by array
//! iteration.
//! - Consumed by the per-element ("opaque") conversion path, where a flat
//! column arrives as boxed cells rather than a dense machine buffer.
//! - Supports numeric, text, binary, decimal, temporal, list and null
//! variants.

use crate::Array;
use crate::enums::time_units::TimeUnit;

/// # Scalar
///
/// Scalar literals (single values) covering all supported types.
///
/// ## Description
/// - Useful when unifying type signatures.
/// - Includes `as_*` accessor methods that avoid needing to match to a
///   known type; unsupported conversions return `None` rather than
///   panicking.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Boolean(bool),
    // Signed integers
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    // Unsigned integers
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    // Floats
    Float32(f32),
    Float64(f64),
    String(String),
    Binary(Vec<u8>),
    /// Scaled mantissa of a 128-bit fixed-point decimal.
    Decimal128 { value: i128, scale: i8 },
    /// 32-bit epoch offset at the given resolution.
    Datetime32(i32, TimeUnit),
    /// 64-bit epoch offset at the given resolution.
    Datetime64(i64, TimeUnit),
    /// One list slot, boxed as the child window.
    List(Array),
}

impl Scalar {
    /// True for the null variant.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Boolean value, when this scalar carries one.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Signed 64-bit view of any integer or temporal variant that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int8(v) => Some(*v as i64),
            Scalar::Int16(v) => Some(*v as i64),
            Scalar::Int32(v) => Some(*v as i64),
            Scalar::Int64(v) => Some(*v),
            Scalar::UInt8(v) => Some(*v as i64),
            Scalar::UInt16(v) => Some(*v as i64),
            Scalar::UInt32(v) => Some(*v as i64),
            Scalar::UInt64(v) => i64::try_from(*v).ok(),
            Scalar::Datetime32(v, _) => Some(*v as i64),
            Scalar::Datetime64(v, _) => Some(*v),
            _ => None,
        }
    }

    /// Floating-point view of any numeric variant.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Float32(v) => Some(*v as f64),
            Scalar::Float64(v) => Some(*v),
            other => other.as_i64().map(|v| v as f64),
        }
    }

    /// String slice, when this scalar carries text.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// Byte slice, when this scalar carries binary data.
    #[inline]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Scalar::Binary(b) => Some(b),
            _ => None,
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Boolean(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int32(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int64(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float64(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::String(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::String(v)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Scalar::Null,
        }
    }
}
