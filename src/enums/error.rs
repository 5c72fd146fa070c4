//! # Error Module - Custom *Minicol* Error Type
//!
//! Defines the unified error type for Minicol.
//!
//! ## Features
//! - Covers allocation failure, caller argument errors, out-of-range access,
//! type inference/coercion failures, overflow, lossy casts, and dispatcher
//! misses.
//! - Implements `Display` via `thiserror` and `Error` for integration
//! with standard Rust error handling.

use thiserror::Error;

/// Catch all error type for `Minicol`
#[derive(Error, Debug, PartialEq)]
pub enum MinicolError {
    /// The memory pool could not satisfy an allocation request.
    ///
    /// Fatal to the requesting operation only, never globally fatal.
    #[error("out of memory: failed to allocate {requested} bytes")]
    OutOfMemory { requested: usize },

    /// Caller error: out-of-range offset/length, malformed mask length,
    /// negative dictionary index, and similar. Never retried.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Element access beyond the array length.
    #[error("index {index} out of range for length {length}")]
    IndexOutOfRange { index: usize, length: usize },

    /// Type inference or coercion cannot produce a valid logical type.
    #[error("type error: {0}")]
    TypeError(String),

    /// No logical type mapping exists for the requested descriptor or kind.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// The boxing dispatcher has no registered mapping for a type id.
    ///
    /// This is an internal invariant violation, not a recoverable data error.
    #[error("unknown type: no registered array mapping for {0}")]
    UnknownType(String),

    #[error("overflow: value '{value}' cannot be represented in type '{target}'")]
    Overflow {
        value: String,
        target: &'static str,
    },

    #[error("lossy cast: value '{value}' loses precision or cannot be exactly represented as '{target}'")]
    LossyCast {
        value: String,
        target: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = MinicolError::OutOfMemory { requested: 128 };
        assert_eq!(e.to_string(), "out of memory: failed to allocate 128 bytes");

        let e = MinicolError::IndexOutOfRange { index: 9, length: 3 };
        assert_eq!(e.to_string(), "index 9 out of range for length 3");

        let e = MinicolError::UnknownType("Dictionary(Dictionary)".to_string());
        assert!(e.to_string().contains("no registered array mapping"));
    }
}
