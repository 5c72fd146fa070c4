//! Shared `usize` aliases used across windowed accessors, plus the
//! record-batch alias for `Table`.

use crate::Table;

/// Element offset into an array or buffer window.
pub type Offset = usize;

/// Element count of an array or buffer window.
pub type Length = usize;

/// Byte length of a raw buffer.
pub type BytesLength = usize;

/// Standard columnar record batch - named, equal-length columns.
///
/// The out-of-scope I/O collaborator consumes tables in this shape:
/// a schema followed by a sequence of record batches.
pub type RecordBatch = Table;
