//! # Flat Representation - *The External Interchange Shape*
//!
//! The conversion engine's boundary types: a single contiguous value vector
//! plus an optional boolean mask of the same length (`true` = null), the
//! shape NumPy-style consumers exchange.
//!
//! Dense machine kinds carry one vector per element type. Two special
//! value shapes exist:
//! - [`FlatValues::Cells`]: boxed per-element values for opaque/mixed
//!   input, handled by the slower element-by-element inference path.
//! - [`FlatValues::Categorical`]: an index vector plus an ordered list of
//!   distinct category values, preserving dictionary encoding across the
//!   boundary instead of expanding it.

use crate::enums::logical_type::{FlatDescriptor, FlatKind};
use crate::enums::scalar::Scalar;
use crate::enums::time_units::TimeUnit;

/// Dense value payload of a flat column.
#[derive(Clone, Debug, PartialEq)]
pub enum FlatValues {
    Bool(Vec<bool>),
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    /// Epoch offsets at the given resolution.
    Datetime { values: Vec<i64>, unit: TimeUnit },
    /// Elapsed durations at the given resolution.
    Timedelta { values: Vec<i64>, unit: TimeUnit },
    /// Boxed elements with no uniform machine representation.
    Cells(Vec<Scalar>),
    /// Dictionary-encoded pair: codes plus ordered distinct categories.
    /// A `-1` code is the missing sentinel.
    Categorical {
        codes: Vec<i32>,
        categories: Box<FlatColumn>,
    },
}

impl FlatValues {
    /// Number of elements in the payload.
    pub fn len(&self) -> usize {
        match self {
            FlatValues::Bool(v) => v.len(),
            FlatValues::Int8(v) => v.len(),
            FlatValues::Int16(v) => v.len(),
            FlatValues::Int32(v) => v.len(),
            FlatValues::Int64(v) => v.len(),
            FlatValues::UInt8(v) => v.len(),
            FlatValues::UInt16(v) => v.len(),
            FlatValues::UInt32(v) => v.len(),
            FlatValues::UInt64(v) => v.len(),
            FlatValues::Float32(v) => v.len(),
            FlatValues::Float64(v) => v.len(),
            FlatValues::Datetime { values, .. } => values.len(),
            FlatValues::Timedelta { values, .. } => values.len(),
            FlatValues::Cells(v) => v.len(),
            FlatValues::Categorical { codes, .. } => codes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element descriptor of a dense machine payload. `None` for the
    /// `Cells` and `Categorical` shapes, which have no single machine
    /// element kind.
    pub fn descriptor(&self) -> Option<FlatDescriptor> {
        Some(match self {
            FlatValues::Bool(_) => FlatDescriptor::new(FlatKind::Bool, 1),
            FlatValues::Int8(_) => FlatDescriptor::new(FlatKind::Int, 1),
            FlatValues::Int16(_) => FlatDescriptor::new(FlatKind::Int, 2),
            FlatValues::Int32(_) => FlatDescriptor::new(FlatKind::Int, 4),
            FlatValues::Int64(_) => FlatDescriptor::new(FlatKind::Int, 8),
            FlatValues::UInt8(_) => FlatDescriptor::new(FlatKind::UInt, 1),
            FlatValues::UInt16(_) => FlatDescriptor::new(FlatKind::UInt, 2),
            FlatValues::UInt32(_) => FlatDescriptor::new(FlatKind::UInt, 4),
            FlatValues::UInt64(_) => FlatDescriptor::new(FlatKind::UInt, 8),
            FlatValues::Float32(_) => FlatDescriptor::new(FlatKind::Float, 4),
            FlatValues::Float64(_) => FlatDescriptor::new(FlatKind::Float, 8),
            FlatValues::Datetime { unit, .. } => {
                FlatDescriptor::temporal(FlatKind::Datetime, *unit)
            }
            FlatValues::Timedelta { unit, .. } => {
                FlatDescriptor::temporal(FlatKind::Timedelta, *unit)
            }
            FlatValues::Cells(_) | FlatValues::Categorical { .. } => return None,
        })
    }
}

/// # FlatColumn
///
/// The full interchange shape: a value payload and an optional null mask
/// of the same length, where `true` marks a null slot.
#[derive(Clone, Debug, PartialEq)]
pub struct FlatColumn {
    pub values: FlatValues,
    pub mask: Option<Vec<bool>>,
}

impl FlatColumn {
    pub fn new(values: FlatValues, mask: Option<Vec<bool>>) -> Self {
        Self { values, mask }
    }

    /// A dense column without a mask.
    pub fn dense(values: FlatValues) -> Self {
        Self { values, mask: None }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
