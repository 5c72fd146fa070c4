//! # LogicalType Module - *Type tagging for self-documenting data*
//!
//! Unified Minicol representations of the supported logical data types.
//!
//! ## Overview
//! - Covers integer, floating-point, boolean, string, binary, decimal,
//!   dictionary-encoded, nested list, and temporal types
//!   (date, time, duration, timestamp).
//! - Each Minicol array type reports its matching `LogicalType` via
//!   `Array::dtype()`.
//! - Instances are immutable and shared by value; two instances are equal
//!   iff their structural descriptions match, and hashing is structural.
//!
//! ## DictionaryIndexType
//! - Specifies the signed integer width of dictionary keys for
//!   dictionary-encoded arrays. Signed, so the `-1` missing sentinel is
//!   representable.
//!
//! ## Display
//! - Human-readable type names are produced for all variants.
//! - Temporal types include their units in the rendered output.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::enums::error::MinicolError;
use crate::enums::time_units::TimeUnit;

/// # LogicalType
///
/// Immutable description of a value's semantic kind.
///
/// ## Purpose
/// - Encodes the logical type and, for temporal variants, associated unit
/// information for all supported Minicol arrays.
/// - Provides a single discriminant used across the crate for schema
/// definitions, type matching, and boxing dispatch.
///
/// ## Coverage
/// - **Core primitives**: integer, floating-point, boolean.
/// - **Strings**: UTF-8 (`String` with 32-bit offsets) and `LargeString`
///   (64-bit offsets).
/// - **Binary**: variable-length `Binary` and `FixedSizeBinary` with an
///   explicit byte width.
/// - **Decimal**: 128-bit fixed-point with precision and scale.
/// - **Temporal types**: `date`, `time`, `duration` and `timestamp` with
///   explicit units; timestamps carry an optional timezone.
/// - **Nested**: `List` of any element type.
/// - **Dictionary-encoded**: index width plus the value type of the
///   referenced dictionary.
/// - **`Null`**: placeholder or metadata-only fields.
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub enum LogicalType {
    Null,
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    /// Days since the UNIX epoch, 32-bit.
    Date32,
    /// Milliseconds since the UNIX epoch, 64-bit.
    Date64,
    /// Time of day, 32-bit, seconds or milliseconds.
    Time32(TimeUnit),
    /// Time of day, 64-bit, microseconds or nanoseconds.
    Time64(TimeUnit),
    /// Instant since the UNIX epoch at the given resolution, with an
    /// optional IANA timezone name.
    Timestamp(TimeUnit, Option<String>),
    /// Elapsed time at the given resolution, 64-bit.
    Duration(TimeUnit),
    /// 128-bit fixed-point decimal.
    Decimal128 { precision: u8, scale: i8 },
    /// Opaque binary values of a fixed byte width.
    FixedSizeBinary(usize),
    String,
    LargeString,
    Binary,
    /// Variable-length list of `element` values.
    List(Box<LogicalType>),
    /// Dictionary-encoded values: a small integer index column referencing
    /// a dictionary of distinct `value`-typed entries.
    Dictionary {
        index: DictionaryIndexType,
        value: Box<LogicalType>,
    },
}

/// # DictionaryIndexType
///
/// Signed integer width used for dictionary keys in dictionary-encoded
/// arrays.
///
/// ## Overview
/// - Determines the storage size of the key column that indexes into the
///   dictionary of distinct values.
/// - Smaller widths reduce memory footprint for low-cardinality data.
/// - Signed, so a raw `-1` key can act as the missing-value sentinel.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Default)]
pub enum DictionaryIndexType {
    Int8,
    Int16,
    #[default]
    Int32,
    Int64,
}

impl LogicalType {
    /// Fixed byte width of a single element, where one exists.
    ///
    /// Variable-length, nested and dictionary types return `None`.
    pub fn primitive_width(&self) -> Option<usize> {
        match self {
            LogicalType::Boolean => None, // bit-packed
            LogicalType::Int8 | LogicalType::UInt8 => Some(1),
            LogicalType::Int16 | LogicalType::UInt16 => Some(2),
            LogicalType::Int32 | LogicalType::UInt32 | LogicalType::Float32 => Some(4),
            LogicalType::Int64 | LogicalType::UInt64 | LogicalType::Float64 => Some(8),
            LogicalType::Date32 | LogicalType::Time32(_) => Some(4),
            LogicalType::Date64
            | LogicalType::Time64(_)
            | LogicalType::Timestamp(_, _)
            | LogicalType::Duration(_) => Some(8),
            LogicalType::Decimal128 { .. } => Some(16),
            LogicalType::FixedSizeBinary(w) => Some(*w),
            _ => None,
        }
    }

    /// True for the integer types, signed or unsigned.
    #[inline]
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            LogicalType::Int8
                | LogicalType::Int16
                | LogicalType::Int32
                | LogicalType::Int64
                | LogicalType::UInt8
                | LogicalType::UInt16
                | LogicalType::UInt32
                | LogicalType::UInt64
        )
    }

    /// True for the signed integer types.
    #[inline]
    pub fn is_signed_integer(&self) -> bool {
        matches!(
            self,
            LogicalType::Int8 | LogicalType::Int16 | LogicalType::Int32 | LogicalType::Int64
        )
    }

    /// True for the floating-point types.
    #[inline]
    pub fn is_float(&self) -> bool {
        matches!(self, LogicalType::Float32 | LogicalType::Float64)
    }

    /// True for the integer and float types - the kinds a `Tensor` can
    /// hold.
    #[inline]
    pub fn is_primitive_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// True for the date/time/timestamp/duration family.
    #[inline]
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            LogicalType::Date32
                | LogicalType::Date64
                | LogicalType::Time32(_)
                | LogicalType::Time64(_)
                | LogicalType::Timestamp(_, _)
                | LogicalType::Duration(_)
        )
    }

    /// Resolution of a temporal type, or `None` for non-temporal types.
    pub fn time_unit(&self) -> Option<TimeUnit> {
        match self {
            LogicalType::Date32 => Some(TimeUnit::Days),
            LogicalType::Date64 => Some(TimeUnit::Milliseconds),
            LogicalType::Time32(u)
            | LogicalType::Time64(u)
            | LogicalType::Timestamp(u, _)
            | LogicalType::Duration(u) => Some(*u),
            _ => None,
        }
    }
}

impl DictionaryIndexType {
    /// Byte width of the key column element.
    #[inline]
    pub fn width(&self) -> usize {
        match self {
            DictionaryIndexType::Int8 => 1,
            DictionaryIndexType::Int16 => 2,
            DictionaryIndexType::Int32 => 4,
            DictionaryIndexType::Int64 => 8,
        }
    }
}

impl Display for LogicalType {
    /// Render the LogicalType as its variant name, including associated
    /// units and parameters where applicable.
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            LogicalType::Null => f.write_str("Null"),
            LogicalType::Boolean => f.write_str("Boolean"),
            LogicalType::Int8 => f.write_str("Int8"),
            LogicalType::Int16 => f.write_str("Int16"),
            LogicalType::Int32 => f.write_str("Int32"),
            LogicalType::Int64 => f.write_str("Int64"),
            LogicalType::UInt8 => f.write_str("UInt8"),
            LogicalType::UInt16 => f.write_str("UInt16"),
            LogicalType::UInt32 => f.write_str("UInt32"),
            LogicalType::UInt64 => f.write_str("UInt64"),
            LogicalType::Float32 => f.write_str("Float32"),
            LogicalType::Float64 => f.write_str("Float64"),
            LogicalType::Date32 => f.write_str("Date32"),
            LogicalType::Date64 => f.write_str("Date64"),
            LogicalType::Time32(unit) => write!(f, "Time32({unit})"),
            LogicalType::Time64(unit) => write!(f, "Time64({unit})"),
            LogicalType::Timestamp(unit, None) => write!(f, "Timestamp({unit})"),
            LogicalType::Timestamp(unit, Some(tz)) => write!(f, "Timestamp({unit}, {tz})"),
            LogicalType::Duration(unit) => write!(f, "Duration({unit})"),
            LogicalType::Decimal128 { precision, scale } => {
                write!(f, "Decimal128({precision}, {scale})")
            }
            LogicalType::FixedSizeBinary(width) => write!(f, "FixedSizeBinary({width})"),
            LogicalType::String => f.write_str("String"),
            LogicalType::LargeString => f.write_str("LargeString"),
            LogicalType::Binary => f.write_str("Binary"),
            LogicalType::List(elem) => write!(f, "List({elem})"),
            LogicalType::Dictionary { index, value } => {
                write!(f, "Dictionary({index}, {value})")
            }
        }
    }
}

impl Display for DictionaryIndexType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DictionaryIndexType::Int8 => f.write_str("Int8"),
            DictionaryIndexType::Int16 => f.write_str("Int16"),
            DictionaryIndexType::Int32 => f.write_str("Int32"),
            DictionaryIndexType::Int64 => f.write_str("Int64"),
        }
    }
}

/// Element kind of a flat-representation descriptor.
///
/// Mirrors the kind character of a NumPy-style dtype: the conversion engine
/// receives this at the flat boundary and maps it onto a `LogicalType`.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum FlatKind {
    Bool,
    Int,
    UInt,
    Float,
    Datetime,
    Timedelta,
    /// Mixed or boxed elements with no uniform machine representation.
    /// Handled by the per-element conversion path, never by bulk copy.
    Opaque,
}

/// Element descriptor at the flat-representation boundary: kind, element
/// byte width, and (for temporal kinds) resolution.
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub struct FlatDescriptor {
    pub kind: FlatKind,
    pub byte_width: usize,
    pub unit: Option<TimeUnit>,
}

impl FlatDescriptor {
    pub fn new(kind: FlatKind, byte_width: usize) -> Self {
        Self {
            kind,
            byte_width,
            unit: None,
        }
    }

    pub fn temporal(kind: FlatKind, unit: TimeUnit) -> Self {
        Self {
            kind,
            byte_width: 8,
            unit: Some(unit),
        }
    }
}

/// Infers a `LogicalType` from an external flat-representation element
/// descriptor.
///
/// Fails with `UnsupportedType` when no mapping exists: half floats,
/// odd integer widths, `Opaque` elements (these take the per-element
/// inference path in the conversion engine instead).
pub fn type_from_flat_descriptor(desc: &FlatDescriptor) -> Result<LogicalType, MinicolError> {
    match (desc.kind, desc.byte_width) {
        (FlatKind::Bool, 1) => Ok(LogicalType::Boolean),
        (FlatKind::Int, 1) => Ok(LogicalType::Int8),
        (FlatKind::Int, 2) => Ok(LogicalType::Int16),
        (FlatKind::Int, 4) => Ok(LogicalType::Int32),
        (FlatKind::Int, 8) => Ok(LogicalType::Int64),
        (FlatKind::UInt, 1) => Ok(LogicalType::UInt8),
        (FlatKind::UInt, 2) => Ok(LogicalType::UInt16),
        (FlatKind::UInt, 4) => Ok(LogicalType::UInt32),
        (FlatKind::UInt, 8) => Ok(LogicalType::UInt64),
        (FlatKind::Float, 4) => Ok(LogicalType::Float32),
        (FlatKind::Float, 8) => Ok(LogicalType::Float64),
        (FlatKind::Datetime, 8) => match desc.unit.unwrap_or_default() {
            TimeUnit::Days => Ok(LogicalType::Date32),
            unit => Ok(LogicalType::Timestamp(unit, None)),
        },
        (FlatKind::Timedelta, 8) => Ok(LogicalType::Duration(
            desc.unit.unwrap_or(TimeUnit::Nanoseconds),
        )),
        _ => Err(MinicolError::UnsupportedType(format!(
            "no logical type for flat descriptor {:?}/{} bytes",
            desc.kind, desc.byte_width
        ))),
    }
}
