//! # **Array Module** - *Main High-Level Array Type*
//!
//! `Array` is the primary unified container for all array types in Minicol.
//!
//! ## Features:
//! - direct variant access to numeric, temporal, text, binary, nested and
//!   dictionary-encoded arrays
//! - zero-cost casts when the contained type is known
//! - zero-copy slicing with additive offsets across every variant
//! - centralises dispatch for all array operations: one tagged union over
//!   the fixed set of logical type kinds replaces any deep class hierarchy,
//!   keeping dispatch O(1) without inheritance chains
//! - the boxing dispatcher ([`Array::from_parts`]) maps a logical type onto
//!   the matching typed constructor, so a generically-typed buffer is
//!   exposed through the correct typed interface.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use crate::enums::error::MinicolError;
use crate::enums::logical_type::{DictionaryIndexType, LogicalType};
use crate::enums::scalar::Scalar;
use crate::structs::bitmask::Bitmask;
use crate::structs::buffer::Buffer;
use crate::structs::variants::binary::{BinaryArray, FixedSizeBinaryArray};
use crate::structs::variants::boolean::BooleanArray;
use crate::structs::variants::datetime::DatetimeArray;
use crate::structs::variants::decimal::DecimalArray;
use crate::structs::variants::dictionary::DictionaryArray;
use crate::structs::variants::float::FloatArray;
use crate::structs::variants::integer::IntegerArray;
use crate::structs::variants::list::ListArray;
use crate::structs::variants::string::StringArray;
use crate::traits::masked_array::MaskedArray;
use crate::traits::type_unions::Primitive;
use crate::utils::{check_index, resolve_window};

/// Dispatches `$expr` across every masked arm, with a separate expression
/// for the `Null` placeholder arm.
macro_rules! match_masked {
    ($self_:expr, $inner:ident => $expr:expr, $len:ident => $null_expr:expr) => {
        match $self_ {
            Array::Int8($inner) => $expr,
            Array::Int16($inner) => $expr,
            Array::Int32($inner) => $expr,
            Array::Int64($inner) => $expr,
            Array::UInt8($inner) => $expr,
            Array::UInt16($inner) => $expr,
            Array::UInt32($inner) => $expr,
            Array::UInt64($inner) => $expr,
            Array::Float32($inner) => $expr,
            Array::Float64($inner) => $expr,
            Array::Boolean($inner) => $expr,
            Array::String($inner) => $expr,
            Array::LargeString($inner) => $expr,
            Array::Binary($inner) => $expr,
            Array::FixedSizeBinary($inner) => $expr,
            Array::Decimal128($inner) => $expr,
            Array::Datetime32($inner) => $expr,
            Array::Datetime64($inner) => $expr,
            Array::List($inner) => $expr,
            Array::Dictionary($inner) => $expr,
            Array::Null { len: $len } => $null_expr,
        }
    };
}

/// # Array
///
/// Standard `Array` type: a tagged union over the fixed set of logical type
/// kinds, with `Arc`-wrapped inners so clones and slices share storage.
///
/// ## Overview
/// - Enables clean function signatures with direct access to concrete types
///   (e.g. `&IntegerArray<i64>` via [`i64`](Array::i64)) without exhaustive
///   matches at every call site.
/// - No heap allocation beyond the shared inners; variants are inline with
///   minimal discriminant cost, and dispatch inlines aggressively, unlike
///   approaches relying on dynamic dispatch and downcasting.
/// - The `Null { len }` arm is the typeless placeholder: every slot is
///   null, matching type inference over empty or all-missing input.
///
/// ## Examples
/// ```rust
/// use minicol::{Array, IntegerArray, MaskedArray, Scalar};
///
/// let arr = Array::from_int64(IntegerArray::from_options(&[Some(1), None, Some(3)]));
/// assert_eq!(arr.len(), 3);
/// assert_eq!(arr.null_count(), 1);
/// assert_eq!(arr.value(0).unwrap(), Scalar::Int64(1));
///
/// // Zero-copy window over the tail
/// let tail = arr.slice(1, None).unwrap();
/// assert_eq!(tail.len(), 2);
/// assert!(tail.value(0).unwrap().is_null());
/// ```
#[derive(Clone, Debug)]
pub enum Array {
    Int8(Arc<IntegerArray<i8>>),
    Int16(Arc<IntegerArray<i16>>),
    Int32(Arc<IntegerArray<i32>>),
    Int64(Arc<IntegerArray<i64>>),
    UInt8(Arc<IntegerArray<u8>>),
    UInt16(Arc<IntegerArray<u16>>),
    UInt32(Arc<IntegerArray<u32>>),
    UInt64(Arc<IntegerArray<u64>>),
    Float32(Arc<FloatArray<f32>>),
    Float64(Arc<FloatArray<f64>>),
    Boolean(Arc<BooleanArray>),
    String(Arc<StringArray<u32>>),
    LargeString(Arc<StringArray<u64>>),
    Binary(Arc<BinaryArray>),
    FixedSizeBinary(Arc<FixedSizeBinaryArray>),
    Decimal128(Arc<DecimalArray>),
    Datetime32(Arc<DatetimeArray<i32>>),
    Datetime64(Arc<DatetimeArray<i64>>),
    List(Arc<ListArray>),
    Dictionary(Arc<DictionaryArray<i32>>),
    /// Typeless all-null placeholder.
    Null { len: usize },
}

impl Default for Array {
    fn default() -> Self {
        Array::Null { len: 0 }
    }
}

// Constructors wrapping each inner type.

impl Array {
    /// Creates an Array enum with an Int8 array.
    pub fn from_int8(arr: IntegerArray<i8>) -> Self {
        Array::Int8(Arc::new(arr))
    }

    /// Creates an Array enum with an Int16 array.
    pub fn from_int16(arr: IntegerArray<i16>) -> Self {
        Array::Int16(Arc::new(arr))
    }

    /// Creates an Array enum with an Int32 array.
    pub fn from_int32(arr: IntegerArray<i32>) -> Self {
        Array::Int32(Arc::new(arr))
    }

    /// Creates an Array enum with an Int64 array.
    pub fn from_int64(arr: IntegerArray<i64>) -> Self {
        Array::Int64(Arc::new(arr))
    }

    /// Creates an Array enum with a UInt8 array.
    pub fn from_uint8(arr: IntegerArray<u8>) -> Self {
        Array::UInt8(Arc::new(arr))
    }

    /// Creates an Array enum with a UInt16 array.
    pub fn from_uint16(arr: IntegerArray<u16>) -> Self {
        Array::UInt16(Arc::new(arr))
    }

    /// Creates an Array enum with a UInt32 array.
    pub fn from_uint32(arr: IntegerArray<u32>) -> Self {
        Array::UInt32(Arc::new(arr))
    }

    /// Creates an Array enum with a UInt64 array.
    pub fn from_uint64(arr: IntegerArray<u64>) -> Self {
        Array::UInt64(Arc::new(arr))
    }

    /// Creates an Array enum with a Float32 array.
    pub fn from_float32(arr: FloatArray<f32>) -> Self {
        Array::Float32(Arc::new(arr))
    }

    /// Creates an Array enum with a Float64 array.
    pub fn from_float64(arr: FloatArray<f64>) -> Self {
        Array::Float64(Arc::new(arr))
    }

    /// Creates an Array enum with a Boolean array.
    pub fn from_bool(arr: BooleanArray) -> Self {
        Array::Boolean(Arc::new(arr))
    }

    /// Creates an Array enum with a String32 array.
    pub fn from_string32(arr: StringArray<u32>) -> Self {
        Array::String(Arc::new(arr))
    }

    /// Creates an Array enum with a LargeString array.
    pub fn from_string64(arr: StringArray<u64>) -> Self {
        Array::LargeString(Arc::new(arr))
    }

    /// Creates an Array enum with a Binary array.
    pub fn from_binary(arr: BinaryArray) -> Self {
        Array::Binary(Arc::new(arr))
    }

    /// Creates an Array enum with a FixedSizeBinary array.
    pub fn from_fixed_size_binary(arr: FixedSizeBinaryArray) -> Self {
        Array::FixedSizeBinary(Arc::new(arr))
    }

    /// Creates an Array enum with a Decimal128 array.
    pub fn from_decimal(arr: DecimalArray) -> Self {
        Array::Decimal128(Arc::new(arr))
    }

    /// Creates an Array enum with a 32-bit temporal array.
    pub fn from_datetime_i32(arr: DatetimeArray<i32>) -> Self {
        Array::Datetime32(Arc::new(arr))
    }

    /// Creates an Array enum with a 64-bit temporal array.
    pub fn from_datetime_i64(arr: DatetimeArray<i64>) -> Self {
        Array::Datetime64(Arc::new(arr))
    }

    /// Creates an Array enum with a List array.
    pub fn from_list(arr: ListArray) -> Self {
        Array::List(Arc::new(arr))
    }

    /// Creates an Array enum with a Dictionary array.
    pub fn from_dictionary(arr: DictionaryArray<i32>) -> Self {
        Array::Dictionary(Arc::new(arr))
    }

    /// Typeless all-null array of the given length.
    pub fn null(len: usize) -> Self {
        Array::Null { len }
    }
}

// Core contract: length, null accounting, typing, element access, slicing.

impl Array {
    /// Number of elements. O(1).
    pub fn len(&self) -> usize {
        match_masked!(self, a => a.len(), len => *len)
    }

    /// Returns true if the array is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of null slots. O(1) after the first computation per window.
    ///
    /// The `Null` placeholder is all null by definition.
    pub fn null_count(&self) -> usize {
        match_masked!(self, a => a.null_count(), len => *len)
    }

    /// Validity mask, when one exists.
    pub fn null_mask(&self) -> Option<&Bitmask> {
        match_masked!(self, a => a.null_mask(), _len => None)
    }

    /// The logical type this array carries.
    pub fn dtype(&self) -> LogicalType {
        match self {
            Array::Int8(_) => LogicalType::Int8,
            Array::Int16(_) => LogicalType::Int16,
            Array::Int32(_) => LogicalType::Int32,
            Array::Int64(_) => LogicalType::Int64,
            Array::UInt8(_) => LogicalType::UInt8,
            Array::UInt16(_) => LogicalType::UInt16,
            Array::UInt32(_) => LogicalType::UInt32,
            Array::UInt64(_) => LogicalType::UInt64,
            Array::Float32(_) => LogicalType::Float32,
            Array::Float64(_) => LogicalType::Float64,
            Array::Boolean(_) => LogicalType::Boolean,
            Array::String(_) => LogicalType::String,
            Array::LargeString(_) => LogicalType::LargeString,
            Array::Binary(_) => LogicalType::Binary,
            Array::FixedSizeBinary(a) => LogicalType::FixedSizeBinary(a.width),
            Array::Decimal128(a) => LogicalType::Decimal128 {
                precision: a.precision,
                scale: a.scale,
            },
            Array::Datetime32(a) => a.dtype.clone(),
            Array::Datetime64(a) => a.dtype.clone(),
            Array::List(a) => LogicalType::List(Box::new(a.value_dtype())),
            Array::Dictionary(a) => LogicalType::Dictionary {
                index: DictionaryIndexType::Int32,
                value: Box::new(a.values().dtype()),
            },
            Array::Null { .. } => LogicalType::Null,
        }
    }

    /// True when slot `i` is null. Fails with `IndexOutOfRange` beyond
    /// `len()`.
    pub fn is_null(&self, i: usize) -> Result<bool, MinicolError> {
        check_index(i, self.len())?;
        Ok(match_masked!(self, a => a.is_null(i), _len => true))
    }

    /// True when slot `i` holds a value. Fails with `IndexOutOfRange`
    /// beyond `len()`.
    pub fn is_valid(&self, i: usize) -> Result<bool, MinicolError> {
        Ok(!self.is_null(i)?)
    }

    /// Boxed element at slot `i` via the per-kind accessor. Null slots
    /// yield `Scalar::Null`. Fails with `IndexOutOfRange` beyond `len()`.
    pub fn value(&self, i: usize) -> Result<Scalar, MinicolError> {
        check_index(i, self.len())?;
        Ok(match self {
            Array::Int8(a) => a.get(i).map_or(Scalar::Null, Scalar::Int8),
            Array::Int16(a) => a.get(i).map_or(Scalar::Null, Scalar::Int16),
            Array::Int32(a) => a.get(i).map_or(Scalar::Null, Scalar::Int32),
            Array::Int64(a) => a.get(i).map_or(Scalar::Null, Scalar::Int64),
            Array::UInt8(a) => a.get(i).map_or(Scalar::Null, Scalar::UInt8),
            Array::UInt16(a) => a.get(i).map_or(Scalar::Null, Scalar::UInt16),
            Array::UInt32(a) => a.get(i).map_or(Scalar::Null, Scalar::UInt32),
            Array::UInt64(a) => a.get(i).map_or(Scalar::Null, Scalar::UInt64),
            Array::Float32(a) => a.get(i).map_or(Scalar::Null, Scalar::Float32),
            Array::Float64(a) => a.get(i).map_or(Scalar::Null, Scalar::Float64),
            Array::Boolean(a) => a.get(i).map_or(Scalar::Null, Scalar::Boolean),
            Array::String(a) => a
                .get_str(i)
                .map_or(Scalar::Null, |s| Scalar::String(s.to_string())),
            Array::LargeString(a) => a
                .get_str(i)
                .map_or(Scalar::Null, |s| Scalar::String(s.to_string())),
            Array::Binary(a) => a
                .get_bytes(i)
                .map_or(Scalar::Null, |b| Scalar::Binary(b.to_vec())),
            Array::FixedSizeBinary(a) => a
                .get_bytes(i)
                .map_or(Scalar::Null, |b| Scalar::Binary(b.to_vec())),
            Array::Decimal128(a) => a.get(i).map_or(Scalar::Null, |v| Scalar::Decimal128 {
                value: v,
                scale: a.scale,
            }),
            Array::Datetime32(a) => {
                let unit = a.dtype.time_unit().unwrap_or_default();
                a.get(i).map_or(Scalar::Null, |v| Scalar::Datetime32(v, unit))
            }
            Array::Datetime64(a) => {
                let unit = a.dtype.time_unit().unwrap_or_default();
                a.get(i).map_or(Scalar::Null, |v| Scalar::Datetime64(v, unit))
            }
            Array::List(a) => a.get_list(i).map_or(Scalar::Null, Scalar::List),
            Array::Dictionary(a) => a.get(i)?,
            Array::Null { .. } => Scalar::Null,
        })
    }

    /// Zero-copy window `[offset, offset + len)` with an additive offset
    /// over the same buffers - O(1), never copies storage.
    ///
    /// `len` defaults to the remainder of the array. Fails with
    /// `InvalidArgument` when the window exceeds the bounds;
    /// `slice(len(), None)` yields a valid empty array.
    pub fn slice(&self, offset: usize, len: Option<usize>) -> Result<Array, MinicolError> {
        let (offset, len) = resolve_window(self.len(), offset, len)?;
        Ok(match self {
            Array::Int8(a) => Array::Int8(Arc::new(a.slice(offset, len))),
            Array::Int16(a) => Array::Int16(Arc::new(a.slice(offset, len))),
            Array::Int32(a) => Array::Int32(Arc::new(a.slice(offset, len))),
            Array::Int64(a) => Array::Int64(Arc::new(a.slice(offset, len))),
            Array::UInt8(a) => Array::UInt8(Arc::new(a.slice(offset, len))),
            Array::UInt16(a) => Array::UInt16(Arc::new(a.slice(offset, len))),
            Array::UInt32(a) => Array::UInt32(Arc::new(a.slice(offset, len))),
            Array::UInt64(a) => Array::UInt64(Arc::new(a.slice(offset, len))),
            Array::Float32(a) => Array::Float32(Arc::new(a.slice(offset, len))),
            Array::Float64(a) => Array::Float64(Arc::new(a.slice(offset, len))),
            Array::Boolean(a) => Array::Boolean(Arc::new(a.slice(offset, len))),
            Array::String(a) => Array::String(Arc::new(a.slice(offset, len))),
            Array::LargeString(a) => Array::LargeString(Arc::new(a.slice(offset, len))),
            Array::Binary(a) => Array::Binary(Arc::new(a.slice(offset, len))),
            Array::FixedSizeBinary(a) => {
                Array::FixedSizeBinary(Arc::new(a.slice(offset, len)))
            }
            Array::Decimal128(a) => Array::Decimal128(Arc::new(a.slice(offset, len))),
            Array::Datetime32(a) => Array::Datetime32(Arc::new(a.slice(offset, len))),
            Array::Datetime64(a) => Array::Datetime64(Arc::new(a.slice(offset, len))),
            Array::List(a) => Array::List(Arc::new(a.slice(offset, len))),
            Array::Dictionary(a) => Array::Dictionary(Arc::new(a.slice(offset, len))),
            Array::Null { .. } => Array::Null { len },
        })
    }

    /// Gathers `picks` into a new array of the same logical type; `None`
    /// picks become null slots, as do picks landing on null values.
    ///
    /// Used by the dictionary's dense expansion. Nested kinds are not
    /// gatherable.
    pub fn take(&self, picks: &[Option<usize>]) -> Result<Array, MinicolError> {
        let len = self.len();
        for pick in picks.iter().flatten() {
            check_index(*pick, len)?;
        }
        fn gather<V: Copy>(
            picks: &[Option<usize>],
            get: impl Fn(usize) -> Option<V>,
        ) -> Vec<Option<V>> {
            picks.iter().map(|p| p.and_then(&get)).collect()
        }
        Ok(match self {
            Array::Int8(a) => Array::from_int8(IntegerArray::from_options(&gather(picks, |i| a.get(i)))),
            Array::Int16(a) => Array::from_int16(IntegerArray::from_options(&gather(picks, |i| a.get(i)))),
            Array::Int32(a) => Array::from_int32(IntegerArray::from_options(&gather(picks, |i| a.get(i)))),
            Array::Int64(a) => Array::from_int64(IntegerArray::from_options(&gather(picks, |i| a.get(i)))),
            Array::UInt8(a) => Array::from_uint8(IntegerArray::from_options(&gather(picks, |i| a.get(i)))),
            Array::UInt16(a) => Array::from_uint16(IntegerArray::from_options(&gather(picks, |i| a.get(i)))),
            Array::UInt32(a) => Array::from_uint32(IntegerArray::from_options(&gather(picks, |i| a.get(i)))),
            Array::UInt64(a) => Array::from_uint64(IntegerArray::from_options(&gather(picks, |i| a.get(i)))),
            Array::Float32(a) => Array::from_float32(FloatArray::from_options(&gather(picks, |i| a.get(i)))),
            Array::Float64(a) => Array::from_float64(FloatArray::from_options(&gather(picks, |i| a.get(i)))),
            Array::Boolean(a) => Array::from_bool(BooleanArray::from_options(&gather(picks, |i| a.get(i)))),
            Array::String(a) => Array::from_string32(StringArray::from_options(&gather(
                picks,
                |i| a.get_str(i),
            ))),
            Array::LargeString(a) => Array::from_string64(StringArray::from_options(&gather(
                picks,
                |i| a.get_str(i),
            ))),
            Array::Binary(a) => Array::from_binary(BinaryArray::from_options(&gather(
                picks,
                |i| a.get_bytes(i),
            ))),
            Array::FixedSizeBinary(a) => Array::from_fixed_size_binary(
                FixedSizeBinaryArray::from_options(
                    a.width,
                    &gather(picks, |i| a.get_bytes(i)),
                )?,
            ),
            Array::Decimal128(a) => Array::from_decimal(DecimalArray::from_options(
                &gather(picks, |i| a.get(i)),
                a.precision,
                a.scale,
            )?),
            Array::Datetime32(a) => Array::from_datetime_i32(DatetimeArray::from_options(
                &gather(picks, |i| a.get(i)),
                a.dtype.clone(),
            )?),
            Array::Datetime64(a) => Array::from_datetime_i64(DatetimeArray::from_options(
                &gather(picks, |i| a.get(i)),
                a.dtype.clone(),
            )?),
            Array::List(_) | Array::Dictionary(_) => {
                return Err(MinicolError::UnsupportedType(format!(
                    "take over nested kind {}",
                    self.dtype()
                )));
            }
            Array::Null { .. } => Array::Null { len: picks.len() },
        })
    }

    /// Lazy, finite, restartable iterator of boxed elements. Call again for
    /// a fresh pass.
    pub fn iter(&self) -> ArrayIter<'_> {
        ArrayIter {
            array: self,
            idx: 0,
        }
    }
}

/// Lazy element iterator produced by [`Array::iter`].
pub struct ArrayIter<'a> {
    array: &'a Array,
    idx: usize,
}

impl Iterator for ArrayIter<'_> {
    type Item = Scalar;

    fn next(&mut self) -> Option<Scalar> {
        if self.idx >= self.array.len() {
            return None;
        }
        let item = self.array.value(self.idx).unwrap_or(Scalar::Null);
        self.idx += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.array.len() - self.idx;
        (rest, Some(rest))
    }
}

// Typed accessors: zero-copy borrows of the concrete inner type, with a
// `TypeError` on mismatch. These keep call sites clean once the logical
// type is known, without polluting `Array` with panicking methods.

macro_rules! impl_accessor {
    ($name:ident, $variant:ident, $ret:ty, $expected:literal) => {
        #[doc = concat!("Borrows the inner ", $expected, " array, or fails with `TypeError`.")]
        pub fn $name(&self) -> Result<&$ret, MinicolError> {
            match self {
                Array::$variant(a) => Ok(&**a),
                other => Err(MinicolError::TypeError(format!(
                    concat!("expected ", $expected, ", got {}"),
                    other.dtype()
                ))),
            }
        }
    };
}

impl Array {
    impl_accessor!(i8, Int8, IntegerArray<i8>, "Int8");
    impl_accessor!(i16, Int16, IntegerArray<i16>, "Int16");
    impl_accessor!(i32, Int32, IntegerArray<i32>, "Int32");
    impl_accessor!(i64, Int64, IntegerArray<i64>, "Int64");
    impl_accessor!(u8, UInt8, IntegerArray<u8>, "UInt8");
    impl_accessor!(u16, UInt16, IntegerArray<u16>, "UInt16");
    impl_accessor!(u32, UInt32, IntegerArray<u32>, "UInt32");
    impl_accessor!(u64, UInt64, IntegerArray<u64>, "UInt64");
    impl_accessor!(f32, Float32, FloatArray<f32>, "Float32");
    impl_accessor!(f64, Float64, FloatArray<f64>, "Float64");
    impl_accessor!(bool_, Boolean, BooleanArray, "Boolean");
    impl_accessor!(str32, String, StringArray<u32>, "String");
    impl_accessor!(str64, LargeString, StringArray<u64>, "LargeString");
    impl_accessor!(binary, Binary, BinaryArray, "Binary");
    impl_accessor!(
        fixed_binary,
        FixedSizeBinary,
        FixedSizeBinaryArray,
        "FixedSizeBinary"
    );
    impl_accessor!(decimal, Decimal128, DecimalArray, "Decimal128");
    impl_accessor!(dt32, Datetime32, DatetimeArray<i32>, "32-bit temporal");
    impl_accessor!(dt64, Datetime64, DatetimeArray<i64>, "64-bit temporal");
    impl_accessor!(list, List, ListArray, "List");
    impl_accessor!(dict, Dictionary, DictionaryArray<i32>, "Dictionary");
}

impl PartialEq for Array {
    /// Deep structural equality over logical type, length, null pattern and
    /// element values. Two arrays of different logical type are never
    /// equal; buffer offsets and sharing are invisible to comparison.
    fn eq(&self, other: &Self) -> bool {
        if self.dtype() != other.dtype() {
            return false;
        }
        match (self, other) {
            (Array::Int8(a), Array::Int8(b)) => a == b,
            (Array::Int16(a), Array::Int16(b)) => a == b,
            (Array::Int32(a), Array::Int32(b)) => a == b,
            (Array::Int64(a), Array::Int64(b)) => a == b,
            (Array::UInt8(a), Array::UInt8(b)) => a == b,
            (Array::UInt16(a), Array::UInt16(b)) => a == b,
            (Array::UInt32(a), Array::UInt32(b)) => a == b,
            (Array::UInt64(a), Array::UInt64(b)) => a == b,
            (Array::Float32(a), Array::Float32(b)) => a == b,
            (Array::Float64(a), Array::Float64(b)) => a == b,
            (Array::Boolean(a), Array::Boolean(b)) => a == b,
            (Array::String(a), Array::String(b)) => a == b,
            (Array::LargeString(a), Array::LargeString(b)) => a == b,
            (Array::Binary(a), Array::Binary(b)) => a == b,
            (Array::FixedSizeBinary(a), Array::FixedSizeBinary(b)) => a == b,
            (Array::Decimal128(a), Array::Decimal128(b)) => a == b,
            (Array::Datetime32(a), Array::Datetime32(b)) => a == b,
            (Array::Datetime64(a), Array::Datetime64(b)) => a == b,
            (Array::List(a), Array::List(b)) => a == b,
            (Array::Dictionary(a), Array::Dictionary(b)) => a == b,
            (Array::Null { len: a }, Array::Null { len: b }) => a == b,
            _ => false,
        }
    }
}

impl Display for Array {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match_masked!(self, a => Display::fmt(a, f), len => write!(f, "NullArray [{} values]", len))
    }
}

// Boxing dispatcher: logical type id -> concrete typed construction.

/// Raw, untyped construction inputs for the boxing dispatcher: a length,
/// an optional validity mask, the positional data buffers, and child
/// arrays for nested kinds.
#[derive(Debug, Default)]
pub struct ArrayParts {
    pub len: usize,
    pub validity: Option<Bitmask>,
    pub buffers: Vec<Buffer<u8>>,
    pub children: Vec<Array>,
}

fn typed_values<T: Primitive>(
    raw: Buffer<u8>,
    len: usize,
) -> Result<Buffer<T>, MinicolError> {
    let typed = raw.reinterpret::<T>()?;
    if typed.len() < len {
        return Err(MinicolError::InvalidArgument(format!(
            "value buffer holds {} elements, need {}",
            typed.len(),
            len
        )));
    }
    Ok(typed.slice(0, len))
}

struct PartsReader {
    buffers: std::vec::IntoIter<Buffer<u8>>,
    children: std::vec::IntoIter<Array>,
}

impl PartsReader {
    fn buffer(&mut self, what: &str) -> Result<Buffer<u8>, MinicolError> {
        self.buffers.next().ok_or_else(|| {
            MinicolError::InvalidArgument(format!("missing {what} buffer"))
        })
    }

    fn child(&mut self, what: &str) -> Result<Array, MinicolError> {
        self.children.next().ok_or_else(|| {
            MinicolError::InvalidArgument(format!("missing {what} child array"))
        })
    }
}

impl Array {
    /// Boxes raw parts as the concrete array variant for `dtype`.
    ///
    /// One registered mapping exists per logical type kind; kinds without a
    /// mapping (a dictionary encoding of another dictionary) fail with
    /// `UnknownType`, which is an internal invariant violation rather than
    /// a recoverable data error. Structural problems in the parts
    /// themselves (missing buffers, short buffers, bad masks) fail with
    /// `InvalidArgument`.
    pub fn from_parts(dtype: &LogicalType, parts: ArrayParts) -> Result<Array, MinicolError> {
        let ArrayParts {
            len,
            validity,
            buffers,
            children,
        } = parts;
        if let Some(mask) = &validity {
            if mask.len() != len {
                return Err(MinicolError::InvalidArgument(format!(
                    "validity length ({}) does not match array length ({})",
                    mask.len(),
                    len
                )));
            }
        }
        let mut reader = PartsReader {
            buffers: buffers.into_iter(),
            children: children.into_iter(),
        };

        macro_rules! prim {
            ($t:ty, $ctor:path, $inner_ctor:expr) => {{
                let values = typed_values::<$t>(reader.buffer("value")?, len)?;
                Ok($ctor($inner_ctor(values, validity)?))
            }};
        }

        match dtype {
            LogicalType::Null => {
                if validity.is_some() {
                    return Err(MinicolError::InvalidArgument(
                        "null arrays carry no validity buffer".to_string(),
                    ));
                }
                Ok(Array::Null { len })
            }
            LogicalType::Boolean => {
                let bits = reader.buffer("value")?;
                if bits.len() * 8 < len {
                    return Err(MinicolError::InvalidArgument(format!(
                        "boolean value buffer holds {} bits, need {}",
                        bits.len() * 8,
                        len
                    )));
                }
                let data = Bitmask::from_buffer(bits, 0, len);
                Ok(Array::from_bool(BooleanArray::new(data, validity)?))
            }
            LogicalType::Int8 => prim!(i8, Array::from_int8, IntegerArray::new),
            LogicalType::Int16 => prim!(i16, Array::from_int16, IntegerArray::new),
            LogicalType::Int32 => prim!(i32, Array::from_int32, IntegerArray::new),
            LogicalType::Int64 => prim!(i64, Array::from_int64, IntegerArray::new),
            LogicalType::UInt8 => prim!(u8, Array::from_uint8, IntegerArray::new),
            LogicalType::UInt16 => prim!(u16, Array::from_uint16, IntegerArray::new),
            LogicalType::UInt32 => prim!(u32, Array::from_uint32, IntegerArray::new),
            LogicalType::UInt64 => prim!(u64, Array::from_uint64, IntegerArray::new),
            LogicalType::Float32 => prim!(f32, Array::from_float32, FloatArray::new),
            LogicalType::Float64 => prim!(f64, Array::from_float64, FloatArray::new),
            LogicalType::Date32 | LogicalType::Time32(_) => {
                let values = typed_values::<i32>(reader.buffer("value")?, len)?;
                Ok(Array::from_datetime_i32(DatetimeArray::new(
                    values,
                    dtype.clone(),
                    validity,
                )?))
            }
            LogicalType::Date64
            | LogicalType::Time64(_)
            | LogicalType::Timestamp(_, _)
            | LogicalType::Duration(_) => {
                let values = typed_values::<i64>(reader.buffer("value")?, len)?;
                Ok(Array::from_datetime_i64(DatetimeArray::new(
                    values,
                    dtype.clone(),
                    validity,
                )?))
            }
            LogicalType::Decimal128 { precision, scale } => {
                let values = typed_values::<i128>(reader.buffer("value")?, len)?;
                Ok(Array::from_decimal(DecimalArray::new(
                    values, *precision, *scale, validity,
                )?))
            }
            LogicalType::FixedSizeBinary(width) => {
                let raw = reader.buffer("value")?;
                let needed = len * width;
                if raw.len() < needed {
                    return Err(MinicolError::InvalidArgument(format!(
                        "fixed-size binary buffer holds {} bytes, need {}",
                        raw.len(),
                        needed
                    )));
                }
                Ok(Array::from_fixed_size_binary(FixedSizeBinaryArray::new(
                    *width,
                    raw.slice(0, needed),
                    validity,
                )?))
            }
            LogicalType::String => {
                let offsets = typed_values::<u32>(reader.buffer("offsets")?, len + 1)?;
                let data = reader.buffer("value")?;
                Ok(Array::from_string32(StringArray::new(
                    offsets, data, validity,
                )?))
            }
            LogicalType::LargeString => {
                let offsets = typed_values::<u64>(reader.buffer("offsets")?, len + 1)?;
                let data = reader.buffer("value")?;
                Ok(Array::from_string64(StringArray::new(
                    offsets, data, validity,
                )?))
            }
            LogicalType::Binary => {
                let offsets = typed_values::<u32>(reader.buffer("offsets")?, len + 1)?;
                let data = reader.buffer("value")?;
                Ok(Array::from_binary(BinaryArray::new(offsets, data, validity)?))
            }
            LogicalType::List(elem) => {
                let offsets = typed_values::<u32>(reader.buffer("offsets")?, len + 1)?;
                let child = reader.child("list values")?;
                if child.dtype() != **elem {
                    return Err(MinicolError::TypeError(format!(
                        "list child has type {}, expected {}",
                        child.dtype(),
                        elem
                    )));
                }
                Ok(Array::from_list(ListArray::new(offsets, child, validity)?))
            }
            LogicalType::Dictionary { index, value } => {
                if matches!(**value, LogicalType::Dictionary { .. }) {
                    return Err(MinicolError::UnknownType(
                        "Dictionary(Dictionary) has no registered array mapping".to_string(),
                    ));
                }
                let raw = reader.buffer("indices")?;
                let codes: Vec<i32> = match index {
                    DictionaryIndexType::Int8 => typed_values::<i8>(raw, len)?
                        .as_slice()
                        .iter()
                        .map(|&v| v as i32)
                        .collect(),
                    DictionaryIndexType::Int16 => typed_values::<i16>(raw, len)?
                        .as_slice()
                        .iter()
                        .map(|&v| v as i32)
                        .collect(),
                    DictionaryIndexType::Int32 => {
                        typed_values::<i32>(raw, len)?.as_slice().to_vec()
                    }
                    DictionaryIndexType::Int64 => {
                        let wide = typed_values::<i64>(raw, len)?;
                        let mut narrow = Vec::with_capacity(len);
                        for &v in wide.as_slice() {
                            narrow.push(i32::try_from(v).map_err(|_| {
                                MinicolError::Overflow {
                                    value: v.to_string(),
                                    target: "i32",
                                }
                            })?);
                        }
                        narrow
                    }
                };
                let values = reader.child("dictionary values")?;
                if values.dtype() != **value {
                    return Err(MinicolError::TypeError(format!(
                        "dictionary values have type {}, expected {}",
                        values.dtype(),
                        value
                    )));
                }
                let mask: Option<Vec<bool>> =
                    validity.map(|m| m.iter().map(|v| !v).collect());
                Ok(Array::from_dictionary(DictionaryArray::from_slices(
                    &codes,
                    values,
                    mask.as_deref(),
                )?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::time_units::TimeUnit;

    fn int_array() -> Array {
        Array::from_int64(IntegerArray::from_options(&[
            Some(1),
            None,
            Some(3),
            Some(4),
            None,
        ]))
    }

    #[test]
    fn test_len_null_count_dtype() {
        let arr = int_array();
        assert_eq!(arr.len(), 5);
        assert_eq!(arr.null_count(), 2);
        assert_eq!(arr.dtype(), LogicalType::Int64);
    }

    #[test]
    fn test_is_null_bounds() {
        let arr = int_array();
        assert!(arr.is_null(1).unwrap());
        assert!(arr.is_valid(0).unwrap());
        let err = arr.is_null(5).unwrap_err();
        assert_eq!(err, MinicolError::IndexOutOfRange { index: 5, length: 5 });
    }

    #[test]
    fn test_value_boxing() {
        let arr = int_array();
        assert_eq!(arr.value(0).unwrap(), Scalar::Int64(1));
        assert_eq!(arr.value(1).unwrap(), Scalar::Null);
        assert!(arr.value(9).is_err());
    }

    #[test]
    fn test_slice_zero_copy_and_compose() {
        let arr = int_array();
        let s = arr.slice(1, Some(3)).unwrap();
        assert_eq!(s.len(), 3);
        assert_eq!(s.null_count(), 1);
        // Composition: a.slice(o1, l1).slice(o2, l2) == a.slice(o1+o2, l2)
        let nested = s.slice(1, Some(2)).unwrap();
        let direct = arr.slice(2, Some(2)).unwrap();
        assert_eq!(nested, direct);
    }

    #[test]
    fn test_slice_boundaries() {
        let arr = int_array();
        let empty = arr.slice(5, None).unwrap();
        assert_eq!(empty.len(), 0);
        assert!(arr.slice(6, None).is_err());
        assert!(arr.slice(3, Some(3)).is_err());
    }

    #[test]
    fn test_equality_across_types() {
        let a = Array::from_int32(IntegerArray::from_slice(&[1, 2]));
        let b = Array::from_int64(IntegerArray::from_slice(&[1, 2]));
        // Same values, different logical type: never equal.
        assert_ne!(a, b);
    }

    #[test]
    fn test_iter_restartable() {
        let arr = int_array();
        let first: Vec<Scalar> = arr.iter().collect();
        let second: Vec<Scalar> = arr.iter().collect();
        assert_eq!(first.len(), 5);
        assert_eq!(first, second);
        assert_eq!(first[0], Scalar::Int64(1));
        assert!(first[1].is_null());
    }

    #[test]
    fn test_accessors() {
        let arr = int_array();
        assert!(arr.i64().is_ok());
        let err = arr.f64().unwrap_err();
        assert!(matches!(err, MinicolError::TypeError(_)));
    }

    #[test]
    fn test_null_placeholder() {
        let arr = Array::null(3);
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.null_count(), 3);
        assert!(arr.is_null(2).unwrap());
        assert_eq!(arr.value(0).unwrap(), Scalar::Null);
        assert_eq!(arr.dtype(), LogicalType::Null);
        let s = arr.slice(1, None).unwrap();
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_from_parts_int64() {
        let values = Buffer::from_slice(&[1i64, 2, 3]).into_bytes();
        let arr = Array::from_parts(
            &LogicalType::Int64,
            ArrayParts {
                len: 3,
                validity: Some(Bitmask::from_bools(&[true, false, true])),
                buffers: vec![values],
                children: vec![],
            },
        )
        .unwrap();
        assert_eq!(arr.dtype(), LogicalType::Int64);
        assert_eq!(arr.null_count(), 1);
        assert_eq!(arr.value(0).unwrap(), Scalar::Int64(1));
        assert!(arr.value(1).unwrap().is_null());
    }

    #[test]
    fn test_from_parts_string() {
        let offsets = Buffer::from_slice(&[0u32, 3, 3, 6]).into_bytes();
        let data = Buffer::from_slice(b"fooyay".as_slice());
        let arr = Array::from_parts(
            &LogicalType::String,
            ArrayParts {
                len: 3,
                validity: None,
                buffers: vec![offsets, data],
                children: vec![],
            },
        )
        .unwrap();
        assert_eq!(arr.value(0).unwrap().as_str(), Some("foo"));
        assert_eq!(arr.value(1).unwrap().as_str(), Some(""));
        assert_eq!(arr.value(2).unwrap().as_str(), Some("yay"));
    }

    #[test]
    fn test_from_parts_timestamp() {
        let dtype = LogicalType::Timestamp(TimeUnit::Milliseconds, None);
        let values = Buffer::from_slice(&[1_000i64, 2_000]).into_bytes();
        let arr = Array::from_parts(
            &dtype,
            ArrayParts {
                len: 2,
                validity: None,
                buffers: vec![values],
                children: vec![],
            },
        )
        .unwrap();
        assert_eq!(arr.dtype(), dtype);
    }

    #[test]
    fn test_from_parts_dictionary() {
        let codes = Buffer::from_slice(&[0i32, -1, 1]).into_bytes();
        let dict = Array::from_string32(StringArray::from_slice(&["x", "y"]));
        let dtype = LogicalType::Dictionary {
            index: DictionaryIndexType::Int32,
            value: Box::new(LogicalType::String),
        };
        let arr = Array::from_parts(
            &dtype,
            ArrayParts {
                len: 3,
                validity: None,
                buffers: vec![codes],
                children: vec![dict],
            },
        )
        .unwrap();
        assert_eq!(arr.dtype(), dtype);
        assert_eq!(arr.null_count(), 1);
        assert_eq!(arr.value(0).unwrap().as_str(), Some("x"));
    }

    #[test]
    fn test_from_parts_missing_buffer() {
        let err = Array::from_parts(
            &LogicalType::Int32,
            ArrayParts {
                len: 2,
                validity: None,
                buffers: vec![],
                children: vec![],
            },
        )
        .unwrap_err();
        assert!(matches!(err, MinicolError::InvalidArgument(_)));
    }

    #[test]
    fn test_from_parts_unknown_type() {
        let dtype = LogicalType::Dictionary {
            index: DictionaryIndexType::Int32,
            value: Box::new(LogicalType::Dictionary {
                index: DictionaryIndexType::Int32,
                value: Box::new(LogicalType::String),
            }),
        };
        let err = Array::from_parts(
            &dtype,
            ArrayParts {
                len: 0,
                validity: None,
                buffers: vec![],
                children: vec![],
            },
        )
        .unwrap_err();
        assert!(matches!(err, MinicolError::UnknownType(_)));
    }

    #[test]
    fn test_take() {
        let arr = Array::from_string32(StringArray::from_slice(&["a", "b", "c"]));
        let taken = arr.take(&[Some(2), None, Some(0)]).unwrap();
        assert_eq!(taken.value(0).unwrap().as_str(), Some("c"));
        assert!(taken.value(1).unwrap().is_null());
        assert_eq!(taken.value(2).unwrap().as_str(), Some("a"));
        assert!(arr.take(&[Some(3)]).is_err());
    }
}
