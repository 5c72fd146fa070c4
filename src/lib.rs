//! # Minicol
//!
//! Pool-allocated, nullable columnar array and tensor core with zero-copy
//! slicing, dictionary encoding, and lossless conversion to/from flat
//! (NumPy-style) buffers.
//!
//! ## Overview
//! - **Type system**: [`LogicalType`] - immutable, structurally-equal
//!   descriptions of every supported value kind, plus inference from flat
//!   element descriptors.
//! - **Memory model**: injectable [`MemoryPool`]s hand out 64-byte aligned
//!   regions; [`Buffer`] windows share them by reference count, so slicing
//!   never copies.
//! - **Arrays**: typed variants unified under the [`Array`] tagged union,
//!   each carrying an optional bit-packed validity mask.
//! - **Dictionary encoding**: [`DictionaryArray`] splits distinct values
//!   from a signed index column, with `-1` as the missing sentinel.
//! - **Tensor**: [`Tensor`] - dense, strided, N-dimensional numeric views
//!   with no null machinery.
//! - **Conversion engine**: [`from_flat`]/[`to_flat`] map between the
//!   columnar model and the flat interchange shape, including type
//!   inference, hinted re-typing, eager temporal truncation, and
//!   categorical preservation.

pub mod enums {
    pub mod array;
    pub mod error;
    pub mod logical_type;
    pub mod scalar;
    pub mod time_units;
}

pub mod structs {
    pub mod variants {
        pub mod binary;
        pub mod boolean;
        pub mod datetime;
        pub mod decimal;
        pub mod dictionary;
        pub mod float;
        pub mod integer;
        pub mod list;
        pub mod string;
    }
    pub mod bitmask;
    pub mod buffer;
    pub mod field;
    pub mod field_array;
    pub mod pool;
    pub mod table;
    pub mod tensor;
}

pub mod convert {
    pub mod flat;
    pub mod from_flat;
    pub mod to_flat;
}

pub mod traits {
    pub mod masked_array;
    pub mod print;
    pub mod type_unions;
}

pub mod aliases;
pub mod utils;

pub use aliases::{BytesLength, Length, Offset, RecordBatch};
pub use convert::flat::{FlatColumn, FlatValues};
pub use convert::from_flat::{from_flat, from_flat_in};
pub use convert::to_flat::to_flat;
pub use enums::array::{Array, ArrayIter, ArrayParts};
pub use enums::error::MinicolError;
pub use enums::logical_type::{
    DictionaryIndexType, FlatDescriptor, FlatKind, LogicalType, type_from_flat_descriptor,
};
pub use enums::scalar::Scalar;
pub use enums::time_units::TimeUnit;
pub use structs::bitmask::Bitmask;
pub use structs::buffer::{Buffer, BufferMut};
pub use structs::field::Field;
pub use structs::field_array::FieldArray;
pub use structs::pool::{ALIGNMENT, CappedPool, MemoryPool, SystemPool, global_pool};
pub use structs::table::Table;
pub use structs::tensor::{Tensor, row_major_strides};
pub use structs::variants::binary::{BinaryArray, FixedSizeBinaryArray};
pub use structs::variants::boolean::BooleanArray;
pub use structs::variants::datetime::DatetimeArray;
pub use structs::variants::decimal::{DECIMAL128_MAX_PRECISION, DecimalArray};
pub use structs::variants::dictionary::{DictionaryArray, MISSING_SENTINEL};
pub use structs::variants::float::FloatArray;
pub use structs::variants::integer::IntegerArray;
pub use structs::variants::list::ListArray;
pub use structs::variants::string::StringArray;
pub use traits::masked_array::MaskedArray;
pub use traits::print::Print;
pub use traits::type_unions::{Float, Integer, Numeric, Primitive};
