//! # FieldArray Module - *Column Array type with Tagged Metadata*
//!
//! Couples a `Field` (array-level schema metadata) with an immutable
//! `Array` of values.
//!
//! Used as the primary column representation in `Minicol` tables, ensuring
//! schema and data remain consistent. This is the unit the out-of-scope
//! I/O collaborator consumes.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use crate::enums::error::MinicolError;
use crate::structs::field::Field;
use crate::{Array, LogicalType};

/// # FieldArray
///
/// Named and typed data column with associated array values.
///
/// ## Role
/// - Combines a `Field` with an immutable `Array` instance.
/// - Integrates naturally into a `Table`, where immutability enforces
///   row-length guarantees.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldArray {
    /// Array metadata
    pub field: Arc<Field>,

    /// The array's inner payload is Arc-shared, so columns clone cheaply
    /// and share safely across threads.
    pub array: Array,
}

impl FieldArray {
    /// Constructs a new `FieldArray` from an existing `Field` and `Array`.
    ///
    /// Fails with `TypeError` when the field's logical type does not match
    /// the array, and `InvalidArgument` when a non-nullable field carries
    /// nulls.
    pub fn new(field: Field, array: Array) -> Result<Self, MinicolError> {
        if field.dtype != array.dtype() {
            return Err(MinicolError::TypeError(format!(
                "field \"{}\" declares {}, array holds {}",
                field.name,
                field.dtype,
                array.dtype()
            )));
        }
        if !field.nullable && array.null_count() > 0 {
            return Err(MinicolError::InvalidArgument(format!(
                "non-nullable field \"{}\" holds {} nulls",
                field.name,
                array.null_count()
            )));
        }
        Ok(FieldArray {
            field: field.into(),
            array,
        })
    }

    /// Constructs a new `FieldArray` from a name and an `Array`, inferring
    /// type and nullability.
    pub fn from_inner(name: impl Into<String>, array: Array) -> Self {
        let field = Field::from_array(name, &array, None);
        FieldArray {
            field: field.into(),
            array,
        }
    }

    /// Number of rows in the column.
    #[inline]
    pub fn len(&self) -> usize {
        self.array.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// Column name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.field.name
    }

    /// Column logical type.
    #[inline]
    pub fn dtype(&self) -> LogicalType {
        self.field.dtype.clone()
    }

    /// Null count of the payload. O(1) after the first computation.
    #[inline]
    pub fn null_count(&self) -> usize {
        self.array.null_count()
    }

    /// Zero-copy row window sharing the same buffers and field.
    pub fn slice(&self, offset: usize, len: Option<usize>) -> Result<Self, MinicolError> {
        Ok(FieldArray {
            field: self.field.clone(),
            array: self.array.slice(offset, len)?,
        })
    }
}

impl Display for FieldArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.field)?;
        Display::fmt(&self.array, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IntegerArray;

    #[test]
    fn test_from_inner_infers_schema() {
        let fa = FieldArray::from_inner(
            "ids",
            Array::from_int64(IntegerArray::from_options(&[Some(1), None])),
        );
        assert_eq!(fa.name(), "ids");
        assert_eq!(fa.dtype(), LogicalType::Int64);
        assert!(fa.field.nullable);
        assert_eq!(fa.null_count(), 1);
    }

    #[test]
    fn test_new_validates_schema() {
        let arr = Array::from_int64(IntegerArray::from_slice(&[1, 2]));
        let err = FieldArray::new(
            Field::new("ids", LogicalType::Int32, false, None),
            arr.clone(),
        )
        .unwrap_err();
        assert!(matches!(err, MinicolError::TypeError(_)));

        let nullable_arr = Array::from_int64(IntegerArray::from_options(&[Some(1), None]));
        let err = FieldArray::new(
            Field::new("ids", LogicalType::Int64, false, None),
            nullable_arr,
        )
        .unwrap_err();
        assert!(matches!(err, MinicolError::InvalidArgument(_)));
    }

    #[test]
    fn test_slice() {
        let fa = FieldArray::from_inner(
            "xs",
            Array::from_int32(IntegerArray::from_slice(&[1, 2, 3])),
        );
        let s = fa.slice(1, None).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.name(), "xs");
    }
}
