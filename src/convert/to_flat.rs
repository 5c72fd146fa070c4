//! # Columnar to Flat Conversion
//!
//! Lowers a typed, nullable [`Array`] into a [`FlatColumn`].
//!
//! ## Behaviour
//! - Dense machine kinds emit their raw value buffer (bytes under null
//!   slots included, so bulk round trips are exact) plus a mask whenever
//!   the array carries a validity bitmap.
//! - Dictionary arrays emit the categorical pair - raw codes (sentinel
//!   included) plus the materialised category list - preserving the space
//!   savings of the encoding rather than expanding it.
//! - Variable-length and decimal kinds take the object path: boxed cells
//!   with `Scalar::Null` marking missing slots.
//! - Nested lists cannot be expressed losslessly in the flat shape and
//!   fail with `UnsupportedType`; callers flatten children first.

use log::debug;

use crate::Array;
use crate::convert::flat::{FlatColumn, FlatValues};
use crate::enums::error::MinicolError;
use crate::enums::scalar::Scalar;
use crate::enums::time_units::TimeUnit;
use crate::structs::bitmask::Bitmask;
use crate::traits::masked_array::MaskedArray;

/// Lowers an [`Array`] into the flat interchange shape.
///
/// Fails with `UnsupportedType` for nested kinds the flat representation
/// cannot express losslessly.
pub fn to_flat(array: &Array) -> Result<FlatColumn, MinicolError> {
    debug!(
        "to_flat: {} x {} ({} nulls)",
        array.len(),
        array.dtype(),
        array.null_count()
    );

    fn null_flags(mask: Option<&Bitmask>) -> Option<Vec<bool>> {
        mask.map(|m| m.iter().map(|valid| !valid).collect())
    }

    /// Boxed-cell payload: nulls live in the cells, so no mask is emitted.
    fn cells_of(array: &Array) -> Result<FlatColumn, MinicolError> {
        let cells = array.iter().collect::<Vec<Scalar>>();
        Ok(FlatColumn::dense(FlatValues::Cells(cells)))
    }

    match array {
        Array::Int8(a) => Ok(FlatColumn::new(
            FlatValues::Int8(a.data.as_slice().to_vec()),
            null_flags(a.null_mask()),
        )),
        Array::Int16(a) => Ok(FlatColumn::new(
            FlatValues::Int16(a.data.as_slice().to_vec()),
            null_flags(a.null_mask()),
        )),
        Array::Int32(a) => Ok(FlatColumn::new(
            FlatValues::Int32(a.data.as_slice().to_vec()),
            null_flags(a.null_mask()),
        )),
        Array::Int64(a) => Ok(FlatColumn::new(
            FlatValues::Int64(a.data.as_slice().to_vec()),
            null_flags(a.null_mask()),
        )),
        Array::UInt8(a) => Ok(FlatColumn::new(
            FlatValues::UInt8(a.data.as_slice().to_vec()),
            null_flags(a.null_mask()),
        )),
        Array::UInt16(a) => Ok(FlatColumn::new(
            FlatValues::UInt16(a.data.as_slice().to_vec()),
            null_flags(a.null_mask()),
        )),
        Array::UInt32(a) => Ok(FlatColumn::new(
            FlatValues::UInt32(a.data.as_slice().to_vec()),
            null_flags(a.null_mask()),
        )),
        Array::UInt64(a) => Ok(FlatColumn::new(
            FlatValues::UInt64(a.data.as_slice().to_vec()),
            null_flags(a.null_mask()),
        )),
        Array::Float32(a) => Ok(FlatColumn::new(
            FlatValues::Float32(a.data.as_slice().to_vec()),
            null_flags(a.null_mask()),
        )),
        Array::Float64(a) => Ok(FlatColumn::new(
            FlatValues::Float64(a.data.as_slice().to_vec()),
            null_flags(a.null_mask()),
        )),
        Array::Boolean(a) => Ok(FlatColumn::new(
            FlatValues::Bool(a.data.iter().collect()),
            null_flags(a.null_mask()),
        )),
        Array::Datetime32(a) => Ok(FlatColumn::new(
            FlatValues::Datetime {
                values: a.data.as_slice().iter().map(|&v| v as i64).collect(),
                unit: a.dtype.time_unit().unwrap_or_default(),
            },
            null_flags(a.null_mask()),
        )),
        Array::Datetime64(a) => {
            let values: Vec<i64> = a.data.as_slice().to_vec();
            let unit = a
                .dtype
                .time_unit()
                .unwrap_or(TimeUnit::Milliseconds);
            let payload = if matches!(a.dtype, crate::LogicalType::Duration(_)) {
                FlatValues::Timedelta { values, unit }
            } else {
                FlatValues::Datetime { values, unit }
            };
            Ok(FlatColumn::new(payload, null_flags(a.null_mask())))
        }
        Array::Dictionary(a) => {
            let categories = to_flat(a.values())?;
            Ok(FlatColumn::new(
                FlatValues::Categorical {
                    codes: a.indices().as_slice().to_vec(),
                    categories: Box::new(categories),
                },
                null_flags(a.null_mask()),
            ))
        }
        Array::String(_)
        | Array::LargeString(_)
        | Array::Binary(_)
        | Array::FixedSizeBinary(_)
        | Array::Decimal128(_)
        | Array::Null { .. } => cells_of(array),
        Array::List(_) => Err(MinicolError::UnsupportedType(
            "nested list arrays cannot be lowered to the flat representation; flatten children first".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::from_flat::from_flat;
    use crate::enums::logical_type::LogicalType;
    use crate::structs::buffer::Buffer;
    use crate::structs::variants::dictionary::DictionaryArray;
    use crate::structs::variants::integer::IntegerArray;
    use crate::structs::variants::list::ListArray;
    use crate::structs::variants::string::StringArray;

    #[test]
    fn test_bulk_round_trip_exact() {
        let flat = FlatColumn::new(
            FlatValues::Int64(vec![1, 2, 3]),
            Some(vec![false, true, false]),
        );
        let arr = from_flat(&flat, None).unwrap();
        let back = to_flat(&arr).unwrap();
        assert_eq!(back, flat);
    }

    #[test]
    fn test_bulk_round_trip_maskless() {
        let flat = FlatColumn::dense(FlatValues::Float64(vec![0.5, -1.25]));
        let arr = from_flat(&flat, None).unwrap();
        assert_eq!(to_flat(&arr).unwrap(), flat);
    }

    #[test]
    fn test_bool_round_trip() {
        let flat = FlatColumn::new(
            FlatValues::Bool(vec![true, false, true, true]),
            Some(vec![false, false, true, false]),
        );
        let arr = from_flat(&flat, None).unwrap();
        assert_eq!(to_flat(&arr).unwrap(), flat);
    }

    #[test]
    fn test_temporal_round_trip() {
        let flat = FlatColumn::dense(FlatValues::Datetime {
            values: vec![1_000, 2_000],
            unit: TimeUnit::Milliseconds,
        });
        let arr = from_flat(&flat, None).unwrap();
        assert_eq!(
            arr.dtype(),
            LogicalType::Timestamp(TimeUnit::Milliseconds, None)
        );
        assert_eq!(to_flat(&arr).unwrap(), flat);

        let flat = FlatColumn::dense(FlatValues::Timedelta {
            values: vec![5],
            unit: TimeUnit::Seconds,
        });
        let arr = from_flat(&flat, None).unwrap();
        assert_eq!(to_flat(&arr).unwrap(), flat);
    }

    #[test]
    fn test_dictionary_stays_categorical() {
        let dict = Array::from_string32(StringArray::from_slice(&["x", "y"]));
        let arr = Array::from_dictionary(
            DictionaryArray::<i32>::from_slices(&[0, 1, -1, 0], dict, None).unwrap(),
        );
        let flat = to_flat(&arr).unwrap();
        match &flat.values {
            FlatValues::Categorical { codes, categories } => {
                assert_eq!(codes, &[0, 1, -1, 0]);
                assert_eq!(categories.len(), 2);
            }
            other => panic!("expected categorical payload, got {other:?}"),
        }
        // And back: the encoding survives, nulls normalised through the OR.
        let again = from_flat(&flat, None).unwrap();
        assert_eq!(again, arr);
    }

    #[test]
    fn test_string_object_path_round_trip() {
        let arr = Array::from_string32(StringArray::from_options(&[
            Some("foo"),
            None,
            Some("mañana"),
        ]));
        let flat = to_flat(&arr).unwrap();
        match &flat.values {
            FlatValues::Cells(cells) => {
                assert_eq!(cells[0].as_str(), Some("foo"));
                assert!(cells[1].is_null());
            }
            other => panic!("expected cells payload, got {other:?}"),
        }
        let again = from_flat(&flat, None).unwrap();
        assert_eq!(again, arr);
    }

    #[test]
    fn test_list_rejected() {
        let child = Array::from_int64(IntegerArray::from_slice(&[1, 2, 3]));
        let arr = Array::from_list(
            ListArray::new(Buffer::from_slice(&[0u32, 2, 3]), child, None).unwrap(),
        );
        let err = to_flat(&arr).unwrap_err();
        assert!(matches!(err, MinicolError::UnsupportedType(_)));
    }

    #[test]
    fn test_null_array_cells() {
        let flat = to_flat(&Array::null(2)).unwrap();
        assert_eq!(
            flat,
            FlatColumn::dense(FlatValues::Cells(vec![Scalar::Null, Scalar::Null]))
        );
        let again = from_flat(&flat, None).unwrap();
        assert_eq!(again, Array::null(2));
    }

    #[test]
    fn test_sliced_array_lowers_its_window_only() {
        let flat = FlatColumn::new(
            FlatValues::Int32(vec![1, 2, 3, 4, 5]),
            Some(vec![false, false, true, false, false]),
        );
        let arr = from_flat(&flat, None).unwrap();
        let window = arr.slice(1, Some(3)).unwrap();
        let lowered = to_flat(&window).unwrap();
        assert_eq!(
            lowered,
            FlatColumn::new(
                FlatValues::Int32(vec![2, 3, 4]),
                Some(vec![false, true, false])
            )
        );
    }
}
