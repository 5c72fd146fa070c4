//! # Flat to Columnar Conversion
//!
//! Builds a typed, nullable [`Array`] from a [`FlatColumn`].
//!
//! ## Behaviour
//! - Dense machine kinds take the bulk path: one buffer copy plus an
//!   optional validity mask, preserving mask presence exactly.
//! - An explicit `type_hint` always wins over the values' intrinsic element
//!   kind. Hinted numeric re-typing is checked per element - overflow and
//!   fractional truncation surface as errors, never as a silent lossy cast.
//! - Temporal values hinted to a coarser resolution are truncated eagerly,
//!   before encoding.
//! - Categorical input (codes + distinct categories) always builds a
//!   `DictionaryArray`; it never collapses to a plain array.
//! - Opaque `Cells` input runs the slower element-by-element inference
//!   path instead of bulk bit copying.

use std::sync::Arc;

use log::debug;
use num_traits::NumCast;

use crate::Array;
use crate::convert::flat::{FlatColumn, FlatValues};
use crate::enums::error::MinicolError;
use crate::enums::logical_type::LogicalType;
use crate::enums::scalar::Scalar;
use crate::enums::time_units::TimeUnit;
use crate::structs::bitmask::Bitmask;
use crate::structs::buffer::Buffer;
use crate::structs::pool::{MemoryPool, global_pool};
use crate::structs::variants::binary::{BinaryArray, FixedSizeBinaryArray};
use crate::structs::variants::boolean::BooleanArray;
use crate::structs::variants::datetime::DatetimeArray;
use crate::structs::variants::decimal::DecimalArray;
use crate::structs::variants::dictionary::DictionaryArray;
use crate::structs::variants::float::FloatArray;
use crate::structs::variants::integer::IntegerArray;
use crate::structs::variants::string::StringArray;
use crate::traits::type_unions::{Float, Integer};

/// Builds an [`Array`] from a flat column on the process-wide pool.
///
/// See [`from_flat_in`] for the pool-injected variant.
pub fn from_flat(
    flat: &FlatColumn,
    type_hint: Option<&LogicalType>,
) -> Result<Array, MinicolError> {
    from_flat_in(flat, type_hint, &global_pool())
}

/// Builds an [`Array`] from a flat column, allocating output buffers from
/// `pool`.
///
/// Fails with `UnsupportedType` when no logical type can be inferred and
/// none is hinted, `TypeError` for incompatible hints or mixed opaque
/// elements, and `Overflow`/`LossyCast` when hinted re-typing cannot
/// represent a value exactly.
pub fn from_flat_in(
    flat: &FlatColumn,
    type_hint: Option<&LogicalType>,
    pool: &Arc<dyn MemoryPool>,
) -> Result<Array, MinicolError> {
    if let Some(mask) = &flat.mask {
        if mask.len() != flat.len() {
            return Err(MinicolError::InvalidArgument(format!(
                "mask length ({}) does not match value length ({})",
                mask.len(),
                flat.len()
            )));
        }
    }
    debug!(
        "from_flat: {} values, masked: {}, hint: {:?}",
        flat.len(),
        flat.mask.is_some(),
        type_hint
    );
    let validity: Option<Vec<bool>> = flat
        .mask
        .as_ref()
        .map(|m| m.iter().map(|&null| !null).collect());
    let hint = type_hint;

    macro_rules! bulk {
        ($vals:expr, $intrinsic:expr, $build:expr, $to_scalar:expr) => {{
            match hint {
                None => $build,
                Some(h) if *h == $intrinsic => $build,
                Some(h) => {
                    let cells: Vec<Scalar> = $vals.iter().map($to_scalar).collect();
                    cells_to_array(&cells, validity.as_deref(), h, pool)
                }
            }
        }};
    }

    match &flat.values {
        FlatValues::Bool(v) => bulk!(
            v,
            LogicalType::Boolean,
            Ok(Array::from_bool(BooleanArray::new(
                Bitmask::from_bools_in(v, pool)?,
                mask_of(&validity, pool)?,
            )?)),
            |&x| Scalar::Boolean(x)
        ),
        FlatValues::Int8(v) => bulk!(
            v,
            LogicalType::Int8,
            build_int(v, &validity, pool).map(Array::from_int8),
            |&x| Scalar::Int8(x)
        ),
        FlatValues::Int16(v) => bulk!(
            v,
            LogicalType::Int16,
            build_int(v, &validity, pool).map(Array::from_int16),
            |&x| Scalar::Int16(x)
        ),
        FlatValues::Int32(v) => bulk!(
            v,
            LogicalType::Int32,
            build_int(v, &validity, pool).map(Array::from_int32),
            |&x| Scalar::Int32(x)
        ),
        FlatValues::Int64(v) => bulk!(
            v,
            LogicalType::Int64,
            build_int(v, &validity, pool).map(Array::from_int64),
            |&x| Scalar::Int64(x)
        ),
        FlatValues::UInt8(v) => bulk!(
            v,
            LogicalType::UInt8,
            build_int(v, &validity, pool).map(Array::from_uint8),
            |&x| Scalar::UInt8(x)
        ),
        FlatValues::UInt16(v) => bulk!(
            v,
            LogicalType::UInt16,
            build_int(v, &validity, pool).map(Array::from_uint16),
            |&x| Scalar::UInt16(x)
        ),
        FlatValues::UInt32(v) => bulk!(
            v,
            LogicalType::UInt32,
            build_int(v, &validity, pool).map(Array::from_uint32),
            |&x| Scalar::UInt32(x)
        ),
        FlatValues::UInt64(v) => bulk!(
            v,
            LogicalType::UInt64,
            build_int(v, &validity, pool).map(Array::from_uint64),
            |&x| Scalar::UInt64(x)
        ),
        FlatValues::Float32(v) => bulk!(
            v,
            LogicalType::Float32,
            build_float(v, &validity, pool).map(Array::from_float32),
            |&x| Scalar::Float32(x)
        ),
        FlatValues::Float64(v) => bulk!(
            v,
            LogicalType::Float64,
            build_float(v, &validity, pool).map(Array::from_float64),
            |&x| Scalar::Float64(x)
        ),
        FlatValues::Datetime { values, unit } => {
            build_temporal(values, *unit, false, &validity, hint, pool)
        }
        FlatValues::Timedelta { values, unit } => {
            build_temporal(values, *unit, true, &validity, hint, pool)
        }
        FlatValues::Cells(cells) => {
            let target = match hint {
                Some(h) => h.clone(),
                None => infer_cells(cells, validity.as_deref())?,
            };
            cells_to_array(cells, validity.as_deref(), &target, pool)
        }
        FlatValues::Categorical { codes, categories } => {
            let value_hint = match hint {
                None => None,
                Some(LogicalType::Dictionary { value, .. }) => Some(&**value),
                Some(other) => {
                    return Err(MinicolError::TypeError(format!(
                        "categorical flat values require a dictionary type, got {other}"
                    )));
                }
            };
            let values = from_flat_in(categories, value_hint, pool)?;
            let dict = DictionaryArray::from_slices(codes, values, flat.mask.as_deref())?;
            Ok(Array::from_dictionary(dict))
        }
    }
}

fn mask_of(
    validity: &Option<Vec<bool>>,
    pool: &Arc<dyn MemoryPool>,
) -> Result<Option<Bitmask>, MinicolError> {
    Ok(match validity {
        Some(valid) => Some(Bitmask::from_bools_in(valid, pool)?),
        None => None,
    })
}

fn build_int<T: Integer>(
    values: &[T],
    validity: &Option<Vec<bool>>,
    pool: &Arc<dyn MemoryPool>,
) -> Result<IntegerArray<T>, MinicolError> {
    IntegerArray::new(
        Buffer::try_from_slice_in(values, pool)?,
        mask_of(validity, pool)?,
    )
}

fn build_float<T: Float>(
    values: &[T],
    validity: &Option<Vec<bool>>,
    pool: &Arc<dyn MemoryPool>,
) -> Result<FloatArray<T>, MinicolError> {
    FloatArray::new(
        Buffer::try_from_slice_in(values, pool)?,
        mask_of(validity, pool)?,
    )
}

/// Rescales an epoch offset between resolutions, truncating toward zero
/// when moving to a coarser unit. Happens before encoding, never lazily.
fn rescale(v: i64, src: TimeUnit, dst: TimeUnit) -> Result<i64, MinicolError> {
    let (num, den) = src.rescale_factor(dst);
    let widened = v.checked_mul(num).ok_or_else(|| MinicolError::Overflow {
        value: v.to_string(),
        target: "i64",
    })?;
    Ok(widened / den)
}

fn build_temporal(
    values: &[i64],
    src_unit: TimeUnit,
    is_duration: bool,
    validity: &Option<Vec<bool>>,
    hint: Option<&LogicalType>,
    pool: &Arc<dyn MemoryPool>,
) -> Result<Array, MinicolError> {
    let target = match hint {
        None if is_duration => LogicalType::Duration(src_unit),
        None if src_unit == TimeUnit::Days => LogicalType::Date32,
        None => LogicalType::Timestamp(src_unit, None),
        Some(h) if h.is_temporal() => h.clone(),
        Some(h) => {
            return Err(MinicolError::TypeError(format!(
                "temporal flat values cannot re-type to {h}"
            )));
        }
    };
    let dst_unit = target
        .time_unit()
        .unwrap_or_else(|| unreachable!("temporal types carry a unit"));

    match target.primitive_width() {
        Some(4) => {
            let mut narrow = Vec::with_capacity(values.len());
            for &v in values {
                let scaled = rescale(v, src_unit, dst_unit)?;
                narrow.push(i32::try_from(scaled).map_err(|_| MinicolError::Overflow {
                    value: scaled.to_string(),
                    target: "i32",
                })?);
            }
            Ok(Array::from_datetime_i32(DatetimeArray::new(
                Buffer::try_from_slice_in(&narrow, pool)?,
                target,
                mask_of(validity, pool)?,
            )?))
        }
        _ => {
            let mut scaled = Vec::with_capacity(values.len());
            for &v in values {
                scaled.push(rescale(v, src_unit, dst_unit)?);
            }
            Ok(Array::from_datetime_i64(DatetimeArray::new(
                Buffer::try_from_slice_in(&scaled, pool)?,
                target,
                mask_of(validity, pool)?,
            )?))
        }
    }
}

// Per-element ("opaque") path

/// Infers the logical type of boxed cells from their unanimous non-null
/// kind.
///
/// All-null or empty input infers `Null`. Integer/float mixes widen to
/// `Float64`; string/binary mixes encode down to `Binary`; any other
/// mixture is a `TypeError`.
fn infer_cells(
    cells: &[Scalar],
    validity: Option<&[bool]>,
) -> Result<LogicalType, MinicolError> {
    let mut has_bool = false;
    let mut has_int = false;
    let mut has_float = false;
    let mut has_str = false;
    let mut has_bin = false;
    let mut has_dt32 = false;
    let mut dt64_unit: Option<TimeUnit> = None;
    let mut dec_scale: Option<i8> = None;
    let mut kinds = 0u8;

    for (i, cell) in cells.iter().enumerate() {
        if cell.is_null() || validity.is_some_and(|v| !v[i]) {
            continue;
        }
        match cell {
            Scalar::Boolean(_) => has_bool = true,
            Scalar::Int8(_)
            | Scalar::Int16(_)
            | Scalar::Int32(_)
            | Scalar::Int64(_)
            | Scalar::UInt8(_)
            | Scalar::UInt16(_)
            | Scalar::UInt32(_)
            | Scalar::UInt64(_) => has_int = true,
            Scalar::Float32(_) | Scalar::Float64(_) => has_float = true,
            Scalar::String(_) => has_str = true,
            Scalar::Binary(_) => has_bin = true,
            Scalar::Datetime32(_, _) => has_dt32 = true,
            Scalar::Datetime64(_, unit) => {
                dt64_unit = Some(match dt64_unit {
                    Some(seen) => seen.max(*unit),
                    None => *unit,
                });
            }
            Scalar::Decimal128 { scale, .. } => match dec_scale {
                None => dec_scale = Some(*scale),
                Some(seen) if seen == *scale => {}
                Some(seen) => {
                    return Err(MinicolError::TypeError(format!(
                        "mixed decimal scales {seen} and {scale}"
                    )));
                }
            },
            Scalar::List(_) => {
                return Err(MinicolError::UnsupportedType(
                    "nested list cells cannot be inferred from the flat boundary".to_string(),
                ));
            }
            Scalar::Null => {}
        }
    }

    let numeric = has_int || has_float;
    for flag in [
        has_bool,
        numeric,
        has_str || has_bin,
        has_dt32,
        dt64_unit.is_some(),
        dec_scale.is_some(),
    ] {
        kinds += flag as u8;
    }
    if kinds > 1 {
        return Err(MinicolError::TypeError(
            "mixed element kinds in opaque flat values".to_string(),
        ));
    }

    Ok(if has_bool {
        LogicalType::Boolean
    } else if has_float {
        LogicalType::Float64
    } else if has_int {
        LogicalType::Int64
    } else if has_bin {
        LogicalType::Binary
    } else if has_str {
        LogicalType::String
    } else if has_dt32 {
        LogicalType::Date32
    } else if let Some(unit) = dt64_unit {
        LogicalType::Timestamp(unit, None)
    } else if let Some(scale) = dec_scale {
        LogicalType::Decimal128 {
            precision: crate::structs::variants::decimal::DECIMAL128_MAX_PRECISION,
            scale,
        }
    } else {
        LogicalType::Null
    })
}

/// Widest exact integer view of a numeric scalar. Floats must carry no
/// fractional part; anything non-numeric is a `TypeError`.
fn numeric_i128(cell: &Scalar) -> Result<i128, MinicolError> {
    match cell {
        Scalar::Int8(v) => Ok(*v as i128),
        Scalar::Int16(v) => Ok(*v as i128),
        Scalar::Int32(v) => Ok(*v as i128),
        Scalar::Int64(v) => Ok(*v as i128),
        Scalar::UInt8(v) => Ok(*v as i128),
        Scalar::UInt16(v) => Ok(*v as i128),
        Scalar::UInt32(v) => Ok(*v as i128),
        Scalar::UInt64(v) => Ok(*v as i128),
        Scalar::Float32(v) => exact_float(*v as f64),
        Scalar::Float64(v) => exact_float(*v),
        other => Err(MinicolError::TypeError(format!(
            "expected a numeric element, got {other:?}"
        ))),
    }
}

fn exact_float(v: f64) -> Result<i128, MinicolError> {
    if v.is_finite() && v.fract() == 0.0 {
        Ok(v as i128)
    } else {
        Err(MinicolError::LossyCast {
            value: v.to_string(),
            target: "integer",
        })
    }
}

fn to_int<T: Integer>(cell: &Scalar) -> Result<T, MinicolError> {
    let wide = numeric_i128(cell)?;
    <T as NumCast>::from(wide).ok_or_else(|| MinicolError::Overflow {
        value: wide.to_string(),
        target: std::any::type_name::<T>(),
    })
}

fn to_float<T: Float>(cell: &Scalar) -> Result<T, MinicolError> {
    let wide = match cell {
        Scalar::Float32(v) => *v as f64,
        Scalar::Float64(v) => *v,
        other => numeric_i128(other)? as f64,
    };
    <T as NumCast>::from(wide).ok_or_else(|| MinicolError::Overflow {
        value: wide.to_string(),
        target: std::any::type_name::<T>(),
    })
}

fn temporal_i64(cell: &Scalar, dst: TimeUnit) -> Result<i64, MinicolError> {
    match cell {
        Scalar::Datetime64(v, unit) => rescale(*v, *unit, dst),
        Scalar::Datetime32(v, unit) => rescale(*v as i64, *unit, dst),
        numeric => {
            // Raw integers are taken as already being in the target unit.
            let wide = numeric_i128(numeric)?;
            i64::try_from(wide).map_err(|_| MinicolError::Overflow {
                value: wide.to_string(),
                target: "i64",
            })
        }
    }
}

/// Builds an array of `dtype` from boxed cells, coercing each non-null
/// element. A slot is null when its cell is `Scalar::Null` or the mask
/// marks it. Output buffers come from `pool`.
fn cells_to_array(
    cells: &[Scalar],
    validity: Option<&[bool]>,
    dtype: &LogicalType,
    pool: &Arc<dyn MemoryPool>,
) -> Result<Array, MinicolError> {
    let is_null = |i: usize| cells[i].is_null() || validity.is_some_and(|v| !v[i]);
    let any_null = (0..cells.len()).any(is_null);

    /// Collects `Some(coerced)`/`None` per slot with the given coercion.
    fn options<V>(
        cells: &[Scalar],
        is_null: impl Fn(usize) -> bool,
        coerce: impl Fn(&Scalar) -> Result<V, MinicolError>,
    ) -> Result<Vec<Option<V>>, MinicolError> {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if is_null(i) {
                    Ok(None)
                } else {
                    coerce(cell).map(Some)
                }
            })
            .collect()
    }

    // Mask only when at least one slot is actually null: the object path
    // encodes missing values in the cells themselves.
    let cell_mask = |opts_valid: Vec<bool>, pool: &Arc<dyn MemoryPool>| {
        if any_null {
            Bitmask::from_bools_in(&opts_valid, pool).map(Some)
        } else {
            Ok(None)
        }
    };

    macro_rules! prim {
        ($opts:expr, $t:ty, $build:expr) => {{
            let opts: Vec<Option<$t>> = $opts;
            let data: Vec<$t> = opts.iter().map(|v| v.unwrap_or_default()).collect();
            let valid: Vec<bool> = opts.iter().map(|v| v.is_some()).collect();
            let buffer = Buffer::try_from_slice_in(&data, pool)?;
            let mask = cell_mask(valid, pool)?;
            $build(buffer, mask)
        }};
    }

    match dtype {
        LogicalType::Null => {
            if !(0..cells.len()).all(is_null) {
                return Err(MinicolError::TypeError(
                    "non-null elements cannot build a null-typed array".to_string(),
                ));
            }
            Ok(Array::null(cells.len()))
        }
        LogicalType::Boolean => {
            let opts = options(cells, is_null, |c| {
                c.as_bool().ok_or_else(|| {
                    MinicolError::TypeError(format!("expected a boolean element, got {c:?}"))
                })
            })?;
            let bits: Vec<bool> = opts.iter().map(|v| v.unwrap_or_default()).collect();
            let valid: Vec<bool> = opts.iter().map(|v| v.is_some()).collect();
            Ok(Array::from_bool(BooleanArray::new(
                Bitmask::from_bools_in(&bits, pool)?,
                cell_mask(valid, pool)?,
            )?))
        }
        LogicalType::Int8 => prim!(options(cells, is_null, to_int::<i8>)?, i8, |b, m| {
            IntegerArray::new(b, m).map(Array::from_int8)
        }),
        LogicalType::Int16 => prim!(options(cells, is_null, to_int::<i16>)?, i16, |b, m| {
            IntegerArray::new(b, m).map(Array::from_int16)
        }),
        LogicalType::Int32 => prim!(options(cells, is_null, to_int::<i32>)?, i32, |b, m| {
            IntegerArray::new(b, m).map(Array::from_int32)
        }),
        LogicalType::Int64 => prim!(options(cells, is_null, to_int::<i64>)?, i64, |b, m| {
            IntegerArray::new(b, m).map(Array::from_int64)
        }),
        LogicalType::UInt8 => prim!(options(cells, is_null, to_int::<u8>)?, u8, |b, m| {
            IntegerArray::new(b, m).map(Array::from_uint8)
        }),
        LogicalType::UInt16 => prim!(options(cells, is_null, to_int::<u16>)?, u16, |b, m| {
            IntegerArray::new(b, m).map(Array::from_uint16)
        }),
        LogicalType::UInt32 => prim!(options(cells, is_null, to_int::<u32>)?, u32, |b, m| {
            IntegerArray::new(b, m).map(Array::from_uint32)
        }),
        LogicalType::UInt64 => prim!(options(cells, is_null, to_int::<u64>)?, u64, |b, m| {
            IntegerArray::new(b, m).map(Array::from_uint64)
        }),
        LogicalType::Float32 => prim!(options(cells, is_null, to_float::<f32>)?, f32, |b, m| {
            FloatArray::new(b, m).map(Array::from_float32)
        }),
        LogicalType::Float64 => prim!(options(cells, is_null, to_float::<f64>)?, f64, |b, m| {
            FloatArray::new(b, m).map(Array::from_float64)
        }),
        LogicalType::String | LogicalType::LargeString => {
            let opts = options(cells, is_null, |c| {
                c.as_str().ok_or_else(|| {
                    MinicolError::TypeError(format!("expected a string element, got {c:?}"))
                })
            })?;
            let valid: Vec<bool> = opts.iter().map(|v| v.is_some()).collect();
            let mut bytes: Vec<u8> = Vec::new();
            let mut ends: Vec<usize> = Vec::with_capacity(opts.len());
            for v in &opts {
                if let Some(s) = v {
                    bytes.extend_from_slice(s.as_bytes());
                }
                ends.push(bytes.len());
            }
            let data = Buffer::try_from_slice_in(&bytes, pool)?;
            let mask = cell_mask(valid, pool)?;
            if *dtype == LogicalType::String {
                let mut offsets: Vec<u32> = Vec::with_capacity(opts.len() + 1);
                offsets.push(0);
                offsets.extend(ends.iter().map(|&e| e as u32));
                Ok(Array::from_string32(StringArray::new(
                    Buffer::try_from_slice_in(&offsets, pool)?,
                    data,
                    mask,
                )?))
            } else {
                let mut offsets: Vec<u64> = Vec::with_capacity(opts.len() + 1);
                offsets.push(0);
                offsets.extend(ends.iter().map(|&e| e as u64));
                Ok(Array::from_string64(StringArray::new(
                    Buffer::try_from_slice_in(&offsets, pool)?,
                    data,
                    mask,
                )?))
            }
        }
        LogicalType::Binary => {
            // Strings encode down to their UTF-8 bytes here.
            let opts = options(cells, is_null, |c| {
                c.as_bytes()
                    .or_else(|| c.as_str().map(str::as_bytes))
                    .ok_or_else(|| {
                        MinicolError::TypeError(format!(
                            "expected a binary element, got {c:?}"
                        ))
                    })
            })?;
            let valid: Vec<bool> = opts.iter().map(|v| v.is_some()).collect();
            let mut bytes: Vec<u8> = Vec::new();
            let mut offsets: Vec<u32> = Vec::with_capacity(opts.len() + 1);
            offsets.push(0);
            for v in &opts {
                if let Some(b) = v {
                    bytes.extend_from_slice(b);
                }
                offsets.push(bytes.len() as u32);
            }
            Ok(Array::from_binary(BinaryArray::new(
                Buffer::try_from_slice_in(&offsets, pool)?,
                Buffer::try_from_slice_in(&bytes, pool)?,
                cell_mask(valid, pool)?,
            )?))
        }
        LogicalType::FixedSizeBinary(width) => {
            let opts = options(cells, is_null, |c| {
                let b = c.as_bytes().ok_or_else(|| {
                    MinicolError::TypeError(format!("expected a binary element, got {c:?}"))
                })?;
                if b.len() != *width {
                    return Err(MinicolError::InvalidArgument(format!(
                        "value has length {}, expected fixed width {}",
                        b.len(),
                        width
                    )));
                }
                Ok(b)
            })?;
            let valid: Vec<bool> = opts.iter().map(|v| v.is_some()).collect();
            let mut bytes: Vec<u8> = Vec::with_capacity(opts.len() * width);
            for v in &opts {
                match v {
                    Some(b) => bytes.extend_from_slice(b),
                    None => bytes.resize(bytes.len() + width, 0),
                }
            }
            Ok(Array::from_fixed_size_binary(FixedSizeBinaryArray::new(
                *width,
                Buffer::try_from_slice_in(&bytes, pool)?,
                cell_mask(valid, pool)?,
            )?))
        }
        LogicalType::Decimal128 { precision, scale } => {
            let opts = options(cells, is_null, |c| match c {
                Scalar::Decimal128 { value, scale: s } if s == scale => Ok(*value),
                Scalar::Decimal128 { scale: s, .. } => Err(MinicolError::TypeError(format!(
                    "decimal element at scale {s} cannot build a scale-{scale} array"
                ))),
                other => Err(MinicolError::TypeError(format!(
                    "expected a decimal element, got {other:?}"
                ))),
            })?;
            prim!(opts, i128, |b, m| {
                DecimalArray::new(b, *precision, *scale, m).map(Array::from_decimal)
            })
        }
        LogicalType::Date32 | LogicalType::Time32(_) => {
            let unit = dtype
                .time_unit()
                .unwrap_or_else(|| unreachable!("temporal types carry a unit"));
            let opts = options(cells, is_null, |c| {
                let scaled = temporal_i64(c, unit)?;
                i32::try_from(scaled).map_err(|_| MinicolError::Overflow {
                    value: scaled.to_string(),
                    target: "i32",
                })
            })?;
            prim!(opts, i32, |b, m| {
                DatetimeArray::new(b, dtype.clone(), m).map(Array::from_datetime_i32)
            })
        }
        LogicalType::Date64
        | LogicalType::Time64(_)
        | LogicalType::Timestamp(_, _)
        | LogicalType::Duration(_) => {
            let unit = dtype
                .time_unit()
                .unwrap_or_else(|| unreachable!("temporal types carry a unit"));
            let opts = options(cells, is_null, |c| temporal_i64(c, unit))?;
            prim!(opts, i64, |b, m| {
                DatetimeArray::new(b, dtype.clone(), m).map(Array::from_datetime_i64)
            })
        }
        LogicalType::Dictionary { value, .. } => {
            if **value != LogicalType::String {
                return Err(MinicolError::UnsupportedType(format!(
                    "dictionary encoding of opaque cells supports string values only, got {value}"
                )));
            }
            let opts = options(cells, is_null, |c| {
                c.as_str().ok_or_else(|| {
                    MinicolError::TypeError(format!("expected a string element, got {c:?}"))
                })
            })?;
            Ok(Array::from_dictionary(DictionaryArray::from_values(&opts)))
        }
        LogicalType::List(_) => Err(MinicolError::UnsupportedType(
            "nested list arrays cannot be built from the flat boundary".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_int_with_mask() {
        let flat = FlatColumn::new(
            FlatValues::Int64(vec![1, 2, 3]),
            Some(vec![false, true, false]),
        );
        let arr = from_flat(&flat, None).unwrap();
        assert_eq!(arr.dtype(), LogicalType::Int64);
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.null_count(), 1);
        assert!(arr.is_null(1).unwrap());
        assert_eq!(arr.value(0).unwrap().as_i64(), Some(1));
        assert_eq!(arr.value(2).unwrap().as_i64(), Some(3));
    }

    #[test]
    fn test_hint_takes_precedence() {
        let flat = FlatColumn::dense(FlatValues::Int64(vec![1, 2, 3]));
        let arr = from_flat(&flat, Some(&LogicalType::Int16)).unwrap();
        assert_eq!(arr.dtype(), LogicalType::Int16);
        assert_eq!(arr.value(2).unwrap(), Scalar::Int16(3));
    }

    #[test]
    fn test_hinted_overflow_rejected() {
        let flat = FlatColumn::dense(FlatValues::Int64(vec![1, 400]));
        let err = from_flat(&flat, Some(&LogicalType::Int8)).unwrap_err();
        assert!(matches!(err, MinicolError::Overflow { .. }));
    }

    #[test]
    fn test_hinted_fractional_float_rejected() {
        let flat = FlatColumn::dense(FlatValues::Float64(vec![1.0, 2.5]));
        let err = from_flat(&flat, Some(&LogicalType::Int64)).unwrap_err();
        assert!(matches!(err, MinicolError::LossyCast { .. }));
    }

    #[test]
    fn test_temporal_truncates_eagerly() {
        // Nanoseconds hinted down to millisecond timestamps.
        let flat = FlatColumn::dense(FlatValues::Datetime {
            values: vec![1_500_000_123_456_789, 999_999],
            unit: TimeUnit::Nanoseconds,
        });
        let hint = LogicalType::Timestamp(TimeUnit::Milliseconds, None);
        let arr = from_flat(&flat, Some(&hint)).unwrap();
        assert_eq!(arr.dtype(), hint);
        let inner = arr.dt64().unwrap();
        // Truncated at conversion time, not on read.
        assert_eq!(inner.data.as_slice(), &[1_500_000_123, 0]);
    }

    #[test]
    fn test_temporal_days_infer_date32() {
        let flat = FlatColumn::dense(FlatValues::Datetime {
            values: vec![0, 10_957],
            unit: TimeUnit::Days,
        });
        let arr = from_flat(&flat, None).unwrap();
        assert_eq!(arr.dtype(), LogicalType::Date32);
    }

    #[test]
    fn test_timedelta_infers_duration() {
        let flat = FlatColumn::dense(FlatValues::Timedelta {
            values: vec![5, 10],
            unit: TimeUnit::Seconds,
        });
        let arr = from_flat(&flat, None).unwrap();
        assert_eq!(arr.dtype(), LogicalType::Duration(TimeUnit::Seconds));
    }

    #[test]
    fn test_cells_infer_int64() {
        let flat = FlatColumn::dense(FlatValues::Cells(vec![
            Scalar::Int64(1),
            Scalar::Null,
            Scalar::Int64(3),
            Scalar::Null,
        ]));
        let arr = from_flat(&flat, None).unwrap();
        assert_eq!(arr.dtype(), LogicalType::Int64);
        assert_eq!(arr.len(), 4);
        assert_eq!(arr.null_count(), 2);
    }

    #[test]
    fn test_cells_numeric_mix_widens_to_float() {
        let flat = FlatColumn::dense(FlatValues::Cells(vec![
            Scalar::Float64(1.5),
            Scalar::Int64(1),
            Scalar::Null,
        ]));
        let arr = from_flat(&flat, None).unwrap();
        assert_eq!(arr.dtype(), LogicalType::Float64);
        assert_eq!(arr.value(1).unwrap(), Scalar::Float64(1.0));
    }

    #[test]
    fn test_cells_mixed_kinds_fail() {
        let flat = FlatColumn::dense(FlatValues::Cells(vec![
            Scalar::from("a"),
            Scalar::Int64(1),
            Scalar::Float64(2.0),
        ]));
        let err = from_flat(&flat, None).unwrap_err();
        assert!(matches!(err, MinicolError::TypeError(_)));
    }

    #[test]
    fn test_cells_string_binary_mix_becomes_binary() {
        let flat = FlatColumn::dense(FlatValues::Cells(vec![
            Scalar::Binary(b"foo".to_vec()),
            Scalar::from("ma\u{00f1}ana"),
            Scalar::Null,
        ]));
        let arr = from_flat(&flat, None).unwrap();
        assert_eq!(arr.dtype(), LogicalType::Binary);
        assert_eq!(
            arr.value(1).unwrap().as_bytes(),
            Some("ma\u{00f1}ana".as_bytes())
        );
    }

    #[test]
    fn test_cells_empty_and_all_null_infer_null() {
        let arr = from_flat(&FlatColumn::dense(FlatValues::Cells(vec![])), None).unwrap();
        assert_eq!(arr.dtype(), LogicalType::Null);
        assert_eq!(arr.len(), 0);

        let arr = from_flat(
            &FlatColumn::dense(FlatValues::Cells(vec![Scalar::Null, Scalar::Null])),
            None,
        )
        .unwrap();
        assert_eq!(arr.dtype(), LogicalType::Null);
        assert_eq!(arr.len(), 2);
        assert_eq!(arr.null_count(), 2);
    }

    #[test]
    fn test_categorical_builds_dictionary() {
        let flat = FlatColumn::dense(FlatValues::Categorical {
            codes: vec![0, 1, 0, -1],
            categories: Box::new(FlatColumn::dense(FlatValues::Cells(vec![
                Scalar::from("x"),
                Scalar::from("y"),
            ]))),
        });
        let arr = from_flat(&flat, None).unwrap();
        // Must never collapse to a plain array.
        assert!(matches!(arr, Array::Dictionary(_)));
        assert_eq!(arr.null_count(), 1);
        assert_eq!(arr.value(0).unwrap().as_str(), Some("x"));
        assert_eq!(arr.value(1).unwrap().as_str(), Some("y"));
    }

    #[test]
    fn test_mask_length_mismatch() {
        let flat = FlatColumn::new(FlatValues::Int32(vec![1, 2]), Some(vec![false]));
        let err = from_flat(&flat, None).unwrap_err();
        assert!(matches!(err, MinicolError::InvalidArgument(_)));
    }

    #[test]
    fn test_pool_failure_propagates() {
        use crate::structs::pool::{CappedPool, SystemPool};
        let pool: Arc<dyn MemoryPool> =
            Arc::new(CappedPool::new(Arc::new(SystemPool::new()), 64));
        let flat = FlatColumn::dense(FlatValues::Int64(vec![0; 1024]));
        let err = from_flat_in(&flat, None, &pool).unwrap_err();
        assert!(matches!(err, MinicolError::OutOfMemory { .. }));
    }

    #[test]
    fn test_cells_hinted_dictionary() {
        let flat = FlatColumn::dense(FlatValues::Cells(vec![
            Scalar::from("a"),
            Scalar::from("b"),
            Scalar::from("a"),
        ]));
        let hint = LogicalType::Dictionary {
            index: crate::enums::logical_type::DictionaryIndexType::Int32,
            value: Box::new(LogicalType::String),
        };
        let arr = from_flat(&flat, Some(&hint)).unwrap();
        assert!(matches!(arr, Array::Dictionary(_)));
        let dict = arr.dict().unwrap();
        assert_eq!(dict.values().len(), 2);
    }
}
