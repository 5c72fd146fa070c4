//! # Tensor Module - *Typed, Strided, Multi-Dimensional Buffer View*
//!
//! Dense numeric N-dimensional view over a single byte buffer, with
//! explicit per-dimension byte strides. Row-major strides are derived from
//! the shape by default; explicit strides admit transposed or broadcast
//! layouts over the same storage.
//!
//! No null/validity concept exists here - tensors are purely dense numeric
//! data, independent of the nullable array machinery.

use std::fmt;

use crate::enums::error::MinicolError;
use crate::enums::logical_type::LogicalType;
use crate::structs::buffer::Buffer;
use crate::traits::type_unions::Numeric;

/// # Tensor
///
/// Typed, strided, multi-dimensional numeric buffer view.
///
/// ### Properties
/// - `dtype`: element logical type (primitive numeric kinds only).
/// - `shape`: ordered dimension sizes; `size` is their product.
/// - `strides`: byte stride per dimension; `len(shape) == len(strides)`.
/// - `data`: backing byte buffer, shared zero-copy like any other buffer.
/// - `writable`: mutability flag carried through interchange; immutable by
///   default.
///
/// ### Equality
/// Element-wise over the logical index space, independent of whether either
/// tensor is contiguous. Float elements compare bitwise, so NaN equals NaN
/// under this convention.
#[derive(Clone, Debug)]
pub struct Tensor {
    dtype: LogicalType,
    shape: Vec<usize>,
    strides: Vec<usize>,
    data: Buffer<u8>,
    writable: bool,
}

/// Canonical row-major byte strides for `shape` and element width.
pub fn row_major_strides(shape: &[usize], width: usize) -> Vec<usize> {
    let mut strides = vec![0; shape.len()];
    let mut acc = width;
    for (i, dim) in shape.iter().enumerate().rev() {
        strides[i] = acc;
        acc *= dim.max(&1);
    }
    strides
}

impl Tensor {
    /// Constructs a Tensor over a flat buffer with derived row-major
    /// strides.
    ///
    /// Fails with `UnsupportedType` for non-numeric element types and
    /// `InvalidArgument` when the buffer does not hold exactly
    /// `product(shape)` elements.
    pub fn from_flat(
        data: Buffer<u8>,
        shape: Vec<usize>,
        dtype: LogicalType,
    ) -> Result<Self, MinicolError> {
        let width = element_width(&dtype)?;
        let size: usize = shape.iter().product();
        if data.len() != size * width {
            return Err(MinicolError::InvalidArgument(format!(
                "buffer holds {} bytes, shape {:?} needs {}",
                data.len(),
                shape,
                size * width
            )));
        }
        let strides = row_major_strides(&shape, width);
        Ok(Self {
            dtype,
            shape,
            strides,
            data,
            writable: false,
        })
    }

    /// Constructs a Tensor with explicit byte strides.
    ///
    /// Every addressable element must land inside the buffer; the furthest
    /// reachable byte is checked up front.
    pub fn with_strides(
        data: Buffer<u8>,
        shape: Vec<usize>,
        strides: Vec<usize>,
        dtype: LogicalType,
    ) -> Result<Self, MinicolError> {
        let width = element_width(&dtype)?;
        if shape.len() != strides.len() {
            return Err(MinicolError::InvalidArgument(format!(
                "shape rank {} does not match stride rank {}",
                shape.len(),
                strides.len()
            )));
        }
        let size: usize = shape.iter().product();
        if size > 0 {
            let furthest: usize = shape
                .iter()
                .zip(&strides)
                .map(|(dim, stride)| (dim - 1) * stride)
                .sum();
            if furthest + width > data.len() {
                return Err(MinicolError::InvalidArgument(format!(
                    "strides address byte {} beyond buffer of {} bytes",
                    furthest + width,
                    data.len()
                )));
            }
        }
        Ok(Self {
            dtype,
            shape,
            strides,
            data,
            writable: false,
        })
    }

    /// Marks the tensor writable. Interchange consumers treat the flag as
    /// permission to mutate the backing storage.
    pub fn as_writable(mut self) -> Self {
        self.writable = true;
        self
    }

    /// Element logical type.
    #[inline]
    pub fn dtype(&self) -> &LogicalType {
        &self.dtype
    }

    /// Number of dimensions.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements (product of the shape).
    #[inline]
    pub fn size(&self) -> usize {
        self.shape.iter().product()
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Byte strides per dimension.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    #[inline]
    pub fn data(&self) -> &Buffer<u8> {
        &self.data
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// True iff the strides equal the canonical row-major strides for the
    /// shape.
    pub fn is_contiguous(&self) -> bool {
        let width = self
            .dtype
            .primitive_width()
            .unwrap_or_else(|| unreachable!("constructors admit numeric dtypes only"));
        self.strides == row_major_strides(&self.shape, width)
    }

    /// Byte offset of the element at `index`, bounds-checked per dimension.
    fn offset_of(&self, index: &[usize]) -> Result<usize, MinicolError> {
        if index.len() != self.ndim() {
            return Err(MinicolError::InvalidArgument(format!(
                "index rank {} does not match tensor rank {}",
                index.len(),
                self.ndim()
            )));
        }
        let mut offset = 0;
        for (d, (&i, &dim)) in index.iter().zip(&self.shape).enumerate() {
            if i >= dim {
                return Err(MinicolError::IndexOutOfRange {
                    index: i,
                    length: dim,
                });
            }
            offset += i * self.strides[d];
        }
        Ok(offset)
    }

    /// Typed element access at the given multi-dimensional index.
    ///
    /// Fails with `TypeError` when `T` does not match the element width.
    pub fn value<T: Numeric>(&self, index: &[usize]) -> Result<T, MinicolError> {
        let width = element_width(&self.dtype)?;
        if std::mem::size_of::<T>() != width {
            return Err(MinicolError::TypeError(format!(
                "element width mismatch: {} holds {} bytes, requested {}",
                self.dtype,
                width,
                std::mem::size_of::<T>()
            )));
        }
        let offset = self.offset_of(index)?;
        // Strided views may be unaligned for T.
        let ptr = unsafe { self.data.as_slice().as_ptr().add(offset) as *const T };
        Ok(unsafe { std::ptr::read_unaligned(ptr) })
    }

    /// Writes the element at `index`. Fails with `InvalidArgument` when the
    /// tensor is not writable.
    pub fn set_value<T: Numeric>(&mut self, index: &[usize], v: T) -> Result<(), MinicolError> {
        if !self.writable {
            return Err(MinicolError::InvalidArgument(
                "tensor is not writable".to_string(),
            ));
        }
        let width = element_width(&self.dtype)?;
        if std::mem::size_of::<T>() != width {
            return Err(MinicolError::TypeError(format!(
                "element width mismatch: {} holds {} bytes, requested {}",
                self.dtype,
                width,
                std::mem::size_of::<T>()
            )));
        }
        let offset = self.offset_of(index)?;
        let bytes = self.data.make_mut();
        let ptr = unsafe { bytes.as_mut_ptr().add(offset) as *mut T };
        unsafe { std::ptr::write_unaligned(ptr, v) };
        Ok(())
    }

    /// Visits every logical index in row-major order, yielding the byte
    /// offset of each element.
    fn for_each_offset(&self, mut visit: impl FnMut(usize) -> bool) -> bool {
        let size = self.size();
        if size == 0 {
            return true;
        }
        let ndim = self.ndim();
        let mut index = vec![0usize; ndim];
        for _ in 0..size {
            let offset: usize = index
                .iter()
                .zip(&self.strides)
                .map(|(&i, &s)| i * s)
                .sum();
            if !visit(offset) {
                return false;
            }
            // Odometer increment, last dimension fastest.
            for d in (0..ndim).rev() {
                index[d] += 1;
                if index[d] < self.shape[d] {
                    break;
                }
                index[d] = 0;
            }
        }
        true
    }
}

fn element_width(dtype: &LogicalType) -> Result<usize, MinicolError> {
    if !dtype.is_primitive_numeric() {
        return Err(MinicolError::UnsupportedType(format!(
            "tensor elements must be primitive numeric, got {dtype}"
        )));
    }
    dtype.primitive_width().ok_or_else(|| {
        MinicolError::UnsupportedType(format!("{dtype} has no fixed element width"))
    })
}

impl PartialEq for Tensor {
    /// Element-wise comparison over the logical index space, independent of
    /// contiguity. Bitwise per element, so float NaN equals NaN.
    fn eq(&self, other: &Self) -> bool {
        if self.dtype != other.dtype || self.shape != other.shape {
            return false;
        }
        let width = match self.dtype.primitive_width() {
            Some(w) => w,
            None => return false,
        };
        let a = self.data.as_slice();
        let b = other.data.as_slice();
        let mut offsets_b = Vec::with_capacity(self.size());
        other.for_each_offset(|o| {
            offsets_b.push(o);
            true
        });
        let mut i = 0;
        self.for_each_offset(|oa| {
            let ob = offsets_b[i];
            i += 1;
            a[oa..oa + width] == b[ob..ob + width]
        })
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tensor {:?} ({}, {} elements{}{})",
            self.shape,
            self.dtype,
            self.size(),
            if self.is_contiguous() {
                ", contiguous"
            } else {
                ", strided"
            },
            if self.writable { ", writable" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_i64(values: &[i64]) -> Buffer<u8> {
        Buffer::from_slice(values).into_bytes()
    }

    #[test]
    fn test_from_flat_derives_row_major() {
        let t = Tensor::from_flat(flat_i64(&[1, 2, 3, 4, 5, 6]), vec![2, 3], LogicalType::Int64)
            .unwrap();
        assert_eq!(t.ndim(), 2);
        assert_eq!(t.size(), 6);
        assert_eq!(t.strides(), &[24, 8]);
        assert!(t.is_contiguous());
        assert_eq!(t.value::<i64>(&[0, 0]).unwrap(), 1);
        assert_eq!(t.value::<i64>(&[1, 2]).unwrap(), 6);
    }

    #[test]
    fn test_from_flat_validates_size() {
        let err = Tensor::from_flat(flat_i64(&[1, 2, 3]), vec![2, 3], LogicalType::Int64)
            .unwrap_err();
        assert!(matches!(err, MinicolError::InvalidArgument(_)));
    }

    #[test]
    fn test_non_numeric_rejected() {
        let err = Tensor::from_flat(Buffer::empty(), vec![0], LogicalType::String).unwrap_err();
        assert!(matches!(err, MinicolError::UnsupportedType(_)));
    }

    #[test]
    fn test_explicit_strides_transpose() {
        // 2x3 row-major data viewed as its 3x2 transpose.
        let data = flat_i64(&[1, 2, 3, 4, 5, 6]);
        let t = Tensor::with_strides(data, vec![3, 2], vec![8, 24], LogicalType::Int64).unwrap();
        assert!(!t.is_contiguous());
        assert_eq!(t.value::<i64>(&[0, 0]).unwrap(), 1);
        assert_eq!(t.value::<i64>(&[0, 1]).unwrap(), 4);
        assert_eq!(t.value::<i64>(&[2, 1]).unwrap(), 6);
    }

    #[test]
    fn test_with_strides_bounds_checked() {
        let err = Tensor::with_strides(
            flat_i64(&[1, 2, 3]),
            vec![3],
            vec![16],
            LogicalType::Int64,
        )
        .unwrap_err();
        assert!(matches!(err, MinicolError::InvalidArgument(_)));
    }

    #[test]
    fn test_equality_across_layouts() {
        // The same logical 2x2 matrix, one contiguous, one transposed view.
        let a = Tensor::from_flat(flat_i64(&[1, 2, 3, 4]), vec![2, 2], LogicalType::Int64)
            .unwrap();
        let b = Tensor::with_strides(
            flat_i64(&[1, 3, 2, 4]),
            vec![2, 2],
            vec![8, 16],
            LogicalType::Int64,
        )
        .unwrap();
        assert!(!b.is_contiguous());
        assert_eq!(a, b);

        let c = Tensor::from_flat(flat_i64(&[1, 2, 3, 5]), vec![2, 2], LogicalType::Int64)
            .unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_index_errors() {
        let t = Tensor::from_flat(flat_i64(&[1, 2, 3, 4]), vec![2, 2], LogicalType::Int64)
            .unwrap();
        assert!(matches!(
            t.value::<i64>(&[2, 0]).unwrap_err(),
            MinicolError::IndexOutOfRange { .. }
        ));
        assert!(matches!(
            t.value::<i64>(&[0]).unwrap_err(),
            MinicolError::InvalidArgument(_)
        ));
        assert!(matches!(
            t.value::<i32>(&[0, 0]).unwrap_err(),
            MinicolError::TypeError(_)
        ));
    }

    #[test]
    fn test_writable_flag() {
        let t = Tensor::from_flat(flat_i64(&[1, 2]), vec![2], LogicalType::Int64).unwrap();
        assert!(!t.is_writable());
        let mut t = t.as_writable();
        t.set_value::<i64>(&[1], 20).unwrap();
        assert_eq!(t.value::<i64>(&[1]).unwrap(), 20);

        let mut frozen =
            Tensor::from_flat(flat_i64(&[1, 2]), vec![2], LogicalType::Int64).unwrap();
        assert!(frozen.set_value::<i64>(&[0], 9).is_err());
    }

    #[test]
    fn test_float_nan_bitwise_equal() {
        let nan = Buffer::from_slice(&[f64::NAN]).into_bytes();
        let a = Tensor::from_flat(nan.clone(), vec![1], LogicalType::Float64).unwrap();
        let b = Tensor::from_flat(nan, vec![1], LogicalType::Float64).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_size() {
        let t = Tensor::from_flat(Buffer::empty(), vec![0, 3], LogicalType::Float32).unwrap();
        assert_eq!(t.size(), 0);
        assert!(t.is_contiguous());
        let other =
            Tensor::from_flat(Buffer::empty(), vec![0, 3], LogicalType::Float32).unwrap();
        assert_eq!(t, other);
    }
}
