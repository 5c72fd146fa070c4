//! # **Table Module** - *Standard Table ("RecordBatch") for Columnar Data*
//!
//! Columnar data container pairing a fixed-length set of rows with named,
//! typed `FieldArray` columns.
//!
//! Guarantees column length consistency, supports zero-copy row slicing,
//! and is the shape the out-of-scope I/O collaborator consumes: a schema
//! followed by a sequence of record batches.

use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::enums::error::MinicolError;
use crate::structs::field::Field;
use crate::structs::field_array::FieldArray;
use crate::traits::print::MAX_PREVIEW;

// Global counter for unnamed table instances
static UNNAMED_COUNTER: AtomicUsize = AtomicUsize::new(1);

/// # Table
///
/// ## Description
/// - Standard columnar table with named columns (`FieldArray`), a fixed
///   number of rows, and an optional logical table name.
/// - All columns are required to be equal length.
/// - Table instances are lightweight to clone: columns share their buffers.
/// - For mutation, construct a new table or replace individual columns.
#[derive(Default, PartialEq, Clone, Debug)]
pub struct Table {
    /// FieldArrays representing named columns.
    pub cols: Vec<FieldArray>,
    /// Number of rows in the table.
    pub n_rows: usize,
    /// Table name
    pub name: String,
}

impl Table {
    /// Constructs a new Table from columns, validating equal lengths.
    ///
    /// An empty or whitespace name generates a unique `UnnamedTableN`.
    pub fn new(name: impl Into<String>, cols: Vec<FieldArray>) -> Result<Self, MinicolError> {
        let n_rows = cols.first().map(|col| col.len()).unwrap_or(0);
        for (i, col) in cols.iter().enumerate() {
            if col.len() != n_rows {
                return Err(MinicolError::InvalidArgument(format!(
                    "column {} (\"{}\") has {} rows, expected {}",
                    i,
                    col.name(),
                    col.len(),
                    n_rows
                )));
            }
        }
        let mut name = name.into();
        if name.trim().is_empty() {
            let id = UNNAMED_COUNTER.fetch_add(1, Ordering::Relaxed);
            name = format!("UnnamedTable{}", id);
        }
        Ok(Self { cols, n_rows, name })
    }

    /// Constructs a new, empty Table with a globally unique name.
    pub fn new_empty() -> Self {
        let id = UNNAMED_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self {
            cols: Vec::new(),
            n_rows: 0,
            name: format!("UnnamedTable{}", id),
        }
    }

    /// Adds a column, validating the row count against existing columns.
    pub fn add_col(&mut self, field_array: FieldArray) -> Result<(), MinicolError> {
        if self.cols.is_empty() {
            self.n_rows = field_array.len();
        } else if self.n_rows != field_array.len() {
            return Err(MinicolError::InvalidArgument(format!(
                "column \"{}\" has {} rows, expected {}",
                field_array.name(),
                field_array.len(),
                self.n_rows
            )));
        }
        self.cols.push(field_array);
        Ok(())
    }

    /// Builds a schema via the underlying field arrays.
    pub fn schema(&self) -> Vec<Arc<Field>> {
        self.cols.iter().map(|fa| fa.field.clone()).collect()
    }

    /// Returns the number of columns.
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.cols.len()
    }

    /// Returns the number of rows.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Returns true if the table is empty (no columns or no rows).
    pub fn is_empty(&self) -> bool {
        self.n_cols() == 0 || self.n_rows == 0
    }

    /// Looks up a column by name.
    pub fn col(&self, name: &str) -> Option<&FieldArray> {
        self.cols.iter().find(|fa| fa.name() == name)
    }

    /// Returns the column at `idx`, or None beyond the column count.
    pub fn col_at(&self, idx: usize) -> Option<&FieldArray> {
        self.cols.get(idx)
    }

    /// Zero-copy row window `[offset, offset + len)` across every column.
    pub fn slice(&self, offset: usize, len: Option<usize>) -> Result<Table, MinicolError> {
        let cols = self
            .cols
            .iter()
            .map(|fa| fa.slice(offset, len))
            .collect::<Result<Vec<_>, _>>()?;
        let n_rows = cols.first().map(|c| c.len()).unwrap_or(0);
        Ok(Table {
            cols,
            n_rows,
            name: self.name.clone(),
        })
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Table \"{}\" [{} rows x {} cols]",
            self.name,
            self.n_rows,
            self.n_cols()
        )?;
        for fa in &self.cols {
            writeln!(f, "  {}", fa.field)?;
        }
        for row in 0..usize::min(self.n_rows, MAX_PREVIEW) {
            write!(f, "  |")?;
            for fa in &self.cols {
                match fa.array.value(row) {
                    Ok(v) => write!(f, " {:?} |", v)?,
                    Err(_) => write!(f, " ? |")?,
                }
            }
            writeln!(f)?;
        }
        if self.n_rows > MAX_PREVIEW {
            writeln!(f, "  … ({} rows total)", self.n_rows)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Array, IntegerArray, StringArray};

    fn demo_table() -> Table {
        let ids = FieldArray::from_inner(
            "ids",
            Array::from_int64(IntegerArray::from_slice(&[1, 2, 3])),
        );
        let names = FieldArray::from_inner(
            "names",
            Array::from_string32(StringArray::from_options(&[
                Some("a"),
                None,
                Some("c"),
            ])),
        );
        Table::new("demo", vec![ids, names]).unwrap()
    }

    #[test]
    fn test_new_and_lookup() {
        let t = demo_table();
        assert_eq!(t.n_rows(), 3);
        assert_eq!(t.n_cols(), 2);
        assert!(t.col("ids").is_some());
        assert!(t.col("missing").is_none());
        assert_eq!(t.schema().len(), 2);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let a = FieldArray::from_inner(
            "a",
            Array::from_int64(IntegerArray::from_slice(&[1, 2, 3])),
        );
        let b = FieldArray::from_inner("b", Array::from_int64(IntegerArray::from_slice(&[1])));
        let err = Table::new("bad", vec![a, b]).unwrap_err();
        assert!(matches!(err, MinicolError::InvalidArgument(_)));
    }

    #[test]
    fn test_add_col_validates() {
        let mut t = demo_table();
        let short = FieldArray::from_inner(
            "short",
            Array::from_int64(IntegerArray::from_slice(&[1])),
        );
        assert!(t.add_col(short).is_err());
    }

    #[test]
    fn test_slice_rows() {
        let t = demo_table();
        let s = t.slice(1, Some(2)).unwrap();
        assert_eq!(s.n_rows(), 2);
        assert_eq!(s.n_cols(), 2);
        assert_eq!(
            s.col("ids").unwrap().array.value(0).unwrap().as_i64(),
            Some(2)
        );
        assert!(s.col("names").unwrap().array.value(0).unwrap().is_null());
    }

    #[test]
    fn test_unnamed_autonaming() {
        let t1 = Table::new("", vec![]).unwrap();
        let t2 = Table::new(" ", vec![]).unwrap();
        assert!(t1.name.starts_with("UnnamedTable"));
        assert_ne!(t1.name, t2.name);
    }
}
