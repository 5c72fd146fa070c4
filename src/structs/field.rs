//! # Field Module - *Column Metadata Tagging*
//!
//! Defines column-level schema metadata for `Minicol`.
//!
//! A `Field` captures a column's name, logical data type, nullability, and
//! optional lightweight metadata.
//!
//! This module contains only the schema description - it does not hold any
//! row data. Pair with `FieldArray` to bind a schema to actual values.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::Array;
use crate::enums::logical_type::LogicalType;

/// Global counter for unnamed fields
static UNNAMED_FIELD_COUNTER: AtomicUsize = AtomicUsize::new(1);

/// # Field
///
/// ## Description
/// `Field` struct supporting:
/// - Array metadata such as type, name, nullability, etc.
/// - Light metadata, e.g. a few key-value pairs.
///
/// ### Tips:
/// - `Field` is *cloned often*, so it is best to keep any metadata
///   lightweight to avoid performance penalties. `Table` wraps it in Arc.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub dtype: LogicalType,
    pub nullable: bool,
    pub metadata: BTreeMap<String, String>,
}

impl Field {
    /// Constructs a new `Field`. If the provided name is empty or only
    /// whitespace, a globally unique name like `UnnamedField1` will
    /// generate.
    pub fn new<T: Into<String>>(
        name: T,
        dtype: LogicalType,
        nullable: bool,
        metadata: Option<BTreeMap<String, String>>,
    ) -> Self {
        let mut name = name.into();
        if name.trim().is_empty() {
            let id = UNNAMED_FIELD_COUNTER.fetch_add(1, Ordering::Relaxed);
            name = format!("UnnamedField{}", id);
        }

        Field {
            name,
            dtype,
            nullable,
            metadata: metadata.unwrap_or_default(),
        }
    }

    /// Constructs a new `Field` from an `Array` enum instance.
    /// Derives the dtype and nullability directly from the inner array.
    pub fn from_array(
        name: impl Into<String>,
        array: &Array,
        metadata: Option<BTreeMap<String, String>>,
    ) -> Self {
        Field::new(name, array.dtype(), array.null_mask().is_some(), metadata)
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Field \"{}\": {}{}",
            self.name,
            self.dtype,
            if self.nullable { " (nullable)" } else { "" }
        )?;

        if !self.metadata.is_empty() {
            write!(f, " [metadata: ")?;
            for (i, (k, v)) in self.metadata.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}=\"{}\"", k, v)?;
            }
            write!(f, "]")?;
        }

        Ok(())
    }
}
