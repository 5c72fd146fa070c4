//! # **Print Module** - *Pretty Printing*
//!
//! Contains the `Print` trait, which wraps `Display` to provide
//! `myobj.print()` for any object that implements it.

use std::fmt::Display;

pub(crate) const MAX_PREVIEW: usize = 50;

/// # Print
///
/// Provides a more convenient way to activate `Display`
/// for other types such as arrays via `myarr.print()`,
/// avoiding the need to write `println!("{}", myarr);`
pub trait Print {
    #[inline]
    fn print(&self)
    where
        Self: Display,
    {
        println!("{}", self);
    }
}

impl<T: Display> Print for T where T: Display {}
