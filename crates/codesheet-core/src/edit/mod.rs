//! Structural editors over the document tree.
//!
//! - [`array`], [`object`] - primitive, format-agnostic operations on
//!   array-literal and object-literal nodes
//! - [`table`] - the table sub-model (columns, rows, defaults), built
//!   entirely from the generic editors

pub mod array;
pub mod object;
pub mod table;
