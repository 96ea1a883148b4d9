//! codesheet-core - UI-agnostic document model for codesheet.
//!
//! A codesheet document is one source file whose cells and tables are
//! literal sub-expressions. This crate locates the cell collection inside
//! the parsed tree, performs structural edits (cells, object/array
//! contents, table columns and rows), and classifies computed values into
//! display/edit strategies. Parsing and printing live in
//! `codesheet-syntax`; evaluation, persistence, and rendering belong to the
//! surrounding application.

pub mod cells;
pub mod document;
pub mod edit;
pub mod error;
pub mod triage;

pub use cells::{cell_map, classify_cell, formula_text, CellLocation, CellMap, CellView, Evaluator};
pub use document::{CellHandle, Document, CELLS_BINDING, TABLE_FLAG_KEY, VALUE_KEY};
pub use error::{CoreError, Result};
pub use triage::{triage, Strategy};

pub use codesheet_syntax::{LineSep, NodeId, ParseError, PrintOptions, SyntaxKind, Tree};
