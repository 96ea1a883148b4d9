//! Error types for the codesheet core.

use codesheet_syntax::{NodeId, ParseError, Tree};
use thiserror::Error;

/// Errors that can occur while locating or editing a document.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Syntax(#[from] ParseError),

    #[error("document has no cell collection binding")]
    MissingCellCollection,

    #[error("no cell named '{0}'")]
    CellNotFound(String),

    #[error("no column with heading '{0}'")]
    ColumnNotFound(String),

    #[error("no property with key '{0}'")]
    KeyNotFound(String),

    #[error("index {index} out of bounds (length {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("duplicate key '{0}'")]
    DuplicateKey(String),
}

impl CoreError {
    pub(crate) fn mismatch(expected: &'static str, tree: &Tree, id: NodeId) -> CoreError {
        CoreError::TypeMismatch {
            expected,
            found: tree.syntax_kind(id).name(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
