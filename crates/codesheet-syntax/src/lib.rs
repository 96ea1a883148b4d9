//! codesheet-syntax - lossless source tree for codesheet documents.
//!
//! Parses the document language into a mutable arena tree and prints it
//! back, preserving the formatting of everything that was not edited.

pub mod error;
pub mod syntax;

pub use error::ParseError;
pub use syntax::{
    ArrowBody, BinaryOp, DeclKind, LineSep, Lit, NodeId, NodeKind, PrintOptions, PropertyKind,
    Span, SyntaxKind, Tree, UnaryOp,
};

/// Whether `text` can be written as a bare identifier (object key synthesis,
/// generated column headings).
pub fn is_identifier_text(text: &str) -> bool {
    static IDENT_RE: std::sync::LazyLock<regex::Regex> = std::sync::LazyLock::new(|| {
        regex::Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap()
    });
    IDENT_RE.is_match(text)
}
