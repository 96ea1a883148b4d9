//! Source tree API.
//!
//! - [`Tree`] - arena-backed document tree; parse, navigate, mutate, print
//! - [`NodeId`], [`Span`] - stable node addresses and text ranges
//! - [`NodeKind`], [`SyntaxKind`] - node payloads and bare kind tags
//! - [`PrintOptions`], [`LineSep`] - printing configuration

mod parser;
mod printer;
mod token;
mod tree;

pub use printer::{LineSep, PrintOptions};
pub use tree::{
    ArrowBody, BinaryOp, DeclKind, Lit, NodeId, NodeKind, PropertyKind, Span, SyntaxKind, Tree,
    UnaryOp,
};
