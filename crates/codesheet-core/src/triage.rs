//! Display/edit strategy triage.
//!
//! One source expression can evaluate to wildly different shapes at run
//! time - a call may produce a table, an array, a plain object, or a
//! scalar - so the strategy decision looks at both the syntactic node kind
//! and the computed value. Pure and side-effect free; safe to call from any
//! number of contexts at once.

use codesheet_syntax::SyntaxKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// How a cell should be rendered and edited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    TableRw,
    TableRo,
    ArrayRo,
    ObjectRo,
    Value,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::TableRw => "table_rw",
            Strategy::TableRo => "table_ro",
            Strategy::ArrayRo => "array_ro",
            Strategy::ObjectRo => "object_ro",
            Strategy::Value => "value",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prototype facet of a rule: which built-in prototype chain the value must
/// belong to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Proto {
    Array,
}

fn proto_matches(proto: Proto, value: &Value) -> bool {
    match proto {
        Proto::Array => value.is_array(),
    }
}

/// `typeof` facet with source-language semantics: arrays and null are
/// objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TypeOf {
    Object,
    Number,
    String,
    Boolean,
}

fn type_of(value: &Value) -> TypeOf {
    match value {
        Value::Null | Value::Array(_) | Value::Object(_) => TypeOf::Object,
        Value::Number(_) => TypeOf::Number,
        Value::String(_) => TypeOf::String,
        Value::Bool(_) => TypeOf::Boolean,
    }
}

/// One triage rule. `None` facets are wildcards; an unset table facet means
/// "don't care".
struct Rule {
    kind: Option<SyntaxKind>,
    proto: Option<Proto>,
    type_of: Option<TypeOf>,
    is_table: Option<bool>,
    strategy: Strategy,
}

const RULES: &[Rule] = &[
    Rule {
        kind: Some(SyntaxKind::ObjectExpr),
        proto: None,
        type_of: None,
        is_table: Some(true),
        strategy: Strategy::TableRw,
    },
    Rule {
        kind: None,
        proto: Some(Proto::Array),
        type_of: None,
        is_table: Some(true),
        strategy: Strategy::TableRo,
    },
    Rule {
        kind: Some(SyntaxKind::ArrayExpr),
        proto: None,
        type_of: None,
        is_table: None,
        strategy: Strategy::ArrayRo,
    },
    Rule {
        kind: Some(SyntaxKind::ObjectExpr),
        proto: None,
        type_of: None,
        is_table: None,
        strategy: Strategy::ObjectRo,
    },
    Rule {
        kind: Some(SyntaxKind::CallExpr),
        proto: Some(Proto::Array),
        type_of: None,
        is_table: None,
        strategy: Strategy::ArrayRo,
    },
    Rule {
        kind: Some(SyntaxKind::CallExpr),
        proto: None,
        type_of: Some(TypeOf::Object),
        is_table: None,
        strategy: Strategy::ObjectRo,
    },
    Rule {
        kind: Some(SyntaxKind::MemberExpr),
        proto: Some(Proto::Array),
        type_of: None,
        is_table: None,
        strategy: Strategy::ArrayRo,
    },
    Rule {
        kind: Some(SyntaxKind::MemberExpr),
        proto: None,
        type_of: Some(TypeOf::Object),
        is_table: None,
        strategy: Strategy::ObjectRo,
    },
    Rule {
        kind: Some(SyntaxKind::NewExpr),
        proto: None,
        type_of: Some(TypeOf::Object),
        is_table: None,
        strategy: Strategy::ObjectRo,
    },
];

/// Pick a strategy for (node kind, computed value, table flag). First
/// matching rule wins; anything unmatched is a plain scalar.
pub fn triage(kind: SyntaxKind, value: &Value, is_table: bool) -> Strategy {
    for rule in RULES {
        let kind_ok = rule.kind.is_none_or(|k| k == kind);
        let proto_ok = rule.proto.is_none_or(|p| proto_matches(p, value));
        let type_ok = rule.type_of.is_none_or(|t| t == type_of(value));
        let table_ok = rule.is_table.is_none_or(|t| t == is_table);
        if kind_ok && proto_ok && type_ok && table_ok {
            return rule.strategy;
        }
    }
    Strategy::Value
}
