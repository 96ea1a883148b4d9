//! Format-preserving printer.
//!
//! Three strategies, tried in order per node:
//!
//! 1. a clean node with a span prints its text slice verbatim;
//! 2. a dirty node whose child list is structurally intact patches: the
//!    original slice is emitted with each child's slot range replaced by
//!    that child's own printed text, so all surrounding trivia survives;
//! 3. everything else (reshaped containers, synthesized nodes) is laid out
//!    canonically.
//!
//! Only synthesized layout uses the configured line terminator; sliced and
//! patched regions keep whatever the source had.

use crate::syntax::tree::{
    ArrowBody, BinaryOp, Lit, NodeId, NodeKind, PropertyKind, SyntaxKind, Tree,
};

/// Line terminator for synthesized line breaks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineSep {
    #[default]
    Lf,
    CrLf,
}

impl LineSep {
    pub fn as_str(self) -> &'static str {
        match self {
            LineSep::Lf => "\n",
            LineSep::CrLf => "\r\n",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PrintOptions {
    pub line_separator: LineSep,
}

const INDENT: &str = "    ";

impl Tree {
    /// Print the whole document. Deterministic; never fails for a tree this
    /// crate produced.
    pub fn print(&self, options: &PrintOptions) -> String {
        let mut out = String::with_capacity(self.text.len());
        let printer = Printer {
            tree: self,
            options,
        };
        printer.print_node(self.root, 0, &mut out);
        out
    }
}

struct Printer<'t> {
    tree: &'t Tree,
    options: &'t PrintOptions,
}

impl<'t> Printer<'t> {
    fn sep(&self) -> &'static str {
        self.options.line_separator.as_str()
    }

    fn print_node(&self, id: NodeId, indent: usize, out: &mut String) {
        let data = self.tree.node(id);
        if let Some(span) = data.span {
            if !data.dirty {
                out.push_str(&self.tree.text[span.start..span.end]);
                return;
            }
            if !data.reshaped && self.try_patch(id, indent, out) {
                return;
            }
        }
        self.synthesize(id, indent, out);
    }

    /// Patch a dirty node's original slice around its children's slots.
    /// Returns false (emitting nothing) when the slots no longer describe
    /// the slice, in which case the caller synthesizes.
    fn try_patch(&self, id: NodeId, indent: usize, out: &mut String) -> bool {
        let span = match self.tree.node(id).span {
            Some(span) => span,
            None => return false,
        };
        let children = self.tree.children(id);
        let mut cursor = span.start;
        let mut patched = String::new();
        for child in &children {
            let slot = match self.tree.node(*child).slot {
                Some(slot) => slot,
                None => return false,
            };
            if slot.start < cursor || slot.end > span.end {
                return false;
            }
            patched.push_str(&self.tree.text[cursor..slot.start]);
            self.print_node(*child, indent, &mut patched);
            cursor = slot.end;
        }
        patched.push_str(&self.tree.text[cursor..span.end]);
        out.push_str(&patched);
        true
    }

    fn synthesize(&self, id: NodeId, indent: usize, out: &mut String) {
        match self.tree.kind(id) {
            NodeKind::Program { body } => {
                for stmt in body {
                    self.print_node(*stmt, indent, out);
                    out.push_str(self.sep());
                }
            }
            NodeKind::VarDecl { kind, declarators } => {
                out.push_str(kind.keyword());
                out.push(' ');
                for (i, decl) in declarators.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.print_node(*decl, indent, out);
                }
                out.push(';');
            }
            NodeKind::Declarator { id: name, init } => {
                self.print_node(*name, indent, out);
                if let Some(init) = init {
                    out.push_str(" = ");
                    self.print_node(*init, indent, out);
                }
            }
            NodeKind::ExprStmt { expr } => {
                self.print_node(*expr, indent, out);
                out.push(';');
            }
            NodeKind::Return { argument } => {
                out.push_str("return");
                if let Some(argument) = argument {
                    out.push(' ');
                    self.print_node(*argument, indent, out);
                }
                out.push(';');
            }
            NodeKind::FunctionDecl { id: name, params, body } => {
                out.push_str("function ");
                self.print_node(*name, indent, out);
                self.print_params(params, indent, out);
                out.push(' ');
                self.print_block(body, indent, out);
            }
            NodeKind::Identifier { name } => out.push_str(name),
            NodeKind::Literal { value } => match value {
                Lit::Null => out.push_str("null"),
                Lit::Bool(true) => out.push_str("true"),
                Lit::Bool(false) => out.push_str("false"),
                Lit::Num(raw) => out.push_str(raw),
                Lit::Str { raw, .. } => out.push_str(raw),
            },
            NodeKind::ObjectExpr { properties } => {
                self.print_object(properties, indent, out);
            }
            NodeKind::Property { kind, key, value } => match kind {
                PropertyKind::Init => {
                    self.print_node(*key, indent, out);
                    out.push_str(": ");
                    self.print_node(*value, indent, out);
                }
                PropertyKind::Get => {
                    out.push_str("get ");
                    self.print_node(*key, indent, out);
                    if let NodeKind::FunctionExpr { params, body, .. } = self.tree.kind(*value) {
                        self.print_params(params, indent, out);
                        out.push(' ');
                        self.print_block(body, indent, out);
                    } else {
                        out.push_str("() { return ");
                        self.print_node(*value, indent, out);
                        out.push_str("; }");
                    }
                }
            },
            NodeKind::ArrayExpr { elements } => {
                out.push('[');
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.print_node(*element, indent, out);
                }
                out.push(']');
            }
            NodeKind::FunctionExpr { id: name, params, body } => {
                out.push_str("function ");
                if let Some(name) = name {
                    self.print_node(*name, indent, out);
                }
                self.print_params(params, indent, out);
                out.push(' ');
                self.print_block(body, indent, out);
            }
            NodeKind::ArrowExpr { params, body } => {
                match params.as_slice() {
                    [single] if matches!(self.tree.kind(*single), NodeKind::Identifier { .. }) => {
                        self.print_node(*single, indent, out);
                    }
                    _ => self.print_params(params, indent, out),
                }
                out.push_str(" => ");
                match body {
                    ArrowBody::Expr(expr) => self.print_node(*expr, indent, out),
                    ArrowBody::Block(stmts) => self.print_block(stmts, indent, out),
                }
            }
            NodeKind::CallExpr { callee, arguments } => {
                self.print_wrapped(*callee, Self::callee_needs_parens, indent, out);
                self.print_arguments(arguments, indent, out);
            }
            NodeKind::NewExpr { callee, arguments } => {
                out.push_str("new ");
                self.print_wrapped(*callee, Self::callee_needs_parens, indent, out);
                self.print_arguments(arguments, indent, out);
            }
            NodeKind::MemberExpr {
                object,
                property,
                computed,
            } => {
                self.print_wrapped(*object, Self::callee_needs_parens, indent, out);
                if *computed {
                    out.push('[');
                    self.print_node(*property, indent, out);
                    out.push(']');
                } else {
                    out.push('.');
                    self.print_node(*property, indent, out);
                }
            }
            NodeKind::UnaryExpr { op, argument } => {
                out.push_str(op.as_str());
                if op.as_str().len() > 1 {
                    out.push(' ');
                }
                self.print_wrapped(*argument, Self::operand_needs_parens, indent, out);
            }
            NodeKind::BinaryExpr { op, left, right } => {
                self.print_binary_side(*left, *op, false, indent, out);
                out.push(' ');
                out.push_str(op.as_str());
                out.push(' ');
                self.print_binary_side(*right, *op, true, indent, out);
            }
            NodeKind::ConditionalExpr {
                test,
                consequent,
                alternate,
            } => {
                self.print_wrapped(*test, Self::operand_needs_parens, indent, out);
                out.push_str(" ? ");
                self.print_node(*consequent, indent, out);
                out.push_str(" : ");
                self.print_node(*alternate, indent, out);
            }
        }
    }

    fn print_object(&self, properties: &[NodeId], indent: usize, out: &mut String) {
        match properties {
            [] => out.push_str("{}"),
            [single] => {
                out.push('{');
                self.print_node(*single, indent, out);
                out.push('}');
            }
            _ => {
                out.push('{');
                for property in properties {
                    out.push_str(self.sep());
                    for _ in 0..=indent {
                        out.push_str(INDENT);
                    }
                    self.print_node(*property, indent + 1, out);
                    out.push(',');
                }
                out.push_str(self.sep());
                for _ in 0..indent {
                    out.push_str(INDENT);
                }
                out.push('}');
            }
        }
    }

    fn print_params(&self, params: &[NodeId], indent: usize, out: &mut String) {
        out.push('(');
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.print_node(*param, indent, out);
        }
        out.push(')');
    }

    fn print_arguments(&self, arguments: &[NodeId], indent: usize, out: &mut String) {
        out.push('(');
        for (i, argument) in arguments.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.print_node(*argument, indent, out);
        }
        out.push(')');
    }

    fn print_block(&self, body: &[NodeId], indent: usize, out: &mut String) {
        match body {
            [] => out.push_str("{}"),
            [single] => {
                out.push_str("{ ");
                self.print_node(*single, indent, out);
                out.push_str(" }");
            }
            _ => {
                out.push('{');
                for stmt in body {
                    out.push_str(self.sep());
                    for _ in 0..=indent {
                        out.push_str(INDENT);
                    }
                    self.print_node(*stmt, indent + 1, out);
                }
                out.push_str(self.sep());
                for _ in 0..indent {
                    out.push_str(INDENT);
                }
                out.push('}');
            }
        }
    }

    fn print_wrapped(
        &self,
        id: NodeId,
        needs_parens: fn(SyntaxKind) -> bool,
        indent: usize,
        out: &mut String,
    ) {
        // A node that still has source text carries its own parentheses.
        if self.tree.node(id).span.is_none() && needs_parens(self.tree.syntax_kind(id)) {
            out.push('(');
            self.print_node(id, indent, out);
            out.push(')');
        } else {
            self.print_node(id, indent, out);
        }
    }

    fn callee_needs_parens(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::FunctionExpr
                | SyntaxKind::ArrowExpr
                | SyntaxKind::BinaryExpr
                | SyntaxKind::UnaryExpr
                | SyntaxKind::ConditionalExpr
        )
    }

    fn operand_needs_parens(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::BinaryExpr | SyntaxKind::ConditionalExpr | SyntaxKind::ArrowExpr
        )
    }

    fn print_binary_side(
        &self,
        id: NodeId,
        parent_op: BinaryOp,
        right_side: bool,
        indent: usize,
        out: &mut String,
    ) {
        let wrap = self.tree.node(id).span.is_none()
            && match self.tree.kind(id) {
                NodeKind::BinaryExpr { op, .. } => {
                    let child = op.precedence();
                    let parent = parent_op.precedence();
                    child < parent || (right_side && child == parent)
                }
                NodeKind::ConditionalExpr { .. } | NodeKind::ArrowExpr { .. } => true,
                _ => false,
            };
        if wrap {
            out.push('(');
            self.print_node(id, indent, out);
            out.push(')');
        } else {
            self.print_node(id, indent, out);
        }
    }
}
