//! Arena-backed source tree.
//!
//! Nodes live in a flat `Vec` and address each other through copyable
//! [`NodeId`]s, so a handle stays valid across structural edits elsewhere in
//! the tree. Every node remembers two byte ranges into the tree's text
//! buffer:
//!
//! - `span` - where this node's own text lives (original source, or a
//!   payload snippet appended to the buffer by a later parse)
//! - `slot` - the range this node occupies inside its parent's original
//!   text; a replacement node inherits the slot of the node it replaced so
//!   the printer can splice new text into otherwise untouched source
//!
//! Mutation is in place and single-writer. Callers that insert or remove
//! children of the same container must re-derive sibling indices afterward.

use crate::syntax::parser;
use crate::ParseError;

/// Byte range into a tree's text buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Span {
        Span { start, end }
    }
}

/// Stable address of a node in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Declaration keyword.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclKind {
    Var,
    Let,
    Const,
}

impl DeclKind {
    pub fn keyword(self) -> &'static str {
        match self {
            DeclKind::Var => "var",
            DeclKind::Let => "let",
            DeclKind::Const => "const",
        }
    }
}

/// Object property flavor: plain `key: value` or a `get key() {}` accessor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    Init,
    Get,
}

/// Literal payload. Numbers and strings keep their raw lexeme so printing
/// reproduces the author's spelling.
#[derive(Clone, Debug, PartialEq)]
pub enum Lit {
    Null,
    Bool(bool),
    Num(String),
    Str { value: String, raw: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Pos,
    Not,
    TypeOf,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
            UnaryOp::Not => "!",
            UnaryOp::TypeOf => "typeof",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    EqEq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    Gt,
    Le,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::EqEq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNotEq => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }

    /// Binding strength for parenthesis insertion when printing synthesized
    /// operator nodes. Higher binds tighter.
    pub(crate) fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::EqEq | BinaryOp::NotEq | BinaryOp::StrictEq | BinaryOp::StrictNotEq => 3,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => 4,
            BinaryOp::Add | BinaryOp::Sub => 5,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 6,
        }
    }
}

/// Arrow function body: a bare expression or a block of statements.
#[derive(Clone, Debug)]
pub enum ArrowBody {
    Expr(NodeId),
    Block(Vec<NodeId>),
}

/// Node payload. Child links are arena ids; child order matches source
/// order, which the printer relies on when patching.
#[derive(Clone, Debug)]
pub enum NodeKind {
    Program {
        body: Vec<NodeId>,
    },
    VarDecl {
        kind: DeclKind,
        declarators: Vec<NodeId>,
    },
    Declarator {
        id: NodeId,
        init: Option<NodeId>,
    },
    ExprStmt {
        expr: NodeId,
    },
    Return {
        argument: Option<NodeId>,
    },
    FunctionDecl {
        id: NodeId,
        params: Vec<NodeId>,
        body: Vec<NodeId>,
    },
    Identifier {
        name: String,
    },
    Literal {
        value: Lit,
    },
    ObjectExpr {
        properties: Vec<NodeId>,
    },
    Property {
        kind: PropertyKind,
        key: NodeId,
        value: NodeId,
    },
    ArrayExpr {
        elements: Vec<NodeId>,
    },
    FunctionExpr {
        id: Option<NodeId>,
        params: Vec<NodeId>,
        body: Vec<NodeId>,
    },
    ArrowExpr {
        params: Vec<NodeId>,
        body: ArrowBody,
    },
    CallExpr {
        callee: NodeId,
        arguments: Vec<NodeId>,
    },
    NewExpr {
        callee: NodeId,
        arguments: Vec<NodeId>,
    },
    MemberExpr {
        object: NodeId,
        property: NodeId,
        computed: bool,
    },
    UnaryExpr {
        op: UnaryOp,
        argument: NodeId,
    },
    BinaryExpr {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },
    ConditionalExpr {
        test: NodeId,
        consequent: NodeId,
        alternate: NodeId,
    },
}

/// Kind tag without payload, used by the classifier and in error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    Program,
    VarDecl,
    Declarator,
    ExprStmt,
    Return,
    FunctionDecl,
    Identifier,
    Literal,
    ObjectExpr,
    Property,
    ArrayExpr,
    FunctionExpr,
    ArrowExpr,
    CallExpr,
    NewExpr,
    MemberExpr,
    UnaryExpr,
    BinaryExpr,
    ConditionalExpr,
}

impl SyntaxKind {
    pub fn name(self) -> &'static str {
        match self {
            SyntaxKind::Program => "program",
            SyntaxKind::VarDecl => "variable declaration",
            SyntaxKind::Declarator => "declarator",
            SyntaxKind::ExprStmt => "expression statement",
            SyntaxKind::Return => "return statement",
            SyntaxKind::FunctionDecl => "function declaration",
            SyntaxKind::Identifier => "identifier",
            SyntaxKind::Literal => "literal",
            SyntaxKind::ObjectExpr => "object literal",
            SyntaxKind::Property => "property",
            SyntaxKind::ArrayExpr => "array literal",
            SyntaxKind::FunctionExpr => "function expression",
            SyntaxKind::ArrowExpr => "arrow function",
            SyntaxKind::CallExpr => "call expression",
            SyntaxKind::NewExpr => "new expression",
            SyntaxKind::MemberExpr => "member expression",
            SyntaxKind::UnaryExpr => "unary expression",
            SyntaxKind::BinaryExpr => "binary expression",
            SyntaxKind::ConditionalExpr => "conditional expression",
        }
    }
}

impl NodeKind {
    pub fn syntax_kind(&self) -> SyntaxKind {
        match self {
            NodeKind::Program { .. } => SyntaxKind::Program,
            NodeKind::VarDecl { .. } => SyntaxKind::VarDecl,
            NodeKind::Declarator { .. } => SyntaxKind::Declarator,
            NodeKind::ExprStmt { .. } => SyntaxKind::ExprStmt,
            NodeKind::Return { .. } => SyntaxKind::Return,
            NodeKind::FunctionDecl { .. } => SyntaxKind::FunctionDecl,
            NodeKind::Identifier { .. } => SyntaxKind::Identifier,
            NodeKind::Literal { .. } => SyntaxKind::Literal,
            NodeKind::ObjectExpr { .. } => SyntaxKind::ObjectExpr,
            NodeKind::Property { .. } => SyntaxKind::Property,
            NodeKind::ArrayExpr { .. } => SyntaxKind::ArrayExpr,
            NodeKind::FunctionExpr { .. } => SyntaxKind::FunctionExpr,
            NodeKind::ArrowExpr { .. } => SyntaxKind::ArrowExpr,
            NodeKind::CallExpr { .. } => SyntaxKind::CallExpr,
            NodeKind::NewExpr { .. } => SyntaxKind::NewExpr,
            NodeKind::MemberExpr { .. } => SyntaxKind::MemberExpr,
            NodeKind::UnaryExpr { .. } => SyntaxKind::UnaryExpr,
            NodeKind::BinaryExpr { .. } => SyntaxKind::BinaryExpr,
            NodeKind::ConditionalExpr { .. } => SyntaxKind::ConditionalExpr,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) span: Option<Span>,
    pub(crate) slot: Option<Span>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) dirty: bool,
    pub(crate) reshaped: bool,
}

/// A parsed document: arena nodes plus the text buffer they point into.
#[derive(Clone, Debug)]
pub struct Tree {
    pub(crate) nodes: Vec<NodeData>,
    pub(crate) root: NodeId,
    pub(crate) text: String,
}

impl Tree {
    /// Parse document source text. The returned tree reprints byte-identical
    /// until the first mutation.
    pub fn parse(text: &str) -> Result<Tree, ParseError> {
        let mut tree = Tree {
            nodes: Vec::new(),
            root: NodeId(0),
            text: text.to_string(),
        };
        let root = parser::parse_program(&mut tree)?;
        tree.root = root;
        tracing::debug!(nodes = tree.nodes.len(), bytes = text.len(), "parsed document");
        Ok(tree)
    }

    /// Parse an edit payload as a single expression. Its text is appended to
    /// the buffer, so the new subtree prints exactly as written.
    pub fn parse_expression(&mut self, text: &str) -> Result<NodeId, ParseError> {
        let base = self.text.len();
        self.text.push_str(text);
        let id = match parser::parse_expression_at(self, base) {
            Ok(id) => id,
            Err(e) => {
                self.text.truncate(base);
                return Err(e);
            }
        };
        tracing::trace!(?id, text, "parsed edit payload");
        Ok(id)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn syntax_kind(&self, id: NodeId) -> SyntaxKind {
        self.kind(id).syntax_kind()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// Source text of a node, when it still has one (synthesized nodes do
    /// not until they are printed).
    pub fn node_text(&self, id: NodeId) -> Option<&str> {
        self.nodes[id.index()].span.map(|s| &self.text[s.start..s.end])
    }

    pub(crate) fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    /// Allocate a node and adopt its children. `span` doubles as the initial
    /// slot.
    pub(crate) fn alloc(&mut self, kind: NodeKind, span: Option<Span>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind,
            span,
            slot: span,
            parent: None,
            dirty: false,
            reshaped: false,
        });
        for child in self.children(id) {
            self.nodes[child.index()].parent = Some(id);
        }
        id
    }

    /// Children in source order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        match self.kind(id) {
            NodeKind::Program { body } => body.clone(),
            NodeKind::VarDecl { declarators, .. } => declarators.clone(),
            NodeKind::Declarator { id, init } => {
                let mut out = vec![*id];
                out.extend(init.iter().copied());
                out
            }
            NodeKind::ExprStmt { expr } => vec![*expr],
            NodeKind::Return { argument } => argument.iter().copied().collect(),
            NodeKind::FunctionDecl { id, params, body } => {
                let mut out = vec![*id];
                out.extend(params.iter().copied());
                out.extend(body.iter().copied());
                out
            }
            NodeKind::Identifier { .. } | NodeKind::Literal { .. } => Vec::new(),
            NodeKind::ObjectExpr { properties } => properties.clone(),
            NodeKind::Property { key, value, .. } => vec![*key, *value],
            NodeKind::ArrayExpr { elements } => elements.clone(),
            NodeKind::FunctionExpr { id, params, body } => {
                let mut out: Vec<NodeId> = id.iter().copied().collect();
                out.extend(params.iter().copied());
                out.extend(body.iter().copied());
                out
            }
            NodeKind::ArrowExpr { params, body } => {
                let mut out = params.clone();
                match body {
                    ArrowBody::Expr(e) => out.push(*e),
                    ArrowBody::Block(stmts) => out.extend(stmts.iter().copied()),
                }
                out
            }
            NodeKind::CallExpr { callee, arguments } | NodeKind::NewExpr { callee, arguments } => {
                let mut out = vec![*callee];
                out.extend(arguments.iter().copied());
                out
            }
            NodeKind::MemberExpr { object, property, .. } => vec![*object, *property],
            NodeKind::UnaryExpr { argument, .. } => vec![*argument],
            NodeKind::BinaryExpr { left, right, .. } => vec![*left, *right],
            NodeKind::ConditionalExpr {
                test,
                consequent,
                alternate,
            } => vec![*test, *consequent, *alternate],
        }
    }

    /// Mark `id` and every ancestor as containing a change.
    pub(crate) fn mark_changed(&mut self, id: NodeId) {
        let mut cursor = Some(id);
        while let Some(node) = cursor {
            let data = &mut self.nodes[node.index()];
            if data.dirty && data.parent.is_none() {
                break;
            }
            data.dirty = true;
            cursor = data.parent;
        }
    }

    /// Mark a container's child list as structurally changed; the printer
    /// re-lays it out instead of patching.
    pub(crate) fn mark_reshaped(&mut self, id: NodeId) {
        self.nodes[id.index()].reshaped = true;
        self.mark_changed(id);
    }

    /// Swap `new` into the tree position held by `old`. The replacement
    /// inherits `old`'s slot so surrounding source formatting survives.
    /// Replacing the root rewrites the whole document on the next print.
    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        tracing::trace!(?old, ?new, "replace node");
        let slot = self.nodes[old.index()].slot;
        self.nodes[new.index()].slot = slot;
        match self.nodes[old.index()].parent {
            Some(parent) => {
                self.rewrite_child_link(parent, old, new);
                self.nodes[new.index()].parent = Some(parent);
                self.mark_changed(parent);
            }
            None => {
                self.root = new;
                self.nodes[new.index()].parent = None;
            }
        }
        self.nodes[old.index()].parent = None;
    }

    fn rewrite_child_link(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        let replace_in = |list: &mut Vec<NodeId>| {
            for slot in list.iter_mut() {
                if *slot == old {
                    *slot = new;
                    return true;
                }
            }
            false
        };
        let replace_one = |link: &mut NodeId| {
            if *link == old {
                *link = new;
                true
            } else {
                false
            }
        };
        let replace_opt = |link: &mut Option<NodeId>| {
            if *link == Some(old) {
                *link = Some(new);
                true
            } else {
                false
            }
        };
        let found = match &mut self.nodes[parent.index()].kind {
            NodeKind::Program { body } => replace_in(body),
            NodeKind::VarDecl { declarators, .. } => replace_in(declarators),
            NodeKind::Declarator { id, init } => replace_one(id) || replace_opt(init),
            NodeKind::ExprStmt { expr } => replace_one(expr),
            NodeKind::Return { argument } => replace_opt(argument),
            NodeKind::FunctionDecl { id, params, body } => {
                replace_one(id) || replace_in(params) || replace_in(body)
            }
            NodeKind::Identifier { .. } | NodeKind::Literal { .. } => false,
            NodeKind::ObjectExpr { properties } => replace_in(properties),
            NodeKind::Property { key, value, .. } => replace_one(key) || replace_one(value),
            NodeKind::ArrayExpr { elements } => replace_in(elements),
            NodeKind::FunctionExpr { id, params, body } => {
                replace_opt(id) || replace_in(params) || replace_in(body)
            }
            NodeKind::ArrowExpr { params, body } => {
                replace_in(params)
                    || match body {
                        ArrowBody::Expr(e) => replace_one(e),
                        ArrowBody::Block(stmts) => replace_in(stmts),
                    }
            }
            NodeKind::CallExpr { callee, arguments } | NodeKind::NewExpr { callee, arguments } => {
                replace_one(callee) || replace_in(arguments)
            }
            NodeKind::MemberExpr { object, property, .. } => {
                replace_one(object) || replace_one(property)
            }
            NodeKind::UnaryExpr { argument, .. } => replace_one(argument),
            NodeKind::BinaryExpr { left, right, .. } => replace_one(left) || replace_one(right),
            NodeKind::ConditionalExpr {
                test,
                consequent,
                alternate,
            } => replace_one(test) || replace_one(consequent) || replace_one(alternate),
        };
        if !found {
            panic!("replace: {old:?} is not a child of {parent:?}");
        }
    }

    /// Splice `value` into an array literal. Caller validates the node kind.
    pub fn array_insert(&mut self, arr: NodeId, index: usize, value: NodeId) {
        match &mut self.nodes[arr.index()].kind {
            NodeKind::ArrayExpr { elements } => {
                let at = index.min(elements.len());
                elements.insert(at, value);
            }
            other => panic!("array_insert on {}", other.syntax_kind().name()),
        }
        self.nodes[value.index()].parent = Some(arr);
        self.nodes[value.index()].slot = None;
        self.mark_reshaped(arr);
    }

    /// Remove the element at `index` from an array literal, closing the gap.
    pub fn array_remove(&mut self, arr: NodeId, index: usize) -> NodeId {
        let removed = match &mut self.nodes[arr.index()].kind {
            NodeKind::ArrayExpr { elements } => elements.remove(index),
            other => panic!("array_remove on {}", other.syntax_kind().name()),
        };
        self.nodes[removed.index()].parent = None;
        self.mark_reshaped(arr);
        removed
    }

    /// Splice a property into an object literal. Caller validates the kind.
    pub fn object_insert(&mut self, obj: NodeId, index: usize, property: NodeId) {
        match &mut self.nodes[obj.index()].kind {
            NodeKind::ObjectExpr { properties } => {
                let at = index.min(properties.len());
                properties.insert(at, property);
            }
            other => panic!("object_insert on {}", other.syntax_kind().name()),
        }
        self.nodes[property.index()].parent = Some(obj);
        self.nodes[property.index()].slot = None;
        self.mark_reshaped(obj);
    }

    /// Remove the property at `index` from an object literal.
    pub fn object_remove(&mut self, obj: NodeId, index: usize) -> NodeId {
        let removed = match &mut self.nodes[obj.index()].kind {
            NodeKind::ObjectExpr { properties } => properties.remove(index),
            other => panic!("object_remove on {}", other.syntax_kind().name()),
        };
        self.nodes[removed.index()].parent = None;
        self.mark_reshaped(obj);
        removed
    }

    // Builders for synthesized nodes. These have no source text; the
    // printer lays them out canonically.

    pub fn new_identifier(&mut self, name: &str) -> NodeId {
        self.alloc(
            NodeKind::Identifier {
                name: name.to_string(),
            },
            None,
        )
    }

    pub fn new_null(&mut self) -> NodeId {
        self.alloc(NodeKind::Literal { value: Lit::Null }, None)
    }

    pub fn new_bool(&mut self, value: bool) -> NodeId {
        self.alloc(
            NodeKind::Literal {
                value: Lit::Bool(value),
            },
            None,
        )
    }

    pub fn new_string(&mut self, value: &str) -> NodeId {
        let mut raw = String::with_capacity(value.len() + 2);
        raw.push('"');
        for ch in value.chars() {
            match ch {
                '"' => raw.push_str("\\\""),
                '\\' => raw.push_str("\\\\"),
                '\n' => raw.push_str("\\n"),
                _ => raw.push(ch),
            }
        }
        raw.push('"');
        self.alloc(
            NodeKind::Literal {
                value: Lit::Str {
                    value: value.to_string(),
                    raw,
                },
            },
            None,
        )
    }

    pub fn new_array(&mut self, elements: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::ArrayExpr { elements }, None)
    }

    pub fn new_object(&mut self, properties: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::ObjectExpr { properties }, None)
    }

    pub fn new_property(&mut self, kind: PropertyKind, key: NodeId, value: NodeId) -> NodeId {
        self.alloc(NodeKind::Property { kind, key, value }, None)
    }

    pub fn new_return(&mut self, argument: Option<NodeId>) -> NodeId {
        self.alloc(NodeKind::Return { argument }, None)
    }

    /// Anonymous zero-or-more-parameter function expression.
    pub fn new_function_expr(&mut self, params: Vec<NodeId>, body: Vec<NodeId>) -> NodeId {
        self.alloc(
            NodeKind::FunctionExpr {
                id: None,
                params,
                body,
            },
            None,
        )
    }

    /// Structural S-expression dump, for tests and debugging.
    pub fn dump(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.dump_into(id, &mut out);
        out
    }

    fn dump_into(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            NodeKind::Identifier { name } => {
                out.push_str("(id ");
                out.push_str(name);
                out.push(')');
                return;
            }
            NodeKind::Literal { value } => {
                out.push_str("(lit ");
                match value {
                    Lit::Null => out.push_str("null"),
                    Lit::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
                    Lit::Num(raw) => out.push_str(raw),
                    Lit::Str { value, .. } => {
                        out.push('"');
                        out.push_str(value);
                        out.push('"');
                    }
                }
                out.push(')');
                return;
            }
            _ => {}
        }
        out.push('(');
        out.push_str(self.syntax_kind(id).name());
        if let NodeKind::Property { kind: PropertyKind::Get, .. } = self.kind(id) {
            out.push_str(" get");
        }
        for child in self.children(id) {
            out.push(' ');
            self.dump_into(child, out);
        }
        out.push(')');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_inherits_slot() {
        let mut tree = Tree::parse("const x = 1;").unwrap();
        let program = tree.root();
        let decl = tree.children(program)[0];
        let declarator = tree.children(decl)[0];
        let init = tree.children(declarator)[1];
        let old_slot = tree.node(init).slot;
        assert!(old_slot.is_some());

        let replacement = tree.parse_expression("2").unwrap();
        tree.replace(init, replacement);

        assert_eq!(tree.node(replacement).slot, old_slot);
        assert_eq!(tree.parent(replacement), Some(declarator));
        assert!(tree.node(declarator).dirty);
        assert!(tree.node(program).dirty);
        assert!(!tree.node(replacement).dirty);
    }

    #[test]
    fn test_array_remove_closes_gap() {
        let mut tree = Tree::parse("const x = [1, 2, 3];").unwrap();
        let arr = {
            let decl = tree.children(tree.root())[0];
            let declarator = tree.children(decl)[0];
            tree.children(declarator)[1]
        };
        tree.array_remove(arr, 1);
        let NodeKind::ArrayExpr { elements } = tree.kind(arr) else {
            panic!("expected array");
        };
        assert_eq!(elements.len(), 2);
        assert_eq!(tree.dump(elements[1]), "(lit 3)");
        assert!(tree.node(arr).reshaped);
    }

    #[test]
    fn test_parse_expression_bad_payload_rolls_back_buffer() {
        let mut tree = Tree::parse("const x = 1;").unwrap();
        let before = tree.text.len();
        assert!(tree.parse_expression("{{{").is_err());
        assert_eq!(tree.text.len(), before);
    }
}
