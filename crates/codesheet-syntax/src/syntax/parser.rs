//! Recursive-descent parser for the document language subset.
//!
//! Grammar (statements):
//!
//! program   := statement*
//! statement := ("var" | "let" | "const") declarator ("," declarator)* ";"?
//!            | "function" IDENT "(" params ")" "{" statement* "}"
//!            | "return" expr? ";"?               (function bodies only)
//!            | expr ";"?
//!
//! Expressions cover identifiers, literals, object/array literals (with
//! getter properties and trailing commas), function and arrow expressions,
//! calls, `new`, member access, unary/binary/conditional operators, and
//! parenthesized expressions. Anything else is a positioned [`ParseError`].

use crate::syntax::token::{tokenize, Punct, Token, TokenKind};
use crate::syntax::tree::{
    ArrowBody, BinaryOp, DeclKind, Lit, NodeId, NodeKind, PropertyKind, Span, Tree, UnaryOp,
};
use crate::ParseError;

pub(crate) fn parse_program(tree: &mut Tree) -> Result<NodeId, ParseError> {
    let end = tree.text.len();
    let tokens = tokenize(&tree.text, 0)?;
    let mut parser = Parser {
        tree,
        tokens,
        pos: 0,
        prev_end: 0,
    };
    let mut body = Vec::new();
    while !parser.at_eof() {
        body.push(parser.parse_statement(false)?);
    }
    Ok(parser
        .tree
        .alloc(NodeKind::Program { body }, Some(Span::new(0, end))))
}

pub(crate) fn parse_expression_at(tree: &mut Tree, base: usize) -> Result<NodeId, ParseError> {
    let tokens = tokenize(&tree.text[base..], base)?;
    let mut parser = Parser {
        tree,
        tokens,
        pos: 0,
        prev_end: base,
    };
    let expr = parser.parse_expr()?;
    if !parser.at_eof() {
        return Err(parser.error_here("expected end of expression"));
    }
    Ok(expr)
}

struct Parser<'t> {
    tree: &'t mut Tree,
    tokens: Vec<Token>,
    pos: usize,
    prev_end: usize,
}

impl<'t> Parser<'t> {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_at(&self, offset: usize) -> &Token {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn token_text(&self, token: &Token) -> &str {
        &self.tree.text[token.span.start..token.span.end]
    }

    fn at_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        self.prev_end = token.span.end;
        token
    }

    fn at_punct(&self, punct: Punct) -> bool {
        self.peek().kind == TokenKind::Punct(punct)
    }

    fn eat_punct(&mut self, punct: Punct) -> bool {
        if self.at_punct(punct) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, punct: Punct, what: &str) -> Result<Token, ParseError> {
        if self.at_punct(punct) {
            Ok(self.advance())
        } else {
            Err(self.error_here(format!("expected {what}")))
        }
    }

    fn is_keyword(&self, token: &Token, keyword: &str) -> bool {
        token.kind == TokenKind::Ident && self.token_text(token) == keyword
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        let token = self.peek();
        self.is_keyword(token, keyword)
    }

    fn error_here(&self, message: impl Into<String>) -> ParseError {
        let token = self.peek();
        ParseError::new(token.line, token.column, message)
    }

    // Statements

    fn parse_statement(&mut self, in_function: bool) -> Result<NodeId, ParseError> {
        if self.at_keyword("var") || self.at_keyword("let") || self.at_keyword("const") {
            return self.parse_var_decl();
        }
        if self.at_keyword("function") {
            return self.parse_function_decl();
        }
        if self.at_keyword("return") {
            if !in_function {
                return Err(self.error_here("'return' outside of a function body"));
            }
            return self.parse_return();
        }
        let start = self.peek().span.start;
        let expr = self.parse_expr()?;
        self.eat_punct(Punct::Semi);
        Ok(self.alloc_spanned(NodeKind::ExprStmt { expr }, start))
    }

    fn parse_var_decl(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.advance();
        let start = keyword.span.start;
        let kind = match self.token_text(&keyword) {
            "var" => DeclKind::Var,
            "let" => DeclKind::Let,
            _ => DeclKind::Const,
        };
        let mut declarators = Vec::new();
        loop {
            declarators.push(self.parse_declarator()?);
            if !self.eat_punct(Punct::Comma) {
                break;
            }
        }
        self.eat_punct(Punct::Semi);
        Ok(self.alloc_spanned(NodeKind::VarDecl { kind, declarators }, start))
    }

    fn parse_declarator(&mut self) -> Result<NodeId, ParseError> {
        let id = self.parse_identifier("variable name")?;
        let start = self.tree.node(id).span.map(|s| s.start).unwrap_or(self.prev_end);
        let init = if self.eat_punct(Punct::Assign) {
            Some(self.parse_assignment_like()?)
        } else {
            None
        };
        Ok(self.alloc_spanned(NodeKind::Declarator { id, init }, start))
    }

    fn parse_function_decl(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.advance();
        let start = keyword.span.start;
        let id = self.parse_identifier("function name")?;
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        Ok(self.alloc_spanned(NodeKind::FunctionDecl { id, params, body }, start))
    }

    fn parse_return(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.advance();
        let start = keyword.span.start;
        let argument = if self.at_punct(Punct::Semi)
            || self.at_punct(Punct::RBrace)
            || self.at_eof()
        {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.eat_punct(Punct::Semi);
        Ok(self.alloc_spanned(NodeKind::Return { argument }, start))
    }

    fn parse_params(&mut self) -> Result<Vec<NodeId>, ParseError> {
        self.expect_punct(Punct::LParen, "'('")?;
        let mut params = Vec::new();
        if !self.at_punct(Punct::RParen) {
            loop {
                params.push(self.parse_identifier("parameter name")?);
                if !self.eat_punct(Punct::Comma) {
                    break;
                }
            }
        }
        self.expect_punct(Punct::RParen, "')'")?;
        Ok(params)
    }

    fn parse_block(&mut self) -> Result<Vec<NodeId>, ParseError> {
        self.expect_punct(Punct::LBrace, "'{'")?;
        let mut body = Vec::new();
        while !self.at_punct(Punct::RBrace) {
            if self.at_eof() {
                return Err(self.error_here("expected '}'"));
            }
            body.push(self.parse_statement(true)?);
        }
        self.advance();
        Ok(body)
    }

    fn parse_identifier(&mut self, what: &str) -> Result<NodeId, ParseError> {
        if self.peek().kind != TokenKind::Ident {
            return Err(self.error_here(format!("expected {what}")));
        }
        let token = self.advance();
        let name = self.token_text(&token).to_string();
        Ok(self
            .tree
            .alloc(NodeKind::Identifier { name }, Some(token.span)))
    }

    // Expressions

    pub(crate) fn parse_expr(&mut self) -> Result<NodeId, ParseError> {
        self.parse_assignment_like()
    }

    /// The level at which arrows and conditionals live.
    fn parse_assignment_like(&mut self) -> Result<NodeId, ParseError> {
        if let Some(arrow) = self.try_parse_arrow()? {
            return Ok(arrow);
        }
        self.parse_conditional()
    }

    fn try_parse_arrow(&mut self) -> Result<Option<NodeId>, ParseError> {
        let token = self.peek();
        // x => expr
        if token.kind == TokenKind::Ident
            && !self.is_reserved(token)
            && self.peek_at(1).kind == TokenKind::Punct(Punct::Arrow)
        {
            let start = token.span.start;
            let param = self.parse_identifier("parameter name")?;
            self.advance();
            let body = self.parse_arrow_body()?;
            return Ok(Some(self.alloc_spanned(
                NodeKind::ArrowExpr {
                    params: vec![param],
                    body,
                },
                start,
            )));
        }
        // (a, b) => expr -- only when the token run ahead really is a
        // parameter list followed by an arrow.
        if self.at_punct(Punct::LParen) && self.arrow_params_ahead() {
            let start = self.peek().span.start;
            let params = self.parse_params()?;
            self.advance();
            let body = self.parse_arrow_body()?;
            return Ok(Some(
                self.alloc_spanned(NodeKind::ArrowExpr { params, body }, start),
            ));
        }
        Ok(None)
    }

    fn arrow_params_ahead(&self) -> bool {
        let mut i = 1;
        if self.peek_at(i).kind != TokenKind::Punct(Punct::RParen) {
            loop {
                if self.peek_at(i).kind != TokenKind::Ident {
                    return false;
                }
                i += 1;
                match self.peek_at(i).kind {
                    TokenKind::Punct(Punct::Comma) => i += 1,
                    TokenKind::Punct(Punct::RParen) => break,
                    _ => return false,
                }
            }
        }
        self.peek_at(i + 1).kind == TokenKind::Punct(Punct::Arrow)
    }

    fn parse_arrow_body(&mut self) -> Result<ArrowBody, ParseError> {
        if self.at_punct(Punct::LBrace) {
            Ok(ArrowBody::Block(self.parse_block()?))
        } else {
            Ok(ArrowBody::Expr(self.parse_assignment_like()?))
        }
    }

    fn parse_conditional(&mut self) -> Result<NodeId, ParseError> {
        let start = self.peek().span.start;
        let test = self.parse_binary(1)?;
        if !self.eat_punct(Punct::Question) {
            return Ok(test);
        }
        let consequent = self.parse_assignment_like()?;
        self.expect_punct(Punct::Colon, "':'")?;
        let alternate = self.parse_assignment_like()?;
        Ok(self.alloc_spanned(
            NodeKind::ConditionalExpr {
                test,
                consequent,
                alternate,
            },
            start,
        ))
    }

    fn binary_op(&self) -> Option<BinaryOp> {
        let TokenKind::Punct(punct) = self.peek().kind else {
            return None;
        };
        Some(match punct {
            Punct::OrOr => BinaryOp::Or,
            Punct::AndAnd => BinaryOp::And,
            Punct::EqEq => BinaryOp::EqEq,
            Punct::NotEq => BinaryOp::NotEq,
            Punct::StrictEq => BinaryOp::StrictEq,
            Punct::StrictNotEq => BinaryOp::StrictNotEq,
            Punct::Lt => BinaryOp::Lt,
            Punct::Gt => BinaryOp::Gt,
            Punct::Le => BinaryOp::Le,
            Punct::Ge => BinaryOp::Ge,
            Punct::Plus => BinaryOp::Add,
            Punct::Minus => BinaryOp::Sub,
            Punct::Star => BinaryOp::Mul,
            Punct::Slash => BinaryOp::Div,
            Punct::Percent => BinaryOp::Rem,
            _ => return None,
        })
    }

    fn parse_binary(&mut self, min_prec: u8) -> Result<NodeId, ParseError> {
        let start = self.peek().span.start;
        let mut left = self.parse_unary()?;
        while let Some(op) = self.binary_op() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.advance();
            let right = self.parse_binary(prec + 1)?;
            left = self.alloc_spanned(NodeKind::BinaryExpr { op, left, right }, start);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<NodeId, ParseError> {
        let token = self.peek();
        let op = match &token.kind {
            TokenKind::Punct(Punct::Minus) => Some(UnaryOp::Neg),
            TokenKind::Punct(Punct::Plus) => Some(UnaryOp::Pos),
            TokenKind::Punct(Punct::Not) => Some(UnaryOp::Not),
            TokenKind::Ident if self.token_text(token) == "typeof" => Some(UnaryOp::TypeOf),
            _ => None,
        };
        if let Some(op) = op {
            let start = self.peek().span.start;
            self.advance();
            let argument = self.parse_unary()?;
            return Ok(self.alloc_spanned(NodeKind::UnaryExpr { op, argument }, start));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<NodeId, ParseError> {
        let start = self.peek().span.start;
        let mut expr = self.parse_primary()?;
        loop {
            if self.eat_punct(Punct::Dot) {
                let property = self.parse_identifier("property name")?;
                expr = self.alloc_spanned(
                    NodeKind::MemberExpr {
                        object: expr,
                        property,
                        computed: false,
                    },
                    start,
                );
            } else if self.eat_punct(Punct::LBracket) {
                let property = self.parse_expr()?;
                self.expect_punct(Punct::RBracket, "']'")?;
                expr = self.alloc_spanned(
                    NodeKind::MemberExpr {
                        object: expr,
                        property,
                        computed: true,
                    },
                    start,
                );
            } else if self.at_punct(Punct::LParen) {
                let arguments = self.parse_arguments()?;
                expr = self.alloc_spanned(
                    NodeKind::CallExpr {
                        callee: expr,
                        arguments,
                    },
                    start,
                );
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_arguments(&mut self) -> Result<Vec<NodeId>, ParseError> {
        self.expect_punct(Punct::LParen, "'('")?;
        let mut arguments = Vec::new();
        if !self.at_punct(Punct::RParen) {
            loop {
                arguments.push(self.parse_assignment_like()?);
                if !self.eat_punct(Punct::Comma) {
                    break;
                }
            }
        }
        self.expect_punct(Punct::RParen, "')'")?;
        Ok(arguments)
    }

    fn is_reserved(&self, token: &Token) -> bool {
        matches!(
            self.token_text(token),
            "var" | "let" | "const" | "function" | "return" | "new" | "typeof" | "null" | "true"
                | "false" | "get"
        )
    }

    fn parse_primary(&mut self) -> Result<NodeId, ParseError> {
        let token = self.peek().clone();
        match &token.kind {
            TokenKind::Ident => {
                let text = self.token_text(&token);
                match text {
                    "null" => {
                        self.advance();
                        Ok(self
                            .tree
                            .alloc(NodeKind::Literal { value: Lit::Null }, Some(token.span)))
                    }
                    "true" | "false" => {
                        let value = Lit::Bool(text == "true");
                        self.advance();
                        Ok(self
                            .tree
                            .alloc(NodeKind::Literal { value }, Some(token.span)))
                    }
                    "function" => self.parse_function_expr(),
                    "new" => self.parse_new_expr(),
                    "var" | "let" | "const" | "return" => {
                        Err(self.error_here(format!("unexpected keyword '{text}'")))
                    }
                    _ => self.parse_identifier("expression"),
                }
            }
            TokenKind::Num => {
                self.advance();
                let raw = self.tree.text[token.span.start..token.span.end].to_string();
                Ok(self
                    .tree
                    .alloc(NodeKind::Literal { value: Lit::Num(raw) }, Some(token.span)))
            }
            TokenKind::Str(value) => {
                let value = value.clone();
                self.advance();
                let raw = self.tree.text[token.span.start..token.span.end].to_string();
                Ok(self.tree.alloc(
                    NodeKind::Literal {
                        value: Lit::Str { value, raw },
                    },
                    Some(token.span),
                ))
            }
            TokenKind::Punct(Punct::LBrace) => self.parse_object(),
            TokenKind::Punct(Punct::LBracket) => self.parse_array(),
            TokenKind::Punct(Punct::LParen) => {
                self.advance();
                let expr = self.parse_expr()?;
                let close = self.expect_punct(Punct::RParen, "')'")?;
                // Fold the parentheses into the inner node's text so both
                // printing and patching reproduce them.
                let span = Span::new(token.span.start, close.span.end);
                let data = self.tree.node_mut(expr);
                data.span = Some(span);
                data.slot = Some(span);
                Ok(expr)
            }
            TokenKind::Punct(_) => Err(self.error_here("expected an expression")),
            TokenKind::Eof => Err(self.error_here("unexpected end of input")),
        }
    }

    fn parse_function_expr(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.advance();
        let start = keyword.span.start;
        let id = if self.peek().kind == TokenKind::Ident && !self.is_reserved(self.peek()) {
            Some(self.parse_identifier("function name")?)
        } else {
            None
        };
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        Ok(self.alloc_spanned(NodeKind::FunctionExpr { id, params, body }, start))
    }

    fn parse_new_expr(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.advance();
        let start = keyword.span.start;
        let mut callee = self.parse_primary()?;
        loop {
            if self.eat_punct(Punct::Dot) {
                let property = self.parse_identifier("property name")?;
                callee = self.alloc_spanned(
                    NodeKind::MemberExpr {
                        object: callee,
                        property,
                        computed: false,
                    },
                    start,
                );
            } else if self.eat_punct(Punct::LBracket) {
                let property = self.parse_expr()?;
                self.expect_punct(Punct::RBracket, "']'")?;
                callee = self.alloc_spanned(
                    NodeKind::MemberExpr {
                        object: callee,
                        property,
                        computed: true,
                    },
                    start,
                );
            } else {
                break;
            }
        }
        let arguments = if self.at_punct(Punct::LParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        Ok(self.alloc_spanned(NodeKind::NewExpr { callee, arguments }, start))
    }

    fn parse_object(&mut self) -> Result<NodeId, ParseError> {
        let open = self.advance();
        let start = open.span.start;
        let mut properties = Vec::new();
        loop {
            if self.at_punct(Punct::RBrace) {
                break;
            }
            if self.at_eof() {
                return Err(self.error_here("expected '}'"));
            }
            properties.push(self.parse_property()?);
            if !self.eat_punct(Punct::Comma) {
                break;
            }
        }
        self.expect_punct(Punct::RBrace, "'}'")?;
        Ok(self.alloc_spanned(NodeKind::ObjectExpr { properties }, start))
    }

    fn parse_property(&mut self) -> Result<NodeId, ParseError> {
        let token = self.peek().clone();
        let start = token.span.start;
        if self.is_keyword(&token, "get")
            && matches!(
                self.peek_at(1).kind,
                TokenKind::Ident | TokenKind::Str(_) | TokenKind::Num
            )
        {
            self.advance();
            let key = self.parse_property_key()?;
            let fn_open = self.expect_punct(Punct::LParen, "'('")?;
            self.expect_punct(Punct::RParen, "')'")?;
            let body = self.parse_block()?;
            let value = self.tree.alloc(
                NodeKind::FunctionExpr {
                    id: None,
                    params: Vec::new(),
                    body,
                },
                Some(Span::new(fn_open.span.start, self.prev_end)),
            );
            return Ok(self.alloc_spanned(
                NodeKind::Property {
                    kind: PropertyKind::Get,
                    key,
                    value,
                },
                start,
            ));
        }
        let key = self.parse_property_key()?;
        self.expect_punct(Punct::Colon, "':'")?;
        let value = self.parse_assignment_like()?;
        Ok(self.alloc_spanned(
            NodeKind::Property {
                kind: PropertyKind::Init,
                key,
                value,
            },
            start,
        ))
    }

    fn parse_property_key(&mut self) -> Result<NodeId, ParseError> {
        let token = self.peek().clone();
        match &token.kind {
            TokenKind::Ident => self.parse_identifier("property key"),
            TokenKind::Str(value) => {
                let value = value.clone();
                self.advance();
                let raw = self.tree.text[token.span.start..token.span.end].to_string();
                Ok(self.tree.alloc(
                    NodeKind::Literal {
                        value: Lit::Str { value, raw },
                    },
                    Some(token.span),
                ))
            }
            TokenKind::Num => {
                self.advance();
                let raw = self.tree.text[token.span.start..token.span.end].to_string();
                Ok(self
                    .tree
                    .alloc(NodeKind::Literal { value: Lit::Num(raw) }, Some(token.span)))
            }
            _ => Err(self.error_here("expected property key")),
        }
    }

    fn parse_array(&mut self) -> Result<NodeId, ParseError> {
        let open = self.advance();
        let start = open.span.start;
        let mut elements = Vec::new();
        loop {
            if self.at_punct(Punct::RBracket) {
                break;
            }
            if self.at_eof() {
                return Err(self.error_here("expected ']'"));
            }
            elements.push(self.parse_assignment_like()?);
            if !self.eat_punct(Punct::Comma) {
                break;
            }
        }
        self.expect_punct(Punct::RBracket, "']'")?;
        Ok(self.alloc_spanned(NodeKind::ArrayExpr { elements }, start))
    }

    fn alloc_spanned(&mut self, kind: NodeKind, start: usize) -> NodeId {
        let span = Span::new(start, self.prev_end);
        self.tree.alloc(kind, Some(span))
    }
}

#[cfg(test)]
mod tests {
    use crate::syntax::tree::Tree;

    fn shape(src: &str) -> String {
        let tree = Tree::parse(src).unwrap();
        tree.dump(tree.root())
    }

    #[test]
    fn test_parse_cells_document() {
        let dump = shape("const _CELLS = {\n    a: {v: 1},\n};\n");
        assert_eq!(
            dump,
            "(program (variable declaration (declarator (id _CELLS) \
             (object literal (property (id a) (object literal (property (id v) (lit 1))))))))"
        );
    }

    #[test]
    fn test_parse_thunk_cell() {
        let tree = Tree::parse("const _CELLS = {t1: {v: function () {return _makeTable({})}, t: true}};").unwrap();
        let dump = tree.dump(tree.root());
        assert!(dump.contains("(function expression (return statement (call expression (id _makeTable) (object literal))))"), "{dump}");
        assert!(dump.contains("(property (id t) (lit true))"), "{dump}");
    }

    #[test]
    fn test_parse_getter_property() {
        let dump = shape("const x = {get a() {return b + 1;}};");
        assert!(dump.contains("(property get (id a) (function expression"), "{dump}");
    }

    #[test]
    fn test_parse_operators_with_precedence() {
        let dump = shape("1 + 2 * 3;");
        assert!(
            dump.contains("(binary expression (lit 1) (binary expression (lit 2) (lit 3)))"),
            "{dump}"
        );
    }

    #[test]
    fn test_parse_arrow_functions() {
        let dump = shape("const f = x => x + 1, g = (a, b) => {return a;};");
        assert!(dump.contains("(arrow function (id x) (binary expression"), "{dump}");
        assert!(dump.contains("(arrow function (id a) (id b) (return statement (id a)))"), "{dump}");
    }

    #[test]
    fn test_parse_member_call_new() {
        let dump = shape("new Map(xs.map(f))[0].size;");
        assert!(dump.contains("(new expression (id Map)"), "{dump}");
        assert!(dump.contains("(member expression"), "{dump}");
    }

    #[test]
    fn test_parse_trailing_commas() {
        let dump = shape("const a = [1, 2,], b = {x: 1,};");
        assert!(dump.contains("(array literal (lit 1) (lit 2))"), "{dump}");
        assert!(dump.contains("(object literal (property (id x) (lit 1)))"), "{dump}");
    }

    #[test]
    fn test_parse_error_position() {
        let err = Tree::parse("const x = ;").unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 11);
    }

    #[test]
    fn test_parse_rejects_return_at_top_level() {
        assert!(Tree::parse("return 1;").is_err());
    }

    #[test]
    fn test_parse_conditional_expression() {
        let dump = shape("const x = a > 1 ? 'big' : 'small';");
        assert!(dump.contains("(conditional expression (binary expression"), "{dump}");
    }
}
