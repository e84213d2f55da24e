//! Recursive-descent parser

use super::ast::{
    BinaryOp, DeclKind, Expr, ExprKind, LogicalOp, Program, Span, Stmt, StmtKind, UnaryOp,
};
use super::token::{Lexer, Token, TokenKind};

/// Error produced by the lexer or parser
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub offset: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "parse error at offset {}: {}", self.offset, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Parses a token stream into a `Program`
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Parse a whole source file
    pub fn parse(source: &str) -> Result<Program, ParseError> {
        let tokens = Lexer::new(source).tokenize()?;
        let mut parser = Self { tokens, pos: 0 };
        let mut body = Vec::new();
        while parser.peek().kind != TokenKind::Eof {
            body.push(parser.statement()?);
        }
        Ok(Program { body })
    }

    /// Parse a single expression (trailing input is an error)
    pub fn parse_expression(source: &str) -> Result<Expr, ParseError> {
        let tokens = Lexer::new(source).tokenize()?;
        let mut parser = Self { tokens, pos: 0 };
        let expr = parser.expression()?;
        let trailing = parser.peek();
        if trailing.kind != TokenKind::Eof {
            return Err(ParseError::new("unexpected trailing input", trailing.span.start));
        }
        Ok(expr)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos.min(self.tokens.len() - 1)].clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if &self.peek().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, ParseError> {
        if self.peek().kind == kind {
            Ok(self.advance())
        } else {
            let token = self.peek();
            Err(ParseError::new(
                format!("expected {}, found {:?}", what, token.kind),
                token.span.start,
            ))
        }
    }

    // === Statements ===

    fn statement(&mut self) -> Result<Stmt, ParseError> {
        match &self.peek().kind {
            TokenKind::If => self.if_statement(),
            TokenKind::While => self.while_statement(),
            TokenKind::LBrace => self.block(),
            TokenKind::Const => self.var_decl(DeclKind::Const),
            TokenKind::Let => self.var_decl(DeclKind::Let),
            TokenKind::Var => self.var_decl(DeclKind::Var),
            TokenKind::Return => self.return_statement(),
            TokenKind::Semi => {
                let token = self.advance();
                Ok(Stmt {
                    span: token.span,
                    kind: StmtKind::Empty,
                })
            }
            _ => {
                let expr = self.expression()?;
                let mut span = expr.span;
                if self.peek().kind == TokenKind::Semi {
                    span = span.to(self.advance().span);
                }
                Ok(Stmt {
                    span,
                    kind: StmtKind::Expr(expr),
                })
            }
        }
    }

    fn if_statement(&mut self) -> Result<Stmt, ParseError> {
        let start = self.expect(TokenKind::If, "'if'")?.span;
        self.expect(TokenKind::LParen, "'('")?;
        let test = self.expression()?;
        self.expect(TokenKind::RParen, "')'")?;
        let consequent = Box::new(self.statement()?);
        let mut span = start.to(consequent.span);
        let alternate = if self.eat(&TokenKind::Else) {
            let stmt = self.statement()?;
            span = span.to(stmt.span);
            Some(Box::new(stmt))
        } else {
            None
        };
        Ok(Stmt {
            span,
            kind: StmtKind::If {
                test,
                consequent,
                alternate,
            },
        })
    }

    fn while_statement(&mut self) -> Result<Stmt, ParseError> {
        let start = self.expect(TokenKind::While, "'while'")?.span;
        self.expect(TokenKind::LParen, "'('")?;
        let test = self.expression()?;
        self.expect(TokenKind::RParen, "')'")?;
        let body = Box::new(self.statement()?);
        let span = start.to(body.span);
        Ok(Stmt {
            span,
            kind: StmtKind::While { test, body },
        })
    }

    fn block(&mut self) -> Result<Stmt, ParseError> {
        let start = self.expect(TokenKind::LBrace, "'{'")?.span;
        let mut body = Vec::new();
        while self.peek().kind != TokenKind::RBrace {
            if self.peek().kind == TokenKind::Eof {
                return Err(ParseError::new("unclosed block", start.start));
            }
            body.push(self.statement()?);
        }
        let end = self.advance().span;
        Ok(Stmt {
            span: start.to(end),
            kind: StmtKind::Block(body),
        })
    }

    fn var_decl(&mut self, kind: DeclKind) -> Result<Stmt, ParseError> {
        let start = self.advance().span;
        let name_token = self.advance();
        let name = match name_token.kind {
            TokenKind::Ident(name) => name,
            other => {
                return Err(ParseError::new(
                    format!("expected identifier, found {:?}", other),
                    name_token.span.start,
                ))
            }
        };
        let mut span = start.to(name_token.span);
        let init = if self.eat(&TokenKind::Assign) {
            let expr = self.expression()?;
            span = span.to(expr.span);
            Some(expr)
        } else {
            None
        };
        if self.peek().kind == TokenKind::Semi {
            span = span.to(self.advance().span);
        }
        Ok(Stmt {
            span,
            kind: StmtKind::VarDecl { kind, name, init },
        })
    }

    fn return_statement(&mut self) -> Result<Stmt, ParseError> {
        let start = self.expect(TokenKind::Return, "'return'")?.span;
        let mut span = start;
        let value = match self.peek().kind {
            TokenKind::Semi | TokenKind::RBrace | TokenKind::Eof => None,
            _ => {
                let expr = self.expression()?;
                span = span.to(expr.span);
                Some(expr)
            }
        };
        if self.peek().kind == TokenKind::Semi {
            span = span.to(self.advance().span);
        }
        Ok(Stmt {
            span,
            kind: StmtKind::Return(value),
        })
    }

    // === Expressions, by precedence ===

    fn expression(&mut self) -> Result<Expr, ParseError> {
        self.conditional()
    }

    fn conditional(&mut self) -> Result<Expr, ParseError> {
        let test = self.logical_or()?;
        if !self.eat(&TokenKind::Question) {
            return Ok(test);
        }
        let consequent = self.expression()?;
        self.expect(TokenKind::Colon, "':'")?;
        let alternate = self.conditional()?;
        let span = test.span.to(alternate.span);
        Ok(Expr {
            span,
            kind: ExprKind::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
        })
    }

    fn logical_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.logical_and()?;
        while self.eat(&TokenKind::OrOr) {
            let right = self.logical_and()?;
            let span = left.span.to(right.span);
            left = Expr {
                span,
                kind: ExprKind::Logical {
                    op: LogicalOp::Or,
                    left: Box::new(left),
                    right: Box::new(right),
                },
            };
        }
        Ok(left)
    }

    fn logical_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.equality()?;
        while self.eat(&TokenKind::AndAnd) {
            let right = self.equality()?;
            let span = left.span.to(right.span);
            left = Expr {
                span,
                kind: ExprKind::Logical {
                    op: LogicalOp::And,
                    left: Box::new(left),
                    right: Box::new(right),
                },
            };
        }
        Ok(left)
    }

    fn equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.relational()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::EqEqEq => BinaryOp::StrictEq,
                TokenKind::NotEq => BinaryOp::Ne,
                TokenKind::NotEqEq => BinaryOp::StrictNe,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.relational()?;
            left = self.binary(op, left, right);
        }
    }

    fn relational(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.additive()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Le => BinaryOp::Le,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::Ge => BinaryOp::Ge,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.additive()?;
            left = self.binary(op, left, right);
        }
    }

    fn additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.multiplicative()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.multiplicative()?;
            left = self.binary(op, left, right);
        }
    }

    fn multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.unary()?;
            left = self.binary(op, left, right);
        }
    }

    fn binary(&self, op: BinaryOp, left: Expr, right: Expr) -> Expr {
        let span = left.span.to(right.span);
        Expr {
            span,
            kind: ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
        }
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek().kind {
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Plus => Some(UnaryOp::Plus),
            _ => None,
        };
        if let Some(op) = op {
            let start = self.advance().span;
            let operand = self.unary()?;
            let span = start.to(operand.span);
            return Ok(Expr {
                span,
                kind: ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
            });
        }
        self.postfix()
    }

    fn postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.primary()?;
        loop {
            match self.peek().kind {
                TokenKind::Dot => {
                    self.advance();
                    let token = self.advance();
                    let property = match token.kind {
                        TokenKind::Ident(name) => name,
                        other => {
                            return Err(ParseError::new(
                                format!("expected property name, found {:?}", other),
                                token.span.start,
                            ))
                        }
                    };
                    let span = expr.span.to(token.span);
                    expr = Expr {
                        span,
                        kind: ExprKind::Member {
                            object: Box::new(expr),
                            property,
                        },
                    };
                }
                TokenKind::LParen => {
                    self.advance();
                    let mut args = Vec::new();
                    if self.peek().kind != TokenKind::RParen {
                        loop {
                            args.push(self.expression()?);
                            if !self.eat(&TokenKind::Comma) {
                                break;
                            }
                        }
                    }
                    let close = self.expect(TokenKind::RParen, "')'")?;
                    let span = expr.span.to(close.span);
                    expr = Expr {
                        span,
                        kind: ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                        },
                    };
                }
                _ => return Ok(expr),
            }
        }
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.advance();
        let kind = match token.kind {
            TokenKind::Number(value) => ExprKind::Number(value),
            TokenKind::Str(value) => ExprKind::Str(value),
            TokenKind::True => ExprKind::Bool(true),
            TokenKind::False => ExprKind::Bool(false),
            TokenKind::Null => ExprKind::Null,
            TokenKind::Ident(name) => ExprKind::Ident(name),
            TokenKind::LParen => {
                let inner = self.expression()?;
                let close = self.expect(TokenKind::RParen, "')'")?;
                return Ok(Expr {
                    span: token.span.to(close.span),
                    kind: ExprKind::Paren(Box::new(inner)),
                });
            }
            other => {
                return Err(ParseError::new(
                    format!("expected expression, found {:?}", other),
                    token.span.start,
                ))
            }
        };
        Ok(Expr {
            span: token.span,
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(source: &str) -> Expr {
        Parser::parse_expression(source).unwrap()
    }

    #[test]
    fn test_parse_comparison() {
        let e = expr("x === 5");
        match e.kind {
            ExprKind::Binary { op, left, right } => {
                assert_eq!(op, BinaryOp::StrictEq);
                assert_eq!(left.kind, ExprKind::Ident("x".to_string()));
                assert_eq!(right.kind, ExprKind::Number(5.0));
            }
            other => panic!("expected binary, got {:?}", other),
        }
        assert_eq!(e.span, Span::new(0, 7));
    }

    #[test]
    fn test_precedence_and_over_or() {
        // a || b && c parses as a || (b && c)
        let e = expr("a || b && c");
        match e.kind {
            ExprKind::Logical { op, right, .. } => {
                assert_eq!(op, LogicalOp::Or);
                assert!(matches!(
                    right.kind,
                    ExprKind::Logical {
                        op: LogicalOp::And,
                        ..
                    }
                ));
            }
            other => panic!("expected logical, got {:?}", other),
        }
    }

    #[test]
    fn test_precedence_comparison_over_logical() {
        // 1 <= x && x <= 10 parses as (1 <= x) && (x <= 10)
        let e = expr("1 <= x && x <= 10");
        match e.kind {
            ExprKind::Logical { op, left, right } => {
                assert_eq!(op, LogicalOp::And);
                assert!(matches!(left.kind, ExprKind::Binary { op: BinaryOp::Le, .. }));
                assert!(matches!(right.kind, ExprKind::Binary { op: BinaryOp::Le, .. }));
            }
            other => panic!("expected logical, got {:?}", other),
        }
    }

    #[test]
    fn test_precedence_additive_over_comparison() {
        // x + 1 < 5 parses as (x + 1) < 5
        let e = expr("x + 1 < 5");
        match e.kind {
            ExprKind::Binary { op, left, .. } => {
                assert_eq!(op, BinaryOp::Lt);
                assert!(matches!(left.kind, ExprKind::Binary { op: BinaryOp::Add, .. }));
            }
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn test_paren_span_includes_parens() {
        let e = expr("(x <= 5)");
        assert_eq!(e.span, Span::new(0, 8));
        assert!(matches!(e.kind, ExprKind::Paren(_)));
    }

    #[test]
    fn test_member_chain() {
        let e = expr("obj.a.b");
        match e.kind {
            ExprKind::Member { object, property } => {
                assert_eq!(property, "b");
                assert!(matches!(object.kind, ExprKind::Member { .. }));
            }
            other => panic!("expected member, got {:?}", other),
        }
    }

    #[test]
    fn test_call_with_args() {
        let e = expr("f(x, 1)");
        match e.kind {
            ExprKind::Call { args, .. } => assert_eq!(args.len(), 2),
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_unary_not() {
        let e = expr("!(a <= x && x <= b)");
        match e.kind {
            ExprKind::Unary { op, operand } => {
                assert_eq!(op, UnaryOp::Not);
                assert!(matches!(operand.kind, ExprKind::Paren(_)));
            }
            other => panic!("expected unary, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_number_literal() {
        let e = expr("-5");
        assert!(matches!(
            e.kind,
            ExprKind::Unary {
                op: UnaryOp::Neg,
                ..
            }
        ));
    }

    #[test]
    fn test_conditional_expr() {
        let e = expr("x === 5 ? a : b");
        assert!(matches!(e.kind, ExprKind::Conditional { .. }));
    }

    #[test]
    fn test_if_statement() {
        let program = Parser::parse("if (x === 5) { y(); } else { z(); }").unwrap();
        assert_eq!(program.body.len(), 1);
        match &program.body[0].kind {
            StmtKind::If {
                test, alternate, ..
            } => {
                assert!(matches!(test.kind, ExprKind::Binary { .. }));
                assert!(alternate.is_some());
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_while_statement() {
        let program = Parser::parse("while (i < 10) step();").unwrap();
        assert!(matches!(program.body[0].kind, StmtKind::While { .. }));
    }

    #[test]
    fn test_var_decl() {
        let program = Parser::parse("const b = x === 5;").unwrap();
        match &program.body[0].kind {
            StmtKind::VarDecl { kind, name, init } => {
                assert_eq!(*kind, DeclKind::Const);
                assert_eq!(name, "b");
                assert!(init.is_some());
            }
            other => panic!("expected var decl, got {:?}", other),
        }
    }

    #[test]
    fn test_return_statement() {
        let program = Parser::parse("return x === 5;").unwrap();
        assert!(matches!(program.body[0].kind, StmtKind::Return(Some(_))));

        let program = Parser::parse("return;").unwrap();
        assert!(matches!(program.body[0].kind, StmtKind::Return(None)));
    }

    #[test]
    fn test_parse_error_offset() {
        let err = Parser::parse_expression("x ===").unwrap_err();
        assert!(err.to_string().contains("parse error"));
    }

    #[test]
    fn test_trailing_input_rejected() {
        assert!(Parser::parse_expression("x === 5 7").is_err());
    }

    #[test]
    fn test_unclosed_block() {
        assert!(Parser::parse("{ x === 5;").is_err());
    }

    #[test]
    fn test_unclosed_paren() {
        assert!(Parser::parse_expression("(x === 5").is_err());
    }

    #[test]
    fn test_spans_slice_source() {
        let source = "if (count >= 1 && count <= 10) call();";
        let program = Parser::parse(source).unwrap();
        match &program.body[0].kind {
            StmtKind::If { test, .. } => {
                assert_eq!(&source[test.span.start..test.span.end], "count >= 1 && count <= 10");
            }
            other => panic!("expected if, got {:?}", other),
        }
    }
}
