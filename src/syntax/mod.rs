//! Expression syntax layer
//!
//! A small lexer and recursive-descent parser for the script subset the
//! rule needs: literals, identifiers, member access, calls, unary and
//! binary operators, logical operators, parenthesization, and the
//! statements that put expressions in condition position (`if`, `while`,
//! ternary tests) plus variable declarations and blocks.

pub mod ast;
pub mod parser;
pub mod token;

pub use ast::{
    BinaryOp, DeclKind, Expr, ExprKind, LogicalOp, Program, Span, Stmt, StmtKind, UnaryOp,
};
pub use parser::{ParseError, Parser};
pub use token::{Lexer, Token, TokenKind};
