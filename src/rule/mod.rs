//! The comparison-order rule
//!
//! `YodaRule` walks a parsed document, hands range-shaped logical
//! expressions to the range detector and everything else to the
//! comparison classifier, and turns the resulting violations into
//! diagnostics with fixes.

pub mod classify;
pub mod enforce;
pub mod options;
pub mod range;

pub use enforce::{Violation, RULE_ORDER, RULE_RANGE, RULE_REDUNDANT};
pub use options::{NotInRangeMode, OptionsError, OrderMode, RangeMode, RawOptions, Settings};

use crate::core::{Diagnostic, Fix, ScriptDocument};
use crate::syntax::{Expr, ExprKind, Stmt, StmtKind};

/// The configured rule, reusable across documents
#[derive(Debug, Clone)]
pub struct YodaRule {
    settings: Settings,
}

impl YodaRule {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Check a parsed document, returning diagnostics in source order
    pub fn check(&self, doc: &ScriptDocument<'_>) -> Vec<Diagnostic> {
        let mut violations = Vec::new();
        for stmt in &doc.program().body {
            self.walk_stmt(doc.source(), stmt, &mut violations);
        }
        violations
            .into_iter()
            .map(|v| self.into_diagnostic(doc, v))
            .collect()
    }

    fn into_diagnostic(&self, doc: &ScriptDocument<'_>, v: Violation) -> Diagnostic {
        let mut diag = Diagnostic::warning(v.rule_id, v.message, doc.location(v.span));
        if let Some(help) = v.help {
            diag = diag.with_help(help);
        }
        if let Some(replacement) = v.replacement {
            let description = format!("Replace with '{}'", replacement);
            diag = diag.with_fix(Fix::new(description, v.span, replacement));
        }
        diag
    }

    fn walk_stmt(&self, source: &str, stmt: &Stmt, out: &mut Vec<Violation>) {
        match &stmt.kind {
            StmtKind::Expr(expr) => self.walk_expr(source, expr, false, out),
            StmtKind::If {
                test,
                consequent,
                alternate,
            } => {
                self.walk_expr(source, test, true, out);
                self.walk_stmt(source, consequent, out);
                if let Some(alternate) = alternate {
                    self.walk_stmt(source, alternate, out);
                }
            }
            StmtKind::While { test, body } => {
                self.walk_expr(source, test, true, out);
                self.walk_stmt(source, body, out);
            }
            StmtKind::Block(body) => {
                for stmt in body {
                    self.walk_stmt(source, stmt, out);
                }
            }
            StmtKind::VarDecl { init, .. } => {
                if let Some(init) = init {
                    self.walk_expr(source, init, false, out);
                }
            }
            StmtKind::Return(Some(expr)) => self.walk_expr(source, expr, false, out),
            StmtKind::Return(None) | StmtKind::Empty => {}
        }
    }

    /// `in_cond` marks expressions used as a condition: the test of an
    /// `if`, `while`, or ternary, propagated through `&&`, `||`, `!`,
    /// and parentheses. Operands of other expressions are not
    /// conditions themselves.
    fn walk_expr(&self, source: &str, expr: &Expr, in_cond: bool, out: &mut Vec<Violation>) {
        if self.try_range(source, expr, in_cond, out) {
            return;
        }

        match &expr.kind {
            ExprKind::Binary { left, right, .. } => {
                if !self.settings.only_ifs || in_cond {
                    if let Some(v) = enforce::check_comparison(source, expr, &self.settings) {
                        out.push(v);
                    }
                }
                self.walk_expr(source, left, false, out);
                self.walk_expr(source, right, false, out);
            }
            ExprKind::Logical { left, right, .. } => {
                self.walk_expr(source, left, in_cond, out);
                self.walk_expr(source, right, in_cond, out);
            }
            ExprKind::Paren(inner) => self.walk_expr(source, inner, in_cond, out),
            ExprKind::Unary { operand, .. } => self.walk_expr(source, operand, in_cond, out),
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.walk_expr(source, test, true, out);
                self.walk_expr(source, consequent, false, out);
                self.walk_expr(source, alternate, false, out);
            }
            ExprKind::Call { callee, args } => {
                self.walk_expr(source, callee, false, out);
                for arg in args {
                    self.walk_expr(source, arg, false, out);
                }
            }
            ExprKind::Member { object, .. } => self.walk_expr(source, object, false, out),
            ExprKind::Number(_)
            | ExprKind::Str(_)
            | ExprKind::Bool(_)
            | ExprKind::Null
            | ExprKind::Ident(_) => {}
        }
    }

    /// Attempt to treat `expr` as a range test. Returns true when the
    /// node was consumed: its sub-comparisons are then never checked
    /// individually, whether or not a diagnostic was produced.
    fn try_range(
        &self,
        source: &str,
        expr: &Expr,
        in_cond: bool,
        out: &mut Vec<Violation>,
    ) -> bool {
        if self.settings.range == RangeMode::NoSpecial {
            return false;
        }

        let parenthesized = matches!(expr.kind, ExprKind::Paren(_));
        let Some(shape) = range::detect_negated(expr).or_else(|| range::detect(expr)) else {
            return false;
        };

        // The negated form carries its own parentheses after `!`
        if self.settings.require_parenthesized_range
            && shape.kind != range::RangeKind::NegatedAnd
            && !parenthesized
        {
            return false;
        }

        if self.settings.range == RangeMode::Ignore {
            return true;
        }

        if self.settings.only_ifs && !in_cond {
            return true;
        }

        if let Some(v) =
            enforce::check_range(source, expr.span, &shape, parenthesized, &self.settings)
        {
            out.push(v);
        }
        true
    }
}
