//! Comparison classification
//!
//! Splits a binary expression into the pieces the order check needs:
//! operator category, which side holds the literal-like operand, and
//! the operand expressions themselves.

use crate::syntax::{BinaryOp, Expr, ExprKind, UnaryOp};

/// Operator category, each independently toggleable in the settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCategory {
    /// `==` and `===`
    Equality,
    /// `!=` and `!==`
    Inequality,
    /// `<`, `<=`, `>`, `>=`
    Relational,
}

impl OpCategory {
    pub fn of(op: BinaryOp) -> Option<Self> {
        match op {
            BinaryOp::Eq | BinaryOp::StrictEq => Some(OpCategory::Equality),
            BinaryOp::Ne | BinaryOp::StrictNe => Some(OpCategory::Inequality),
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                Some(OpCategory::Relational)
            }
            _ => None,
        }
    }
}

/// The operator that expresses the same relation with operands swapped
pub fn mirror(op: BinaryOp) -> BinaryOp {
    match op {
        BinaryOp::Lt => BinaryOp::Gt,
        BinaryOp::Le => BinaryOp::Ge,
        BinaryOp::Gt => BinaryOp::Lt,
        BinaryOp::Ge => BinaryOp::Le,
        // Symmetric relations mirror to themselves
        other => other,
    }
}

/// Which operand is literal-like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralSide {
    Left,
    Right,
    Both,
    Neither,
}

/// Whether an expression is a constant operand for ordering purposes:
/// a number, string, boolean, or null literal, or a signed number
pub fn is_literal_like(expr: &Expr) -> bool {
    match &expr.unwrap_parens().kind {
        ExprKind::Number(_) | ExprKind::Str(_) | ExprKind::Bool(_) | ExprKind::Null => true,
        ExprKind::Unary { op, operand } => {
            matches!(op, UnaryOp::Neg | UnaryOp::Plus)
                && matches!(operand.unwrap_parens().kind, ExprKind::Number(_))
        }
        _ => false,
    }
}

/// A classified comparison expression
#[derive(Debug, Clone, Copy)]
pub struct Comparison<'a> {
    pub op: BinaryOp,
    pub category: OpCategory,
    pub side: LiteralSide,
    pub left: &'a Expr,
    pub right: &'a Expr,
}

impl<'a> Comparison<'a> {
    /// True when exactly one operand is literal-like, i.e. the
    /// expression has an enforceable order at all
    pub fn is_orderable(&self) -> bool {
        matches!(self.side, LiteralSide::Left | LiteralSide::Right)
    }
}

/// Classify an expression as a comparison, or `None` for anything else
pub fn classify(expr: &Expr) -> Option<Comparison<'_>> {
    let ExprKind::Binary { op, left, right } = &expr.unwrap_parens().kind else {
        return None;
    };
    let category = OpCategory::of(*op)?;

    let side = match (is_literal_like(left), is_literal_like(right)) {
        (true, true) => LiteralSide::Both,
        (true, false) => LiteralSide::Left,
        (false, true) => LiteralSide::Right,
        (false, false) => LiteralSide::Neither,
    };

    Some(Comparison {
        op: *op,
        category,
        side,
        left,
        right,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Parser;

    fn parse(src: &str) -> Expr {
        Parser::parse_expression(src).unwrap()
    }

    #[test]
    fn test_category_of() {
        assert_eq!(OpCategory::of(BinaryOp::Eq), Some(OpCategory::Equality));
        assert_eq!(
            OpCategory::of(BinaryOp::StrictEq),
            Some(OpCategory::Equality)
        );
        assert_eq!(OpCategory::of(BinaryOp::Ne), Some(OpCategory::Inequality));
        assert_eq!(
            OpCategory::of(BinaryOp::StrictNe),
            Some(OpCategory::Inequality)
        );
        assert_eq!(OpCategory::of(BinaryOp::Lt), Some(OpCategory::Relational));
        assert_eq!(OpCategory::of(BinaryOp::Ge), Some(OpCategory::Relational));
        assert_eq!(OpCategory::of(BinaryOp::Add), None);
    }

    #[test]
    fn test_mirror() {
        assert_eq!(mirror(BinaryOp::Lt), BinaryOp::Gt);
        assert_eq!(mirror(BinaryOp::Le), BinaryOp::Ge);
        assert_eq!(mirror(BinaryOp::Gt), BinaryOp::Lt);
        assert_eq!(mirror(BinaryOp::Ge), BinaryOp::Le);
        assert_eq!(mirror(BinaryOp::Eq), BinaryOp::Eq);
        assert_eq!(mirror(BinaryOp::StrictNe), BinaryOp::StrictNe);
    }

    #[test]
    fn test_literal_like() {
        assert!(is_literal_like(&parse("5")));
        assert!(is_literal_like(&parse("'hi'")));
        assert!(is_literal_like(&parse("true")));
        assert!(is_literal_like(&parse("null")));
        assert!(is_literal_like(&parse("-3")));
        assert!(is_literal_like(&parse("+2.5")));
        assert!(is_literal_like(&parse("(5)")));
        assert!(!is_literal_like(&parse("x")));
        assert!(!is_literal_like(&parse("obj.prop")));
        assert!(!is_literal_like(&parse("f()")));
        assert!(!is_literal_like(&parse("!x")));
        assert!(!is_literal_like(&parse("-x")));
    }

    #[test]
    fn test_classify_literal_right() {
        let expr = parse("x === 5");
        let cmp = classify(&expr).unwrap();
        assert_eq!(cmp.op, BinaryOp::StrictEq);
        assert_eq!(cmp.category, OpCategory::Equality);
        assert_eq!(cmp.side, LiteralSide::Right);
        assert!(cmp.is_orderable());
    }

    #[test]
    fn test_classify_literal_left() {
        let expr = parse("5 < count");
        let cmp = classify(&expr).unwrap();
        assert_eq!(cmp.category, OpCategory::Relational);
        assert_eq!(cmp.side, LiteralSide::Left);
        assert!(cmp.is_orderable());
    }

    #[test]
    fn test_classify_both_literals() {
        let expr = parse("1 === 2");
        let cmp = classify(&expr).unwrap();
        assert_eq!(cmp.side, LiteralSide::Both);
        assert!(!cmp.is_orderable());
    }

    #[test]
    fn test_classify_neither_literal() {
        let expr = parse("a < b");
        let cmp = classify(&expr).unwrap();
        assert_eq!(cmp.side, LiteralSide::Neither);
        assert!(!cmp.is_orderable());
    }

    #[test]
    fn test_classify_non_comparison() {
        assert!(classify(&parse("a + b")).is_none());
        assert!(classify(&parse("a && b")).is_none());
        assert!(classify(&parse("x")).is_none());
    }

    #[test]
    fn test_classify_through_parens() {
        let expr = parse("(x === 5)");
        let cmp = classify(&expr).unwrap();
        assert_eq!(cmp.side, LiteralSide::Right);
    }
}
