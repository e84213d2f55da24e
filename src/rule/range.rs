//! Range idiom detection
//!
//! Recognizes the three surface shapes of a range test over one
//! variable and two literal bounds:
//!
//! - inside:      `lo <= x && x <= hi` (any operand order per side)
//! - outside-or:  `x < lo || x > hi`
//! - negated-and: `!(lo <= x && x <= hi)`
//!
//! Detection is structural. The shared variable must be the same
//! identifier or member path on both sides; bound values are not
//! evaluated or ordered numerically.

use crate::syntax::{BinaryOp, Expr, ExprKind, LogicalOp, UnaryOp};

use super::classify::{self, LiteralSide, OpCategory};

/// Which surface shape the range test uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeKind {
    /// `A && B` membership test
    Inside,
    /// `A || B` exclusion test
    OutsideOr,
    /// `!(A && B)` exclusion test
    NegatedAnd,
}

/// One half of a range: a comparison between the variable and a bound
#[derive(Debug, Clone, Copy)]
pub struct HalfCmp<'a> {
    /// The variable occurrence, as written (parens included)
    pub target: &'a Expr,
    /// The bound literal, as written
    pub literal: &'a Expr,
    /// Operator normalized so the relation reads `target op literal`
    pub op: BinaryOp,
    /// Whether the literal was written on the left of the operator
    pub literal_on_left: bool,
}

/// A detected range test
#[derive(Debug, Clone, Copy)]
pub struct RangeShape<'a> {
    pub kind: RangeKind,
    /// Comparison against the lower bound
    pub low: HalfCmp<'a>,
    /// Comparison against the upper bound
    pub high: HalfCmp<'a>,
    /// Whether the lower-bound comparison is the left logical operand
    pub low_first: bool,
}

/// Structural path of an identifier or member chain, or `None` for
/// anything more complex
fn target_path<'a>(expr: &'a Expr, out: &mut Vec<&'a str>) -> bool {
    match &expr.unwrap_parens().kind {
        ExprKind::Ident(name) => {
            out.push(name);
            true
        }
        ExprKind::Member { object, property } => {
            if !target_path(object, out) {
                return false;
            }
            out.push(property);
            true
        }
        _ => false,
    }
}

/// Whether two expressions name the same identifier or member path
pub fn same_target(a: &Expr, b: &Expr) -> bool {
    let mut pa = Vec::new();
    let mut pb = Vec::new();
    target_path(a, &mut pa) && target_path(b, &mut pb) && pa == pb
}

/// Classify one logical operand as a half of a range test. Requires a
/// relational comparison with exactly one literal operand; the result
/// reads `target op literal`.
fn half(expr: &Expr) -> Option<HalfCmp<'_>> {
    let cmp = classify::classify(expr)?;
    if cmp.category != OpCategory::Relational {
        return None;
    }
    match cmp.side {
        LiteralSide::Left => Some(HalfCmp {
            target: cmp.right,
            literal: cmp.left,
            op: classify::mirror(cmp.op),
            literal_on_left: true,
        }),
        LiteralSide::Right => Some(HalfCmp {
            target: cmp.left,
            literal: cmp.right,
            op: cmp.op,
            literal_on_left: false,
        }),
        _ => None,
    }
}

fn is_lower(op: BinaryOp) -> bool {
    matches!(op, BinaryOp::Gt | BinaryOp::Ge)
}

fn is_upper(op: BinaryOp) -> bool {
    matches!(op, BinaryOp::Lt | BinaryOp::Le)
}

/// Detect an inside or outside-or range at a logical expression.
/// `expr` is examined through parentheses.
pub fn detect(expr: &Expr) -> Option<RangeShape<'_>> {
    let ExprKind::Logical { op, left, right } = &expr.unwrap_parens().kind else {
        return None;
    };

    let a = half(left)?;
    let b = half(right)?;
    if !same_target(a.target, b.target) {
        return None;
    }

    match op {
        LogicalOp::And => {
            // x > lo (or lo < x) bounds below; x < hi bounds above
            let (low, high, low_first) = if is_lower(a.op) && is_upper(b.op) {
                (a, b, true)
            } else if is_upper(a.op) && is_lower(b.op) {
                (b, a, false)
            } else {
                return None;
            };
            Some(RangeShape {
                kind: RangeKind::Inside,
                low,
                high,
                low_first,
            })
        }
        LogicalOp::Or => {
            // x < lo falls below the range; x > hi falls above it
            let (low, high, low_first) = if is_upper(a.op) && is_lower(b.op) {
                (a, b, true)
            } else if is_lower(a.op) && is_upper(b.op) {
                (b, a, false)
            } else {
                return None;
            };
            Some(RangeShape {
                kind: RangeKind::OutsideOr,
                low,
                high,
                low_first,
            })
        }
    }
}

/// Detect the negated-and form `!(lo <= x && x <= hi)` at a unary
/// expression
pub fn detect_negated(expr: &Expr) -> Option<RangeShape<'_>> {
    let ExprKind::Unary { op, operand } = &expr.unwrap_parens().kind else {
        return None;
    };
    if *op != UnaryOp::Not {
        return None;
    }
    let inner = detect(operand)?;
    if inner.kind != RangeKind::Inside {
        return None;
    }
    Some(RangeShape {
        kind: RangeKind::NegatedAnd,
        ..inner
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
    fn test_same_target() {
        assert!(same_target(&parse("x"), &parse("x")));
        assert!(same_target(&parse("(x)"), &parse("x")));
        assert!(same_target(&parse("a.b.c"), &parse("a.b.c")));
        assert!(!same_target(&parse("x"), &parse("y")));
        assert!(!same_target(&parse("a.b"), &parse("a.c")));
        assert!(!same_target(&parse("a.b"), &parse("a.b.c")));
        assert!(!same_target(&parse("f()"), &parse("f()")));
    }

    #[test]
    fn test_inside_yoda_form() {
        let expr = parse("1 <= x && x <= 10");
        let shape = detect(&expr).unwrap();
        assert_eq!(shape.kind, RangeKind::Inside);
        assert!(shape.low_first);
        assert_eq!(shape.low.op, BinaryOp::Ge);
        assert!(shape.low.literal_on_left);
        assert_eq!(shape.high.op, BinaryOp::Le);
        assert!(!shape.high.literal_on_left);
    }

    #[test]
    fn test_inside_normal_form() {
        let expr = parse("x >= 1 && x <= 10");
        let shape = detect(&expr).unwrap();
        assert_eq!(shape.kind, RangeKind::Inside);
        assert!(shape.low_first);
        assert!(!shape.low.literal_on_left);
        assert!(!shape.high.literal_on_left);
    }

    #[test]
    fn test_inside_swapped_sides() {
        // upper bound written first
        let expr = parse("x <= 10 && x >= 1");
        let shape = detect(&expr).unwrap();
        assert_eq!(shape.kind, RangeKind::Inside);
        assert!(!shape.low_first);
    }

    #[test]
    fn test_inside_strict_bounds() {
        let expr = parse("0 < x && x < 100");
        let shape = detect(&expr).unwrap();
        assert_eq!(shape.low.op, BinaryOp::Gt);
        assert_eq!(shape.high.op, BinaryOp::Lt);
    }

    #[test]
    fn test_inside_member_target() {
        let expr = parse("0 <= obj.len && obj.len <= max()");
        // upper "bound" is a call, not a literal
        assert!(detect(&expr).is_none());

        let expr = parse("0 <= obj.len && obj.len <= 10");
        assert!(detect(&expr).is_some());
    }

    #[test]
    fn test_different_targets_not_a_range() {
        assert!(detect(&parse("1 <= x && y <= 10")).is_none());
    }

    #[test]
    fn test_two_lower_bounds_not_a_range() {
        assert!(detect(&parse("1 <= x && 2 <= x")).is_none());
    }

    #[test]
    fn test_equality_halves_not_a_range() {
        assert!(detect(&parse("1 === x && x <= 10")).is_none());
    }

    #[test]
    fn test_outside_or() {
        let expr = parse("x < 1 || x > 10");
        let shape = detect(&expr).unwrap();
        assert_eq!(shape.kind, RangeKind::OutsideOr);
        assert!(shape.low_first);
        assert_eq!(shape.low.op, BinaryOp::Lt);
        assert_eq!(shape.high.op, BinaryOp::Gt);
    }

    #[test]
    fn test_outside_or_yoda_form() {
        let expr = parse("1 > x || 10 < x");
        let shape = detect(&expr).unwrap();
        assert_eq!(shape.kind, RangeKind::OutsideOr);
        assert!(shape.low.literal_on_left);
        assert!(shape.high.literal_on_left);
    }

    #[test]
    fn test_and_of_exclusions_not_a_range() {
        // both halves point the same way under &&
        assert!(detect(&parse("x < 1 && x < 10")).is_none());
    }

    #[test]
    fn test_negated_and() {
        let expr = parse("!(1 <= x && x <= 10)");
        let shape = detect_negated(&expr).unwrap();
        assert_eq!(shape.kind, RangeKind::NegatedAnd);
        assert_eq!(shape.low.op, BinaryOp::Ge);
    }

    #[test]
    fn test_negated_or_is_not_negated_and() {
        assert!(detect_negated(&parse("!(x < 1 || x > 10)")).is_none());
    }

    #[test]
    fn test_detect_through_parens() {
        assert!(detect(&parse("(1 <= x && x <= 10)")).is_some());
        assert!(detect(&parse("(1 <= x) && (x <= 10)")).is_some());
    }
}
