//! Order enforcement and fix synthesis
//!
//! Takes classified comparisons and detected range shapes and decides
//! whether they violate the configured order, producing replacement
//! text built from verbatim source slices of the operands. Operand
//! text is never reformatted, only reordered around a mirrored or
//! complemented operator.

use crate::syntax::{BinaryOp, Expr, Span};

use super::classify::{self, Comparison, LiteralSide, OpCategory};
use super::options::{NotInRangeMode, OrderMode, Settings};
use super::range::{RangeKind, RangeShape};

pub const RULE_ORDER: &str = "yoda-order";
pub const RULE_RANGE: &str = "yoda-range";
pub const RULE_REDUNDANT: &str = "yoda-redundant";

/// A violation found by the enforcer, not yet tied to a file location
#[derive(Debug, Clone)]
pub struct Violation {
    pub rule_id: &'static str,
    pub span: Span,
    pub message: String,
    pub help: Option<String>,
    /// Replacement text for `span`, absent when no safe fix exists
    pub replacement: Option<String>,
}

fn slice<'a>(source: &'a str, expr: &Expr) -> &'a str {
    &source[expr.span.start..expr.span.end]
}

/// The operator expressing the negated relation
fn complement(op: BinaryOp) -> BinaryOp {
    match op {
        BinaryOp::Lt => BinaryOp::Ge,
        BinaryOp::Le => BinaryOp::Gt,
        BinaryOp::Gt => BinaryOp::Le,
        BinaryOp::Ge => BinaryOp::Lt,
        other => other,
    }
}

fn category_enabled(settings: &Settings, category: OpCategory) -> bool {
    match category {
        OpCategory::Equality => settings.equality,
        OpCategory::Inequality => settings.inequality,
        OpCategory::Relational => settings.comparison,
    }
}

/// Check a lone comparison against the configured order
pub fn check_comparison(
    source: &str,
    expr: &Expr,
    settings: &Settings,
) -> Option<Violation> {
    let inner = expr.unwrap_parens();
    let cmp = classify::classify(inner)?;
    if !category_enabled(settings, cmp.category) {
        return None;
    }

    match cmp.side {
        LiteralSide::Both => Some(Violation {
            rule_id: RULE_REDUNDANT,
            span: inner.span,
            message: format!(
                "Comparison '{}' has constants on both sides and always yields the same result",
                slice(source, inner)
            ),
            help: Some("Replace the comparison with its constant result".to_string()),
            replacement: None,
        }),
        LiteralSide::Neither => None,
        LiteralSide::Left if settings.order == OrderMode::Yoda => None,
        LiteralSide::Right if settings.order == OrderMode::Normal => None,
        _ => Some(order_violation(source, inner, &cmp, settings.order)),
    }
}

fn order_violation(
    source: &str,
    expr: &Expr,
    cmp: &Comparison<'_>,
    order: OrderMode,
) -> Violation {
    let side = match order {
        OrderMode::Yoda => "left",
        OrderMode::Normal => "right",
    };
    let message = format!(
        "Expected literal to be on the {} side of '{}'",
        side,
        cmp.op.as_str()
    );

    // Swapping operands past a call could reorder side effects
    if cmp.left.contains_call() || cmp.right.contains_call() {
        return Violation {
            rule_id: RULE_ORDER,
            span: expr.span,
            message,
            help: Some(
                "An operand contains a function call; reorder the operands manually".to_string(),
            ),
            replacement: None,
        };
    }

    let replacement = format!(
        "{} {} {}",
        slice(source, cmp.right),
        classify::mirror(cmp.op).as_str(),
        slice(source, cmp.left)
    );
    Violation {
        rule_id: RULE_ORDER,
        span: expr.span,
        message,
        help: Some(format!("Rewrite as '{}'", replacement)),
        replacement: Some(replacement),
    }
}

/// Render one half of a range with the literal on the left
fn render_lit_first(source: &str, target: &Expr, literal: &Expr, op: BinaryOp) -> String {
    format!(
        "{} {} {}",
        slice(source, literal),
        classify::mirror(op).as_str(),
        slice(source, target)
    )
}

/// Render one half of a range with the variable on the left
fn render_var_first(source: &str, target: &Expr, literal: &Expr, op: BinaryOp) -> String {
    format!(
        "{} {} {}",
        slice(source, target),
        op.as_str(),
        slice(source, literal)
    )
}

/// Canonical membership test: `lo <= x && x <= hi` for yoda order,
/// `x >= lo && x <= hi` for normal order. `low_op`/`high_op` read
/// `target op literal` and keep the original strictness.
fn render_inside(
    source: &str,
    shape: &RangeShape<'_>,
    low_op: BinaryOp,
    high_op: BinaryOp,
    order: OrderMode,
) -> String {
    let low = match order {
        OrderMode::Yoda => render_lit_first(source, shape.low.target, shape.low.literal, low_op),
        OrderMode::Normal => render_var_first(source, shape.low.target, shape.low.literal, low_op),
    };
    let high = render_var_first(source, shape.high.target, shape.high.literal, high_op);
    format!("{} && {}", low, high)
}

/// Canonical exclusion test: `x < lo || x > hi` for normal order,
/// `lo > x || hi < x` for yoda order
fn render_outside_or(
    source: &str,
    shape: &RangeShape<'_>,
    low_op: BinaryOp,
    high_op: BinaryOp,
    order: OrderMode,
) -> String {
    let (low, high) = match order {
        OrderMode::Yoda => (
            render_lit_first(source, shape.low.target, shape.low.literal, low_op),
            render_lit_first(source, shape.high.target, shape.high.literal, high_op),
        ),
        OrderMode::Normal => (
            render_var_first(source, shape.low.target, shape.low.literal, low_op),
            render_var_first(source, shape.high.target, shape.high.literal, high_op),
        ),
    };
    format!("{} || {}", low, high)
}

/// Whether an inside-range shape already matches the canonical layout
/// for the given order: lower bound first, literal placement per order
fn inside_is_canonical(shape: &RangeShape<'_>, order: OrderMode) -> bool {
    if !shape.low_first || shape.high.literal_on_left {
        return false;
    }
    match order {
        OrderMode::Yoda => shape.low.literal_on_left,
        OrderMode::Normal => !shape.low.literal_on_left,
    }
}

fn outside_or_is_canonical(shape: &RangeShape<'_>, order: OrderMode) -> bool {
    if !shape.low_first {
        return false;
    }
    match order {
        OrderMode::Yoda => shape.low.literal_on_left && shape.high.literal_on_left,
        OrderMode::Normal => !shape.low.literal_on_left && !shape.high.literal_on_left,
    }
}

fn range_violation(span: Span, canonical: String) -> Violation {
    Violation {
        rule_id: RULE_RANGE,
        span,
        message: format!("Expected range test to be written as '{}'", canonical),
        help: None,
        replacement: Some(canonical),
    }
}

/// Check a detected range shape against the configured canonical form.
/// `span` is the span being reported and replaced, which includes the
/// surrounding parentheses or the `!` operator where present.
/// `parenthesized` is whether the replacement must keep outer parens.
pub fn check_range(
    source: &str,
    span: Span,
    shape: &RangeShape<'_>,
    parenthesized: bool,
    settings: &Settings,
) -> Option<Violation> {
    let order = settings.order;
    match shape.kind {
        RangeKind::Inside => {
            if inside_is_canonical(shape, order) {
                return None;
            }
            let mut canonical = render_inside(source, shape, shape.low.op, shape.high.op, order);
            if parenthesized {
                canonical = format!("({})", canonical);
            }
            Some(range_violation(span, canonical))
        }
        RangeKind::OutsideOr => match settings.not_in_range {
            NotInRangeMode::Ignore => None,
            NotInRangeMode::Or => {
                if outside_or_is_canonical(shape, order) {
                    return None;
                }
                let mut canonical =
                    render_outside_or(source, shape, shape.low.op, shape.high.op, order);
                if parenthesized {
                    canonical = format!("({})", canonical);
                }
                Some(range_violation(span, canonical))
            }
            NotInRangeMode::NegateAnd => {
                // x < lo || x > hi  becomes  !(lo <= x && x <= hi)
                let inner = render_inside(
                    source,
                    shape,
                    complement(shape.low.op),
                    complement(shape.high.op),
                    order,
                );
                let mut canonical = format!("!({})", inner);
                if parenthesized {
                    canonical = format!("({})", canonical);
                }
                Some(range_violation(span, canonical))
            }
        },
        RangeKind::NegatedAnd => match settings.not_in_range {
            NotInRangeMode::Ignore => None,
            NotInRangeMode::NegateAnd => {
                if inside_is_canonical(shape, order) {
                    return None;
                }
                let inner = render_inside(source, shape, shape.low.op, shape.high.op, order);
                let mut canonical = format!("!({})", inner);
                if parenthesized {
                    canonical = format!("({})", canonical);
                }
                Some(range_violation(span, canonical))
            }
            NotInRangeMode::Or => {
                // !(lo <= x && x <= hi)  becomes  x < lo || x > hi
                let mut canonical = render_outside_or(
                    source,
                    shape,
                    complement(shape.low.op),
                    complement(shape.high.op),
                    order,
                );
                if parenthesized {
                    canonical = format!("({})", canonical);
                }
                Some(range_violation(span, canonical))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::range;
    use crate::syntax::Parser;

    fn settings(order: OrderMode) -> Settings {
        Settings::new(order)
    }

    fn cmp_check(source: &str, s: &Settings) -> Option<Violation> {
        let expr = Parser::parse_expression(source).unwrap();
        check_comparison(source, &expr, s)
    }

    fn range_check(source: &str, s: &Settings) -> Option<Violation> {
        let expr = Parser::parse_expression(source).unwrap();
        let shape = range::detect_negated(&expr)
            .or_else(|| range::detect(&expr))
            .unwrap();
        check_range(source, expr.span, &shape, false, s)
    }

    #[test]
    fn test_yoda_wants_literal_left() {
        let s = settings(OrderMode::Yoda);
        let v = cmp_check("x === 5", &s).unwrap();
        assert_eq!(v.rule_id, RULE_ORDER);
        assert_eq!(v.replacement.as_deref(), Some("5 === x"));
        assert!(cmp_check("5 === x", &s).is_none());
    }

    #[test]
    fn test_normal_wants_literal_right() {
        let s = settings(OrderMode::Normal);
        let v = cmp_check("5 === x", &s).unwrap();
        assert_eq!(v.replacement.as_deref(), Some("x === 5"));
        assert!(cmp_check("x === 5", &s).is_none());
    }

    #[test]
    fn test_relational_mirrors_operator() {
        let s = settings(OrderMode::Yoda);
        let v = cmp_check("count < 10", &s).unwrap();
        assert_eq!(v.replacement.as_deref(), Some("10 > count"));

        let v = cmp_check("total >= 100", &s).unwrap();
        assert_eq!(v.replacement.as_deref(), Some("100 <= total"));
    }

    #[test]
    fn test_operand_text_preserved_verbatim() {
        let s = settings(OrderMode::Yoda);
        // original spacing inside operands is kept, operator spacing is normalized
        let v = cmp_check("items.length===3", &s).unwrap();
        assert_eq!(v.replacement.as_deref(), Some("3 === items.length"));

        let v = cmp_check("x !== 'a b'", &s).unwrap();
        assert_eq!(v.replacement.as_deref(), Some("'a b' !== x"));
    }

    #[test]
    fn test_redundant_both_literals() {
        let s = settings(OrderMode::Yoda);
        let v = cmp_check("1 === 2", &s).unwrap();
        assert_eq!(v.rule_id, RULE_REDUNDANT);
        assert!(v.replacement.is_none());
    }

    #[test]
    fn test_neither_literal_is_fine() {
        let s = settings(OrderMode::Yoda);
        assert!(cmp_check("a === b", &s).is_none());
    }

    #[test]
    fn test_call_operand_has_no_fix() {
        let s = settings(OrderMode::Yoda);
        let v = cmp_check("f() === 5", &s).unwrap();
        assert_eq!(v.rule_id, RULE_ORDER);
        assert!(v.replacement.is_none());
        assert!(v.help.unwrap().contains("manually"));
    }

    #[test]
    fn test_category_toggle_gates_check() {
        let mut s = settings(OrderMode::Yoda);
        s.equality = false;
        assert!(cmp_check("x === 5", &s).is_none());
        // other categories still enforced
        assert!(cmp_check("x < 5", &s).is_some());
        assert!(cmp_check("x !== 5", &s).is_some());
    }

    #[test]
    fn test_inside_range_canonical_yoda() {
        let s = settings(OrderMode::Yoda);
        assert!(range_check("1 <= x && x <= 10", &s).is_none());

        let v = range_check("x >= 1 && x <= 10", &s).unwrap();
        assert_eq!(v.rule_id, RULE_RANGE);
        assert_eq!(v.replacement.as_deref(), Some("1 <= x && x <= 10"));
    }

    #[test]
    fn test_inside_range_canonical_normal() {
        let s = settings(OrderMode::Normal);
        assert!(range_check("x >= 1 && x <= 10", &s).is_none());

        let v = range_check("1 <= x && x <= 10", &s).unwrap();
        assert_eq!(v.replacement.as_deref(), Some("x >= 1 && x <= 10"));
    }

    #[test]
    fn test_inside_range_reorders_bounds() {
        let s = settings(OrderMode::Yoda);
        let v = range_check("x <= 10 && 1 <= x", &s).unwrap();
        assert_eq!(v.replacement.as_deref(), Some("1 <= x && x <= 10"));
    }

    #[test]
    fn test_inside_range_keeps_strictness() {
        let s = settings(OrderMode::Yoda);
        let v = range_check("x > 0 && x < 100", &s).unwrap();
        assert_eq!(v.replacement.as_deref(), Some("0 < x && x < 100"));
    }

    #[test]
    fn test_outside_or_canonical_normal() {
        let s = settings(OrderMode::Normal);
        assert!(range_check("x < 1 || x > 10", &s).is_none());

        let v = range_check("1 > x || 10 < x", &s).unwrap();
        assert_eq!(v.replacement.as_deref(), Some("x < 1 || x > 10"));
    }

    #[test]
    fn test_outside_or_canonical_yoda() {
        let s = settings(OrderMode::Yoda);
        assert!(range_check("1 > x || 10 < x", &s).is_none());

        let v = range_check("x < 1 || x > 10", &s).unwrap();
        assert_eq!(v.replacement.as_deref(), Some("1 > x || 10 < x"));
    }

    #[test]
    fn test_negate_and_mode_rewrites_or() {
        let mut s = settings(OrderMode::Yoda);
        s.not_in_range = NotInRangeMode::NegateAnd;
        let v = range_check("x < 1 || x > 10", &s).unwrap();
        // strictness flips under de morgan
        assert_eq!(v.replacement.as_deref(), Some("!(1 <= x && x <= 10)"));
    }

    #[test]
    fn test_or_mode_rewrites_negated_and() {
        let s = settings(OrderMode::Normal);
        let v = range_check("!(1 <= x && x <= 10)", &s).unwrap();
        assert_eq!(v.replacement.as_deref(), Some("x < 1 || x > 10"));
    }

    #[test]
    fn test_negate_and_canonical_accepted() {
        let mut s = settings(OrderMode::Yoda);
        s.not_in_range = NotInRangeMode::NegateAnd;
        assert!(range_check("!(1 <= x && x <= 10)", &s).is_none());

        let v = range_check("!(x >= 1 && x <= 10)", &s).unwrap();
        assert_eq!(v.replacement.as_deref(), Some("!(1 <= x && x <= 10)"));
    }

    #[test]
    fn test_not_in_range_ignore() {
        let mut s = settings(OrderMode::Yoda);
        s.not_in_range = NotInRangeMode::Ignore;
        assert!(range_check("x < 1 || x > 10", &s).is_none());
        assert!(range_check("!(x >= 1 && x <= 10)", &s).is_none());
    }

    #[test]
    fn test_parenthesized_replacement_keeps_parens() {
        let src = "(x >= 1 && x <= 10)";
        let expr = Parser::parse_expression(src).unwrap();
        let shape = range::detect(&expr).unwrap();
        let s = settings(OrderMode::Yoda);
        let v = check_range(src, expr.span, &shape, true, &s).unwrap();
        assert_eq!(v.replacement.as_deref(), Some("(1 <= x && x <= 10)"));
    }
}
