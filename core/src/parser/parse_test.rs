//! Parser structure tests: chains, calls, spreads, ternary, and errors.

use super::parsed_expr::{AccessKey, BinaryOp, Expr, PathStep, UnaryOp};
use super::{parse, ParseErrorKind};
use crate::values::Value;

fn var(name: &str) -> Expr {
    Expr::GetVar(name.into())
}

fn lit(v: impl Into<Value>) -> Expr {
    Expr::Literal(v.into())
}

fn dot(target: Expr, name: &str) -> Expr {
    Expr::Access {
        target: Box::new(target),
        key: AccessKey::Name(name.into()),
    }
}

fn idx(target: Expr, index: Expr) -> Expr {
    Expr::Access {
        target: Box::new(target),
        key: AccessKey::Expr(Box::new(index)),
    }
}

// ============================================================================
// Accessor chains
// ============================================================================

#[test]
fn test_dot_chain() {
    assert_eq!(parse("a.b.c").unwrap(), dot(dot(var("a"), "b"), "c"));
}

#[test]
fn test_bracket_access() {
    assert_eq!(
        parse("scores[1]").unwrap(),
        idx(var("scores"), lit(1i64))
    );
}

#[test]
fn test_bracket_index_is_a_full_expression() {
    assert_eq!(
        parse("xs[i + 1]").unwrap(),
        idx(
            var("xs"),
            Expr::Binary {
                op: BinaryOp::Add,
                left: Box::new(var("i")),
                right: Box::new(lit(1i64)),
            }
        )
    );
}

#[test]
fn test_mixed_chain() {
    assert_eq!(
        parse("user.scores[1]").unwrap(),
        idx(dot(var("user"), "scores"), lit(1i64))
    );
}

#[test]
fn test_whitespace_between_chain_tokens() {
    assert_eq!(parse("a . b [ 0 ]").unwrap(), idx(dot(var("a"), "b"), lit(0i64)));
}

// ============================================================================
// Calls
// ============================================================================

#[test]
fn test_call_no_args() {
    assert_eq!(
        parse("pi()").unwrap(),
        Expr::Call {
            name: "pi".into(),
            args: vec![],
        }
    );
}

#[test]
fn test_call_with_args() {
    assert_eq!(
        parse("max(1, 2, 3)").unwrap(),
        Expr::Call {
            name: "max".into(),
            args: vec![lit(1i64), lit(2i64), lit(3i64)],
        }
    );
}

#[test]
fn test_call_result_can_be_accessed() {
    assert_eq!(
        parse("first(rows).id").unwrap(),
        dot(
            Expr::Call {
                name: "first".into(),
                args: vec![var("rows")],
            },
            "id"
        )
    );
}

#[test]
fn test_call_after_access_is_rejected() {
    let err = parse("a.b(1)").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::CallNotAtChainStart);
}

// ============================================================================
// Spreads
// ============================================================================

#[test]
fn test_bare_spread() {
    assert_eq!(
        parse("xs[*]").unwrap(),
        Expr::Spread {
            target: Box::new(var("xs")),
            tail: vec![],
            flatten: false,
        }
    );
}

#[test]
fn test_spread_with_tail() {
    assert_eq!(
        parse("orders[*].qty").unwrap(),
        Expr::Spread {
            target: Box::new(var("orders")),
            tail: vec![PathStep::Key("qty".into())],
            flatten: false,
        }
    );
}

#[test]
fn test_spread_tail_with_index() {
    assert_eq!(
        parse("rows[*].cells[0]").unwrap(),
        Expr::Spread {
            target: Box::new(var("rows")),
            tail: vec![PathStep::Key("cells".into()), PathStep::Index(lit(0i64))],
            flatten: false,
        }
    );
}

#[test]
fn test_nested_spread_flattens_outer() {
    assert_eq!(
        parse("a[*].b[*].c").unwrap(),
        Expr::Spread {
            target: Box::new(Expr::Spread {
                target: Box::new(var("a")),
                tail: vec![PathStep::Key("b".into())],
                flatten: true,
            }),
            tail: vec![PathStep::Key("c".into())],
            flatten: false,
        }
    );
}

#[test]
fn test_computed_spread() {
    assert_eq!(
        parse("orders[*].(qty * price)").unwrap(),
        Expr::ComputedSpread {
            target: Box::new(var("orders")),
            body: Box::new(Expr::Binary {
                op: BinaryOp::Mul,
                left: Box::new(var("qty")),
                right: Box::new(var("price")),
            }),
            flatten: false,
        }
    );
}

#[test]
fn test_computed_spread_after_tail() {
    // The accumulated tail becomes an inner per-element path.
    assert_eq!(
        parse("orders[*].line.(qty)").unwrap(),
        Expr::ComputedSpread {
            target: Box::new(Expr::Spread {
                target: Box::new(var("orders")),
                tail: vec![PathStep::Key("line".into())],
                flatten: false,
            }),
            body: Box::new(var("qty")),
            flatten: false,
        }
    );
}

#[test]
fn test_spread_after_computed_spread_flattens_it() {
    assert_eq!(
        parse("a[*].(b)[*].c").unwrap(),
        Expr::Spread {
            target: Box::new(Expr::ComputedSpread {
                target: Box::new(var("a")),
                body: Box::new(var("b")),
                flatten: true,
            }),
            tail: vec![PathStep::Key("c".into())],
            flatten: false,
        }
    );
}

#[test]
fn test_computed_body_outside_spread_is_rejected() {
    let err = parse("a.(b)").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::ComputedBodyOutsideSpread);
}

// ============================================================================
// Ternary
// ============================================================================

#[test]
fn test_ternary() {
    assert_eq!(
        parse("a ? b : c").unwrap(),
        Expr::Ternary {
            cond: Box::new(var("a")),
            then_branch: Box::new(var("b")),
            else_branch: Box::new(var("c")),
        }
    );
}

#[test]
fn test_ternary_right_nests_in_else() {
    assert_eq!(
        parse("a ? b : c ? d : e").unwrap(),
        Expr::Ternary {
            cond: Box::new(var("a")),
            then_branch: Box::new(var("b")),
            else_branch: Box::new(Expr::Ternary {
                cond: Box::new(var("c")),
                then_branch: Box::new(var("d")),
                else_branch: Box::new(var("e")),
            }),
        }
    );
}

#[test]
fn test_ternary_nests_in_then() {
    assert_eq!(
        parse("a ? b ? c : d : e").unwrap(),
        Expr::Ternary {
            cond: Box::new(var("a")),
            then_branch: Box::new(Expr::Ternary {
                cond: Box::new(var("b")),
                then_branch: Box::new(var("c")),
                else_branch: Box::new(var("d")),
            }),
            else_branch: Box::new(var("e")),
        }
    );
}

#[test]
fn test_ternary_missing_colon() {
    let err = parse("a ? b").unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::Expected { .. }));
}

// ============================================================================
// Unary
// ============================================================================

#[test]
fn test_negation() {
    assert_eq!(
        parse("-42").unwrap(),
        Expr::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(lit(42i64)),
        }
    );
}

#[test]
fn test_not_keyword() {
    assert_eq!(
        parse("not ready").unwrap(),
        Expr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(var("ready")),
        }
    );
}

#[test]
fn test_not_prefix_of_identifier() {
    // `notx` is an identifier, not `not x`.
    assert_eq!(parse("notx").unwrap(), var("notx"));
}

#[test]
fn test_bitwise_not() {
    assert_eq!(
        parse("~flags").unwrap(),
        Expr::Unary {
            op: UnaryOp::BNot,
            operand: Box::new(var("flags")),
        }
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_empty_input() {
    assert_eq!(parse("").unwrap_err().kind, ParseErrorKind::EmptyInput);
    assert_eq!(parse("  \t\n").unwrap_err().kind, ParseErrorKind::EmptyInput);
}

#[test]
fn test_trailing_input() {
    let err = parse("1 2").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TrailingInput);
    assert_eq!((err.line, err.column), (1, 3));
    assert_eq!(err.snippet, "2");
}

#[test]
fn test_unclosed_paren() {
    let err = parse("(1 + 2").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnclosedDelimiter { delimiter: '(' });
}

#[test]
fn test_unclosed_bracket() {
    let err = parse("xs[1").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnclosedDelimiter { delimiter: '[' });
}

#[test]
fn test_unexpected_character_location() {
    let err = parse("1 +\n  %").unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::UnexpectedChar { ch: '%' }));
    assert_eq!((err.line, err.column), (2, 3));
}

#[test]
fn test_snippet_is_bounded() {
    let err = parse("1 ] this is a long remainder").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TrailingInput);
    assert!(err.snippet.len() <= 10);
}

#[test]
fn test_incomplete_binary() {
    assert_eq!(parse("1 +").unwrap_err().kind, ParseErrorKind::UnexpectedEnd);
}

#[test]
fn test_deep_nesting_fails_cleanly() {
    let source = format!("{}1{}", "(".repeat(500), ")".repeat(500));
    let err = parse(&source).unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::MaxDepthExceeded { .. }));
}
