//! Literal parsing tests.

use super::parse;
use super::parsed_expr::Expr;
use crate::values::Value;

fn literal(source: &str) -> Value {
    match parse(source).unwrap() {
        Expr::Literal(v) => v,
        other => panic!("expected literal for {:?}, got {:?}", source, other),
    }
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn test_integer() {
    assert_eq!(literal("42"), Value::Int(42));
    assert_eq!(literal("0"), Value::Int(0));
    assert_eq!(literal("007"), Value::Int(7));
}

#[test]
fn test_float() {
    assert_eq!(literal("3.14"), Value::Float(3.14));
    assert_eq!(literal("0.5"), Value::Float(0.5));
}

#[test]
fn test_float_missing_fraction_defaults_to_zero() {
    assert_eq!(literal("1."), Value::Float(1.0));
}

#[test]
fn test_float_leading_dot() {
    assert_eq!(literal(".5"), Value::Float(0.5));
}

#[test]
fn test_integer_overflow_is_invalid_number() {
    let err = parse("99999999999999999999").unwrap_err();
    assert!(matches!(
        err.kind,
        super::ParseErrorKind::InvalidNumber { .. }
    ));
}

// ============================================================================
// Keywords
// ============================================================================

#[test]
fn test_bool_and_null() {
    assert_eq!(literal("true"), Value::Bool(true));
    assert_eq!(literal("false"), Value::Bool(false));
    assert_eq!(literal("null"), Value::Null);
}

#[test]
fn test_keyword_prefix_is_an_identifier() {
    // `trueish` must not parse as `true` + trailing garbage.
    assert_eq!(parse("trueish").unwrap(), Expr::GetVar("trueish".into()));
    assert_eq!(parse("nullable").unwrap(), Expr::GetVar("nullable".into()));
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_double_quoted_string() {
    assert_eq!(literal(r#""hello""#), Value::string("hello"));
}

#[test]
fn test_single_quoted_string() {
    assert_eq!(literal("'hello'"), Value::string("hello"));
}

#[test]
fn test_string_escapes() {
    assert_eq!(literal(r#""a\nb\tc\rd""#), Value::string("a\nb\tc\rd"));
    assert_eq!(literal(r#""say \"hi\"""#), Value::string("say \"hi\""));
    assert_eq!(literal(r"'it\'s'"), Value::string("it's"));
    assert_eq!(literal(r#""back\\slash""#), Value::string("back\\slash"));
}

#[test]
fn test_quotes_nest_across_styles() {
    assert_eq!(literal(r#"'say "hi"'"#), Value::string("say \"hi\""));
}

#[test]
fn test_unterminated_string() {
    let err = parse(r#""abc"#).unwrap_err();
    assert_eq!(err.kind, super::ParseErrorKind::UnterminatedString);
}

#[test]
fn test_invalid_escape() {
    let err = parse(r#""a\qb""#).unwrap_err();
    assert!(matches!(
        err.kind,
        super::ParseErrorKind::InvalidEscape { ch: 'q' }
    ));
}

#[test]
fn test_unicode_string_contents() {
    assert_eq!(literal("\"héllo ✓\""), Value::string("héllo ✓"));
}
