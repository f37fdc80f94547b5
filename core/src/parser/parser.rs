//! Hand-written precedence-climbing parser.
//!
//! The parser is tokenless: it walks the input bytes directly, one function
//! per precedence level, lowest first:
//!
//! 1. ternary `?:`
//! 2. `||`
//! 3. `&&`
//! 4. `&`, `|^` (xor, tried before `|`), `|`
//! 5. `==` `!=` `>=` `<=` `>` `<`
//! 6. `<<` `>>`
//! 7. `+` `-`
//! 8. `*` `/` `%`
//! 9. `^`
//! 10. postfix `!` (never the first char of `!=`)
//! 11. prefix `-`, `not`, `~`
//! 12. primary
//!
//! All binary operators are left-associative, `^` included.

use crate::values::Value;

use super::error::{ParseError, ParseErrorKind};
use super::parsed_expr::{AccessKey, BinaryOp, Expr, PathStep, UnaryOp};

/// Nesting limit; deeper input fails cleanly instead of blowing the stack.
const MAX_DEPTH: usize = 200;

/// Parse an expression. The whole input must be consumed: a trailing
/// non-whitespace remainder is an error, not a silent truncation.
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    let mut parser = Parser {
        input,
        bytes: input.as_bytes(),
        pos: 0,
        depth: 0,
    };
    parser.skip_ws();
    if parser.at_end() {
        return Err(parser.err(ParseErrorKind::EmptyInput));
    }
    let expr = parser.parse_expr()?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(parser.err(ParseErrorKind::TrailingInput));
    }
    Ok(expr)
}

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    // ------------------------------------------------------------------
    // Cursor helpers
    // ------------------------------------------------------------------

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn starts_with(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    fn eat(&mut self, s: &str) -> bool {
        if self.starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    /// Match `word` only when it is not a prefix of a longer identifier.
    fn eat_keyword(&mut self, word: &str) -> bool {
        if self.starts_with(word)
            && !self
                .peek_at(word.len())
                .is_some_and(is_ident_char)
        {
            self.pos += word.len();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ') | Some(b'\t') | Some(b'\n')) {
            self.pos += 1;
        }
    }

    fn current_char(&self) -> char {
        self.input[self.pos..].chars().next().unwrap_or('\u{FFFD}')
    }

    fn err(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.input, self.pos)
    }

    fn err_at(&self, pos: usize, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.input, pos)
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.err(ParseErrorKind::MaxDepthExceeded {
                max_depth: MAX_DEPTH,
            }));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Precedence ladder
    // ------------------------------------------------------------------

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_ternary()
    }

    fn parse_ternary(&mut self) -> Result<Expr, ParseError> {
        self.enter()?;
        let result = self.parse_ternary_inner();
        self.depth -= 1;
        result
    }

    fn parse_ternary_inner(&mut self) -> Result<Expr, ParseError> {
        let cond = self.parse_or()?;
        self.skip_ws();
        if !self.eat("?") {
            return Ok(cond);
        }
        // Branches are full expressions; right-nesting comes from recursion.
        let then_branch = self.parse_ternary()?;
        self.skip_ws();
        if !self.eat(":") {
            return Err(self.err(ParseErrorKind::Expected {
                expected: "':' in ternary".to_string(),
            }));
        }
        let else_branch = self.parse_ternary()?;
        Ok(Expr::Ternary {
            cond: Box::new(cond),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        })
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        loop {
            self.skip_ws();
            if !self.eat("||") {
                return Ok(left);
            }
            let right = self.parse_and()?;
            left = bin(BinaryOp::Or, left, right);
        }
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_bitwise()?;
        loop {
            self.skip_ws();
            if !self.eat("&&") {
                return Ok(left);
            }
            let right = self.parse_bitwise()?;
            left = bin(BinaryOp::And, left, right);
        }
    }

    fn parse_bitwise(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison()?;
        loop {
            self.skip_ws();
            // `|^` before `|`; bare `&`/`|` must not steal from `&&`/`||`.
            let op = if self.eat("|^") {
                BinaryOp::BitXor
            } else if self.starts_with("&&") || self.starts_with("||") {
                return Ok(left);
            } else if self.eat("&") {
                BinaryOp::BitAnd
            } else if self.eat("|") {
                BinaryOp::BitOr
            } else {
                return Ok(left);
            };
            let right = self.parse_comparison()?;
            left = bin(op, left, right);
        }
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_shift()?;
        loop {
            self.skip_ws();
            // Multi-character comparisons before single-character ones.
            let op = if self.eat("==") {
                BinaryOp::Eq
            } else if self.eat("!=") {
                BinaryOp::Ne
            } else if self.eat(">=") {
                BinaryOp::Ge
            } else if self.eat("<=") {
                BinaryOp::Le
            } else if self.eat(">") {
                BinaryOp::Gt
            } else if self.eat("<") {
                BinaryOp::Lt
            } else {
                return Ok(left);
            };
            let right = self.parse_shift()?;
            left = bin(op, left, right);
        }
    }

    fn parse_shift(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;
        loop {
            self.skip_ws();
            let op = if self.eat("<<") {
                BinaryOp::Shl
            } else if self.eat(">>") {
                BinaryOp::Shr
            } else {
                return Ok(left);
            };
            let right = self.parse_additive()?;
            left = bin(op, left, right);
        }
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            self.skip_ws();
            let op = if self.eat("+") {
                BinaryOp::Add
            } else if self.eat("-") {
                BinaryOp::Sub
            } else {
                return Ok(left);
            };
            let right = self.parse_multiplicative()?;
            left = bin(op, left, right);
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_power()?;
        loop {
            self.skip_ws();
            let op = if self.eat("*") {
                BinaryOp::Mul
            } else if self.eat("/") {
                BinaryOp::Div
            } else if self.eat("%") {
                BinaryOp::Mod
            } else {
                return Ok(left);
            };
            let right = self.parse_power()?;
            left = bin(op, left, right);
        }
    }

    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        // Left-associative on purpose: 2^3^2 == (2^3)^2, spreadsheet style.
        let mut left = self.parse_postfix()?;
        loop {
            self.skip_ws();
            if !self.eat("^") {
                return Ok(left);
            }
            let right = self.parse_postfix()?;
            left = bin(BinaryOp::Pow, left, right);
        }
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_unary()?;
        loop {
            self.skip_ws();
            // `!` is factorial only when it is not the start of `!=`.
            if self.starts_with("!") && !self.starts_with("!=") {
                self.pos += 1;
                expr = Expr::Factorial(Box::new(expr));
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        self.enter()?;
        let result = self.parse_unary_inner();
        self.depth -= 1;
        result
    }

    fn parse_unary_inner(&mut self) -> Result<Expr, ParseError> {
        self.skip_ws();
        let op = if self.eat("-") {
            UnaryOp::Neg
        } else if self.eat("~") {
            UnaryOp::BNot
        } else if self.eat_keyword("not") {
            UnaryOp::Not
        } else {
            return self.parse_primary();
        };
        let operand = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    // ------------------------------------------------------------------
    // Primaries
    // ------------------------------------------------------------------

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        self.skip_ws();
        match self.peek() {
            None => Err(self.err(ParseErrorKind::UnexpectedEnd)),
            Some(b'(') => {
                let open_pos = self.pos;
                self.pos += 1;
                let expr = self.parse_expr()?;
                self.skip_ws();
                if !self.eat(")") {
                    return Err(self.close_error(open_pos, '('));
                }
                Ok(expr)
            }
            Some(b'\'') | Some(b'"') => self.parse_string(),
            Some(b) if b.is_ascii_digit() => self.parse_number(),
            Some(b'.') if self.peek_at(1).is_some_and(|b| b.is_ascii_digit()) => {
                self.parse_number()
            }
            Some(b) if is_ident_start(b) => {
                let ident = self.parse_ident();
                // Literal keywords; the maximal-munch identifier scan is the
                // lookahead guard (`trueish` is an identifier, not `true`).
                match ident.as_str() {
                    "true" => Ok(Expr::Literal(Value::Bool(true))),
                    "false" => Ok(Expr::Literal(Value::Bool(false))),
                    "null" => Ok(Expr::Literal(Value::Null)),
                    _ => self.parse_chain(ident),
                }
            }
            Some(_) => {
                let ch = self.current_char();
                Err(self.err(ParseErrorKind::UnexpectedChar { ch }))
            }
        }
    }

    fn parse_ident(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        self.input[start..self.pos].to_string()
    }

    fn parse_number(&mut self) -> Result<Expr, ParseError> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        let mut is_float = false;
        if self.peek() == Some(b'.') {
            let has_int_part = self.pos > start;
            let digit_after = self.peek_at(1).is_some_and(|b| b.is_ascii_digit());
            // `1.`, `1.5` and `.5` are floats; a missing fraction defaults to 0.
            if has_int_part || digit_after {
                is_float = true;
                self.pos += 1;
                while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
        }
        let text = &self.input[start..self.pos];
        let invalid = || ParseErrorKind::InvalidNumber {
            text: text.to_string(),
        };
        if is_float {
            text.parse::<f64>()
                .map(|f| Expr::Literal(Value::Float(f)))
                .map_err(|_| self.err_at(start, invalid()))
        } else {
            text.parse::<i64>()
                .map(|n| Expr::Literal(Value::Int(n)))
                .map_err(|_| self.err_at(start, invalid()))
        }
    }

    fn parse_string(&mut self) -> Result<Expr, ParseError> {
        let start = self.pos;
        let quote = self.bytes[self.pos];
        self.pos += 1;
        let mut out = String::new();
        loop {
            match self.peek() {
                None => return Err(self.err_at(start, ParseErrorKind::UnterminatedString)),
                Some(b'\\') => {
                    self.pos += 1;
                    let escaped = match self.peek() {
                        None => {
                            return Err(self.err_at(start, ParseErrorKind::UnterminatedString))
                        }
                        Some(b'\\') => '\\',
                        Some(b'n') => '\n',
                        Some(b't') => '\t',
                        Some(b'r') => '\r',
                        Some(b'"') => '"',
                        Some(b'\'') => '\'',
                        Some(_) => {
                            let ch = self.current_char();
                            return Err(self.err(ParseErrorKind::InvalidEscape { ch }));
                        }
                    };
                    out.push(escaped);
                    self.pos += 1;
                }
                Some(b) if b == quote => {
                    self.pos += 1;
                    return Ok(Expr::Literal(Value::string(out)));
                }
                Some(_) => {
                    let ch = self.current_char();
                    out.push(ch);
                    self.pos += ch.len_utf8();
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Accessor chains and spreads
    // ------------------------------------------------------------------

    /// Parse the accessor chain following an identifier: any sequence of
    /// `.name`, `[expr]`, `[*]`, `.(expr)` and, only as the very first
    /// step, a call `(args…)`.
    ///
    /// While a `[*]` spread is open, `.name` and `[expr]` steps accumulate
    /// into its tail instead of becoming `Access` nodes. The tail closes at
    /// the next `[*]` (which flattens the spread being closed), at a
    /// `.(expr)` body, or at the end of the chain.
    fn parse_chain(&mut self, name: String) -> Result<Expr, ParseError> {
        let mut expr = Expr::GetVar(name.clone());
        let mut first = true;
        let mut spread_tail: Option<Vec<PathStep>> = None;
        // Set when `expr` is a spread node this chain just closed, so that a
        // following `[*]` can set its `flatten` flag.
        let mut closed_spread = false;

        loop {
            self.skip_ws();
            if self.starts_with("(") {
                if !first {
                    return Err(self.err(ParseErrorKind::CallNotAtChainStart));
                }
                let args = self.parse_call_args()?;
                expr = Expr::Call {
                    name: name.clone(),
                    args,
                };
                first = false;
            } else if self.starts_with(".") {
                self.pos += 1;
                self.skip_ws();
                if self.starts_with("(") {
                    expr = self.parse_computed_body(expr, &mut spread_tail)?;
                    closed_spread = true;
                } else if self.peek().is_some_and(is_ident_start) {
                    let key = self.parse_ident();
                    match spread_tail.as_mut() {
                        Some(tail) => tail.push(PathStep::Key(key)),
                        None => {
                            expr = Expr::Access {
                                target: Box::new(expr),
                                key: AccessKey::Name(key),
                            };
                            closed_spread = false;
                        }
                    }
                } else {
                    return Err(self.err(ParseErrorKind::Expected {
                        expected: "property name after '.'".to_string(),
                    }));
                }
                first = false;
            } else if self.starts_with("[") {
                let open_pos = self.pos;
                self.pos += 1;
                self.skip_ws();
                if self.starts_with("*") {
                    let star_pos = self.pos;
                    self.pos += 1;
                    self.skip_ws();
                    if !self.eat("]") {
                        // `*` cannot start an index expression.
                        return Err(
                            self.err_at(star_pos, ParseErrorKind::UnexpectedChar { ch: '*' })
                        );
                    }
                    // Spread marker. A marker while a spread is already open
                    // (or right after one closed) flattens the outer spread.
                    if let Some(tail) = spread_tail.take() {
                        expr = Expr::Spread {
                            target: Box::new(expr),
                            tail,
                            flatten: true,
                        };
                    } else if closed_spread {
                        set_flatten(&mut expr);
                    }
                    spread_tail = Some(Vec::new());
                    closed_spread = false;
                } else {
                    let index = self.parse_expr()?;
                    self.skip_ws();
                    if !self.eat("]") {
                        return Err(self.close_error(open_pos, '['));
                    }
                    match spread_tail.as_mut() {
                        Some(tail) => tail.push(PathStep::Index(index)),
                        None => {
                            expr = Expr::Access {
                                target: Box::new(expr),
                                key: AccessKey::Expr(Box::new(index)),
                            };
                            closed_spread = false;
                        }
                    }
                }
                first = false;
            } else {
                break;
            }
        }

        if let Some(tail) = spread_tail {
            expr = Expr::Spread {
                target: Box::new(expr),
                tail,
                flatten: false,
            };
        }
        Ok(expr)
    }

    /// Parse `.(body)`, the computed-spread form. The accumulated spread
    /// tail (if any) becomes an inner per-element path before the body runs.
    fn parse_computed_body(
        &mut self,
        target: Expr,
        spread_tail: &mut Option<Vec<PathStep>>,
    ) -> Result<Expr, ParseError> {
        let Some(tail) = spread_tail.take() else {
            return Err(self.err(ParseErrorKind::ComputedBodyOutsideSpread));
        };
        let open_pos = self.pos;
        self.pos += 1;
        let body = self.parse_expr()?;
        self.skip_ws();
        if !self.eat(")") {
            return Err(self.close_error(open_pos, '('));
        }
        let target = if tail.is_empty() {
            target
        } else {
            Expr::Spread {
                target: Box::new(target),
                tail,
                flatten: false,
            }
        };
        Ok(Expr::ComputedSpread {
            target: Box::new(target),
            body: Box::new(body),
            flatten: false,
        })
    }

    fn parse_call_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let open_pos = self.pos;
        self.pos += 1;
        self.skip_ws();
        let mut args = Vec::new();
        if self.eat(")") {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            self.skip_ws();
            if self.eat(",") {
                continue;
            }
            if self.eat(")") {
                return Ok(args);
            }
            if self.at_end() {
                return Err(self.close_error(open_pos, '('));
            }
            return Err(self.err(ParseErrorKind::Expected {
                expected: "',' or ')' in argument list".to_string(),
            }));
        }
    }

    /// Error for a missing closing delimiter: points at the opener when the
    /// input ran out, at the offending character otherwise.
    fn close_error(&self, open_pos: usize, delimiter: char) -> ParseError {
        if self.at_end() {
            self.err_at(open_pos, ParseErrorKind::UnclosedDelimiter { delimiter })
        } else {
            let ch = self.current_char();
            self.err(ParseErrorKind::UnexpectedChar { ch })
        }
    }
}

fn bin(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn set_flatten(expr: &mut Expr) {
    match expr {
        Expr::Spread { flatten, .. } | Expr::ComputedSpread { flatten, .. } => *flatten = true,
        // Guarded by the caller: only reached when `expr` is a spread node.
        _ => {}
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
