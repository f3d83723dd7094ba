//! Error construction.
//!
//! Two channels, kept deliberately separate:
//!
//! - [`ParseError`]: a Rust-level `Result` error for the lexer/parser
//!   front end. Parsing happens before any `Environment` or `Value`
//!   exists, so there is nothing to carry a failure *in* — it has to
//!   be a normal error return.
//! - The message-building helpers below: construct the text for a
//!   [`crate::value::Value::Error`], the evaluator's own in-language
//!   error representation (spec: errors are values, not exceptions).
//!   Every evaluator call site that can fail builds its message
//!   through one of these, so the wording in spec.md stays bit-exact
//!   in exactly one place.

use crate::ast::Span;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected character {ch:?} at byte {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("unterminated string literal starting at byte {pos}")]
    UnterminatedString { pos: usize },

    #[error("expected {expected}, got {got} at {span:?}")]
    UnexpectedToken {
        expected: String,
        got: String,
        span: Span,
    },

    #[error("no prefix parse function for {token} at {span:?}")]
    NoPrefixParseFn { token: String, span: Span },

    #[error("expected next token to be {expected}, got {got} instead at {span:?}")]
    ExpectedToken {
        expected: String,
        got: String,
        span: Span,
    },
}

pub fn type_mismatch(left_tag: &str, operator: &str, right_tag: &str) -> String {
    format!("type mismatch: {left_tag} {operator} {right_tag}")
}

pub fn unknown_prefix_operator(operator: &str, right_tag: &str) -> String {
    format!("unknown operator: {operator}{right_tag}")
}

pub fn unknown_infix_operator(left_tag: &str, operator: &str, right_tag: &str) -> String {
    format!("unknown operator: {left_tag} {operator} {right_tag}")
}

pub fn unusable_hash_key(tag: &str) -> String {
    format!("unusable type given as hash key: {tag}")
}

pub fn identifier_not_found(name: &str) -> String {
    format!("identifier not found: {name}")
}

pub fn not_callable(tag: &str) -> String {
    format!("not a function: {tag}")
}

pub fn unsupported_index_target(tag: &str) -> String {
    format!("index operator not supported for type: {tag}")
}

pub fn builtin_domain_error(name: &str, got_tag: &str) -> String {
    format!("argument type given to `{name}` not supported, got={got_tag}")
}

pub fn arity_error(got: usize, expected: impl std::fmt::Display) -> String {
    format!("wrong number of arguments. got={got}, expected={expected}")
}

pub fn recursion_limit_exceeded(limit: usize) -> String {
    format!("recursion limit exceeded: max call depth {limit}")
}

pub fn division_by_zero() -> String {
    "division by zero".to_string()
}
