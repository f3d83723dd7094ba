//! Tree-walking evaluator for the Monkey programming language.
//!
//! The pieces: [`lexer`] and [`parser`] turn source text into an
//! [`ast::Program`]; [`value`] defines the runtime value model;
//! [`environment`] provides lexical scoping; [`builtins`] is the
//! native-function registry; [`eval`] walks the tree. [`eval_source`]
//! wires all of it together for callers that just want to run a
//! program end to end.

pub mod ast;
pub mod builtins;
pub mod config;
pub mod environment;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod value;

use builtins::OutputSink;
use config::EvalConfig;
use environment::Environment;
use error::ParseError;
use value::Value;

/// Parses and evaluates `source` against `env`, writing any `puts`
/// output to `output`. Returns the evaluator's result value — which
/// may itself be a `Value::Error` — or a `ParseError` if `source`
/// isn't well-formed Monkey.
pub fn eval_source(
    source: &str,
    env: &Environment,
    output: &mut dyn OutputSink,
    config: &EvalConfig,
) -> Result<Value, ParseError> {
    let program = parser::parse(source)?;
    Ok(eval::eval_program(&program, env, output, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::NullSink;

    #[test]
    fn eval_source_runs_a_program_end_to_end() {
        let env = Environment::new();
        let result = eval_source(
            "let x = 5; x * 2;",
            &env,
            &mut NullSink,
            &EvalConfig::default(),
        )
        .unwrap();
        assert_eq!(result, Value::Integer(10));
    }

    #[test]
    fn eval_source_surfaces_parse_errors() {
        let env = Environment::new();
        let result = eval_source("let x = ;", &env, &mut NullSink, &EvalConfig::default());
        assert!(result.is_err());
    }
}
