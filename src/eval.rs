//! Evaluator core: the recursive tree walk from [`ast::Expression`] /
//! [`ast::Statement`] to [`Value`].
//!
//! Mirrors the shape of the teacher's `eval_expr` dispatch (see
//! `EvalContext`/recursion-depth check in the teacher's wired `eval.rs`)
//! but threads a plain `Environment` instead of a `World`, since
//! Monkey's scoping is mutable-in-place rather than value-threaded.
//! Errors are propagated as `Value::Error`, never as Rust `Result` —
//! every call site that can produce one checks `is_error()` on its
//! operands before proceeding, exactly as the original Go evaluator
//! does with `isError`.

use crate::ast::{BlockStatement, Expression, Program, Statement};
use crate::builtins;
use crate::config::EvalConfig;
use crate::environment::Environment;
use crate::error;
use crate::value::{Function, HashPair, Value};
use im::{HashMap as ImHashMap, Vector};
use std::rc::Rc;
use tracing::{debug, trace};

/// Threaded through every recursive call so the depth guard doesn't
/// need a side channel.
struct Context<'a> {
    config: &'a EvalConfig,
    output: &'a mut dyn builtins::OutputSink,
    depth: usize,
}

impl<'a> Context<'a> {
    /// Guards both function-call depth and nested-expression recursion
    /// depth with a single counter, since both ultimately consume the
    /// same native Rust call stack.
    fn enter(&mut self) -> Option<Value> {
        self.depth += 1;
        debug!(depth = self.depth, limit = self.config.max_call_depth, "entering recursive evaluation");
        if self.depth > self.config.max_call_depth {
            Some(Value::error(error::recursion_limit_exceeded(
                self.config.max_call_depth,
            )))
        } else {
            None
        }
    }

    fn exit(&mut self) {
        self.depth -= 1;
    }
}

/// Evaluates a whole program against `env`, using `output` for `puts`
/// and `config` for resource limits.
///
/// At the program boundary a `ReturnValue` is unwrapped to its inner
/// value (a bare `return 5;` at top level yields `5`, not a wrapper) —
/// see spec.md's statement on program- vs. block-level return handling.
pub fn eval_program(
    program: &Program,
    env: &Environment,
    output: &mut dyn builtins::OutputSink,
    config: &EvalConfig,
) -> Value {
    let mut ctx = Context {
        config,
        output,
        depth: 0,
    };
    let mut result = Value::Null;
    for statement in &program.statements {
        result = eval_statement(statement, env, &mut ctx);
        match result {
            Value::ReturnValue(inner) => return *inner,
            Value::Error(_) => return result,
            _ => {}
        }
    }
    result
}

fn eval_statement(statement: &Statement, env: &Environment, ctx: &mut Context) -> Value {
    match statement {
        Statement::Let { name, value, .. } => {
            let value = eval_expression(value, env, ctx);
            if value.is_error() {
                return value;
            }
            env.set(name.name.clone(), value);
            Value::Null
        }
        Statement::Return { value, .. } => {
            let value = eval_expression(value, env, ctx);
            if value.is_error() {
                return value;
            }
            Value::ReturnValue(Box::new(value))
        }
        Statement::Expression { value, .. } => eval_expression(value, env, ctx),
    }
}

/// Evaluates a block's statements, stopping early on the first
/// `ReturnValue` or `Error` but leaving it *wrapped* — unlike
/// `eval_program`, a block doesn't know whether it's the outermost
/// scope, so unwrapping happens once, at the program boundary or at
/// `apply_function`'s call-site unwrap.
fn eval_block(block: &BlockStatement, env: &Environment, ctx: &mut Context) -> Value {
    let mut result = Value::Null;
    for statement in &block.statements {
        result = eval_statement(statement, env, ctx);
        if matches!(result, Value::ReturnValue(_) | Value::Error(_)) {
            return result;
        }
    }
    result
}

/// Entry point for every expression evaluation. Wrapped in the same
/// depth guard `apply_function` uses, so a deeply nested expression
/// with no function calls at all (nested parens, chained prefix `-`,
/// nested `if` conditions) is bounded exactly like deep recursive
/// function application — both ultimately recurse through Rust's
/// native call stack and need the same guard.
fn eval_expression(expr: &Expression, env: &Environment, ctx: &mut Context) -> Value {
    if let Some(limit_error) = ctx.enter() {
        return limit_error;
    }
    let result = eval_expression_inner(expr, env, ctx);
    ctx.exit();
    result
}

fn eval_expression_inner(expr: &Expression, env: &Environment, ctx: &mut Context) -> Value {
    match expr {
        Expression::IntegerLiteral { value, .. } => Value::Integer(*value),
        Expression::StringLiteral { value, .. } => Value::string(value.as_str()),
        Expression::BooleanLiteral { value, .. } => Value::Boolean(*value),
        Expression::Identifier(ident) => eval_identifier(&ident.name, env),
        Expression::Prefix {
            operator, right, ..
        } => {
            let right = eval_expression(right, env, ctx);
            if right.is_error() {
                return right;
            }
            eval_prefix(operator, &right)
        }
        Expression::Infix {
            left,
            operator,
            right,
            ..
        } => {
            let left = eval_expression(left, env, ctx);
            if left.is_error() {
                return left;
            }
            let right = eval_expression(right, env, ctx);
            if right.is_error() {
                return right;
            }
            eval_infix(operator, &left, &right)
        }
        Expression::If {
            condition,
            consequence,
            alternative,
            ..
        } => eval_if(condition, consequence, alternative.as_ref(), env, ctx),
        Expression::FunctionLiteral {
            parameters, body, ..
        } => Value::Function(Rc::new(Function {
            parameters: parameters.clone(),
            body: body.clone(),
            env: env.clone(),
        })),
        Expression::Call {
            function,
            arguments,
            ..
        } => eval_call(function, arguments, env, ctx),
        Expression::ArrayLiteral { elements, .. } => {
            match eval_expressions(elements, env, ctx) {
                Ok(items) => Value::Array(Vector::from(items)),
                Err(err) => err,
            }
        }
        Expression::Index { left, index, .. } => {
            let left = eval_expression(left, env, ctx);
            if left.is_error() {
                return left;
            }
            let index = eval_expression(index, env, ctx);
            if index.is_error() {
                return index;
            }
            eval_index(&left, &index)
        }
        Expression::HashLiteral { pairs, .. } => eval_hash_literal(pairs, env, ctx),
    }
}

fn eval_identifier(name: &str, env: &Environment) -> Value {
    if let Some(value) = env.get(name) {
        return value;
    }
    if let Some(builtin) = builtins::lookup(name) {
        return builtin;
    }
    Value::error(error::identifier_not_found(name))
}

fn eval_prefix(operator: &str, right: &Value) -> Value {
    match operator {
        "!" => Value::Boolean(!right.is_truthy()),
        "-" => match right {
            Value::Integer(n) => Value::Integer(-n),
            other => Value::error(error::unknown_prefix_operator("-", other.type_tag())),
        },
        other => Value::error(error::unknown_prefix_operator(other, right.type_tag())),
    }
}

fn eval_infix(operator: &str, left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => eval_integer_infix(operator, *a, *b),
        (Value::String(a), Value::String(b)) => eval_string_infix(operator, a, b),
        (Value::Boolean(a), Value::Boolean(b)) => match operator {
            "==" => Value::Boolean(a == b),
            "!=" => Value::Boolean(a != b),
            other => Value::error(error::unknown_infix_operator(
                left.type_tag(),
                other,
                right.type_tag(),
            )),
        },
        _ if left.type_tag() != right.type_tag() => Value::error(error::type_mismatch(
            left.type_tag(),
            operator,
            right.type_tag(),
        )),
        _ => Value::error(error::unknown_infix_operator(
            left.type_tag(),
            operator,
            right.type_tag(),
        )),
    }
}

fn eval_integer_infix(operator: &str, left: i64, right: i64) -> Value {
    match operator {
        "+" => Value::Integer(left + right),
        "-" => Value::Integer(left - right),
        "*" => Value::Integer(left * right),
        "/" => {
            if right == 0 {
                Value::error(error::division_by_zero())
            } else {
                Value::Integer(left / right)
            }
        }
        "<" => Value::Boolean(left < right),
        ">" => Value::Boolean(left > right),
        "==" => Value::Boolean(left == right),
        "!=" => Value::Boolean(left != right),
        other => Value::error(error::unknown_infix_operator("INTEGER", other, "INTEGER")),
    }
}

fn eval_string_infix(operator: &str, left: &str, right: &str) -> Value {
    match operator {
        "+" => Value::string(format!("{left}{right}")),
        "==" => Value::Boolean(left == right),
        "!=" => Value::Boolean(left != right),
        other => Value::error(error::unknown_infix_operator("STRING", other, "STRING")),
    }
}

fn eval_if(
    condition: &Expression,
    consequence: &BlockStatement,
    alternative: Option<&BlockStatement>,
    env: &Environment,
    ctx: &mut Context,
) -> Value {
    let condition = eval_expression(condition, env, ctx);
    if condition.is_error() {
        return condition;
    }
    if condition.is_truthy() {
        eval_block(consequence, env, ctx)
    } else if let Some(alternative) = alternative {
        eval_block(alternative, env, ctx)
    } else {
        Value::Null
    }
}

/// Evaluates a left-to-right argument/element list, short-circuiting
/// on the first error (spec: later arguments are never evaluated once
/// one has already failed).
fn eval_expressions(
    exprs: &[Expression],
    env: &Environment,
    ctx: &mut Context,
) -> Result<Vec<Value>, Value> {
    let mut values = Vec::with_capacity(exprs.len());
    for expr in exprs {
        let value = eval_expression(expr, env, ctx);
        if value.is_error() {
            return Err(value);
        }
        values.push(value);
    }
    Ok(values)
}

fn eval_call(
    function: &Expression,
    arguments: &[Expression],
    env: &Environment,
    ctx: &mut Context,
) -> Value {
    let function = eval_expression(function, env, ctx);
    if function.is_error() {
        return function;
    }
    let arguments = match eval_expressions(arguments, env, ctx) {
        Ok(args) => args,
        Err(err) => return err,
    };
    apply_function(&function, &arguments, ctx)
}

fn apply_function(function: &Value, arguments: &[Value], ctx: &mut Context) -> Value {
    if let Some(limit_error) = ctx.enter() {
        return limit_error;
    }
    let result = match function {
        Value::Function(function) => {
            trace!(
                params = function.parameters.len(),
                args = arguments.len(),
                "dispatching function call"
            );
            let call_env = extend_function_env(function, arguments);
            let evaluated = eval_block(&function.body, &call_env, ctx);
            unwrap_return_value(evaluated)
        }
        Value::Builtin(name, f) => {
            trace!(builtin = name, args = arguments.len(), "dispatching builtin call");
            f(arguments, ctx.output)
        }
        other => Value::error(error::not_callable(other.type_tag())),
    };
    ctx.exit();
    result
}

/// Binds parameters positionally in a fresh scope enclosing the
/// function's defining environment. Extra arguments are ignored and
/// missing ones are left unbound (looking them up yields "identifier
/// not found") — the original Go evaluator performs no arity check at
/// the call site, and this crate preserves that rather than tightening
/// it (see DESIGN.md).
fn extend_function_env(function: &Function, arguments: &[Value]) -> Environment {
    let call_env = Environment::enclosed(&function.env);
    for (parameter, argument) in function.parameters.iter().zip(arguments) {
        call_env.set(parameter.name.clone(), argument.clone());
    }
    call_env
}

fn unwrap_return_value(value: Value) -> Value {
    match value {
        Value::ReturnValue(inner) => *inner,
        other => other,
    }
}

fn eval_index(left: &Value, index: &Value) -> Value {
    match (left, index) {
        (Value::Array(items), Value::Integer(i)) => eval_array_index(items, *i),
        (Value::Hash(pairs), _) => eval_hash_index(pairs, index),
        _ => Value::error(error::unsupported_index_target(left.type_tag())),
    }
}

fn eval_array_index(items: &Vector<Value>, index: i64) -> Value {
    if index < 0 || index as usize >= items.len() {
        return Value::Null;
    }
    items.get(index as usize).cloned().unwrap_or(Value::Null)
}

fn eval_hash_index(pairs: &ImHashMap<crate::value::HashKey, HashPair>, index: &Value) -> Value {
    match index.hash_key() {
        Some(key) => pairs
            .get(&key)
            .map(|pair| pair.value.clone())
            .unwrap_or(Value::Null),
        None => Value::error(error::unusable_hash_key(index.type_tag())),
    }
}

fn eval_hash_literal(
    pairs: &[(Expression, Expression)],
    env: &Environment,
    ctx: &mut Context,
) -> Value {
    let mut map = ImHashMap::new();
    for (key_expr, value_expr) in pairs {
        let key = eval_expression(key_expr, env, ctx);
        if key.is_error() {
            return key;
        }
        let hash_key = match key.hash_key() {
            Some(hash_key) => hash_key,
            None => return Value::error(error::unusable_hash_key(key.type_tag())),
        };
        let value = eval_expression(value_expr, env, ctx);
        if value.is_error() {
            return value;
        }
        map.insert(hash_key, HashPair { key, value });
    }
    Value::Hash(map)
}
