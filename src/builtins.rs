//! Built-ins registry: the name→native-function table consulted on an
//! `Environment` miss (see the evaluator core's identifier rule).
//!
//! Process-wide and read-only after construction, mirroring the
//! teacher's `AtomRegistry` / `OutputSink` split — `puts` is the only
//! builtin with an external side effect, and it goes through the
//! injected sink rather than writing to stdout directly, so evaluation
//! stays testable without capturing real process output.

use crate::error;
use crate::value::{BuiltinFn, Value};
use im::Vector;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Destination for `puts` output.
pub trait OutputSink {
    fn emit(&mut self, text: &str);
}

/// Writes each line to the process's standard output.
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&mut self, text: &str) {
        println!("{text}");
    }
}

/// Discards everything written to it; useful for tests and
/// embeddings that don't care about `puts` output.
#[derive(Default)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn emit(&mut self, _text: &str) {}
}

/// Captures lines in-memory, for assertions in tests.
#[derive(Default)]
pub struct VecSink {
    pub lines: Vec<String>,
}

impl OutputSink for VecSink {
    fn emit(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }
}

static REGISTRY: Lazy<HashMap<&'static str, BuiltinFn>> = Lazy::new(|| {
    let mut map: HashMap<&'static str, BuiltinFn> = HashMap::new();
    map.insert("len", builtin_len);
    map.insert("first", builtin_first);
    map.insert("last", builtin_last);
    map.insert("rest", builtin_rest);
    map.insert("push", builtin_push);
    map.insert("puts", builtin_puts);
    map
});

/// Looks up a builtin by name, returning the `Value::Builtin` wrapper
/// the evaluator installs for call sites.
pub fn lookup(name: &str) -> Option<Value> {
    REGISTRY.get(name).map(|f| Value::Builtin(name, *f))
}

fn builtin_len(args: &[Value], _out: &mut dyn OutputSink) -> Value {
    if args.len() != 1 {
        return Value::error(error::arity_error(args.len(), 1));
    }
    match &args[0] {
        Value::String(s) => Value::Integer(s.len() as i64),
        Value::Array(items) => Value::Integer(items.len() as i64),
        other => Value::error(error::builtin_domain_error("len", other.type_tag())),
    }
}

fn builtin_first(args: &[Value], _out: &mut dyn OutputSink) -> Value {
    if args.len() != 1 {
        return Value::error(error::arity_error(args.len(), 1));
    }
    match &args[0] {
        Value::Array(items) => items.front().cloned().unwrap_or(Value::Null),
        other => Value::error(error::builtin_domain_error("first", other.type_tag())),
    }
}

fn builtin_last(args: &[Value], _out: &mut dyn OutputSink) -> Value {
    if args.len() != 1 {
        return Value::error(error::arity_error(args.len(), 1));
    }
    match &args[0] {
        Value::Array(items) => items.back().cloned().unwrap_or(Value::Null),
        other => Value::error(error::builtin_domain_error("last", other.type_tag())),
    }
}

fn builtin_rest(args: &[Value], _out: &mut dyn OutputSink) -> Value {
    if args.len() != 1 {
        return Value::error(error::arity_error(args.len(), 1));
    }
    match &args[0] {
        Value::Array(items) => {
            if items.is_empty() {
                Value::Null
            } else {
                let mut rest = items.clone();
                rest.pop_front();
                Value::Array(rest)
            }
        }
        other => Value::error(error::builtin_domain_error("rest", other.type_tag())),
    }
}

fn builtin_push(args: &[Value], _out: &mut dyn OutputSink) -> Value {
    if args.len() != 2 {
        return Value::error(error::arity_error(args.len(), 2));
    }
    match &args[0] {
        Value::Array(items) => {
            let mut next: Vector<Value> = items.clone();
            next.push_back(args[1].clone());
            Value::Array(next)
        }
        other => Value::error(error::builtin_domain_error("push", other.type_tag())),
    }
}

fn builtin_puts(args: &[Value], out: &mut dyn OutputSink) -> Value {
    for arg in args {
        out.emit(&arg.inspect());
    }
    Value::Null
}
