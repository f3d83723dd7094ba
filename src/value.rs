//! Runtime value model.
//!
//! `Value` is a closed, tagged sum — dispatch throughout the
//! evaluator is by variant match, never by virtual call. Arrays and
//! hashes use `im`'s persistent collections so `push`/`rest` can hand
//! back a "fresh" value cheaply via structural sharing while still
//! being observably independent of the value they were built from.

use crate::ast::{BlockStatement, Identifier};
use crate::environment::Environment;
use im::{HashMap as ImHashMap, Vector};
use rustc_hash::FxHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

pub type BuiltinFn = fn(&[Value], &mut dyn crate::builtins::OutputSink) -> Value;

#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    String(Rc<str>),
    Null,
    Array(Vector<Value>),
    Hash(ImHashMap<HashKey, HashPair>),
    Function(Rc<Function>),
    Builtin(&'static str, BuiltinFn),
    ReturnValue(Box<Value>),
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub env: Environment,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HashKey {
    type_tag: &'static str,
    bits: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub key: Value,
    pub value: Value,
}

impl Value {
    pub fn type_tag(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Boolean(_) => "BOOLEAN",
            Value::String(_) => "STRING",
            Value::Null => "NULL",
            Value::Array(_) => "ARRAY",
            Value::Hash(_) => "HASH",
            Value::Function(_) => "FUNCTION",
            Value::Builtin(..) => "BUILTIN",
            Value::ReturnValue(_) => "RETURN_VALUE",
            Value::Error(_) => "ERROR",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Boolean(false))
    }

    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Value::Integer(n) => Some(HashKey {
                type_tag: self.type_tag(),
                bits: *n as u64,
            }),
            Value::Boolean(b) => Some(HashKey {
                type_tag: self.type_tag(),
                bits: if *b { 1 } else { 0 },
            }),
            Value::String(s) => {
                let mut hasher = FxHasher::default();
                s.as_bytes().hash(&mut hasher);
                Some(HashKey {
                    type_tag: self.type_tag(),
                    bits: hasher.finish(),
                })
            }
            _ => None,
        }
    }

    pub fn inspect(&self) -> String {
        match self {
            Value::Integer(n) => n.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::String(s) => s.to_string(),
            Value::Null => "null".to_string(),
            Value::Array(items) => {
                let inner = items
                    .iter()
                    .map(Value::inspect)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{inner}]")
            }
            Value::Hash(pairs) => {
                let inner = pairs
                    .values()
                    .map(|pair| format!("{}: {}", pair.key.inspect(), pair.value.inspect()))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{{{inner}}}")
            }
            Value::Function(function) => {
                let params = function
                    .parameters
                    .iter()
                    .map(|p| p.name.clone())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("fn({params}) {{\n{}\n}}", function.body)
            }
            Value::Builtin(..) => "builtin function".to_string(),
            Value::ReturnValue(inner) => inner.inspect(),
            Value::Error(message) => format!("ERROR: {message}"),
        }
    }

    pub fn error(message: impl Into<String>) -> Value {
        Value::Error(message.into())
    }

    pub fn string(s: impl Into<Rc<str>>) -> Value {
        Value::String(s.into())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inspect())
    }
}

/// Structural equality. Functions compare by captured-closure
/// identity (closures created from the same literal at different
/// times are distinct values); builtins compare by name.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Hash(a), Value::Hash(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a, _), Value::Builtin(b, _)) => a == b,
            (Value::ReturnValue(a), Value::ReturnValue(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_inspects_as_decimal() {
        assert_eq!(Value::Integer(-42).inspect(), "-42");
    }

    #[test]
    fn array_inspects_with_comma_separation() {
        let arr = Value::Array(Vector::from(vec![Value::Integer(1), Value::Integer(2)]));
        assert_eq!(arr.inspect(), "[1, 2]");
    }

    #[test]
    fn error_inspects_with_prefix() {
        assert_eq!(Value::error("boom").inspect(), "ERROR: boom");
    }

    #[test]
    fn truthiness_matches_spec() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
        assert!(Value::Boolean(true).is_truthy());
        assert!(Value::Integer(0).is_truthy());
        assert!(Value::string("").is_truthy());
        assert!(Value::Array(Vector::new()).is_truthy());
    }

    #[test]
    fn same_content_strings_share_hash_key() {
        let a = Value::string("Hello World");
        let b = Value::string("Hello World");
        assert_eq!(a.hash_key(), b.hash_key());
    }

    #[test]
    fn distinct_content_strings_have_distinct_hash_keys() {
        let a = Value::string("Hello World");
        let b = Value::string("AHHHHHHHHHH");
        assert_ne!(a.hash_key(), b.hash_key());
    }

    #[test]
    fn hash_keys_do_not_alias_across_variants() {
        let int_one = Value::Integer(1);
        let bool_true = Value::Boolean(true);
        assert_ne!(int_one.hash_key(), bool_true.hash_key());
    }

    #[test]
    fn non_hashable_variants_have_no_hash_key() {
        assert_eq!(Value::Null.hash_key(), None);
        assert_eq!(Value::Array(Vector::new()).hash_key(), None);
    }

    #[test]
    fn structurally_identical_hashes_are_equal() {
        let mut a = ImHashMap::new();
        let key = Value::string("one").hash_key().unwrap();
        a.insert(
            key.clone(),
            HashPair {
                key: Value::string("one"),
                value: Value::Integer(1),
            },
        );
        let mut b = ImHashMap::new();
        b.insert(
            key,
            HashPair {
                key: Value::string("one"),
                value: Value::Integer(1),
            },
        );
        assert_eq!(Value::Hash(a), Value::Hash(b));
    }
}
