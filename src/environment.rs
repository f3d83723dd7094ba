//! Lexically nested name→value bindings.
//!
//! Mirrors the teacher's `World`: a small wrapper around a persistent
//! map, cheap to clone and share. Unlike `World`, `Environment` is not
//! threaded through every evaluation step and returned anew — Monkey's
//! scoping is genuinely mutable-in-place lexical scope (`let` inside a
//! function body must be visible to later statements in the same
//! block), so the inner map sits behind `Rc<RefCell<_>>` and `set`
//! mutates it directly. The outer link is what makes closures work:
//! a `Function` captures the `Environment` live at the time its
//! literal was evaluated (see the evaluator core), and looking up a
//! name walks outward through that chain on a local miss.

use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct Environment {
    inner: Rc<RefCell<Inner>>,
}

#[derive(Debug)]
struct Inner {
    store: HashMap<String, Value>,
    outer: Option<Environment>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                store: HashMap::new(),
                outer: None,
            })),
        }
    }

    pub fn enclosed(outer: &Environment) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                store: HashMap::new(),
                outer: Some(outer.clone()),
            })),
        }
    }

    /// Searches the current frame, then walks outward on a miss.
    pub fn get(&self, name: &str) -> Option<Value> {
        let inner = self.inner.borrow();
        if let Some(value) = inner.store.get(name) {
            return Some(value.clone());
        }
        inner.outer.as_ref().and_then(|outer| outer.get(name))
    }

    /// Always writes into the current frame; shadows silently.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.inner.borrow_mut().store.insert(name.into(), value);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Environment {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}
