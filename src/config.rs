//! Evaluator configuration.
//!
//! Plays the role the teacher's `EvalOptions` does: a small bag of
//! knobs threaded through every evaluation. `serde`-derived so an
//! embedding application can load it from its own config format.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Guards recursive evaluation (nested expressions and function
    /// calls). Not part of Monkey's language semantics — spec.md is
    /// silent on stack limits — but an evaluator embedded in a host
    /// process cannot let arbitrary user input blow the native stack,
    /// so exceeding this turns into a `Value::Error` rather than a
    /// panic.
    pub max_call_depth: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_call_depth: 1_000,
        }
    }
}

impl EvalConfig {
    /// Loads a config from a JSON document, for embedders that keep
    /// their settings alongside other JSON configuration.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
