//! Named helper table exposed to compiled templates.
//!
//! Templates call helpers by name with positional JSON arguments. Missing
//! arguments read as absent values, so a call never fails on argument shape;
//! only an unknown name is an error.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::append::{append, push};
use crate::extend::extend_args;
use crate::shape::{is_array, is_plain_object};

/// Signature shared by every helper entry point.
pub type HelperFn = fn(&[Value]) -> Value;

/// Errors raised when dispatching a helper call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HelperError {
    #[error("unknown helper: {0}")]
    UnknownHelper(String),

    #[error("helper already registered: {0}")]
    AlreadyRegistered(String),
}

/// Helper table keyed by the name templates use.
#[derive(Clone)]
pub struct HelperNamespace {
    helpers: BTreeMap<String, HelperFn>,
}

impl fmt::Debug for HelperNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.helpers.keys()).finish()
    }
}

impl Default for HelperNamespace {
    fn default() -> Self {
        let mut helpers: BTreeMap<String, HelperFn> = BTreeMap::new();
        helpers.insert("append".to_string(), call_append);
        helpers.insert("push".to_string(), call_push);
        helpers.insert("isPlainObject".to_string(), call_is_plain_object);
        helpers.insert("isArray".to_string(), call_is_array);
        helpers.insert("extend".to_string(), extend_args);
        Self { helpers }
    }
}

impl HelperNamespace {
    /// Namespace with the built-in helpers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a project-specific helper. Built-in names cannot be replaced.
    pub fn register(&mut self, name: &str, helper: HelperFn) -> Result<(), HelperError> {
        if self.helpers.contains_key(name) {
            return Err(HelperError::AlreadyRegistered(name.to_string()));
        }
        self.helpers.insert(name.to_string(), helper);
        Ok(())
    }

    /// Invoke the helper registered under `name`.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, HelperError> {
        let helper = self
            .helpers
            .get(name)
            .ok_or_else(|| HelperError::UnknownHelper(name.to_string()))?;
        Ok(helper(args))
    }

    /// Registered helper names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.helpers.keys().map(String::as_str)
    }
}

fn call_append(args: &[Value]) -> Value {
    let patch = args.get(1).cloned().unwrap_or(Value::Null);
    append(args.first().cloned(), &patch)
}

fn call_push(args: &[Value]) -> Value {
    let patch = args.get(1).cloned().unwrap_or(Value::Null);
    Value::Array(push(args.first().cloned(), patch))
}

fn call_is_plain_object(args: &[Value]) -> Value {
    Value::Bool(args.first().is_some_and(is_plain_object))
}

fn call_is_array(args: &[Value]) -> Value {
    Value::Bool(args.first().is_some_and(is_array))
}
