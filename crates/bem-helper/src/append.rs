//! Extension helpers for config fragments held as a record or a list.

use serde_json::{Map, Value};

use crate::extend::extend;
use crate::shape::Shape;

/// Add `patch` to an existing record, or to every record of a sequence.
///
/// Anything that is neither a record nor a sequence is replaced by `{}`.
/// Sequence elements are merged shallowly in place; non-record elements are
/// replaced by a copy of the patch entries.
pub fn append(target: Option<Value>, patch: &Value) -> Value {
    match target {
        Some(Value::Array(items)) => Value::Array(
            items
                .into_iter()
                .map(|item| extend(false, Some(item), [patch]))
                .collect(),
        ),
        Some(record @ Value::Object(_)) => extend(false, Some(record), [patch]),
        _ => extend(false, Some(Value::Object(Map::new())), [patch]),
    }
}

/// Append `patch` as the last element of a sequence.
///
/// An absent target starts a new sequence, a record becomes the first
/// element, and any other non-sequence is discarded. The patch is added as
/// is, without merging.
pub fn push(target: Option<Value>, patch: Value) -> Vec<Value> {
    let mut items = match target {
        Some(Value::Array(items)) => items,
        Some(record) if Shape::of(Some(&record)) == Shape::Record => vec![record],
        _ => Vec::new(),
    };
    items.push(patch);
    items
}
