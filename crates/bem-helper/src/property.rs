//! Guarded property access on records and sequences.
//!
//! Records are `serde_json::Map`s, which reserve no keys: `__proto__` is an
//! ordinary string key there and can only ever be read back if it was
//! written as an own entry. Sequences are addressed by canonical decimal
//! indices ("0", "1", ...); any other key has no slot in a sequence.

use serde_json::Value;
use std::borrow::Cow;

/// Key that denotes an object's prototype link in dynamic object models.
pub const PROTO_KEY: &str = "__proto__";

/// Widest run of null holes a single indexed write may open in a sequence.
pub const MAX_SEQUENCE_HOLE: usize = 4096;

/// Parse a canonical sequence index ("0", "17", but not "01", "-1" or "1.0").
pub fn parse_index(key: &str) -> Option<usize> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    key.parse().ok()
}

/// Read `key` from `container`.
///
/// Returns `None` for missing keys, for `__proto__` unless it is an own
/// entry, and for any key on a scalar.
pub fn guarded_get<'a>(container: &'a Value, key: &str) -> Option<&'a Value> {
    match container {
        Value::Object(map) => map.get(key),
        Value::Array(items) => parse_index(key).and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Write `value` under `key` on `container`.
///
/// On records every key, `__proto__` included, becomes an enumerable own
/// entry. On sequences only index keys are written; writing past the end
/// pads with nulls up to [`MAX_SEQUENCE_HOLE`]. Writes to scalars are
/// ignored.
pub fn guarded_set(container: &mut Value, key: &str, value: Value) {
    match container {
        Value::Object(map) => {
            map.insert(key.to_string(), value);
        }
        Value::Array(items) => {
            let Some(index) = parse_index(key) else {
                return;
            };
            if index < items.len() {
                items[index] = value;
            } else if index - items.len() <= MAX_SEQUENCE_HOLE {
                items.resize(index, Value::Null);
                items.push(value);
            }
        }
        _ => {}
    }
}

/// Move the value at `key` out of `container`, leaving the slot to be
/// rewritten by [`guarded_set`].
pub(crate) fn guarded_take(container: &mut Value, key: &str) -> Option<Value> {
    match container {
        Value::Object(map) => map.remove(key),
        Value::Array(items) => parse_index(key)
            .and_then(|i| items.get_mut(i))
            .map(Value::take),
        _ => None,
    }
}

/// Enumerate the keys a patch contributes, in iteration order.
///
/// Records yield their entries, sequences their indices and strings one
/// entry per character. Numbers, booleans and null contribute nothing.
/// There is no inherited key set to walk: only own entries exist.
pub fn enumerable_entries(patch: &Value) -> Vec<(String, Cow<'_, Value>)> {
    match patch {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (k.clone(), Cow::Borrowed(v)))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), Cow::Borrowed(v)))
            .collect(),
        Value::String(s) => s
            .chars()
            .enumerate()
            .map(|(i, c)| (i.to_string(), Cow::Owned(Value::String(c.to_string()))))
            .collect(),
        _ => Vec::new(),
    }
}
