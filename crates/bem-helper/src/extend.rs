//! Classic `extend()` merge over JSON values.
//!
//! Semantics:
//! - Target: records and sequences are merged into; anything else is
//!   replaced by an empty record first
//! - Patches: null patches are skipped; records contribute their entries,
//!   sequences their indices, strings their characters
//! - Shallow mode: every patch entry overwrites the target entry
//! - Deep mode: record and sequence entries are merged recursively into a
//!   matching target entry (or a fresh container), never aliased

use serde_json::{Map, Value};

use crate::property::{enumerable_entries, guarded_set, guarded_take};
use crate::shape::Shape;

/// Merge `patches` into `target` and return the result.
///
/// `None` and non-container targets start from `{}`. The target is consumed
/// and handed back, so a patch can never be the target it is merged into:
/// the self-reference case that needs an identity check in shared-object
/// models cannot arise here, and reference cycles cannot be built at all.
pub fn extend<'p, I>(deep: bool, target: Option<Value>, patches: I) -> Value
where
    I: IntoIterator<Item = &'p Value>,
{
    let mut target = match target {
        Some(value) if Shape::of(Some(&value)).is_container() => value,
        _ => Value::Object(Map::new()),
    };

    for patch in patches {
        if patch.is_null() {
            continue;
        }

        for (key, copy) in enumerable_entries(patch) {
            let copy_shape = Shape::of(Some(&*copy));

            if deep && copy_shape.is_container() {
                let src = guarded_take(&mut target, &key);
                let clone = match (copy_shape, src) {
                    (Shape::Sequence, Some(src @ Value::Array(_))) => src,
                    (Shape::Record, Some(src @ Value::Object(_))) => src,
                    (Shape::Sequence, _) => Value::Array(Vec::new()),
                    _ => Value::Object(Map::new()),
                };
                let merged = extend(true, Some(clone), [&*copy]);
                guarded_set(&mut target, &key, merged);
            } else {
                guarded_set(&mut target, &key, copy.into_owned());
            }
        }
    }

    target
}

/// Variadic form: `[deep], target, patches...`.
///
/// A leading boolean is the deep flag and the target follows it. Missing
/// targets default to `{}`. Never fails.
pub fn extend_args(args: &[Value]) -> Value {
    let (deep, rest) = match args.split_first() {
        Some((Value::Bool(deep), rest)) => (*deep, rest),
        _ => (false, args),
    };

    match rest.split_first() {
        Some((target, patches)) => extend(deep, Some(target.clone()), patches),
        None => Value::Object(Map::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shallow_overwrite() {
        let result = extend(false, Some(json!({"a": 1, "b": {"x": 1}})), [&json!({"b": {"y": 2}})]);
        assert_eq!(result, json!({"a": 1, "b": {"y": 2}}));
    }

    #[test]
    fn test_shallow_idempotent() {
        let patch = json!({"a": 1, "b": "two", "c": null});
        let once = extend(false, Some(json!({})), [&patch]);
        let twice = extend(false, Some(once.clone()), [&patch]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_deep_merge_records() {
        let target = json!({"cache": {"mode": "off", "spm": "off"}});
        let patch = json!({"cache": {"mode": "on"}});
        let result = extend(true, Some(target), [&patch]);
        assert_eq!(result, json!({"cache": {"mode": "on", "spm": "off"}}));
    }

    #[test]
    fn test_deep_merge_sequences_index_wise() {
        let target = json!({"list": [1, 2, 3]});
        let patch = json!({"list": [9]});
        let result = extend(true, Some(target), [&patch]);
        assert_eq!(result, json!({"list": [9, 2, 3]}));
    }

    #[test]
    fn test_deep_kind_mismatch_starts_fresh() {
        let target = json!({"a": [1, 2], "b": {"k": 1}});
        let patch = json!({"a": {"x": 1}, "b": [true]});
        let result = extend(true, Some(target), [&patch]);
        assert_eq!(result, json!({"a": {"x": 1}, "b": [true]}));
    }

    #[test]
    fn test_deep_does_not_alias_patch() {
        let patch = json!({"a": {"b": 1}});
        let mut result = extend(true, Some(json!({})), [&patch]);
        result["a"]["b"] = json!(2);
        assert_eq!(patch["a"]["b"], 1);
    }

    #[test]
    fn test_target_normalized() {
        assert_eq!(extend(false, None, [&json!({"x": 1})]), json!({"x": 1}));
        assert_eq!(extend(false, Some(Value::Null), [&json!({"x": 1})]), json!({"x": 1}));
        assert_eq!(extend(true, Some(json!(42)), [&json!({"x": 1})]), json!({"x": 1}));
        assert_eq!(extend(false, Some(json!("s")), [&json!({"x": 1})]), json!({"x": 1}));
    }

    #[test]
    fn test_null_patch_skipped_null_value_written() {
        let result = extend(false, Some(json!({"a": 1})), [&Value::Null, &json!({"a": null})]);
        assert_eq!(result, json!({"a": null}));
    }

    #[test]
    fn test_multiple_patches_in_order() {
        let result = extend(false, None, [&json!({"a": 1, "b": 1}), &json!({"b": 2}), &json!({"c": 3})]);
        assert_eq!(result, json!({"a": 1, "b": 2, "c": 3}));
    }

    #[test]
    fn test_string_patch_spreads_characters() {
        let result = extend(false, None, [&json!("ab")]);
        assert_eq!(result, json!({"0": "a", "1": "b"}));
    }

    #[test]
    fn test_proto_key_stays_data() {
        let patch: Value = serde_json::from_str(r#"{"__proto__": {"polluted": true}}"#).unwrap();
        let result = extend(true, Some(json!({})), [&patch]);

        assert_eq!(result.get("__proto__"), Some(&json!({"polluted": true})));
        assert!(result.get("polluted").is_none());
        assert!(json!({}).get("polluted").is_none());
    }

    #[test]
    fn test_self_snapshot_terminates() {
        let target = json!({"name": "root"});
        let patch = json!({"self": target.clone()});
        let result = extend(true, Some(target), [&patch]);
        assert_eq!(result, json!({"name": "root", "self": {"name": "root"}}));
    }

    #[test]
    fn test_args_deep_flag() {
        let args = vec![json!(true), json!({"a": {"x": 1}}), json!({"a": {"y": 2}})];
        assert_eq!(extend_args(&args), json!({"a": {"x": 1, "y": 2}}));

        let args = vec![json!({"a": {"x": 1}}), json!({"a": {"y": 2}})];
        assert_eq!(extend_args(&args), json!({"a": {"y": 2}}));
    }

    #[test]
    fn test_args_missing_target() {
        assert_eq!(extend_args(&[]), json!({}));
        assert_eq!(extend_args(&[json!(true)]), json!({}));
        assert_eq!(extend_args(&[json!(false), Value::Null, json!({"k": 1})]), json!({"k": 1}));
    }
}
