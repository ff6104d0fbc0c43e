//! Merge helper properties
//!
//! Behaviour template code relies on when extending config fragments.

use bem_helper::{append, extend, extend_args, guarded_get, push, HelperNamespace, PROTO_KEY};
use serde_json::{json, Value};

#[test]
fn test_shallow_merge_idempotent() {
    let patch = json!({"block": "button", "mods": null, "size": 3, "disabled": false});

    let once = extend(false, Some(json!({})), [&patch]);
    let twice = extend(false, Some(extend(false, Some(json!({})), [&patch])), [&patch]);

    assert_eq!(once, twice);
    assert_eq!(once, patch);
}

#[test]
fn test_deep_result_does_not_alias_patch() {
    let patch = json!({"a": {"b": 1}});
    let mut result = extend_args(&[json!(true), json!({}), patch.clone()]);

    result["a"]["b"] = json!(100);
    result["a"]["c"] = json!("new");

    assert_eq!(patch, json!({"a": {"b": 1}}));
}

#[test]
fn test_proto_key_from_untrusted_json() {
    let untrusted: Value = serde_json::from_str(r#"{"__proto__": {"polluted": true}}"#).unwrap();

    let result = extend(false, Some(json!({})), [&untrusted]);
    assert_eq!(guarded_get(&result, PROTO_KEY), Some(&json!({"polluted": true})));

    let deep = extend(true, Some(json!({})), [&untrusted]);
    assert_eq!(deep, result);

    // Fresh records are unaffected
    let fresh = json!({});
    assert!(fresh.get("polluted").is_none());
    assert!(guarded_get(&fresh, PROTO_KEY).is_none());
}

#[test]
fn test_append_normalizes_scalar_targets() {
    assert_eq!(append(Some(Value::Null), &json!({"x": 1})), json!({"x": 1}));
    assert_eq!(append(Some(json!(42)), &json!({"x": 1})), json!({"x": 1}));
}

#[test]
fn test_append_over_sequence() {
    assert_eq!(
        append(Some(json!([{"a": 1}, {"a": 2}])), &json!({"b": 0})),
        json!([{"a": 1, "b": 0}, {"a": 2, "b": 0}])
    );
}

#[test]
fn test_push_shapes() {
    assert_eq!(push(None, json!("x")), vec![json!("x")]);
    assert_eq!(push(Some(json!({"a": 1})), json!({"b": 2})), vec![json!({"a": 1}), json!({"b": 2})]);
    assert_eq!(push(Some(json!([1, 2])), json!(3)), vec![json!(1), json!(2), json!(3)]);
}

#[test]
fn test_self_snapshot_merge_terminates() {
    let target = json!({"block": "page", "content": [{"block": "header"}]});
    let args = vec![json!(true), target.clone(), json!({"self": target.clone()})];

    let result = extend_args(&args);

    assert_eq!(result["self"], target);
    assert_eq!(result["block"], "page");
}

#[test]
fn test_namespace_matches_free_functions() {
    let ns = HelperNamespace::new();

    let target = json!([{"elem": "item"}, {"elem": "item"}]);
    let patch = json!({"mix": {"block": "menu"}});
    assert_eq!(
        ns.call("append", &[target.clone(), patch.clone()]).unwrap(),
        append(Some(target), &patch)
    );

    assert_eq!(
        ns.call("push", &[json!({"a": 1}), json!({"b": 2})]).unwrap(),
        json!([{"a": 1}, {"b": 2}])
    );
}
