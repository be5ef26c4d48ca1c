//! RFC 7396 JSON Merge Patch, used to layer config files.

use serde_json::Value;

/// Apply `patch` on top of `target`.
///
/// Objects merge recursively, `null` deletes a key, and anything else in the
/// patch (arrays, scalars, type changes) replaces the target value outright.
pub fn merge_patch(target: Value, patch: Value) -> Value {
    let Value::Object(patch_map) = patch else {
        return patch;
    };
    let mut merged = match target {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    for (key, value) in patch_map {
        if value.is_null() {
            merged.remove(&key);
        } else {
            let base = merged.remove(&key).unwrap_or(Value::Null);
            merged.insert(key, merge_patch(base, value));
        }
    }
    Value::Object(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn nested_objects_merge() {
        let global = json!({"bigquery": {"max_bytes": 1, "timeout_secs": 30}});
        let local = json!({"bigquery": {"max_bytes": 2}});
        assert_eq!(
            merge_patch(global, local),
            json!({"bigquery": {"max_bytes": 2, "timeout_secs": 30}})
        );
    }

    #[test]
    fn null_deletes_nested_key() {
        let target = json!({"logging": {"level": "debug", "json": true}});
        let patch = json!({"logging": {"level": null}});
        assert_eq!(merge_patch(target, patch), json!({"logging": {"json": true}}));
    }

    #[test]
    fn arrays_and_scalars_replace() {
        assert_eq!(
            merge_patch(json!({"a": [1, 2, 3]}), json!({"a": [4]})),
            json!({"a": [4]})
        );
        assert_eq!(
            merge_patch(json!({"a": {"nested": true}}), json!({"a": 42})),
            json!({"a": 42})
        );
        assert_eq!(
            merge_patch(json!({"a": 42}), json!({"a": {"nested": true}})),
            json!({"a": {"nested": true}})
        );
    }

    #[test]
    fn object_patch_over_scalar_root() {
        assert_eq!(merge_patch(json!(7), json!({"a": 1})), json!({"a": 1}));
    }

    proptest! {
        #[test]
        fn prop_empty_patch_is_identity(target in arb_object(true)) {
            prop_assert_eq!(merge_patch(target.clone(), json!({})), target);
        }

        #[test]
        fn prop_idempotent_without_nulls(target in arb_object(true), patch in arb_object(false)) {
            let once = merge_patch(target, patch.clone());
            let twice = merge_patch(once.clone(), patch);
            prop_assert_eq!(once, twice);
        }
    }

    fn arb_object(allow_null: bool) -> impl Strategy<Value = Value> {
        prop::collection::hash_map("[a-z]{1,3}", arb_value(allow_null), 0..5)
            .prop_map(|m| Value::Object(m.into_iter().collect()))
    }

    fn arb_value(allow_null: bool) -> impl Strategy<Value = Value> {
        let leaf = arb_leaf(allow_null);
        leaf.prop_recursive(2, 8, 3, |inner| {
            prop::collection::hash_map("[a-z]{1,2}", inner, 0..3)
                .prop_map(|m| Value::Object(m.into_iter().collect()))
        })
    }

    fn arb_leaf(allow_null: bool) -> BoxedStrategy<Value> {
        let scalars = prop_oneof![
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| Value::Number(n.into())),
            "[a-z]{0,10}".prop_map(Value::String),
        ];
        if allow_null {
            prop_oneof![Just(Value::Null), scalars].boxed()
        } else {
            scalars.boxed()
        }
    }
}
