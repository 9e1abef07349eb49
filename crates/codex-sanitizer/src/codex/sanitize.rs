//! Strip private fields from codex items.
//!
//! Only top-level keys of each item are inspected; values (including nested
//! objects) pass through untouched. Items and surviving keys keep their input
//! order.

use serde_json::{Map, Value};

use super::{CodexDocument, SanitizeOptions, SanitizeReport};
use crate::error::{Result, SanitizeError, json_kind};

/// True when `key` names a private field under `prefix`.
pub fn is_private_key(key: &str, prefix: &str) -> bool {
    key.starts_with(prefix)
}

/// Drop private keys from one item, returning the kept map and how many keys
/// were removed.
pub fn sanitize_item(item: Map<String, Value>, prefix: &str) -> (Map<String, Value>, usize) {
    let before = item.len();
    let kept: Map<String, Value> = item
        .into_iter()
        .filter(|(k, _)| !is_private_key(k, prefix))
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}

/// Sanitize a parsed document. A missing `codex` key yields an empty list;
/// every other top-level key is discarded.
pub fn sanitize_document(
    doc: Value,
    options: &SanitizeOptions,
) -> Result<(CodexDocument, SanitizeReport)> {
    let mut root = match doc {
        Value::Object(m) => m,
        other => {
            return Err(SanitizeError::NotAnObject {
                found: json_kind(&other),
            });
        }
    };

    let items = match root.remove("codex") {
        None => {
            tracing::debug!("no 'codex' key in document; writing empty list");
            Vec::new()
        }
        Some(Value::Array(items)) => items,
        // An empty string or object iterates as nothing, same as an empty list.
        Some(Value::String(s)) if s.is_empty() => Vec::new(),
        Some(Value::Object(m)) if m.is_empty() => Vec::new(),
        Some(other) => {
            return Err(SanitizeError::CodexNotArray {
                found: json_kind(&other),
            });
        }
    };
    if !root.is_empty() {
        tracing::debug!(
            "ignoring top-level keys: {}",
            root.keys().cloned().collect::<Vec<_>>().join(", ")
        );
    }

    let mut report = SanitizeReport::default();
    let mut codex = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let map = match item {
            Value::Object(map) => map,
            other => {
                return Err(SanitizeError::ItemNotObject {
                    index,
                    found: json_kind(&other),
                });
            }
        };
        let (kept, removed) = sanitize_item(map, &options.private_prefix);
        if removed > 0 {
            tracing::trace!("item {}: removed {} private field(s)", index, removed);
        }
        report.removed_fields += removed;
        codex.push(kept);
    }
    report.items = codex.len();

    Ok((CodexDocument { codex }, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn run(doc: Value) -> (CodexDocument, SanitizeReport) {
        sanitize_document(doc, &SanitizeOptions::default()).expect("sanitize ok")
    }

    fn as_value(doc: &CodexDocument) -> Value {
        serde_json::to_value(doc).unwrap()
    }

    #[test]
    fn strips_underscore_keys_per_item() {
        let (doc, report) = run(json!({"codex": [{"a": 1, "_b": 2}, {"_x": "y", "c": 3}]}));
        assert_eq!(as_value(&doc), json!({"codex": [{"a": 1}, {"c": 3}]}));
        assert_eq!(
            report,
            SanitizeReport {
                items: 2,
                removed_fields: 2
            }
        );
    }

    #[test]
    fn empty_and_missing_codex_yield_empty_list() {
        let (doc, _) = run(json!({"codex": []}));
        assert_eq!(as_value(&doc), json!({"codex": []}));

        let (doc, report) = run(json!({"meta": {"exported": "today"}}));
        assert_eq!(as_value(&doc), json!({"codex": []}));
        assert_eq!(report.items, 0);
    }

    #[test]
    fn empty_string_or_object_codex_is_an_empty_list() {
        for codex in [json!(""), json!({})] {
            let (doc, report) = run(json!({ "codex": codex }));
            assert_eq!(as_value(&doc), json!({"codex": []}));
            assert_eq!(report.items, 0);
        }
    }

    #[test]
    fn nested_values_are_left_alone() {
        let (doc, _) = run(json!({"codex": [{"body": {"_inner": true}, "_id": 7, "tags": ["_x"]}]}));
        assert_eq!(
            as_value(&doc),
            json!({"codex": [{"body": {"_inner": true}, "tags": ["_x"]}]})
        );
    }

    #[test]
    fn surviving_keys_keep_input_order() {
        let doc: Value =
            serde_json::from_str(r#"{"codex": [{"zeta": 1, "_p": 0, "alpha": 2, "mid": 3}]}"#)
                .unwrap();
        let (doc, _) = run(doc);
        let keys: Vec<&str> = doc.codex[0].keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn custom_prefix_is_honoured() {
        let opts = SanitizeOptions {
            private_prefix: "x-".to_string(),
            ..Default::default()
        };
        let (doc, report) =
            sanitize_document(json!({"codex": [{"x-secret": 1, "_kept": 2, "x": 3}]}), &opts)
                .expect("sanitize ok");
        assert_eq!(as_value(&doc), json!({"codex": [{"_kept": 2, "x": 3}]}));
        assert_eq!(report.removed_fields, 1);
    }

    #[test]
    fn rejects_malformed_shapes() {
        let opts = SanitizeOptions::default();
        assert!(matches!(
            sanitize_document(json!([1, 2]), &opts),
            Err(SanitizeError::NotAnObject { found: "array" })
        ));
        assert!(matches!(
            sanitize_document(json!({"codex": null}), &opts),
            Err(SanitizeError::CodexNotArray { found: "null" })
        ));
        assert!(matches!(
            sanitize_document(json!({"codex": "abc"}), &opts),
            Err(SanitizeError::CodexNotArray { found: "string" })
        ));
        assert!(matches!(
            sanitize_document(json!({"codex": {"a": {}}}), &opts),
            Err(SanitizeError::CodexNotArray { found: "object" })
        ));
        assert!(matches!(
            sanitize_document(json!({"codex": [{"a": 1}, "oops"]}), &opts),
            Err(SanitizeError::ItemNotObject {
                index: 1,
                found: "string"
            })
        ));
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            (-1.0e12f64..1.0e12).prop_map(Value::from),
            "[a-z_ ]{0,8}".prop_map(Value::from),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
                prop::collection::vec(("_?[a-z]{1,4}", inner), 0..4)
                    .prop_map(|pairs| Value::Object(pairs.into_iter().collect())),
            ]
        })
    }

    fn arb_item() -> impl Strategy<Value = Map<String, Value>> {
        prop::collection::vec(("_?[a-z]{1,6}", arb_value()), 0..6)
            .prop_map(|pairs| pairs.into_iter().collect())
    }

    proptest! {
        #[test]
        fn keeps_item_count_order_and_public_keys(items in prop::collection::vec(arb_item(), 0..8)) {
            let (doc, report) = run(json!({ "codex": items.clone() }));
            prop_assert_eq!(doc.codex.len(), items.len());
            prop_assert_eq!(report.items, items.len());
            for (input, output) in items.iter().zip(doc.codex.iter()) {
                let expected: Vec<&String> = input.keys().filter(|k| !k.starts_with('_')).collect();
                let actual: Vec<&String> = output.keys().collect();
                prop_assert_eq!(expected, actual);
                for (k, v) in output {
                    prop_assert_eq!(Some(v), input.get(k));
                }
            }
        }

        #[test]
        fn sanitizing_twice_changes_nothing(items in prop::collection::vec(arb_item(), 0..8)) {
            let (once, _) = run(json!({ "codex": items }));
            let (twice, report) = run(as_value(&once));
            prop_assert_eq!(report.removed_fields, 0);
            prop_assert_eq!(as_value(&once), as_value(&twice));
        }
    }
}
