use serde_json::{json, Map, Value};

use crate::models::{AnnotationShape, AnnotationTarget};

/// JSON truthiness as the legacy persisted data relied on it: null, false,
/// zero, and the empty string are falsy; everything else (including arrays
/// and objects) is truthy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Read a flat string field off the record, defaulting to "" when the field
/// is absent or not a string
fn str_field(record: &Value, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

/// Classify an annotation record by its nested `target.query` discriminant
///
/// A record is Current if and only if `target` is truthy AND `target.query`
/// is truthy. Anything else needs migration: Legacy when a truthy `target`
/// exists (its sub-fields survive migration), Empty otherwise.
pub fn classify(annotation: &Value) -> AnnotationShape {
    match annotation.get("target") {
        Some(target) if is_truthy(target) => match target.get("query") {
            Some(query) if is_truthy(query) => AnnotationShape::Current,
            _ => AnnotationShape::Legacy,
        },
        _ => AnnotationShape::Empty,
    }
}

/// Build the current-shape target from a legacy annotation record
///
/// Flat fields (`query`, the four column bindings, `name`) are read off the
/// top-level record; the four sub-fields (`limit`, `matchAny`, `tags`,
/// `type`) come from the existing `target` object when one is present.
/// Absent or wrong-typed values default. `queryType` and `fromAnnotations`
/// are forced, never read from legacy data.
pub fn migrate_legacy_annotation(annotation: &Value) -> AnnotationTarget {
    let legacy = annotation.get("target").filter(|t| is_truthy(t));

    AnnotationTarget {
        query: str_field(annotation, "query"),
        tags_column: str_field(annotation, "tagsColumn"),
        text_column: str_field(annotation, "textColumn"),
        time_end_column: str_field(annotation, "timeEndColumn"),
        title_column: str_field(annotation, "titleColumn"),
        name: str_field(annotation, "name"),
        limit: legacy
            .and_then(|t| t.get("limit"))
            .and_then(Value::as_i64)
            .unwrap_or(0),
        match_any: legacy
            .and_then(|t| t.get("matchAny"))
            .and_then(Value::as_bool)
            .unwrap_or(false),
        tags: legacy
            .and_then(|t| t.get("tags"))
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        kind: legacy
            .and_then(|t| t.get("type"))
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        // queryType and fromAnnotations come forced from the defaults
        ..AnnotationTarget::default()
    }
}

/// Normalize an annotation record so downstream code can always assume the
/// current nested-target shape
///
/// Returns a new record, leaving the input untouched. A record already in
/// the current shape is returned value-identical; any other record comes
/// back with its `target` replaced by the migrated [`AnnotationTarget`].
/// Total over its input domain: a non-object input yields an object holding
/// only a fully-defaulted `target`.
///
/// Known quirk carried over from the original persisted-data contract: a
/// migrated record whose `query` defaulted to "" re-triggers migration on
/// the next pass. The second pass is a no-op superset, so repeated
/// application is harmless but not a round-trip law.
pub fn prepare_annotation(annotation: &Value) -> Value {
    match classify(annotation) {
        AnnotationShape::Current => annotation.clone(),
        AnnotationShape::Legacy | AnnotationShape::Empty => {
            let target = migrate_legacy_annotation(annotation);
            let mut record = match annotation {
                Value::Object(map) => map.clone(),
                _ => Map::new(),
            };
            record.insert("target".to_string(), json!(target));
            Value::Object(record)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_target_json(overrides: Value) -> Value {
        let mut target = json!({
            "query": "",
            "queryType": "tags",
            "fromAnnotations": true,
            "tagsColumn": "",
            "textColumn": "",
            "timeEndColumn": "",
            "titleColumn": "",
            "name": "",
            "limit": 0,
            "matchAny": false,
            "tags": [],
            "type": "",
        });
        if let (Some(base), Some(extra)) = (target.as_object_mut(), overrides.as_object()) {
            for (key, value) in extra {
                base.insert(key.clone(), value.clone());
            }
        }
        target
    }

    #[test]
    fn test_classify_missing_target() {
        assert_eq!(classify(&json!({})), AnnotationShape::Empty);
        assert_eq!(classify(&json!({ "name": "n" })), AnnotationShape::Empty);
        assert_eq!(classify(&json!({ "target": null })), AnnotationShape::Empty);
    }

    #[test]
    fn test_classify_falsy_target() {
        // Falsy non-null targets behave like absent ones
        assert_eq!(classify(&json!({ "target": "" })), AnnotationShape::Empty);
        assert_eq!(classify(&json!({ "target": 0 })), AnnotationShape::Empty);
        assert_eq!(classify(&json!({ "target": false })), AnnotationShape::Empty);
    }

    #[test]
    fn test_classify_legacy_target() {
        assert_eq!(classify(&json!({ "target": {} })), AnnotationShape::Legacy);
        assert_eq!(
            classify(&json!({ "target": { "query": "" } })),
            AnnotationShape::Legacy
        );
        assert_eq!(
            classify(&json!({ "target": { "query": 0 } })),
            AnnotationShape::Legacy
        );
        assert_eq!(
            classify(&json!({ "target": { "query": null } })),
            AnnotationShape::Legacy
        );
        assert_eq!(
            classify(&json!({ "target": { "limit": 5 } })),
            AnnotationShape::Legacy
        );
    }

    #[test]
    fn test_classify_current_target() {
        assert_eq!(
            classify(&json!({ "target": { "query": "host=$host" } })),
            AnnotationShape::Current
        );
        // Truthy non-string queries count as current too
        assert_eq!(
            classify(&json!({ "target": { "query": 1 } })),
            AnnotationShape::Current
        );
    }

    #[test]
    fn test_migrate_flat_fields_from_top_level() {
        let input = json!({ "query": "foo", "tagsColumn": "t" });
        let output = prepare_annotation(&input);
        assert_eq!(
            output["target"],
            default_target_json(json!({ "query": "foo", "tagsColumn": "t" }))
        );
        // Input untouched
        assert_eq!(input, json!({ "query": "foo", "tagsColumn": "t" }));
    }

    #[test]
    fn test_current_record_passes_through() {
        let input = json!({ "target": { "query": "host=$host" } });
        let output = prepare_annotation(&input);
        assert_eq!(output, input);
        assert_eq!(output["target"]["query"], "host=$host");
    }

    #[test]
    fn test_current_record_keeps_extra_target_fields_as_given() {
        // Other target fields are not validated or rewritten when query is truthy
        let input = json!({ "target": { "query": "q", "limit": "not-a-number" } });
        assert_eq!(prepare_annotation(&input), input);
    }

    #[test]
    fn test_sub_fields_survive_from_existing_target() {
        let input = json!({
            "name": "n1",
            "target": { "limit": 5, "matchAny": true, "tags": ["a", "b"], "type": "tags" },
        });
        let output = prepare_annotation(&input);
        assert_eq!(
            output["target"],
            default_target_json(json!({
                "name": "n1",
                "limit": 5,
                "matchAny": true,
                "tags": ["a", "b"],
                "type": "tags",
            }))
        );
    }

    #[test]
    fn test_empty_record_fully_defaults() {
        let output = prepare_annotation(&json!({}));
        assert_eq!(output["target"], default_target_json(json!({})));
    }

    #[test]
    fn test_non_object_input_yields_defaulted_target() {
        let output = prepare_annotation(&json!(null));
        assert_eq!(output, json!({ "target": default_target_json(json!({})) }));

        let output = prepare_annotation(&json!("garbage"));
        assert_eq!(output, json!({ "target": default_target_json(json!({})) }));
    }

    #[test]
    fn test_forced_fields_override_legacy_values() {
        let input = json!({
            "queryType": "something-else",
            "fromAnnotations": false,
            "query": "q",
        });
        let output = prepare_annotation(&input);
        assert_eq!(output["target"]["queryType"], "tags");
        assert_eq!(output["target"]["fromAnnotations"], true);
        // The old flat fields stay on the record; only target is rebuilt
        assert_eq!(output["queryType"], "something-else");
    }

    #[test]
    fn test_wrong_typed_fields_default() {
        let input = json!({
            "query": 12,
            "name": ["not", "a", "string"],
            "target": { "limit": "ten", "tags": ["a", 3, "b"], "matchAny": "yes" },
        });
        let output = prepare_annotation(&input);
        assert_eq!(output["target"]["query"], "");
        assert_eq!(output["target"]["name"], "");
        assert_eq!(output["target"]["limit"], 0);
        assert_eq!(output["target"]["matchAny"], false);
        // Non-string tag entries are dropped rather than failing the pass
        assert_eq!(output["target"]["tags"], json!(["a", "b"]));
    }

    #[test]
    fn test_second_pass_retriggers_on_empty_query() {
        // Known sharp edge: a defaulted empty query fails the truthy check
        // again, so a second pass re-migrates. The result is stable anyway.
        let first = prepare_annotation(&json!({ "name": "n1" }));
        assert_eq!(classify(&first), AnnotationShape::Legacy);
        let second = prepare_annotation(&first);
        assert_eq!(second, first);
    }

    #[test]
    fn test_second_pass_stable_on_truthy_query() {
        let first = prepare_annotation(&json!({ "query": "foo" }));
        assert_eq!(classify(&first), AnnotationShape::Current);
        assert_eq!(prepare_annotation(&first), first);
    }
}
