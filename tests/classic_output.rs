//! End-to-end checks of the classic output shape.
use serde_json::json;

#[test]
fn integer_bounds() {
    let validator =
        jschema::schema(&json!({"type": "integer", "minimum": 0, "maximum": 100})).expect("valid");
    assert!(validator.is_valid(&json!(50)));
    let report = validator.validate(&json!(150));
    assert!(!report.valid);
    assert_eq!(report.errors.len(), 1);
    let error = &report.errors[0];
    assert_eq!(error.kind, "maximum");
    assert_eq!(error.data, json!(150));
    assert_eq!(error.data_pointer, "");
    assert_eq!(error.schema_pointer, "");
    assert_eq!(error.error, "number at root is greater than 100");
}

#[test]
fn missing_property_and_wrong_type_are_both_reported() {
    let validator = jschema::schema(&json!({
        "type": "object",
        "required": ["name"],
        "properties": {
            "name": {"type": "string"},
            "age": {"type": "integer"}
        }
    }))
    .expect("valid");
    let report = validator.validate(&json!({"age": "x"}));
    assert!(!report.valid);
    assert_eq!(report.errors.len(), 2);

    let required = report
        .errors
        .iter()
        .find(|error| error.kind == "required")
        .expect("a required error");
    assert_eq!(required.data_pointer, "");
    assert_eq!(
        required.details,
        Some(json!({"missing_keys": ["name"]}))
    );
    assert_eq!(
        required.error,
        "object at root is missing required properties: name"
    );

    let wrong_type = report
        .errors
        .iter()
        .find(|error| error.kind == "integer")
        .expect("a type error");
    assert_eq!(wrong_type.data_pointer, "/age");
    assert_eq!(wrong_type.data, json!("x"));
    assert_eq!(wrong_type.schema_pointer, "/properties/age");
}

#[test]
fn one_of_with_two_matches_reports_a_single_entry() {
    let validator = jschema::schema(&json!({
        "oneOf": [
            {"type": "integer", "minimum": 0},
            {"type": "integer", "maximum": 0}
        ]
    }))
    .expect("valid");
    let report = validator.validate(&json!(0));
    assert!(!report.valid);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].kind, "oneof");
}

#[test]
fn refs_report_the_target_schema_pointer() {
    let validator = jschema::schema(&json!({
        "$defs": {"p": {"type": "integer", "minimum": 1}},
        "properties": {"count": {"$ref": "#/$defs/p"}}
    }))
    .expect("valid");
    let report = validator.validate(&json!({"count": 0}));
    assert!(!report.valid);
    assert_eq!(report.errors[0].schema_pointer, "/$defs/p");
    assert_eq!(report.errors[0].data_pointer, "/count");
}

#[test]
fn recursive_trees_report_deep_locations() {
    let validator = jschema::schema(&json!({
        "$id": "https://ex/tree",
        "type": "object",
        "properties": {
            "value": {"type": "integer"},
            "children": {"type": "array", "items": {"$ref": "#"}}
        }
    }))
    .expect("valid");
    assert!(validator.is_valid(&json!({"value": 1, "children": [{"value": 2}]})));
    let report = validator.validate(&json!({
        "value": 1,
        "children": [{"value": 2}, {"value": "x"}]
    }));
    assert!(!report.valid);
    assert_eq!(report.errors[0].data_pointer, "/children/1/value");
}

#[test]
fn unevaluated_items_point_at_their_keyword() {
    let validator = jschema::schema(&json!({
        "prefixItems": [{"type": "integer"}],
        "unevaluatedItems": false
    }))
    .expect("valid");
    let report = validator.validate(&json!([1, "extra"]));
    assert!(!report.valid);
    assert!(report.errors[0].schema_pointer.contains("unevaluatedItems"));
}

#[test]
fn root_schema_travels_with_every_entry() {
    let schema = json!({"properties": {"a": {"type": "integer"}}});
    let validator = jschema::schema(&schema).expect("valid");
    let report = validator.validate(&json!({"a": "x"}));
    assert_eq!(report.errors[0].root_schema, schema);
    assert_eq!(report.errors[0].schema, json!({"type": "integer"}));
}

#[test]
fn x_error_strings_replace_every_message() {
    let validator = jschema::schema(&json!({
        "type": "integer",
        "minimum": 3,
        "x-error": "that will not do"
    }))
    .expect("valid");
    let report = validator.validate(&json!(1));
    assert_eq!(report.errors[0].error, "that will not do");
}

#[test]
fn x_error_maps_select_by_keyword_with_fallback() {
    let validator = jschema::schema(&json!({
        "type": "integer",
        "minimum": 3,
        "x-error": {
            "minimum": "%{instance} is below %{keywordValue}",
            "*": "fallback"
        }
    }))
    .expect("valid");
    let report = validator.validate(&json!(1));
    assert_eq!(report.errors[0].error, "1 is below 3");
    let report = validator.validate(&json!("x"));
    assert_eq!(report.errors[0].error, "fallback");
}

#[test]
fn x_error_reaches_false_subschemas_through_their_keyword() {
    let validator = jschema::schema(&json!({
        "properties": {"a": true},
        "additionalProperties": false,
        "x-error": {"additionalProperties": "no extras allowed"}
    }))
    .expect("valid");
    let report = validator.validate(&json!({"b": 1}));
    assert_eq!(report.errors[0].error, "no extras allowed");
}

#[test]
fn x_error_interpolates_locations() {
    let validator = jschema::schema(&json!({
        "properties": {
            "age": {
                "type": "integer",
                "x-error": "bad value at %{formattedInstanceLocation} (%{keywordLocation})"
            }
        }
    }))
    .expect("valid");
    let report = validator.validate(&json!({"age": "x"}));
    assert_eq!(
        report.errors[0].error,
        "bad value at `/age` (/properties/age/type)"
    );
}

#[test]
fn serialized_layout_matches_the_contract() {
    let validator = jschema::schema(&json!({"required": ["a"]})).expect("valid");
    let report = serde_json::to_value(validator.validate(&json!({}))).expect("serializable");
    assert_eq!(report["valid"], json!(false));
    let entry = &report["errors"][0];
    assert_eq!(entry["type"], json!("required"));
    assert_eq!(entry["data_pointer"], json!(""));
    assert_eq!(entry["details"], json!({"missing_keys": ["a"]}));
    assert!(entry["error"].is_string());
    assert!(entry["schema"].is_object());
    assert!(entry["root_schema"].is_object());
}
