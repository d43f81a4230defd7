//! The five output shapes derive from one result tree and agree on
//! validity.
use std::str::FromStr;

use jschema::OutputFormat;
use serde_json::json;

#[test]
fn all_shapes_agree_on_validity() {
    let validator = jschema::schema(&json!({
        "type": "object",
        "properties": {"a": {"type": "integer"}}
    }))
    .expect("valid");
    for (instance, expected) in [
        (json!({"a": 1}), true),
        (json!({"a": "x"}), false),
        (json!(17), false),
    ] {
        let output = validator.apply(&instance);
        assert_eq!(output.flag().valid, expected);
        assert_eq!(output.basic()["valid"], json!(expected));
        assert_eq!(output.detailed()["valid"], json!(expected));
        assert_eq!(output.verbose()["valid"], json!(expected));
        assert_eq!(output.classic().valid, expected);
        assert_eq!(validator.is_valid(&instance), expected);
    }
}

#[test]
fn basic_lists_leaf_errors_with_locations() {
    let validator = jschema::schema(&json!({
        "properties": {"a": {"type": "integer"}}
    }))
    .expect("valid");
    let basic = validator.apply(&json!({"a": "x"})).basic();
    let errors = basic["errors"].as_array().expect("errors");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["keywordLocation"], json!("/properties/a/type"));
    assert_eq!(errors[0]["instanceLocation"], json!("/a"));
    assert!(errors[0]["absoluteKeywordLocation"]
        .as_str()
        .expect("a string")
        .ends_with("#/properties/a/type"));
}

#[test]
fn basic_keyword_locations_pass_through_refs() {
    let validator = jschema::schema(&json!({
        "$defs": {"num": {"type": "integer"}},
        "properties": {"a": {"$ref": "#/$defs/num"}}
    }))
    .expect("valid");
    let basic = validator.apply(&json!({"a": "x"})).basic();
    let errors = basic["errors"].as_array().expect("errors");
    assert_eq!(
        errors[0]["keywordLocation"],
        json!("/properties/a/$ref/type")
    );
    assert!(errors[0]["absoluteKeywordLocation"]
        .as_str()
        .expect("a string")
        .ends_with("#/$defs/num/type"));
}

#[test]
fn basic_collects_annotations_when_valid() {
    let validator = jschema::schema(&json!({
        "title": "thing",
        "properties": {"a": {"type": "integer"}}
    }))
    .expect("valid");
    let basic = validator.apply(&json!({"a": 1})).basic();
    let annotations = basic["annotations"].as_array().expect("annotations");
    assert!(annotations
        .iter()
        .any(|unit| unit["annotation"] == json!("thing")));
    assert!(annotations
        .iter()
        .any(|unit| unit["annotation"] == json!(["a"])));
}

#[test]
fn detailed_collapses_single_child_chains() {
    let validator = jschema::schema(&json!({
        "properties": {"a": {"type": "integer"}}
    }))
    .expect("valid");
    let detailed = validator.apply(&json!({"a": "x"})).detailed();
    assert_eq!(detailed["keywordLocation"], json!("/properties/a/type"));
    assert!(detailed.get("errors").is_none());
}

#[test]
fn detailed_keeps_siblings() {
    let validator = jschema::schema(&json!({
        "properties": {
            "a": {"type": "integer"},
            "b": {"type": "string"}
        }
    }))
    .expect("valid");
    let detailed = validator.apply(&json!({"a": "x", "b": 1})).detailed();
    let errors = detailed["errors"].as_array().expect("two branches");
    assert_eq!(errors.len(), 2);
}

#[test]
fn verbose_mirrors_the_result_tree() {
    let validator = jschema::schema(&json!({
        "type": "object",
        "properties": {"a": {"type": "integer"}}
    }))
    .expect("valid");
    let verbose = validator.apply(&json!({"a": "x"})).verbose();
    assert_eq!(verbose["valid"], json!(false));
    // `type` passed, `properties` failed: both appear in full
    assert!(verbose["annotations"].as_array().is_some());
    let errors = verbose["errors"].as_array().expect("errors");
    assert_eq!(errors[0]["keywordLocation"], json!("/properties"));
}

#[test]
fn prefix_items_annotation_is_the_highest_index() {
    let validator = jschema::schema(&json!({
        "prefixItems": [{"type": "integer"}, {"type": "integer"}]
    }))
    .expect("valid");
    let verbose = validator.apply(&json!([1, 2, 3])).verbose();
    let annotations = verbose["annotations"].as_array().expect("annotations");
    let prefix = annotations
        .iter()
        .find(|unit| unit["keywordLocation"] == json!("/prefixItems"))
        .expect("prefixItems unit");
    assert_eq!(prefix["annotation"], json!(1));
}

#[test]
fn format_names_the_requested_shape() {
    let validator = jschema::schema(&json!({"type": "integer"})).expect("valid");
    let flag = validator.validate_with(&json!(1), OutputFormat::Flag);
    assert_eq!(flag, json!({"valid": true}));
    let classic = validator.validate_with(&json!("x"), OutputFormat::Classic);
    assert_eq!(classic["errors"][0]["type"], json!("integer"));
}

#[test]
fn output_format_names_parse() {
    for name in ["flag", "basic", "detailed", "verbose", "classic"] {
        assert!(OutputFormat::from_str(name).is_ok());
    }
    assert!(matches!(
        OutputFormat::from_str("pretty"),
        Err(jschema::SchemaError::UnknownOutputFormat { .. })
    ));
}
