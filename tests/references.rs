//! Identities, external documents, bundling and meta-schema validation.
use serde_json::{json, Value};

struct InMemory;

impl jschema::Retrieve for InMemory {
    fn retrieve(&self, uri: &str) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        match uri {
            "https://ex.test/address" => Ok(json!({
                "$id": "https://ex.test/address",
                "type": "object",
                "required": ["street"],
                "properties": {
                    "street": {"type": "string"},
                    "country": {"$ref": "country"}
                }
            })),
            "https://ex.test/country" => Ok(json!({
                "type": "string",
                "minLength": 2
            })),
            _ => Err(format!("unknown document: {uri}").into()),
        }
    }
}

fn person() -> Value {
    json!({
        "$id": "https://ex.test/person",
        "type": "object",
        "properties": {
            "address": {"$ref": "address"}
        }
    })
}

#[test]
fn external_documents_chain_through_the_retriever() {
    let validator = jschema::options()
        .with_retriever(InMemory)
        .build(&person())
        .expect("valid");
    assert!(validator.is_valid(&json!({"address": {"street": "Main", "country": "FR"}})));
    assert!(!validator.is_valid(&json!({"address": {"country": "FR"}})));
    assert!(!validator.is_valid(&json!({"address": {"street": "Main", "country": "F"}})));
}

#[test]
fn missing_documents_fail_resolution() {
    let error = jschema::options()
        .with_retriever(InMemory)
        .build(&json!({"$ref": "https://ex.test/unknown"}))
        .expect_err("unresolvable");
    assert!(matches!(
        error,
        jschema::SchemaError::InvalidRefResolution { .. }
    ));
}

#[test]
fn pointers_to_nowhere_are_rejected() {
    let error = jschema::schema(&json!({"$ref": "#/nope/nothing"})).expect_err("bad pointer");
    assert!(matches!(
        error,
        jschema::SchemaError::InvalidRefPointer { .. }
    ));
}

#[test]
fn pointer_tokens_unescape() {
    let validator = jschema::schema(&json!({
        "$defs": {"a/b": {"type": "integer"}},
        "$ref": "#/$defs/a~1b"
    }))
    .expect("valid");
    assert!(validator.is_valid(&json!(1)));
    assert!(!validator.is_valid(&json!("x")));
}

#[test]
fn urn_bases_accept_fragment_refs() {
    let validator = jschema::schema(&json!({
        "$id": "urn:uuid:deadbeef-1234-0000-0000-4321feebdaed",
        "$defs": {"num": {"$anchor": "num", "type": "integer"}},
        "properties": {"n": {"$ref": "#num"}}
    }))
    .expect("valid");
    assert!(validator.is_valid(&json!({"n": 4})));
    assert!(!validator.is_valid(&json!({"n": "x"})));
}

#[test]
fn nested_resources_scope_their_references() {
    let validator = jschema::schema(&json!({
        "$id": "https://ex.test/outer",
        "properties": {
            "inner": {
                "$id": "https://ex.test/inner",
                "$defs": {"str": {"type": "string"}},
                "$ref": "#/$defs/str"
            }
        }
    }))
    .expect("valid");
    assert!(validator.is_valid(&json!({"inner": "x"})));
    assert!(!validator.is_valid(&json!({"inner": 1})));
}

#[test]
fn bundling_is_self_contained() {
    let validator = jschema::options()
        .with_retriever(InMemory)
        .build(&person())
        .expect("valid");
    let bundled = validator.bundle();
    // The bundle carries every fetched document under $defs, keyed by URI
    assert!(bundled["$defs"]["https://ex.test/address"].is_object());

    let revalidator = jschema::options()
        .with_retriever(jschema::Unretrievable)
        .build(&bundled)
        .expect("self-contained");
    for (instance, expected) in [
        (json!({"address": {"street": "Main", "country": "FR"}}), true),
        (json!({"address": {"country": "FR"}}), false),
    ] {
        assert_eq!(validator.is_valid(&instance), expected);
        assert_eq!(revalidator.is_valid(&instance), expected);
    }
}

#[test]
fn compiling_twice_yields_the_same_behavior() {
    let schema = json!({
        "$id": "https://ex.test/stable",
        "$defs": {"n": {"$anchor": "n", "type": "integer"}},
        "$ref": "#n"
    });
    let first = jschema::schema(&schema).expect("valid");
    let second = jschema::schema(&schema).expect("valid");
    for instance in [json!(1), json!("x"), json!(null)] {
        assert_eq!(first.is_valid(&instance), second.is_valid(&instance));
        assert_eq!(
            first.apply(&instance).verbose(),
            second.apply(&instance).verbose()
        );
    }
}

#[test]
fn schemas_validate_against_the_meta_schema() {
    assert!(jschema::meta::is_valid(&json!({
        "type": "object",
        "properties": {"a": {"$ref": "#/$defs/x"}},
        "$defs": {"x": true}
    })));
    let report = jschema::meta::validate(&json!({"type": 12}));
    assert!(!report.valid);
}

#[test]
fn building_rejects_schemas_the_meta_schema_rejects() {
    let error = jschema::schema(&json!({"multipleOf": "nope"})).expect_err("invalid schema");
    assert!(matches!(error, jschema::SchemaError::InvalidSchema { .. }));
    // The same schema compiles when meta-validation is off
    assert!(jschema::options()
        .without_schema_validation()
        .build(&json!({"multipleOf": "nope"}))
        .is_ok());
}
