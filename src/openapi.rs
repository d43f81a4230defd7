//! The OpenAPI 3.1 document wrapper.
use serde_json::Value;

use crate::{
    compiler::Compiler,
    error::SchemaError,
    meta,
    node::append_pointer_fragment,
    options::ValidationOptions,
    output::ClassicOutput,
    paths::{JsonPointer, PathChunk},
    uri,
    validator::Validator,
    vocabularies,
};

/// A parsed OpenAPI 3.1 document: validated against the OpenAPI
/// meta-schema, with its component schemas compiled under the dialect the
/// document selects.
#[derive(Debug)]
pub struct OpenApi {
    document: Value,
    validator: Validator,
}

pub(crate) fn build(options: ValidationOptions, document: &Value) -> Result<OpenApi, SchemaError> {
    let version = document
        .get("openapi")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if !version.starts_with("3.1.") {
        return Err(SchemaError::UnsupportedOpenApiVersion {
            version: version.to_string(),
        });
    }
    let dialect = document
        .get("jsonSchemaDialect")
        .and_then(Value::as_str)
        .unwrap_or(vocabularies::OPENAPI_31_DIALECT_URI)
        .to_string();
    let mut compiler = Compiler::new(options);
    let base = compiler.root_base()?;
    let meta = compiler.meta_schema(&dialect)?;
    let root = compiler.compile_document(document.clone(), base, Some(meta))?;
    compiler.resolve_pending()?;
    // Component schemas live under an unknown keyword, so force-compile
    // them now; `schema()` hands out shares of an immutable validator later
    if let Some(schemas) = document
        .pointer("/components/schemas")
        .and_then(Value::as_object)
    {
        for name in schemas.keys() {
            let pointer = component_pointer(name).to_string();
            compiler.resolve_pointer(root, &pointer)?;
            compiler.resolve_pending()?;
        }
    }
    Ok(OpenApi {
        document: document.clone(),
        validator: Validator::from_compiler(compiler, root),
    })
}

fn component_pointer(name: &str) -> JsonPointer {
    [
        PathChunk::from("components"),
        PathChunk::from("schemas"),
        PathChunk::from(name),
    ]
    .as_slice()
    .into()
}

impl OpenApi {
    /// Whether the document is valid against the OpenAPI 3.1 schema.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        meta::OPENAPI31_DOCUMENT_VALIDATOR.is_valid(&self.document)
    }

    /// Validate the document against the OpenAPI 3.1 schema.
    #[must_use]
    pub fn validate(&self) -> ClassicOutput {
        meta::OPENAPI31_DOCUMENT_VALIDATOR.validate(&self.document)
    }

    /// The compiled subschema at `#/components/schemas/{name}`.
    pub fn schema(&self, name: &str) -> Result<Validator, SchemaError> {
        let node = self.validator.inner.arena.get(self.validator.root);
        let mut canonical = uri::fragmentless_str(node.base_uri.as_str()).to_string();
        canonical.push('#');
        append_pointer_fragment(&component_pointer(name), &mut canonical);
        self.validator
            .subvalidator(&canonical)
            .ok_or_else(|| SchemaError::UnknownRef {
                reference: format!("#/components/schemas/{name}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    fn petstore() -> Value {
        json!({
            "openapi": "3.1.0",
            "info": {"title": "Pets", "version": "1.0.0"},
            "components": {
                "schemas": {
                    "Pet": {
                        "type": "object",
                        "required": ["name"],
                        "properties": {
                            "name": {"type": "string"},
                            "age": {"type": "integer"}
                        }
                    },
                    "Litter": {
                        "type": "array",
                        "items": {"$ref": "#/components/schemas/Pet"}
                    }
                }
            }
        })
    }

    #[test]
    fn documents_validate_against_the_openapi_schema() {
        let wrapper = crate::openapi(&petstore()).expect("3.1 document");
        assert!(wrapper.is_valid());
        let report = wrapper.validate();
        assert!(report.valid);
    }

    #[test]
    fn invalid_documents_report_errors() {
        let wrapper = crate::openapi(&json!({
            "openapi": "3.1.0",
            "info": {"title": "Broken"},
            "paths": {}
        }))
        .expect("version is fine");
        assert!(!wrapper.is_valid());
    }

    #[test]
    fn unsupported_versions_are_rejected() {
        let error = crate::openapi(&json!({"openapi": "3.0.3", "info": {}}))
            .expect_err("3.0 is not supported");
        assert!(matches!(
            error,
            crate::SchemaError::UnsupportedOpenApiVersion { .. }
        ));
    }

    #[test]
    fn component_schemas_are_reachable() {
        let wrapper = crate::openapi(&petstore()).expect("3.1 document");
        let pet = wrapper.schema("Pet").expect("present");
        assert!(pet.is_valid(&json!({"name": "Rex", "age": 3})));
        assert!(!pet.is_valid(&json!({"age": 3})));
        assert!(wrapper.schema("Missing").is_err());
    }

    #[test]
    fn component_refs_resolve_between_schemas() {
        let wrapper = crate::openapi(&petstore()).expect("3.1 document");
        let litter = wrapper.schema("Litter").expect("present");
        assert!(litter.is_valid(&json!([{"name": "a"}, {"name": "b"}])));
        assert!(!litter.is_valid(&json!([{"age": 1}])));
    }

    #[test]
    fn discriminator_dispatches_on_the_mapped_schema() {
        let document = json!({
            "openapi": "3.1.0",
            "info": {"title": "Zoo", "version": "1.0.0"},
            "components": {
                "schemas": {
                    "Animal": {
                        "type": "object",
                        "required": ["kind"],
                        "properties": {"kind": {"type": "string"}},
                        "discriminator": {"propertyName": "kind"}
                    },
                    "cat": {
                        "type": "object",
                        "required": ["meows"],
                        "properties": {"meows": {"type": "boolean"}}
                    },
                    "dog": {
                        "type": "object",
                        "required": ["barks"],
                        "properties": {"barks": {"type": "boolean"}}
                    }
                }
            }
        });
        let wrapper = crate::openapi(&document).expect("3.1 document");
        let animal = wrapper.schema("Animal").expect("present");
        assert!(animal.is_valid(&json!({"kind": "cat", "meows": true})));
        assert!(animal.is_valid(&json!({"kind": "dog", "barks": false})));
        assert!(!animal.is_valid(&json!({"kind": "cat", "barks": true})));
        assert!(!animal.is_valid(&json!({"kind": "axolotl"})));
        assert!(!animal.is_valid(&json!({})));
    }

    #[test]
    fn one_of_with_discriminator_checks_only_the_selected_branch() {
        let document = json!({
            "openapi": "3.1.0",
            "info": {"title": "Zoo", "version": "1.0.0"},
            "components": {
                "schemas": {
                    "Pet": {
                        "oneOf": [
                            {"$ref": "#/components/schemas/cat"},
                            {"$ref": "#/components/schemas/dog"}
                        ],
                        "discriminator": {"propertyName": "kind"}
                    },
                    "cat": {
                        "type": "object",
                        "required": ["kind"],
                        "properties": {"kind": {"const": "cat"}, "lives": {"type": "integer"}}
                    },
                    "dog": {
                        "type": "object",
                        "required": ["kind"],
                        "properties": {"kind": {"const": "dog"}}
                    }
                }
            }
        });
        let wrapper = crate::openapi(&document).expect("3.1 document");
        let pet = wrapper.schema("Pet").expect("present");
        assert!(pet.is_valid(&json!({"kind": "cat", "lives": 9})));
        assert!(!pet.is_valid(&json!({"kind": "cat", "lives": "nine"})));
        assert!(!pet.is_valid(&json!({"kind": "tardigrade"})));
    }
}
