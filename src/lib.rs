//! JSON Schema (Draft 2020-12) and OpenAPI 3.1 validation with detailed
//! outputs.
//!
//! - 📐 Draft 2020-12, including `$dynamicRef`/`$dynamicAnchor` and the
//!   `unevaluated*` keywords
//! - 🧩 The OpenAPI 3.1 dialect: `discriminator` and a document wrapper
//! - 🎨 Five output shapes from one result tree: `flag`, `basic`,
//!   `detailed`, `verbose` and `classic`
//! - 🔧 Custom formats, content encodings/media types, regex dialects,
//!   retrievers and `x-error` message overrides
//!
//! # Validation
//!
//! For a one-off check use [`is_valid`]; to validate repeatedly, compile
//! the schema once:
//!
//! ```rust
//! use serde_json::json;
//!
//! let schema = json!({"type": "object", "required": ["name"]});
//! let validator = jschema::schema(&schema).expect("Invalid schema");
//!
//! assert!(validator.is_valid(&json!({"name": "Kim"})));
//!
//! let report = validator.validate(&json!({}));
//! assert!(!report.valid);
//! assert_eq!(report.errors[0].error, "object at root is missing required properties: name");
//! ```
//!
//! # Output shapes
//!
//! [`Validator::apply`] exposes every shape of the result tree:
//!
//! ```rust
//! use serde_json::json;
//!
//! let validator = jschema::schema(&json!({"type": "integer"})).expect("Invalid schema");
//! let instance = json!("x");
//! let output = validator.apply(&instance);
//! assert!(!output.flag().valid);
//! let basic = output.basic();
//! assert_eq!(basic["errors"][0]["keywordLocation"], "/type");
//! ```
//!
//! # Configuration
//!
//! [`options()`] starts from the process-wide defaults:
//!
//! ```rust
//! use serde_json::json;
//!
//! let validator = jschema::options()
//!     .should_validate_formats(true)
//!     .build(&json!({"format": "ipv4"}))
//!     .expect("Invalid schema");
//! assert!(!validator.is_valid(&json!("not an ip")));
//! ```
//!
//! # Reference resolving
//!
//! External `$ref`s fetch through the bundled retriever (HTTP via the
//! `resolve-http` feature, `file://` via `resolve-file`) or through a
//! custom [`Retrieve`] implementation:
//!
//! ```rust
//! use serde_json::{json, Value};
//!
//! struct InMemory;
//!
//! impl jschema::Retrieve for InMemory {
//!     fn retrieve(&self, uri: &str) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
//!         match uri {
//!             "https://example.com/person" => Ok(json!({"type": "object"})),
//!             _ => Err(format!("unknown document: {uri}").into()),
//!         }
//!     }
//! }
//!
//! let validator = jschema::options()
//!     .with_retriever(InMemory)
//!     .build(&json!({"$ref": "https://example.com/person"}))
//!     .expect("Invalid schema");
//! assert!(validator.is_valid(&json!({})));
//! assert!(!validator.is_valid(&json!(42)));
//! ```
mod compiler;
mod content;
mod context;
mod ecma;
pub mod error;
mod formats;
mod keywords;
pub mod meta;
mod node;
mod options;
pub mod output;
pub mod paths;
mod patterns;
mod primitive_type;
mod resources;
mod retriever;
mod uri;
mod validator;
mod vocabularies;
mod x_error;
pub mod openapi;

pub use content::{ContentEncoding, ContentMediaType};
pub use error::{ErrorKind, SchemaError};
pub use formats::Format;
pub use openapi::OpenApi;
pub use options::{AccessMode, PropertyHook, ValidationOptions};
pub use output::{ClassicError, ClassicOutput, FlagOutput, OutputFormat};
pub use patterns::{CompiledPattern, PatternEngine, RegexDialect};
pub use primitive_type::PrimitiveType;
pub use retriever::{DefaultRetriever, Retrieve, Unretrievable};
pub use validator::{Output, Validator};
pub use vocabularies::Vocabulary;

use serde_json::Value;

/// Compile `source` into a reusable validator with default options.
pub fn schema(source: &Value) -> Result<Validator, SchemaError> {
    options().build(source)
}

/// Compile a schema from its JSON text.
pub fn schema_from_str(source: &str) -> Result<Validator, SchemaError> {
    let value: Value = serde_json::from_str(source)?;
    options().build(&value)
}

/// Compile a schema from a file; the file's `file://` URI becomes the base
/// URI so relative references resolve next to it.
#[cfg(feature = "resolve-file")]
pub fn schema_from_path(path: impl AsRef<std::path::Path>) -> Result<Validator, SchemaError> {
    let path = path.as_ref().canonicalize()?;
    let base = url::Url::from_file_path(&path)
        .map_err(|()| SchemaError::InvalidFileUri {
            uri: path.display().to_string(),
        })?
        .to_string();
    let file = std::fs::File::open(&path)?;
    let value: Value = serde_json::from_reader(file)?;
    options().with_base_uri(base).build(&value)
}

/// Wrap a parsed OpenAPI 3.1 document.
pub fn openapi(document: &Value) -> Result<OpenApi, SchemaError> {
    openapi::build(options(), document)
}

/// A fresh copy of the process-wide default options.
#[must_use]
pub fn options() -> ValidationOptions {
    ValidationOptions::default()
}

/// A shortcut for validating `instance` against `schema`.
///
/// ```rust
/// use serde_json::json;
///
/// assert!(jschema::is_valid(&json!({"maxLength": 5}), &json!("foo")));
/// ```
///
/// # Panics
///
/// This function panics if the schema is invalid.
#[must_use]
pub fn is_valid(schema: &Value, instance: &Value) -> bool {
    options()
        .build(schema)
        .expect("Invalid schema")
        .is_valid(instance)
}

#[cfg(test)]
pub(crate) mod tests_util {
    use crate::{output::ClassicError, Validator};
    use serde_json::Value;

    pub(crate) fn is_valid_with(validator: &Validator, instance: &Value) {
        assert!(
            validator.is_valid(instance),
            "{instance} should be valid (via is_valid)"
        );
        let report = validator.validate(instance);
        assert!(
            report.valid && report.errors.is_empty(),
            "{instance} should be valid (via validate): {:?}",
            report.errors.first().map(|error| &error.error)
        );
        assert_eq!(
            validator.apply(instance).basic()["valid"],
            Value::Bool(true),
            "{instance} should be valid (via apply)"
        );
    }

    pub(crate) fn is_valid(schema: &Value, instance: &Value) {
        let validator = crate::schema(schema).expect("Invalid schema");
        is_valid_with(&validator, instance);
    }

    pub(crate) fn is_not_valid_with(validator: &Validator, instance: &Value) {
        assert!(
            !validator.is_valid(instance),
            "{instance} should not be valid (via is_valid)"
        );
        let report = validator.validate(instance);
        assert!(
            !report.valid && !report.errors.is_empty(),
            "{instance} should not be valid (via validate)"
        );
        assert_eq!(
            validator.apply(instance).basic()["valid"],
            Value::Bool(false),
            "{instance} should not be valid (via apply)"
        );
    }

    pub(crate) fn is_not_valid(schema: &Value, instance: &Value) {
        let validator = crate::schema(schema).expect("Invalid schema");
        is_not_valid_with(&validator, instance);
    }

    pub(crate) fn first_error(schema: &Value, instance: &Value) -> ClassicError {
        let validator = crate::schema(schema).expect("Invalid schema");
        let report = validator.validate(instance);
        report
            .errors
            .into_iter()
            .next()
            .expect("should have at least one error")
    }
}

#[cfg(test)]
mod tests {
    use super::is_valid;
    use serde_json::json;

    #[test]
    fn one_off_validation() {
        let schema = json!({"minLength": 5});
        assert!(is_valid(&schema, &json!("foobar")));
        assert!(!is_valid(&schema, &json!("foo")));
    }

    #[test]
    fn empty_and_boolean_schemas() {
        assert!(is_valid(&json!({}), &json!({"anything": [1, 2, 3]})));
        assert!(is_valid(&json!(true), &json!(null)));
        assert!(!is_valid(&json!(false), &json!(null)));
    }

    #[test]
    fn flag_agrees_with_classic() {
        let schema = json!({"type": "integer", "minimum": 0});
        let validator = crate::schema(&schema).expect("Invalid schema");
        for instance in [json!(1), json!(-1), json!("x")] {
            let report = validator.validate(&instance);
            assert_eq!(validator.is_valid(&instance), report.valid);
            assert_eq!(report.valid, report.errors.is_empty());
        }
    }
}
