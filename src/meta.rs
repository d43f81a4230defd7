//! Embedded meta-schema documents and meta-schema validation.
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::{output::ClassicOutput, vocabularies, Validator};

macro_rules! schema {
    ($vis:vis $name:ident, $path:expr) => {
        $vis static $name: once_cell::sync::Lazy<serde_json::Value> =
            once_cell::sync::Lazy::new(|| {
                serde_json::from_slice(include_bytes!($path)).expect("Invalid schema")
            });
    };
    ($name:ident, $path:expr) => {
        schema!(pub(crate) $name, $path);
    };
}

schema!(pub DRAFT202012, "metaschemas/draft2020-12/schema.json");
schema!(
    DRAFT202012_CORE,
    "metaschemas/draft2020-12/meta/core.json"
);
schema!(
    DRAFT202012_APPLICATOR,
    "metaschemas/draft2020-12/meta/applicator.json"
);
schema!(
    DRAFT202012_UNEVALUATED,
    "metaschemas/draft2020-12/meta/unevaluated.json"
);
schema!(
    DRAFT202012_VALIDATION,
    "metaschemas/draft2020-12/meta/validation.json"
);
schema!(
    DRAFT202012_META_DATA,
    "metaschemas/draft2020-12/meta/meta-data.json"
);
schema!(
    DRAFT202012_FORMAT_ANNOTATION,
    "metaschemas/draft2020-12/meta/format-annotation.json"
);
schema!(
    DRAFT202012_CONTENT,
    "metaschemas/draft2020-12/meta/content.json"
);
schema!(pub OPENAPI31_DIALECT, "metaschemas/openapi-3.1/dialect-base.json");
schema!(
    OPENAPI31_META_BASE,
    "metaschemas/openapi-3.1/meta-base.json"
);
schema!(pub OPENAPI31_SCHEMA, "metaschemas/openapi-3.1/schema.json");

/// A built-in document by its canonical URI.
pub(crate) fn document(uri: &str) -> Option<&'static Value> {
    match crate::uri::fragmentless_str(uri) {
        "https://json-schema.org/schema" | "https://json-schema.org/draft/2020-12/schema" => {
            Some(&DRAFT202012)
        }
        "https://json-schema.org/draft/2020-12/meta/core" => Some(&DRAFT202012_CORE),
        "https://json-schema.org/draft/2020-12/meta/applicator" => Some(&DRAFT202012_APPLICATOR),
        "https://json-schema.org/draft/2020-12/meta/unevaluated" => Some(&DRAFT202012_UNEVALUATED),
        "https://json-schema.org/draft/2020-12/meta/validation" => Some(&DRAFT202012_VALIDATION),
        "https://json-schema.org/draft/2020-12/meta/meta-data" => Some(&DRAFT202012_META_DATA),
        "https://json-schema.org/draft/2020-12/meta/format-annotation" => {
            Some(&DRAFT202012_FORMAT_ANNOTATION)
        }
        "https://json-schema.org/draft/2020-12/meta/content" => Some(&DRAFT202012_CONTENT),
        "https://spec.openapis.org/oas/3.1/dialect/base" => Some(&OPENAPI31_DIALECT),
        "https://spec.openapis.org/oas/3.1/meta/base" => Some(&OPENAPI31_META_BASE),
        "https://spec.openapis.org/oas/3.1/schema/2022-10-07"
        | "https://spec.openapis.org/oas/3.1/schema/latest"
        | "https://spec.openapis.org/oas/3.1/schema" => Some(&OPENAPI31_SCHEMA),
        _ => None,
    }
}

const EXPECT_MESSAGE: &str = "Invalid meta-schema";

static DRAFT202012_VALIDATOR: Lazy<Validator> = Lazy::new(|| {
    crate::options()
        .without_schema_validation()
        .with_retriever(crate::retriever::Unretrievable)
        .build(&DRAFT202012)
        .expect(EXPECT_MESSAGE)
});

static OPENAPI31_DIALECT_VALIDATOR: Lazy<Validator> = Lazy::new(|| {
    crate::options()
        .without_schema_validation()
        .with_retriever(crate::retriever::Unretrievable)
        .build(&OPENAPI31_DIALECT)
        .expect(EXPECT_MESSAGE)
});

pub(crate) static OPENAPI31_DOCUMENT_VALIDATOR: Lazy<Validator> = Lazy::new(|| {
    crate::options()
        .without_schema_validation()
        .with_retriever(crate::retriever::Unretrievable)
        .build(&OPENAPI31_SCHEMA)
        .expect(EXPECT_MESSAGE)
});

fn validator_for(schema: &Value) -> &'static Validator {
    match schema.get("$schema").and_then(Value::as_str) {
        Some(vocabularies::OPENAPI_31_DIALECT_URI) => &OPENAPI31_DIALECT_VALIDATOR,
        _ => &DRAFT202012_VALIDATOR,
    }
}

/// Validate a schema document against its meta-schema.
///
/// The meta-schema is chosen from the document's `$schema` (the OpenAPI 3.1
/// dialect or, by default, Draft 2020-12) and the engine runs on itself.
pub fn validate(schema: &Value) -> ClassicOutput {
    validator_for(schema).validate(schema)
}

/// Whether a schema document is valid against its meta-schema.
#[must_use]
pub fn is_valid(schema: &Value) -> bool {
    validator_for(schema).is_valid(schema)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    #[test]
    fn well_formed_schemas_pass() {
        assert!(super::is_valid(&json!({
            "type": "object",
            "required": ["name"],
            "properties": {"name": {"type": "string"}}
        })));
    }

    #[test]
    fn malformed_keyword_values_fail() {
        let report = super::validate(&json!({"type": "objekt"}));
        assert!(!report.valid);
        assert!(!report.errors.is_empty());
    }

    #[test]
    fn the_meta_schema_validates_itself() {
        assert!(super::is_valid(&super::DRAFT202012));
    }
}
