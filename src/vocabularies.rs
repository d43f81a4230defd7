//! Vocabularies: named bundles of keywords selected by a meta-schema.
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::error::SchemaError;

/// A JSON Schema vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Vocabulary {
    Core,
    Applicator,
    Unevaluated,
    Validation,
    MetaData,
    FormatAnnotation,
    FormatAssertion,
    Content,
    /// The OpenAPI 3.1 base vocabulary (`discriminator` and friends).
    OpenApi,
    Custom(String),
}

impl Vocabulary {
    pub(crate) fn from_uri(uri: &str) -> Vocabulary {
        match uri {
            "https://json-schema.org/draft/2020-12/vocab/core" => Vocabulary::Core,
            "https://json-schema.org/draft/2020-12/vocab/applicator" => Vocabulary::Applicator,
            "https://json-schema.org/draft/2020-12/vocab/unevaluated" => Vocabulary::Unevaluated,
            "https://json-schema.org/draft/2020-12/vocab/validation" => Vocabulary::Validation,
            "https://json-schema.org/draft/2020-12/vocab/meta-data" => Vocabulary::MetaData,
            "https://json-schema.org/draft/2020-12/vocab/format-annotation" => {
                Vocabulary::FormatAnnotation
            }
            "https://json-schema.org/draft/2020-12/vocab/format-assertion" => {
                Vocabulary::FormatAssertion
            }
            "https://json-schema.org/draft/2020-12/vocab/content" => Vocabulary::Content,
            "https://spec.openapis.org/oas/3.1/vocab/base" => Vocabulary::OpenApi,
            _ => Vocabulary::Custom(uri.to_string()),
        }
    }
}

/// An ordered set of active vocabularies; evaluation follows declaration
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct VocabularySet {
    entries: Vec<Vocabulary>,
}

impl VocabularySet {
    pub(crate) fn contains(&self, vocabulary: &Vocabulary) -> bool {
        self.entries.contains(vocabulary)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Vocabulary> {
        self.entries.iter()
    }

    fn push(&mut self, vocabulary: Vocabulary) {
        if !self.entries.contains(&vocabulary) {
            self.entries.push(vocabulary);
        }
    }
}

impl From<&[Vocabulary]> for VocabularySet {
    fn from(entries: &[Vocabulary]) -> Self {
        VocabularySet {
            entries: entries.to_vec(),
        }
    }
}

/// The effective meta-schema of a resource: its URI and the vocabularies it
/// activates.
#[derive(Debug, Clone)]
pub(crate) struct MetaSchema {
    pub(crate) uri: String,
    pub(crate) vocabularies: VocabularySet,
}

pub(crate) const DRAFT_2020_12_URI: &str = "https://json-schema.org/draft/2020-12/schema";
pub(crate) const OPENAPI_31_DIALECT_URI: &str = "https://spec.openapis.org/oas/3.1/dialect/base";

pub(crate) static DRAFT_2020_12: Lazy<Arc<MetaSchema>> = Lazy::new(|| {
    Arc::new(MetaSchema {
        uri: DRAFT_2020_12_URI.to_string(),
        vocabularies: [
            Vocabulary::Core,
            Vocabulary::Applicator,
            Vocabulary::Unevaluated,
            Vocabulary::Validation,
            Vocabulary::MetaData,
            Vocabulary::FormatAnnotation,
            Vocabulary::Content,
        ]
        .as_slice()
        .into(),
    })
});

pub(crate) static OPENAPI_31_DIALECT: Lazy<Arc<MetaSchema>> = Lazy::new(|| {
    Arc::new(MetaSchema {
        uri: OPENAPI_31_DIALECT_URI.to_string(),
        vocabularies: [
            Vocabulary::Core,
            Vocabulary::Applicator,
            Vocabulary::Unevaluated,
            Vocabulary::Validation,
            Vocabulary::MetaData,
            Vocabulary::FormatAnnotation,
            Vocabulary::Content,
            Vocabulary::OpenApi,
        ]
        .as_slice()
        .into(),
    })
});

/// A well-known meta-schema by URI.
pub(crate) fn builtin(uri: &str) -> Option<Arc<MetaSchema>> {
    match crate::uri::fragmentless_str(uri) {
        DRAFT_2020_12_URI => Some(Arc::clone(&DRAFT_2020_12)),
        OPENAPI_31_DIALECT_URI => Some(Arc::clone(&OPENAPI_31_DIALECT)),
        _ => None,
    }
}

/// Build a meta-schema view from a custom meta-schema document.
///
/// Required vocabularies this engine does not implement raise
/// [`SchemaError::UnknownVocabulary`]; optional unknown ones are ignored.
/// A document without `$vocabulary` activates the full 2020-12 set.
pub(crate) fn from_document(uri: &str, document: &Value) -> Result<Arc<MetaSchema>, SchemaError> {
    let Some(declarations) = document.get("$vocabulary").and_then(Value::as_object) else {
        return Ok(Arc::new(MetaSchema {
            uri: uri.to_string(),
            vocabularies: DRAFT_2020_12.vocabularies.clone(),
        }));
    };
    let mut vocabularies = VocabularySet::default();
    for (vocabulary_uri, required) in declarations {
        let required = required.as_bool().unwrap_or(false);
        match Vocabulary::from_uri(vocabulary_uri) {
            Vocabulary::Custom(unknown) => {
                if required {
                    return Err(SchemaError::UnknownVocabulary { vocabulary: unknown });
                }
            }
            known => vocabularies.push(known),
        }
    }
    Ok(Arc::new(MetaSchema {
        uri: uri.to_string(),
        vocabularies,
    }))
}
