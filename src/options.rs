//! Configuration options for schema compilation and validation.
use std::sync::Arc;

use ahash::AHashMap;
use once_cell::sync::Lazy;
use serde_json::{Map, Value};

use crate::{
    content::{ContentEncoding, ContentMediaType},
    error::SchemaError,
    formats::Format,
    output::OutputFormat,
    patterns::{PatternEngine, RegexDialect},
    retriever::{DefaultRetriever, Retrieve},
    validator::Validator,
    vocabularies::Vocabulary,
};

/// Whether `required` evaluates for reading or writing; `readOnly` and
/// `writeOnly` properties are exempted accordingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

/// A hook invoked around each `properties` entry; receives the object, the
/// property name and the property subschema value. Hooks carry no
/// validation semantics.
pub type PropertyHook = Arc<dyn Fn(&Map<String, Value>, &str, &Value) + Send + Sync>;

/// Configuration for building a [`Validator`].
#[derive(Clone)]
pub struct ValidationOptions {
    pub(crate) base_uri: Option<String>,
    pub(crate) meta_schema: Option<String>,
    pub(crate) vocabularies: Option<Vec<Vocabulary>>,
    pub(crate) validate_formats: Option<bool>,
    pub(crate) formats: AHashMap<String, Arc<dyn Format>>,
    pub(crate) content_encodings: AHashMap<String, Arc<dyn ContentEncoding>>,
    pub(crate) content_media_types: AHashMap<String, Arc<dyn ContentMediaType>>,
    pub(crate) retriever: Arc<dyn Retrieve>,
    pub(crate) regex_dialect: RegexDialect,
    pub(crate) output_format: OutputFormat,
    pub(crate) access_mode: Option<AccessMode>,
    pub(crate) before_property_validation: Vec<PropertyHook>,
    pub(crate) after_property_validation: Vec<PropertyHook>,
    pub(crate) insert_property_defaults: bool,
    pub(crate) validate_schema: bool,
}

/// Process-wide defaults; per-build overrides clone and never mutate these.
static DEFAULTS: Lazy<ValidationOptions> = Lazy::new(|| ValidationOptions {
    base_uri: None,
    meta_schema: None,
    vocabularies: None,
    validate_formats: None,
    formats: AHashMap::default(),
    content_encodings: AHashMap::default(),
    content_media_types: AHashMap::default(),
    retriever: Arc::new(DefaultRetriever),
    regex_dialect: RegexDialect::Native,
    output_format: OutputFormat::Classic,
    access_mode: None,
    before_property_validation: Vec::new(),
    after_property_validation: Vec::new(),
    insert_property_defaults: false,
    validate_schema: true,
});

impl Default for ValidationOptions {
    fn default() -> Self {
        DEFAULTS.clone()
    }
}

impl ValidationOptions {
    /// Build a validator for `schema` using the current options.
    ///
    /// ```rust
    /// use serde_json::json;
    ///
    /// let schema = json!({"type": "string"});
    /// let validator = jschema::options()
    ///     .build(&schema)
    ///     .expect("A valid schema");
    ///
    /// assert!(validator.is_valid(&json!("Hello")));
    /// assert!(!validator.is_valid(&json!(42)));
    /// ```
    pub fn build(&self, schema: &Value) -> Result<Validator, SchemaError> {
        Validator::from_options(self.clone(), schema)
    }

    /// Set the base URI against which the root schema's references resolve.
    pub fn with_base_uri(&mut self, base_uri: impl Into<String>) -> &mut Self {
        self.base_uri = Some(base_uri.into());
        self
    }

    /// Select the meta-schema by URI, overriding `$schema` detection.
    pub fn with_meta_schema(&mut self, uri: impl Into<String>) -> &mut Self {
        self.meta_schema = Some(uri.into());
        self
    }

    /// Activate a vocabulary explicitly, overriding what the meta-schema
    /// declares. The first call replaces the declared set; keywords of
    /// inactive vocabularies become annotations.
    pub fn with_vocabulary(&mut self, vocabulary: Vocabulary) -> &mut Self {
        self.vocabularies
            .get_or_insert_with(Vec::new)
            .push(vocabulary);
        self
    }

    /// Turn `format` into an assertion (`true`) or an annotation (`false`).
    /// Unset, the active vocabularies decide.
    pub fn should_validate_formats(&mut self, yes: bool) -> &mut Self {
        self.validate_formats = Some(yes);
        self
    }

    /// Register a custom format validator.
    ///
    /// ```rust
    /// let mut options = jschema::options();
    /// options.with_format("ends-with-42", |value: &str| value.ends_with("42"));
    /// ```
    pub fn with_format(&mut self, name: impl Into<String>, format: impl Format) -> &mut Self {
        self.formats.insert(name.into(), Arc::new(format));
        self
    }

    /// Register a custom content encoding.
    pub fn with_content_encoding(
        &mut self,
        name: impl Into<String>,
        encoding: impl ContentEncoding,
    ) -> &mut Self {
        self.content_encodings.insert(name.into(), Arc::new(encoding));
        self
    }

    /// Register a custom content media type.
    pub fn with_content_media_type(
        &mut self,
        name: impl Into<String>,
        media_type: impl ContentMediaType,
    ) -> &mut Self {
        self.content_media_types
            .insert(name.into(), Arc::new(media_type));
        self
    }

    /// Set the retriever used to fetch external documents during
    /// compilation.
    pub fn with_retriever(&mut self, retriever: impl Retrieve + 'static) -> &mut Self {
        self.retriever = Arc::new(retriever);
        self
    }

    /// Select the regex dialect for `pattern` and `patternProperties`.
    pub fn with_regex_dialect(&mut self, dialect: RegexDialect) -> &mut Self {
        self.regex_dialect = dialect;
        self
    }

    /// Delegate pattern compilation to a custom engine.
    pub fn with_pattern_engine(&mut self, engine: impl PatternEngine + 'static) -> &mut Self {
        self.regex_dialect = RegexDialect::Custom(Arc::new(engine));
        self
    }

    /// Set the output format used by [`crate::Output::configured`].
    pub fn with_output_format(&mut self, format: OutputFormat) -> &mut Self {
        self.output_format = format;
        self
    }

    /// Evaluate `required` for reads or writes.
    pub fn with_access_mode(&mut self, mode: AccessMode) -> &mut Self {
        self.access_mode = Some(mode);
        self
    }

    /// Add a hook invoked before each `properties` entry is validated.
    pub fn with_before_property_validation<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&Map<String, Value>, &str, &Value) + Send + Sync + 'static,
    {
        self.before_property_validation.push(Arc::new(hook));
        self
    }

    /// Add a hook invoked after each `properties` entry is validated.
    pub fn with_after_property_validation<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&Map<String, Value>, &str, &Value) + Send + Sync + 'static,
    {
        self.after_property_validation.push(Arc::new(hook));
        self
    }

    /// Accepted for API compatibility; defaults are surfaced as annotations
    /// and the instance is never mutated.
    pub fn with_insert_property_defaults(&mut self, yes: bool) -> &mut Self {
        self.insert_property_defaults = yes;
        self
    }

    /// Skip meta-schema validation of the input schema.
    pub fn without_schema_validation(&mut self) -> &mut Self {
        self.validate_schema = false;
        self
    }
}
