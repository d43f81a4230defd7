//! The compiled validator and its public validation API.
use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::{
    compiler::{Compiler, Document},
    context::EvalContext,
    error::SchemaError,
    meta,
    node::{Arena, SchemaId},
    options::ValidationOptions,
    output::{self, ClassicOutput, FlagOutput, OutputFormat, OutputUnit},
    paths::Location,
    resources::Resources,
    uri, vocabularies,
};

pub(crate) struct ValidatorInner {
    pub(crate) options: ValidationOptions,
    pub(crate) arena: Arena,
    pub(crate) resources: Resources,
    pub(crate) documents: Vec<Document>,
}

/// A compiled schema, immutable and shareable across threads; each
/// validation call owns its own context.
#[derive(Clone)]
pub struct Validator {
    pub(crate) inner: Arc<ValidatorInner>,
    pub(crate) root: SchemaId,
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator").finish_non_exhaustive()
    }
}

impl Validator {
    /// Start building a validator with non-default options.
    #[must_use]
    pub fn options() -> ValidationOptions {
        crate::options()
    }

    pub(crate) fn from_options(
        options: ValidationOptions,
        schema: &Value,
    ) -> Result<Validator, SchemaError> {
        if options.validate_schema {
            // Custom meta-schemas have no bundled validator to check against
            let custom_meta = schema
                .get("$schema")
                .and_then(Value::as_str)
                .is_some_and(|uri| vocabularies::builtin(uri).is_none());
            if !custom_meta {
                let report = meta::validate(schema);
                if let Some(first) = report.errors.first() {
                    return Err(SchemaError::InvalidSchema {
                        message: first.error.clone(),
                    });
                }
            }
        }
        let mut compiler = Compiler::new(options);
        let base = compiler.root_base()?;
        let root = compiler.compile_document(schema.clone(), base, None)?;
        compiler.resolve_pending()?;
        Ok(Validator::from_compiler(compiler, root))
    }

    pub(crate) fn from_compiler(compiler: Compiler, root: SchemaId) -> Validator {
        let (options, arena, resources, documents) = compiler.into_parts();
        Validator {
            inner: Arc::new(ValidatorInner {
                options,
                arena,
                resources,
                documents,
            }),
            root,
        }
    }

    /// A validator sharing this one's arena, rooted at the schema
    /// registered under `canonical_uri`.
    pub(crate) fn subvalidator(&self, canonical_uri: &str) -> Option<Validator> {
        let root = self.inner.resources.lookup_lexical(canonical_uri)?;
        Some(Validator {
            inner: Arc::clone(&self.inner),
            root,
        })
    }

    pub(crate) fn evaluate_root(&self, instance: &Value, short_circuit: bool) -> OutputUnit {
        let mut ctx = EvalContext::new(
            &self.inner.arena,
            &self.inner.resources,
            &self.inner.options,
            short_circuit,
        );
        ctx.evaluate(self.root, instance, &Location::Root, &Location::Root)
    }

    /// Whether `instance` is valid; stops at the first failure.
    #[must_use]
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.evaluate_root(instance, true).valid
    }

    /// Validate `instance` and report classic errors.
    #[must_use]
    pub fn validate(&self, instance: &Value) -> ClassicOutput {
        output::classic(
            &self.inner.arena,
            instance,
            &self.evaluate_root(instance, false),
        )
    }

    /// Validate `instance` and shape the result as `format`.
    #[must_use]
    pub fn validate_with(&self, instance: &Value, format: OutputFormat) -> Value {
        self.apply(instance).format(format)
    }

    /// Apply the schema to `instance`, giving access to every output shape.
    #[must_use]
    pub fn apply<'a, 'b>(&'a self, instance: &'b Value) -> Output<'a, 'b> {
        Output {
            validator: self,
            instance,
        }
    }

    /// A self-contained document embedding every external resource this
    /// validator pulled in, keyed by URI under `$defs`. Recompiling the
    /// result validates the same instances with no retriever.
    #[must_use]
    pub fn bundle(&self) -> Value {
        let documents = &self.inner.documents;
        let root_document = documents
            .first()
            .expect("a validator owns at least one document");
        let mut bundled = (*root_document.root_value).clone();
        if documents.len() == 1 {
            return bundled;
        }
        let Value::Object(map) = &mut bundled else {
            return bundled;
        };
        let defs = map
            .entry("$defs")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(defs) = defs {
            for document in &documents[1..] {
                let base = uri::fragmentless_str(document.base.as_str()).to_string();
                let mut embedded = (*document.root_value).clone();
                if let Value::Object(embedded) = &mut embedded {
                    embedded.insert("$id".to_string(), json!(base));
                }
                defs.insert(base, embedded);
            }
        }
        bundled
    }
}

/// The application of a schema to one instance; shapes are computed on
/// demand.
#[derive(Clone, Copy)]
pub struct Output<'a, 'b> {
    validator: &'a Validator,
    instance: &'b Value,
}

impl Output<'_, '_> {
    /// The `flag` shape: validity only, computed with short-circuiting.
    #[must_use]
    pub fn flag(&self) -> FlagOutput {
        FlagOutput {
            valid: self.validator.is_valid(self.instance),
        }
    }

    /// The `basic` shape: a flat list of leaf units.
    #[must_use]
    pub fn basic(&self) -> Value {
        let unit = self.validator.evaluate_root(self.instance, false);
        output::basic(&self.validator.inner.arena, self.instance, &unit)
    }

    /// The `detailed` shape: the tree with single-child chains collapsed.
    #[must_use]
    pub fn detailed(&self) -> Value {
        let unit = self.validator.evaluate_root(self.instance, false);
        output::detailed(&self.validator.inner.arena, self.instance, &unit)
    }

    /// The `verbose` shape: the full result tree.
    #[must_use]
    pub fn verbose(&self) -> Value {
        let unit = self.validator.evaluate_root(self.instance, false);
        output::verbose(&self.validator.inner.arena, self.instance, &unit)
    }

    /// The `classic` shape: a flat list of leaf errors.
    #[must_use]
    pub fn classic(&self) -> ClassicOutput {
        self.validator.validate(self.instance)
    }

    /// Shape the application as `format`.
    #[must_use]
    pub fn format(&self, format: OutputFormat) -> Value {
        match format {
            OutputFormat::Flag => serde_json::to_value(self.flag()).expect("serializable"),
            OutputFormat::Basic => self.basic(),
            OutputFormat::Detailed => self.detailed(),
            OutputFormat::Verbose => self.verbose(),
            OutputFormat::Classic => {
                serde_json::to_value(self.classic()).expect("serializable")
            }
        }
    }

    /// Shape the application as the configured output format.
    #[must_use]
    pub fn configured(&self) -> Value {
        self.format(self.validator.inner.options.output_format)
    }
}
