//! The OpenAPI 3.1 `discriminator` keyword and the discriminator-aware
//! combinators.
use serde_json::{Map, Value};

use crate::{
    compiler::CompileCtx,
    context::{EvalContext, Frame},
    error::{ErrorKind, SchemaError},
    keywords::{BoxedEvaluator, Evaluate},
    node::SchemaId,
    output::OutputUnit,
    paths::Location,
};

/// Parsed `discriminator` object: the property to dispatch on and the
/// optional value → schema mapping.
pub(crate) struct DiscriminatorSpec {
    property_name: String,
    mapping: Vec<(String, String)>,
}

pub(crate) fn parse_spec(value: Option<&Value>) -> Option<DiscriminatorSpec> {
    let object = value?.as_object()?;
    let property_name = object.get("propertyName")?.as_str()?.to_string();
    let mapping = object
        .get("mapping")
        .and_then(Value::as_object)
        .map(|mapping| {
            mapping
                .iter()
                .filter_map(|(value, target)| {
                    target.as_str().map(|target| (value.clone(), target.to_string()))
                })
                .collect()
        })
        .unwrap_or_default();
    Some(DiscriminatorSpec {
        property_name,
        mapping,
    })
}

impl DiscriminatorSpec {
    /// Resolve the schema selected by the discriminator value: the mapping
    /// entry when present (a full reference or a bare component name),
    /// otherwise `#/components/schemas/{value}`.
    fn target(&self, ctx: &EvalContext<'_>, value: &str) -> Option<SchemaId> {
        let reference = match self.mapping.iter().find(|(key, _)| key == value) {
            Some((_, target)) => {
                if target.contains('/') || target.contains('#') || target.contains(':') {
                    target.clone()
                } else {
                    format!("#/components/schemas/{target}")
                }
            }
            None => format!("#/components/schemas/{value}"),
        };
        let base = &ctx.arena.get(ctx.source()).base_uri;
        let uri = crate::uri::resolve_against(base, &reference).ok()?;
        ctx.resources.lookup_lexical(uri.as_str())
    }

    fn dispatch(
        &self,
        ctx: &mut EvalContext<'_>,
        keyword: &'static str,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
    ) -> Option<OutputUnit> {
        // Consume the single-skip guard set by the dispatch that brought us
        // here through a $ref back into this schema
        if ctx.discriminator_skip {
            ctx.discriminator_skip = false;
            return None;
        }
        let source = ctx.source();
        let Value::Object(object) = instance else {
            return Some(OutputUnit::pass(
                source,
                keyword,
                instance_location,
                keyword_location,
            ));
        };
        let Some(value) = object.get(self.property_name.as_str()) else {
            return Some(OutputUnit::fail(
                source,
                keyword,
                instance_location,
                keyword_location,
                ErrorKind::DiscriminatorMissingProperty {
                    property: self.property_name.as_str().into(),
                },
            ));
        };
        let Some(target) = value.as_str().and_then(|value| self.target(ctx, value)) else {
            return Some(OutputUnit::fail(
                source,
                keyword,
                instance_location,
                keyword_location,
                ErrorKind::DiscriminatorUnknownValue {
                    value: value.to_string(),
                },
            ));
        };
        let previous = ctx.discriminator_skip;
        ctx.discriminator_skip = true;
        let inner = ctx.evaluate(target, instance, instance_location, keyword_location);
        ctx.discriminator_skip = previous;
        let valid = inner.valid;
        Some(OutputUnit::applicator(
            source,
            keyword,
            instance_location,
            keyword_location,
            valid,
            vec![inner],
        ))
    }
}

/// The standalone `discriminator` keyword (the `allOf` inheritance shape).
pub(crate) struct DiscriminatorEvaluator {
    spec: DiscriminatorSpec,
}

impl Evaluate for DiscriminatorEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        _frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        self.spec.dispatch(
            ctx,
            "discriminator",
            instance,
            instance_location,
            keyword_location,
        )
    }
}

/// `anyOf`/`oneOf` with an adjacent `discriminator`: only the selected
/// branch is evaluated.
pub(crate) struct DiscriminatedCombinator {
    keyword: &'static str,
    spec: DiscriminatorSpec,
}

impl DiscriminatedCombinator {
    pub(crate) fn new(keyword: &'static str, spec: DiscriminatorSpec) -> DiscriminatedCombinator {
        DiscriminatedCombinator { keyword, spec }
    }
}

impl Evaluate for DiscriminatedCombinator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        _frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        self.spec.dispatch(
            ctx,
            self.keyword,
            instance,
            instance_location,
            keyword_location,
        )
    }
}

pub(crate) fn compile(
    _ctx: &mut CompileCtx<'_>,
    parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    // With an adjacent combinator the combinator owns the dispatch
    if parent.contains_key("oneOf") || parent.contains_key("anyOf") {
        return Ok(None);
    }
    match parse_spec(Some(value)) {
        Some(spec) => Ok(Some(Box::new(DiscriminatorEvaluator { spec }))),
        None => Ok(None),
    }
}
