//! Validator for the `anyOf` keyword.
use serde_json::{Map, Value};

use crate::{
    compiler::{CompileCtx, Seg},
    context::{EvalContext, Frame},
    error::SchemaError,
    keywords::{discriminator, BoxedEvaluator, Evaluate},
    node::SchemaId,
    output::OutputUnit,
    paths::Location,
    vocabularies::Vocabulary,
};

pub(crate) struct AnyOfEvaluator {
    subschemas: Vec<SchemaId>,
}

impl Evaluate for AnyOfEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        _frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        let source = ctx.source();
        let mut nested = Vec::new();
        let mut valid = false;
        // Every branch runs: later keywords may consume their annotations
        for (index, subschema) in self.subschemas.iter().enumerate() {
            let branch_location = keyword_location.push_index(index);
            let unit = ctx.evaluate(*subschema, instance, instance_location, &branch_location);
            valid |= unit.valid;
            nested.push(unit);
        }
        Some(OutputUnit::applicator(
            source,
            "anyOf",
            instance_location,
            keyword_location,
            valid,
            nested,
        ))
    }
}

pub(crate) fn compile(
    ctx: &mut CompileCtx<'_>,
    parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    let Value::Array(subschemas) = value else {
        return Ok(None);
    };
    let mut compiled = Vec::with_capacity(subschemas.len());
    for (index, subschema) in subschemas.iter().enumerate() {
        compiled.push(ctx.subschema(subschema, &[Seg::Key("anyOf"), Seg::Index(index)])?);
    }
    if ctx.has_vocabulary(&Vocabulary::OpenApi) {
        if let Some(spec) = discriminator::parse_spec(parent.get("discriminator")) {
            return Ok(Some(Box::new(discriminator::DiscriminatedCombinator::new(
                "anyOf", spec,
            ))));
        }
    }
    Ok(Some(Box::new(AnyOfEvaluator {
        subschemas: compiled,
    })))
}
