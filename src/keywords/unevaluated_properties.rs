//! Validator for the `unevaluatedProperties` keyword.
use serde_json::{json, Map, Value};

use crate::{
    compiler::{CompileCtx, Seg},
    context::{EvalContext, Frame},
    error::SchemaError,
    keywords::{unevaluated, BoxedEvaluator, Evaluate},
    node::SchemaId,
    output::OutputUnit,
    paths::Location,
};

pub(crate) struct UnevaluatedPropertiesEvaluator {
    subschema: SchemaId,
}

impl Evaluate for UnevaluatedPropertiesEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        let Value::Object(object) = instance else {
            return Some(OutputUnit::pass(
                ctx.source(),
                "unevaluatedProperties",
                instance_location,
                keyword_location,
            ));
        };
        let location = instance_location.to_pointer();
        let coverage = unevaluated::covered_keys(frame.units(), &location);
        let source = ctx.source();
        let mut nested = Vec::new();
        let mut evaluated = Vec::new();
        let mut valid = true;
        for (name, value) in object {
            if coverage.contains(name) {
                continue;
            }
            let property_location = instance_location.push(name);
            let unit = ctx.evaluate(self.subschema, value, &property_location, keyword_location);
            valid &= unit.valid;
            evaluated.push(name.clone());
            nested.push(unit);
        }
        Some(
            OutputUnit::applicator(
                source,
                "unevaluatedProperties",
                instance_location,
                keyword_location,
                valid,
                nested,
            )
            .with_annotation(json!(evaluated)),
        )
    }
}

pub(crate) fn compile(
    ctx: &mut CompileCtx<'_>,
    _parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    let subschema = ctx.subschema(value, &[Seg::Key("unevaluatedProperties")])?;
    Ok(Some(Box::new(UnevaluatedPropertiesEvaluator { subschema })))
}
