//! Validator for the `additionalProperties` keyword.
use ahash::AHashSet;
use serde_json::{json, Map, Value};

use crate::{
    compiler::{CompileCtx, Seg},
    context::{EvalContext, Frame},
    error::SchemaError,
    keywords::{BoxedEvaluator, Evaluate},
    node::SchemaId,
    output::OutputUnit,
    paths::Location,
};

pub(crate) struct AdditionalPropertiesEvaluator {
    subschema: SchemaId,
}

/// Keys listed in a sibling keyword's annotation.
fn annotated_keys<'f>(frame: &Frame<'f>, keyword: &str, keys: &mut AHashSet<&'f str>) {
    if let Some(Value::Array(names)) = frame.annotation(keyword) {
        keys.extend(names.iter().filter_map(Value::as_str));
    }
}

impl Evaluate for AdditionalPropertiesEvaluator {
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
                "additionalProperties",
                instance_location,
                keyword_location,
            ));
        };
        let mut covered = AHashSet::new();
        annotated_keys(frame, "properties", &mut covered);
        annotated_keys(frame, "patternProperties", &mut covered);
        let source = ctx.source();
        let mut nested = Vec::new();
        let mut evaluated = Vec::new();
        let mut valid = true;
        for (name, value) in object {
            if covered.contains(name.as_str()) {
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
                "additionalProperties",
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
    let subschema = ctx.subschema(value, &[Seg::Key("additionalProperties")])?;
    Ok(Some(Box::new(AdditionalPropertiesEvaluator { subschema })))
}
