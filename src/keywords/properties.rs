//! Validator for the `properties` keyword.
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

pub(crate) struct PropertiesEvaluator {
    properties: Vec<(String, Value, SchemaId)>,
}

impl Evaluate for PropertiesEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        _frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        let Value::Object(object) = instance else {
            return Some(OutputUnit::pass(
                ctx.source(),
                "properties",
                instance_location,
                keyword_location,
            ));
        };
        let source = ctx.source();
        let mut nested = Vec::new();
        let mut evaluated = Vec::new();
        let mut valid = true;
        for (name, raw, subschema) in &self.properties {
            let Some(value) = object.get(name.as_str()) else {
                continue;
            };
            for hook in &ctx.options.before_property_validation {
                hook(object, name, raw);
            }
            let property_location = instance_location.push(name);
            let subschema_location = keyword_location.push(name);
            let unit = ctx.evaluate(*subschema, value, &property_location, &subschema_location);
            for hook in &ctx.options.after_property_validation {
                hook(object, name, raw);
            }
            valid &= unit.valid;
            evaluated.push(name.clone());
            nested.push(unit);
        }
        Some(
            OutputUnit::applicator(
                source,
                "properties",
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
    let Value::Object(map) = value else {
        return Ok(None);
    };
    let mut properties = Vec::with_capacity(map.len());
    for (name, subschema) in map {
        let compiled = ctx.subschema(subschema, &[Seg::Key("properties"), Seg::Key(name)])?;
        properties.push((name.clone(), subschema.clone(), compiled));
    }
    Ok(Some(Box::new(PropertiesEvaluator { properties })))
}
