//! Validator for the `patternProperties` keyword.
use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::{
    compiler::{CompileCtx, Seg},
    context::{EvalContext, Frame},
    error::SchemaError,
    keywords::{BoxedEvaluator, Evaluate},
    node::SchemaId,
    output::OutputUnit,
    patterns::CompiledPattern,
    paths::Location,
};

pub(crate) struct PatternPropertiesEvaluator {
    patterns: Vec<(String, Arc<CompiledPattern>, SchemaId)>,
}

impl Evaluate for PatternPropertiesEvaluator {
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
                "patternProperties",
                instance_location,
                keyword_location,
            ));
        };
        let source = ctx.source();
        let mut nested = Vec::new();
        let mut evaluated = Vec::new();
        let mut valid = true;
        for (pattern, compiled, subschema) in &self.patterns {
            for (name, value) in object {
                if !compiled.is_match(name) {
                    continue;
                }
                let property_location = instance_location.push(name);
                let pattern_location = keyword_location.push(pattern);
                let unit = ctx.evaluate(*subschema, value, &property_location, &pattern_location);
                valid &= unit.valid;
                if !evaluated.contains(name) {
                    evaluated.push(name.clone());
                }
                nested.push(unit);
            }
        }
        Some(
            OutputUnit::applicator(
                source,
                "patternProperties",
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
    let mut patterns = Vec::with_capacity(map.len());
    for (pattern, subschema) in map {
        let compiled = ctx.pattern(pattern)?;
        let subschema =
            ctx.subschema(subschema, &[Seg::Key("patternProperties"), Seg::Key(pattern)])?;
        patterns.push((pattern.clone(), compiled, subschema));
    }
    Ok(Some(Box::new(PatternPropertiesEvaluator { patterns })))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::json;

    #[test]
    fn matching_keys_validate() {
        let schema = json!({"patternProperties": {"^f": {"type": "integer"}}});
        tests_util::is_valid(&schema, &json!({"foo": 1, "bar": "x"}));
        tests_util::is_not_valid(&schema, &json!({"foo": "x"}));
    }

    #[test]
    fn patterns_match_anywhere_in_the_key() {
        let schema = json!({"patternProperties": {"o": {"type": "integer"}}});
        tests_util::is_not_valid(&schema, &json!({"foo": "x"}));
    }
}
