//! Validator for the `allOf` keyword.
use serde_json::{Map, Value};

use crate::{
    compiler::{CompileCtx, Seg},
    context::{EvalContext, Frame},
    error::SchemaError,
    keywords::{BoxedEvaluator, Evaluate},
    node::SchemaId,
    output::OutputUnit,
    paths::Location,
};

pub(crate) struct AllOfEvaluator {
    subschemas: Vec<SchemaId>,
}

impl Evaluate for AllOfEvaluator {
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
        let mut valid = true;
        for (index, subschema) in self.subschemas.iter().enumerate() {
            let branch_location = keyword_location.push_index(index);
            let unit = ctx.evaluate(*subschema, instance, instance_location, &branch_location);
            valid &= unit.valid;
            nested.push(unit);
            if !valid && ctx.short_circuit {
                break;
            }
        }
        Some(OutputUnit::applicator(
            source,
            "allOf",
            instance_location,
            keyword_location,
            valid,
            nested,
        ))
    }
}

pub(crate) fn compile(
    ctx: &mut CompileCtx<'_>,
    _parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    let Value::Array(subschemas) = value else {
        return Ok(None);
    };
    let mut compiled = Vec::with_capacity(subschemas.len());
    for (index, subschema) in subschemas.iter().enumerate() {
        compiled.push(ctx.subschema(subschema, &[Seg::Key("allOf"), Seg::Index(index)])?);
    }
    Ok(Some(Box::new(AllOfEvaluator {
        subschemas: compiled,
    })))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::json;

    #[test]
    fn every_branch_must_pass() {
        let schema = json!({"allOf": [{"type": "integer"}, {"minimum": 2}]});
        tests_util::is_valid(&schema, &json!(3));
        tests_util::is_not_valid(&schema, &json!(1));
        tests_util::is_not_valid(&schema, &json!(2.5));
    }
}
