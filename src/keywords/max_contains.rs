//! Validator for the `maxContains` keyword, reading the `contains`
//! annotation.
use serde_json::{Map, Value};

use crate::{
    compiler::CompileCtx,
    context::{EvalContext, Frame},
    error::{ErrorKind, SchemaError},
    keywords::{BoxedEvaluator, Evaluate},
    output::OutputUnit,
    paths::Location,
};

pub(crate) struct MaxContainsEvaluator {
    limit: u64,
}

impl Evaluate for MaxContainsEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        if !instance.is_array() {
            return Some(OutputUnit::pass(
                ctx.source(),
                "maxContains",
                instance_location,
                keyword_location,
            ));
        }
        let found = frame
            .annotation("contains")
            .and_then(Value::as_array)
            .map(Vec::len)?;
        Some(if found as u64 <= self.limit {
            OutputUnit::pass(
                ctx.source(),
                "maxContains",
                instance_location,
                keyword_location,
            )
        } else {
            OutputUnit::fail(
                ctx.source(),
                "maxContains",
                instance_location,
                keyword_location,
                ErrorKind::MaxContains {
                    limit: self.limit,
                    found,
                },
            )
        })
    }
}

pub(crate) fn compile(
    _ctx: &mut CompileCtx<'_>,
    parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    if !parent.contains_key("contains") {
        return Ok(None);
    }
    match value.as_u64() {
        Some(limit) => Ok(Some(Box::new(MaxContainsEvaluator { limit }))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::json;

    #[test]
    fn caps_matching_items() {
        let schema = json!({"contains": {"minimum": 5}, "maxContains": 1});
        tests_util::is_valid(&schema, &json!([5, 1]));
        tests_util::is_not_valid(&schema, &json!([5, 6]));
    }
}
