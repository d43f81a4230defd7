//! Validator for the `minContains` keyword, reading the `contains`
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

pub(crate) struct MinContainsEvaluator {
    limit: u64,
}

impl Evaluate for MinContainsEvaluator {
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
                "minContains",
                instance_location,
                keyword_location,
            ));
        }
        let found = frame
            .annotation("contains")
            .and_then(Value::as_array)
            .map(Vec::len)?;
        Some(if found as u64 >= self.limit {
            OutputUnit::pass(
                ctx.source(),
                "minContains",
                instance_location,
                keyword_location,
            )
        } else {
            OutputUnit::fail(
                ctx.source(),
                "minContains",
                instance_location,
                keyword_location,
                ErrorKind::MinContains {
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
        Some(limit) => Ok(Some(Box::new(MinContainsEvaluator { limit }))),
        None => Ok(None),
    }
}
