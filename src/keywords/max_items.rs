//! Validator for the `maxItems` keyword.
use serde_json::{Map, Value};

use crate::{
    compiler::CompileCtx,
    context::{EvalContext, Frame},
    error::{ErrorKind, SchemaError},
    keywords::{BoxedEvaluator, Evaluate},
    output::OutputUnit,
    paths::Location,
};

pub(crate) struct MaxItemsEvaluator {
    limit: u64,
}

impl Evaluate for MaxItemsEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        _frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        let valid = match instance {
            Value::Array(items) => items.len() as u64 <= self.limit,
            _ => true,
        };
        Some(if valid {
            OutputUnit::pass(ctx.source(), "maxItems", instance_location, keyword_location)
        } else {
            OutputUnit::fail(
                ctx.source(),
                "maxItems",
                instance_location,
                keyword_location,
                ErrorKind::MaxItems { limit: self.limit },
            )
        })
    }
}

pub(crate) fn compile(
    _ctx: &mut CompileCtx<'_>,
    _parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    match value.as_u64() {
        Some(limit) => Ok(Some(Box::new(MaxItemsEvaluator { limit }))),
        None => Ok(None),
    }
}
