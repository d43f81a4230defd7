//! Validator for the `maxLength` keyword.
use serde_json::{Map, Value};

use crate::{
    compiler::CompileCtx,
    context::{EvalContext, Frame},
    error::{ErrorKind, SchemaError},
    keywords::{BoxedEvaluator, Evaluate},
    output::OutputUnit,
    paths::Location,
};

pub(crate) struct MaxLengthEvaluator {
    limit: u64,
}

impl Evaluate for MaxLengthEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        _frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        let valid = match instance {
            // Unicode code points, not bytes
            Value::String(item) => bytecount::num_chars(item.as_bytes()) as u64 <= self.limit,
            _ => true,
        };
        Some(if valid {
            OutputUnit::pass(ctx.source(), "maxLength", instance_location, keyword_location)
        } else {
            OutputUnit::fail(
                ctx.source(),
                "maxLength",
                instance_location,
                keyword_location,
                ErrorKind::MaxLength { limit: self.limit },
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
        Some(limit) => Ok(Some(Box::new(MaxLengthEvaluator { limit }))),
        None => Ok(None),
    }
}
