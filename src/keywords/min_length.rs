//! Validator for the `minLength` keyword.
use serde_json::{Map, Value};

use crate::{
    compiler::CompileCtx,
    context::{EvalContext, Frame},
    error::{ErrorKind, SchemaError},
    keywords::{BoxedEvaluator, Evaluate},
    output::OutputUnit,
    paths::Location,
};

pub(crate) struct MinLengthEvaluator {
    limit: u64,
}

impl Evaluate for MinLengthEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        _frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        let valid = match instance {
            Value::String(item) => bytecount::num_chars(item.as_bytes()) as u64 >= self.limit,
            _ => true,
        };
        Some(if valid {
            OutputUnit::pass(ctx.source(), "minLength", instance_location, keyword_location)
        } else {
            OutputUnit::fail(
                ctx.source(),
                "minLength",
                instance_location,
                keyword_location,
                ErrorKind::MinLength { limit: self.limit },
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
        Some(limit) => Ok(Some(Box::new(MinLengthEvaluator { limit }))),
        None => Ok(None),
    }
}
