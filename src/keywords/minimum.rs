//! Validator for the `minimum` keyword.
use serde_json::{Map, Number, Value};

use crate::{
    compiler::CompileCtx,
    context::{EvalContext, Frame},
    error::{ErrorKind, SchemaError},
    keywords::{helpers, BoxedEvaluator, Evaluate},
    output::OutputUnit,
    paths::Location,
};

pub(crate) struct MinimumEvaluator {
    limit: Number,
}

impl Evaluate for MinimumEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        _frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        let valid = match instance {
            Value::Number(number) => helpers::num_ge(number, &self.limit),
            _ => true,
        };
        Some(if valid {
            OutputUnit::pass(ctx.source(), "minimum", instance_location, keyword_location)
        } else {
            OutputUnit::fail(
                ctx.source(),
                "minimum",
                instance_location,
                keyword_location,
                ErrorKind::Minimum {
                    limit: self.limit.clone(),
                },
            )
        })
    }
}

pub(crate) fn compile(
    _ctx: &mut CompileCtx<'_>,
    _parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    match value {
        Value::Number(limit) => Ok(Some(Box::new(MinimumEvaluator {
            limit: limit.clone(),
        }))),
        _ => Ok(None),
    }
}
