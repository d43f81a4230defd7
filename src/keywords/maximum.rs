//! Validator for the `maximum` keyword.
use serde_json::{Map, Number, Value};

use crate::{
    compiler::CompileCtx,
    context::{EvalContext, Frame},
    error::{ErrorKind, SchemaError},
    keywords::{helpers, BoxedEvaluator, Evaluate},
    output::OutputUnit,
    paths::Location,
};

pub(crate) struct MaximumEvaluator {
    limit: Number,
}

impl Evaluate for MaximumEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        _frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        let valid = match instance {
            Value::Number(number) => helpers::num_le(number, &self.limit),
            _ => true,
        };
        Some(if valid {
            OutputUnit::pass(ctx.source(), "maximum", instance_location, keyword_location)
        } else {
            OutputUnit::fail(
                ctx.source(),
                "maximum",
                instance_location,
                keyword_location,
                ErrorKind::Maximum {
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
        Value::Number(limit) => Ok(Some(Box::new(MaximumEvaluator {
            limit: limit.clone(),
        }))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"maximum": 3}), &json!(3))]
    #[test_case(&json!({"maximum": 3.0}), &json!(2.5))]
    #[test_case(&json!({"maximum": 3}), &json!("string"))]
    fn valid(schema: &Value, instance: &Value) {
        tests_util::is_valid(schema, instance);
    }

    #[test_case(&json!({"maximum": 3}), &json!(3.5))]
    #[test_case(&json!({"maximum": 3.0}), &json!(4))]
    fn invalid(schema: &Value, instance: &Value) {
        tests_util::is_not_valid(schema, instance);
    }
}
