//! Validator for the `maxProperties` keyword.
use serde_json::{Map, Value};

use crate::{
    compiler::CompileCtx,
    context::{EvalContext, Frame},
    error::{ErrorKind, SchemaError},
    keywords::{BoxedEvaluator, Evaluate},
    output::OutputUnit,
    paths::Location,
};

pub(crate) struct MaxPropertiesEvaluator {
    limit: u64,
}

impl Evaluate for MaxPropertiesEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        _frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        let valid = match instance {
            Value::Object(object) => object.len() as u64 <= self.limit,
            _ => true,
        };
        Some(if valid {
            OutputUnit::pass(
                ctx.source(),
                "maxProperties",
                instance_location,
                keyword_location,
            )
        } else {
            OutputUnit::fail(
                ctx.source(),
                "maxProperties",
                instance_location,
                keyword_location,
                ErrorKind::MaxProperties { limit: self.limit },
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
        Some(limit) => Ok(Some(Box::new(MaxPropertiesEvaluator { limit }))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::json;

    #[test]
    fn bounds() {
        tests_util::is_valid(&json!({"maxProperties": 1}), &json!({"a": 1}));
        tests_util::is_not_valid(&json!({"maxProperties": 1}), &json!({"a": 1, "b": 2}));
    }
}
