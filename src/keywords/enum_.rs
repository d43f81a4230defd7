//! Validator for the `enum` keyword.
use serde_json::{Map, Value};

use crate::{
    compiler::CompileCtx,
    context::{EvalContext, Frame},
    error::{ErrorKind, SchemaError},
    keywords::{helpers, BoxedEvaluator, Evaluate},
    output::OutputUnit,
    paths::Location,
};

pub(crate) struct EnumEvaluator {
    options: Vec<Value>,
}

impl Evaluate for EnumEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        _frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        let valid = self
            .options
            .iter()
            .any(|option| helpers::equal(instance, option));
        Some(if valid {
            OutputUnit::pass(ctx.source(), "enum", instance_location, keyword_location)
        } else {
            OutputUnit::fail(
                ctx.source(),
                "enum",
                instance_location,
                keyword_location,
                ErrorKind::Enum {
                    options: Value::Array(self.options.clone()),
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
        Value::Array(options) => Ok(Some(Box::new(EnumEvaluator {
            options: options.clone(),
        }))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"enum": [1, 2, 3]}), &json!(2))]
    #[test_case(&json!({"enum": [1.0]}), &json!(1); "numeric equivalence")]
    #[test_case(&json!({"enum": [{"a": [1.0]}]}), &json!({"a": [1]}))]
    fn valid(schema: &Value, instance: &Value) {
        tests_util::is_valid(schema, instance);
    }

    #[test_case(&json!({"enum": [1, 2, 3]}), &json!(4))]
    #[test_case(&json!({"enum": ["1"]}), &json!(1))]
    fn invalid(schema: &Value, instance: &Value) {
        tests_util::is_not_valid(schema, instance);
    }
}
