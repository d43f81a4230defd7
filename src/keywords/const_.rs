//! Validator for the `const` keyword.
use serde_json::{Map, Value};

use crate::{
    compiler::CompileCtx,
    context::{EvalContext, Frame},
    error::{ErrorKind, SchemaError},
    keywords::{helpers, BoxedEvaluator, Evaluate},
    output::OutputUnit,
    paths::Location,
};

pub(crate) struct ConstEvaluator {
    expected: Value,
}

impl Evaluate for ConstEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        _frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        Some(if helpers::equal(instance, &self.expected) {
            OutputUnit::pass(ctx.source(), "const", instance_location, keyword_location)
        } else {
            OutputUnit::fail(
                ctx.source(),
                "const",
                instance_location,
                keyword_location,
                ErrorKind::Const {
                    expected: self.expected.clone(),
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
    Ok(Some(Box::new(ConstEvaluator {
        expected: value.clone(),
    })))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"const": 0.0}), &json!(0))]
    #[test_case(&json!({"const": {"c": [1.0]}}), &json!({"c": [1]}))]
    #[test_case(&json!({"const": null}), &json!(null))]
    fn valid(schema: &Value, instance: &Value) {
        tests_util::is_valid(schema, instance);
    }

    #[test_case(&json!({"const": 2}), &json!(5))]
    #[test_case(&json!({"const": "a"}), &json!("b"))]
    fn invalid(schema: &Value, instance: &Value) {
        tests_util::is_not_valid(schema, instance);
    }
}
