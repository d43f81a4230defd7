//! Validator for the `uniqueItems` keyword.
use serde_json::{Map, Value};

use crate::{
    compiler::CompileCtx,
    context::{EvalContext, Frame},
    error::{ErrorKind, SchemaError},
    keywords::{helpers, BoxedEvaluator, Evaluate},
    output::OutputUnit,
    paths::Location,
};

pub(crate) struct UniqueItemsEvaluator;

fn is_unique(items: &[Value]) -> bool {
    for (index, item) in items.iter().enumerate() {
        if items[index + 1..].iter().any(|other| helpers::equal(item, other)) {
            return false;
        }
    }
    true
}

impl Evaluate for UniqueItemsEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        _frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        let valid = match instance {
            Value::Array(items) => is_unique(items),
            _ => true,
        };
        Some(if valid {
            OutputUnit::pass(
                ctx.source(),
                "uniqueItems",
                instance_location,
                keyword_location,
            )
        } else {
            OutputUnit::fail(
                ctx.source(),
                "uniqueItems",
                instance_location,
                keyword_location,
                ErrorKind::UniqueItems,
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
        Value::Bool(true) => Ok(Some(Box::new(UniqueItemsEvaluator))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!([1, 2, 3]))]
    #[test_case(&json!([]))]
    #[test_case(&json!([{"a": 1}, {"a": 2}]))]
    fn unique(instance: &Value) {
        tests_util::is_valid(&json!({"uniqueItems": true}), instance);
    }

    #[test_case(&json!([1, 1]))]
    #[test_case(&json!([1, 1.0]); "numeric equivalence")]
    #[test_case(&json!([{"a": 1}, {"a": 1.0}]))]
    fn duplicated(instance: &Value) {
        tests_util::is_not_valid(&json!({"uniqueItems": true}), instance);
    }

    #[test]
    fn false_is_a_no_op() {
        tests_util::is_valid(&json!({"uniqueItems": false}), &json!([1, 1]));
    }
}
