//! Validator for the `type` keyword.
use serde_json::{Map, Value};

use crate::{
    compiler::CompileCtx,
    context::{EvalContext, Frame},
    error::{ErrorKind, SchemaError, TypeKind},
    keywords::{BoxedEvaluator, Evaluate},
    output::OutputUnit,
    paths::Location,
    primitive_type::PrimitiveType,
};

pub(crate) struct TypeEvaluator {
    expected: TypeKind,
}

impl Evaluate for TypeEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        _frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        let valid = match &self.expected {
            TypeKind::Single(single) => single.matches(instance),
            TypeKind::Multiple(types) => types.iter().any(|single| single.matches(instance)),
        };
        Some(if valid {
            OutputUnit::pass(ctx.source(), "type", instance_location, keyword_location)
        } else {
            OutputUnit::fail(
                ctx.source(),
                "type",
                instance_location,
                keyword_location,
                ErrorKind::Type {
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
    let expected = match value {
        Value::String(name) => match name.parse::<PrimitiveType>() {
            Ok(single) => TypeKind::Single(single),
            Err(()) => return Ok(None),
        },
        Value::Array(names) => {
            let mut types = Vec::with_capacity(names.len());
            for name in names {
                match name.as_str().and_then(|name| name.parse().ok()) {
                    Some(single) => types.push(single),
                    None => return Ok(None),
                }
            }
            TypeKind::Multiple(types)
        }
        _ => return Ok(None),
    };
    Ok(Some(Box::new(TypeEvaluator { expected })))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"type": "integer"}), &json!(1))]
    #[test_case(&json!({"type": "integer"}), &json!(1.0); "integer-valued float")]
    #[test_case(&json!({"type": "number"}), &json!(1))]
    #[test_case(&json!({"type": ["integer", "string"]}), &json!("x"))]
    #[test_case(&json!({"type": "null"}), &json!(null))]
    fn valid(schema: &Value, instance: &Value) {
        tests_util::is_valid(schema, instance);
    }

    #[test_case(&json!({"type": "integer"}), &json!(1.5))]
    #[test_case(&json!({"type": "string"}), &json!(1))]
    #[test_case(&json!({"type": ["integer", "string"]}), &json!(null))]
    fn invalid(schema: &Value, instance: &Value) {
        tests_util::is_not_valid(schema, instance);
    }

    #[test]
    fn single_type_tag_is_the_type_name() {
        let error = tests_util::first_error(&json!({"type": "integer"}), &json!("x"));
        assert_eq!(error.kind, "integer");
        assert_eq!(error.error, "value at root is not an integer");
    }
}
