//! Validator for the `pattern` keyword.
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::{
    compiler::CompileCtx,
    context::{EvalContext, Frame},
    error::{ErrorKind, SchemaError},
    keywords::{BoxedEvaluator, Evaluate},
    output::OutputUnit,
    patterns::CompiledPattern,
    paths::Location,
};

pub(crate) struct PatternEvaluator {
    pattern: Box<str>,
    compiled: Arc<CompiledPattern>,
}

impl Evaluate for PatternEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        _frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        let valid = match instance {
            Value::String(item) => self.compiled.is_match(item),
            _ => true,
        };
        Some(if valid {
            OutputUnit::pass(ctx.source(), "pattern", instance_location, keyword_location)
        } else {
            OutputUnit::fail(
                ctx.source(),
                "pattern",
                instance_location,
                keyword_location,
                ErrorKind::Pattern {
                    pattern: self.pattern.clone(),
                },
            )
        })
    }
}

pub(crate) fn compile(
    ctx: &mut CompileCtx<'_>,
    _parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    match value {
        Value::String(pattern) => {
            let compiled = ctx.pattern(pattern)?;
            Ok(Some(Box::new(PatternEvaluator {
                pattern: pattern.as_str().into(),
                compiled,
            })))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"pattern": "^a*$"}), &json!("aaa"))]
    #[test_case(&json!({"pattern": "a+"}), &json!("xxaxx"); "matches anywhere")]
    #[test_case(&json!({"pattern": "^a*$"}), &json!(42))]
    fn valid(schema: &Value, instance: &Value) {
        tests_util::is_valid(schema, instance);
    }

    #[test_case(&json!({"pattern": "^a*$"}), &json!("abc"))]
    fn invalid(schema: &Value, instance: &Value) {
        tests_util::is_not_valid(schema, instance);
    }

    #[test]
    fn invalid_patterns_fail_compilation() {
        assert!(crate::options().build(&json!({"pattern": "("})).is_err());
    }
}
