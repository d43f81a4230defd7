//! Validator for the `format` keyword.
//!
//! Annotation-only by default; an active format-assertion vocabulary or the
//! `should_validate_formats` option swaps in the asserting evaluator.
//! Unknown formats never fail.
use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::{
    compiler::CompileCtx,
    context::{EvalContext, Frame},
    error::{ErrorKind, SchemaError},
    formats::{self, Format},
    keywords::{BoxedEvaluator, Evaluate},
    output::OutputUnit,
    paths::Location,
};

enum Check {
    Builtin(formats::FormatCheck),
    Custom(Arc<dyn Format>),
    Unknown,
}

pub(crate) struct FormatEvaluator {
    format: Box<str>,
    check: Check,
    assertion: bool,
}

impl Evaluate for FormatEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        _frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        let valid = if self.assertion {
            match instance {
                Value::String(item) => match &self.check {
                    Check::Builtin(check) => check(item),
                    Check::Custom(check) => check.is_valid(item),
                    Check::Unknown => true,
                },
                _ => true,
            }
        } else {
            true
        };
        Some(if valid {
            OutputUnit::pass(ctx.source(), "format", instance_location, keyword_location)
                .with_annotation(json!(self.format.as_ref()))
        } else {
            OutputUnit::fail(
                ctx.source(),
                "format",
                instance_location,
                keyword_location,
                ErrorKind::Format {
                    format: self.format.clone(),
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
    let Value::String(format) = value else {
        return Ok(None);
    };
    let check = if let Some(custom) = ctx.options().formats.get(format.as_str()) {
        Check::Custom(Arc::clone(custom))
    } else if let Some(builtin) = formats::builtin(format) {
        Check::Builtin(builtin)
    } else {
        Check::Unknown
    };
    Ok(Some(Box::new(FormatEvaluator {
        format: format.as_str().into(),
        check,
        assertion: ctx.asserts_formats(),
    })))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::json;

    #[test]
    fn annotation_only_by_default() {
        let schema = json!({"format": "email"});
        tests_util::is_valid(&schema, &json!("not an email"));
    }

    #[test]
    fn assertion_when_requested() {
        let schema = json!({"format": "email"});
        let validator = crate::options()
            .should_validate_formats(true)
            .build(&schema)
            .expect("valid schema");
        assert!(validator.is_valid(&json!("joe@example.com")));
        assert!(!validator.is_valid(&json!("not an email")));
        assert!(validator.is_valid(&json!(42)), "non-strings always pass");
    }

    #[test]
    fn unknown_formats_never_fail() {
        let validator = crate::options()
            .should_validate_formats(true)
            .build(&json!({"format": "zip-code-from-mars"}))
            .expect("valid schema");
        assert!(validator.is_valid(&json!("anything")));
    }

    #[test]
    fn disabled_formats_never_change_validity() {
        let validator = crate::options()
            .should_validate_formats(false)
            .build(&json!({"format": "ipv4"}))
            .expect("valid schema");
        assert!(validator.is_valid(&json!("999.999.999.999")));
    }
}
