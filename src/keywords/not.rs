//! Validator for the `not` keyword.
use serde_json::{Map, Value};

use crate::{
    compiler::{CompileCtx, Seg},
    context::{EvalContext, Frame},
    error::{ErrorKind, SchemaError},
    keywords::{BoxedEvaluator, Evaluate},
    node::SchemaId,
    output::OutputUnit,
    paths::Location,
};

pub(crate) struct NotEvaluator {
    subschema: SchemaId,
}

impl Evaluate for NotEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        _frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        let source = ctx.source();
        let inner = ctx.evaluate(self.subschema, instance, instance_location, keyword_location);
        let valid = !inner.valid;
        let mut unit = OutputUnit::applicator(
            source,
            "not",
            instance_location,
            keyword_location,
            valid,
            vec![inner],
        );
        if !valid {
            unit = unit.with_error(ErrorKind::Not);
        }
        Some(unit)
    }
}

pub(crate) fn compile(
    ctx: &mut CompileCtx<'_>,
    _parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    let subschema = ctx.subschema(value, &[Seg::Key("not")])?;
    Ok(Some(Box::new(NotEvaluator { subschema })))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::json;

    #[test]
    fn inverts_the_subschema() {
        let schema = json!({"not": {"type": "integer"}});
        tests_util::is_valid(&schema, &json!("x"));
        tests_util::is_not_valid(&schema, &json!(1));
        assert_eq!(tests_util::first_error(&schema, &json!(1)).kind, "not");
    }
}
