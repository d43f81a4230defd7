//! Validators for `if`, `then` and `else`.
//!
//! `if` always reports valid and carries its actual outcome as an
//! annotation; `then` and `else` run only when that annotation says so.
use serde_json::{json, Map, Value};

use crate::{
    compiler::{CompileCtx, Seg},
    context::{EvalContext, Frame},
    error::SchemaError,
    keywords::{BoxedEvaluator, Evaluate},
    node::SchemaId,
    output::OutputUnit,
    paths::Location,
};

pub(crate) struct IfEvaluator {
    subschema: SchemaId,
}

impl Evaluate for IfEvaluator {
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
        let outcome = inner.valid;
        Some(
            OutputUnit::applicator(
                source,
                "if",
                instance_location,
                keyword_location,
                true,
                vec![inner],
            )
            .with_annotation(json!(outcome)),
        )
    }
}

pub(crate) struct BranchEvaluator {
    keyword: &'static str,
    runs_when: bool,
    subschema: SchemaId,
}

impl Evaluate for BranchEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        let outcome = frame.annotation("if")?.as_bool()?;
        if outcome != self.runs_when {
            return None;
        }
        let source = ctx.source();
        let inner = ctx.evaluate(self.subschema, instance, instance_location, keyword_location);
        let valid = inner.valid;
        Some(OutputUnit::applicator(
            source,
            self.keyword,
            instance_location,
            keyword_location,
            valid,
            vec![inner],
        ))
    }
}

pub(crate) fn compile(
    ctx: &mut CompileCtx<'_>,
    _parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    let subschema = ctx.subschema(value, &[Seg::Key("if")])?;
    Ok(Some(Box::new(IfEvaluator { subschema })))
}

pub(crate) fn compile_then(
    ctx: &mut CompileCtx<'_>,
    _parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    let subschema = ctx.subschema(value, &[Seg::Key("then")])?;
    Ok(Some(Box::new(BranchEvaluator {
        keyword: "then",
        runs_when: true,
        subschema,
    })))
}

pub(crate) fn compile_else(
    ctx: &mut CompileCtx<'_>,
    _parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    let subschema = ctx.subschema(value, &[Seg::Key("else")])?;
    Ok(Some(Box::new(BranchEvaluator {
        keyword: "else",
        runs_when: false,
        subschema,
    })))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::json;

    #[test]
    fn branches_follow_the_condition() {
        let schema = json!({
            "if": {"type": "integer"},
            "then": {"minimum": 0},
            "else": {"type": "string"}
        });
        tests_util::is_valid(&schema, &json!(1));
        tests_util::is_not_valid(&schema, &json!(-1));
        tests_util::is_valid(&schema, &json!("x"));
        tests_util::is_not_valid(&schema, &json!(null));
    }

    #[test]
    fn then_without_if_is_ignored() {
        tests_util::is_valid(&json!({"then": {"type": "integer"}}), &json!("x"));
    }
}
