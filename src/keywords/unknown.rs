//! Unknown keywords: valid, with the raw value exposed as an annotation so
//! `$ref` can still navigate into them.
use serde_json::{Map, Value};

use crate::{
    compiler::CompileCtx,
    context::{EvalContext, Frame},
    error::SchemaError,
    keywords::{BoxedEvaluator, Evaluate},
    output::OutputUnit,
    paths::Location,
};

pub(crate) struct UnknownKeywordEvaluator {
    keyword: Box<str>,
    value: Value,
}

impl Evaluate for UnknownKeywordEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        _instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        _frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        Some(
            OutputUnit::pass(
                ctx.source(),
                &self.keyword,
                instance_location,
                keyword_location,
            )
            .with_annotation(self.value.clone()),
        )
    }
}

pub(crate) fn compile(
    ctx: &mut CompileCtx<'_>,
    _parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    Ok(Some(Box::new(UnknownKeywordEvaluator {
        keyword: ctx.current_keyword().into(),
        value: value.clone(),
    })))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::json;

    #[test]
    fn unknown_keywords_are_accepted() {
        tests_util::is_valid(&json!({"x-internal": {"any": "thing"}}), &json!(1));
    }

    #[test]
    fn refs_navigate_into_unknown_keywords() {
        let schema = json!({
            "x-templates": {"positive": {"type": "integer", "minimum": 1}},
            "$ref": "#/x-templates/positive"
        });
        tests_util::is_valid(&schema, &json!(2));
        tests_util::is_not_valid(&schema, &json!(0));
    }
}
