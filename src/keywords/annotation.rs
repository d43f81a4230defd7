//! Annotation-producing keywords (`title`, `description`, `default`,
//! `deprecated`, `readOnly`, `writeOnly`, `examples`).
use serde_json::{Map, Value};

use crate::{
    compiler::CompileCtx,
    context::{EvalContext, Frame},
    error::SchemaError,
    keywords::{BoxedEvaluator, Evaluate},
    output::OutputUnit,
    paths::Location,
};

pub(crate) struct AnnotationEvaluator {
    keyword: Box<str>,
    value: Value,
}

impl AnnotationEvaluator {
    pub(crate) fn new(keyword: &str, value: Value) -> AnnotationEvaluator {
        AnnotationEvaluator {
            keyword: keyword.into(),
            value,
        }
    }
}

impl Evaluate for AnnotationEvaluator {
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
    Ok(Some(Box::new(AnnotationEvaluator::new(
        ctx.current_keyword(),
        value.clone(),
    ))))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    #[test]
    fn metadata_keywords_produce_annotations() {
        let schema = json!({"title": "a number", "default": 4, "type": "integer"});
        let validator = crate::schema(&schema).expect("valid schema");
        let basic = validator.apply(&json!(3)).basic();
        let annotations = basic["annotations"].as_array().expect("annotations");
        assert!(annotations
            .iter()
            .any(|unit| unit["annotation"] == json!("a number")));
        assert!(annotations.iter().any(|unit| unit["annotation"] == json!(4)));
    }
}
