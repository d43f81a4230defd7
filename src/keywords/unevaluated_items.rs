//! Validator for the `unevaluatedItems` keyword.
use serde_json::{json, Map, Value};

use crate::{
    compiler::{CompileCtx, Seg},
    context::{EvalContext, Frame},
    error::SchemaError,
    keywords::{unevaluated, BoxedEvaluator, Evaluate},
    node::SchemaId,
    output::OutputUnit,
    paths::Location,
};

pub(crate) struct UnevaluatedItemsEvaluator {
    subschema: SchemaId,
}

impl Evaluate for UnevaluatedItemsEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        let Value::Array(items) = instance else {
            return Some(OutputUnit::pass(
                ctx.source(),
                "unevaluatedItems",
                instance_location,
                keyword_location,
            ));
        };
        let location = instance_location.to_pointer();
        let coverage = unevaluated::covered_items(frame.units(), &location);
        let source = ctx.source();
        let mut nested = Vec::new();
        let mut valid = true;
        for (index, item) in items.iter().enumerate() {
            if coverage.contains(index) {
                continue;
            }
            let item_location = instance_location.push_index(index);
            let unit = ctx.evaluate(self.subschema, item, &item_location, keyword_location);
            valid &= unit.valid;
            nested.push(unit);
        }
        let evaluated = !nested.is_empty();
        let mut unit = OutputUnit::applicator(
            source,
            "unevaluatedItems",
            instance_location,
            keyword_location,
            valid,
            nested,
        );
        if evaluated {
            unit = unit.with_annotation(json!(true));
        }
        Some(unit)
    }
}

pub(crate) fn compile(
    ctx: &mut CompileCtx<'_>,
    _parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    let subschema = ctx.subschema(value, &[Seg::Key("unevaluatedItems")])?;
    Ok(Some(Box::new(UnevaluatedItemsEvaluator { subschema })))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::json;

    #[test]
    fn fires_only_on_uncovered_indices() {
        let schema = json!({
            "prefixItems": [{"type": "integer"}],
            "unevaluatedItems": false
        });
        tests_util::is_valid(&schema, &json!([1]));
        tests_util::is_not_valid(&schema, &json!([1, "extra"]));
    }

    #[test]
    fn respects_items_from_nested_applicators() {
        let schema = json!({
            "allOf": [{"items": {"type": "integer"}}],
            "unevaluatedItems": false
        });
        tests_util::is_valid(&schema, &json!([1, 2]));
    }

    #[test]
    fn respects_contains_annotations() {
        let schema = json!({
            "contains": {"type": "integer"},
            "unevaluatedItems": {"type": "string"}
        });
        tests_util::is_valid(&schema, &json!([1, "x"]));
        tests_util::is_not_valid(&schema, &json!([1, null]));
    }

    #[test]
    fn failed_branch_annotations_do_not_count() {
        let schema = json!({
            "anyOf": [
                {"prefixItems": [true, true], "minItems": 2},
                {"prefixItems": [true]}
            ],
            "unevaluatedItems": false
        });
        // The first branch fails for a one-item array, so only one index
        // counts as evaluated
        tests_util::is_valid(&schema, &json!([1]));
        tests_util::is_valid(&schema, &json!([1, 2]));
    }

    #[test]
    fn classic_error_points_at_the_keyword() {
        let schema = json!({
            "prefixItems": [{"type": "integer"}],
            "unevaluatedItems": false
        });
        let error = tests_util::first_error(&schema, &json!([1, "extra"]));
        assert!(error.schema_pointer.contains("unevaluatedItems"));
        assert_eq!(error.data_pointer, "/1");
    }
}
