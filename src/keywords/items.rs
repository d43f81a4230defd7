//! Validator for the `items` keyword.
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

pub(crate) struct ItemsEvaluator {
    subschema: SchemaId,
}

impl Evaluate for ItemsEvaluator {
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
                "items",
                instance_location,
                keyword_location,
            ));
        };
        // Evaluation starts after whatever prefixItems covered
        let offset = frame
            .annotation("prefixItems")
            .and_then(Value::as_i64)
            .map_or(0, |highest| (highest + 1) as usize);
        let source = ctx.source();
        let mut nested = Vec::new();
        let mut valid = true;
        for (index, item) in items.iter().enumerate().skip(offset) {
            let item_location = instance_location.push_index(index);
            let unit = ctx.evaluate(self.subschema, item, &item_location, keyword_location);
            valid &= unit.valid;
            nested.push(unit);
        }
        let evaluated = !nested.is_empty();
        Some(
            OutputUnit::applicator(
                source,
                "items",
                instance_location,
                keyword_location,
                valid,
                nested,
            )
            .with_annotation(json!(evaluated)),
        )
    }
}

pub(crate) fn compile(
    ctx: &mut CompileCtx<'_>,
    _parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    let subschema = ctx.subschema(value, &[Seg::Key("items")])?;
    Ok(Some(Box::new(ItemsEvaluator { subschema })))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::json;

    #[test]
    fn applies_to_every_item() {
        let schema = json!({"items": {"type": "integer"}});
        tests_util::is_valid(&schema, &json!([1, 2, 3]));
        tests_util::is_valid(&schema, &json!([]));
        tests_util::is_not_valid(&schema, &json!([1, "x"]));
    }

    #[test]
    fn starts_after_prefix_items() {
        let schema = json!({
            "prefixItems": [{"type": "string"}],
            "items": {"type": "integer"}
        });
        tests_util::is_valid(&schema, &json!(["head", 1, 2]));
        tests_util::is_not_valid(&schema, &json!(["head", "tail"]));
    }

    #[test]
    fn error_location_reaches_the_item() {
        let error = tests_util::first_error(&json!({"items": {"type": "integer"}}), &json!([1, "x"]));
        assert_eq!(error.data_pointer, "/1");
        assert_eq!(error.kind, "integer");
    }
}
