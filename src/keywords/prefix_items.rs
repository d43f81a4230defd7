//! Validator for the `prefixItems` keyword.
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

pub(crate) struct PrefixItemsEvaluator {
    subschemas: Vec<SchemaId>,
}

impl Evaluate for PrefixItemsEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        _frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        let Value::Array(items) = instance else {
            return Some(OutputUnit::pass(
                ctx.source(),
                "prefixItems",
                instance_location,
                keyword_location,
            ));
        };
        let source = ctx.source();
        let mut nested = Vec::new();
        let mut valid = true;
        let mut highest: i64 = -1;
        for (index, (item, subschema)) in items.iter().zip(self.subschemas.iter()).enumerate() {
            let item_location = instance_location.push_index(index);
            let subschema_location = keyword_location.push_index(index);
            let unit = ctx.evaluate(*subschema, item, &item_location, &subschema_location);
            valid &= unit.valid;
            highest = index as i64;
            nested.push(unit);
        }
        // Annotation: the highest index validated, -1 when nothing was
        Some(
            OutputUnit::applicator(
                source,
                "prefixItems",
                instance_location,
                keyword_location,
                valid,
                nested,
            )
            .with_annotation(json!(highest)),
        )
    }
}

pub(crate) fn compile(
    ctx: &mut CompileCtx<'_>,
    _parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    let Value::Array(subschemas) = value else {
        return Ok(None);
    };
    let mut compiled = Vec::with_capacity(subschemas.len());
    for (index, subschema) in subschemas.iter().enumerate() {
        compiled.push(ctx.subschema(subschema, &[Seg::Key("prefixItems"), Seg::Index(index)])?);
    }
    Ok(Some(Box::new(PrefixItemsEvaluator {
        subschemas: compiled,
    })))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::json;

    #[test]
    fn validates_leading_items_in_order() {
        let schema = json!({"prefixItems": [{"type": "integer"}, {"type": "string"}]});
        tests_util::is_valid(&schema, &json!([1, "x"]));
        tests_util::is_valid(&schema, &json!([1, "x", null]));
        tests_util::is_valid(&schema, &json!([1]));
        tests_util::is_not_valid(&schema, &json!(["x", 1]));
    }

    #[test]
    fn error_points_at_the_failing_index() {
        let schema = json!({"prefixItems": [{"type": "integer"}]});
        let error = tests_util::first_error(&schema, &json!(["x"]));
        assert_eq!(error.data_pointer, "/0");
        assert_eq!(error.schema_pointer, "/prefixItems/0");
    }
}
