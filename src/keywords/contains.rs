//! Validator for the `contains` keyword.
use serde_json::{json, Map, Value};

use crate::{
    compiler::{CompileCtx, Seg},
    context::{EvalContext, Frame},
    error::{ErrorKind, SchemaError},
    keywords::{BoxedEvaluator, Evaluate},
    node::SchemaId,
    output::OutputUnit,
    paths::Location,
};

pub(crate) struct ContainsEvaluator {
    subschema: SchemaId,
    /// Taken from the adjacent `minContains` at compile time; 1 by default.
    min_contains: u64,
}

impl Evaluate for ContainsEvaluator {
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
                "contains",
                instance_location,
                keyword_location,
            ));
        };
        let source = ctx.source();
        let mut nested = Vec::new();
        let mut indices = Vec::new();
        for (index, item) in items.iter().enumerate() {
            let item_location = instance_location.push_index(index);
            let unit = ctx.evaluate(self.subschema, item, &item_location, keyword_location);
            if unit.valid {
                indices.push(index);
            }
            nested.push(unit);
        }
        let valid = self.min_contains == 0 || indices.len() as u64 >= self.min_contains.max(1);
        let mut unit = OutputUnit::applicator(
            source,
            "contains",
            instance_location,
            keyword_location,
            valid,
            nested,
        )
        .with_annotation(json!(indices))
        .with_ignore_nested();
        if !valid {
            unit = unit.with_error(ErrorKind::Contains);
        }
        Some(unit)
    }
}

pub(crate) fn compile(
    ctx: &mut CompileCtx<'_>,
    parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    let subschema = ctx.subschema(value, &[Seg::Key("contains")])?;
    let min_contains = parent
        .get("minContains")
        .and_then(Value::as_u64)
        .unwrap_or(1);
    Ok(Some(Box::new(ContainsEvaluator {
        subschema,
        min_contains,
    })))
}
