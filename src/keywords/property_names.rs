//! Validator for the `propertyNames` keyword.
use serde_json::{Map, Value};

use crate::{
    compiler::{CompileCtx, Seg},
    context::{EvalContext, Frame},
    error::SchemaError,
    keywords::{BoxedEvaluator, Evaluate},
    node::SchemaId,
    output::OutputUnit,
    paths::Location,
};

pub(crate) struct PropertyNamesEvaluator {
    subschema: SchemaId,
}

impl Evaluate for PropertyNamesEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        _frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        let Value::Object(object) = instance else {
            return Some(OutputUnit::pass(
                ctx.source(),
                "propertyNames",
                instance_location,
                keyword_location,
            ));
        };
        let source = ctx.source();
        let mut nested = Vec::new();
        let mut valid = true;
        for name in object.keys() {
            // The instance under validation is the key itself
            let key = Value::String(name.clone());
            let key_location = instance_location.push(name);
            let mut unit = ctx.evaluate(self.subschema, &key, &key_location, keyword_location);
            unit = mark_synthetic(unit, &key);
            valid &= unit.valid;
            nested.push(unit);
        }
        Some(OutputUnit::applicator(
            source,
            "propertyNames",
            instance_location,
            keyword_location,
            valid,
            nested,
        ))
    }
}

fn mark_synthetic(mut unit: OutputUnit, key: &Value) -> OutputUnit {
    unit.synthetic_instance = Some(key.clone());
    let children = std::mem::take(&mut unit.nested);
    unit.nested = children
        .into_iter()
        .map(|child| mark_synthetic(child, key))
        .collect();
    unit
}

pub(crate) fn compile(
    ctx: &mut CompileCtx<'_>,
    _parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    let subschema = ctx.subschema(value, &[Seg::Key("propertyNames")])?;
    Ok(Some(Box::new(PropertyNamesEvaluator { subschema })))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::json;

    #[test]
    fn keys_validate_as_strings() {
        let schema = json!({"propertyNames": {"maxLength": 3}});
        tests_util::is_valid(&schema, &json!({"abc": 1}));
        tests_util::is_not_valid(&schema, &json!({"abcd": 1}));
        tests_util::is_valid(&schema, &json!([1, 2]));
    }

    #[test]
    fn classic_data_is_the_offending_key() {
        let schema = json!({"propertyNames": {"maxLength": 3}});
        let error = tests_util::first_error(&schema, &json!({"abcd": 1}));
        assert_eq!(error.data, json!("abcd"));
        assert!(error.data_pointer.starts_with("/abcd"));
    }
}
