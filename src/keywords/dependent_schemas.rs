//! Validator for the `dependentSchemas` keyword.
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

pub(crate) struct DependentSchemasEvaluator {
    dependencies: Vec<(String, SchemaId)>,
}

impl Evaluate for DependentSchemasEvaluator {
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
                "dependentSchemas",
                instance_location,
                keyword_location,
            ));
        };
        let source = ctx.source();
        let mut nested = Vec::new();
        let mut valid = true;
        for (property, subschema) in &self.dependencies {
            if !object.contains_key(property.as_str()) {
                continue;
            }
            let subschema_location = keyword_location.push(property);
            let unit = ctx.evaluate(*subschema, instance, instance_location, &subschema_location);
            valid &= unit.valid;
            nested.push(unit);
        }
        Some(OutputUnit::applicator(
            source,
            "dependentSchemas",
            instance_location,
            keyword_location,
            valid,
            nested,
        ))
    }
}

pub(crate) fn compile(
    ctx: &mut CompileCtx<'_>,
    _parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    let Value::Object(map) = value else {
        return Ok(None);
    };
    let mut dependencies = Vec::with_capacity(map.len());
    for (property, subschema) in map {
        let compiled =
            ctx.subschema(subschema, &[Seg::Key("dependentSchemas"), Seg::Key(property)])?;
        dependencies.push((property.clone(), compiled));
    }
    Ok(Some(Box::new(DependentSchemasEvaluator { dependencies })))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::json;

    #[test]
    fn subschema_applies_when_the_property_is_present() {
        let schema = json!({
            "dependentSchemas": {
                "credit_card": {"required": ["billing_address"]}
            }
        });
        tests_util::is_valid(&schema, &json!({"name": "x"}));
        tests_util::is_not_valid(&schema, &json!({"credit_card": "4111"}));
        tests_util::is_valid(
            &schema,
            &json!({"credit_card": "4111", "billing_address": "1 Main St"}),
        );
    }
}
