//! Validator for the `dependentRequired` keyword.
use serde_json::{Map, Value};

use crate::{
    compiler::CompileCtx,
    context::{EvalContext, Frame},
    error::{ErrorKind, SchemaError},
    keywords::{BoxedEvaluator, Evaluate},
    output::OutputUnit,
    paths::Location,
};

pub(crate) struct DependentRequiredEvaluator {
    dependencies: Vec<(String, Vec<String>)>,
}

impl Evaluate for DependentRequiredEvaluator {
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
                "dependentRequired",
                instance_location,
                keyword_location,
            ));
        };
        let mut missing = Vec::new();
        for (property, dependents) in &self.dependencies {
            if !object.contains_key(property.as_str()) {
                continue;
            }
            for dependent in dependents {
                if !object.contains_key(dependent.as_str()) && !missing.contains(dependent) {
                    missing.push(dependent.clone());
                }
            }
        }
        Some(if missing.is_empty() {
            OutputUnit::pass(
                ctx.source(),
                "dependentRequired",
                instance_location,
                keyword_location,
            )
        } else {
            OutputUnit::fail(
                ctx.source(),
                "dependentRequired",
                instance_location,
                keyword_location,
                ErrorKind::DependentRequired { missing },
            )
        })
    }
}

pub(crate) fn compile(
    _ctx: &mut CompileCtx<'_>,
    _parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    let Value::Object(map) = value else {
        return Ok(None);
    };
    let mut dependencies = Vec::with_capacity(map.len());
    for (property, dependents) in map {
        let Value::Array(names) = dependents else {
            return Ok(None);
        };
        let mut required = Vec::with_capacity(names.len());
        for name in names {
            match name.as_str() {
                Some(name) => required.push(name.to_string()),
                None => return Ok(None),
            }
        }
        dependencies.push((property.clone(), required));
    }
    Ok(Some(Box::new(DependentRequiredEvaluator { dependencies })))
}
