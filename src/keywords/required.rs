//! Validator for the `required` keyword.
use ahash::AHashSet;
use serde_json::{Map, Value};

use crate::{
    compiler::CompileCtx,
    context::{EvalContext, Frame},
    error::{ErrorKind, SchemaError},
    keywords::{BoxedEvaluator, Evaluate},
    options::AccessMode,
    output::OutputUnit,
    paths::Location,
};

pub(crate) struct RequiredEvaluator {
    required: Vec<String>,
    /// Properties whose subschema declares `readOnly: true`.
    read_only: AHashSet<String>,
    /// Properties whose subschema declares `writeOnly: true`.
    write_only: AHashSet<String>,
}

impl Evaluate for RequiredEvaluator {
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
                "required",
                instance_location,
                keyword_location,
            ));
        };
        let missing = self
            .required
            .iter()
            .filter(|property| {
                if object.contains_key(property.as_str()) {
                    return false;
                }
                match ctx.options.access_mode {
                    Some(AccessMode::Read) => !self.write_only.contains(property.as_str()),
                    Some(AccessMode::Write) => !self.read_only.contains(property.as_str()),
                    None => true,
                }
            })
            .cloned()
            .collect::<Vec<_>>();
        Some(if missing.is_empty() {
            OutputUnit::pass(ctx.source(), "required", instance_location, keyword_location)
        } else {
            OutputUnit::fail(
                ctx.source(),
                "required",
                instance_location,
                keyword_location,
                ErrorKind::Required { missing },
            )
        })
    }
}

/// Properties under `parent.properties` whose raw subschema sets `flag` to
/// `true`.
fn flagged_properties(parent: &Map<String, Value>, flag: &str) -> AHashSet<String> {
    let Some(Value::Object(properties)) = parent.get("properties") else {
        return AHashSet::new();
    };
    properties
        .iter()
        .filter(|(_, subschema)| subschema.get(flag).and_then(Value::as_bool) == Some(true))
        .map(|(name, _)| name.clone())
        .collect()
}

pub(crate) fn compile(
    _ctx: &mut CompileCtx<'_>,
    parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    let Value::Array(names) = value else {
        return Ok(None);
    };
    let mut required = Vec::with_capacity(names.len());
    for name in names {
        match name.as_str() {
            Some(name) => required.push(name.to_string()),
            None => return Ok(None),
        }
    }
    Ok(Some(Box::new(RequiredEvaluator {
        required,
        read_only: flagged_properties(parent, "readOnly"),
        write_only: flagged_properties(parent, "writeOnly"),
    })))
}

#[cfg(test)]
mod tests {
    use crate::{options, tests_util, AccessMode};
    use serde_json::json;

    #[test]
    fn missing_properties_fail() {
        let schema = json!({"required": ["name"]});
        tests_util::is_valid(&schema, &json!({"name": "x"}));
        tests_util::is_not_valid(&schema, &json!({}));
        let error = tests_util::first_error(&schema, &json!({}));
        assert_eq!(error.kind, "required");
        assert_eq!(error.details, Some(json!({"missing_keys": ["name"]})));
    }

    #[test]
    fn read_mode_exempts_write_only_properties() {
        let schema = json!({
            "required": ["password", "name"],
            "properties": {
                "password": {"writeOnly": true},
                "name": {"type": "string"}
            }
        });
        let validator = options()
            .with_access_mode(AccessMode::Read)
            .build(&schema)
            .expect("valid schema");
        assert!(validator.is_valid(&json!({"name": "x"})));
        assert!(!validator.is_valid(&json!({})));
    }

    #[test]
    fn write_mode_exempts_read_only_properties() {
        let schema = json!({
            "required": ["id"],
            "properties": {"id": {"readOnly": true}}
        });
        let validator = options()
            .with_access_mode(AccessMode::Write)
            .build(&schema)
            .expect("valid schema");
        assert!(validator.is_valid(&json!({})));
        let unrestricted = options().build(&schema).expect("valid schema");
        assert!(!unrestricted.is_valid(&json!({})));
    }
}
