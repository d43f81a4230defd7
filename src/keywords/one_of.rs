//! Validator for the `oneOf` keyword.
use serde_json::{Map, Value};

use crate::{
    compiler::{CompileCtx, Seg},
    context::{EvalContext, Frame},
    error::{ErrorKind, SchemaError},
    keywords::{discriminator, BoxedEvaluator, Evaluate},
    node::SchemaId,
    output::OutputUnit,
    paths::Location,
    vocabularies::Vocabulary,
};

pub(crate) struct OneOfEvaluator {
    subschemas: Vec<SchemaId>,
}

impl Evaluate for OneOfEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        _frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        let source = ctx.source();
        let mut nested = Vec::new();
        let mut matched = 0usize;
        for (index, subschema) in self.subschemas.iter().enumerate() {
            let branch_location = keyword_location.push_index(index);
            let unit = ctx.evaluate(*subschema, instance, instance_location, &branch_location);
            if unit.valid {
                matched += 1;
            }
            nested.push(unit);
        }
        let mut unit = OutputUnit::applicator(
            source,
            "oneOf",
            instance_location,
            keyword_location,
            matched == 1,
            nested,
        );
        if matched > 1 {
            // Classic output reports the combinator itself rather than a
            // confusing mix of branch results
            unit = unit
                .with_error(ErrorKind::OneOfMultipleValid)
                .with_ignore_nested();
        }
        Some(unit)
    }
}

pub(crate) fn compile(
    ctx: &mut CompileCtx<'_>,
    parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    let Value::Array(subschemas) = value else {
        return Ok(None);
    };
    let mut compiled = Vec::with_capacity(subschemas.len());
    for (index, subschema) in subschemas.iter().enumerate() {
        compiled.push(ctx.subschema(subschema, &[Seg::Key("oneOf"), Seg::Index(index)])?);
    }
    if ctx.has_vocabulary(&Vocabulary::OpenApi) {
        if let Some(spec) = discriminator::parse_spec(parent.get("discriminator")) {
            return Ok(Some(Box::new(discriminator::DiscriminatedCombinator::new(
                "oneOf", spec,
            ))));
        }
    }
    Ok(Some(Box::new(OneOfEvaluator {
        subschemas: compiled,
    })))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::json;

    #[test]
    fn exactly_one_branch_must_pass() {
        let schema = json!({"oneOf": [{"type": "integer"}, {"minimum": 2}]});
        tests_util::is_valid(&schema, &json!(1));
        tests_util::is_valid(&schema, &json!(2.5));
        tests_util::is_not_valid(&schema, &json!(3));
        tests_util::is_not_valid(&schema, &json!(1.5));
    }

    #[test]
    fn multiple_matches_report_the_combinator() {
        let schema = json!({"oneOf": [{"type": "integer", "minimum": 0}, {"type": "integer", "maximum": 0}]});
        let error = tests_util::first_error(&schema, &json!(0));
        assert_eq!(error.kind, "oneof");
        let report = crate::schema(&schema).expect("valid").validate(&json!(0));
        assert_eq!(report.errors.len(), 1);
    }
}
