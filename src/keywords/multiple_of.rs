//! Validator for the `multipleOf` keyword.
use std::str::FromStr;

use fraction::{BigFraction, BigUint};
use serde_json::{Map, Number, Value};

use crate::{
    compiler::CompileCtx,
    context::{EvalContext, Frame},
    error::{ErrorKind, SchemaError},
    keywords::{BoxedEvaluator, Evaluate},
    output::OutputUnit,
    paths::Location,
};

/// Exact decimal fraction of a JSON number, going through the shortest
/// decimal representation so `8.61` divides evenly by `0.01`.
fn to_fraction(number: &Number) -> BigFraction {
    if let Some(value) = number.as_i64() {
        BigFraction::from(value)
    } else if let Some(value) = number.as_u64() {
        BigFraction::from(value)
    } else {
        let repr = number.to_string();
        BigFraction::from_str(&repr)
            .unwrap_or_else(|_| BigFraction::from(number.as_f64().expect("A JSON number")))
    }
}

pub(crate) struct MultipleOfEvaluator {
    multiple_of: Number,
    factor: BigFraction,
}

impl MultipleOfEvaluator {
    fn is_multiple(&self, instance: &Number) -> bool {
        if let (Some(instance), Some(multiple_of)) = (instance.as_i64(), self.multiple_of.as_i64())
        {
            if multiple_of != 0 {
                return instance % multiple_of == 0;
            }
        }
        let quotient = to_fraction(instance) / self.factor.clone();
        match quotient.denom() {
            Some(denom) => denom == &BigUint::from(1_u8),
            None => true,
        }
    }
}

impl Evaluate for MultipleOfEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        _frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        let valid = match instance {
            Value::Number(number) => self.is_multiple(number),
            _ => true,
        };
        Some(if valid {
            OutputUnit::pass(ctx.source(), "multipleOf", instance_location, keyword_location)
        } else {
            OutputUnit::fail(
                ctx.source(),
                "multipleOf",
                instance_location,
                keyword_location,
                ErrorKind::MultipleOf {
                    multiple_of: self.multiple_of.clone(),
                },
            )
        })
    }
}

pub(crate) fn compile(
    _ctx: &mut CompileCtx<'_>,
    _parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    match value {
        Value::Number(multiple_of) => Ok(Some(Box::new(MultipleOfEvaluator {
            multiple_of: multiple_of.clone(),
            factor: to_fraction(multiple_of),
        }))),
        _ => Ok(None),
    }
}
