//! Keyword evaluators, one module per keyword, and the vocabulary-ordered
//! dispatch table.
pub(crate) mod additional_properties;
pub(crate) mod all_of;
pub(crate) mod annotation;
pub(crate) mod any_of;
pub(crate) mod const_;
pub(crate) mod contains;
pub(crate) mod content;
pub(crate) mod defs;
pub(crate) mod dependent_required;
pub(crate) mod dependent_schemas;
pub(crate) mod discriminator;
pub(crate) mod enum_;
pub(crate) mod exclusive_maximum;
pub(crate) mod exclusive_minimum;
pub(crate) mod format;
pub(crate) mod helpers;
pub(crate) mod if_;
pub(crate) mod items;
pub(crate) mod max_contains;
pub(crate) mod max_items;
pub(crate) mod max_length;
pub(crate) mod max_properties;
pub(crate) mod maximum;
pub(crate) mod min_contains;
pub(crate) mod min_items;
pub(crate) mod min_length;
pub(crate) mod min_properties;
pub(crate) mod minimum;
pub(crate) mod multiple_of;
pub(crate) mod not;
pub(crate) mod one_of;
pub(crate) mod pattern;
pub(crate) mod pattern_properties;
pub(crate) mod prefix_items;
pub(crate) mod properties;
pub(crate) mod property_names;
pub(crate) mod ref_;
pub(crate) mod required;
pub(crate) mod type_;
pub(crate) mod unevaluated;
pub(crate) mod unevaluated_items;
pub(crate) mod unevaluated_properties;
pub(crate) mod unique_items;
pub(crate) mod unknown;

use serde_json::{Map, Value};

use crate::{
    compiler::CompileCtx,
    context::{EvalContext, Frame},
    error::SchemaError,
    output::OutputUnit,
    paths::Location,
    vocabularies::Vocabulary,
};

/// A compiled keyword evaluator.
///
/// Returning `None` means the keyword did not apply (`then` without an `if`
/// outcome, `maxContains` without `contains`); non-skipped results are
/// stored as adjacent results for later siblings.
pub(crate) trait Evaluate: Send + Sync {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        frame: &Frame<'_>,
    ) -> Option<OutputUnit>;
}

pub(crate) type BoxedEvaluator = Box<dyn Evaluate>;

/// Construct an evaluator for a keyword value, or `None` when the keyword
/// is handled entirely at compile time (`$defs`, `$comment`).
pub(crate) type CompileFn =
    fn(&mut CompileCtx<'_>, &Map<String, Value>, &Value) -> Result<Option<BoxedEvaluator>, SchemaError>;

/// The keywords of a vocabulary in evaluation order.
///
/// Order is load-bearing: `items` reads the `prefixItems` annotation,
/// `additionalProperties` reads `properties` and `patternProperties`,
/// `then`/`else` read `if`, and the unevaluated vocabulary runs after the
/// applicators whose annotations it consumes.
pub(crate) fn keywords_for(vocabulary: &Vocabulary) -> &'static [(&'static str, CompileFn)] {
    match vocabulary {
        Vocabulary::Core => &[
            ("$ref", ref_::compile_ref),
            ("$dynamicRef", ref_::compile_dynamic_ref),
            ("$defs", defs::compile),
            ("definitions", defs::compile),
            ("$comment", defs::compile_comment),
        ],
        Vocabulary::Applicator => &[
            ("allOf", all_of::compile),
            ("anyOf", any_of::compile),
            ("oneOf", one_of::compile),
            ("if", if_::compile),
            ("then", if_::compile_then),
            ("else", if_::compile_else),
            ("not", not::compile),
            ("dependentSchemas", dependent_schemas::compile),
            ("prefixItems", prefix_items::compile),
            ("items", items::compile),
            ("contains", contains::compile),
            ("properties", properties::compile),
            ("patternProperties", pattern_properties::compile),
            ("additionalProperties", additional_properties::compile),
            ("propertyNames", property_names::compile),
        ],
        Vocabulary::Unevaluated => &[
            ("unevaluatedItems", unevaluated_items::compile),
            ("unevaluatedProperties", unevaluated_properties::compile),
        ],
        Vocabulary::Validation => &[
            ("type", type_::compile),
            ("enum", enum_::compile),
            ("const", const_::compile),
            ("multipleOf", multiple_of::compile),
            ("maximum", maximum::compile),
            ("exclusiveMaximum", exclusive_maximum::compile),
            ("minimum", minimum::compile),
            ("exclusiveMinimum", exclusive_minimum::compile),
            ("maxLength", max_length::compile),
            ("minLength", min_length::compile),
            ("pattern", pattern::compile),
            ("maxItems", max_items::compile),
            ("minItems", min_items::compile),
            ("uniqueItems", unique_items::compile),
            ("maxContains", max_contains::compile),
            ("minContains", min_contains::compile),
            ("maxProperties", max_properties::compile),
            ("minProperties", min_properties::compile),
            ("required", required::compile),
            ("dependentRequired", dependent_required::compile),
        ],
        Vocabulary::MetaData => &[
            ("title", annotation::compile),
            ("description", annotation::compile),
            ("default", annotation::compile),
            ("deprecated", annotation::compile),
            ("readOnly", annotation::compile),
            ("writeOnly", annotation::compile),
            ("examples", annotation::compile),
        ],
        Vocabulary::FormatAnnotation | Vocabulary::FormatAssertion => {
            &[("format", format::compile)]
        }
        Vocabulary::Content => &[
            ("contentEncoding", content::compile_encoding),
            ("contentMediaType", content::compile_media_type),
            ("contentSchema", content::compile_schema),
        ],
        Vocabulary::OpenApi => &[("discriminator", discriminator::compile)],
        Vocabulary::Custom(_) => &[],
    }
}
