//! Validators for `$ref` and `$dynamicRef`.
//!
//! In Draft 2020-12 `$ref` is non-exclusive: sibling keywords evaluate as
//! well, so both evaluators are ordinary keywords wrapping their target's
//! result.
use serde_json::{Map, Value};

use crate::{
    compiler::{CompileCtx, PendingTarget},
    context::{EvalContext, Frame},
    error::SchemaError,
    keywords::{BoxedEvaluator, Evaluate},
    output::OutputUnit,
    paths::Location,
};

pub(crate) struct RefEvaluator {
    target: PendingTarget,
}

impl Evaluate for RefEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        _frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        let source = ctx.source();
        let inner = ctx.evaluate(
            self.target.resolved(),
            instance,
            instance_location,
            keyword_location,
        );
        let valid = inner.valid;
        Some(OutputUnit::applicator(
            source,
            "$ref",
            instance_location,
            keyword_location,
            valid,
            vec![inner],
        ))
    }
}

pub(crate) struct DynamicRefEvaluator {
    target: PendingTarget,
    /// The plain-name fragment, when the reference carries one.
    fragment: Option<Box<str>>,
}

impl Evaluate for DynamicRefEvaluator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        _frame: &Frame<'_>,
    ) -> Option<OutputUnit> {
        let mut target = self.target.resolved();
        // The reference becomes dynamic only when its lexical target holds a
        // matching $dynamicAnchor; the outermost resource in scope with the
        // same anchor then wins.
        if let Some(fragment) = &self.fragment {
            if ctx.arena.get(target).dynamic_anchor.as_deref() == Some(fragment.as_ref()) {
                for ancestor in &ctx.dynamic_scope {
                    let base = &ctx.arena.get(*ancestor).base_uri;
                    let key = format!(
                        "{}#{fragment}",
                        crate::uri::fragmentless_str(base.as_str())
                    );
                    if let Some(dynamic) = ctx.resources.lookup_dynamic(&key) {
                        target = dynamic;
                        break;
                    }
                }
            }
        }
        let source = ctx.source();
        let inner = ctx.evaluate(target, instance, instance_location, keyword_location);
        let valid = inner.valid;
        Some(OutputUnit::applicator(
            source,
            "$dynamicRef",
            instance_location,
            keyword_location,
            valid,
            vec![inner],
        ))
    }
}

pub(crate) fn compile_ref(
    ctx: &mut CompileCtx<'_>,
    _parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    let Value::String(reference) = value else {
        return Ok(None);
    };
    let target = ctx.reference(reference)?;
    Ok(Some(Box::new(RefEvaluator { target })))
}

pub(crate) fn compile_dynamic_ref(
    ctx: &mut CompileCtx<'_>,
    _parent: &Map<String, Value>,
    value: &Value,
) -> Result<Option<BoxedEvaluator>, SchemaError> {
    let Value::String(reference) = value else {
        return Ok(None);
    };
    let fragment = match crate::uri::split_fragment(reference) {
        (_, Some(fragment)) if !fragment.is_empty() && !fragment.starts_with('/') => {
            Some(fragment.into())
        }
        _ => None,
    };
    let target = ctx.reference(reference)?;
    Ok(Some(Box::new(DynamicRefEvaluator { target, fragment })))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::json;

    #[test]
    fn local_pointer_refs_resolve() {
        let schema = json!({
            "$defs": {"positive": {"type": "integer", "minimum": 1}},
            "properties": {"count": {"$ref": "#/$defs/positive"}}
        });
        tests_util::is_valid(&schema, &json!({"count": 2}));
        tests_util::is_not_valid(&schema, &json!({"count": 0}));
    }

    #[test]
    fn classic_errors_carry_the_target_schema_pointer() {
        let schema = json!({
            "$defs": {"p": {"type": "integer", "minimum": 1}},
            "properties": {"count": {"$ref": "#/$defs/p"}}
        });
        let error = tests_util::first_error(&schema, &json!({"count": 0}));
        assert_eq!(error.schema_pointer, "/$defs/p");
        assert_eq!(error.data_pointer, "/count");
    }

    #[test]
    fn recursive_root_refs_resolve() {
        let schema = json!({
            "$id": "https://ex/tree",
            "type": "object",
            "properties": {
                "value": {"type": "integer"},
                "children": {"type": "array", "items": {"$ref": "#"}}
            }
        });
        tests_util::is_valid(
            &schema,
            &json!({"value": 1, "children": [{"value": 2}]}),
        );
        let error = tests_util::first_error(
            &schema,
            &json!({"value": 1, "children": [{"value": 2}, {"value": "x"}]}),
        );
        assert_eq!(error.data_pointer, "/children/1/value");
    }

    #[test]
    fn anchors_resolve_within_the_resource() {
        let schema = json!({
            "$id": "https://ex/root",
            "$defs": {"named": {"$anchor": "positive", "minimum": 1}},
            "$ref": "#positive"
        });
        tests_util::is_valid(&schema, &json!(2));
        tests_util::is_not_valid(&schema, &json!(0));
    }

    #[test]
    fn sibling_keywords_still_evaluate() {
        let schema = json!({
            "$defs": {"any": true},
            "$ref": "#/$defs/any",
            "type": "integer"
        });
        tests_util::is_not_valid(&schema, &json!("x"));
    }

    #[test]
    fn dynamic_refs_walk_the_dynamic_scope() {
        // A list-of-strings schema extending a generic list through a
        // $dynamicAnchor that the outer resource overrides
        let schema = json!({
            "$id": "https://ex/strict-list",
            "$ref": "https://ex/list",
            "$defs": {
                "override": {
                    "$dynamicAnchor": "element",
                    "type": "string"
                },
                "list": {
                    "$id": "https://ex/list",
                    "type": "array",
                    "items": {"$dynamicRef": "#element"},
                    "$defs": {
                        "default-element": {
                            "$dynamicAnchor": "element",
                            "type": ["string", "number"]
                        }
                    }
                }
            }
        });
        tests_util::is_valid(&schema, &json!(["a", "b"]));
        tests_util::is_not_valid(&schema, &json!(["a", 1]));
    }

    #[test]
    fn dynamic_ref_without_matching_anchor_is_lexical() {
        let schema = json!({
            "$defs": {"target": {"$anchor": "plain", "type": "integer"}},
            "$dynamicRef": "#plain"
        });
        tests_util::is_valid(&schema, &json!(1));
        tests_util::is_not_valid(&schema, &json!("x"));
    }
}
