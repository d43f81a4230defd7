//! Per-validation state: the dynamic scope and adjacent results.
use serde_json::Value;

use crate::{
    error::ErrorKind,
    node::{Arena, Form, SchemaId},
    options::ValidationOptions,
    output::OutputUnit,
    paths::Location,
    resources::Resources,
};

/// Sibling results produced so far at the current schema.
///
/// Implicitly reset on entry to each schema: every schema evaluation owns
/// its own unit list and hands out a fresh frame per keyword.
pub(crate) struct Frame<'f> {
    units: &'f [OutputUnit],
}

impl<'f> Frame<'f> {
    pub(crate) fn new(units: &'f [OutputUnit]) -> Frame<'f> {
        Frame { units }
    }

    /// The annotation left by an earlier sibling keyword, if any.
    pub(crate) fn annotation(&self, keyword: &str) -> Option<&'f Value> {
        self.units
            .iter()
            .rev()
            .find_map(|unit| unit.annotation_if(keyword))
    }

    pub(crate) fn units(&self) -> &'f [OutputUnit] {
        self.units
    }
}

/// State owned by a single top-level validate call.
pub(crate) struct EvalContext<'a> {
    pub(crate) arena: &'a Arena,
    pub(crate) resources: &'a Resources,
    pub(crate) options: &'a ValidationOptions,
    /// Stack of schemas entered, searched by `$dynamicRef`.
    pub(crate) dynamic_scope: Vec<SchemaId>,
    /// Stop at the first invalid keyword (the `flag` format).
    pub(crate) short_circuit: bool,
    /// Single-skip guard for discriminator re-entry through `$ref`.
    pub(crate) discriminator_skip: bool,
}

impl<'a> EvalContext<'a> {
    pub(crate) fn new(
        arena: &'a Arena,
        resources: &'a Resources,
        options: &'a ValidationOptions,
        short_circuit: bool,
    ) -> EvalContext<'a> {
        EvalContext {
            arena,
            resources,
            options,
            dynamic_scope: Vec::new(),
            short_circuit,
            discriminator_skip: false,
        }
    }

    /// The schema currently being evaluated.
    pub(crate) fn source(&self) -> SchemaId {
        *self
            .dynamic_scope
            .last()
            .expect("evaluation happens inside a schema")
    }

    /// Evaluate a schema against an instance, producing one result unit.
    ///
    /// The schema is pushed onto the dynamic scope for the duration of the
    /// call; sibling annotations reset because each invocation collects its
    /// own nested units.
    pub(crate) fn evaluate(
        &mut self,
        id: SchemaId,
        instance: &Value,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
    ) -> OutputUnit {
        let arena = self.arena;
        let node = arena.get(id);
        self.dynamic_scope.push(id);
        let unit = match &node.form {
            Form::True => OutputUnit::new(true, id, None, instance_location, keyword_location),
            Form::False => OutputUnit::new(false, id, None, instance_location, keyword_location)
                .with_error(ErrorKind::FalseSchema {
                    keyword: node.linking_keyword.clone(),
                }),
            Form::Keywords(keywords) => {
                let mut nested: Vec<OutputUnit> = Vec::with_capacity(keywords.len());
                let mut valid = true;
                for keyword in keywords.iter() {
                    let keyword_path = keyword_location.push(&keyword.name);
                    let unit = {
                        let frame = Frame::new(&nested);
                        keyword.evaluator.evaluate(
                            self,
                            instance,
                            instance_location,
                            &keyword_path,
                            &frame,
                        )
                    };
                    if let Some(unit) = unit {
                        let failed = !unit.valid;
                        valid &= unit.valid;
                        nested.push(unit);
                        if failed && self.short_circuit {
                            break;
                        }
                    }
                }
                OutputUnit::new(valid, id, None, instance_location, keyword_location)
                    .with_nested(nested)
            }
        };
        self.dynamic_scope.pop();
        unit
    }
}
