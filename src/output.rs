//! The result tree and its output shapes.
//!
//! Evaluation produces one tree of [`OutputUnit`]s; `flag`, `basic`,
//! `detailed`, `verbose` and `classic` are all derived from it.
use std::str::FromStr;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    error::{ErrorKind, SchemaError},
    node::{Arena, SchemaId},
    paths::{JsonPointer, Location},
    x_error::{self, Variables},
};

/// One node of the result tree.
#[derive(Debug)]
pub(crate) struct OutputUnit {
    pub(crate) valid: bool,
    pub(crate) instance_location: JsonPointer,
    /// The dynamic evaluation path, through `$ref` and friends.
    pub(crate) keyword_location: JsonPointer,
    pub(crate) source: SchemaId,
    /// `None` for schema-level units.
    pub(crate) keyword: Option<Box<str>>,
    pub(crate) error: Option<ErrorKind>,
    pub(crate) annotation: Option<Value>,
    /// Instance value for units that did not evaluate a location of the
    /// original document (`propertyNames` keys, decoded content).
    pub(crate) synthetic_instance: Option<Value>,
    pub(crate) nested: Vec<OutputUnit>,
    /// Classic output reports this unit instead of descending.
    pub(crate) ignore_nested: bool,
}

impl OutputUnit {
    pub(crate) fn new(
        valid: bool,
        source: SchemaId,
        keyword: Option<&str>,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
    ) -> OutputUnit {
        OutputUnit {
            valid,
            instance_location: instance_location.to_pointer(),
            keyword_location: keyword_location.to_pointer(),
            source,
            keyword: keyword.map(Into::into),
            error: None,
            annotation: None,
            synthetic_instance: None,
            nested: Vec::new(),
            ignore_nested: false,
        }
    }

    /// A valid keyword-level leaf.
    pub(crate) fn pass(
        source: SchemaId,
        keyword: &str,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
    ) -> OutputUnit {
        OutputUnit::new(true, source, Some(keyword), instance_location, keyword_location)
    }

    /// An invalid keyword-level leaf.
    pub(crate) fn fail(
        source: SchemaId,
        keyword: &str,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        kind: ErrorKind,
    ) -> OutputUnit {
        OutputUnit::new(false, source, Some(keyword), instance_location, keyword_location)
            .with_error(kind)
    }

    /// A keyword-level unit wrapping subschema results.
    pub(crate) fn applicator(
        source: SchemaId,
        keyword: &str,
        instance_location: &Location<'_>,
        keyword_location: &Location<'_>,
        valid: bool,
        nested: Vec<OutputUnit>,
    ) -> OutputUnit {
        OutputUnit::new(valid, source, Some(keyword), instance_location, keyword_location)
            .with_nested(nested)
    }

    pub(crate) fn with_error(mut self, kind: ErrorKind) -> OutputUnit {
        self.error = Some(kind);
        self
    }

    pub(crate) fn with_annotation(mut self, annotation: Value) -> OutputUnit {
        self.annotation = Some(annotation);
        self
    }

    pub(crate) fn with_nested(mut self, nested: Vec<OutputUnit>) -> OutputUnit {
        self.nested = nested;
        self
    }

    pub(crate) fn with_ignore_nested(mut self) -> OutputUnit {
        self.ignore_nested = true;
        self
    }

    pub(crate) fn with_synthetic_instance(mut self, instance: Value) -> OutputUnit {
        self.synthetic_instance = Some(instance);
        self
    }

    pub(crate) fn annotation_if(&self, keyword: &str) -> Option<&Value> {
        if self.keyword.as_deref() == Some(keyword) {
            self.annotation.as_ref()
        } else {
            None
        }
    }
}

/// The shape `validate`/`apply` render the result tree into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    Flag,
    Basic,
    Detailed,
    Verbose,
    #[default]
    Classic,
}

impl FromStr for OutputFormat {
    type Err = SchemaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "flag" => Ok(OutputFormat::Flag),
            "basic" => Ok(OutputFormat::Basic),
            "detailed" => Ok(OutputFormat::Detailed),
            "verbose" => Ok(OutputFormat::Verbose),
            "classic" => Ok(OutputFormat::Classic),
            _ => Err(SchemaError::UnknownOutputFormat {
                format: value.to_string(),
            }),
        }
    }
}

/// The `flag` output: validity only.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FlagOutput {
    pub valid: bool,
}

/// The `classic` output: a flat list of leaf errors.
#[derive(Debug, Clone, Serialize)]
pub struct ClassicOutput {
    pub valid: bool,
    pub errors: Vec<ClassicError>,
}

impl ClassicOutput {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// A single classic error entry.
#[derive(Debug, Clone, Serialize)]
pub struct ClassicError {
    pub data: Value,
    pub data_pointer: String,
    pub schema: Value,
    pub schema_pointer: String,
    pub root_schema: Value,
    #[serde(rename = "type")]
    pub kind: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Resolve the instance value a unit refers to.
fn data_of(instance: &Value, unit: &OutputUnit) -> Value {
    if let Some(synthetic) = &unit.synthetic_instance {
        return synthetic.clone();
    }
    instance
        .pointer(&unit.instance_location.to_string())
        .cloned()
        .unwrap_or(Value::Null)
}

/// Render the message for an invalid unit, honoring `x-error`.
fn message_of(arena: &Arena, instance: &Value, unit: &OutputUnit) -> String {
    let node = arena.get(unit.source);
    let kind = unit.error.as_ref().expect("invalid unit carries a kind");
    // A false schema reports under the keyword that linked it
    let overlay_keyword = unit.keyword.as_deref().or_else(|| match kind {
        ErrorKind::FalseSchema { keyword } => keyword.as_deref(),
        _ => None,
    });
    if let Some(overlay) = &node.x_error {
        if let Some(template) = overlay.select(overlay_keyword) {
            let data = data_of(instance, unit);
            let keyword_value = unit
                .keyword
                .as_deref()
                .and_then(|keyword| node.value.get(keyword))
                .unwrap_or(&node.value);
            let variables = Variables {
                instance: &data,
                instance_location: unit.instance_location.to_string(),
                formatted_instance_location: unit.instance_location.format(),
                keyword_value,
                keyword_location: unit.keyword_location.to_string(),
                absolute_keyword_location: node.absolute_location(unit.keyword.as_deref()),
                details: kind.details(),
            };
            return x_error::interpolate(template, &variables);
        }
    }
    kind.message(&unit.instance_location.format())
}

/// Shape the tree as `classic` output.
pub(crate) fn classic(arena: &Arena, instance: &Value, unit: &OutputUnit) -> ClassicOutput {
    let mut errors = Vec::new();
    if !unit.valid {
        collect_classic(arena, instance, unit, &mut errors);
    }
    ClassicOutput {
        valid: unit.valid,
        errors,
    }
}

fn collect_classic(
    arena: &Arena,
    instance: &Value,
    unit: &OutputUnit,
    errors: &mut Vec<ClassicError>,
) {
    if !unit.ignore_nested {
        let before = errors.len();
        for child in &unit.nested {
            if !child.valid {
                collect_classic(arena, instance, child, errors);
            }
        }
        if errors.len() > before {
            return;
        }
    }
    let Some(kind) = &unit.error else { return };
    let node = arena.get(unit.source);
    errors.push(ClassicError {
        data: data_of(instance, unit),
        data_pointer: unit.instance_location.to_string(),
        schema: node.value.clone(),
        schema_pointer: node.document_pointer.to_string(),
        root_schema: (*node.document_root).clone(),
        kind: kind.tag().to_string(),
        error: message_of(arena, instance, unit),
        details: kind.details(),
    });
}

fn unit_json(arena: &Arena, instance: &Value, unit: &OutputUnit) -> Map<String, Value> {
    let node = arena.get(unit.source);
    let mut map = Map::new();
    map.insert("valid".to_string(), Value::Bool(unit.valid));
    map.insert(
        "keywordLocation".to_string(),
        Value::String(unit.keyword_location.to_string()),
    );
    map.insert(
        "absoluteKeywordLocation".to_string(),
        Value::String(node.absolute_location(unit.keyword.as_deref())),
    );
    map.insert(
        "instanceLocation".to_string(),
        Value::String(unit.instance_location.to_string()),
    );
    if unit.error.is_some() {
        map.insert(
            "error".to_string(),
            Value::String(message_of(arena, instance, unit)),
        );
    } else if let Some(annotation) = &unit.annotation {
        map.insert("annotation".to_string(), annotation.clone());
    }
    map
}

/// Shape the tree as `basic` output: the deepest same-validity leaf units.
pub(crate) fn basic(arena: &Arena, instance: &Value, unit: &OutputUnit) -> Value {
    let mut units = Vec::new();
    collect_basic(arena, instance, unit, unit.valid, &mut units);
    let key = if unit.valid { "annotations" } else { "errors" };
    let mut map = Map::new();
    map.insert("valid".to_string(), Value::Bool(unit.valid));
    map.insert(key.to_string(), Value::Array(units));
    Value::Object(map)
}

fn collect_basic(
    arena: &Arena,
    instance: &Value,
    unit: &OutputUnit,
    root_valid: bool,
    units: &mut Vec<Value>,
) {
    let descendants = unit
        .nested
        .iter()
        .filter(|child| child.valid == root_valid)
        .collect::<Vec<_>>();
    if root_valid {
        // Annotations are reported wherever they occur; errors only at the
        // deepest units
        if unit.annotation.is_some() {
            units.push(Value::Object(unit_json(arena, instance, unit)));
        }
        for child in descendants {
            collect_basic(arena, instance, child, root_valid, units);
        }
    } else if descendants.is_empty() {
        if unit.error.is_some() {
            units.push(Value::Object(unit_json(arena, instance, unit)));
        }
    } else {
        for child in descendants {
            collect_basic(arena, instance, child, root_valid, units);
        }
    }
}

/// Shape the tree as `detailed` output: chains with a single surviving
/// child collapse into that child.
pub(crate) fn detailed(arena: &Arena, instance: &Value, unit: &OutputUnit) -> Value {
    let surviving = unit
        .nested
        .iter()
        .filter(|child| child.valid == unit.valid)
        .collect::<Vec<_>>();
    // Annotations on failed units never surface, so they do not stop a
    // chain from collapsing
    let annotated = unit.valid && unit.annotation.is_some();
    if surviving.len() == 1 && !annotated && unit.error.is_none() {
        return detailed(arena, instance, surviving[0]);
    }
    let mut map = unit_json(arena, instance, unit);
    if !surviving.is_empty() {
        let key = if unit.valid { "annotations" } else { "errors" };
        map.insert(
            key.to_string(),
            Value::Array(
                surviving
                    .into_iter()
                    .map(|child| detailed(arena, instance, child))
                    .collect(),
            ),
        );
    }
    Value::Object(map)
}

/// Shape the tree as `verbose` output: a full mirror of the result tree.
pub(crate) fn verbose(arena: &Arena, instance: &Value, unit: &OutputUnit) -> Value {
    let mut map = unit_json(arena, instance, unit);
    let errors = unit
        .nested
        .iter()
        .filter(|child| !child.valid)
        .map(|child| verbose(arena, instance, child))
        .collect::<Vec<_>>();
    let annotations = unit
        .nested
        .iter()
        .filter(|child| child.valid)
        .map(|child| verbose(arena, instance, child))
        .collect::<Vec<_>>();
    if !errors.is_empty() {
        map.insert("errors".to_string(), Value::Array(errors));
    }
    if !annotations.is_empty() {
        map.insert("annotations".to_string(), Value::Array(annotations));
    }
    Value::Object(map)
}
