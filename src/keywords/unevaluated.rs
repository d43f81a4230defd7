//! Annotation collection shared by `unevaluatedItems` and
//! `unevaluatedProperties`.
//!
//! Walks the valid sibling results (and, through them, nested applicator
//! results) at one instance location, gathering which array indices or
//! object keys were already evaluated.
use ahash::AHashSet;
use serde_json::Value;

use crate::{output::OutputUnit, paths::JsonPointer};

#[derive(Debug, Default)]
pub(crate) struct ItemCoverage {
    pub(crate) all: bool,
    pub(crate) indices: AHashSet<usize>,
}

impl ItemCoverage {
    pub(crate) fn contains(&self, index: usize) -> bool {
        self.all || self.indices.contains(&index)
    }
}

pub(crate) fn covered_items(units: &[OutputUnit], location: &JsonPointer) -> ItemCoverage {
    let mut coverage = ItemCoverage::default();
    for unit in units {
        walk_items(unit, location, &mut coverage);
    }
    coverage
}

fn walk_items(unit: &OutputUnit, location: &JsonPointer, coverage: &mut ItemCoverage) {
    if !unit.valid || unit.instance_location != *location {
        return;
    }
    match unit.keyword.as_deref() {
        Some("prefixItems") => {
            if let Some(highest) = unit.annotation.as_ref().and_then(Value::as_i64) {
                if highest >= 0 {
                    coverage.indices.extend(0..=(highest as usize));
                }
            }
        }
        Some("items" | "unevaluatedItems") => {
            if unit.annotation.as_ref().and_then(Value::as_bool) == Some(true) {
                coverage.all = true;
            }
        }
        Some("contains") => {
            if let Some(indices) = unit.annotation.as_ref().and_then(Value::as_array) {
                coverage
                    .indices
                    .extend(indices.iter().filter_map(Value::as_u64).map(|i| i as usize));
            }
        }
        _ => {}
    }
    for child in &unit.nested {
        walk_items(child, location, coverage);
    }
}

#[derive(Debug, Default)]
pub(crate) struct KeyCoverage {
    keys: AHashSet<String>,
}

impl KeyCoverage {
    pub(crate) fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }
}

pub(crate) fn covered_keys(units: &[OutputUnit], location: &JsonPointer) -> KeyCoverage {
    let mut coverage = KeyCoverage::default();
    for unit in units {
        walk_keys(unit, location, &mut coverage);
    }
    coverage
}

fn walk_keys(unit: &OutputUnit, location: &JsonPointer, coverage: &mut KeyCoverage) {
    if !unit.valid || unit.instance_location != *location {
        return;
    }
    if let Some(
        "properties" | "patternProperties" | "additionalProperties" | "unevaluatedProperties",
    ) = unit.keyword.as_deref()
    {
        if let Some(keys) = unit.annotation.as_ref().and_then(Value::as_array) {
            coverage
                .keys
                .extend(keys.iter().filter_map(Value::as_str).map(String::from));
        }
    }
    for child in &unit.nested {
        walk_keys(child, location, coverage);
    }
}
