// crates/block-schema/src/resolver.rs
// ============================================================================
// Module: Value Resolver
// Description: Current-value resolution and configuration completion.
// Purpose: Apply defaults and pad/complete group entries with one recursive walk.
// Dependencies: crate::{definition, document, visitor}, serde_json
// ============================================================================

//! ## Overview
//! A field's value is its stored value when present and non-null, otherwise
//! its default. Group values keep at most the group maximum of stored
//! entries, are padded with empty entries up to the group minimum, and every
//! entry is completed against the group's sub-schema, which resolves nested
//! groups the same way. Padding never grows a group toward its maximum.
//!
//! Completion is idempotent: completing an already complete configuration
//! returns it unchanged. Keys the schema does not declare are preserved at
//! every level.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;

use crate::definition::FieldDefinition;
use crate::definition::FieldMap;
use crate::definition::FieldShape;
use crate::definition::GroupSchema;
use crate::document::Configuration;
use crate::visitor::FieldPath;
use crate::visitor::FieldVisitor;
use crate::visitor::NoopVisitor;

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Resolves the current value of one field against a configuration.
#[must_use]
pub fn resolve_value(definition: &FieldDefinition, configuration: &Configuration) -> Value {
    let path = FieldPath::root().field(definition.field());
    resolve_with(definition, configuration, &mut NoopVisitor, &path)
}

/// Completes a configuration against a field map.
///
/// Every declared field is replaced by its resolved value; undeclared keys
/// are copied through unchanged. The visitor is called for every resolved
/// field with its path below `path`.
#[must_use]
pub fn complete_fields(
    fields: &FieldMap,
    configuration: &Configuration,
    visitor: &mut dyn FieldVisitor,
    path: &FieldPath,
) -> Configuration {
    let mut completed = configuration.clone();
    for definition in fields {
        let field_path = path.field(definition.field());
        let value = resolve_with(definition, configuration, visitor, &field_path);
        completed.insert(definition.field().to_string(), value);
    }
    completed
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Resolves one field, reporting it (and nested fields) to the visitor.
fn resolve_with(
    definition: &FieldDefinition,
    configuration: &Configuration,
    visitor: &mut dyn FieldVisitor,
    path: &FieldPath,
) -> Value {
    let value = stored_or_default(definition, configuration);
    let value = match definition.shape() {
        FieldShape::Scalar => value,
        FieldShape::Group(group) => Value::Array(complete_group(group, value, visitor, path)),
    };
    visitor.visit_field(definition, &value, path);
    value
}

/// Returns the stored value when present and non-null, else the default.
fn stored_or_default(definition: &FieldDefinition, configuration: &Configuration) -> Value {
    match configuration.get(definition.field()) {
        Some(value) if !value.is_null() => value.clone(),
        _ => definition.default_value().clone(),
    }
}

/// Caps, pads, and completes the entries of a group value.
fn complete_group(
    group: &GroupSchema,
    value: Value,
    visitor: &mut dyn FieldVisitor,
    path: &FieldPath,
) -> Vec<Value> {
    let mut entries = match value {
        Value::Array(entries) => entries,
        _ => Vec::new(),
    };
    entries.truncate(group.max());
    if entries.len() < group.min() {
        entries.resize_with(group.min(), || Value::Object(Map::new()));
    }

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let entry = entry_configuration(entry);
            Value::Object(complete_fields(group.fields(), &entry, visitor, &path.index(index)))
        })
        .collect()
}

/// Normalizes a group entry to a configuration; non-objects become empty.
pub(crate) fn entry_configuration(entry: Value) -> Configuration {
    match entry {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
