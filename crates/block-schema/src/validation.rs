// crates/block-schema/src/validation.rs
// ============================================================================
// Module: Required Field Validator
// Description: Type-aware detection of missing required values.
// Purpose: Answer "is anything required still missing" per field, section, or level.
// Dependencies: crate::{definition, document, resolver}, serde_json
// ============================================================================

//! ## Overview
//! A field is checked against its resolved value, so defaults count as
//! values. Group fields are missing when any entry has a missing required
//! sub-field, regardless of the group's own required flag. The `skip_streams`
//! switch ignores stream fields so form completeness can be judged separately
//! from stream wiring. Disabled fields are validated like any other field.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::definition::FieldDefinition;
use crate::definition::FieldMap;
use crate::definition::FieldShape;
use crate::document::Configuration;
use crate::document::is_truthy;
use crate::field_type::FieldType;
use crate::resolver::entry_configuration;
use crate::resolver::resolve_value;

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Returns true when the field has a missing required value.
#[must_use]
pub fn is_missing(
    definition: &FieldDefinition,
    configuration: &Configuration,
    skip_streams: bool,
) -> bool {
    let value = resolve_value(definition, configuration);

    if let FieldShape::Group(group) = definition.shape() {
        let Value::Array(entries) = value else {
            return false;
        };
        return entries.into_iter().any(|entry| {
            any_missing(group.fields(), &entry_configuration(entry), skip_streams)
        });
    }

    if !definition.is_required() {
        return false;
    }

    let field_type = definition.field_type();
    if field_type.is_stream() && skip_streams {
        return false;
    }

    if matches!(field_type, FieldType::Reference) {
        return reference_missing(&value);
    }

    if (field_type.is_stream() || matches!(field_type, FieldType::Media)) && is_truthy(&value) {
        return any_property_falsy(&value);
    }

    if matches!(field_type, FieldType::String | FieldType::Markdown)
        && definition.is_translatable()
        && is_truthy(&value)
    {
        return any_property_falsy(&value) || property_count(&value) == 0;
    }

    match &value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

/// Returns true when any field of the level has a missing required value.
#[must_use]
pub fn any_missing(fields: &FieldMap, configuration: &Configuration, skip_streams: bool) -> bool {
    fields.iter().any(|definition| is_missing(definition, configuration, skip_streams))
}

/// Like [`any_missing`], restricted to fields declared in `section_name`.
#[must_use]
pub fn any_missing_in_section(
    fields: &FieldMap,
    configuration: &Configuration,
    section_name: &str,
    skip_streams: bool,
) -> bool {
    fields.iter().any(|definition| {
        definition.section_name() == section_name
            && is_missing(definition, configuration, skip_streams)
    })
}

/// Returns the ids of all fields of the level with missing required values.
#[must_use]
pub fn missing_fields<'a>(
    fields: &'a FieldMap,
    configuration: &Configuration,
    skip_streams: bool,
) -> Vec<&'a str> {
    fields
        .iter()
        .filter(|definition| is_missing(definition, configuration, skip_streams))
        .map(FieldDefinition::field)
        .collect()
}

// ============================================================================
// SECTION: Value Predicates
// ============================================================================

/// A reference needs non-empty string `type` and `target` properties.
fn reference_missing(value: &Value) -> bool {
    let Value::Object(reference) = value else {
        return true;
    };
    let non_empty = |key: &str| {
        reference.get(key).and_then(Value::as_str).is_some_and(|text| !text.is_empty())
    };
    !(non_empty("type") && non_empty("target"))
}

/// Returns true when any own property of the value is falsy.
///
/// Strings only have non-empty characters, so they never qualify.
fn any_property_falsy(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.values().any(|item| !is_truthy(item)),
        Value::Array(items) => items.iter().any(|item| !is_truthy(item)),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => false,
    }
}

/// Counts the own properties of a value.
fn property_count(value: &Value) -> usize {
    match value {
        Value::Object(map) => map.len(),
        Value::Array(items) => items.len(),
        Value::String(text) => text.chars().count(),
        Value::Null | Value::Bool(_) | Value::Number(_) => 0,
    }
}
