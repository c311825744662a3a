// crates/block-schema/src/streams.rs
// ============================================================================
// Module: Stream Resolver
// Description: Substitutes external stream payloads into resolved configurations.
// Purpose: Resolve stream references recursively, honoring caller overrides per group entry.
// Dependencies: crate::{definition, document, resolver}, serde_json, tracing
// ============================================================================

//! ## Overview
//! Stream and data source fields store a key into externally supplied stream
//! data. Resolution replaces that key with the payload (or `null`). Callers
//! may override any field through custom stream data, a sparse tree shaped
//! like the configuration: a present entry (even `null`) is returned as-is,
//! and for group fields the override is an array aligned with the entries.
//! Custom stream data that is not an object is treated as empty.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;
use tracing::debug;

use crate::definition::FieldDefinition;
use crate::definition::FieldMap;
use crate::definition::FieldShape;
use crate::document::Configuration;
use crate::document::StreamData;
use crate::resolver::entry_configuration;
use crate::resolver::resolve_value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Override tree used for group entries without a custom counterpart.
static NO_OVERRIDES: Value = Value::Null;

/// Magnitude below which integral float keys render as plain integers.
const INTEGRAL_KEY_LIMIT: f64 = 9_007_199_254_740_992.0;

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Resolves every field of a level, substituting stream payloads.
///
/// The result holds exactly the declared fields of `fields`.
#[must_use]
pub fn resolve_streams(
    fields: &FieldMap,
    configuration: &Configuration,
    stream_data: &StreamData,
    custom_stream_data: &Value,
) -> Configuration {
    let overrides = custom_overrides(custom_stream_data);
    let mut resolved = Map::new();
    for definition in fields {
        let value = resolve_field(definition, configuration, stream_data, overrides);
        resolved.insert(definition.field().to_string(), value);
    }
    resolved
}

// ============================================================================
// SECTION: Field Resolution
// ============================================================================

/// Resolves one field against stream data and overrides.
fn resolve_field(
    definition: &FieldDefinition,
    configuration: &Configuration,
    stream_data: &StreamData,
    overrides: Option<&Map<String, Value>>,
) -> Value {
    let custom_value = overrides.and_then(|overrides| overrides.get(definition.field()));

    if let FieldShape::Group(group) = definition.shape() {
        let entries = match resolve_value(definition, configuration) {
            Value::Array(entries) => entries,
            _ => Vec::new(),
        };
        let entry_overrides = custom_value.and_then(Value::as_array);
        return Value::Array(
            entries
                .into_iter()
                .enumerate()
                .map(|(index, entry)| {
                    let entry_custom = entry_overrides
                        .and_then(|items| items.get(index))
                        .unwrap_or(&NO_OVERRIDES);
                    Value::Object(resolve_streams(
                        group.fields(),
                        &entry_configuration(entry),
                        stream_data,
                        entry_custom,
                    ))
                })
                .collect(),
        );
    }

    if let Some(custom_value) = custom_value {
        return custom_value.clone();
    }

    let value = resolve_value(definition, configuration);
    if definition.field_type().is_stream() {
        return stream_key(&value)
            .and_then(|key| stream_data.get(&key))
            .cloned()
            .unwrap_or(Value::Null);
    }
    value
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the override map, or `None` when overrides are not an object.
fn custom_overrides(custom_stream_data: &Value) -> Option<&Map<String, Value>> {
    match custom_stream_data {
        Value::Object(map) => Some(map),
        Value::Null => None,
        _ => {
            debug!("ignoring custom stream data that is not an object");
            None
        }
    }
}

/// Converts a stored stream reference into a stream data key.
fn stream_key(value: &Value) -> Option<String> {
    match value {
        Value::String(key) => Some(key.clone()),
        Value::Number(number) => Some(number_key(number)),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Renders a numeric stream reference; integral floats drop the fraction.
fn number_key(number: &serde_json::Number) -> String {
    match number.as_f64() {
        Some(value) if number.is_f64() && value.fract() == 0.0 && value.abs() < INTEGRAL_KEY_LIMIT => {
            integral_key(value).to_string()
        }
        _ => number.to_string(),
    }
}

/// Converts an integral float within `INTEGRAL_KEY_LIMIT` to an integer.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Callers pass integral values well inside the i64 range."
)]
fn integral_key(value: f64) -> i64 {
    value as i64
}
