// crates/block-schema/src/defaults.rs
// ============================================================================
// Module: Field Default Table
// Description: Type-directed default values for declared fields.
// Purpose: Guarantee every compiled field carries a defined default.
// Dependencies: crate::field_type, serde_json
// ============================================================================

//! ## Overview
//! A declared default always wins, including an explicit `null`. Without one,
//! the default is derived from the field type. Unknown types fall through to
//! `null` instead of failing.

use serde_json::Value;

use crate::field_type::FieldType;

/// Returns the default value for a field of `field_type`.
///
/// `declared` is the declaration's own `default` key: `None` when absent,
/// `Some(Value::Null)` when explicitly declared as `null`.
#[must_use]
pub fn default_for(field_type: &FieldType, declared: Option<&Value>) -> Value {
    if let Some(value) = declared {
        return value.clone();
    }

    match field_type {
        FieldType::Group => Value::Array(Vec::new()),
        FieldType::Decimal | FieldType::Integer | FieldType::Float | FieldType::Number => {
            Value::from(0)
        }
        FieldType::String | FieldType::Text | FieldType::Markdown => Value::String(String::new()),
        FieldType::Json => Value::String("{}".to_string()),
        FieldType::Boolean => Value::Bool(false),
        FieldType::Instant
        | FieldType::Stream
        | FieldType::DataSource
        | FieldType::Reference
        | FieldType::Media
        | FieldType::Other(_) => Value::Null,
    }
}
