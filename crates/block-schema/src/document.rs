// crates/block-schema/src/document.rs
// ============================================================================
// Module: Schema Document Model
// Description: Raw section and field declarations plus configuration payload types.
// Purpose: Read schema documents leniently so stale or hand-written documents still load.
// Dependencies: crate::{error, field_type}, serde, serde_json
// ============================================================================

//! ## Overview
//! A schema document is an ordered list of sections, each holding an ordered
//! list of field declarations. Declarations are read key by key with the same
//! coercions the authoring tools apply: wrongly typed keys fall back to their
//! absent form, unreadable declarations are dropped, and unknown keys such as
//! `label` are ignored. Only a document that is not a list at all is rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::error::SchemaError;
use crate::error::SchemaResult;
use crate::field_type::FieldType;

// ============================================================================
// SECTION: Payload Types
// ============================================================================

/// Configuration payload: field id to stored value. Unknown keys are kept.
pub type Configuration = Map<String, Value>;

/// Resolved stream payloads keyed by the stream id stored in stream fields.
pub type StreamData = Map<String, Value>;

/// Coerces an arbitrary payload into a configuration mapping.
///
/// Anything that is not a JSON object (arrays, scalars, `null`) becomes an
/// empty configuration.
#[must_use]
pub fn configuration_from_value(value: Value) -> Configuration {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

// ============================================================================
// SECTION: Schema Document
// ============================================================================

/// Ordered list of schema sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SchemaDocument {
    /// Sections in declaration order.
    sections: Vec<SectionSchema>,
}

impl SchemaDocument {
    /// Creates a document from already-parsed sections.
    #[must_use]
    pub const fn new(sections: Vec<SectionSchema>) -> Self {
        Self {
            sections,
        }
    }

    /// Reads a document from a JSON value.
    ///
    /// `null` is read as an empty document. Sections that are not objects
    /// contribute no fields.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidDocument`] when the value is neither an
    /// array nor `null`.
    pub fn from_json(value: Value) -> SchemaResult<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Array(items) => {
                Ok(Self::new(items.into_iter().map(SectionSchema::from_json).collect()))
            }
            other => Err(SchemaError::InvalidDocument(format!(
                "expected a list of sections, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Reads a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidDocument`] when the text is not JSON or
    /// not a list of sections.
    pub fn from_json_str(text: &str) -> SchemaResult<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|err| SchemaError::InvalidDocument(err.to_string()))?;
        Self::from_json(value)
    }

    /// Returns the sections in declaration order.
    #[must_use]
    pub fn sections(&self) -> &[SectionSchema] {
        &self.sections
    }

    /// Consumes the document and returns its sections.
    #[must_use]
    pub fn into_sections(self) -> Vec<SectionSchema> {
        self.sections
    }
}

impl<'de> Deserialize<'de> for SchemaDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// SECTION: Section Schema
// ============================================================================

/// Named group of field declarations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionSchema {
    /// Display name, used to tag compiled fields with their origin.
    #[serde(default, deserialize_with = "lenient_string_or_empty")]
    pub name: String,
    /// Field declarations in order.
    #[serde(default, deserialize_with = "lenient_declarations")]
    pub fields: Vec<FieldDeclaration>,
}

impl SectionSchema {
    /// Creates a section from a name and declarations.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDeclaration>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Reads a section from a JSON value; non-objects become empty sections.
    #[must_use]
    pub fn from_json(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

// ============================================================================
// SECTION: Field Declaration
// ============================================================================

/// Raw declaration of a single field as found in a schema document.
///
/// Every key is optional. A declaration without a non-empty `field` id is
/// presentational (a description, an image) and is never compiled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDeclaration {
    /// Field id, unique within its schema level.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Type tag; absent means `text`.
    #[serde(
        default,
        rename = "type",
        deserialize_with = "lenient_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub field_type: Option<FieldType>,
    /// Enumerated allowed values.
    #[serde(default, deserialize_with = "lenient_values", skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Value>,
    /// Declared default. `Some(Value::Null)` is an explicit `null` default.
    #[serde(default, deserialize_with = "present_value", skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Opaque validation rules, carried but never executed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate: Option<Value>,
    /// Nested declarations of a `group` field.
    #[serde(
        default,
        deserialize_with = "lenient_nested_declarations",
        skip_serializing_if = "Option::is_none"
    )]
    pub fields: Option<Vec<FieldDeclaration>>,
    /// Minimum group entry count.
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub min: Option<u64>,
    /// Maximum group entry count.
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub max: Option<u64>,
    /// Explicit required flag; any present value counts as explicit.
    #[serde(default, deserialize_with = "lenient_truthy", skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Disabled flag; only a literal `true` disables.
    #[serde(default, deserialize_with = "lenient_strict_bool", skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    /// Translatable flag; absent stays unspecified.
    #[serde(default, deserialize_with = "lenient_truthy", skip_serializing_if = "Option::is_none")]
    pub translatable: Option<bool>,
    /// Kind of stream a `stream`/`dataSource` field refers to.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub stream_type: Option<String>,
}

impl FieldDeclaration {
    /// Creates a declaration with an id and a type.
    pub fn new(field: impl Into<String>, field_type: impl Into<FieldType>) -> Self {
        Self {
            field: Some(field.into()),
            field_type: Some(field_type.into()),
            ..Self::default()
        }
    }

    /// Sets the declared default.
    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Sets the explicit required flag.
    #[must_use]
    pub const fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Sets the group entry bounds.
    #[must_use]
    pub const fn with_bounds(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Sets the nested declarations of a group.
    #[must_use]
    pub fn with_fields(mut self, fields: Vec<Self>) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Sets the stream type.
    #[must_use]
    pub fn with_stream_type(mut self, stream_type: impl Into<String>) -> Self {
        self.stream_type = Some(stream_type.into());
        self
    }

    /// Sets the translatable flag.
    #[must_use]
    pub const fn with_translatable(mut self, translatable: bool) -> Self {
        self.translatable = Some(translatable);
        self
    }

    /// Sets the disabled flag.
    #[must_use]
    pub const fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    /// Returns the field id when it is present and non-empty.
    #[must_use]
    pub fn field_id(&self) -> Option<&str> {
        self.field.as_deref().filter(|id| !id.is_empty())
    }
}

// ============================================================================
// SECTION: Value Helpers
// ============================================================================

/// Truthiness as used by configuration authoring tools.
///
/// `null`, `false`, `0`, and `""` are falsy; every array and object is truthy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Names the JSON kind of a value for diagnostics.
const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Reads every readable declaration from an array; anything else is empty.
fn declarations_from_value(value: Value) -> Vec<FieldDeclaration> {
    match value {
        Value::Array(items) => {
            items.into_iter().filter_map(|item| serde_json::from_value(item).ok()).collect()
        }
        _ => Vec::new(),
    }
}

// ============================================================================
// SECTION: Lenient Deserializers
// ============================================================================

/// Keeps a present value, including an explicit `null`.
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Reads a string, treating any other JSON kind as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

/// Reads a string, falling back to the empty string.
fn lenient_string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_string(deserializer).map(Option::unwrap_or_default)
}

/// Reads a type tag; empty or non-string tags are absent.
fn lenient_type<'de, D>(deserializer: D) -> Result<Option<FieldType>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.filter(|tag| !tag.is_empty()).map(FieldType::from))
}

/// Reads enumerated values; non-arrays are empty.
fn lenient_values<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => Vec::new(),
    })
}

/// Reads a non-negative count; fractional counts are truncated.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Number(number) = value else {
        return Ok(None);
    };
    if let Some(count) = number.as_u64() {
        return Ok(Some(count));
    }
    Ok(number.as_f64().filter(|n| n.is_finite() && *n >= 0.0).map(truncate_count))
}

/// Truncates a finite, non-negative float to a count, saturating at `u64::MAX`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "Callers pass finite non-negative values; float-to-int casts saturate."
)]
fn truncate_count(value: f64) -> u64 {
    value as u64
}

/// Reads any present value as a flag by truthiness.
fn lenient_truthy<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| Some(is_truthy(&value)))
}

/// Reads a flag that is only set by a literal `true`.
fn lenient_strict_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| Some(value == Value::Bool(true)))
}

/// Reads a section's declaration list.
fn lenient_declarations<'de, D>(deserializer: D) -> Result<Vec<FieldDeclaration>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(declarations_from_value)
}

/// Reads a group's nested declaration list; non-arrays are absent.
fn lenient_nested_declarations<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<FieldDeclaration>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.is_array().then(|| declarations_from_value(value)))
}
