// crates/block-schema/src/field_type.rs
// ============================================================================
// Module: Field Types
// Description: Closed vocabulary of field type tags with an opaque fallback.
// Purpose: Replace stringly-typed field kinds with an exhaustive enum.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Field types are stored on the wire as plain string tags. Known tags map to
//! dedicated variants; anything else is kept verbatim in [`FieldType::Other`]
//! and treated as an opaque scalar, so newer schema documents never fail to
//! load against an older engine.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Field Type
// ============================================================================

/// Type tag of a declared field.
///
/// # Invariants
/// - `Other` never holds a tag that one of the named variants covers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    /// Single-line text (also the type of declarations without a `type`).
    #[default]
    Text,
    /// String, optionally translatable.
    String,
    /// Markdown text, optionally translatable.
    Markdown,
    /// Generic number.
    Number,
    /// Integer number.
    Integer,
    /// Floating-point number.
    Float,
    /// Decimal number.
    Decimal,
    /// Boolean flag.
    Boolean,
    /// JSON document stored as a string.
    Json,
    /// Point in time.
    Instant,
    /// Repeatable block of sub-configurations.
    Group,
    /// External stream reference.
    Stream,
    /// Newer alias of [`FieldType::Stream`].
    DataSource,
    /// Typed link (`{ type, target }`).
    Reference,
    /// Media handle.
    Media,
    /// Unrecognized tag, handled as an opaque scalar.
    Other(String),
}

impl FieldType {
    /// Parses a wire tag into a field type.
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        match tag {
            "text" => Self::Text,
            "string" => Self::String,
            "markdown" => Self::Markdown,
            "number" => Self::Number,
            "integer" => Self::Integer,
            "float" => Self::Float,
            "decimal" => Self::Decimal,
            "boolean" => Self::Boolean,
            "json" => Self::Json,
            "instant" => Self::Instant,
            "group" => Self::Group,
            "stream" => Self::Stream,
            "dataSource" => Self::DataSource,
            "reference" => Self::Reference,
            "media" => Self::Media,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the wire tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::String => "string",
            Self::Markdown => "markdown",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Json => "json",
            Self::Instant => "instant",
            Self::Group => "group",
            Self::Stream => "stream",
            Self::DataSource => "dataSource",
            Self::Reference => "reference",
            Self::Media => "media",
            Self::Other(tag) => tag,
        }
    }

    /// Returns true for `stream` and its `dataSource` alias.
    #[must_use]
    pub const fn is_stream(&self) -> bool {
        matches!(self, Self::Stream | Self::DataSource)
    }

    /// Returns true for `group`.
    #[must_use]
    pub const fn is_group(&self) -> bool {
        matches!(self, Self::Group)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Conversions
// ============================================================================

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        Self::parse(&tag)
    }
}

impl From<&str> for FieldType {
    fn from(tag: &str) -> Self {
        Self::parse(tag)
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}
