// crates/block-schema/src/definition.rs
// ============================================================================
// Module: Field Definitions
// Description: Compiled, normalized field definitions and the ordered field map.
// Purpose: Represent the self-referential schema as a tagged scalar/group shape.
// Dependencies: crate::field_type, serde, serde_json
// ============================================================================

//! ## Overview
//! A [`FieldDefinition`] is the normalized form of one declaration: type,
//! default, and flags are always defined. Group fields carry their own
//! compiled [`FieldMap`] in [`FieldShape::Group`], so resolution, stream
//! substitution, and validation recurse through one structure at any depth.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Serialize;
use serde::Serializer;
use serde_json::Value;

use crate::field_type::FieldType;

// ============================================================================
// SECTION: Field Definition
// ============================================================================

/// Compiled definition of a declared field.
///
/// # Invariants
/// - `default` is always defined (possibly `null`).
/// - `shape` is [`FieldShape::Group`] exactly when `field_type` is `group`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Field id within its schema level.
    pub(crate) field: String,
    /// Type tag.
    #[serde(rename = "type")]
    pub(crate) field_type: FieldType,
    /// Name of the section the field was declared in.
    pub(crate) section_name: String,
    /// Enumerated allowed values; empty when unconstrained.
    pub(crate) values: Vec<Value>,
    /// Declared or type-derived default.
    pub(crate) default: Value,
    /// Opaque validation rules.
    pub(crate) validate: Value,
    /// Explicit or inferred required flag.
    pub(crate) required: bool,
    /// Disabled flag.
    pub(crate) disabled: bool,
    /// Translatable flag; `None` when unspecified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) translatable: Option<bool>,
    /// Declared stream type of stream fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) stream_type: Option<String>,
    /// Scalar or group shape.
    #[serde(flatten)]
    pub(crate) shape: FieldShape,
}

impl FieldDefinition {
    /// Returns the field id.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the type tag.
    #[must_use]
    pub const fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// Returns the originating section name.
    #[must_use]
    pub fn section_name(&self) -> &str {
        &self.section_name
    }

    /// Returns the enumerated allowed values.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the effective default value.
    #[must_use]
    pub const fn default_value(&self) -> &Value {
        &self.default
    }

    /// Returns the declared validation rules (an empty object when undeclared).
    #[must_use]
    pub const fn validate(&self) -> &Value {
        &self.validate
    }

    /// Returns whether a value is required.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Returns whether the field is disabled.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Returns the translatable flag as declared.
    #[must_use]
    pub const fn translatable(&self) -> Option<bool> {
        self.translatable
    }

    /// Returns true when the field is declared translatable.
    #[must_use]
    pub fn is_translatable(&self) -> bool {
        self.translatable.unwrap_or(false)
    }

    /// Returns the declared stream type.
    #[must_use]
    pub fn stream_type(&self) -> Option<&str> {
        self.stream_type.as_deref()
    }

    /// Returns the scalar or group shape.
    #[must_use]
    pub const fn shape(&self) -> &FieldShape {
        &self.shape
    }

    /// Returns the group sub-schema for group fields.
    #[must_use]
    pub const fn group(&self) -> Option<&GroupSchema> {
        match &self.shape {
            FieldShape::Group(group) => Some(group),
            FieldShape::Scalar => None,
        }
    }

    /// Returns the minimum entry count of a group (`1` for scalars).
    #[must_use]
    pub fn min(&self) -> usize {
        self.group().map_or(crate::compiler::DEFAULT_GROUP_MIN, |group| group.min)
    }

    /// Returns the maximum entry count of a group (`16` for scalars).
    #[must_use]
    pub fn max(&self) -> usize {
        self.group().map_or(crate::compiler::DEFAULT_GROUP_MAX, |group| group.max)
    }
}

// ============================================================================
// SECTION: Field Shape
// ============================================================================

/// Structural shape of a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "camelCase")]
pub enum FieldShape {
    /// Single value of the field's type.
    Scalar,
    /// Sequence of sub-configurations conforming to a nested schema.
    Group(GroupSchema),
}

/// Nested schema and cardinality of a group field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSchema {
    /// Compiled sub-fields of every entry.
    pub(crate) fields: FieldMap,
    /// Minimum entry count; resolution pads up to it.
    pub(crate) min: usize,
    /// Maximum entry count; stored entries beyond it are dropped on resolution.
    pub(crate) max: usize,
}

impl GroupSchema {
    /// Returns the compiled sub-fields.
    #[must_use]
    pub const fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Returns the minimum entry count.
    #[must_use]
    pub const fn min(&self) -> usize {
        self.min
    }

    /// Returns the maximum entry count.
    #[must_use]
    pub const fn max(&self) -> usize {
        self.max
    }
}

// ============================================================================
// SECTION: Field Map
// ============================================================================

/// Field definitions of one schema level, keyed by id in declaration order.
///
/// # Invariants
/// - Every id appears once; re-inserting an id replaces the definition in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    /// Definitions in first-declaration order.
    definitions: Vec<FieldDefinition>,
    /// Position of each id in `definitions`.
    index: BTreeMap<String, usize>,
}

impl FieldMap {
    /// Creates an empty field map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a definition; a previous definition with the same id is replaced.
    pub fn insert(&mut self, definition: FieldDefinition) {
        if let Some(slot) =
            self.index.get(&definition.field).and_then(|position| self.definitions.get_mut(*position))
        {
            *slot = definition;
            return;
        }
        self.index.insert(definition.field.clone(), self.definitions.len());
        self.definitions.push(definition);
    }

    /// Merges another map into this one; later definitions win.
    pub fn extend(&mut self, other: Self) {
        for definition in other.definitions {
            self.insert(definition);
        }
    }

    /// Looks up a definition by id.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldDefinition> {
        self.index.get(field).and_then(|position| self.definitions.get(*position))
    }

    /// Returns true when the id is declared.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.index.contains_key(field)
    }

    /// Iterates definitions in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldDefinition> {
        self.definitions.iter()
    }

    /// Iterates field ids in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(FieldDefinition::field)
    }

    /// Returns the number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true when no fields are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl<'a> IntoIterator for &'a FieldMap {
    type Item = &'a FieldDefinition;
    type IntoIter = std::slice::Iter<'a, FieldDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for FieldMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.definitions.iter())
    }
}
