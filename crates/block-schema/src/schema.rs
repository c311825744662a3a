// crates/block-schema/src/schema.rs
// ============================================================================
// Module: Configuration Schema
// Description: Immutable facade over a compiled schema and a configuration snapshot.
// Purpose: Expose get/set/has, required-value checks, completion, and stream resolution.
// Dependencies: crate::{compiler, definition, document, error, resolver, streams, validation,
//              visitor}, serde_json, tracing
// ============================================================================

//! ## Overview
//! A [`ConfigurationSchema`] compiles its sections once and never changes
//! afterwards. [`ConfigurationSchema::set`] returns a new instance that shares
//! the compiled schema and holds a shallow copy of the configuration with the
//! one key replaced, so instances derived from each other can be used side by
//! side from independent call sites.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::compiler::compile_sections;
use crate::definition::FieldDefinition;
use crate::definition::FieldMap;
use crate::document::Configuration;
use crate::document::SchemaDocument;
use crate::document::SectionSchema;
use crate::document::StreamData;
use crate::document::configuration_from_value;
use crate::error::SchemaError;
use crate::error::SchemaResult;
use crate::resolver::complete_fields;
use crate::resolver::resolve_value;
use crate::streams::resolve_streams;
use crate::validation::any_missing;
use crate::validation::any_missing_in_section;
use crate::validation::is_missing;
use crate::validation::missing_fields;
use crate::visitor::FieldPath;
use crate::visitor::FieldVisitor;
use crate::visitor::NoopVisitor;

// ============================================================================
// SECTION: Compiled Schema
// ============================================================================

/// Schema sections together with their compiled field map.
#[derive(Debug)]
struct CompiledSchema {
    /// Sections as supplied.
    sections: Vec<SectionSchema>,
    /// Field map compiled from `sections`.
    fields: FieldMap,
}

// ============================================================================
// SECTION: Configuration Schema
// ============================================================================

/// Compiled schema paired with one configuration snapshot.
///
/// # Invariants
/// - Neither the compiled schema nor the configuration changes after construction.
#[derive(Debug, Clone)]
pub struct ConfigurationSchema {
    /// Shared compiled schema.
    compiled: Arc<CompiledSchema>,
    /// Configuration snapshot.
    configuration: Arc<Configuration>,
}

impl ConfigurationSchema {
    /// Compiles `sections` and pairs them with `configuration`.
    ///
    /// A configuration that is not a JSON object is treated as empty.
    #[must_use]
    pub fn new(sections: Vec<SectionSchema>, configuration: Value) -> Self {
        let fields = compile_sections(&sections);
        Self {
            compiled: Arc::new(CompiledSchema {
                sections,
                fields,
            }),
            configuration: Arc::new(configuration_from_value(configuration)),
        }
    }

    /// Builds a schema from a parsed document.
    #[must_use]
    pub fn from_document(document: SchemaDocument, configuration: Value) -> Self {
        Self::new(document.into_sections(), configuration)
    }

    /// Builds a schema from raw JSON values.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidDocument`] when `schema` is not a list of
    /// sections.
    pub fn from_json(schema: Value, configuration: Value) -> SchemaResult<Self> {
        Ok(Self::from_document(SchemaDocument::from_json(schema)?, configuration))
    }

    /// Returns a new instance over the same compiled schema.
    #[must_use]
    pub fn with_configuration(&self, configuration: Value) -> Self {
        Self {
            compiled: Arc::clone(&self.compiled),
            configuration: Arc::new(configuration_from_value(configuration)),
        }
    }

    // ========================================================================
    // SECTION: Accessors
    // ========================================================================

    /// Returns the schema sections as supplied.
    #[must_use]
    pub fn sections(&self) -> &[SectionSchema] {
        &self.compiled.sections
    }

    /// Returns the raw configuration snapshot.
    #[must_use]
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Returns the compiled field map.
    #[must_use]
    pub fn fields(&self) -> &FieldMap {
        &self.compiled.fields
    }

    /// Returns true when the field id is declared.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.compiled.fields.contains(field)
    }

    /// Returns the definition of a declared field.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownField`] when the id is not declared.
    pub fn get_field(&self, field: &str) -> SchemaResult<&FieldDefinition> {
        self.compiled.fields.get(field).ok_or_else(|| SchemaError::unknown_field(field))
    }

    /// Returns whether a declared field is required.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownField`] when the id is not declared.
    pub fn is_field_required(&self, field: &str) -> SchemaResult<bool> {
        self.get_field(field).map(FieldDefinition::is_required)
    }

    /// Returns whether a declared field is disabled.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownField`] when the id is not declared.
    pub fn is_field_disabled(&self, field: &str) -> SchemaResult<bool> {
        self.get_field(field).map(FieldDefinition::is_disabled)
    }

    // ========================================================================
    // SECTION: Values
    // ========================================================================

    /// Returns the resolved value of a field.
    ///
    /// Unknown ids log a warning and fall back to the raw stored value, or
    /// `null` when nothing is stored.
    #[must_use]
    pub fn get(&self, field: &str) -> Value {
        if let Some(definition) = self.compiled.fields.get(field) {
            return resolve_value(definition, &self.configuration);
        }
        warn!(field, "unknown field in this configuration schema");
        self.configuration.get(field).cloned().unwrap_or(Value::Null)
    }

    /// Returns a new instance with one field's stored value replaced.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownField`] when the id is not declared.
    pub fn set(&self, field: &str, value: Value) -> SchemaResult<Self> {
        if !self.has(field) {
            return Err(SchemaError::unknown_field(field));
        }
        let mut configuration = Configuration::clone(&self.configuration);
        configuration.insert(field.to_string(), value);
        Ok(Self {
            compiled: Arc::clone(&self.compiled),
            configuration: Arc::new(configuration),
        })
    }

    /// Returns the completed configuration.
    ///
    /// Every declared field holds its resolved value, group entries are
    /// padded and completed, and undeclared keys are kept.
    #[must_use]
    pub fn complete_values(&self) -> Configuration {
        self.complete_values_with(&mut NoopVisitor)
    }

    /// Returns the completed configuration, reporting every field to `visitor`.
    #[must_use]
    pub fn complete_values_with(&self, visitor: &mut dyn FieldVisitor) -> Configuration {
        complete_fields(&self.compiled.fields, &self.configuration, visitor, &FieldPath::root())
    }

    /// Returns all declared fields with stream references resolved.
    ///
    /// `custom_stream_data` overrides fields (and group entries) verbatim; a
    /// value that is not an object is treated as no overrides.
    #[must_use]
    pub fn configuration_with_resolved_streams(
        &self,
        stream_data: &StreamData,
        custom_stream_data: &Value,
    ) -> Configuration {
        resolve_streams(&self.compiled.fields, &self.configuration, stream_data, custom_stream_data)
    }

    // ========================================================================
    // SECTION: Required Values
    // ========================================================================

    /// Returns true when the field has a missing required value.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownField`] when the id is not declared.
    pub fn has_missing_required_value_in_field(
        &self,
        field: &str,
        skip_streams: bool,
    ) -> SchemaResult<bool> {
        let definition = self.get_field(field)?;
        Ok(is_missing(definition, &self.configuration, skip_streams))
    }

    /// Returns true when any declared field has a missing required value.
    #[must_use]
    pub fn has_missing_required_field_values(&self, skip_streams: bool) -> bool {
        any_missing(&self.compiled.fields, &self.configuration, skip_streams)
    }

    /// Returns true when any field of the named section has a missing required value.
    #[must_use]
    pub fn has_missing_required_field_values_in_section(
        &self,
        section_name: &str,
        skip_streams: bool,
    ) -> bool {
        any_missing_in_section(
            &self.compiled.fields,
            &self.configuration,
            section_name,
            skip_streams,
        )
    }

    /// Returns the ids of all fields with missing required values.
    #[must_use]
    pub fn fields_with_missing_required_values(&self, skip_streams: bool) -> Vec<&str> {
        missing_fields(&self.compiled.fields, &self.configuration, skip_streams)
    }
}
