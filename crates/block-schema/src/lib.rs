// crates/block-schema/src/lib.rs
// ============================================================================
// Module: Block Schema Root
// Description: Public API surface for configuration schema resolution.
// Purpose: Wire together compilation, completion, stream resolution, and validation.
// Dependencies: crate::{compiler, defaults, definition, document, error, field_type, resolver,
//              schema, streams, validation, visitor}
// ============================================================================

//! ## Overview
//! `block-schema` turns a declarative schema document (sections of field
//! declarations, including recursive `group` fields and `stream` reference
//! fields) plus a possibly incomplete configuration payload into a complete,
//! correctly typed configuration. All operations are pure functions over
//! immutable inputs; the only "mutation" is [`ConfigurationSchema::set`],
//! which returns a new instance.
//!
//! Configuration documents evolve independently of schema documents, so data
//! shape irregularities are absorbed and normalized rather than rejected.
//! Only schema misuse (writing or introspecting an unknown field) fails.

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod compiler;
pub mod defaults;
pub mod definition;
pub mod document;
pub mod error;
pub mod field_type;
pub mod resolver;
pub mod schema;
pub mod streams;
pub mod validation;
pub mod visitor;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use compiler::LEGACY_REQUIRED_STREAM_TYPES;
pub use compiler::compile_declarations;
pub use compiler::compile_sections;
pub use compiler::infer_required;
pub use defaults::default_for;
pub use definition::FieldDefinition;
pub use definition::FieldMap;
pub use definition::FieldShape;
pub use definition::GroupSchema;
pub use document::Configuration;
pub use document::FieldDeclaration;
pub use document::SchemaDocument;
pub use document::SectionSchema;
pub use document::StreamData;
pub use document::configuration_from_value;
pub use error::SchemaError;
pub use error::SchemaResult;
pub use field_type::FieldType;
pub use resolver::complete_fields;
pub use resolver::resolve_value;
pub use schema::ConfigurationSchema;
pub use streams::resolve_streams;
pub use validation::any_missing;
pub use validation::any_missing_in_section;
pub use validation::is_missing;
pub use validation::missing_fields;
pub use visitor::CollectingVisitor;
pub use visitor::FieldPath;
pub use visitor::FieldVisit;
pub use visitor::FieldVisitor;
pub use visitor::NoopVisitor;
pub use visitor::PathSegment;
