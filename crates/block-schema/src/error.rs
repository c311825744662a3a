// crates/block-schema/src/error.rs
// ============================================================================
// Module: Schema Error Definitions
// Description: Failures surfaced for configuration schema misuse.
// Purpose: Keep the error taxonomy small: only misuse fails, data irregularities do not.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Missing values, stale group entries, and malformed override data are all
//! absorbed by the engine. The only failures are writes or definition lookups
//! against an id the schema does not declare, and schema documents that are
//! not a list of sections at all.

use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration schema errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The field id is not declared at this schema level.
    #[error("unknown field {field} in this configuration schema")]
    UnknownField {
        /// The requested field id.
        field: String,
    },
    /// The schema document could not be read as a list of sections.
    #[error("invalid schema document: {0}")]
    InvalidDocument(String),
}

impl SchemaError {
    /// Creates an unknown field error.
    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
        }
    }
}

// ============================================================================
// SECTION: Result Alias
// ============================================================================

/// Result alias for configuration schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
