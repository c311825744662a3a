// crates/block-schema/src/compiler.rs
// ============================================================================
// Module: Schema Compiler
// Description: Normalizes section and field declarations into a field map.
// Purpose: Apply defaults, required-flag inference, and group sub-schema compilation once.
// Dependencies: crate::{defaults, definition, document, field_type}, serde_json, tracing
// ============================================================================

//! ## Overview
//! Compilation walks sections in order and declarations within each section
//! in order. Declarations without an id are skipped. On id collisions the
//! last declaration wins. Group declarations compile their nested
//! declarations into a sub-map tagged with an empty section name.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;
use tracing::debug;

use crate::defaults::default_for;
use crate::definition::FieldDefinition;
use crate::definition::FieldMap;
use crate::definition::FieldShape;
use crate::definition::GroupSchema;
use crate::document::FieldDeclaration;
use crate::document::SectionSchema;
use crate::field_type::FieldType;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Stream types that imply `required` on legacy `stream` fields.
pub const LEGACY_REQUIRED_STREAM_TYPES: [&str; 4] =
    ["product", "product-list", "content", "content-list"];
/// Group minimum entry count when undeclared.
pub const DEFAULT_GROUP_MIN: usize = 1;
/// Group maximum entry count when undeclared or zero.
pub const DEFAULT_GROUP_MAX: usize = 16;

// ============================================================================
// SECTION: Compilation
// ============================================================================

/// Compiles an ordered list of sections into one field map.
#[must_use]
pub fn compile_sections(sections: &[SectionSchema]) -> FieldMap {
    let mut fields = FieldMap::new();
    for section in sections {
        fields.extend(compile_declarations(&section.name, &section.fields));
    }
    fields
}

/// Compiles the declarations of one schema level.
#[must_use]
pub fn compile_declarations(section_name: &str, declarations: &[FieldDeclaration]) -> FieldMap {
    let mut fields = FieldMap::new();
    for declaration in declarations {
        match compile_field(section_name, declaration) {
            Some(definition) => fields.insert(definition),
            None => debug!(section = section_name, "skipping declaration without field id"),
        }
    }
    fields
}

/// Compiles one declaration; `None` for presentational declarations.
fn compile_field(section_name: &str, declaration: &FieldDeclaration) -> Option<FieldDefinition> {
    let field = declaration.field_id()?.to_string();
    let field_type = declaration.field_type.clone().unwrap_or_default();
    let default = default_for(&field_type, declaration.default.as_ref());
    let required = infer_required(
        declaration.required,
        &field_type,
        declaration.stream_type.as_deref(),
    );
    let shape = if field_type.is_group() {
        FieldShape::Group(compile_group(declaration))
    } else {
        FieldShape::Scalar
    };

    Some(FieldDefinition {
        field,
        field_type,
        section_name: section_name.to_string(),
        values: declaration.values.clone(),
        default,
        validate: declaration.validate.clone().unwrap_or_else(|| Value::Object(Map::new())),
        required,
        disabled: declaration.disabled == Some(true),
        translatable: declaration.translatable,
        stream_type: declaration.stream_type.clone(),
        shape,
    })
}

/// Compiles the nested schema and bounds of a group declaration.
fn compile_group(declaration: &FieldDeclaration) -> GroupSchema {
    let nested = declaration.fields.as_deref().unwrap_or_default();
    GroupSchema {
        fields: compile_declarations("", nested),
        min: declaration.min.map_or(DEFAULT_GROUP_MIN, saturating_count),
        max: declaration.max.filter(|max| *max != 0).map_or(DEFAULT_GROUP_MAX, saturating_count),
    }
}

/// Converts a declared count to `usize`, saturating on narrow targets.
fn saturating_count(count: u64) -> usize {
    usize::try_from(count).unwrap_or(usize::MAX)
}

// ============================================================================
// SECTION: Required Inference
// ============================================================================

/// Resolves the effective required flag of a field.
///
/// An explicit flag is used literally. Otherwise only `stream` fields (not the
/// newer `dataSource` alias) whose stream type is one of
/// [`LEGACY_REQUIRED_STREAM_TYPES`] are required.
#[must_use]
pub fn infer_required(
    required: Option<bool>,
    field_type: &FieldType,
    stream_type: Option<&str>,
) -> bool {
    if let Some(required) = required {
        return required;
    }
    matches!(field_type, FieldType::Stream)
        && stream_type.is_some_and(|kind| LEGACY_REQUIRED_STREAM_TYPES.contains(&kind))
}
