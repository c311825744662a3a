// crates/block-schema/tests/validation.rs
// ============================================================================
// Module: Required Field Validator Tests
// Description: Type-aware missing-value rules, group recursion, and section scoping.
// Purpose: Ensure required checks match what editors treat as "filled in".
// ============================================================================
//! ## Overview
//! Integration tests for the required-value checks on
//! [`block_schema::ConfigurationSchema`].

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

use block_schema::ConfigurationSchema;
use block_schema::SchemaError;
use serde_json::Value;
use serde_json::json;
use support::TestResult;
use support::ensure;
use support::ensure_eq;

/// Builds a single-section schema around one field declaration.
fn single(declaration: Value, configuration: Value) -> Result<ConfigurationSchema, SchemaError> {
    ConfigurationSchema::from_json(json!([{ "name": "Main", "fields": [declaration] }]), configuration)
}

/// Returns whether the only field of a single-field schema is missing.
fn missing(declaration: Value, configuration: Value) -> Result<bool, SchemaError> {
    let field = declaration["field"].as_str().unwrap_or_default().to_string();
    single(declaration, configuration)?.has_missing_required_value_in_field(&field, false)
}

#[test]
fn test_required_text_rules() -> TestResult {
    let declaration = json!({ "field": "title", "type": "string", "required": true });
    ensure(missing(declaration.clone(), json!({}))?, "Expected absent string to be missing")?;
    ensure(missing(declaration.clone(), json!({ "title": "" }))?, "Expected empty string")?;
    ensure(missing(declaration.clone(), json!({ "title": null }))?, "Expected null")?;
    ensure(!missing(declaration, json!({ "title": "set" }))?, "Expected value to satisfy")
}

#[test]
fn test_defaults_count_as_values() -> TestResult {
    ensure(
        !missing(json!({ "field": "title", "type": "string", "required": true, "default": "x" }), json!({}))?,
        "Expected a non-empty default to satisfy the check",
    )?;
    ensure(
        !missing(json!({ "field": "count", "type": "number", "required": true }), json!({}))?,
        "Expected the numeric default 0 to satisfy the check",
    )?;
    ensure(
        !missing(json!({ "field": "flag", "type": "boolean", "required": true }), json!({}))?,
        "Expected false to satisfy the check",
    )
}

#[test]
fn test_optional_fields_are_never_missing() -> TestResult {
    ensure(
        !missing(json!({ "field": "title", "type": "string" }), json!({ "title": "" }))?,
        "Expected optional field to pass",
    )?;
    ensure(
        !missing(json!({ "field": "link", "type": "reference" }), json!({}))?,
        "Expected optional reference to pass",
    )
}

#[test]
fn test_reference_rules() -> TestResult {
    let declaration = json!({ "field": "link", "type": "reference", "required": true });
    ensure(missing(declaration.clone(), json!({}))?, "Expected null reference to be missing")?;
    ensure(missing(declaration.clone(), json!({ "link": "https://x" }))?, "Expected string")?;
    ensure(missing(declaration.clone(), json!({ "link": { "type": "page" } }))?, "Expected no target")?;
    ensure(
        missing(declaration.clone(), json!({ "link": { "type": "", "target": "p-1" } }))?,
        "Expected empty type",
    )?;
    ensure(
        !missing(declaration, json!({ "link": { "type": "page", "target": "p-1" } }))?,
        "Expected complete reference to pass",
    )
}

#[test]
fn test_stream_rules() -> TestResult {
    let declaration = json!({ "field": "products", "type": "stream", "required": true });
    ensure(missing(declaration.clone(), json!({}))?, "Expected unset stream to be missing")?;
    ensure(
        missing(declaration.clone(), json!({ "products": { "value": null } }))?,
        "Expected falsy property to be missing",
    )?;
    ensure(
        !missing(declaration.clone(), json!({ "products": { "value": "s-1" } }))?,
        "Expected populated object to pass",
    )?;
    ensure(!missing(declaration, json!({ "products": "s-1" }))?, "Expected stream id to pass")
}

#[test]
fn test_skip_streams_ignores_stream_fields() -> TestResult {
    let schema = single(json!({ "field": "teaser", "type": "dataSource", "required": true }), json!({}))?;
    ensure(schema.has_missing_required_value_in_field("teaser", false)?, "Expected missing")?;
    ensure(!schema.has_missing_required_value_in_field("teaser", true)?, "Expected skipped")?;
    ensure(!schema.has_missing_required_field_values(true), "Expected skipped at schema level")
}

#[test]
fn test_media_rules() -> TestResult {
    let declaration = json!({ "field": "image", "type": "media", "required": true });
    ensure(missing(declaration.clone(), json!({}))?, "Expected unset media to be missing")?;
    ensure(
        missing(declaration.clone(), json!({ "image": { "media": null, "cropRatio": 1 } }))?,
        "Expected null media to be missing",
    )?;
    ensure(
        !missing(declaration, json!({ "image": { "media": { "id": "m-1" }, "cropRatio": 1 } }))?,
        "Expected selected media to pass",
    )
}

#[test]
fn test_translatable_text_rules() -> TestResult {
    let declaration =
        json!({ "field": "title", "type": "string", "required": true, "translatable": true });
    ensure(missing(declaration.clone(), json!({ "title": {} }))?, "Expected no translations")?;
    ensure(
        missing(declaration.clone(), json!({ "title": { "en": "hi", "fr": "" } }))?,
        "Expected an empty translation to be missing",
    )?;
    ensure(
        !missing(declaration.clone(), json!({ "title": { "en": "hi", "fr": "salut" } }))?,
        "Expected full translations to pass",
    )?;
    ensure(missing(declaration, json!({}))?, "Expected unset translatable field to be missing")
}

#[test]
fn test_untranslatable_text_ignores_translation_shape() -> TestResult {
    let declaration =
        json!({ "field": "body", "type": "markdown", "required": true, "translatable": false });
    ensure(
        !missing(declaration, json!({ "body": { "en": "" } }))?,
        "Expected objects to satisfy untranslatable text",
    )
}

#[test]
fn test_group_missing_when_any_entry_misses_required_sub_field() -> TestResult {
    let declaration = json!({
        "field": "items",
        "type": "group",
        "min": 2,
        "fields": [ { "field": "label", "type": "string", "required": true } ]
    });
    ensure(
        missing(declaration.clone(), json!({ "items": [ { "label": "a" } ] }))?,
        "Expected the padded entry to be missing its label",
    )?;
    ensure(
        !missing(declaration, json!({ "items": [ { "label": "a" }, { "label": "b" } ] }))?,
        "Expected complete entries to pass",
    )
}

#[test]
fn test_group_required_flag_does_not_matter() -> TestResult {
    let declaration = json!({
        "field": "items",
        "type": "group",
        "required": true,
        "min": 0,
        "fields": [ { "field": "label", "type": "string" } ]
    });
    ensure(!missing(declaration, json!({}))?, "Expected an empty group to pass")
}

#[test]
fn test_group_recursion_honors_skip_streams() -> TestResult {
    let schema = single(
        json!({
            "field": "rows",
            "type": "group",
            "fields": [ { "field": "source", "type": "stream", "required": true } ]
        }),
        json!({ "rows": [ {} ] }),
    )?;
    ensure(schema.has_missing_required_value_in_field("rows", false)?, "Expected nested stream")?;
    ensure(!schema.has_missing_required_value_in_field("rows", true)?, "Expected nested skip")
}

#[test]
fn test_disabled_required_fields_are_still_checked() -> TestResult {
    ensure(
        missing(json!({ "field": "title", "type": "string", "required": true, "disabled": true }), json!({}))?,
        "Expected disabled fields to be validated",
    )
}

#[test]
fn test_section_scoped_checks() -> TestResult {
    let schema = ConfigurationSchema::from_json(
        json!([
            { "name": "A", "fields": [ { "field": "first", "type": "string", "required": true } ] },
            { "name": "B", "fields": [ { "field": "second", "type": "string", "required": true } ] }
        ]),
        json!({ "first": "filled" }),
    )?;
    ensure(!schema.has_missing_required_field_values_in_section("A", false), "Expected A complete")?;
    ensure(schema.has_missing_required_field_values_in_section("B", false), "Expected B missing")?;
    ensure(
        !schema.has_missing_required_field_values_in_section("Unknown", false),
        "Expected unknown section to report nothing",
    )?;
    ensure(schema.has_missing_required_field_values(false), "Expected schema-level missing")?;
    ensure_eq(&schema.fields_with_missing_required_values(false), &vec!["second"], "missing list")
}

#[test]
fn test_unknown_field_check_fails() -> TestResult {
    let schema = single(json!({ "field": "title", "type": "string" }), json!({}))?;
    ensure_eq(
        &schema.has_missing_required_value_in_field("nope", false),
        &Err(SchemaError::UnknownField {
            field: "nope".to_string(),
        }),
        "unknown field",
    )
}
