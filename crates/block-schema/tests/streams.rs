// crates/block-schema/tests/streams.rs
// ============================================================================
// Module: Stream Resolver Tests
// Description: Stream payload substitution and custom override handling.
// Purpose: Ensure stream references resolve at every depth with correct precedence.
// ============================================================================
//! ## Overview
//! Integration tests for [`block_schema::ConfigurationSchema::configuration_with_resolved_streams`].

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

#[path = "support/fixtures.rs"]
mod fixtures;
mod support;

use block_schema::ConfigurationSchema;
use block_schema::StreamData;
use serde_json::Value;
use serde_json::json;
use support::TestResult;
use support::ensure;
use support::ensure_eq;

/// Two stream fields and a defaulted string in one section.
fn flat_schema(configuration: Value) -> Result<ConfigurationSchema, block_schema::SchemaError> {
    ConfigurationSchema::from_json(
        json!([{ "name": "Main", "fields": [
            { "field": "products", "type": "stream", "streamType": "product-list" },
            { "field": "teaser", "type": "dataSource", "streamType": "content" },
            { "field": "headline", "type": "string", "default": "Hi" }
        ]}]),
        configuration,
    )
}

/// Builds stream data from id/payload pairs.
fn stream_data(entries: &[(&str, Value)]) -> StreamData {
    entries.iter().map(|(key, value)| ((*key).to_string(), value.clone())).collect()
}

#[test]
fn test_stream_fields_resolve_to_payloads() -> TestResult {
    let schema = flat_schema(json!({ "products": "p-1", "teaser": "c-1", "extra": 1 }))?;
    let data = stream_data(&[("p-1", json!({ "items": [1, 2] })), ("c-1", json!("content"))]);
    let resolved = schema.configuration_with_resolved_streams(&data, &json!({}));
    ensure_eq(
        &Value::Object(resolved),
        &json!({ "products": { "items": [1, 2] }, "teaser": "content", "headline": "Hi" }),
        "resolved fields",
    )
}

#[test]
fn test_unknown_stream_ids_resolve_to_null() -> TestResult {
    let schema = flat_schema(json!({ "products": "missing" }))?;
    let resolved = schema.configuration_with_resolved_streams(&StreamData::new(), &json!({}));
    ensure_eq(&resolved.get("products"), &Some(&Value::Null), "unknown id")?;
    ensure_eq(&resolved.get("teaser"), &Some(&Value::Null), "unset stream")
}

#[test]
fn test_numeric_stream_references_use_integer_keys() -> TestResult {
    let data = stream_data(&[("1", json!("one")), ("0", json!("zero")), ("2.5", json!("half"))]);
    let integral = flat_schema(json!({ "products": 1.0, "teaser": -0.0 }))?;
    let resolved = integral.configuration_with_resolved_streams(&data, &json!({}));
    ensure_eq(&resolved.get("products"), &Some(&json!("one")), "integral float")?;
    ensure_eq(&resolved.get("teaser"), &Some(&json!("zero")), "negative zero")?;
    let fractional = flat_schema(json!({ "products": 2.5, "teaser": 1 }))?;
    let resolved = fractional.configuration_with_resolved_streams(&data, &json!({}));
    ensure_eq(&resolved.get("products"), &Some(&json!("half")), "fractional float")?;
    ensure_eq(&resolved.get("teaser"), &Some(&json!("one")), "integer")
}

#[test]
fn test_custom_stream_data_takes_precedence() -> TestResult {
    let schema = flat_schema(json!({ "products": "p-1", "headline": "stored" }))?;
    let data = stream_data(&[("p-1", json!("from streams"))]);
    let custom = json!({ "products": "override", "headline": "custom headline", "teaser": null });
    let resolved = schema.configuration_with_resolved_streams(&data, &custom);
    ensure_eq(&resolved["products"], &json!("override"), "stream override")?;
    ensure_eq(&resolved["headline"], &json!("custom headline"), "scalar override")?;
    ensure_eq(&resolved["teaser"], &Value::Null, "explicit null override")
}

#[test]
fn test_non_object_custom_stream_data_is_ignored() -> TestResult {
    let schema = flat_schema(json!({ "products": "p-1" }))?;
    let data = stream_data(&[("p-1", json!("payload"))]);
    for custom in [json!(["products"]), json!("products"), json!(7), Value::Null] {
        let resolved = schema.configuration_with_resolved_streams(&data, &custom);
        ensure_eq(&resolved["products"], &json!("payload"), "normalized overrides")?;
    }
    Ok(())
}

#[test]
fn test_nested_group_streams_resolve() -> TestResult {
    let schema = ConfigurationSchema::from_json(
        fixtures::nested_groups_schema(),
        fixtures::nested_groups_configuration(),
    )?;
    let resolved =
        schema.configuration_with_resolved_streams(&fixtures::nested_stream_data(), &json!({}));
    ensure_eq(&resolved["stream"]["id"], &json!("s-top"), "top stream")?;
    ensure_eq(&resolved["outer"][0]["outerStream"]["id"], &json!("s-outer-0"), "outer 0")?;
    ensure_eq(&resolved["outer"][1]["outerStream"]["id"], &json!("s-outer-1"), "outer 1")?;
    ensure_eq(&resolved["outer"][0]["inner"][0]["innerStream"]["id"], &json!("s-inner-0"), "inner")?;
    ensure_eq(&resolved["outer"][1]["title"], &json!("second"), "plain sub-field")
}

#[test]
fn test_group_overrides_align_by_index() -> TestResult {
    let schema = ConfigurationSchema::from_json(
        fixtures::nested_groups_schema(),
        fixtures::nested_groups_configuration(),
    )?;
    let custom = json!({
        "outer": [
            { "outerStream": { "id": "custom-0" } }
        ]
    });
    let resolved = schema.configuration_with_resolved_streams(&fixtures::nested_stream_data(), &custom);
    ensure_eq(&resolved["outer"][0]["outerStream"], &json!({ "id": "custom-0" }), "index 0")?;
    ensure_eq(&resolved["outer"][1]["outerStream"]["id"], &json!("s-outer-1"), "index 1 untouched")?;
    ensure_eq(&resolved["outer"][0]["inner"][0]["innerStream"]["id"], &json!("s-inner-0"), "nested")
}

#[test]
fn test_group_override_that_is_not_a_list_is_ignored() -> TestResult {
    let schema = ConfigurationSchema::from_json(
        fixtures::nested_groups_schema(),
        fixtures::nested_groups_configuration(),
    )?;
    let custom = json!({ "outer": { "outerStream": "ignored" } });
    let resolved = schema.configuration_with_resolved_streams(&fixtures::nested_stream_data(), &custom);
    let entries = resolved["outer"].as_array().ok_or("expected entries")?;
    ensure_eq(&entries.len(), &2, "entries kept")?;
    ensure_eq(&entries[0]["outerStream"]["id"], &json!("s-outer-0"), "stream data used")
}

#[test]
fn test_padded_group_entries_resolve_streams_to_null() -> TestResult {
    let schema = ConfigurationSchema::from_json(fixtures::nested_groups_schema(), json!({}))?;
    let resolved =
        schema.configuration_with_resolved_streams(&fixtures::nested_stream_data(), &json!({}));
    ensure_eq(
        &resolved["outer"],
        &json!([ { "title": "", "outerStream": null, "inner": [ { "innerStream": null } ] } ]),
        "padded entry",
    )
}

#[test]
fn test_resolved_streams_contain_only_declared_fields() -> TestResult {
    let schema = flat_schema(json!({ "legacy": "keep me out" }))?;
    let resolved = schema.configuration_with_resolved_streams(&StreamData::new(), &json!({}));
    ensure(!resolved.contains_key("legacy"), "Expected undeclared keys to be left out")
}
