// crates/block-schema/tests/support/fixtures.rs
// ============================================================================
// Module: Schema Fixtures
// Description: Shared schema documents and configurations for integration tests.
// ============================================================================
//! ## Overview
//! Fixtures mirror the shapes real block schemas take: a plain string field,
//! a padded group, and nested groups carrying stream fields at every level.

#![allow(dead_code, reason = "Fixtures are selectively used across suites.")]

use serde_json::Value;
use serde_json::json;

/// Two sections: a defaulted string and a group with `min = 3`.
pub fn sample_schema() -> Value {
    json!([
        {
            "name": "First Section",
            "fields": [
                { "field": "aString", "type": "string", "default": "foobar" }
            ]
        },
        {
            "name": "Second Section",
            "fields": [
                {
                    "field": "aGroup",
                    "type": "group",
                    "min": 3,
                    "fields": [
                        { "field": "groupFirst", "type": "number", "default": 23 },
                        { "field": "groupSecond", "type": "string" }
                    ]
                }
            ]
        }
    ])
}

/// A configuration supplying one of the three `aGroup` entries.
pub fn sample_configuration() -> Value {
    json!({
        "aGroup": [
            { "groupSecond": "lalala" }
        ]
    })
}

/// A stream at the top level plus streams in a group nested in a group.
pub fn nested_groups_schema() -> Value {
    json!([
        {
            "name": "Content",
            "fields": [
                {
                    "field": "stream",
                    "type": "stream",
                    "streamType": "frontastic/product"
                },
                {
                    "field": "outer",
                    "type": "group",
                    "min": 1,
                    "fields": [
                        { "field": "title", "type": "string" },
                        { "field": "outerStream", "type": "dataSource", "streamType": "product" },
                        {
                            "field": "inner",
                            "type": "group",
                            "min": 1,
                            "fields": [
                                { "field": "innerStream", "type": "stream", "streamType": "content" }
                            ]
                        }
                    ]
                }
            ]
        }
    ])
}

/// Configuration wiring five stream references through the nested groups.
pub fn nested_groups_configuration() -> Value {
    json!({
        "stream": "s-top",
        "outer": [
            {
                "title": "first",
                "outerStream": "s-outer-0",
                "inner": [ { "innerStream": "s-inner-0" } ]
            },
            {
                "title": "second",
                "outerStream": "s-outer-1",
                "inner": [ { "innerStream": "s-inner-1" } ]
            }
        ]
    })
}

/// Stream payloads for every id in [`nested_groups_configuration`].
pub fn nested_stream_data() -> serde_json::Map<String, Value> {
    let mut data = serde_json::Map::new();
    for id in ["s-top", "s-outer-0", "s-outer-1", "s-inner-0", "s-inner-1"] {
        data.insert(id.to_string(), json!({ "id": id, "items": [] }));
    }
    data
}
