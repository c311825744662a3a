// crates/block-schema-cli/src/lib.rs
// ============================================================================
// Module: Block Schema CLI Library
// Description: Shared settings support for the block-schema command line tool.
// Purpose: Expose settings loading to the binary and to integration tests.
// Dependencies: crate::settings
// ============================================================================

//! ## Overview
//! The `block-schema` binary runs schema completion, stream resolution, and
//! required-value checks over JSON files. This library holds the parts that
//! are useful outside the binary, currently the settings file loader.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod settings;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use settings::CliSettings;
pub use settings::SettingsError;
pub use settings::SettingsSource;
