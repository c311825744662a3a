// crates/block-schema-cli/src/settings.rs
// ============================================================================
// Module: CLI Settings
// Description: `block-schema.toml` loading and validation.
// Purpose: Provide bounded, validated settings with fail-closed parsing.
// Dependencies: serde, thiserror, toml, tracing-subscriber
// ============================================================================

//! ## Overview
//! Settings are resolved from an explicit path, then the
//! `BLOCK_SCHEMA_SETTINGS` environment variable, then `block-schema.toml` in
//! the working directory. Only the implicit default may be absent, in which
//! case built-in defaults apply. Unknown keys are rejected and every value is
//! validated after parsing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs::File;
use std::io::ErrorKind;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default settings filename when no path is specified.
pub const DEFAULT_SETTINGS_NAME: &str = "block-schema.toml";
/// Environment variable used to override the settings path.
pub const SETTINGS_ENV_VAR: &str = "BLOCK_SCHEMA_SETTINGS";
/// Maximum settings file size in bytes.
pub const MAX_SETTINGS_FILE_SIZE: usize = 64 * 1024;
/// Default upper bound for JSON input files.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 1024 * 1024;
/// Largest accepted value for `limits.max_input_bytes`.
pub const MAX_INPUT_BYTES_CEILING: usize = 16 * 1024 * 1024;
/// Default tracing filter directive.
pub const DEFAULT_LOG_LEVEL: &str = "warn";
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Top-level CLI settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliSettings {
    /// Input size limits.
    #[serde(default)]
    pub limits: LimitsSettings,
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Defaults for the `check` command.
    #[serde(default)]
    pub validation: ValidationSettings,
}

/// Input size limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsSettings {
    /// Maximum size of any JSON input file in bytes.
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,
}

impl Default for LimitsSettings {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSettings {
    /// Tracing filter directive used when `BLOCK_SCHEMA_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Defaults for required-value checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationSettings {
    /// Ignore stream fields unless the command line says otherwise.
    #[serde(default)]
    pub skip_streams: bool,
}

/// Serde default for [`LimitsSettings::max_input_bytes`].
const fn default_max_input_bytes() -> usize {
    DEFAULT_MAX_INPUT_BYTES
}

/// Serde default for [`LoggingSettings::level`].
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

// ============================================================================
// SECTION: Location
// ============================================================================

/// Where settings are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsLocation {
    /// Resolved settings path.
    pub path: PathBuf,
    /// True when the path was requested explicitly and must exist.
    pub explicit: bool,
}

impl SettingsLocation {
    /// Resolves the settings path from an explicit path or an environment value.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] when the resolved path exceeds the
    /// path length limits.
    pub fn resolve(path: Option<&Path>, env_path: Option<&str>) -> Result<Self, SettingsError> {
        let location = match (path, env_path) {
            (Some(path), _) => Self {
                path: path.to_path_buf(),
                explicit: true,
            },
            (None, Some(env_path)) => Self {
                path: PathBuf::from(env_path),
                explicit: true,
            },
            (None, None) => Self {
                path: PathBuf::from(DEFAULT_SETTINGS_NAME),
                explicit: false,
            },
        };
        validate_path(&location.path)?;
        Ok(location)
    }
}

/// Where loaded settings came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsSource {
    /// Read from the settings file at this path.
    File(PathBuf),
    /// The implicit default file was absent; built-in defaults apply.
    Defaults,
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl CliSettings {
    /// Loads settings using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<(Self, SettingsSource), SettingsError> {
        let env_path = env::var(SETTINGS_ENV_VAR).ok();
        Self::load_from(&SettingsLocation::resolve(path, env_path.as_deref())?)
    }

    /// Loads settings from a resolved location, reporting where they came from.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when an explicit file is missing, unreadable,
    /// too large, malformed, or invalid.
    pub fn load_from(location: &SettingsLocation) -> Result<(Self, SettingsSource), SettingsError> {
        let file = match File::open(&location.path) {
            Ok(file) => file,
            Err(err) if !location.explicit && err.kind() == ErrorKind::NotFound => {
                return Ok((Self::default(), SettingsSource::Defaults));
            }
            Err(err) => return Err(SettingsError::Io(err.to_string())),
        };
        let limit = u64::try_from(MAX_SETTINGS_FILE_SIZE).unwrap_or(u64::MAX);
        let mut bytes = Vec::new();
        file.take(limit.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(|err| SettingsError::Io(err.to_string()))?;
        if bytes.len() > MAX_SETTINGS_FILE_SIZE {
            return Err(SettingsError::Invalid("settings file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| SettingsError::Invalid("settings file must be utf-8".to_string()))?;
        let settings = Self::from_toml_str(content)?;
        Ok((settings, SettingsSource::File(location.path.clone())))
    }

    /// Parses and validates settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] for malformed TOML or unknown keys and
    /// [`SettingsError::Invalid`] for out-of-range values.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            toml::from_str(content).map_err(|err| SettingsError::Parse(err.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validates the settings for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] when a value is out of range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.limits.validate()?;
        self.logging.validate()
    }
}

impl LimitsSettings {
    /// Validates the input size limit.
    fn validate(&self) -> Result<(), SettingsError> {
        if self.max_input_bytes == 0 {
            return Err(SettingsError::Invalid(
                "limits.max_input_bytes must be greater than zero".to_string(),
            ));
        }
        if self.max_input_bytes > MAX_INPUT_BYTES_CEILING {
            return Err(SettingsError::Invalid(format!(
                "limits.max_input_bytes must not exceed {MAX_INPUT_BYTES_CEILING}"
            )));
        }
        Ok(())
    }
}

impl LoggingSettings {
    /// Validates the filter directive.
    fn validate(&self) -> Result<(), SettingsError> {
        if self.level.trim().is_empty() {
            return Err(SettingsError::Invalid("logging.level must be non-empty".to_string()));
        }
        EnvFilter::try_new(&self.level).map_err(|err| {
            SettingsError::Invalid(format!("logging.level is not a valid filter: {err}"))
        })?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Settings loading or validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// I/O failure while reading settings.
    #[error("settings io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("settings parse error: {0}")]
    Parse(String),
    /// Invalid settings data.
    #[error("invalid settings: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), SettingsError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SettingsError::Invalid("settings path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SettingsError::Invalid("settings path component too long".to_string()));
        }
    }
    Ok(())
}
