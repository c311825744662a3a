// crates/block-schema-cli/src/main.rs
// ============================================================================
// Module: Block Schema CLI Entry Point
// Description: Command dispatcher for offline schema completion and checks.
// Purpose: Run the block-schema engine over JSON files with bounded reads.
// Dependencies: block-schema, clap, serde, serde_json, thiserror, tracing,
//              tracing-subscriber
// ============================================================================

//! ## Overview
//! `block-schema` loads a schema document and a configuration payload from
//! JSON files and prints the result of one engine operation as pretty JSON.
//! Inputs are untrusted: every file read is bounded by the configured size
//! limit and malformed JSON fails the command. Diagnostics go to stderr
//! through `tracing`.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use block_schema::ConfigurationSchema;
use block_schema::StreamData;
use block_schema::configuration_from_value;
use block_schema_cli::CliSettings;
use block_schema_cli::SettingsSource;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable holding a tracing filter directive.
const LOG_ENV_VAR: &str = "BLOCK_SCHEMA_LOG";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "block-schema", version, disable_help_subcommand = true)]
struct Cli {
    /// Settings file (overrides `BLOCK_SCHEMA_SETTINGS`).
    #[arg(long, value_name = "PATH", global = true)]
    settings: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the configuration with every declared field resolved.
    Complete(InputArgs),
    /// Print the declared fields with stream references resolved.
    ResolveStreams(ResolveStreamsCommand),
    /// Report fields with missing required values.
    Check(CheckCommand),
    /// Print the compiled field definitions.
    Fields(FieldsCommand),
    /// Print the resolved value of one field.
    Get(GetCommand),
}

/// Schema and configuration inputs shared by most commands.
#[derive(Args, Debug)]
struct InputArgs {
    /// Schema document (JSON array of sections).
    #[arg(long, value_name = "PATH")]
    schema: PathBuf,
    /// Configuration payload (JSON object).
    #[arg(long, value_name = "PATH")]
    configuration: PathBuf,
}

/// Arguments for `resolve-streams`.
#[derive(Args, Debug)]
struct ResolveStreamsCommand {
    /// Schema and configuration inputs.
    #[command(flatten)]
    input: InputArgs,
    /// Stream data (JSON object keyed by stream id).
    #[arg(long, value_name = "PATH")]
    streams: PathBuf,
    /// Custom stream data overriding resolved fields.
    #[arg(long, value_name = "PATH")]
    custom: Option<PathBuf>,
}

/// Arguments for `check`.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Schema and configuration inputs.
    #[command(flatten)]
    input: InputArgs,
    /// Restrict the check to one section.
    #[arg(long, value_name = "NAME")]
    section: Option<String>,
    /// Ignore stream fields.
    #[arg(long)]
    skip_streams: bool,
}

/// Arguments for `fields`.
#[derive(Args, Debug)]
struct FieldsCommand {
    /// Schema document (JSON array of sections).
    #[arg(long, value_name = "PATH")]
    schema: PathBuf,
}

/// Arguments for `get`.
#[derive(Args, Debug)]
struct GetCommand {
    /// Schema and configuration inputs.
    #[command(flatten)]
    input: InputArgs,
    /// Field id to resolve.
    #[arg(long, value_name = "ID")]
    field: String,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a user-facing message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let (settings, source) = CliSettings::load(cli.settings.as_deref())
        .map_err(|err| CliError::new(err.to_string()))?;
    init_tracing(&settings.logging.level)?;
    match source {
        SettingsSource::File(path) => debug!(path = %path.display(), "settings loaded"),
        SettingsSource::Defaults => debug!("no settings file; using defaults"),
    }
    let limit = settings.limits.max_input_bytes;

    match cli.command {
        Commands::Complete(input) => {
            let schema = load_schema(&input, limit)?;
            write_json(&schema.complete_values())?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::ResolveStreams(command) => command_resolve_streams(&command, limit),
        Commands::Check(command) => command_check(&command, limit, settings.validation.skip_streams),
        Commands::Fields(command) => {
            let schema_document = read_json(&command.schema, "schema", limit)?;
            let schema = ConfigurationSchema::from_json(schema_document, Value::Null)
                .map_err(|err| CliError::new(err.to_string()))?;
            write_json(schema.fields())?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Get(command) => {
            let schema = load_schema(&command.input, limit)?;
            write_json(&schema.get(&command.field))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Installs the stderr log subscriber.
///
/// `BLOCK_SCHEMA_LOG` wins over the settings file directive.
fn init_tracing(level: &str) -> CliResult<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|err| CliError::new(format!("invalid log filter: {err}")))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| CliError::new(format!("failed to install log subscriber: {err}")))
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes the `resolve-streams` command.
fn command_resolve_streams(command: &ResolveStreamsCommand, limit: usize) -> CliResult<ExitCode> {
    let schema = load_schema(&command.input, limit)?;
    let stream_data: StreamData =
        configuration_from_value(read_json(&command.streams, "stream data", limit)?);
    let custom = match &command.custom {
        Some(path) => read_json(path, "custom stream data", limit)?,
        None => Value::Null,
    };
    write_json(&schema.configuration_with_resolved_streams(&stream_data, &custom))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `check` command; exits with failure when anything is missing.
fn command_check(
    command: &CheckCommand,
    limit: usize,
    default_skip_streams: bool,
) -> CliResult<ExitCode> {
    let schema = load_schema(&command.input, limit)?;
    let skip_streams = command.skip_streams || default_skip_streams;
    let report = check_report(&schema, command.section.as_deref(), skip_streams);
    write_json(&report)?;
    Ok(if report.missing { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

/// Result of a required-value check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct CheckReport {
    /// True when any checked field has a missing required value.
    missing: bool,
    /// Ids of the checked fields with missing required values.
    fields: Vec<String>,
}

/// Builds the check report for the whole schema or one section.
fn check_report(
    schema: &ConfigurationSchema,
    section: Option<&str>,
    skip_streams: bool,
) -> CheckReport {
    let in_scope = |field: &str| {
        section.is_none_or(|section| {
            schema.get_field(field).is_ok_and(|definition| definition.section_name() == section)
        })
    };
    let fields: Vec<String> = schema
        .fields_with_missing_required_values(skip_streams)
        .into_iter()
        .filter(|&field| in_scope(field))
        .map(str::to_string)
        .collect();
    let missing = match section {
        Some(section) => schema.has_missing_required_field_values_in_section(section, skip_streams),
        None => schema.has_missing_required_field_values(skip_streams),
    };
    CheckReport {
        missing,
        fields,
    }
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Loads the schema document and configuration named by `input`.
fn load_schema(input: &InputArgs, limit: usize) -> CliResult<ConfigurationSchema> {
    let schema = read_json(&input.schema, "schema", limit)?;
    let configuration = read_json(&input.configuration, "configuration", limit)?;
    debug!(schema = %input.schema.display(), "compiling schema");
    ConfigurationSchema::from_json(schema, configuration).map_err(|err| {
        CliError::new(format!("failed to load schema {}: {err}", input.schema.display()))
    })
}

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let size = file.metadata().map_err(ReadLimitError::Io)?.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1)).read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        return Err(ReadLimitError::TooLarge {
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Reads and parses a bounded JSON input file.
fn read_json(path: &Path, kind: &str, max_bytes: usize) -> CliResult<Value> {
    let bytes = read_bytes_with_limit(path, max_bytes).map_err(|err| match err {
        ReadLimitError::Io(err) => {
            CliError::new(format!("failed to read {kind} {}: {err}", path.display()))
        }
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(format!(
            "{kind} {} is {size} bytes, exceeding the {limit} byte limit",
            path.display()
        )),
    })?;
    serde_json::from_slice(&bytes).map_err(|err| {
        CliError::new(format!("failed to parse {kind} {}: {err}", path.display()))
    })
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a value to stdout as pretty JSON.
fn write_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(format!("failed to serialize output: {err}")))?;
    write_stdout_line(&text).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
