//! CLI command implementations
//!
//! The host is a thin client: every command is translated into a call on a
//! `FormSession` and the result is written back as one JSON line. The
//! session owns all state; nothing here caches derived views.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::FormConfig;
use crate::form::{FieldValue, FieldValues};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{FieldId, FormSchema, SchemaAction};
use crate::session::FormSession;

use super::args::Command;
use super::errors::{CliError, CliErrorCode, CliResult};
use super::io::{read_requests, write_error, write_response};

/// Ops routed to the schema store
const BUILDER_OPS: [&str; 6] = [
    "add_section",
    "update_section",
    "delete_section",
    "add_field",
    "update_field",
    "delete_field",
];

/// Ops that read or fill the live form
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SessionOp {
    SetValue { field_id: FieldId, value: Value },
    ClearValue { field_id: FieldId },
    View,
    Schema,
    Submit,
    Preview,
}

/// One parsed session command
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    Build(SchemaAction),
    Session(SessionOp),
}

impl HostCommand {
    /// Parses a request object keyed by its `op` string
    pub fn parse(request: Value) -> CliResult<Self> {
        let is_builder = match request.get("op").and_then(Value::as_str) {
            Some(op) => BUILDER_OPS.contains(&op),
            None => return Err(CliError::invalid_command("request has no 'op' string")),
        };

        let parsed = if is_builder {
            serde_json::from_value(request).map(HostCommand::Build)
        } else {
            serde_json::from_value(request).map(HostCommand::Session)
        };
        parsed.map_err(|e| CliError::invalid_command(e.to_string()))
    }
}

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Session { config, schema } => session(config.as_deref(), schema.as_deref()),
        Command::Submit {
            schema,
            values,
            config,
        } => submit(&schema, &values, config.as_deref()),
    }
}

/// Interactive session over stdin/stdout
pub fn session(config_path: Option<&Path>, schema_path: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let schema = match schema_path {
        Some(path) => load_schema(path)?,
        None => FormSchema::new(),
    };

    let mut session = FormSession::with_schema(schema, config);
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(&mut session, stdin.lock(), &mut stdout.lock())
}

/// One-shot submission; prints the preview of the accepted record
pub fn submit(schema_path: &Path, values_path: &Path, config_path: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let preview = submit_values(schema_path, values_path, config)?;

    let mut stdout = io::stdout();
    writeln!(stdout, "{}", preview)?;
    stdout.flush()?;

    Ok(())
}

/// Loads both files, submits, and returns the preview text
pub fn submit_values(
    schema_path: &Path,
    values_path: &Path,
    config: FormConfig,
) -> CliResult<String> {
    let schema = load_schema(schema_path)?;
    let values = load_values(values_path, &schema, &config)?;

    let mut session = FormSession::with_schema(schema, config);
    for (id, value) in values.iter() {
        session.set_value(id.clone(), value.clone());
    }
    session.submit()?;

    Ok(session.preview())
}

/// Loads configuration (defaults when no path) and applies its log level
pub fn load_config(path: Option<&Path>) -> CliResult<FormConfig> {
    let config = match path {
        Some(path) => FormConfig::load(path)?,
        None => FormConfig::default(),
    };
    config.install_logging()?;

    let source = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    log_event_with_fields(Event::ConfigLoaded, &[("source", source.as_str())]);

    Ok(config)
}

/// Loads a schema snapshot and checks its structure
pub fn load_schema(path: &Path) -> CliResult<FormSchema> {
    let content = read_file(path)?;
    let schema: FormSchema = serde_json::from_str(&content)
        .map_err(|e| CliError::schema_error(format!("invalid schema JSON: {}", e)))?;
    schema.validate_structure().map_err(CliError::schema_error)?;

    let sections = schema.sections.len().to_string();
    let fields = schema.field_count().to_string();
    log_event_with_fields(
        Event::SchemaLoaded,
        &[("fields", fields.as_str()), ("sections", sections.as_str())],
    );

    Ok(schema)
}

/// Loads a values file typed by `schema`
pub fn load_values(
    path: &Path,
    schema: &FormSchema,
    config: &FormConfig,
) -> CliResult<FieldValues> {
    let content = read_file(path)?;
    let raw: Value = serde_json::from_str(&content).map_err(|e| {
        CliError::new(
            CliErrorCode::InvalidValue,
            format!("invalid values JSON: {}", e),
        )
    })?;

    Ok(FieldValues::from_json(schema, &raw, config.default_calling_code())?)
}

fn read_file(path: &Path) -> CliResult<String> {
    fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("failed to read '{}': {}", path.display(), e)))
}

/// Serves JSON-line commands until `input` is exhausted.
///
/// Per-command failures are answered with an error line and the loop
/// continues. Read failures and write failures end the session.
pub fn run_session<R: BufRead, W: Write>(
    session: &mut FormSession,
    input: R,
    output: &mut W,
) -> CliResult<()> {
    log_event_with_fields(Event::SessionStarted, &[]);
    let mut handled = 0usize;

    for request in read_requests(input) {
        let result = match request {
            Ok(request) => HostCommand::parse(request).and_then(|cmd| execute(session, cmd)),
            Err(e) if e.code() == &CliErrorCode::IoError => {
                write_error(output, e.code_str(), e.message())?;
                return Err(e);
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(data) => write_response(output, data)?,
            Err(e) => write_error(output, e.code_str(), e.message())?,
        }
        handled += 1;
    }

    let handled = handled.to_string();
    log_event_with_fields(Event::SessionEnded, &[("commands", handled.as_str())]);
    Ok(())
}

/// Executes one command against the session and returns the response data
pub fn execute(session: &mut FormSession, cmd: HostCommand) -> CliResult<Value> {
    match cmd {
        HostCommand::Build(action) => {
            let changed = session.dispatch(&action);
            let action = serde_json::to_value(&action)?;
            Ok(json!({ "changed": changed, "action": action }))
        }
        HostCommand::Session(SessionOp::SetValue { field_id, value }) => {
            let kind = session
                .schema()
                .find_field(&field_id)
                .map(|field| field.kind)
                .ok_or_else(|| {
                    CliError::new(
                        CliErrorCode::UnknownField,
                        format!("no field '{}' in schema", field_id),
                    )
                })?;
            let code = session.config().default_calling_code();

            match FieldValue::from_json(&field_id, kind, &value, code)? {
                Some(parsed) => {
                    let stored = parsed.to_json();
                    session.set_value(field_id.clone(), parsed);
                    Ok(json!({ "field_id": field_id.as_str(), "value": stored }))
                }
                None => {
                    session.clear_value(&field_id);
                    Ok(json!({ "field_id": field_id.as_str(), "value": Value::Null }))
                }
            }
        }
        HostCommand::Session(SessionOp::ClearValue { field_id }) => {
            session.clear_value(&field_id);
            Ok(json!({ "field_id": field_id.as_str(), "value": Value::Null }))
        }
        HostCommand::Session(SessionOp::View) => Ok(serde_json::to_value(session.view())?),
        HostCommand::Session(SessionOp::Schema) => Ok(serde_json::to_value(session.schema())?),
        HostCommand::Session(SessionOp::Submit) => match session.submit() {
            Ok(record) => Ok(json!({ "accepted": true, "record": record.to_json() })),
            Err(rejected) => {
                let errors = serde_json::to_value(&rejected.errors)?;
                Ok(json!({ "accepted": false, "errors": errors }))
            }
        },
        HostCommand::Session(SessionOp::Preview) => Ok(json!({ "preview": session.preview() })),
    }
}
