//! CLI-specific error types
//!
//! Errors raised while loading inputs are fatal and end the process.
//! Errors raised by a single session command are reported on stdout and the
//! session continues.

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::form::{SubmissionRejected, ValueError};

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout, input files)
    IoError,
    /// Schema snapshot malformed or structurally invalid
    SchemaError,
    /// Value supplied for a field the schema does not contain
    UnknownField,
    /// Value does not fit the field kind
    InvalidValue,
    /// Command line not understood
    InvalidCommand,
    /// Submission blocked by validation
    SubmitRejected,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "FORM_CLI_CONFIG_ERROR",
            Self::IoError => "FORM_CLI_IO_ERROR",
            Self::SchemaError => "FORM_CLI_SCHEMA_ERROR",
            Self::UnknownField => "FORM_CLI_UNKNOWN_FIELD",
            Self::InvalidValue => "FORM_CLI_INVALID_VALUE",
            Self::InvalidCommand => "FORM_CLI_INVALID_COMMAND",
            Self::SubmitRejected => "FORM_CLI_SUBMIT_REJECTED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn schema_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::SchemaError, msg)
    }

    pub fn invalid_command(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidCommand, msg)
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<ValueError> for CliError {
    fn from(e: ValueError) -> Self {
        let code = match &e {
            ValueError::UnknownField(_) => CliErrorCode::UnknownField,
            _ => CliErrorCode::InvalidValue,
        };
        Self::new(code, e.to_string())
    }
}

impl From<SubmissionRejected> for CliError {
    fn from(e: SubmissionRejected) -> Self {
        let failing: Vec<String> = e
            .errors
            .iter()
            .map(|err| format!("{} ({})", err.label, err.field_id))
            .collect();
        Self::new(
            CliErrorCode::SubmitRejected,
            format!("{}: {}", e, failing.join(", ")),
        )
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
