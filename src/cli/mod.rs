//! CLI module for dynaform
//!
//! Provides a headless host for the form builder:
//! - session: JSON-lines builder/fill session over stdin/stdout
//! - submit: one-shot submission of a values file against a schema

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    execute, load_config, load_schema, load_values, run, run_command, run_session, session,
    submit, submit_values, HostCommand, SessionOp,
};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_requests, write_error, write_response};
