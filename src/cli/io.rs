//! JSON-lines I/O for the CLI
//!
//! - Input: one JSON object per line
//! - Output: one JSON object per line, `{"status":"ok","data":...}` or
//!   `{"status":"error","code":...,"message":...}`
//! - UTF-8 only
//!
//! Readers and writers are generic so sessions can run over any stream.

use std::io::{BufRead, Write};

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Reads JSON requests line by line. Blank lines are skipped.
///
/// A read failure yields an I/O error; a malformed line yields an
/// invalid-command error and reading continues.
pub fn read_requests<R: BufRead>(input: R) -> impl Iterator<Item = CliResult<Value>> {
    input.lines().filter_map(|line| {
        let line = match line {
            Ok(line) => line,
            Err(e) => return Some(Err(CliError::from(e))),
        };
        if line.trim().is_empty() {
            return None;
        }
        Some(
            serde_json::from_str(&line)
                .map_err(|e| CliError::invalid_command(format!("malformed request: {}", e))),
        )
    })
}

/// Write a success response
pub fn write_response<W: Write>(out: &mut W, data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    serde_json::to_writer(&mut *out, &response)?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}

/// Write an error response
pub fn write_error<W: Write>(out: &mut W, code: &str, message: &str) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    });

    serde_json::to_writer(&mut *out, &response)?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}
