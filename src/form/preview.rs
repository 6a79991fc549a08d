//! Read-only debug dump of a submitted record

use super::submit::OutputRecord;

/// Pretty-printed JSON (two-space indent) for human inspection
pub fn preview(record: &OutputRecord) -> String {
    serde_json::to_string_pretty(record).unwrap_or_else(|_| "{}".to_string())
}
