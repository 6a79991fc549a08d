//! All-or-nothing submission
//!
//! Submission validates every visible field. Only when none fails is an
//! output record assembled; it holds exactly the visible fields, in display
//! order, with `null` for visible fields left unset.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::schema::{FieldId, FormSchema};

use super::validation::{validate, FieldError};
use super::value::FieldValues;
use super::visibility::visible_fields;

/// Submission refused; every failing field is listed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("submission blocked: {} field(s) failed validation", errors.len())]
pub struct SubmissionRejected {
    pub errors: Vec<FieldError>,
}

impl SubmissionRejected {
    pub fn failing_fields(&self) -> impl Iterator<Item = &FieldId> {
        self.errors.iter().map(|e| &e.field_id)
    }
}

/// Flat field id -> value record emitted on successful submission
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputRecord {
    entries: Vec<(FieldId, Value)>,
}

impl OutputRecord {
    pub fn get(&self, id: &FieldId) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, v)| v)
    }

    pub fn contains(&self, id: &FieldId) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &FieldId> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }
}

impl Serialize for OutputRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, value) in &self.entries {
            map.serialize_entry(id, value)?;
        }
        map.end()
    }
}

/// Validates and, if every visible field passes, assembles the record.
pub fn submit(
    schema: &FormSchema,
    values: &FieldValues,
    required_message: &str,
) -> Result<OutputRecord, SubmissionRejected> {
    let errors = validate(schema, values, required_message);
    if !errors.is_empty() {
        return Err(SubmissionRejected { errors });
    }

    let entries = visible_fields(schema, values)
        .map(|field| {
            let value = values
                .get(&field.id)
                .filter(|v| v.matches_kind(field.kind))
                .map_or(Value::Null, |v| v.to_json());
            (field.id.clone(), value)
        })
        .collect();

    Ok(OutputRecord { entries })
}
