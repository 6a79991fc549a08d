//! Required-field validation
//!
//! Only visible fields are validated. A visible required field fails when
//! its value is unset, empty for its kind, or of the wrong shape.

use std::fmt;

use serde::Serialize;

use crate::schema::{Field, FieldId, FormSchema};

use super::value::FieldValues;
use super::visibility::visible_fields;

/// A failing field and the message shown next to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field_id: FieldId,
    pub label: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.label, self.field_id, self.message)
    }
}

/// Checks one field, assumed visible
pub fn validate_field(field: &Field, values: &FieldValues, message: &str) -> Option<FieldError> {
    if !field.required {
        return None;
    }

    let filled = values
        .get(&field.id)
        .map_or(false, |value| value.is_filled(field.kind));

    if filled {
        None
    } else {
        Some(FieldError {
            field_id: field.id.clone(),
            label: field.label.clone(),
            message: message.to_string(),
        })
    }
}

/// All failing visible fields in display order
pub fn validate(schema: &FormSchema, values: &FieldValues, message: &str) -> Vec<FieldError> {
    visible_fields(schema, values)
        .filter_map(|field| validate_field(field, values, message))
        .collect()
}
