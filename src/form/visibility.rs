//! Conditional visibility
//!
//! Recomputed from the schema and current values on every call; nothing is
//! cached, so a change to any referenced value is reflected immediately.

use serde_json::Value;

use crate::schema::{Condition, Field, FormSchema};

use super::value::FieldValues;

/// Whether `field` is shown given the current values.
///
/// Fields without a condition are always visible.
pub fn is_visible(schema: &FormSchema, values: &FieldValues, field: &Field) -> bool {
    match &field.condition {
        None => true,
        Some(condition) => condition_satisfied(schema, values, condition),
    }
}

/// Whether the referenced field currently holds exactly `condition.value`.
///
/// Never satisfied when the referenced field no longer exists, holds no
/// value of its current kind, or the expected value is itself empty
/// (`null` or `""`).
pub fn condition_satisfied(schema: &FormSchema, values: &FieldValues, condition: &Condition) -> bool {
    if is_blank(&condition.value) {
        return false;
    }

    let Some(referenced) = schema.find_field(&condition.field) else {
        return false;
    };

    // A value of the wrong shape for the referenced kind counts as unset
    values
        .get(&condition.field)
        .filter(|value| value.matches_kind(referenced.kind))
        .map_or(false, |value| value.to_json() == condition.value)
}

/// Visible fields in display order
pub fn visible_fields<'a>(
    schema: &'a FormSchema,
    values: &'a FieldValues,
) -> impl Iterator<Item = &'a Field> + 'a {
    schema.fields().filter(move |f| is_visible(schema, values, f))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
