//! Live input values
//!
//! A value is unset when the map has no entry for the field. Host input is
//! converted per field kind; a stored value of the wrong shape for the
//! field's current kind counts as unset.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::schema::{FieldId, FieldKind, FormSchema};

use super::countries;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// `+<code>` optionally followed by a separator and the national number
static PHONE_SPACED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+([0-9]{1,3})(?:[\s\-.(]+([0-9\s\-.()]*))?$").expect("PHONE_SPACED failed")
});
/// `+<code><number>` with no separator
static PHONE_COMPACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+([0-9]{4,15})$").expect("PHONE_COMPACT failed"));
/// National number only
static PHONE_LOCAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\s\-.()]*$").expect("PHONE_LOCAL failed"));

/// Errors converting host input into a field value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("field '{field}' ({kind}) expects {expected}, got {actual}")]
    WrongShape {
        field: String,
        kind: FieldKind,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("field '{field}': invalid date '{input}', expected YYYY-MM-DD")]
    InvalidDate { field: String, input: String },

    #[error("field '{field}': invalid phone number '{input}'")]
    InvalidPhone { field: String, input: String },

    #[error("field '{field}': invalid file reference: {reason}")]
    InvalidFile { field: String, reason: String },

    #[error("unknown field '{0}'")]
    UnknownField(String),
}

/// A selected file, as delivered by the host's file dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
}

impl FileRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: 0,
            mime: None,
        }
    }
}

/// A phone number split into a fixed calling code and an editable number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber {
    pub calling_code: u16,
    /// National number, digits only
    pub number: String,
}

impl PhoneNumber {
    pub fn new(calling_code: u16, number: impl AsRef<str>) -> Self {
        Self {
            calling_code,
            number: number.as_ref().chars().filter(char::is_ascii_digit).collect(),
        }
    }

    /// Parses `+92 300 1234567`, `+923001234567` or a bare national number.
    ///
    /// Bare numbers take `default_calling_code`. Explicit calling codes must
    /// belong to a known country. Only ASCII digits are accepted.
    pub fn parse(input: &str, default_calling_code: u16) -> Option<Self> {
        let input = input.trim();

        if let Some(caps) = PHONE_SPACED.captures(input) {
            let code: u16 = caps.get(1)?.as_str().parse().ok()?;
            countries::by_calling_code(code)?;
            let number = caps.get(2).map_or("", |m| m.as_str());
            return Some(Self::new(code, number));
        }

        if let Some(caps) = PHONE_COMPACT.captures(input) {
            let digits = caps.get(1)?.as_str();
            // Calling codes are prefix-free, so the first known prefix wins
            return (1..=3).find_map(|len| {
                let code: u16 = digits.get(..len)?.parse().ok()?;
                countries::by_calling_code(code)?;
                Some(Self::new(code, digits.get(len..)?))
            });
        }

        if PHONE_LOCAL.is_match(input) {
            return Some(Self::new(default_calling_code, input));
        }

        None
    }

    pub fn is_empty(&self) -> bool {
        self.number.is_empty()
    }

    /// E.164 form, e.g. `+923001234567`
    pub fn to_e164(&self) -> String {
        format!("+{}{}", self.calling_code, self.number)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{} {}", self.calling_code, self.number)
    }
}

/// Current value of one field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// text, dropdown, radio and country selections
    Text(String),
    /// checkbox
    Bool(bool),
    Date(NaiveDate),
    File(FileRef),
    Phone(PhoneNumber),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Whether this value has the shape `kind` stores
    pub fn matches_kind(&self, kind: FieldKind) -> bool {
        match kind {
            FieldKind::Text | FieldKind::Dropdown | FieldKind::Radio | FieldKind::Country => {
                matches!(self, FieldValue::Text(_))
            }
            FieldKind::Checkbox => matches!(self, FieldValue::Bool(_)),
            FieldKind::Date => matches!(self, FieldValue::Date(_)),
            FieldKind::File => matches!(self, FieldValue::File(_)),
            FieldKind::Phone => matches!(self, FieldValue::Phone(_)),
        }
    }

    /// Whether this value satisfies a required field of `kind`
    pub fn is_filled(&self, kind: FieldKind) -> bool {
        if !self.matches_kind(kind) {
            return false;
        }
        match self {
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Bool(b) => *b,
            FieldValue::Date(_) | FieldValue::File(_) => true,
            FieldValue::Phone(p) => !p.is_empty(),
        }
    }

    /// JSON form used in output records and condition matching
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Date(d) => Value::String(d.format(DATE_FORMAT).to_string()),
            FieldValue::File(f) => serde_json::to_value(f).unwrap_or(Value::Null),
            FieldValue::Phone(p) if p.is_empty() => Value::Null,
            FieldValue::Phone(p) => Value::String(p.to_e164()),
        }
    }

    /// Converts host input for a field of `kind`.
    ///
    /// `null` yields `None` (clear the value).
    pub fn from_json(
        field: &FieldId,
        kind: FieldKind,
        input: &Value,
        default_calling_code: u16,
    ) -> Result<Option<Self>, ValueError> {
        if input.is_null() {
            return Ok(None);
        }

        let wrong_shape = |expected: &'static str| ValueError::WrongShape {
            field: field.to_string(),
            kind,
            expected,
            actual: json_type_name(input),
        };

        let value = match kind {
            FieldKind::Text | FieldKind::Dropdown | FieldKind::Radio | FieldKind::Country => {
                let s = input.as_str().ok_or_else(|| wrong_shape("string"))?;
                FieldValue::Text(s.to_string())
            }
            FieldKind::Checkbox => {
                FieldValue::Bool(input.as_bool().ok_or_else(|| wrong_shape("bool"))?)
            }
            FieldKind::Date => {
                let s = input.as_str().ok_or_else(|| wrong_shape("date string"))?;
                let date = NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| {
                    ValueError::InvalidDate {
                        field: field.to_string(),
                        input: s.to_string(),
                    }
                })?;
                FieldValue::Date(date)
            }
            FieldKind::File => match input {
                Value::String(name) => FieldValue::File(FileRef::new(name.as_str())),
                Value::Object(_) => {
                    let file: FileRef = serde_json::from_value(input.clone()).map_err(|e| {
                        ValueError::InvalidFile {
                            field: field.to_string(),
                            reason: e.to_string(),
                        }
                    })?;
                    FieldValue::File(file)
                }
                _ => return Err(wrong_shape("file object")),
            },
            FieldKind::Phone => {
                let s = input.as_str().ok_or_else(|| wrong_shape("phone string"))?;
                let phone = PhoneNumber::parse(s, default_calling_code).ok_or_else(|| {
                    ValueError::InvalidPhone {
                        field: field.to_string(),
                        input: s.to_string(),
                    }
                })?;
                FieldValue::Phone(phone)
            }
        };

        Ok(Some(value))
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Field id -> current value
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldValues {
    values: BTreeMap<FieldId, FieldValue>,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: impl Into<FieldId>, value: FieldValue) -> Self {
        self.set(id.into(), value);
        self
    }

    pub fn get(&self, id: &FieldId) -> Option<&FieldValue> {
        self.values.get(id)
    }

    /// Returns the previous value, if any
    pub fn set(&mut self, id: FieldId, value: FieldValue) -> Option<FieldValue> {
        self.values.insert(id, value)
    }

    pub fn remove(&mut self, id: &FieldId) -> Option<FieldValue> {
        self.values.remove(id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldId, &FieldValue)> {
        self.values.iter()
    }

    /// Builds values from a JSON object keyed by field id, typed by `schema`.
    ///
    /// Keys naming no field in the schema are rejected; `null` entries are skipped.
    pub fn from_json(
        schema: &FormSchema,
        input: &Value,
        default_calling_code: u16,
    ) -> Result<Self, ValueError> {
        let obj = input.as_object().ok_or_else(|| ValueError::WrongShape {
            field: "$root".to_string(),
            kind: FieldKind::Text,
            expected: "object",
            actual: json_type_name(input),
        })?;

        let mut values = FieldValues::new();
        for (key, raw) in obj {
            let id = FieldId::from(key.as_str());
            let field = schema
                .find_field(&id)
                .ok_or_else(|| ValueError::UnknownField(key.clone()))?;
            if let Some(value) = FieldValue::from_json(&id, field.kind, raw, default_calling_code)? {
                values.set(id, value);
            }
        }

        Ok(values)
    }
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
