//! Form schema type definitions
//!
//! A schema is an ordered list of sections, each owning an ordered list of
//! fields. Ordering is insertion order and is the display order.
//!
//! Supported field kinds:
//! - text: single-line string
//! - dropdown: single selection from `options`
//! - radio: single selection, all `options` listed
//! - file: single file reference
//! - checkbox: boolean
//! - country: single selection from the country list
//! - date: calendar date
//! - phone: number with a fixed country calling code

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique section identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    /// Generates a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SectionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SectionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique field identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    /// Generates a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for FieldId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The closed set of field kinds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Dropdown,
    Radio,
    File,
    Checkbox,
    Country,
    Date,
    Phone,
}

impl FieldKind {
    /// All kinds in builder menu order
    pub const ALL: [FieldKind; 8] = [
        FieldKind::Text,
        FieldKind::Dropdown,
        FieldKind::Radio,
        FieldKind::File,
        FieldKind::Checkbox,
        FieldKind::Country,
        FieldKind::Date,
        FieldKind::Phone,
    ];

    /// Returns the kind name used in serialized schemas
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Dropdown => "dropdown",
            FieldKind::Radio => "radio",
            FieldKind::File => "file",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Country => "country",
            FieldKind::Date => "date",
            FieldKind::Phone => "phone",
        }
    }

    /// Whether this kind reads `options` from the field definition
    pub fn uses_options(&self) -> bool {
        matches!(self, FieldKind::Dropdown | FieldKind::Radio)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Visibility rule: the owning field is shown only when `field` holds `value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Field whose current value is inspected
    pub field: FieldId,
    /// Value that must match exactly
    pub value: serde_json::Value,
}

impl Condition {
    pub fn new(field: impl Into<FieldId>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// A single form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: FieldId,
    #[serde(rename = "type", default)]
    pub kind: FieldKind,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    /// Choice list, read only for dropdown and radio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl Field {
    /// Creates an optional text field
    pub fn new(id: impl Into<FieldId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: FieldKind::Text,
            label: label.into(),
            required: false,
            options: None,
            condition: None,
        }
    }

    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Options as seen by the interpreter; empty unless the kind uses them
    pub fn choices(&self) -> &[String] {
        match (&self.options, self.kind.uses_options()) {
            (Some(options), true) => options,
            _ => &[],
        }
    }
}

/// An ordered group of fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub title: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Section {
    pub fn new(id: impl Into<SectionId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }
}

/// Complete form schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    pub fn section(&self, id: &SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| &s.id == id)
    }

    /// Finds a field anywhere in the schema
    pub fn find_field(&self, id: &FieldId) -> Option<&Field> {
        self.fields().find(|f| &f.id == id)
    }

    /// All fields in display order
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }

    pub fn field_count(&self) -> usize {
        self.sections.iter().map(|s| s.fields.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Validates the schema structure itself (not input values).
    ///
    /// Imported snapshots must keep section ids and field ids unique.
    pub fn validate_structure(&self) -> Result<(), String> {
        let mut section_ids = HashSet::new();
        let mut field_ids = HashSet::new();

        for section in &self.sections {
            if !section_ids.insert(&section.id) {
                return Err(format!("duplicate section id '{}'", section.id));
            }
            for field in &section.fields {
                if !field_ids.insert(&field.id) {
                    return Err(format!("duplicate field id '{}'", field.id));
                }
            }
        }

        Ok(())
    }
}
