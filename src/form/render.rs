//! Render descriptors for the live form
//!
//! `render` is the single boundary where field kinds are dispatched to input
//! affordances. Hidden fields produce no view. Each visible field carries its
//! current validation state, recomputed on every call.

use std::fmt::Write as _;

use serde::Serialize;

use crate::config::FormConfig;
use crate::schema::{Field, FieldId, FieldKind, FormSchema, SectionId};

use super::countries::{self, COUNTRIES};
use super::validation::{validate_field, FieldError};
use super::value::{FieldValue, FieldValues, FileRef};
use super::visibility::is_visible;

/// Placeholder entry shown first in dropdowns
pub const SELECT_PLACEHOLDER: &str = "Select an option";

/// One selectable entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

impl ChoiceOption {
    fn same(value: &str) -> Self {
        Self {
            value: value.to_string(),
            label: value.to_string(),
        }
    }
}

/// Input affordance for a visible field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum InputWidget {
    TextInput {
        value: String,
    },
    Select {
        placeholder: &'static str,
        options: Vec<ChoiceOption>,
        selected: Option<String>,
    },
    /// Every option is listed at once
    RadioGroup {
        options: Vec<ChoiceOption>,
        selected: Option<String>,
    },
    Checkbox {
        checked: bool,
        caption: String,
    },
    FilePicker {
        selected: Option<FileRef>,
    },
    DatePicker {
        /// `YYYY-MM-DD`
        selected: Option<String>,
        /// Formatted with the configured date format
        display: Option<String>,
    },
    /// The calling code is fixed by `country`; only `number` is editable
    PhoneInput {
        country: &'static str,
        calling_code: u16,
        number: String,
    },
    CountrySelect {
        options: Vec<ChoiceOption>,
        selected: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub id: FieldId,
    pub label: String,
    /// Renders the required marker
    pub required: bool,
    pub widget: InputWidget,
    pub error: Option<FieldError>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    pub id: SectionId,
    pub title: String,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub sections: Vec<SectionView>,
    /// Whether error indications are surfaced (after a submit attempt)
    pub show_errors: bool,
}

impl FormView {
    pub fn fields(&self) -> impl Iterator<Item = &FieldView> {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }

    pub fn field(&self, id: &FieldId) -> Option<&FieldView> {
        self.fields().find(|f| &f.id == id)
    }

    pub fn errors(&self) -> impl Iterator<Item = &FieldError> {
        self.fields().filter_map(|f| f.error.as_ref())
    }

    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }
}

/// Renders every section and its visible fields.
pub fn render(schema: &FormSchema, values: &FieldValues, config: &FormConfig) -> FormView {
    let sections = schema
        .sections
        .iter()
        .map(|section| SectionView {
            id: section.id.clone(),
            title: section.title.clone(),
            fields: section
                .fields
                .iter()
                .filter(|field| is_visible(schema, values, field))
                .map(|field| render_field(field, values, config))
                .collect(),
        })
        .collect();

    FormView {
        sections,
        show_errors: false,
    }
}

fn render_field(field: &Field, values: &FieldValues, config: &FormConfig) -> FieldView {
    // Wrong-shaped values render as unset
    let value = values
        .get(&field.id)
        .filter(|value| value.matches_kind(field.kind));

    FieldView {
        id: field.id.clone(),
        label: field.label.clone(),
        required: field.required,
        widget: widget_for(field, value, config),
        error: validate_field(field, values, &config.required_message),
    }
}

fn widget_for(field: &Field, value: Option<&FieldValue>, config: &FormConfig) -> InputWidget {
    let selected_text = || match value {
        Some(FieldValue::Text(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    };

    match field.kind {
        FieldKind::Text => InputWidget::TextInput {
            value: selected_text().unwrap_or_default(),
        },
        FieldKind::Dropdown => InputWidget::Select {
            placeholder: SELECT_PLACEHOLDER,
            options: field.choices().iter().map(|o| ChoiceOption::same(o)).collect(),
            selected: selected_text(),
        },
        FieldKind::Radio => InputWidget::RadioGroup {
            options: field.choices().iter().map(|o| ChoiceOption::same(o)).collect(),
            selected: selected_text(),
        },
        FieldKind::Checkbox => InputWidget::Checkbox {
            checked: matches!(value, Some(FieldValue::Bool(true))),
            caption: field.label.clone(),
        },
        FieldKind::File => InputWidget::FilePicker {
            selected: match value {
                Some(FieldValue::File(file)) => Some(file.clone()),
                _ => None,
            },
        },
        FieldKind::Date => {
            let date = match value {
                Some(FieldValue::Date(date)) => Some(*date),
                _ => None,
            };
            InputWidget::DatePicker {
                selected: date.map(|d| d.format("%Y-%m-%d").to_string()),
                display: date.map(|d| format_date(d, &config.date_format)),
            }
        }
        FieldKind::Phone => {
            let phone = match value {
                Some(FieldValue::Phone(phone)) => Some(phone),
                _ => None,
            };
            // Shared calling codes (+1) resolve to the configured country first
            let configured = config.phone_country();
            let country = match phone {
                Some(p) if p.calling_code != configured.calling_code => {
                    countries::by_calling_code(p.calling_code).unwrap_or(configured)
                }
                _ => configured,
            };
            InputWidget::PhoneInput {
                country: country.code,
                calling_code: country.calling_code,
                number: phone.map(|p| p.number.clone()).unwrap_or_default(),
            }
        }
        FieldKind::Country => InputWidget::CountrySelect {
            options: COUNTRIES
                .iter()
                .map(|c| ChoiceOption {
                    value: c.code.to_string(),
                    label: c.name.to_string(),
                })
                .collect(),
            selected: selected_text(),
        },
    }
}

fn format_date(date: chrono::NaiveDate, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(format)).is_err() {
        return date.format("%Y-%m-%d").to_string();
    }
    out
}
