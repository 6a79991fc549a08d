//! Partial updates merged into sections and fields
//!
//! Absent attributes are left untouched. `condition` distinguishes between
//! "not given" and "clear" (`null`).

use serde::{Deserialize, Deserializer, Serialize};

use super::types::{Condition, Field, FieldKind, Section};

/// Attributes of a section that may be changed in place
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl SectionPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
        }
    }

    /// Merges into `section`
    pub fn apply(&self, section: &mut Section) {
        if let Some(title) = &self.title {
            section.title = title.clone();
        }
    }
}

/// Attributes of a field that may be changed in place
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldPatch {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FieldKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// `Some(None)` clears the condition
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub condition: Option<Option<Condition>>,
}

impl FieldPatch {
    pub fn kind(kind: FieldKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn required(required: bool) -> Self {
        Self {
            required: Some(required),
            ..Self::default()
        }
    }

    pub fn options<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: Some(options.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Builds an options update from comma-separated builder input.
    ///
    /// Entries are trimmed; empty entries are kept and render as blank options.
    pub fn options_from_csv(input: &str) -> Self {
        Self::options(input.split(',').map(str::trim))
    }

    pub fn condition(condition: Condition) -> Self {
        Self {
            condition: Some(Some(condition)),
            ..Self::default()
        }
    }

    pub fn clear_condition() -> Self {
        Self {
            condition: Some(None),
            ..Self::default()
        }
    }

    /// Merges the given attributes into `field`
    pub fn apply(&self, field: &mut Field) {
        if let Some(kind) = self.kind {
            field.kind = kind;
        }
        if let Some(label) = &self.label {
            field.label = label.clone();
        }
        if let Some(required) = self.required {
            field.required = required;
        }
        if let Some(options) = &self.options {
            field.options = Some(options.clone());
        }
        if let Some(condition) = &self.condition {
            field.condition = condition.clone();
        }
    }
}

/// Maps a present key (even `null`) to `Some`, so `null` means "clear".
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
