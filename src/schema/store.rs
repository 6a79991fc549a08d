//! Schema store: pure reducer over an owned, immutable schema value
//!
//! Every operation takes the current schema by reference and returns a new
//! one. Operations are total: an unknown identifier yields an unchanged copy.
//! Default titles and labels are numbered by current count + 1, so numbers
//! freed by deletes are never reused by position.

use serde::{Deserialize, Serialize};

use crate::observability::{log_event_with_fields, Event};

use super::patch::{FieldPatch, SectionPatch};
use super::types::{Field, FieldId, FormSchema, Section, SectionId};

impl FormSchema {
    /// Appends an empty section titled `Section {n}`.
    ///
    /// No-op when `id` is already taken.
    pub fn add_section(&self, id: SectionId) -> Self {
        let mut next = self.clone();
        if self.section(&id).is_none() {
            let title = format!("Section {}", self.sections.len() + 1);
            next.sections.push(Section::new(id, title));
        }
        next
    }

    pub fn update_section(&self, id: &SectionId, updates: &SectionPatch) -> Self {
        let mut next = self.clone();
        if let Some(section) = next.sections.iter_mut().find(|s| &s.id == id) {
            updates.apply(section);
        }
        next
    }

    pub fn delete_section(&self, id: &SectionId) -> Self {
        let mut next = self.clone();
        next.sections.retain(|s| &s.id != id);
        next
    }

    /// Appends a text field labelled `Field {n}` to the section.
    ///
    /// No-op when the section is missing or `field_id` is already taken.
    /// Field ids key the value map, so they are kept unique schema-wide.
    pub fn add_field(&self, section_id: &SectionId, field_id: FieldId) -> Self {
        let mut next = self.clone();
        if self.find_field(&field_id).is_some() {
            return next;
        }
        if let Some(section) = next.sections.iter_mut().find(|s| &s.id == section_id) {
            let label = format!("Field {}", section.fields.len() + 1);
            section.fields.push(Field::new(field_id, label));
        }
        next
    }

    pub fn update_field(
        &self,
        section_id: &SectionId,
        field_id: &FieldId,
        updates: &FieldPatch,
    ) -> Self {
        let mut next = self.clone();
        if let Some(field) = next
            .sections
            .iter_mut()
            .find(|s| &s.id == section_id)
            .and_then(|s| s.fields.iter_mut().find(|f| &f.id == field_id))
        {
            updates.apply(field);
        }
        next
    }

    pub fn delete_field(&self, section_id: &SectionId, field_id: &FieldId) -> Self {
        let mut next = self.clone();
        if let Some(section) = next.sections.iter_mut().find(|s| &s.id == section_id) {
            section.fields.retain(|f| &f.id != field_id);
        }
        next
    }
}

/// A schema mutation expressed as data.
///
/// Fresh identifiers are generated when the action is built, which keeps
/// [`reduce`] a pure function of its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SchemaAction {
    AddSection {
        #[serde(default = "SectionId::generate")]
        id: SectionId,
    },
    UpdateSection {
        id: SectionId,
        updates: SectionPatch,
    },
    DeleteSection {
        id: SectionId,
    },
    AddField {
        section_id: SectionId,
        #[serde(default = "FieldId::generate")]
        field_id: FieldId,
    },
    UpdateField {
        section_id: SectionId,
        field_id: FieldId,
        updates: FieldPatch,
    },
    DeleteField {
        section_id: SectionId,
        field_id: FieldId,
    },
}

impl SchemaAction {
    pub fn add_section() -> Self {
        SchemaAction::AddSection {
            id: SectionId::generate(),
        }
    }

    pub fn update_section(id: impl Into<SectionId>, updates: SectionPatch) -> Self {
        SchemaAction::UpdateSection {
            id: id.into(),
            updates,
        }
    }

    pub fn delete_section(id: impl Into<SectionId>) -> Self {
        SchemaAction::DeleteSection { id: id.into() }
    }

    pub fn add_field(section_id: impl Into<SectionId>) -> Self {
        SchemaAction::AddField {
            section_id: section_id.into(),
            field_id: FieldId::generate(),
        }
    }

    pub fn update_field(
        section_id: impl Into<SectionId>,
        field_id: impl Into<FieldId>,
        updates: FieldPatch,
    ) -> Self {
        SchemaAction::UpdateField {
            section_id: section_id.into(),
            field_id: field_id.into(),
            updates,
        }
    }

    pub fn delete_field(section_id: impl Into<SectionId>, field_id: impl Into<FieldId>) -> Self {
        SchemaAction::DeleteField {
            section_id: section_id.into(),
            field_id: field_id.into(),
        }
    }

    /// Lifecycle event emitted when this action changes the schema
    pub fn event(&self) -> Event {
        match self {
            SchemaAction::AddSection { .. } => Event::SectionAdded,
            SchemaAction::UpdateSection { .. } => Event::SectionUpdated,
            SchemaAction::DeleteSection { .. } => Event::SectionDeleted,
            SchemaAction::AddField { .. } => Event::FieldAdded,
            SchemaAction::UpdateField { .. } => Event::FieldUpdated,
            SchemaAction::DeleteField { .. } => Event::FieldDeleted,
        }
    }

    fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            SchemaAction::AddSection { id }
            | SchemaAction::UpdateSection { id, .. }
            | SchemaAction::DeleteSection { id } => vec![("section_id", id.to_string())],
            SchemaAction::AddField {
                section_id,
                field_id,
            }
            | SchemaAction::UpdateField {
                section_id,
                field_id,
                ..
            }
            | SchemaAction::DeleteField {
                section_id,
                field_id,
            } => vec![
                ("field_id", field_id.to_string()),
                ("section_id", section_id.to_string()),
            ],
        }
    }
}

/// Applies `action` to `schema`, returning the next schema.
pub fn reduce(schema: &FormSchema, action: &SchemaAction) -> FormSchema {
    match action {
        SchemaAction::AddSection { id } => schema.add_section(id.clone()),
        SchemaAction::UpdateSection { id, updates } => schema.update_section(id, updates),
        SchemaAction::DeleteSection { id } => schema.delete_section(id),
        SchemaAction::AddField {
            section_id,
            field_id,
        } => schema.add_field(section_id, field_id.clone()),
        SchemaAction::UpdateField {
            section_id,
            field_id,
            updates,
        } => schema.update_field(section_id, field_id, updates),
        SchemaAction::DeleteField {
            section_id,
            field_id,
        } => schema.delete_field(section_id, field_id),
    }
}

/// Owner of the current schema value.
///
/// The schema is replaced wholesale on each dispatch; readers holding a
/// clone of an earlier value are unaffected.
#[derive(Debug, Clone, Default)]
pub struct SchemaStore {
    schema: FormSchema,
}

impl SchemaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_schema(schema: FormSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Applies `action`; returns whether the schema changed.
    pub fn dispatch(&mut self, action: &SchemaAction) -> bool {
        let next = reduce(&self.schema, action);
        let changed = next != self.schema;

        let fields = action.log_fields();
        let fields: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();

        if changed {
            log_event_with_fields(action.event(), &fields);
            self.schema = next;
        } else {
            let mut fields = fields;
            fields.push(("action", action.event().as_str()));
            log_event_with_fields(Event::ActionIgnored, &fields);
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{Condition, FieldKind};

    fn two_field_schema() -> FormSchema {
        FormSchema::new()
            .add_section("s1".into())
            .add_field(&"s1".into(), "f1".into())
            .add_field(&"s1".into(), "f2".into())
    }

    #[test]
    fn test_add_section_numbers_titles() {
        let schema = FormSchema::new()
            .add_section("a".into())
            .add_section("b".into());

        assert_eq!(schema.sections[0].title, "Section 1");
        assert_eq!(schema.sections[1].title, "Section 2");
        assert!(schema.sections[1].fields.is_empty());
    }

    #[test]
    fn test_add_section_duplicate_id_is_noop() {
        let schema = FormSchema::new().add_section("a".into());
        assert_eq!(schema.add_section("a".into()), schema);
    }

    #[test]
    fn test_add_field_defaults() {
        let schema = two_field_schema();
        let field = schema.find_field(&"f2".into()).unwrap();

        assert_eq!(field.label, "Field 2");
        assert_eq!(field.kind, FieldKind::Text);
        assert!(!field.required);
        assert!(field.options.is_none());
    }

    #[test]
    fn test_add_field_label_uses_current_count() {
        let schema = two_field_schema().add_field(&"s1".into(), "f3".into());
        assert_eq!(schema.find_field(&"f3".into()).unwrap().label, "Field 3");

        let schema = schema
            .delete_field(&"s1".into(), &"f2".into())
            .add_field(&"s1".into(), "f4".into());
        assert_eq!(schema.find_field(&"f4".into()).unwrap().label, "Field 3");
    }

    #[test]
    fn test_add_field_taken_id_is_noop() {
        let schema = two_field_schema().add_section("s2".into());
        assert_eq!(schema.add_field(&"s2".into(), "f1".into()), schema);
    }

    #[test]
    fn test_add_field_unknown_section_is_noop() {
        let schema = two_field_schema();
        assert_eq!(schema.add_field(&"missing".into(), "x".into()), schema);
    }

    #[test]
    fn test_update_field_merges() {
        let schema = two_field_schema().update_field(
            &"s1".into(),
            &"f2".into(),
            &FieldPatch::condition(Condition::new("f1", "show")),
        );
        let field = schema.find_field(&"f2".into()).unwrap();

        assert_eq!(field.label, "Field 2");
        assert_eq!(field.condition, Some(Condition::new("f1", "show")));
    }

    #[test]
    fn test_update_field_clears_condition() {
        let schema = two_field_schema()
            .update_field(
                &"s1".into(),
                &"f2".into(),
                &FieldPatch::condition(Condition::new("f1", "show")),
            )
            .update_field(&"s1".into(), &"f2".into(), &FieldPatch::clear_condition());

        assert!(schema.find_field(&"f2".into()).unwrap().condition.is_none());
    }

    #[test]
    fn test_update_field_wrong_section_is_noop() {
        let schema = two_field_schema().add_section("s2".into());
        let next = schema.update_field(&"s2".into(), &"f1".into(), &FieldPatch::required(true));
        assert_eq!(next, schema);
    }

    #[test]
    fn test_delete_keeps_order() {
        let schema = two_field_schema()
            .add_field(&"s1".into(), "f3".into())
            .delete_field(&"s1".into(), &"f2".into());

        let ids: Vec<_> = schema.fields().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["f1", "f3"]);
    }

    #[test]
    fn test_deleted_section_never_resurrects() {
        let schema = two_field_schema().delete_section(&"s1".into());
        let next = schema.add_field(&"s1".into(), "f9".into());

        assert_eq!(next, schema);
        assert!(next.is_empty());
    }

    #[test]
    fn test_reduce_leaves_input_untouched() {
        let schema = two_field_schema();
        let snapshot = schema.clone();

        let next = reduce(&schema, &SchemaAction::delete_section("s1"));
        assert_eq!(schema, snapshot);
        assert!(next.is_empty());
    }

    #[test]
    fn test_store_dispatch_reports_change() {
        let mut store = SchemaStore::new();
        assert!(store.dispatch(&SchemaAction::add_section()));

        let section_id = store.schema().sections[0].id.clone();
        assert!(store.dispatch(&SchemaAction::add_field(section_id.clone())));
        assert!(!store.dispatch(&SchemaAction::delete_field(section_id, "missing")));
        assert_eq!(store.schema().field_count(), 1);
    }

    #[test]
    fn test_action_json_generates_ids() {
        let action: SchemaAction =
            serde_json::from_str(r#"{"op":"add_field","section_id":"s1"}"#).unwrap();
        match action {
            SchemaAction::AddField { section_id, field_id } => {
                assert_eq!(section_id.as_str(), "s1");
                assert!(!field_id.as_str().is_empty());
            }
            other => panic!("unexpected action {:?}", other),
        }
    }
}
