//! Schema Store Invariant Tests
//!
//! Tests for the builder's reducer:
//! - Identifiers stay unique under any operation sequence
//! - Insertion order is display order; deletes never renumber
//! - Operations on unknown identifiers are no-ops
//! - Reducing never mutates the input schema

use dynaform::schema::{
    reduce, Condition, FieldKind, FieldPatch, FormSchema, SchemaAction, SchemaStore, SectionId,
    SectionPatch,
};
use proptest::prelude::*;
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

/// Small id pools so sequences collide often
fn section_name(n: u8) -> String {
    format!("s{}", n)
}

fn field_name(n: u8) -> String {
    format!("f{}", n)
}

fn arb_action() -> impl Strategy<Value = SchemaAction> {
    let section = (0u8..4).prop_map(section_name);
    let field = (0u8..6).prop_map(field_name);

    prop_oneof![
        section.clone().prop_map(|id| SchemaAction::AddSection { id: id.into() }),
        section.clone().prop_map(SchemaAction::delete_section),
        (section.clone(), "[a-z ]{0,8}").prop_map(|(id, title)| {
            SchemaAction::update_section(id, SectionPatch::title(title))
        }),
        (section.clone(), field.clone()).prop_map(|(s, f)| SchemaAction::AddField {
            section_id: s.into(),
            field_id: f.into(),
        }),
        (section.clone(), field.clone()).prop_map(|(s, f)| SchemaAction::delete_field(s, f)),
        (section, field, any::<bool>())
            .prop_map(|(s, f, required)| SchemaAction::update_field(s, f, FieldPatch::required(required))),
    ]
}

/// Reference model: section ids with their field ids, in insertion order
#[derive(Debug, Default)]
struct Model {
    sections: Vec<(String, Vec<String>)>,
}

impl Model {
    fn apply(&mut self, action: &SchemaAction) {
        match action {
            SchemaAction::AddSection { id } => {
                if !self.sections.iter().any(|(s, _)| s == id.as_str()) {
                    self.sections.push((id.to_string(), Vec::new()));
                }
            }
            SchemaAction::DeleteSection { id } => {
                self.sections.retain(|(s, _)| s != id.as_str());
            }
            SchemaAction::AddField {
                section_id,
                field_id,
            } => {
                let taken = self
                    .sections
                    .iter()
                    .any(|(_, fields)| fields.iter().any(|f| f == field_id.as_str()));
                if taken {
                    return;
                }
                if let Some((_, fields)) = self
                    .sections
                    .iter_mut()
                    .find(|(s, _)| s == section_id.as_str())
                {
                    fields.push(field_id.to_string());
                }
            }
            SchemaAction::DeleteField {
                section_id,
                field_id,
            } => {
                if let Some((_, fields)) = self
                    .sections
                    .iter_mut()
                    .find(|(s, _)| s == section_id.as_str())
                {
                    fields.retain(|f| f != field_id.as_str());
                }
            }
            SchemaAction::UpdateSection { .. } | SchemaAction::UpdateField { .. } => {}
        }
    }
}

fn layout(schema: &FormSchema) -> Vec<(String, Vec<String>)> {
    schema
        .sections
        .iter()
        .map(|s| {
            (
                s.id.to_string(),
                s.fields.iter().map(|f| f.id.to_string()).collect(),
            )
        })
        .collect()
}

// =============================================================================
// Operation Sequence Properties
// =============================================================================

proptest! {
    /// Any sequence keeps ids unique and matches the reference ordering.
    #[test]
    fn prop_sequences_keep_ids_unique_and_ordered(
        actions in prop::collection::vec(arb_action(), 0..40)
    ) {
        let mut schema = FormSchema::new();
        let mut model = Model::default();

        for action in &actions {
            let before = schema.clone();
            let next = reduce(&schema, action);
            prop_assert_eq!(&schema, &before, "reduce must not mutate its input");

            model.apply(action);
            schema = next;

            prop_assert!(schema.validate_structure().is_ok());
            prop_assert_eq!(layout(&schema), model.sections.clone());
        }
    }

    /// Applying the same no-op action twice changes nothing either time.
    #[test]
    fn prop_unknown_ids_are_noops(field in "[a-z]{1,6}") {
        let schema = FormSchema::new().add_section("known".into());
        let actions = [
            SchemaAction::delete_section("ghost"),
            SchemaAction::update_section("ghost", SectionPatch::title("x")),
            SchemaAction::delete_field("known", field.clone()),
            SchemaAction::update_field("known", field.clone(), FieldPatch::label("x")),
            SchemaAction::AddField { section_id: "ghost".into(), field_id: field.into() },
        ];

        for action in &actions {
            prop_assert_eq!(reduce(&schema, action), schema.clone());
        }
    }
}

// =============================================================================
// Default Naming Tests
// =============================================================================

/// Two fields, delete the second, add a third: the new label is "Field 2".
#[test]
fn test_field_label_counts_current_fields() {
    let s: SectionId = "s".into();
    let schema = FormSchema::new()
        .add_section(s.clone())
        .add_field(&s, "a".into())
        .add_field(&s, "b".into())
        .delete_field(&s, &"b".into())
        .add_field(&s, "c".into());

    let labels: Vec<_> = schema.sections[0]
        .fields
        .iter()
        .map(|f| f.label.as_str())
        .collect();
    assert_eq!(labels, vec!["Field 1", "Field 2"]);
}

/// Two fields then a third: "Field 3".
#[test]
fn test_third_field_label() {
    let mut store = SchemaStore::new();
    store.dispatch(&SchemaAction::AddSection { id: "s".into() });
    for _ in 0..3 {
        store.dispatch(&SchemaAction::add_field("s"));
    }

    assert_eq!(store.schema().sections[0].fields[2].label, "Field 3");
}

#[test]
fn test_section_titles_count_current_sections() {
    let schema = FormSchema::new()
        .add_section("a".into())
        .add_section("b".into())
        .delete_section(&"a".into())
        .add_section("c".into());

    assert_eq!(schema.sections[1].title, "Section 2");
}

// =============================================================================
// Deletion Tests
// =============================================================================

/// A deleted section cannot be targeted by later field operations.
#[test]
fn test_deleted_section_is_never_resurrected() {
    let mut store = SchemaStore::new();
    store.dispatch(&SchemaAction::AddSection { id: "s".into() });
    store.dispatch(&SchemaAction::delete_section("s"));

    assert!(!store.dispatch(&SchemaAction::add_field("s")));
    assert!(!store.dispatch(&SchemaAction::update_section(
        "s",
        SectionPatch::title("Back")
    )));
    assert!(store.schema().is_empty());
}

/// Deleting a referenced field leaves the dangling condition in place.
#[test]
fn test_delete_leaves_dangling_condition() {
    let s: SectionId = "s".into();
    let schema = FormSchema::new()
        .add_section(s.clone())
        .add_field(&s, "f1".into())
        .add_field(&s, "f2".into())
        .update_field(
            &s,
            &"f2".into(),
            &FieldPatch::condition(Condition::new("f1", "show")),
        )
        .delete_field(&s, &"f1".into());

    let f2 = schema.find_field(&"f2".into()).unwrap();
    assert_eq!(f2.condition.as_ref().unwrap().field.as_str(), "f1");
}

// =============================================================================
// Update Tests
// =============================================================================

/// Switching kind away and back keeps the options.
#[test]
fn test_options_survive_kind_round_trip() {
    let s: SectionId = "s".into();
    let schema = FormSchema::new()
        .add_section(s.clone())
        .add_field(&s, "f".into())
        .update_field(&s, &"f".into(), &FieldPatch::kind(FieldKind::Dropdown))
        .update_field(&s, &"f".into(), &FieldPatch::options_from_csv("a, b ,c"))
        .update_field(&s, &"f".into(), &FieldPatch::kind(FieldKind::Text))
        .update_field(&s, &"f".into(), &FieldPatch::kind(FieldKind::Radio));

    let field = schema.find_field(&"f".into()).unwrap();
    assert_eq!(field.choices(), ["a", "b", "c"].map(String::from));
}

/// A JSON patch with `"condition": null` clears the condition.
#[test]
fn test_json_patch_clears_condition() {
    let s: SectionId = "s".into();
    let schema = FormSchema::new()
        .add_section(s.clone())
        .add_field(&s, "f1".into())
        .add_field(&s, "f2".into())
        .update_field(
            &s,
            &"f2".into(),
            &FieldPatch::condition(Condition::new("f1", "yes")),
        );

    let action: SchemaAction = serde_json::from_value(json!({
        "op": "update_field",
        "section_id": "s",
        "field_id": "f2",
        "updates": {"condition": null, "label": "Why?"}
    }))
    .unwrap();
    let schema = reduce(&schema, &action);

    let f2 = schema.find_field(&"f2".into()).unwrap();
    assert!(f2.condition.is_none());
    assert_eq!(f2.label, "Why?");
}
