//! Session Scenario Tests
//!
//! Drives a full builder-then-fill workflow through the session and the
//! JSON-lines host:
//! - Views are recomputed after every change
//! - Errors surface only after a submit attempt
//! - Snapshots and values load from disk through the CLI helpers

use std::io::{Cursor, Write};

use dynaform::cli::{load_schema, run_session, submit_values};
use dynaform::config::FormConfig;
use dynaform::form::FieldValue;
use dynaform::schema::{Condition, FieldKind, FieldPatch, SchemaAction};
use dynaform::session::FormSession;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

// =============================================================================
// Helper Functions
// =============================================================================

fn write_temp(content: &Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

fn snapshot() -> Value {
    json!({
        "sections": [{
            "id": "contact",
            "title": "Contact",
            "fields": [
                {"id": "method", "type": "radio", "label": "Preferred", "required": true,
                 "options": ["Email", "Phone"]},
                {"id": "phone", "type": "phone", "label": "Phone", "required": true,
                 "condition": {"field": "method", "value": "Phone"}},
                {"id": "email", "type": "text", "label": "Email", "required": true,
                 "condition": {"field": "method", "value": "Email"}}
            ]
        }]
    })
}

fn run(session: &mut FormSession, lines: &[Value]) -> Vec<Value> {
    let input: Vec<String> = lines.iter().map(Value::to_string).collect();
    let mut out = Vec::new();
    run_session(session, Cursor::new(input.join("\n")), &mut out).unwrap();

    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

// =============================================================================
// Session Workflow Tests
// =============================================================================

/// Build a conditional form through actions, then fill and submit it.
#[test]
fn test_build_then_fill() {
    let mut session = FormSession::default();
    session.dispatch(&SchemaAction::AddSection { id: "s".into() });
    session.dispatch(&SchemaAction::AddField {
        section_id: "s".into(),
        field_id: "f1".into(),
    });
    session.dispatch(&SchemaAction::AddField {
        section_id: "s".into(),
        field_id: "f2".into(),
    });
    session.dispatch(&SchemaAction::update_field(
        "s",
        "f1",
        FieldPatch::kind(FieldKind::Dropdown),
    ));
    session.dispatch(&SchemaAction::update_field(
        "s",
        "f1",
        FieldPatch::options_from_csv("Yes, Other"),
    ));
    session.dispatch(&SchemaAction::update_field(
        "s",
        "f2",
        FieldPatch::condition(Condition::new("f1", "Other")),
    ));
    session.dispatch(&SchemaAction::update_field("s", "f2", FieldPatch::required(true)));

    assert_eq!(session.view().fields().count(), 1);

    session.set_value("f1", FieldValue::text("Other"));
    assert_eq!(session.view().fields().count(), 2);
    assert!(session.submit().is_err());

    let view = session.view();
    assert!(view.show_errors);
    assert_eq!(view.errors().count(), 1);

    session.set_value("f2", FieldValue::text("Details"));
    let record = session.submit().unwrap();
    assert_eq!(record.to_json(), json!({"f1": "Other", "f2": "Details"}));
}

/// Deleting the referenced field hides the dependent one, even with a value left over.
#[test]
fn test_deleting_reference_hides_dependent() {
    let schema: dynaform::schema::FormSchema = serde_json::from_value(snapshot()).unwrap();
    let mut session = FormSession::with_schema(schema, FormConfig::default());
    session.set_value("method", FieldValue::text("Email"));
    assert!(session.view().field(&"email".into()).is_some());

    session.dispatch(&SchemaAction::delete_field("contact", "method"));
    let view = session.view();
    assert!(view.field(&"email".into()).is_none());
    assert!(view.field(&"phone".into()).is_none());

    let record = session.submit().unwrap();
    assert!(record.is_empty());
}

// =============================================================================
// Host Protocol Tests
// =============================================================================

#[test]
fn test_host_session_over_snapshot() {
    let file = write_temp(&snapshot());
    let schema = load_schema(file.path()).unwrap();
    let mut session = FormSession::with_schema(schema, FormConfig::default());

    let responses = run(
        &mut session,
        &[
            json!({"op": "set_value", "field_id": "method", "value": "Phone"}),
            json!({"op": "view"}),
            json!({"op": "submit"}),
            json!({"op": "set_value", "field_id": "phone", "value": "300 1234567"}),
            json!({"op": "submit"}),
            json!({"op": "schema"}),
        ],
    );

    let view = &responses[1]["data"];
    assert_eq!(view["show_errors"], false);
    let widgets: Vec<_> = view["sections"][0]["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["widget"]["widget"].clone())
        .collect();
    assert_eq!(widgets, vec![json!("radio_group"), json!("phone_input")]);

    assert_eq!(responses[2]["data"]["accepted"], false);
    assert_eq!(responses[3]["data"]["value"], "+923001234567");
    assert_eq!(
        responses[4]["data"]["record"],
        json!({"method": "Phone", "phone": "+923001234567"})
    );
    assert_eq!(responses[5]["data"], snapshot());
}

#[test]
fn test_host_reports_generated_ids() {
    let mut session = FormSession::default();
    let responses = run(&mut session, &[json!({"op": "add_section"})]);

    let id = responses[0]["data"]["action"]["id"].as_str().unwrap();
    assert_eq!(session.schema().sections[0].id.as_str(), id);
}

// =============================================================================
// Snapshot Loading Tests
// =============================================================================

#[test]
fn test_load_schema_rejects_duplicate_ids() {
    let mut bad = snapshot();
    bad["sections"][0]["fields"][1]["id"] = json!("method");
    let file = write_temp(&bad);

    let err = load_schema(file.path()).unwrap_err();
    assert_eq!(err.code_str(), "FORM_CLI_SCHEMA_ERROR");
}

#[test]
fn test_submit_values_from_files() {
    let schema = write_temp(&snapshot());
    let values = write_temp(&json!({"method": "Email", "email": "ada@example.com"}));

    let preview = submit_values(schema.path(), values.path(), FormConfig::default()).unwrap();
    let parsed: Value = serde_json::from_str(&preview).unwrap();
    assert_eq!(parsed, json!({"method": "Email", "email": "ada@example.com"}));
}

#[test]
fn test_submit_values_rejects_missing_required() {
    let schema = write_temp(&snapshot());
    let values = write_temp(&json!({"method": "Phone"}));

    let err = submit_values(schema.path(), values.path(), FormConfig::default()).unwrap_err();
    assert_eq!(err.code_str(), "FORM_CLI_SUBMIT_REJECTED");
    assert!(err.message().contains("phone"));
}

#[test]
fn test_submit_values_rejects_unknown_field() {
    let schema = write_temp(&snapshot());
    let values = write_temp(&json!({"fax": "123"}));

    let err = submit_values(schema.path(), values.path(), FormConfig::default()).unwrap_err();
    assert_eq!(err.code_str(), "FORM_CLI_UNKNOWN_FIELD");
}
