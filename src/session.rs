//! Form session: the single owned source of truth for one builder session
//!
//! Ties together the schema store, the live values, the last accepted
//! submission and whether a submit was attempted. Views are derived on
//! demand from this state and never stored.

use crate::config::FormConfig;
use crate::form::{self, FieldValue, FieldValues, FormView, OutputRecord, SubmissionRejected};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{FieldId, FormSchema, SchemaAction, SchemaStore};

#[derive(Debug, Clone, Default)]
pub struct FormSession {
    store: SchemaStore,
    values: FieldValues,
    last_submission: Option<OutputRecord>,
    submit_attempted: bool,
    config: FormConfig,
}

impl FormSession {
    pub fn new(config: FormConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_schema(schema: FormSchema, config: FormConfig) -> Self {
        Self {
            store: SchemaStore::from_schema(schema),
            config,
            ..Self::default()
        }
    }

    pub fn schema(&self) -> &FormSchema {
        self.store.schema()
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn submit_attempted(&self) -> bool {
        self.submit_attempted
    }

    pub fn last_submission(&self) -> Option<&OutputRecord> {
        self.last_submission.as_ref()
    }

    /// Applies a builder action; returns whether the schema changed.
    pub fn dispatch(&mut self, action: &SchemaAction) -> bool {
        self.store.dispatch(action)
    }

    pub fn set_value(&mut self, id: impl Into<FieldId>, value: FieldValue) {
        let id = id.into();
        log_event_with_fields(Event::ValueChanged, &[("field_id", id.as_str())]);
        self.values.set(id, value);
    }

    pub fn clear_value(&mut self, id: &FieldId) {
        if self.values.remove(id).is_some() {
            log_event_with_fields(Event::ValueCleared, &[("field_id", id.as_str())]);
        }
    }

    /// Current render descriptors. Errors are surfaced once a submit was attempted.
    pub fn view(&self) -> FormView {
        let mut view = form::render(self.schema(), &self.values, &self.config);
        view.show_errors = self.submit_attempted;
        view
    }

    /// Attempts submission; on success the record becomes the last submission.
    pub fn submit(&mut self) -> Result<&OutputRecord, SubmissionRejected> {
        self.submit_attempted = true;

        match form::submit(self.schema(), &self.values, &self.config.required_message) {
            Ok(record) => {
                let count = record.len().to_string();
                log_event_with_fields(Event::SubmitAccepted, &[("fields", count.as_str())]);
                Ok(&*self.last_submission.insert(record))
            }
            Err(rejected) => {
                let failing: Vec<&str> = rejected.failing_fields().map(FieldId::as_str).collect();
                let failing = failing.join(",");
                log_event_with_fields(Event::SubmitRejected, &[("failing", failing.as_str())]);
                Err(rejected)
            }
        }
    }

    /// Debug dump of the last accepted submission, `{}` if none
    pub fn preview(&self) -> String {
        match &self.last_submission {
            Some(record) => form::preview(record),
            None => "{}".to_string(),
        }
    }
}
