//! Observable events emitted while building and filling a form
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events in a form session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Host lifecycle
    /// Configuration loaded
    ConfigLoaded,
    /// Schema snapshot loaded
    SchemaLoaded,
    /// Host command loop ready
    SessionStarted,
    /// Host command loop finished
    SessionEnded,

    // Builder operations
    SectionAdded,
    SectionUpdated,
    SectionDeleted,
    FieldAdded,
    FieldUpdated,
    FieldDeleted,
    /// Action matched nothing; schema unchanged
    ActionIgnored,

    // Form input
    ValueChanged,
    ValueCleared,

    // Submission
    SubmitAccepted,
    SubmitRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::SessionStarted => "SESSION_STARTED",
            Event::SessionEnded => "SESSION_ENDED",

            Event::SectionAdded => "SECTION_ADDED",
            Event::SectionUpdated => "SECTION_UPDATED",
            Event::SectionDeleted => "SECTION_DELETED",
            Event::FieldAdded => "FIELD_ADDED",
            Event::FieldUpdated => "FIELD_UPDATED",
            Event::FieldDeleted => "FIELD_DELETED",
            Event::ActionIgnored => "ACTION_IGNORED",

            Event::ValueChanged => "VALUE_CHANGED",
            Event::ValueCleared => "VALUE_CLEARED",

            Event::SubmitAccepted => "SUBMIT_ACCEPTED",
            Event::SubmitRejected => "SUBMIT_REJECTED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ValueChanged | Event::ValueCleared | Event::ActionIgnored => Severity::Trace,
            Event::SubmitRejected => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
