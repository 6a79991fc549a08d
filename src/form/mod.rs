//! Form interpreter for dynaform
//!
//! Reads a schema plus the current input values and derives:
//! - which fields are visible (conditional rules)
//! - per-field validation state (required fields)
//! - render descriptors, one input affordance per visible field
//! - the output record on submission
//!
//! Every result is a pure function of `(schema, values)`; nothing is cached.

pub mod countries;
mod preview;
mod render;
mod submit;
mod validation;
mod value;
mod visibility;

pub use countries::Country;
pub use preview::preview;
pub use render::{
    render, ChoiceOption, FieldView, FormView, InputWidget, SectionView, SELECT_PLACEHOLDER,
};
pub use submit::{submit, OutputRecord, SubmissionRejected};
pub use validation::{validate, validate_field, FieldError};
pub use value::{FieldValue, FieldValues, FileRef, PhoneNumber, ValueError};
pub use visibility::{condition_satisfied, is_visible, visible_fields};
