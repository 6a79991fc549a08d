//! Schema store subsystem for dynaform
//!
//! Holds the form definition: ordered sections owning ordered fields.
//!
//! # Design Principles
//!
//! - The schema is a plain value; mutations return a new value
//! - Every operation is total: unknown identifiers leave the schema unchanged
//! - Identifiers are stable for the lifetime of the object
//! - Insertion order is display order

mod patch;
mod store;
mod types;

pub use patch::{FieldPatch, SectionPatch};
pub use store::{reduce, SchemaAction, SchemaStore};
pub use types::{Condition, Field, FieldId, FieldKind, FormSchema, Section, SectionId};
