//! dynaform - a dynamic form builder core
//!
//! A builder assembles sections and fields into a schema; the interpreter
//! reflects that schema into a live form with conditional visibility,
//! required-field validation, per-kind input descriptors and all-or-nothing
//! submission.

pub mod cli;
pub mod config;
pub mod form;
pub mod observability;
pub mod schema;
pub mod session;
