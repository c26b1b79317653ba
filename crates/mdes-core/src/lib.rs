//! MDES Core - reading and comparing NCS Master Data Element Specifications
//!
//! This crate turns the XML Schema form of one MDES version into a linked
//! object model and compares two such models, including:
//! - Tables, variables, types and code lists as read from the schema
//! - Multi-pass resolution of type references and foreign keys
//! - Cycle-safe instrument/operational table classification
//! - Criterion-driven structural diffs with strict and loose modes
//!
//! Locating and caching the schema documents of a version lives in
//! `mdes-store`.

pub mod diff;
pub mod errors;
pub mod loader;
pub mod logging_facility;
pub mod model;
pub mod resolve;
pub mod specification;
pub mod warnings;
pub mod xsd;

#[cfg(test)]
mod test_support;

// Used by the logging macros
pub use mdes_core_types;

// Re-export commonly used types
pub use diff::{DiffOptions, Difference, EntryDiff};
pub use errors::{ExError, ExErrorKind, MdesError, Result};
pub use model::{
    CodeList, CodeListEntry, DispositionCode, HeuristicOverrides, InstrumentTableClassification,
    Pii, Status, Table, Variable, VariableType,
};
pub use specification::{Specification, SpecificationBuilder};
pub use warnings::{CollectingSink, NullSink, TracingSink, WarningSink};
