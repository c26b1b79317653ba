//! Multi-pass linker turning the raw schema into a resolved graph.
//!
//! ## Passes
//!
//! 1. [`types`]: by-name type references are replaced by the shared named type.
//! 2. [`foreign_keys`]: foreign-key variables are linked to parent tables.
//!    Needs pass 1 done for every table, since candidates are recognized
//!    by their resolved primary-key type.
//! 3. [`classify`]: child/parent instrument lists are applied; the
//!    instrument/operational split is computed from the finished graph.
//!
//! Each pass runs to completion over all tables before the next starts.
//! Anomalies go to the warning sink; no pass fails.

pub mod classify;
pub mod foreign_keys;
pub mod types;

use std::sync::Arc;
use std::time::Instant;

use crate::model::{HeuristicOverrides, InstrumentTableClassification, Table, VariableType};
use crate::warnings::WarningSink;
use crate::{log_op_end, log_op_start};

pub use classify::{apply_instrument_classification, TableGraph};
pub use foreign_keys::{resolve_foreign_key, resolve_foreign_keys, ForeignKeyOutcome};
pub use types::{resolve_type, resolve_types, TypeIndex};

/// Counts gathered while resolving, mostly for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionSummary {
    pub unresolved_type_references: usize,
    pub linked_foreign_keys: usize,
    pub classified_tables: usize,
    pub instrument_tables: usize,
}

/// Runs the three passes in order.
pub fn resolve(
    tables: &mut [Table],
    types: &[Arc<VariableType>],
    overrides: &HeuristicOverrides,
    classification: Option<&InstrumentTableClassification>,
    sink: &dyn WarningSink,
) -> ResolutionSummary {
    let start = Instant::now();
    log_op_start!("resolve", table_count = tables.len(), type_count = types.len());

    let unresolved_type_references = resolve_types(tables, types, sink);
    let linked_foreign_keys = resolve_foreign_keys(tables, overrides, sink);
    let classified_tables = classification
        .map(|c| apply_instrument_classification(tables, c, sink))
        .unwrap_or(0);
    let instrument_tables = TableGraph::new(tables).instrument_table_names().len();

    let summary = ResolutionSummary {
        unresolved_type_references,
        linked_foreign_keys,
        classified_tables,
        instrument_tables,
    };

    log_op_end!(
        "resolve",
        duration_ms = start.elapsed().as_millis() as u64,
        unresolved_type_references = summary.unresolved_type_references,
        linked_foreign_keys = summary.linked_foreign_keys,
        instrument_tables = summary.instrument_tables
    );
    summary
}
