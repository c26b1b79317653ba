//! The resolved, read-only view of one MDES version.

use std::sync::Arc;
use std::time::Instant;

use regex::Regex;

use crate::diff::{Diff, DiffOptions, EntryDiff};
use crate::errors::{MdesError, Result};
use crate::loader::load_schema;
use crate::model::{DispositionCode, HeuristicOverrides, InstrumentTableClassification, Table, VariableType};
use crate::resolve::{resolve, TableGraph};
use crate::warnings::WarningSink;
use crate::xsd::{parse_document, SchemaElement};
use crate::{log_op_end, log_op_error, log_op_start};

/// All tables, named types and disposition codes of one MDES version,
/// with every reference resolved.
///
/// Built once through [`SpecificationBuilder`]; nothing mutates it
/// afterwards, so it can be shared freely between readers.
#[derive(Debug, Clone)]
pub struct Specification {
    version: String,
    tables: Vec<Table>,
    types: Vec<Arc<VariableType>>,
    disposition_codes: Vec<DispositionCode>,
    heuristic_overrides: HeuristicOverrides,
}

/// Collects the optional inputs of a [`Specification`].
#[derive(Debug, Clone, Default)]
pub struct SpecificationBuilder {
    version: String,
    heuristic_overrides: HeuristicOverrides,
    classification: Option<InstrumentTableClassification>,
    disposition_codes: Vec<DispositionCode>,
}

impl SpecificationBuilder {
    pub fn with_heuristic_overrides(mut self, overrides: HeuristicOverrides) -> Self {
        self.heuristic_overrides = overrides;
        self
    }

    pub fn with_instrument_classification(mut self, classification: InstrumentTableClassification) -> Self {
        self.classification = Some(classification);
        self
    }

    pub fn with_disposition_codes(mut self, codes: Vec<DispositionCode>) -> Self {
        self.disposition_codes = codes;
        self
    }

    /// Loads the schema below `root` and runs every resolution pass.
    ///
    /// Never fails: data anomalies only produce warnings on `sink`.
    pub fn build<E: SchemaElement>(self, root: &E, sink: &dyn WarningSink) -> Specification {
        let start = Instant::now();
        log_op_start!("build_specification", mdes_version = %self.version);

        let raw = load_schema(root, &self.heuristic_overrides, sink);
        let mut tables = raw.tables;
        let types: Vec<Arc<VariableType>> = raw.types.into_iter().map(Arc::new).collect();
        resolve(
            &mut tables,
            &types,
            &self.heuristic_overrides,
            self.classification.as_ref(),
            sink,
        );

        log_op_end!(
            "build_specification",
            duration_ms = start.elapsed().as_millis() as u64,
            mdes_version = %self.version,
            table_count = tables.len(),
            type_count = types.len(),
            disposition_count = self.disposition_codes.len()
        );
        Specification {
            version: self.version,
            tables,
            types,
            disposition_codes: self.disposition_codes,
            heuristic_overrides: self.heuristic_overrides,
        }
    }

    /// Parses `xsd` and builds from its root element.
    ///
    /// # Errors
    ///
    /// `InvalidSchema` when `xsd` is not well-formed XML.
    pub fn build_from_str(self, xsd: &str, sink: &dyn WarningSink) -> Result<Specification> {
        let start = Instant::now();
        let document = match parse_document(xsd) {
            Ok(document) => document,
            Err(err) => {
                log_op_error!(
                    "build_specification",
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    mdes_version = %self.version
                );
                return Err(err.with_entity(self.version));
            }
        };
        Ok(self.build(&document.root_element(), sink))
    }
}

impl Specification {
    pub fn builder(version: impl Into<String>) -> SpecificationBuilder {
        SpecificationBuilder {
            version: version.into(),
            ..SpecificationBuilder::default()
        }
    }

    /// Assembles a specification from already-built parts. No resolution
    /// is run; the parts are taken as they are.
    pub fn from_parts(version: impl Into<String>, tables: Vec<Table>, types: Vec<Arc<VariableType>>) -> Self {
        Self {
            version: version.into(),
            tables,
            types,
            disposition_codes: Vec::new(),
            heuristic_overrides: HeuristicOverrides::default(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// In schema order
    pub fn transmission_tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Like [`table`](Self::table), for callers that treat absence as an error.
    ///
    /// # Errors
    ///
    /// `NotFound` naming the missing table.
    pub fn require_table(&self, name: &str) -> Result<&Table> {
        self.table(name).ok_or_else(|| {
            MdesError::TableNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Tables whose name satisfies `predicate`, in schema order.
    pub fn tables_matching<P>(&self, predicate: P) -> Vec<&Table>
    where
        P: Fn(&str) -> bool,
    {
        self.tables.iter().filter(|t| predicate(&t.name)).collect()
    }

    pub fn tables_matching_regex(&self, pattern: &Regex) -> Vec<&Table> {
        self.tables_matching(|name| pattern.is_match(name))
    }

    /// Every named type, in schema order.
    pub fn types(&self) -> &[Arc<VariableType>] {
        &self.types
    }

    pub fn named_type(&self, name: &str) -> Option<&Arc<VariableType>> {
        self.types.iter().find(|t| t.name() == Some(name))
    }

    pub fn disposition_codes(&self) -> &[DispositionCode] {
        &self.disposition_codes
    }

    pub fn heuristic_overrides(&self) -> &HeuristicOverrides {
        &self.heuristic_overrides
    }

    /// `None` when there is no table by that name.
    pub fn is_instrument_table(&self, name: &str) -> Option<bool> {
        let graph = TableGraph::new(&self.tables);
        graph.table(name).map(|t| graph.is_instrument_table(t))
    }

    /// `None` when there is no table by that name.
    pub fn is_operational_table(&self, name: &str) -> Option<bool> {
        self.is_instrument_table(name).map(|instrument| !instrument)
    }

    pub fn is_primary_instrument_table(&self, name: &str) -> Option<bool> {
        self.table(name).map(Table::is_primary_instrument_table)
    }

    pub fn instrument_tables(&self) -> Vec<&Table> {
        let graph = TableGraph::new(&self.tables);
        self.tables.iter().filter(|t| graph.is_instrument_table(t)).collect()
    }

    pub fn operational_tables(&self) -> Vec<&Table> {
        let graph = TableGraph::new(&self.tables);
        self.tables.iter().filter(|t| graph.is_operational_table(t)).collect()
    }

    /// Differences from `self` (left) to `other` (right), `None` when the
    /// two are equivalent under `options`.
    pub fn diff(&self, other: &Specification, options: &DiffOptions) -> Option<EntryDiff> {
        let start = Instant::now();
        log_op_start!(
            "diff_specifications",
            left = %self.version,
            right = %other.version,
            strict = options.strict
        );

        let result = Diff::diff(self, other, options);

        log_op_end!(
            "diff_specifications",
            duration_ms = start.elapsed().as_millis() as u64,
            changed_attributes = result.as_ref().map_or(0, EntryDiff::len)
        );
        result
    }
}
