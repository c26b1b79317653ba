//! Pass 2: link foreign-key variables to their parent tables.
//!
//! Candidate matching looks at other tables' resolved primary-key types,
//! so this must only run once pass 1 has finished for every table.

use std::collections::HashMap;

use crate::model::{ForeignKeyResolution, HeuristicOverrides, Table, Variable};
use crate::warnings::WarningSink;

const FOREIGN_KEY_TYPE_PREFIX: &str = "foreignKey";
const PRIMARY_KEY_TYPE_PREFIX: &str = "primaryKey";
const UNSPECIFIED_TABLE: &str = "[unspecified table]";

/// Effect of resolving one variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForeignKeyOutcome {
    /// Point the variable at this table.
    Linked(String),
    /// An explicit mapping named a table that does not exist.
    Cleared,
    /// Leave `table_reference` as it is.
    Unchanged,
}

impl ForeignKeyOutcome {
    pub fn apply_to(self, variable: &mut Variable) {
        match self {
            ForeignKeyOutcome::Linked(table) => variable.table_reference = Some(table),
            ForeignKeyOutcome::Cleared => variable.table_reference = None,
            ForeignKeyOutcome::Unchanged => {}
        }
    }
}

/// Tables declaring a primary key, by primary key variable name, in
/// table order.
pub struct PrimaryKeyIndex<'a> {
    tables: &'a [Table],
    by_variable: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> PrimaryKeyIndex<'a> {
    pub fn new(tables: &'a [Table]) -> Self {
        let mut by_variable: HashMap<&str, Vec<&str>> = HashMap::new();
        for table in tables {
            let mut seen_here = Vec::new();
            for v in &table.variables {
                let is_primary_key = v
                    .type_name()
                    .is_some_and(|n| n.starts_with(PRIMARY_KEY_TYPE_PREFIX));
                if is_primary_key && !seen_here.contains(&v.name.as_str()) {
                    seen_here.push(v.name.as_str());
                    by_variable
                        .entry(v.name.as_str())
                        .or_default()
                        .push(table.name.as_str());
                }
            }
        }
        Self {
            tables,
            by_variable,
        }
    }

    /// Tables whose primary key is named `variable`.
    pub fn candidates(&self, variable: &str) -> &[&'a str] {
        self.by_variable
            .get(variable)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.iter().any(|t| t.name == name)
    }
}

/// Decides the parent table for one variable.
///
/// An explicit table override is looked up directly. A suppressing override
/// leaves the variable alone. Without an override, variables typed as
/// foreign keys are matched against tables whose primary key has the same
/// name; only a single candidate is used.
pub fn resolve_foreign_key(
    variable: &Variable,
    index: &PrimaryKeyIndex<'_>,
    resolution: ForeignKeyResolution<'_>,
    source_table: Option<&str>,
    sink: &dyn WarningSink,
) -> ForeignKeyOutcome {
    let source_table = source_table.unwrap_or(UNSPECIFIED_TABLE);

    match resolution {
        ForeignKeyResolution::Suppress => ForeignKeyOutcome::Unchanged,
        ForeignKeyResolution::Table(name) => {
            if index.has_table(name) {
                ForeignKeyOutcome::Linked(name.to_string())
            } else {
                sink.warn(&format!(
                    "Foreign key {:?} in {} explicitly mapped to unknown table {:?}.",
                    variable.name, source_table, name
                ));
                ForeignKeyOutcome::Cleared
            }
        }
        ForeignKeyResolution::Absent => {
            let is_foreign_key = variable
                .type_name()
                .is_some_and(|n| n.starts_with(FOREIGN_KEY_TYPE_PREFIX));
            if !is_foreign_key {
                return ForeignKeyOutcome::Unchanged;
            }

            match index.candidates(&variable.name) {
                [] => {
                    sink.warn(&format!(
                        "Foreign key in {} not resolvable: no tables have a primary key named {:?}.",
                        source_table, variable.name
                    ));
                    ForeignKeyOutcome::Unchanged
                }
                [only] => ForeignKeyOutcome::Linked(only.to_string()),
                many => {
                    let names = many
                        .iter()
                        .map(|n| format!("{:?}", n))
                        .collect::<Vec<_>>()
                        .join(", ");
                    sink.warn(&format!(
                        "{} possible parent tables found for foreign key {:?} in {}: {}. None used due to ambiguity.",
                        many.len(),
                        variable.name,
                        source_table,
                        names
                    ));
                    ForeignKeyOutcome::Unchanged
                }
            }
        }
    }
}

/// Runs [`resolve_foreign_key`] over every variable of every table.
///
/// Returns the number of variables linked to a parent table.
pub fn resolve_foreign_keys(
    tables: &mut [Table],
    overrides: &HeuristicOverrides,
    sink: &dyn WarningSink,
) -> usize {
    let outcomes: Vec<(usize, usize, ForeignKeyOutcome)> = {
        let index = PrimaryKeyIndex::new(tables);
        tables
            .iter()
            .enumerate()
            .flat_map(|(ti, table)| {
                let index = &index;
                table.variables.iter().enumerate().map(move |(vi, v)| {
                    let resolution = overrides.foreign_key(&table.name, &v.name);
                    let outcome =
                        resolve_foreign_key(v, index, resolution, Some(table.name.as_str()), sink);
                    (ti, vi, outcome)
                })
            })
            .collect()
    };

    let mut linked = 0;
    for (ti, vi, outcome) in outcomes {
        if matches!(outcome, ForeignKeyOutcome::Linked(_)) {
            linked += 1;
        }
        outcome.apply_to(&mut tables[ti].variables[vi]);
    }
    linked
}
