//! Pass 3: instrument/operational and child/parent table classification.

use std::collections::{HashMap, HashSet};

use crate::model::{InstrumentTableClassification, Table};
use crate::warnings::WarningSink;

/// The table reference graph of one specification.
///
/// References form an arbitrary directed graph (cycles included), so the
/// instrument test walks it with an explicit call-chain stack.
pub struct TableGraph<'a> {
    tables: &'a [Table],
    by_name: HashMap<&'a str, &'a Table>,
}

impl<'a> TableGraph<'a> {
    pub fn new(tables: &'a [Table]) -> Self {
        let mut by_name = HashMap::new();
        for t in tables {
            by_name.entry(t.name.as_str()).or_insert(t);
        }
        Self { tables, by_name }
    }

    pub fn table(&self, name: &str) -> Option<&'a Table> {
        self.by_name.get(name).copied()
    }

    /// Is `table` used to store results from an instrument?
    ///
    /// True for a primary instrument table, and for any table one of whose
    /// variables references (at any depth) a primary instrument table.
    /// Reaching a table already on the current path counts as "no".
    pub fn is_instrument_table(&self, table: &Table) -> bool {
        let mut stack = Vec::new();
        self.instrument_with_stack(table, &mut stack)
    }

    /// Every table is exactly one of instrument or operational.
    pub fn is_operational_table(&self, table: &Table) -> bool {
        !self.is_instrument_table(table)
    }

    fn instrument_with_stack<'t>(&self, table: &'t Table, stack: &mut Vec<&'t str>) -> bool
    where
        'a: 't,
    {
        if stack.contains(&table.name.as_str()) {
            return false;
        }
        if table.is_primary_instrument_table() {
            return true;
        }

        stack.push(table.name.as_str());
        let found = table
            .variables
            .iter()
            .filter_map(|v| v.table_reference.as_deref())
            .filter_map(|name| self.table(name))
            .any(|parent| self.instrument_with_stack(parent, stack));
        stack.pop();
        found
    }

    /// Names of all instrument tables, in table order.
    pub fn instrument_table_names(&self) -> Vec<&'a str> {
        self.tables
            .iter()
            .filter(|t| self.is_instrument_table(t))
            .map(|t| t.name.as_str())
            .collect()
    }
}

/// Sets `child_instrument_table` from the child/parent lists.
///
/// Every name found in both lists is warned about once, whether or not a
/// table by that name exists, and is treated as a child table. Tables in
/// neither list are left as they are. Returns the number of tables
/// classified.
pub fn apply_instrument_classification(
    tables: &mut [Table],
    classification: &InstrumentTableClassification,
    sink: &dyn WarningSink,
) -> usize {
    let children: HashSet<String> = classification
        .child_instrument_tables
        .iter()
        .map(|n| n.to_lowercase())
        .collect();
    let parents: HashSet<String> = classification
        .parent_instrument_tables
        .iter()
        .map(|n| n.to_lowercase())
        .collect();

    let mut warned = HashSet::new();
    for name in &classification.child_instrument_tables {
        let key = name.to_lowercase();
        if parents.contains(&key) && warned.insert(key) {
            sink.warn(&format!(
                "Table {:?} is listed as both a child and a parent instrument table. Treating it as a child table.",
                name
            ));
        }
    }

    let mut classified = 0;
    for table in tables.iter_mut() {
        let key = table.name.to_lowercase();
        table.child_instrument_table = if children.contains(&key) {
            Some(true)
        } else if parents.contains(&key) {
            Some(false)
        } else {
            continue;
        };
        classified += 1;
    }
    classified
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::table::INSTRUMENT_VERSION_VARIABLE;
    use crate::model::Variable;
    use crate::warnings::CollectingSink;

    fn reference(name: &str, target: &str) -> Variable {
        let mut v = Variable::new(name);
        v.table_reference = Some(target.to_string());
        v
    }

    #[test]
    fn test_references_to_primary_instrument_tables_propagate() {
        let tables = vec![
            Table::new("pre_preg").with_variables(vec![Variable::new(INSTRUMENT_VERSION_VARIABLE)]),
            Table::new("pre_preg_race").with_variables(vec![reference("pre_preg_id", "pre_preg")]),
            Table::new("pre_preg_race_detail")
                .with_variables(vec![reference("race_id", "pre_preg_race")]),
            Table::new("person"),
        ];
        let graph = TableGraph::new(&tables);

        assert_eq!(
            graph.instrument_table_names(),
            vec!["pre_preg", "pre_preg_race", "pre_preg_race_detail"]
        );
        assert!(graph.is_operational_table(&tables[3]));
    }

    #[test]
    fn test_cycles_terminate_as_operational() {
        let tables = vec![
            Table::new("a").with_variables(vec![reference("b_id", "b")]),
            Table::new("b").with_variables(vec![reference("a_id", "a")]),
        ];
        let graph = TableGraph::new(&tables);

        assert!(!graph.is_instrument_table(&tables[0]));
        assert!(!graph.is_instrument_table(&tables[1]));
    }

    #[test]
    fn test_self_reference_terminates() {
        let tables = vec![Table::new("a").with_variables(vec![reference("parent_id", "a")])];
        let graph = TableGraph::new(&tables);

        assert!(graph.is_operational_table(&tables[0]));
    }

    #[test]
    fn test_cycle_with_exit_to_instrument_table() {
        let tables = vec![
            Table::new("a").with_variables(vec![reference("b_id", "b")]),
            Table::new("b").with_variables(vec![reference("a_id", "a"), reference("p_id", "p")]),
            Table::new("p").with_variables(vec![Variable::new(INSTRUMENT_VERSION_VARIABLE)]),
        ];
        let graph = TableGraph::new(&tables);

        assert!(graph.is_instrument_table(&tables[0]));
        assert!(graph.is_instrument_table(&tables[1]));
    }

    #[test]
    fn test_dangling_reference_is_ignored() {
        let tables = vec![Table::new("a").with_variables(vec![reference("x_id", "x")])];
        let graph = TableGraph::new(&tables);

        assert!(!graph.is_instrument_table(&tables[0]));
    }

    #[test]
    fn test_overlap_warns_without_matching_table() {
        let mut tables = vec![Table::new("kid")];
        let classification = InstrumentTableClassification {
            child_instrument_tables: vec!["kid".into(), "ghost".into(), "Ghost".into()],
            parent_instrument_tables: vec!["ghost".into()],
        };
        let sink = CollectingSink::new();

        let classified = apply_instrument_classification(&mut tables, &classification, &sink);

        assert_eq!(classified, 1);
        assert_eq!(tables[0].child_instrument_table, Some(true));
        assert_eq!(
            sink.messages(),
            vec!["Table \"ghost\" is listed as both a child and a parent instrument table. Treating it as a child table."]
        );
    }

    #[test]
    fn test_child_parent_lists() {
        let mut tables = vec![Table::new("kid"), Table::new("mom"), Table::new("both"), Table::new("none")];
        let classification = InstrumentTableClassification {
            child_instrument_tables: vec!["kid".into(), "both".into()],
            parent_instrument_tables: vec!["mom".into(), "both".into()],
        };
        let sink = CollectingSink::new();

        let classified = apply_instrument_classification(&mut tables, &classification, &sink);

        assert_eq!(classified, 3);
        assert_eq!(tables[0].child_instrument_table, Some(true));
        assert_eq!(tables[1].child_instrument_table, Some(false));
        assert_eq!(tables[2].child_instrument_table, Some(true));
        assert_eq!(tables[3].child_instrument_table, None);
        assert_eq!(
            sink.messages(),
            vec!["Table \"both\" is listed as both a child and a parent instrument table. Treating it as a child table."]
        );
    }
}
