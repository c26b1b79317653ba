use super::variable::Variable;

/// Name of the operational table that records instrument executions.
pub const INSTRUMENT_TABLE_NAME: &str = "instrument";

/// Variable that only primary instrument tables carry.
pub const INSTRUMENT_VERSION_VARIABLE: &str = "instrument_version";

/// One transmission table in the MDES.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Machine name; also the element name in a VDR export
    pub name: String,

    /// In schema order
    pub variables: Vec<Variable>,

    /// Whether the table's `p_id` holds a child's id (`Some(true)`), a
    /// parent's (`Some(false)`), or is not known (`None`).
    pub child_instrument_table: Option<bool>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            child_instrument_table: None,
        }
    }

    pub fn with_variables(mut self, variables: Vec<Variable>) -> Self {
        self.variables = variables;
        self
    }

    /// Looks a variable up by name.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn variable_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.variables.iter_mut().find(|v| v.name == name)
    }

    /// A table storing the single-valued responses of one instrument
    /// execution, which every other table of that instrument refers to.
    pub fn is_primary_instrument_table(&self) -> bool {
        self.name != INSTRUMENT_TABLE_NAME && self.variable(INSTRUMENT_VERSION_VARIABLE).is_some()
    }

    /// The negation of [`child_instrument_table`](Self::child_instrument_table),
    /// unknown when that is unknown.
    pub fn parent_instrument_table(&self) -> Option<bool> {
        self.child_instrument_table.map(|child| !child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_instrument_table() {
        let t = Table::new("pre_preg").with_variables(vec![Variable::new(
            INSTRUMENT_VERSION_VARIABLE,
        )]);
        assert!(t.is_primary_instrument_table());
    }

    #[test]
    fn test_instrument_table_itself_is_not_primary() {
        let t = Table::new(INSTRUMENT_TABLE_NAME)
            .with_variables(vec![Variable::new(INSTRUMENT_VERSION_VARIABLE)]);
        assert!(!t.is_primary_instrument_table());
    }

    #[test]
    fn test_parent_instrument_table_tristate() {
        let mut t = Table::new("t");
        assert_eq!(t.parent_instrument_table(), None);
        t.child_instrument_table = Some(true);
        assert_eq!(t.parent_instrument_table(), Some(false));
        t.child_instrument_table = Some(false);
        assert_eq!(t.parent_instrument_table(), Some(true));
    }

    #[test]
    fn test_variable_lookup() {
        let t = Table::new("t").with_variables(vec![Variable::new("a"), Variable::new("b")]);
        assert_eq!(t.variable("b").map(|v| v.name.as_str()), Some("b"));
        assert!(t.variable("c").is_none());
    }
}
