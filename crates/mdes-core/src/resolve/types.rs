//! Pass 1: replace by-name type references with the shared named type.

use std::collections::HashMap;
use std::sync::Arc;

use crate::model::{Table, Variable, VariableType};
use crate::warnings::WarningSink;

const NCS_PREFIX: &str = "ncs:";

/// Named types indexed by bare name. The first definition of a name wins.
pub struct TypeIndex<'a> {
    by_name: HashMap<&'a str, &'a Arc<VariableType>>,
}

impl<'a> TypeIndex<'a> {
    pub fn new(types: &'a [Arc<VariableType>]) -> Self {
        let mut by_name = HashMap::new();
        for t in types {
            if let Some(name) = t.name() {
                by_name.entry(name).or_insert(t);
            }
        }
        Self { by_name }
    }

    pub fn get(&self, name: &str) -> Option<&'a Arc<VariableType>> {
        self.by_name.get(name).copied()
    }
}

/// Resolves one variable's type if it is a reference.
///
/// Returns true when the reference was replaced. Unknown namespaces and
/// undefined names are warned about and leave the reference in place.
pub fn resolve_type(variable: &mut Variable, index: &TypeIndex<'_>, sink: &dyn WarningSink) -> bool {
    let Some(reference) = variable
        .variable_type
        .as_ref()
        .filter(|t| t.is_reference())
        .and_then(|t| t.name())
    else {
        return false;
    };

    if !reference.starts_with(NCS_PREFIX) {
        sink.warn(&format!(
            "Unknown reference namespace in type {:?} for {}",
            reference, variable.name
        ));
    }

    let bare = reference.strip_prefix(NCS_PREFIX).unwrap_or(reference);
    match index.get(bare) {
        Some(found) => {
            variable.variable_type = Some(Arc::clone(found));
            true
        }
        None => {
            sink.warn(&format!(
                "Undefined type {} for {}.",
                reference, variable.name
            ));
            false
        }
    }
}

/// Runs [`resolve_type`] over every variable of every table.
///
/// Returns how many references were left unresolved.
pub fn resolve_types(
    tables: &mut [Table],
    types: &[Arc<VariableType>],
    sink: &dyn WarningSink,
) -> usize {
    let index = TypeIndex::new(types);
    let mut unresolved = 0;
    for variable in tables.iter_mut().flat_map(|t| t.variables.iter_mut()) {
        let was_reference = variable
            .variable_type
            .as_ref()
            .is_some_and(|t| t.is_reference());
        if was_reference && !resolve_type(variable, &index, sink) {
            unresolved += 1;
        }
    }
    unresolved
}
