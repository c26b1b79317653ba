//! Builds the raw, unresolved object graph from a schema tree.
//!
//! Nothing here looks beyond the element being read: variables keep
//! by-name type references and no foreign keys are linked. See
//! [`crate::resolve`] for the passes that do.

use std::sync::Arc;
use std::time::Instant;

use crate::errors::{MdesError, Result};
use crate::model::{
    CodeList, CodeListEntry, HeuristicOverrides, Pattern, Pii, Status, Table, Variable,
    VariableType,
};
use crate::warnings::WarningSink;
use crate::xsd::SchemaElement;
use crate::{log_op_end, log_op_start};

const XS_PREFIX: &str = "xs:";

/// Tables and named types straight out of the schema.
#[derive(Debug, Clone, Default)]
pub struct RawSchema {
    pub tables: Vec<Table>,
    pub types: Vec<VariableType>,
}

/// Reads every transmission table and every named simple type below `root`.
///
/// A schema without a `transmission_tables` element yields no tables and a
/// warning; its named types are still read.
pub fn load_schema<E: SchemaElement>(
    root: &E,
    overrides: &HeuristicOverrides,
    sink: &dyn WarningSink,
) -> RawSchema {
    let start = Instant::now();
    log_op_start!("load_schema");

    let has_container = root
        .descendant_elements()
        .iter()
        .any(|e| e.is_xs("element") && e.attr("name") == Some("transmission_tables"));
    if !has_container {
        sink.warn("Schema does not declare a transmission_tables element. No tables were loaded.");
    }

    let tables: Vec<Table> = root
        .transmission_table_elements()
        .iter()
        .map(|elt| load_table(elt, overrides, sink))
        .collect();
    let types = load_named_types(root, sink);

    log_op_end!(
        "load_schema",
        duration_ms = start.elapsed().as_millis() as u64,
        table_count = tables.len(),
        type_count = types.len()
    );
    RawSchema { tables, types }
}

/// Every `xs:simpleType[@name]` that can be represented.
pub fn load_named_types<E: SchemaElement>(root: &E, sink: &dyn WarningSink) -> Vec<VariableType> {
    root.named_simple_types()
        .iter()
        .filter_map(|st| load_simple_type(st, sink))
        .collect()
}

/// Builds a table from its `xs:element`.
pub fn load_table<E: SchemaElement>(
    element: &E,
    overrides: &HeuristicOverrides,
    sink: &dyn WarningSink,
) -> Table {
    let name = element.attr("name").unwrap_or_default();
    let variables = element
        .variable_elements()
        .iter()
        .map(|v| load_variable(v, Some(name), overrides, sink))
        .collect();
    Table::new(name).with_variables(variables)
}

/// Builds a variable from a field `xs:element`.
///
/// `table` is the owning table's name, used to find a type override.
pub fn load_variable<E: SchemaElement>(
    element: &E,
    table: Option<&str>,
    overrides: &HeuristicOverrides,
    sink: &dyn WarningSink,
) -> Variable {
    let mut variable = Variable::new(element.attr("name").unwrap_or_default());
    variable.nillable = element.attr("nillable") == Some("true");
    variable.omittable = element.attr("minOccurs") == Some("0");
    variable.pii = Pii::from_marker(element.attr("ncsdoc:pii"));
    variable.status = Status::from_marker(element.attr("ncsdoc:status"));
    variable.variable_type = type_for(element, &variable.name, table, overrides, sink).map(Arc::new);
    variable
}

fn type_for<E: SchemaElement>(
    element: &E,
    name: &str,
    table: Option<&str>,
    overrides: &HeuristicOverrides,
    sink: &dyn WarningSink,
) -> Option<VariableType> {
    let type_override = table.and_then(|t| overrides.variable_type_reference(t, name));

    if let Some(named) = type_override.or_else(|| element.attr("type")) {
        return Some(match named.strip_prefix(XS_PREFIX) {
            Some(builtin) => VariableType::xml_schema_type(builtin),
            None => VariableType::reference(named),
        });
    }

    if let Some(simple_type) = element.sole_simple_type_child() {
        return load_simple_type(&simple_type, sink);
    }

    sink.warn(&format!(
        "Could not determine a type for variable {:?} on line {}",
        name,
        element.line()
    ));
    None
}

/// Builds a type from an `xs:simpleType`, named or embedded.
///
/// Only `xs:string` restrictions are understood. Anything else drops the
/// whole type and is reported as severe.
pub fn load_simple_type<E: SchemaElement>(
    simple_type: &E,
    sink: &dyn WarningSink,
) -> Option<VariableType> {
    match build_simple_type(simple_type, sink) {
        Ok(vt) => Some(vt),
        Err(err) => {
            sink.severe(err.message());
            None
        }
    }
}

fn build_simple_type<E: SchemaElement>(
    simple_type: &E,
    sink: &dyn WarningSink,
) -> Result<VariableType> {
    let restriction = simple_type
        .xs_children("restriction")
        .into_iter()
        .find(|r| r.attr("base") == Some("xs:string"))
        .ok_or(MdesError::UnsupportedRestrictionBase {
            line: simple_type.line(),
        })?;

    let mut vt = VariableType {
        name: simple_type.attr("name").map(str::to_string),
        base_type: Some("string".to_string()),
        ..VariableType::default()
    };

    for facet in restriction.child_elements() {
        match facet.local_name() {
            "pattern" => vt.pattern = load_pattern(&facet, vt.name.as_deref(), sink),
            "maxLength" => vt.max_length = load_length(&facet, sink),
            "minLength" => vt.min_length = load_length(&facet, sink),
            "enumeration" => {
                let list = vt.code_list.get_or_insert_with(CodeList::new);
                list.push(load_code_list_entry(&facet, sink));
                apply_description(list, &facet, sink);
            }
            other => sink.warn(&format!(
                "Unsupported restriction element {:?} on line {}",
                other,
                facet.line()
            )),
        }
    }

    Ok(vt)
}

fn load_pattern<E: SchemaElement>(
    facet: &E,
    type_name: Option<&str>,
    sink: &dyn WarningSink,
) -> Option<Pattern> {
    let source = facet.attr("value").unwrap_or_default();
    match Pattern::new(source) {
        Ok(pattern) => Some(pattern),
        Err(_) => {
            let named = type_name
                .map(|n| format!(" {:?}", n))
                .unwrap_or_default();
            sink.warn(&format!(
                "Uncompilable pattern {:?} in simpleType{} on line {}",
                source,
                named,
                facet.line()
            ));
            None
        }
    }
}

fn load_length<E: SchemaElement>(facet: &E, sink: &dyn WarningSink) -> Option<i64> {
    let raw = facet.attr("value").unwrap_or_default();
    match raw.trim().parse() {
        Ok(length) => Some(length),
        Err(_) => {
            sink.warn(&format!(
                "Unparseable {} {:?} on line {}",
                facet.local_name(),
                raw,
                facet.line()
            ));
            None
        }
    }
}

/// The first entry with a non-blank `ncsdoc:desc` sets the list's
/// description; later entries must agree with it.
fn apply_description<E: SchemaElement>(list: &mut CodeList, facet: &E, sink: &dyn WarningSink) {
    let Some(desc) = facet
        .attr("ncsdoc:desc")
        .filter(|d| d.chars().any(|c| !c.is_whitespace()))
    else {
        return;
    };

    match list.description() {
        None => list.set_description(desc),
        Some(existing) if existing != desc => sink.warn(&format!(
            "Code list entry on line {} unexpectedly has a different desc from the first entry",
            facet.line()
        )),
        Some(_) => {}
    }
}

/// Builds a code list entry from an `xs:enumeration` facet.
pub fn load_code_list_entry<E: SchemaElement>(
    enumeration: &E,
    sink: &dyn WarningSink,
) -> CodeListEntry {
    let value = enumeration.attr("value");
    if value.is_none() {
        sink.warn(&format!(
            "Missing value for code list entry on line {}",
            enumeration.line()
        ));
    }

    let mut entry = CodeListEntry::new(value);
    entry.label = enumeration.attr("ncsdoc:label").map(str::to_string);
    entry.global_value = enumeration.attr("ncsdoc:global_value").map(str::to_string);
    entry.master_cl = enumeration.attr("ncsdoc:master_cl").map(str::to_string);
    entry
}
