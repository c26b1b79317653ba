//! Attribute tables for every diffable model type.
//!
//! Each table is built once per mode (strict and loose) and reused.

use std::sync::{Arc, OnceLock};

use super::criterion::{
    Comparator, CollectionCriterion, Criterion, Diff, EntryCriterion, ValueCriterion, ValueExtractor,
};
use super::model::{DiffOptions, Difference, EntryDiff, Scalar};
use crate::model::{CodeListEntry, Status, Table, Variable, VariableType};
use crate::specification::Specification;

struct Tables<E> {
    strict: OnceLock<EntryCriterion<E>>,
    loose: OnceLock<EntryCriterion<E>>,
}

impl<E: 'static> Tables<E> {
    const fn new() -> Self {
        Self {
            strict: OnceLock::new(),
            loose: OnceLock::new(),
        }
    }

    fn get(&self, options: &DiffOptions, build: fn(bool) -> EntryCriterion<E>) -> &EntryCriterion<E> {
        if options.strict {
            self.strict.get_or_init(|| build(true))
        } else {
            self.loose.get_or_init(|| build(false))
        }
    }
}

static CODE_LIST_ENTRY: Tables<CodeListEntry> = Tables::new();
static VARIABLE_TYPE: Tables<VariableType> = Tables::new();
static VARIABLE: Tables<Variable> = Tables::new();
static TABLE: Tables<Table> = Tables::new();
static SPECIFICATION: Tables<Specification> = Tables::new();

fn code_list_entry_criteria(strict: bool) -> EntryCriterion<CodeListEntry> {
    let criteria = EntryCriterion::new().value(
        "value",
        |e: &CodeListEntry| Scalar::text(e.value()),
        ValueCriterion::default(),
    );

    if strict {
        criteria
            .value("label", |e| Scalar::text(e.label.as_deref()), ValueCriterion::default())
            .value(
                "global_value",
                |e| Scalar::text(e.global_value.as_deref()),
                ValueCriterion::default(),
            )
            .value("master_cl", |e| Scalar::text(e.master_cl.as_deref()), ValueCriterion::default())
    } else {
        criteria.value("label", |e| Scalar::text(e.label.as_deref()), ValueCriterion::word_chars())
    }
}

fn code_list_entries(t: &VariableType) -> &[CodeListEntry] {
    t.code_list.as_ref().map(|list| list.entries()).unwrap_or_default()
}

fn variable_type_criteria(_strict: bool) -> EntryCriterion<VariableType> {
    EntryCriterion::new()
        .value("name", |t: &VariableType| Scalar::text(t.name()), ValueCriterion::default())
        .value("base_type", |t| Scalar::text(t.base_type.as_deref()), ValueCriterion::default())
        .value(
            "pattern",
            |t| Scalar::text(t.pattern.as_ref().map(|p| p.source())),
            ValueCriterion::default(),
        )
        .value("max_length", |t| Scalar::int(t.max_length), ValueCriterion::default())
        .value("min_length", |t| Scalar::int(t.min_length), ValueCriterion::default())
        .collection(
            "code_list_by_value",
            code_list_entries,
            CollectionCriterion::new(|e: &CodeListEntry| Scalar::text(e.value())),
        )
        .collection(
            "code_list_by_label",
            code_list_entries,
            CollectionCriterion::new(|e: &CodeListEntry| Scalar::text(e.label.as_deref()))
                .with_extractor(ValueExtractor::WordCharsDowncase),
        )
}

/// Lifecycle moves that the loose mode does not report.
fn status_churn(left: &Scalar, right: &Scalar) -> bool {
    use Status::*;
    match (left, right) {
        (Scalar::Status(l), Scalar::Status(r)) => matches!(
            (l, r),
            (New, Active) | (New, Modified) | (Active, Modified) | (Modified, Active)
        ),
        _ => false,
    }
}

fn variable_criteria(strict: bool) -> EntryCriterion<Variable> {
    let status = if strict {
        ValueCriterion::default()
    } else {
        ValueCriterion::new(
            Comparator::custom(|l, r| l == r || status_churn(l, r)),
            ValueExtractor::Identity,
        )
    };

    EntryCriterion::new()
        .value("name", |v: &Variable| Scalar::from(v.name.as_str()), ValueCriterion::default())
        .nested("type", |v: &Variable| &v.variable_type, EmbeddedTypeCriterion)
        .value("pii", |v| Scalar::Pii(v.pii.clone()), ValueCriterion::default())
        .value("omittable", |v| Scalar::Bool(v.omittable), ValueCriterion::predicate())
        .value("nillable", |v| Scalar::Bool(v.nillable), ValueCriterion::predicate())
        .value(
            "table_reference",
            |v| Scalar::text(v.table_reference.as_deref()),
            ValueCriterion::default(),
        )
        .value(
            "status",
            |v| v.status.clone().map_or(Scalar::Null, Scalar::Status),
            status,
        )
}

fn table_criteria(_strict: bool) -> EntryCriterion<Table> {
    EntryCriterion::new()
        .value("name", |t: &Table| Scalar::from(t.name.as_str()), ValueCriterion::default())
        .collection(
            "variables",
            |t: &Table| t.variables.as_slice(),
            CollectionCriterion::new(|v: &Variable| Scalar::from(v.name.as_str())),
        )
}

fn specification_criteria(_strict: bool) -> EntryCriterion<Specification> {
    EntryCriterion::new()
        .value(
            "specification_version",
            |s: &Specification| Scalar::from(s.version()),
            ValueCriterion::default(),
        )
        .collection(
            "transmission_tables",
            |s: &Specification| s.transmission_tables(),
            CollectionCriterion::new(|t: &Table| Scalar::from(t.name.as_str())),
        )
        .collection(
            "types",
            |s: &Specification| s.types(),
            CollectionCriterion::new(|t: &Arc<VariableType>| Scalar::text(t.name())),
        )
}

/// Compares a variable's type without re-diffing shared named types.
///
/// Two types with the same name are the same named type, so only the
/// specification-level `types` collection reports changes inside them.
/// Anything else gets a full type diff, with a missing side read as an
/// empty type.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedTypeCriterion;

impl Criterion<Option<Arc<VariableType>>> for EmbeddedTypeCriterion {
    fn apply(
        &self,
        left: &Option<Arc<VariableType>>,
        right: &Option<Arc<VariableType>>,
        options: &DiffOptions,
    ) -> Option<Difference> {
        let empty = VariableType::default();
        let left = left.as_deref().unwrap_or(&empty);
        let right = right.as_deref().unwrap_or(&empty);

        if let (Some(l), Some(r)) = (left.name(), right.name()) {
            if l == r {
                return None;
            }
        }
        left.diff(right, options).map(Difference::Entry)
    }
}

impl Diff for CodeListEntry {
    fn diff(&self, other: &Self, options: &DiffOptions) -> Option<EntryDiff> {
        CODE_LIST_ENTRY
            .get(options, code_list_entry_criteria)
            .compute(self, other, options)
    }
}

impl Diff for VariableType {
    fn diff(&self, other: &Self, options: &DiffOptions) -> Option<EntryDiff> {
        VARIABLE_TYPE
            .get(options, variable_type_criteria)
            .compute(self, other, options)
    }
}

impl Diff for Variable {
    fn diff(&self, other: &Self, options: &DiffOptions) -> Option<EntryDiff> {
        VARIABLE.get(options, variable_criteria).compute(self, other, options)
    }
}

impl Diff for Table {
    fn diff(&self, other: &Self, options: &DiffOptions) -> Option<EntryDiff> {
        TABLE.get(options, table_criteria).compute(self, other, options)
    }
}

impl Diff for Specification {
    fn diff(&self, other: &Self, options: &DiffOptions) -> Option<EntryDiff> {
        SPECIFICATION
            .get(options, specification_criteria)
            .compute(self, other, options)
    }
}
