//! Hand-maintained data layered over the schema's own information.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Explicit foreign-key mapping for one variable.
///
/// Written in YAML as a table name, or as `false` to switch the heuristic
/// off for that variable without naming a replacement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawForeignKeyOverride")]
pub enum ForeignKeyOverride {
    Table(String),
    Suppress,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawForeignKeyOverride {
    Table(String),
    Flag(bool),
}

impl TryFrom<RawForeignKeyOverride> for ForeignKeyOverride {
    type Error = String;

    fn try_from(raw: RawForeignKeyOverride) -> Result<Self, Self::Error> {
        match raw {
            RawForeignKeyOverride::Table(name) => Ok(ForeignKeyOverride::Table(name)),
            RawForeignKeyOverride::Flag(false) => Ok(ForeignKeyOverride::Suppress),
            RawForeignKeyOverride::Flag(true) => Err(
                "a foreign key override must be a table name or false".to_string(),
            ),
        }
    }
}

/// What the resolver should do for one (table, variable) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKeyResolution<'a> {
    /// No override; apply the naming heuristic.
    Absent,
    /// Leave the variable unresolved, silently.
    Suppress,
    /// Use this table.
    Table(&'a str),
}

type PerTable<T> = BTreeMap<String, BTreeMap<String, T>>;

/// Overrides for cases the schema alone resolves wrongly or not at all.
///
/// A null at any level (`staff_id: ~`, `link_contact:` with no body) is the
/// same as leaving the entry out.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct HeuristicOverrides {
    /// table name -> variable name -> override
    #[serde(deserialize_with = "per_table_without_nulls")]
    pub foreign_keys: PerTable<ForeignKeyOverride>,

    /// table name -> variable name -> type name used instead of the declared one
    #[serde(deserialize_with = "per_table_without_nulls")]
    pub variable_type_references: PerTable<String>,
}

fn per_table_without_nulls<'de, D, T>(deserializer: D) -> Result<PerTable<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let raw: Option<BTreeMap<String, Option<BTreeMap<String, Option<T>>>>> =
        Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(table, variables)| {
            let variables = variables
                .unwrap_or_default()
                .into_iter()
                .filter_map(|(name, value)| value.map(|v| (name, v)))
                .collect();
            (table, variables)
        })
        .collect())
}

impl HeuristicOverrides {
    pub fn foreign_key(&self, table: &str, variable: &str) -> ForeignKeyResolution<'_> {
        match self.foreign_keys.get(table).and_then(|vars| vars.get(variable)) {
            None => ForeignKeyResolution::Absent,
            Some(ForeignKeyOverride::Suppress) => ForeignKeyResolution::Suppress,
            Some(ForeignKeyOverride::Table(name)) => ForeignKeyResolution::Table(name),
        }
    }

    pub fn variable_type_reference(&self, table: &str, variable: &str) -> Option<&str> {
        self.variable_type_references
            .get(table)
            .and_then(|vars| vars.get(variable))
            .map(String::as_str)
    }
}

/// Which instrument tables record a child's `p_id` and which a parent's.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct InstrumentTableClassification {
    pub child_instrument_tables: Vec<String>,
    pub parent_instrument_tables: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides() -> HeuristicOverrides {
        serde_json::from_str(
            r#"{
                "foreign_keys": {
                    "spec_blood": {"equip_id": "spec_equipment", "staff_id": false}
                },
                "variable_type_references": {
                    "person": {"person_dob": "ncs:date_type"}
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_foreign_key_tristate() {
        let o = overrides();
        assert_eq!(
            o.foreign_key("spec_blood", "equip_id"),
            ForeignKeyResolution::Table("spec_equipment")
        );
        assert_eq!(
            o.foreign_key("spec_blood", "staff_id"),
            ForeignKeyResolution::Suppress
        );
        assert_eq!(
            o.foreign_key("spec_blood", "other"),
            ForeignKeyResolution::Absent
        );
        assert_eq!(o.foreign_key("nowhere", "equip_id"), ForeignKeyResolution::Absent);
    }

    #[test]
    fn test_true_is_not_a_foreign_key_override() {
        let result: Result<HeuristicOverrides, _> =
            serde_json::from_str(r#"{"foreign_keys": {"t": {"v": true}}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let o: HeuristicOverrides = serde_json::from_str("{}").unwrap();
        assert_eq!(o, HeuristicOverrides::default());
        assert_eq!(o.variable_type_reference("person", "person_dob"), None);
    }

    #[test]
    fn test_null_entries_are_absent() {
        let o: HeuristicOverrides = serde_json::from_str(
            r#"{
                "foreign_keys": {"link_contact": {"staff_id": null}, "staff": null},
                "variable_type_references": {"person": {"person_dob": null}}
            }"#,
        )
        .unwrap();
        assert_eq!(o.foreign_key("link_contact", "staff_id"), ForeignKeyResolution::Absent);
        assert_eq!(o.foreign_key("staff", "staff_id"), ForeignKeyResolution::Absent);
        assert_eq!(o.variable_type_reference("person", "person_dob"), None);
    }

    #[test]
    fn test_variable_type_reference_lookup() {
        assert_eq!(
            overrides().variable_type_reference("person", "person_dob"),
            Some("ncs:date_type")
        );
    }
}
