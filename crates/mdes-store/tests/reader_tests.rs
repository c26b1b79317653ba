#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{fixture_base, fixture_documents};
use mdes_core::diff::Scalar;
use mdes_core::{CollectingSink, DiffOptions, ExErrorKind, NullSink, Status};
use mdes_store::{read_specification, SourceDocuments};

#[test]
fn test_reads_version_2_0_with_auxiliary_documents() {
    let sink = CollectingSink::new();
    let spec = read_specification(&fixture_documents("2.0"), &sink).unwrap();

    assert_eq!(spec.version(), "2.0");
    assert_eq!(spec.transmission_tables().len(), 7);
    assert_eq!(spec.disposition_codes().len(), 3);
    assert!(sink.is_empty(), "unexpected warnings: {:?}", sink.messages());

    let link = spec.table("link_contact").unwrap();
    assert_eq!(link.variable("staff_id").unwrap().table_reference.as_deref(), Some("staff"));
    assert_eq!(link.variable("provider_id").unwrap().table_reference, None);

    assert_eq!(
        spec.table("birth_visit_baby").unwrap().child_instrument_table,
        Some(true)
    );
    assert_eq!(
        spec.table("birth_visit").unwrap().parent_instrument_table(),
        Some(true)
    );
    assert_eq!(spec.is_instrument_table("birth_visit_baby"), Some(true));
    assert_eq!(spec.is_operational_table("participant"), Some(true));
}

#[test]
fn test_without_overrides_the_heuristic_warns() {
    let docs = fixture_documents("2.0").with_heuristic_overrides("/nonexistent/overrides.yml");
    let sink = CollectingSink::new();

    read_specification(&docs, &sink).unwrap();

    assert_eq!(
        sink.messages(),
        vec!["Foreign key in link_contact not resolvable: no tables have a primary key named \"provider_id\"."]
    );
}

#[test]
fn test_reads_version_1_2_without_auxiliary_documents() {
    let spec = read_specification(&fixture_documents("1.2"), &NullSink).unwrap();

    assert_eq!(spec.version(), "1.2");
    assert!(spec.disposition_codes().is_empty());
    assert_eq!(spec.is_primary_instrument_table("pre_preg"), Some(true));
    let fk = spec.table("pre_preg").unwrap().variable("person_id").unwrap();
    assert_eq!(fk.table_reference.as_deref(), Some("person"));
}

#[test]
fn test_missing_schema_is_io_error() {
    let docs = SourceDocuments::get("2.0").unwrap().with_base("/nonexistent/mdes");

    let err = read_specification(&docs, &NullSink).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Io);
    assert_eq!(
        err.entity(),
        Some("/nonexistent/mdes/2.0/NCS_Transmission_Schema_V2.0.00.00.xsd")
    );
}

#[test]
fn test_custom_schema_location() {
    let schema = fixture_base().join("1.2/Data_Transmission_Schema_V1.2.xsd");
    let docs = SourceDocuments::custom("1.2-local", schema).with_base(fixture_base());

    let spec = read_specification(&docs, &NullSink).unwrap();
    assert_eq!(spec.version(), "1.2-local");
}

#[test]
fn test_diff_between_fixture_versions() {
    let old = read_specification(&fixture_documents("1.2"), &NullSink).unwrap();
    let new = read_specification(&fixture_documents("2.0"), &NullSink).unwrap();

    let d = old.diff(&new, &DiffOptions::loose()).unwrap();

    let tables = d["transmission_tables"].as_collection().unwrap();
    assert_eq!(tables.left_only, vec!["pre_preg"]);
    assert_eq!(
        tables.right_only,
        vec!["staff", "participant", "link_contact", "birth_visit", "birth_visit_baby"]
    );

    let person = &tables.entry_differences["person"];
    let variables = person["variables"].as_collection().unwrap();
    assert_eq!(variables.right_only, vec!["p_tracing"]);
    let first_name = &variables.entry_differences["first_name"];
    assert!(first_name.get("status").is_none());
    let max_length = first_name["type"].as_entry().unwrap()["max_length"].as_value().unwrap();
    assert_eq!((max_length.left.clone(), max_length.right.clone()), (Scalar::Int(30), Scalar::Int(35)));

    let types = d["types"].as_collection().unwrap();
    assert_eq!(types.right_only, vec!["foreignKeyTypeOptional", "confirm_type_cl2"]);
    assert!(types.entry_differences.is_empty());
}

#[test]
fn test_strict_diff_sees_label_punctuation_and_status() {
    let old = read_specification(&fixture_documents("1.2"), &NullSink).unwrap();
    let new = read_specification(&fixture_documents("2.0"), &NullSink).unwrap();

    let d = old.diff(&new, &DiffOptions::strict()).unwrap();

    let types = d["types"].as_collection().unwrap();
    let study_center = &types.entry_differences["study_center_cl1"];
    let by_value = study_center["code_list_by_value"].as_collection().unwrap();
    let label = by_value.entry_differences["20000030"]["label"].as_value().unwrap();
    assert_eq!(label.right, Scalar::from("Children's Hospital of Philadelphia."));

    let tables = d["transmission_tables"].as_collection().unwrap();
    let variables = tables.entry_differences["person"]["variables"].as_collection().unwrap();
    let status = variables.entry_differences["first_name"]["status"].as_value().unwrap();
    assert_eq!(status.left, Scalar::Status(Status::Active));
    assert_eq!(status.right, Scalar::Status(Status::Modified));
}
