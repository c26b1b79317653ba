#![allow(clippy::unwrap_used, clippy::expect_used)]

use mdes_core::diff::{Comparator, ValueCriterion, ValueExtractor};
use mdes_core::errors::{ExError, ExErrorKind, MdesError};
use mdes_core::xsd::parse_document;

#[test]
fn test_unsupported_version_verifiable_by_kind() {
    let ex_err: ExError = MdesError::UnsupportedVersion {
        version: "3.0".to_string(),
    }
    .into();

    assert_eq!(ex_err.kind(), ExErrorKind::UnsupportedVersion);
    assert_eq!(ex_err.code(), "ERR_UNSUPPORTED_VERSION");
    assert_eq!(ex_err.entity(), Some("3.0"));
    assert_eq!(ex_err.op(), Some("source_documents"));
}

#[test]
fn test_restriction_base_carries_line() {
    let ex_err: ExError = MdesError::UnsupportedRestrictionBase { line: 12 }.into();

    assert_eq!(ex_err.kind(), ExErrorKind::UnsupportedRestrictionBase);
    assert_eq!(ex_err.line(), Some(12));
    assert_eq!(
        ex_err.message(),
        "Unsupported restriction base in simpleType on line 12"
    );
}

#[test]
fn test_unknown_comparator_is_invalid_criterion() {
    let err = "fuzzy".parse::<Comparator>().unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidCriterion);
    assert_eq!(err.code(), "ERR_INVALID_CRITERION");
    assert_eq!(
        err.candidates().unwrap(),
        &["equality".to_string(), "predicate".to_string()]
    );
}

#[test]
fn test_unknown_extractor_is_invalid_criterion() {
    let err = "soundex".parse::<ValueExtractor>().unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidCriterion);
    assert!(err.candidates().unwrap().contains(&"word_chars_downcase".to_string()));
}

#[test]
fn test_known_criterion_names() {
    assert!(ValueCriterion::from_names("equality", "identity").is_ok());
    assert!(ValueCriterion::from_names("predicate", "word_chars_downcase").is_ok());
}

#[test]
fn test_malformed_xml_is_invalid_schema() {
    let err = parse_document("<xs:schema><unclosed></xs:schema>").unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidSchema);
    assert_eq!(err.op(), Some("parse_document"));
    assert!(!err.message().is_empty());
}

#[test]
fn test_source_chain_in_display() {
    let inner = parse_document("<xs:schema").unwrap_err();
    let outer = ExError::new(ExErrorKind::Io)
        .with_op("read_specification")
        .with_message("could not build")
        .with_source(inner);

    let rendered = outer.to_string();
    assert!(rendered.starts_with("[ERR_IO] read_specification: could not build"));
    assert!(rendered.contains("; caused by [ERR_INVALID_SCHEMA]"));
    assert!(std::error::Error::source(&outer).is_some());
}
