#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use mdes_core::errors::{ExErrorKind, MdesError};
use mdes_core::logging_facility::test_capture::init_test_capture;
use mdes_core::{log_op_end, log_op_error, log_op_start};
use mdes_core::{DiffOptions, Specification, TracingSink, WarningSink};
use mdes_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_SEVERE, EVENT_START, EVENT_WARNING, FIELD_DURATION_MS,
    FIELD_ERR_CODE, FIELD_ERR_KIND, FIELD_VERSION,
};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    let start_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_START))
        .collect();
    assert!(
        !start_events.is_empty(),
        "Should have captured at least one start event"
    );
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .collect();
    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].field(FIELD_DURATION_MS), Some("42"));
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = MdesError::UnsupportedVersion {
        version: "1.0".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let error_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();
    assert_eq!(error_events.len(), 1);

    let event = error_events[0].clone();
    assert_eq!(
        event.field(FIELD_ERR_KIND),
        Some(format!("{:?}", ExErrorKind::UnsupportedVersion).as_str())
    );
    assert_eq!(
        event.field(FIELD_ERR_CODE),
        Some("ERR_UNSUPPORTED_VERSION")
    );
}

#[test]
fn test_tracing_sink_emits_warning_events() {
    let capture = init_test_capture();

    TracingSink.warn("tracing sink warning unique_4");
    TracingSink.severe("tracing sink severe unique_4");

    assert!(capture
        .messages_for_event(EVENT_WARNING)
        .contains(&"tracing sink warning unique_4".to_string()));
    assert!(capture
        .messages_for_event(EVENT_SEVERE)
        .contains(&"tracing sink severe unique_4".to_string()));
}

#[test]
fn test_build_logs_start_and_end() {
    let capture = init_test_capture();
    let xsd = common::transmission_tables(&common::table("t", &[]), "");

    let spec = Specification::builder("logging-unique-5")
        .build_from_str(&xsd, &TracingSink)
        .unwrap();

    let ours = |event: &str| {
        capture.count_events(|e| {
            e.op.as_deref() == Some("build_specification")
                && e.event.as_deref() == Some(event)
                && e.field(FIELD_VERSION) == Some("logging-unique-5")
        })
    };
    assert_eq!(ours(EVENT_START), 1);
    assert_eq!(ours(EVENT_END), 1);

    spec.diff(&spec.clone(), &DiffOptions::default());
    capture.assert_event_exists("diff_specifications", EVENT_END);
}

#[test]
fn test_missing_container_logs_warning_not_error() {
    let capture = init_test_capture();
    let xsd = common::schema("<xs:element name=\"unique_6\"/>");

    let spec = Specification::builder("logging-unique-6")
        .build_from_str(&xsd, &TracingSink)
        .unwrap();

    assert!(spec.transmission_tables().is_empty());
    assert!(capture
        .messages_for_event(EVENT_WARNING)
        .iter()
        .any(|m| m.contains("transmission_tables")));
    let ends = capture.count_events(|e| {
        e.op.as_deref() == Some("build_specification")
            && e.event.as_deref() == Some(EVENT_END)
            && e.field(FIELD_VERSION) == Some("logging-unique-6")
    });
    assert_eq!(ends, 1);
}

#[test]
fn test_malformed_schema_logs_error() {
    let capture = init_test_capture();

    let err = Specification::builder("logging-unique-7")
        .build_from_str("<xs:schema", &TracingSink)
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidSchema);
    let errors = capture.count_events(|e| {
        e.op.as_deref() == Some("build_specification")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field(FIELD_ERR_CODE) == Some("ERR_INVALID_SCHEMA")
            && e.field(FIELD_VERSION) == Some("logging-unique-7")
    });
    assert_eq!(errors, 1);
}
