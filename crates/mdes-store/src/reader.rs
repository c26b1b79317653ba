//! Reads and resolves the specification of one MDES version.

use std::fs;
use std::time::Instant;

use mdes_core::{log_op_end, log_op_error, log_op_start};
use mdes_core::{Specification, WarningSink};

use crate::documents::{
    load_disposition_codes_if_present, load_heuristic_overrides_if_present,
    load_instrument_table_classification_if_present,
};
use crate::errors::{io_error, Result};
use crate::source_documents::SourceDocuments;

/// Reads the schema and every present auxiliary document named by
/// `documents`, then builds the resolved specification.
///
/// # Errors
///
/// `Io` when the schema cannot be read, `Serialization` for a malformed
/// auxiliary document and `InvalidSchema` for malformed schema XML. Data
/// anomalies inside the schema only produce warnings on `sink`.
pub fn read_specification(documents: &SourceDocuments, sink: &dyn WarningSink) -> Result<Specification> {
    let start = Instant::now();
    let schema = documents.schema();
    log_op_start!(
        "read_specification",
        mdes_version = documents.version(),
        path = %schema.display()
    );

    let result = read(documents, sink);

    match &result {
        Ok(spec) => {
            log_op_end!(
                "read_specification",
                duration_ms = start.elapsed().as_millis() as u64,
                mdes_version = spec.version(),
                table_count = spec.transmission_tables().len()
            );
        }
        Err(err) => {
            log_op_error!(
                "read_specification",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
        }
    }
    result
}

fn read(documents: &SourceDocuments, sink: &dyn WarningSink) -> Result<Specification> {
    let schema = documents.schema();
    let xsd = fs::read_to_string(&schema).map_err(|e| io_error("read_specification", &schema, e))?;

    let mut builder = Specification::builder(documents.version());
    if let Some(overrides) = load_heuristic_overrides_if_present(&documents.heuristic_overrides())? {
        builder = builder.with_heuristic_overrides(overrides);
    }
    if let Some(classification) =
        load_instrument_table_classification_if_present(&documents.instrument_tables())?
    {
        builder = builder.with_instrument_classification(classification);
    }
    if let Some(codes) = load_disposition_codes_if_present(&documents.disposition_codes())? {
        builder = builder.with_disposition_codes(codes);
    }

    builder.build_from_str(&xsd, sink)
}
