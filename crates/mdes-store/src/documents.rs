//! YAML loaders for the per-version auxiliary documents.
//!
//! Each document has a required form, failing when the file cannot be
//! read, and an `_if_present` form for which a missing file means "no
//! data". An empty file is read as an empty document.

use std::fs;
use std::path::Path;
use std::time::Instant;

use mdes_core::{log_op_end, log_op_error, log_op_start};
use mdes_core::{DispositionCode, HeuristicOverrides, InstrumentTableClassification};
use serde::de::DeserializeOwned;

use crate::errors::{io_error, yaml_error, Result};

/// Parse a YAML document, treating a blank document as `T::default()`.
pub fn parse_yaml<T>(operation: &str, path: &Path, content: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if content.trim().is_empty() {
        return Ok(T::default());
    }
    serde_yaml::from_str(content).map_err(|e| yaml_error(operation, path, e))
}

fn read_yaml<T>(operation: &str, path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let start = Instant::now();
    log_op_start!(operation, path = %path.display());

    let result = fs::read_to_string(path)
        .map_err(|e| io_error(operation, path, e))
        .and_then(|content| parse_yaml(operation, path, &content));

    match &result {
        Ok(_) => {
            log_op_end!(operation, duration_ms = start.elapsed().as_millis() as u64);
        }
        Err(err) => {
            log_op_error!(
                operation,
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
        }
    }
    result
}

fn read_yaml_if_present<T>(operation: &str, path: &Path) -> Result<Option<T>>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        tracing::debug!(
            component = module_path!(),
            op = operation,
            path = %path.display(),
            "optional document absent"
        );
        return Ok(None);
    }
    read_yaml(operation, path).map(Some)
}

/// Reads the disposition codes list.
///
/// # Errors
///
/// `Io` when the file cannot be read; `Serialization` when it is not a
/// list of disposition code records.
pub fn load_disposition_codes(path: &Path) -> Result<Vec<DispositionCode>> {
    read_yaml("load_disposition_codes", path)
}

/// # Errors
///
/// Fails like [`load_disposition_codes`], except for a missing file.
pub fn load_disposition_codes_if_present(path: &Path) -> Result<Option<Vec<DispositionCode>>> {
    read_yaml_if_present("load_disposition_codes", path)
}

/// Reads the foreign key and type reference overrides.
///
/// # Errors
///
/// `Io` when the file cannot be read; `Serialization` when it is
/// malformed, including a foreign key override of `true`.
pub fn load_heuristic_overrides(path: &Path) -> Result<HeuristicOverrides> {
    read_yaml("load_heuristic_overrides", path)
}

/// # Errors
///
/// Fails like [`load_heuristic_overrides`], except for a missing file.
pub fn load_heuristic_overrides_if_present(path: &Path) -> Result<Option<HeuristicOverrides>> {
    read_yaml_if_present("load_heuristic_overrides", path)
}

/// Reads the child/parent instrument table lists.
///
/// # Errors
///
/// `Io` when the file cannot be read; `Serialization` when it is malformed.
pub fn load_instrument_table_classification(path: &Path) -> Result<InstrumentTableClassification> {
    read_yaml("load_instrument_table_classification", path)
}

/// # Errors
///
/// Fails like [`load_instrument_table_classification`], except for a
/// missing file.
pub fn load_instrument_table_classification_if_present(
    path: &Path,
) -> Result<Option<InstrumentTableClassification>> {
    read_yaml_if_present("load_instrument_table_classification", path)
}
