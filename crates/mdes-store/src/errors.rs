//! Error handling for mdes-store
//!
//! Wraps mdes-core ExError with store-specific helpers

use std::path::Path;

use mdes_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error for a document path
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation)
        .with_entity(path.display().to_string())
        .with_message(format!("Failed to read {}: {}", path.display(), err))
}

/// Create a YAML parse error for a document path
pub fn yaml_error(operation: &str, path: &Path, err: serde_yaml::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation)
        .with_entity(path.display().to_string())
        .with_message(format!("YAML parse error in {}: {}", path.display(), err))
}

/// Create an error for a cache whose lock was poisoned by a panicking reader
pub fn cache_poisoned(version: &str) -> ExError {
    ExError::new(ExErrorKind::Internal)
        .with_op("specification_cache")
        .with_entity(version)
        .with_message("Specification cache lock poisoned")
}
