//! Where the documents describing one MDES version live on this system.

use std::path::{Path, PathBuf};

use mdes_core::errors::{ExError, MdesError};
use mdes_core::log_op_error;

use crate::errors::Result;

/// Environment variable overriding [`DEFAULT_BASE`].
pub const BASE_ENV_VAR: &str = "NCS_MDES_DOCS_DIR";

pub const DEFAULT_BASE: &str = "/etc/nubic/ncs/mdes";

/// Versions with known document locations, oldest first.
pub const SUPPORTED_VERSIONS: &[&str] = &["1.2", "2.0"];

const DISPOSITION_CODES_FILE: &str = "disposition_codes.yml";
const HEURISTIC_OVERRIDES_FILE: &str = "heuristic_overrides.yml";
const INSTRUMENT_TABLES_FILE: &str = "child_or_parent_instrument_tables.yml";

/// Document locations for one MDES version.
///
/// Relative paths are interpreted against [`base`](Self::base); absolute
/// paths are used as given. Only the schema has to exist. The auxiliary
/// documents are optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocuments {
    version: String,
    base: PathBuf,
    schema: PathBuf,
    disposition_codes: PathBuf,
    heuristic_overrides: PathBuf,
    instrument_tables: PathBuf,
}

impl SourceDocuments {
    /// Standard locations for a supported version.
    ///
    /// # Errors
    ///
    /// `UnsupportedVersion` for anything not in [`SUPPORTED_VERSIONS`].
    pub fn get(version: &str) -> Result<Self> {
        let schema = match version {
            "1.2" => "1.2/Data_Transmission_Schema_V1.2.xsd",
            "2.0" => "2.0/NCS_Transmission_Schema_V2.0.00.00.xsd",
            _ => {
                let err = ExError::from(MdesError::UnsupportedVersion {
                    version: version.to_string(),
                })
                .with_candidates(SUPPORTED_VERSIONS.iter().map(|v| v.to_string()).collect());
                log_op_error!("source_documents", err.clone(), duration_ms = 0u64);
                return Err(err);
            }
        };
        Ok(Self::custom(version, schema))
    }

    /// Caller-chosen schema location; auxiliary documents default to
    /// `<version>/<name>.yml` under the base.
    pub fn custom(version: &str, schema: impl Into<PathBuf>) -> Self {
        let dir = PathBuf::from(version);
        Self {
            version: version.to_string(),
            base: base_from_env(),
            schema: schema.into(),
            disposition_codes: dir.join(DISPOSITION_CODES_FILE),
            heuristic_overrides: dir.join(HEURISTIC_OVERRIDES_FILE),
            instrument_tables: dir.join(INSTRUMENT_TABLES_FILE),
        }
    }

    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = base.into();
        self
    }

    pub fn with_schema(mut self, path: impl Into<PathBuf>) -> Self {
        self.schema = path.into();
        self
    }

    pub fn with_disposition_codes(mut self, path: impl Into<PathBuf>) -> Self {
        self.disposition_codes = path.into();
        self
    }

    pub fn with_heuristic_overrides(mut self, path: impl Into<PathBuf>) -> Self {
        self.heuristic_overrides = path.into();
        self
    }

    pub fn with_instrument_tables(mut self, path: impl Into<PathBuf>) -> Self {
        self.instrument_tables = path.into();
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// The transmission structure XML Schema.
    pub fn schema(&self) -> PathBuf {
        self.resolve(&self.schema)
    }

    pub fn disposition_codes(&self) -> PathBuf {
        self.resolve(&self.disposition_codes)
    }

    pub fn heuristic_overrides(&self) -> PathBuf {
        self.resolve(&self.heuristic_overrides)
    }

    /// The child/parent instrument table lists.
    pub fn instrument_tables(&self) -> PathBuf {
        self.resolve(&self.instrument_tables)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base.join(path)
        }
    }
}

fn base_from_env() -> PathBuf {
    std::env::var_os(BASE_ENV_VAR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BASE))
}
