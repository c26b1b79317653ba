//! Process-wide memo of resolved specifications.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use mdes_core::{Specification, WarningSink};

use crate::errors::{cache_poisoned, Result};
use crate::reader::read_specification;
use crate::source_documents::SourceDocuments;

/// Resolved specifications by version.
///
/// Each version is read and resolved at most once; later requests share
/// the same [`Arc`]. A failed read is not cached.
#[derive(Debug, Default)]
pub struct SpecificationCache {
    base: Option<PathBuf>,
    specifications: Mutex<HashMap<String, Arc<Specification>>>,
}

impl SpecificationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads standard-location documents from `base` instead of the
    /// environment's base directory.
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
            ..Self::default()
        }
    }

    /// The specification for a supported version, read on first request.
    ///
    /// # Errors
    ///
    /// `UnsupportedVersion` for an unknown version, and every error of
    /// [`read_specification`].
    pub fn get(&self, version: &str, sink: &dyn WarningSink) -> Result<Arc<Specification>> {
        if let Some(found) = self.cached(version)? {
            return Ok(found);
        }
        let mut documents = SourceDocuments::get(version)?;
        if let Some(base) = &self.base {
            documents = documents.with_base(base.clone());
        }
        self.load(&documents, sink)
    }

    /// The specification for `documents.version()`, read from `documents`
    /// unless that version is already cached.
    ///
    /// # Errors
    ///
    /// Every error of [`read_specification`].
    pub fn load(&self, documents: &SourceDocuments, sink: &dyn WarningSink) -> Result<Arc<Specification>> {
        let version = documents.version();
        let mut specifications = self
            .specifications
            .lock()
            .map_err(|_| cache_poisoned(version))?;

        if let Some(found) = specifications.get(version) {
            return Ok(Arc::clone(found));
        }

        let spec = Arc::new(read_specification(documents, sink)?);
        specifications.insert(version.to_string(), Arc::clone(&spec));
        Ok(spec)
    }

    fn cached(&self, version: &str) -> Result<Option<Arc<Specification>>> {
        let specifications = self
            .specifications
            .lock()
            .map_err(|_| cache_poisoned(version))?;
        Ok(specifications.get(version).cloned())
    }

    /// Versions currently cached, sorted.
    ///
    /// # Errors
    ///
    /// `Internal` when the cache lock is poisoned.
    pub fn versions(&self) -> Result<Vec<String>> {
        let specifications = self
            .specifications
            .lock()
            .map_err(|_| cache_poisoned("*"))?;
        let mut versions: Vec<String> = specifications.keys().cloned().collect();
        versions.sort();
        Ok(versions)
    }

    /// Drops every cached specification. Handles already given out stay valid.
    pub fn clear(&self) {
        if let Ok(mut specifications) = self.specifications.lock() {
            specifications.clear();
        }
    }
}
