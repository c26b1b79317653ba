//! MDES Store - locating, loading and caching MDES source documents
//!
//! Provides:
//! - Per-version schema and auxiliary document locations
//! - YAML loaders for disposition codes, heuristic overrides and the
//!   child/parent instrument table lists
//! - One-call reading of a resolved specification
//! - A per-version cache of resolved specifications

pub mod cache;
pub mod documents;
pub mod errors;
pub mod reader;
pub mod source_documents;

// Re-export key types
pub use cache::SpecificationCache;
pub use errors::Result;
pub use reader::read_specification;
pub use source_documents::SourceDocuments;
