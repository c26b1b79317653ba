//! Criterion-driven structural comparison of specifications.
//!
//! Diffs are directional: `left` values come from the receiver, `right`
//! from the argument. Identical inputs give `None` at every level.

pub mod criterion;
pub mod entities;
pub mod model;

pub use criterion::{
    word_chars_downcase, CollectionCriterion, Comparator, Criterion, Diff, EntryCriterion,
    ValueCriterion, ValueExtractor,
};
pub use entities::EmbeddedTypeCriterion;
pub use model::{CollectionDiff, DiffOptions, Difference, EntryDiff, Scalar, ValueDiff};
