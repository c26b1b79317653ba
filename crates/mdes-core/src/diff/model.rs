//! Diff output types.
//!
//! "No difference" is always `None` at the call site, never an empty
//! container. Maps are `BTreeMap` so traversal order is deterministic.

use std::collections::BTreeMap;
use std::fmt;

use crate::model::{Pii, Status};

/// Comparison settings threaded through every criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiffOptions {
    /// Report every literal change, including label punctuation and
    /// lifecycle churn that the default mode tolerates.
    pub strict: bool,
}

impl DiffOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn loose() -> Self {
        Self { strict: false }
    }
}

/// A scalar attribute value as seen by a value criterion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Pii(Pii),
    Status(Status),
}

impl Scalar {
    pub fn text(value: Option<&str>) -> Self {
        value.map_or(Scalar::Null, |s| Scalar::Text(s.to_string()))
    }

    pub fn int(value: Option<i64>) -> Self {
        value.map_or(Scalar::Null, Scalar::Int)
    }

    /// Only null and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Scalar::Null | Scalar::Bool(false))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// String form used to align collection entries. Null aligns as "".
    pub fn to_key(&self) -> String {
        match self {
            Scalar::Null => String::new(),
            Scalar::Text(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Text(s) => f.write_str(s),
            Scalar::Pii(p) => write!(f, "{}", p),
            Scalar::Status(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

/// Two differing scalars. `left` always comes from the receiver side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueDiff {
    pub left: Scalar,
    pub right: Scalar,
}

/// Differences between two keyed collections.
///
/// Keys are the alignment values of the entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CollectionDiff {
    /// In left order
    pub left_only: Vec<String>,
    /// In right order
    pub right_only: Vec<String>,
    /// Entries present on both sides that differ
    pub entry_differences: BTreeMap<String, EntryDiff>,
}

impl CollectionDiff {
    pub fn is_empty(&self) -> bool {
        self.left_only.is_empty() && self.right_only.is_empty() && self.entry_differences.is_empty()
    }
}

/// Per-attribute differences between two entities.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntryDiff {
    pub attribute_differences: BTreeMap<String, Difference>,
}

impl EntryDiff {
    pub fn get(&self, attribute: &str) -> Option<&Difference> {
        self.attribute_differences.get(attribute)
    }

    pub fn len(&self) -> usize {
        self.attribute_differences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attribute_differences.is_empty()
    }

    /// Attribute names that differ, sorted.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.attribute_differences.keys().map(String::as_str)
    }
}

impl std::ops::Index<&str> for EntryDiff {
    type Output = Difference;

    fn index(&self, attribute: &str) -> &Difference {
        &self.attribute_differences[attribute]
    }
}

/// One attribute's difference.
#[derive(Debug, Clone, PartialEq)]
pub enum Difference {
    Value(ValueDiff),
    Collection(CollectionDiff),
    Entry(EntryDiff),
}

impl Difference {
    pub fn as_value(&self) -> Option<&ValueDiff> {
        match self {
            Difference::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&CollectionDiff> {
        match self {
            Difference::Collection(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_entry(&self) -> Option<&EntryDiff> {
        match self {
            Difference::Entry(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Scalar::Null.is_truthy());
        assert!(!Scalar::Bool(false).is_truthy());
        assert!(Scalar::Bool(true).is_truthy());
        assert!(Scalar::Text(String::new()).is_truthy());
        assert!(Scalar::Pii(Pii::No).is_truthy());
    }

    #[test]
    fn test_alignment_keys() {
        assert_eq!(Scalar::Null.to_key(), "");
        assert_eq!(Scalar::text(Some("a b")).to_key(), "a b");
        assert_eq!(Scalar::int(Some(4)).to_key(), "4");
        assert_eq!(Scalar::Status(Status::New).to_key(), "new");
    }

    #[test]
    fn test_default_options_are_loose() {
        assert_eq!(DiffOptions::default(), DiffOptions::loose());
        assert!(DiffOptions::strict().strict);
    }
}
