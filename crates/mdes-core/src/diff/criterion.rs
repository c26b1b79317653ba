//! Criterion primitives: value, collection and entry comparison.
//!
//! An entity's diff is an [`EntryCriterion`], a table of named attributes
//! each paired with an accessor and the criterion that compares what the
//! accessor returns. Adding a compared attribute means adding a row.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::model::{CollectionDiff, DiffOptions, Difference, EntryDiff, Scalar, ValueDiff};
use crate::errors::{ExError, MdesError};

/// Compares one attribute value from each side.
pub trait Criterion<T: ?Sized> {
    /// `None` when the two sides are equivalent under this criterion.
    fn apply(&self, left: &T, right: &T, options: &DiffOptions) -> Option<Difference>;
}

/// Entities that know how to diff themselves.
pub trait Diff {
    fn diff(&self, other: &Self, options: &DiffOptions) -> Option<EntryDiff>;
}

impl<T: Diff> Diff for Arc<T> {
    fn diff(&self, other: &Self, options: &DiffOptions) -> Option<EntryDiff> {
        T::diff(self, other, options)
    }
}

type CompareFn = Arc<dyn Fn(&Scalar, &Scalar) -> bool + Send + Sync>;
type ExtractFn = Arc<dyn Fn(&Scalar) -> Scalar + Send + Sync>;

/// Decides whether two extracted values are equivalent.
#[derive(Clone)]
pub enum Comparator {
    /// Plain equality
    Equality,
    /// Both truthy or both falsy
    Predicate,
    Custom(CompareFn),
}

impl Comparator {
    pub fn custom<F>(compare: F) -> Self
    where
        F: Fn(&Scalar, &Scalar) -> bool + Send + Sync + 'static,
    {
        Comparator::Custom(Arc::new(compare))
    }

    pub fn equivalent(&self, left: &Scalar, right: &Scalar) -> bool {
        match self {
            Comparator::Equality => left == right,
            Comparator::Predicate => left.is_truthy() == right.is_truthy(),
            Comparator::Custom(compare) => compare(left, right),
        }
    }
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparator::Equality => f.write_str("Equality"),
            Comparator::Predicate => f.write_str("Predicate"),
            Comparator::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl FromStr for Comparator {
    type Err = ExError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "equality" => Ok(Comparator::Equality),
            "predicate" => Ok(Comparator::Predicate),
            _ => Err(MdesError::UnknownComparator {
                name: name.to_string(),
            }
            .into()),
        }
    }
}

/// Maps an attribute value to the value actually compared.
#[derive(Clone)]
pub enum ValueExtractor {
    Identity,
    /// See [`word_chars_downcase`]
    WordCharsDowncase,
    Custom(ExtractFn),
}

impl ValueExtractor {
    pub fn custom<F>(extract: F) -> Self
    where
        F: Fn(&Scalar) -> Scalar + Send + Sync + 'static,
    {
        ValueExtractor::Custom(Arc::new(extract))
    }

    pub fn extract(&self, value: &Scalar) -> Scalar {
        match self {
            ValueExtractor::Identity => value.clone(),
            ValueExtractor::WordCharsDowncase => match value {
                Scalar::Text(s) => Scalar::Text(word_chars_downcase(s)),
                other => other.clone(),
            },
            ValueExtractor::Custom(extract) => extract(value),
        }
    }
}

impl fmt::Debug for ValueExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueExtractor::Identity => f.write_str("Identity"),
            ValueExtractor::WordCharsDowncase => f.write_str("WordCharsDowncase"),
            ValueExtractor::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl FromStr for ValueExtractor {
    type Err = ExError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "identity" => Ok(ValueExtractor::Identity),
            "word_chars_downcase" => Ok(ValueExtractor::WordCharsDowncase),
            _ => Err(MdesError::UnknownValueExtractor {
                name: name.to_string(),
            }
            .into()),
        }
    }
}

/// Lowercases, drops everything but ASCII word characters and whitespace, then
/// collapses whitespace runs to one space and trims.
///
/// ```
/// use mdes_core::diff::word_chars_downcase;
/// assert_eq!(word_chars_downcase(" Aleph,\t\tB! "), "aleph b");
/// ```
pub fn word_chars_downcase(value: &str) -> String {
    let kept: String = value
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_ascii_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compares two scalars after running both through an extractor.
#[derive(Debug, Clone)]
pub struct ValueCriterion {
    pub comparator: Comparator,
    pub extractor: ValueExtractor,
}

impl Default for ValueCriterion {
    fn default() -> Self {
        Self {
            comparator: Comparator::Equality,
            extractor: ValueExtractor::Identity,
        }
    }
}

impl ValueCriterion {
    pub fn new(comparator: Comparator, extractor: ValueExtractor) -> Self {
        Self { comparator, extractor }
    }

    /// Builds a criterion from registered comparator and extractor names.
    ///
    /// # Errors
    ///
    /// Fails with `ERR_INVALID_CRITERION` when either name is unknown.
    pub fn from_names(comparator: &str, extractor: &str) -> crate::errors::Result<Self> {
        Ok(Self::new(comparator.parse()?, extractor.parse()?))
    }

    pub fn predicate() -> Self {
        Self::new(Comparator::Predicate, ValueExtractor::Identity)
    }

    pub fn word_chars() -> Self {
        Self::new(Comparator::Equality, ValueExtractor::WordCharsDowncase)
    }
}

impl Criterion<Scalar> for ValueCriterion {
    fn apply(&self, left: &Scalar, right: &Scalar, _options: &DiffOptions) -> Option<Difference> {
        let left = self.extractor.extract(left);
        let right = self.extractor.extract(right);
        if self.comparator.equivalent(&left, &right) {
            None
        } else {
            Some(Difference::Value(ValueDiff { left, right }))
        }
    }
}

/// Aligns two sequences by key and diffs the aligned pairs.
///
/// The key is an attribute of each element passed through an extractor.
/// When a key repeats within one side, the last element with it wins.
pub struct CollectionCriterion<C> {
    key: fn(&C) -> Scalar,
    extractor: ValueExtractor,
}

impl<C> CollectionCriterion<C> {
    pub fn new(key: fn(&C) -> Scalar) -> Self {
        Self {
            key,
            extractor: ValueExtractor::Identity,
        }
    }

    pub fn with_extractor(mut self, extractor: ValueExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    fn key_of(&self, element: &C) -> String {
        self.extractor.extract(&(self.key)(element)).to_key()
    }

    fn index<'c>(&self, elements: &'c [C]) -> (Vec<String>, HashMap<String, &'c C>) {
        let mut order = Vec::new();
        let mut by_key = HashMap::new();
        for element in elements {
            let key = self.key_of(element);
            if by_key.insert(key.clone(), element).is_none() {
                order.push(key);
            }
        }
        (order, by_key)
    }
}

impl<C> fmt::Debug for CollectionCriterion<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionCriterion")
            .field("extractor", &self.extractor)
            .finish_non_exhaustive()
    }
}

impl<C: Diff> Criterion<[C]> for CollectionCriterion<C> {
    fn apply(&self, left: &[C], right: &[C], options: &DiffOptions) -> Option<Difference> {
        let (left_keys, left_by_key) = self.index(left);
        let (right_keys, right_by_key) = self.index(right);

        let mut diff = CollectionDiff::default();
        for key in &left_keys {
            match right_by_key.get(key) {
                None => diff.left_only.push(key.clone()),
                Some(r) => {
                    if let Some(d) = left_by_key[key].diff(r, options) {
                        diff.entry_differences.insert(key.clone(), d);
                    }
                }
            }
        }
        diff.right_only = right_keys
            .into_iter()
            .filter(|k| !left_by_key.contains_key(k))
            .collect();

        if diff.is_empty() {
            None
        } else {
            Some(Difference::Collection(diff))
        }
    }
}

type AttributeFn<E> = Box<dyn Fn(&E, &E, &DiffOptions) -> Option<Difference> + Send + Sync>;

/// The attribute table of one entity type.
pub struct EntryCriterion<E> {
    attributes: Vec<(&'static str, AttributeFn<E>)>,
}

impl<E> Default for EntryCriterion<E> {
    fn default() -> Self {
        Self {
            attributes: Vec::new(),
        }
    }
}

impl<E: 'static> EntryCriterion<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compares a scalar attribute.
    pub fn value(self, name: &'static str, accessor: fn(&E) -> Scalar, criterion: ValueCriterion) -> Self {
        self.attribute(name, move |l, r, o| criterion.apply(&accessor(l), &accessor(r), o))
    }

    /// Compares a keyed collection attribute.
    pub fn collection<C: Diff + 'static>(
        self,
        name: &'static str,
        accessor: fn(&E) -> &[C],
        criterion: CollectionCriterion<C>,
    ) -> Self {
        self.attribute(name, move |l, r, o| criterion.apply(accessor(l), accessor(r), o))
    }

    /// Compares an attribute with any other criterion.
    pub fn nested<A, K>(self, name: &'static str, accessor: fn(&E) -> &A, criterion: K) -> Self
    where
        A: ?Sized + 'static,
        K: Criterion<A> + Send + Sync + 'static,
    {
        self.attribute(name, move |l, r, o| criterion.apply(accessor(l), accessor(r), o))
    }

    fn attribute<F>(mut self, name: &'static str, compare: F) -> Self
    where
        F: Fn(&E, &E, &DiffOptions) -> Option<Difference> + Send + Sync + 'static,
    {
        self.attributes.push((name, Box::new(compare)));
        self
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.attributes.iter().map(|(name, _)| *name)
    }

    /// Runs every attribute's criterion; `None` when none reports a difference.
    pub fn compute(&self, left: &E, right: &E, options: &DiffOptions) -> Option<EntryDiff> {
        let attribute_differences: BTreeMap<String, Difference> = self
            .attributes
            .iter()
            .filter_map(|(name, compare)| compare(left, right, options).map(|d| (name.to_string(), d)))
            .collect();

        if attribute_differences.is_empty() {
            None
        } else {
            Some(EntryDiff {
                attribute_differences,
            })
        }
    }
}

impl<E: 'static> Criterion<E> for EntryCriterion<E> {
    fn apply(&self, left: &E, right: &E, options: &DiffOptions) -> Option<Difference> {
        self.compute(left, right, options).map(Difference::Entry)
    }
}
