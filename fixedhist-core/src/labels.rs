// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Label sets and their canonical keys.
//!
//! A histogram's label space is closed: every legal combination is expanded
//! up front by [`label_permutations`] and identified by the key produced by
//! [`flatten_labels`]. Recording goes through the same flattening, so the two
//! functions must agree on the canonical form.

use std::borrow::Borrow;
use std::collections::btree_map;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// An ordered mapping from label name to label value.
///
/// Names are kept sorted, so two sets built from the same pairs in a
/// different order are equal and flatten to the same key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelSet(BTreeMap<String, String>);

impl LabelSet {
    /// Create an empty label set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a label, returning the updated set.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add or replace a label, returning the previous value if there was one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The canonical key for this label set. See [`flatten_labels`].
    pub fn flatten(&self) -> PermutationKey {
        flatten_labels(self)
    }
}

impl<K, V> FromIterator<(K, V)> for LabelSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, String>> for LabelSet {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<'a> IntoIterator for &'a LabelSet {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The canonical string identity of a label set, e.g.
/// `method="GET",status="200"`.
///
/// The empty label set has the empty key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PermutationKey(String);

impl PermutationKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Borrow<str> for PermutationKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PermutationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serialize a label set into its canonical key.
///
/// Pairs are written as `name="value"` in ascending name order and joined
/// with commas. Values are written as-is; no escaping is applied.
pub fn flatten_labels(labels: &LabelSet) -> PermutationKey {
    let mut key = String::new();

    for (i, (name, value)) in labels.iter().enumerate() {
        if i > 0 {
            key.push(',');
        }
        key.push_str(name);
        key.push_str("=\"");
        key.push_str(value);
        key.push('"');
    }

    PermutationKey(key)
}

/// Expand a label schema into every legal label set.
///
/// The result is the cartesian product of the allowed values, with label
/// names in ascending order and values in declared order. The last label
/// name varies fastest. Repeated values within one label are expanded once.
///
/// A schema with no labels yields a single empty label set. A label with no
/// allowed values yields no label sets at all.
pub fn label_permutations(schema: &BTreeMap<String, Vec<String>>) -> Vec<LabelSet> {
    let mut permutations = vec![LabelSet::new()];

    for (name, values) in schema {
        let mut seen = HashSet::new();
        let values: Vec<&String> = values.iter().filter(|v| seen.insert(*v)).collect();

        permutations = permutations
            .iter()
            .flat_map(|partial| {
                values
                    .iter()
                    .map(move |value| partial.clone().with(name.clone(), value.as_str()))
            })
            .collect();
    }

    permutations
}
