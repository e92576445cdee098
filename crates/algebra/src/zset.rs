//! Z-set value type.
//!
//! A Z-set maps records to signed integer weights with finite support.
//! Construction is append-only (the builder form may hold duplicate keys
//! and zero net weights); `merge_records` consolidates into canonical
//! form: one entry per record, no zero weights. Equality is semantic,
//! so two Z-sets compare equal whenever their consolidated key-to-weight
//! mappings agree, regardless of entry order.

use crate::weight::{add_weights, mul_weights, Weight};
use alloc::vec::Vec;
use core::hash::Hash;
use hashbrown::hash_map::Entry;
use hashbrown::HashMap;

/// A signed multiset: a sequence of `(record, weight)` pairs.
///
/// Operators treat Z-sets as logically immutable; they consume
/// references and produce new Z-sets.
#[derive(Clone, Debug)]
pub struct ZSet<A> {
    entries: Vec<(A, Weight)>,
}

impl<A> Default for ZSet<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> ZSet<A> {
    /// Creates an empty Z-set.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a record with the given weight.
    ///
    /// Zero weights are dropped immediately; duplicates are allowed and
    /// consolidated later by `merge_records`.
    pub fn append(&mut self, value: A, weight: Weight) {
        if weight != 0 {
            self.entries.push((value, weight));
        }
    }

    /// Returns the underlying `(record, weight)` pairs.
    ///
    /// The returned slice is the builder form: it may contain duplicate
    /// records until `merge_records` is applied.
    #[inline]
    pub fn data(&self) -> &[(A, Weight)] {
        &self.entries
    }

    /// Returns the number of stored entries (not the consolidated size).
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over the stored `(record, weight)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = &(A, Weight)> {
        self.entries.iter()
    }
}

impl<A> ZSet<A>
where
    A: Clone + Eq + Hash,
{
    /// Creates a Z-set from `(record, weight)` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (A, Weight)>) -> Self {
        let mut zset = Self::new();
        for (value, weight) in pairs {
            zset.append(value, weight);
        }
        zset
    }

    /// Creates a Z-set holding a single record.
    pub fn singleton(value: A, weight: Weight) -> Self {
        let mut zset = Self::new();
        zset.append(value, weight);
        zset
    }

    /// Creates an insertion Z-set (weight +1).
    pub fn insert(value: A) -> Self {
        Self::singleton(value, 1)
    }

    /// Creates a deletion Z-set (weight -1).
    pub fn remove(value: A) -> Self {
        Self::singleton(value, -1)
    }

    /// Returns true if the Z-set is semantically empty (all weights
    /// cancel out).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() || self.to_map().is_empty()
    }

    /// Returns true if every consolidated weight is exactly 1, i.e. the
    /// Z-set represents a classical set.
    pub fn is_set(&self) -> bool {
        self.to_map().values().all(|w| *w == 1)
    }

    /// Returns true if every consolidated weight is non-negative.
    pub fn is_positive(&self) -> bool {
        self.to_map().values().all(|w| *w >= 0)
    }

    /// Returns the consolidated weight of a record (0 if absent).
    pub fn weight_of(&self, value: &A) -> Weight {
        self.entries
            .iter()
            .filter(|(a, _)| a == value)
            .fold(0, |acc, (_, w)| add_weights(acc, *w))
    }

    /// Consolidates duplicate records and drops zero weights.
    ///
    /// The first-appearance order of records is preserved, so the result
    /// is deterministic. Idempotent: merging a canonical Z-set returns
    /// an equal Z-set.
    pub fn merge_records(&self) -> Self {
        let mut order: Vec<A> = Vec::new();
        let mut weights: HashMap<A, Weight> = HashMap::with_capacity(self.entries.len());

        for (value, weight) in &self.entries {
            match weights.entry(value.clone()) {
                Entry::Occupied(mut occupied) => {
                    let merged = add_weights(*occupied.get(), *weight);
                    *occupied.get_mut() = merged;
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(*weight);
                    order.push(value.clone());
                }
            }
        }

        let entries = order
            .into_iter()
            .filter_map(|value| {
                let weight = weights[&value];
                if weight != 0 {
                    Some((value, weight))
                } else {
                    None
                }
            })
            .collect();

        Self { entries }
    }

    /// Multiplies every weight by a scalar.
    pub fn multiply(&self, scalar: Weight) -> Self {
        if scalar == 0 {
            return Self::new();
        }
        Self {
            entries: self
                .entries
                .iter()
                .map(|(value, weight)| (value.clone(), mul_weights(*weight, scalar)))
                .collect(),
        }
    }

    /// Consolidates into a record-to-weight map, dropping zero weights.
    pub fn to_map(&self) -> HashMap<A, Weight> {
        let mut map: HashMap<A, Weight> = HashMap::with_capacity(self.entries.len());
        for (value, weight) in &self.entries {
            let entry = map.entry(value.clone()).or_insert(0);
            *entry = add_weights(*entry, *weight);
        }
        map.retain(|_, weight| *weight != 0);
        map
    }
}

impl<A> PartialEq for ZSet<A>
where
    A: Clone + Eq + Hash,
{
    fn eq(&self, other: &Self) -> bool {
        self.to_map() == other.to_map()
    }
}

impl<A> Eq for ZSet<A> where A: Clone + Eq + Hash {}

impl<A> FromIterator<(A, Weight)> for ZSet<A>
where
    A: Clone + Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (A, Weight)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
