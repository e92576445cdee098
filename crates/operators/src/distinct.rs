//! Optimized incremental distinct.

use core::hash::Hash;
use hashbrown::HashMap;
use rill_algebra::{add_weights, Weight, ZSet};

/// Incrementally maintained distinct.
///
/// Tracks the integrated weight of every record seen so far and emits
/// only on positivity transitions: `+1` when a record's cumulative
/// weight turns strictly positive, `-1` when it stops being positive,
/// nothing otherwise. The output therefore equals the derivative of
/// `distinct` applied to the integrated input, at delta cost.
pub struct DistinctDelta<A> {
    integrated: HashMap<A, Weight>,
}

impl<A> Default for DistinctDelta<A>
where
    A: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A> DistinctDelta<A>
where
    A: Clone + Eq + Hash,
{
    /// Creates an empty distinct maintainer.
    pub fn new() -> Self {
        Self {
            integrated: HashMap::new(),
        }
    }

    /// Processes a batch of deltas and returns the distinct delta.
    pub fn process_increment(&mut self, delta: &ZSet<A>) -> ZSet<A> {
        let merged = delta.merge_records();
        let mut output = ZSet::new();

        for (record, diff) in merged.data() {
            let old = self.integrated.get(record).copied().unwrap_or(0);
            let new = add_weights(old, *diff);

            if old <= 0 && new > 0 {
                output.append(record.clone(), 1);
            } else if old > 0 && new <= 0 {
                output.append(record.clone(), -1);
            }

            if new == 0 {
                self.integrated.remove(record);
            } else {
                self.integrated.insert(record.clone(), new);
            }
        }

        output
    }

    /// Returns the integrated weight of a record.
    pub fn integrated_weight(&self, record: &A) -> Weight {
        self.integrated.get(record).copied().unwrap_or(0)
    }

    /// Returns true if no record has a non-zero integrated weight.
    pub fn is_empty(&self) -> bool {
        self.integrated.is_empty()
    }

    /// Clears the integrated state.
    pub fn reset(&mut self) {
        self.integrated.clear();
    }
}
