//! Stateful incremental equi-join.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::hash::Hash;
use hashbrown::HashMap;
use rill_algebra::{add_weights, mul_weights, Weight, ZSet};

/// Key extractor for one join input.
pub type KeyFn<T, K> = Box<dyn Fn(&T) -> K>;

/// An incrementally maintained equi-join.
///
/// Holds persistent hash indexes for both inputs and a materialized
/// view of the join result. Each call to `process_increment` applies
/// the bilinear delta formula
///
/// ```text
/// delta_out = join(da, db) + join(da, index_b) + join(index_a, db)
/// ```
///
/// where the indexes hold everything received before this call, so the
/// cost of a step is proportional to the delta times the fan-out per
/// key, never to the accumulated inputs.
pub struct StatefulJoin<T, U, K> {
    left_key: KeyFn<T, K>,
    right_key: KeyFn<U, K>,
    /// Left input accumulated by key. Appended without consolidation;
    /// the per-join canonicalization absorbs duplicates.
    left_index: HashMap<K, Vec<(T, Weight)>>,
    /// Right input accumulated by key.
    right_index: HashMap<K, Vec<(U, Weight)>>,
    /// Materialized view: joined pair to its current weight.
    view: HashMap<(T, U), Weight>,
}

impl<T, U, K> StatefulJoin<T, U, K>
where
    T: Clone + Eq + Hash,
    U: Clone + Eq + Hash,
    K: Clone + Eq + Hash,
{
    /// Creates an empty stateful join with the given key extractors.
    pub fn new<FL, FR>(left_key: FL, right_key: FR) -> Self
    where
        FL: Fn(&T) -> K + 'static,
        FR: Fn(&U) -> K + 'static,
    {
        Self {
            left_key: Box::new(left_key),
            right_key: Box::new(right_key),
            left_index: HashMap::new(),
            right_index: HashMap::new(),
            view: HashMap::new(),
        }
    }

    /// Seeds the join with initial data.
    ///
    /// Equivalent to `process_increment` from empty state; any existing
    /// state is cleared first.
    pub fn initialize(&mut self, left: &ZSet<T>, right: &ZSet<U>) -> ZSet<(T, U)> {
        self.reset();
        self.process_increment(left, right)
    }

    /// Processes one batch of deltas on both inputs.
    ///
    /// Returns the canonical delta of the join result, after updating
    /// the indexes and the materialized view.
    pub fn process_increment(
        &mut self,
        left_delta: &ZSet<T>,
        right_delta: &ZSet<U>,
    ) -> ZSet<(T, U)> {
        let da = left_delta.merge_records();
        let db = right_delta.merge_records();

        let mut output = ZSet::new();

        // Term 1: the new left rows against the new right rows.
        if !da.is_empty() && !db.is_empty() {
            let mut fresh_index: HashMap<K, Vec<(U, Weight)>> = HashMap::new();
            for (y, wy) in db.data() {
                fresh_index
                    .entry((self.right_key)(y))
                    .or_default()
                    .push((y.clone(), *wy));
            }
            for (x, wx) in da.data() {
                if let Some(matches) = fresh_index.get(&(self.left_key)(x)) {
                    for (y, wy) in matches {
                        output.append((x.clone(), y.clone()), mul_weights(*wx, *wy));
                    }
                }
            }
        }

        // Term 2: the new left rows against everything already on the
        // right.
        if !da.is_empty() {
            for (x, wx) in da.data() {
                if let Some(matches) = self.right_index.get(&(self.left_key)(x)) {
                    for (y, wy) in matches {
                        output.append((x.clone(), y.clone()), mul_weights(*wx, *wy));
                    }
                }
            }
        }

        // Term 3: everything already on the left against the new right
        // rows.
        if !db.is_empty() {
            for (y, wy) in db.data() {
                if let Some(matches) = self.left_index.get(&(self.right_key)(y)) {
                    for (x, wx) in matches {
                        output.append((x.clone(), y.clone()), mul_weights(*wx, *wy));
                    }
                }
            }
        }

        // Only now fold the deltas into the persistent indexes.
        for (x, wx) in da.data() {
            self.left_index
                .entry((self.left_key)(x))
                .or_default()
                .push((x.clone(), *wx));
        }
        for (y, wy) in db.data() {
            self.right_index
                .entry((self.right_key)(y))
                .or_default()
                .push((y.clone(), *wy));
        }

        let delta = output.merge_records();
        self.apply_to_view(&delta);
        delta
    }

    /// Returns the maintained join result as a Z-set.
    ///
    /// Conversion is linear in the size of the view; the view itself is
    /// kept up to date in delta time.
    pub fn get_materialized_view(&self) -> ZSet<(T, U)> {
        let mut view = ZSet::new();
        for (pair, weight) in &self.view {
            view.append(pair.clone(), *weight);
        }
        view
    }

    /// Exposes the internal indexes for inspection.
    pub fn get_indexes(
        &self,
    ) -> (
        &HashMap<K, Vec<(T, Weight)>>,
        &HashMap<K, Vec<(U, Weight)>>,
    ) {
        (&self.left_index, &self.right_index)
    }

    /// Returns the number of entries appended to the left index.
    pub fn left_count(&self) -> usize {
        self.left_index.values().map(|v| v.len()).sum()
    }

    /// Returns the number of entries appended to the right index.
    pub fn right_count(&self) -> usize {
        self.right_index.values().map(|v| v.len()).sum()
    }

    /// Returns true if nothing has been processed since construction or
    /// the last reset.
    pub fn is_empty(&self) -> bool {
        self.left_index.is_empty() && self.right_index.is_empty() && self.view.is_empty()
    }

    /// Clears the indexes and the materialized view.
    pub fn reset(&mut self) {
        self.left_index.clear();
        self.right_index.clear();
        self.view.clear();
    }

    fn apply_to_view(&mut self, delta: &ZSet<(T, U)>) {
        for (pair, weight) in delta.data() {
            let entry = self.view.entry(pair.clone()).or_insert(0);
            *entry = add_weights(*entry, *weight);
            if *entry == 0 {
                self.view.remove(pair);
            }
        }
    }
}
