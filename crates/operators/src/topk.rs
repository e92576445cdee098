//! Stateful incremental top-K.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::hash::Hash;
use hashbrown::HashMap;
use rill_algebra::{add_weights, AbelianGroup, Weight, ZSet, ZSetGroup};

/// Comparator over records.
pub type CompareFn<T> = Box<dyn Fn(&T, &T) -> Ordering>;

/// A snapshot of the maintained top-K state.
#[derive(Clone, Debug)]
pub struct TopKState<T> {
    /// The current window as a Z-set (set semantics, every weight 1).
    pub top_k: ZSet<T>,
    /// The full ordered sequence of positive records with their
    /// cumulative weights, window and all.
    pub entries: Vec<(T, Weight)>,
}

/// An incrementally maintained top-K window.
///
/// Keeps every record with a strictly positive cumulative weight in a
/// sequence ordered by the comparator, together with a record-to-
/// position map and the previously emitted window. Each processing
/// step returns `new_window - previous_window` in the Z-set group.
///
/// Records that compare equal keep their arrival order (the sort is
/// stable and insertions append).
pub struct StatefulTopK<T> {
    compare: CompareFn<T>,
    limit: usize,
    offset: usize,
    /// Ordered positive records with their cumulative weights.
    entries: Vec<(T, Weight)>,
    /// Record to its position in `entries`.
    positions: HashMap<T, usize>,
    /// The window emitted by the previous step.
    last_window: ZSet<T>,
}

impl<T> StatefulTopK<T>
where
    T: Clone + Eq + Hash,
{
    /// Creates a top-K maintainer for the first `limit` records under
    /// the comparator.
    pub fn new<C>(compare: C, limit: usize) -> Self
    where
        C: Fn(&T, &T) -> Ordering + 'static,
    {
        Self::with_offset(compare, limit, 0)
    }

    /// Creates a top-K maintainer for the `[offset, offset + limit)`
    /// window.
    pub fn with_offset<C>(compare: C, limit: usize, offset: usize) -> Self
    where
        C: Fn(&T, &T) -> Ordering + 'static,
    {
        Self {
            compare: Box::new(compare),
            limit,
            offset,
            entries: Vec::new(),
            positions: HashMap::new(),
            last_window: ZSet::new(),
        }
    }

    /// Processes a batch of deltas and returns the delta of the window.
    ///
    /// Routes to the bulk `process_initial` path when no state has been
    /// accumulated yet.
    pub fn process_increment(&mut self, delta: &ZSet<T>) -> ZSet<T> {
        if self.entries.is_empty() && self.last_window.is_empty() {
            return self.process_initial(delta);
        }

        let merged = delta.merge_records();
        for (record, diff) in merged.data() {
            if let Some(&position) = self.positions.get(record) {
                self.entries[position].1 = add_weights(self.entries[position].1, *diff);
            } else if *diff > 0 {
                self.entries.push((record.clone(), *diff));
                self.positions.insert(record.clone(), self.entries.len() - 1);
            }
            // A retraction of an absent record is ignored: there is
            // nothing to remove.
        }

        self.entries.retain(|(_, weight)| *weight > 0);
        self.entries
            .sort_by(|(a, _), (b, _)| (self.compare)(a, b));
        self.rebuild_positions();

        self.emit_window()
    }

    /// Bulk initialization: aggregates the whole delta, sorts once and
    /// emits the first window.
    ///
    /// Equivalent to `process_increment` on empty state, without the
    /// per-record bookkeeping.
    pub fn process_initial(&mut self, delta: &ZSet<T>) -> ZSet<T> {
        let merged = delta.merge_records();
        self.entries = merged
            .data()
            .iter()
            .filter(|(_, weight)| *weight > 0)
            .cloned()
            .collect();
        self.entries
            .sort_by(|(a, _), (b, _)| (self.compare)(a, b));
        self.rebuild_positions();

        self.emit_window()
    }

    /// Returns the current window and the full ordered state.
    pub fn get_current_state(&self) -> TopKState<T> {
        TopKState {
            top_k: self.last_window.clone(),
            entries: self.entries.clone(),
        }
    }

    /// Clears every internal structure.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.positions.clear();
        self.last_window = ZSet::new();
    }

    fn rebuild_positions(&mut self) {
        self.positions.clear();
        for (position, (record, _)) in self.entries.iter().enumerate() {
            self.positions.insert(record.clone(), position);
        }
    }

    fn emit_window(&mut self) -> ZSet<T> {
        let mut window = ZSet::new();
        for (record, _) in self.entries.iter().skip(self.offset).take(self.limit) {
            window.append(record.clone(), 1);
        }

        let group = ZSetGroup::new();
        let delta = group.subtract(&window, &self.last_window);
        self.last_window = window;
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    type Product = (&'static str, i64);

    fn by_price_desc(a: &Product, b: &Product) -> Ordering {
        b.1.cmp(&a.1)
    }

    #[test]
    fn test_s6_eviction() {
        // Top 3 by price over laptop/phone/tablet, then a gaming pc
        // arrives and evicts the tablet.
        let mut topk = StatefulTopK::new(by_price_desc, 3);
        topk.process_increment(&ZSet::from_pairs(vec![
            (("laptop", 1000), 1),
            (("phone", 800), 1),
            (("tablet", 600), 1),
        ]));

        let delta = topk.process_increment(&ZSet::insert(("gaming_pc", 2000)));

        assert_eq!(delta.weight_of(&("gaming_pc", 2000)), 1);
        assert_eq!(delta.weight_of(&("tablet", 600)), -1);
        assert_eq!(delta.weight_of(&("laptop", 1000)), 0);

        let state = topk.get_current_state();
        assert_eq!(
            state.top_k,
            ZSet::from_pairs(vec![
                (("gaming_pc", 2000), 1),
                (("laptop", 1000), 1),
                (("phone", 800), 1),
            ])
        );
    }

    #[test]
    fn test_initial_window_emitted_once() {
        let mut topk = StatefulTopK::new(by_price_desc, 2);
        let delta = topk.process_increment(&ZSet::from_pairs(vec![
            (("a", 10), 1),
            (("b", 30), 1),
            (("c", 20), 1),
        ]));

        assert_eq!(
            delta,
            ZSet::from_pairs(vec![(("b", 30), 1), (("c", 20), 1)])
        );
    }

    #[test]
    fn test_offset_window() {
        let mut topk = StatefulTopK::with_offset(by_price_desc, 2, 1);
        let delta = topk.process_increment(&ZSet::from_pairs(vec![
            (("a", 10), 1),
            (("b", 30), 1),
            (("c", 20), 1),
        ]));

        assert_eq!(
            delta,
            ZSet::from_pairs(vec![(("c", 20), 1), (("a", 10), 1)])
        );
    }

    #[test]
    fn test_weight_accumulation_and_removal() {
        let mut topk = StatefulTopK::new(by_price_desc, 3);
        topk.process_increment(&ZSet::from_pairs(vec![(("a", 10), 2), (("b", 20), 1)]));

        // Retract one copy of a: still positive, window unchanged.
        let delta = topk.process_increment(&ZSet::remove(("a", 10)));
        assert!(delta.is_empty());

        // Retract the second copy: a leaves the window.
        let delta = topk.process_increment(&ZSet::remove(("a", 10)));
        assert_eq!(delta, ZSet::from_pairs(vec![(("a", 10), -1)]));

        let state = topk.get_current_state();
        assert_eq!(state.entries, vec![(("b", 20), 1)]);
    }

    #[test]
    fn test_retracting_absent_record_is_ignored() {
        let mut topk = StatefulTopK::new(by_price_desc, 2);
        topk.process_increment(&ZSet::insert(("a", 10)));

        let delta = topk.process_increment(&ZSet::remove(("ghost", 99)));
        assert!(delta.is_empty());
        assert_eq!(topk.get_current_state().entries.len(), 1);
    }

    #[test]
    fn test_ties_keep_arrival_order() {
        let mut topk = StatefulTopK::new(by_price_desc, 2);
        topk.process_increment(&ZSet::insert(("first", 10)));
        topk.process_increment(&ZSet::insert(("second", 10)));
        let delta = topk.process_increment(&ZSet::insert(("third", 10)));

        // third ties but arrived last, so the window is unchanged.
        assert!(delta.is_empty());
        assert_eq!(
            topk.get_current_state().top_k,
            ZSet::from_pairs(vec![(("first", 10), 1), (("second", 10), 1)])
        );
    }

    #[test]
    fn test_window_tracks_records_below_it() {
        let mut topk = StatefulTopK::new(by_price_desc, 2);
        topk.process_increment(&ZSet::from_pairs(vec![
            (("a", 30), 1),
            (("b", 20), 1),
            (("c", 10), 1),
        ]));

        // Removing a promotes c into the window.
        let delta = topk.process_increment(&ZSet::remove(("a", 30)));
        assert_eq!(delta.weight_of(&("a", 30)), -1);
        assert_eq!(delta.weight_of(&("c", 10)), 1);
    }

    #[test]
    fn test_reset() {
        let mut topk = StatefulTopK::new(by_price_desc, 2);
        topk.process_increment(&ZSet::insert(("a", 10)));
        topk.reset();

        let state = topk.get_current_state();
        assert!(state.top_k.is_empty());
        assert!(state.entries.is_empty());

        // After reset the next batch takes the bulk path again.
        let delta = topk.process_increment(&ZSet::insert(("b", 20)));
        assert_eq!(delta, ZSet::from_pairs(vec![(("b", 20), 1)]));
    }
}
