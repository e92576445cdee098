//! Generic bilinear delta operator.

use core::hash::Hash;
use rill_algebra::{AbelianGroup, ZSet, ZSetGroup};

/// Incremental form of an arbitrary bilinear operator.
///
/// For a bilinear `op` the delta of `op(I(a), I(b))` at each step is
///
/// ```text
/// op(da, db) + op(da, cumulative_b) + op(cumulative_a, db)
/// ```
///
/// where the cumulatives hold everything received before the step.
/// Terms with an empty input are skipped, which in practice removes
/// most of the work: a step usually changes only one side.
pub struct BilinearDelta<T, U, V, F>
where
    F: Fn(&ZSet<T>, &ZSet<U>) -> ZSet<V>,
{
    op: F,
    cumulative_left: ZSet<T>,
    cumulative_right: ZSet<U>,
}

impl<T, U, V, F> BilinearDelta<T, U, V, F>
where
    T: Clone + Eq + Hash,
    U: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
    F: Fn(&ZSet<T>, &ZSet<U>) -> ZSet<V>,
{
    /// Wraps a bilinear snapshot operator.
    pub fn new(op: F) -> Self {
        Self {
            op,
            cumulative_left: ZSet::new(),
            cumulative_right: ZSet::new(),
        }
    }

    /// Processes one step of deltas on both inputs and returns the
    /// canonical output delta.
    pub fn process_increment(&mut self, left_delta: &ZSet<T>, right_delta: &ZSet<U>) -> ZSet<V> {
        let left_empty = left_delta.is_empty();
        let right_empty = right_delta.is_empty();

        let mut output = ZSet::new();
        if !left_empty && !right_empty {
            extend(&mut output, (self.op)(left_delta, right_delta));
        }
        if !left_empty && !self.cumulative_right.is_empty() {
            extend(&mut output, (self.op)(left_delta, &self.cumulative_right));
        }
        if !right_empty && !self.cumulative_left.is_empty() {
            extend(&mut output, (self.op)(&self.cumulative_left, right_delta));
        }

        let left_group = ZSetGroup::new();
        let right_group = ZSetGroup::new();
        self.cumulative_left = left_group.add(&self.cumulative_left, left_delta);
        self.cumulative_right = right_group.add(&self.cumulative_right, right_delta);

        output.merge_records()
    }

    /// Clears the cumulative inputs.
    pub fn reset(&mut self) {
        self.cumulative_left = ZSet::new();
        self.cumulative_right = ZSet::new();
    }
}

fn extend<V>(target: &mut ZSet<V>, source: ZSet<V>)
where
    V: Clone + Eq + Hash,
{
    for (value, weight) in source.data() {
        target.append(value.clone(), *weight);
    }
}
