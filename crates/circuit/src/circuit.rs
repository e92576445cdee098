//! Composable circuits over stream operators.

use alloc::boxed::Box;
use core::cmp::Ordering;
use core::hash::Hash;
use hashbrown::HashMap;
use rill_algebra::{ops, AbelianGroup, ZSet, ZSetGroup};
use rill_operators::{BilinearDelta, DistinctDelta};
use rill_stream::{incrementalize, lift, Stream};

/// A typed, composable wrapper over a stream operator.
///
/// Circuits are delta-to-delta: `execute` maps a stream of input
/// changes to the stream of output changes of the wrapped query.
/// Stateful constructors build fresh operator state per `execute`, so
/// a circuit value can be executed repeatedly and independently.
pub struct Circuit<A, B> {
    op: Box<dyn Fn(&Stream<A>) -> Stream<B>>,
}

impl<A, B> Circuit<A, B>
where
    A: 'static,
    B: 'static,
{
    /// Wraps a raw stream operator.
    pub fn new<F>(op: F) -> Self
    where
        F: Fn(&Stream<A>) -> Stream<B> + 'static,
    {
        Self { op: Box::new(op) }
    }

    /// Chains this circuit into `next`, feeding this circuit's output
    /// stream to it.
    pub fn compose<C>(self, next: Circuit<B, C>) -> Circuit<A, C>
    where
        C: 'static,
    {
        Circuit::new(move |input| (next.op)(&(self.op)(input)))
    }

    /// Runs the circuit over an input stream.
    pub fn execute(&self, input: &Stream<A>) -> Stream<B> {
        (self.op)(input)
    }
}

impl<T> Circuit<ZSet<T>, ZSet<T>>
where
    T: Clone + Eq + Hash + 'static,
{
    /// Filter: linear, so the lifted snapshot operator is already its
    /// own incremental form.
    pub fn filter<P>(predicate: P) -> Self
    where
        P: Fn(&T) -> bool + 'static,
    {
        Circuit::new(move |input| lift(input, |zset| ops::filter(zset, &predicate)))
    }

    /// Distinct, maintained with the positivity-transition increment.
    pub fn distinct() -> Self {
        Circuit::new(|input| {
            let mut maintainer = DistinctDelta::new();
            let mut output = Stream::new(ZSet::new());
            for (t, delta) in input.entries() {
                let out = maintainer.process_increment(delta);
                if !out.is_empty() {
                    output.set(t, out);
                }
            }
            output
        })
    }

    /// Top-K window over the integrated input, via the generic
    /// `D . Q . I` wrapping.
    pub fn top_k<C>(compare: C, limit: usize, offset: usize) -> Self
    where
        C: Fn(&T, &T) -> Ordering + 'static,
    {
        Self::incremental(move |zset| ops::top_k(zset, &compare, limit, offset))
    }
}

impl<T, U> Circuit<ZSet<T>, ZSet<U>>
where
    T: Clone + Eq + Hash + 'static,
    U: Clone + Eq + Hash + 'static,
{
    /// Projection: maps records and consolidates collapsed images.
    /// Linear, so lifting suffices.
    pub fn project<F>(projection: F) -> Self
    where
        F: Fn(&T) -> U + 'static,
    {
        Circuit::new(move |input| lift(input, |zset| ops::project(zset, &projection)))
    }

    /// Incrementalizes an arbitrary snapshot operator over Z-sets:
    /// integrate, apply pointwise, differentiate. Always correct; the
    /// dedicated constructors are cheaper where they apply.
    pub fn incremental<Q>(snapshot_op: Q) -> Self
    where
        Q: Fn(&ZSet<T>) -> ZSet<U> + 'static,
    {
        Circuit::new(move |input| {
            let wrapped = incrementalize(
                |integrated: &Stream<ZSet<T>>| lift(integrated, &snapshot_op),
                ZSetGroup::new(),
                ZSetGroup::new(),
            );
            wrapped(input)
        })
    }
}

impl<T, U> Circuit<(ZSet<T>, ZSet<U>), ZSet<(T, U)>>
where
    T: Clone + Eq + Hash + 'static,
    U: Clone + Eq + Hash + 'static,
{
    /// Equi-join of a paired delta stream, in the bilinear three-term
    /// form.
    pub fn equi_join<K, FL, FR>(left_key: FL, right_key: FR) -> Self
    where
        K: Clone + Eq + Hash + 'static,
        FL: Fn(&T) -> K + 'static,
        FR: Fn(&U) -> K + 'static,
    {
        bilinear_circuit(move |a, b| ops::equi_join(a, b, &left_key, &right_key))
    }

    /// Cartesian product of a paired delta stream.
    pub fn cartesian_product() -> Self {
        bilinear_circuit(|a, b| ops::cartesian_product(a, b))
    }
}

impl<T> Circuit<(ZSet<T>, ZSet<T>), ZSet<T>>
where
    T: Clone + Eq + Hash + 'static,
{
    /// Intersection of a paired delta stream (bilinear).
    pub fn intersect() -> Self {
        bilinear_circuit(|a, b| ops::intersect(a, b))
    }

    /// Set union: lifted addition followed by incremental distinct.
    pub fn union() -> Self {
        Self::combine_then_distinct(|group, a, b| group.add(a, b))
    }

    /// Set difference: lifted subtraction followed by incremental
    /// distinct.
    pub fn difference() -> Self {
        Self::combine_then_distinct(|group, a, b| group.subtract(a, b))
    }

    fn combine_then_distinct<F>(combine: F) -> Self
    where
        F: Fn(&ZSetGroup<T>, &ZSet<T>, &ZSet<T>) -> ZSet<T> + 'static,
    {
        Circuit::new(move |input| {
            let group = ZSetGroup::new();
            let mut maintainer = DistinctDelta::new();
            let mut output = Stream::new(ZSet::new());
            for (t, (left, right)) in input.entries() {
                let combined = combine(&group, left, right);
                let delta = maintainer.process_increment(&combined);
                if !delta.is_empty() {
                    output.set(t, delta);
                }
            }
            output
        })
    }
}

impl<T> Circuit<ZSet<T>, i64>
where
    T: Clone + Eq + Hash + 'static,
{
    /// Count: the sum of all weights. Linear, so the lifted operator
    /// maps deltas to count deltas.
    pub fn count() -> Self {
        Circuit::new(|input| lift(input, ops::count))
    }

    /// Weighted sum of `f(record)`. Linear.
    pub fn sum<F>(f: F) -> Self
    where
        F: Fn(&T) -> i64 + 'static,
    {
        Circuit::new(move |input| lift(input, |zset| ops::sum(zset, &f)))
    }
}

impl<T, K> Circuit<ZSet<T>, HashMap<K, ZSet<T>>>
where
    T: Clone + Eq + Hash + 'static,
    K: Clone + Eq + Hash + 'static,
{
    /// Group-by: partitions each delta by key. Linear in the key
    /// function.
    pub fn group_by<F>(key: F) -> Self
    where
        F: Fn(&T) -> K + 'static,
    {
        Circuit::new(move |input| lift(input, |zset| ops::group_by(zset, &key)))
    }
}

/// Runs a bilinear snapshot operator over a paired delta stream with
/// the three-term delta form, creating fresh cumulative state per
/// execution.
fn bilinear_circuit<T, U, V, F>(op: F) -> Circuit<(ZSet<T>, ZSet<U>), ZSet<V>>
where
    T: Clone + Eq + Hash + 'static,
    U: Clone + Eq + Hash + 'static,
    V: Clone + Eq + Hash + 'static,
    F: Fn(&ZSet<T>, &ZSet<U>) -> ZSet<V> + 'static,
{
    Circuit::new(move |input| {
        let mut bilinear = BilinearDelta::new(&op);
        let mut output = Stream::new(ZSet::new());
        for (t, (left, right)) in input.entries() {
            let delta = bilinear.process_increment(left, right);
            if !delta.is_empty() {
                output.set(t, delta);
            }
        }
        output
    })
}
