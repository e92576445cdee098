//! Stream operators: lift, delay, integrate, differentiate,
//! incrementalize.
//!
//! All operators iterate only over the set entries of their input (plus
//! the gap times integration and differentiation are required to
//! visit), never over an unbounded time axis.

use crate::stream::Stream;
use alloc::collections::BTreeSet;
use rill_algebra::AbelianGroup;

/// Applies `f` pointwise: `lift(f)(s)[t] = f(s[t])`.
///
/// The output default is `f` of the input default, so unset times map
/// to `f(zero)` exactly as the pointwise reading requires.
pub fn lift<A, B, F>(input: &Stream<A>, f: F) -> Stream<B>
where
    F: Fn(&A) -> B,
{
    let mut output = Stream::new(f(input.default_value()));
    for (t, value) in input.entries() {
        output.set(t, f(value));
    }
    output
}

/// Delays the stream by one step: `delay(s)[t + 1] = s[t]`.
///
/// Time 0 of the output takes the input's default (the value the input
/// held "before time began"); the output default is the group zero.
pub fn delay<A, G>(input: &Stream<A>, group: &G) -> Stream<A>
where
    A: Clone,
    G: AbelianGroup<A>,
{
    let mut output = Stream::new(group.zero());
    output.set(0, input.default_value().clone());
    for (t, value) in input.entries() {
        output.set(t + 1, value.clone());
    }
    output
}

/// Integrates the stream: `I(s)[t]` is the sum of `s[0..=t]`.
///
/// Walks every time from 0 to the last set time, gaps included, so the
/// accumulator is correct for sparse inputs. Times beyond the last set
/// time hold the final accumulator value semantically; they are not
/// materialized.
pub fn integrate<A, G>(input: &Stream<A>, group: &G) -> Stream<A>
where
    A: Clone,
    G: AbelianGroup<A>,
{
    let mut output = Stream::new(group.zero());
    if let Some(last) = input.last_time() {
        let mut accumulator = group.zero();
        for t in 0..=last {
            accumulator = group.add(&accumulator, input.at(t));
            output.set(t, accumulator.clone());
        }
    }
    output
}

/// Differentiates the stream: `D(s)[t] = s[t] - s[t - 1]`, with
/// `s[-1] = zero`.
///
/// Emits at every time up to the last set time where `s[t]` or
/// `s[t - 1]` is non-zero; in particular, a gap right after a non-zero
/// value emits the retraction of that value. Under this rule `D` and
/// `integrate` are mutual inverses on streams that are zero almost
/// everywhere.
pub fn differentiate<A, G>(input: &Stream<A>, group: &G) -> Stream<A>
where
    A: Clone + PartialEq,
    G: AbelianGroup<A>,
{
    let mut output = Stream::new(group.zero());
    let Some(last) = input.last_time() else {
        return output;
    };

    let zero = group.zero();
    let mut candidates = BTreeSet::new();
    for (t, _) in input.entries() {
        candidates.insert(t);
        if t < last {
            candidates.insert(t + 1);
        }
    }

    for t in candidates {
        let current = input.at(t);
        let previous = if t == 0 { &zero } else { input.at(t - 1) };
        if *current != zero || *previous != zero {
            output.set(t, group.subtract(current, previous));
        }
    }
    output
}

/// Incrementalizes a stream operator: `Q^d = D . Q . I`.
///
/// The result consumes a delta stream and produces a delta stream;
/// it is always correct, though linear operators can skip the wrapping
/// entirely and bilinear ones have a cheaper three-term form.
pub fn incrementalize<A, B, GA, GB, Q>(
    query: Q,
    input_group: GA,
    output_group: GB,
) -> impl Fn(&Stream<A>) -> Stream<B>
where
    A: Clone,
    B: Clone + PartialEq,
    GA: AbelianGroup<A>,
    GB: AbelianGroup<B>,
    Q: Fn(&Stream<A>) -> Stream<B>,
{
    move |input| {
        let integrated = integrate(input, &input_group);
        let snapshot = query(&integrated);
        differentiate(&snapshot, &output_group)
    }
}
