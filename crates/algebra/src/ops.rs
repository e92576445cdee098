//! Stateless relational operators over Z-sets.
//!
//! Every operator takes Z-sets by reference, retains no state, and
//! returns a canonical Z-set (or a scalar, for the aggregates). Linear
//! operators (filter, project, group_by) distribute over Z-set
//! addition; the bilinear operators (cartesian product, joins) are
//! linear in each argument separately.

use crate::error::{Error, Result};
use crate::weight::{add_weights, mul_weights, Weight};
use crate::zset::ZSet;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::hash::Hash;
use hashbrown::HashMap;

/// Retains records satisfying the predicate; weights are preserved.
pub fn filter<A, P>(zset: &ZSet<A>, predicate: P) -> ZSet<A>
where
    A: Clone + Eq + Hash,
    P: Fn(&A) -> bool,
{
    let merged = zset.merge_records();
    let mut output = ZSet::new();
    for (value, weight) in merged.data() {
        if predicate(value) {
            output.append(value.clone(), *weight);
        }
    }
    output
}

/// Maps records through a projection, summing the weights of records
/// that collapse onto the same image.
pub fn project<A, B, F>(zset: &ZSet<A>, projection: F) -> ZSet<B>
where
    A: Clone + Eq + Hash,
    B: Clone + Eq + Hash,
    F: Fn(&A) -> B,
{
    let mut output = ZSet::new();
    for (value, weight) in zset.data() {
        output.append(projection(value), *weight);
    }
    output.merge_records()
}

/// Emits every pair of records with the product of their weights.
pub fn cartesian_product<A, B>(a: &ZSet<A>, b: &ZSet<B>) -> ZSet<(A, B)>
where
    A: Clone + Eq + Hash,
    B: Clone + Eq + Hash,
{
    let left = a.merge_records();
    let right = b.merge_records();

    let mut output = ZSet::new();
    for (x, wx) in left.data() {
        for (y, wy) in right.data() {
            output.append((x.clone(), y.clone()), mul_weights(*wx, *wy));
        }
    }
    output
}

/// Joins two Z-sets on equal keys.
///
/// Builds a temporary hash index over `b`, then probes it with every
/// record of `a`, emitting the matched pair with the weight product.
/// The stateful variant with persistent indexes lives in the operator
/// runtime crate.
pub fn equi_join<A, B, K, FA, FB>(
    a: &ZSet<A>,
    b: &ZSet<B>,
    key_a: FA,
    key_b: FB,
) -> ZSet<(A, B)>
where
    A: Clone + Eq + Hash,
    B: Clone + Eq + Hash,
    K: Clone + Eq + Hash,
    FA: Fn(&A) -> K,
    FB: Fn(&B) -> K,
{
    let left = a.merge_records();
    let right = b.merge_records();

    let mut index: HashMap<K, Vec<(B, Weight)>> = HashMap::new();
    for (y, wy) in right.data() {
        index
            .entry(key_b(y))
            .or_default()
            .push((y.clone(), *wy));
    }

    let mut output = ZSet::new();
    for (x, wx) in left.data() {
        if let Some(matches) = index.get(&key_a(x)) {
            for (y, wy) in matches {
                output.append((x.clone(), y.clone()), mul_weights(*wx, *wy));
            }
        }
    }
    output
}

/// Intersects two Z-sets over the same domain.
///
/// An equi-join with the identity key on both sides, emitting the
/// shared record once with the weight product.
pub fn intersect<A>(a: &ZSet<A>, b: &ZSet<A>) -> ZSet<A>
where
    A: Clone + Eq + Hash,
{
    let left = a.merge_records();
    let right = b.to_map();

    let mut output = ZSet::new();
    for (value, wx) in left.data() {
        if let Some(wy) = right.get(value) {
            output.append(value.clone(), mul_weights(*wx, *wy));
        }
    }
    output
}

/// Keeps every record whose consolidated weight is strictly positive,
/// with weight 1.
pub fn distinct<A>(zset: &ZSet<A>) -> ZSet<A>
where
    A: Clone + Eq + Hash,
{
    let merged = zset.merge_records();
    let mut output = ZSet::new();
    for (value, weight) in merged.data() {
        if *weight > 0 {
            output.append(value.clone(), 1);
        }
    }
    output
}

/// Set union: `distinct(a + b)`.
pub fn union<A>(a: &ZSet<A>, b: &ZSet<A>) -> ZSet<A>
where
    A: Clone + Eq + Hash,
{
    let mut sum = ZSet::new();
    for (value, weight) in a.data() {
        sum.append(value.clone(), *weight);
    }
    for (value, weight) in b.data() {
        sum.append(value.clone(), *weight);
    }
    distinct(&sum)
}

/// Set difference: `distinct(a - b)`.
pub fn difference<A>(a: &ZSet<A>, b: &ZSet<A>) -> ZSet<A>
where
    A: Clone + Eq + Hash,
{
    let mut diff = ZSet::new();
    for (value, weight) in a.data() {
        diff.append(value.clone(), *weight);
    }
    for (value, weight) in b.data() {
        diff.append(value.clone(), mul_weights(*weight, -1));
    }
    distinct(&diff)
}

/// Sums all weights.
pub fn count<A>(zset: &ZSet<A>) -> Weight {
    zset.data()
        .iter()
        .fold(0, |acc, (_, weight)| add_weights(acc, *weight))
}

/// Sums `f(record) * weight` over the Z-set.
pub fn sum<A, F>(zset: &ZSet<A>, f: F) -> i64
where
    F: Fn(&A) -> i64,
{
    zset.data().iter().fold(0, |acc, (value, weight)| {
        add_weights(acc, mul_weights(f(value), *weight))
    })
}

/// Weighted average of `f(record)`.
///
/// Fails when the total weight is zero, where the average is undefined.
pub fn average<A, F>(zset: &ZSet<A>, f: F) -> Result<f64>
where
    F: Fn(&A) -> i64,
{
    let total = count(zset);
    if total == 0 {
        return Err(Error::empty_aggregate("average"));
    }
    Ok(sum(zset, f) as f64 / total as f64)
}

/// Partitions a Z-set by key, preserving weights within each group.
pub fn group_by<A, K, F>(zset: &ZSet<A>, key: F) -> HashMap<K, ZSet<A>>
where
    A: Clone + Eq + Hash,
    K: Clone + Eq + Hash,
    F: Fn(&A) -> K,
{
    let merged = zset.merge_records();
    let mut groups: HashMap<K, ZSet<A>> = HashMap::new();
    for (value, weight) in merged.data() {
        groups
            .entry(key(value))
            .or_default()
            .append(value.clone(), *weight);
    }
    groups
}

/// Returns the `[offset, offset + limit)` window of the positive
/// records, ordered by the comparator, each with weight 1.
///
/// The sort is stable, so records that compare equal keep their
/// first-appearance order.
pub fn top_k<A, C>(zset: &ZSet<A>, compare: C, limit: usize, offset: usize) -> ZSet<A>
where
    A: Clone + Eq + Hash,
    C: Fn(&A, &A) -> Ordering,
{
    let merged = zset.merge_records();
    let mut survivors: Vec<(A, Weight)> = merged
        .data()
        .iter()
        .filter(|(_, weight)| *weight > 0)
        .cloned()
        .collect();
    survivors.sort_by(|(a, _), (b, _)| compare(a, b));

    let mut output = ZSet::new();
    for (value, _) in survivors.into_iter().skip(offset).take(limit) {
        output.append(value, 1);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::{AbelianGroup, ZSetGroup};
    use alloc::vec;

    #[test]
    fn test_s1_group_and_distinct() {
        // S1: R = {joe -> 1, anne -> -1}, S = {joe -> 2, bob -> 1}
        let r = ZSet::from_pairs(vec![("joe", 1), ("anne", -1)]);
        let s = ZSet::from_pairs(vec![("joe", 2), ("bob", 1)]);
        let group = ZSetGroup::new();

        let expected_sum = ZSet::from_pairs(vec![("joe", 3), ("anne", -1), ("bob", 1)]);
        assert_eq!(group.add(&r, &s), expected_sum);

        let expected_neg = ZSet::from_pairs(vec![("joe", -1), ("anne", 1)]);
        assert_eq!(group.negate(&r), expected_neg);

        assert_eq!(distinct(&r), ZSet::from_pairs(vec![("joe", 1)]));
    }

    #[test]
    fn test_filter_preserves_weights() {
        let zset = ZSet::from_pairs(vec![(1, 2), (2, -1), (3, 5)]);
        let odd = filter(&zset, |x| x % 2 == 1);

        assert_eq!(odd.weight_of(&1), 2);
        assert_eq!(odd.weight_of(&3), 5);
        assert_eq!(odd.weight_of(&2), 0);
    }

    #[test]
    fn test_filter_is_linear() {
        let a = ZSet::from_pairs(vec![(1, 1), (2, 3)]);
        let b = ZSet::from_pairs(vec![(1, -1), (3, 2)]);
        let group = ZSetGroup::new();
        let p = |x: &i32| *x > 1;

        let lhs = filter(&group.add(&a, &b), p);
        let rhs = group.add(&filter(&a, p), &filter(&b, p));
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn test_project_consolidates_images() {
        let zset = ZSet::from_pairs(vec![(10, 1), (11, 2), (20, 1)]);
        let by_tens = project(&zset, |x| x / 10);

        assert_eq!(by_tens.weight_of(&1), 3);
        assert_eq!(by_tens.weight_of(&2), 1);
    }

    #[test]
    fn test_cartesian_product_weights() {
        let a = ZSet::from_pairs(vec![("x", 2)]);
        let b = ZSet::from_pairs(vec![(1, 3), (2, -1)]);
        let product = cartesian_product(&a, &b);

        assert_eq!(product.weight_of(&("x", 1)), 6);
        assert_eq!(product.weight_of(&("x", 2)), -2);
    }

    #[test]
    fn test_equi_join_matches_keys() {
        // (user_id, name) joined with (user_id, item)
        let users = ZSet::from_pairs(vec![((1, "alice"), 1), ((2, "bob"), 1)]);
        let orders = ZSet::from_pairs(vec![((1, "book"), 1), ((1, "pen"), 1), ((3, "mug"), 1)]);

        let joined = equi_join(&users, &orders, |u| u.0, |o| o.0);

        assert_eq!(joined.weight_of(&((1, "alice"), (1, "book"))), 1);
        assert_eq!(joined.weight_of(&((1, "alice"), (1, "pen"))), 1);
        assert_eq!(joined.weight_of(&((2, "bob"), (3, "mug"))), 0);
        assert_eq!(joined.merge_records().len(), 2);
    }

    #[test]
    fn test_equi_join_is_bilinear() {
        let a1 = ZSet::from_pairs(vec![((1, "a"), 1)]);
        let a2 = ZSet::from_pairs(vec![((1, "b"), 2), ((2, "c"), 1)]);
        let b = ZSet::from_pairs(vec![((1, "x"), 3), ((2, "y"), -1)]);
        let group = ZSetGroup::new();
        let pair_group = ZSetGroup::new();

        let lhs = equi_join(&group.add(&a1, &a2), &b, |l: &(i32, &str)| l.0, |r: &(i32, &str)| r.0);
        let rhs = pair_group.add(
            &equi_join(&a1, &b, |l| l.0, |r| r.0),
            &equi_join(&a2, &b, |l| l.0, |r| r.0),
        );
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn test_intersect() {
        let a = ZSet::from_pairs(vec![("x", 2), ("y", 1)]);
        let b = ZSet::from_pairs(vec![("x", 3), ("z", 1)]);
        let both = intersect(&a, &b);

        assert_eq!(both.weight_of(&"x"), 6);
        assert_eq!(both.weight_of(&"y"), 0);
        assert_eq!(both.weight_of(&"z"), 0);
    }

    #[test]
    fn test_distinct_drops_non_positive() {
        let zset = ZSet::from_pairs(vec![("a", 3), ("b", -2), ("c", 1), ("d", 1), ("d", -1)]);
        let set = distinct(&zset);

        assert_eq!(set, ZSet::from_pairs(vec![("a", 1), ("c", 1)]));
        assert!(set.is_set());
    }

    #[test]
    fn test_distinct_fixed_point() {
        let zset = ZSet::from_pairs(vec![("a", 3), ("b", -2), ("c", 1)]);
        assert_eq!(distinct(&distinct(&zset)), distinct(&zset));
    }

    #[test]
    fn test_union_and_difference() {
        let a = ZSet::from_pairs(vec![("x", 1), ("y", 1)]);
        let b = ZSet::from_pairs(vec![("y", 1), ("z", 1)]);

        let either = union(&a, &b);
        assert_eq!(
            either,
            ZSet::from_pairs(vec![("x", 1), ("y", 1), ("z", 1)])
        );

        let only_a = difference(&a, &b);
        assert_eq!(only_a, ZSet::from_pairs(vec![("x", 1)]));
    }

    #[test]
    fn test_aggregates() {
        let zset = ZSet::from_pairs(vec![(10, 2), (20, 1)]);

        assert_eq!(count(&zset), 3);
        assert_eq!(sum(&zset, |x| *x as i64), 40);
        assert_eq!(average(&zset, |x| *x as i64).unwrap(), 40.0 / 3.0);
    }

    #[test]
    fn test_average_of_empty_fails() {
        let zset: ZSet<i32> = ZSet::new();
        assert!(average(&zset, |x| *x as i64).is_err());

        let cancelled = ZSet::from_pairs(vec![(1, 1), (2, -1)]);
        assert!(average(&cancelled, |x| *x as i64).is_err());
    }

    #[test]
    fn test_group_by_partitions() {
        let zset = ZSet::from_pairs(vec![(10, 1), (11, 2), (20, 1)]);
        let groups = group_by(&zset, |x| x / 10);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&1].weight_of(&10), 1);
        assert_eq!(groups[&1].weight_of(&11), 2);
        assert_eq!(groups[&2].weight_of(&20), 1);
    }

    #[test]
    fn test_top_k_window() {
        let prices = ZSet::from_pairs(vec![
            (("laptop", 1000), 1),
            (("phone", 800), 1),
            (("tablet", 600), 2),
            (("cable", 20), -1),
        ]);
        let by_price_desc = |a: &(&str, i32), b: &(&str, i32)| b.1.cmp(&a.1);

        let top2 = top_k(&prices, by_price_desc, 2, 0);
        assert_eq!(
            top2,
            ZSet::from_pairs(vec![(("laptop", 1000), 1), (("phone", 800), 1)])
        );

        let second_page = top_k(&prices, by_price_desc, 2, 2);
        assert_eq!(second_page, ZSet::from_pairs(vec![(("tablet", 600), 1)]));
    }

    #[test]
    fn test_top_k_ties_keep_first_appearance_order() {
        let zset = ZSet::from_pairs(vec![(("b", 5), 1), (("a", 5), 1), (("c", 5), 1)]);
        let by_score = |x: &(&str, i32), y: &(&str, i32)| y.1.cmp(&x.1);

        let top1 = top_k(&zset, by_score, 1, 0);
        assert_eq!(top1, ZSet::from_pairs(vec![(("b", 5), 1)]));
    }
}
