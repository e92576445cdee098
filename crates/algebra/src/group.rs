//! Abelian group witnesses.
//!
//! Stream operators are generic over the group structure of their
//! element type: they need a zero, pointwise addition, and negation.
//! Rather than requiring element types to implement arithmetic traits,
//! the group is passed as an explicit witness value, which also allows
//! several group structures over the same type.

use crate::weight::{add_weights, neg_weight};
use crate::zset::ZSet;
use core::hash::Hash;
use core::marker::PhantomData;

/// An abelian group over `A`: `(zero, add, negate)`.
///
/// Implementations must satisfy commutativity, associativity, the
/// identity law `add(a, zero) == a` and the inverse law
/// `add(a, negate(a)) == zero`.
pub trait AbelianGroup<A> {
    /// The neutral element.
    fn zero(&self) -> A;

    /// Adds two elements.
    fn add(&self, a: &A, b: &A) -> A;

    /// Negates an element.
    fn negate(&self, a: &A) -> A;

    /// Subtracts `b` from `a`.
    fn subtract(&self, a: &A, b: &A) -> A {
        self.add(a, &self.negate(b))
    }

    /// Returns true if `a` is the neutral element.
    fn is_zero(&self, a: &A) -> bool
    where
        A: PartialEq,
    {
        *a == self.zero()
    }
}

/// The group of Z-sets over `A` under pointwise weight addition.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZSetGroup<A> {
    _marker: PhantomData<A>,
}

impl<A> ZSetGroup<A> {
    /// Creates the Z-set group witness.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<A> AbelianGroup<ZSet<A>> for ZSetGroup<A>
where
    A: Clone + Eq + Hash,
{
    fn zero(&self) -> ZSet<A> {
        ZSet::new()
    }

    fn add(&self, a: &ZSet<A>, b: &ZSet<A>) -> ZSet<A> {
        let mut sum = ZSet::new();
        for (value, weight) in a.data() {
            sum.append(value.clone(), *weight);
        }
        for (value, weight) in b.data() {
            sum.append(value.clone(), *weight);
        }
        sum.merge_records()
    }

    fn negate(&self, a: &ZSet<A>) -> ZSet<A> {
        a.multiply(-1)
    }
}

/// The product group on pairs, built from the component groups.
///
/// Used for two-input operators: a paired stream over
/// `(ZSet<T>, ZSet<U>)` carries both inputs through one circuit.
#[derive(Clone, Copy, Debug, Default)]
pub struct PairGroup<GA, GB> {
    first: GA,
    second: GB,
}

impl<GA, GB> PairGroup<GA, GB> {
    /// Creates a product group from the component witnesses.
    pub fn new(first: GA, second: GB) -> Self {
        Self { first, second }
    }
}

impl<A, B, GA, GB> AbelianGroup<(A, B)> for PairGroup<GA, GB>
where
    GA: AbelianGroup<A>,
    GB: AbelianGroup<B>,
{
    fn zero(&self) -> (A, B) {
        (self.first.zero(), self.second.zero())
    }

    fn add(&self, a: &(A, B), b: &(A, B)) -> (A, B) {
        (self.first.add(&a.0, &b.0), self.second.add(&a.1, &b.1))
    }

    fn negate(&self, a: &(A, B)) -> (A, B) {
        (self.first.negate(&a.0), self.second.negate(&a.1))
    }
}

/// The integers under checked addition.
#[derive(Clone, Copy, Debug, Default)]
pub struct I64Group;

impl I64Group {
    /// Creates the integer group witness.
    pub fn new() -> Self {
        Self
    }
}

impl AbelianGroup<i64> for I64Group {
    fn zero(&self) -> i64 {
        0
    }

    fn add(&self, a: &i64, b: &i64) -> i64 {
        add_weights(*a, *b)
    }

    fn negate(&self, a: &i64) -> i64 {
        neg_weight(*a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_zset_group_add() {
        // S1: R = {joe -> 1, anne -> -1}, S = {joe -> 2, bob -> 1}
        let r = ZSet::from_pairs(vec![("joe", 1), ("anne", -1)]);
        let s = ZSet::from_pairs(vec![("joe", 2), ("bob", 1)]);
        let group = ZSetGroup::new();

        let sum = group.add(&r, &s);
        assert_eq!(sum.weight_of(&"joe"), 3);
        assert_eq!(sum.weight_of(&"anne"), -1);
        assert_eq!(sum.weight_of(&"bob"), 1);
    }

    #[test]
    fn test_zset_group_negate() {
        let r = ZSet::from_pairs(vec![("joe", 1), ("anne", -1)]);
        let group = ZSetGroup::new();

        let negated = group.negate(&r);
        assert_eq!(negated.weight_of(&"joe"), -1);
        assert_eq!(negated.weight_of(&"anne"), 1);
    }

    #[test]
    fn test_zset_group_inverse_law() {
        let r = ZSet::from_pairs(vec![("joe", 1), ("anne", -1)]);
        let group = ZSetGroup::new();

        let cancelled = group.add(&r, &group.negate(&r));
        assert!(group.is_zero(&cancelled));
    }

    #[test]
    fn test_zset_group_subtract() {
        let r = ZSet::from_pairs(vec![("joe", 3)]);
        let s = ZSet::from_pairs(vec![("joe", 1), ("bob", 1)]);
        let group = ZSetGroup::new();

        let diff = group.subtract(&r, &s);
        assert_eq!(diff.weight_of(&"joe"), 2);
        assert_eq!(diff.weight_of(&"bob"), -1);
    }

    #[test]
    fn test_pair_group() {
        let group = PairGroup::new(ZSetGroup::new(), I64Group::new());
        let a = (ZSet::from_pairs(vec![("x", 1)]), 3i64);
        let b = (ZSet::from_pairs(vec![("x", 2)]), -1i64);

        let sum = group.add(&a, &b);
        assert_eq!(sum.0.weight_of(&"x"), 3);
        assert_eq!(sum.1, 2);

        let zero = group.zero();
        assert!(zero.0.is_empty());
        assert_eq!(zero.1, 0);
    }

    #[test]
    fn test_i64_group_laws() {
        let group = I64Group::new();
        assert_eq!(group.add(&2, &3), 5);
        assert_eq!(group.negate(&2), -2);
        assert_eq!(group.add(&2, &group.negate(&2)), group.zero());
    }
}
