//! Weight arithmetic for Z-sets.
//!
//! Weights are conceptually unbounded integers. This implementation uses
//! `i64` with checked arithmetic that panics on overflow rather than
//! silently wrapping into a wrong multiplicity.

/// Multiplicity of a record in a Z-set.
///
/// `+1` is a plain insertion, `-1` a deletion; other values represent
/// repeated insertions or retractions.
pub type Weight = i64;

/// Adds two weights, panicking on overflow.
#[inline]
pub fn add_weights(a: Weight, b: Weight) -> Weight {
    a.checked_add(b).unwrap_or_else(|| weight_overflow("add"))
}

/// Multiplies two weights, panicking on overflow.
#[inline]
pub fn mul_weights(a: Weight, b: Weight) -> Weight {
    a.checked_mul(b).unwrap_or_else(|| weight_overflow("mul"))
}

/// Negates a weight, panicking on overflow.
#[inline]
pub fn neg_weight(a: Weight) -> Weight {
    a.checked_neg().unwrap_or_else(|| weight_overflow("neg"))
}

#[cold]
#[inline(never)]
fn weight_overflow(op: &str) -> ! {
    panic!("weight overflow in {}", op)
}
