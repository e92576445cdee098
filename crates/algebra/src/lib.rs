//! Rill Algebra - Z-set algebra for incremental view maintenance.
//!
//! This crate implements the data model of a DBSP-style engine: Z-sets
//! (multisets with signed integer multiplicities), the abelian group
//! structure over them, and the stateless relational operators that the
//! rest of the engine lifts and incrementalizes.
//!
//! # Core Concepts
//!
//! - `ZSet<A>`: A signed multiset mapping records to integer weights.
//!   Positive weights are insertions, negative weights are deletions.
//! - `AbelianGroup<A>`: A witness for `(zero, add, negate)` over some
//!   value type. `ZSetGroup` is the group of Z-sets.
//! - Stateless operators (`ops`): filter, project, join, distinct,
//!   top-k and friends, as pure functions from Z-sets to Z-sets.
//!
//! # Example
//!
//! ```ignore
//! use rill_algebra::{ZSet, ZSetGroup, AbelianGroup, ops};
//!
//! let mut r = ZSet::new();
//! r.append("joe", 1);
//! r.append("anne", -1);
//!
//! let group = ZSetGroup::new();
//! let doubled = group.add(&r, &r);
//! assert_eq!(doubled.weight_of(&"joe"), 2);
//!
//! // distinct keeps strictly positive records with weight 1
//! assert_eq!(ops::distinct(&r).weight_of(&"joe"), 1);
//! ```

#![no_std]

extern crate alloc;

pub mod error;
pub mod group;
pub mod ops;
pub mod weight;
pub mod zset;

pub use error::{Error, Result};
pub use group::{AbelianGroup, I64Group, PairGroup, ZSetGroup};
pub use weight::{add_weights, mul_weights, neg_weight, Weight};
pub use zset::ZSet;
