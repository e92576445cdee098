//! Rill Operators - the stateful incremental operator runtime.
//!
//! Stateless relational operators recompute their output from whole
//! Z-sets; the operators in this crate instead hold onto state between
//! calls so that each batch of deltas is processed in time proportional
//! to the delta, not to the accumulated data.
//!
//! # Core Concepts
//!
//! - `StatefulJoin`: persistent hash indexes on both join inputs plus a
//!   materialized view of the join result, maintained with the bilinear
//!   delta formula.
//! - `StatefulTopK`: an ordered window over the positive records,
//!   emitting the delta of the window after every change.
//! - `DistinctDelta`: incremental distinct that emits only on
//!   positivity transitions.
//! - `BilinearDelta`: the generic three-term delta form for any
//!   bilinear operator.
//!
//! # Example
//!
//! ```ignore
//! use rill_algebra::ZSet;
//! use rill_operators::StatefulJoin;
//!
//! let mut join = StatefulJoin::new(|user: &(u32, &str)| user.0,
//!                                  |order: &(u32, &str)| order.0);
//! let users = ZSet::from_pairs(vec![((1, "alice"), 1)]);
//! let orders = ZSet::from_pairs(vec![((1, "book"), 1)]);
//!
//! let delta = join.initialize(&users, &orders);
//! assert_eq!(delta.weight_of(&((1, "alice"), (1, "book"))), 1);
//! ```

#![no_std]

extern crate alloc;

pub mod bilinear;
pub mod distinct;
pub mod join;
pub mod topk;

pub use bilinear::BilinearDelta;
pub use distinct::DistinctDelta;
pub use join::StatefulJoin;
pub use topk::{StatefulTopK, TopKState};
