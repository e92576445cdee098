//! Rill Stream - the stream calculus underlying incrementalization.
//!
//! A stream is a total function from discrete time to a group element,
//! stored sparsely. The calculus consists of four operators:
//!
//! - `lift(f)`: apply `f` pointwise at every time.
//! - `delay` (z⁻¹): shift the stream one step forward in time.
//! - `integrate` (I): running sum of all values up to each time.
//! - `differentiate` (D): difference between consecutive values.
//!
//! `I` and `D` are mutual inverses on streams that are zero almost
//! everywhere, which is what makes incrementalization work:
//! `incrementalize(Q) = D . Q . I` turns a snapshot query into an
//! equivalent delta-to-delta operator.
//!
//! # Example
//!
//! ```ignore
//! use rill_algebra::{ZSet, ZSetGroup};
//! use rill_stream::{Stream, operators};
//!
//! let group = ZSetGroup::new();
//! let mut deltas = Stream::new(ZSet::new());
//! deltas.set(0, ZSet::insert("joe"));
//! deltas.set(1, ZSet::insert("anne"));
//!
//! // The integral at time 1 holds both records.
//! let snapshots = operators::integrate(&deltas, &group);
//! assert_eq!(snapshots.at(1).weight_of(&"anne"), 1);
//! ```

#![no_std]

extern crate alloc;

pub mod operators;
pub mod stream;

pub use operators::{delay, differentiate, incrementalize, integrate, lift};
pub use stream::Stream;
