//! Rill Circuit - typed composable dataflow pipelines.
//!
//! A `Circuit<A, B>` wraps a stream operator from `Stream<A>` to
//! `Stream<B>` behind a composable value: circuits chain with
//! `compose` and run with `execute`. The static constructors bind the
//! relational operators to their incremental forms:
//!
//! - linear operators (filter, map, project) are lifted pointwise;
//! - bilinear operators (equi-join, cartesian product, intersect) use
//!   the three-term delta form with cumulative inputs;
//! - distinct uses the positivity-transition increment;
//! - union and difference decompose into a lifted linear step followed
//!   by incremental distinct;
//! - the remaining non-linear operators (top-k, aggregates) are wrapped
//!   in the generic `D . Q . I` incrementalization.
//!
//! Every circuit consumes and produces *delta* streams: feeding it the
//! derivative of a relation stream yields the derivative of the query
//! result.
//!
//! # Example
//!
//! ```ignore
//! use rill_algebra::ZSet;
//! use rill_circuit::Circuit;
//! use rill_stream::Stream;
//!
//! let adults = Circuit::filter(|age: &i64| *age >= 18);
//! let doubled = adults.compose(Circuit::project(|age: &i64| age * 2));
//!
//! let mut deltas = Stream::new(ZSet::new());
//! deltas.set(0, ZSet::insert(21));
//! let result = doubled.execute(&deltas);
//! assert_eq!(result.at(0).weight_of(&42), 1);
//! ```

#![no_std]

extern crate alloc;

pub mod circuit;

pub use circuit::Circuit;
