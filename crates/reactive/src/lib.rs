//! Rill Reactive - delta fan-out for incremental query results.
//!
//! The operator runtime produces Z-set deltas; this crate delivers
//! them. An `ObservableView` integrates published deltas into a
//! materialized result that can be read at any time, and forwards each
//! delta to its subscribers in a deterministic order.
//!
//! # Core Concepts
//!
//! - `Subscription` / `SubscriptionManager`: callback registration with
//!   insertion-ordered delivery.
//! - `ObservableView`: a materialized Z-set fed by deltas, with
//!   pull-based reads and push-based notification.
//!
//! # Example
//!
//! ```ignore
//! use rill_algebra::ZSet;
//! use rill_reactive::ObservableView;
//!
//! let mut view = ObservableView::new();
//! view.subscribe(|delta: &ZSet<&str>| {
//!     // react to the change
//! });
//!
//! view.publish(&ZSet::insert("joe"));
//! assert_eq!(view.get_materialized_view().weight_of(&"joe"), 1);
//! ```

#![no_std]

extern crate alloc;

pub mod observable;
pub mod subscription;

pub use observable::ObservableView;
pub use subscription::{DeltaCallback, Subscription, SubscriptionId, SubscriptionManager};
