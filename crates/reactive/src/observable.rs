//! Observable materialized view.
//!
//! An `ObservableView` sits at the output of an operator pipeline: the
//! pipeline publishes its output deltas here, the view integrates them
//! into the current result, and subscribers are notified of every
//! delta after the result has been updated.

use crate::subscription::{SubscriptionId, SubscriptionManager};
use core::hash::Hash;
use hashbrown::HashMap;
use rill_algebra::{add_weights, Weight, ZSet};

/// A materialized Z-set maintained from published deltas, with
/// subscriber fan-out.
///
/// Reads are pull-based (`get_materialized_view`), notifications are
/// push-based, and the two are consistent: by the time a subscriber
/// runs, the view already reflects the delta it is being told about.
pub struct ObservableView<T> {
    /// Current result: record to its consolidated weight.
    state: HashMap<T, Weight>,
    subscriptions: SubscriptionManager<T>,
}

impl<T> Default for ObservableView<T>
where
    T: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ObservableView<T>
where
    T: Clone + Eq + Hash,
{
    /// Creates an empty observable view.
    pub fn new() -> Self {
        Self {
            state: HashMap::new(),
            subscriptions: SubscriptionManager::new(),
        }
    }

    /// Subscribes to published deltas.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&ZSet<T>) + 'static,
    {
        self.subscriptions.subscribe(callback)
    }

    /// Unsubscribes by ID. Returns true if the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.unsubscribe(id)
    }

    /// Publishes a delta: folds it into the view, then notifies every
    /// subscriber in subscription order.
    ///
    /// The delta is canonicalized before delivery, so subscribers see
    /// one entry per changed record.
    pub fn publish(&mut self, delta: &ZSet<T>) {
        let merged = delta.merge_records();
        if merged.is_empty() {
            return;
        }

        for (record, weight) in merged.data() {
            let entry = self.state.entry(record.clone()).or_insert(0);
            *entry = add_weights(*entry, *weight);
            if *entry == 0 {
                self.state.remove(record);
            }
        }

        self.subscriptions.notify_all(&merged);
    }

    /// Returns the current result as a Z-set.
    pub fn get_materialized_view(&self) -> ZSet<T> {
        let mut view = ZSet::new();
        for (record, weight) in &self.state {
            view.append(record.clone(), *weight);
        }
        view
    }

    /// Returns the consolidated weight of a record in the view.
    pub fn weight_of(&self, record: &T) -> Weight {
        self.state.get(record).copied().unwrap_or(0)
    }

    /// Returns the number of records with non-zero weight.
    #[inline]
    pub fn len(&self) -> usize {
        self.state.len()
    }

    /// Returns true if the view holds no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Returns the number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Clears the materialized state. Subscriptions survive a reset;
    /// use `clear_subscriptions` to drop them too.
    pub fn reset(&mut self) {
        self.state.clear();
    }

    /// Removes every subscription.
    pub fn clear_subscriptions(&mut self) {
        self.subscriptions.clear();
    }
}
