//! Subscription management for delta fan-out.
//!
//! Subscribers register callbacks that receive Z-set deltas. Delivery
//! order within one notification is deterministic: subscribers are
//! called in the order they subscribed.

use alloc::boxed::Box;
use alloc::vec::Vec;
use hashbrown::HashMap;
use rill_algebra::ZSet;

/// Unique identifier for a subscription.
pub type SubscriptionId = u64;

/// Callback type for delta notifications.
///
/// The delta handed to a callback is an immutable view; a subscriber
/// that needs to keep it must clone it.
pub type DeltaCallback<T> = Box<dyn Fn(&ZSet<T>)>;

/// A subscription to delta notifications.
pub struct Subscription<T> {
    id: SubscriptionId,
    callback: DeltaCallback<T>,
    active: bool,
}

impl<T> Subscription<T> {
    /// Creates a new subscription.
    pub fn new<F>(id: SubscriptionId, callback: F) -> Self
    where
        F: Fn(&ZSet<T>) + 'static,
    {
        Self {
            id,
            callback: Box::new(callback),
            active: true,
        }
    }

    /// Returns the subscription ID.
    #[inline]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns whether this subscription is active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Deactivates this subscription without removing it.
    #[inline]
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Notifies this subscription of a delta.
    pub fn notify(&self, delta: &ZSet<T>) {
        if self.active {
            (self.callback)(delta);
        }
    }
}

/// Manages the subscriber set of one operator output.
///
/// Subscriptions are stored by ID with a separate insertion-order
/// list, so `notify_all` always delivers in subscription order.
/// Callbacks cannot re-enter the manager: subscribing and
/// unsubscribing need exclusive access, while notification holds a
/// shared borrow for its whole duration.
pub struct SubscriptionManager<T> {
    subscriptions: HashMap<SubscriptionId, Subscription<T>>,
    /// IDs in subscription order; drives delivery order.
    order: Vec<SubscriptionId>,
    next_id: SubscriptionId,
}

impl<T> Default for SubscriptionManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SubscriptionManager<T> {
    /// Creates a new subscription manager.
    pub fn new() -> Self {
        Self {
            subscriptions: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
        }
    }

    /// Subscribes to deltas with the given callback.
    ///
    /// Returns the subscription ID that can be used to unsubscribe.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&ZSet<T>) + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;

        self.subscriptions.insert(id, Subscription::new(id, callback));
        self.order.push(id);

        id
    }

    /// Unsubscribes by ID.
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        if self.subscriptions.remove(&id).is_some() {
            self.order.retain(|existing| *existing != id);
            true
        } else {
            false
        }
    }

    /// Notifies a specific subscription of a delta.
    pub fn notify(&self, id: SubscriptionId, delta: &ZSet<T>) {
        if let Some(subscription) = self.subscriptions.get(&id) {
            subscription.notify(delta);
        }
    }

    /// Notifies every active subscription, in subscription order.
    ///
    /// A callback that panics aborts delivery to the remaining
    /// subscribers; the publisher's state is unaffected because it is
    /// updated before fan-out.
    pub fn notify_all(&self, delta: &ZSet<T>) {
        for id in &self.order {
            if let Some(subscription) = self.subscriptions.get(id) {
                subscription.notify(delta);
            }
        }
    }

    /// Returns the number of subscriptions.
    #[inline]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Returns true if there are no subscriptions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Returns all subscription IDs in subscription order.
    pub fn subscription_ids(&self) -> &[SubscriptionId] {
        &self.order
    }

    /// Clears all subscriptions.
    pub fn clear(&mut self) {
        self.subscriptions.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    #[test]
    fn test_subscription_new() {
        let subscription: Subscription<&str> = Subscription::new(1, |_| {});
        assert_eq!(subscription.id(), 1);
        assert!(subscription.is_active());
    }

    #[test]
    fn test_subscription_deactivate() {
        let called = Rc::new(RefCell::new(false));
        let called_clone = called.clone();

        let mut subscription = Subscription::new(1, move |_: &ZSet<&str>| {
            *called_clone.borrow_mut() = true;
        });
        subscription.deactivate();
        assert!(!subscription.is_active());

        subscription.notify(&ZSet::insert("joe"));
        assert!(!*called.borrow());
    }

    #[test]
    fn test_subscribe_and_notify_all() {
        let mut manager = SubscriptionManager::new();

        let count = Rc::new(RefCell::new(0));
        let count1 = count.clone();
        let count2 = count.clone();

        manager.subscribe(move |_: &ZSet<&str>| {
            *count1.borrow_mut() += 1;
        });
        manager.subscribe(move |_: &ZSet<&str>| {
            *count2.borrow_mut() += 1;
        });

        manager.notify_all(&ZSet::insert("joe"));
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn test_delivery_in_subscription_order() {
        let mut manager = SubscriptionManager::new();

        let log = Rc::new(RefCell::new(Vec::new()));
        for label in ["first", "second", "third"] {
            let log = log.clone();
            manager.subscribe(move |_: &ZSet<&str>| {
                log.borrow_mut().push(label);
            });
        }

        manager.notify_all(&ZSet::insert("joe"));
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut manager = SubscriptionManager::new();

        let id = manager.subscribe(|_: &ZSet<&str>| {});
        assert_eq!(manager.len(), 1);

        assert!(manager.unsubscribe(id));
        assert!(manager.is_empty());
        assert!(manager.subscription_ids().is_empty());

        assert!(!manager.unsubscribe(id)); // Already removed
    }

    #[test]
    fn test_notify_specific() {
        let mut manager = SubscriptionManager::new();

        let count = Rc::new(RefCell::new(0));
        let count1 = count.clone();
        let count2 = count.clone();

        let id1 = manager.subscribe(move |_: &ZSet<&str>| {
            *count1.borrow_mut() += 1;
        });
        let _id2 = manager.subscribe(move |_: &ZSet<&str>| {
            *count2.borrow_mut() += 10;
        });

        manager.notify(id1, &ZSet::insert("joe"));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_clear() {
        let mut manager = SubscriptionManager::new();
        manager.subscribe(|_: &ZSet<&str>| {});
        manager.subscribe(|_: &ZSet<&str>| {});

        manager.clear();
        assert!(manager.is_empty());
    }
}
