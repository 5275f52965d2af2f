//! Observable state containers.
//!
//! A [`Store`] holds one immutable snapshot and publishes full replacements to
//! its subscribers. There are no field-level updates: writers build the next
//! value from the current one and hand it over whole.
//!
//! Everything runs on one thread. A replacement issued from inside a
//! subscriber (e.g. the render driver writing a corrected scale) is queued
//! and delivered once the current round of notifications has finished, so
//! every subscriber observes the same ordered sequence of values.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

type Subscriber<T> = Rc<dyn Fn(&T)>;

struct Inner<T> {
    name: &'static str,
    value: RefCell<Rc<T>>,
    subscribers: RefCell<Vec<(u64, Subscriber<T>)>>,
    pending: RefCell<VecDeque<T>>,
    dispatching: Cell<bool>,
    next_id: Cell<u64>,
}

/// Single-writer observable value. Cloning yields another handle to the same
/// store.
pub struct Store<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.inner.name)
            .field("subscribers", &self.inner.subscribers.borrow().len())
            .finish()
    }
}

impl<T: 'static> Store<T> {
    /// Create a store holding `initial`. The name only shows up in logs.
    pub fn new(name: &'static str, initial: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                name,
                value: RefCell::new(Rc::new(initial)),
                subscribers: RefCell::new(Vec::new()),
                pending: RefCell::new(VecDeque::new()),
                dispatching: Cell::new(false),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Current snapshot.
    pub fn get(&self) -> Rc<T> {
        Rc::clone(&self.inner.value.borrow())
    }

    /// Publish a full replacement.
    ///
    /// When called while subscribers are being notified, the value is queued
    /// and becomes current only after the ongoing round completes.
    pub fn replace(&self, next: T) {
        self.inner.pending.borrow_mut().push_back(next);
        if self.inner.dispatching.replace(true) {
            log::trace!("Store '{}': replacement queued", self.inner.name);
            return;
        }

        loop {
            let next = self.inner.pending.borrow_mut().pop_front();
            let Some(next) = next else {
                break;
            };
            let snapshot = Rc::new(next);
            *self.inner.value.borrow_mut() = Rc::clone(&snapshot);

            let subscribers: Vec<Subscriber<T>> = self
                .inner
                .subscribers
                .borrow()
                .iter()
                .map(|(_, subscriber)| Rc::clone(subscriber))
                .collect();
            log::trace!(
                "Store '{}': notifying {} subscribers",
                self.inner.name,
                subscribers.len()
            );
            for subscriber in subscribers {
                subscriber(&snapshot);
            }
        }

        self.inner.dispatching.set(false);
    }

    /// Read the current value, derive the next one and publish it.
    ///
    /// `f` returning `None` leaves the store untouched and notifies nobody.
    /// Returns whether a replacement was published.
    pub fn update(&self, f: impl FnOnce(&T) -> Option<T>) -> bool {
        let current = self.get();
        match f(&current) {
            Some(next) => {
                self.replace(next);
                true
            }
            None => false,
        }
    }

    /// Register `f` for every future replacement. The registration lasts as
    /// long as the returned [`Subscription`].
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner.subscribers.borrow_mut().push((id, Rc::new(f)));

        let weak: Weak<Inner<T>> = Rc::downgrade(&self.inner);
        Subscription {
            release: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.subscribers.borrow_mut().retain(|(sid, _)| *sid != id);
                }
            })),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }
}

/// Guard for a store subscription. Dropping it unregisters the subscriber.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_notifies_in_order() {
        let store = Store::new("numbers", 0);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let _sub = store.subscribe(move |v: &i32| sink.borrow_mut().push(*v));

        store.replace(1);
        store.replace(2);

        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert_eq!(*store.get(), 2);
    }

    #[test]
    fn test_drop_subscription_unsubscribes() {
        let store = Store::new("numbers", 0);
        let count = Rc::new(Cell::new(0));

        let counter = Rc::clone(&count);
        let sub = store.subscribe(move |_: &i32| counter.set(counter.get() + 1));
        assert_eq!(store.subscriber_count(), 1);

        store.replace(1);
        drop(sub);
        store.replace(2);

        assert_eq!(count.get(), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_nested_replace_is_queued() {
        let store = Store::new("numbers", 0);
        let first_seen = Rc::new(RefCell::new(Vec::new()));
        let second_seen = Rc::new(RefCell::new(Vec::new()));

        // First subscriber bumps odd values to the next even one
        let writer = store.clone();
        let sink = Rc::clone(&first_seen);
        let _a = store.subscribe(move |v: &i32| {
            sink.borrow_mut().push(*v);
            if v % 2 == 1 {
                writer.replace(v + 1);
            }
        });
        let sink = Rc::clone(&second_seen);
        let _b = store.subscribe(move |v: &i32| sink.borrow_mut().push(*v));

        store.replace(1);

        // Both subscribers see 1 before 2
        assert_eq!(*first_seen.borrow(), vec![1, 2]);
        assert_eq!(*second_seen.borrow(), vec![1, 2]);
        assert_eq!(*store.get(), 2);
    }

    #[test]
    fn test_update_none_is_silent() {
        let store = Store::new("numbers", 5);
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let _sub = store.subscribe(move |_: &i32| counter.set(counter.get() + 1));

        assert!(!store.update(|_| None));
        assert_eq!(count.get(), 0);

        assert!(store.update(|v| Some(v + 1)));
        assert_eq!(*store.get(), 6);
        assert_eq!(count.get(), 1);
    }
}
