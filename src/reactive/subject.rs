//! Subject - stateful broadcast primitive.
//!
//! A subject holds the last emitted value and a list of subscribers. Emitting
//! notifies, synchronously and in registration order, exactly the subscribers
//! that were registered when the emission started:
//!
//! - subscribers added during an emission wait for the next one
//! - subscribers removed during an emission are skipped if not yet called
//!
//! Subscribing does not replay the current value.
//!
//! # Example
//!
//! ```ignore
//! use spark_components::reactive::Subject;
//!
//! let subject = Subject::<i32>::new();
//! let sub = subject.subscribe(|v: &i32| println!("got {v}"));
//! subject.emit(1); // prints "got 1"
//! sub.unsubscribe();
//! subject.emit(2); // prints nothing
//! assert_eq!(subject.get_value(), Some(2));
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use super::observable::Observable;
use super::subscription::Subscription;
use crate::runtime::EventLoop;

struct Slot<T> {
    id: u64,
    active: Cell<bool>,
    callback: Box<dyn Fn(&T)>,
}

struct SubjectInner<T> {
    value: RefCell<Option<T>>,
    slots: RefCell<Vec<Rc<Slot<T>>>>,
    next_id: Cell<u64>,
}

/// Hot broadcast stream with a current value.
///
/// Cloning yields another handle to the same subject.
pub struct Subject<T> {
    inner: Rc<SubjectInner<T>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Subject<T> {
    /// Create a subject with no value and no subscribers.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(SubjectInner {
                value: RefCell::new(None),
                slots: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Register a subscriber.
    pub fn subscribe(&self, on_next: impl Fn(&T) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);

        let slot = Rc::new(Slot {
            id,
            active: Cell::new(true),
            callback: Box::new(on_next),
        });
        let weak_slot = Rc::downgrade(&slot);
        self.inner.slots.borrow_mut().push(slot);

        let weak_inner: Weak<SubjectInner<T>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(slot) = weak_slot.upgrade() {
                slot.active.set(false);
            }
            if let Some(inner) = weak_inner.upgrade() {
                inner.slots.borrow_mut().retain(|slot| slot.id != id);
            }
        })
    }

    /// Store `value` as current and notify the subscribers registered right now.
    pub fn emit(&self, value: T) {
        *self.inner.value.borrow_mut() = Some(value.clone());

        // Snapshot so callbacks may subscribe/unsubscribe freely
        let snapshot: Vec<Rc<Slot<T>>> = self.inner.slots.borrow().clone();
        tracing::trace!(subscribers = snapshot.len(), "subject emit");

        for slot in snapshot {
            if slot.active.get() {
                (slot.callback)(&value);
            }
        }
    }

    /// Last emitted value, `None` before the first emission.
    pub fn get_value(&self) -> Option<T> {
        self.inner.value.borrow().clone()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.slots.borrow().len()
    }

    /// View this subject as a cold [`Observable`] so operators can be chained.
    pub fn as_observable(&self) -> Observable<T> {
        let subject = self.clone();
        Observable::new(move |observer| subject.subscribe(move |value| observer(value)))
    }

    /// Coalesce emissions arriving less than `window` apart into one.
    pub fn debounce(&self, event_loop: &EventLoop, window: Duration) -> Observable<T> {
        self.as_observable().debounce(event_loop, window)
    }
}

// =============================================================================
// Tests
// =============================================================================
