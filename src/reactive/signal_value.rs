//! SignalValue - a handle on one signal cell plus an operator chain.
//!
//! Reading a [`Signal`](super::Signal) field yields a `SignalValue` bound to
//! that (signal, key) cell. Operators return new derived handles that wrap the
//! upstream chain plus one stage; the chain only attaches to the cell when
//! `observe` is called.
//!
//! # Example
//!
//! ```ignore
//! let signal = Signal::create([("count", 0), ("step", 1)]);
//! let doubled = signal.get("count")?.map(|v| v * 2);
//! doubled.observe(|v| println!("doubled = {v}"));
//! signal.set("count", 21)?; // prints "doubled = 42"
//! ```

use std::cell::RefCell;
use std::ops::Not;
use std::rc::Rc;
use std::time::Duration;

use super::observable::Observable;
use super::subject::Subject;
use super::subscription::Subscription;
use crate::runtime::EventLoop;

/// Reactive handle over the cell `key` of a signal whose raw values are `V`,
/// delivering `T` values through its operator chain.
pub struct SignalValue<V, T = V> {
    cell: Subject<V>,
    key: Rc<str>,
    observable: Observable<T>,
    observer_value: Rc<RefCell<Option<T>>>,
    subscription: RefCell<Option<Subscription>>,
}

impl<V: Clone + 'static> SignalValue<V> {
    /// Direct reference to a cell.
    pub(crate) fn direct(cell: Subject<V>, key: Rc<str>) -> Self {
        let observable = cell.as_observable();
        SignalValue {
            cell,
            key,
            observable,
            observer_value: Rc::new(RefCell::new(None)),
            subscription: RefCell::new(None),
        }
    }
}

impl<V: Clone + 'static, T: Clone + 'static> SignalValue<V, T> {
    fn derive<U: Clone + 'static>(&self, observable: Observable<U>) -> SignalValue<V, U> {
        SignalValue {
            cell: self.cell.clone(),
            key: self.key.clone(),
            observable,
            observer_value: Rc::new(RefCell::new(None)),
            subscription: RefCell::new(None),
        }
    }

    /// Key of the bound cell.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw current value of the bound cell.
    pub fn get_value(&self) -> Option<V> {
        self.cell.get_value()
    }

    /// Last value actually delivered through the operator chain.
    ///
    /// Lags [`get_value`](Self::get_value) until the first delivery.
    pub fn get_observer_value(&self) -> Option<T> {
        self.observer_value.borrow().clone()
    }

    /// The operator chain as a plain observable.
    pub fn as_observable(&self) -> Observable<T> {
        self.observable.clone()
    }

    /// Alias of the same cell with no operator stages and no new storage.
    pub fn dup(&self) -> SignalValue<V> {
        SignalValue::direct(self.cell.clone(), self.key.clone())
    }

    // =========================================================================
    // Operators
    // =========================================================================

    pub fn map<U: Clone + 'static>(&self, f: impl Fn(&T) -> U + 'static) -> SignalValue<V, U> {
        self.derive(self.observable.map(f))
    }

    pub fn tap(&self, f: impl Fn(&T) + 'static) -> SignalValue<V, T> {
        self.derive(self.observable.tap(f))
    }

    pub fn filter(&self, predicate: impl Fn(&T) -> bool + 'static) -> SignalValue<V, T> {
        self.derive(self.observable.filter(predicate))
    }

    pub fn skip(&self, count: usize) -> SignalValue<V, T> {
        self.derive(self.observable.skip(count))
    }

    pub fn scan<A: Clone + 'static>(
        &self,
        f: impl Fn(&A, &T) -> A + 'static,
        init: A,
    ) -> SignalValue<V, A> {
        self.derive(self.observable.scan(f, init))
    }

    /// Pair this chain with another; the raw cell stays the one of `self`.
    pub fn combine_latest<W: Clone + 'static, U: Clone + 'static>(
        &self,
        other: &SignalValue<W, U>,
    ) -> SignalValue<V, (T, U)> {
        self.derive(self.observable.combine_latest(&other.observable))
    }

    /// Combine this chain with any number of same-typed chains.
    pub fn combine_latest_all<W: Clone + 'static>(
        &self,
        others: &[&SignalValue<W, T>],
    ) -> SignalValue<V, Vec<T>> {
        let mut sources = Vec::with_capacity(others.len() + 1);
        sources.push(self.observable.clone());
        sources.extend(others.iter().map(|other| other.observable.clone()));
        self.derive(Observable::combine_latest_all(sources))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Attach `on_next` to the chain.
    ///
    /// The handle owns one subscription at a time: observing again detaches
    /// the previous observer.
    pub fn observe(&self, on_next: impl Fn(&T) + 'static) -> Subscription {
        self.attach(self.observable.clone(), on_next)
    }

    /// Like [`observe`](Self::observe), but delivery goes through a debounce stage.
    pub fn observe_debounced(
        &self,
        event_loop: &EventLoop,
        window: Duration,
        on_next: impl Fn(&T) + 'static,
    ) -> Subscription {
        self.attach(self.observable.debounce(event_loop, window), on_next)
    }

    fn attach(&self, observable: Observable<T>, on_next: impl Fn(&T) + 'static) -> Subscription {
        self.unsubscribe();

        let store = self.observer_value.clone();
        let subscription = observable.subscribe(move |value| {
            *store.borrow_mut() = Some(value.clone());
            on_next(value);
        });
        *self.subscription.borrow_mut() = Some(subscription.clone());
        subscription
    }

    /// Detach the current observer, if any. Idempotent.
    pub fn unsubscribe(&self) {
        let subscription = self.subscription.borrow_mut().take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
    }
}

impl<V: Clone + 'static, T: Not<Output = T> + Clone + 'static> SignalValue<V, T> {
    pub fn negate(&self) -> SignalValue<V, T> {
        self.derive(self.observable.negate())
    }
}

// =============================================================================
// Tests
// =============================================================================
