//! Observable - cold, composable stream description.
//!
//! An [`Observable`] is a recipe: nothing happens until `subscribe` is called,
//! and every subscription gets its own operator state (skip counters, scan
//! accumulators, combine_latest caches, debounce timers).
//!
//! ```text
//! Subject ──► map ──► filter ──► debounce ──► observer
//! ```

use std::cell::{Cell, RefCell};
use std::ops::Not;
use std::rc::Rc;
use std::time::Duration;

use super::subscription::Subscription;
use crate::runtime::{EventLoop, TimerId};

/// Downstream callback handed to an observable's subscribe function.
pub type Observer<T> = Rc<dyn Fn(&T)>;

type SubscribeFn<T> = Rc<dyn Fn(Observer<T>) -> Subscription>;

/// Cold stream of `T` values.
pub struct Observable<T> {
    subscribe_fn: SubscribeFn<T>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            subscribe_fn: self.subscribe_fn.clone(),
        }
    }
}

impl<T: Clone + 'static> Observable<T> {
    /// Build an observable from its subscribe function.
    pub fn new(subscribe_fn: impl Fn(Observer<T>) -> Subscription + 'static) -> Self {
        Self {
            subscribe_fn: Rc::new(subscribe_fn),
        }
    }

    /// An observable that never emits.
    pub fn never() -> Self {
        Self::new(|_| Subscription::empty())
    }

    pub fn subscribe(&self, on_next: impl Fn(&T) + 'static) -> Subscription {
        (self.subscribe_fn)(Rc::new(on_next))
    }

    // =========================================================================
    // Operators
    // =========================================================================

    /// Emit `f(value)` for every upstream value.
    pub fn map<U: Clone + 'static>(&self, f: impl Fn(&T) -> U + 'static) -> Observable<U> {
        let upstream = self.clone();
        let f = Rc::new(f);
        Observable::new(move |observer: Observer<U>| {
            let f = f.clone();
            upstream.subscribe(move |value| observer(&f(value)))
        })
    }

    /// Call `f` as a side effect, re-emit the value unchanged.
    pub fn tap(&self, f: impl Fn(&T) + 'static) -> Observable<T> {
        let upstream = self.clone();
        let f = Rc::new(f);
        Observable::new(move |observer: Observer<T>| {
            let f = f.clone();
            upstream.subscribe(move |value| {
                f(value);
                observer(value);
            })
        })
    }

    /// Forward only values for which `predicate` holds.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool + 'static) -> Observable<T> {
        let upstream = self.clone();
        let predicate = Rc::new(predicate);
        Observable::new(move |observer: Observer<T>| {
            let predicate = predicate.clone();
            upstream.subscribe(move |value| {
                if predicate(value) {
                    observer(value);
                }
            })
        })
    }

    /// Drop the first `count` emissions after subscribing.
    pub fn skip(&self, count: usize) -> Observable<T> {
        let upstream = self.clone();
        Observable::new(move |observer: Observer<T>| {
            let remaining = Cell::new(count);
            upstream.subscribe(move |value| {
                let left = remaining.get();
                if left > 0 {
                    remaining.set(left - 1);
                } else {
                    observer(value);
                }
            })
        })
    }

    /// Fold values into an accumulator seeded with `init`, emitting every step.
    pub fn scan<A: Clone + 'static>(
        &self,
        f: impl Fn(&A, &T) -> A + 'static,
        init: A,
    ) -> Observable<A> {
        let upstream = self.clone();
        let f = Rc::new(f);
        Observable::new(move |observer: Observer<A>| {
            let f = f.clone();
            let acc = RefCell::new(init.clone());
            upstream.subscribe(move |value| {
                let next = f(&*acc.borrow(), value);
                *acc.borrow_mut() = next.clone();
                observer(&next);
            })
        })
    }

    /// Emit a pair whenever either side emits, once both have emitted.
    pub fn combine_latest<U: Clone + 'static>(
        &self,
        other: &Observable<U>,
    ) -> Observable<(T, U)> {
        let left = self.clone();
        let right = other.clone();
        Observable::new(move |observer: Observer<(T, U)>| {
            let latest: Rc<RefCell<(Option<T>, Option<U>)>> = Rc::new(RefCell::new((None, None)));

            let emit = {
                let latest = latest.clone();
                Rc::new(move || {
                    let pair = match &*latest.borrow() {
                        (Some(a), Some(b)) => Some((a.clone(), b.clone())),
                        _ => None,
                    };
                    if let Some(pair) = pair {
                        observer(&pair);
                    }
                })
            };

            let left_sub = {
                let latest = latest.clone();
                let emit = emit.clone();
                left.subscribe(move |value| {
                    latest.borrow_mut().0 = Some(value.clone());
                    emit();
                })
            };
            let right_sub = right.subscribe(move |value| {
                latest.borrow_mut().1 = Some(value.clone());
                emit();
            });

            Subscription::composite([left_sub, right_sub])
        })
    }

    /// Variadic `combine_latest` over homogeneous sources.
    ///
    /// Emits the latest value of every source, in source order. An empty
    /// source list never emits.
    pub fn combine_latest_all(sources: Vec<Observable<T>>) -> Observable<Vec<T>> {
        Observable::new(move |observer: Observer<Vec<T>>| {
            let latest: Rc<RefCell<Vec<Option<T>>>> =
                Rc::new(RefCell::new(vec![None; sources.len()]));

            let subs: Vec<Subscription> = sources
                .iter()
                .enumerate()
                .map(|(index, source)| {
                    let latest = latest.clone();
                    let observer = observer.clone();
                    source.subscribe(move |value| {
                        let snapshot: Option<Vec<T>> = {
                            let mut slots = latest.borrow_mut();
                            slots[index] = Some(value.clone());
                            slots.iter().cloned().collect()
                        };
                        if let Some(values) = snapshot {
                            observer(&values);
                        }
                    })
                })
                .collect();

            Subscription::composite(subs)
        })
    }

    /// Emit the most recent value once `window` passes without a new one.
    ///
    /// Each upstream value cancels the pending timer and schedules a new one,
    /// so at most one timer is pending per subscription. The value travels
    /// inside the timer callback, so a fired timer always has something to emit.
    pub fn debounce(&self, event_loop: &EventLoop, window: Duration) -> Observable<T> {
        let upstream = self.clone();
        let event_loop = event_loop.clone();
        Observable::new(move |observer: Observer<T>| {
            let pending: Rc<Cell<Option<TimerId>>> = Rc::new(Cell::new(None));

            let upstream_sub = {
                let pending = pending.clone();
                let event_loop = event_loop.clone();
                upstream.subscribe(move |value| {
                    if let Some(id) = pending.take() {
                        event_loop.clear_timeout(id);
                    }
                    let value = value.clone();
                    let observer = observer.clone();
                    let fired = pending.clone();
                    let id = event_loop.set_timeout(window, move || {
                        fired.set(None);
                        observer(&value);
                    });
                    pending.set(Some(id));
                })
            };

            let event_loop = event_loop.clone();
            let cancel = Subscription::new(move || {
                if let Some(id) = pending.take() {
                    event_loop.clear_timeout(id);
                }
            });

            Subscription::composite([upstream_sub, cancel])
        })
    }
}

impl<T: Not<Output = T> + Clone + 'static> Observable<T> {
    /// Emit the logical NOT of every value.
    pub fn negate(&self) -> Observable<T> {
        self.map(|value| !value.clone())
    }
}

// =============================================================================
// Tests
// =============================================================================
