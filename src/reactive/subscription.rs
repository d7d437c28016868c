//! Subscription - idempotent detach handle.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

type Teardown = Box<dyn FnOnce()>;

struct SubscriptionInner {
    closed: Cell<bool>,
    teardown: RefCell<Option<Teardown>>,
}

/// Link between an observer and the stream it listens to.
///
/// Clones share state: unsubscribing through any clone closes all of them.
/// Dropping a subscription does NOT unsubscribe.
#[derive(Clone)]
pub struct Subscription {
    inner: Rc<SubscriptionInner>,
}

impl Subscription {
    /// Create a subscription that runs `teardown` on the first `unsubscribe()`.
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            inner: Rc::new(SubscriptionInner {
                closed: Cell::new(false),
                teardown: RefCell::new(Some(Box::new(teardown))),
            }),
        }
    }

    /// A subscription with nothing to tear down.
    pub fn empty() -> Self {
        Self::new(|| {})
    }

    /// Combine several subscriptions; unsubscribing detaches all of them in order.
    pub fn composite(parts: impl IntoIterator<Item = Subscription>) -> Self {
        let parts: Vec<Subscription> = parts.into_iter().collect();
        Self::new(move || {
            for part in parts {
                part.unsubscribe();
            }
        })
    }

    /// Detach. Safe to call repeatedly and from inside the subscriber's own callback.
    pub fn unsubscribe(&self) {
        if self.inner.closed.replace(true) {
            return;
        }
        let teardown = self.inner.teardown.borrow_mut().take();
        if let Some(teardown) = teardown {
            teardown();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.get()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("closed", &self.is_closed())
            .finish()
    }
}
