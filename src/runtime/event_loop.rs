//! EventLoop - next-tick queue and timer table.
//!
//! The loop runs on either the system clock or a manual clock. The manual
//! clock only moves when [`EventLoop::advance`] is called, which makes every
//! time-dependent behavior (debounce windows, the redraw cycle) deterministic
//! under test.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use spark_components::EventLoop;
//!
//! let event_loop = EventLoop::manual();
//! event_loop.set_timeout(Duration::from_millis(60), || println!("fired"));
//! event_loop.advance(Duration::from_millis(60)); // prints "fired"
//! ```

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;
use std::time::{Duration, Instant};

type Task = Box<dyn FnOnce()>;

/// Handle to a pending timer, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

enum Clock {
    System(Instant),
    Manual(Cell<Duration>),
}

struct LoopInner {
    clock: Clock,
    ticks: RefCell<VecDeque<Task>>,
    // Keyed by (deadline, id) so equal deadlines fire in scheduling order
    timers: RefCell<BTreeMap<(Duration, TimerId), Task>>,
    deadlines: RefCell<HashMap<TimerId, Duration>>,
    next_timer_id: Cell<u64>,
}

/// Single-threaded cooperative event loop.
///
/// Cloning is cheap and yields another handle to the same loop.
#[derive(Clone)]
pub struct EventLoop {
    inner: Rc<LoopInner>,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// Create a loop driven by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Clock::System(Instant::now()))
    }

    /// Create a loop driven by a manual clock starting at zero.
    pub fn manual() -> Self {
        Self::with_clock(Clock::Manual(Cell::new(Duration::ZERO)))
    }

    fn with_clock(clock: Clock) -> Self {
        Self {
            inner: Rc::new(LoopInner {
                clock,
                ticks: RefCell::new(VecDeque::new()),
                timers: RefCell::new(BTreeMap::new()),
                deadlines: RefCell::new(HashMap::new()),
                next_timer_id: Cell::new(0),
            }),
        }
    }

    /// Time elapsed since the loop was created (or virtual time for a manual loop).
    pub fn now(&self) -> Duration {
        match &self.inner.clock {
            Clock::System(start) => start.elapsed(),
            Clock::Manual(now) => now.get(),
        }
    }

    // =========================================================================
    // Scheduling
    // =========================================================================

    /// Queue a callback for the next turn of the loop.
    pub fn next_tick(&self, task: impl FnOnce() + 'static) {
        self.inner.ticks.borrow_mut().push_back(Box::new(task));
    }

    /// Run `task` once `delay` has elapsed.
    pub fn set_timeout(&self, delay: Duration, task: impl FnOnce() + 'static) -> TimerId {
        let id = TimerId(self.inner.next_timer_id.get());
        self.inner.next_timer_id.set(id.0 + 1);

        let deadline = self.now() + delay;
        self.inner.timers.borrow_mut().insert((deadline, id), Box::new(task));
        self.inner.deadlines.borrow_mut().insert(id, deadline);
        tracing::trace!(timer = id.0, ?deadline, "timer scheduled");
        id
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn clear_timeout(&self, id: TimerId) -> bool {
        let Some(deadline) = self.inner.deadlines.borrow_mut().remove(&id) else {
            return false;
        };
        self.inner.timers.borrow_mut().remove(&(deadline, id)).is_some()
    }

    /// Number of timers that have not fired yet.
    pub fn pending_timers(&self) -> usize {
        self.inner.timers.borrow().len()
    }

    /// Whether any tick or timer is still queued.
    pub fn has_pending(&self) -> bool {
        !self.inner.ticks.borrow().is_empty() || !self.inner.timers.borrow().is_empty()
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.inner.timers.borrow().keys().next().map(|(deadline, _)| *deadline)
    }

    // =========================================================================
    // Running
    // =========================================================================

    /// Drain the tick queue, including ticks queued while draining.
    fn run_ticks(&self) -> usize {
        let mut ran = 0;
        loop {
            // Pop before calling so the task may queue more ticks
            let task = self.inner.ticks.borrow_mut().pop_front();
            match task {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }

    fn pop_due(&self, now: Duration) -> Option<Task> {
        let mut timers = self.inner.timers.borrow_mut();
        let (deadline, id) = *timers.keys().next()?;
        if deadline > now {
            return None;
        }
        self.inner.deadlines.borrow_mut().remove(&id);
        tracing::trace!(timer = id.0, ?deadline, "timer fired");
        timers.remove(&(deadline, id))
    }

    /// Run queued ticks and every timer that is already due.
    ///
    /// Returns the number of callbacks that ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = self.run_ticks();
        while let Some(task) = self.pop_due(self.now()) {
            task();
            ran += 1;
            ran += self.run_ticks();
        }
        ran
    }

    /// Move time forward by `by`, firing each timer at its own deadline.
    ///
    /// On a manual loop this is instantaneous. On the system clock it sleeps.
    pub fn advance(&self, by: Duration) -> usize {
        match &self.inner.clock {
            Clock::System(_) => {
                std::thread::sleep(by);
                self.run_pending()
            }
            Clock::Manual(now) => {
                let target = now.get() + by;
                let mut ran = self.run_ticks();
                while let Some(deadline) = self.next_deadline().filter(|d| *d <= target) {
                    now.set(deadline.max(now.get()));
                    ran += self.run_pending();
                }
                now.set(target);
                ran + self.run_ticks()
            }
        }
    }

    /// Keep running until nothing is queued or `max` has elapsed.
    pub fn run_until_idle(&self, max: Duration) -> usize {
        let stop_at = self.now() + max;
        let mut ran = self.run_pending();
        while let Some(deadline) = self.next_deadline() {
            if deadline > stop_at {
                break;
            }
            let now = self.now();
            ran += self.advance(deadline.saturating_sub(now));
        }
        ran
    }
}

// =============================================================================
// Tests
// =============================================================================
