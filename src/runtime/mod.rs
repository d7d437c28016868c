//! Runtime - the single-threaded cooperative loop.
//!
//! Every reactive emission and every redraw runs inside callbacks driven by an
//! [`EventLoop`]. There are exactly two deferral points:
//!
//! - **next tick** - used for the initial layout mount after `render()`
//! - **timers** - used by debounce stages
//!
//! All handles are `Rc`-based and therefore `!Send`: the loop, its subjects
//! and its renderers stay on the thread that created them.

mod event_loop;

pub use event_loop::{EventLoop, TimerId};
