//! Reactive engine.
//!
//! - [`Subject`] - stateful broadcast primitive, root of every stream
//! - [`Observable`] - cold operator chains (map, filter, skip, scan, ...)
//! - [`Signal`] - named collection of cells, one subject per key
//! - [`SignalValue`] - handle on a cell plus an operator chain
//! - [`Subscription`] - idempotent detach handle
//!
//! # Propagation
//!
//! ```text
//! signal.set(key, v) → Subject::emit → operator stages → observers
//! ```
//!
//! Everything is synchronous except debounce stages, which defer delivery to
//! an [`EventLoop`](crate::runtime::EventLoop) timer.

mod observable;
mod signal;
mod signal_value;
mod subject;
mod subscription;

pub use observable::{Observable, Observer};
pub use signal::Signal;
pub use signal_value::SignalValue;
pub use subject::Subject;
pub use subscription::Subscription;
