//! # spark-components
//!
//! Reactive component renderer for terminal and editor UIs.
//!
//! ## Architecture
//!
//! Two layers, both single-threaded and driven by one cooperative
//! [`EventLoop`]:
//!
//! - a push-based reactive engine: [`Subject`] at the root, cold
//!   [`Observable`] operator chains, keyed [`Signal`]s and their
//!   [`SignalValue`] handles
//! - a [`Renderer`] that owns a tree of [`Component`]s, flattens it, manages
//!   focus (sequential and spatial), coalesces redraw requests through a
//!   60 ms debounce and hands geometry to a [`Layout`] built by its [`Host`]
//!
//! ```text
//! Signal::set → Subject → operators → widget state
//!                                        │
//!                          renderer.redraw() ─(debounce)─► layout.update → queue
//! ```
//!
//! ## Modules
//!
//! - [`types`] - ids, rectangles, directions, dimensions
//! - [`runtime`] - event loop with next-tick and timers
//! - [`reactive`] - subjects, observables, signals
//! - [`component`] - the trait widgets implement
//! - [`layout`] - layout seam and the taffy-backed [`FlexLayout`]
//! - [`host`] - window-system seam and the in-memory [`HeadlessHost`]
//! - [`renderer`] - tree, focus, redraw cycle, key mappings

pub mod component;
pub mod error;
pub mod host;
pub mod layout;
pub mod reactive;
pub mod renderer;
pub mod runtime;
pub mod types;

#[cfg(test)]
mod test_support;

// Re-export commonly used items
pub use types::*;

pub use component::{Component, ComponentProps, ComponentRef};

pub use error::{DimensionParseError, HostError, KeyParseError, SignalError};

pub use host::{HeadlessHost, Host, EDITOR_WINDOW};

pub use layout::{
    FlexLayout, Geometry, Layout, LayoutBox, LayoutNode, LayoutOptions, Position, Relative,
    WindowSpec,
};

pub use reactive::{Observable, Observer, Signal, SignalValue, Subject, Subscription};

pub use renderer::{
    Content, KeyBinding, Keymap, LifecycleHook, Mapping, MappingHandler, Renderer,
    RendererOptions, REDRAW_DEBOUNCE,
};

pub use runtime::{EventLoop, TimerId};
