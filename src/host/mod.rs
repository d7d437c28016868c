//! Host - the window-system seam.
//!
//! The renderer consumes a small capability surface from its host:
//!
//! - current window lookup and switching
//! - window geometry queries (for directional focus)
//! - layout construction
//!
//! Next-tick scheduling comes from the [`EventLoop`](crate::runtime::EventLoop),
//! not from the host.

mod headless;

pub use headless::{HeadlessHost, EDITOR_WINDOW};

use crate::error::HostError;
use crate::layout::{Layout, LayoutBox, LayoutOptions};
use crate::types::{Rect, WindowId};

/// Window system used by a [`Renderer`](crate::renderer::Renderer).
pub trait Host {
    /// The window that currently has input focus, if any.
    fn current_window(&self) -> Option<WindowId>;

    fn set_current_window(&self, window: WindowId) -> Result<(), HostError>;

    /// Screen rectangle of `window`.
    fn window_rect(&self, window: WindowId) -> Result<Rect, HostError>;

    /// Build a layout for `root`; it is mounted later by the renderer.
    fn create_layout(&self, options: &LayoutOptions, root: LayoutBox) -> Box<dyn Layout>;
}
