//! Layout - the geometry seam.
//!
//! The renderer never computes geometry itself. It hands a [`LayoutBox`]
//! (the rendered output of the visible top-level components) and the current
//! [`LayoutOptions`] to a [`Layout`] built by the host, and asks it to mount,
//! update and unmount.
//!
//! [`FlexLayout`] is the bundled implementation, backed by
//! [Taffy](https://github.com/DioxusLabs/taffy) flexbox.

mod flex;
mod types;

pub use flex::{compute_rects, popup_rect, FlexLayout, Geometry};
pub use types::*;

use crate::error::HostError;

/// A layout engine instance owned by one renderer.
pub trait Layout {
    /// Re-apply options and content.
    fn update(&mut self, options: &LayoutOptions, root: LayoutBox) -> Result<(), HostError>;

    /// Make the windows visible.
    fn mount(&mut self) -> Result<(), HostError>;

    /// Remove the windows.
    fn unmount(&mut self) -> Result<(), HostError>;

    fn is_mounted(&self) -> bool;
}
