//! Renderer options.
//!
//! ```ignore
//! let options = RendererOptions {
//!     width: 60,
//!     height: 20,
//!     on_mount: Some(Rc::new(|renderer| renderer.focus())),
//!     ..Default::default()
//! };
//! ```

use std::fmt;
use std::rc::Rc;

use super::keymap::Keymap;
use super::Renderer;
use crate::layout::{LayoutOptions, Position, Relative};

/// Lifecycle hook receiving the renderer.
pub type LifecycleHook = Rc<dyn Fn(&Renderer)>;

pub struct RendererOptions {
    /// Runs on the tick after the first `render()`, once the layout is mounted.
    pub on_mount: Option<LifecycleHook>,
    /// Runs during `close()`, before the layout is unmounted.
    pub on_unmount: Option<LifecycleHook>,
    pub position: Position,
    pub relative: Relative,
    pub width: u16,
    pub height: u16,
    pub keymap: Keymap,
}

impl Default for RendererOptions {
    fn default() -> Self {
        let layout = LayoutOptions::default();
        Self {
            on_mount: None,
            on_unmount: None,
            position: layout.position,
            relative: layout.relative,
            width: layout.width,
            height: layout.height,
            keymap: Keymap::default(),
        }
    }
}

impl RendererOptions {
    pub(crate) fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            position: self.position,
            relative: self.relative,
            width: self.width,
            height: self.height,
        }
    }
}

impl fmt::Debug for RendererOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererOptions")
            .field("on_mount", &self.on_mount.is_some())
            .field("on_unmount", &self.on_unmount.is_some())
            .field("position", &self.position)
            .field("relative", &self.relative)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("keymap", &self.keymap)
            .finish()
    }
}
