//! HeadlessHost - in-memory window system.
//!
//! Windows are plain ids. Their rectangles come from the [`FlexLayout`]s this
//! host creates, which publish into a shared geometry table. Useful for tests,
//! demos and any embedding that draws the windows itself.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;
use std::rc::Rc;

use super::Host;
use crate::error::HostError;
use crate::layout::{FlexLayout, Geometry, Layout, LayoutBox, LayoutOptions, Relative};
use crate::types::{Rect, WindowId};

/// The editor window every headless host starts with.
pub const EDITOR_WINDOW: WindowId = WindowId(0);

pub struct HeadlessHost {
    size: (u16, u16),
    current: Cell<Option<WindowId>>,
    next_window: Cell<u64>,
    geometry: Geometry,
}

impl HeadlessHost {
    /// Host with an editor surface of `width` x `height` cells.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            size: (width, height),
            current: Cell::new(Some(EDITOR_WINDOW)),
            next_window: Cell::new(EDITOR_WINDOW.0 + 1),
            geometry: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Host sized to the attached terminal.
    pub fn from_terminal() -> io::Result<Self> {
        let (width, height) = crossterm::terminal::size()?;
        Ok(Self::new(width, height))
    }

    /// Allocate a fresh window id. It has no rectangle until a layout places it.
    pub fn open_window(&self) -> WindowId {
        let id = self.next_window.get();
        self.next_window.set(id + 1);
        WindowId(id)
    }

    /// Whether `window` is the editor or currently placed by a mounted layout.
    pub fn is_open(&self, window: WindowId) -> bool {
        window == EDITOR_WINDOW || self.geometry.borrow().contains_key(&window)
    }

    fn editor_rect(&self) -> Rect {
        let (width, height) = self.size;
        Rect::new(0, 0, width, height)
    }
}

impl Host for HeadlessHost {
    fn current_window(&self) -> Option<WindowId> {
        self.current.get()
    }

    fn set_current_window(&self, window: WindowId) -> Result<(), HostError> {
        if !self.is_open(window) {
            return Err(HostError::StaleWindow(window));
        }
        self.current.set(Some(window));
        Ok(())
    }

    fn window_rect(&self, window: WindowId) -> Result<Rect, HostError> {
        if window == EDITOR_WINDOW {
            return Ok(self.editor_rect());
        }
        self.geometry
            .borrow()
            .get(&window)
            .copied()
            .ok_or(HostError::StaleWindow(window))
    }

    fn create_layout(&self, options: &LayoutOptions, root: LayoutBox) -> Box<dyn Layout> {
        let container = match options.relative {
            Relative::Editor => self.editor_rect(),
            Relative::Window(window) => self.window_rect(window).unwrap_or_else(|err| {
                tracing::warn!(%err, "relative window unavailable, using editor");
                self.editor_rect()
            }),
        };
        Box::new(FlexLayout::new(
            container,
            options.clone(),
            root,
            self.geometry.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutNode, WindowSpec};

    #[test]
    fn test_editor_window_is_current() {
        let host = HeadlessHost::new(100, 30);
        assert_eq!(host.current_window(), Some(EDITOR_WINDOW));
        assert_eq!(host.window_rect(EDITOR_WINDOW), Ok(Rect::new(0, 0, 100, 30)));
    }

    #[test]
    fn test_unplaced_window_is_stale() {
        let host = HeadlessHost::new(100, 30);
        let window = host.open_window();

        assert_eq!(host.window_rect(window), Err(HostError::StaleWindow(window)));
        assert_eq!(
            host.set_current_window(window),
            Err(HostError::StaleWindow(window))
        );
        assert_eq!(host.current_window(), Some(EDITOR_WINDOW));
    }

    #[test]
    fn test_layout_publishes_geometry() {
        let host = HeadlessHost::new(100, 30);
        let window = host.open_window();
        let options = LayoutOptions {
            width: 40,
            height: 10,
            ..Default::default()
        };
        let root = LayoutBox::column(vec![LayoutNode::Window(WindowSpec::new(window))]);

        let mut layout = host.create_layout(&options, root);
        layout.mount().unwrap();

        assert_eq!(host.window_rect(window), Ok(Rect::new(30, 10, 40, 10)));
        host.set_current_window(window).unwrap();
        assert_eq!(host.current_window(), Some(window));

        layout.unmount().unwrap();
        assert!(!host.is_open(window));
    }
}
