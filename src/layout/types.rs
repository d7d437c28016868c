//! Layout types - the box description handed to a layout engine.

use crate::types::{Dimension, WindowId};

/// Main axis of a [`LayoutBox`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoxDirection {
    Row,
    #[default]
    Column,
}

/// A window placed by the layout engine.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    pub window: WindowId,
    /// Fixed extent along the parent's main axis. `None` lets it grow.
    pub size: Option<Dimension>,
    pub grow: f32,
}

impl WindowSpec {
    /// A window that shares the free space with its siblings.
    pub fn new(window: WindowId) -> Self {
        Self {
            window,
            size: None,
            grow: 1.0,
        }
    }

    /// A window with a fixed extent along the parent's main axis.
    pub fn with_size(mut self, size: impl Into<Dimension>) -> Self {
        self.size = Some(size.into());
        self.grow = 0.0;
        self
    }
}

/// One node of a layout description: a window or a nested box.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutNode {
    Window(WindowSpec),
    Box(LayoutBox),
    /// Contributes nothing (used by components with no visual output).
    Empty,
}

/// A flex container of windows and boxes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutBox {
    pub direction: BoxDirection,
    pub children: Vec<LayoutNode>,
    pub size: Option<Dimension>,
    pub grow: f32,
}

impl LayoutBox {
    pub fn column(children: Vec<LayoutNode>) -> Self {
        Self {
            direction: BoxDirection::Column,
            children,
            size: None,
            grow: 1.0,
        }
    }

    pub fn row(children: Vec<LayoutNode>) -> Self {
        Self {
            direction: BoxDirection::Row,
            children,
            size: None,
            grow: 1.0,
        }
    }

    /// Every window in this box, depth first.
    pub fn windows(&self) -> Vec<WindowId> {
        let mut out = Vec::new();
        collect_windows(&self.children, &mut out);
        out
    }
}

fn collect_windows(nodes: &[LayoutNode], out: &mut Vec<WindowId>) {
    for node in nodes {
        match node {
            LayoutNode::Window(spec) => out.push(spec.window),
            LayoutNode::Box(inner) => collect_windows(&inner.children, out),
            LayoutNode::Empty => {}
        }
    }
}

/// What the popup is positioned relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Relative {
    #[default]
    Editor,
    Window(WindowId),
}

/// Popup position inside its container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub row: Dimension,
    pub col: Dimension,
}

impl Position {
    /// Same offset on both axes.
    pub fn uniform(offset: Dimension) -> Self {
        Self {
            row: offset,
            col: offset,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::uniform(Dimension::Percent(50.0))
    }
}

impl From<Dimension> for Position {
    fn from(offset: Dimension) -> Self {
        Self::uniform(offset)
    }
}

/// Options the renderer passes to every layout update.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub position: Position,
    pub relative: Relative,
    pub width: u16,
    pub height: u16,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            position: Position::default(),
            relative: Relative::Editor,
            width: 80,
            height: 40,
        }
    }
}
