//! FlexLayout - taffy-backed layout engine.
//!
//! Converts a [`LayoutBox`] into a Taffy tree, computes flexbox layout inside
//! the popup rectangle, and publishes absolute window rectangles into a
//! shared [`Geometry`] table that a host reads back.
//!
//! ```text
//! LayoutOptions + LayoutBox → popup rect → Taffy tree → window rects → Geometry
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use taffy::{
    AvailableSpace, Dimension as TaffyDimension, Display, FlexDirection as TaffyFlexDirection,
    NodeId, Size, Style, TaffyTree,
};

use super::types::{BoxDirection, LayoutBox, LayoutNode, LayoutOptions};
use super::Layout;
use crate::error::HostError;
use crate::types::{Dimension, Rect, WindowId};

/// Window rectangles shared between a layout and its host.
pub type Geometry = Rc<RefCell<HashMap<WindowId, Rect>>>;

// =============================================================================
// CONVERSION
// =============================================================================

fn to_taffy_dimension(dim: Option<Dimension>) -> TaffyDimension {
    match dim {
        None => TaffyDimension::Auto,
        Some(Dimension::Cells(n)) => TaffyDimension::Length(n as f32),
        Some(Dimension::Percent(p)) => TaffyDimension::Percent(p / 100.0),
    }
}

fn to_taffy_flex_direction(dir: BoxDirection) -> TaffyFlexDirection {
    match dir {
        BoxDirection::Row => TaffyFlexDirection::Row,
        BoxDirection::Column => TaffyFlexDirection::Column,
    }
}

fn backend(err: taffy::TaffyError) -> HostError {
    HostError::Backend(err.to_string())
}

/// Style for a flex item with an optional fixed extent along the parent's main axis.
fn item_style(parent: BoxDirection, size: Option<Dimension>, grow: f32) -> Style {
    let main = to_taffy_dimension(size);
    let size = match parent {
        BoxDirection::Row => Size {
            width: main,
            height: TaffyDimension::Auto,
        },
        BoxDirection::Column => Size {
            width: TaffyDimension::Auto,
            height: main,
        },
    };
    Style {
        display: Display::Flex,
        flex_grow: grow,
        flex_shrink: 1.0,
        size,
        ..Style::default()
    }
}

// =============================================================================
// COMPUTATION
// =============================================================================

/// Outer popup rectangle for `options` inside `container`.
pub fn popup_rect(container: Rect, options: &LayoutOptions) -> Rect {
    let width = options.width.min(container.width);
    let height = options.height.min(container.height);
    let x = container
        .x
        .saturating_add(options.position.col.resolve_offset(container.width, width));
    let y = container
        .y
        .saturating_add(options.position.row.resolve_offset(container.height, height));
    Rect::new(x, y, width, height)
}

fn build_nodes(
    tree: &mut TaffyTree<()>,
    layout_box: &LayoutBox,
    windows: &mut Vec<(WindowId, NodeId)>,
    boxes: &mut Vec<(NodeId, Vec<NodeId>)>,
) -> Result<Vec<NodeId>, HostError> {
    let mut ids = Vec::with_capacity(layout_box.children.len());
    for child in &layout_box.children {
        match child {
            LayoutNode::Window(spec) => {
                let style = item_style(layout_box.direction, spec.size, spec.grow);
                let node = tree.new_leaf(style).map_err(backend)?;
                windows.push((spec.window, node));
                ids.push(node);
            }
            LayoutNode::Box(inner) => {
                let children = build_nodes(tree, inner, windows, boxes)?;
                let style = Style {
                    flex_direction: to_taffy_flex_direction(inner.direction),
                    ..item_style(layout_box.direction, inner.size, inner.grow)
                };
                let node = tree.new_with_children(style, &children).map_err(backend)?;
                boxes.push((node, children));
                ids.push(node);
            }
            LayoutNode::Empty => {}
        }
    }
    Ok(ids)
}

/// Compute absolute window rectangles for `root` laid out inside `popup`.
pub fn compute_rects(
    popup: Rect,
    root: &LayoutBox,
) -> Result<HashMap<WindowId, Rect>, HostError> {
    let mut tree: TaffyTree<()> = TaffyTree::new();
    let mut windows = Vec::new();
    let mut boxes = Vec::new();

    let children = build_nodes(&mut tree, root, &mut windows, &mut boxes)?;
    let root_style = Style {
        display: Display::Flex,
        flex_direction: to_taffy_flex_direction(root.direction),
        size: Size {
            width: TaffyDimension::Length(popup.width as f32),
            height: TaffyDimension::Length(popup.height as f32),
        },
        ..Style::default()
    };
    let root_node = tree.new_with_children(root_style, &children).map_err(backend)?;
    boxes.push((root_node, children));

    let available = Size {
        width: AvailableSpace::Definite(popup.width as f32),
        height: AvailableSpace::Definite(popup.height as f32),
    };
    tree.compute_layout(root_node, available).map_err(backend)?;

    // Taffy locations are parent-relative; walk down accumulating offsets
    let mut origin: HashMap<NodeId, (f32, f32)> = HashMap::new();
    origin.insert(root_node, (popup.x as f32, popup.y as f32));
    for (parent, children) in boxes.iter().rev() {
        let (px, py) = origin.get(parent).copied().unwrap_or((popup.x as f32, popup.y as f32));
        for child in children {
            let layout = tree.layout(*child).map_err(backend)?;
            origin.insert(*child, (px + layout.location.x, py + layout.location.y));
        }
    }

    let mut rects = HashMap::with_capacity(windows.len());
    for (window, node) in windows {
        let layout = tree.layout(node).map_err(backend)?;
        let (x, y) = origin.get(&node).copied().unwrap_or((popup.x as f32, popup.y as f32));
        rects.insert(
            window,
            Rect::new(
                x.round() as u16,
                y.round() as u16,
                layout.size.width.round() as u16,
                layout.size.height.round() as u16,
            ),
        );
    }
    Ok(rects)
}

// =============================================================================
// LAYOUT
// =============================================================================

/// A [`Layout`] that places windows with flexbox inside a popup rectangle.
///
/// The container is fixed at construction; later updates may change size and
/// position but not the `relative` target.
pub struct FlexLayout {
    container: Rect,
    options: LayoutOptions,
    root: LayoutBox,
    geometry: Geometry,
    placed: Vec<WindowId>,
    mounted: bool,
}

impl FlexLayout {
    pub fn new(
        container: Rect,
        options: LayoutOptions,
        root: LayoutBox,
        geometry: Geometry,
    ) -> Self {
        Self {
            container,
            options,
            root,
            geometry,
            placed: Vec::new(),
            mounted: false,
        }
    }

    /// Popup rectangle for the current options.
    pub fn popup(&self) -> Rect {
        popup_rect(self.container, &self.options)
    }

    fn publish(&mut self) -> Result<(), HostError> {
        let rects = compute_rects(self.popup(), &self.root)?;
        let mut geometry = self.geometry.borrow_mut();
        for window in self.placed.drain(..) {
            geometry.remove(&window);
        }
        for (window, rect) in rects {
            geometry.insert(window, rect);
            self.placed.push(window);
        }
        tracing::trace!(windows = self.placed.len(), "flex layout published");
        Ok(())
    }
}

impl Layout for FlexLayout {
    fn update(&mut self, options: &LayoutOptions, root: LayoutBox) -> Result<(), HostError> {
        self.options = options.clone();
        self.root = root;
        if self.mounted {
            self.publish()?;
        }
        Ok(())
    }

    fn mount(&mut self) -> Result<(), HostError> {
        self.mounted = true;
        self.publish()
    }

    fn unmount(&mut self) -> Result<(), HostError> {
        if !self.mounted {
            return Err(HostError::NotMounted);
        }
        self.mounted = false;
        let mut geometry = self.geometry.borrow_mut();
        for window in self.placed.drain(..) {
            geometry.remove(&window);
        }
        Ok(())
    }

    fn is_mounted(&self) -> bool {
        self.mounted
    }
}

// =============================================================================
// TESTS
// =============================================================================
