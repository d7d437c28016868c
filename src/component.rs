//! Component - the capability surface the renderer consumes.
//!
//! Widgets (inputs, buttons, boxes, ...) live outside this crate. The
//! renderer only ever talks to them through [`Component`], and only owns the
//! tree shape and focus metadata, never widget state. Methods take `&self`;
//! widgets keep mutable state behind `Cell`/`RefCell`.
//!
//! # Example
//!
//! ```ignore
//! struct Button { id: ComponentId, window: WindowId, index: Cell<usize> }
//!
//! impl Component for Button {
//!     fn id(&self) -> ComponentId { self.id }
//!     fn props(&self) -> ComponentProps { ComponentProps::default() }
//!     fn is_focusable(&self) -> bool { true }
//!     fn render(&self) -> LayoutNode {
//!         LayoutNode::Window(WindowSpec::new(self.window).with_size(1))
//!     }
//!     fn focus(&self) {}
//!     fn focus_index(&self) -> Option<usize> { Some(self.index.get()) }
//!     fn set_focus_index(&self, index: usize) { self.index.set(index) }
//!     fn window(&self) -> Option<WindowId> { Some(self.window) }
//! }
//! ```

use std::rc::Rc;

use crate::layout::LayoutNode;
use crate::renderer::Renderer;
use crate::types::{ComponentId, WindowId};

/// Shared handle to a component.
pub type ComponentRef = Rc<dyn Component>;

/// Declared props the renderer reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComponentProps {
    /// Request initial focus when the renderer mounts.
    pub focus: bool,
    pub hidden: bool,
}

pub trait Component {
    fn id(&self) -> ComponentId;

    /// Declared children, `None` for leaves.
    fn children(&self) -> Option<Vec<ComponentRef>> {
        None
    }

    fn props(&self) -> ComponentProps;

    fn is_hidden(&self) -> bool {
        self.props().hidden
    }

    fn is_focusable(&self) -> bool;

    /// Layout description of this component's output.
    fn render(&self) -> LayoutNode;

    /// Give this component input focus.
    fn focus(&self);

    /// 1-based position among the focusable components, once assigned.
    fn focus_index(&self) -> Option<usize>;

    fn set_focus_index(&self, index: usize);

    /// Host window showing this component, if any.
    fn window(&self) -> Option<WindowId> {
        None
    }

    /// Called once per render, after this component's children were initialized.
    fn on_renderer_initialization(
        &self,
        _renderer: &Renderer,
        _parent: Option<&ComponentRef>,
        _children: &[ComponentRef],
    ) {
    }
}
