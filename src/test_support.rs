//! Test doubles: a configurable component and a host that records layout calls.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::component::{Component, ComponentProps, ComponentRef};
use crate::error::HostError;
use crate::host::Host;
use crate::layout::{Layout, LayoutBox, LayoutNode, LayoutOptions, WindowSpec};
use crate::renderer::Renderer;
use crate::types::{ComponentId, Rect, WindowId};

/// `(component, parent)` pairs in initialization order.
pub type InitLog = Rc<RefCell<Vec<(u64, Option<u64>)>>>;

pub fn ids(components: &[ComponentRef]) -> Vec<u64> {
    components.iter().map(|c| c.id().0).collect()
}

// =============================================================================
// TestComponent
// =============================================================================

pub struct TestComponent {
    id: ComponentId,
    props: Cell<ComponentProps>,
    focusable: bool,
    window: Option<WindowId>,
    children: Vec<ComponentRef>,
    focus_index: Cell<Option<usize>>,
    focus_calls: Cell<usize>,
    log: Option<InitLog>,
}

impl TestComponent {
    pub fn new(id: u64) -> Self {
        Self {
            id: ComponentId(id),
            props: Cell::new(ComponentProps::default()),
            focusable: false,
            window: None,
            children: Vec::new(),
            focus_index: Cell::new(None),
            focus_calls: Cell::new(0),
            log: None,
        }
    }

    pub fn focusable(mut self) -> Self {
        self.focusable = true;
        self
    }

    pub fn hidden(self) -> Self {
        self.set_hidden(true);
        self
    }

    /// Request initial focus.
    pub fn with_focus_prop(self) -> Self {
        let mut props = self.props.get();
        props.focus = true;
        self.props.set(props);
        self
    }

    pub fn with_window(mut self, window: WindowId) -> Self {
        self.window = Some(window);
        self
    }

    pub fn with_children(mut self, children: Vec<ComponentRef>) -> Self {
        self.children = children;
        self
    }

    pub fn with_log(mut self, log: InitLog) -> Self {
        self.log = Some(log);
        self
    }

    pub fn build(self) -> Rc<TestComponent> {
        Rc::new(self)
    }

    pub fn into_ref(self) -> ComponentRef {
        Rc::new(self)
    }

    pub fn set_hidden(&self, hidden: bool) {
        let mut props = self.props.get();
        props.hidden = hidden;
        self.props.set(props);
    }

    pub fn focus_calls(&self) -> usize {
        self.focus_calls.get()
    }
}

impl Component for TestComponent {
    fn id(&self) -> ComponentId {
        self.id
    }

    fn children(&self) -> Option<Vec<ComponentRef>> {
        if self.children.is_empty() {
            None
        } else {
            Some(self.children.clone())
        }
    }

    fn props(&self) -> ComponentProps {
        self.props.get()
    }

    fn is_focusable(&self) -> bool {
        self.focusable
    }

    fn render(&self) -> LayoutNode {
        if let Some(window) = self.window {
            return LayoutNode::Window(WindowSpec::new(window));
        }
        if self.children.is_empty() {
            return LayoutNode::Empty;
        }
        LayoutNode::Box(LayoutBox::column(
            self.children.iter().map(|child| child.render()).collect(),
        ))
    }

    fn focus(&self) {
        self.focus_calls.set(self.focus_calls.get() + 1);
    }

    fn focus_index(&self) -> Option<usize> {
        self.focus_index.get()
    }

    fn set_focus_index(&self, index: usize) {
        self.focus_index.set(Some(index));
    }

    fn window(&self) -> Option<WindowId> {
        self.window
    }

    fn on_renderer_initialization(
        &self,
        _renderer: &Renderer,
        parent: Option<&ComponentRef>,
        _children: &[ComponentRef],
    ) {
        if let Some(log) = &self.log {
            log.borrow_mut().push((self.id.0, parent.map(|p| p.id().0)));
        }
    }
}

// =============================================================================
// RecordingHost
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutEvent {
    Created,
    Mounted,
    Updated,
    Unmounted,
}

#[derive(Default)]
struct Recorder {
    events: Vec<LayoutEvent>,
    last_update: Option<LayoutOptions>,
}

/// Host with hand-placed window rectangles. Every layout it creates logs
/// into the same recorder.
pub struct RecordingHost {
    current: Cell<Option<WindowId>>,
    rects: RefCell<HashMap<WindowId, Rect>>,
    recorder: Rc<RefCell<Recorder>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            current: Cell::new(None),
            rects: RefCell::new(HashMap::new()),
            recorder: Rc::new(RefCell::new(Recorder::default())),
        }
    }

    pub fn place(&self, window: WindowId, rect: Rect) {
        self.rects.borrow_mut().insert(window, rect);
    }

    pub fn set_current(&self, window: WindowId) {
        self.current.set(Some(window));
    }

    pub fn events(&self) -> Vec<LayoutEvent> {
        self.recorder.borrow().events.clone()
    }

    pub fn update_count(&self) -> usize {
        self.count(LayoutEvent::Updated)
    }

    pub fn layouts_created(&self) -> usize {
        self.count(LayoutEvent::Created)
    }

    pub fn last_update(&self) -> Option<LayoutOptions> {
        self.recorder.borrow().last_update.clone()
    }

    fn count(&self, event: LayoutEvent) -> usize {
        self.recorder
            .borrow()
            .events
            .iter()
            .filter(|e| **e == event)
            .count()
    }
}

impl Host for RecordingHost {
    fn current_window(&self) -> Option<WindowId> {
        self.current.get()
    }

    fn set_current_window(&self, window: WindowId) -> Result<(), HostError> {
        self.current.set(Some(window));
        Ok(())
    }

    fn window_rect(&self, window: WindowId) -> Result<Rect, HostError> {
        self.rects
            .borrow()
            .get(&window)
            .copied()
            .ok_or(HostError::StaleWindow(window))
    }

    fn create_layout(&self, _options: &LayoutOptions, _root: LayoutBox) -> Box<dyn Layout> {
        self.recorder.borrow_mut().events.push(LayoutEvent::Created);
        Box::new(RecordingLayout {
            recorder: self.recorder.clone(),
            mounted: false,
        })
    }
}

struct RecordingLayout {
    recorder: Rc<RefCell<Recorder>>,
    mounted: bool,
}

impl Layout for RecordingLayout {
    fn update(&mut self, options: &LayoutOptions, _root: LayoutBox) -> Result<(), HostError> {
        let mut recorder = self.recorder.borrow_mut();
        recorder.events.push(LayoutEvent::Updated);
        recorder.last_update = Some(options.clone());
        Ok(())
    }

    fn mount(&mut self) -> Result<(), HostError> {
        self.mounted = true;
        self.recorder.borrow_mut().events.push(LayoutEvent::Mounted);
        Ok(())
    }

    fn unmount(&mut self) -> Result<(), HostError> {
        self.mounted = false;
        self.recorder.borrow_mut().events.push(LayoutEvent::Unmounted);
        Ok(())
    }

    fn is_mounted(&self) -> bool {
        self.mounted
    }
}
