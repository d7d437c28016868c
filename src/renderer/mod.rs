//! Renderer - owns a component tree, its focus state and its redraw cycle.
//!
//! # Lifecycle
//!
//! ```text
//! render() ──► build tree ──► flatten ──► subscribe redraw
//!     │
//!     └─(next tick)─► layout.mount() ──► focus() ──► on_mount
//!
//! redraw() ──► trigger ──(60ms debounce)──► re-flatten ──► layout.update() ──► drain queue
//!
//! close() ──► unsubscribe ──► on_unmount ──► layout.unmount() ──► restore origin window
//! ```
//!
//! # Example
//!
//! ```ignore
//! let event_loop = EventLoop::new();
//! let host = Rc::new(HeadlessHost::new(120, 40));
//! let renderer = Renderer::new(RendererOptions::default(), host, event_loop.clone());
//!
//! renderer.render(vec![form, submit]);
//! renderer.schedule(|| println!("laid out"));
//! renderer.redraw();
//! event_loop.run_until_idle(Duration::from_secs(1));
//! ```
//!
//! The renderer never holds its internal state borrowed while calling into
//! components, hooks, mappings or queued callbacks, so all of them may call
//! back into the renderer.

mod focus;
mod keymap;
mod mappings;
mod options;
mod tree;

pub use keymap::{KeyBinding, Keymap};
pub use mappings::{Mapping, MappingHandler};
pub use options::{LifecycleHook, RendererOptions};
pub use tree::Content;

use std::cell::{Ref, RefCell, RefMut};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::time::Duration;

use bitflags::bitflags;
use crossterm::event::KeyEvent;

use self::tree::TreeNode;
use crate::component::ComponentRef;
use crate::host::Host;
use crate::layout::{Layout, LayoutBox, LayoutOptions};
use crate::reactive::{Observable, Subject, Subscription};
use crate::runtime::EventLoop;
use crate::types::{ComponentId, Direction, WindowId};

/// Quiet period before a burst of `redraw()` calls is applied.
pub const REDRAW_DEBOUNCE: Duration = Duration::from_millis(60);

bitflags! {
    /// Lifecycle state of a renderer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    struct Lifecycle: u8 {
        /// `render()` was called at least once.
        const RENDERED = 1 << 0;
        /// The layout is mounted.
        const MOUNTED = 1 << 1;
        /// `close()` ran; terminal.
        const CLOSED = 1 << 2;
    }
}

type Task = Box<dyn FnOnce()>;

// =============================================================================
// State
// =============================================================================

struct RendererState {
    lifecycle: Lifecycle,
    options: LayoutOptions,
    on_mount: Option<LifecycleHook>,
    on_unmount: Option<LifecycleHook>,
    mappings: Vec<Mapping>,
    tree: Vec<TreeNode>,
    flatten_tree: Vec<ComponentRef>,
    focusable_components: Vec<ComponentRef>,
    last_focused: Option<ComponentId>,
    queue: VecDeque<Task>,
    layout: Option<Box<dyn Layout>>,
    redraw_subscription: Option<Subscription>,
    watchers: Vec<Subscription>,
    origin_window: Option<WindowId>,
}

struct RendererInner {
    host: Rc<dyn Host>,
    event_loop: EventLoop,
    trigger: Subject<()>,
    state: RefCell<RendererState>,
}

/// Handle to a renderer. Clones share the same renderer.
#[derive(Clone)]
pub struct Renderer {
    inner: Rc<RendererInner>,
}

impl Renderer {
    pub fn new(options: RendererOptions, host: Rc<dyn Host>, event_loop: EventLoop) -> Self {
        let state = RendererState {
            lifecycle: Lifecycle::empty(),
            options: options.layout_options(),
            mappings: mappings::builtin_mappings(&options.keymap),
            on_mount: options.on_mount,
            on_unmount: options.on_unmount,
            tree: Vec::new(),
            flatten_tree: Vec::new(),
            focusable_components: Vec::new(),
            last_focused: None,
            queue: VecDeque::new(),
            layout: None,
            redraw_subscription: None,
            watchers: Vec::new(),
            origin_window: None,
        };

        Self {
            inner: Rc::new(RendererInner {
                host,
                event_loop,
                trigger: Subject::new(),
                state: RefCell::new(state),
            }),
        }
    }

    fn state(&self) -> Ref<'_, RendererState> {
        self.inner.state.borrow()
    }

    fn state_mut(&self) -> RefMut<'_, RendererState> {
        self.inner.state.borrow_mut()
    }

    fn downgrade(&self) -> Weak<RendererInner> {
        Rc::downgrade(&self.inner)
    }

    fn upgrade(weak: &Weak<RendererInner>) -> Option<Renderer> {
        weak.upgrade().map(|inner| Renderer { inner })
    }

    /// Rendered and not closed.
    fn is_active(&self) -> bool {
        let lifecycle = self.state().lifecycle;
        lifecycle.contains(Lifecycle::RENDERED) && !lifecycle.contains(Lifecycle::CLOSED)
    }

    pub fn event_loop(&self) -> &EventLoop {
        &self.inner.event_loop
    }

    pub fn host(&self) -> &Rc<dyn Host> {
        &self.inner.host
    }

    pub fn is_mounted(&self) -> bool {
        self.state().lifecycle.contains(Lifecycle::MOUNTED)
    }

    pub fn is_closed(&self) -> bool {
        self.state().lifecycle.contains(Lifecycle::CLOSED)
    }

    // =========================================================================
    // Render
    // =========================================================================

    /// Build the tree from `content` and attach the redraw cycle.
    ///
    /// The first call creates the layout and mounts it on the next loop
    /// tick, then runs [`focus`](Self::focus) and `on_mount`. Later calls
    /// rebuild the tree and request a redraw.
    pub fn render(&self, content: impl Into<Content>) {
        if self.is_closed() {
            tracing::warn!("render() on a closed renderer ignored");
            return;
        }
        let content = content.into();
        let first = {
            let mut state = self.state_mut();
            let first = !state.lifecycle.contains(Lifecycle::RENDERED);
            if first {
                state.origin_window = self.inner.host.current_window();
            }
            state.lifecycle.insert(Lifecycle::RENDERED);
            first
        };

        let tree: Vec<TreeNode> = content
            .resolve()
            .into_iter()
            .map(|component| tree::build(self, component, None))
            .collect();
        self.state_mut().tree = tree;
        self.reflatten();
        self.subscribe_redraw();

        tracing::debug!(
            first,
            components = self.state().flatten_tree.len(),
            "renderer rendered"
        );

        if first {
            let root = self.layout_root();
            let options = self.state().options.clone();
            let layout = self.inner.host.create_layout(&options, root);
            self.state_mut().layout = Some(layout);

            let weak = self.downgrade();
            self.inner.event_loop.next_tick(move || {
                if let Some(renderer) = Self::upgrade(&weak) {
                    renderer.mount();
                }
            });
        } else {
            self.redraw();
        }
    }

    fn mount(&self) {
        let hook = {
            let mut state = self.state_mut();
            if state.lifecycle.contains(Lifecycle::CLOSED) {
                return;
            }
            if let Some(layout) = state.layout.as_mut() {
                if let Err(err) = layout.mount() {
                    tracing::warn!(%err, "layout mount failed");
                }
            }
            state.lifecycle.insert(Lifecycle::MOUNTED);
            state.on_mount.clone()
        };
        tracing::debug!("renderer mounted");

        self.focus();
        if let Some(hook) = hook {
            hook(self);
        }
    }

    /// Rebuild the flatten tree and focusable list from the current tree.
    fn reflatten(&self) {
        let flatten = tree::flatten(&self.state().tree);
        let focusable = focus::focusable_components(&flatten);
        let present: Vec<ComponentId> = flatten.iter().map(|c| c.id()).collect();

        let mut state = self.state_mut();
        state.flatten_tree = flatten;
        state.focusable_components = focusable;
        if let Some(id) = state.last_focused {
            if !present.contains(&id) {
                tracing::debug!(component = %id, "last focused component left the tree");
                state.last_focused = None;
            }
        }
    }

    /// Column box of the visible top-level components' output.
    fn layout_root(&self) -> LayoutBox {
        let top = self.get_tree();
        LayoutBox::column(
            top.iter()
                .filter(|component| !component.is_hidden())
                .map(|component| component.render())
                .collect(),
        )
    }

    // =========================================================================
    // Redraw cycle
    // =========================================================================

    fn subscribe_redraw(&self) {
        let weak = self.downgrade();
        let subscription = self
            .inner
            .trigger
            .debounce(&self.inner.event_loop, REDRAW_DEBOUNCE)
            .subscribe(move |_: &()| {
                if let Some(renderer) = Self::upgrade(&weak) {
                    renderer.redraw_cycle();
                }
            });

        let previous = self.state_mut().redraw_subscription.replace(subscription);
        if let Some(previous) = previous {
            previous.unsubscribe();
        }
    }

    fn redraw_cycle(&self) {
        if !self.is_active() {
            return;
        }
        self.reflatten();
        let root = self.layout_root();

        let (options, mut layout) = {
            let mut state = self.state_mut();
            (state.options.clone(), state.layout.take())
        };
        if let Some(layout) = layout.as_mut() {
            if let Err(err) = layout.update(&options, root) {
                tracing::warn!(%err, "layout update failed");
            }
        }

        let queue = {
            let mut state = self.state_mut();
            if state.layout.is_none() {
                state.layout = layout;
            }
            std::mem::take(&mut state.queue)
        };
        tracing::debug!(queued = queue.len(), "redraw cycle");

        for (ran, task) in queue.into_iter().enumerate() {
            // A task may close the renderer; the rest are dropped with the queue
            if self.is_closed() {
                tracing::debug!(ran, "redraw queue abandoned on close");
                break;
            }
            task();
        }
    }

    /// Request a redraw. Calls within one debounce window coalesce.
    pub fn redraw(&self) {
        if !self.is_active() {
            return;
        }
        tracing::trace!("redraw requested");
        self.inner.trigger.emit(());
    }

    /// Run `task` after the next redraw cycle's layout update.
    ///
    /// Tasks run once, in the order they were scheduled.
    pub fn schedule(&self, task: impl FnOnce() + 'static) {
        let mut state = self.state_mut();
        if state.lifecycle.contains(Lifecycle::CLOSED) {
            tracing::debug!("schedule() on a closed renderer dropped");
            return;
        }
        state.queue.push_back(Box::new(task));
    }

    /// Redraw whenever `source` emits, until the renderer closes.
    pub fn watch<T: Clone + 'static>(&self, source: &Observable<T>) -> Subscription {
        let weak = self.downgrade();
        let subscription = source.subscribe(move |_: &T| {
            if let Some(renderer) = Self::upgrade(&weak) {
                renderer.redraw();
            }
        });
        if self.is_closed() {
            subscription.unsubscribe();
        } else {
            self.state_mut().watchers.push(subscription.clone());
        }
        subscription
    }

    /// Tear down: stop redraws, run `on_unmount`, unmount the layout and
    /// return focus to the window that was current before the first render.
    ///
    /// No-op before `render()` and after the first `close()`.
    pub fn close(&self) {
        let (redraw, watchers, hook) = {
            let mut state = self.state_mut();
            let lifecycle = state.lifecycle;
            let closed = lifecycle.contains(Lifecycle::CLOSED);
            if !lifecycle.contains(Lifecycle::RENDERED) || closed {
                return;
            }
            state.lifecycle.insert(Lifecycle::CLOSED);
            state.queue.clear();
            (
                state.redraw_subscription.take(),
                std::mem::take(&mut state.watchers),
                state.on_unmount.clone(),
            )
        };

        if let Some(redraw) = redraw {
            redraw.unsubscribe();
        }
        for watcher in watchers {
            watcher.unsubscribe();
        }
        if let Some(hook) = hook {
            hook(self);
        }

        let (layout, origin) = {
            let mut state = self.state_mut();
            state.lifecycle.remove(Lifecycle::MOUNTED);
            (state.layout.take(), state.origin_window)
        };
        if let Some(mut layout) = layout {
            if layout.is_mounted() {
                if let Err(err) = layout.unmount() {
                    tracing::warn!(%err, "layout unmount failed");
                }
            }
        }
        if let Some(origin) = origin {
            if let Err(err) = self.inner.host.set_current_window(origin) {
                tracing::warn!(%err, "origin window not restored");
            }
        }
        tracing::debug!("renderer closed");
    }

    // =========================================================================
    // Size
    // =========================================================================

    /// Resize the layout and request a redraw.
    pub fn set_size(&self, width: u16, height: u16) {
        {
            let mut state = self.state_mut();
            state.options.width = width;
            state.options.height = height;
        }
        self.redraw();
    }

    /// Current layout size as (width, height).
    pub fn get_size(&self) -> (u16, u16) {
        let state = self.state();
        (state.options.width, state.options.height)
    }

    // =========================================================================
    // Tree queries
    // =========================================================================

    /// Top-level components of the current render.
    pub fn get_tree(&self) -> Vec<ComponentRef> {
        self.state().tree.iter().map(|node| node.component.clone()).collect()
    }

    /// Every component in post-order (children before parents).
    pub fn get_flatten_tree(&self) -> Vec<ComponentRef> {
        self.state().flatten_tree.clone()
    }

    /// Focusable, visible components in focus-index order.
    pub fn get_focusable_components(&self) -> Vec<ComponentRef> {
        self.state().focusable_components.clone()
    }

    pub fn get_component_by_id(&self, id: ComponentId) -> Option<ComponentRef> {
        self.get_flatten_tree().into_iter().find(|component| component.id() == id)
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Restore focus: the last focused component if it is still in the tree,
    /// else the first component whose props request focus.
    pub fn focus(&self) {
        if !self.is_active() {
            return;
        }
        let target = self.get_last_focused_component().or_else(|| {
            self.get_flatten_tree()
                .into_iter()
                .find(|component| component.props().focus)
        });
        if let Some(target) = target {
            self.focus_component(&target);
        }
    }

    /// Focus `component`, make its window current and remember it.
    pub fn focus_component(&self, component: &ComponentRef) {
        if !self.is_active() {
            return;
        }
        component.focus();
        if let Some(window) = component.window() {
            if let Err(err) = self.inner.host.set_current_window(window) {
                tracing::warn!(
                    %err,
                    component = %component.id(),
                    "focus target window unavailable"
                );
            }
        }
        self.set_last_focused_component(component.id());
    }

    /// Record `id` as focused. Widgets call this when they gain focus on
    /// their own.
    pub fn set_last_focused_component(&self, id: ComponentId) {
        self.state_mut().last_focused = Some(id);
    }

    pub fn get_last_focused_component(&self) -> Option<ComponentRef> {
        let id = self.state().last_focused?;
        self.get_component_by_id(id)
    }

    /// Focus the next focusable component, wrapping around.
    pub fn focus_next(&self) -> Option<ComponentRef> {
        self.step_focus(1)
    }

    /// Focus the previous focusable component, wrapping around.
    pub fn focus_prev(&self) -> Option<ComponentRef> {
        self.step_focus(-1)
    }

    fn step_focus(&self, step: isize) -> Option<ComponentRef> {
        if !self.is_active() {
            return None;
        }
        let (focusable, current) = {
            let state = self.state();
            (state.focusable_components.clone(), state.last_focused)
        };
        let target = focus::cycle(&focusable, current, step)?;
        self.focus_component(&target);
        Some(target)
    }

    /// Nearest focusable component in `direction` from `from`, or from the
    /// last focused component. Does not move focus.
    pub fn get_component_by_direction(
        &self,
        direction: Direction,
        from: Option<&ComponentRef>,
    ) -> Option<ComponentRef> {
        let reference = match from {
            Some(component) => component.clone(),
            None => self.get_last_focused_component()?,
        };
        let focusable = self.get_focusable_components();
        focus::by_direction(self.inner.host.as_ref(), &focusable, &reference, direction)
    }

    // =========================================================================
    // Mappings
    // =========================================================================

    /// Append user mappings after the built-ins.
    pub fn add_mappings(&self, mappings: impl IntoIterator<Item = Mapping>) {
        self.state_mut().mappings.extend(mappings);
    }

    /// Built-in mappings followed by user mappings, in insertion order.
    pub fn get_mappings(&self) -> Vec<Mapping> {
        self.state().mappings.clone()
    }

    /// Dispatch `event` to the most recently added matching mapping.
    ///
    /// Returns whether a mapping handled it.
    pub fn handle_key(&self, event: &KeyEvent) -> bool {
        if !self.is_active() {
            return false;
        }
        let handler = {
            let state = self.state();
            match mappings::resolve(&state.mappings, event) {
                Some(mapping) => {
                    tracing::trace!(mapping = ?mapping.name, key = %mapping.key, "key mapped");
                    mapping.handler.clone()
                }
                None => return false,
            }
        };
        handler(self);
        true
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::layout::Relative;
    use crate::test_support::{ids, LayoutEvent, RecordingHost, TestComponent};
    use crate::types::Rect;

    fn setup(options: RendererOptions) -> (Renderer, Rc<RecordingHost>, EventLoop) {
        let host = Rc::new(RecordingHost::new());
        let event_loop = EventLoop::manual();
        let renderer = Renderer::new(options, host.clone(), event_loop.clone());
        (renderer, host, event_loop)
    }

    fn nested() -> Vec<ComponentRef> {
        let a1 = TestComponent::new(11).focusable().into_ref();
        let a2 = TestComponent::new(12).focusable().into_ref();
        let a = TestComponent::new(1).with_children(vec![a1, a2]).into_ref();
        let b = TestComponent::new(2).focusable().into_ref();
        vec![a, b]
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_flatten_tree_and_focus_indices() {
        let (renderer, _host, _loop) = setup(RendererOptions::default());
        renderer.render(nested());

        assert_eq!(ids(&renderer.get_flatten_tree()), vec![11, 12, 1, 2]);
        assert_eq!(ids(&renderer.get_tree()), vec![1, 2]);

        let focusable = renderer.get_focusable_components();
        assert_eq!(ids(&focusable), vec![11, 12, 2]);
        let indices: Vec<_> = focusable.iter().map(|c| c.focus_index()).collect();
        assert_eq!(indices, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_initialization_runs_children_first() {
        let (renderer, _host, _loop) = setup(RendererOptions::default());
        let log = Rc::new(std::cell::RefCell::new(Vec::new()));
        let child = TestComponent::new(2).with_log(log.clone()).into_ref();
        let parent = TestComponent::new(1)
            .with_children(vec![child])
            .with_log(log.clone())
            .into_ref();

        renderer.render(parent);
        assert_eq!(*log.borrow(), vec![(2, Some(1)), (1, None)]);
    }

    #[test]
    fn test_mount_is_deferred_to_next_tick() {
        let mounted = Rc::new(Cell::new(0));
        let hook_count = mounted.clone();
        let (renderer, host, event_loop) = setup(RendererOptions {
            on_mount: Some(Rc::new(move |_: &Renderer| hook_count.set(hook_count.get() + 1))),
            ..Default::default()
        });

        let input = TestComponent::new(1).focusable().with_focus_prop().build();
        renderer.render(vec![input.clone() as ComponentRef]);
        assert!(!renderer.is_mounted());
        assert_eq!(mounted.get(), 0);
        assert_eq!(input.focus_calls(), 0);

        event_loop.run_pending();
        assert!(renderer.is_mounted());
        assert_eq!(mounted.get(), 1);
        assert_eq!(input.focus_calls(), 1);
        assert_eq!(host.events(), vec![LayoutEvent::Created, LayoutEvent::Mounted]);
    }

    #[test]
    fn test_redraw_burst_coalesces() {
        let (renderer, host, event_loop) = setup(RendererOptions::default());
        renderer.render(nested());
        event_loop.run_pending();

        let order = Rc::new(std::cell::RefCell::new(Vec::new()));
        for n in 0..3 {
            let order = order.clone();
            renderer.schedule(move || order.borrow_mut().push(n));
        }
        for _ in 0..5 {
            renderer.redraw();
            event_loop.advance(Duration::from_millis(10));
        }
        assert_eq!(host.update_count(), 0);

        event_loop.advance(REDRAW_DEBOUNCE);
        assert_eq!(host.update_count(), 1);
        assert_eq!(*order.borrow(), vec![0, 1, 2]);

        event_loop.advance(Duration::from_secs(1));
        assert_eq!(host.update_count(), 1);
    }

    #[test]
    fn test_tasks_scheduled_during_drain_wait() {
        let (renderer, host, event_loop) = setup(RendererOptions::default());
        renderer.render(nested());
        event_loop.run_pending();

        let ran = Rc::new(Cell::new(0));
        let inner_ran = ran.clone();
        let handle = renderer.clone();
        renderer.schedule(move || {
            let inner_ran = inner_ran.clone();
            handle.schedule(move || inner_ran.set(inner_ran.get() + 1));
            handle.redraw();
        });

        renderer.redraw();
        event_loop.advance(REDRAW_DEBOUNCE);
        assert_eq!(ran.get(), 0);

        event_loop.advance(REDRAW_DEBOUNCE);
        assert_eq!(ran.get(), 1);
        assert_eq!(host.update_count(), 2);
    }

    #[test]
    fn test_close_inside_drain_drops_remaining_tasks() {
        let (renderer, host, event_loop) = setup(RendererOptions::default());
        renderer.render(nested());
        event_loop.run_pending();

        let ran = Rc::new(Cell::new(0));
        let handle = renderer.clone();
        renderer.schedule(move || handle.close());
        let counter = ran.clone();
        renderer.schedule(move || counter.set(counter.get() + 1));

        renderer.redraw();
        event_loop.advance(REDRAW_DEBOUNCE);

        assert!(renderer.is_closed());
        assert_eq!(ran.get(), 0);
        assert_eq!(host.update_count(), 1);

        renderer.schedule({
            let counter = ran.clone();
            move || counter.set(counter.get() + 1)
        });
        renderer.redraw();
        event_loop.advance(Duration::from_secs(1));
        assert_eq!(ran.get(), 0);
    }

    #[test]
    fn test_no_update_after_close() {
        let unmounted = Rc::new(Cell::new(false));
        let flag = unmounted.clone();
        let (renderer, host, event_loop) = setup(RendererOptions {
            on_unmount: Some(Rc::new(move |_: &Renderer| flag.set(true))),
            ..Default::default()
        });
        host.set_current(WindowId(7));
        renderer.render(nested());
        event_loop.run_pending();
        host.set_current(WindowId(8));

        renderer.redraw();
        renderer.close();
        event_loop.advance(Duration::from_secs(1));

        assert!(unmounted.get());
        assert!(renderer.is_closed());
        assert!(!renderer.is_mounted());
        assert_eq!(host.update_count(), 0);
        assert_eq!(host.events().last(), Some(&LayoutEvent::Unmounted));
        assert_eq!(host.current_window(), Some(WindowId(7)));

        // Second close is a no-op
        renderer.close();
        assert_eq!(
            host.events().iter().filter(|e| **e == LayoutEvent::Unmounted).count(),
            1
        );
    }

    #[test]
    fn test_close_before_mount_tick() {
        let (renderer, host, event_loop) = setup(RendererOptions::default());
        renderer.render(nested());
        renderer.close();
        event_loop.run_pending();

        assert!(!renderer.is_mounted());
        assert_eq!(host.events(), vec![LayoutEvent::Created]);
    }

    #[test]
    fn test_operations_before_render_are_noops() {
        let (renderer, host, event_loop) = setup(RendererOptions::default());

        renderer.redraw();
        renderer.focus();
        renderer.close();
        assert!(renderer.focus_next().is_none());
        assert!(renderer.focus_prev().is_none());
        assert!(!renderer.handle_key(&key(KeyCode::Esc)));
        event_loop.advance(Duration::from_secs(1));

        assert!(!renderer.is_closed());
        assert!(host.events().is_empty());
    }

    #[test]
    fn test_focus_next_and_prev_wrap() {
        let (renderer, _host, event_loop) = setup(RendererOptions::default());
        renderer.render(nested());
        event_loop.run_pending();

        let next = |r: &Renderer| r.focus_next().map(|c| c.id().0);
        assert_eq!(next(&renderer), Some(11));
        assert_eq!(next(&renderer), Some(12));
        assert_eq!(next(&renderer), Some(2));
        assert_eq!(next(&renderer), Some(11));
        assert_eq!(renderer.focus_prev().map(|c| c.id().0), Some(2));
        assert_eq!(
            renderer.get_last_focused_component().map(|c| c.id().0),
            Some(2)
        );
    }

    #[test]
    fn test_focus_prefers_last_focused() {
        let (renderer, _host, event_loop) = setup(RendererOptions::default());
        let first = TestComponent::new(1).focusable().with_focus_prop().build();
        let second = TestComponent::new(2).focusable().build();
        renderer.render(vec![first.clone() as ComponentRef, second.clone() as ComponentRef]);
        event_loop.run_pending();
        assert_eq!(first.focus_calls(), 1);

        renderer.set_last_focused_component(ComponentId(2));
        renderer.focus();
        assert_eq!(second.focus_calls(), 1);
        assert_eq!(first.focus_calls(), 1);
    }

    #[test]
    fn test_last_focused_cleared_when_component_leaves() {
        let (renderer, _host, event_loop) = setup(RendererOptions::default());
        let keep = TestComponent::new(1).focusable().into_ref();
        let gone = TestComponent::new(2).focusable().into_ref();
        renderer.render(vec![keep.clone(), gone.clone()]);
        event_loop.run_pending();
        renderer.focus_component(&gone);

        renderer.render(vec![keep]);
        event_loop.advance(REDRAW_DEBOUNCE);
        assert!(renderer.get_last_focused_component().is_none());
        assert_eq!(renderer.focus_next().map(|c| c.id().0), Some(1));
    }

    #[test]
    fn test_hidden_components_leave_focus_ring_on_redraw() {
        let (renderer, _host, event_loop) = setup(RendererOptions::default());
        let a = TestComponent::new(1).focusable().build();
        let b = TestComponent::new(2).focusable().build();
        renderer.render(vec![a.clone() as ComponentRef, b.clone() as ComponentRef]);
        event_loop.run_pending();
        assert_eq!(renderer.get_focusable_components().len(), 2);

        b.set_hidden(true);
        renderer.redraw();
        event_loop.advance(REDRAW_DEBOUNCE);
        assert_eq!(ids(&renderer.get_focusable_components()), vec![1]);
    }

    #[test]
    fn test_direction_from_last_focused() {
        let (renderer, host, event_loop) = setup(RendererOptions::default());
        host.place(WindowId(1), Rect::new(0, 0, 5, 3));
        host.place(WindowId(2), Rect::new(10, 0, 5, 3));
        host.place(WindowId(3), Rect::new(20, 0, 5, 3));
        let components: Vec<ComponentRef> = (1..=3)
            .map(|id| {
                TestComponent::new(id)
                    .focusable()
                    .with_window(WindowId(id))
                    .into_ref()
            })
            .collect();
        renderer.render(components.clone());
        event_loop.run_pending();

        assert!(renderer.get_component_by_direction(Direction::Right, None).is_none());

        renderer.focus_component(&components[0]);
        assert_eq!(host.current_window(), Some(WindowId(1)));
        let right = renderer.get_component_by_direction(Direction::Right, None);
        assert_eq!(right.map(|c| c.id().0), Some(2));

        let left = renderer.get_component_by_direction(Direction::Left, Some(&components[2]));
        assert_eq!(left.map(|c| c.id().0), Some(2));
    }

    #[test]
    fn test_directional_mapping_moves_focus() {
        let (renderer, host, event_loop) = setup(RendererOptions {
            keymap: Keymap {
                focus_right: Some(KeyBinding::parse("<C-l>").unwrap()),
                ..Default::default()
            },
            ..Default::default()
        });
        host.place(WindowId(1), Rect::new(0, 0, 5, 3));
        host.place(WindowId(2), Rect::new(10, 0, 5, 3));
        let left = TestComponent::new(1)
            .focusable()
            .with_focus_prop()
            .with_window(WindowId(1))
            .into_ref();
        let right = TestComponent::new(2)
            .focusable()
            .with_window(WindowId(2))
            .into_ref();
        renderer.render(vec![left, right]);
        event_loop.run_pending();

        let ctrl_l = KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL);
        assert!(renderer.handle_key(&ctrl_l));
        assert_eq!(
            renderer.get_last_focused_component().map(|c| c.id().0),
            Some(2)
        );
        assert_eq!(host.current_window(), Some(WindowId(2)));
    }

    #[test]
    fn test_builtin_keys() {
        let (renderer, _host, event_loop) = setup(RendererOptions::default());
        renderer.render(nested());
        event_loop.run_pending();

        assert!(renderer.handle_key(&key(KeyCode::Tab)));
        assert_eq!(
            renderer.get_last_focused_component().map(|c| c.id().0),
            Some(11)
        );
        assert!(renderer.handle_key(&key(KeyCode::BackTab)));
        assert_eq!(
            renderer.get_last_focused_component().map(|c| c.id().0),
            Some(2)
        );
        assert!(!renderer.handle_key(&key(KeyCode::Char('x'))));

        assert!(renderer.handle_key(&key(KeyCode::Esc)));
        assert!(renderer.is_closed());
    }

    #[test]
    fn test_user_mapping_overrides_builtin() {
        let (renderer, _host, event_loop) = setup(RendererOptions::default());
        renderer.render(nested());
        event_loop.run_pending();

        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        renderer.add_mappings([Mapping::named(
            "stay_open",
            KeyBinding::parse("Esc").unwrap(),
            move |_: &Renderer| counter.set(counter.get() + 1),
        )]);

        assert!(renderer.handle_key(&key(KeyCode::Esc)));
        assert_eq!(hits.get(), 1);
        assert!(!renderer.is_closed());

        let names: Vec<_> = renderer
            .get_mappings()
            .into_iter()
            .filter_map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["close", "focus_next", "focus_prev", "stay_open"]);
    }

    #[test]
    fn test_set_size_updates_layout_options() {
        let (renderer, host, event_loop) = setup(RendererOptions {
            width: 60,
            height: 20,
            relative: Relative::Window(WindowId(3)),
            ..Default::default()
        });
        assert_eq!(renderer.get_size(), (60, 20));
        renderer.render(nested());
        event_loop.run_pending();

        renderer.set_size(30, 10);
        event_loop.advance(REDRAW_DEBOUNCE);

        assert_eq!(renderer.get_size(), (30, 10));
        let last = host.last_update().unwrap();
        assert_eq!((last.width, last.height), (30, 10));
        assert_eq!(last.relative, Relative::Window(WindowId(3)));
    }

    #[test]
    fn test_watch_redraws_until_close() {
        let (renderer, host, event_loop) = setup(RendererOptions::default());
        renderer.render(nested());
        event_loop.run_pending();

        let source = Subject::<u8>::new();
        let subscription = renderer.watch(&source.as_observable());
        source.emit(1);
        event_loop.advance(REDRAW_DEBOUNCE);
        assert_eq!(host.update_count(), 1);

        renderer.close();
        assert!(subscription.is_closed());
        assert_eq!(source.subscriber_count(), 0);
    }

    #[test]
    fn test_rerender_replaces_redraw_handler() {
        let (renderer, host, event_loop) = setup(RendererOptions::default());
        renderer.render(nested());
        event_loop.run_pending();
        renderer.render(nested());
        renderer.render(nested());
        event_loop.advance(REDRAW_DEBOUNCE);

        assert_eq!(host.update_count(), 1);
        assert_eq!(host.layouts_created(), 1);
    }
}
