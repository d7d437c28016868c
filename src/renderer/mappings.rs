//! Mappings - key bindings resolved by the renderer.
//!
//! The effective list is the built-ins followed by user mappings, in the
//! order they were added. Resolution scans from the end, so the most recently
//! added mapping for a key wins: a user mapping shadows a built-in on the
//! same key.

use std::fmt;
use std::rc::Rc;

use crossterm::event::KeyEvent;

use super::keymap::{KeyBinding, Keymap};
use super::Renderer;
use crate::types::Direction;

/// Handler invoked with the renderer that resolved the key.
pub type MappingHandler = Rc<dyn Fn(&Renderer)>;

#[derive(Clone)]
pub struct Mapping {
    pub name: Option<String>,
    pub key: KeyBinding,
    pub handler: MappingHandler,
}

impl Mapping {
    pub fn new(key: KeyBinding, handler: impl Fn(&Renderer) + 'static) -> Self {
        Self {
            name: None,
            key,
            handler: Rc::new(handler),
        }
    }

    pub fn named(
        name: impl Into<String>,
        key: KeyBinding,
        handler: impl Fn(&Renderer) + 'static,
    ) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(key, handler)
        }
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapping")
            .field("name", &self.name)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

fn directional(direction: Direction) -> impl Fn(&Renderer) + 'static {
    move |renderer: &Renderer| {
        if let Some(target) = renderer.get_component_by_direction(direction, None) {
            renderer.focus_component(&target);
        }
    }
}

/// Built-in mappings for `keymap`: close, sequential focus, and the
/// directional keys that are configured.
pub(crate) fn builtin_mappings(keymap: &Keymap) -> Vec<Mapping> {
    let mut mappings = Vec::new();

    if let Some(key) = keymap.close {
        mappings.push(Mapping::named("close", key, |renderer: &Renderer| renderer.close()));
    }
    if let Some(key) = keymap.focus_next {
        mappings.push(Mapping::named("focus_next", key, |renderer: &Renderer| {
            renderer.focus_next();
        }));
    }
    if let Some(key) = keymap.focus_prev {
        mappings.push(Mapping::named("focus_prev", key, |renderer: &Renderer| {
            renderer.focus_prev();
        }));
    }

    for (name, key, direction) in [
        ("focus_left", keymap.focus_left, Direction::Left),
        ("focus_right", keymap.focus_right, Direction::Right),
        ("focus_up", keymap.focus_up, Direction::Up),
        ("focus_down", keymap.focus_down, Direction::Down),
    ] {
        if let Some(key) = key {
            mappings.push(Mapping::named(name, key, directional(direction)));
        }
    }

    mappings
}

/// Most recently added mapping matching `event`.
pub(crate) fn resolve<'a>(mappings: &'a [Mapping], event: &KeyEvent) -> Option<&'a Mapping> {
    mappings.iter().rev().find(|mapping| mapping.key.matches(event))
}
