//! Focus - focusable set, sequential cycling and spatial navigation.
//!
//! Pure functions over the renderer's flatten tree. The renderer owns the
//! "last focused" key and applies the results.

use crate::component::ComponentRef;
use crate::host::Host;
use crate::types::{ComponentId, Direction, Rect};

/// Focusable, visible components in flatten order, with 1-based focus
/// indices assigned in that order.
pub(crate) fn focusable_components(flatten_tree: &[ComponentRef]) -> Vec<ComponentRef> {
    let focusable: Vec<ComponentRef> = flatten_tree
        .iter()
        .filter(|component| component.is_focusable() && !component.is_hidden())
        .cloned()
        .collect();

    for (position, component) in focusable.iter().enumerate() {
        component.set_focus_index(position + 1);
    }
    focusable
}

/// Step `step` places around the focusable ring from `current`.
///
/// With nothing focused, stepping forward lands on the first component and
/// stepping backward on the last.
pub(crate) fn cycle(
    focusable: &[ComponentRef],
    current: Option<ComponentId>,
    step: isize,
) -> Option<ComponentRef> {
    if focusable.is_empty() {
        return None;
    }
    let len = focusable.len() as isize;
    let position = current.and_then(|id| focusable.iter().position(|c| c.id() == id));

    let next = match position {
        Some(position) => (position as isize + step).rem_euclid(len),
        None if step >= 0 => 0,
        None => len - 1,
    };
    focusable.get(next as usize).cloned()
}

fn rect_of(host: &dyn Host, component: &ComponentRef) -> Option<Rect> {
    let window = component.window()?;
    match host.window_rect(window) {
        Ok(rect) => Some(rect),
        Err(err) => {
            tracing::warn!(%err, component = %component.id(), "window rect unavailable");
            None
        }
    }
}

fn qualifies(direction: Direction, reference: &Rect, candidate: &Rect) -> bool {
    match direction {
        Direction::Left => candidate.right() < reference.left(),
        Direction::Right => candidate.left() > reference.right(),
        Direction::Up => candidate.bottom() < reference.top(),
        Direction::Down => candidate.top() > reference.bottom(),
    }
}

fn distance(direction: Direction, reference: &Rect, candidate: &Rect) -> i32 {
    if direction.is_horizontal() {
        (candidate.left() - reference.left()).abs()
    } else {
        (candidate.top() - reference.top()).abs()
    }
}

/// Nearest focusable component from `reference` in `direction`.
///
/// Ties go to the earlier component in focus order.
pub(crate) fn by_direction(
    host: &dyn Host,
    focusable: &[ComponentRef],
    reference: &ComponentRef,
    direction: Direction,
) -> Option<ComponentRef> {
    let origin = rect_of(host, reference)?;
    let mut best: Option<(i32, &ComponentRef)> = None;

    for candidate in focusable.iter().filter(|c| c.id() != reference.id()) {
        let Some(rect) = rect_of(host, candidate) else {
            continue;
        };
        if !qualifies(direction, &origin, &rect) {
            continue;
        }
        let d = distance(direction, &origin, &rect);
        if best.is_none_or(|(best_d, _)| d < best_d) {
            best = Some((d, candidate));
        }
    }

    best.map(|(_, component)| component.clone())
}
