//! Matching input events against the configured bind table.
//!
//! Modifier masks compare with bitwise equality: a bind requiring
//! exactly Super never fires while Super+Shift is held. Key events are
//! matched by physical keycode first (keeping binds layout-agnostic),
//! then by translated keysym, then by the modifier-less raw keysym.
//!
//! Click, double-click and drag mousebinds are resolved in two passes:
//! the press arms the candidate without running anything, the matching
//! release (or the first drag motion) runs the actions and disarms it.

use crate::config::{BindTable, MouseEventKind, MouseTrigger, ScrollDirection};
use crate::keys::{Keycode, Keysym, Modifiers};
use crate::node::HitKind;

/// Result of one mousebind scan: bind indices to run, in table order,
/// and whether any match had a frame-level generic context (which
/// swallows the event instead of forwarding it).
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct MouseMatch {
    pub to_run: Vec<usize>,
    pub consumed_by_frame: bool,
}

impl BindTable {
    /// Find the keybind for a key event, if any.
    pub(crate) fn match_keybind(
        &self,
        modifiers: Modifiers,
        keycode: Keycode,
        translated: &[Keysym],
        raw: &[Keysym],
        is_virtual: bool,
    ) -> Option<usize> {
        // Physical keycodes first; virtual keyboards have no stable
        // keycodes, so they skip straight to keysyms.
        if !is_virtual {
            if let Some(i) = self.find_keybind(modifiers, |kb| kb.keycodes.contains(&keycode)) {
                return Some(i);
            }
        }
        for sym in translated {
            let folded = sym.to_lower();
            if let Some(i) = self.find_keybind(modifiers, |kb| kb.keysyms.contains(&folded)) {
                return Some(i);
            }
        }
        for sym in raw {
            let folded = sym.to_lower();
            if let Some(i) = self.find_keybind(modifiers, |kb| kb.keysyms.contains(&folded)) {
                return Some(i);
            }
        }
        None
    }

    fn find_keybind(
        &self,
        modifiers: Modifiers,
        pred: impl Fn(&crate::config::Keybind) -> bool,
    ) -> Option<usize> {
        self.keybinds.iter().position(|kb| kb.modifiers == modifiers && pred(kb))
    }

    pub(crate) fn mouse_press(
        &mut self,
        kind: HitKind,
        button: u32,
        modifiers: Modifiers,
        double_click: bool,
    ) -> MouseMatch {
        let mut result = MouseMatch::default();
        for (i, mb) in self.mousebinds.iter_mut().enumerate() {
            if !mb.context.contains(kind)
                || mb.trigger != MouseTrigger::Button(button)
                || mb.modifiers != modifiers
            {
                continue;
            }
            match mb.event {
                MouseEventKind::Drag | MouseEventKind::Click => {
                    // Resolved on release unless the press turned out to
                    // be a double-click; the press is swallowed with it.
                    if !double_click {
                        result.consumed_by_frame |= mb.context.is_frame_level();
                        mb.pressed_in_context = true;
                    }
                    continue;
                }
                MouseEventKind::DoubleClick if !double_click => continue,
                MouseEventKind::DoubleClick | MouseEventKind::Press => {}
                MouseEventKind::Release | MouseEventKind::Scroll => continue,
            }
            result.consumed_by_frame |= mb.context.is_frame_level();
            result.to_run.push(i);
        }
        result
    }

    pub(crate) fn mouse_release(
        &mut self,
        kind: HitKind,
        button: u32,
        modifiers: Modifiers,
    ) -> MouseMatch {
        let mut result = MouseMatch::default();
        for (i, mb) in self.mousebinds.iter_mut().enumerate() {
            if !mb.context.contains(kind)
                || mb.trigger != MouseTrigger::Button(button)
                || mb.modifiers != modifiers
            {
                continue;
            }
            match mb.event {
                MouseEventKind::Release => {}
                MouseEventKind::Click => {
                    if !mb.pressed_in_context {
                        continue;
                    }
                }
                MouseEventKind::Drag => {
                    // The press was swallowed; swallow the release too.
                    if mb.pressed_in_context {
                        result.consumed_by_frame |= mb.context.is_frame_level();
                    }
                    continue;
                }
                _ => continue,
            }
            result.consumed_by_frame |= mb.context.is_frame_level();
            result.to_run.push(i);
        }
        // Disarm every bind of this button, matched or not.
        for mb in &mut self.mousebinds {
            if mb.trigger == MouseTrigger::Button(button) {
                mb.pressed_in_context = false;
            }
        }
        result
    }

    /// Drag binds armed by an earlier press; clears them so each drag
    /// fires once.
    pub(crate) fn take_drag_binds(&mut self) -> Vec<usize> {
        let mut armed = Vec::new();
        for (i, mb) in self.mousebinds.iter_mut().enumerate() {
            if mb.event == MouseEventKind::Drag && mb.pressed_in_context {
                mb.pressed_in_context = false;
                armed.push(i);
            }
        }
        armed
    }

    pub(crate) fn mouse_scroll(
        &self,
        kind: HitKind,
        direction: ScrollDirection,
        modifiers: Modifiers,
    ) -> Vec<usize> {
        self.mousebinds
            .iter()
            .enumerate()
            .filter(|(_, mb)| {
                mb.event == MouseEventKind::Scroll
                    && mb.context.contains(kind)
                    && mb.trigger == MouseTrigger::Scroll(direction)
                    && mb.modifiers == modifiers
            })
            .map(|(i, _)| i)
            .collect()
    }
}
