//! Window-switcher (alt-tab) session handling.
//!
//! While the switcher is active, keyboard input is fully absorbed; the
//! key handling itself lives in [`crate::keyboard`]. The on-screen
//! display is drawn by the switcher host, which also defines the view
//! order.

use crate::compositor::{Compositor, CursorIcon};
use crate::node::ViewId;
use crate::seat::{InputMode, Seat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    Forward,
    Backward,
}

#[derive(Debug, Default)]
pub(crate) struct CycleState {
    pub(crate) selected: Option<ViewId>,
    /// All modifiers were released while bound keys were still held;
    /// confirming is deferred to the release of the last bound key so
    /// clients never see that key stuck down.
    deferred_cancel: bool,
}

impl CycleState {
    pub(crate) fn selected(&self) -> Option<ViewId> {
        self.selected
    }

    pub(crate) fn select(&mut self, view: ViewId) {
        self.selected = Some(view);
    }

    pub(crate) fn defer_cancel(&mut self) {
        self.deferred_cancel = true;
    }

    pub(crate) fn take_deferred_cancel(&mut self) -> bool {
        std::mem::take(&mut self.deferred_cancel)
    }
}

impl Seat {
    /// Start window switching, or step the running session when it is
    /// already active (a repeated switch bind).
    pub fn cycle_begin<C: Compositor>(&mut self, comp: &mut C, direction: CycleDirection) {
        match self.mode {
            InputMode::WindowSwitcher => {
                self.cycle_step(comp, direction);
                return;
            }
            InputMode::Passthrough => {}
            _ => return,
        }

        let Some(next) = comp.next_focusable_view(self.cycle.selected, direction) else {
            return;
        };
        self.cycle.selected = Some(next);
        self.mode = InputMode::WindowSwitcher;
        self.set_cursor(comp, CursorIcon::Default);
        comp.switcher_update(self.cycle.selected);
    }

    pub fn cycle_step<C: Compositor>(&mut self, comp: &mut C, direction: CycleDirection) {
        if self.mode != InputMode::WindowSwitcher {
            return;
        }
        self.cycle.selected = comp.next_focusable_view(self.cycle.selected, direction);
        comp.switcher_update(self.cycle.selected);
    }

    /// End the switcher. With `switch_focus`, the selected view gains
    /// focus and is raised; without, the session is cancelled.
    pub fn cycle_finish<C: Compositor>(&mut self, comp: &mut C, switch_focus: bool) {
        if self.mode != InputMode::WindowSwitcher {
            return;
        }
        let selected = self.cycle.selected.take();
        self.cycle.take_deferred_cancel();
        self.mode = InputMode::Passthrough;
        comp.switcher_close();

        // The OSD disappearing may change what is under the cursor.
        self.update_cursor_focus(comp);

        if switch_focus {
            if let Some(view) = selected {
                comp.focus_view(view, true);
            }
        }
    }

    /// The selected view is being destroyed mid-session: move the
    /// selection along, or end the session when nothing is left.
    pub(crate) fn cycle_on_view_destroyed<C: Compositor>(&mut self, comp: &mut C, view: ViewId) {
        if self.mode != InputMode::WindowSwitcher {
            if self.cycle.selected == Some(view) {
                self.cycle.selected = None;
            }
            return;
        }

        if self.cycle.selected == Some(view) {
            let next = comp.next_focusable_view(Some(view), CycleDirection::Backward);
            if next.is_none() || next == Some(view) {
                self.cycle_finish(comp, false);
                return;
            }
            self.cycle.selected = next;
        }
        comp.switcher_update(self.cycle.selected);
    }
}
