//! Keyboard event processing: bind matching, modal key handling,
//! release suppression and keybind auto-repeat.

use crate::compositor::Compositor;
use crate::cycle::CycleDirection;
use crate::keys::{ButtonState, Keycode, Keysym, Modifiers};
use crate::seat::{InputMode, Seat};

/// A key event as delivered by the keyboard backend. The backend's
/// keymap state supplies both the translated symbols (with modifiers
/// applied, e.g. `!` for Shift+1) and the raw ones (`1`).
#[derive(Debug, Clone, PartialEq)]
pub struct KeyInput {
    pub keycode: Keycode,
    pub state: ButtonState,
    pub translated: Vec<Keysym>,
    pub raw: Vec<Keysym>,
    /// Modifier mask in effect when the event was generated.
    pub modifiers: Modifiers,
    /// Virtual keyboards have no stable physical keycodes.
    pub is_virtual: bool,
    pub time_msec: u32,
}

impl KeyInput {
    pub fn is_modifier(&self) -> bool {
        self.translated.iter().any(|sym| sym.is_modifier())
    }
}

/// What the embedder should do with the event after processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Deliver to the focused client.
    Forward,
    /// Absorbed by the compositor.
    Consumed,
}

impl Seat {
    /// Process a key event. The caller forwards it to the focused
    /// client iff the result is [`KeyDisposition::Forward`].
    pub fn handle_key<C: Compositor>(&mut self, comp: &mut C, input: &KeyInput) -> KeyDisposition {
        // Any new key event cancels a running keybind repeat.
        self.cancel_keybind_repeat(comp);

        let disposition = self.dispatch_key(comp, input);

        // Repeating a held modifier would interfere with on-release
        // binds, so only ordinary bound keys auto-repeat.
        if disposition == KeyDisposition::Consumed
            && input.state == ButtonState::Pressed
            && !input.is_modifier()
        {
            self.start_keybind_repeat(comp, input);
        }
        disposition
    }

    fn dispatch_key<C: Compositor>(&mut self, comp: &mut C, input: &KeyInput) -> KeyDisposition {
        let pressed = input.state == ButtonState::Pressed;
        self.key_state.set_pressed(input.keycode, pressed, input.is_modifier());

        if !pressed {
            if let Some(idx) = self.release_bind {
                if self.key_state.was_claimed(input.keycode) {
                    self.release_bind = None;
                    self.key_state.release_claim(input.keycode);
                    let actions = self.binds.keybinds[idx].actions.clone();
                    self.run_action_list(comp, None, &actions, None);
                    return KeyDisposition::Consumed;
                }
            }
            return self.handle_key_release(comp, input.keycode);
        }

        if self.mode == InputMode::Menu {
            self.key_state.claim_as_bound(input.keycode);
            self.handle_menu_key(comp, &input.translated);
            return KeyDisposition::Consumed;
        }

        let switching = self.mode == InputMode::WindowSwitcher;
        if switching && self.handle_cycle_key(comp, input) {
            self.key_state.claim_as_bound(input.keycode);
            return KeyDisposition::Consumed;
        }

        // A press that matches nothing also clears any pending
        // on-release bind.
        self.release_bind = None;

        if let Some(idx) = self.binds.match_keybind(
            input.modifiers,
            input.keycode,
            &input.translated,
            &input.raw,
            input.is_virtual,
        ) {
            // Claim before running: an action may refocus, and the new
            // surface must not see this key as pressed.
            self.key_state.claim_as_bound(input.keycode);
            let on_release = self.binds.keybinds[idx].on_release;
            if on_release {
                self.release_bind = Some(idx);
            } else {
                let actions = self.binds.keybinds[idx].actions.clone();
                self.run_action_list(comp, None, &actions, None);
            }
            return KeyDisposition::Consumed;
        }

        if switching {
            // The switcher absorbs everything else; claim the key so
            // its release is absorbed with it.
            self.key_state.claim_as_bound(input.keycode);
            return KeyDisposition::Consumed;
        }

        KeyDisposition::Forward
    }

    /// Releases of keys whose press was claimed by a binding are
    /// absorbed; everything else passes through so clients never see a
    /// stuck key.
    fn handle_key_release<C: Compositor>(
        &mut self,
        comp: &mut C,
        keycode: Keycode,
    ) -> KeyDisposition {
        if !self.key_state.was_claimed(keycode) {
            return KeyDisposition::Forward;
        }
        if self.cycle.take_deferred_cancel() {
            // Modifiers were released earlier while this key was still
            // down; confirm the switcher now that it comes up.
            self.cycle_finish(comp, true);
        }
        self.key_state.release_claim(keycode);
        KeyDisposition::Consumed
    }

    /// Modifier state changed. Confirms the window switcher when the
    /// last modifier goes up, unless bound keys are still held.
    pub fn handle_modifiers<C: Compositor>(&mut self, comp: &mut C, modifiers: Modifiers) {
        self.modifiers = modifiers;

        if self.mode == InputMode::WindowSwitcher && modifiers.is_empty() {
            if self.key_state.bound_len() > 0 {
                self.cycle.defer_cancel();
            } else {
                self.cycle_finish(comp, true);
            }
        }
    }

    fn handle_menu_key<C: Compositor>(&mut self, comp: &mut C, translated: &[Keysym]) {
        for sym in translated {
            match *sym {
                Keysym::DOWN => comp.menu_select_next(),
                Keysym::UP => comp.menu_select_prev(),
                Keysym::RIGHT => comp.menu_submenu_enter(),
                Keysym::LEFT => comp.menu_submenu_leave(),
                Keysym::RETURN | Keysym::KP_ENTER => {
                    if comp.menu_activate_selected() {
                        self.leave_menu_mode(comp);
                    }
                }
                Keysym::ESCAPE => {
                    comp.menu_close_root();
                    self.mode = InputMode::Passthrough;
                    self.update_cursor_focus(comp);
                }
                _ => continue,
            }
            break;
        }
    }

    /// Returns whether the keystroke was consumed by the switcher.
    fn handle_cycle_key<C: Compositor>(&mut self, comp: &mut C, input: &KeyInput) -> bool {
        if input.is_modifier() {
            return false;
        }
        for sym in &input.translated {
            match *sym {
                Keysym::ESCAPE => {
                    self.cycle_finish(comp, false);
                    return true;
                }
                Keysym::UP | Keysym::LEFT => {
                    self.cycle_step(comp, CycleDirection::Backward);
                    return true;
                }
                Keysym::DOWN | Keysym::RIGHT => {
                    self.cycle_step(comp, CycleDirection::Forward);
                    return true;
                }
                _ => {}
            }
        }
        false
    }

    // --- keybind auto-repeat -----------------------------------------

    fn start_keybind_repeat<C: Compositor>(&mut self, comp: &mut C, input: &KeyInput) {
        if self.settings.repeat_rate > 0 && self.settings.repeat_delay > 0 {
            self.repeat_input = Some(input.clone());
            comp.schedule_keybind_repeat(self.settings.repeat_delay as u32);
        }
    }

    pub fn cancel_keybind_repeat<C: Compositor>(&mut self, comp: &mut C) {
        if self.repeat_input.take().is_some() {
            comp.cancel_keybind_repeat();
        }
    }

    /// Timer callback: re-synthesize the bound key press and re-arm at
    /// the keyboard's repeat rate.
    pub fn handle_keybind_repeat<C: Compositor>(&mut self, comp: &mut C) {
        let Some(input) = self.repeat_input.clone() else { return };
        self.dispatch_key(comp, &input);
        if self.settings.repeat_rate > 0 {
            comp.schedule_keybind_repeat(1000 / self.settings.repeat_rate as u32);
        }
    }
}
