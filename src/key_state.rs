//! Bookkeeping of pressed and bind-claimed keycodes.
//!
//! A client must never observe a release without having observed the
//! matching press. When a keybind fires on press, the event is absorbed
//! by the compositor, so the matching release (and the releases of the
//! modifier keys held at that moment) must be absorbed too.

use crate::keys::Keycode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PressedKey {
    code: Keycode,
    is_modifier: bool,
}

/// Set of currently pressed keycodes with the subset claimed by
/// compositor bindings.
#[derive(Debug, Default)]
pub struct KeyStateSet {
    pressed: Vec<PressedKey>,
    bound: Vec<Keycode>,
}

impl KeyStateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pressed(&mut self, code: Keycode, is_pressed: bool, is_modifier: bool) {
        if is_pressed {
            if !self.pressed.iter().any(|k| k.code == code) {
                self.pressed.push(PressedKey { code, is_modifier });
            }
        } else {
            self.pressed.retain(|k| k.code != code);
        }
    }

    /// Claim a pressed key for a compositor binding, along with every
    /// modifier key held right now. Their releases will be absorbed.
    pub fn claim_as_bound(&mut self, code: Keycode) {
        if !self.bound.contains(&code) {
            self.bound.push(code);
        }
        let modifiers: Vec<Keycode> =
            self.pressed.iter().filter(|k| k.is_modifier).map(|k| k.code).collect();
        for m in modifiers {
            if !self.bound.contains(&m) {
                self.bound.push(m);
            }
        }
    }

    pub fn was_claimed(&self, code: Keycode) -> bool {
        self.bound.contains(&code)
    }

    pub fn release_claim(&mut self, code: Keycode) {
        self.bound.retain(|k| *k != code);
    }

    /// Keys to report as pressed to a newly focused surface: physically
    /// pressed minus those claimed by bindings.
    pub fn pressed_minus_bound(&self) -> Vec<Keycode> {
        self.pressed
            .iter()
            .map(|k| k.code)
            .filter(|code| !self.bound.contains(code))
            .collect()
    }

    pub fn bound_len(&self) -> usize {
        self.bound.len()
    }

    pub fn pressed_len(&self) -> usize {
        self.pressed.len()
    }
}
