//! Keyboard and pointer-button identifiers.
//!
//! Keycodes are raw evdev codes as delivered by the input backend.
//! Keysyms arrive already translated by the backend's keymap state; this
//! module only carries the handful of symbol values the interaction core
//! matches on itself (navigation and modifier keys, values per the X11
//! `keysymdef.h` encoding).

use bitflags::bitflags;

/// Raw evdev keycode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Keycode(pub u32);

/// Translated key symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Keysym(pub u32);

impl Keysym {
    pub const ESCAPE: Keysym = Keysym(0xff1b);
    pub const RETURN: Keysym = Keysym(0xff0d);
    pub const KP_ENTER: Keysym = Keysym(0xff8d);
    pub const LEFT: Keysym = Keysym(0xff51);
    pub const UP: Keysym = Keysym(0xff52);
    pub const RIGHT: Keysym = Keysym(0xff53);
    pub const DOWN: Keysym = Keysym(0xff54);

    const SHIFT_L: Keysym = Keysym(0xffe1);
    const SHIFT_R: Keysym = Keysym(0xffe2);
    const CONTROL_L: Keysym = Keysym(0xffe3);
    const CONTROL_R: Keysym = Keysym(0xffe4);
    const META_L: Keysym = Keysym(0xffe7);
    const META_R: Keysym = Keysym(0xffe8);
    const ALT_L: Keysym = Keysym(0xffe9);
    const ALT_R: Keysym = Keysym(0xffea);
    const SUPER_L: Keysym = Keysym(0xffeb);
    const SUPER_R: Keysym = Keysym(0xffec);
    const HYPER_L: Keysym = Keysym(0xffed);
    const HYPER_R: Keysym = Keysym(0xffee);
    const MODE_SWITCH: Keysym = Keysym(0xff7e);
    const ISO_LEVEL3_SHIFT: Keysym = Keysym(0xfe03);
    const ISO_LEVEL5_SHIFT: Keysym = Keysym(0xfe11);

    /// Whether this symbol is a modifier key (Shift, Ctrl, Alt, Super,
    /// Hyper, Meta or a level/mode shift).
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Self::SHIFT_L
                | Self::SHIFT_R
                | Self::CONTROL_L
                | Self::CONTROL_R
                | Self::META_L
                | Self::META_R
                | Self::ALT_L
                | Self::ALT_R
                | Self::SUPER_L
                | Self::SUPER_R
                | Self::HYPER_L
                | Self::HYPER_R
                | Self::MODE_SWITCH
                | Self::ISO_LEVEL3_SHIFT
                | Self::ISO_LEVEL5_SHIFT
        )
    }

    /// Case-fold Latin symbols so `W-A` and `W-a` configure the same
    /// bind regardless of which one the keymap reports.
    pub fn to_lower(self) -> Keysym {
        match self.0 {
            // Basic Latin and Latin-1 uppercase ranges map by offset.
            0x41..=0x5a => Keysym(self.0 + 0x20),
            0xc0..=0xd6 | 0xd8..=0xde => Keysym(self.0 + 0x20),
            _ => self,
        }
    }
}

bitflags! {
    /// Modifier mask, bit-compatible with the wlroots encoding the
    /// input backend reports.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u32 {
        const SHIFT = 1 << 0;
        const CAPS = 1 << 1;
        const CTRL = 1 << 2;
        const ALT = 1 << 3;
        const MOD2 = 1 << 4;
        const MOD3 = 1 << 5;
        const LOGO = 1 << 6;
        const MOD5 = 1 << 7;
    }
}

/// Pointer button codes (evdev `input-event-codes.h`).
pub mod button {
    pub const LEFT: u32 = 0x110;
    pub const RIGHT: u32 = 0x111;
    pub const MIDDLE: u32 = 0x112;
    pub const STYLUS: u32 = 0x14b;
    pub const STYLUS2: u32 = 0x14c;
    pub const TOOL_PEN: u32 = 0x140;
}

/// Press/release state of a key or button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}
