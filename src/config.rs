//! Bind-table and settings types consumed by the seat.
//!
//! The configuration front-end parses its files, resolves action and
//! context names to the enums below and hands over a validated
//! [`BindTable`] plus [`InputSettings`]. Runtime code never compares
//! strings.

use crate::error::BindError;
use crate::geo::ResizeEdges;
use crate::keys::{Keycode, Keysym, Modifiers};
use crate::node::HitKind;

/// A compositor action, resolved from its configured name at load time.
///
/// Execution is delegated to the embedding compositor's action runner;
/// this crate only selects which lists to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Focus,
    Raise,
    Lower,
    Close,
    Iconify,
    Maximize,
    ToggleMaximize,
    ToggleFullscreen,
    Shade,
    Unshade,
    /// Begin an interactive move of the context view.
    Move,
    /// Begin an interactive resize of the context view.
    Resize,
    ShowMenu { menu: String },
    NextWindow,
    PreviousWindow,
    Execute { command: String },
}

/// What kind of pointer event a mousebind reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Press,
    Release,
    Click,
    DoubleClick,
    Drag,
    Scroll,
}

/// Logical scroll step direction after axis accumulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

/// The identifier a mousebind matches on: a button code for
/// press-derived events, a direction for scroll binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseTrigger {
    Button(u32),
    Scroll(ScrollDirection),
}

/// The screen region a mousebind applies to.
///
/// Concrete contexts name one decoration element; `Border`, `Frame` and
/// `All` are containment contexts covering several classifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindContext {
    Titlebar,
    CloseButton,
    MaximizeButton,
    IconifyButton,
    WindowMenuButton,
    Top,
    Bottom,
    Left,
    Right,
    TopLeftCorner,
    TopRightCorner,
    BottomLeftCorner,
    BottomRightCorner,
    /// Any border edge or corner.
    Border,
    /// Anywhere on a managed window, decorations and client area alike.
    Frame,
    /// The client content area only.
    Client,
    /// The empty desktop.
    Root,
    /// Anywhere at all.
    All,
}

impl BindContext {
    /// Containment test against a resolved cursor classification.
    pub fn contains(&self, kind: HitKind) -> bool {
        use BindContext::*;
        match self {
            All => true,
            Frame => matches!(
                kind,
                HitKind::Client
                    | HitKind::Titlebar
                    | HitKind::CloseButton
                    | HitKind::MaximizeButton
                    | HitKind::IconifyButton
                    | HitKind::WindowMenuButton
                    | HitKind::Border(_)
            ),
            Client => kind == HitKind::Client,
            Root => kind == HitKind::Root,
            Titlebar => kind == HitKind::Titlebar,
            CloseButton => kind == HitKind::CloseButton,
            MaximizeButton => kind == HitKind::MaximizeButton,
            IconifyButton => kind == HitKind::IconifyButton,
            WindowMenuButton => kind == HitKind::WindowMenuButton,
            Border => matches!(kind, HitKind::Border(e) if !e.is_empty()),
            Top => kind == HitKind::Border(ResizeEdges::TOP),
            Bottom => kind == HitKind::Border(ResizeEdges::BOTTOM),
            Left => kind == HitKind::Border(ResizeEdges::LEFT),
            Right => kind == HitKind::Border(ResizeEdges::RIGHT),
            TopLeftCorner => kind == HitKind::Border(ResizeEdges::TOP | ResizeEdges::LEFT),
            TopRightCorner => kind == HitKind::Border(ResizeEdges::TOP | ResizeEdges::RIGHT),
            BottomLeftCorner => kind == HitKind::Border(ResizeEdges::BOTTOM | ResizeEdges::LEFT),
            BottomRightCorner => kind == HitKind::Border(ResizeEdges::BOTTOM | ResizeEdges::RIGHT),
        }
    }

    /// Frame-level generic contexts swallow the matching press/release
    /// pair instead of forwarding it to the client.
    pub fn is_frame_level(&self) -> bool {
        matches!(self, BindContext::Frame | BindContext::All)
    }
}

/// A keyboard binding.
#[derive(Debug, Clone, PartialEq)]
pub struct Keybind {
    pub modifiers: Modifiers,
    /// Symbols this bind matches (already case-folded at load time).
    pub keysyms: Vec<Keysym>,
    /// Physical keycodes this bind matches, resolved from the keymap at
    /// load time. Empty for layout-dependent binds.
    pub keycodes: Vec<Keycode>,
    /// Run the actions on release of the bound key instead of press.
    pub on_release: bool,
    pub actions: Vec<Action>,
}

/// A pointer binding.
#[derive(Debug, Clone, PartialEq)]
pub struct Mousebind {
    pub context: BindContext,
    pub trigger: MouseTrigger,
    pub event: MouseEventKind,
    pub modifiers: Modifiers,
    pub actions: Vec<Action>,
    /// Armed on a matching press; Click/Drag actions run on the
    /// matching release or motion and clear it again.
    pub(crate) pressed_in_context: bool,
}

impl Mousebind {
    pub fn new(
        context: BindContext,
        trigger: MouseTrigger,
        event: MouseEventKind,
        modifiers: Modifiers,
        actions: Vec<Action>,
    ) -> Self {
        Self { context, trigger, event, modifiers, actions, pressed_in_context: false }
    }
}

/// The validated, deduplicated set of key and mouse bindings active for
/// one seat.
#[derive(Debug, Default)]
pub struct BindTable {
    pub(crate) keybinds: Vec<Keybind>,
    pub(crate) mousebinds: Vec<Mousebind>,
}

impl BindTable {
    pub fn new(keybinds: Vec<Keybind>, mousebinds: Vec<Mousebind>) -> Result<Self, BindError> {
        for (i, kb) in keybinds.iter().enumerate() {
            if kb.keysyms.is_empty() && kb.keycodes.is_empty() {
                return Err(BindError::EmptyKeybind);
            }
            if kb.actions.is_empty() {
                return Err(BindError::KeybindWithoutActions);
            }
            for other in &keybinds[..i] {
                let same_sym = kb.keysyms.iter().any(|s| other.keysyms.contains(s));
                let same_code = kb.keycodes.iter().any(|c| other.keycodes.contains(c));
                if kb.modifiers == other.modifiers
                    && kb.on_release == other.on_release
                    && (same_sym || same_code)
                {
                    return Err(BindError::DuplicateKeybind { modifiers: kb.modifiers.bits() });
                }
            }
        }
        for (i, mb) in mousebinds.iter().enumerate() {
            for other in &mousebinds[..i] {
                if mb.context == other.context
                    && mb.trigger == other.trigger
                    && mb.event == other.event
                    && mb.modifiers == other.modifiers
                {
                    let button = match mb.trigger {
                        MouseTrigger::Button(b) => b,
                        MouseTrigger::Scroll(_) => 0,
                    };
                    return Err(BindError::DuplicateMousebind { button });
                }
            }
        }
        Ok(Self { keybinds, mousebinds })
    }

    pub fn keybinds(&self) -> &[Keybind] {
        &self.keybinds
    }

    pub fn mousebinds(&self) -> impl Iterator<Item = &Mousebind> {
        self.mousebinds.iter()
    }
}

/// Tablet device-to-layout mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabletRotation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

/// How tablet tool positions are turned into cursor motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabletMotion {
    /// Tool position maps directly onto the output layout.
    Absolute,
    /// Position deltas are scaled by the sensitivity factor.
    Relative,
}

#[derive(Debug, Clone)]
pub struct TabletSettings {
    /// Active area of the tablet in device-normalized `[0, 1]` coords
    /// (x, y, width, height). `None` uses the full surface.
    pub area: Option<(f64, f64, f64, f64)>,
    pub rotation: TabletRotation,
    pub motion: TabletMotion,
    /// Scale factor applied to deltas in relative mode.
    pub relative_motion_sensitivity: f64,
    /// Tool button remapping, `(source, target)` evdev codes.
    pub button_map: Vec<(u32, u32)>,
}

impl Default for TabletSettings {
    fn default() -> Self {
        use crate::keys::button;
        Self {
            area: None,
            rotation: TabletRotation::Deg0,
            motion: TabletMotion::Absolute,
            relative_motion_sensitivity: 1.0,
            button_map: vec![
                (button::TOOL_PEN, button::LEFT),
                (button::STYLUS, button::RIGHT),
                (button::STYLUS2, button::MIDDLE),
            ],
        }
    }
}

/// Per-seat tunables, pre-validated by the configuration subsystem.
#[derive(Debug, Clone)]
pub struct InputSettings {
    /// Window for the second press of a double-click, in milliseconds.
    pub double_click_ms: u32,
    /// Keyboard repeat rate in Hz, used for keybind auto-repeat.
    pub repeat_rate: i32,
    /// Delay before keybind auto-repeat starts, in milliseconds.
    pub repeat_delay: i32,
    pub focus_follow_mouse: bool,
    pub focus_follow_mouse_requires_movement: bool,
    pub raise_on_focus: bool,
    /// A release this soon after opening a menu neither selects nor
    /// closes, so the opening click cannot bleed into the first item.
    pub menu_ignore_release_ms: u32,
    /// Resize commit cap when the output refresh rate is unknown.
    pub resize_rate_fallback_hz: u32,
    pub tablet: TabletSettings,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            double_click_ms: 500,
            repeat_rate: 25,
            repeat_delay: 600,
            focus_follow_mouse: false,
            focus_follow_mouse_requires_movement: true,
            raise_on_focus: false,
            menu_ignore_release_ms: 250,
            resize_rate_fallback_hz: 250,
            tablet: TabletSettings::default(),
        }
    }
}
