//! Per-seat interaction state.
//!
//! One [`Seat`] exists per logical group of input devices. It is the
//! only owner of interaction state (no process-wide statics) and is
//! threaded explicitly through every entry point.
//!
//! Scene objects referenced from here (grabbed view, pressed surface,
//! pointer constraint) are owned elsewhere. The embedder must call the
//! `handle_*_destroyed` notifications synchronously on teardown of
//! those objects; the next event dispatch may otherwise act on a
//! dangling id.

use std::collections::HashMap;

use tracing::debug;

use crate::compositor::{Compositor, CursorIcon};
use crate::config::{Action, BindTable, InputSettings};
use crate::cycle::CycleState;
use crate::double_click::DoubleClickTracker;
use crate::geo::{Point, Rect, ResizeEdges};
use crate::hit_test::{cursor_context_at, CursorContext};
use crate::interactive::{GrabState, ResizeThrottle};
use crate::key_state::KeyStateSet;
use crate::keyboard::KeyInput;
use crate::keys::Modifiers;
use crate::node::{ConstraintId, NodeId, SurfaceId, ViewId};
use crate::tablet::TabletTool;
use crate::touch::TouchPoint;

/// Top-level interaction mode. Exactly one is active per seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Passthrough,
    Move,
    Resize,
    Menu,
    WindowSwitcher,
}

/// What was under the pointer when a button went down. Kept until the
/// release so motion and release events stay consistent even when the
/// cursor leaves the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PressedSession {
    pub ctx: CursorContext,
}

/// Kind of an active pointer constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// Motion is confined to a region; deltas are adjusted.
    Confined,
    /// The pointer does not move at all.
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ActiveConstraint {
    pub id: ConstraintId,
    pub kind: ConstraintKind,
}

pub struct Seat {
    pub(crate) settings: InputSettings,
    pub(crate) binds: BindTable,

    pub(crate) cursor: Point,
    pub(crate) mode: InputMode,
    pub(crate) grab: Option<GrabState>,
    pub(crate) pressed: Option<PressedSession>,
    pub(crate) double_click: DoubleClickTracker,
    pub(crate) key_state: KeyStateSet,
    pub(crate) cycle: CycleState,

    /// Live modifier mask, updated from the keyboard modifier events.
    pub(crate) modifiers: Modifiers,

    pub(crate) touch_points: HashMap<i32, TouchPoint>,
    pub(crate) tablet_tools: HashMap<u64, TabletTool>,

    /// Smooth-scroll accumulation per axis.
    pub(crate) scroll_accum: (f64, f64),

    /// Timestamp of the last button press, consulted by the menu's
    /// release-ignore window.
    pub(crate) last_press_msec: u32,

    pub(crate) resize_throttle: ResizeThrottle,
    pub(crate) constraint: Option<ActiveConstraint>,

    /// Cursor image currently set by the seat, to avoid re-setting the
    /// same one. `Client` means the focused client owns the image.
    pub(crate) server_cursor: CursorIcon,

    pub(crate) drag_active: bool,

    /// Pending synthetic repeat of a bound key press.
    pub(crate) repeat_input: Option<KeyInput>,

    /// Keybind matched by the last press, pending its release actions.
    pub(crate) release_bind: Option<usize>,

    /// Guards against recursion when a focus update raises a view and
    /// the raise triggers another focus update.
    pub(crate) updating_focus: bool,
}

impl Seat {
    pub fn new(binds: BindTable, settings: InputSettings) -> Self {
        Self {
            settings,
            binds,
            cursor: Point::default(),
            mode: InputMode::Passthrough,
            grab: None,
            pressed: None,
            double_click: DoubleClickTracker::new(),
            key_state: KeyStateSet::new(),
            cycle: CycleState::default(),
            modifiers: Modifiers::empty(),
            touch_points: HashMap::new(),
            tablet_tools: HashMap::new(),
            scroll_accum: (0.0, 0.0),
            last_press_msec: 0,
            resize_throttle: ResizeThrottle::default(),
            constraint: None,
            server_cursor: CursorIcon::Default,
            drag_active: false,
            repeat_input: None,
            release_bind: None,
            updating_focus: false,
        }
    }

    pub fn input_mode(&self) -> InputMode {
        self.mode
    }

    pub fn cursor_position(&self) -> Point {
        self.cursor
    }

    /// View currently grabbed by an interactive move/resize.
    pub fn grabbed_view(&self) -> Option<ViewId> {
        self.grab.map(|g| g.view)
    }

    /// Keycodes to report as pressed when giving a surface keyboard
    /// focus: physically held keys minus those claimed by bindings.
    pub fn pressed_keys_for_focus(&self) -> Vec<crate::keys::Keycode> {
        self.key_state.pressed_minus_bound()
    }

    /// Swap in a freshly loaded bind table. Any pending two-pass bind
    /// state is dropped with the old table.
    pub fn set_bind_table(&mut self, binds: BindTable) {
        self.binds = binds;
        self.release_bind = None;
        self.repeat_input = None;
    }

    pub(crate) fn set_pressed(&mut self, ctx: &CursorContext) {
        self.pressed = Some(PressedSession { ctx: *ctx });
    }

    pub(crate) fn reset_pressed(&mut self) {
        self.pressed = None;
    }

    /// Set or replace the active pointer constraint. `None` releases.
    pub fn set_constraint(&mut self, constraint: Option<(ConstraintId, ConstraintKind)>) {
        self.constraint = constraint.map(|(id, kind)| ActiveConstraint { id, kind });
    }

    /// A drag-and-drop session started: drag icons take over motion
    /// semantics, so the pressed session ends immediately.
    pub fn notify_drag_begin(&mut self) {
        self.drag_active = true;
        self.reset_pressed();
    }

    pub fn notify_drag_end(&mut self) {
        self.drag_active = false;
    }

    // --- destruction notifications -----------------------------------
    //
    // Called synchronously by the embedder while tearing down the
    // object in question.

    pub fn handle_view_destroyed<C: Compositor>(&mut self, comp: &mut C, view: ViewId) {
        if self.grab.is_some_and(|g| g.view == view) {
            debug!("grabbed view destroyed, aborting interactive {:?}", self.mode);
            self.grab = None;
            self.mode = InputMode::Passthrough;
            self.set_cursor(comp, CursorIcon::Default);
        }
        if self.pressed.is_some_and(|p| p.ctx.view == Some(view)) {
            self.reset_pressed();
        }
        self.double_click.forget_view(view);
        self.cycle_on_view_destroyed(comp, view);
    }

    pub fn handle_surface_destroyed(&mut self, surface: SurfaceId) {
        if self.pressed.is_some_and(|p| p.ctx.surface == Some(surface)) {
            self.reset_pressed();
        }
    }

    pub fn handle_node_destroyed(&mut self, node: NodeId) {
        if self.pressed.is_some_and(|p| p.ctx.node == Some(node)) {
            self.reset_pressed();
        }
    }

    pub fn handle_constraint_destroyed(&mut self, constraint: ConstraintId) {
        if self.constraint.is_some_and(|c| c.id == constraint) {
            self.constraint = None;
        }
    }

    /// Devices of the seat are going away (seat teardown). Drops all
    /// transient state; the struct can be discarded afterwards.
    pub fn finish<C: Compositor>(&mut self, comp: &mut C) {
        comp.cancel_keybind_repeat();
        self.repeat_input = None;
        self.grab = None;
        self.pressed = None;
        self.touch_points.clear();
        self.tablet_tools.clear();
        self.constraint = None;
        self.mode = InputMode::Passthrough;
    }

    // --- interactive move/resize -------------------------------------

    /// Start an interactive move or resize of `view`, from a bind
    /// action or a client protocol request.
    ///
    /// For a resize with empty `edges`, the edges are derived from the
    /// cursor quadrant relative to the view's center.
    pub fn interactive_begin<C: Compositor>(
        &mut self,
        comp: &mut C,
        view: ViewId,
        mode: InputMode,
        edges: ResizeEdges,
    ) {
        debug_assert!(matches!(mode, InputMode::Move | InputMode::Resize));
        if self.mode != InputMode::Passthrough {
            return;
        }
        let Some(origin_box) = comp.view_geometry(view) else {
            debug!("interactive_begin for unknown view {view:?}");
            return;
        };

        let edges = if mode == InputMode::Resize && edges.is_empty() {
            self.edges_from_cursor_quadrant(origin_box)
        } else {
            edges
        };

        self.grab = Some(GrabState { view, edges, origin_box, origin_cursor: self.cursor });
        self.mode = mode;

        let icon = match mode {
            InputMode::Move => CursorIcon::Grab,
            _ => CursorIcon::from_edges(edges),
        };
        self.set_cursor(comp, icon);
    }

    /// End the interactive session for `view`, re-syncing focus and
    /// cursor for whatever is now under the pointer.
    pub fn interactive_end<C: Compositor>(&mut self, comp: &mut C, view: ViewId) {
        if !self.grab.is_some_and(|g| g.view == view) {
            return;
        }
        self.grab = None;
        self.mode = InputMode::Passthrough;
        // Rebase: the pointer may now be over a different target.
        self.set_cursor(comp, CursorIcon::Default);
        self.update_cursor_focus(comp);
    }

    /// Resize edges that put the cursor in the nearest corner of the
    /// box, for resizes started without a concrete edge (keyboard
    /// binds, client requests without edges).
    fn edges_from_cursor_quadrant(&self, geo: Rect) -> ResizeEdges {
        let mut edges = ResizeEdges::empty();
        edges |= if (self.cursor.x as i32) < geo.x + geo.width / 2 {
            ResizeEdges::LEFT
        } else {
            ResizeEdges::RIGHT
        };
        edges |= if (self.cursor.y as i32) < geo.y + geo.height / 2 {
            ResizeEdges::TOP
        } else {
            ResizeEdges::BOTTOM
        };
        edges
    }

    // --- menu mode ---------------------------------------------------

    /// The menu subsystem opened a menu; pointer and key input is now
    /// redirected to menu selection.
    pub fn enter_menu_mode(&mut self) {
        self.mode = InputMode::Menu;
    }

    /// The menu closed (item activated, Escape, click outside).
    pub fn leave_menu_mode<C: Compositor>(&mut self, comp: &mut C) {
        if self.mode == InputMode::Menu {
            self.mode = InputMode::Passthrough;
            self.update_cursor_focus(comp);
        }
    }

    // --- cursor image ------------------------------------------------

    pub(crate) fn set_cursor<C: Compositor>(&mut self, comp: &mut C, icon: CursorIcon) {
        debug_assert!(icon != CursorIcon::Client);
        if self.server_cursor == icon {
            return;
        }
        comp.set_cursor_icon(icon);
        self.server_cursor = icon;
    }

    // --- shared action dispatch --------------------------------------

    /// Run one action list. Actions that change the interaction mode
    /// are handled here; everything else goes to the external runner
    /// one action at a time, preserving order.
    pub(crate) fn run_action_list<C: Compositor>(
        &mut self,
        comp: &mut C,
        view: Option<ViewId>,
        actions: &[Action],
        ctx: Option<&CursorContext>,
    ) {
        for action in actions {
            match action {
                Action::Move => {
                    if let Some(view) = view {
                        self.interactive_begin(comp, view, InputMode::Move, ResizeEdges::empty());
                    }
                }
                Action::Resize => {
                    if let Some(view) = view {
                        let edges = ctx.map(|c| c.kind.resize_edges()).unwrap_or_default();
                        self.interactive_begin(comp, view, InputMode::Resize, edges);
                    }
                }
                Action::ShowMenu { menu } => {
                    if self.mode == InputMode::Passthrough && comp.open_menu(menu, self.cursor) {
                        self.enter_menu_mode();
                    }
                }
                Action::NextWindow => {
                    self.cycle_begin(comp, crate::cycle::CycleDirection::Forward);
                }
                Action::PreviousWindow => {
                    self.cycle_begin(comp, crate::cycle::CycleDirection::Backward);
                }
                other => {
                    comp.run_actions(view, std::slice::from_ref(other), ctx);
                }
            }
        }
    }

    pub(crate) fn context_at<C: Compositor>(&mut self, comp: &mut C) -> CursorContext {
        cursor_context_at(comp, self.cursor)
    }
}
