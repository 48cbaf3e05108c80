//! Pointer event processing.
//!
//! The `process_*` methods return whether the event should still be
//! forwarded to the focused client; actual delivery of real pointer
//! events stays with the caller. The `emulate_*` entry points are the
//! synthetic path used by touch and tablet fallback and deliver
//! through the [`Compositor`] themselves.

use tracing::{debug, warn};

use crate::compositor::{Compositor, CursorIcon};
use crate::config::ScrollDirection;
use crate::hit_test::CursorContext;
use crate::keys::ButtonState;
use crate::node::HitKind;
use crate::geo::Point;
use crate::seat::{ConstraintKind, InputMode, Seat};

/// Scroll axis of an axis event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrientation {
    Horizontal,
    Vertical,
}

/// A normalized scroll event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisEvent {
    pub orientation: AxisOrientation,
    /// Smooth scroll delta in surface units.
    pub delta: f64,
    /// Discrete wheel steps, `0` for smooth-only sources.
    pub delta_discrete: i32,
    pub time_msec: u32,
}

/// Smooth deltas are in surface space; treating each unit as a scroll
/// step would fire binds far too fast. Accumulate until this threshold
/// (inherited from Weston's historical fudge factor).
const SCROLL_THRESHOLD: f64 = 10.0;

impl Seat {
    // --- device entry points -----------------------------------------

    /// Relative pointer motion. Returns the surface-local coordinates
    /// to forward, or `None` when the event was absorbed.
    pub fn handle_pointer_motion<C: Compositor>(
        &mut self,
        comp: &mut C,
        dx: f64,
        dy: f64,
        time_msec: u32,
    ) -> Option<Point> {
        let (dx, dy) = match self.constraint {
            Some(c) if c.kind == ConstraintKind::Locked => return None,
            Some(c) => comp.confine_pointer(c.id, self.cursor, dx, dy)?,
            None => (dx, dy),
        };
        self.move_cursor(comp, dx, dy);
        self.process_motion(comp, time_msec)
    }

    /// Absolute pointer motion in `[0, 1]` device coordinates, mapped
    /// through the output layout.
    pub fn handle_pointer_motion_absolute<C: Compositor>(
        &mut self,
        comp: &mut C,
        x: f64,
        y: f64,
        time_msec: u32,
    ) -> Option<Point> {
        let layout = comp.absolute_to_layout(x, y);
        let dx = layout.x - self.cursor.x;
        let dy = layout.y - self.cursor.y;
        self.handle_pointer_motion(comp, dx, dy, time_msec)
    }

    fn move_cursor<C: Compositor>(&mut self, comp: &C, dx: f64, dy: f64) {
        let bounds = comp.layout_bounds();
        self.cursor.x = (self.cursor.x + dx)
            .clamp(bounds.x as f64, (bounds.x + bounds.width - 1) as f64);
        self.cursor.y = (self.cursor.y + dy)
            .clamp(bounds.y as f64, (bounds.y + bounds.height - 1) as f64);
    }

    // --- motion ------------------------------------------------------

    /// Process cursor motion at the current position. Returns the
    /// surface-local coordinates to forward to the client, if any.
    pub fn process_motion<C: Compositor>(&mut self, comp: &mut C, time_msec: u32) -> Option<Point> {
        match self.mode {
            InputMode::Move => {
                self.process_cursor_move(comp);
                return None;
            }
            InputMode::Resize => {
                self.process_cursor_resize(comp, time_msec);
                return None;
            }
            _ => {}
        }

        let ctx = self.context_at(comp);

        if ctx.kind == HitKind::MenuItem {
            if let Some(node) = ctx.node {
                comp.menu_pointer_motion(node);
            }
            self.set_cursor(comp, CursorIcon::Default);
            return None;
        }

        if self.mode == InputMode::Passthrough
            && (ctx.view.is_some() || ctx.surface.is_some())
            && self.settings.focus_follow_mouse
            && self.cycle.selected().is_none()
        {
            self.focus_under_cursor(comp, &ctx);
        }

        // Drag binds armed by the press fire on the first motion, with
        // the press context so they act on the right view and edges.
        let armed = self.binds.take_drag_binds();
        if !armed.is_empty() {
            let pressed_ctx = self.pressed.map(|p| p.ctx);
            for i in armed {
                let actions = self.binds.mousebinds[i].actions.clone();
                let view = pressed_ctx.and_then(|c| c.view);
                self.run_action_list(comp, view, &actions, pressed_ctx.as_ref());
            }
        }

        self.update_cursor_common(comp, &ctx, true)
    }

    fn process_cursor_move<C: Compositor>(&mut self, comp: &mut C) {
        let Some(grab) = self.grab else { return };
        let (mut x, mut y) = crate::interactive::move_position(&grab, self.cursor);
        comp.adjust_move(grab.view, &mut x, &mut y);
        comp.move_view(grab.view, x, y);
    }

    fn process_cursor_resize<C: Compositor>(&mut self, comp: &mut C, time_msec: u32) {
        let Some(grab) = self.grab else { return };
        let refresh = comp.view_output_refresh_mhz(grab.view);
        if !self.resize_throttle.should_commit(
            grab.view,
            time_msec,
            refresh,
            self.settings.resize_rate_fallback_hz,
        ) {
            return;
        }

        let current = comp.view_geometry(grab.view).unwrap_or(grab.origin_box);
        let mut geo = crate::interactive::resize_box(&grab, current, self.cursor);
        comp.adjust_resize(grab.view, &mut geo);
        geo = crate::interactive::clamp_and_anchor(&grab, geo, comp.view_min_size(grab.view));
        comp.resize_view(grab.view, geo);
    }

    /// Re-resolve whatever is under the cursor and sync focus and
    /// cursor image to it, e.g. after a mode ends or the scene changed
    /// underneath a stationary pointer.
    pub fn update_cursor_focus<C: Compositor>(&mut self, comp: &mut C) {
        // A focus change can raise a view, which re-triggers this.
        if self.updating_focus {
            return;
        }
        self.updating_focus = true;

        let ctx = self.context_at(comp);
        if self.mode == InputMode::Passthrough
            && (ctx.view.is_some() || ctx.surface.is_some())
            && self.settings.focus_follow_mouse
            && !self.settings.focus_follow_mouse_requires_movement
            && self.cycle.selected().is_none()
        {
            self.focus_under_cursor(comp, &ctx);
        }
        self.update_cursor_common(comp, &ctx, false);

        self.updating_focus = false;
    }

    fn focus_under_cursor<C: Compositor>(&mut self, comp: &mut C, ctx: &CursorContext) {
        if let Some(view) = ctx.view {
            comp.focus_view(view, self.settings.raise_on_focus);
        } else if let Some(surface) = ctx.surface {
            if comp.surface_wants_focus(surface) {
                comp.focus_surface(surface);
            }
        }
    }

    /// Shared tail of motion, axis and focus updates: decides between
    /// client delivery and server-side cursor handling.
    pub(crate) fn update_cursor_common<C: Compositor>(
        &mut self,
        comp: &mut C,
        ctx: &CursorContext,
        cursor_moved: bool,
    ) -> Option<Point> {
        comp.update_decoration_hover(ctx.node);

        if self.mode != InputMode::Passthrough {
            // No focus or cursor-image updates during modal interaction.
            return None;
        }

        if let Some(pressed) = self.pressed {
            if pressed.ctx.surface.is_some()
                && ctx.surface != pressed.ctx.surface
                && !self.update_pressed_surface(comp, ctx)
                && !self.drag_active
            {
                if cursor_moved {
                    // A button is held over another surface: keep
                    // feeding motion to it so drags and selections
                    // survive leaving the surface.
                    return self.motion_out_of_pressed_surface(comp);
                }
                return None;
            }
        }

        if let Some(surface) = ctx.surface {
            let has_focus = comp.pointer_focused_surface() == Some(surface);
            if !has_focus || self.server_cursor != CursorIcon::Client {
                // Avoid re-entering a focused surface (the extra
                // leave/enter pair breaks client double-click
                // detection), except to hand cursor-image control back
                // to the client after a server-side image was set.
                if has_focus {
                    comp.pointer_clear_focus();
                }
                comp.pointer_notify_enter(surface, ctx.local);
                self.server_cursor = CursorIcon::Client;
            }
            if cursor_moved {
                return Some(ctx.local);
            }
            None
        } else {
            comp.pointer_clear_focus();
            if !self.drag_active {
                let mut icon = CursorIcon::from_edges(ctx.kind.resize_edges());
                if icon != CursorIcon::Default
                    && ctx.view.is_some_and(|v| comp.view_is_shaded(v))
                {
                    // No resize cursors on the borders of a shaded view.
                    icon = CursorIcon::Default;
                }
                self.set_cursor(comp, icon);
            }
            None
        }
    }

    /// While a button is held we normally never leave one surface and
    /// enter another. The exception: an active popup grab where both
    /// surfaces belong to the same toplevel, so nested popup menus
    /// keep receiving their enter/leave events.
    fn update_pressed_surface<C: Compositor>(&mut self, comp: &mut C, ctx: &CursorContext) -> bool {
        if !comp.pointer_has_grab() {
            return false;
        }
        let Some(pressed) = self.pressed else { return false };
        let (Some(old), Some(new)) = (pressed.ctx.surface, ctx.surface) else {
            return false;
        };
        if old != new {
            let toplevel = comp.toplevel_surface(new);
            if toplevel.is_some() && toplevel == comp.toplevel_surface(old) {
                self.set_pressed(ctx);
                return true;
            }
        }
        false
    }

    /// Local coordinates for motion outside the pressed surface,
    /// derived from the surface's last known origin and the raw cursor
    /// position rather than a fresh hit-test.
    fn motion_out_of_pressed_surface<C: Compositor>(&self, comp: &C) -> Option<Point> {
        let pressed = self.pressed?;
        pressed.ctx.surface?;

        let origin = if let Some(view) = pressed.ctx.view {
            let geo = comp.view_geometry(view)?;
            Point::new(geo.x as f64, geo.y as f64)
        } else if let Some(node) = pressed.ctx.node {
            comp.node_origin(node)?
        } else {
            warn!("cannot locate pressed surface for out-of-surface motion");
            return None;
        };
        Some(Point::new(self.cursor.x - origin.x, self.cursor.y - origin.y))
    }

    // --- buttons -----------------------------------------------------

    /// Process a button press. Returns whether to forward it to the
    /// client with pointer focus.
    pub fn process_button_press<C: Compositor>(
        &mut self,
        comp: &mut C,
        button: u32,
        time_msec: u32,
    ) -> bool {
        let ctx = self.context_at(comp);
        self.last_press_msec = time_msec;

        if ctx.view.is_some() || ctx.surface.is_some() {
            // Remember the target for motion/release consistency.
            self.set_pressed(&ctx);
        }

        if self.mode == InputMode::Menu {
            // The menu was open before this press: drop the ignore
            // window so the coming release always selects or closes.
            self.last_press_msec = 0;
            return false;
        }

        // Non-view surfaces never see action processing, so the Focus
        // action cannot reach them; focus them directly on press.
        match ctx.kind {
            HitKind::LayerSurface => {
                if let Some(surface) = ctx.surface {
                    if comp.surface_wants_focus(surface) {
                        comp.focus_surface(surface);
                    }
                }
            }
            HitKind::LayerSubsurface => {
                if let Some(top) = ctx.surface.and_then(|s| comp.toplevel_surface(s)) {
                    if comp.surface_wants_focus(top) {
                        comp.focus_surface(top);
                    }
                }
            }
            HitKind::Unmanaged => {
                if let Some(surface) = ctx.surface {
                    comp.focus_surface(surface);
                }
            }
            _ => {}
        }

        if ctx.kind != HitKind::Client
            && ctx.kind != HitKind::LayerSubsurface
            && comp.pointer_has_grab()
        {
            // Pressing outside the client that owns an open popup
            // cancels the popup grab instead of acting on the target.
            comp.pointer_end_grab();
            return false;
        }

        let consumed = self.press_mousebindings(comp, &ctx, button, time_msec);
        ctx.surface.is_some() && !consumed
    }

    fn press_mousebindings<C: Compositor>(
        &mut self,
        comp: &mut C,
        ctx: &CursorContext,
        button: u32,
        time_msec: u32,
    ) -> bool {
        if self.mode == InputMode::WindowSwitcher {
            return false;
        }
        let double_click = self.double_click.classify(
            button,
            ctx.kind,
            ctx.view,
            time_msec,
            self.settings.double_click_ms,
        );
        let matched = self.binds.mouse_press(ctx.kind, button, self.modifiers, double_click);
        self.run_mousebind_actions(comp, ctx, &matched.to_run);
        matched.consumed_by_frame
    }

    /// Process a button release. Returns whether to forward it; follow
    /// up with [`Seat::finish_button_release`] after delivery.
    pub fn process_button_release<C: Compositor>(
        &mut self,
        comp: &mut C,
        button: u32,
        time_msec: u32,
    ) -> bool {
        let ctx = self.context_at(comp);
        let pressed_surface = self.pressed.and_then(|p| p.ctx.surface);
        self.reset_pressed();

        if self.mode == InputMode::Menu {
            if time_msec.wrapping_sub(self.last_press_msec) > self.settings.menu_ignore_release_ms {
                if ctx.kind == HitKind::MenuItem {
                    if comp.menu_activate_selected() {
                        self.leave_menu_mode(comp);
                    }
                } else {
                    comp.menu_close_root();
                    self.mode = InputMode::Passthrough;
                    self.update_cursor_common(comp, &ctx, false);
                }
            }
            return false;
        }

        if self.mode == InputMode::WindowSwitcher {
            if ctx.kind == HitKind::SwitcherItem {
                if let Some(view) = ctx.view {
                    self.cycle.select(view);
                    self.cycle_finish(comp, true);
                }
            }
            return false;
        }

        if self.mode != InputMode::Passthrough {
            return false;
        }

        if pressed_surface.is_some() && ctx.surface != pressed_surface {
            // Pressed over a different surface: the release belongs to
            // the surface that saw the press.
            return true;
        }

        let matched = self.binds.mouse_release(ctx.kind, button, self.modifiers);
        self.run_mousebind_actions(comp, &ctx, &matched.to_run);
        !matched.consumed_by_frame
    }

    /// Wrap up after a release was (maybe) delivered: ends an
    /// interactive move/resize. Returns whether one was ended.
    pub fn finish_button_release<C: Compositor>(&mut self, comp: &mut C) -> bool {
        if matches!(self.mode, InputMode::Move | InputMode::Resize) {
            if let Some(view) = self.grabbed_view() {
                self.interactive_end(comp, view);
            }
            return true;
        }
        false
    }

    fn run_mousebind_actions<C: Compositor>(
        &mut self,
        comp: &mut C,
        ctx: &CursorContext,
        matched: &[usize],
    ) {
        for &i in matched {
            let actions = self.binds.mousebinds[i].actions.clone();
            self.run_action_list(comp, ctx.view, &actions, Some(ctx));
        }
    }

    // --- axis --------------------------------------------------------

    /// Process a scroll event. Returns whether to forward it to the
    /// focused client.
    pub fn process_axis<C: Compositor>(&mut self, comp: &mut C, event: &AxisEvent) -> bool {
        let ctx = self.context_at(comp);

        let handled = match self.accumulate_scroll(event) {
            Some(direction) => {
                let matched = self.binds.mouse_scroll(ctx.kind, direction, self.modifiers);
                for &i in &matched {
                    let actions = self.binds.mousebinds[i].actions.clone();
                    self.run_action_list(comp, ctx.view, &actions, Some(&ctx));
                }
                !matched.is_empty()
            }
            None => false,
        };

        if ctx.surface.is_some() && !handled {
            // Make sure the surface under the cursor is the one that
            // receives the axis event.
            self.update_cursor_common(comp, &ctx, false);
            return true;
        }
        false
    }

    fn accumulate_scroll(&mut self, event: &AxisEvent) -> Option<ScrollDirection> {
        let accum = match event.orientation {
            AxisOrientation::Horizontal => &mut self.scroll_accum.0,
            AxisOrientation::Vertical => &mut self.scroll_accum.1,
        };
        if event.delta == 0.0 {
            // Delta 0 marks the end of a scroll.
            *accum = 0.0;
        } else {
            *accum += event.delta;
        }

        let step = if event.delta_discrete < 0 || *accum < -SCROLL_THRESHOLD {
            *accum %= SCROLL_THRESHOLD;
            -1
        } else if event.delta_discrete > 0 || *accum > SCROLL_THRESHOLD {
            *accum %= SCROLL_THRESHOLD;
            1
        } else {
            0
        };

        match (event.orientation, step) {
            (AxisOrientation::Horizontal, -1) => Some(ScrollDirection::Left),
            (AxisOrientation::Horizontal, 1) => Some(ScrollDirection::Right),
            (AxisOrientation::Vertical, -1) => Some(ScrollDirection::Up),
            (AxisOrientation::Vertical, 1) => Some(ScrollDirection::Down),
            _ => None,
        }
    }

    // --- synthetic pointer path (touch/tablet emulation) -------------

    /// Move the cursor by a delta and deliver the result. Used by
    /// devices that emulate a pointer.
    pub fn emulate_move<C: Compositor>(&mut self, comp: &mut C, dx: f64, dy: f64, time_msec: u32) {
        if dx == 0.0 && dy == 0.0 {
            debug!("dropping useless cursor emulation: {dx},{dy}");
            return;
        }
        self.move_cursor(comp, dx, dy);
        if let Some(local) = self.process_motion(comp, time_msec) {
            comp.pointer_notify_motion(time_msec, local);
        }
        comp.pointer_notify_frame();
    }

    /// Absolute variant of [`Seat::emulate_move`].
    pub fn emulate_move_absolute<C: Compositor>(
        &mut self,
        comp: &mut C,
        x: f64,
        y: f64,
        time_msec: u32,
    ) {
        let layout = comp.absolute_to_layout(x, y);
        self.emulate_move(comp, layout.x - self.cursor.x, layout.y - self.cursor.y, time_msec);
    }

    /// Synthetic button press/release at the current cursor position.
    pub fn emulate_button<C: Compositor>(
        &mut self,
        comp: &mut C,
        button: u32,
        state: ButtonState,
        time_msec: u32,
    ) {
        match state {
            ButtonState::Pressed => {
                if self.process_button_press(comp, button, time_msec) {
                    comp.pointer_notify_button(time_msec, button, state);
                }
            }
            ButtonState::Released => {
                if self.process_button_release(comp, button, time_msec) {
                    comp.pointer_notify_button(time_msec, button, state);
                }
                self.finish_button_release(comp);
            }
        }
    }
}
