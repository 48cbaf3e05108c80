//! The collaborator surface this crate consumes.
//!
//! The embedding compositor implements [`Compositor`] on its central
//! state type, the same way a smithay-based compositor funnels seat,
//! output and shell handlers through one `DesktopState`. All methods
//! are synchronous; the seat is driven from a single-threaded event
//! loop and never holds a call across a dispatch.

use crate::config::Action;
use crate::cycle::CycleDirection;
use crate::geo::{MinSize, Point, Rect, ResizeEdges};
use crate::hit_test::CursorContext;
use crate::node::{ConstraintId, NodeDescriptor, NodeId, SurfaceId, ViewId};

/// Result of a topmost-node scene query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeAt {
    pub node: NodeId,
    /// Node-local coordinates of the query point. For surface nodes
    /// these are surface-local.
    pub local: Point,
}

/// Cursor images set by the seat while it owns the pointer.
///
/// `Client` is never set directly; it marks that the focused client
/// provides the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorIcon {
    Client,
    Default,
    Grab,
    ResizeNw,
    ResizeN,
    ResizeNe,
    ResizeE,
    ResizeSe,
    ResizeS,
    ResizeSw,
    ResizeW,
}

impl CursorIcon {
    /// Icon for an edge combination, `Default` when no edge is active.
    pub fn from_edges(edges: ResizeEdges) -> CursorIcon {
        use ResizeEdges as E;
        match edges {
            e if e == E::TOP | E::LEFT => CursorIcon::ResizeNw,
            e if e == E::TOP | E::RIGHT => CursorIcon::ResizeNe,
            e if e == E::BOTTOM | E::RIGHT => CursorIcon::ResizeSe,
            e if e == E::BOTTOM | E::LEFT => CursorIcon::ResizeSw,
            e if e == E::TOP => CursorIcon::ResizeN,
            e if e == E::RIGHT => CursorIcon::ResizeE,
            e if e == E::BOTTOM => CursorIcon::ResizeS,
            e if e == E::LEFT => CursorIcon::ResizeW,
            _ => CursorIcon::Default,
        }
    }
}

/// Everything the interaction core needs from the rest of the
/// compositor. Grouped by concern; see module docs.
pub trait Compositor {
    // --- scene graph ---

    /// Topmost input-enabled node at a layout coordinate.
    fn node_at(&self, pos: Point) -> Option<NodeAt>;
    fn node_parent(&self, node: NodeId) -> Option<NodeId>;
    /// Classification descriptor attached to a node, if any.
    fn node_descriptor(&self, node: NodeId) -> Option<NodeDescriptor>;
    /// The surface a node renders, for surface nodes.
    fn surface_from_node(&self, node: NodeId) -> Option<SurfaceId>;
    /// Layout coordinates of a node's origin.
    fn node_origin(&self, node: NodeId) -> Option<Point>;
    fn set_node_enabled(&mut self, node: NodeId, enabled: bool);
    /// Root node of the active drag icon overlay, if a drag is live.
    fn drag_icon_node(&self) -> Option<NodeId> {
        None
    }

    // --- surfaces ---

    fn surface_size(&self, surface: SurfaceId) -> Option<(i32, i32)>;
    /// Walk a popup chain up to its toplevel; `None` for surfaces with
    /// no toplevel association.
    fn toplevel_surface(&self, surface: SurfaceId) -> Option<SurfaceId>;
    fn surface_accepts_touch(&self, surface: SurfaceId) -> bool;
    /// Whether a non-view surface asked for keyboard focus on click
    /// (layer-shell interactivity).
    fn surface_wants_focus(&self, surface: SurfaceId) -> bool;

    // --- views ---

    fn view_geometry(&self, view: ViewId) -> Option<Rect>;
    fn view_min_size(&self, view: ViewId) -> MinSize;
    fn view_is_shaded(&self, view: ViewId) -> bool;
    /// Refine a coarse border/corner hit into concrete edges using the
    /// view's decoration layout at this exact coordinate.
    fn refine_resize_edges(&self, view: ViewId, pos: Point) -> ResizeEdges;
    /// Refresh rate of the view's output in mHz, `0` when unknown.
    fn view_output_refresh_mhz(&self, view: ViewId) -> i32;
    fn move_view(&mut self, view: ViewId, x: i32, y: i32);
    fn resize_view(&mut self, view: ViewId, geo: Rect);

    // --- pointer delivery ---

    fn pointer_notify_enter(&mut self, surface: SurfaceId, local: Point);
    fn pointer_clear_focus(&mut self);
    fn pointer_focused_surface(&self) -> Option<SurfaceId>;
    /// Whether a client pointer grab (e.g. an xdg popup grab) is live.
    fn pointer_has_grab(&self) -> bool;
    fn pointer_end_grab(&mut self);
    /// Deliver motion to the focused surface. Used by the synthetic
    /// (touch/tablet emulation) paths; for real pointer events the
    /// caller forwards based on the `process_*` return values.
    fn pointer_notify_motion(&mut self, time_msec: u32, local: Point);
    fn pointer_notify_button(&mut self, time_msec: u32, button: u32, state: crate::keys::ButtonState);
    fn pointer_notify_frame(&mut self);

    // --- touch delivery ---

    fn touch_notify_down(&mut self, surface: SurfaceId, id: i32, time_msec: u32, local: Point);
    fn touch_notify_motion(&mut self, id: i32, time_msec: u32, local: Point);
    fn touch_notify_up(&mut self, id: i32, time_msec: u32);
    fn touch_notify_frame(&mut self);

    // --- focus ---

    fn focus_view(&mut self, view: ViewId, raise: bool);
    fn focus_surface(&mut self, surface: SurfaceId);

    // --- actions and movement policy ---

    /// Run an action list for the given view/context. Synchronous;
    /// long-running work is forked off by the runner itself.
    fn run_actions(&mut self, view: Option<ViewId>, actions: &[Action], ctx: Option<&CursorContext>);
    /// Snap/resistance hook for interactive moves; may override the
    /// proposed position.
    fn adjust_move(&mut self, view: ViewId, x: &mut i32, y: &mut i32);
    /// Snap/resistance hook for interactive resizes; may override the
    /// proposed box.
    fn adjust_resize(&mut self, view: ViewId, geo: &mut Rect);

    // --- decoration feedback and cursor image ---

    /// Hover feedback for titlebar buttons; `None` clears it.
    fn update_decoration_hover(&mut self, _node: Option<NodeId>) {}
    fn set_cursor_icon(&mut self, icon: CursorIcon);

    // --- window switcher host ---

    /// Next focusable view in stacking order, wrapping around.
    fn next_focusable_view(&self, from: Option<ViewId>, dir: CycleDirection) -> Option<ViewId>;
    fn switcher_update(&mut self, selected: Option<ViewId>);
    fn switcher_close(&mut self);

    // --- menu host ---

    /// Build and show the named menu at a layout position. Returns
    /// `false` when no such menu is configured.
    fn open_menu(&mut self, menu: &str, pos: Point) -> bool;
    fn menu_pointer_motion(&mut self, node: NodeId);
    fn menu_select_next(&mut self);
    fn menu_select_prev(&mut self);
    fn menu_submenu_enter(&mut self);
    fn menu_submenu_leave(&mut self);
    /// Run the hovered/selected item's actions. Returns `true` when
    /// this closed the menu (submenu toggles keep it open).
    fn menu_activate_selected(&mut self) -> bool;
    fn menu_close_root(&mut self);

    // --- output layout ---

    /// Map absolute `[0, 1]` device coordinates onto the layout.
    fn absolute_to_layout(&self, x: f64, y: f64) -> Point;
    fn layout_bounds(&self) -> Rect;

    // --- pointer constraints ---

    /// Confine a proposed delta to a constraint region. `from` is the
    /// current cursor position in layout coordinates; the implementor
    /// maps it into the constrained surface's region. `None` leaves
    /// the pointer where it is.
    fn confine_pointer(
        &self,
        constraint: ConstraintId,
        from: Point,
        dx: f64,
        dy: f64,
    ) -> Option<(f64, f64)>;

    // --- timers ---

    /// Arm the keybind auto-repeat timer; on expiry the event loop
    /// calls [`crate::seat::Seat::handle_keybind_repeat`].
    fn schedule_keybind_repeat(&mut self, delay_ms: u32);
    fn cancel_keybind_repeat(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_icon_from_edges() {
        use ResizeEdges as E;
        assert_eq!(CursorIcon::from_edges(E::empty()), CursorIcon::Default);
        assert_eq!(CursorIcon::from_edges(E::TOP), CursorIcon::ResizeN);
        assert_eq!(CursorIcon::from_edges(E::TOP | E::LEFT), CursorIcon::ResizeNw);
        assert_eq!(CursorIcon::from_edges(E::BOTTOM | E::RIGHT), CursorIcon::ResizeSe);
        assert_eq!(CursorIcon::from_edges(E::LEFT), CursorIcon::ResizeW);
    }
}
