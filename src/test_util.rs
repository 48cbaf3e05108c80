//! Shared mock compositor for unit tests.
//!
//! Models a flat scene of rectangular nodes in stacking order (last
//! added is topmost) and records every call the seat makes, so tests
//! can assert on delivery, focus, actions and cursor changes.

use std::collections::HashMap;

use crate::compositor::{Compositor, CursorIcon, NodeAt};
use crate::config::Action;
use crate::cycle::CycleDirection;
use crate::geo::{MinSize, Point, Rect, ResizeEdges};
use crate::hit_test::CursorContext;
use crate::keys::ButtonState;
use crate::node::{ConstraintId, DecorationPart, NodeDescriptor, NodeId, SurfaceId, ViewId};

#[derive(Debug)]
struct MockNode {
    region: Rect,
    parent: Option<NodeId>,
    descriptor: Option<NodeDescriptor>,
    surface: Option<SurfaceId>,
    enabled: bool,
}

#[derive(Debug)]
struct MockSurface {
    size: (i32, i32),
    toplevel: Option<SurfaceId>,
    accepts_touch: bool,
    wants_focus: bool,
}

#[derive(Debug)]
struct MockView {
    geometry: Rect,
    min_size: MinSize,
    shaded: bool,
    refresh_mhz: i32,
    refined_edges: Option<ResizeEdges>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuCall {
    Open(String),
    Motion(NodeId),
    Next,
    Prev,
    SubmenuEnter,
    SubmenuLeave,
    Activate,
    CloseRoot,
}

/// How the mock resolves `confine_pointer`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfineBehavior {
    Passthrough,
    Adjust(f64, f64),
    Block,
}

pub struct MockCompositor {
    next_id: u64,
    nodes: HashMap<NodeId, MockNode>,
    stacking: Vec<NodeId>,
    surfaces: HashMap<SurfaceId, MockSurface>,
    views: HashMap<ViewId, MockView>,
    drag_icon: Option<NodeId>,
    switcher_ring: Vec<ViewId>,

    pub layout: Rect,
    pub pointer_grab: bool,
    pub menu_activate_closes: bool,
    pub confine: ConfineBehavior,
    pub adjust_move_to: Option<(i32, i32)>,
    pub adjust_resize_to: Option<Rect>,

    // Recorded calls.
    pub entered: Vec<(SurfaceId, Point)>,
    pub focus_cleared: usize,
    pub grab_ended: usize,
    pub motions: Vec<(u32, Point)>,
    pub buttons: Vec<(u32, u32, ButtonState)>,
    pub frames: usize,
    pub touch_downs: Vec<(SurfaceId, i32, Point)>,
    pub touch_motions: Vec<(i32, Point)>,
    pub touch_ups: Vec<i32>,
    pub touch_frames: usize,
    pub actions: Vec<(Option<ViewId>, Vec<Action>)>,
    pub icons: Vec<CursorIcon>,
    pub moves: Vec<(ViewId, i32, i32)>,
    pub resizes: Vec<(ViewId, Rect)>,
    pub view_focuses: Vec<(ViewId, bool)>,
    pub surface_focuses: Vec<SurfaceId>,
    pub hovered: Vec<Option<NodeId>>,
    pub menu_calls: Vec<MenuCall>,
    pub switcher_updates: Vec<Option<ViewId>>,
    pub switcher_closed: usize,
    pub repeats_scheduled: Vec<u32>,
    pub repeats_cancelled: usize,

    focused_surface: Option<SurfaceId>,
}

impl MockCompositor {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            nodes: HashMap::new(),
            stacking: Vec::new(),
            surfaces: HashMap::new(),
            views: HashMap::new(),
            drag_icon: None,
            switcher_ring: Vec::new(),
            layout: Rect::new(0, 0, 1920, 1080),
            pointer_grab: false,
            menu_activate_closes: true,
            confine: ConfineBehavior::Passthrough,
            adjust_move_to: None,
            adjust_resize_to: None,
            entered: Vec::new(),
            focus_cleared: 0,
            grab_ended: 0,
            motions: Vec::new(),
            buttons: Vec::new(),
            frames: 0,
            touch_downs: Vec::new(),
            touch_motions: Vec::new(),
            touch_ups: Vec::new(),
            touch_frames: 0,
            actions: Vec::new(),
            icons: Vec::new(),
            moves: Vec::new(),
            resizes: Vec::new(),
            view_focuses: Vec::new(),
            surface_focuses: Vec::new(),
            hovered: Vec::new(),
            menu_calls: Vec::new(),
            switcher_updates: Vec::new(),
            switcher_closed: 0,
            repeats_scheduled: Vec::new(),
            repeats_cancelled: 0,
            focused_surface: None,
        }
    }

    fn alloc(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn push_node(&mut self, node: MockNode) -> NodeId {
        let id = NodeId(self.alloc());
        self.nodes.insert(id, node);
        self.stacking.push(id);
        id
    }

    pub fn add_view(&mut self, geometry: Rect) -> ViewId {
        let id = ViewId(self.alloc());
        self.views.insert(
            id,
            MockView {
                geometry,
                min_size: MinSize::default(),
                shaded: false,
                refresh_mhz: 0,
                refined_edges: None,
            },
        );
        self.switcher_ring.push(id);
        id
    }

    pub fn add_view_surface(&mut self, view: ViewId, region: Rect) -> (NodeId, SurfaceId) {
        let surface = SurfaceId(self.alloc());
        self.surfaces.insert(
            surface,
            MockSurface {
                size: (region.width, region.height),
                toplevel: None,
                accepts_touch: true,
                wants_focus: false,
            },
        );
        let node = self.push_node(MockNode {
            region,
            parent: None,
            descriptor: Some(NodeDescriptor::View(view)),
            surface: Some(surface),
            enabled: true,
        });
        (node, surface)
    }

    pub fn add_layer_surface(&mut self, region: Rect, wants_focus: bool) -> (NodeId, SurfaceId) {
        let surface = SurfaceId(self.alloc());
        self.surfaces.insert(
            surface,
            MockSurface {
                size: (region.width, region.height),
                toplevel: None,
                accepts_touch: false,
                wants_focus,
            },
        );
        let node = self.push_node(MockNode {
            region,
            parent: None,
            descriptor: Some(NodeDescriptor::LayerSurface(surface)),
            surface: Some(surface),
            enabled: true,
        });
        (node, surface)
    }

    /// A surface node without its own descriptor, classified via its
    /// parent (e.g. a subsurface or popup).
    pub fn add_child_node(
        &mut self,
        parent: NodeId,
        region: Rect,
        surface: Option<SurfaceId>,
    ) -> NodeId {
        if let Some(s) = surface {
            self.surfaces.entry(s).or_insert(MockSurface {
                size: (region.width, region.height),
                toplevel: None,
                accepts_touch: true,
                wants_focus: false,
            });
        }
        self.push_node(MockNode {
            region,
            parent: Some(parent),
            descriptor: None,
            surface,
            enabled: true,
        })
    }

    /// A popup surface of `view`, belonging to the same toplevel as
    /// `toplevel_of`.
    pub fn add_popup_surface(
        &mut self,
        view: ViewId,
        toplevel_of: SurfaceId,
        region: Rect,
    ) -> (NodeId, SurfaceId) {
        let surface = SurfaceId(self.alloc());
        self.surfaces.insert(
            surface,
            MockSurface {
                size: (region.width, region.height),
                toplevel: Some(toplevel_of),
                accepts_touch: true,
                wants_focus: false,
            },
        );
        let node = self.push_node(MockNode {
            region,
            parent: None,
            descriptor: Some(NodeDescriptor::View(view)),
            surface: Some(surface),
            enabled: true,
        });
        (node, surface)
    }

    pub fn add_decoration(&mut self, view: ViewId, part: DecorationPart, region: Rect) -> NodeId {
        self.push_node(MockNode {
            region,
            parent: None,
            descriptor: Some(NodeDescriptor::Decoration { view, part }),
            surface: None,
            enabled: true,
        })
    }

    pub fn add_menu_item(&mut self, region: Rect) -> NodeId {
        self.push_node(MockNode {
            region,
            parent: None,
            descriptor: Some(NodeDescriptor::MenuItem),
            surface: None,
            enabled: true,
        })
    }

    pub fn add_switcher_item(&mut self, view: ViewId, region: Rect) -> NodeId {
        self.push_node(MockNode {
            region,
            parent: None,
            descriptor: Some(NodeDescriptor::SwitcherItem(view)),
            surface: None,
            enabled: true,
        })
    }

    pub fn add_drag_icon(&mut self, region: Rect) -> NodeId {
        let node = self.push_node(MockNode {
            region,
            parent: None,
            descriptor: Some(NodeDescriptor::DragIcon),
            surface: None,
            enabled: true,
        });
        self.drag_icon = Some(node);
        node
    }

    pub fn remove_node(&mut self, node: NodeId) {
        self.nodes.remove(&node);
        self.stacking.retain(|n| *n != node);
        if self.drag_icon == Some(node) {
            self.drag_icon = None;
        }
    }

    pub fn remove_view(&mut self, view: ViewId) {
        self.views.remove(&view);
        self.switcher_ring.retain(|v| *v != view);
    }

    pub fn node_enabled(&self, node: NodeId) -> bool {
        self.nodes[&node].enabled
    }

    pub fn set_refined_edges(&mut self, view: ViewId, edges: ResizeEdges) {
        self.views.get_mut(&view).unwrap().refined_edges = Some(edges);
    }

    pub fn set_min_size(&mut self, view: ViewId, min: MinSize) {
        self.views.get_mut(&view).unwrap().min_size = min;
    }

    pub fn set_shaded(&mut self, view: ViewId, shaded: bool) {
        self.views.get_mut(&view).unwrap().shaded = shaded;
    }

    pub fn set_refresh_mhz(&mut self, view: ViewId, refresh: i32) {
        self.views.get_mut(&view).unwrap().refresh_mhz = refresh;
    }

    pub fn set_accepts_touch(&mut self, surface: SurfaceId, accepts: bool) {
        self.surfaces.get_mut(&surface).unwrap().accepts_touch = accepts;
    }
}

impl Compositor for MockCompositor {
    fn node_at(&self, pos: Point) -> Option<NodeAt> {
        for node in self.stacking.iter().rev() {
            let n = &self.nodes[node];
            if n.enabled && n.region.contains(pos) {
                return Some(NodeAt {
                    node: *node,
                    local: Point::new(pos.x - n.region.x as f64, pos.y - n.region.y as f64),
                });
            }
        }
        None
    }

    fn node_parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node)?.parent
    }

    fn node_descriptor(&self, node: NodeId) -> Option<NodeDescriptor> {
        self.nodes.get(&node)?.descriptor
    }

    fn surface_from_node(&self, node: NodeId) -> Option<SurfaceId> {
        self.nodes.get(&node)?.surface
    }

    fn node_origin(&self, node: NodeId) -> Option<Point> {
        let n = self.nodes.get(&node)?;
        Some(Point::new(n.region.x as f64, n.region.y as f64))
    }

    fn set_node_enabled(&mut self, node: NodeId, enabled: bool) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.enabled = enabled;
        }
    }

    fn drag_icon_node(&self) -> Option<NodeId> {
        self.drag_icon
    }

    fn surface_size(&self, surface: SurfaceId) -> Option<(i32, i32)> {
        Some(self.surfaces.get(&surface)?.size)
    }

    fn toplevel_surface(&self, surface: SurfaceId) -> Option<SurfaceId> {
        let s = self.surfaces.get(&surface)?;
        Some(s.toplevel.unwrap_or(surface))
    }

    fn surface_accepts_touch(&self, surface: SurfaceId) -> bool {
        self.surfaces.get(&surface).is_some_and(|s| s.accepts_touch)
    }

    fn surface_wants_focus(&self, surface: SurfaceId) -> bool {
        self.surfaces.get(&surface).is_some_and(|s| s.wants_focus)
    }

    fn view_geometry(&self, view: ViewId) -> Option<Rect> {
        Some(self.views.get(&view)?.geometry)
    }

    fn view_min_size(&self, view: ViewId) -> MinSize {
        self.views.get(&view).map(|v| v.min_size).unwrap_or_default()
    }

    fn view_is_shaded(&self, view: ViewId) -> bool {
        self.views.get(&view).is_some_and(|v| v.shaded)
    }

    fn refine_resize_edges(&self, view: ViewId, _pos: Point) -> ResizeEdges {
        self.views.get(&view).and_then(|v| v.refined_edges).unwrap_or(ResizeEdges::empty())
    }

    fn view_output_refresh_mhz(&self, view: ViewId) -> i32 {
        self.views.get(&view).map(|v| v.refresh_mhz).unwrap_or(0)
    }

    fn move_view(&mut self, view: ViewId, x: i32, y: i32) {
        self.moves.push((view, x, y));
        if let Some(v) = self.views.get_mut(&view) {
            v.geometry.x = x;
            v.geometry.y = y;
        }
    }

    fn resize_view(&mut self, view: ViewId, geo: Rect) {
        self.resizes.push((view, geo));
        if let Some(v) = self.views.get_mut(&view) {
            v.geometry = geo;
        }
    }

    fn pointer_notify_enter(&mut self, surface: SurfaceId, local: Point) {
        self.entered.push((surface, local));
        self.focused_surface = Some(surface);
    }

    fn pointer_clear_focus(&mut self) {
        self.focus_cleared += 1;
        self.focused_surface = None;
    }

    fn pointer_focused_surface(&self) -> Option<SurfaceId> {
        self.focused_surface
    }

    fn pointer_has_grab(&self) -> bool {
        self.pointer_grab
    }

    fn pointer_end_grab(&mut self) {
        self.grab_ended += 1;
        self.pointer_grab = false;
    }

    fn pointer_notify_motion(&mut self, time_msec: u32, local: Point) {
        self.motions.push((time_msec, local));
    }

    fn pointer_notify_button(&mut self, time_msec: u32, button: u32, state: ButtonState) {
        self.buttons.push((time_msec, button, state));
    }

    fn pointer_notify_frame(&mut self) {
        self.frames += 1;
    }

    fn touch_notify_down(&mut self, surface: SurfaceId, id: i32, _time_msec: u32, local: Point) {
        self.touch_downs.push((surface, id, local));
    }

    fn touch_notify_motion(&mut self, id: i32, _time_msec: u32, local: Point) {
        self.touch_motions.push((id, local));
    }

    fn touch_notify_up(&mut self, id: i32, _time_msec: u32) {
        self.touch_ups.push(id);
    }

    fn touch_notify_frame(&mut self) {
        self.touch_frames += 1;
    }

    fn focus_view(&mut self, view: ViewId, raise: bool) {
        self.view_focuses.push((view, raise));
    }

    fn focus_surface(&mut self, surface: SurfaceId) {
        self.surface_focuses.push(surface);
    }

    fn run_actions(
        &mut self,
        view: Option<ViewId>,
        actions: &[Action],
        _ctx: Option<&CursorContext>,
    ) {
        self.actions.push((view, actions.to_vec()));
    }

    fn adjust_move(&mut self, _view: ViewId, x: &mut i32, y: &mut i32) {
        if let Some((ax, ay)) = self.adjust_move_to {
            *x = ax;
            *y = ay;
        }
    }

    fn adjust_resize(&mut self, _view: ViewId, geo: &mut Rect) {
        if let Some(adjusted) = self.adjust_resize_to {
            *geo = adjusted;
        }
    }

    fn update_decoration_hover(&mut self, node: Option<NodeId>) {
        self.hovered.push(node);
    }

    fn set_cursor_icon(&mut self, icon: CursorIcon) {
        self.icons.push(icon);
    }

    fn next_focusable_view(&self, from: Option<ViewId>, dir: CycleDirection) -> Option<ViewId> {
        if self.switcher_ring.is_empty() {
            return None;
        }
        let len = self.switcher_ring.len();
        let idx = match (from, dir) {
            // Topmost view is already focused, so a fresh forward cycle
            // pre-selects the second view.
            (None, CycleDirection::Forward) => 1 % len,
            (None, CycleDirection::Backward) => len - 1,
            (Some(v), dir) => match self.switcher_ring.iter().position(|x| *x == v) {
                Some(cur) => match dir {
                    CycleDirection::Forward => (cur + 1) % len,
                    CycleDirection::Backward => (cur + len - 1) % len,
                },
                // A destroyed view is no longer in the ring.
                None => match dir {
                    CycleDirection::Forward => 0,
                    CycleDirection::Backward => len - 1,
                },
            },
        };
        Some(self.switcher_ring[idx])
    }

    fn switcher_update(&mut self, selected: Option<ViewId>) {
        self.switcher_updates.push(selected);
    }

    fn switcher_close(&mut self) {
        self.switcher_closed += 1;
    }

    fn open_menu(&mut self, menu: &str, _pos: Point) -> bool {
        self.menu_calls.push(MenuCall::Open(menu.to_string()));
        true
    }

    fn menu_pointer_motion(&mut self, node: NodeId) {
        self.menu_calls.push(MenuCall::Motion(node));
    }

    fn menu_select_next(&mut self) {
        self.menu_calls.push(MenuCall::Next);
    }

    fn menu_select_prev(&mut self) {
        self.menu_calls.push(MenuCall::Prev);
    }

    fn menu_submenu_enter(&mut self) {
        self.menu_calls.push(MenuCall::SubmenuEnter);
    }

    fn menu_submenu_leave(&mut self) {
        self.menu_calls.push(MenuCall::SubmenuLeave);
    }

    fn menu_activate_selected(&mut self) -> bool {
        self.menu_calls.push(MenuCall::Activate);
        self.menu_activate_closes
    }

    fn menu_close_root(&mut self) {
        self.menu_calls.push(MenuCall::CloseRoot);
    }

    fn absolute_to_layout(&self, x: f64, y: f64) -> Point {
        Point::new(
            self.layout.x as f64 + x * self.layout.width as f64,
            self.layout.y as f64 + y * self.layout.height as f64,
        )
    }

    fn layout_bounds(&self) -> Rect {
        self.layout
    }

    fn confine_pointer(
        &self,
        _constraint: ConstraintId,
        _from: Point,
        dx: f64,
        dy: f64,
    ) -> Option<(f64, f64)> {
        match self.confine {
            ConfineBehavior::Passthrough => Some((dx, dy)),
            ConfineBehavior::Adjust(ax, ay) => Some((ax, ay)),
            ConfineBehavior::Block => None,
        }
    }

    fn schedule_keybind_repeat(&mut self, delay_ms: u32) {
        self.repeats_scheduled.push(delay_ms);
    }

    fn cancel_keybind_repeat(&mut self) {
        self.repeats_cancelled += 1;
    }
}
