//! Tablet tool input, normalized onto the pointer pipeline.
//!
//! Tool positions go through device-area remapping, rotation and (in
//! relative mode) a sensitivity factor, then drive the same synthetic
//! pointer path as touch emulation, so bind matching and click
//! disambiguation behave identically for a stylus and a mouse. Tool
//! buttons are remapped through the configured button map; unmapped
//! buttons are dropped.

use tracing::{debug, warn};

use crate::compositor::Compositor;
use crate::config::{TabletMotion, TabletRotation};
use crate::keys::ButtonState;
use crate::seat::Seat;

/// Per-tool state: last reported device-normalized position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct TabletTool {
    x: f64,
    y: f64,
    /// Transformed position of the previous axis event, for relative
    /// motion deltas.
    prev: Option<(f64, f64)>,
}

impl Seat {
    /// A tool came into proximity (or its device was added).
    pub fn handle_tablet_tool_added(&mut self, tool: u64) {
        self.tablet_tools.insert(tool, TabletTool::default());
    }

    pub fn handle_tablet_tool_removed(&mut self, tool: u64) {
        self.tablet_tools.remove(&tool);
    }

    /// Position update for a tool. `x`/`y` are device-normalized
    /// `[0, 1]`; either may be absent when only one axis changed.
    pub fn handle_tablet_tool_axis<C: Compositor>(
        &mut self,
        comp: &mut C,
        tool: u64,
        x: Option<f64>,
        y: Option<f64>,
        time_msec: u32,
    ) {
        let Some(state) = self.tablet_tools.get_mut(&tool) else {
            warn!("axis event for unknown tablet tool {tool}, dropping");
            return;
        };
        if x.is_none() && y.is_none() {
            return;
        }
        if let Some(x) = x {
            state.x = x;
        }
        if let Some(y) = y {
            state.y = y;
        }

        let pos = transform_tool_position(
            state.x,
            state.y,
            self.settings.tablet.area,
            self.settings.tablet.rotation,
        );
        let prev = state.prev.replace(pos);

        match self.settings.tablet.motion {
            TabletMotion::Absolute => {
                self.emulate_move_absolute(comp, pos.0, pos.1, time_msec);
            }
            TabletMotion::Relative => {
                let Some(prev) = prev else { return };
                let from = comp.absolute_to_layout(prev.0, prev.1);
                let to = comp.absolute_to_layout(pos.0, pos.1);
                let factor = self.settings.tablet.relative_motion_sensitivity;
                self.emulate_move(comp, (to.x - from.x) * factor, (to.y - from.y) * factor, time_msec);
            }
        }
    }

    /// The tool tip touched or left the tablet surface.
    pub fn handle_tablet_tool_tip<C: Compositor>(
        &mut self,
        comp: &mut C,
        tool: u64,
        state: ButtonState,
        time_msec: u32,
    ) {
        if !self.tablet_tools.contains_key(&tool) {
            warn!("tip event for unknown tablet tool {tool}, dropping");
            return;
        }
        let Some(button) = self.mapped_tablet_button(crate::keys::button::TOOL_PEN) else {
            return;
        };
        self.emulate_button(comp, button, state, time_msec);
    }

    pub fn handle_tablet_tool_button<C: Compositor>(
        &mut self,
        comp: &mut C,
        tool: u64,
        src_button: u32,
        state: ButtonState,
        time_msec: u32,
    ) {
        if !self.tablet_tools.contains_key(&tool) {
            warn!("button event for unknown tablet tool {tool}, dropping");
            return;
        }
        let Some(button) = self.mapped_tablet_button(src_button) else {
            return;
        };
        self.emulate_button(comp, button, state, time_msec);
    }

    fn mapped_tablet_button(&self, src_button: u32) -> Option<u32> {
        match self.settings.tablet.button_map.iter().find(|(from, _)| *from == src_button) {
            Some((_, to)) => Some(*to),
            None => {
                debug!("no button map target for {src_button:#x}");
                None
            }
        }
    }
}

/// Apply the configured active-area remap, then rotate within the unit
/// square.
fn transform_tool_position(
    x: f64,
    y: f64,
    area: Option<(f64, f64, f64, f64)>,
    rotation: TabletRotation,
) -> (f64, f64) {
    let (mut tx, mut ty) = (x, y);
    if let Some((ax, ay, aw, ah)) = area {
        if aw > 0.0 && ah > 0.0 {
            tx = ((tx - ax) / aw).clamp(0.0, 1.0);
            ty = ((ty - ay) / ah).clamp(0.0, 1.0);
        }
    }
    match rotation {
        TabletRotation::Deg0 => (tx, ty),
        TabletRotation::Deg90 => (1.0 - ty, tx),
        TabletRotation::Deg180 => (1.0 - tx, 1.0 - ty),
        TabletRotation::Deg270 => (ty, 1.0 - tx),
    }
}
