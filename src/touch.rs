//! Touch input: per-contact tracking with pointer-emulation fallback.
//!
//! Each contact captures its layout-to-surface offset at touch-down so
//! later motion reports stable surface-local coordinates without
//! re-hit-testing every move. Contacts that land where no surface
//! accepts touch drive the synthetic pointer path instead.

use tracing::debug;

use crate::compositor::Compositor;
use crate::geo::Point;
use crate::keys::{button, ButtonState};
use crate::seat::Seat;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum TouchPoint {
    /// Delivered as real touch; offset maps layout to surface-local.
    Delivered { offset: (f64, f64) },
    /// No touch-capable surface at down time: emulating a pointer.
    Emulated,
}

impl Seat {
    /// A contact went down at absolute `[0, 1]` device coordinates.
    pub fn handle_touch_down<C: Compositor>(
        &mut self,
        comp: &mut C,
        id: i32,
        x: f64,
        y: f64,
        time_msec: u32,
    ) {
        let pos = comp.absolute_to_layout(x, y);
        let hit = comp.node_at(pos);
        let surface = hit
            .and_then(|h| comp.surface_from_node(h.node))
            .filter(|s| comp.surface_accepts_touch(*s));

        match (surface, hit) {
            (Some(surface), Some(hit)) => {
                let offset = (pos.x - hit.local.x, pos.y - hit.local.y);
                self.touch_points.insert(id, TouchPoint::Delivered { offset });
                comp.touch_notify_down(surface, id, time_msec, hit.local);
            }
            _ => {
                self.touch_points.insert(id, TouchPoint::Emulated);
                self.emulate_move_absolute(comp, x, y, time_msec);
                self.emulate_button(comp, button::LEFT, ButtonState::Pressed, time_msec);
            }
        }
    }

    pub fn handle_touch_motion<C: Compositor>(
        &mut self,
        comp: &mut C,
        id: i32,
        x: f64,
        y: f64,
        time_msec: u32,
    ) {
        let Some(point) = self.touch_points.get(&id).copied() else {
            debug!("motion for unknown touch point {id}");
            return;
        };
        match point {
            TouchPoint::Delivered { offset } => {
                let pos = comp.absolute_to_layout(x, y);
                comp.touch_notify_motion(id, time_msec, Point::new(pos.x - offset.0, pos.y - offset.1));
            }
            TouchPoint::Emulated => self.emulate_move_absolute(comp, x, y, time_msec),
        }
    }

    pub fn handle_touch_up<C: Compositor>(&mut self, comp: &mut C, id: i32, time_msec: u32) {
        match self.touch_points.remove(&id) {
            Some(TouchPoint::Delivered { .. }) => comp.touch_notify_up(id, time_msec),
            Some(TouchPoint::Emulated) => {
                self.emulate_button(comp, button::LEFT, ButtonState::Released, time_msec);
            }
            None => debug!("up for unknown touch point {id}"),
        }
    }

    pub fn handle_touch_frame<C: Compositor>(&mut self, comp: &mut C) {
        comp.touch_notify_frame();
    }
}
