//! Interactive move/resize geometry and pacing.

use crate::geo::{MinSize, Point, Rect, ResizeEdges};
use crate::node::ViewId;

/// State of an interactive move or resize, captured when the grab
/// begins and dropped when it ends or the view goes away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrabState {
    pub view: ViewId,
    /// Active edges; empty for a move.
    pub edges: ResizeEdges,
    /// View geometry when the grab began.
    pub origin_box: Rect,
    /// Cursor position when the grab began.
    pub origin_cursor: Point,
}

/// Target position for a move: grab-origin box shifted by the cursor
/// delta. Snapping may still override it.
pub(crate) fn move_position(grab: &GrabState, cursor: Point) -> (i32, i32) {
    let x = grab.origin_box.x + (cursor.x - grab.origin_cursor.x) as i32;
    let y = grab.origin_box.y + (cursor.y - grab.origin_cursor.y) as i32;
    (x, y)
}

/// Target box for a resize. Leading edges (top/left) shift the position
/// so the opposite edge stays anchored; both axes are independent.
pub(crate) fn resize_box(grab: &GrabState, current: Rect, cursor: Point) -> Rect {
    let dx = (cursor.x - grab.origin_cursor.x) as i32;
    let dy = (cursor.y - grab.origin_cursor.y) as i32;
    let mut geo = current;

    if grab.edges.contains(ResizeEdges::TOP) {
        geo.y = grab.origin_box.y + dy;
        geo.height = grab.origin_box.height - dy;
    } else if grab.edges.contains(ResizeEdges::BOTTOM) {
        geo.height = grab.origin_box.height + dy;
    }

    if grab.edges.contains(ResizeEdges::LEFT) {
        geo.x = grab.origin_box.x + dx;
        geo.width = grab.origin_box.width - dx;
    } else if grab.edges.contains(ResizeEdges::RIGHT) {
        geo.width = grab.origin_box.width + dx;
    }

    geo
}

/// Clamp a resize target to the view's minimum size, then re-derive the
/// position for leading edges so the trailing edge never moves.
pub(crate) fn clamp_and_anchor(grab: &GrabState, mut geo: Rect, min: MinSize) -> Rect {
    geo.width = geo.width.max(min.width);
    geo.height = geo.height.max(min.height);

    if grab.edges.contains(ResizeEdges::TOP) {
        geo.y = grab.origin_box.y + grab.origin_box.height - geo.height;
    }
    if grab.edges.contains(ResizeEdges::LEFT) {
        geo.x = grab.origin_box.x + grab.origin_box.width - geo.width;
    }
    geo
}

/// Drops resize commits that arrive faster than the output can present
/// them. Excess events are discarded, never queued.
#[derive(Debug, Default)]
pub(crate) struct ResizeThrottle {
    last_time_msec: u32,
    last_view: Option<ViewId>,
}

impl ResizeThrottle {
    /// Whether a resize at `time_msec` may commit. `refresh_mhz` is the
    /// output refresh rate in mHz, `0` when unknown.
    pub(crate) fn should_commit(
        &mut self,
        view: ViewId,
        time_msec: u32,
        refresh_mhz: i32,
        fallback_hz: u32,
    ) -> bool {
        if self.last_view == Some(view) {
            let refresh = if refresh_mhz > 0 { refresh_mhz as u32 } else { fallback_hz * 1000 };
            // Timestamp wraparound is not observable at these intervals.
            if time_msec.wrapping_sub(self.last_time_msec) < 1_000_000 / refresh {
                return false;
            }
        }
        self.last_time_msec = time_msec;
        self.last_view = Some(view);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grab(edges: ResizeEdges) -> GrabState {
        GrabState {
            view: ViewId(1),
            edges,
            origin_box: Rect::new(100, 100, 200, 150),
            origin_cursor: Point::new(300.0, 250.0),
        }
    }

    #[test]
    fn test_move_follows_cursor_delta() {
        let g = grab(ResizeEdges::empty());
        assert_eq!(move_position(&g, Point::new(310.0, 230.0)), (110, 80));
        assert_eq!(move_position(&g, Point::new(300.0, 250.0)), (100, 100));
    }

    #[test]
    fn test_top_left_resize_anchors_bottom_right() {
        let g = grab(ResizeEdges::TOP | ResizeEdges::LEFT);
        let geo = resize_box(&g, g.origin_box, Point::new(280.0, 240.0));
        assert_eq!(geo, Rect::new(80, 90, 220, 160));
        // Bottom-right corner stays at (300, 250).
        assert_eq!(geo.x + geo.width, 300);
        assert_eq!(geo.y + geo.height, 250);
    }

    #[test]
    fn test_bottom_right_resize_keeps_position() {
        let g = grab(ResizeEdges::BOTTOM | ResizeEdges::RIGHT);
        let geo = resize_box(&g, g.origin_box, Point::new(330.0, 270.0));
        assert_eq!(geo, Rect::new(100, 100, 230, 170));
    }

    #[test]
    fn test_single_edge_resize_leaves_other_axis() {
        let g = grab(ResizeEdges::RIGHT);
        let geo = resize_box(&g, g.origin_box, Point::new(250.0, 500.0));
        assert_eq!(geo, Rect::new(100, 100, 150, 150));
    }

    #[test]
    fn test_clamp_reanchors_leading_edges() {
        let g = grab(ResizeEdges::TOP | ResizeEdges::LEFT);
        // Shrink far below the minimum.
        let geo = resize_box(&g, g.origin_box, Point::new(600.0, 600.0));
        let clamped = clamp_and_anchor(&g, geo, MinSize { width: 50, height: 40 });
        assert_eq!(clamped.width, 50);
        assert_eq!(clamped.height, 40);
        // Trailing edges still at (300, 250).
        assert_eq!(clamped.x + clamped.width, 300);
        assert_eq!(clamped.y + clamped.height, 250);
    }

    #[test]
    fn test_clamp_no_reanchor_for_trailing_edges() {
        let g = grab(ResizeEdges::BOTTOM | ResizeEdges::RIGHT);
        let geo = resize_box(&g, g.origin_box, Point::new(0.0, 0.0));
        let clamped = clamp_and_anchor(&g, geo, MinSize { width: 50, height: 40 });
        assert_eq!(clamped, Rect::new(100, 100, 50, 40));
    }

    #[test]
    fn test_throttle_drops_fast_commits() {
        let mut t = ResizeThrottle::default();
        let view = ViewId(1);
        // 60 Hz output: one commit per ~16 ms.
        assert!(t.should_commit(view, 1000, 60_000, 250));
        assert!(!t.should_commit(view, 1005, 60_000, 250));
        assert!(!t.should_commit(view, 1015, 60_000, 250));
        assert!(t.should_commit(view, 1017, 60_000, 250));
    }

    #[test]
    fn test_throttle_fallback_cap() {
        let mut t = ResizeThrottle::default();
        let view = ViewId(1);
        // Unknown refresh: capped at 250 Hz (4 ms).
        assert!(t.should_commit(view, 1000, 0, 250));
        assert!(!t.should_commit(view, 1003, 0, 250));
        assert!(t.should_commit(view, 1004, 0, 250));
    }

    #[test]
    fn test_throttle_resets_on_view_change() {
        let mut t = ResizeThrottle::default();
        assert!(t.should_commit(ViewId(1), 1000, 60_000, 250));
        assert!(t.should_commit(ViewId(2), 1001, 60_000, 250));
    }
}
