//! Handles and classification descriptors for scene objects.
//!
//! The compositor owns views, surfaces and scene nodes; this crate only
//! observes them through opaque ids. Whoever hands an id to the seat is
//! responsible for delivering the matching destruction notification
//! (`Seat::handle_view_destroyed` and friends) so held state is cleared
//! before the next event dispatch.

use crate::geo::ResizeEdges;

/// Compositor-side record of one client toplevel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(pub u64);

/// A client-owned drawable region (toplevel content, popup, subsurface).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

/// A node in the compositor's scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// A client-requested pointer constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintId(pub u64);

/// Server-drawn decoration element around a view.
///
/// `Border` is the coarse descriptor attached to border/corner nodes;
/// hit-testing refines it into concrete [`ResizeEdges`] via the view's
/// decoration layout (corner regions depend on exact offsets, not just
/// node containment).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationPart {
    Titlebar,
    CloseButton,
    MaximizeButton,
    IconifyButton,
    WindowMenuButton,
    Border,
}

/// Classification descriptor carried by scene nodes.
///
/// Attached by the compositor when it creates a node; hit-testing walks
/// the ancestor chain to the nearest node carrying one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeDescriptor {
    /// Content surface belonging to a managed view.
    View(ViewId),
    /// A layer-shell surface (panel, wallpaper, ...).
    LayerSurface(SurfaceId),
    /// A subsurface of a layer-shell surface.
    LayerSubsurface(SurfaceId),
    /// An unmanaged override-redirect surface.
    Unmanaged(SurfaceId),
    /// A server-side decoration element of a view.
    Decoration { view: ViewId, part: DecorationPart },
    /// An entry of the open menu.
    MenuItem,
    /// An entry of the window-switcher on-screen display.
    SwitcherItem(ViewId),
    /// The drag-and-drop icon overlay.
    DragIcon,
}

/// Resolved classification of a layout coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitKind {
    /// Nothing at this coordinate (root of the scene).
    Root,
    /// Input-enabled client surface of a managed view.
    Client,
    LayerSurface,
    LayerSubsurface,
    Unmanaged,
    MenuItem,
    SwitcherItem,
    Titlebar,
    CloseButton,
    MaximizeButton,
    IconifyButton,
    WindowMenuButton,
    /// Border or corner, refined to the concrete edge set.
    Border(ResizeEdges),
}

impl HitKind {
    /// Resize edges implied by this classification (empty unless the
    /// cursor is on a border or corner).
    pub fn resize_edges(&self) -> ResizeEdges {
        match self {
            HitKind::Border(edges) => *edges,
            _ => ResizeEdges::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_borders_carry_resize_edges() {
        assert_eq!(HitKind::Titlebar.resize_edges(), ResizeEdges::empty());
        assert_eq!(HitKind::Client.resize_edges(), ResizeEdges::empty());
        let corner = ResizeEdges::TOP | ResizeEdges::LEFT;
        assert_eq!(HitKind::Border(corner).resize_edges(), corner);
    }
}
