//! # Borealis Input Core
//!
//! The input-interaction core of the Borealis Wayland compositor: it
//! turns normalized pointer, keyboard, touch and tablet events into
//! client-visible input delivery, compositor window actions (focus,
//! raise, move, resize, menus, window switching) and the interactive
//! move/resize/menu modal sessions.
//!
//! The crate owns no scene objects. Rendering, scene construction,
//! configuration parsing and output layout belong to the embedding
//! compositor, which implements [`compositor::Compositor`] and drives a
//! [`seat::Seat`] from its event loop. Scene objects are referenced by
//! opaque ids; the embedder must forward destruction notifications so
//! the seat can drop its own state before the next dispatch.
//!
//! Everything here is single-threaded: one event callback runs to
//! completion before the next is dispatched, and the only deferred work
//! is the keybind auto-repeat timer owned by the event loop.

mod binds;
pub mod compositor;
pub mod config;
pub mod cursor;
pub mod cycle;
pub mod double_click;
pub mod error;
pub mod geo;
pub mod interactive;
pub mod key_state;
pub mod keyboard;
pub mod keys;
pub mod node;
pub mod seat;
pub mod tablet;
pub mod touch;

#[cfg(test)]
pub(crate) mod test_util;

pub use compositor::{Compositor, CursorIcon, NodeAt};
pub use config::{
    Action, BindContext, BindTable, InputSettings, Keybind, MouseEventKind, MouseTrigger,
    Mousebind, ScrollDirection, TabletMotion, TabletRotation, TabletSettings,
};
pub use cursor::{AxisEvent, AxisOrientation};
pub use cycle::CycleDirection;
pub use error::BindError;
pub use geo::{MinSize, Point, Rect, ResizeEdges};
pub use hit_test::CursorContext;
pub use interactive::GrabState;
pub use keyboard::{KeyDisposition, KeyInput};
pub use keys::{ButtonState, Keycode, Keysym, Modifiers};
pub use node::{ConstraintId, DecorationPart, HitKind, NodeDescriptor, NodeId, SurfaceId, ViewId};
pub use seat::{ConstraintKind, InputMode, Seat};
