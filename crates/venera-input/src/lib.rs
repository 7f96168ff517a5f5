//! Frame-coherent input state for the walk loop.
//!
//! Winit keyboard and mouse events are accumulated during a frame and
//! queried once per tick; transients are cleared after all systems have run.
//! Physical key codes are used throughout so WASD walking works identically
//! regardless of keyboard layout.

mod bindings;
mod keyboard;
mod mouse;
mod regions;

pub use bindings::{MotionBindings, MotionIntent};
pub use keyboard::{KeyboardState, RawKeyEvent};
pub use mouse::MouseState;
pub use regions::{DragTarget, minimap_rect, route_drag};
