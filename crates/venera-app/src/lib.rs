//! Application shell: frame loop driver, vehicle placement, and window glue.

mod cameras;
mod frame;
mod vehicle;
mod window;

pub use cameras::{ChaseView, chase_camera, heading_light_direction, minimap_camera, nadir_camera};
pub use frame::{FrameDriver, GlobeCapture, Phase, SimState, TickOutcome};
pub use vehicle::VehicleTransform;
pub use window::{App, AppError, run};
