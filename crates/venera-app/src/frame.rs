//! The frame loop driver: one strictly ordered tick per redraw.
//!
//! Tick order is the correctness core of the whole system: input is
//! integrated, the rigs are synchronized, the globe is captured and the
//! height field rebuilt, and only then are the mesh and vehicle allowed to
//! consume it. Consuming a stale field for either is a visible bug (terrain
//! lagging the camera, vehicle floating above the ground).

use tracing::warn;
use venera_config::Config;
use venera_height::{HeightField, height_multiplier};
use venera_input::{DragTarget, MotionIntent};
use venera_mesh::TerrainMesh;
use venera_motion::{AxisInput, MotionState};
use venera_render::CaptureError;
use venera_rig::{
    DragDelta, HeadingFrame, MinimapOrbit, OrbitRig, RigError, TerrainPivot, apply_main_drag,
    apply_minimap_drag, sync_rigs,
};

use crate::vehicle::VehicleTransform;

/// The capture half of a height refresh, implemented by the render host.
///
/// Renders the globe from the nadir camera implied by the rig's current
/// orientation and returns the tightly packed RGBA readback. The stub
/// implementations in tests stand in for the GPU.
pub trait GlobeCapture {
    fn capture(&mut self, rig: &OrbitRig) -> Result<Vec<u8>, CaptureError>;
}

/// Loop phase: waiting on collaborators, or running every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Assets or GPU still pending; ticks are no-ops.
    Loading,
    /// The per-frame loop is live. There is no terminal phase: the loop
    /// runs until the process ends.
    Running,
}

/// What a tick did, so the host knows which GPU uploads are needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// The field, mesh, and vehicle were refreshed from a new capture. False
    /// means the capture failed and all three keep last frame's consistent
    /// snapshot; the next tick recaptures.
    pub field_refreshed: bool,
}

/// All simulation state, owned and threaded explicitly through the driver.
pub struct SimState {
    pub motion: MotionState,
    pub rig: OrbitRig,
    pub heading: HeadingFrame,
    pub terrain_pivot: TerrainPivot,
    pub minimap_orbit: MinimapOrbit,
    pub field: HeightField,
    pub terrain: TerrainMesh,
    pub vehicle: VehicleTransform,
}

impl SimState {
    /// Build the resting state from configuration.
    pub fn new(config: &Config) -> Result<Self, RigError> {
        let rig = OrbitRig::from_rest_transform(
            glam::Vec3::ZERO,
            glam::Vec3::new(0.0, 0.0, -config.globe.camera_altitude_radii),
            glam::Vec3::Y,
        )?;

        let multiplier = height_multiplier(&config.globe, config.terrain.plane_scale);
        Ok(Self {
            motion: MotionState::new(&config.motion),
            rig,
            heading: HeadingFrame::default(),
            terrain_pivot: TerrainPivot::default(),
            minimap_orbit: MinimapOrbit::default(),
            field: HeightField::new(config.terrain.detail, config.terrain.plane_scale, multiplier),
            terrain: TerrainMesh::new(config.terrain.detail, config.terrain.plane_scale),
            vehicle: VehicleTransform::new(config.terrain.vehicle_clearance),
        })
    }
}

/// Orchestrates the per-frame ordering over an owned [`SimState`].
pub struct FrameDriver {
    phase: Phase,
    frame_count: u64,
}

impl FrameDriver {
    /// A driver still waiting on its collaborators.
    pub fn new() -> Self {
        Self {
            phase: Phase::Loading,
            frame_count: 0,
        }
    }

    /// Enter the running phase once assets and GPU are live.
    pub fn start_running(&mut self) {
        self.phase = Phase::Running;
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Frames ticked since entering the running phase.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Run one tick: drags, then input integration, then rig sync, then
    /// capture and field rebuild, then mesh deform and vehicle placement.
    /// Rendering is the host's half and happens after this returns, reading
    /// the state this tick produced.
    pub fn tick(
        &mut self,
        sim: &mut SimState,
        intent: MotionIntent,
        drag: Option<(DragTarget, DragDelta)>,
        capture: &mut impl GlobeCapture,
    ) -> TickOutcome {
        if self.phase != Phase::Running {
            return TickOutcome {
                field_refreshed: false,
            };
        }
        self.frame_count += 1;

        // One-off pointer rotations, routed by screen region.
        if let Some((target, delta)) = drag {
            match target {
                DragTarget::MainView => {
                    apply_main_drag(&mut sim.rig, &mut sim.heading, &mut sim.terrain_pivot, delta);
                }
                DragTarget::Minimap => apply_minimap_drag(&mut sim.minimap_orbit, delta),
            }
        }

        // Discrete keys to smoothed velocities.
        sim.motion.tick(
            AxisInput {
                positive: intent.walk_forward,
                negative: intent.walk_back,
            },
            AxisInput {
                positive: intent.turn_left,
                negative: intent.turn_right,
            },
        );

        // Both rigs move in lockstep from the same velocities.
        sync_rigs(
            &mut sim.rig,
            &mut sim.heading,
            sim.motion.walk_speed(),
            sim.motion.turn_speed(),
        );

        // Capture the globe under the freshly synced rig, then let the mesh
        // and vehicle consume the new field, never a stale one. On capture
        // failure everything keeps last frame's consistent snapshot and the
        // next tick simply recaptures.
        match capture.capture(&sim.rig) {
            Ok(rgba) => match sim.field.update_from_rgba(&rgba) {
                Ok(()) => {
                    sim.terrain.apply_height_field(&sim.field);
                    sim.vehicle.update_elevation(&sim.field);
                    TickOutcome {
                        field_refreshed: true,
                    }
                }
                Err(e) => {
                    warn!("height field rejected capture: {e}");
                    TickOutcome {
                        field_refreshed: false,
                    }
                }
            },
            Err(e) => {
                warn!("globe capture failed, retrying next frame: {e}");
                TickOutcome {
                    field_refreshed: false,
                }
            }
        }
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}
