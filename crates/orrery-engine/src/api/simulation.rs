use glam::{DVec3, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::api::types::BodyId;
use crate::assets::manifest::SystemManifest;
use crate::core::clock::SimulationClock;
use crate::core::hierarchy::HierarchyComposer;
use crate::core::orbit;
use crate::core::registry::BodyRegistry;
use crate::error::{OrreryError, OrreryResult};
use crate::picking::{self, SelectionChange, SelectionController, DEFAULT_HIGHLIGHT_SCALE};
use crate::renderer::camera::{Camera3D, Viewport};
use crate::renderer::instance::{FrameBuffer, OrbitRing, TransformInstance};
use crate::renderer::traits::UiSink;

/// Simulation settings, read from the `config` section of the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulation time added per tick (default: 0.01).
    pub time_step: f64,
    /// Scale multiplier applied to the selected body (default: 1.05).
    pub highlight_scale: f32,
    /// Line segments per orbit path (default: 128).
    pub orbit_segments: usize,
    /// Initial camera pose and lens.
    pub camera: Camera3D,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step: 0.01,
            highlight_scale: DEFAULT_HIGHLIGHT_SCALE,
            orbit_segments: 128,
            camera: Camera3D::default(),
        }
    }
}

impl SimulationConfig {
    /// Reject settings that would stall or reverse the clock, collapse the
    /// highlight, or leave the camera without a usable frustum.
    pub fn validate(&self) -> OrreryResult<()> {
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(invalid("time_step", "must be positive and finite"));
        }
        if !(self.highlight_scale.is_finite() && self.highlight_scale > 0.0) {
            return Err(invalid("highlight_scale", "must be positive and finite"));
        }
        let camera = &self.camera;
        if !(camera.fov_y_degrees > 0.0 && camera.fov_y_degrees < 180.0) {
            return Err(invalid("camera.fov_y_degrees", "must be in (0, 180)"));
        }
        if !(camera.near.is_finite() && camera.near > 0.0) {
            return Err(invalid("camera.near", "must be positive and finite"));
        }
        if !(camera.far.is_finite() && camera.far > camera.near) {
            return Err(invalid("camera.far", "must be finite and beyond near"));
        }
        if !(camera.eye.is_finite() && camera.target.is_finite()) {
            return Err(invalid("camera", "pose must be finite"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> OrreryError {
    OrreryError::InvalidParameter {
        body: "config".to_string(),
        field,
        reason,
    }
}

/// All mutable simulation state, owned by the runner.
pub struct SimulationState {
    pub config: SimulationConfig,
    pub clock: SimulationClock,
    pub registry: BodyRegistry,
    pub composer: HierarchyComposer,
    pub selection: SelectionController,
    pub camera: Camera3D,
    pub viewport: Viewport,
}

impl SimulationState {
    /// Validate the manifest, build the registry and processing order, and
    /// compose every body at t = 0.
    pub fn from_manifest(manifest: &SystemManifest) -> OrreryResult<Self> {
        let registry = BodyRegistry::from_manifest(manifest)?;
        let composer = HierarchyComposer::build(&registry)?;
        let config = manifest.config.clone();

        let mut state = Self {
            clock: SimulationClock::new(config.time_step),
            selection: SelectionController::new(config.highlight_scale),
            camera: config.camera,
            viewport: Viewport::default(),
            registry,
            composer,
            config,
        };
        state.composer.compose_all(&mut state.registry, 0.0);
        Ok(state)
    }

    /// Advance one fixed step: spin and compose every body at the new time.
    pub fn advance(&mut self) -> f64 {
        let time = self.clock.advance();
        self.composer.tick(&mut self.registry, time);
        time
    }

    /// The body under a pointer position, if any.
    pub fn pick(&self, x: f32, y: f32) -> Option<BodyId> {
        picking::pick(Vec2::new(x, y), &self.viewport, &self.camera, &self.registry)
    }

    /// Pick under the pointer and apply the result to the selection.
    pub fn click(&mut self, x: f32, y: f32, ui: &mut dyn UiSink) -> SelectionChange {
        let hit = self.pick(x, y);
        self.selection.apply(hit, &mut self.registry, ui)
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
    }

    pub fn set_camera(&mut self, eye: Vec3, target: Vec3) {
        self.camera.set_pose(eye, target);
    }

    /// Orbit center of a body: its parent's world position, or the origin.
    pub fn orbit_center(&self, id: BodyId) -> DVec3 {
        self.registry
            .get(id)
            .and_then(|b| b.parent)
            .and_then(|p| self.registry.get(p))
            .map(|p| p.transform.translation)
            .unwrap_or(DVec3::ZERO)
    }

    /// Orbit path of a body as world-space points (closed loop).
    /// Empty for a body that does not orbit.
    pub fn orbit_path(&self, id: BodyId) -> Vec<Vec3> {
        let Some(body) = self.registry.get(id) else {
            return Vec::new();
        };
        if body.desc.orbit_radius <= 0.0 {
            return Vec::new();
        }
        let center = self.orbit_center(id);
        orbit::circular_path(body.desc.orbit_radius, self.config.orbit_segments)
            .into_iter()
            .map(|(x, z)| (center + DVec3::new(x, 0.0, z)).as_vec3())
            .collect()
    }

    /// Pack transforms for loaded bodies and orbit rings for orbiting bodies.
    pub fn build_frame(&self, frame: &mut FrameBuffer) {
        frame.clear();
        for body in self.registry.iter() {
            if let Some(instance) = TransformInstance::from_body(body) {
                frame.transforms.push(instance);
            }
            if body.desc.orbit_radius > 0.0 {
                let center = self.orbit_center(body.id).as_vec3();
                frame.orbit_rings.push(OrbitRing {
                    cx: center.x,
                    cy: center.y,
                    cz: center.z,
                    radius: body.desc.orbit_radius as f32,
                });
            }
        }
    }
}
