use glam::{DVec3, Mat4, Quat, Vec3};
use crate::api::types::{BodyId, DrawableHandle};
use crate::assets::manifest::BodyDesc;

/// World-space transform of a body, recomputed every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyTransform {
    /// World position. Composed in f64, narrowed when packed for rendering.
    pub translation: DVec3,
    /// Accumulated self-rotation about the local Y axis, radians in [0, 2π).
    pub spin: f64,
    /// Static axial tilt about the local Z axis, radians.
    pub tilt: f64,
    /// Visual scale of the drawable.
    pub scale: Vec3,
}

impl Default for BodyTransform {
    fn default() -> Self {
        Self {
            translation: DVec3::ZERO,
            spin: 0.0,
            tilt: 0.0,
            scale: Vec3::ONE,
        }
    }
}

impl BodyTransform {
    /// Spin applied after tilt: R = Ry(spin) · Rz(tilt).
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.spin as f32) * Quat::from_rotation_z(self.tilt as f32)
    }

    /// Local-to-world matrix of the drawable.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            self.rotation(),
            self.translation.as_vec3(),
        )
    }
}

/// A celestial body: static parameters plus live per-tick state.
#[derive(Debug, Clone)]
pub struct Body {
    /// Dense identifier (insertion index).
    pub id: BodyId,
    /// Static parameters from the manifest.
    pub desc: BodyDesc,
    /// Parent body, resolved from `desc.parent` at registry construction.
    pub parent: Option<BodyId>,
    /// Current world transform.
    pub transform: BodyTransform,
    /// Drawable attached once the asset load completes.
    pub drawable: Option<DrawableHandle>,
    /// Scale saved before the first highlight, restored on deselect.
    pub rest_scale: Option<Vec3>,
}

impl Body {
    /// Create a body from its description. Tilt is converted from degrees here.
    pub fn new(id: BodyId, desc: BodyDesc) -> Self {
        let transform = BodyTransform {
            tilt: desc.axial_tilt.to_radians(),
            scale: Vec3::splat(desc.model_scale),
            ..Default::default()
        };
        Self {
            id,
            desc,
            parent: None,
            transform,
            drawable: None,
            rest_scale: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.desc.name
    }

    /// Whether a drawable is attached (only then is the body rendered and pickable).
    pub fn is_loaded(&self) -> bool {
        self.drawable.is_some()
    }

    pub fn with_parent(mut self, parent: BodyId) -> Self {
        self.parent = Some(parent);
        self
    }
}
