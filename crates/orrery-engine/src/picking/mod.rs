//! Pointer picking: pointer → ray → nearest tagged primitive → owning body.

pub mod ray;
pub mod selection;

pub use ray::{PrimitiveShape, Ray, TaggedPrimitive};
pub use selection::{SelectionChange, SelectionController, DEFAULT_HIGHLIGHT_SCALE};

use glam::{Mat4, Vec2};
use crate::api::types::BodyId;
use crate::core::registry::BodyRegistry;
use crate::renderer::camera::{Camera3D, Viewport};

/// A resolved pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub body: BodyId,
    /// Ray parameter of the intersection (distance from the camera).
    pub distance: f32,
}

/// Nearest intersection of `ray` with `candidates`, each moved into world
/// space by its owning body's current transform. Primitives of bodies without
/// an attached drawable are skipped.
pub fn nearest_hit(
    ray: &Ray,
    candidates: &[TaggedPrimitive],
    registry: &BodyRegistry,
) -> Option<PickHit> {
    // One matrix per body, not per primitive.
    let matrices: Vec<Option<Mat4>> = registry
        .iter()
        .map(|b| b.is_loaded().then(|| b.transform.matrix()))
        .collect();

    let mut best: Option<PickHit> = None;
    for prim in candidates {
        let Some(Some(world)) = matrices.get(prim.body.index()) else {
            continue;
        };
        if let Some(t) = prim.shape.intersect(ray, world) {
            if best.map_or(true, |b| t < b.distance) {
                best = Some(PickHit { body: prim.body, distance: t });
            }
        }
    }
    best
}

/// Resolve the body under a pointer position, if any.
pub fn pick(
    pointer: Vec2,
    viewport: &Viewport,
    camera: &Camera3D,
    registry: &BodyRegistry,
) -> Option<BodyId> {
    let ray = camera.ray_from_pointer(pointer, viewport);
    nearest_hit(&ray, registry.primitives(), registry).map(|hit| hit.body)
}
