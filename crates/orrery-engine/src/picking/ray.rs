//! Rays and the intersectable primitives derived from a body's drawable.
//!
//! Primitives are registered in the drawable's local space and moved into
//! world space with the owning body's matrix at pick time.

use glam::{Mat4, Vec3};
use crate::api::types::BodyId;

/// Epsilon for parallel-ray and self-intersection rejection.
const RAY_EPSILON: f32 = 1e-6;

/// A half-line `origin + t * dir`, `t >= 0`. `dir` is unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }

    /// Nearest non-negative intersection with a sphere.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.dir);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sqrt_disc = disc.sqrt();
        let near = -b - sqrt_disc;
        if near >= 0.0 {
            return Some(near);
        }
        // Origin inside the sphere
        let far = -b + sqrt_disc;
        (far >= 0.0).then_some(far)
    }

    /// Möller–Trumbore ray/triangle test. Both faces count as hits.
    pub fn intersect_triangle(&self, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
        let edge1 = b - a;
        let edge2 = c - a;
        let p = self.dir.cross(edge2);
        let det = edge1.dot(p);
        if det.abs() < RAY_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        let s = self.origin - a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(edge1);
        let v = self.dir.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = edge2.dot(q) * inv_det;
        (t > RAY_EPSILON).then_some(t)
    }
}

/// Intersectable shape in drawable-local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimitiveShape {
    Sphere { center: Vec3, radius: f32 },
    Triangle { a: Vec3, b: Vec3, c: Vec3 },
}

impl PrimitiveShape {
    /// Unit sphere at the drawable origin; scaled by the body's transform.
    pub fn unit_sphere() -> Self {
        PrimitiveShape::Sphere {
            center: Vec3::ZERO,
            radius: 1.0,
        }
    }

    /// Bounding sphere of the given radius at the drawable origin.
    pub fn bounding_sphere(radius: f32) -> Self {
        PrimitiveShape::Sphere {
            center: Vec3::ZERO,
            radius,
        }
    }

    /// Build triangles from a flat `[ax, ay, az, bx, by, bz, cx, cy, cz, ...]`
    /// array. Trailing floats that do not form a whole triangle are ignored.
    pub fn triangles_from_flat(floats: &[f32]) -> Vec<Self> {
        floats
            .chunks_exact(9)
            .map(|t| PrimitiveShape::Triangle {
                a: Vec3::new(t[0], t[1], t[2]),
                b: Vec3::new(t[3], t[4], t[5]),
                c: Vec3::new(t[6], t[7], t[8]),
            })
            .collect()
    }

    /// Intersect after moving the shape into world space with `world`.
    pub fn intersect(&self, ray: &Ray, world: &Mat4) -> Option<f32> {
        match *self {
            PrimitiveShape::Sphere { center, radius } => {
                let (scale, _, _) = world.to_scale_rotation_translation();
                let max_scale = scale.abs().max_element();
                ray.intersect_sphere(world.transform_point3(center), radius * max_scale)
            }
            PrimitiveShape::Triangle { a, b, c } => ray.intersect_triangle(
                world.transform_point3(a),
                world.transform_point3(b),
                world.transform_point3(c),
            ),
        }
    }
}

/// A primitive tagged with its owning body when the drawable is attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaggedPrimitive {
    pub body: BodyId,
    pub shape: PrimitiveShape,
}
