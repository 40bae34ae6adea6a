use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use crate::picking::ray::Ray;

/// Squared cross-product length below which view direction and up are parallel.
const PARALLEL_EPSILON: f32 = 1e-10;

/// Viewport size in pixels, updated from host resize events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width / height. Degenerate viewports report 1.0.
    pub fn aspect(&self) -> f32 {
        if self.width > 0.0 && self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Pointer pixel coordinates (origin top-left, Y down) to normalized
    /// device coordinates (origin center, Y up, range [-1, 1]).
    pub fn to_ndc(&self, pointer: Vec2) -> Vec2 {
        let w = self.width.max(1.0);
        let h = self.height.max(1.0);
        Vec2::new((pointer.x / w) * 2.0 - 1.0, -(pointer.y / h) * 2.0 + 1.0)
    }

    /// Inverse of [`Viewport::to_ndc`].
    pub fn from_ndc(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.width,
            (1.0 - ndc.y) * 0.5 * self.height,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Perspective camera pose and lens.
/// The pose is driven by the host's camera controls; the core only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera3D {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// World up direction.
    #[serde(default = "default_up")]
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
}

fn default_up() -> Vec3 {
    Vec3::Y
}

impl Default for Camera3D {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 15_000.0, 30_000.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 100_000.0,
        }
    }
}

impl Camera3D {
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        Self {
            eye,
            target,
            ..Default::default()
        }
    }

    /// Move the camera (e.g. after the host's orbit controls update).
    pub fn set_pose(&mut self, eye: Vec3, target: Vec3) {
        self.eye = eye;
        self.target = target;
    }

    /// Up axis actually used for the view. Looking straight along `up`
    /// leaves no screen plane, so an axis orthogonal to the view
    /// direction stands in for it.
    pub fn view_up(&self) -> Vec3 {
        let forward = (self.target - self.eye).normalize_or_zero();
        if forward.cross(self.up).length_squared() > PARALLEL_EPSILON {
            self.up
        } else {
            forward.any_orthonormal_vector()
        }
    }

    /// Right-handed view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.view_up())
    }

    /// Right-handed perspective projection, depth in [0, 1].
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), aspect, self.near, self.far)
    }

    /// Orthonormal camera basis: (forward, right, up).
    fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.target - self.eye).normalize_or_zero();
        let right = forward.cross(self.view_up()).normalize_or_zero();
        let up = right.cross(forward);
        (forward, right, up)
    }

    /// World-space ray through a point in normalized device coordinates.
    pub fn ray_through_ndc(&self, ndc: Vec2, aspect: f32) -> Ray {
        let (forward, right, up) = self.basis();
        let half_h = (self.fov_y_degrees.to_radians() * 0.5).tan();
        let half_w = half_h * aspect;
        let dir = forward + right * (ndc.x * half_w) + up * (ndc.y * half_h);
        Ray::new(self.eye, dir)
    }

    /// Ray through a pointer position in viewport pixels.
    pub fn ray_from_pointer(&self, pointer: Vec2, viewport: &Viewport) -> Ray {
        self.ray_through_ndc(viewport.to_ndc(pointer), viewport.aspect())
    }

    /// Project a world point to viewport pixels. `None` if behind the camera.
    pub fn project(&self, point: Vec3, viewport: &Viewport) -> Option<Vec2> {
        let clip = self.projection_matrix(viewport.aspect()) * self.view_matrix() * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = Vec2::new(clip.x / clip.w, clip.y / clip.w);
        Some(viewport.from_ndc(ndc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndc_corners() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.to_ndc(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0));
        assert_eq!(vp.to_ndc(Vec2::new(400.0, 300.0)), Vec2::new(0.0, 0.0));
        assert_eq!(vp.to_ndc(Vec2::new(800.0, 600.0)), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn ndc_round_trip() {
        let vp = Viewport::new(1024.0, 768.0);
        let p = Vec2::new(100.0, 700.0);
        assert!((vp.from_ndc(vp.to_ndc(p)) - p).length() < 1e-3);
    }

    #[test]
    fn center_ray_points_at_target() {
        let camera = Camera3D::looking_at(Vec3::new(0.0, 0.0, 100.0), Vec3::ZERO);
        let ray = camera.ray_through_ndc(Vec2::ZERO, 1.5);
        assert_eq!(ray.origin, camera.eye);
        assert!((ray.dir - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn pointer_ray_passes_through_projected_point() {
        let camera = Camera3D::default();
        let vp = Viewport::new(1280.0, 720.0);
        let point = Vec3::new(8000.0, 0.0, 3000.0);
        let screen = camera.project(point, &vp).unwrap();
        let ray = camera.ray_from_pointer(screen, &vp);

        // Distance from the point to the ray should be tiny relative to scale.
        let to_point = point - ray.origin;
        let along = to_point.dot(ray.dir);
        let closest = ray.at(along);
        assert!((closest - point).length() < 5.0, "miss by {}", (closest - point).length());
    }

    #[test]
    fn point_behind_camera_does_not_project() {
        let camera = Camera3D::looking_at(Vec3::new(0.0, 0.0, 100.0), Vec3::ZERO);
        let vp = Viewport::default();
        assert!(camera.project(Vec3::new(0.0, 0.0, 200.0), &vp).is_none());
    }

    #[test]
    fn top_down_view_keeps_a_screen_plane() {
        let camera = Camera3D::looking_at(Vec3::new(0.0, 500.0, 0.0), Vec3::ZERO);
        let vp = Viewport::new(800.0, 600.0);

        let up = camera.view_up();
        assert!(up.dot(Vec3::NEG_Y).abs() < 1e-6, "up = {up}");

        let screen = camera.project(Vec3::new(100.0, 0.0, 0.0), &vp).unwrap();
        assert!(screen.is_finite(), "screen = {screen}");
        assert!((screen - Vec2::new(400.0, 300.0)).length() > 10.0);

        // Off-center pointers get off-axis rays that still pass through the point.
        let ray = camera.ray_from_pointer(screen, &vp);
        assert!(ray.dir.dot(Vec3::NEG_Y) < 0.999);
        let closest = ray.at((Vec3::new(100.0, 0.0, 0.0) - ray.origin).dot(ray.dir));
        assert!((closest - Vec3::new(100.0, 0.0, 0.0)).length() < 1e-2);
    }

    #[test]
    fn degenerate_viewport_aspect() {
        assert_eq!(Viewport::new(0.0, 0.0).aspect(), 1.0);
    }
}
