use bytemuck::{Pod, Zeroable};
use crate::components::body::Body;

/// Largest drawable handle the instance buffer can carry: every integer up to
/// 2^24 is exact in an f32.
pub const MAX_HANDLE: u32 = 1 << 24;

/// Per-body transform written for the renderer.
/// Must match the JavaScript reader: 12 floats = 48 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct TransformInstance {
    /// Drawable handle, as a float. Exact because handles never exceed `MAX_HANDLE`.
    pub handle: f32,
    /// World position.
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Rotation quaternion (x, y, z, w).
    pub qx: f32,
    pub qy: f32,
    pub qz: f32,
    pub qw: f32,
    /// Scale per axis.
    pub sx: f32,
    pub sy: f32,
    pub sz: f32,
    pub _pad: f32,
}

impl TransformInstance {
    pub const FLOATS: usize = 12;

    /// Pack a body's current transform. `None` if no drawable is attached.
    pub fn from_body(body: &Body) -> Option<Self> {
        let handle = body.drawable?;
        let t = &body.transform;
        let pos = t.translation.as_vec3();
        let rot = t.rotation();
        Some(Self {
            handle: handle.0 as f32,
            x: pos.x,
            y: pos.y,
            z: pos.z,
            qx: rot.x,
            qy: rot.y,
            qz: rot.z,
            qw: rot.w,
            sx: t.scale.x,
            sy: t.scale.y,
            sz: t.scale.z,
            _pad: 0.0,
        })
    }
}

/// A circular orbit path to draw: center and radius, in the XZ plane.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct OrbitRing {
    pub cx: f32,
    pub cy: f32,
    pub cz: f32,
    pub radius: f32,
}

impl OrbitRing {
    pub const FLOATS: usize = 4;
}

/// Frame output buffers, reused every tick.
pub struct FrameBuffer {
    pub transforms: Vec<TransformInstance>,
    pub orbit_rings: Vec<OrbitRing>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::with_capacity(16)
    }

    pub fn with_capacity(bodies: usize) -> Self {
        Self {
            transforms: Vec::with_capacity(bodies),
            orbit_rings: Vec::with_capacity(bodies),
        }
    }

    pub fn clear(&mut self) {
        self.transforms.clear();
        self.orbit_rings.clear();
    }

    pub fn transform_count(&self) -> u32 {
        self.transforms.len() as u32
    }

    /// Raw pointer to transform data for direct memory reads.
    pub fn transforms_ptr(&self) -> *const f32 {
        self.transforms.as_ptr() as *const f32
    }

    pub fn orbit_ring_count(&self) -> u32 {
        self.orbit_rings.len() as u32
    }

    /// Raw pointer to orbit ring data for direct memory reads.
    pub fn orbit_rings_ptr(&self) -> *const f32 {
        self.orbit_rings.as_ptr() as *const f32
    }

    /// Transform data as a flat float slice.
    pub fn transform_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.transforms)
    }

    /// Orbit ring data as a flat float slice.
    pub fn orbit_ring_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.orbit_rings)
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
