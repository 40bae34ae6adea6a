use std::collections::HashMap;

use crate::api::types::{BodyId, DrawableHandle};
use crate::assets::manifest::SystemManifest;
use crate::components::body::Body;
use crate::error::{OrreryError, OrreryResult};
use crate::picking::ray::{PrimitiveShape, TaggedPrimitive};
use crate::renderer::instance::MAX_HANDLE;

/// Fixed set of bodies in insertion order, with name and drawable indices.
///
/// Composition is immutable after construction: there is no removal.
/// Only per-body transient fields (transform, drawable, saved scale) change.
pub struct BodyRegistry {
    bodies: Vec<Body>,
    by_name: HashMap<String, BodyId>,
    by_handle: HashMap<DrawableHandle, BodyId>,
    /// Flat pick index, rebuilt per body on attach.
    primitives: Vec<TaggedPrimitive>,
}

impl BodyRegistry {
    /// Build from a manifest. Validates it first and resolves parent names.
    pub fn from_manifest(manifest: &SystemManifest) -> OrreryResult<Self> {
        manifest.validate()?;

        let mut by_name = HashMap::with_capacity(manifest.bodies.len());
        for (i, desc) in manifest.bodies.iter().enumerate() {
            by_name.insert(desc.name.clone(), BodyId(i as u32));
        }

        let mut bodies = Vec::with_capacity(manifest.bodies.len());
        for (i, desc) in manifest.bodies.iter().enumerate() {
            let mut body = Body::new(BodyId(i as u32), desc.clone());
            if let Some(parent) = &desc.parent {
                let parent_id = by_name.get(parent).copied().ok_or_else(|| {
                    OrreryError::MissingParentReference {
                        body: desc.name.clone(),
                        parent: parent.clone(),
                    }
                })?;
                body = body.with_parent(parent_id);
            }
            bodies.push(body);
        }

        Ok(Self {
            bodies,
            by_name,
            by_handle: HashMap::new(),
            primitives: Vec::new(),
        })
    }

    /// Get a body by ID.
    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.index())
    }

    /// Get a body by ID (mutable).
    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id.index())
    }

    /// Resolve a body name to its ID.
    pub fn id_of(&self, name: &str) -> Option<BodyId> {
        self.by_name.get(name).copied()
    }

    /// Get a body by name.
    pub fn get_by_name(&self, name: &str) -> Option<&Body> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    /// Find the body that owns a drawable.
    pub fn body_for_handle(&self, handle: DrawableHandle) -> Option<BodyId> {
        self.by_handle.get(&handle).copied()
    }

    /// Iterate over all bodies in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    /// Iterate over all bodies mutably, in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.bodies.iter_mut()
    }

    /// Attach a loaded drawable and its pickable primitives to a body.
    ///
    /// Re-attaching overwrites: the previous handle and primitives of the
    /// body are dropped from the indices. A handle already owned by another
    /// body moves to this one. Handles above `MAX_HANDLE` are rejected and
    /// leave the registry untouched.
    pub fn attach(
        &mut self,
        name: &str,
        handle: DrawableHandle,
        shapes: Vec<PrimitiveShape>,
    ) -> OrreryResult<BodyId> {
        let id = self
            .id_of(name)
            .ok_or_else(|| OrreryError::UnknownBody(name.to_string()))?;
        if handle.0 > MAX_HANDLE {
            return Err(OrreryError::HandleOutOfRange(handle.0));
        }

        if let Some(previous_owner) = self.by_handle.get(&handle).copied() {
            if previous_owner != id {
                self.bodies[previous_owner.index()].drawable = None;
                self.primitives.retain(|p| p.body != previous_owner);
            }
        }
        if let Some(old) = self.bodies[id.index()].drawable.take() {
            self.by_handle.remove(&old);
        }
        self.primitives.retain(|p| p.body != id);

        self.bodies[id.index()].drawable = Some(handle);
        self.by_handle.insert(handle, id);
        self.primitives
            .extend(shapes.into_iter().map(|shape| TaggedPrimitive { body: id, shape }));
        Ok(id)
    }

    /// All pickable primitives of attached drawables.
    pub fn primitives(&self) -> &[TaggedPrimitive] {
        &self.primitives
    }

    /// Handles of every attached drawable, in body order.
    pub fn drawables(&self) -> impl Iterator<Item = DrawableHandle> + '_ {
        self.bodies.iter().filter_map(|b| b.drawable)
    }

    /// Number of bodies.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}
