// core/hierarchy.rs
//
// Orbit hierarchy composer. Resolves parent/child orbit relations into world
// transforms. The processing order is computed once, parent-before-child, so a
// tick is a single linear pass over the registry.
//
// Usage:
//   let composer = HierarchyComposer::build(&registry)?;
//   composer.tick(&mut registry, time);  // spins, then composes world positions

use glam::DVec3;
use crate::api::types::BodyId;
use crate::components::body::{Body, BodyTransform};
use crate::core::orbit;
use crate::core::registry::BodyRegistry;
use crate::error::{OrreryError, OrreryResult};

/// Compose one body's world transform at `time`.
///
/// `parent_world` is the orbit center: the origin for a root body, or the
/// parent's world position already composed this tick. Spin, tilt and scale
/// are carried over from the body's current transform.
pub fn compose_world_transform(body: &Body, parent_world: DVec3, time: f64) -> BodyTransform {
    let desc = &body.desc;
    let (x, z) = orbit::position(desc.orbit_radius, desc.orbit_speed, desc.initial_phase, time);
    BodyTransform {
        translation: parent_world + DVec3::new(x, 0.0, z),
        ..body.transform
    }
}

/// Parent-before-child processing order over a registry.
#[derive(Debug, Clone)]
pub struct HierarchyComposer {
    /// Bodies sorted by depth; insertion order within a depth.
    order: Vec<BodyId>,
}

impl HierarchyComposer {
    /// Build the processing order. All parentless bodies come first, then
    /// each following depth level. Fails on a parent cycle.
    pub fn build(registry: &BodyRegistry) -> OrreryResult<Self> {
        let n = registry.len();
        let mut placed = vec![false; n];
        let mut order = Vec::with_capacity(n);

        // Roots
        for body in registry.iter() {
            if body.parent.is_none() {
                placed[body.id.index()] = true;
                order.push(body.id);
            }
        }

        // Each pass places every body whose parent was placed in an earlier pass.
        let mut level_start = 0;
        while order.len() < n {
            let level_end = order.len();
            if level_start == level_end {
                // Nothing was placed last pass: the remaining bodies form a cycle.
                let stuck = registry
                    .iter()
                    .find(|b| !placed[b.id.index()])
                    .map(|b| b.name().to_string())
                    .unwrap_or_default();
                return Err(OrreryError::ParentCycle(stuck));
            }
            let previous_level = &order[level_start..level_end];
            let next: Vec<BodyId> = registry
                .iter()
                .filter(|b| !placed[b.id.index()])
                .filter(|b| b.parent.is_some_and(|p| previous_level.contains(&p)))
                .map(|b| b.id)
                .collect();
            for id in &next {
                placed[id.index()] = true;
            }
            order.extend(next);
            level_start = level_end;
        }

        Ok(Self { order })
    }

    /// The processing order.
    pub fn order(&self) -> &[BodyId] {
        &self.order
    }

    /// Recompute every body's world position at `time` without spinning.
    pub fn compose_all(&self, registry: &mut BodyRegistry, time: f64) {
        for &id in &self.order {
            let parent_world = registry
                .get(id)
                .and_then(|b| b.parent)
                .and_then(|p| registry.get(p))
                .map(|p| p.transform.translation)
                .unwrap_or(DVec3::ZERO);
            if let Some(body) = registry.get_mut(id) {
                body.transform = compose_world_transform(body, parent_world, time);
            }
        }
    }

    /// One tick: advance every body's self-rotation, then compose positions.
    pub fn tick(&self, registry: &mut BodyRegistry, time: f64) {
        for body in registry.iter_mut() {
            body.transform.spin =
                orbit::wrap_angle(body.transform.spin + body.desc.rotation_speed);
        }
        self.compose_all(registry, time);
    }
}
