//! Collaborator traits the core calls into.
//!
//! The core never owns a device, a window, a loader or a DOM. Hosts implement
//! these traits: the wasm bridge buffers everything for JavaScript, and tests
//! use a scripted recorder.

use super::instance::{OrbitRing, TransformInstance};
use crate::api::types::{DrawableHandle, EventKind, UiSignal};

/// Everything the renderer needs to draw one tick.
/// Composition for the tick is complete before this is built.
#[derive(Debug, Clone, Copy)]
pub struct FrameData<'a> {
    /// One instance per body with an attached drawable, in body order.
    pub transforms: &'a [TransformInstance],
    /// Orbit rings for every orbiting body, centered on the orbit center.
    pub orbit_rings: &'a [OrbitRing],
    /// Simulation time of this frame.
    pub time: f64,
    /// Tick counter of this frame.
    pub tick: u64,
}

/// Rendering collaborator.
pub trait Renderer {
    /// Draw a complete frame.
    fn submit_frame(&mut self, frame: &FrameData);

    /// Release a drawable on teardown. Called once per attached handle,
    /// after the update loop has stopped.
    fn release(&mut self, handle: DrawableHandle);
}

/// Presentation collaborator (info panel, loading overlay).
pub trait UiSink {
    fn signal(&mut self, signal: UiSignal);
}

/// Asset loading collaborator. Loads complete asynchronously; the host
/// reports completion by pushing an `AssetEvent` into the runner.
pub trait AssetLoader {
    fn request_load(&mut self, body: &str, path: &str);
}

/// Host input dispatch. Only unsubscription is visible to the core.
pub trait EventSource {
    fn unsubscribe(&mut self, kind: EventKind);
}

/// A host that provides every collaborator.
pub trait Host: Renderer + UiSink + AssetLoader + EventSource {}

impl<T: Renderer + UiSink + AssetLoader + EventSource> Host for T {}

impl UiSink for Vec<UiSignal> {
    fn signal(&mut self, signal: UiSignal) {
        self.push(signal);
    }
}

impl EventSource for Vec<EventKind> {
    fn unsubscribe(&mut self, kind: EventKind) {
        self.push(kind);
    }
}
