pub mod api;
pub mod core;
pub mod components;
pub mod picking;
pub mod renderer;
pub mod input;
pub mod assets;
pub mod error;

// Re-export key types at crate root for convenience
pub use api::runner::{SimulationRunner, Phase};
pub use api::simulation::{SimulationConfig, SimulationState};
pub use api::types::{BodyId, DrawableHandle, UiSignal, EventKind};
pub use assets::manifest::{SystemManifest, BodyDesc};
pub use assets::loading::{AssetEvent, AssetQueue, LoadTracker};
pub use components::body::{Body, BodyTransform};
pub use crate::core::clock::SimulationClock;
pub use crate::core::registry::BodyRegistry;
pub use crate::core::hierarchy::{HierarchyComposer, compose_world_transform};
pub use crate::core::orbit::{position as orbit_position, circular_path, wrap_angle};
pub use picking::{pick, nearest_hit, PickHit, Ray, PrimitiveShape, TaggedPrimitive};
pub use picking::{SelectionController, SelectionChange};
pub use renderer::camera::{Camera3D, Viewport};
pub use renderer::instance::{TransformInstance, OrbitRing, FrameBuffer, MAX_HANDLE};
pub use renderer::traits::{Renderer, UiSink, AssetLoader, EventSource, Host, FrameData};
pub use input::queue::{InputEvent, InputQueue, Subscriptions};
pub use error::{OrreryError, OrreryResult};
