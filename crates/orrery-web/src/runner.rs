use serde::Serialize;

use orrery_engine::{
    AssetEvent, AssetLoader, DrawableHandle, EventKind, EventSource, FrameData, InputEvent,
    OrreryResult, PrimitiveShape, Renderer, SimulationRunner, SystemManifest, UiSignal, UiSink,
};

/// A load the host should start, serialized for JavaScript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadRequest {
    pub body: String,
    pub path: String,
}

/// Collaborator implementation for the browser.
///
/// Nothing here calls into JavaScript. Every collaborator call is buffered and
/// JavaScript drains the buffers after each exported call; frame data is read
/// directly from the runner's frame buffer through raw pointers.
#[derive(Debug, Default)]
pub struct WebHost {
    signals: Vec<UiSignal>,
    load_requests: Vec<LoadRequest>,
    released: Vec<u32>,
    revoked: Vec<EventKind>,
    frames_submitted: u64,
    last_time: f64,
}

impl WebHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    /// Simulation time of the last submitted frame.
    pub fn last_time(&self) -> f64 {
        self.last_time
    }

    pub fn take_signals(&mut self) -> Vec<UiSignal> {
        std::mem::take(&mut self.signals)
    }

    pub fn take_load_requests(&mut self) -> Vec<LoadRequest> {
        std::mem::take(&mut self.load_requests)
    }

    pub fn take_released(&mut self) -> Vec<u32> {
        std::mem::take(&mut self.released)
    }

    pub fn take_revoked(&mut self) -> Vec<EventKind> {
        std::mem::take(&mut self.revoked)
    }
}

impl Renderer for WebHost {
    fn submit_frame(&mut self, frame: &FrameData) {
        self.frames_submitted += 1;
        self.last_time = frame.time;
    }

    fn release(&mut self, handle: DrawableHandle) {
        self.released.push(handle.0);
    }
}

impl UiSink for WebHost {
    fn signal(&mut self, signal: UiSignal) {
        self.signals.push(signal);
    }
}

impl AssetLoader for WebHost {
    fn request_load(&mut self, body: &str, path: &str) {
        self.load_requests.push(LoadRequest {
            body: body.to_string(),
            path: path.to_string(),
        });
    }
}

impl EventSource for WebHost {
    fn unsubscribe(&mut self, kind: EventKind) {
        self.revoked.push(kind);
    }
}

/// The simulation runner paired with its browser host.
///
/// The bridge keeps one of these in a `thread_local!` slot, because
/// wasm-bindgen cannot export the runner directly.
pub struct WebRunner {
    runner: SimulationRunner,
    host: WebHost,
}

impl WebRunner {
    /// Build from a JSON manifest, or the built-in solar system when `None`,
    /// and request every asset load.
    pub fn new(manifest_json: Option<&str>) -> OrreryResult<Self> {
        let runner = match manifest_json {
            Some(json) => SimulationRunner::from_json(json)?,
            None => SimulationRunner::new(&SystemManifest::solar_system())?,
        };
        let mut web = Self {
            runner,
            host: WebHost::new(),
        };
        web.runner.start(&mut web.host);
        Ok(web)
    }

    pub fn tick(&mut self) {
        self.runner.tick(&mut self.host);
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.runner.push_input(event);
    }

    /// A drawable finished loading; `triangles` is a flat xyz array of
    /// pickable triangles in drawable-local space.
    pub fn asset_loaded(&mut self, body: &str, handle: u32, triangles: &[f32]) {
        self.runner.push_asset_event(AssetEvent::Loaded {
            body: body.to_string(),
            handle: DrawableHandle(handle),
            primitives: PrimitiveShape::triangles_from_flat(triangles),
        });
        self.runner.pump(&mut self.host);
    }

    /// A drawable finished loading and is picked by its bounding sphere.
    pub fn asset_loaded_sphere(&mut self, body: &str, handle: u32, radius: f32) {
        self.runner.push_asset_event(AssetEvent::Loaded {
            body: body.to_string(),
            handle: DrawableHandle(handle),
            primitives: vec![PrimitiveShape::bounding_sphere(radius)],
        });
        self.runner.pump(&mut self.host);
    }

    pub fn asset_failed(&mut self, body: &str, reason: &str) {
        self.runner.push_asset_event(AssetEvent::Failed {
            body: body.to_string(),
            reason: reason.to_string(),
        });
        self.runner.pump(&mut self.host);
    }

    pub fn loading_progress(&mut self, completed: u32, total: u32) {
        self.runner
            .push_asset_event(AssetEvent::Progress { completed, total });
        self.runner.pump(&mut self.host);
    }

    /// Stop and tear down. Returns the subscriptions revoked by this call.
    pub fn teardown(&mut self) -> Vec<EventKind> {
        self.runner.shutdown(&mut self.host);
        self.host.take_revoked()
    }

    pub fn runner(&self) -> &SimulationRunner {
        &self.runner
    }

    pub fn host(&self) -> &WebHost {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut WebHost {
        &mut self.host
    }

    /// Pending UI signals as a JSON array.
    pub fn drain_signals_json(&mut self) -> String {
        to_json(&self.host.take_signals())
    }

    /// Pending load requests as a JSON array.
    pub fn drain_load_requests_json(&mut self) -> String {
        to_json(&self.host.take_load_requests())
    }

    /// Released drawable handles as a JSON array.
    pub fn drain_released_json(&mut self) -> String {
        to_json(&self.host.take_released())
    }

    // ---- Pointer accessors for direct memory reads ----

    pub fn transforms_ptr(&self) -> *const f32 {
        self.runner.frame().transforms_ptr()
    }

    pub fn transform_count(&self) -> u32 {
        self.runner.frame().transform_count()
    }

    pub fn orbit_rings_ptr(&self) -> *const f32 {
        self.runner.frame().orbit_rings_ptr()
    }

    pub fn orbit_ring_count(&self) -> u32 {
        self.runner.frame().orbit_ring_count()
    }

    /// Orbit path of a body as flat xyz floats. Empty for unknown names.
    pub fn orbit_path(&self, body: &str) -> Vec<f32> {
        let state = self.runner.state();
        let Some(id) = state.registry.id_of(body) else {
            return Vec::new();
        };
        state
            .orbit_path(id)
            .into_iter()
            .flat_map(|p| [p.x, p.y, p.z])
            .collect()
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            log::error!("orrery-web: serialize failed: {}", e);
            "[]".to_string()
        }
    }
}
