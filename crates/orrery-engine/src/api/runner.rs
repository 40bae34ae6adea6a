use log::{debug, error, info, warn};

use crate::api::simulation::SimulationState;
use crate::api::types::UiSignal;
use crate::assets::loading::{percent_of, AssetEvent, AssetQueue, LoadTracker};
use crate::assets::manifest::SystemManifest;
use crate::error::OrreryResult;
use crate::input::queue::{InputEvent, InputQueue, Subscriptions};
use crate::renderer::instance::FrameBuffer;
use crate::renderer::traits::{AssetLoader, FrameData, Host, UiSink};
use glam::Vec3;

/// Lifecycle of the update loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for requested drawables. Nothing advances.
    Loading,
    /// Every requested load has terminated; the clock ticks.
    Running,
    /// Torn down. Every call is a no-op.
    Stopped,
}

/// Drives a [`SimulationState`] through loading, ticking and teardown.
///
/// The host owns the frame loop and calls [`SimulationRunner::tick`] once per
/// display frame. Asset completions and input arrive as queued messages and
/// are drained at the start of the next tick.
pub struct SimulationRunner {
    state: SimulationState,
    phase: Phase,
    started: bool,
    input: InputQueue,
    assets: AssetQueue,
    tracker: LoadTracker,
    subscriptions: Subscriptions,
    frame: FrameBuffer,
}

impl SimulationRunner {
    pub fn new(manifest: &SystemManifest) -> OrreryResult<Self> {
        let state = SimulationState::from_manifest(manifest)?;
        let frame = FrameBuffer::with_capacity(state.registry.len());
        info!(
            "orrery: {} bodies, step {}",
            state.registry.len(),
            state.config.time_step
        );
        Ok(Self {
            state,
            phase: Phase::Loading,
            started: false,
            input: InputQueue::new(),
            assets: AssetQueue::new(),
            tracker: LoadTracker::new(),
            subscriptions: Subscriptions::active(),
            frame,
        })
    }

    /// Parse a JSON manifest and build a runner from it.
    pub fn from_json(json: &str) -> OrreryResult<Self> {
        Self::new(&SystemManifest::from_json(json)?)
    }

    /// Request one load per body with a model path. With nothing to load the
    /// runner starts running immediately. Only the first call has an effect.
    pub fn start<H: AssetLoader + UiSink>(&mut self, host: &mut H) {
        if self.started || self.phase != Phase::Loading {
            warn!("orrery: start called twice, ignoring");
            return;
        }
        self.started = true;

        for body in self.state.registry.iter() {
            if let Some(path) = &body.desc.model_path {
                self.tracker.request(body.name());
                host.request_load(body.name(), path);
                debug!("orrery: requested {} from {}", body.name(), path);
            }
        }
        info!("orrery: {} loads requested", self.tracker.requested());

        if self.tracker.requested() > 0 {
            self.emit_percent(0, host);
        }
        self.finish_loading_if_done(host);
    }

    /// Queue an input event for the next tick.
    pub fn push_input(&mut self, event: InputEvent) {
        if self.phase == Phase::Stopped {
            return;
        }
        self.input.push(event);
    }

    /// Queue an asset completion or progress message.
    pub fn push_asset_event(&mut self, event: AssetEvent) {
        if self.phase == Phase::Stopped {
            debug!("orrery: asset event after teardown dropped");
            return;
        }
        self.assets.push(event);
    }

    /// Apply queued asset events, emitting progress and, once, completion.
    pub fn pump(&mut self, ui: &mut dyn UiSink) {
        if self.phase == Phase::Stopped {
            return;
        }
        for event in self.assets.drain() {
            match event {
                AssetEvent::Loaded { body, handle, primitives } => {
                    let failed = match self.state.registry.attach(&body, handle, primitives) {
                        Ok(_) => {
                            debug!("orrery: {} loaded as drawable {}", body, handle.0);
                            false
                        }
                        Err(e) => {
                            warn!("orrery: {} not attached: {}", body, e);
                            true
                        }
                    };
                    self.tracker.complete(&body, failed);
                    self.emit_percent(self.tracker.percent(), ui);
                }
                AssetEvent::Failed { body, reason } => {
                    error!("orrery: failed to load {}: {}", body, reason);
                    self.tracker.complete(&body, true);
                    self.emit_percent(self.tracker.percent(), ui);
                }
                AssetEvent::Progress { completed, total } => {
                    debug!("orrery: load progress {}/{}", completed, total);
                    if total > 0 {
                        self.emit_percent(percent_of(completed as u64, total as u64), ui);
                    }
                }
            }
        }
        self.finish_loading_if_done(ui);
    }

    /// One display frame. Drains pending messages and input; while running,
    /// advances the clock, composes every body and submits the frame.
    pub fn tick<H: Host>(&mut self, host: &mut H) {
        if self.phase == Phase::Stopped {
            return;
        }
        self.pump(host);

        for event in self.input.drain() {
            match event {
                InputEvent::PointerClick { x, y } => {
                    self.state.click(x, y, host);
                }
                InputEvent::Resize { width, height } => self.state.resize(width, height),
                InputEvent::CameraMoved { eye, target } => {
                    self.state.set_camera(Vec3::from(eye), Vec3::from(target))
                }
            }
        }

        if self.phase != Phase::Running {
            return;
        }
        let time = self.state.advance();
        self.state.build_frame(&mut self.frame);
        host.submit_frame(&FrameData {
            transforms: &self.frame.transforms,
            orbit_rings: &self.frame.orbit_rings,
            time,
            tick: self.state.clock.ticks(),
        });
    }

    /// Stop the loop, revoke host subscriptions, then release every attached
    /// drawable. Safe to call more than once.
    pub fn shutdown<H: Host>(&mut self, host: &mut H) {
        if self.phase == Phase::Stopped {
            return;
        }
        self.phase = Phase::Stopped;
        self.input.drain();
        self.assets.drain();

        let revoked = self.subscriptions.revoke_all(host);
        let mut released = 0;
        for handle in self.state.registry.drawables() {
            host.release(handle);
            released += 1;
        }
        info!(
            "orrery: stopped, {} subscriptions revoked, {} drawables released",
            revoked, released
        );
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn tracker(&self) -> &LoadTracker {
        &self.tracker
    }

    /// Last frame built by [`SimulationRunner::tick`].
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    fn emit_percent(&mut self, percent: u8, ui: &mut dyn UiSink) {
        if self.phase != Phase::Loading {
            return;
        }
        if let Some(percent) = self.tracker.next_percent(percent) {
            ui.signal(UiSignal::LoadingPercent { percent });
        }
    }

    fn finish_loading_if_done(&mut self, ui: &mut dyn UiSink) {
        if self.phase != Phase::Loading || !self.started || !self.tracker.is_finished() {
            return;
        }
        self.phase = Phase::Running;
        if self.tracker.failed() > 0 {
            warn!(
                "orrery: running with {} of {} drawables missing",
                self.tracker.failed(),
                self.tracker.requested()
            );
        }
        info!("orrery: loading complete, running");
        ui.signal(UiSignal::LoadingComplete);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::simulation::SimulationConfig;
    use crate::api::types::{DrawableHandle, EventKind};
    use crate::assets::manifest::BodyDesc;
    use crate::picking::PrimitiveShape;
    use crate::renderer::camera::Viewport;
    use crate::renderer::instance::MAX_HANDLE;
    use crate::renderer::traits::{EventSource, Renderer};

    /// Records every collaborator call.
    #[derive(Default)]
    struct TestHost {
        frames: Vec<(u64, usize, usize)>,
        signals: Vec<UiSignal>,
        loads: Vec<(String, String)>,
        unsubscribed: Vec<EventKind>,
        released: Vec<DrawableHandle>,
    }

    impl Renderer for TestHost {
        fn submit_frame(&mut self, frame: &FrameData) {
            self.frames
                .push((frame.tick, frame.transforms.len(), frame.orbit_rings.len()));
        }
        fn release(&mut self, handle: DrawableHandle) {
            self.released.push(handle);
        }
    }

    impl UiSink for TestHost {
        fn signal(&mut self, signal: UiSignal) {
            self.signals.push(signal);
        }
    }

    impl AssetLoader for TestHost {
        fn request_load(&mut self, body: &str, path: &str) {
            self.loads.push((body.to_string(), path.to_string()));
        }
    }

    impl EventSource for TestHost {
        fn unsubscribe(&mut self, kind: EventKind) {
            self.unsubscribed.push(kind);
        }
    }

    impl TestHost {
        fn count(&self, signal: &UiSignal) -> usize {
            self.signals.iter().filter(|s| *s == signal).count()
        }
    }

    fn manifest() -> SystemManifest {
        SystemManifest {
            config: SimulationConfig::default(),
            bodies: vec![
                BodyDesc::new("Central").with_model("central.glb", 5.0),
                BodyDesc::new("Planet").with_orbit(100.0, 1.0, 0.0).with_model("planet.glb", 2.0),
                BodyDesc::new("Moon")
                    .with_orbit(10.0, 5.0, 0.0)
                    .with_parent("Planet")
                    .with_model("moon.glb", 1.0),
            ],
        }
    }

    fn loaded(body: &str, handle: u32) -> AssetEvent {
        AssetEvent::Loaded {
            body: body.into(),
            handle: DrawableHandle(handle),
            primitives: vec![PrimitiveShape::unit_sphere()],
        }
    }

    #[test]
    fn start_requests_one_load_per_model() {
        let mut runner = SimulationRunner::new(&manifest()).unwrap();
        let mut host = TestHost::default();
        runner.start(&mut host);
        assert_eq!(host.loads.len(), 3);
        assert_eq!(host.loads[2], ("Moon".to_string(), "moon.glb".to_string()));
        assert_eq!(runner.phase(), Phase::Loading);
        assert_eq!(host.signals, vec![UiSignal::LoadingPercent { percent: 0 }]);

        runner.start(&mut host);
        assert_eq!(host.loads.len(), 3);
    }

    #[test]
    fn nothing_to_load_runs_immediately() {
        let mut runner = SimulationRunner::new(&SystemManifest {
            config: SimulationConfig::default(),
            bodies: vec![BodyDesc::new("Central")],
        })
        .unwrap();
        let mut host = TestHost::default();
        runner.start(&mut host);
        assert!(runner.is_running());
        assert_eq!(host.signals, vec![UiSignal::LoadingComplete]);
    }

    #[test]
    fn ticks_do_nothing_while_loading() {
        let mut runner = SimulationRunner::new(&manifest()).unwrap();
        let mut host = TestHost::default();
        runner.start(&mut host);
        runner.tick(&mut host);
        runner.tick(&mut host);
        assert!(host.frames.is_empty());
        assert_eq!(runner.state().clock.ticks(), 0);
    }

    #[test]
    fn failed_load_still_reaches_running() {
        let mut runner = SimulationRunner::new(&manifest()).unwrap();
        let mut host = TestHost::default();
        runner.start(&mut host);

        runner.push_asset_event(loaded("Central", 0));
        runner.push_asset_event(AssetEvent::Failed {
            body: "Planet".into(),
            reason: "not found".into(),
        });
        runner.push_asset_event(loaded("Moon", 2));
        runner.pump(&mut host);

        assert!(runner.is_running());
        assert_eq!(host.count(&UiSignal::LoadingComplete), 1);
        assert_eq!(host.signals.last(), Some(&UiSignal::LoadingComplete));
        assert_eq!(host.count(&UiSignal::LoadingPercent { percent: 100 }), 1);

        // The failed body is absent from transforms and picks, and ticks proceed.
        let planet = runner.state().registry.id_of("Planet").unwrap();
        assert!(runner.state().registry.primitives().iter().all(|p| p.body != planet));
        for _ in 0..3 {
            runner.tick(&mut host);
        }
        assert_eq!(host.frames, vec![(1, 2, 2), (2, 2, 2), (3, 2, 2)]);

        // The moon keeps orbiting its unloaded parent.
        let moon = runner.state().registry.get_by_name("Moon").unwrap();
        let planet_pos = runner.state().registry.get(planet).unwrap().transform.translation;
        assert!(((moon.transform.translation - planet_pos).length() - 10.0).abs() < 1e-9);

        runner.pump(&mut host);
        assert_eq!(host.count(&UiSignal::LoadingComplete), 1);
    }

    #[test]
    fn host_progress_is_deduplicated() {
        let mut runner = SimulationRunner::new(&manifest()).unwrap();
        let mut host = TestHost::default();
        runner.start(&mut host);
        host.signals.clear();

        runner.push_asset_event(AssetEvent::Progress { completed: 1, total: 4 });
        runner.push_asset_event(AssetEvent::Progress { completed: 1, total: 4 });
        runner.push_asset_event(AssetEvent::Progress { completed: 2, total: 4 });
        runner.pump(&mut host);
        assert_eq!(
            host.signals,
            vec![
                UiSignal::LoadingPercent { percent: 25 },
                UiSignal::LoadingPercent { percent: 50 },
            ]
        );
    }

    #[test]
    fn progress_from_both_sources_never_goes_backwards() {
        let mut runner = SimulationRunner::new(&manifest()).unwrap();
        let mut host = TestHost::default();
        runner.start(&mut host);
        host.signals.clear();

        runner.push_asset_event(loaded("Central", 0));
        runner.push_asset_event(AssetEvent::Progress { completed: 1, total: 6 });
        runner.push_asset_event(AssetEvent::Progress { completed: 3, total: 6 });
        runner.pump(&mut host);
        assert_eq!(
            host.signals,
            vec![
                UiSignal::LoadingPercent { percent: 33 },
                UiSignal::LoadingPercent { percent: 50 },
            ]
        );
    }

    #[test]
    fn oversized_handle_counts_as_failed_load() {
        let mut runner = SimulationRunner::new(&manifest()).unwrap();
        let mut host = TestHost::default();
        runner.start(&mut host);
        runner.push_asset_event(loaded("Central", 0));
        runner.push_asset_event(loaded("Planet", MAX_HANDLE + 1));
        runner.push_asset_event(loaded("Moon", 2));
        runner.pump(&mut host);

        assert!(runner.is_running());
        assert_eq!(runner.tracker().failed(), 1);
        let planet = runner.state().registry.get_by_name("Planet").unwrap();
        assert!(!planet.is_loaded());
        runner.tick(&mut host);
        assert_eq!(host.frames, vec![(1, 2, 2)]);
    }

    #[test]
    fn resize_input_updates_viewport() {
        let mut runner = SimulationRunner::new(&manifest()).unwrap();
        let mut host = TestHost::default();
        runner.start(&mut host);
        runner.push_input(InputEvent::Resize { width: 1024.0, height: 768.0 });
        runner.tick(&mut host);
        assert_eq!(runner.state().viewport, Viewport::new(1024.0, 768.0));
    }

    #[test]
    fn load_for_unknown_body_is_not_fatal() {
        let mut runner = SimulationRunner::new(&manifest()).unwrap();
        let mut host = TestHost::default();
        runner.start(&mut host);
        runner.push_asset_event(loaded("Pluto", 9));
        runner.pump(&mut host);
        assert_eq!(runner.phase(), Phase::Loading);
        assert!(runner.state().registry.body_for_handle(DrawableHandle(9)).is_none());
    }

    #[test]
    fn click_input_selects_during_running() {
        let mut runner = SimulationRunner::new(&manifest()).unwrap();
        let mut host = TestHost::default();
        runner.start(&mut host);
        for (i, name) in ["Central", "Planet", "Moon"].iter().enumerate() {
            runner.push_asset_event(loaded(name, i as u32));
        }
        runner.push_input(InputEvent::Resize { width: 800.0, height: 600.0 });
        runner.push_input(InputEvent::CameraMoved { eye: [0.0, 0.0, 50.0], target: [0.0; 3] });
        runner.push_input(InputEvent::PointerClick { x: 400.0, y: 300.0 });
        runner.tick(&mut host);

        let central = runner.state().registry.id_of("Central").unwrap();
        assert_eq!(runner.state().selection.selected(), Some(central));
        assert!(host
            .signals
            .iter()
            .any(|s| matches!(s, UiSignal::ShowInfo { title, .. } if title == "Central")));
    }

    #[test]
    fn shutdown_stops_revokes_and_releases_once() {
        let mut runner = SimulationRunner::new(&manifest()).unwrap();
        let mut host = TestHost::default();
        runner.start(&mut host);
        runner.push_asset_event(loaded("Central", 0));
        runner.push_asset_event(loaded("Planet", 1));
        runner.push_asset_event(AssetEvent::Failed { body: "Moon".into(), reason: "x".into() });
        runner.tick(&mut host);
        let frames = host.frames.len();

        runner.shutdown(&mut host);
        runner.shutdown(&mut host);
        runner.tick(&mut host);

        assert_eq!(runner.phase(), Phase::Stopped);
        assert_eq!(host.frames.len(), frames);
        assert_eq!(host.unsubscribed, vec![EventKind::Pointer, EventKind::Resize]);
        assert_eq!(host.released, vec![DrawableHandle(0), DrawableHandle(1)]);
    }

    #[test]
    fn from_json_rejects_bad_manifest() {
        assert!(SimulationRunner::from_json("{ not json").is_err());
        let dup = r#"{"bodies":[{"name":"Sun"},{"name":"Sun"}]}"#;
        assert!(SimulationRunner::from_json(dup).is_err());
    }
}
