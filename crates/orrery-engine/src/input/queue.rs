use crate::api::types::EventKind;
use crate::renderer::traits::EventSource;

/// Input event types the simulation understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A click at viewport pixel coordinates (origin top-left).
    PointerClick { x: f32, y: f32 },
    /// The viewport was resized.
    Resize { width: f32, height: f32 },
    /// The host's camera controls moved the camera.
    CameraMoved { eye: [f32; 3], target: [f32; 3] },
}

/// A queue of input events.
/// The host writes events into the queue; the runner drains them each tick.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(16),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Host event subscriptions held by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscriptions {
    pointer: bool,
    resize: bool,
}

impl Subscriptions {
    /// Both pointer and resize subscriptions active.
    pub fn active() -> Self {
        Self {
            pointer: true,
            resize: true,
        }
    }

    /// Unsubscribe everything still held. Returns how many were revoked;
    /// a second call revokes nothing.
    pub fn revoke_all(&mut self, source: &mut dyn EventSource) -> usize {
        let mut revoked = 0;
        if std::mem::take(&mut self.pointer) {
            source.unsubscribe(EventKind::Pointer);
            revoked += 1;
        }
        if std::mem::take(&mut self.resize) {
            source.unsubscribe(EventKind::Resize);
            revoked += 1;
        }
        revoked
    }
}

impl Default for Subscriptions {
    fn default() -> Self {
        Self::active()
    }
}
