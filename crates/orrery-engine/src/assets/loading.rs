use std::collections::HashSet;

use crate::api::types::DrawableHandle;
use crate::picking::ray::PrimitiveShape;

/// Asset completion messages, pushed by the host and drained by the runner.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetEvent {
    /// A body's drawable finished loading.
    Loaded {
        body: String,
        handle: DrawableHandle,
        primitives: Vec<PrimitiveShape>,
    },
    /// A body's drawable failed to load. Terminal for that asset.
    Failed { body: String, reason: String },
    /// Aggregate byte/item progress reported by the loader.
    Progress { completed: u32, total: u32 },
}

/// FIFO of pending asset events.
#[derive(Debug, Default)]
pub struct AssetQueue {
    events: Vec<AssetEvent>,
}

impl AssetQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: AssetEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<AssetEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

/// Tracks outstanding load requests and the last reported percentage.
#[derive(Debug, Default)]
pub struct LoadTracker {
    pending: HashSet<String>,
    requested: usize,
    failed: usize,
    last_percent: Option<u8>,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a load request for `body`. Duplicate requests count once.
    pub fn request(&mut self, body: &str) {
        if self.pending.insert(body.to_string()) {
            self.requested += 1;
        }
    }

    /// Mark `body`'s load as terminated. Returns false if it was not pending.
    pub fn complete(&mut self, body: &str, failed: bool) -> bool {
        let was_pending = self.pending.remove(body);
        if was_pending && failed {
            self.failed += 1;
        }
        was_pending
    }

    /// Every requested load has terminated.
    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn requested(&self) -> usize {
        self.requested
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Percentage of terminated requests, 0–100.
    pub fn percent(&self) -> u8 {
        if self.requested == 0 {
            return 100;
        }
        let done = self.requested - self.pending.len();
        percent_of(done as u64, self.requested as u64)
    }

    /// Returns `percent` only if it exceeds the last value returned, so the
    /// reported progress never repeats or moves backwards.
    pub fn next_percent(&mut self, percent: u8) -> Option<u8> {
        if self.last_percent.is_some_and(|last| last >= percent) {
            return None;
        }
        self.last_percent = Some(percent);
        Some(percent)
    }
}

/// `completed / total` as a rounded percentage clamped to 0–100.
/// A zero total reports 0.
pub fn percent_of(completed: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let p = (completed.min(total) as f64 / total as f64 * 100.0).round();
    p.clamp(0.0, 100.0) as u8
}
