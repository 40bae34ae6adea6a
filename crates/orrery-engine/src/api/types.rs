use serde::Serialize;

/// Dense identifier for a body: its insertion index in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

impl BodyId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Opaque reference to a renderable owned by the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct DrawableHandle(pub u32);

/// Signals consumed by the presentation layer outside the core.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UiSignal {
    /// Show the info panel for a body.
    ShowInfo { title: String, description: String },
    /// Hide the info panel.
    HideInfo,
    /// Loading progress, 0–100.
    LoadingPercent { percent: u8 },
    /// All asset loads have terminated; the simulation is running.
    LoadingComplete,
}

/// Host event subscriptions the core asks to revoke on teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Pointer,
    Resize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ui_signal_serializes_tagged() {
        let json = serde_json::to_string(&UiSignal::ShowInfo {
            title: "Earth".into(),
            description: "Home".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"kind":"show_info","title":"Earth","description":"Home"}"#);

        let json = serde_json::to_string(&UiSignal::LoadingPercent { percent: 40 }).unwrap();
        assert_eq!(json, r#"{"kind":"loading_percent","percent":40}"#);
    }

    #[test]
    fn event_kind_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&EventKind::Resize).unwrap(), r#""resize""#);
    }
}
