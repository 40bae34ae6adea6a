use crate::api::types::{BodyId, UiSignal};
use crate::core::registry::BodyRegistry;
use crate::renderer::traits::UiSink;

/// Default highlight multiplier applied to the selected body's scale.
pub const DEFAULT_HIGHLIGHT_SCALE: f32 = 1.05;

/// What a pick did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    /// A new body is selected (any previous selection was restored).
    Selected(BodyId),
    /// The picked body was already selected.
    Unchanged,
    /// The selection was cleared by a miss.
    Cleared,
    /// A miss with nothing selected.
    Idle,
}

/// Single-selection state: highlight on pick, restore on deselect.
#[derive(Debug, Clone)]
pub struct SelectionController {
    selected: Option<BodyId>,
    highlight: f32,
}

impl SelectionController {
    pub fn new(highlight: f32) -> Self {
        Self {
            selected: None,
            highlight,
        }
    }

    /// Currently selected body.
    pub fn selected(&self) -> Option<BodyId> {
        self.selected
    }

    /// Apply a pick result to the selection and the registry's scales,
    /// signalling the UI on every visible change.
    pub fn apply(
        &mut self,
        hit: Option<BodyId>,
        registry: &mut BodyRegistry,
        ui: &mut dyn UiSink,
    ) -> SelectionChange {
        match hit {
            Some(id) if self.selected == Some(id) => SelectionChange::Unchanged,
            Some(id) => {
                let Some(body) = registry.get(id) else {
                    return SelectionChange::Unchanged;
                };
                let title = body.name().to_string();
                let description = body.desc.description.clone();

                self.restore(registry);

                if let Some(body) = registry.get_mut(id) {
                    let rest = *body.rest_scale.get_or_insert(body.transform.scale);
                    body.transform.scale = rest * self.highlight;
                }
                self.selected = Some(id);
                ui.signal(UiSignal::ShowInfo { title, description });
                SelectionChange::Selected(id)
            }
            None => {
                if self.selected.is_none() {
                    return SelectionChange::Idle;
                }
                self.restore(registry);
                ui.signal(UiSignal::HideInfo);
                SelectionChange::Cleared
            }
        }
    }

    /// Restore the selected body's saved scale and clear the selection.
    fn restore(&mut self, registry: &mut BodyRegistry) {
        if let Some(previous) = self.selected.take() {
            if let Some(body) = registry.get_mut(previous) {
                if let Some(rest) = body.rest_scale {
                    body.transform.scale = rest;
                }
            }
        }
    }
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new(DEFAULT_HIGHLIGHT_SCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::simulation::SimulationConfig;
    use crate::assets::manifest::{BodyDesc, SystemManifest};
    use glam::Vec3;

    fn registry() -> BodyRegistry {
        BodyRegistry::from_manifest(&SystemManifest {
            config: SimulationConfig::default(),
            bodies: vec![
                BodyDesc::new("Sun").with_model("sun.glb", 32.0).with_description("Star"),
                BodyDesc::new("Earth")
                    .with_orbit(100.0, 1.0, 0.0)
                    .with_model("earth.glb", 10.0)
                    .with_description("Home"),
            ],
        })
        .unwrap()
    }

    fn scale(reg: &BodyRegistry, id: u32) -> Vec3 {
        reg.get(BodyId(id)).unwrap().transform.scale
    }

    #[test]
    fn select_highlights_and_shows_info() {
        let mut reg = registry();
        let mut sel = SelectionController::default();
        let mut ui = Vec::new();

        let change = sel.apply(Some(BodyId(1)), &mut reg, &mut ui);
        assert_eq!(change, SelectionChange::Selected(BodyId(1)));
        assert_eq!(sel.selected(), Some(BodyId(1)));
        assert!((scale(&reg, 1) - Vec3::splat(10.5)).length() < 1e-5);
        assert_eq!(
            ui,
            vec![UiSignal::ShowInfo { title: "Earth".into(), description: "Home".into() }]
        );
    }

    #[test]
    fn reselecting_is_idempotent() {
        let mut reg = registry();
        let mut sel = SelectionController::default();
        let mut ui = Vec::new();

        sel.apply(Some(BodyId(1)), &mut reg, &mut ui);
        let before = scale(&reg, 1);
        let change = sel.apply(Some(BodyId(1)), &mut reg, &mut ui);
        assert_eq!(change, SelectionChange::Unchanged);
        assert_eq!(scale(&reg, 1), before);
        assert_eq!(ui.len(), 1);
    }

    #[test]
    fn switching_restores_previous_scale_exactly() {
        let mut reg = registry();
        let mut sel = SelectionController::default();
        let mut ui = Vec::new();
        let sun_before = scale(&reg, 0);

        sel.apply(Some(BodyId(0)), &mut reg, &mut ui);
        assert_ne!(scale(&reg, 0), sun_before);
        sel.apply(Some(BodyId(1)), &mut reg, &mut ui);
        assert_eq!(scale(&reg, 0), sun_before);
        assert_eq!(sel.selected(), Some(BodyId(1)));
    }

    #[test]
    fn repeated_cycles_do_not_compound() {
        let mut reg = registry();
        let mut sel = SelectionController::default();
        let mut ui = Vec::new();
        let before = scale(&reg, 1);
        for _ in 0..5 {
            sel.apply(Some(BodyId(1)), &mut reg, &mut ui);
            sel.apply(None, &mut reg, &mut ui);
        }
        assert_eq!(scale(&reg, 1), before);
    }

    #[test]
    fn miss_clears_and_hides_once() {
        let mut reg = registry();
        let mut sel = SelectionController::default();
        let mut ui = Vec::new();

        sel.apply(Some(BodyId(1)), &mut reg, &mut ui);
        ui.clear();
        assert_eq!(sel.apply(None, &mut reg, &mut ui), SelectionChange::Cleared);
        assert_eq!(sel.apply(None, &mut reg, &mut ui), SelectionChange::Idle);
        assert_eq!(ui, vec![UiSignal::HideInfo]);
        assert_eq!(scale(&reg, 1), Vec3::splat(10.0));
        assert_eq!(sel.selected(), None);
    }

    #[test]
    fn miss_without_selection_is_silent() {
        let mut reg = registry();
        let mut sel = SelectionController::default();
        let mut ui = Vec::new();
        assert_eq!(sel.apply(None, &mut reg, &mut ui), SelectionChange::Idle);
        assert!(ui.is_empty());
    }
}
