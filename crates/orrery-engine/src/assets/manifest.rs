use std::collections::HashSet;
use serde::{Deserialize, Serialize};

use crate::api::simulation::SimulationConfig;
use crate::error::{OrreryError, OrreryResult};

/// System manifest describing every body and the simulation settings.
/// Loaded from a JSON file at runtime, or built in via [`SystemManifest::solar_system`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemManifest {
    /// Simulation settings (time step, highlight, camera defaults).
    #[serde(default)]
    pub config: SimulationConfig,
    /// Bodies in processing order. Order is preserved by the registry.
    pub bodies: Vec<BodyDesc>,
}

/// Static parameters of one celestial body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    /// Unique display name, also the stable identifier.
    pub name: String,
    /// Distance from the orbit center. 0 for the central body.
    #[serde(default)]
    pub orbit_radius: f64,
    /// Revolutions per simulation-time unit (signed).
    #[serde(default)]
    pub orbit_speed: f64,
    /// Starting angle in radians.
    #[serde(default)]
    pub initial_phase: f64,
    /// Self-rotation in radians per tick.
    #[serde(default)]
    pub rotation_speed: f64,
    /// Axial tilt in degrees (converted to radians at setup).
    #[serde(default)]
    pub axial_tilt: f64,
    /// Name of the body this one orbits, if any.
    #[serde(default)]
    pub parent: Option<String>,
    /// Asset path for the drawable. Bodies without one are never loaded.
    #[serde(default)]
    pub model_path: Option<String>,
    /// Uniform base scale of the drawable.
    #[serde(default = "default_model_scale")]
    pub model_scale: f32,
    /// Text shown in the info panel.
    #[serde(default)]
    pub description: String,
    /// Optional display color, 0xRRGGBB.
    #[serde(default)]
    pub color: Option<u32>,
}

fn default_model_scale() -> f32 {
    1.0
}

impl BodyDesc {
    /// A body with only a name; every other field takes its default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            orbit_radius: 0.0,
            orbit_speed: 0.0,
            initial_phase: 0.0,
            rotation_speed: 0.0,
            axial_tilt: 0.0,
            parent: None,
            model_path: None,
            model_scale: default_model_scale(),
            description: String::new(),
            color: None,
        }
    }

    pub fn with_orbit(mut self, radius: f64, speed: f64, phase: f64) -> Self {
        self.orbit_radius = radius;
        self.orbit_speed = speed;
        self.initial_phase = phase;
        self
    }

    pub fn with_rotation(mut self, rotation_speed: f64) -> Self {
        self.rotation_speed = rotation_speed;
        self
    }

    pub fn with_tilt(mut self, degrees: f64) -> Self {
        self.axial_tilt = degrees;
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_model(mut self, path: impl Into<String>, scale: f32) -> Self {
        self.model_path = Some(path.into());
        self.model_scale = scale;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    /// Whether this is a central body: no parent and no orbit.
    pub fn is_central(&self) -> bool {
        self.parent.is_none() && self.orbit_radius == 0.0
    }

    fn check_finite(&self, field: &'static str, value: f64) -> OrreryResult<()> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(self.invalid(field, "must be finite"))
        }
    }

    fn invalid(&self, field: &'static str, reason: &'static str) -> OrreryError {
        OrreryError::InvalidParameter {
            body: self.name.clone(),
            field,
            reason,
        }
    }

    fn validate(&self) -> OrreryResult<()> {
        if self.name.is_empty() {
            return Err(self.invalid("name", "must not be empty"));
        }
        self.check_finite("orbit_radius", self.orbit_radius)?;
        self.check_finite("orbit_speed", self.orbit_speed)?;
        self.check_finite("initial_phase", self.initial_phase)?;
        self.check_finite("rotation_speed", self.rotation_speed)?;
        self.check_finite("axial_tilt", self.axial_tilt)?;
        if self.orbit_radius < 0.0 {
            return Err(self.invalid("orbit_radius", "must be non-negative"));
        }
        if !(self.model_scale.is_finite() && self.model_scale > 0.0) {
            return Err(self.invalid("model_scale", "must be positive"));
        }
        if self.parent.as_deref() == Some(self.name.as_str()) {
            return Err(OrreryError::ParentCycle(self.name.clone()));
        }
        Ok(())
    }
}

impl SystemManifest {
    /// Parse a manifest from a JSON string and validate it.
    pub fn from_json(json: &str) -> OrreryResult<Self> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Check the simulation settings, per-body parameters, name uniqueness,
    /// parent references and the single-central-body rule. Parent cycles are detected when the
    /// hierarchy order is built.
    pub fn validate(&self) -> OrreryResult<()> {
        self.config.validate()?;

        let mut names = HashSet::with_capacity(self.bodies.len());
        for body in &self.bodies {
            body.validate()?;
            if !names.insert(body.name.as_str()) {
                return Err(OrreryError::DuplicateBody(body.name.clone()));
            }
        }

        for body in &self.bodies {
            if let Some(parent) = &body.parent {
                if !names.contains(parent.as_str()) {
                    return Err(OrreryError::MissingParentReference {
                        body: body.name.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }

        let central: Vec<String> = self
            .bodies
            .iter()
            .filter(|b| b.is_central())
            .map(|b| b.name.clone())
            .collect();
        match central.len() {
            0 => Err(OrreryError::NoCentralBody),
            1 => Ok(()),
            _ => Err(OrreryError::MultipleCentralBodies(central)),
        }
    }

    /// The built-in solar system: the Sun, eight planets, and Earth's Moon.
    /// Distances and tilts are exaggerated for readability.
    pub fn solar_system() -> Self {
        let bodies = vec![
            BodyDesc::new("Sun")
                .with_rotation(0.001)
                .with_tilt(7.25)
                .with_model("models/Sun.glb", 32.0)
                .with_description(
                    "The Sun is the star at the center of our Solar System. It's a nearly perfect sphere of hot plasma, with internal convective motion that generates a magnetic field.",
                ),
            BodyDesc::new("Mercury")
                .with_orbit(6000.0, 0.008, 1.2)
                .with_rotation(0.004)
                .with_tilt(0.09)
                .with_model("models/Mercury.glb", 6.0)
                .with_color(0xa9a9a9)
                .with_description(
                    "Mercury is the smallest and innermost planet in the Solar System. It completes an orbit around the Sun every 88 Earth days.",
                ),
            BodyDesc::new("Venus")
                .with_orbit(11000.0, 0.006, 3.7)
                .with_rotation(0.002)
                .with_tilt(532.2)
                .with_model("models/Venus.glb", 7.34)
                .with_color(0xe6e6e6)
                .with_description(
                    "Venus is the second planet from the Sun and Earth's closest planetary neighbor. It's similar in structure and size to Earth, but its thick atmosphere traps heat in a runaway greenhouse effect.",
                ),
            BodyDesc::new("Earth")
                .with_orbit(16000.0, 0.005, 5.1)
                .with_rotation(0.01)
                .with_tilt(70.32)
                .with_model("models/Earth.glb", 10.0)
                .with_color(0x3366ff)
                .with_description(
                    "Earth is the third planet from the Sun and the only astronomical object known to harbor life. About 71% of Earth's surface is water-covered.",
                ),
            BodyDesc::new("Moon")
                .with_orbit(1500.0, 0.05, 0.0)
                .with_parent("Earth")
                .with_rotation(0.01)
                .with_tilt(6.68)
                .with_model("models/Moon.glb", 2.0)
                .with_description(
                    "The Moon is Earth's only natural satellite. It is the fifth-largest satellite in the Solar System and the largest among planetary satellites relative to the size of the planet that it orbits.",
                ),
            BodyDesc::new("Mars")
                .with_orbit(24000.0, 0.004, 0.6)
                .with_rotation(0.008)
                .with_tilt(75.57)
                .with_model("models/Mars.glb", 7.0)
                .with_color(0xcc3300)
                .with_description(
                    "Mars is the fourth planet from the Sun and the second-smallest planet in the Solar System. Known as the 'Red Planet' due to its reddish appearance from iron oxide on its surface.",
                ),
            BodyDesc::new("Jupiter")
                .with_orbit(32000.0, 0.002, 2.2)
                .with_rotation(0.01)
                .with_tilt(9.39)
                .with_model("models/Jupiter.glb", 18.0)
                .with_color(0xe6b800)
                .with_description(
                    "Jupiter is the fifth planet from the Sun and the largest in the Solar System. It's a gas giant with a mass two and a half times that of all the other planets combined.",
                ),
            BodyDesc::new("Saturn")
                .with_orbit(40000.0, 0.0015, 4.8)
                .with_rotation(0.008)
                .with_tilt(80.19)
                .with_model("models/Saturn.glb", 2.0)
                .with_color(0xd9c36c)
                .with_description(
                    "Saturn is the sixth planet from the Sun and has the most extensive ring system of any planet. It's known for its prominent rings, which are mostly made of ice particles with a smaller amount of rocky debris.",
                ),
            BodyDesc::new("Uranus")
                .with_orbit(48000.0, 0.001, 3.2)
                .with_rotation(0.012)
                .with_tilt(293.31)
                .with_model("models/Uranus.glb", 8.0)
                .with_color(0x99ccff)
                .with_description(
                    "Uranus is the seventh planet from the Sun. It has the third-largest planetary radius and fourth-largest planetary mass in the Solar System. Like the other gas giants, it has no solid surface.",
                ),
            BodyDesc::new("Neptune")
                .with_orbit(56000.0, 0.0008, 1.8)
                .with_rotation(0.01)
                .with_tilt(84.96)
                .with_model("models/Neptune.glb", 8.0)
                .with_color(0x0066ff)
                .with_description(
                    "Neptune is the eighth and farthest planet from the Sun. It's the fourth-largest planet by diameter and the densest giant planet. Neptune's atmosphere features active and visible weather patterns.",
                ),
        ];
        Self {
            config: SimulationConfig::default(),
            bodies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_system_is_valid() {
        let manifest = SystemManifest::solar_system();
        manifest.validate().unwrap();
        assert_eq!(manifest.bodies.len(), 10);
        let moon = manifest.bodies.iter().find(|b| b.name == "Moon").unwrap();
        assert_eq!(moon.parent.as_deref(), Some("Earth"));
    }

    #[test]
    fn parse_minimal_manifest_with_defaults() {
        let json = r#"{
            "bodies": [
                { "name": "Sun" },
                { "name": "Planet", "orbit_radius": 100, "orbit_speed": 1 },
                { "name": "Moon", "orbit_radius": 10, "orbit_speed": 5, "parent": "Planet",
                  "model_path": "moon.glb" }
            ]
        }"#;
        let manifest = SystemManifest::from_json(json).unwrap();
        assert_eq!(manifest.bodies.len(), 3);
        assert_eq!(manifest.bodies[0].model_scale, 1.0);
        assert_eq!(manifest.bodies[1].initial_phase, 0.0);
        assert_eq!(manifest.bodies[2].model_path.as_deref(), Some("moon.glb"));
        assert_eq!(manifest.config.time_step, 0.01);
    }

    #[test]
    fn missing_parent_is_rejected() {
        let json = r#"{
            "bodies": [
                { "name": "Sun" },
                { "name": "Moon", "orbit_radius": 10, "parent": "Earth" }
            ]
        }"#;
        match SystemManifest::from_json(json) {
            Err(OrreryError::MissingParentReference { body, parent }) => {
                assert_eq!(body, "Moon");
                assert_eq!(parent, "Earth");
            }
            other => panic!("expected MissingParentReference, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let manifest = SystemManifest {
            config: SimulationConfig::default(),
            bodies: vec![
                BodyDesc::new("Sun"),
                BodyDesc::new("Earth").with_orbit(10.0, 1.0, 0.0),
                BodyDesc::new("Earth").with_orbit(20.0, 1.0, 0.0),
            ],
        };
        assert!(matches!(manifest.validate(), Err(OrreryError::DuplicateBody(n)) if n == "Earth"));
    }

    #[test]
    fn central_body_count_enforced() {
        let none = SystemManifest {
            config: SimulationConfig::default(),
            bodies: vec![BodyDesc::new("A").with_orbit(1.0, 1.0, 0.0)],
        };
        assert!(matches!(none.validate(), Err(OrreryError::NoCentralBody)));

        let two = SystemManifest {
            config: SimulationConfig::default(),
            bodies: vec![BodyDesc::new("A"), BodyDesc::new("B")],
        };
        assert!(matches!(two.validate(), Err(OrreryError::MultipleCentralBodies(v)) if v.len() == 2));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let manifest = SystemManifest {
            config: SimulationConfig::default(),
            bodies: vec![
                BodyDesc::new("Sun"),
                BodyDesc::new("Bad").with_orbit(-5.0, 1.0, 0.0),
            ],
        };
        assert!(matches!(
            manifest.validate(),
            Err(OrreryError::InvalidParameter { field: "orbit_radius", .. })
        ));

        let manifest = SystemManifest {
            config: SimulationConfig::default(),
            bodies: vec![BodyDesc::new("Sun").with_model("sun.glb", 0.0)],
        };
        assert!(matches!(
            manifest.validate(),
            Err(OrreryError::InvalidParameter { field: "model_scale", .. })
        ));
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let manifest = SystemManifest {
            config: SimulationConfig::default(),
            bodies: vec![
                BodyDesc::new("Sun"),
                BodyDesc::new("Loop").with_orbit(1.0, 1.0, 0.0).with_parent("Loop"),
            ],
        };
        assert!(matches!(manifest.validate(), Err(OrreryError::ParentCycle(n)) if n == "Loop"));
    }

    #[test]
    fn malformed_json_is_a_manifest_error() {
        assert!(matches!(
            SystemManifest::from_json("{ not json"),
            Err(OrreryError::Manifest(_))
        ));
    }
}
