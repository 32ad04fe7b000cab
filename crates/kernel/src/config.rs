use folio_input::Key;
use folio_scene::Color;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Errors from loading or validating a showcase configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format '{0}' (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Full description of a showcase scene and its tuning.
///
/// `Default` is the built-in portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowcaseConfig {
    /// Seed for the reset spin RNG.
    pub seed: u64,
    pub physics: PhysicsConfig,
    pub camera: CameraConfig,
    pub labels: LabelOffsets,
    pub floor: FloorConfig,
    pub controls: ControlsConfig,
    pub exhibits: Vec<ExhibitConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: Vec3,
    /// Ceiling on a single physics step, in seconds.
    pub max_step: f32,
    /// Reset spin is sampled per axis from `[-spin_range, spin_range)`.
    pub spin_range: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.82, 0.0),
            max_step: 0.01,
            spin_range: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub damping: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(7.0, 6.0, 8.0),
            target: Vec3::ZERO,
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            damping: 0.05,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
        }
    }
}

/// Vertical label offsets from a highlighted exhibit's centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelOffsets {
    pub top: f32,
    pub bottom: f32,
}

impl Default for LabelOffsets {
    fn default() -> Self {
        Self {
            top: 4.0,
            bottom: -5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorConfig {
    pub position: Vec3,
    /// Full edge lengths of the visual slab.
    pub size: Vec3,
    pub collider_half_extents: Vec3,
    pub visible: bool,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, -2.0, 0.0),
            size: Vec3::new(20.0, 1.0, 20.0),
            collider_half_extents: Vec3::new(20.0, 0.5, 20.0),
            visible: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Key name, e.g. `Enter` or `r`.
    pub reset_key: String,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            reset_key: "Enter".into(),
        }
    }
}

/// How an exhibit's faces are drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SurfaceSpec {
    Normal,
    Image {
        path: PathBuf,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tint: Option<Color>,
    },
    Video {
        path: PathBuf,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tint: Option<Color>,
    },
    /// Any other `kind`; the exhibit falls back to a flat red surface.
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelConfig {
    pub title: String,
    pub body: String,
}

impl LabelConfig {
    fn new(title: &str, body: &str) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExhibitConfig {
    pub name: String,
    pub position: Vec3,
    pub surface: SurfaceSpec,
    /// Angular velocity at spawn.
    #[serde(default)]
    pub spin: Vec3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_label: Option<LabelConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_label: Option<LabelConfig>,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            physics: PhysicsConfig::default(),
            camera: CameraConfig::default(),
            labels: LabelOffsets::default(),
            floor: FloorConfig::default(),
            controls: ControlsConfig::default(),
            exhibits: portfolio_exhibits(),
        }
    }
}

impl ShowcaseConfig {
    /// Load from a `.yaml`/`.yml` or `.json` file and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let config: Self = match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&text)?,
            "json" => serde_json::from_str(&text)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };
        config.validate()?;
        tracing::debug!(
            path = %path.display(),
            exhibits = config.exhibits.len(),
            "loaded showcase config"
        );
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn reset_key(&self) -> Result<Key, ConfigError> {
        self.controls
            .reset_key
            .parse()
            .map_err(ConfigError::Invalid)
    }

    /// Reject values the loop or the solver cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        let p = &self.physics;
        if !p.gravity.is_finite() {
            return invalid("physics.gravity must be finite".into());
        }
        if !(p.max_step.is_finite() && p.max_step > 0.0) {
            return invalid(format!("physics.max_step must be positive, got {}", p.max_step));
        }
        if !(p.spin_range.is_finite() && p.spin_range >= 0.0) {
            return invalid(format!(
                "physics.spin_range must be non-negative, got {}",
                p.spin_range
            ));
        }

        let c = &self.camera;
        if !(c.position.is_finite() && c.target.is_finite()) || c.position == c.target {
            return invalid(
                "camera.position and camera.target must be distinct finite points".into(),
            );
        }
        if !(c.fov_degrees > 0.0 && c.fov_degrees < 180.0) {
            return invalid(format!("camera.fov_degrees out of range: {}", c.fov_degrees));
        }
        if !(c.near > 0.0 && c.far.is_finite() && c.far > c.near) {
            return invalid(format!(
                "camera clip planes must satisfy 0 < near < far, got {} / {}",
                c.near, c.far
            ));
        }
        for (field, value) in [
            ("damping", c.damping),
            ("rotate_speed", c.rotate_speed),
            ("zoom_speed", c.zoom_speed),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return invalid(format!("camera.{field} must be non-negative, got {value}"));
            }
        }

        let f = &self.floor;
        let positive = |v: Vec3| v.is_finite() && v.cmpgt(Vec3::ZERO).all();
        if !(f.position.is_finite() && positive(f.size) && positive(f.collider_half_extents)) {
            return invalid("floor size and collider extents must be positive".into());
        }

        self.reset_key()?;

        let mut names = BTreeSet::new();
        for e in &self.exhibits {
            if e.name.trim().is_empty() {
                return invalid("exhibit name must not be empty".into());
            }
            if !names.insert(e.name.as_str()) {
                return invalid(format!("duplicate exhibit name '{}'", e.name));
            }
            if !(e.position.is_finite() && e.spin.is_finite()) {
                return invalid(format!("exhibit '{}' has a non-finite position or spin", e.name));
            }
        }
        Ok(())
    }
}

fn video(path: &str, hex: u32) -> SurfaceSpec {
    SurfaceSpec::Video {
        path: path.into(),
        tint: Some(Color::from_hex(hex)),
    }
}

/// The built-in portfolio: seven exhibits, listed in registry order.
fn portfolio_exhibits() -> Vec<ExhibitConfig> {
    vec![
        ExhibitConfig {
            name: "paradigm".into(),
            position: Vec3::new(0.0, 5.0, 4.0),
            surface: video("assets/paradim.mp4", 0x6a8caf),
            spin: Vec3::ZERO,
            top_label: Some(LabelConfig::new(
                "Perception Paradigms",
                "The Mathematical Abstractions used to represent the world are critical in robotics.",
            )),
            bottom_label: Some(LabelConfig::new(
                "M1: Creative Technology",
                "I studied the different paradigms used in robotics, ranging from point clouds to neural networks.",
            )),
        },
        ExhibitConfig {
            name: "nerf".into(),
            position: Vec3::new(4.0, 8.0, 0.0),
            surface: video("assets/nerf.mp4", 0xc98f5a),
            spin: Vec3::Y,
            top_label: Some(LabelConfig::new(
                "NeRF: Neural Radiance Fields",
                "NeRF is a technique used to render 3D objects from 2D images.",
            )),
            bottom_label: Some(LabelConfig::new(
                "M1: Creative Technology",
                "I studied how to represent 3D objects using neural networks.",
            )),
        },
        ExhibitConfig {
            name: "robot arm".into(),
            position: Vec3::new(0.0, 5.0, -4.0),
            surface: video("assets/robotarm.mp4", 0x7fb069),
            spin: Vec3::Y,
            top_label: Some(LabelConfig::new(
                "Isaac Sim",
                "Isaac Sim is a robotics simulator built by Nvidia, enabling a new generation of Deep Learning for Robotics.",
            )),
            bottom_label: Some(LabelConfig::new(
                "M1: Creative Technology",
                "I used Isaac Sim to build a simple robot arm and explore the basics of RL.",
            )),
        },
        ExhibitConfig {
            name: "Arctic Glove".into(),
            position: Vec3::new(-4.0, 10.0, 0.0),
            surface: video("assets/glove.mp4", 0xd9e8f5),
            spin: Vec3::Y,
            top_label: Some(LabelConfig::new(
                "Arctic Glove",
                "Extreme conditions such as the arctic require special equipment for Human Machine Interaction (HMI).",
            )),
            bottom_label: Some(LabelConfig::new(
                "M1: Creative Technology",
                "I designed a glove and embedded machine learning algorithms for HMI in the arctic.",
            )),
        },
        ExhibitConfig {
            name: "me".into(),
            position: Vec3::new(0.0, 20.0, 0.0),
            surface: SurfaceSpec::Image {
                path: "assets/me.jpeg".into(),
                tint: Some(Color::from_hex(0xe0b89a)),
            },
            spin: Vec3::new(1.0, 5.0, 0.0),
            top_label: Some(LabelConfig::new(
                "Me",
                "I like to build cool stuff and work on hard problems.",
            )),
            bottom_label: None,
        },
        ExhibitConfig {
            name: "SDXL".into(),
            position: Vec3::new(0.0, 10.0, -5.0),
            surface: video("assets/sdxl.mp4", 0xb07fc9),
            spin: Vec3::Y,
            top_label: Some(LabelConfig::new(
                "Artists and Machines",
                "SDXL Turbo is a new generation of diffusion models that allow real-time applications.",
            )),
            bottom_label: Some(LabelConfig::new(
                "M2: Creative Technology",
                "I developed an application that allows artists to interact with SDXL Turbo.",
            )),
        },
        ExhibitConfig {
            name: "plant".into(),
            position: Vec3::new(-2.0, 15.0, 2.0),
            surface: video("assets/plant.mp4", 0x5aa05a),
            spin: Vec3::new(1.0, 0.0, 2.0),
            top_label: Some(LabelConfig::new(
                "Internet-of-Plants",
                "What can the cloud enable for plants?",
            )),
            bottom_label: Some(LabelConfig::new(
                "M2: Creative Technology",
                "I studied, with Matthieu Segui, how plants can be used to create a new generation of IoT devices.",
            )),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_is_the_portfolio() {
        let c = ShowcaseConfig::default();
        c.validate().unwrap();
        assert_eq!(c.exhibits.len(), 7);
        assert_eq!(c.exhibits[0].name, "paradigm");
        assert_eq!(c.physics.max_step, 0.01);
        assert_eq!(c.reset_key().unwrap(), Key::Enter);

        let me = c.exhibits.iter().find(|e| e.name == "me").unwrap();
        assert!(matches!(me.surface, SurfaceSpec::Image { .. }));
        assert!(me.top_label.is_some());
        assert!(me.bottom_label.is_none());
    }

    #[test]
    fn yaml_round_trip_file() {
        let c = ShowcaseConfig::default();
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(c.to_yaml().unwrap().as_bytes()).unwrap();
        let loaded = ShowcaseConfig::load(file.path()).unwrap();
        assert_eq!(loaded, c);
    }

    #[test]
    fn json_file_loads() {
        let c = ShowcaseConfig::default();
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(c.to_json().unwrap().as_bytes()).unwrap();
        assert_eq!(ShowcaseConfig::load(file.path()).unwrap(), c);
    }

    #[test]
    fn partial_yaml_uses_defaults() {
        let yaml = r#"
seed: 7
physics:
  max_step: 0.02
exhibits:
  - name: solo
    position: [0.0, 5.0, 0.0]
    surface:
      kind: normal
"#;
        let c: ShowcaseConfig = serde_yaml::from_str(yaml).unwrap();
        c.validate().unwrap();
        assert_eq!(c.seed, 7);
        assert_eq!(c.physics.max_step, 0.02);
        assert_eq!(c.physics.spin_range, 1.0);
        assert_eq!(c.camera, CameraConfig::default());
        assert_eq!(c.exhibits.len(), 1);
        assert_eq!(c.exhibits[0].spin, Vec3::ZERO);
    }

    #[test]
    fn unknown_surface_kind_parses_as_unsupported() {
        let yaml = r#"
name: odd
position: [0.0, 0.0, 0.0]
surface:
  kind: hologram
  path: assets/x.holo
"#;
        let e: ExhibitConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(e.surface, SurfaceSpec::Unsupported);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        assert!(matches!(
            ShowcaseConfig::load(file.path()),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            ShowcaseConfig::load("/nonexistent/folio.yaml"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut c = ShowcaseConfig::default();
        c.physics.max_step = 0.0;
        assert!(matches!(c.validate(), Err(ConfigError::Invalid(_))));

        let mut c = ShowcaseConfig::default();
        c.exhibits[1].name = c.exhibits[0].name.clone();
        assert!(c.validate().is_err());

        let mut c = ShowcaseConfig::default();
        c.controls.reset_key = "NotAKey".into();
        assert!(c.validate().is_err());

        let mut c = ShowcaseConfig::default();
        c.camera.near = 0.0;
        assert!(c.validate().is_err());

        let mut c = ShowcaseConfig::default();
        c.physics.spin_range = f32::NAN;
        assert!(c.validate().is_err());
    }

    #[test]
    fn validation_rejects_non_finite_camera_and_floor() {
        let cases: [fn(&mut ShowcaseConfig); 6] = [
            |c| c.camera.far = f32::INFINITY,
            |c| c.camera.damping = f32::NAN,
            |c| c.camera.rotate_speed = f32::INFINITY,
            |c| c.camera.zoom_speed = f32::NAN,
            |c| c.camera.zoom_speed = -1.0,
            |c| c.floor.collider_half_extents = Vec3::new(f32::INFINITY, 0.5, 10.0),
        ];
        for (i, mutate) in cases.iter().enumerate() {
            let mut c = ShowcaseConfig::default();
            mutate(&mut c);
            assert!(
                matches!(c.validate(), Err(ConfigError::Invalid(_))),
                "case {i} should be rejected"
            );
        }
    }

    #[test]
    fn infinite_far_plane_in_yaml_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "camera:\n  far: .inf").unwrap();
        assert!(matches!(
            ShowcaseConfig::load(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn empty_exhibit_list_is_valid() {
        let c = ShowcaseConfig {
            exhibits: Vec::new(),
            ..ShowcaseConfig::default()
        };
        c.validate().unwrap();
    }
}
