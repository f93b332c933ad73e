/// Viewer configuration loaded from TOML
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::path::Path;

use crate::animation::{
    Easing, EntranceAnimator, RearmMode, ENTRANCE_DURATION_MS, ENTRANCE_START_Y,
};
use crate::error::{ConfigError, Result};
use crate::panel::{PanelRanges, Range};
use crate::pointer::{PointerLightTracker, LIGHT_DEPTH, LIGHT_RANGE};
use crate::projection::Camera;

fn default_duration() -> f32 {
    ENTRANCE_DURATION_MS
}

fn default_start_y() -> f32 {
    ENTRANCE_START_Y
}

fn default_light_range() -> f32 {
    LIGHT_RANGE
}

fn default_light_depth() -> f32 {
    LIGHT_DEPTH
}

fn default_expanded() -> bool {
    true
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 0.0, 4.0]
}

fn default_fov() -> f32 {
    45.0
}

fn default_position_range() -> RangeConfig {
    RangeConfig { min: -5.0, max: 5.0 }
}

fn default_rotation_range() -> RangeConfig {
    RangeConfig { min: 0.0, max: TAU }
}

fn default_scale_range() -> RangeConfig {
    RangeConfig { min: 0.0, max: 5.0 }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntranceConfig {
    #[serde(default = "default_duration")]
    pub duration_ms: f32,
    #[serde(default = "default_start_y")]
    pub start_y: f32,
    #[serde(default)]
    pub easing: Easing,
    #[serde(default)]
    pub rearm: RearmMode,
}

impl Default for EntranceConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_duration(),
            start_y: default_start_y(),
            easing: Easing::default(),
            rearm: RearmMode::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerConfig {
    #[serde(default = "default_light_range")]
    pub light_range: f32,
    #[serde(default = "default_light_depth")]
    pub light_depth: f32,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            light_range: default_light_range(),
            light_depth: default_light_depth(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeConfig {
    pub min: f32,
    pub max: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    #[serde(default = "default_position_range")]
    pub position: RangeConfig,
    #[serde(default = "default_rotation_range")]
    pub rotation: RangeConfig,
    #[serde(default = "default_scale_range")]
    pub scale: RangeConfig,
    #[serde(default = "default_expanded")]
    pub expanded: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            position: default_position_range(),
            rotation: default_rotation_range(),
            scale: default_scale_range(),
            expanded: default_expanded(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            fov_degrees: default_fov(),
        }
    }
}

/// Top-level viewer settings; every section is optional
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub entrance: EntranceConfig,
    #[serde(default)]
    pub pointer: PointerConfig,
    #[serde(default)]
    pub panel: PanelConfig,
    #[serde(default)]
    pub camera: CameraConfig,
}

impl ViewerConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: ViewerConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("loading viewer config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        let ranges = [
            ("panel.position", self.panel.position),
            ("panel.rotation", self.panel.rotation),
            ("panel.scale", self.panel.scale),
        ];
        for (name, range) in ranges {
            if !range.min.is_finite() || !range.max.is_finite() || range.min > range.max {
                return Err(ConfigError::InvalidRange {
                    name,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        Ok(())
    }

    pub fn animator(&self) -> EntranceAnimator {
        EntranceAnimator::new(
            self.entrance.start_y,
            self.entrance.duration_ms,
            self.entrance.easing,
        )
        .with_rearm_mode(self.entrance.rearm)
    }

    pub fn light_tracker(&self) -> PointerLightTracker {
        PointerLightTracker::new(self.pointer.light_range, self.pointer.light_depth)
    }

    pub fn panel_ranges(&self) -> PanelRanges {
        let range = |r: RangeConfig| Range::new(r.min, r.max);
        PanelRanges {
            position: range(self.panel.position),
            rotation: range(self.panel.rotation),
            scale: range(self.panel.scale),
        }
    }

    pub fn camera(&self, width: u32, height: u32) -> Camera {
        let [x, y, z] = self.camera.position;
        let mut camera = Camera::new(width, height);
        camera.position = nalgebra::Point3::new(x, y, z);
        camera.fov = self.camera.fov_degrees.to_radians();
        camera
    }
}
