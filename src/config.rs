//! Viewer settings.
//!
//! Defaults reproduce the original lab setups. When `GEOMLAB_CONFIG` names a
//! TOML file, its values override the defaults section by section. The file
//! is only ever read.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::interaction::{REFLECTANCE_RANGE, SEGMENT_RANGE};

pub const CONFIG_ENV: &str = "GEOMLAB_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ViewerConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub frame: FrameConfig,
    #[serde(default)]
    pub barrel: BarrelConfig,
    #[serde(default)]
    pub shaded_barrel: ShadedBarrelConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub vsync: bool,
}

/// Sleep between presented frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub interval_ms: u64,
    pub color_cycle_interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarrelConfig {
    pub height: f32,
    pub radius: f32,
    pub initial_segments: u32,
    pub initial_reflectance: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadedBarrelConfig {
    pub height: f32,
    pub radius: f32,
    pub segments: u32,
    pub light_azimuth: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 780,
            title: "Geometry Labs".to_string(),
            vsync: false,
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            interval_ms: 40,
            color_cycle_interval_ms: 20,
        }
    }
}

impl Default for BarrelConfig {
    fn default() -> Self {
        Self {
            height: 2.0,
            radius: 1.0,
            initial_segments: 10,
            initial_reflectance: 0.1,
        }
    }
}

impl Default for ShadedBarrelConfig {
    fn default() -> Self {
        Self {
            height: 15.0,
            radius: 3.0,
            segments: 20,
            light_azimuth: 45.0,
        }
    }
}

pub const SHADED_SEGMENT_RANGE: (u32, u32) = (4, 40);

impl FrameConfig {
    pub fn interval(&self, color_cycle: bool) -> Duration {
        if color_cycle {
            Duration::from_millis(self.color_cycle_interval_ms)
        } else {
            Duration::from_millis(self.interval_ms)
        }
    }
}

impl ViewerConfig {
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config.sanitized())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    /// Replaces out-of-range values with the nearest usable value, or the
    /// default when there is none.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if self.window.width == 0 || self.window.height == 0 {
            tracing::warn!(
                width = self.window.width,
                height = self.window.height,
                "window size must be non-zero, using default"
            );
            self.window.width = defaults.window.width;
            self.window.height = defaults.window.height;
        }

        positive_or_default("barrel.height", &mut self.barrel.height, defaults.barrel.height);
        positive_or_default("barrel.radius", &mut self.barrel.radius, defaults.barrel.radius);
        positive_or_default(
            "shaded_barrel.height",
            &mut self.shaded_barrel.height,
            defaults.shaded_barrel.height,
        );
        positive_or_default(
            "shaded_barrel.radius",
            &mut self.shaded_barrel.radius,
            defaults.shaded_barrel.radius,
        );

        let segments = self
            .barrel
            .initial_segments
            .clamp(SEGMENT_RANGE.0, SEGMENT_RANGE.1);
        if segments != self.barrel.initial_segments {
            tracing::warn!(
                value = self.barrel.initial_segments,
                clamped = segments,
                "barrel.initial_segments out of range"
            );
            self.barrel.initial_segments = segments;
        }

        let reflectance = if self.barrel.initial_reflectance.is_nan() {
            defaults.barrel.initial_reflectance
        } else {
            self.barrel
                .initial_reflectance
                .clamp(REFLECTANCE_RANGE.0, REFLECTANCE_RANGE.1)
        };
        if reflectance != self.barrel.initial_reflectance {
            tracing::warn!(
                value = self.barrel.initial_reflectance,
                clamped = reflectance,
                "barrel.initial_reflectance out of range"
            );
            self.barrel.initial_reflectance = reflectance;
        }

        let shaded = self
            .shaded_barrel
            .segments
            .clamp(SHADED_SEGMENT_RANGE.0, SHADED_SEGMENT_RANGE.1);
        if shaded != self.shaded_barrel.segments {
            tracing::warn!(
                value = self.shaded_barrel.segments,
                clamped = shaded,
                "shaded_barrel.segments out of range"
            );
            self.shaded_barrel.segments = shaded;
        }

        let azimuth = if self.shaded_barrel.light_azimuth.is_finite() {
            self.shaded_barrel.light_azimuth.clamp(0.0, 360.0)
        } else {
            defaults.shaded_barrel.light_azimuth
        };
        if azimuth.to_bits() != self.shaded_barrel.light_azimuth.to_bits() {
            tracing::warn!(
                value = self.shaded_barrel.light_azimuth,
                clamped = azimuth,
                "shaded_barrel.light_azimuth out of range"
            );
            self.shaded_barrel.light_azimuth = azimuth;
        }

        self
    }
}

fn positive_or_default(name: &str, value: &mut f32, default: f32) {
    if !(*value > 0.0) || !value.is_finite() {
        tracing::warn!(field = name, value = *value, default, "must be positive, using default");
        *value = default;
    }
}

pub fn config_path() -> Option<PathBuf> {
    std::env::var_os(CONFIG_ENV).map(PathBuf::from)
}

/// Loads the config named by `GEOMLAB_CONFIG`, or the defaults when the
/// variable is unset.
pub fn load() -> Result<ViewerConfig, ConfigError> {
    match config_path() {
        Some(path) => {
            let config = ViewerConfig::from_file(&path)?;
            tracing::info!(path = %path.display(), "loaded config");
            Ok(config)
        }
        None => Ok(ViewerConfig::default()),
    }
}
