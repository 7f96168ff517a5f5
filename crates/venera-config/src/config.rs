//! Configuration structs with sensible defaults and RON persistence.
//!
//! Defaults describe a Venus-scale fly-over: a 6051.8 km globe with a
//! 13.7 km elevation span, captured from 1.02 radii by a 30° nadir camera
//! onto a 40-unit terrain plane sampled at 128 segments.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Globe and orbit-capture settings.
    pub globe: GlobeConfig,
    /// Terrain plane settings.
    pub terrain: TerrainConfig,
    /// Walk/turn motion settings.
    pub motion: MotionConfig,
    /// Startup asset paths.
    pub assets: AssetConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Start in fullscreen mode.
    pub fullscreen: bool,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title.
    pub title: String,
}

/// Globe body and orbit-capture configuration.
///
/// These values fix the real-world-to-scene elevation scale, so they are read
/// once at startup and never consulted again per frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlobeConfig {
    /// Planetary radius in kilometers.
    pub radius_km: f32,
    /// Distance between the body's highest and lowest point, in kilometers.
    pub elevation_range_km: f32,
    /// Orbit camera altitude in planetary radii (1.0 = surface).
    pub camera_altitude_radii: f32,
    /// Vertical field of view of the nadir capture camera, in degrees.
    pub capture_fov_deg: f32,
}

/// Terrain plane configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Grid segments per axis. The capture buffer and height field are
    /// `(detail + 1)` samples on a side, one per mesh vertex.
    pub detail: u32,
    /// Side length of the terrain plane in scene units.
    pub plane_scale: f32,
    /// Height of the vehicle's origin above the sampled surface.
    pub vehicle_clearance: f32,
}

/// Walk/turn motion configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MotionConfig {
    /// Maximum walk speed in radians of globe rotation per tick.
    pub max_walk_speed: f32,
    /// Maximum turn speed in radians per tick.
    pub max_turn_speed: f32,
    /// Multiplicative velocity decay applied per tick while no key is held.
    pub decay_factor: f32,
    /// Velocities with magnitude below this snap to exactly zero.
    pub rest_epsilon: f32,
}

/// Paths of the images required before the frame loop may start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetConfig {
    /// Grayscale bump map wrapped onto the globe; its red channel is the
    /// elevation source.
    pub globe_bump: PathBuf,
    /// Sky dome texture for the terrain scene.
    pub sky: PathBuf,
    /// Detail texture blended at low elevations.
    pub terrain_low: PathBuf,
    /// Detail texture blended at high elevations.
    pub terrain_high: PathBuf,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn"). Empty = default.
    pub log_level: String,
    /// Log per-second frame statistics.
    pub log_frame_stats: bool,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
            title: "Venera".to_string(),
        }
    }
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            radius_km: 6051.8,
            elevation_range_km: 13.7,
            camera_altitude_radii: 1.02,
            capture_fov_deg: 30.0,
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            detail: 128,
            plane_scale: 40.0,
            vehicle_clearance: 0.025,
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            max_walk_speed: 1e-4,
            max_turn_speed: 0.1,
            decay_factor: 0.9,
            rest_epsilon: 1e-5,
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            globe_bump: PathBuf::from("img/venus_bump.jpg"),
            sky: PathBuf::from("img/sky.png"),
            terrain_low: PathBuf::from("img/basalt.png"),
            terrain_high: PathBuf::from("img/highlands.png"),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: String::new(),
            log_frame_stats: false,
        }
    }
}

// --- Load / Save ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(!ron_str.is_empty());
        assert!(ron_str.contains("radius_km: 6051.8"));
        assert!(ron_str.contains("detail: 128"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_field_uses_default() {
        // Config missing the `motion` section entirely
        let ron_str = "(window: (), globe: (), terrain: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.motion, MotionConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let ron_str = "(future_setting: true)";
        let result: Result<Config, _> = ron::from_str(ron_str);
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1920;
        config.terrain.detail = 64;
        config.motion.max_turn_speed = 0.2;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }

    #[test]
    fn test_motion_defaults() {
        let motion = MotionConfig::default();
        assert_eq!(motion.max_walk_speed, 1e-4);
        assert_eq!(motion.max_turn_speed, 0.1);
        assert_eq!(motion.decay_factor, 0.9);
        assert_eq!(motion.rest_epsilon, 1e-5);
    }

    #[test]
    fn test_capture_grid_matches_terrain_detail() {
        let terrain = TerrainConfig::default();
        // One height sample per mesh vertex, (detail + 1) per axis.
        assert_eq!(terrain.detail + 1, 129);
    }
}
