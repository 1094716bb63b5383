//! World Configuration
//!
//! Every tunable of the world core in one place. Defaults reproduce the
//! reference game; a JSON file can override any subset of fields.

use std::path::Path;
use std::time::Duration;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::vec2::Vec2;
use crate::game::camera::{CameraConfig, Viewport};
use crate::{DEFAULT_BUCKET_SIZE, DEFAULT_FRAME_RATE};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field is out of its allowed range.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Dotted field path
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// JSON did not match the schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Reading the config file failed.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

/// Initial population of the world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Player spawn (top-left corner)
    pub player_start: Vec2,
    /// Player sprite size
    pub player_size: Vec2,
    /// Player speed in world units per second
    pub player_speed: f32,
    /// Top-left corner of the first enemy
    pub enemy_origin: Vec2,
    /// Offset between neighbouring enemies (x within a row, y between rows)
    pub enemy_spacing: Vec2,
    /// Number of enemy rows
    pub enemy_rows: u32,
    /// Enemies per row
    pub enemies_per_row: u32,
    /// Enemy sprite size
    pub enemy_size: Vec2,
    /// Enemy speed in world units per second
    pub enemy_speed: f32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            player_start: Vec2::new(80.0, 80.0),
            player_size: Vec2::new(16.0, 16.0),
            player_speed: 90.0,
            enemy_origin: Vec2::new(100.0, 100.0),
            enemy_spacing: Vec2::new(5.0, 10.0),
            enemy_rows: 10,
            enemies_per_row: 1000,
            enemy_size: Vec2::new(8.0, 8.0),
            enemy_speed: 20.0,
        }
    }
}

/// Configuration for one world instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Edge length of a spatial bucket in world units
    pub bucket_size: f32,
    /// Screen size and zoom
    pub viewport: Viewport,
    /// Camera tuning
    pub camera: CameraConfig,
    /// Seed for every random stream in the world
    pub seed: u64,
    /// Simulation rate (Hz)
    pub frame_rate: u32,
    /// Initial population
    pub population: PopulationConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            bucket_size: DEFAULT_BUCKET_SIZE,
            viewport: Viewport::default(),
            camera: CameraConfig::default(),
            seed: 12345,
            frame_rate: DEFAULT_FRAME_RATE,
            population: PopulationConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Parse and validate a JSON document. Missing fields keep defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Duration of one simulation frame.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate.max(1)
    }

    /// Check every field is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("bucket_size", self.bucket_size)?;
        positive("viewport.zoom", self.viewport.zoom)?;
        positive("viewport.screen.x", self.viewport.screen.x)?;
        positive("viewport.screen.y", self.viewport.screen.y)?;

        let camera = &self.camera;
        if !(0.0..=1.0).contains(&camera.damping) {
            return Err(invalid("camera.damping", format!("{} not in [0, 1]", camera.damping)));
        }
        if !camera.velocity_multiplier.is_finite() || camera.velocity_multiplier < 0.0 {
            return Err(invalid(
                "camera.velocity_multiplier",
                format!("{} must be finite and non-negative", camera.velocity_multiplier),
            ));
        }
        if !(camera.bound_fraction > 0.0 && camera.bound_fraction <= 1.0) {
            return Err(invalid(
                "camera.bound_fraction",
                format!("{} not in (0, 1]", camera.bound_fraction),
            ));
        }

        if self.frame_rate == 0 {
            return Err(invalid("frame_rate", "must be at least 1 Hz".to_string()));
        }

        let population = &self.population;
        positive("population.player_size.x", population.player_size.x)?;
        positive("population.player_size.y", population.player_size.y)?;
        positive("population.enemy_size.x", population.enemy_size.x)?;
        positive("population.enemy_size.y", population.enemy_size.y)?;

        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} must be positive")))
    }
}
