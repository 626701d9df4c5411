//! Runtime configuration loaded from `spacerift.toml`.
//!
//! Every field defaults to the matching value in [`crate::constants`], so a
//! TOML file only needs the keys it wants to override:
//!
//! ```toml
//! enemy_spawn_rate = 0.05
//! data_dir = "/tmp/spacerift"
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::Deserialize;

use crate::constants::*;
use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "spacerift.toml";

/// Where a loaded configuration came from. Loading runs before the log file
/// is open, so the caller logs this once logging is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Defaults,
    File(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Defaults => write!(f, "No {} found, using built-in defaults", DEFAULT_CONFIG_FILE),
            ConfigSource::File(path) => write!(f, "Loaded configuration from {}", path.display()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // Ship and weapons
    pub player_speed: f64,
    pub player_rotation_speed: f64,
    pub laser_speed: f64,
    pub laser_life: u32,

    // World
    pub enemy_spawn_rate: f64,
    pub asteroid_spawn_rate: f64,
    pub initial_asteroids: usize,
    pub star_count: usize,
    pub asteroid_reset_distance: f64,
    pub enemy_step: f64,
    pub enemy_hit_radius: f64,
    pub laser_hit_radius: f64,

    // Loop and UI
    pub target_fps: u64,
    pub notification_duration_ms: u64,

    // Ambient
    pub data_dir: PathBuf,
    pub log_file: PathBuf,
    pub log_level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            player_speed: PLAYER_SPEED,
            player_rotation_speed: PLAYER_ROTATION_SPEED,
            laser_speed: LASER_SPEED,
            laser_life: LASER_LIFE,
            enemy_spawn_rate: ENEMY_SPAWN_RATE,
            asteroid_spawn_rate: ASTEROID_SPAWN_RATE,
            initial_asteroids: INITIAL_ASTEROIDS,
            star_count: STAR_COUNT,
            asteroid_reset_distance: ASTEROID_RESET_DISTANCE,
            enemy_step: ENEMY_STEP,
            enemy_hit_radius: ENEMY_HIT_RADIUS,
            laser_hit_radius: LASER_HIT_RADIUS,
            target_fps: TARGET_FPS,
            notification_duration_ms: NOTIFICATION_DURATION_MS,
            data_dir: PathBuf::from(".spacerift"),
            log_file: PathBuf::from("spacerift.log"),
            log_level: "info".to_string(),
        }
    }
}

impl GameConfig {
    /// Loads `path`, or `spacerift.toml` in the working directory when no path
    /// is given. A missing default file yields the built-in defaults; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<(Self, ConfigSource), ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !explicit && !path.exists() {
            return Ok((GameConfig::default(), ConfigSource::Defaults));
        }

        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })?;
        Ok((config, ConfigSource::File(path)))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: "<inline>".to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_probability("enemy_spawn_rate", self.enemy_spawn_rate)?;
        validate_probability("asteroid_spawn_rate", self.asteroid_spawn_rate)?;
        if self.target_fps == 0 || self.target_fps > 240 {
            return Err(ConfigError::OutOfRange {
                name: "target_fps",
                value: self.target_fps as f64,
                range: "[1, 240]",
            });
        }
        if !(1..=MAX_LASER_LIFE).contains(&self.laser_life) {
            return Err(ConfigError::OutOfRange {
                name: "laser_life",
                value: f64::from(self.laser_life),
                range: "[1, 10000]",
            });
        }
        if !(1..=MAX_NOTIFICATION_DURATION_MS).contains(&self.notification_duration_ms) {
            return Err(ConfigError::OutOfRange {
                name: "notification_duration_ms",
                value: self.notification_duration_ms as f64,
                range: "[1, 600000]",
            });
        }
        Ok(())
    }

    /// `None` for an unknown level name; the caller falls back to info.
    pub fn log_level_filter(&self) -> Option<LevelFilter> {
        match self.log_level.to_ascii_lowercase().as_str() {
            "off" => Some(LevelFilter::Off),
            "error" => Some(LevelFilter::Error),
            "warn" => Some(LevelFilter::Warn),
            "info" => Some(LevelFilter::Info),
            "debug" => Some(LevelFilter::Debug),
            "trace" => Some(LevelFilter::Trace),
            _ => None,
        }
    }

    /// Converts a wall-clock duration into a frame count at the target rate.
    pub fn frames_for_ms(&self, ms: u64) -> u64 {
        ms_to_frames(ms, self.target_fps)
    }
}

/// Frame deadlines round up and never collapse to zero frames.
pub fn ms_to_frames(ms: u64, fps: u64) -> u64 {
    ms.saturating_mul(fps).div_ceil(1000).max(1)
}

fn validate_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        Err(ConfigError::OutOfRange { name, value, range: "[0.0, 1.0]" })
    } else {
        Ok(())
    }
}
