use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

use crate::camera::MAX_FOV;
use crate::error::ConfigError;
use crate::world::Segment;

pub const DEFAULT_CONFIG_PATH: &str = "raycaster.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Size of each half of the internal framebuffer (map | raycast view).
    pub view_width: u32,
    pub view_height: u32,
    pub wall_count: usize,
    pub seed: Option<u64>,
    /// Far endpoint of every ray, see `intersect`.
    pub ray_length: f64,
    /// Distance at which strips vanish; the view diagonal when unset.
    pub max_distance: Option<f64>,
    pub fov_min: f64,
    pub fov_max: f64,
    pub turn_speed: f64, // degrees per second
    pub move_speed: f64, // world units per second
    /// Explicit walls; replace random generation when present.
    pub walls: Option<Vec<Segment>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            view_width: 300,
            view_height: 300,
            wall_count: 5,
            seed: None,
            ray_length: 100.0,
            max_distance: None,
            fov_min: 5.0,
            fov_max: 350.0,
            turn_speed: 60.0,
            move_speed: 60.0,
            walls: None,
        }
    }
}

impl Config {
    /// Reads `path`, or `raycaster.toml` when no path is given. A missing
    /// default file is not an error; the defaults are used instead.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p, true),
            None => (Path::new(DEFAULT_CONFIG_PATH), false),
        };

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if !explicit && e.kind() == ErrorKind::NotFound => {
                warn!("{} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config = Self::from_toml(&text)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.view_width == 0 || self.view_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "view size must be non-zero, got {}x{}",
                self.view_width, self.view_height
            )));
        }
        if !(self.fov_min.is_finite() && self.fov_max.is_finite()) || self.fov_min > self.fov_max {
            return Err(ConfigError::Invalid(format!(
                "fov range [{}, {}] is not ordered",
                self.fov_min, self.fov_max
            )));
        }
        if self.fov_max > MAX_FOV {
            return Err(ConfigError::Invalid(format!(
                "fov_max must be at most {MAX_FOV}, got {}",
                self.fov_max
            )));
        }
        if !self.ray_length.is_finite() || self.ray_length <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "ray_length must be positive, got {}",
                self.ray_length
            )));
        }
        if let Some(d) = self.max_distance {
            if !d.is_finite() || d <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "max_distance must be positive, got {d}"
                )));
            }
        }
        Ok(())
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
            .unwrap_or_else(|| (self.view_width as f64).hypot(self.view_height as f64))
    }
}
