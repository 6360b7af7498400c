//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Largest demo grid side; the grid holds `MAX_GRID_SIZE²` blocks at most.
pub const MAX_GRID_SIZE: u32 = 1024;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Culling registry settings.
    pub culling: CullingConfig,
    /// Demo scene settings.
    pub demo: DemoConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Per-registry culling settings.
///
/// The policy flags are the defaults handed to every group; individual
/// candidates may override them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CullingConfig {
    /// Distance from the camera beyond which a group is culled.
    pub culling_distance: f32,
    /// Toggle renderers only instead of deactivating whole child objects.
    pub disable_renderer_only: bool,
    /// Re-scan a group's members when its owner's child count changes.
    pub update_by_count: bool,
}

/// Demo scene configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Blocks per grid side.
    pub grid_size: u32,
    /// Distance between neighbouring blocks.
    pub spacing: f32,
    /// Child blocks stacked on every grid block.
    pub children_per_block: u32,
    /// Camera distance at slider value 0.
    pub min_distance: f32,
    /// Camera distance at slider value 1.
    pub max_distance: f32,
    /// Camera height above the target.
    pub camera_height: f32,
    /// Number of simulated frames.
    pub frames: u32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Check the visibility invariant of every group after each sweep.
    pub verify_visibility: bool,
}

// --- Default implementations ---

impl Default for CullingConfig {
    fn default() -> Self {
        Self {
            culling_distance: 150.0,
            disable_renderer_only: true,
            update_by_count: false,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            spacing: 7.5,
            children_per_block: 3,
            min_distance: 14.0,
            max_distance: 50.0,
            camera_height: 10.0,
            frames: 240,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            verify_visibility: false,
        }
    }
}

impl CullingConfig {
    /// Reject distances the sweep cannot compare against.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.culling_distance.is_finite() || self.culling_distance < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "culling.culling_distance",
                reason: format!("{} is not a finite, non-negative distance", self.culling_distance),
            });
        }
        Ok(())
    }
}

impl DemoConfig {
    /// Reject grid and slider settings the demo cannot lay out.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::InvalidValue {
                field: "demo.grid_size",
                reason: format!("{} exceeds the maximum of {MAX_GRID_SIZE}", self.grid_size),
            });
        }
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "demo.spacing",
                reason: format!("{} must be positive", self.spacing),
            });
        }
        if self.min_distance > self.max_distance {
            return Err(ConfigError::InvalidValue {
                field: "demo.min_distance",
                reason: format!(
                    "{} exceeds max_distance {}",
                    self.min_distance, self.max_distance
                ),
            });
        }
        Ok(())
    }
}

/// Platform config directory for this workspace, e.g. `~/.config/lodcull`.
///
/// Falls back to the working directory when the platform reports none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("lodcull"))
        .unwrap_or_else(|| PathBuf::from("."))
}

// --- Load / Save / Reload ---

impl Config {
    /// Check every section for out-of-range values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.culling.validate()?;
        self.demo.validate()
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
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

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
