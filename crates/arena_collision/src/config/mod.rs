//! Configuration system
//!
//! Every tuned constant of the collision subsystem lives here with its
//! default value, so a game can load overrides from a `.toml` or `.ron` file.

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value is outside its valid range
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },
}

/// Broad-phase grid settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Edge length of one square grid cell on the XZ plane
    pub cell_size: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { cell_size: 200.0 }
    }
}

/// Movement resolution thresholds
///
/// The landing and near-top bands were tuned by feel; changing them alters
/// how readily agents step onto ledges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Height of the ground plane
    pub ground_height: f32,
    /// Extra XZ padding added to the capsule radius for the broad-phase query
    pub query_padding: f32,
    /// Maximum |feet - top| for the landing-on-top case
    pub landing_tolerance: f32,
    /// Feet may be at most this far above the top to land without falling
    pub landing_step: f32,
    /// Lower bound (exclusive) of the near-top band while falling
    pub near_top_min: f32,
    /// Upper bound (exclusive) of the near-top band while falling
    pub near_top_max: f32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            ground_height: 0.0,
            query_padding: 10.0,
            landing_tolerance: 0.8,
            landing_step: 0.2,
            near_top_min: -0.3,
            near_top_max: 0.5,
        }
    }
}

/// Ray and visibility settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaycastConfig {
    /// Height added to the target position to aim at the body center
    pub body_center_offset: f32,
    /// Fraction of the eye-to-target distance a sight ray covers
    pub sight_clip: f32,
}

impl Default for RaycastConfig {
    fn default() -> Self {
        Self {
            body_center_offset: 1.0,
            sight_clip: 0.98,
        }
    }
}

/// Spawn search settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Radius of the first search ring
    pub ring_start: f32,
    /// Radius added per ring
    pub ring_step: f32,
    /// Number of rings searched
    pub rings: u32,
    /// Samples per ring
    pub angles_per_ring: u32,
    /// Default attempt budget when the caller does not supply one
    pub max_attempts: u32,
    /// Seed for the fallback offset generator
    pub seed: u64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            ring_start: 5.0,
            ring_step: 5.0,
            rings: 10,
            angles_per_ring: 8,
            max_attempts: 50,
            seed: 0x5eed,
        }
    }
}

/// Top-level collision configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Broad-phase grid
    pub grid: GridConfig,
    /// Movement resolution
    pub resolver: ResolverConfig,
    /// Raycasts and line of sight
    pub raycast: RaycastConfig,
    /// Spawn search
    pub spawn: SpawnConfig,
}

impl Config for CollisionConfig {}

impl CollisionConfig {
    /// Check that every value is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("grid.cell_size", self.grid.cell_size),
            ("resolver.ground_height", self.resolver.ground_height),
            ("resolver.query_padding", self.resolver.query_padding),
            ("resolver.landing_tolerance", self.resolver.landing_tolerance),
            ("resolver.landing_step", self.resolver.landing_step),
            ("resolver.near_top_min", self.resolver.near_top_min),
            ("resolver.near_top_max", self.resolver.near_top_max),
            ("raycast.body_center_offset", self.raycast.body_center_offset),
            ("raycast.sight_clip", self.raycast.sight_clip),
            ("spawn.ring_start", self.spawn.ring_start),
            ("spawn.ring_step", self.spawn.ring_step),
        ];
        if let Some((field, _)) = finite.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::Invalid { field: *field, reason: "must be finite" });
        }

        if self.grid.cell_size <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "grid.cell_size",
                reason: "must be positive",
            });
        }
        if self.resolver.query_padding < 0.0 {
            return Err(ConfigError::Invalid {
                field: "resolver.query_padding",
                reason: "must not be negative",
            });
        }
        if self.resolver.near_top_min >= self.resolver.near_top_max {
            return Err(ConfigError::Invalid {
                field: "resolver.near_top_min",
                reason: "must be below near_top_max",
            });
        }
        if !(self.raycast.sight_clip > 0.0 && self.raycast.sight_clip <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "raycast.sight_clip",
                reason: "must be in (0, 1]",
            });
        }
        if self.spawn.angles_per_ring == 0 {
            return Err(ConfigError::Invalid {
                field: "spawn.angles_per_ring",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}
