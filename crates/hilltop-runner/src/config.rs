//! YAML configuration for the runner.
//!
//! ```yaml
//! elevation_path: data/elevation/SZ.asc
//! network_path: data/itn/solent_itn.json
//! search_radius_m: 5000
//! routing:
//!   walking_speed_m_per_min: 83.33
//!   climb_metres_per_minute: 10
//!   link_failure_policy: skip
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use crate::PlanError;
use hilltop_network::RoutingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default search radius around the user's point, in meters.
pub const DEFAULT_SEARCH_RADIUS_M: f64 = 5000.0;

fn default_search_radius() -> f64 {
    DEFAULT_SEARCH_RADIUS_M
}

/// Everything needed to load inputs and plan routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Elevation raster (`.asc`, `.tif`).
    pub elevation_path: PathBuf,
    /// ITN-style road network JSON.
    pub network_path: PathBuf,
    /// Radius of the high-ground search.
    #[serde(default = "default_search_radius")]
    pub search_radius_m: f64,
    /// Cost model.
    #[serde(default)]
    pub routing: RoutingConfig,
}

impl RunnerConfig {
    /// Config with default radius and routing parameters.
    pub fn new(elevation_path: impl Into<PathBuf>, network_path: impl Into<PathBuf>) -> Self {
        Self {
            elevation_path: elevation_path.into(),
            network_path: network_path.into(),
            search_radius_m: DEFAULT_SEARCH_RADIUS_M,
            routing: RoutingConfig::default(),
        }
    }

    /// Parse a YAML document. Paths are left as written.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, PlanError> {
        let config: RunnerConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a YAML file, resolving relative paths against its directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PlanError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml_str(&text)?;

        if let Some(base) = path.parent() {
            config.elevation_path = resolve(base, &config.elevation_path);
            config.network_path = resolve(base, &config.network_path);
        }
        tracing::debug!(?config, "loaded runner config from {}", path.display());
        Ok(config)
    }

    /// Reject radii that cannot describe a buffer and bad routing rates.
    pub fn validate(&self) -> Result<(), PlanError> {
        if !self.search_radius_m.is_finite() || self.search_radius_m <= 0.0 {
            return Err(PlanError::Config(format!(
                "search_radius_m must be positive, got {}",
                self.search_radius_m
            )));
        }
        self.routing.validate()?;
        Ok(())
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
