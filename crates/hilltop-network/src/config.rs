//! Routing cost configuration.

use crate::{NetworkError, Result};
use serde::{Deserialize, Serialize};

/// Default walking speed: 5 km/h in meters per minute.
pub const DEFAULT_WALKING_SPEED_M_PER_MIN: f64 = 5.0 / 3.6 * 60.0;

/// Default climb penalty: one extra minute per this many meters of ascent.
pub const DEFAULT_CLIMB_METRES_PER_MINUTE: f64 = 10.0;

/// What to do with a link whose elevation cannot be sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkFailurePolicy {
    /// Leave the link out of the graph in both directions and keep going.
    #[default]
    Skip,
    /// Fail the whole build.
    Abort,
}

/// Parameters of the travel-time cost model.
///
/// ```
/// use hilltop_network::{LinkFailurePolicy, RoutingConfig};
///
/// let config = RoutingConfig {
///     walking_speed_m_per_min: 1.0,
///     ..Default::default()
/// };
/// assert_eq!(config.link_failure_policy, LinkFailurePolicy::Skip);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Flat-ground walking speed in meters per minute.
    pub walking_speed_m_per_min: f64,
    /// Meters of cumulative ascent that cost one extra minute.
    pub climb_metres_per_minute: f64,
    /// Handling of links with missing elevation.
    pub link_failure_policy: LinkFailurePolicy,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            walking_speed_m_per_min: DEFAULT_WALKING_SPEED_M_PER_MIN,
            climb_metres_per_minute: DEFAULT_CLIMB_METRES_PER_MINUTE,
            link_failure_policy: LinkFailurePolicy::Skip,
        }
    }
}

impl RoutingConfig {
    /// Check that both rates are positive and finite.
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.walking_speed_m_per_min) {
            return Err(NetworkError::InvalidConfig(format!(
                "walking_speed_m_per_min must be positive, got {}",
                self.walking_speed_m_per_min
            )));
        }
        if !positive(self.climb_metres_per_minute) {
            return Err(NetworkError::InvalidConfig(format!(
                "climb_metres_per_minute must be positive, got {}",
                self.climb_metres_per_minute
            )));
        }
        Ok(())
    }

    /// Flat walking time for `length` meters, in minutes.
    pub fn base_time(&self, length: f64) -> f64 {
        length / self.walking_speed_m_per_min
    }

    /// Extra minutes for `climb` meters of ascent.
    pub fn climb_penalty(&self, climb: f64) -> f64 {
        climb / self.climb_metres_per_minute
    }
}
