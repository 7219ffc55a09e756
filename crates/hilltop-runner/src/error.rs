//! Error type for the route planning pipeline.

use hilltop_dem::DemError;
use hilltop_network::{NetworkError, RouteError};
use thiserror::Error;

/// Errors that stop a plan from being produced.
///
/// Expected outcomes such as "no high ground in range" or "no route" are not
/// errors; they are reported through [`RouteOutcome`](crate::RouteOutcome).
#[derive(Debug, Error)]
pub enum PlanError {
    /// Reading a config or input file, or writing output, failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The runner config is not valid YAML for [`RunnerConfig`](crate::RunnerConfig).
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Plan or GeoJSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The elevation grid could not be loaded or searched.
    #[error("Elevation error: {0}")]
    Dem(#[from] DemError),

    /// The road network could not be loaded or turned into a graph.
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// A routing query named a vertex the graph does not hold.
    #[error("Routing error: {0}")]
    Route(#[from] RouteError),

    /// A config value is out of range.
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_source() {
        let err = PlanError::Config("search_radius_m must be positive".into());
        assert_eq!(
            err.to_string(),
            "Configuration error: search_radius_m must be positive"
        );

        let err: PlanError = DemError::InvalidGeoTiff("no tags".into()).into();
        assert!(matches!(err, PlanError::Dem(_)));
        assert!(err.to_string().starts_with("Elevation error: "));
    }
}
