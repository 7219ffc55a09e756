//! # hilltop-runner
//!
//! Glue between the elevation and network crates: load inputs from a YAML
//! configuration, find the high ground near a point, and route to it.
//!
//! ```no_run
//! use hilltop_runner::{Planner, RunnerConfig};
//!
//! let config = RunnerConfig::from_file("hilltop.yaml")?;
//! let planner = Planner::load(&config)?;
//! let plan = planner.plan(439619.0, 85800.0)?;
//! println!("{}", serde_json::to_string_pretty(&plan)?);
//! # Ok::<(), hilltop_runner::PlanError>(())
//! ```

pub mod config;
mod error;
pub mod geojson;
pub mod pipeline;

pub use config::{RunnerConfig, DEFAULT_SEARCH_RADIUS_M};
pub use error::PlanError;
pub use geojson::path_to_geojson;
pub use pipeline::{HighGround, Planner, RouteOutcome, RoutePlan, SnappedVertex};
