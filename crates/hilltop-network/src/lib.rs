//! # hilltop-network
//!
//! Road networks and elevation-aware routing for the hilltop route planner.
//!
//! This crate provides:
//! - [`RoadNetwork`]: vertices and links, read from ITN-style JSON
//! - [`SpatialIndex`]: nearest road vertex to an arbitrary point
//! - [`RouteGraph`]: directed graph whose edge weights are walking minutes
//!   plus a climb penalty, sampled from any [`ElevationSampler`]
//! - [`shortest_path`]: Dijkstra over a built graph
//!
//! ## Example
//!
//! ```
//! use hilltop_network::{
//!     shortest_path, RoadLink, RoadNetwork, RoadVertex, RouteGraph, RoutingConfig,
//!     SpatialIndex,
//! };
//! # use hilltop_dem::{ElevationSampler, Result as DemResult};
//! # struct Flat;
//! # impl ElevationSampler for Flat {
//! #     fn sample(&self, _x: f64, _y: f64) -> DemResult<f32> { Ok(0.0) }
//! # }
//!
//! let a = RoadVertex::new("a", 0.0, 0.0);
//! let b = RoadVertex::new("b", 500.0, 0.0);
//! let link = RoadLink::straight("ab", &a, &b);
//! let network = RoadNetwork::new(vec![a, b], vec![link]);
//!
//! let index = SpatialIndex::from_network(&network);
//! let from = index.nearest(10.0, 5.0)?.clone();
//! let to = index.nearest(480.0, -3.0)?.clone();
//!
//! let build = RouteGraph::build(&network, &Flat, &RoutingConfig::default())?;
//! let path = shortest_path(&build.graph, &from, &to)?;
//! assert_eq!(path.steps.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod error;
mod graph;
mod index;
mod network;
mod path;

pub use config::{
    LinkFailurePolicy, RoutingConfig, DEFAULT_CLIMB_METRES_PER_MINUTE,
    DEFAULT_WALKING_SPEED_M_PER_MIN,
};
pub use error::{NetworkError, RouteError};
pub use graph::{link_cost, DirectedEdge, GraphBuild, LinkCost, RouteGraph, SkippedLink};
pub use index::SpatialIndex;
pub use network::{Coord, LinkId, RoadLink, RoadNetwork, RoadVertex, VertexId};
pub use path::{shortest_path, Path, PathStep};

// Re-exported so callers can name the sampler bound without a direct dependency.
pub use hilltop_dem::ElevationSampler;

/// Result type for network operations.
pub type Result<T> = std::result::Result<T, NetworkError>;
