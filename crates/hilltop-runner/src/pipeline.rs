//! End-to-end planning: high ground search, vertex snapping and routing.

use crate::config::RunnerConfig;
use crate::PlanError;
use hilltop_dem::{load_grid, BufferQuery, DemError, ElevationGrid};
use hilltop_network::{
    shortest_path, Coord, LinkId, Path, RoadNetwork, RouteError, RouteGraph, RoutingConfig,
    SpatialIndex, VertexId,
};
use serde::Serialize;

/// The highest cell found inside the search buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HighGround {
    /// Cell centre easting.
    pub x: f64,
    /// Cell centre northing.
    pub y: f64,
    /// Elevation in meters.
    pub elevation: f32,
    /// Grid row of the cell.
    pub row: usize,
    /// Grid column of the cell.
    pub col: usize,
}

/// A point snapped onto its nearest road vertex.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnappedVertex {
    /// The vertex chosen.
    pub id: VertexId,
    /// Where the vertex is.
    pub coord: Coord,
    /// Straight-line distance from the query point.
    pub distance: f64,
}

/// How a planning request ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RouteOutcome {
    /// A route to the high ground was found.
    Routed {
        high_ground: HighGround,
        start: SnappedVertex,
        end: SnappedVertex,
        path: Path,
    },
    /// The buffer holds no usable elevation cell.
    NoHighGround { reason: String },
    /// High ground exists but the road network does not connect to it.
    Unreachable {
        high_ground: HighGround,
        start: SnappedVertex,
        end: SnappedVertex,
    },
}

/// Result of one planning request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    /// The search buffer.
    pub query: BufferQuery,
    /// What happened.
    pub outcome: RouteOutcome,
}

impl RoutePlan {
    /// The route, if one was found.
    pub fn path(&self) -> Option<&Path> {
        match &self.outcome {
            RouteOutcome::Routed { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Loaded inputs plus the structures derived from them.
///
/// The index and graph are built once; [`Planner::plan`] only reads them.
#[derive(Debug)]
pub struct Planner {
    grid: ElevationGrid,
    index: SpatialIndex,
    graph: RouteGraph,
    skipped: Vec<LinkId>,
    search_radius_m: f64,
}

impl Planner {
    /// Load the grid and network named by `config` and build the planner.
    pub fn load(config: &RunnerConfig) -> Result<Self, PlanError> {
        config.validate()?;
        let grid = load_grid(&config.elevation_path)?;
        let network = RoadNetwork::from_itn_file(&config.network_path)?;
        Self::new(grid, network, &config.routing, config.search_radius_m)
    }

    /// Build the spatial index and route graph over already loaded inputs.
    pub fn new(
        grid: ElevationGrid,
        network: RoadNetwork,
        routing: &RoutingConfig,
        search_radius_m: f64,
    ) -> Result<Self, PlanError> {
        let index = SpatialIndex::from_network(&network);
        let build = RouteGraph::build(&network, &grid, routing)?;
        if !build.skipped.is_empty() {
            tracing::info!(
                skipped = build.skipped.len(),
                "road links without elevation were left out"
            );
        }

        tracing::info!(
            vertices = build.graph.vertex_count(),
            edges = build.graph.edge_count(),
            "planner ready"
        );

        Ok(Self {
            grid,
            index,
            graph: build.graph,
            skipped: build.skipped.into_iter().map(|s| s.link).collect(),
            search_radius_m,
        })
    }

    /// The elevation grid.
    pub fn grid(&self) -> &ElevationGrid {
        &self.grid
    }

    /// The route graph.
    pub fn graph(&self) -> &RouteGraph {
        &self.graph
    }

    /// Links left out of the graph because their elevation was unavailable.
    pub fn skipped_links(&self) -> &[LinkId] {
        &self.skipped
    }

    /// Plan from (x, y) to the highest point within the configured radius.
    pub fn plan(&self, x: f64, y: f64) -> Result<RoutePlan, PlanError> {
        self.plan_with_radius(x, y, self.search_radius_m)
    }

    /// Plan from (x, y) to the highest point within `radius`.
    pub fn plan_with_radius(&self, x: f64, y: f64, radius: f64) -> Result<RoutePlan, PlanError> {
        let query = BufferQuery::new(x, y, radius);

        let peak = match hilltop_dem::find_peak(&self.grid, query) {
            Ok(peak) => peak,
            Err(err @ (DemError::NoIntersection { .. } | DemError::NoValidCells { .. })) => {
                tracing::info!("no high ground: {}", err);
                return Ok(RoutePlan {
                    query,
                    outcome: RouteOutcome::NoHighGround {
                        reason: err.to_string(),
                    },
                });
            }
            Err(err) => return Err(err.into()),
        };
        let high_ground = HighGround {
            x: peak.x,
            y: peak.y,
            elevation: peak.elevation,
            row: peak.row,
            col: peak.col,
        };
        tracing::info!(
            x = high_ground.x,
            y = high_ground.y,
            elevation = high_ground.elevation,
            "highest point in range"
        );

        let start = self.snap(x, y)?;
        let end = self.snap(high_ground.x, high_ground.y)?;
        tracing::info!(start = %start.id, end = %end.id, "snapped to road network");

        let outcome = match shortest_path(&self.graph, &start.id, &end.id) {
            Ok(path) => {
                tracing::info!(
                    steps = path.steps.len(),
                    minutes = path.total_cost,
                    "route found"
                );
                RouteOutcome::Routed {
                    high_ground,
                    start,
                    end,
                    path,
                }
            }
            Err(err @ RouteError::NoPath { .. }) => {
                tracing::info!("{}", err);
                RouteOutcome::Unreachable {
                    high_ground,
                    start,
                    end,
                }
            }
            Err(err) => return Err(err.into()),
        };

        Ok(RoutePlan { query, outcome })
    }

    fn snap(&self, x: f64, y: f64) -> Result<SnappedVertex, PlanError> {
        let (id, coord, distance) = self.index.nearest_with_coord(x, y)?;
        Ok(SnappedVertex {
            id: id.clone(),
            coord,
            distance,
        })
    }
}
