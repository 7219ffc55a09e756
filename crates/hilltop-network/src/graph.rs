//! Elevation-weighted directed graph over a road network.
//!
//! Every road link becomes two directed edges. Both share the flat walking
//! time for the link's length; each adds a penalty for the ascent met when
//! walking the polyline in its direction.

use crate::config::{LinkFailurePolicy, RoutingConfig};
use crate::network::{Coord, LinkId, RoadLink, RoadNetwork, VertexId};
use crate::{NetworkError, Result};
use hilltop_dem::ElevationSampler;
use hilltop_metrics::metric_defs;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Instant;

/// Per-direction cost of one road link, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinkCost {
    /// Flat walking time for the link's length.
    pub base_time: f64,
    /// Cumulative ascent walking start to end, in meters.
    pub climb_forward: f64,
    /// Cumulative ascent walking end to start, in meters.
    pub climb_backward: f64,
    /// Weight of the start-to-end edge.
    pub forward: f64,
    /// Weight of the end-to-start edge.
    pub backward: f64,
}

/// Compute the travel time of `link` in both directions.
///
/// Samples every polyline vertex through `sampler`. Any failed sample makes
/// the whole link unavailable.
pub fn link_cost<S>(link: &RoadLink, sampler: &S, config: &RoutingConfig) -> Result<LinkCost>
where
    S: ElevationSampler + ?Sized,
{
    let elevations = link
        .coords
        .iter()
        .map(|c| sampler.sample(c.x, c.y).map(f64::from))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|source| NetworkError::LinkElevationUnavailable {
            link: link.id.clone(),
            source,
        })?;

    let mut climb_forward = 0.0;
    let mut climb_backward = 0.0;
    for pair in elevations.windows(2) {
        let rise = pair[1] - pair[0];
        if rise > 0.0 {
            climb_forward += rise;
        } else {
            climb_backward -= rise;
        }
    }

    let base_time = config.base_time(link.length);
    Ok(LinkCost {
        base_time,
        climb_forward,
        climb_backward,
        forward: base_time + config.climb_penalty(climb_forward),
        backward: base_time + config.climb_penalty(climb_backward),
    })
}

/// One direction of travel along a road link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectedEdge {
    /// Vertex the edge leaves.
    pub from: VertexId,
    /// Vertex the edge enters.
    pub to: VertexId,
    /// Link the edge walks.
    pub link: LinkId,
    /// Travel time in minutes.
    pub weight: f64,
    /// True when the edge walks the link's polyline in stored order.
    pub forward: bool,
}

/// A link left out of the graph, with the reason.
#[derive(Debug)]
pub struct SkippedLink {
    /// The excluded link.
    pub link: LinkId,
    /// Why it was excluded.
    pub error: NetworkError,
}

/// Result of [`RouteGraph::build`].
#[derive(Debug)]
pub struct GraphBuild {
    /// The finished graph.
    pub graph: RouteGraph,
    /// Links excluded under [`LinkFailurePolicy::Skip`], in link order.
    pub skipped: Vec<SkippedLink>,
}

/// Immutable adjacency-list graph.
///
/// Vertices live in an arena in network order and are addressed by index
/// internally. Parallel edges between the same pair are kept.
#[derive(Debug, Clone, Default)]
pub struct RouteGraph {
    vertices: Vec<VertexId>,
    positions: HashMap<VertexId, usize>,
    edges: Vec<DirectedEdge>,
    /// Target index of each edge, parallel to `edges`.
    targets: Vec<usize>,
    /// Outgoing edge indices per vertex, in link order.
    adjacency: Vec<Vec<usize>>,
    geometry: HashMap<LinkId, Vec<Coord>>,
}

impl RouteGraph {
    /// Build a graph from a network and an elevation source.
    ///
    /// Malformed network data (duplicate or unknown vertices, links with
    /// fewer than two points, bad lengths) fails the build regardless of
    /// policy. Links whose elevation cannot be sampled follow
    /// `config.link_failure_policy`.
    pub fn build<S>(network: &RoadNetwork, sampler: &S, config: &RoutingConfig) -> Result<GraphBuild>
    where
        S: ElevationSampler + Sync + ?Sized,
    {
        let started = Instant::now();
        config.validate()?;

        let positions = network.vertex_positions()?;
        for link in &network.links {
            validate_link(link, &positions)?;
        }

        let costs: Vec<Result<LinkCost>> = network
            .links
            .par_iter()
            .map(|link| link_cost(link, sampler, config))
            .collect();

        let mut graph = RouteGraph {
            vertices: network.vertices.iter().map(|v| v.id.clone()).collect(),
            positions,
            edges: Vec::with_capacity(network.links.len() * 2),
            targets: Vec::with_capacity(network.links.len() * 2),
            adjacency: vec![Vec::new(); network.vertices.len()],
            geometry: HashMap::with_capacity(network.links.len()),
        };
        let mut skipped = Vec::new();

        for (link, cost) in network.links.iter().zip(costs) {
            let cost = match cost {
                Ok(cost) => cost,
                Err(error) => match config.link_failure_policy {
                    LinkFailurePolicy::Abort => return Err(error),
                    LinkFailurePolicy::Skip => {
                        tracing::warn!(link = %link.id, "skipping link: {}", error);
                        skipped.push(SkippedLink {
                            link: link.id.clone(),
                            error,
                        });
                        continue;
                    }
                },
            };

            graph.push_edge(&link.start, &link.end, &link.id, cost.forward, true);
            graph.push_edge(&link.end, &link.start, &link.id, cost.backward, false);
            graph.geometry.insert(link.id.clone(), link.coords.clone());
        }

        let built = network.links.len() - skipped.len();
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        metrics::counter!(metric_defs::GRAPH_LINKS_BUILT.name).increment(built as u64);
        metrics::counter!(metric_defs::GRAPH_LINKS_SKIPPED.name).increment(skipped.len() as u64);
        metrics::histogram!(metric_defs::GRAPH_BUILD_TIME.name).record(elapsed_ms);

        tracing::debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            skipped = skipped.len(),
            elapsed_ms,
            "built route graph"
        );

        Ok(GraphBuild { graph, skipped })
    }

    /// Vertex ids were validated before this is called.
    fn push_edge(&mut self, from: &VertexId, to: &VertexId, link: &LinkId, weight: f64, forward: bool) {
        let (from_idx, to_idx) = (self.positions[from], self.positions[to]);
        let edge_idx = self.edges.len();
        self.edges.push(DirectedEdge {
            from: from.clone(),
            to: to.clone(),
            link: link.clone(),
            weight,
            forward,
        });
        self.targets.push(to_idx);
        self.adjacency[from_idx].push(edge_idx);
    }

    /// Number of vertices, including isolated ones.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True if `id` is a vertex of this graph.
    pub fn contains_vertex(&self, id: &VertexId) -> bool {
        self.positions.contains_key(id)
    }

    /// All directed edges, in build order.
    pub fn edges(&self) -> &[DirectedEdge] {
        &self.edges
    }

    /// Edges leaving `id`, in link order.
    pub fn outgoing<'a>(&'a self, id: &VertexId) -> impl Iterator<Item = &'a DirectedEdge> + 'a {
        self.positions
            .get(id)
            .into_iter()
            .flat_map(move |&idx| self.adjacency[idx].iter().map(move |&e| &self.edges[e]))
    }

    /// Every directed edge from `a` to `b`.
    pub fn edges_between<'a>(&'a self, a: &VertexId, b: &VertexId) -> Vec<&'a DirectedEdge> {
        self.outgoing(a).filter(|edge| &edge.to == b).collect()
    }

    /// Polyline of a link that made it into the graph, in stored order.
    pub fn link_geometry(&self, link: &LinkId) -> Option<&[Coord]> {
        self.geometry.get(link).map(Vec::as_slice)
    }

    pub(crate) fn index_of(&self, id: &VertexId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub(crate) fn vertex_at(&self, idx: usize) -> &VertexId {
        &self.vertices[idx]
    }

    pub(crate) fn edge_at(&self, edge: usize) -> &DirectedEdge {
        &self.edges[edge]
    }

    /// Outgoing `(edge index, target index)` pairs of a vertex index.
    pub(crate) fn out_edges(&self, idx: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency[idx].iter().map(move |&e| (e, self.targets[e]))
    }
}

fn validate_link(link: &RoadLink, positions: &HashMap<VertexId, usize>) -> Result<()> {
    for vertex in [&link.start, &link.end] {
        if !positions.contains_key(vertex) {
            return Err(NetworkError::UnknownVertex {
                link: link.id.clone(),
                vertex: vertex.clone(),
            });
        }
    }
    if link.coords.len() < 2 {
        return Err(NetworkError::MalformedLink {
            link: link.id.clone(),
            reason: format!("polyline has {} point(s), need at least 2", link.coords.len()),
        });
    }
    if !link.length.is_finite() || link.length < 0.0 {
        return Err(NetworkError::InvalidLength {
            link: link.id.clone(),
            length: link.length,
        });
    }
    Ok(())
}
