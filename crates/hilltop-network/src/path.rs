//! Least-cost path search over a [`RouteGraph`].

use crate::error::RouteError;
use crate::graph::RouteGraph;
use crate::network::{Coord, LinkId, VertexId};
use hilltop_metrics::metric_defs;
use serde::Serialize;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// One edge of a path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathStep {
    /// Link walked.
    pub link: LinkId,
    /// Vertex the step leaves.
    pub from: VertexId,
    /// Vertex the step reaches.
    pub to: VertexId,
    /// Travel time of this step in minutes.
    pub weight: f64,
    /// Link polyline, ordered from `from` to `to`.
    pub geometry: Vec<Coord>,
}

/// A least-cost route. Empty when source and target coincide.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Path {
    /// Steps in travel order.
    pub steps: Vec<PathStep>,
    /// Sum of step weights in minutes.
    pub total_cost: f64,
}

impl Path {
    /// True for the zero-length path.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Link ids in travel order.
    pub fn links(&self) -> impl Iterator<Item = &LinkId> {
        self.steps.iter().map(|step| &step.link)
    }

    /// Vertex ids visited, source first. Empty for the empty path.
    pub fn vertices(&self) -> Vec<&VertexId> {
        let mut vertices: Vec<&VertexId> = self.steps.first().map(|s| &s.from).into_iter().collect();
        vertices.extend(self.steps.iter().map(|step| &step.to));
        vertices
    }
}

#[derive(Debug, Clone, Copy)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct OpenVertex {
    cost: FloatOrd,
    vertex: usize,
}

/// Find the least-cost path from `source` to `target`.
///
/// Dijkstra's algorithm with early exit once the target is settled.
/// Parallel edges are relaxed independently, so the cheapest one is used.
pub fn shortest_path(graph: &RouteGraph, source: &VertexId, target: &VertexId) -> Result<Path, RouteError> {
    let start = graph
        .index_of(source)
        .ok_or_else(|| RouteError::UnknownVertex(source.clone()))?;
    let goal = graph
        .index_of(target)
        .ok_or_else(|| RouteError::UnknownVertex(target.clone()))?;

    if start == goal {
        return Ok(Path {
            steps: Vec::new(),
            total_cost: 0.0,
        });
    }

    let n = graph.vertex_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut settled = vec![false; n];
    let mut came_by: Vec<Option<usize>> = vec![None; n];
    let mut open: BinaryHeap<Reverse<OpenVertex>> = BinaryHeap::new();
    let mut settled_count = 0usize;

    dist[start] = 0.0;
    open.push(Reverse(OpenVertex {
        cost: FloatOrd(0.0),
        vertex: start,
    }));

    let mut reached = false;
    while let Some(Reverse(OpenVertex { cost, vertex })) = open.pop() {
        if settled[vertex] {
            continue;
        }
        settled[vertex] = true;
        settled_count += 1;

        if vertex == goal {
            reached = true;
            break;
        }

        for (edge, next) in graph.out_edges(vertex) {
            if settled[next] {
                continue;
            }
            let candidate = cost.0 + graph.edge_at(edge).weight;
            if candidate < dist[next] {
                dist[next] = candidate;
                came_by[next] = Some(edge);
                open.push(Reverse(OpenVertex {
                    cost: FloatOrd(candidate),
                    vertex: next,
                }));
            }
        }
    }

    metrics::histogram!(metric_defs::SEARCH_SETTLED.name).record(settled_count as f64);

    if !reached {
        metrics::counter!(metric_defs::SEARCH_NO_PATH.name).increment(1);
        tracing::debug!(from = %source, to = %target, settled = settled_count, "target unreachable");
        return Err(RouteError::NoPath {
            from: source.clone(),
            to: target.clone(),
        });
    }

    // Walk predecessor edges back from the goal.
    let mut steps = Vec::new();
    let mut at = goal;
    while let Some(edge_idx) = came_by[at] {
        let edge = graph.edge_at(edge_idx);
        let mut geometry = graph.link_geometry(&edge.link).map(<[Coord]>::to_vec).unwrap_or_default();
        if !edge.forward {
            geometry.reverse();
        }
        steps.push(PathStep {
            link: edge.link.clone(),
            from: edge.from.clone(),
            to: edge.to.clone(),
            weight: edge.weight,
            geometry,
        });
        at = match graph.index_of(&edge.from) {
            Some(idx) => idx,
            None => break,
        };
    }
    steps.reverse();

    let total_cost: f64 = steps.iter().map(|s| s.weight).sum();
    tracing::debug!(
        from = %graph.vertex_at(start),
        to = %graph.vertex_at(goal),
        steps = steps.len(),
        total_cost,
        settled = settled_count,
        "found shortest path"
    );

    Ok(Path { steps, total_cost })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoutingConfig;
    use crate::network::{RoadLink, RoadNetwork, RoadVertex};
    use approx::assert_relative_eq;
    use hilltop_dem::ElevationSampler;

    struct Flat;

    impl ElevationSampler for Flat {
        fn sample(&self, _x: f64, _y: f64) -> hilltop_dem::Result<f32> {
            Ok(0.0)
        }
    }

    fn unit_speed() -> RoutingConfig {
        RoutingConfig {
            walking_speed_m_per_min: 1.0,
            ..Default::default()
        }
    }

    fn graph_of(vertices: Vec<RoadVertex>, links: Vec<RoadLink>) -> RouteGraph {
        RouteGraph::build(&RoadNetwork::new(vertices, links), &Flat, &unit_speed())
            .unwrap()
            .graph
    }

    /// A - B - C in a line plus an expensive detour A - C.
    fn abc_graph() -> RouteGraph {
        let a = RoadVertex::new("A", 0.0, 0.0);
        let b = RoadVertex::new("B", 100.0, 0.0);
        let c = RoadVertex::new("C", 200.0, 0.0);
        let detour = RoadLink::new(
            "AC",
            "A",
            "C",
            500.0,
            vec![a.coord, Coord::new(100.0, 200.0), c.coord],
        );
        let links = vec![RoadLink::straight("AB", &a, &b), RoadLink::straight("BC", &b, &c), detour];
        graph_of(vec![a, b, c], links)
    }

    #[test]
    fn test_same_vertex_gives_empty_path() {
        let graph = abc_graph();
        let path = shortest_path(&graph, &"B".into(), &"B".into()).unwrap();
        assert!(path.is_empty());
        assert_eq!(path.total_cost, 0.0);
        assert!(path.vertices().is_empty());
    }

    #[test]
    fn test_line_scenario() {
        let graph = abc_graph();
        let path = shortest_path(&graph, &"A".into(), &"C".into()).unwrap();

        assert_relative_eq!(path.total_cost, 200.0, epsilon = 1e-9);
        let links: Vec<&str> = path.links().map(LinkId::as_str).collect();
        assert_eq!(links, ["AB", "BC"]);
        let vertices: Vec<&str> = path.vertices().into_iter().map(VertexId::as_str).collect();
        assert_eq!(vertices, ["A", "B", "C"]);
    }

    #[test]
    fn test_geometry_follows_travel_direction() {
        let graph = abc_graph();
        let path = shortest_path(&graph, &"C".into(), &"A".into()).unwrap();

        let links: Vec<&str> = path.links().map(LinkId::as_str).collect();
        assert_eq!(links, ["BC", "AB"]);
        assert_eq!(path.steps[0].geometry, vec![Coord::new(200.0, 0.0), Coord::new(100.0, 0.0)]);
        assert_eq!(path.steps[1].geometry.last(), Some(&Coord::new(0.0, 0.0)));
    }

    #[test]
    fn test_disconnected_gives_no_path() {
        let a = RoadVertex::new("A", 0.0, 0.0);
        let b = RoadVertex::new("B", 10.0, 0.0);
        let island = RoadVertex::new("Z", 500.0, 500.0);
        let links = vec![RoadLink::straight("AB", &a, &b)];
        let graph = graph_of(vec![a, b, island], links);

        let err = shortest_path(&graph, &"A".into(), &"Z".into()).unwrap_err();
        assert_eq!(
            err,
            RouteError::NoPath {
                from: "A".into(),
                to: "Z".into()
            }
        );
    }

    #[test]
    fn test_unknown_vertex() {
        let graph = abc_graph();
        assert_eq!(
            shortest_path(&graph, &"A".into(), &"nowhere".into()),
            Err(RouteError::UnknownVertex("nowhere".into()))
        );
        assert_eq!(
            shortest_path(&graph, &"nowhere".into(), &"A".into()),
            Err(RouteError::UnknownVertex("nowhere".into()))
        );
    }

    #[test]
    fn test_cheapest_parallel_edge_wins() {
        let a = RoadVertex::new("A", 0.0, 0.0);
        let b = RoadVertex::new("B", 10.0, 0.0);
        let long = RoadLink::new("long", "A", "B", 30.0, vec![a.coord, Coord::new(5.0, 8.0), b.coord]);
        let short = RoadLink::straight("short", &a, &b);
        let graph = graph_of(vec![a, b], vec![long, short]);

        let path = shortest_path(&graph, &"A".into(), &"B".into()).unwrap();
        assert_eq!(path.steps.len(), 1);
        assert_eq!(path.steps[0].link.as_str(), "short");
        assert_relative_eq!(path.total_cost, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_climb_penalty_is_directional() {
        struct Hill;
        impl ElevationSampler for Hill {
            fn sample(&self, x: f64, _y: f64) -> hilltop_dem::Result<f32> {
                Ok(if x > 50.0 { 100.0 } else { 0.0 })
            }
        }

        let a = RoadVertex::new("A", 0.0, 0.0);
        let b = RoadVertex::new("B", 100.0, 0.0);
        let link = RoadLink::straight("AB", &a, &b);
        let network = RoadNetwork::new(vec![a, b], vec![link]);
        let graph = RouteGraph::build(&network, &Hill, &unit_speed()).unwrap().graph;

        let up = shortest_path(&graph, &"A".into(), &"B".into()).unwrap();
        let down = shortest_path(&graph, &"B".into(), &"A".into()).unwrap();
        assert_relative_eq!(up.total_cost, 110.0, epsilon = 1e-9);
        assert_relative_eq!(down.total_cost, 100.0, epsilon = 1e-9);
    }
}
