//! Nearest-vertex lookup over a fixed set of road vertices.

use crate::network::{Coord, RoadNetwork, RoadVertex, VertexId};
use crate::{NetworkError, Result};
use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// A vertex position tagged with its insertion order.
#[derive(Debug, Clone, Copy)]
struct IndexedVertex {
    order: usize,
    point: [f64; 2],
}

impl RTreeObject for IndexedVertex {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for IndexedVertex {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Static R-tree over road vertices.
///
/// Built once with a bulk load and read-only afterwards, so it can be shared
/// across threads. When several vertices are equally near, the one inserted
/// first wins.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    tree: RTree<IndexedVertex>,
    ids: Vec<VertexId>,
    coords: Vec<Coord>,
}

impl SpatialIndex {
    /// Build an index over `vertices`; iteration order defines tie-breaks.
    pub fn build<'a, I>(vertices: I) -> Self
    where
        I: IntoIterator<Item = &'a RoadVertex>,
    {
        let mut ids = Vec::new();
        let mut coords = Vec::new();
        let mut entries = Vec::new();
        for (order, vertex) in vertices.into_iter().enumerate() {
            ids.push(vertex.id.clone());
            coords.push(vertex.coord);
            entries.push(IndexedVertex {
                order,
                point: [vertex.coord.x, vertex.coord.y],
            });
        }

        Self {
            tree: RTree::bulk_load(entries),
            ids,
            coords,
        }
    }

    /// Build an index over every vertex of a network.
    pub fn from_network(network: &RoadNetwork) -> Self {
        Self::build(&network.vertices)
    }

    /// Number of indexed vertices.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True if no vertex was indexed.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Id of the vertex nearest to (x, y).
    pub fn nearest(&self, x: f64, y: f64) -> Result<&VertexId> {
        self.nearest_with_distance(x, y).map(|(id, _)| id)
    }

    /// Id of the vertex nearest to (x, y) and its Euclidean distance.
    pub fn nearest_with_distance(&self, x: f64, y: f64) -> Result<(&VertexId, f64)> {
        let (order, d2) = self.nearest_order(x, y)?;
        Ok((&self.ids[order], d2.sqrt()))
    }

    /// Id, position and distance of the vertex nearest to (x, y).
    pub fn nearest_with_coord(&self, x: f64, y: f64) -> Result<(&VertexId, Coord, f64)> {
        let (order, d2) = self.nearest_order(x, y)?;
        Ok((&self.ids[order], self.coords[order], d2.sqrt()))
    }

    /// Insertion order and squared distance of the nearest vertex.
    fn nearest_order(&self, x: f64, y: f64) -> Result<(usize, f64)> {
        if !x.is_finite() || !y.is_finite() {
            return Err(NetworkError::InvalidCoordinate { x, y });
        }

        let mut candidates = self.tree.nearest_neighbor_iter_with_distance_2(&[x, y]);
        let (first, best_d2) = candidates.next().ok_or(NetworkError::EmptyIndex)?;

        // The iterator yields in distance order; scan the whole tied group.
        let mut winner = first.order;
        for (candidate, d2) in candidates {
            if d2 > best_d2 {
                break;
            }
            winner = winner.min(candidate.order);
        }

        Ok((winner, best_d2))
    }
}
