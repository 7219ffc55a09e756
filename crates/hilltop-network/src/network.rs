//! Road network model and ITN-style JSON reader.

use crate::{NetworkError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Identifier of a road vertex (e.g. `osgb4000000026219230`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(pub String);

/// Identifier of a road link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(pub String);

macro_rules! string_id {
    ($ty:ident) => {
        impl $ty {
            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $ty {
            fn from(s: &str) -> Self {
                $ty(s.to_string())
            }
        }

        impl From<String> for $ty {
            fn from(s: String) -> Self {
                $ty(s)
            }
        }
    };
}

string_id!(VertexId);
string_id!(LinkId);

/// A planar coordinate. Serialized as `[x, y]`; extra ordinates such as a
/// z value are dropped on input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct Coord {
    /// Easting.
    pub x: f64,
    /// Northing.
    pub y: f64,
}

impl Coord {
    /// Create a coordinate.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another coordinate.
    pub fn distance(&self, other: &Coord) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl TryFrom<Vec<f64>> for Coord {
    type Error = String;

    fn try_from(v: Vec<f64>) -> std::result::Result<Self, Self::Error> {
        match v.as_slice() {
            [x, y, ..] => Ok(Coord::new(*x, *y)),
            _ => Err(format!("coordinate needs at least 2 ordinates, got {}", v.len())),
        }
    }
}

impl From<Coord> for [f64; 2] {
    fn from(c: Coord) -> Self {
        [c.x, c.y]
    }
}

impl From<(f64, f64)> for Coord {
    fn from((x, y): (f64, f64)) -> Self {
        Coord::new(x, y)
    }
}

/// A routable vertex.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadVertex {
    /// Unique identifier.
    pub id: VertexId,
    /// Location in the network's CRS.
    pub coord: Coord,
}

impl RoadVertex {
    /// Create a vertex.
    pub fn new(id: impl Into<VertexId>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            coord: Coord::new(x, y),
        }
    }
}

/// A road segment between two vertices. Undirected as data; the route graph
/// gives each direction its own cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadLink {
    /// Unique identifier.
    pub id: LinkId,
    /// Vertex at the first polyline point.
    pub start: VertexId,
    /// Vertex at the last polyline point.
    pub end: VertexId,
    /// Real-world length in meters.
    pub length: f64,
    /// Polyline from `start` to `end`.
    pub coords: Vec<Coord>,
}

impl RoadLink {
    /// Create a link.
    pub fn new(
        id: impl Into<LinkId>,
        start: impl Into<VertexId>,
        end: impl Into<VertexId>,
        length: f64,
        coords: Vec<Coord>,
    ) -> Self {
        Self {
            id: id.into(),
            start: start.into(),
            end: end.into(),
            length,
            coords,
        }
    }

    /// Straight link whose length is the distance between its endpoints.
    pub fn straight(
        id: impl Into<LinkId>,
        start: &RoadVertex,
        end: &RoadVertex,
    ) -> Self {
        Self::new(
            id,
            start.id.clone(),
            end.id.clone(),
            start.coord.distance(&end.coord),
            vec![start.coord, end.coord],
        )
    }
}

/// A full road network in the order it was supplied.
///
/// Vertex order matters: it is the tie-break order of the spatial index.
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    /// All vertices.
    pub vertices: Vec<RoadVertex>,
    /// All links.
    pub links: Vec<RoadLink>,
}

impl RoadNetwork {
    /// Create a network from vertices and links.
    pub fn new(vertices: Vec<RoadVertex>, links: Vec<RoadLink>) -> Self {
        Self { vertices, links }
    }

    /// Look up a vertex by id (linear scan).
    pub fn vertex(&self, id: &VertexId) -> Option<&RoadVertex> {
        self.vertices.iter().find(|v| &v.id == id)
    }

    /// Look up a link by id (linear scan).
    pub fn link(&self, id: &LinkId) -> Option<&RoadLink> {
        self.links.iter().find(|l| &l.id == id)
    }

    /// Read an ITN-style network document.
    ///
    /// ```json
    /// {
    ///   "roadnodes": { "<id>": { "coords": [x, y] } },
    ///   "roadlinks": { "<id>": { "start": "<id>", "end": "<id>",
    ///                            "length": 12.5, "coords": [[x, y], ...] } }
    /// }
    /// ```
    ///
    /// Object order in the file is preserved. Unknown fields are ignored.
    pub fn from_itn_reader<R: Read>(reader: R) -> Result<Self> {
        let document: ItnDocument = serde_json::from_reader(reader)?;
        Self::from_itn_document(document)
    }

    /// Read an ITN-style network document from a file.
    pub fn from_itn_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let network = Self::from_itn_reader(std::io::BufReader::new(file))?;
        tracing::info!(
            vertices = network.vertices.len(),
            links = network.links.len(),
            "loaded road network from {}",
            path.display()
        );
        Ok(network)
    }

    fn from_itn_document(document: ItnDocument) -> Result<Self> {
        let mut vertices = Vec::with_capacity(document.roadnodes.len());
        for (id, value) in document.roadnodes {
            let node: ItnNode = serde_json::from_value(value)?;
            vertices.push(RoadVertex {
                id: VertexId(id),
                coord: node.coords,
            });
        }

        let mut links = Vec::with_capacity(document.roadlinks.len());
        for (id, value) in document.roadlinks {
            let link: ItnLink = serde_json::from_value(value)?;
            links.push(RoadLink {
                id: LinkId(id),
                start: link.start,
                end: link.end,
                length: link.length,
                coords: link.coords,
            });
        }

        Ok(Self { vertices, links })
    }

    /// Map from vertex id to position, failing on duplicates.
    pub(crate) fn vertex_positions(&self) -> Result<HashMap<VertexId, usize>> {
        let mut positions = HashMap::with_capacity(self.vertices.len());
        for (idx, vertex) in self.vertices.iter().enumerate() {
            if positions.insert(vertex.id.clone(), idx).is_some() {
                return Err(NetworkError::DuplicateVertex(vertex.id.clone()));
            }
        }
        Ok(positions)
    }
}

// ============================================================================
// JSON Schema Types
// ============================================================================

/// Root of an ITN network document. Maps are kept as raw JSON objects so
/// that key order survives deserialization.
#[derive(Debug, Deserialize)]
struct ItnDocument {
    #[serde(default)]
    roadnodes: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    roadlinks: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ItnNode {
    coords: Coord,
}

#[derive(Debug, Deserialize)]
struct ItnLink {
    start: VertexId,
    end: VertexId,
    length: f64,
    coords: Vec<Coord>,
}
