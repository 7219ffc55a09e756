//! Error types for network loading, graph building and routing.

use crate::network::{LinkId, VertexId};
use hilltop_dem::DemError;
use thiserror::Error;

/// Errors raised while loading a network, indexing it, or building a graph.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Nearest-vertex query against an index with no vertices.
    #[error("Spatial index is empty")]
    EmptyIndex,

    /// Query coordinate is NaN or infinite.
    #[error("Invalid query coordinate ({x}, {y})")]
    InvalidCoordinate {
        /// Query x.
        x: f64,
        /// Query y.
        y: f64,
    },

    /// Two vertices share an identifier.
    #[error("Duplicate vertex id '{0}'")]
    DuplicateVertex(VertexId),

    /// A link references a vertex that is not in the network.
    #[error("Link '{link}' references unknown vertex '{vertex}'")]
    UnknownVertex {
        /// Offending link.
        link: LinkId,
        /// Missing vertex.
        vertex: VertexId,
    },

    /// A link's geometry cannot be walked.
    #[error("Link '{link}' is malformed: {reason}")]
    MalformedLink {
        /// Offending link.
        link: LinkId,
        /// What was wrong.
        reason: String,
    },

    /// A link's length is negative or not finite.
    #[error("Link '{link}' has invalid length {length}")]
    InvalidLength {
        /// Offending link.
        link: LinkId,
        /// The length as supplied.
        length: f64,
    },

    /// Elevation could not be sampled somewhere along a link.
    #[error("Elevation unavailable along link '{link}': {source}")]
    LinkElevationUnavailable {
        /// Offending link.
        link: LinkId,
        /// The sampling failure.
        #[source]
        source: DemError,
    },

    /// Routing configuration is unusable.
    #[error("Invalid routing configuration: {0}")]
    InvalidConfig(String),
}

/// Outcomes of a shortest path query other than a path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The vertex id is not part of the graph.
    #[error("Vertex '{0}' is not in the route graph")]
    UnknownVertex(VertexId),

    /// The target cannot be reached from the source.
    #[error("No path from '{from}' to '{to}'")]
    NoPath {
        /// Search origin.
        from: VertexId,
        /// Unreachable destination.
        to: VertexId,
    },
}
