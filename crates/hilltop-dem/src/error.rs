//! Error types for the DEM crate.

use thiserror::Error;

/// Errors that can occur when working with elevation data.
#[derive(Debug, Error)]
pub enum DemError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TIFF decoding error.
    #[error("TIFF decode error: {0}")]
    TiffDecode(#[from] tiff::TiffError),

    /// Invalid GeoTIFF - missing required tags.
    #[error("Invalid GeoTIFF: {0}")]
    InvalidGeoTiff(String),

    /// Malformed ESRI ASCII grid.
    #[error("Invalid ASCII grid at line {line}: {reason}")]
    InvalidAsciiGrid {
        /// 1-based line number where parsing failed.
        line: usize,
        /// What was wrong.
        reason: String,
    },

    /// Grid dimensions or geotransform are unusable.
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// Coordinate maps to a cell outside the grid.
    #[error("Coordinate ({x}, {y}) maps to cell ({row}, {col}) outside grid {rows}x{cols}")]
    OutOfBounds {
        /// Requested x (easting).
        x: f64,
        /// Requested y (northing).
        y: f64,
        /// Computed row index (along x).
        row: i64,
        /// Computed column index (along y).
        col: i64,
        /// Grid row count.
        rows: usize,
        /// Grid column count.
        cols: usize,
    },

    /// The cell containing the coordinate is masked as no-data.
    #[error("No elevation data at coordinate ({x}, {y})")]
    NoData {
        /// Requested x (easting).
        x: f64,
        /// Requested y (northing).
        y: f64,
    },

    /// The search buffer does not overlap the grid extent.
    #[error("Buffer of radius {radius} around ({x}, {y}) does not intersect the elevation grid")]
    NoIntersection {
        /// Buffer center x.
        x: f64,
        /// Buffer center y.
        y: f64,
        /// Buffer radius.
        radius: f64,
    },

    /// The buffer overlaps the grid but no valid cell center falls inside it.
    #[error("Buffer of radius {radius} around ({x}, {y}) contains no valid elevation cells")]
    NoValidCells {
        /// Buffer center x.
        x: f64,
        /// Buffer center y.
        y: f64,
        /// Buffer radius.
        radius: f64,
    },
}

impl DemError {
    /// True for sampling failures (`OutOfBounds` / `NoData`), as opposed to
    /// load or geometry errors.
    pub fn is_sampling_failure(&self) -> bool {
        matches!(self, DemError::OutOfBounds { .. } | DemError::NoData { .. })
    }
}
