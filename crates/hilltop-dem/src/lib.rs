//! # hilltop-dem
//!
//! Elevation grids for the hilltop route planner.
//!
//! This crate provides:
//! - [`ElevationGrid`]: a regular grid of elevation samples with an affine
//!   transform and an optional no-data mask
//! - [`ElevationSampler`]: single-cell point sampling shared by every consumer
//! - [`find_peak`]: the highest valid cell inside a circular buffer
//! - Readers for ESRI ASCII grids (`.asc`) and GeoTIFF (`.tif`)
//!
//! ## Coordinates
//!
//! All coordinates are planar and in the grid's own CRS. The row index
//! advances along x and the column index along y; see [`grid`] for details.
//!
//! ## Example
//!
//! ```no_run
//! use hilltop_dem::{load_grid, ElevationSampler};
//!
//! let grid = load_grid("data/elevation/SZ.asc")?;
//! let elevation = grid.sample(439619.0, 85800.0)?;
//! println!("Elevation: {} meters", elevation);
//!
//! let peak = grid.find_peak(439619.0, 85800.0, 5000.0)?;
//! println!("Highest point: ({}, {}) at {} m", peak.x, peak.y, peak.elevation);
//! # Ok::<(), hilltop_dem::DemError>(())
//! ```

mod ascii;
mod error;
mod geotiff;
pub mod grid;
mod peak;

pub use ascii::read_ascii_grid;
pub use error::DemError;
pub use grid::{ElevationGrid, ElevationSampler, GridBounds, GridTransform};
pub use peak::{find_peak, BufferQuery, ClippedRegion, Peak};

use std::path::Path;

/// Result type for DEM operations.
pub type Result<T> = std::result::Result<T, DemError>;

/// Load an elevation grid, choosing the reader from the file extension.
///
/// `.tif`/`.tiff` are read as GeoTIFF; everything else as an ASCII grid.
pub fn load_grid<P: AsRef<Path>>(path: P) -> Result<ElevationGrid> {
    let path = path.as_ref();
    let is_tiff = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("tif") || ext.eq_ignore_ascii_case("tiff"))
        .unwrap_or(false);

    let grid = if is_tiff {
        ElevationGrid::from_geotiff(path)?
    } else {
        ElevationGrid::from_ascii_file(path)?
    };

    let (rows, cols) = grid.dimensions();
    tracing::info!(rows, cols, "loaded elevation grid from {}", path.display());
    Ok(grid)
}
