//! In-memory elevation grid and the shared point sampler.
//!
//! Index convention: the row index advances along x (easting) and the column
//! index advances along y (northing), both measured from the lower-left
//! corner of the grid. Every consumer resolves coordinates through
//! [`ElevationGrid::cell_index`], so the peak finder and the route graph
//! builder always agree on which cell a point falls in.

use crate::{DemError, Result};
use serde::Serialize;

/// Tolerance used when comparing a cell against the no-data sentinel.
const NO_DATA_TOLERANCE: f32 = 0.001;

/// Affine mapping between grid indices and planar world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridTransform {
    /// World x of the grid's lower-left corner.
    pub min_x: f64,
    /// World y of the grid's lower-left corner.
    pub min_y: f64,
    /// Cell extent along x.
    pub cell_width: f64,
    /// Cell extent along y.
    pub cell_height: f64,
}

impl GridTransform {
    /// Create a transform from an origin and cell size.
    pub fn new(min_x: f64, min_y: f64, cell_width: f64, cell_height: f64) -> Self {
        Self {
            min_x,
            min_y,
            cell_width,
            cell_height,
        }
    }

    /// Fractional (row, col) position of a world coordinate.
    pub fn fractional_index(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.min_x) / self.cell_width,
            (y - self.min_y) / self.cell_height,
        )
    }

    /// Resolve a world coordinate to the cell containing it in a grid of
    /// `rows` x `cols` cells laid out by this transform.
    ///
    /// Uses `floor`, so a point on a shared cell edge belongs to the cell
    /// whose lower edge it lies on. The far edges are exclusive.
    pub fn cell_index(&self, x: f64, y: f64, rows: usize, cols: usize) -> Result<(usize, usize)> {
        let (fr, fc) = self.fractional_index(x, y);
        let row = fr.floor();
        let col = fc.floor();

        // NaN fails both comparisons and is reported as out of bounds.
        let in_rows = row >= 0.0 && row < rows as f64;
        let in_cols = col >= 0.0 && col < cols as f64;
        if !(in_rows && in_cols) {
            return Err(DemError::OutOfBounds {
                x,
                y,
                row: row as i64,
                col: col as i64,
                rows,
                cols,
            });
        }

        Ok((row as usize, col as usize))
    }

    /// World coordinate of the center of cell (row, col).
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.min_x + (row as f64 + 0.5) * self.cell_width,
            self.min_y + (col as f64 + 0.5) * self.cell_height,
        )
    }

    /// Transform for a window of cells starting at (row_offset, col_offset).
    pub fn offset(&self, row_offset: usize, col_offset: usize) -> Self {
        Self {
            min_x: self.min_x + row_offset as f64 * self.cell_width,
            min_y: self.min_y + col_offset as f64 * self.cell_height,
            ..*self
        }
    }
}

/// Axis-aligned planar bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridBounds {
    /// West edge.
    pub min_x: f64,
    /// South edge.
    pub min_y: f64,
    /// East edge.
    pub max_x: f64,
    /// North edge.
    pub max_y: f64,
}

impl GridBounds {
    /// Check if a coordinate is within the bounds (edges inclusive).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Euclidean distance from a point to the rectangle (zero inside).
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        let dx = (self.min_x - x).max(0.0).max(x - self.max_x);
        let dy = (self.min_y - y).max(0.0).max(y - self.max_y);
        dx.hypot(dy)
    }

    /// Intersection of two rectangles, if it has positive area.
    pub fn intersection(&self, other: &GridBounds) -> Option<GridBounds> {
        let min_x = self.min_x.max(other.min_x);
        let min_y = self.min_y.max(other.min_y);
        let max_x = self.max_x.min(other.max_x);
        let max_y = self.max_y.min(other.max_y);
        (min_x < max_x && min_y < max_y).then_some(GridBounds {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }
}

/// Anything that can answer "what is the elevation here?".
///
/// The route graph builder is generic over this so it can be driven by a
/// grid, a clipped region, or a test fixture.
pub trait ElevationSampler {
    /// Elevation of the cell containing (x, y).
    fn sample(&self, x: f64, y: f64) -> Result<f32>;
}

impl<S: ElevationSampler + ?Sized> ElevationSampler for &S {
    fn sample(&self, x: f64, y: f64) -> Result<f32> {
        (**self).sample(x, y)
    }
}

/// A regular grid of elevation samples.
///
/// Values are stored row-major: `data[row * cols + col]`.
#[derive(Debug, Clone)]
pub struct ElevationGrid {
    data: Vec<f32>,
    rows: usize,
    cols: usize,
    transform: GridTransform,
    /// Cells equal to this value are treated as missing.
    no_data_value: Option<f32>,
}

impl ElevationGrid {
    /// Create a grid from row-major values.
    ///
    /// Fails when the dimensions are empty, the data length does not match,
    /// or the cell size is not a positive finite number.
    pub fn new(
        transform: GridTransform,
        rows: usize,
        cols: usize,
        data: Vec<f32>,
        no_data_value: Option<f32>,
    ) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(DemError::InvalidGrid(format!(
                "grid must have at least one cell, got {}x{}",
                rows, cols
            )));
        }
        if data.len() != rows * cols {
            return Err(DemError::InvalidGrid(format!(
                "expected {} values for a {}x{} grid, got {}",
                rows * cols,
                rows,
                cols,
                data.len()
            )));
        }
        let sizes_ok = transform.cell_width.is_finite()
            && transform.cell_width > 0.0
            && transform.cell_height.is_finite()
            && transform.cell_height > 0.0;
        if !sizes_ok || !transform.min_x.is_finite() || !transform.min_y.is_finite() {
            return Err(DemError::InvalidGrid(format!(
                "unusable geotransform {:?}",
                transform
            )));
        }

        Ok(Self {
            data,
            rows,
            cols,
            transform,
            no_data_value,
        })
    }

    /// Build a grid from a closure evaluated at every (row, col).
    pub fn from_fn<F>(transform: GridTransform, rows: usize, cols: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> f32,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                data.push(f(row, col));
            }
        }
        Self::new(transform, rows, cols, data, None)
    }

    /// Build a grid from raster-ordered samples: `width` samples per line,
    /// lines running north to south, as stored by ASCII grids and GeoTIFFs.
    ///
    /// The samples are transposed so that rows advance along x and columns
    /// advance along y from the south edge.
    pub fn from_north_up(
        transform: GridTransform,
        width: usize,
        height: usize,
        samples: &[f32],
        no_data_value: Option<f32>,
    ) -> Result<Self> {
        if samples.len() != width * height {
            return Err(DemError::InvalidGrid(format!(
                "expected {} samples for a {}x{} raster, got {}",
                width * height,
                width,
                height,
                samples.len()
            )));
        }

        let mut data = vec![0.0f32; width * height];
        for (line, chunk) in samples.chunks_exact(width.max(1)).enumerate() {
            let col = height - 1 - line;
            for (row, value) in chunk.iter().enumerate() {
                data[row * height + col] = *value;
            }
        }
        Self::new(transform, width, height, data, no_data_value)
    }

    /// Attach a no-data sentinel.
    pub fn with_no_data(mut self, no_data_value: f32) -> Self {
        self.no_data_value = Some(no_data_value);
        self
    }

    /// Number of rows (cells along x).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (cells along y).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get the dimensions as (rows, cols).
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// The grid's affine transform.
    pub fn transform(&self) -> GridTransform {
        self.transform
    }

    /// The no-data sentinel, if any.
    pub fn no_data_value(&self) -> Option<f32> {
        self.no_data_value
    }

    /// Get the resolution as (cell_width, cell_height).
    pub fn resolution(&self) -> (f64, f64) {
        (self.transform.cell_width, self.transform.cell_height)
    }

    /// Planar extent of the grid.
    pub fn bounds(&self) -> GridBounds {
        let t = &self.transform;
        GridBounds {
            min_x: t.min_x,
            min_y: t.min_y,
            max_x: t.min_x + self.rows as f64 * t.cell_width,
            max_y: t.min_y + self.cols as f64 * t.cell_height,
        }
    }

    /// Resolve a world coordinate to the (row, col) of its enclosing cell.
    pub fn cell_index(&self, x: f64, y: f64) -> Result<(usize, usize)> {
        self.transform.cell_index(x, y, self.rows, self.cols)
    }

    /// Raw stored value of a cell, ignoring the no-data mask.
    ///
    /// # Panics
    /// Panics if the indices are out of range.
    pub fn raw(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.cols + col]
    }

    /// True if the cell holds a usable elevation.
    pub fn is_valid(&self, row: usize, col: usize) -> bool {
        let value = self.raw(row, col);
        if value.is_nan() {
            return false;
        }
        match self.no_data_value {
            Some(nodata) => (value - nodata).abs() >= NO_DATA_TOLERANCE,
            None => true,
        }
    }

    /// Value of a cell, or `None` when out of range or masked.
    pub fn cell(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows || col >= self.cols || !self.is_valid(row, col) {
            return None;
        }
        Some(self.raw(row, col))
    }

    /// Elevation of the cell containing (x, y). No interpolation.
    pub fn value_at(&self, x: f64, y: f64) -> Result<f32> {
        let (row, col) = self.cell_index(x, y)?;
        if !self.is_valid(row, col) {
            return Err(DemError::NoData { x, y });
        }
        Ok(self.raw(row, col))
    }
}

impl ElevationSampler for ElevationGrid {
    fn sample(&self, x: f64, y: f64) -> Result<f32> {
        self.value_at(x, y)
    }
}
