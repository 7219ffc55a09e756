//! Highest-cell search inside a circular buffer.

use crate::grid::{ElevationGrid, ElevationSampler, GridBounds, GridTransform};
use crate::{DemError, Result};
use hilltop_metrics::metric_defs;
use serde::Serialize;

/// A circular search area around a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BufferQuery {
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    /// Radius in map units (meters for projected grids).
    pub radius: f64,
}

impl BufferQuery {
    /// Create a buffer query.
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }

    /// True if (x, y) is inside or on the circle.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let dx = x - self.x;
        let dy = y - self.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }

    /// Bounding square of the circle.
    pub fn bounds(&self) -> GridBounds {
        GridBounds {
            min_x: self.x - self.radius,
            min_y: self.y - self.radius,
            max_x: self.x + self.radius,
            max_y: self.y + self.radius,
        }
    }

    fn no_intersection(&self) -> DemError {
        DemError::NoIntersection {
            x: self.x,
            y: self.y,
            radius: self.radius,
        }
    }
}

/// The part of a grid that falls inside a buffer.
///
/// Cells of the cropped window whose center lies outside the circle, or that
/// are no-data in the parent grid, are masked invalid.
#[derive(Debug, Clone)]
pub struct ClippedRegion {
    values: Vec<f32>,
    valid: Vec<bool>,
    rows: usize,
    cols: usize,
    /// Maps local (row, col) to world coordinates.
    transform: GridTransform,
    row_offset: usize,
    col_offset: usize,
    query: BufferQuery,
    /// Bounding box of the circle/extent intersection.
    clip_bounds: GridBounds,
}

impl ClippedRegion {
    /// Window dimensions as (rows, cols).
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Local affine transform of the window.
    pub fn transform(&self) -> GridTransform {
        self.transform
    }

    /// Position of the window's first cell in the parent grid.
    pub fn offset(&self) -> (usize, usize) {
        (self.row_offset, self.col_offset)
    }

    /// The buffer this region was clipped to.
    pub fn query(&self) -> BufferQuery {
        self.query
    }

    /// Bounding rectangle of the buffer/extent intersection.
    pub fn clip_bounds(&self) -> GridBounds {
        self.clip_bounds
    }

    /// Value of a local cell, `None` when masked or out of range.
    pub fn cell(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let idx = row * self.cols + col;
        self.valid[idx].then(|| self.values[idx])
    }

    /// Number of unmasked cells.
    pub fn valid_count(&self) -> usize {
        self.valid.iter().filter(|v| **v).count()
    }

    /// Valid cells in row-major order as (local_row, local_col, value).
    pub fn valid_cells(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        (0..self.rows * self.cols)
            .filter(move |idx| self.valid[*idx])
            .map(move |idx| (idx / self.cols, idx % self.cols, self.values[idx]))
    }
}

impl ElevationSampler for ClippedRegion {
    fn sample(&self, x: f64, y: f64) -> Result<f32> {
        let (row, col) = self.transform.cell_index(x, y, self.rows, self.cols)?;
        self.cell(row, col).ok_or(DemError::NoData { x, y })
    }
}

/// Result of a peak search.
#[derive(Debug, Clone)]
pub struct Peak {
    /// World x of the winning cell's center.
    pub x: f64,
    /// World y of the winning cell's center.
    pub y: f64,
    /// Elevation of the winning cell.
    pub elevation: f32,
    /// Row of the winning cell in the parent grid.
    pub row: usize,
    /// Column of the winning cell in the parent grid.
    pub col: usize,
    /// The clipped window the search ran over.
    pub region: ClippedRegion,
}

/// Find the highest cell of `grid` inside `query`.
///
/// Returns [`DemError::NoIntersection`] when the buffer and the grid extent
/// share no area (including a zero or non-finite radius), and
/// [`DemError::NoValidCells`] when they overlap but no unmasked cell center
/// falls in the circle. Ties go to the first cell in row-major order.
pub fn find_peak(grid: &ElevationGrid, query: BufferQuery) -> Result<Peak> {
    let radius_ok = query.radius.is_finite() && query.radius > 0.0;
    if !radius_ok || !query.x.is_finite() || !query.y.is_finite() {
        return Err(query.no_intersection());
    }

    let extent = grid.bounds();
    if extent.distance_to(query.x, query.y) >= query.radius {
        return Err(query.no_intersection());
    }
    let clip_bounds = query
        .bounds()
        .intersection(&extent)
        .ok_or_else(|| query.no_intersection())?;

    let (rows, cols) = grid.dimensions();
    let transform = grid.transform();
    let (r0, c0) = transform.fractional_index(clip_bounds.min_x, clip_bounds.min_y);
    let (r1, c1) = transform.fractional_index(clip_bounds.max_x, clip_bounds.max_y);
    let row_start = (r0.floor().max(0.0) as usize).min(rows - 1);
    let col_start = (c0.floor().max(0.0) as usize).min(cols - 1);
    let row_end = (r1.ceil() as usize).clamp(row_start + 1, rows);
    let col_end = (c1.ceil() as usize).clamp(col_start + 1, cols);

    let win_rows = row_end - row_start;
    let win_cols = col_end - col_start;
    let mut values = Vec::with_capacity(win_rows * win_cols);
    let mut valid = Vec::with_capacity(win_rows * win_cols);
    for row in row_start..row_end {
        for col in col_start..col_end {
            let (cx, cy) = transform.cell_center(row, col);
            values.push(grid.raw(row, col));
            valid.push(query.contains(cx, cy) && grid.is_valid(row, col));
        }
    }

    let region = ClippedRegion {
        values,
        valid,
        rows: win_rows,
        cols: win_cols,
        transform: transform.offset(row_start, col_start),
        row_offset: row_start,
        col_offset: col_start,
        query,
        clip_bounds,
    };

    let mut best: Option<(usize, usize, f32)> = None;
    let mut scanned = 0usize;
    for (row, col, value) in region.valid_cells() {
        scanned += 1;
        // Strict comparison keeps the first cell of a plateau.
        if best.map_or(true, |(_, _, top)| value > top) {
            best = Some((row, col, value));
        }
    }
    metrics::histogram!(metric_defs::PEAK_CELLS_SCANNED.name).record(scanned as f64);

    let (local_row, local_col, elevation) = best.ok_or(DemError::NoValidCells {
        x: query.x,
        y: query.y,
        radius: query.radius,
    })?;
    let (x, y) = region.transform.cell_center(local_row, local_col);
    tracing::debug!(
        x,
        y,
        elevation,
        scanned,
        "peak found within {} of ({}, {})",
        query.radius,
        query.x,
        query.y
    );

    Ok(Peak {
        x,
        y,
        elevation,
        row: row_start + local_row,
        col: col_start + local_col,
        region,
    })
}

impl ElevationGrid {
    /// Find the highest cell within `radius` of (x, y). See [`find_peak`].
    pub fn find_peak(&self, x: f64, y: f64, radius: f64) -> Result<Peak> {
        find_peak(self, BufferQuery::new(x, y, radius))
    }
}
