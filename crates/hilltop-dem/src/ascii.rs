//! ESRI ASCII grid (`.asc`) reader.
//!
//! Layout:
//!
//! ```text
//! ncols         4
//! nrows         3
//! xllcorner     430000
//! yllcorner     80000
//! cellsize      5
//! NODATA_value  -9999
//! 12.5 13.0 ...
//! ```
//!
//! `xllcenter`/`yllcenter` and separate `dx`/`dy` cell sizes are accepted.
//! Header keys are case-insensitive. Samples may wrap across lines.

use crate::grid::{ElevationGrid, GridTransform};
use crate::{DemError, Result};
use std::io::BufRead;
use std::path::Path;

#[derive(Debug, Default)]
struct Header {
    ncols: Option<usize>,
    nrows: Option<usize>,
    xll: Option<(f64, bool)>,
    yll: Option<(f64, bool)>,
    cellsize: Option<f64>,
    dx: Option<f64>,
    dy: Option<f64>,
    nodata: Option<f32>,
}

fn invalid(line: usize, reason: impl Into<String>) -> DemError {
    DemError::InvalidAsciiGrid {
        line,
        reason: reason.into(),
    }
}

fn parse_number<T: std::str::FromStr>(line: usize, key: &str, raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| invalid(line, format!("bad value '{}' for {}", raw, key)))
}

/// Read an ASCII grid from any buffered reader.
pub fn read_ascii_grid<R: BufRead>(reader: R) -> Result<ElevationGrid> {
    let mut header = Header::default();
    let mut samples: Vec<f32> = Vec::new();
    let mut in_body = false;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let mut tokens = trimmed.split_whitespace();
        let first = tokens.next().unwrap_or_default();
        // `nan` and `inf` are samples, not keys.
        let is_key = first.starts_with(|c: char| c.is_ascii_alphabetic())
            && first.parse::<f32>().is_err();
        if !in_body && is_key {
            let value = tokens
                .next()
                .ok_or_else(|| invalid(line_no, format!("missing value for {}", first)))?;
            match first.to_ascii_lowercase().as_str() {
                "ncols" => header.ncols = Some(parse_number(line_no, first, value)?),
                "nrows" => header.nrows = Some(parse_number(line_no, first, value)?),
                "xllcorner" => header.xll = Some((parse_number(line_no, first, value)?, false)),
                "xllcenter" => header.xll = Some((parse_number(line_no, first, value)?, true)),
                "yllcorner" => header.yll = Some((parse_number(line_no, first, value)?, false)),
                "yllcenter" => header.yll = Some((parse_number(line_no, first, value)?, true)),
                "cellsize" => header.cellsize = Some(parse_number(line_no, first, value)?),
                "dx" => header.dx = Some(parse_number(line_no, first, value)?),
                "dy" => header.dy = Some(parse_number(line_no, first, value)?),
                "nodata_value" => header.nodata = Some(parse_number(line_no, first, value)?),
                other => {
                    tracing::debug!(line = line_no, "ignoring ASCII grid header key '{}'", other);
                }
            }
            continue;
        }

        in_body = true;
        for token in trimmed.split_whitespace() {
            samples.push(parse_number(line_no, "sample", token)?);
        }
    }

    let ncols = header.ncols.ok_or_else(|| invalid(0, "missing ncols"))?;
    let nrows = header.nrows.ok_or_else(|| invalid(0, "missing nrows"))?;
    let (dx, dy) = match (header.cellsize, header.dx, header.dy) {
        (_, Some(dx), Some(dy)) => (dx, dy),
        (Some(size), _, _) => (size, size),
        _ => return Err(invalid(0, "missing cellsize")),
    };
    let (xll, x_is_center) = header.xll.ok_or_else(|| invalid(0, "missing xllcorner"))?;
    let (yll, y_is_center) = header.yll.ok_or_else(|| invalid(0, "missing yllcorner"))?;
    let min_x = if x_is_center { xll - dx / 2.0 } else { xll };
    let min_y = if y_is_center { yll - dy / 2.0 } else { yll };

    if samples.len() != ncols * nrows {
        return Err(invalid(
            0,
            format!(
                "header declares {}x{} cells but body holds {} samples",
                ncols,
                nrows,
                samples.len()
            ),
        ));
    }

    ElevationGrid::from_north_up(
        GridTransform::new(min_x, min_y, dx, dy),
        ncols,
        nrows,
        &samples,
        header.nodata,
    )
}

impl ElevationGrid {
    /// Load an ESRI ASCII grid file.
    pub fn from_ascii_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        read_ascii_grid(std::io::BufReader::new(file))
    }
}
