//! Integration tests for hilltop-dem: load a grid from disk and search it.

use hilltop_dem::{load_grid, DemError, ElevationSampler};
use std::path::PathBuf;

/// Write `contents` to a uniquely named file in the system temp directory.
fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("hilltop-dem-{}-{}", std::process::id(), name));
    std::fs::write(&path, contents).expect("Failed to write temp grid");
    path
}

/// 6x5 hill with its summit at column 3 of the second line.
const HILL: &str = "\
ncols 6
nrows 5
xllcorner 1000
yllcorner 2000
cellsize 10
NODATA_value -9999
10 12 14 15 13 11
12 15 19 24 18 13
11 14 17 20 16 12
-9999 12 14 15 13 11
9 10 11 12 11 10
";

#[test]
fn test_load_and_sample_ascii_grid() {
    let path = write_temp("sample.asc", HILL);
    let grid = load_grid(&path).expect("Failed to load grid");

    assert_eq!(grid.dimensions(), (6, 5));
    let bounds = grid.bounds();
    assert_eq!((bounds.min_x, bounds.max_x), (1000.0, 1060.0));
    assert_eq!((bounds.min_y, bounds.max_y), (2000.0, 2050.0));

    // Second line from the top spans y 2030..2040.
    assert_eq!(grid.sample(1035.0, 2035.0).unwrap(), 24.0);
    assert!(matches!(grid.sample(1005.0, 2015.0), Err(DemError::NoData { .. })));
    assert!(matches!(grid.sample(1065.0, 2015.0), Err(DemError::OutOfBounds { .. })));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_peak_search_on_loaded_grid() {
    let path = write_temp("peak.asc", HILL);
    let grid = load_grid(&path).expect("Failed to load grid");

    let peak = grid.find_peak(1020.0, 2020.0, 25.0).expect("Buffer overlaps the grid");
    assert_eq!(peak.elevation, 24.0);
    assert_eq!((peak.x, peak.y), (1035.0, 2035.0));

    // Same buffer, same answer.
    let again = grid.find_peak(1020.0, 2020.0, 25.0).unwrap();
    assert_eq!((again.row, again.col), (peak.row, peak.col));

    let outside = grid.find_peak(5000.0, 5000.0, 100.0);
    assert!(matches!(outside, Err(DemError::NoIntersection { .. })));

    std::fs::remove_file(path).ok();
}
