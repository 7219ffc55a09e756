//! End-to-end tests: YAML config, ASCII grid and ITN network on disk.

use approx::assert_relative_eq;
use hilltop_runner::{path_to_geojson, PlanError, Planner, RouteOutcome, RunnerConfig};
use std::path::PathBuf;

/// 5 x 5 grid of 100 m cells. The summit (50 m) is on the second line from
/// the top, third column: cell centre (1250, 2350).
const GRID: &str = "\
ncols 5
nrows 5
xllcorner 1000
yllcorner 2000
cellsize 100
NODATA_value -9999
10 12 14 12 10
12 20 50 20 12
11 15 20 15 11
10 12 14 12 10
-9999 10 11 10 9
";

/// A road from the south-west up to the summit, with a flat bypass to the
/// east and a spur into the no-data corner.
const NETWORK: &str = r#"{
    "roadnodes": {
        "base": {"coords": [1150.0, 2150.0]},
        "summit": {"coords": [1250.0, 2340.0]},
        "bypass": {"coords": [1450.0, 2150.0]},
        "corner": {"coords": [1050.0, 2050.0]}
    },
    "roadlinks": {
        "climb": {"start": "base", "end": "summit", "length": 215.0,
                  "coords": [[1150.0, 2150.0], [1150.0, 2250.0], [1250.0, 2340.0]]},
        "flat": {"start": "base", "end": "bypass", "length": 300.0,
                 "coords": [[1150.0, 2150.0], [1450.0, 2150.0]]},
        "spur": {"start": "corner", "end": "base", "length": 141.0,
                 "coords": [[1050.0, 2050.0], [1150.0, 2150.0]]}
    }
}"#;

struct Fixture {
    dir: PathBuf,
}

impl Fixture {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("hilltop-e2e-{}-{}", std::process::id(), name));
        std::fs::create_dir_all(&dir).expect("Failed to create fixture dir");
        std::fs::write(dir.join("grid.asc"), GRID).expect("Failed to write grid");
        std::fs::write(dir.join("itn.json"), NETWORK).expect("Failed to write network");
        std::fs::write(
            dir.join("hilltop.yaml"),
            "elevation_path: grid.asc\nnetwork_path: itn.json\nsearch_radius_m: 300\n",
        )
        .expect("Failed to write config");
        Self { dir }
    }

    fn config(&self) -> RunnerConfig {
        RunnerConfig::from_file(self.dir.join("hilltop.yaml")).expect("Failed to load config")
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.dir).ok();
    }
}

#[test]
fn test_plan_to_summit() {
    let fixture = Fixture::new("summit");
    let planner = Planner::load(&fixture.config()).expect("Failed to build planner");

    // The spur starts on a no-data cell and is left out.
    let skipped: Vec<&str> = planner.skipped_links().iter().map(|l| l.as_str()).collect();
    assert_eq!(skipped, ["spur"]);

    let plan = planner.plan(1160.0, 2140.0).expect("Planning failed");
    let RouteOutcome::Routed {
        high_ground,
        start,
        end,
        path,
    } = &plan.outcome
    else {
        panic!("expected a route, got {:?}", plan.outcome);
    };

    assert_eq!((high_ground.x, high_ground.y), (1250.0, 2350.0));
    assert_eq!(high_ground.elevation, 50.0);
    assert_eq!(start.id.as_str(), "base");
    assert_eq!(end.id.as_str(), "summit");

    // Samples 12 -> 15 -> 50 along the climb: 38 m of ascent.
    let speed = 5.0 / 3.6 * 60.0;
    assert_relative_eq!(path.total_cost, 215.0 / speed + 3.8, epsilon = 1e-9);

    let doc = path_to_geojson(path);
    assert_eq!(doc["features"][0]["properties"]["fid"], "climb");
    assert_eq!(doc["features"][0]["geometry"]["coordinates"][0][0], 1150.0);
}

#[test]
fn test_plan_far_away_has_no_high_ground() {
    let fixture = Fixture::new("far");
    let planner = Planner::load(&fixture.config()).unwrap();

    let plan = planner.plan(90000.0, 90000.0).unwrap();
    assert!(matches!(plan.outcome, RouteOutcome::NoHighGround { .. }));

    let json = serde_json::to_string(&plan).unwrap();
    assert!(json.contains("\"outcome\":\"no_high_ground\""));
}

#[test]
fn test_missing_network_file() {
    let fixture = Fixture::new("missing");
    let mut config = fixture.config();
    config.network_path = fixture.dir.join("nope.json");

    assert!(matches!(Planner::load(&config), Err(PlanError::Network(_))));
}
