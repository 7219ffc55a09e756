//! GeoJSON export of a planned route.

use hilltop_network::{Path, PathStep};
use serde_json::{json, Value};

fn step_feature(step: &PathStep) -> Value {
    let coordinates: Vec<[f64; 2]> = step.geometry.iter().map(|&c| c.into()).collect();
    json!({
        "type": "Feature",
        "properties": {
            "fid": step.link,
            "from": step.from,
            "to": step.to,
            "minutes": step.weight,
        },
        "geometry": {
            "type": "LineString",
            "coordinates": coordinates,
        },
    })
}

/// One LineString feature per step, in travel order, each tagged with the
/// road link id as `fid`. An empty path gives an empty collection.
pub fn path_to_geojson(path: &Path) -> Value {
    let features: Vec<Value> = path.steps.iter().map(step_feature).collect();
    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hilltop_network::Coord;

    #[test]
    fn test_feature_collection_layout() {
        let path = Path {
            steps: vec![PathStep {
                link: "osgb4000000026142077".into(),
                from: "a".into(),
                to: "b".into(),
                weight: 1.5,
                geometry: vec![Coord::new(450000.0, 85000.0), Coord::new(450010.0, 85000.0)],
            }],
            total_cost: 1.5,
        };

        let doc = path_to_geojson(&path);
        assert_eq!(doc["type"], "FeatureCollection");
        let feature = &doc["features"][0];
        assert_eq!(feature["properties"]["fid"], "osgb4000000026142077");
        assert_eq!(feature["geometry"]["type"], "LineString");
        assert_eq!(feature["geometry"]["coordinates"][1][0], 450010.0);
    }

    #[test]
    fn test_empty_path() {
        let path = Path {
            steps: vec![],
            total_cost: 0.0,
        };
        let doc = path_to_geojson(&path);
        assert_eq!(doc["features"].as_array().map(Vec::len), Some(0));
    }
}
