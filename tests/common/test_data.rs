//! Test data generation utilities.
//!
//! Builders for GeoJSON and TopoJSON payloads and statistics records with
//! known shapes, written to temporary files when a test needs a path.

use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// A closed axis-aligned square ring
fn square_ring(min: [f64; 2], max: [f64; 2]) -> Value {
    json!([[
        [min[0], min[1]],
        [max[0], min[1]],
        [max[0], max[1]],
        [min[0], max[1]],
        [min[0], min[1]]
    ]])
}

/// A GeoJSON polygon feature with an id and a name property
pub fn square_feature(id: &str, name: &str, min: [f64; 2], max: [f64; 2]) -> Value {
    json!({
        "type": "Feature",
        "id": id,
        "properties": { "name": name },
        "geometry": { "type": "Polygon", "coordinates": square_ring(min, max) }
    })
}

/// Three regions spanning ([-5, 0], [12, 20])
pub fn regions_geojson() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            square_feature("A", "Alpha", [0.0, 0.0], [10.0, 10.0]),
            square_feature("B", "Beta", [-5.0, 2.0], [3.0, 20.0]),
            square_feature("C", "Gamma", [10.0, 10.0], [12.0, 12.0])
        ]
    })
}

/// Two unit squares sharing the edge x = 1, quantized with scale 1 and
/// translate 0 so decoded coordinates equal the arc points.
///
/// Arc 0 runs down the shared edge, arc 1 is the rest of the left square
/// and arc 2 the rest of the right square.
pub fn shared_edge_topology() -> Value {
    json!({
        "type": "Topology",
        "transform": { "scale": [1.0, 1.0], "translate": [0.0, 0.0] },
        "objects": {
            "regions": {
                "type": "GeometryCollection",
                "geometries": [
                    { "type": "Polygon", "id": "L", "properties": { "name": "Left" }, "arcs": [[0, 1]] },
                    { "type": "Polygon", "id": "R", "properties": { "name": "Right" }, "arcs": [[2, -1]] }
                ]
            }
        },
        "arcs": [
            [[1, 1], [0, -1]],
            [[1, 0], [-1, 0], [0, 1], [1, 0]],
            [[1, 1], [1, 0], [0, -1], [-1, 0]]
        ]
    })
}

/// One statistics record
pub fn record(id: &str, value: f64) -> Value {
    json!({ "id": id, "value": value })
}

/// Records for the regions fixture; "C" deliberately has no statistic
pub fn regions_records() -> Value {
    json!([record("A", 1.0), record("B", 20.0), { "id": "C", "value": "n/a" }])
}

/// Write `payload` to `dir/name` and return the path
pub fn write_json(dir: &Path, name: &str, payload: &Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, payload.to_string()).expect("Failed to write fixture");
    path
}
