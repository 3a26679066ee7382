//! TopoJSON decoding.
//!
//! A topology stores shared boundary arcs once; geometries reference arcs by
//! index (`~i`, i.e. `-i - 1`, means arc `i` traversed backwards). Quantized
//! topologies carry a `transform` and delta-encode the arc positions.

use geo::{
    Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Point, Polygon,
};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::feature::{value_to_key, Feature};
use crate::error::{ChoroplethError, Result};

/// Quantization transform of a topology
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

impl Transform {
    fn apply(&self, x: f64, y: f64) -> Coord<f64> {
        Coord {
            x: x * self.scale[0] + self.translate[0],
            y: y * self.scale[1] + self.translate[1],
        }
    }
}

/// A topology document; objects are decoded lazily by name
#[derive(Debug, Clone, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub transform: Option<Transform>,
    #[serde(default)]
    pub arcs: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    pub objects: Map<String, Value>,
}

/// One object of a topology; `geometry` is `None` for `"type": null` members
#[derive(Debug, Clone)]
pub struct TopoObject {
    pub id: Option<Value>,
    pub properties: Option<Map<String, Value>>,
    pub geometry: Option<TopoGeometry>,
}

impl<'de> Deserialize<'de> for TopoObject {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let id = value.get("id").filter(|id| !id.is_null()).cloned();
        let properties = match value.get("properties") {
            Some(Value::Object(properties)) => Some(properties.clone()),
            _ => None,
        };
        let geometry = match value.get("type") {
            None | Some(Value::Null) => None,
            Some(_) => Some(TopoGeometry::deserialize(value).map_err(D::Error::custom)?),
        };

        Ok(TopoObject {
            id,
            properties,
            geometry,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum TopoGeometry {
    Point { coordinates: Vec<f64> },
    MultiPoint { coordinates: Vec<Vec<f64>> },
    LineString { arcs: Vec<i64> },
    MultiLineString { arcs: Vec<Vec<i64>> },
    Polygon { arcs: Vec<Vec<i64>> },
    MultiPolygon { arcs: Vec<Vec<Vec<i64>>> },
    GeometryCollection { geometries: Vec<TopoObject> },
}

impl Topology {
    pub fn from_value(payload: &Value) -> Result<Self> {
        Topology::deserialize(payload).map_err(|e| ChoroplethError::Parse {
            message: format!("invalid topology: {}", e),
        })
    }

    /// Decode the named object
    pub fn object(&self, name: &str) -> Result<TopoObject> {
        let raw = self
            .objects
            .get(name)
            .ok_or_else(|| ChoroplethError::MissingTopologyObject {
                name: name.to_string(),
            })?;
        TopoObject::deserialize(raw).map_err(|e| ChoroplethError::Parse {
            message: format!("invalid topology object '{}': {}", name, e),
        })
    }

    /// Expand the named object into features.
    ///
    /// A GeometryCollection yields one feature per member; any other object
    /// yields a single feature.
    pub fn features(&self, name: &str) -> Result<Vec<Feature>> {
        let object = self.object(name)?;
        let decoder = ArcDecoder::new(self)?;

        match &object.geometry {
            Some(TopoGeometry::GeometryCollection { geometries }) => geometries
                .iter()
                .map(|member| decoder.feature(member))
                .collect(),
            _ => Ok(vec![decoder.feature(&object)?]),
        }
    }
}

/// Convert the named object of a topology payload into features
pub fn topology_features(payload: &Value, object: &str) -> Result<Vec<Feature>> {
    Topology::from_value(payload)?.features(object)
}

/// Absolute arc coordinates plus the point transform
struct ArcDecoder {
    arcs: Vec<Vec<Coord<f64>>>,
    transform: Option<Transform>,
}

impl ArcDecoder {
    fn new(topology: &Topology) -> Result<Self> {
        let arcs = topology
            .arcs
            .iter()
            .enumerate()
            .map(|(index, arc)| decode_arc(index, arc, topology.transform.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            arcs,
            transform: topology.transform,
        })
    }

    fn feature(&self, object: &TopoObject) -> Result<Feature> {
        Ok(Feature {
            id: object.id.as_ref().and_then(value_to_key),
            properties: object.properties.clone().unwrap_or_default(),
            geometry: object
                .geometry
                .as_ref()
                .map(|geometry| self.geometry(geometry))
                .transpose()?,
        })
    }

    fn geometry(&self, geometry: &TopoGeometry) -> Result<Geometry<f64>> {
        let geometry = match geometry {
            TopoGeometry::Point { coordinates } => Geometry::Point(Point(self.point(coordinates)?)),
            TopoGeometry::MultiPoint { coordinates } => Geometry::MultiPoint(MultiPoint(
                coordinates
                    .iter()
                    .map(|p| self.point(p).map(Point))
                    .collect::<Result<_>>()?,
            )),
            TopoGeometry::LineString { arcs } => Geometry::LineString(LineString(self.line(arcs)?)),
            TopoGeometry::MultiLineString { arcs } => Geometry::MultiLineString(MultiLineString(
                arcs.iter()
                    .map(|line| self.line(line).map(LineString))
                    .collect::<Result<_>>()?,
            )),
            TopoGeometry::Polygon { arcs } => Geometry::Polygon(self.polygon(arcs)?),
            TopoGeometry::MultiPolygon { arcs } => Geometry::MultiPolygon(MultiPolygon(
                arcs.iter()
                    .map(|rings| self.polygon(rings))
                    .collect::<Result<_>>()?,
            )),
            TopoGeometry::GeometryCollection { geometries } => {
                Geometry::GeometryCollection(GeometryCollection(
                    geometries
                        .iter()
                        .filter_map(|member| member.geometry.as_ref())
                        .map(|geometry| self.geometry(geometry))
                        .collect::<Result<_>>()?,
                ))
            }
        };
        Ok(geometry)
    }

    fn point(&self, position: &[f64]) -> Result<Coord<f64>> {
        let (x, y) = xy(position)?;
        Ok(match &self.transform {
            Some(transform) => transform.apply(x, y),
            None => Coord { x, y },
        })
    }

    /// Append arc `index` to `points`, sharing the junction point
    fn push_arc(&self, index: i64, points: &mut Vec<Coord<f64>>) -> Result<()> {
        let (arc_index, reversed) = if index < 0 {
            (!index, true)
        } else {
            (index, false)
        };
        let arc = usize::try_from(arc_index)
            .ok()
            .and_then(|i| self.arcs.get(i))
            .ok_or_else(|| ChoroplethError::Topology {
                message: format!("arc index {} out of range ({} arcs)", index, self.arcs.len()),
            })?;

        points.pop();
        let start = points.len();
        points.extend_from_slice(arc);
        if reversed {
            points[start..].reverse();
        }
        Ok(())
    }

    fn line(&self, arcs: &[i64]) -> Result<Vec<Coord<f64>>> {
        let mut points = Vec::new();
        for &index in arcs {
            self.push_arc(index, &mut points)?;
        }
        // A line needs two positions even when its arcs collapse to one
        if points.len() == 1 {
            points.push(points[0]);
        }
        Ok(points)
    }

    fn ring(&self, arcs: &[i64]) -> Result<Vec<Coord<f64>>> {
        let mut points = self.line(arcs)?;
        if let Some(&first) = points.first() {
            while points.len() < 4 {
                points.push(first);
            }
        }
        Ok(points)
    }

    fn polygon(&self, rings: &[Vec<i64>]) -> Result<Polygon<f64>> {
        let mut rings = rings
            .iter()
            .map(|ring| self.ring(ring).map(LineString))
            .collect::<Result<Vec<_>>>()?
            .into_iter();
        let exterior = rings.next().unwrap_or_else(|| LineString(Vec::new()));
        Ok(Polygon::new(exterior, rings.collect()))
    }
}

fn xy(position: &[f64]) -> Result<(f64, f64)> {
    match position {
        [x, y, ..] => Ok((*x, *y)),
        _ => Err(ChoroplethError::Topology {
            message: format!("position needs two coordinates, got {}", position.len()),
        }),
    }
}

/// Resolve one arc to absolute coordinates, undoing delta encoding when quantized
fn decode_arc(index: usize, arc: &[Vec<f64>], transform: Option<&Transform>) -> Result<Vec<Coord<f64>>> {
    let mut x0 = 0.0;
    let mut y0 = 0.0;
    arc.iter()
        .map(|position| {
            let (x, y) = xy(position).map_err(|e| ChoroplethError::Topology {
                message: format!("arc {}: {}", index, e),
            })?;
            Ok(match transform {
                Some(transform) => {
                    x0 += x;
                    y0 += y;
                    transform.apply(x0, y0)
                }
                None => Coord { x, y },
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    /// Two unit squares sharing the edge x = 1
    fn shared_edge_topology() -> Value {
        json!({
            "type": "Topology",
            "objects": {
                "regions": {
                    "type": "GeometryCollection",
                    "geometries": [
                        { "type": "Polygon", "id": "left", "properties": { "name": "Left" }, "arcs": [[0, 1]] },
                        { "type": "Polygon", "id": 2, "arcs": [[2, -1]] }
                    ]
                }
            },
            "arcs": [
                [[1.0, 0.0], [1.0, 1.0]],
                [[1.0, 1.0], [0.0, 1.0], [0.0, 0.0], [1.0, 0.0]],
                [[1.0, 0.0], [2.0, 0.0], [2.0, 1.0], [1.0, 1.0]]
            ]
        })
    }

    fn exterior(feature: &Feature) -> Vec<Coord<f64>> {
        match &feature.geometry {
            Some(Geometry::Polygon(polygon)) => polygon.exterior().0.clone(),
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_shared_arcs_expand_to_closed_rings() {
        let features = topology_features(&shared_edge_topology(), "regions").unwrap();
        assert_eq!(features.len(), 2);

        assert_eq!(features[0].id.as_deref(), Some("left"));
        assert_eq!(features[0].property_key("name").as_deref(), Some("Left"));
        assert_eq!(
            exterior(&features[0]),
            vec![c(1.0, 0.0), c(1.0, 1.0), c(0.0, 1.0), c(0.0, 0.0), c(1.0, 0.0)]
        );

        assert_eq!(features[1].id.as_deref(), Some("2"));
        assert_eq!(
            exterior(&features[1]),
            vec![c(1.0, 0.0), c(2.0, 0.0), c(2.0, 1.0), c(1.0, 1.0), c(1.0, 0.0)]
        );
    }

    #[test]
    fn test_quantized_arcs_are_delta_decoded() {
        let payload = json!({
            "type": "Topology",
            "transform": { "scale": [0.5, 0.5], "translate": [10.0, 20.0] },
            "objects": {
                "shapes": {
                    "type": "GeometryCollection",
                    "geometries": [
                        { "type": "Polygon", "arcs": [[0]] },
                        { "type": "Point", "coordinates": [4, 4] }
                    ]
                }
            },
            "arcs": [ [[0, 0], [2, 0], [0, 2], [-2, 0], [0, -2]] ]
        });

        let features = topology_features(&payload, "shapes").unwrap();
        assert_eq!(
            exterior(&features[0]),
            vec![c(10.0, 20.0), c(11.0, 20.0), c(11.0, 21.0), c(10.0, 21.0), c(10.0, 20.0)]
        );
        assert_eq!(features[1].geometry, Some(Geometry::Point(Point(c(12.0, 22.0)))));
    }

    #[test]
    fn test_single_object_yields_one_feature() {
        let payload = json!({
            "type": "Topology",
            "objects": {
                "coast": { "type": "LineString", "id": "coast", "arcs": [0, 1] }
            },
            "arcs": [
                [[0.0, 0.0], [1.0, 1.0]],
                [[1.0, 1.0], [2.0, 0.0]]
            ]
        });

        let features = topology_features(&payload, "coast").unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(
            features[0].geometry,
            Some(Geometry::LineString(LineString(vec![c(0.0, 0.0), c(1.0, 1.0), c(2.0, 0.0)])))
        );
    }

    #[test]
    fn test_multipolygon_with_hole() {
        let payload = json!({
            "type": "Topology",
            "objects": {
                "island": { "type": "MultiPolygon", "arcs": [[[0], [1]]] }
            },
            "arcs": [
                [[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]],
                [[1.0, 1.0], [1.0, 2.0], [2.0, 2.0], [1.0, 1.0]]
            ]
        });

        let features = topology_features(&payload, "island").unwrap();
        match &features[0].geometry {
            Some(Geometry::MultiPolygon(multi)) => {
                assert_eq!(multi.0.len(), 1);
                assert_eq!(multi.0[0].interiors().len(), 1);
            }
            other => panic!("expected multipolygon, got {:?}", other),
        }
    }

    #[test]
    fn test_null_geometry_member_has_no_geometry() {
        let payload = json!({
            "type": "Topology",
            "objects": {
                "regions": {
                    "type": "GeometryCollection",
                    "geometries": [
                        { "type": "Polygon", "id": "A", "arcs": [[0]] },
                        { "type": null, "id": "B", "properties": { "name": "Unmapped" } }
                    ]
                }
            },
            "arcs": [ [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]] ]
        });

        let features = topology_features(&payload, "regions").unwrap();
        assert_eq!(features.len(), 2);
        assert!(matches!(features[0].geometry, Some(Geometry::Polygon(_))));
        assert_eq!(features[1].id.as_deref(), Some("B"));
        assert_eq!(features[1].property_key("name").as_deref(), Some("Unmapped"));
        assert_eq!(features[1].geometry, None);
    }

    #[test]
    fn test_null_members_of_nested_collection_are_skipped() {
        let payload = json!({
            "type": "Topology",
            "objects": {
                "mixed": {
                    "type": "GeometryCollection",
                    "geometries": [{
                        "type": "GeometryCollection",
                        "id": "nested",
                        "geometries": [
                            { "type": "Point", "coordinates": [3.0, 4.0] },
                            { "type": null }
                        ]
                    }]
                }
            },
            "arcs": []
        });

        let features = topology_features(&payload, "mixed").unwrap();
        match &features[0].geometry {
            Some(Geometry::GeometryCollection(collection)) => {
                assert_eq!(collection.0, vec![Geometry::Point(Point(c(3.0, 4.0)))]);
            }
            other => panic!("expected geometry collection, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_geometry_type_is_parse_error() {
        let payload = json!({
            "type": "Topology",
            "objects": { "bad": { "type": "Circle", "radius": 2 } },
            "arcs": []
        });
        let err = topology_features(&payload, "bad").unwrap_err();
        assert!(matches!(err, ChoroplethError::Parse { .. }));
    }

    #[test]
    fn test_missing_object() {
        let err = topology_features(&shared_edge_topology(), "counties").unwrap_err();
        assert!(matches!(err, ChoroplethError::MissingTopologyObject { name } if name == "counties"));
    }

    #[test]
    fn test_arc_index_out_of_range() {
        let payload = json!({
            "type": "Topology",
            "objects": { "bad": { "type": "Polygon", "arcs": [[5]] } },
            "arcs": []
        });
        let err = topology_features(&payload, "bad").unwrap_err();
        assert!(matches!(err, ChoroplethError::Topology { .. }));
    }
}
