//! Map features and GeoJSON normalization.

use geo::Geometry;
use serde_json::{Map, Number, Value};

use crate::error::{ChoroplethError, Result};

/// A single mappable region
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Feature identifier, if the payload carried one
    pub id: Option<String>,
    /// Free-form feature properties
    pub properties: Map<String, Value>,
    /// Region geometry in lon/lat
    pub geometry: Option<Geometry<f64>>,
}

impl Feature {
    /// Create a feature with a geometry and no properties
    pub fn new(geometry: Geometry<f64>) -> Self {
        Self {
            id: None,
            properties: Map::new(),
            geometry: Some(geometry),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_property(mut self, name: &str, value: Value) -> Self {
        self.properties.insert(name.to_string(), value);
        self
    }

    /// Read a property as a string key (strings as-is, numbers formatted)
    pub fn property_key(&self, name: &str) -> Option<String> {
        self.properties.get(name).and_then(value_to_key)
    }

    /// The key used to join this feature with data records.
    ///
    /// When `key_field` is set and present it wins; otherwise the feature id.
    pub fn key(&self, key_field: Option<&str>) -> Option<String> {
        key_field
            .and_then(|field| self.property_key(field))
            .or_else(|| self.id.clone())
    }
}

/// Convert a JSON scalar into a join key
pub fn value_to_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_key(n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Integral floats share the key of the matching integer (`1.0` and `1` both give "1")
fn number_key(n: &Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                return format!("{}", f as i64);
            }
        }
    }
    n.to_string()
}

/// Extract the feature list of a GeoJSON payload.
///
/// Only the `features` member is read, so collections missing the
/// `"type": "FeatureCollection"` marker are accepted.
pub fn features_from_geojson(payload: &Value) -> Result<Vec<Feature>> {
    let features = payload
        .get("features")
        .and_then(Value::as_array)
        .ok_or(ChoroplethError::MissingFeatures)?;

    features
        .iter()
        .enumerate()
        .map(|(index, raw)| convert_feature(raw).map_err(|e| parse_error(index, e)))
        .collect()
}

fn convert_feature(raw: &Value) -> std::result::Result<Feature, geojson::Error> {
    let feature = geojson::Feature::try_from(raw.clone())?;

    let id = feature.id.map(|id| match id {
        geojson::feature::Id::String(s) => s,
        geojson::feature::Id::Number(n) => n.to_string(),
    });

    let geometry = match feature.geometry {
        Some(geometry) => Some(Geometry::<f64>::try_from(geometry.value)?),
        None => None,
    };

    Ok(Feature {
        id,
        properties: feature.properties.unwrap_or_default(),
        geometry,
    })
}

fn parse_error(index: usize, error: geojson::Error) -> ChoroplethError {
    ChoroplethError::Parse {
        message: format!("feature {}: {}", index, error),
    }
}
