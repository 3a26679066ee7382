//! Statistical records and their extremes.
//!
//! Each record ties one scalar statistic to a region key. The extremes of the
//! configured value field define the domain of the color scale.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{ChoroplethError, Result};
use crate::geometry::feature::value_to_key;

/// One external statistic, stored as the JSON object it arrived as
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataRecord(pub Map<String, Value>);

impl DataRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    /// Join key stored in `field`
    pub fn key(&self, field: &str) -> Option<String> {
        self.0.get(field).and_then(value_to_key)
    }

    /// Numeric value of `field`.
    ///
    /// Numbers and numeric strings count; anything else, and non-finite
    /// values, read as absent.
    pub fn number(&self, field: &str) -> Option<f64> {
        let value = match self.0.get(field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        value.is_finite().then_some(value)
    }
}

impl Default for DataRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimum and maximum of a statistic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extremes {
    pub min: f64,
    pub max: f64,
}

impl Extremes {
    /// Domain used when there is no data at all
    pub const DEFAULT: Extremes = Extremes {
        min: 0.0,
        max: 200.0,
    };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

impl Default for Extremes {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Scan `records` for the min and max of `field`.
///
/// Records whose field is missing or not numeric are skipped. Returns `None`
/// when no record has a numeric value; callers fall back to
/// [`Extremes::DEFAULT`].
pub fn find_extremes(records: &[DataRecord], field: &str) -> Option<Extremes> {
    records
        .iter()
        .filter_map(|record| record.number(field))
        .fold(None, |acc: Option<Extremes>, value| match acc {
            None => Some(Extremes::new(value, value)),
            Some(e) => Some(Extremes::new(e.min.min(value), e.max.max(value))),
        })
}

/// Index records by their join key; later duplicates win
pub fn index_by_key<'a>(records: &'a [DataRecord], key_field: &str) -> HashMap<String, &'a DataRecord> {
    records
        .iter()
        .filter_map(|record| record.key(key_field).map(|key| (key, record)))
        .collect()
}

/// Parse a JSON array of record objects
pub fn parse_records(payload: &Value) -> Result<Vec<DataRecord>> {
    let items = payload.as_array().ok_or_else(|| ChoroplethError::Parse {
        message: "statistics must be a JSON array of objects".to_string(),
    })?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(fields) => Ok(DataRecord(fields.clone())),
            _ => Err(ChoroplethError::Parse {
                message: format!("statistics entry {} is not an object", index),
            }),
        })
        .collect()
}

/// Load records from a JSON file
pub fn load_records(path: &Path) -> Result<Vec<DataRecord>> {
    let content = std::fs::read_to_string(path)?;
    let payload: Value = serde_json::from_str(&content)?;
    parse_records(&payload)
}
