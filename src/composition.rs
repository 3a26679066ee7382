//! Map composition view model.
//!
//! Turns configuration plus [`MapState`] into everything a renderer needs to
//! draw: sized canvas, one shaded region per feature, a legend and the
//! tooltip. Drawing itself happens elsewhere.

use serde::Serialize;

use crate::colormaps::{build_legend, format_hex, parse_color, Legend};
use crate::config::MapConfig;
use crate::error::Result;
use crate::geometry::{BoundingBox, Feature};
use crate::logging::log_timed_operation;
use crate::state::{LoadStatus, MapState};
use crate::statistics::index_by_key;

/// Font stack of the map canvas
pub const FONT_FAMILY: &str = "\"Helvetica Neue\", Helvetica, Arial, sans-serif";

/// What the renderer should show
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MapView {
    /// Geometry not there yet; show a loading indicator
    Loading { width: f64, height: f64 },
    Ready(ReadyMap),
    /// Geometry could not be loaded; show `reason` instead of the map
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadyMap {
    pub width: f64,
    pub height: f64,
    pub font_family: String,
    /// Pixel position of the projection center
    pub offset: [f64; 2],
    pub bounds: BoundingBox,
    pub regions: Vec<RegionView>,
    pub legend: Legend,
    pub tooltip: TooltipView,
}

/// One shaded region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionView {
    pub key: Option<String>,
    pub name: Option<String>,
    pub value: Option<f64>,
    pub fill: String,
    pub stroke: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipView {
    pub active: bool,
    pub position: [f64; 2],
    pub name: String,
    pub value: Option<f64>,
}

/// Canvas size for a component `width` pixels wide
pub fn canvas_size(config: &MapConfig, width: f64) -> (f64, f64) {
    (width, width * config.height_ratio)
}

/// Compose the view for the current state
pub fn compose(config: &MapConfig, state: &MapState, width: f64) -> Result<MapView> {
    let (width, height) = canvas_size(config, width);

    match state.status() {
        LoadStatus::Failed(reason) => {
            return Ok(MapView::Failed {
                reason: reason.clone(),
            })
        }
        LoadStatus::Idle | LoadStatus::Loading(_) => return Ok(MapView::Loading { width, height }),
        LoadStatus::Loaded => {}
    }

    log_timed_operation("compose", || -> Result<MapView> {
        let scale = state.color_scale(config)?;
        let no_data_color = format_hex(&parse_color(&config.no_data_color)?);
        let border_color = format_hex(&parse_color(&config.border_color)?);
        let by_key = index_by_key(state.records(), &config.data_key_field);

        let regions = state
            .features()
            .iter()
            .map(|feature| {
                let key = feature.key(config.geometry_key_field.as_deref());
                let value = key
                    .as_ref()
                    .and_then(|key| by_key.get(key))
                    .and_then(|record| record.number(&config.data_value_field));
                RegionView {
                    name: region_name(feature, config).or_else(|| key.clone()),
                    key,
                    value,
                    fill: value.map_or_else(|| no_data_color.clone(), |v| scale.hex(v)),
                    stroke: border_color.clone(),
                }
            })
            .collect();

        let interaction = state.interaction();
        Ok(MapView::Ready(ReadyMap {
            width,
            height,
            font_family: FONT_FAMILY.to_string(),
            offset: config.offset.unwrap_or([width / 2.0, height / 2.0]),
            bounds: state.bounds().unwrap_or(BoundingBox::PLACEHOLDER),
            regions,
            legend: build_legend(&scale, config.classification()?),
            tooltip: TooltipView {
                active: interaction.active,
                position: interaction.position,
                name: interaction.region_name.clone(),
                value: interaction.region_value,
            },
        }))
    })
}

fn region_name(feature: &Feature, config: &MapConfig) -> Option<String> {
    feature.property_key(&config.geometry_name_field)
}

/// A component that can compose a map view from state
pub trait MapComponent: Send + Sync {
    fn name(&self) -> &str;

    fn config(&self) -> &MapConfig;

    fn compose(&self, state: &MapState, width: f64) -> Result<MapView>;
}

/// The choropleth map component
#[derive(Debug, Clone)]
pub struct Choropleth {
    config: MapConfig,
}

impl Choropleth {
    pub fn new(config: MapConfig) -> Self {
        Self { config }
    }
}

impl MapComponent for Choropleth {
    fn name(&self) -> &str {
        "Choropleth"
    }

    fn config(&self) -> &MapConfig {
        &self.config
    }

    fn compose(&self, state: &MapState, width: f64) -> Result<MapView> {
        compose(&self.config, state, width)
    }
}
