//! Configuration management for choropleth.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::colormaps::{get_colormap, parse_color, Classification};
use crate::error::{ChoroplethError, Result};
use crate::loader::{GeometryFormat, GeometrySource};

/// Command-line arguments for choropleth
#[derive(Parser, Debug)]
#[command(name = "choropleth")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// URL or path of the geometry resource
    pub geometry: Option<String>,

    /// Geometry encoding (geojson or topojson)
    #[arg(short, long, env = "CHOROPLETH_FORMAT")]
    pub format: Option<String>,

    /// Name of the object to expand from a topology
    #[arg(short, long, env = "CHOROPLETH_TOPOLOGY_OBJECT")]
    pub topology_object: Option<String>,

    /// JSON file with one statistics record per region
    #[arg(short, long, env = "CHOROPLETH_DATA")]
    pub data: Option<PathBuf>,

    /// Record field holding the statistic
    #[arg(long, env = "CHOROPLETH_VALUE_FIELD")]
    pub value_field: Option<String>,

    /// Color of the minimum value
    #[arg(long, env = "CHOROPLETH_START_COLOR")]
    pub start_color: Option<String>,

    /// Color of the maximum value
    #[arg(long, env = "CHOROPLETH_END_COLOR")]
    pub end_color: Option<String>,

    /// Width of the map in pixels
    #[arg(short, long, env = "CHOROPLETH_WIDTH")]
    pub width: Option<f64>,

    /// Path to JSON configuration file
    #[arg(short, long, env = "CHOROPLETH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CHOROPLETH_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Everything the map needs to load and shade itself
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// URL or path of the geometry resource
    pub geometry: String,

    /// Geometry encoding: "geojson" or "topojson"
    pub format: String,

    /// Topology object to expand (topojson only)
    pub topology_object: Option<String>,

    /// Record field joined against feature keys
    pub data_key_field: String,

    /// Record field holding the statistic
    pub data_value_field: String,

    /// Feature property used as key (feature id when unset)
    pub geometry_key_field: Option<String>,

    /// Feature property shown in the tooltip
    pub geometry_name_field: String,

    pub start_color: String,
    pub end_color: String,

    /// Color space to interpolate in ("lab" or "rgb")
    pub interpolation: String,

    /// Pin out-of-domain values to the endpoint colors
    pub clamp: bool,

    /// Legend classification ("continuous", "equal:5", ...)
    pub data_classification: String,

    /// Fill of regions without a statistic
    pub no_data_color: String,

    pub border_color: String,

    /// Pixel offset of the projection center (defaults to the middle)
    pub offset: Option<[f64; 2]>,

    /// Height as a fraction of width
    pub height_ratio: f64,
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Map configuration
    #[serde(default)]
    pub map: MapConfig,

    /// Statistics file
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// Width of the rendered map in pixels
    #[serde(default = "default_width")]
    pub width: f64,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Resolve already-parsed arguments against the config file and defaults
    pub fn from_args(args: Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load_from_file(path)?,
            None => Config::default(),
        };

        if let Some(geometry) = args.geometry {
            config.map.geometry = geometry;
        }
        if let Some(format) = args.format {
            config.map.format = format;
        }
        if args.topology_object.is_some() {
            config.map.topology_object = args.topology_object;
        }
        if args.data.is_some() {
            config.data_file = args.data;
        }
        if let Some(field) = args.value_field {
            config.map.data_value_field = field;
        }
        if let Some(color) = args.start_color {
            config.map.start_color = color;
        }
        if let Some(color) = args.end_color {
            config.map.end_color = color;
        }
        if let Some(width) = args.width {
            config.width = width;
        }
        if let Some(level) = args.log_level {
            config.log_level = level;
        }

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ChoroplethError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        if !(self.width.is_finite() && self.width >= 0.0) {
            return Err(ChoroplethError::Config {
                message: format!("Invalid width: {}", self.width),
            });
        }

        self.map.validate()
    }
}

impl MapConfig {
    /// Resolve the format discriminator once into a geometry source
    pub fn geometry_source(&self) -> Result<GeometrySource> {
        let format = match self.format.to_lowercase().as_str() {
            "geojson" => GeometryFormat::GeoJson,
            "topojson" | "topology" => {
                let object = self
                    .topology_object
                    .clone()
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| ChoroplethError::Config {
                        message: "topojson format requires topology_object".to_string(),
                    })?;
                GeometryFormat::Topology { object }
            }
            other => {
                return Err(ChoroplethError::Config {
                    message: format!(
                        "Invalid geometry format: {}. Must be one of: geojson, topojson",
                        other
                    ),
                })
            }
        };

        Ok(GeometrySource::new(self.geometry.clone(), format))
    }

    pub fn classification(&self) -> Result<Classification> {
        self.data_classification.parse()
    }

    /// Validate the map configuration
    pub fn validate(&self) -> Result<()> {
        if self.geometry.is_empty() {
            return Err(ChoroplethError::Config {
                message: "Geometry location cannot be empty".to_string(),
            });
        }

        self.geometry_source()?;

        for color in [
            &self.start_color,
            &self.end_color,
            &self.no_data_color,
            &self.border_color,
        ] {
            parse_color(color)?;
        }

        get_colormap(
            &self.interpolation,
            parse_color(&self.start_color)?,
            parse_color(&self.end_color)?,
        )?;

        if !(self.height_ratio.is_finite() && self.height_ratio > 0.0) {
            return Err(ChoroplethError::Config {
                message: format!("height_ratio must be positive, got {}", self.height_ratio),
            });
        }

        self.classification()?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            map: MapConfig::default(),
            data_file: None,
            width: default_width(),
            log_level: default_log_level(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            geometry: String::new(),
            format: "geojson".to_string(),
            topology_object: None,
            data_key_field: "id".to_string(),
            data_value_field: "value".to_string(),
            geometry_key_field: None,
            geometry_name_field: "name".to_string(),
            start_color: "#f7fbff".to_string(),
            end_color: "#08306b".to_string(),
            interpolation: "lab".to_string(),
            clamp: false,
            data_classification: "continuous".to_string(),
            no_data_color: "#f5f5f5".to_string(),
            border_color: "#cccccc".to_string(),
            offset: None,
            height_ratio: 0.8,
        }
    }
}

// Default value functions for serde
fn default_width() -> f64 {
    960.0
}

fn default_log_level() -> String {
    "info".to_string()
}
