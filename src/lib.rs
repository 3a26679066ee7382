//! # choropleth
//!
//! Data-driven choropleth maps: region boundaries shaded by a statistic.
//!
//! The library loads boundary geometry (GeoJSON, or TopoJSON expanded into
//! features), joins it against statistics records, builds a CIELAB color
//! scale between two colors and composes a render-ready view of the map with
//! its legend and tooltip.
//!
//! ## Architecture
//!
//! - **Geometry**: feature normalization, TopoJSON arc decoding and bounds
//! - **Loader**: cancellable background fetch of the geometry resource
//! - **Statistics and colormaps**: value extremes, color scale and legend
//! - **State and composition**: the map state container and its view model

pub mod colormaps;
pub mod composition;
pub mod config;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod loader;
pub mod logging;
pub mod registry;
pub mod state;
pub mod statistics;

pub use composition::{compose, Choropleth, MapComponent, MapView};
pub use config::{Config, MapConfig};
pub use error::{ChoroplethError, Result};
pub use loader::{GeometryFormat, GeometryLoader, GeometrySource, LoadedGeometry};
pub use logging::{
    generate_request_id, init_tracing, log_error, log_geometry_load_stats, log_operation_end,
    log_operation_start, log_timed_operation,
};
pub use registry::ComponentRegistry;
pub use state::{LoadStatus, MapState};
