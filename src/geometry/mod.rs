//! Geometry handling for choropleth maps.
//!
//! This module normalizes the two supported boundary encodings (GeoJSON and
//! TopoJSON) into a single feature list and computes bounding boxes over it.

pub mod bounds;
pub mod feature;
pub mod topology;

pub use bounds::{feature_bounds, outer_bounds, BoundingBox};
pub use feature::{features_from_geojson, Feature};
pub use topology::{topology_features, Topology};
