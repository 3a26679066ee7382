//! Error types for the choropleth crate.
//!
//! This module defines a single error enum covering geometry loading,
//! payload decoding, color parsing and configuration.

use thiserror::Error;

/// The main error type for choropleth operations.
#[derive(Error, Debug)]
pub enum ChoroplethError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Network errors while fetching a geometry resource
    #[error("Fetch error: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The fetched resource answered with a non-success status
    #[error("Fetch of {url} failed with status {status}")]
    FetchStatus { url: String, status: u16 },

    /// Structurally invalid payloads
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// A GeoJSON payload without a `features` list
    #[error("GeoJSON payload has no features list")]
    MissingFeatures,

    /// A topology payload without the configured object
    #[error("Topology object not found: {name}")]
    MissingTopologyObject { name: String },

    /// Topology decoding errors (bad arc references and the like)
    #[error("Topology error: {message}")]
    Topology { message: String },

    /// Unparseable color strings
    #[error("Invalid color '{value}': {message}")]
    InvalidColor { value: String, message: String },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A geometry load that was cancelled before it settled
    #[error("Geometry load cancelled")]
    Cancelled,

    /// The map could not be composed because its geometry failed to load
    #[error("Geometry unavailable: {reason}")]
    GeometryUnavailable { reason: String },

    /// A load task that died without producing a result
    #[error("Load task failed: {message}")]
    Task { message: String },
}

/// Convenience type alias for Results with ChoroplethError
pub type Result<T> = std::result::Result<T, ChoroplethError>;
