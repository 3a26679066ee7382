//! Logging utilities for choropleth.
//!
//! This module provides structured logging helpers so that geometry loads,
//! scale construction and composition show up as searchable events.

use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::geometry::BoundingBox;

/// Initialize the tracing subscriber with the given log level
pub fn init_tracing(log_level: &str) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(val) => val,
        Err(_) => log_level.to_string(),
    };

    // A subscriber may already be installed (tests, embedding applications).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .try_init();
}

/// Log a start message for a significant operation
pub fn log_operation_start(operation: &str, details: Option<&str>) {
    if let Some(details) = details {
        info!(
            operation = operation,
            details = details,
            "Starting operation"
        );
    } else {
        info!(operation = operation, "Starting operation");
    }
}

/// Log the completion of a significant operation
pub fn log_operation_end(operation: &str, start_time: Instant, success: bool) {
    let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

    if success {
        info!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation completed successfully"
        );
    } else {
        warn!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation failed"
        );
    }
}

/// Log an operation with timing and result in a single statement
pub fn log_timed_operation<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let request_id = Uuid::new_v4();

    debug!(
        operation = operation,
        request_id = %request_id,
        "Starting operation"
    );

    let result = f();

    debug!(
        operation = operation,
        request_id = %request_id,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Operation completed"
    );

    result
}

/// Log what a geometry load produced
pub fn log_geometry_load_stats(location: &str, format: &str, feature_count: usize, bounds: &BoundingBox) {
    info!(
        operation = "geometry_load",
        location = location,
        format = format,
        feature_count = feature_count,
        min_lon = bounds.min[0],
        min_lat = bounds.min[1],
        max_lon = bounds.max[0],
        max_lat = bounds.max[1],
        "Geometry loaded successfully"
    );
}

/// Log an error with context
pub fn log_error(error: &crate::error::ChoroplethError, context: &str) {
    error!(
        error = %error,
        context = context,
        "Error occurred"
    );
}

/// Generate a unique request ID
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}
