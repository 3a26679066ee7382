//! Geometry loading.
//!
//! A [`GeometrySource`] names where the boundaries live and how they are
//! encoded. Loading fetches the payload, normalizes it into a feature list
//! and computes the outer bounds in one go.

use reqwest::Client;
use serde_json::Value;
use std::time::Instant;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::debug;

use crate::error::{ChoroplethError, Result};
use crate::geometry::{features_from_geojson, outer_bounds, topology_features, BoundingBox, Feature};
use crate::logging::{generate_request_id, log_geometry_load_stats, log_operation_end, log_operation_start};

/// Payload encoding, resolved once from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryFormat {
    /// A GeoJSON FeatureCollection
    GeoJson,
    /// A TopoJSON topology; `object` names the member of `objects` to expand
    Topology { object: String },
}

impl GeometryFormat {
    pub fn name(&self) -> &str {
        match self {
            GeometryFormat::GeoJson => "geojson",
            GeometryFormat::Topology { .. } => "topojson",
        }
    }
}

/// Where to fetch geometry from and how to decode it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometrySource {
    /// `http(s)://` URL, `file://` URL or a filesystem path
    pub location: String,
    pub format: GeometryFormat,
}

impl GeometrySource {
    pub fn new(location: impl Into<String>, format: GeometryFormat) -> Self {
        Self {
            location: location.into(),
            format,
        }
    }
}

/// Normalized features together with their outer bounds
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedGeometry {
    pub features: Vec<Feature>,
    pub bounds: BoundingBox,
}

impl LoadedGeometry {
    pub fn new(features: Vec<Feature>) -> Self {
        let bounds = outer_bounds(&features);
        Self { features, bounds }
    }
}

/// Fetch and parse a JSON payload
pub async fn fetch_payload(client: &Client, location: &str) -> Result<Value> {
    let bytes = if location.starts_with("http://") || location.starts_with("https://") {
        let response = client.get(location).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ChoroplethError::FetchStatus {
                url: location.to_string(),
                status: status.as_u16(),
            });
        }
        response.bytes().await?.to_vec()
    } else {
        let path = location.strip_prefix("file://").unwrap_or(location);
        tokio::fs::read(path).await?
    };

    debug!(location = location, bytes = bytes.len(), "Fetched geometry payload");
    Ok(serde_json::from_slice(&bytes)?)
}

/// Turn a parsed payload into features according to `format`
pub fn decode_payload(payload: &Value, format: &GeometryFormat) -> Result<Vec<Feature>> {
    match format {
        GeometryFormat::GeoJson => features_from_geojson(payload),
        GeometryFormat::Topology { object } => topology_features(payload, object),
    }
}

/// Fetch, decode and bound the geometry of `source`
pub async fn load_geometry(client: &Client, source: &GeometrySource) -> Result<LoadedGeometry> {
    let start = Instant::now();
    log_operation_start("geometry_load", Some(&source.location));

    let result = async {
        let payload = fetch_payload(client, &source.location).await?;
        let features = decode_payload(&payload, &source.format)?;
        Ok::<_, ChoroplethError>(LoadedGeometry::new(features))
    }
    .await;

    log_operation_end("geometry_load", start, result.is_ok());
    if let Ok(loaded) = &result {
        log_geometry_load_stats(
            &source.location,
            source.format.name(),
            loaded.features.len(),
            &loaded.bounds,
        );
    }
    result
}

/// Identifies one load request; results carrying a stale ticket are dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Spawns geometry loads on the tokio runtime and hands out tickets
#[derive(Debug, Default)]
pub struct GeometryLoader {
    client: Client,
    next_ticket: u64,
}

impl GeometryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            next_ticket: 0,
        }
    }

    /// Start loading `source` in the background
    pub fn spawn(&mut self, source: GeometrySource) -> LoadTask {
        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);
        let client = self.client.clone();
        let request_id = generate_request_id();

        debug!(
            ticket = ticket.id(),
            request_id = %request_id,
            location = %source.location,
            "Spawning geometry load"
        );

        let handle = tokio::spawn(async move { load_geometry(&client, &source).await });
        LoadTask { ticket, handle }
    }
}

/// A running geometry load
#[derive(Debug)]
pub struct LoadTask {
    ticket: LoadTicket,
    handle: JoinHandle<Result<LoadedGeometry>>,
}

impl LoadTask {
    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    /// Abort the fetch; settling afterwards yields [`ChoroplethError::Cancelled`]
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Handle that cancels the load while [`LoadTask::settle`] is pending
    pub fn abort_handle(&self) -> AbortHandle {
        self.handle.abort_handle()
    }

    /// Wait for the load to finish
    pub async fn settle(self) -> (LoadTicket, Result<LoadedGeometry>) {
        let result = match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(ChoroplethError::Cancelled),
            Err(e) => Err(ChoroplethError::Task {
                message: e.to_string(),
            }),
        };
        (self.ticket, result)
    }
}
