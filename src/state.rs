//! Map state management for choropleth.
//!
//! [`MapState`] is the single owner of the loaded features, the statistics
//! and the interaction record. Everything below it reads through shared
//! references.

use tracing::{debug, warn};

use crate::colormaps::{parse_color, LinearColorScale};
use crate::config::MapConfig;
use crate::error::{ChoroplethError, Result};
use crate::geometry::{BoundingBox, Feature};
use crate::interaction::{InteractionState, PointerEvent};
use crate::loader::{GeometryLoader, GeometrySource, LoadTicket, LoadedGeometry};
use crate::logging::log_error;
use crate::statistics::{find_extremes, DataRecord, Extremes};

/// Where the geometry load stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading(LoadTicket),
    Loaded,
    Failed(String),
}

/// State of one choropleth map
#[derive(Debug, Clone)]
pub struct MapState {
    features: Vec<Feature>,
    bounds: Option<BoundingBox>,
    records: Vec<DataRecord>,
    status: LoadStatus,
    interaction: InteractionState,
}

impl MapState {
    pub fn new() -> Self {
        Self {
            features: Vec::new(),
            bounds: None,
            records: Vec::new(),
            status: LoadStatus::Idle,
            interaction: InteractionState::default(),
        }
    }

    /// Mark `ticket` as the load whose result will be accepted
    pub fn begin_load(&mut self, ticket: LoadTicket) {
        debug!(ticket = ticket.id(), "Geometry load started");
        self.status = LoadStatus::Loading(ticket);
    }

    /// Forget the pending load; its result will be discarded
    pub fn cancel_load(&mut self, ticket: LoadTicket) {
        if self.status == LoadStatus::Loading(ticket) {
            debug!(ticket = ticket.id(), "Geometry load cancelled");
            self.status = LoadStatus::Idle;
        }
    }

    /// Apply a settled load.
    ///
    /// Returns `false` (and changes nothing) unless `ticket` is the pending
    /// load, so a result arriving after cancellation or after a newer load
    /// started is dropped.
    pub fn apply_load(&mut self, ticket: LoadTicket, result: Result<LoadedGeometry>) -> bool {
        if self.status != LoadStatus::Loading(ticket) {
            warn!(ticket = ticket.id(), "Discarding stale geometry load result");
            return false;
        }

        match result {
            Ok(loaded) => {
                self.features = loaded.features;
                self.bounds = Some(loaded.bounds);
                self.status = LoadStatus::Loaded;
            }
            Err(ChoroplethError::Cancelled) => {
                self.status = LoadStatus::Idle;
            }
            Err(e) => {
                log_error(&e, "geometry load");
                self.status = LoadStatus::Failed(e.to_string());
            }
        }
        true
    }

    /// Spawn a load of `source`, wait for it and apply the result
    pub async fn load(&mut self, loader: &mut GeometryLoader, source: GeometrySource) -> bool {
        let task = loader.spawn(source);
        self.begin_load(task.ticket());
        let (ticket, result) = task.settle().await;
        self.apply_load(ticket, result)
    }

    pub fn set_records(&mut self, records: Vec<DataRecord>) {
        self.records = records;
    }

    /// Route a pointer event through the interaction reducer
    pub fn dispatch(&mut self, event: &PointerEvent) {
        self.interaction = self.interaction.reduce(event);
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Outer bounds of the loaded features, once loaded
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    pub fn records(&self) -> &[DataRecord] {
        &self.records
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// True until geometry has been loaded (or has failed)
    pub fn is_loading(&self) -> bool {
        matches!(self.status, LoadStatus::Idle | LoadStatus::Loading(_))
    }

    pub fn extremes(&self, value_field: &str) -> Option<Extremes> {
        find_extremes(&self.records, value_field)
    }

    /// Color scale for the current statistics; recomputed on each call
    pub fn color_scale(&self, config: &MapConfig) -> Result<LinearColorScale> {
        let domain = self.extremes(&config.data_value_field).unwrap_or_default();
        let scale = LinearColorScale::new(
            domain,
            parse_color(&config.start_color)?,
            parse_color(&config.end_color)?,
            &config.interpolation,
        )?;
        Ok(scale.clamp(config.clamp))
    }
}

impl Default for MapState {
    fn default() -> Self {
        Self::new()
    }
}
