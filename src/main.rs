//! choropleth - compose a shaded region map from geometry and statistics
//!
//! Loads the configured geometry, joins the statistics file and prints the
//! composed map view as JSON.

use tokio::signal;
use tracing::{error, info};

use choropleth::logging::init_tracing;
use choropleth::statistics::load_records;
use choropleth::{ChoroplethError, ComponentRegistry, Config, GeometryLoader, MapState, MapView, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load()?;

    init_tracing(&config.log_level);
    info!("Starting choropleth v{}", env!("CARGO_PKG_VERSION"));

    // Validate configuration
    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    let source = config.map.geometry_source()?;
    let registry = ComponentRegistry::with_defaults();
    let component = registry.create("Choropleth", config.map.clone())?;

    let mut state = MapState::new();
    if let Some(path) = &config.data_file {
        info!("Loading statistics: {:?}", path);
        let records = load_records(path).map_err(|e| {
            error!("Failed to load statistics: {}", e);
            e
        })?;
        info!("Found {} records", records.len());
        state.set_records(records);
    }

    let mut loader = GeometryLoader::new();
    let task = loader.spawn(source);
    let ticket = task.ticket();
    let abort = task.abort_handle();
    state.begin_load(ticket);

    tokio::select! {
        (ticket, result) = task.settle() => {
            state.apply_load(ticket, result);
        }
        _ = shutdown_signal() => {
            abort.abort();
            state.cancel_load(ticket);
            info!("Geometry load cancelled");
            return Err(ChoroplethError::Cancelled);
        }
    }

    let view = component.compose(&state, config.width)?;
    println!("{}", serde_json::to_string_pretty(&view)?);

    match view {
        MapView::Failed { reason } => Err(ChoroplethError::GeometryUnavailable { reason }),
        _ => Ok(()),
    }
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
