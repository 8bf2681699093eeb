use std::error::Error;

use tracing::info;
use tracing_subscriber::EnvFilter;

use fuel_server::config::AppConfig;
use fuel_server::domain::RegionCatalog;
use fuel_server::mapbox::{MapboxClient, MapboxConfig};
use fuel_server::pricing::PriceModels;
use fuel_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,fuel_server=debug")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let models = PriceModels::load(&config.gas_models_path)?;
    info!(
        path = %config.gas_models_path.display(),
        regions = models.len(),
        "loaded gas price models"
    );

    let mapbox = MapboxClient::new(MapboxConfig::new(&config.mapbox_token))?;
    let catalog = RegionCatalog::usa();
    info!(areas = catalog.len(), "loaded region catalog");

    let state = AppState::build(mapbox, models, catalog, &config)?;
    let app = create_router(state);

    info!(
        addr = %config.bind_addr,
        geocode_calls_per_minute = config.geocode_calls_per_minute,
        "fuel cost server listening"
    );
    info!("  GET  /health       - Health check");
    info!("  POST /predict/gas  - Estimate trip fuel cost");

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
