use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use flight_search::airports::{AirportDirectory, AirportRanker};
use flight_search::cache::CachedFlightProvider;
use flight_search::config::{AppConfig, ProviderSettings};
use flight_search::provider::{AmadeusClient, FlightSource, StaticFlightProvider};
use flight_search::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;

    // The directory must be loaded before the first query.
    let airports =
        AirportDirectory::load(&config.airports_path)?.with_ranker(AirportRanker::city_aware());
    info!(airports = airports.len(), "loaded airport directory");

    let provider = match config.provider {
        ProviderSettings::Static(path) => FlightSource::Static(StaticFlightProvider::load(path)?),
        ProviderSettings::Amadeus(amadeus) => {
            let client = AmadeusClient::new(amadeus)?;
            FlightSource::Amadeus(Arc::new(CachedFlightProvider::new(client, &config.cache)))
        }
    };

    let state = AppState::new(provider, airports, config.pipeline);
    let app = create_router(state, &config.data_dir.to_string_lossy());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "flight search listening");
    info!("  GET  /health                 - Health check");
    info!("  GET  /api/airports/search    - Search airports");
    info!("  GET  /api/airports/:code     - Look up an airport");
    info!("  GET  /api/flights            - Search flights");
    info!("  GET  /api/me/bookmarks       - List saved searches");
    info!("  POST /api/me/bookmarks       - Save a search");
    info!("  DEL  /api/me/bookmarks/:id   - Delete a saved search");

    axum::serve(listener, app).await?;
    Ok(())
}
