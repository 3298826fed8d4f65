use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use nearby_server::cache::{CacheConfig, CachedPipeline};
use nearby_server::maps::{FixtureProvider, MapsBackend, MapsClient, MapsConfig};
use nearby_server::pipeline::{Pipeline, PipelineConfig};
use nearby_server::web::{AppState, create_router};

/// Address to listen on when `NEARBY_BIND_ADDR` is unset.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut config = PipelineConfig::default();

    // A fixture file takes precedence over the live API
    let backend: MapsBackend = match std::env::var("MAPS_FIXTURE_PATH") {
        Ok(path) => {
            let fixture = FixtureProvider::load(&path)?;
            info!(
                path = %path,
                places = fixture.len(),
                reachable = fixture.reachable(),
                "serving places from fixture"
            );
            config = config.without_pacing();
            fixture.into()
        }
        Err(_) => {
            let api_key = std::env::var("GOOGLE_MAPS_API_KEY").unwrap_or_else(|_| {
                warn!("GOOGLE_MAPS_API_KEY not set. API calls will fail.");
                String::new()
            });
            let mut maps_config = MapsConfig::new(api_key);
            if let Ok(language) = std::env::var("MAPS_LANGUAGE") {
                maps_config = maps_config.with_language(language);
            }
            MapsClient::new(maps_config)?.into()
        }
    };

    let pipeline = Pipeline::new(backend.clone(), backend.clone(), config)?;
    let search = CachedPipeline::new(pipeline, &CacheConfig::default());
    let app = create_router(AppState::new(search));

    let addr: SocketAddr = std::env::var("NEARBY_BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()?;

    info!(%addr, backend = backend.name(), "nearby place finder listening");
    info!("  GET /health              - Health check");
    info!("  GET /api/search          - Ranked places as JSON");
    info!("  GET /api/search/export   - Ranked places as CSV");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
