/// cosmospin: gallery backend for the Astronomy Picture of the Day
mod clients;
mod config;
mod domain;
mod errors;
mod handlers;
mod repo;
mod routes;
mod services;
mod utils;

use crate::clients::{ApodClient, GeminiClient, Gateway, HttpClient, LibraryClient, NasaGateway};
use crate::config::AppConfig;
use crate::handlers::AppState;
use crate::repo::{init_db, SlotRepo};
use crate::routes::build_router;
use crate::services::{DetailService, FavoritesStore, GalleryService};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load configuration
    let config = AppConfig::from_env()?;
    info!("Configuration loaded successfully");

    // Local storage for favorites
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&config.database_url)
        .await?;
    init_db(&pool).await?;
    info!("Local storage ready at {}", config.database_url);

    let favorites = Arc::new(FavoritesStore::load(SlotRepo::new(pool)).await);

    // Initialize clients
    let http = HttpClient::new(config.http_timeout)?;
    let gateway: Arc<dyn Gateway> = Arc::new(NasaGateway::new(
        ApodClient::new(
            http.clone(),
            config.apod_api_url.clone(),
            config.nasa_api_key.clone(),
        ),
        LibraryClient::new(http.clone(), config.library_url.clone()),
    ));
    let gemini = GeminiClient::new(
        http,
        config.gemini.api_url.clone(),
        config.gemini.api_key.clone(),
        config.gemini.model.clone(),
    );
    if !gemini.is_configured() {
        warn!("GEMINI_API_KEY is not set; summaries will use the fallback text");
    }

    // Initialize application state
    let state = AppState {
        gateway: gateway.clone(),
        gallery: Arc::new(GalleryService::new(gateway, favorites.clone())),
        favorites,
        detail: Arc::new(DetailService::new(Arc::new(gemini))),
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("cosmospin listening on {}", config.bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
