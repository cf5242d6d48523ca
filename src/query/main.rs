//! Query server for listing searches.
//!
//! Provides an HTTP API for listing lookup and search, with attribute
//! filters and an optional map-area polygon.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use clap::Parser;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use habitat::models::Listing;
use habitat::pip::parse_area;
use habitat::store::{ListingFilters, ListingQuery, ListingStore};

mod config;
use config::Config;

#[derive(Parser, Debug)]
#[command(name = "query")]
#[command(about = "Listing search server")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (overrides config)
    #[arg(short, long)]
    listen: Option<String>,

    /// Listings JSON file (overrides config)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Maximum polygon vertices accepted in `area` (overrides config)
    #[arg(long)]
    max_vertices: Option<usize>,
}

/// Application state shared across handlers
struct AppState {
    store: ListingStore,
    max_vertices: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if let Some(data) = args.data {
        config.server.data_file = data;
    }
    if let Some(max_vertices) = args.max_vertices {
        config.limits.max_vertices = max_vertices;
    }

    info!("Habitat Query Server");
    info!("Loading listings from {}", config.server.data_file.display());

    let store = ListingStore::load_from_file(&config.server.data_file)
        .context("Failed to load listings")?;

    let state = Arc::new(AppState {
        store,
        max_vertices: config.limits.max_vertices,
    });

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/listings", get(search_handler))
        .route("/v1/listings/{id}", get(listing_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", config.server.listen);

    let listener = tokio::net::TcpListener::bind(&config.server.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        listings: state.store.len(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    listings: usize,
}

/// Listing search with optional map area
async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListingQuery>,
) -> Result<Json<Vec<Listing>>, (StatusCode, String)> {
    let filters = ListingFilters::try_from(&params).map_err(|e| {
        warn!("Rejected search filters: {}", e);
        (StatusCode::BAD_REQUEST, e.to_string())
    })?;

    let area = params
        .area
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_area(raw, state.max_vertices))
        .transpose()
        .map_err(|e| {
            warn!("Rejected search area: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string())
        })?;

    Ok(Json(state.store.search(&filters, area.as_ref())))
}

/// Single listing by id
async fn listing_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Listing>, (StatusCode, String)> {
    state
        .store
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Listing not found".to_string()))
}
