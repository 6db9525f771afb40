//! Movie Catalog API Library
//!
//! This crate provides the core functionality for the movie catalog service:
//! an in-memory collection of movie records exposed over a small CRUD-style
//! HTTP surface with per-field schema validation and CORS allow-listing.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware_helpers;
pub mod models;
pub mod store;

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use middleware_helpers::cors::{allow_origin_middleware, AllowedOrigins};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub store: store::MovieStore,
    pub allowed_origins: AllowedOrigins,
}

impl AppState {
    pub fn new(config: config::AppConfig, store: store::MovieStore) -> Self {
        let allowed_origins = AllowedOrigins::from_config(&config.cors_allowed_origins);
        Self {
            config,
            store,
            allowed_origins,
        }
    }
}

/// Build the application router: banner + health + movie catalog, wrapped in
/// HTTP tracing and the CORS allow-origin layer.
pub fn app_router(state: AppState) -> Router {
    let allowed_origins = state.allowed_origins.clone();

    Router::new()
        .route("/", get(|| async { "movie-catalog-api up" }))
        .nest("/health", handlers::health::health_routes())
        .nest("/movies", handlers::movies::movie_routes())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(TraceLayer::new_for_http())
        // Echo allow-listed origins on every response
        .layer(middleware::from_fn_with_state(
            allowed_origins,
            allow_origin_middleware,
        ))
        .with_state(state)
}
