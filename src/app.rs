//! Router assembly and serving.

use crate::error::AppError;
use crate::routes::{bootstrap_routes, common_routes_with_ready, resource_routes};
use crate::schema;
use crate::settings::Settings;
use crate::state::AppState;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Request bodies are single records.
const BODY_LIMIT_BYTES: usize = 64 * 1024;

/// All resource routes over `state`'s repositories; no bootstrap or health routes.
pub fn api_router(state: &AppState) -> Router {
    Router::new()
        .merge(resource_routes(state.users.clone()))
        .merge(resource_routes(state.posts.clone()))
        .merge(resource_routes(state.comments.clone()))
}

/// Full application router with middleware.
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .merge(bootstrap_routes(state.pool.clone()))
        .merge(common_routes_with_ready(state.pool.clone()))
        .merge(api_router(&state))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}

/// Connect, optionally reset the schema, and serve until the process stops.
pub async fn run(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    schema::ensure_database_exists(&settings.database_url).await?;
    let pool = PgPoolOptions::new()
        .max_connections(settings.db_max_connections)
        .acquire_timeout(settings.db_acquire_timeout)
        .connect(&settings.database_url)
        .await
        .map_err(AppError::Db)?;

    if settings.init_schema {
        schema::init_schema(&pool).await?;
    }

    let app = router(AppState::new(pool), settings.request_timeout);
    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
