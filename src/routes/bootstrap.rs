//! Index page, schema init and demo seeding.

use crate::handlers::bootstrap::{add_demo_data, index, init_schema};
use axum::{routing::get, Router};
use sqlx::PgPool;

pub fn bootstrap_routes(pool: PgPool) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/dbinit/", get(init_schema))
        .route("/demodb/", get(add_demo_data))
        .with_state(pool)
}
