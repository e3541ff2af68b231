//! CRUD routes for one resource: `/{table}/` (POST, PUT) and `/{table}/:id` (GET, DELETE).

use crate::handlers::resource::{create, delete as delete_handler, read, update};
use crate::models::Resource;
use crate::repository::Repository;
use axum::{routing::get, routing::post, Router};

pub fn resource_routes<R: Resource>(repo: Repository<R>) -> Router {
    let collection = format!("/{}/", R::TABLE);
    let item = format!("/{}/:id", R::TABLE);
    Router::new()
        .route(&collection, post(create::<R>).put(update::<R>))
        .route(&item, get(read::<R>).delete(delete_handler::<R>))
        .with_state(repo)
}
