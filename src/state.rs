//! Shared application state: the pool and one repository per resource.

use crate::models::{Comment, Post, User};
use crate::repository::Repository;
use crate::store::{PgCommentStore, PgPostStore, PgUserStore};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub users: Repository<User>,
    pub posts: Repository<Post>,
    pub comments: Repository<Comment>,
}

impl AppState {
    /// PostgreSQL-backed stores sharing `pool`.
    pub fn new(pool: PgPool) -> Self {
        AppState {
            users: Repository::new(Arc::new(PgUserStore::new(pool.clone()))),
            posts: Repository::new(Arc::new(PgPostStore::new(pool.clone()))),
            comments: Repository::new(Arc::new(PgCommentStore::new(pool.clone()))),
            pool,
        }
    }
}
