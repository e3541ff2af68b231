//! `posts` table.

use super::{delete_one, read_one, update_one, Storage};
use crate::error::StoreError;
use crate::models::{NewPost, Post, PostPatch};
use crate::sql::{update, ChangeSet};
use async_trait::async_trait;
use sqlx::PgPool;

const COLUMNS: &[&str] = &["id", "title", "body", "user_id"];

const POST_CREATE: &str = "INSERT INTO posts (title, body, user_id) VALUES ($1, $2, $3) RETURNING id";

pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        PgPostStore { pool }
    }
}

fn changes(patch: &PostPatch) -> ChangeSet {
    let mut c = ChangeSet::new();
    c.set("title", patch.title.clone())
        .set("body", patch.body.clone())
        .set("user_id", patch.user_id);
    c
}

#[async_trait]
impl Storage<Post> for PgPostStore {
    #[tracing::instrument(name = "PostStore.create", skip(self, new), fields(title = %new.title), err)]
    async fn create(&self, new: &NewPost) -> Result<i32, StoreError> {
        tracing::debug!(sql = POST_CREATE, "query");
        let id = sqlx::query_scalar::<_, i32>(POST_CREATE)
            .bind(&new.title)
            .bind(&new.body)
            .bind(new.user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    #[tracing::instrument(name = "PostStore.read", skip(self), err)]
    async fn read(&self, id: i32) -> Result<Post, StoreError> {
        read_one(&self.pool, COLUMNS, id).await
    }

    #[tracing::instrument(name = "PostStore.update", skip(self, patch), fields(id = ?patch.id), err)]
    async fn update(&self, patch: &PostPatch) -> Result<Post, StoreError> {
        let q = update("posts", patch.id, &changes(patch), COLUMNS)?;
        update_one(&self.pool, q).await
    }

    #[tracing::instrument(name = "PostStore.delete", skip(self), err)]
    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        delete_one::<Post>(&self.pool, id).await
    }
}
