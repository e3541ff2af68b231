//! `comments` table. `date` defaults to NOW() on insert.

use super::{delete_one, read_one, update_one, Storage};
use crate::error::StoreError;
use crate::models::{Comment, CommentPatch, NewComment};
use crate::sql::{update, ChangeSet};
use async_trait::async_trait;
use sqlx::PgPool;

const COLUMNS: &[&str] = &["id", "date", "body", "user_id", "post_id"];

const COMMENT_CREATE: &str =
    "INSERT INTO comments (body, user_id, post_id) VALUES ($1, $2, $3) RETURNING id";

pub struct PgCommentStore {
    pool: PgPool,
}

impl PgCommentStore {
    pub fn new(pool: PgPool) -> Self {
        PgCommentStore { pool }
    }
}

fn changes(patch: &CommentPatch) -> ChangeSet {
    let mut c = ChangeSet::new();
    c.set("date", patch.date)
        .set("body", patch.body.clone())
        .set("user_id", patch.user_id)
        .set("post_id", patch.post_id);
    c
}

#[async_trait]
impl Storage<Comment> for PgCommentStore {
    #[tracing::instrument(name = "CommentStore.create", skip(self, new), fields(post_id = ?new.post_id), err)]
    async fn create(&self, new: &NewComment) -> Result<i32, StoreError> {
        tracing::debug!(sql = COMMENT_CREATE, "query");
        let id = sqlx::query_scalar::<_, i32>(COMMENT_CREATE)
            .bind(&new.body)
            .bind(new.user_id)
            .bind(new.post_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    #[tracing::instrument(name = "CommentStore.read", skip(self), err)]
    async fn read(&self, id: i32) -> Result<Comment, StoreError> {
        read_one(&self.pool, COLUMNS, id).await
    }

    #[tracing::instrument(name = "CommentStore.update", skip(self, patch), fields(id = ?patch.id), err)]
    async fn update(&self, patch: &CommentPatch) -> Result<Comment, StoreError> {
        let q = update("comments", patch.id, &changes(patch), COLUMNS)?;
        update_one(&self.pool, q).await
    }

    #[tracing::instrument(name = "CommentStore.delete", skip(self), err)]
    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        delete_one::<Comment>(&self.pool, id).await
    }
}
