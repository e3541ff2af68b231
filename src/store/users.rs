//! `users` table.

use super::{delete_one, read_one, update_one, Storage};
use crate::error::StoreError;
use crate::models::{NewUser, User, UserPatch};
use crate::sql::{update, ChangeSet};
use async_trait::async_trait;
use sqlx::PgPool;

const COLUMNS: &[&str] = &[
    "id",
    "username",
    "password",
    "first_name",
    "last_name",
    "email",
    "is_active",
];

const USER_CREATE: &str = r#"
INSERT INTO users (username, password, first_name, last_name, email, is_active)
VALUES ($1, crypt($2, gen_salt('bf', 8)), $3, $4, $5, $6)
RETURNING id
"#;

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        PgUserStore { pool }
    }
}

fn changes(patch: &UserPatch) -> ChangeSet {
    let mut c = ChangeSet::new();
    c.set("username", patch.username.clone())
        .set_hashed("password", patch.password.clone())
        .set("first_name", patch.first_name.clone())
        .set("last_name", patch.last_name.clone())
        .set("email", patch.email.clone())
        .set("is_active", patch.is_active);
    c
}

#[async_trait]
impl Storage<User> for PgUserStore {
    #[tracing::instrument(name = "UserStore.create", skip(self, new), fields(username = %new.username), err)]
    async fn create(&self, new: &NewUser) -> Result<i32, StoreError> {
        tracing::debug!(sql = USER_CREATE, "query");
        let id = sqlx::query_scalar::<_, i32>(USER_CREATE)
            .bind(&new.username)
            .bind(&new.password)
            .bind(&new.first_name)
            .bind(&new.last_name)
            .bind(&new.email)
            .bind(new.is_active)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    #[tracing::instrument(name = "UserStore.read", skip(self), err)]
    async fn read(&self, id: i32) -> Result<User, StoreError> {
        read_one(&self.pool, COLUMNS, id).await
    }

    #[tracing::instrument(name = "UserStore.update", skip(self, patch), fields(id = ?patch.id), err)]
    async fn update(&self, patch: &UserPatch) -> Result<User, StoreError> {
        let q = update("users", patch.id, &changes(patch), COLUMNS)?;
        update_one(&self.pool, q).await
    }

    #[tracing::instrument(name = "UserStore.delete", skip(self), err)]
    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        delete_one::<User>(&self.pool, id).await
    }
}
