//! Per-table stores: one statement per operation against PostgreSQL.

mod comments;
mod posts;
mod users;

pub use comments::PgCommentStore;
pub use posts::PgPostStore;
pub use users::PgUserStore;

use crate::error::{Operation, StoreError};
use crate::models::Resource;
use crate::sql::{bind_query_as, column_list, QueryBuf};
use async_trait::async_trait;
use sqlx::PgPool;

/// Create/Read/Update/Delete capability over one resource's table.
#[async_trait]
pub trait Storage<R: Resource>: Send + Sync {
    /// Insert non-id fields; returns the generated id.
    async fn create(&self, new: &R::New) -> Result<i32, StoreError>;
    async fn read(&self, id: i32) -> Result<R, StoreError>;
    /// Write the patch's changed columns; returns the row as stored afterwards.
    async fn update(&self, patch: &R::Patch) -> Result<R, StoreError>;
    async fn delete(&self, id: i32) -> Result<(), StoreError>;
}

/// `SELECT <columns> FROM <table> WHERE id = $1` for `R`.
fn select_by_id_sql<R: Resource>(columns: &[&str]) -> String {
    format!(
        "SELECT {} FROM {} WHERE \"id\" = $1",
        column_list(columns),
        crate::sql::quoted(R::TABLE)
    )
}

/// Select exactly one row by id; zero rows is `NotFound`, more than one `MultipleFound`.
async fn read_one<R: Resource>(pool: &PgPool, columns: &[&str], id: i32) -> Result<R, StoreError> {
    let sql = select_by_id_sql::<R>(columns);
    tracing::debug!(sql = %sql, id, "query");
    let mut rows = sqlx::query_as::<_, R>(&sql).bind(id).fetch_all(pool).await?;
    match rows.len() {
        0 => Err(StoreError::NotFound { resource: R::NAME, id }),
        1 => Ok(rows.remove(0)),
        _ => Err(StoreError::MultipleFound { resource: R::NAME, id }),
    }
}

/// Run a compiled UPDATE ... RETURNING; exactly one row must come back.
async fn update_one<R: Resource>(pool: &PgPool, q: QueryBuf) -> Result<R, StoreError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut rows = bind_query_as(sqlx::query_as::<_, R>(&q.sql), &q.params)
        .fetch_all(pool)
        .await?;
    if rows.len() != 1 {
        return Err(StoreError::RowCountMismatch {
            op: Operation::Update,
            resource: R::NAME,
            affected: rows.len() as u64,
        });
    }
    Ok(rows.remove(0))
}

/// `DELETE FROM <table> WHERE id = $1`; exactly one row must be affected.
async fn delete_one<R: Resource>(pool: &PgPool, id: i32) -> Result<(), StoreError> {
    let sql = format!("DELETE FROM {} WHERE \"id\" = $1", crate::sql::quoted(R::TABLE));
    tracing::debug!(sql = %sql, id, "query");
    let affected = sqlx::query(&sql).bind(id).execute(pool).await?.rows_affected();
    if affected != 1 {
        return Err(StoreError::RowCountMismatch {
            op: Operation::Delete,
            resource: R::NAME,
            affected,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Comment, User};

    #[test]
    fn select_by_id_lists_columns_explicitly() {
        assert_eq!(
            select_by_id_sql::<User>(&["id", "username"]),
            r#"SELECT "id", "username" FROM "users" WHERE "id" = $1"#
        );
        assert!(select_by_id_sql::<Comment>(&["id"]).contains(r#"FROM "comments""#));
    }
}
