//! Values that can be bound to a PostgreSQL query.

use chrono::NaiveDateTime;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;

/// A column value carried by a [`QueryBuf`](super::QueryBuf).
/// `None` binds SQL NULL typed as the variant's column type.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlValue {
    Bool(Option<bool>),
    Int(Option<i32>),
    Text(Option<String>),
    Timestamp(NaiveDateTime),
}

impl From<bool> for SqlValue {
    fn from(b: bool) -> Self {
        SqlValue::Bool(Some(b))
    }
}

impl From<Option<bool>> for SqlValue {
    fn from(b: Option<bool>) -> Self {
        SqlValue::Bool(b)
    }
}

impl From<i32> for SqlValue {
    fn from(n: i32) -> Self {
        SqlValue::Int(Some(n))
    }
}

impl From<Option<i32>> for SqlValue {
    fn from(n: Option<i32>) -> Self {
        SqlValue::Int(n)
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        SqlValue::Text(Some(s))
    }
}

impl From<Option<String>> for SqlValue {
    fn from(s: Option<String>) -> Self {
        SqlValue::Text(s)
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::Text(Some(s.to_string()))
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(t: NaiveDateTime) -> Self {
        SqlValue::Timestamp(t)
    }
}

/// Bind params in order to a statement mapped to `O`.
pub fn bind_query_as<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    params: &[SqlValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for p in params {
        query = match p {
            SqlValue::Bool(b) => query.bind(*b),
            SqlValue::Int(n) => query.bind(*n),
            SqlValue::Text(s) => query.bind(s.clone()),
            SqlValue::Timestamp(t) => query.bind(*t),
        };
    }
    query
}
