//! Index page plus schema (re)creation and demo seeding.

use crate::error::AppError;
use crate::schema;
use axum::{extract::State, response::Html};
use sqlx::PgPool;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>Simple Blog API</title></head>
<body>
<h1>Simple Blog API</h1>
<ul>
  <li><a href="/dbinit/">/dbinit/</a> drop and recreate the schema</li>
  <li><a href="/demodb/">/demodb/</a> insert demo users, posts and comments</li>
  <li>GET, DELETE /users/{id}, /posts/{id}, /comments/{id}</li>
  <li>POST, PUT /users/, /posts/, /comments/</li>
</ul>
</body>
</html>
"#;

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /dbinit/
pub async fn init_schema(State(pool): State<PgPool>) -> Result<&'static str, AppError> {
    schema::init_schema(&pool).await?;
    Ok("DB Initialized")
}

/// GET /demodb/
pub async fn add_demo_data(State(pool): State<PgPool>) -> Result<&'static str, AppError> {
    schema::add_demo_data(&pool).await?;
    Ok("Demo data is added")
}
