//! Blog schema DDL, demo rows and database auto-creation.

use crate::error::{AppError, ConfigError};
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// Drop and recreate, in order. Tables with foreign keys come after their targets.
const INIT_STATEMENTS: &[&str] = &[
    "DROP TABLE IF EXISTS comments",
    "DROP TABLE IF EXISTS posts CASCADE",
    "DROP TABLE IF EXISTS users CASCADE",
    "CREATE EXTENSION IF NOT EXISTS pgcrypto",
    r#"
    CREATE TABLE users (
        id INT PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
        username VARCHAR(100) NOT NULL UNIQUE,
        password VARCHAR(100) NOT NULL,
        first_name VARCHAR(100),
        last_name VARCHAR(100),
        email VARCHAR(100),
        is_active BOOL
    )
    "#,
    r#"
    CREATE TABLE posts (
        id INT PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
        title VARCHAR(255) NOT NULL UNIQUE,
        body TEXT NOT NULL,
        user_id INT,
        FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE SET NULL ON UPDATE CASCADE
    )
    "#,
    r#"
    CREATE TABLE comments (
        id INT PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
        date TIMESTAMP WITHOUT TIME ZONE DEFAULT NOW(),
        body TEXT NOT NULL,
        user_id INT,
        post_id INT,
        FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE SET NULL ON UPDATE CASCADE,
        FOREIGN KEY (post_id) REFERENCES posts (id) ON DELETE CASCADE ON UPDATE CASCADE
    )
    "#,
];

const DEMO_USERS: &str = r#"
INSERT INTO users (username, password, first_name, last_name, email, is_active)
VALUES
    ('admin', crypt('password', gen_salt('bf', 8)), 'Administrator', 'TaskSystem', 'admin@example.loc', true),
    ('ptsypyshev', crypt('testpass', gen_salt('bf', 8)), 'Pavel', 'Tsypyshev', 'ptsypyshev@example.loc', true),
    ('vpupkin', crypt('puptest', gen_salt('bf', 8)), 'Vasiliy', 'Pupkin', 'vpupkin@example.loc', false),
    ('iivanov', crypt('ivantest', gen_salt('bf', 8)), 'Ivan', 'Ivanov', 'iivanov@example.loc', true),
    ('ppetrov', crypt('petrtest', gen_salt('bf', 8)), 'Petr', 'Petrov', 'ppetrov@example.loc', true),
    ('ssidorov', crypt('sidrtest', gen_salt('bf', 8)), 'Sidor', 'Sidorov', 'ssidorov@example.loc', true)
"#;

/// (title, body, user_id)
const DEMO_POSTS: &[(&str, &str, i32)] = &[
    ("Post 1", "Content for post 1", 2),
    ("Post 2", "Content for post 2", 3),
    ("Post 3", "Content for post 3", 4),
    ("Post 4", "Content for post 4", 5),
    ("Post 5", "Content for post 5", 6),
    ("Post 6", "Content for post 6", 6),
    ("Post 7", "Content for post 7", 5),
    ("Post 8", "Content for post 8", 4),
    ("Post 9", "Content for post 9", 3),
    ("Post 10", "Content for post 10", 2),
];

/// (body, user_id, post_id)
const DEMO_COMMENTS: &[(&str, i32, i32)] = &[
    ("Comment 1", 6, 1),
    ("Comment 2", 5, 2),
    ("Comment 3", 4, 3),
    ("Comment 4", 3, 4),
    ("Comment 5", 2, 5),
    ("Comment 6", 2, 1),
    ("Comment 7", 3, 2),
    ("Comment 8", 4, 8),
    ("Comment 9", 5, 9),
    ("Comment 10", 6, 1),
];

/// Drop all blog tables and recreate them empty. Destroys existing data.
/// On failure the previous schema and its rows are left in place.
pub async fn init_schema(pool: &PgPool) -> Result<(), AppError> {
    execute_all(pool, INIT_STATEMENTS).await?;
    tracing::info!("schema initialized");
    Ok(())
}

/// Run `statements` in order inside one transaction; the first failure rolls back all of them.
pub async fn execute_all(pool: &PgPool, statements: &[&str]) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    for sql in statements {
        sqlx::query(sql).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    Ok(())
}

/// Insert the fixed demo rows. Expects a freshly initialized schema so the
/// generated ids line up with the foreign keys below.
pub async fn add_demo_data(pool: &PgPool) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    sqlx::query(DEMO_USERS).execute(&mut *tx).await?;
    for (title, body, user_id) in DEMO_POSTS {
        sqlx::query("INSERT INTO posts (title, body, user_id) VALUES ($1, $2, $3)")
            .bind(title)
            .bind(body)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
    }
    for (body, user_id, post_id) in DEMO_COMMENTS {
        sqlx::query("INSERT INTO comments (body, user_id, post_id) VALUES ($1, $2, $3)")
            .bind(body)
            .bind(user_id)
            .bind(post_id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    tracing::info!(
        users = 6,
        posts = DEMO_POSTS.len(),
        comments = DEMO_COMMENTS.len(),
        "demo data added"
    );
    Ok(())
}

/// Connect to the `postgres` maintenance database and create the target database if missing.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| ConfigError::DatabaseUrl(e.to_string()))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", crate::sql::quoted(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "database created");
    }
    Ok(())
}

/// Split a connection URL into (url of the `postgres` database, target database name).
fn parse_db_name_from_url(url: &str) -> Result<(String, String), ConfigError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| ConfigError::DatabaseUrl("no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let mut parts = path_and_query.splitn(2, '?');
    let db_name = parts.next().unwrap_or("").trim();
    let query = parts.next().map(|q| format!("?{}", q)).unwrap_or_default();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres{}", base, query), db_name.to_string()))
}
