//! Simple blog: CRUD REST API for users, posts and comments on PostgreSQL.

pub mod app;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;

pub use app::{api_router, router, run};
pub use error::{AppError, ConfigError, ErrorKind, Operation, RepoError, StoreError};
pub use models::{Comment, NewComment, NewPost, NewUser, Post, Resource, User};
pub use repository::Repository;
pub use settings::Settings;
pub use state::AppState;
pub use store::{PgCommentStore, PgPostStore, PgUserStore, Storage};
