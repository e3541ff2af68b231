//! HTTP handlers for resource CRUD and database bootstrap.

pub mod bootstrap;
pub mod resource;
pub use bootstrap::*;
pub use resource::*;
