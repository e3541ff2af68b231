//! Routers for resources, bootstrap pages and health checks.

pub mod bootstrap;
pub mod common;
pub mod resource;

pub use bootstrap::bootstrap_routes;
pub use common::{common_routes, common_routes_with_ready};
pub use resource::resource_routes;
