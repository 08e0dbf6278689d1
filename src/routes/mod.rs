//! HTTP route handlers
//!
//! Each submodule owns one path prefix and exposes a `handle_*_request`
//! entry point returning `None` when the path is not its own. The server's
//! dispatcher tries them in order.

pub mod auth_routes;
pub mod health;
pub mod helpers;
pub mod resources;
pub mod skill_routes;

pub use auth_routes::handle_auth_request;
pub use health::health_check;
pub use resources::handle_resource_request;
pub use skill_routes::handle_skill_request;
