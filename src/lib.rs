//! Lantern - accessibility learning gateway
//!
//! REST backend for AI-generated education content. Lantern authenticates
//! students and educators against MongoDB, proxies skill requests to a
//! remote SmythOS agent, and persists the generated artifacts as resources.
//!
//! ## Services
//!
//! - **Auth**: JWT registration/login backed by bcrypt password hashes
//! - **Skills**: Nine accessibility skills behind one table-driven handler
//! - **Agent**: Remote agent gateway with deterministic mock fallback
//! - **Resources**: Durable artifacts generated by the skills
//! - **Upload**: Multipart gate for audio/image input

pub mod agent;
pub mod auth;
pub mod config;
pub mod db;
pub mod routes;
pub mod server;
pub mod types;
pub mod upload;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{LanternError, Result};
