//! Database schemas for Lantern
//!
//! Defines MongoDB document structures for users and generated resources.

mod metadata;
mod resource;
mod user;

pub use metadata::Metadata;
pub use resource::{ResourceDoc, RESOURCE_COLLECTION};
pub use user::{UserDoc, UserRole, USER_COLLECTION};
