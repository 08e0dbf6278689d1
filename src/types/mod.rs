//! Shared types for Lantern

mod error;

pub use error::{LanternError, Result};
