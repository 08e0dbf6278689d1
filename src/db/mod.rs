//! MongoDB persistence layer
//!
//! Typed collection wrapper plus the user and resource schemas.

pub mod mongo;
pub mod schemas;

pub use mongo::{IntoIndexes, MongoClient, MongoCollection, MutMetadata};
