//! Resource document schema
//!
//! One record per durable artifact generated by a skill (storybook, sign
//! language script, audiobook script, social story, communication board,
//! image description). Conversational skills persist nothing.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for generated resources
pub const RESOURCE_COLLECTION: &str = "resources";

/// Resource document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ResourceDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at, is_deleted)
    #[serde(default)]
    pub metadata: Metadata,

    /// Owning user
    pub owner: ObjectId,

    /// Skill tag (storybook, sign_video, audiobook, social_story,
    /// comm_board, image_description)
    pub kind: String,

    /// Human-readable title
    pub title: String,

    /// Open key-value bag returned by the agent
    #[serde(default)]
    pub meta: Document,

    /// Remote agent's artifact id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_artifact_id: Option<String>,

    /// Pointer to externally hosted media, if the agent produced any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_url: Option<String>,

    /// Large text payload (script, story body, board layout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ResourceDoc {
    /// Create a new resource document
    pub fn new(owner: ObjectId, kind: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            owner,
            kind: kind.into(),
            title: title.into(),
            meta: Document::new(),
            agent_artifact_id: None,
            storage_url: None,
            content: None,
        }
    }
}

impl IntoIndexes for ResourceDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // Index on owner for per-user listings
            (
                doc! { "owner": 1 },
                Some(IndexOptions::builder().name("owner_index".to_string()).build()),
            ),
            // Index on kind for filtering by skill tag
            (
                doc! { "kind": 1 },
                Some(IndexOptions::builder().name("kind_index".to_string()).build()),
            ),
        ]
    }
}

impl MutMetadata for ResourceDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
