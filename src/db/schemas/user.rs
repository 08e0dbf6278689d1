//! User document schema
//!
//! Stores account credentials and preferences for students, educators, and
//! admins.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for users
pub const USER_COLLECTION: &str = "users";

/// Account role
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Student,
    Educator,
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UserRole::Student => "student",
            UserRole::Educator => "educator",
            UserRole::Admin => "admin",
        };
        f.write_str(s)
    }
}

/// User document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct UserDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at, is_deleted)
    #[serde(default)]
    pub metadata: Metadata,

    /// Display name
    pub name: String,

    /// Email address (unique)
    pub email: String,

    /// Bcrypt password hash
    pub password_hash: String,

    /// Account role
    #[serde(default)]
    pub role: UserRole,

    /// Open key-value bag of accessibility preferences
    #[serde(default)]
    pub preferences: Document,
}

impl UserDoc {
    /// Create a new user document
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            name,
            email,
            password_hash,
            role: UserRole::Student,
            preferences: Document::new(),
        }
    }
}

impl IntoIndexes for UserDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // Unique index on email
            (
                doc! { "email": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("email_unique".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for UserDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(
            serde_json::to_string(&UserRole::Educator).unwrap(),
            "\"educator\""
        );
        let role: UserRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, UserRole::Admin);
    }

    #[test]
    fn test_new_user_defaults_to_student() {
        let user = UserDoc::new("A".into(), "a@x.com".into(), "hash".into());
        assert_eq!(user.role, UserRole::Student);
        assert!(user.preferences.is_empty());
        assert!(user._id.is_none());
    }
}
