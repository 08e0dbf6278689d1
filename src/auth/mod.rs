//! Authentication and authorization for Lantern
//!
//! Provides:
//! - JWT token generation and validation
//! - Password hashing with bcrypt
//! - The bearer-token gate that runs before every skill controller

pub mod jwt;
pub mod password;

pub use jwt::{extract_token_from_header, Claims, JwtValidator, TokenValidationResult};
pub use password::{hash_password, verify_password};

use bson::{doc, oid::ObjectId};

use crate::db::schemas::{UserDoc, UserRole, USER_COLLECTION};
use crate::server::AppState;
use crate::types::LanternError;

/// Authenticated caller, attached to the request after token verification.
/// Deliberately excludes the password hash.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<&UserDoc> for AuthedUser {
    fn from(user: &UserDoc) -> Self {
        Self {
            id: user._id.unwrap_or_default(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Verify the bearer token and load the referenced user.
///
/// Fails with Unauthorized if the token is absent, malformed, expired, has a
/// bad signature, or references a user that no longer exists. Runs before any
/// controller logic on protected routes.
pub async fn authenticate(
    auth_header: Option<&str>,
    state: &AppState,
) -> Result<AuthedUser, LanternError> {
    let token = extract_token_from_header(auth_header)
        .ok_or_else(|| LanternError::Unauthorized("No token provided".into()))?;

    let result = state.jwt.verify_token(token);
    if !result.valid {
        return Err(LanternError::Unauthorized(
            result.error.unwrap_or_else(|| "Invalid token".into()),
        ));
    }
    let claims = result
        .claims
        .ok_or_else(|| LanternError::Unauthorized("Invalid token".into()))?;

    let user_id = ObjectId::parse_str(&claims.sub)
        .map_err(|_| LanternError::Unauthorized("Invalid token".into()))?;

    let mongo = state
        .mongo
        .as_ref()
        .ok_or_else(|| LanternError::Database("Database not available".into()))?;

    let collection = mongo.collection::<UserDoc>(USER_COLLECTION).await?;
    let user = collection
        .find_one(doc! { "_id": user_id })
        .await?
        .ok_or_else(|| LanternError::Unauthorized("User not found".into()))?;

    Ok(AuthedUser::from(&user))
}
