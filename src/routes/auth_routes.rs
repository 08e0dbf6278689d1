//! HTTP routes for authentication
//!
//! - POST /api/auth/register - Create an account and get a JWT token
//! - POST /api/auth/login    - Authenticate and get a JWT token
//! - GET  /api/auth/me       - Get current user info from token

use bson::doc;
use hyper::{Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::{authenticate, hash_password, verify_password, AuthedUser};
use crate::db::schemas::{UserDoc, USER_COLLECTION};
use crate::routes::helpers::{
    cors_preflight, error_response, get_auth_header, json_response, parse_json, read_body,
    BoxBody, ErrorResponse, AUTH_BODY_LIMIT,
};
use crate::server::AppState;
use crate::types::LanternError;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<&AuthedUser> for UserSummary {
    fn from(user: &AuthedUser) -> Self {
        Self {
            id: user.id.to_hex(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserSummary,
}

/// POST /api/auth/register
///
/// Flow:
/// 1. Validate required fields
/// 2. Check the email is not already registered
/// 3. Hash password with bcrypt
/// 4. Store the user in MongoDB
/// 5. Generate and return a JWT token
async fn handle_register(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let body: RegisterRequest = match read_body(req, AUTH_BODY_LIMIT)
        .await
        .and_then(|bytes| parse_json(&bytes))
    {
        Ok(b) => b,
        Err(e) => return error_response(&e, None),
    };

    if body.name.is_empty() || body.email.is_empty() || body.password.is_empty() {
        return json_response(
            StatusCode::BAD_REQUEST,
            &ErrorResponse {
                error: "Missing required fields: name, email, password".into(),
                code: None,
            },
        );
    }

    let mongo = match &state.mongo {
        Some(m) => m,
        None => {
            return error_response(&LanternError::Database("no database".into()), Some("DB_UNAVAILABLE"))
        }
    };

    let collection = match mongo.collection::<UserDoc>(USER_COLLECTION).await {
        Ok(c) => c,
        Err(e) => return error_response(&e, Some("DB_ERROR")),
    };

    // Check if email already exists
    match collection.find_one(doc! { "email": &body.email }).await {
        Ok(Some(_)) => return user_exists(),
        Ok(None) => {}
        Err(e) => return error_response(&e, Some("DB_ERROR")),
    }

    let password_hash = match hash_password(&body.password) {
        Ok(h) => h,
        Err(e) => return error_response(&e, Some("HASH_ERROR")),
    };

    let user = UserDoc::new(body.name.clone(), body.email.clone(), password_hash);

    let user_id = match collection.insert_one(user).await {
        Ok(id) => id,
        Err(e) => {
            // Duplicate key from a racing registration maps to the same
            // user-exists response as the pre-check
            let error_str = e.to_string();
            if error_str.contains("duplicate key") || error_str.contains("E11000") {
                return user_exists();
            }
            return error_response(&e, Some("DB_ERROR"));
        }
    };

    let token = match state.jwt.generate_token(&user_id.to_hex()) {
        Ok(t) => t,
        Err(e) => return error_response(&e, Some("TOKEN_ERROR")),
    };

    info!("Registered new user: {}", body.email);

    json_response(
        StatusCode::OK,
        &AuthResponse {
            token,
            user: UserSummary {
                id: user_id.to_hex(),
                name: body.name,
                email: body.email,
                role: "student".into(),
            },
        },
    )
}

/// POST /api/auth/login
///
/// Unknown email and wrong password return the same response shape and
/// status to prevent user enumeration.
async fn handle_login(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let body: LoginRequest = match read_body(req, AUTH_BODY_LIMIT)
        .await
        .and_then(|bytes| parse_json(&bytes))
    {
        Ok(b) => b,
        Err(e) => return error_response(&e, None),
    };

    if body.email.is_empty() || body.password.is_empty() {
        return json_response(
            StatusCode::BAD_REQUEST,
            &ErrorResponse {
                error: "Missing required fields: email, password".into(),
                code: None,
            },
        );
    }

    let mongo = match &state.mongo {
        Some(m) => m,
        None => {
            return error_response(&LanternError::Database("no database".into()), Some("DB_UNAVAILABLE"))
        }
    };

    let collection = match mongo.collection::<UserDoc>(USER_COLLECTION).await {
        Ok(c) => c,
        Err(e) => return error_response(&e, Some("DB_ERROR")),
    };

    let user = match collection.find_one(doc! { "email": &body.email }).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!("Login failed - user not found: {}", body.email);
            return invalid_credentials();
        }
        Err(e) => return error_response(&e, Some("DB_ERROR")),
    };

    let password_valid = match verify_password(&body.password, &user.password_hash) {
        Ok(valid) => valid,
        Err(e) => {
            warn!("Password verification error: {}", e);
            return error_response(
                &LanternError::Internal("authentication error".into()),
                Some("AUTH_ERROR"),
            );
        }
    };

    if !password_valid {
        warn!("Login failed - invalid password: {}", body.email);
        return invalid_credentials();
    }

    let user_id = match user._id {
        Some(id) => id,
        None => {
            return error_response(
                &LanternError::Internal("user missing id".into()),
                Some("DB_ERROR"),
            )
        }
    };

    let token = match state.jwt.generate_token(&user_id.to_hex()) {
        Ok(t) => t,
        Err(e) => return error_response(&e, Some("TOKEN_ERROR")),
    };

    info!("Login successful: {}", body.email);

    json_response(
        StatusCode::OK,
        &AuthResponse {
            token,
            user: UserSummary {
                id: user_id.to_hex(),
                name: user.name,
                email: user.email,
                role: user.role.to_string(),
            },
        },
    )
}

fn user_exists() -> Response<BoxBody> {
    error_response(
        &LanternError::Duplicate("An account with this email already exists".into()),
        Some("USER_EXISTS"),
    )
}

/// Constant-shape credential failure for both unknown email and bad password
fn invalid_credentials() -> Response<BoxBody> {
    json_response(
        StatusCode::UNAUTHORIZED,
        &ErrorResponse {
            error: "Invalid credentials".into(),
            code: Some("INVALID_CREDENTIALS".into()),
        },
    )
}

/// GET /api/auth/me
async fn handle_me(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    match authenticate(get_auth_header(&req), &state).await {
        Ok(user) => json_response(StatusCode::OK, &UserSummary::from(&user)),
        Err(e) => error_response(&e, None),
    }
}

/// Main entry point for auth routes. Returns None if the path is not under
/// /api/auth.
pub async fn handle_auth_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Option<Response<BoxBody>> {
    let path = req.uri().path().to_string();
    let method = req.method().clone();

    if !path.starts_with("/api/auth") {
        return None;
    }

    // Handle CORS preflight
    if method == Method::OPTIONS {
        return Some(cors_preflight());
    }

    let response = match (&method, path.as_str()) {
        (&Method::POST, "/api/auth/register") => handle_register(req, state).await,
        (&Method::POST, "/api/auth/login") => handle_login(req, state).await,
        (&Method::GET, "/api/auth/me") => handle_me(req, state).await,

        (_, "/api/auth/register") | (_, "/api/auth/login") | (_, "/api/auth/me") => json_response(
            StatusCode::METHOD_NOT_ALLOWED,
            &ErrorResponse {
                error: "Method not allowed".into(),
                code: None,
            },
        ),

        _ => json_response(
            StatusCode::NOT_FOUND,
            &ErrorResponse {
                error: "Auth endpoint not found".into(),
                code: None,
            },
        ),
    };

    Some(response)
}
