//! Shared response plumbing for HTTP routes

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::types::LanternError;

pub type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

/// JSON body cap for auth routes
pub const AUTH_BODY_LIMIT: usize = 16 * 1024;
/// JSON body cap for skill routes (inline base64 media)
pub const SKILL_BODY_LIMIT: usize = 20 * 1024 * 1024;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<BoxBody> {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
        .body(full_body(json))
        .unwrap()
}

/// Terse client-facing error; details stay in the server log
pub fn error_response(err: &LanternError, code: Option<&str>) -> Response<BoxBody> {
    let status = err.status_code();
    if status.is_server_error() {
        error!("Request failed: {}", err);
    }

    let message = match err {
        LanternError::BadRequest(m)
        | LanternError::Unauthorized(m)
        | LanternError::Duplicate(m)
        | LanternError::NotFound(m) => m.clone(),
        LanternError::Database(_) => "Database not available".to_string(),
        _ => "Internal server error".to_string(),
    };

    json_response(
        status,
        &ErrorResponse {
            error: message,
            code: code.map(str::to_string),
        },
    )
}

pub fn cors_preflight() -> Response<BoxBody> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
        .header("Access-Control-Max-Age", "86400")
        .body(empty_body())
        .unwrap()
}

pub fn full_body(data: impl Into<Bytes>) -> BoxBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

pub fn empty_body() -> BoxBody {
    Full::new(Bytes::new())
        .map_err(|never| match never {})
        .boxed()
}

/// Collect a request body with a size cap
pub async fn read_body(
    req: Request<hyper::body::Incoming>,
    limit: usize,
) -> Result<Bytes, LanternError> {
    let body = req
        .collect()
        .await
        .map_err(|e| LanternError::Http(format!("Failed to read body: {}", e)))?;

    let bytes = body.to_bytes();
    if bytes.len() > limit {
        return Err(LanternError::Http("Request body too large".into()));
    }

    Ok(bytes)
}

pub fn parse_json<T: for<'de> Deserialize<'de>>(bytes: &Bytes) -> Result<T, LanternError> {
    serde_json::from_slice(bytes)
        .map_err(|e| LanternError::Http(format!("Invalid JSON: {}", e)))
}

pub fn get_auth_header(req: &Request<hyper::body::Incoming>) -> Option<&str> {
    req.headers()
        .get(hyper::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn body_json(response: Response<BoxBody>) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_error_maps_to_400_with_code() {
        let response = error_response(
            &LanternError::Duplicate("An account with this email already exists".into()),
            Some("USER_EXISTS"),
        );
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "An account with this email already exists");
        assert_eq!(body["code"], "USER_EXISTS");
    }

    #[tokio::test]
    async fn test_not_found_error_maps_to_404() {
        let response =
            error_response(&LanternError::NotFound("Not found: /api/nope".into()), None);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Not found: /api/nope");
        assert!(body.get("code").is_none());
    }

    #[tokio::test]
    async fn test_server_errors_hide_details() {
        let response = error_response(
            &LanternError::Internal("bson round-trip exploded".into()),
            None,
        );
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Internal server error");
    }
}
