//! HTTP routes for generated resources
//!
//! - GET /api/resources - List the caller's generated resources, newest first

use bson::doc;
use hyper::{Method, Request, Response, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::auth::authenticate;
use crate::db::schemas::{ResourceDoc, RESOURCE_COLLECTION};
use crate::routes::helpers::{
    cors_preflight, error_response, get_auth_header, json_response, BoxBody, ErrorResponse,
};
use crate::server::AppState;
use crate::types::LanternError;

/// Client-facing view of a ResourceDoc. ObjectIds go out as hex strings and
/// internal metadata collapses to a created_at timestamp.
pub fn resource_json(resource: &ResourceDoc) -> Value {
    json!({
        "id": resource._id.map(|id| id.to_hex()),
        "kind": resource.kind,
        "title": resource.title,
        "content": resource.content,
        "storage_url": resource.storage_url,
        "agent_artifact_id": resource.agent_artifact_id,
        "meta": bson::Bson::from(resource.meta.clone()).into_relaxed_extjson(),
        "created_at": resource
            .metadata
            .created_at
            .map(|dt| dt.try_to_rfc3339_string().unwrap_or_default()),
    })
}

async fn handle_list(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let user = match authenticate(get_auth_header(&req), &state).await {
        Ok(u) => u,
        Err(e) => return error_response(&e, None),
    };

    let mongo = match &state.mongo {
        Some(m) => m,
        None => {
            return error_response(&LanternError::Database("no database".into()), Some("DB_UNAVAILABLE"))
        }
    };

    let collection = match mongo.collection::<ResourceDoc>(RESOURCE_COLLECTION).await {
        Ok(c) => c,
        Err(e) => return error_response(&e, Some("DB_ERROR")),
    };

    let resources = match collection
        .find_many(
            doc! { "owner": user.id },
            Some(doc! { "metadata.created_at": -1 }),
        )
        .await
    {
        Ok(r) => r,
        Err(e) => return error_response(&e, Some("DB_ERROR")),
    };

    let listed: Vec<Value> = resources.iter().map(resource_json).collect();

    json_response(
        StatusCode::OK,
        &json!({
            "resources": listed,
            "count": listed.len(),
        }),
    )
}

/// Main entry point for resource routes. Returns None if the path is not
/// under /api/resources.
pub async fn handle_resource_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Option<Response<BoxBody>> {
    let path = req.uri().path().to_string();
    let method = req.method().clone();

    if !path.starts_with("/api/resources") {
        return None;
    }

    if method == Method::OPTIONS {
        return Some(cors_preflight());
    }

    let response = match (&method, path.as_str()) {
        (&Method::GET, "/api/resources") => handle_list(req, state).await,

        (_, "/api/resources") => json_response(
            StatusCode::METHOD_NOT_ALLOWED,
            &ErrorResponse {
                error: "Method not allowed".into(),
                code: None,
            },
        ),

        _ => json_response(
            StatusCode::NOT_FOUND,
            &ErrorResponse {
                error: "Resource endpoint not found".into(),
                code: None,
            },
        ),
    };

    Some(response)
}
