//! HTTP routes for agent skills
//!
//! All nine skills run through one handler driven by the descriptor table in
//! `agent::skills`. Per request:
//!
//! 1. Verify the bearer token (before reading the body)
//! 2. Parse the body (JSON, or multipart for the media skills)
//! 3. Resolve media input and validate the required field
//! 4. Build the agent payload from the named fields plus defaults
//! 5. Call the agent gateway (which never fails over to the client)
//! 6. Persist a Resource for artifact-producing skills
//! 7. Wrap the result in the skill's envelope

use base64::Engine;
use bson::oid::ObjectId;
use chrono::Utc;
use hyper::{Method, Request, Response, StatusCode};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{info, warn};

use crate::agent::skills::{find_by_route, ArtifactSpec, Envelope, SkillDescriptor};
use crate::auth::authenticate;
use crate::db::schemas::{ResourceDoc, RESOURCE_COLLECTION};
use crate::routes::helpers::{
    cors_preflight, error_response, get_auth_header, json_response, read_body, BoxBody,
    ErrorResponse, SKILL_BODY_LIMIT,
};
use crate::routes::resources::resource_json;
use crate::server::AppState;
use crate::types::LanternError;
use crate::upload::{multipart_boundary, parse_multipart, UploadedFile};

/// Parsed request body: named text fields plus an optional uploaded file
struct SkillInput {
    fields: Map<String, Value>,
    file: Option<UploadedFile>,
}

/// Read and parse the request body. Multipart is only accepted on the media
/// skills; everything else takes JSON. An empty body counts as an empty
/// object so skills with no required fields work with a bare POST.
async fn read_skill_input(
    req: Request<hyper::body::Incoming>,
    descriptor: &SkillDescriptor,
    state: &AppState,
) -> Result<SkillInput, LanternError> {
    let content_type = req
        .headers()
        .get(hyper::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if let Some(boundary) = multipart_boundary(&content_type) {
        if descriptor.media.is_none() {
            return Err(LanternError::BadRequest(
                "This endpoint expects application/json".into(),
            ));
        }
        let bytes = read_body(req, SKILL_BODY_LIMIT).await?;
        let (fields, file) =
            parse_multipart(bytes, boundary, state.args.max_upload_bytes).await?;
        return Ok(SkillInput { fields, file });
    }

    let bytes = read_body(req, SKILL_BODY_LIMIT).await?;
    let fields = if bytes.is_empty() {
        Map::new()
    } else {
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                return Err(LanternError::BadRequest(
                    "Request body must be a JSON object".into(),
                ))
            }
            Err(e) => return Err(LanternError::Http(format!("Invalid JSON: {}", e))),
        }
    };

    Ok(SkillInput {
        fields,
        file: None,
    })
}

/// True for a present, non-empty input value
fn has_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

/// Build the agent payload from the descriptor's named fields only.
/// Extraneous body fields never reach the agent.
fn build_payload(
    descriptor: &SkillDescriptor,
    input: &SkillInput,
) -> Result<Map<String, Value>, LanternError> {
    let mut payload = Map::new();

    // Media input, highest precedence first: uploaded file, inline base64,
    // named file reference
    if let Some(media) = &descriptor.media {
        let data = if let Some(file) = &input.file {
            Some(Value::String(
                base64::engine::general_purpose::STANDARD.encode(&file.data),
            ))
        } else if has_value(input.fields.get(media.inline_key)) {
            input.fields.get(media.inline_key).cloned()
        } else if has_value(input.fields.get(media.file_key)) {
            input.fields.get(media.file_key).cloned()
        } else {
            None
        };

        match data {
            Some(d) => {
                payload.insert(media.payload_key.to_string(), d);
            }
            None => {
                return Err(LanternError::BadRequest(
                    descriptor.missing_message.to_string(),
                ))
            }
        }
    }

    if let Some(required) = descriptor.required {
        let value = input.fields.get(required);
        if !has_value(value) {
            return Err(LanternError::BadRequest(
                descriptor.missing_message.to_string(),
            ));
        }
        payload.insert(required.to_string(), value.cloned().unwrap_or(Value::Null));
    }

    for (key, default) in descriptor.defaults {
        let value = match input.fields.get(*key) {
            Some(v) if has_value(Some(v)) => v.clone(),
            _ => default.to_value(),
        };
        payload.insert((*key).to_string(), value);
    }

    // Caller options merge over the descriptor's option defaults
    if let Some(option_defaults) = descriptor.nested_options {
        let mut options = Map::new();
        for (key, default) in option_defaults {
            options.insert((*key).to_string(), default.to_value());
        }
        if let Some(Value::Object(caller_options)) = input.fields.get("options") {
            for (key, value) in caller_options {
                options.insert(key.clone(), value.clone());
            }
        }
        payload.insert("options".to_string(), Value::Object(options));
    }

    Ok(payload)
}

/// First string value under any of the given keys
fn first_str<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
}

/// Persist the agent result as a Resource owned by the caller
async fn persist_resource(
    state: &AppState,
    owner: ObjectId,
    spec: &ArtifactSpec,
    payload: &Map<String, Value>,
    input: &SkillInput,
    result: &Value,
) -> Result<ResourceDoc, LanternError> {
    let mongo = state
        .mongo
        .as_ref()
        .ok_or_else(|| LanternError::Database("Database not available".into()))?;

    // Title preference: agent result, caller input, descriptor fallback
    let title = first_str(result, &["title"])
        .map(str::to_string)
        .or_else(|| {
            input
                .fields
                .get("title")
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| spec.fallback_title.resolve(payload));

    let mut resource = ResourceDoc::new(owner, spec.kind, title);

    resource.content = spec
        .content_key
        .and_then(|key| stringify_content(result.get(key)));

    resource.agent_artifact_id = match result.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    resource.storage_url = first_str(
        result,
        &["url", "file_url", "audio_url", "video_url", "image_url"],
    )
    .map(str::to_string);

    if let Some(Value::Object(meta)) = result.get("meta") {
        resource.meta = bson::to_document(&Value::Object(meta.clone()))
            .map_err(|e| LanternError::Internal(format!("Invalid agent metadata: {}", e)))?;
    }

    let collection = mongo.collection::<ResourceDoc>(RESOURCE_COLLECTION).await?;
    let id = collection.insert_one(resource.clone()).await?;
    resource._id = Some(id);

    info!(kind = spec.kind, id = %id.to_hex(), "Persisted resource");

    Ok(resource)
}

/// Large content fields are usually strings but some agent responses return
/// structured layouts, which are stored as serialized JSON
fn stringify_content(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

async fn run_skill(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    descriptor: &SkillDescriptor,
) -> Response<BoxBody> {
    let user = match authenticate(get_auth_header(&req), &state).await {
        Ok(u) => u,
        Err(e) => return error_response(&e, None),
    };

    let input = match read_skill_input(req, descriptor, &state).await {
        Ok(i) => i,
        Err(e) => return error_response(&e, None),
    };

    let payload = match build_payload(descriptor, &input) {
        Ok(p) => p,
        Err(e) => return error_response(&e, None),
    };

    let result = match state
        .agent
        .call(descriptor.endpoint, &Value::Object(payload.clone()))
        .await
    {
        Ok(r) => r,
        Err(e) => return error_response(&e, Some("UNKNOWN_SKILL")),
    };

    // Persist before responding so the envelope can carry the stored record
    let resource = match &descriptor.artifact {
        Some(spec) => {
            match persist_resource(&state, user.id, spec, &payload, &input, &result).await {
                Ok(r) => Some(r),
                Err(e) => {
                    warn!(route = descriptor.route, error = %e, "Resource persistence failed");
                    return error_response(&e, Some("PERSIST_ERROR"));
                }
            }
        }
        None => None,
    };

    let body = match descriptor.envelope {
        Envelope::Artifact => json!({
            "success": true,
            "resource": resource.as_ref().map(resource_json),
            "result": result,
            "message": descriptor.success_message,
        }),
        Envelope::Resource => json!({
            "resource": resource.as_ref().map(resource_json),
            "result": result,
        }),
        Envelope::Raw => result,
        Envelope::Caption => json!({
            "success": true,
            "result": result,
            "message": descriptor.success_message,
            "metadata": {
                "language": payload.get("language").cloned().unwrap_or(Value::Null),
                "format": payload.get("format").cloned().unwrap_or(Value::Null),
                "processed_at": Utc::now().to_rfc3339(),
            },
        }),
    };

    json_response(StatusCode::OK, &body)
}

/// Main entry point for skill routes. Returns None if the path is not under
/// /api/skills.
pub async fn handle_skill_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Option<Response<BoxBody>> {
    let path = req.uri().path().to_string();
    let method = req.method().clone();

    let route = match path.strip_prefix("/api/skills/") {
        Some(r) if !r.is_empty() => r.to_string(),
        _ => return None,
    };

    if method == Method::OPTIONS {
        return Some(cors_preflight());
    }

    let descriptor = match find_by_route(&route) {
        Some(d) => d,
        None => {
            return Some(json_response(
                StatusCode::NOT_FOUND,
                &ErrorResponse {
                    error: format!("Unknown skill: {}", route),
                    code: None,
                },
            ))
        }
    };

    if method != Method::POST {
        return Some(json_response(
            StatusCode::METHOD_NOT_ALLOWED,
            &ErrorResponse {
                error: "Method not allowed".into(),
                code: None,
            },
        ));
    }

    Some(run_skill(req, state, descriptor).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::skills::find_by_route;

    fn input_with(fields: &[(&str, Value)]) -> SkillInput {
        let mut map = Map::new();
        for (k, v) in fields {
            map.insert((*k).to_string(), v.clone());
        }
        SkillInput {
            fields: map,
            file: None,
        }
    }

    #[test]
    fn test_missing_required_field_rejected() {
        let descriptor = find_by_route("storybook").unwrap();
        let input = input_with(&[]);
        let err = build_payload(descriptor, &input).unwrap_err();
        assert!(matches!(err, LanternError::BadRequest(_)));
    }

    #[test]
    fn test_empty_string_counts_as_missing() {
        let descriptor = find_by_route("math").unwrap();
        let input = input_with(&[("problem", Value::String("   ".into()))]);
        assert!(build_payload(descriptor, &input).is_err());
    }

    #[test]
    fn test_defaults_applied_and_extraneous_dropped() {
        let descriptor = find_by_route("audiobook").unwrap();
        let input = input_with(&[
            ("content", Value::String("Chapter one".into())),
            ("unexpected", Value::String("dropped".into())),
        ]);
        let payload = build_payload(descriptor, &input).unwrap();

        assert_eq!(payload["content"], "Chapter one");
        assert_eq!(payload["voice_preference"], "alloy");
        assert_eq!(payload["reading_speed"], "normal");
        assert!(!payload.contains_key("unexpected"));
    }

    #[test]
    fn test_caller_value_overrides_default() {
        let descriptor = find_by_route("sign").unwrap();
        let input = input_with(&[
            ("content", Value::String("hello".into())),
            ("dialect", Value::String("BSL".into())),
        ]);
        let payload = build_payload(descriptor, &input).unwrap();
        assert_eq!(payload["dialect"], "BSL");
        assert_eq!(payload["difficulty_level"], "beginner");
    }

    #[test]
    fn test_nested_options_merge() {
        let descriptor = find_by_route("storybook").unwrap();
        let input = input_with(&[
            ("content", Value::String("Once upon a time".into())),
            (
                "options",
                json!({ "reading_level": "grade2", "extra": true }),
            ),
        ]);
        let payload = build_payload(descriptor, &input).unwrap();

        let options = payload["options"].as_object().unwrap();
        assert_eq!(options["reading_level"], "grade2");
        assert_eq!(options["dyslexia_friendly"], true);
        assert_eq!(options["extra"], true);
    }

    #[test]
    fn test_comm_board_accepts_empty_body() {
        let descriptor = find_by_route("comm_board").unwrap();
        let input = input_with(&[]);
        let payload = build_payload(descriptor, &input).unwrap();
        assert_eq!(payload["vocabulary_focus"], "basic needs");
        assert_eq!(payload["custom_words"], json!([]));
    }

    #[test]
    fn test_media_precedence_inline_over_file_reference() {
        let descriptor = find_by_route("live_caption").unwrap();
        let input = input_with(&[
            ("audio_base64", Value::String("QUJD".into())),
            ("audio_file", Value::String("ignored.mp3".into())),
        ]);
        let payload = build_payload(descriptor, &input).unwrap();
        assert_eq!(payload["audio_stream"], "QUJD");
        assert_eq!(payload["language"], "en");
    }

    #[test]
    fn test_media_upload_beats_inline() {
        let descriptor = find_by_route("describe_image").unwrap();
        let mut input = input_with(&[("image_base64", Value::String("aW5saW5l".into()))]);
        input.file = Some(UploadedFile {
            field_name: "file".into(),
            file_name: "photo.png".into(),
            content_type: "image/png".into(),
            data: bytes::Bytes::from_static(b"ABC"),
        });
        let payload = build_payload(descriptor, &input).unwrap();
        assert_eq!(payload["image"], "QUJD");
    }

    #[test]
    fn test_media_missing_rejected_with_named_message() {
        let descriptor = find_by_route("live_caption").unwrap();
        let err = build_payload(descriptor, &input_with(&[])).unwrap_err();
        match err {
            LanternError::BadRequest(msg) => assert!(msg.contains("audio_base64")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_stringify_content_handles_structured_layouts() {
        assert_eq!(
            stringify_content(Some(&Value::String("plain".into()))),
            Some("plain".to_string())
        );
        let layout = json!({ "rows": 3 });
        assert_eq!(
            stringify_content(Some(&layout)),
            Some("{\"rows\":3}".to_string())
        );
        assert_eq!(stringify_content(None), None);
    }
}
