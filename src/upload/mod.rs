//! Upload gate for the two media skills
//!
//! Parses multipart/form-data bodies, enforcing the size ceiling and the
//! extension/MIME allow-list before any controller logic runs. Text fields
//! pass through into the skill payload; the first accepted file field is
//! surfaced for base64 conversion.

use bytes::Bytes;
use futures_util::stream;
use serde_json::{Map, Value};
use std::convert::Infallible;

use crate::types::LanternError;

/// File types accepted for upload (images and audio)
pub const ALLOWED_TYPES: &[&str] = &[
    "jpeg", "jpg", "png", "gif", "webp", "mp3", "wav", "ogg", "m4a", "aac", "flac",
];

/// Multipart field names treated as file inputs
const FILE_FIELDS: &[&str] = &["file", "audio_file", "image_file"];

/// An uploaded file that passed the gate
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field_name: String,
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Check a file against the allow-list. Both the extension and the declared
/// MIME type must mention an allowed format.
pub fn is_allowed_upload(file_name: &str, content_type: &str) -> bool {
    let name = file_name.to_lowercase();
    let mime = content_type.to_lowercase();

    let ext_ok = name
        .rsplit('.')
        .next()
        .map(|ext| ALLOWED_TYPES.contains(&ext))
        .unwrap_or(false);
    let mime_ok = ALLOWED_TYPES.iter().any(|t| mime.contains(t))
        // Common aliases browsers send for allowed audio formats
        || mime.contains("mpeg")
        || mime.contains("mp4a");

    ext_ok && mime_ok
}

/// Extract the multipart boundary from a Content-Type header value
pub fn multipart_boundary(content_type: &str) -> Option<String> {
    multer::parse_boundary(content_type).ok()
}

/// Parse a multipart body into (text fields, first accepted file).
///
/// Rejects disallowed file types and files over `max_file_bytes` before the
/// controller sees the request.
pub async fn parse_multipart(
    body: Bytes,
    boundary: String,
    max_file_bytes: u64,
) -> Result<(Map<String, Value>, Option<UploadedFile>), LanternError> {
    let body_stream = stream::once(async move { Ok::<Bytes, Infallible>(body) });
    let mut multipart = multer::Multipart::new(body_stream, boundary);

    let mut fields = Map::new();
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| LanternError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);

        let is_file = file_name.is_some() || FILE_FIELDS.contains(&field_name.as_str());

        if is_file {
            let file_name = file_name.unwrap_or_else(|| "upload".to_string());
            let content_type = field
                .content_type()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());

            if !is_allowed_upload(&file_name, &content_type) {
                return Err(LanternError::BadRequest(
                    "Only image and audio files are allowed".into(),
                ));
            }

            let data = field
                .bytes()
                .await
                .map_err(|e| LanternError::BadRequest(format!("Upload read failed: {}", e)))?;

            if data.len() as u64 > max_file_bytes {
                return Err(LanternError::BadRequest(format!(
                    "File too large (limit {} bytes)",
                    max_file_bytes
                )));
            }

            // First file wins; later file fields are ignored
            if file.is_none() {
                file = Some(UploadedFile {
                    field_name,
                    file_name,
                    content_type,
                    data,
                });
            }
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| LanternError::BadRequest(format!("Invalid form field: {}", e)))?;
            fields.insert(field_name, Value::String(text));
        }
    }

    Ok((fields, file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_list_accepts_images_and_audio() {
        assert!(is_allowed_upload("photo.png", "image/png"));
        assert!(is_allowed_upload("clip.JPG", "image/jpeg"));
        assert!(is_allowed_upload("lecture.mp3", "audio/mpeg"));
        assert!(is_allowed_upload("voice.m4a", "audio/mp4a-latm"));
        assert!(is_allowed_upload("sound.wav", "audio/wav"));
    }

    #[test]
    fn test_allow_list_rejects_other_types() {
        assert!(!is_allowed_upload("report.pdf", "application/pdf"));
        assert!(!is_allowed_upload("script.sh", "text/x-shellscript"));
        assert!(!is_allowed_upload("movie.mp4", "video/mp4"));
        // Extension spoofing with mismatched MIME
        assert!(!is_allowed_upload("photo.png", "application/x-executable"));
    }

    #[test]
    fn test_boundary_parsing() {
        assert_eq!(
            multipart_boundary("multipart/form-data; boundary=XYZ").as_deref(),
            Some("XYZ")
        );
        assert!(multipart_boundary("application/json").is_none());
    }

    fn build_multipart(boundary: &str, parts: &[(&str, Option<(&str, &str)>, &[u8])]) -> Bytes {
        let mut body = Vec::new();
        for (name, file_info, data) in parts {
            body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
            match file_info {
                Some((file_name, content_type)) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                            name, file_name, content_type
                        )
                        .as_bytes(),
                    );
                }
                None => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                            .as_bytes(),
                    );
                }
            }
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
        Bytes::from(body)
    }

    #[tokio::test]
    async fn test_parse_multipart_with_file_and_fields() {
        let body = build_multipart(
            "BOUND",
            &[
                ("language", None, b"en"),
                ("audio_file", Some(("clip.wav", "audio/wav")), b"RIFFdata"),
            ],
        );

        let (fields, file) = parse_multipart(body, "BOUND".into(), 1024).await.unwrap();
        assert_eq!(fields.get("language"), Some(&Value::String("en".into())));
        let file = file.unwrap();
        assert_eq!(file.field_name, "audio_file");
        assert_eq!(file.data.as_ref(), b"RIFFdata");
    }

    #[tokio::test]
    async fn test_parse_multipart_rejects_disallowed_type() {
        let body = build_multipart(
            "BOUND",
            &[("file", Some(("evil.exe", "application/octet-stream")), b"MZ")],
        );

        let err = parse_multipart(body, "BOUND".into(), 1024).await.unwrap_err();
        assert!(matches!(err, LanternError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_parse_multipart_rejects_oversized_file() {
        let big = vec![0u8; 64];
        let body = build_multipart("BOUND", &[("file", Some(("a.png", "image/png")), &big)]);

        let err = parse_multipart(body, "BOUND".into(), 16).await.unwrap_err();
        match err {
            LanternError::BadRequest(msg) => assert!(msg.contains("too large")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
