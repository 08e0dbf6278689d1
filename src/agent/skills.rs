//! Skill descriptor table
//!
//! The nine skill controllers share one shape: validate a required field,
//! fill defaults, call the agent, optionally persist a Resource, wrap the
//! response. That shape lives in data here; the generic handler in
//! `routes::skill_routes` interprets it.

use serde_json::{Map, Value};

/// Default value for an optional payload field
#[derive(Debug, Clone, Copy)]
pub enum DefaultValue {
    Str(&'static str),
    Bool(bool),
    EmptyArray,
}

impl DefaultValue {
    pub fn to_value(self) -> Value {
        match self {
            DefaultValue::Str(s) => Value::String(s.to_string()),
            DefaultValue::Bool(b) => Value::Bool(b),
            DefaultValue::EmptyArray => Value::Array(Vec::new()),
        }
    }
}

/// Fallback title used when the agent response carries none
#[derive(Debug, Clone, Copy)]
pub enum TitleFallback {
    /// Fixed literal
    Literal(&'static str),
    /// Prefix joined with a payload field, e.g. "Social Story: {situation}"
    Prefixed(&'static str, &'static str),
}

impl TitleFallback {
    pub fn resolve(&self, payload: &Map<String, Value>) -> String {
        match self {
            TitleFallback::Literal(s) => (*s).to_string(),
            TitleFallback::Prefixed(prefix, field) => {
                let suffix = payload.get(*field).and_then(Value::as_str).unwrap_or("");
                format!("{}{}", prefix, suffix)
            }
        }
    }
}

/// How a skill's agent response maps onto a persisted Resource
#[derive(Debug, Clone, Copy)]
pub struct ArtifactSpec {
    /// Resource kind tag
    pub kind: &'static str,
    /// Response key holding the large text payload, if any
    pub content_key: Option<&'static str>,
    /// Title when neither the response nor the request supplied one
    pub fallback_title: TitleFallback,
}

/// Binary input handling for the two media skills
#[derive(Debug, Clone, Copy)]
pub struct MediaInput {
    /// Payload key the agent expects the base64 data under
    pub payload_key: &'static str,
    /// Inline base64 body field
    pub inline_key: &'static str,
    /// Named external-reference body field (lowest precedence)
    pub file_key: &'static str,
}

/// Response envelope shape per skill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// {success, resource, result, message}
    Artifact,
    /// {resource, result}
    Resource,
    /// Raw agent result only
    Raw,
    /// {success, result, message, metadata}
    Caption,
}

/// Everything the generic handler needs to run one skill
#[derive(Debug, Clone, Copy)]
pub struct SkillDescriptor {
    /// Path segment under /api/skills/
    pub route: &'static str,
    /// Agent endpoint name
    pub endpoint: &'static str,
    /// Required body field, if any
    pub required: Option<&'static str>,
    /// 400 message when the required input is missing
    pub missing_message: &'static str,
    /// Defaults applied for absent optional fields
    pub defaults: &'static [(&'static str, DefaultValue)],
    /// Nested option defaults (storybook only); caller options merge over them
    pub nested_options: Option<&'static [(&'static str, DefaultValue)]>,
    /// Resource persistence mapping, None for purely conversational skills
    pub artifact: Option<ArtifactSpec>,
    /// Binary input handling, None for text-only skills
    pub media: Option<MediaInput>,
    /// Response envelope shape
    pub envelope: Envelope,
    /// Success message for envelopes that carry one
    pub success_message: &'static str,
}

/// The full skill table, one entry per route
pub const SKILLS: &[SkillDescriptor] = &[
    SkillDescriptor {
        route: "storybook",
        endpoint: "create_storybook",
        required: Some("content"),
        missing_message: "Content is required to create a storybook",
        defaults: &[("title", DefaultValue::Str("Educational Storybook"))],
        nested_options: Some(&[
            ("dyslexia_friendly", DefaultValue::Bool(true)),
            ("reading_level", DefaultValue::Str("grade5")),
            ("include_images", DefaultValue::Bool(true)),
            ("simple_sentences", DefaultValue::Bool(true)),
        ]),
        artifact: Some(ArtifactSpec {
            kind: "storybook",
            content_key: Some("storybook_content"),
            fallback_title: TitleFallback::Literal("Storybook"),
        }),
        media: None,
        envelope: Envelope::Artifact,
        success_message: "Storybook created successfully! The content is ready for reading.",
    },
    SkillDescriptor {
        route: "sign",
        endpoint: "create_sign_language",
        required: Some("content"),
        missing_message: "Content is required to create sign language instructions",
        defaults: &[
            ("title", DefaultValue::Str("Sign Language Lesson")),
            ("dialect", DefaultValue::Str("ASL")),
            ("difficulty_level", DefaultValue::Str("beginner")),
            ("include_fingerspelling", DefaultValue::Bool(false)),
        ],
        nested_options: None,
        artifact: Some(ArtifactSpec {
            kind: "sign_video",
            content_key: Some("video_script"),
            fallback_title: TitleFallback::Literal("Sign Language Lesson"),
        }),
        media: None,
        envelope: Envelope::Artifact,
        success_message:
            "Sign language lesson created successfully! The script includes detailed instructions for clear signing.",
    },
    SkillDescriptor {
        route: "audiobook",
        endpoint: "create_audiobook",
        required: Some("content"),
        missing_message: "Content is required to create an audiobook",
        defaults: &[
            ("title", DefaultValue::Str("Educational Audiobook")),
            ("voice_preference", DefaultValue::Str("alloy")),
            ("reading_speed", DefaultValue::Str("normal")),
            ("age_group", DefaultValue::Str("general")),
        ],
        nested_options: None,
        artifact: Some(ArtifactSpec {
            kind: "audiobook",
            content_key: Some("audio_script"),
            fallback_title: TitleFallback::Literal("Audiobook"),
        }),
        media: None,
        envelope: Envelope::Artifact,
        success_message: "Audiobook created successfully! The script is ready for narration.",
    },
    SkillDescriptor {
        route: "social_story",
        endpoint: "create_social_story",
        required: Some("situation"),
        missing_message: "situation required",
        defaults: &[
            ("student_name", DefaultValue::Str("Student")),
            ("specific_needs", DefaultValue::Str("General support needed")),
        ],
        nested_options: None,
        artifact: Some(ArtifactSpec {
            kind: "social_story",
            content_key: None,
            fallback_title: TitleFallback::Prefixed("Social Story: ", "situation"),
        }),
        media: None,
        envelope: Envelope::Resource,
        success_message: "",
    },
    SkillDescriptor {
        route: "math",
        endpoint: "math_help",
        required: Some("problem"),
        missing_message: "problem required",
        defaults: &[
            ("grade_level", DefaultValue::Str("middle school")),
            ("learning_style", DefaultValue::Str("visual")),
        ],
        nested_options: None,
        artifact: None,
        media: None,
        envelope: Envelope::Raw,
        success_message: "",
    },
    SkillDescriptor {
        route: "emotion",
        endpoint: "emotion_support",
        required: Some("emotion_input"),
        missing_message: "emotion_input required",
        defaults: &[
            ("situation", DefaultValue::Str("general")),
            ("age_group", DefaultValue::Str("teen")),
        ],
        nested_options: None,
        artifact: None,
        media: None,
        envelope: Envelope::Raw,
        success_message: "",
    },
    SkillDescriptor {
        route: "comm_board",
        endpoint: "create_comm_board",
        required: None,
        missing_message: "",
        defaults: &[
            ("vocabulary_focus", DefaultValue::Str("basic needs")),
            ("age_level", DefaultValue::Str("child")),
            ("communication_goals", DefaultValue::Str("daily communication")),
            ("custom_words", DefaultValue::EmptyArray),
            ("board_size", DefaultValue::Str("standard")),
        ],
        nested_options: None,
        artifact: Some(ArtifactSpec {
            kind: "comm_board",
            content_key: Some("comm_board_layout"),
            fallback_title: TitleFallback::Literal("Communication Board"),
        }),
        media: None,
        envelope: Envelope::Artifact,
        success_message: "Communication board created successfully! The board is ready for use.",
    },
    SkillDescriptor {
        route: "live_caption",
        endpoint: "live_caption",
        required: None,
        missing_message:
            "Audio data required. Please provide audio_base64, upload an audio file, or provide audio_file data.",
        defaults: &[
            ("language", DefaultValue::Str("en")),
            ("format", DefaultValue::Str("srt")),
            ("enable_timestamps", DefaultValue::Bool(true)),
            ("enable_confidence_scores", DefaultValue::Bool(true)),
        ],
        nested_options: None,
        artifact: None,
        media: Some(MediaInput {
            payload_key: "audio_stream",
            inline_key: "audio_base64",
            file_key: "audio_file",
        }),
        envelope: Envelope::Caption,
        success_message: "Audio transcription completed successfully",
    },
    SkillDescriptor {
        route: "describe_image",
        endpoint: "describe_image",
        required: None,
        missing_message:
            "Image required. Please provide image_base64, upload a file, or provide image_file data.",
        defaults: &[
            ("context", DefaultValue::Str("Educational content")),
            ("detail_level", DefaultValue::Str("detailed")),
        ],
        nested_options: None,
        artifact: Some(ArtifactSpec {
            kind: "image_description",
            content_key: Some("description"),
            fallback_title: TitleFallback::Literal("Image Description"),
        }),
        media: Some(MediaInput {
            payload_key: "image",
            inline_key: "image_base64",
            file_key: "image_file",
        }),
        envelope: Envelope::Artifact,
        success_message: "Image description generated successfully",
    },
];

/// Look up a descriptor by route segment
pub fn find_by_route(route: &str) -> Option<&'static SkillDescriptor> {
    SKILLS.iter().find(|d| d.route == route)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_all_nine_skills() {
        assert_eq!(SKILLS.len(), 9);
        let routes: Vec<&str> = SKILLS.iter().map(|d| d.route).collect();
        for route in [
            "storybook",
            "sign",
            "audiobook",
            "social_story",
            "math",
            "emotion",
            "comm_board",
            "live_caption",
            "describe_image",
        ] {
            assert!(routes.contains(&route), "missing route {}", route);
        }
    }

    #[test]
    fn test_find_by_route() {
        let desc = find_by_route("audiobook").unwrap();
        assert_eq!(desc.endpoint, "create_audiobook");
        assert!(find_by_route("nope").is_none());
    }

    #[test]
    fn test_conversational_skills_have_no_artifact() {
        for route in ["math", "emotion", "live_caption"] {
            let desc = find_by_route(route).unwrap();
            assert!(desc.artifact.is_none(), "{} must not persist", route);
        }
    }

    #[test]
    fn test_artifact_kinds_match_resource_tags() {
        let kinds: Vec<&str> = SKILLS
            .iter()
            .filter_map(|d| d.artifact.map(|a| a.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                "storybook",
                "sign_video",
                "audiobook",
                "social_story",
                "comm_board",
                "image_description"
            ]
        );
    }

    #[test]
    fn test_title_fallback_prefixed() {
        let mut payload = Map::new();
        payload.insert(
            "situation".to_string(),
            Value::String("the dentist".to_string()),
        );
        let fallback = TitleFallback::Prefixed("Social Story: ", "situation");
        assert_eq!(fallback.resolve(&payload), "Social Story: the dentist");
    }
}
