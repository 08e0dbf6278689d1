//! Agent gateway: skill table, remote client, and mock fallback

pub mod client;
pub mod mock;
pub mod skills;

pub use client::{AgentClient, AgentConfig};
pub use mock::mock_response;
pub use skills::{
    find_by_route, ArtifactSpec, DefaultValue, Envelope, MediaInput, SkillDescriptor,
    TitleFallback, SKILLS,
};
