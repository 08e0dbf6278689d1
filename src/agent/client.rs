//! Agent gateway
//!
//! Single chokepoint for calls against the external SmythOS agent host.
//! Three outcomes, evaluated in order:
//!
//! 1. No real API key configured: deterministic mock response.
//! 2. Remote call succeeds: remote payload returned verbatim.
//! 3. Remote call fails (transport error, timeout, non-2xx): logged, then
//!    the same mock response.
//!
//! Skill controllers therefore never observe a remote failure. The only
//! error this gateway returns is an unknown skill name, which indicates
//! internal misconfiguration rather than anything a client did.

use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Args;
use crate::types::LanternError;

use super::mock::mock_response;

/// Skill name to agent endpoint mapping. Endpoint names mirror the agent's
/// configuration on the SmythOS side.
const AGENT_ENDPOINTS: &[(&str, &str)] = &[
    ("create_storybook", "create_storybook"),
    ("create_sign_language", "create_sign_language"),
    ("create_audiobook", "create_audiobook"),
    ("live_caption", "live_caption"),
    ("create_social_story", "create_social_story"),
    ("describe_image", "describe_image"),
    ("math_help", "math_help"),
    ("emotion_support", "emotion_support"),
    ("create_comm_board", "create_comm_board"),
];

/// Explicitly constructed gateway configuration, passed in at startup
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub base_url: String,
    pub agent_id: String,
    /// None means mock mode (absent or placeholder key)
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl AgentConfig {
    /// Build from parsed CLI/env arguments
    pub fn from_args(args: &Args) -> Self {
        Self {
            base_url: args.agent_url.clone(),
            agent_id: args.agent_id.clone(),
            api_key: args.agent_api_key().map(str::to_string),
            timeout: args.agent_timeout(),
        }
    }

    /// Whether a real credential is available
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// HTTP client for the remote agent host, with mock fallback
pub struct AgentClient {
    http: reqwest::Client,
    config: AgentConfig,
}

impl AgentClient {
    pub fn new(config: AgentConfig) -> Result<Self, LanternError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LanternError::Config(format!("Failed to build HTTP client: {}", e)))?;

        if !config.is_configured() {
            info!("Agent API key not configured; serving mock responses");
        }

        Ok(Self { http, config })
    }

    /// Whether calls go to the remote agent rather than the mock layer
    pub fn is_live(&self) -> bool {
        self.config.is_configured()
    }

    /// Resolve a skill name to its agent endpoint
    pub fn endpoint_for(skill: &str) -> Option<&'static str> {
        let skill = skill.strip_prefix('/').unwrap_or(skill);
        AGENT_ENDPOINTS
            .iter()
            .find(|(name, _)| *name == skill)
            .map(|(_, endpoint)| *endpoint)
    }

    /// Call a skill, always returning some structured object.
    ///
    /// The only error case is an unknown skill name; remote failures are
    /// downgraded to the mock response so end users never see an outage.
    pub async fn call(&self, skill: &str, payload: &Value) -> Result<Value, LanternError> {
        let endpoint = Self::endpoint_for(skill)
            .ok_or_else(|| LanternError::Agent(format!("Unknown agent endpoint: {}", skill)))?;

        if !self.config.is_configured() {
            debug!(endpoint, "Using mock response (agent not configured)");
            return Ok(mock_response(endpoint, payload));
        }

        match self.call_remote(endpoint, payload).await {
            Ok(result) => Ok(result),
            Err(e) => {
                warn!(endpoint, error = %e, "Agent call failed, using mock response");
                Ok(mock_response(endpoint, payload))
            }
        }
    }

    async fn call_remote(&self, endpoint: &str, payload: &Value) -> Result<Value, LanternError> {
        let url = format!(
            "{}/agents/{}/run/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.agent_id,
            endpoint
        );

        debug!(endpoint, url = %url, "Calling remote agent");

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.config.api_key.as_deref().unwrap_or_default())
            .json(payload)
            .send()
            .await
            .map_err(|e| LanternError::Http(format!("Agent request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LanternError::Http(format!(
                "Agent returned {} for {}: {}",
                status, endpoint, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| LanternError::Http(format!("Invalid agent response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mock_config() -> AgentConfig {
        AgentConfig {
            base_url: "https://agent.invalid".into(),
            agent_id: "test-agent".into(),
            api_key: None,
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_endpoint_lookup() {
        assert_eq!(
            AgentClient::endpoint_for("create_storybook"),
            Some("create_storybook")
        );
        // Leading slash tolerated
        assert_eq!(AgentClient::endpoint_for("/math_help"), Some("math_help"));
        assert_eq!(AgentClient::endpoint_for("rm_rf"), None);
    }

    #[tokio::test]
    async fn test_unconfigured_client_serves_mock() {
        let client = AgentClient::new(mock_config()).unwrap();
        let result = client
            .call("create_storybook", &json!({ "content": "space travel" }))
            .await
            .unwrap();
        assert!(result.get("storybook_content").is_some());
    }

    #[tokio::test]
    async fn test_unknown_skill_is_an_error_not_a_mock() {
        let client = AgentClient::new(mock_config()).unwrap();
        let err = client.call("not_a_skill", &json!({})).await.unwrap_err();
        assert!(matches!(err, LanternError::Agent(_)));
    }
}
