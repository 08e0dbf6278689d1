//! Configuration for Lantern
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use uuid::Uuid;

/// Placeholder value shipped in .env templates. An API key equal to this is
/// treated the same as no key at all: the gateway serves mock responses.
pub const AGENT_KEY_PLACEHOLDER: &str = "your_actual_smythos_api_key_here";

/// Lantern - accessibility learning gateway
#[derive(Parser, Debug, Clone)]
#[command(name = "lantern")]
#[command(about = "REST backend for AI-generated education accessibility content")]
pub struct Args {
    /// Unique node identifier for this instance
    #[arg(long, env = "NODE_ID", default_value_t = Uuid::new_v4())]
    pub node_id: Uuid,

    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:5000")]
    pub listen: SocketAddr,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "lantern")]
    pub mongodb_db: String,

    /// JWT secret for token signing (required in production)
    #[arg(long, env = "JWT_SECRET")]
    pub jwt_secret: Option<String>,

    /// JWT token expiry in seconds (default 7 days)
    #[arg(long, env = "JWT_EXPIRY_SECONDS", default_value = "604800")]
    pub jwt_expiry_seconds: u64,

    /// Base URL of the SmythOS agent platform
    #[arg(long, env = "SMYTHOS_URL", default_value = "https://api.smythos.com")]
    pub agent_url: String,

    /// SmythOS agent identifier
    #[arg(long, env = "SMYTHOS_AGENT_ID", default_value = "cmfxy2xt24p88o3wt5eybaha8")]
    pub agent_id: String,

    /// SmythOS API key. Absent or placeholder means mock mode: every skill
    /// call returns canned content so the app is demoable without the
    /// external platform.
    #[arg(long, env = "SMYTHOS_API_KEY")]
    pub agent_api_key: Option<String>,

    /// Remote agent call timeout in milliseconds (generative calls are slow)
    #[arg(long, env = "AGENT_TIMEOUT_MS", default_value = "120000")]
    pub agent_timeout_ms: u64,

    /// Maximum upload size in bytes for audio/image files
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value = "10485760")]
    pub max_upload_bytes: u64,

    /// Enable development mode (default JWT secret, MongoDB optional)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Get effective JWT secret (uses default in dev mode)
    pub fn jwt_secret(&self) -> String {
        if self.dev_mode {
            self.jwt_secret
                .clone()
                .unwrap_or_else(|| "dev-only-insecure-secret-0123456789abcdef".to_string())
        } else {
            self.jwt_secret
                .clone()
                .expect("JWT_SECRET is required in production mode")
        }
    }

    /// Effective agent API key: None when unset or still the placeholder
    pub fn agent_api_key(&self) -> Option<&str> {
        match self.agent_api_key.as_deref() {
            Some(key) if !key.is_empty() && key != AGENT_KEY_PLACEHOLDER => Some(key),
            _ => None,
        }
    }

    /// Remote call timeout
    pub fn agent_timeout(&self) -> Duration {
        Duration::from_millis(self.agent_timeout_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.dev_mode && self.jwt_secret.is_none() {
            return Err("JWT_SECRET is required in production mode".to_string());
        }

        if self.max_upload_bytes == 0 {
            return Err("MAX_UPLOAD_BYTES must be greater than zero".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_args() -> Args {
        Args::parse_from(["lantern", "--dev-mode"])
    }

    #[test]
    fn test_dev_mode_flag_parses() {
        assert!(test_args().dev_mode);
        assert!(!Args::parse_from(["lantern"]).dev_mode);
    }

    #[test]
    fn test_placeholder_key_is_unconfigured() {
        let mut args = test_args();
        assert!(args.agent_api_key().is_none());

        args.agent_api_key = Some(AGENT_KEY_PLACEHOLDER.to_string());
        assert!(args.agent_api_key().is_none());

        args.agent_api_key = Some("sk-real-key".to_string());
        assert_eq!(args.agent_api_key(), Some("sk-real-key"));
    }

    #[test]
    fn test_validate_requires_secret_in_production() {
        let mut args = test_args();
        args.dev_mode = false;
        assert!(args.validate().is_err());

        args.jwt_secret = Some("a-secret-that-is-long-enough-for-hs256".into());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_agent_timeout_default() {
        let args = test_args();
        assert_eq!(args.agent_timeout(), Duration::from_secs(120));
    }
}
