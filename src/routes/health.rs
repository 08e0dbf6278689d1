//! Health check endpoint
//!
//! GET /api/health returns 200 whenever the service is running; the body
//! carries database and agent status for operators and deploy probes. A
//! disconnected database does not fail the probe, it is reported in the
//! body instead.

use hyper::{Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;

use crate::routes::helpers::{json_response, BoxBody};
use crate::server::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall health status (true if service is running)
    pub healthy: bool,
    /// "ok" while the process is up
    pub status: &'static str,
    /// Service version
    pub version: &'static str,
    /// Git commit the binary was built from
    pub commit: &'static str,
    /// Uptime in seconds
    pub uptime: u64,
    /// Current timestamp
    pub timestamp: String,
    /// Operating mode
    pub mode: String,
    /// Node identifier
    pub node_id: String,
    /// Database connection status
    pub database: DatabaseHealth,
    /// Agent gateway status
    pub agent: AgentHealth,
}

#[derive(Serialize)]
pub struct DatabaseHealth {
    /// Whether a MongoDB connection was established at startup
    pub connected: bool,
}

#[derive(Serialize)]
pub struct AgentHealth {
    /// "live" with a real API key, "mock" otherwise
    pub mode: &'static str,
}

fn build_health_response(state: &AppState) -> HealthResponse {
    let args = &state.args;

    HealthResponse {
        healthy: true,
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        commit: env!("GIT_COMMIT_SHORT"),
        uptime: state.started_at.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        mode: if args.dev_mode {
            "development".to_string()
        } else {
            "production".to_string()
        },
        node_id: args.node_id.to_string(),
        database: DatabaseHealth {
            connected: state.mongo.is_some(),
        },
        agent: AgentHealth {
            mode: if state.agent.is_live() { "live" } else { "mock" },
        },
    }
}

/// Handle GET /api/health
pub fn health_check(state: Arc<AppState>) -> Response<BoxBody> {
    json_response(StatusCode::OK, &build_health_response(&state))
}
