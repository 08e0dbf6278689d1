//! HTTP server implementation
//!
//! hyper http1 with TokioIo, one spawned task per connection. Route
//! dispatch is a plain match over method and path; the auth, skill, and
//! resource prefixes each hand the request to their own module.

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::agent::AgentClient;
use crate::auth::JwtValidator;
use crate::config::Args;
use crate::db::MongoClient;
use crate::routes;
use crate::routes::helpers::{cors_preflight, error_response, full_body, BoxBody};
use crate::types::LanternError;

/// Shared application state
pub struct AppState {
    pub args: Args,
    /// None when MongoDB is unreachable (allowed in dev mode only)
    pub mongo: Option<MongoClient>,
    /// Gateway to the remote agent platform (or its mock layer)
    pub agent: Arc<AgentClient>,
    /// Token signer/verifier shared by all routes
    pub jwt: JwtValidator,
    /// Process start, for health uptime
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        args: Args,
        mongo: Option<MongoClient>,
        agent: AgentClient,
        jwt: JwtValidator,
    ) -> Self {
        Self {
            args,
            mongo,
            agent: Arc::new(agent),
            jwt,
            started_at: Instant::now(),
        }
    }
}

/// Run the HTTP server forever
pub async fn run(state: Arc<AppState>) -> Result<(), LanternError> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!(
        "Lantern listening on {} as node {}",
        state.args.listen, state.args.node_id
    );

    if state.args.dev_mode {
        warn!("Development mode enabled - insecure defaults allowed");
    }

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> Result<Response<BoxBody>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    info!("[{}] {} {}", addr, method, path);

    // Prefix routes consume the request
    if path.starts_with("/api/auth") {
        if let Some(response) = routes::handle_auth_request(req, Arc::clone(&state)).await {
            return Ok(response);
        }
        return Ok(not_found(&path));
    }

    if path.starts_with("/api/skills/") {
        if let Some(response) = routes::handle_skill_request(req, Arc::clone(&state)).await {
            return Ok(response);
        }
        return Ok(not_found(&path));
    }

    if path.starts_with("/api/resources") {
        if let Some(response) = routes::handle_resource_request(req, Arc::clone(&state)).await {
            return Ok(response);
        }
        return Ok(not_found(&path));
    }

    let response = match (method, path.as_str()) {
        (Method::GET, "/api/health") => routes::health_check(Arc::clone(&state)),

        // Root banner, kept plain-text for load balancer checks
        (Method::GET, "/") => Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "text/plain")
            .header("Access-Control-Allow-Origin", "*")
            .body(full_body("API is running..."))
            .unwrap(),

        (Method::OPTIONS, _) => cors_preflight(),

        _ => not_found(&path),
    };

    Ok(response)
}

fn not_found(path: &str) -> Response<BoxBody> {
    error_response(&LanternError::NotFound(format!("Not found: {}", path)), None)
}
