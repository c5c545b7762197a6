//! Gateway HTTP server: health probe and the Alexa skill webhook.

use crate::config::{self, Config};
use crate::gateway::protocol::SkillRequest;
use crate::llm::OpenAiClient;
use crate::routing;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

/// Spoken when response serialization itself fails; the platform expects a
/// 200 speech payload even then.
const APOLOGY_TEXT: &str = "Sorry, I encountered an error. Please try again.";

/// Shared state for the gateway (config and the OpenAI client, built once at startup).
#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<Config>,
    pub openai_client: OpenAiClient,
    /// Resolved completion model id.
    pub model: String,
}

/// Run the gateway server; binds to config.gateway.bind:config.gateway.port.
/// The OpenAI client is constructed here and lives for the process. A missing
/// API key degrades chat replies to the fallback text, it does not prevent startup.
/// Blocks until shutdown (e.g. Ctrl+C).
pub async fn run_gateway(config: Config) -> Result<()> {
    let api_key = config::resolve_openai_api_key(&config);
    if api_key.is_none() {
        log::warn!("no OpenAI API key configured; chat replies will use the fallback text");
    }
    let openai_client = OpenAiClient::new(api_key, config.openai.base_url.clone());
    let model = config::resolve_openai_model(&config);
    let bind_addr = format!("{}:{}", config.gateway.bind.trim(), config.gateway.port);

    let state = GatewayState {
        config: Arc::new(config),
        openai_client,
        model,
    };

    let app = Router::new()
        .route("/", get(health_http))
        .route("/alexa", post(skill_webhook).fallback(method_not_allowed))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("gateway listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server exited")?;
    log::info!("gateway stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");
}

/// POST /alexa — the skill endpoint. The body is parsed by hand so transport
/// failures get proper HTTP status codes; once an envelope parses, the answer
/// is always 200 with a speech-shaped body.
async fn skill_webhook(
    State(state): State<GatewayState>,
    body: Bytes,
) -> (StatusCode, Json<serde_json::Value>) {
    let envelope: SkillRequest = match serde_json::from_slice(&body) {
        Ok(e) => e,
        Err(e) => {
            log::error!("skill webhook: invalid request body: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Invalid Alexa request"})),
            );
        }
    };
    let response =
        routing::route_request(&state.openai_client, &state.model, &envelope).await;
    match serde_json::to_value(&response) {
        Ok(value) => (StatusCode::OK, Json(value)),
        Err(e) => {
            log::error!(
                "skill webhook: serializing response for {} failed: {}",
                envelope.request.typ,
                e
            );
            (StatusCode::OK, Json(apology_response()))
        }
    }
}

/// Generic apology payload for the top-level catch-all: 200, speech-shaped, session ends.
fn apology_response() -> serde_json::Value {
    json!({
        "version": "1.0",
        "response": {
            "outputSpeech": {"type": "PlainText", "text": APOLOGY_TEXT},
            "shouldEndSession": true
        }
    })
}

/// Any non-POST method on the skill endpoint.
async fn method_not_allowed() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({"error": "Method not allowed"})),
    )
}

/// GET / returns a simple health JSON (for probes).
async fn health_http(State(state): State<GatewayState>) -> Json<serde_json::Value> {
    Json(json!({
        "runtime": "running",
        "model": state.model,
        "port": state.config.gateway.port,
    }))
}
