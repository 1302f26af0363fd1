// HTTP surface
// Liveness probe plus the chat endpoint forwarding to a conversational agent

pub mod agent;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::config::Config;
use crate::{Result, SeedError};

/// Opaque conversational agent boundary. Implementations own whatever
/// conversation-state strategy they use internally.
#[async_trait]
pub trait ChatAgent: Send + Sync {
    async fn call(&self, message: &str, thread_id: &str) -> anyhow::Result<String>;
}

#[derive(Clone)]
struct AppState {
    agent: Arc<dyn ChatAgent>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub thread_id: String,
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Build the application router with the given agent
#[inline]
pub fn router(agent: Arc<dyn ChatAgent>) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/chat", post(chat))
        .with_state(AppState { agent })
}

/// Bind and serve until the process is stopped
#[inline]
pub async fn serve(config: &Config, agent: Arc<dyn ChatAgent>) -> Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SeedError::Server(format!("Failed to bind {}: {}", addr, e)))?;

    info!("Chat server listening on {}", addr);

    axum::serve(listener, router(agent))
        .await
        .map_err(|e| SeedError::Server(format!("Server error: {}", e)))?;

    Ok(())
}

async fn liveness() -> &'static str {
    "stockroom backend is running"
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> std::result::Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    // Millisecond timestamp as thread identifier: collision-prone under high
    // request rates, kept until a real conversation store assigns ids.
    let thread_id = Utc::now().timestamp_millis().to_string();

    info!("Chat request on thread {}", thread_id);

    match state.agent.call(&request.message, &thread_id).await {
        Ok(response) => Ok(Json(ChatResponse {
            thread_id,
            response,
        })),
        Err(e) => {
            error!("Agent call failed on thread {}: {}", thread_id, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}
