//! Health and directory endpoints

use crate::application::Switchboard;
use crate::domain::agent::AgentSummary;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// `GET /health`
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// `GET /api/agents` - the same view callers receive over the socket
pub async fn list_agents(State(switchboard): State<Switchboard>) -> Json<Vec<AgentSummary>> {
    let agents = switchboard.snapshot().await;
    debug!("API: listing {} agents", agents.len());
    Json(agents)
}
