//! Health check
//!
//! | path | method | auth |
//! |------|--------|------|
//! | /api/health | GET | none |
//!
//! ```json
//! { "status": "ok", "version": "0.1.0", "epoch": "…", "current_sequence": 42 }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// ok | degraded
    status: &'static str,
    version: &'static str,
    environment: String,
    /// Changes on every restart
    epoch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_sequence: Option<u64>,
}

async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let current_sequence = match state.orders.get_current_sequence() {
        Ok(seq) => Some(seq),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not read the event sequence");
            None
        }
    };
    Json(HealthResponse {
        status: if current_sequence.is_some() { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        epoch: state.orders.epoch().to_string(),
        current_sequence,
    })
}
