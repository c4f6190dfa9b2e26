use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    status: &'static str,
    version: &'static str,
    sessions: usize,
}

/// Liveness check for monitoring. Never touches the session cookie.
pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        sessions: state.sessions.len().await,
    })
}
